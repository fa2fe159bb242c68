//! Host and scene configuration.

use std::time::Duration;

use glam::Vec3;

use crate::color::Color;
use crate::render::{DepthFunc, Fog};

/// Configuration for the app window and tick loop.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Time between update ticks.
    pub tick_interval: Duration,
    /// Run this many frames against a recording backend instead of opening a window.
    pub headless_frames: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Diorama".to_string(),
            width: 500,
            height: 500,
            tick_interval: Duration::from_millis(16),
            headless_frames: None,
        }
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn headless(mut self, frames: u64) -> Self {
        self.headless_frames = Some(frames);
        self
    }
}

/// How the frame driver sets up the projection each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectionMode {
    /// Always use this aspect ratio.
    Fixed(f32),
    /// Ask the backend for the viewport aspect, falling back to the given value.
    FromViewport { fallback: f32 },
}

impl ProjectionMode {
    pub fn aspect(&self, viewport: Option<f32>) -> f32 {
        match *self {
            ProjectionMode::Fixed(aspect) => aspect,
            ProjectionMode::FromViewport { fallback } => viewport
                .filter(|a| a.is_finite() && *a > 0.0)
                .unwrap_or(fallback),
        }
    }
}

/// Per-scene rendering and interaction settings.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneConfig {
    pub clear_color: Color,
    pub projection: ProjectionMode,
    /// Point the camera looks at.
    pub look_target: Vec3,
    /// Radians added or removed per rotate input.
    pub rotate_step: f32,
    /// Distance added or removed per zoom input.
    pub zoom_step: f32,
    /// Radians every light advances per tick.
    pub light_spin: f32,
    pub depth_test: bool,
    pub depth_func: DepthFunc,
    pub fog: Option<Fog>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            projection: ProjectionMode::Fixed(1.0),
            look_target: Vec3::ZERO,
            rotate_step: 0.1,
            zoom_step: 1.0,
            light_spin: 0.01,
            depth_test: true,
            depth_func: DepthFunc::Less,
            fog: None,
        }
    }
}

impl SceneConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn projection(mut self, mode: ProjectionMode) -> Self {
        self.projection = mode;
        self
    }

    pub fn look_target(mut self, target: Vec3) -> Self {
        self.look_target = target;
        self
    }

    pub fn steps(mut self, rotate: f32, zoom: f32) -> Self {
        self.rotate_step = rotate;
        self.zoom_step = zoom;
        self
    }

    pub fn light_spin(mut self, radians_per_tick: f32) -> Self {
        self.light_spin = radians_per_tick;
        self
    }

    pub fn depth(mut self, enabled: bool, func: DepthFunc) -> Self {
        self.depth_test = enabled;
        self.depth_func = func;
        self
    }

    pub fn fog(mut self, fog: Fog) -> Self {
        self.fog = Some(fog);
        self
    }
}
