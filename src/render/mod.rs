//! The boundary between the scene core and whatever puts pixels on screen.
//!
//! The core never talks to a graphics API directly. Everything it wants drawn
//! goes through the [`RenderBackend`] trait as a stream of immediate-mode
//! calls: frame setup, primitives made of world-space vertices, light and
//! material state, and presentation.
//!
//! Two backends ship with the crate:
//!
//! - [`RecordingBackend`]: stores every call as a [`RenderCommand`]; used by
//!   tests and headless runs
//! - [`WgpuBackend`]: batches primitives into a vertex buffer and renders
//!   them with a lit, fogged pipeline
//!
//! # Implementing a Backend
//!
//! ```
//! use diorama::render::{RenderBackend, Projection, DepthFunc, Fog, LightParams};
//! use diorama::{Color, LookAt, Material, Topology, Vec3};
//!
//! #[derive(Default)]
//! struct VertexCounter(usize);
//!
//! impl RenderBackend for VertexCounter {
//!     fn clear_frame(&mut self, _color: Color) {}
//!     fn set_projection(&mut self, _projection: Projection) {}
//!     fn set_view(&mut self, _view: LookAt) {}
//!     fn begin_primitive(&mut self, _topology: Topology) {}
//!     fn emit_vertex(&mut self, _position: Vec3) { self.0 += 1; }
//!     fn emit_color(&mut self, _color: Color) {}
//!     fn end_primitive(&mut self) {}
//!     fn set_material(&mut self, _material: Material) {}
//!     fn set_light(&mut self, _id: usize, _light: LightParams) {}
//!     fn enable_lighting(&mut self) {}
//!     fn set_depth_test(&mut self, _enabled: bool, _func: DepthFunc) {}
//!     fn set_fog(&mut self, _fog: Option<Fog>) {}
//!     fn present_frame(&mut self) {}
//!     fn request_redraw(&mut self) {}
//! }
//! ```

mod batch;
mod recording;
mod wgpu_backend;

use glam::{Vec3, Vec4};

use crate::camera::LookAt;
use crate::color::Color;
use crate::drawable::Material;
use crate::mesh::Topology;

pub use batch::{BatchVertex, PrimitiveBatch};
pub use recording::{RecordingBackend, RenderCommand};
pub use wgpu_backend::WgpuBackend;

/// Perspective projection parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    /// Width over height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self) -> glam::Mat4 {
        glam::Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }
}

/// Depth comparison applied when depth testing is enabled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DepthFunc {
    #[default]
    Less,
    LessEqual,
    Always,
}

/// Distance fog falloff.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FogMode {
    /// Linear ramp between `start` and `end`.
    Linear,
    /// `exp(-density * d)`.
    Exp(f32),
    /// `exp(-(density * d)^2)`.
    Exp2(f32),
}

/// Distance fog settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub mode: FogMode,
    pub color: Color,
    pub start: f32,
    pub end: f32,
}

impl Fog {
    pub fn linear(color: Color, start: f32, end: f32) -> Self {
        Self {
            mode: FogMode::Linear,
            color,
            start,
            end,
        }
    }

    /// Fraction of the surface color that survives at eye distance `d`.
    pub fn factor(&self, d: f32) -> f32 {
        let f = match self.mode {
            FogMode::Linear => {
                if self.end <= self.start {
                    return if d < self.start { 1.0 } else { 0.0 };
                }
                (self.end - d) / (self.end - self.start)
            }
            FogMode::Exp(density) => (-density * d).exp(),
            FogMode::Exp2(density) => (-(density * d).powi(2)).exp(),
        };
        f.clamp(0.0, 1.0)
    }
}

/// Number of light slots every backend must provide.
pub const MAX_LIGHTS: usize = 8;

/// Parameters uploaded for one light slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightParams {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Homogeneous position: `w == 0` is a direction, `w == 1` a point.
    pub position: Vec4,
}

/// Immediate-mode rendering collaborator.
///
/// Vertices arrive already transformed into world space; backends only apply
/// the view and projection they were given.
pub trait RenderBackend {
    /// Clears color and depth for a new frame.
    fn clear_frame(&mut self, color: Color);

    fn set_projection(&mut self, projection: Projection);

    fn set_view(&mut self, view: LookAt);

    /// Starts a primitive; vertices follow until [`end_primitive`](Self::end_primitive).
    fn begin_primitive(&mut self, topology: Topology);

    fn emit_vertex(&mut self, position: Vec3);

    /// Sets the color used by subsequent vertices.
    fn emit_color(&mut self, color: Color);

    fn end_primitive(&mut self);

    fn set_material(&mut self, material: Material);

    fn set_light(&mut self, id: usize, light: LightParams);

    fn enable_lighting(&mut self);

    fn set_depth_test(&mut self, enabled: bool, func: DepthFunc);

    /// Enables fog, or disables it with `None`.
    fn set_fog(&mut self, fog: Option<Fog>);

    fn present_frame(&mut self);

    /// Asks the host to schedule another draw outside the tick cadence.
    fn request_redraw(&mut self);

    /// Aspect ratio of the current viewport, when the backend knows it.
    fn viewport_aspect(&self) -> Option<f32> {
        None
    }
}
