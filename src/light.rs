//! Light sources: fixed and orbiting.
//!
//! Both kinds implement [`LightSource`], which is all the frame driver needs
//! to upload a light and to animate it.
//!
//! ```
//! use diorama::{Color, Intensity, LightKind, LightSource, OrbitLight, Vec3};
//!
//! let mut sun = OrbitLight::new(Vec3::new(0.0, 15.0, 0.0), 25.0, Intensity::daylight());
//! sun.advance(0.01);
//! assert_eq!(sun.position().w, 1.0);
//! assert_eq!(sun.intensity(LightKind::Specular), Color::WHITE);
//! ```

use glam::{Vec3, Vec4};

use crate::color::Color;
use crate::render::LightParams;

/// Which intensity term to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LightKind {
    Ambient,
    Diffuse,
    Specular,
}

/// The three intensity terms of a light, fixed at construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intensity {
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
}

impl Intensity {
    pub const fn new(ambient: Color, diffuse: Color, specular: Color) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
        }
    }

    /// Warm white key light.
    pub const fn daylight() -> Self {
        Self::new(
            Color::rgb(0.2, 0.2, 0.1),
            Color::rgb(0.8, 0.8, 0.7),
            Color::WHITE,
        )
    }

    /// Dim red fill light without a highlight.
    pub const fn ember() -> Self {
        Self::new(
            Color::rgb(0.1, 0.0, 0.0),
            Color::rgba(0.2, 0.0, 0.0, 0.5),
            Color::BLACK,
        )
    }

    pub fn get(&self, kind: LightKind) -> Color {
        match kind {
            LightKind::Ambient => self.ambient,
            LightKind::Diffuse => self.diffuse,
            LightKind::Specular => self.specular,
        }
    }
}

/// Anything that can be uploaded as a light.
pub trait LightSource {
    /// Homogeneous position: `w == 0` for a direction, `w == 1` for a point.
    fn position(&self) -> Vec4;

    fn intensity(&self, kind: LightKind) -> Color;

    /// Animates the light by `delta` radians. Static lights ignore it.
    fn advance(&mut self, _delta: f32) {}

    /// Everything a backend needs for one light slot.
    fn params(&self) -> LightParams {
        LightParams {
            ambient: self.intensity(LightKind::Ambient),
            diffuse: self.intensity(LightKind::Diffuse),
            specular: self.intensity(LightKind::Specular),
            position: self.position(),
        }
    }
}

/// A light that never moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PositionedLight {
    position: Vec4,
    intensity: Intensity,
}

impl PositionedLight {
    /// A point light at `position`.
    pub fn point(position: Vec3, intensity: Intensity) -> Self {
        Self {
            position: position.extend(1.0),
            intensity,
        }
    }

    /// A directional light shining from `direction` (toward the origin).
    pub fn directional(direction: Vec3, intensity: Intensity) -> Self {
        Self {
            position: direction.extend(0.0),
            intensity,
        }
    }
}

impl LightSource for PositionedLight {
    fn position(&self) -> Vec4 {
        self.position
    }

    fn intensity(&self, kind: LightKind) -> Color {
        self.intensity.get(kind)
    }
}

/// A point light circling `center` at a fixed `distance`.
///
/// Uses the same orbit as [`OrbitCamera`](crate::OrbitCamera):
/// `center + (distance·sin(angle), 0, distance·cos(angle))`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitLight {
    center: Vec3,
    distance: f32,
    angle: f32,
    intensity: Intensity,
}

impl OrbitLight {
    pub fn new(center: Vec3, distance: f32, intensity: Intensity) -> Self {
        Self {
            center,
            distance,
            angle: 0.0,
            intensity,
        }
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
    }
}

impl LightSource for OrbitLight {
    fn position(&self) -> Vec4 {
        let offset = Vec3::new(
            self.distance * self.angle.sin(),
            0.0,
            self.distance * self.angle.cos(),
        );
        (self.center + offset).extend(1.0)
    }

    fn intensity(&self, kind: LightKind) -> Color {
        self.intensity.get(kind)
    }

    fn advance(&mut self, delta: f32) {
        self.rotate(delta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::PI;

    #[test]
    fn positioned_light_keeps_homogeneous_w() {
        let sun = PositionedLight::directional(Vec3::new(0.0, 0.0, 7.0), Intensity::daylight());
        assert_eq!(sun.position(), Vec4::new(0.0, 0.0, 7.0, 0.0));

        let mut lamp = PositionedLight::point(Vec3::new(0.0, -7.0, 0.0), Intensity::ember());
        lamp.advance(1.0);
        assert_eq!(lamp.position(), Vec4::new(0.0, -7.0, 0.0, 1.0));
    }

    #[test]
    fn orbit_light_follows_orbit_formula() {
        let mut light = OrbitLight::new(Vec3::new(0.0, 10.0, 0.0), 4.0, Intensity::daylight());
        assert_abs_diff_eq!(light.position(), Vec4::new(0.0, 10.0, 4.0, 1.0));

        light.advance(PI);
        assert_abs_diff_eq!(light.position(), Vec4::new(0.0, 10.0, -4.0, 1.0), epsilon = 1e-5);
        assert_eq!(light.angle(), PI);
    }

    #[test]
    fn intensity_is_selected_by_kind() {
        let light = OrbitLight::new(Vec3::ZERO, 1.0, Intensity::ember());
        assert_eq!(light.intensity(LightKind::Ambient), Color::rgb(0.1, 0.0, 0.0));
        assert_eq!(light.intensity(LightKind::Specular), Color::BLACK);

        let params = light.params();
        assert_eq!(params.diffuse, Color::rgba(0.2, 0.0, 0.0, 0.5));
        assert_eq!(params.position, light.position());
    }
}
