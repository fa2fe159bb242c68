//! One-dimensional reflecting motion and the vehicle that rides on it.

use glam::Vec3;

use crate::color::Color;
use crate::drawable::{Drawable, Material};
use crate::error::SceneError;
use crate::mesh::Mesh;
use crate::render::RenderBackend;
use crate::transform::TransformStack;

/// A position that moves at constant speed and bounces between two bounds.
///
/// The bounce is reactive: a tick first moves, then flips the velocity if the
/// new position lies outside the bounds. The mover can therefore overshoot a
/// bound by up to one tick's displacement before heading back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundedMover {
    position: f32,
    speed: f32,
    low: f32,
    high: f32,
}

impl BoundedMover {
    pub fn new(position: f32, speed: f32, bounds: (f32, f32)) -> Result<Self, SceneError> {
        let (low, high) = bounds;
        if low.is_nan() || high.is_nan() || low >= high {
            return Err(SceneError::InvalidBounds { low, high });
        }
        Ok(Self {
            position,
            speed,
            low,
            high,
        })
    }

    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn bounds(&self) -> (f32, f32) {
        (self.low, self.high)
    }

    /// Advances one step and returns the new position.
    pub fn tick(&mut self) -> f32 {
        self.position += self.speed;
        if self.position < self.low {
            self.speed = self.speed.abs();
        }
        if self.position > self.high {
            self.speed = -self.speed.abs();
        }
        self.position
    }
}

/// Placement of the four wheels relative to the vehicle origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelBase {
    /// X offset of the front axle.
    pub front: f32,
    /// X offset of the back axle.
    pub back: f32,
    /// Z offset of the left wheels; right wheels sit at `-half_track`.
    pub half_track: f32,
    /// Height of the axles.
    pub axle_height: f32,
}

impl Default for WheelBase {
    fn default() -> Self {
        Self {
            front: 0.9,
            back: -0.9,
            half_track: 0.65,
            axle_height: 0.35,
        }
    }
}

impl WheelBase {
    /// Wheel offsets over `{front, back} × {left, right}`.
    pub fn offsets(&self) -> [Vec3; 4] {
        let mut out = [Vec3::ZERO; 4];
        let mut i = 0;
        for x in [self.front, self.back] {
            for z in [self.half_track, -self.half_track] {
                out[i] = Vec3::new(x, self.axle_height, z);
                i += 1;
            }
        }
        out
    }
}

/// A car: a body and four wheels carried along `axis` by a [`BoundedMover`].
#[derive(Clone, Debug)]
pub struct Vehicle {
    mover: BoundedMover,
    origin: Vec3,
    axis: Vec3,
    body: Drawable,
    body_offset: Vec3,
    wheel: Drawable,
    wheel_base: WheelBase,
}

impl Vehicle {
    /// Creates a vehicle riding `mover` along `axis` (normalized) from `origin`.
    pub fn new(mover: BoundedMover, origin: Vec3, axis: Vec3) -> Self {
        Self {
            mover,
            origin,
            axis: axis.normalize_or(Vec3::X),
            body: Drawable::new(Mesh::cuboid(Vec3::new(2.6, 0.8, 1.2)))
                .with_material(Material::shiny(Color::rgb(0.1, 0.3, 0.8), 64.0)),
            body_offset: Vec3::new(0.0, 0.75, 0.0),
            wheel: Drawable::new(Mesh::wheel(0.35, 0.2, 16))
                .with_material(Material::matte(Color::rgb(0.08, 0.08, 0.08))),
            wheel_base: WheelBase::default(),
        }
    }

    pub fn with_body(mut self, body: Drawable, offset: Vec3) -> Self {
        self.body = body;
        self.body_offset = offset;
        self
    }

    pub fn with_wheels(mut self, wheel: Drawable, wheel_base: WheelBase) -> Self {
        self.wheel = wheel;
        self.wheel_base = wheel_base;
        self
    }

    pub fn mover(&self) -> &BoundedMover {
        &self.mover
    }

    /// World position of the vehicle origin.
    pub fn position(&self) -> Vec3 {
        self.origin + self.axis * self.mover.position()
    }

    pub fn tick(&mut self) {
        self.mover.tick();
    }

    /// Draws the body, then the wheels, at the mover's current position.
    pub fn draw(&self, stack: &mut TransformStack, backend: &mut impl RenderBackend) {
        let mut scope = stack.scope(self.position());
        self.body.draw(&mut scope, backend, self.body_offset);
        for offset in self.wheel_base.offsets() {
            self.wheel.draw(&mut scope, backend, offset);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingBackend;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_inverted_bounds() {
        assert_eq!(
            BoundedMover::new(0.0, 0.1, (5.0, -5.0)),
            Err(SceneError::InvalidBounds {
                low: 5.0,
                high: -5.0
            })
        );
        assert!(BoundedMover::new(0.0, 0.1, (1.0, 1.0)).is_err());
    }

    #[test]
    fn reactive_flip_overshoots_then_returns() {
        let mut mover = BoundedMover::new(0.0, 0.1, (-5.0, 5.0)).unwrap();

        let mut crossing = None;
        for tick in 1..=60 {
            let before = mover.position();
            let after = mover.tick();
            if after > 5.0 {
                crossing = Some(tick);
                assert!(after - 5.0 <= 0.1 + 1e-4, "overshoot {} too large", after - 5.0);
                assert!(after > before);
                // flipped within the overshooting tick, moving back on the next
                assert!(mover.speed() < 0.0);
                let back = mover.tick();
                assert!(back < after);
                break;
            }
            assert!(mover.speed() > 0.0);
        }

        let tick = crossing.expect("mover never crossed its upper bound");
        assert_eq!(tick, 51, "crossed on tick {}", tick);
    }

    #[test]
    fn oscillation_never_diverges() {
        let mut mover = BoundedMover::new(0.0, 0.1, (-5.0, 5.0)).unwrap();
        let mut reversals = 0;
        let mut last_sign = mover.speed().signum();

        for _ in 0..20_000 {
            let p = mover.tick();
            assert!(p >= -5.0 - 0.1 - 1e-3 && p <= 5.0 + 0.1 + 1e-3, "escaped to {}", p);
            if mover.speed().signum() != last_sign {
                reversals += 1;
                last_sign = mover.speed().signum();
            }
        }

        // one full sweep is ~100 ticks
        assert!(reversals >= 190, "only {} reversals", reversals);
    }

    #[test]
    fn starting_outside_bounds_heads_back_in() {
        let mut mover = BoundedMover::new(-9.0, -0.5, (-5.0, 5.0)).unwrap();
        mover.tick();
        assert!(mover.speed() > 0.0);
        let p = mover.position();
        assert!(mover.tick() > p);
    }

    #[test]
    fn wheel_offsets_cover_each_corner() {
        let offsets = WheelBase::default().offsets();
        assert_eq!(offsets[0], Vec3::new(0.9, 0.35, 0.65));
        assert_eq!(offsets[1], Vec3::new(0.9, 0.35, -0.65));
        assert_eq!(offsets[2], Vec3::new(-0.9, 0.35, 0.65));
        assert_eq!(offsets[3], Vec3::new(-0.9, 0.35, -0.65));
    }

    #[test]
    fn vehicle_draws_body_and_four_wheels_at_mover_position() {
        let mover = BoundedMover::new(2.0, 0.1, (-5.0, 5.0)).unwrap();
        let vehicle = Vehicle::new(mover, Vec3::new(0.0, 0.0, 6.0), Vec3::X);
        let mut stack = TransformStack::new();
        let mut backend = RecordingBackend::new();

        vehicle.draw(&mut stack, &mut backend);

        let body = 12;
        let wheel = 4 * 16;
        assert_eq!(backend.primitive_count(), body + 4 * wheel);
        assert_eq!(stack.depth(), 0);

        let first = backend.primitives()[0].1[0];
        // cuboid vertex 4 is (-1.3, -0.4, 0.6) in body space
        assert_abs_diff_eq!(first, Vec3::new(0.7, 0.35, 6.6), epsilon = 1e-5);
    }
}
