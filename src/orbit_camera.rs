use glam::Vec3;

use crate::camera::{Camera, LookAt};

/// A camera that circles a fixed center on the horizontal plane.
///
/// The eye sits at `center + (distance·sin(angle), 0, distance·cos(angle))`.
/// `angle` grows without bound; `distance` always stays inside
/// `[min_distance, max_distance]`.
///
/// # Example
/// ```
/// use diorama::{OrbitCamera, Vec3};
///
/// let mut orbit = OrbitCamera::new()
///     .center(Vec3::new(0.0, 6.0, 0.0))
///     .distance(20.0)
///     .distance_limits(5.0, 60.0);
///
/// // In the input handler:
/// orbit.rotate(0.1);
/// orbit.move_by(-2.0);
/// let view = orbit.look_at(Vec3::ZERO);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    center: Vec3,
    up: Vec3,
    distance: f32,
    angle: f32,
    min_distance: f32,
    max_distance: f32,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            center: Vec3::new(0.0, 7.0, 0.0),
            up: Vec3::Y,
            distance: 20.0,
            angle: 0.0,
            min_distance: 2.0,
            max_distance: 80.0,
            fov_y: 45.0,
            near: 1.0,
            far: 200.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the point the camera orbits around.
    pub fn center(mut self, center: Vec3) -> Self {
        self.center = center;
        self
    }

    /// Set the up vector handed to the view.
    pub fn up(mut self, up: Vec3) -> Self {
        self.up = up;
        self
    }

    /// Set the distance from the center, clamped to the current limits.
    /// NaN is ignored.
    pub fn distance(mut self, distance: f32) -> Self {
        if !distance.is_nan() {
            self.distance = distance.clamp(self.min_distance, self.max_distance);
        }
        self
    }

    /// Set the initial angle in radians.
    pub fn angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    /// Set distance limits. Swapped limits are reordered; non-finite limits
    /// leave the current ones in place.
    pub fn distance_limits(mut self, min: f32, max: f32) -> Self {
        if !min.is_finite() || !max.is_finite() {
            return self;
        }
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_distance = min;
        self.max_distance = max;
        self.distance = self.distance.clamp(min, max);
        self
    }

    /// Set the field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov_y = fov_degrees;
        self
    }

    pub fn clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    pub fn current_distance(&self) -> f32 {
        self.distance
    }

    pub fn current_angle(&self) -> f32 {
        self.angle
    }

    pub fn distance_range(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    pub fn center_point(&self) -> Vec3 {
        self.center
    }

    /// Spins the camera around the center. No wraparound is applied.
    pub fn rotate(&mut self, delta: f32) {
        self.angle += delta;
    }

    /// Moves toward (negative) or away from (positive) the center, saturating at the limits.
    /// A move that would make the distance NaN is ignored.
    pub fn move_by(&mut self, delta: f32) {
        let distance = self.distance + delta;
        if distance.is_nan() {
            return;
        }
        self.distance = distance.clamp(self.min_distance, self.max_distance);
    }

    pub fn eye_position(&self) -> Vec3 {
        self.center
            + Vec3::new(
                self.distance * self.angle.sin(),
                0.0,
                self.distance * self.angle.cos(),
            )
    }

    pub fn look_at(&self, target: Vec3) -> LookAt {
        LookAt::new(self.eye_position(), target, self.up)
    }

    /// Current camera state looking at `target`.
    pub fn camera(&self, target: Vec3) -> Camera {
        Camera {
            view: self.look_at(target),
            fov_y: self.fov_y,
            near: self.near,
            far: self.far,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn eye_orbits_on_horizontal_plane() {
        let mut orbit = OrbitCamera::new()
            .center(Vec3::new(1.0, 3.0, -2.0))
            .distance(10.0);
        assert_abs_diff_eq!(orbit.eye_position(), Vec3::new(1.0, 3.0, 8.0));

        orbit.rotate(FRAC_PI_2);
        assert_abs_diff_eq!(orbit.eye_position(), Vec3::new(11.0, 3.0, -2.0), epsilon = 1e-5);
    }

    #[test]
    fn move_saturates_at_limits() {
        let mut orbit = OrbitCamera::new().distance_limits(5.0, 50.0).distance(20.0);

        orbit.move_by(1e9);
        assert_eq!(orbit.current_distance(), 50.0);
        orbit.move_by(-1e9);
        assert_eq!(orbit.current_distance(), 5.0);
        orbit.move_by(-1.0);
        assert_eq!(orbit.current_distance(), 5.0);
        orbit.move_by(2.5);
        assert_eq!(orbit.current_distance(), 7.5);
    }

    #[test]
    fn distance_stays_in_range_for_any_delta() {
        let mut orbit = OrbitCamera::new();
        let (min, max) = orbit.distance_range();
        for delta in [
            -1e9,
            1e9,
            0.5,
            f32::NAN,
            -0.5,
            37.0,
            -1e-3,
            f32::MAX,
            f32::MIN,
            f32::INFINITY,
            f32::NEG_INFINITY,
        ] {
            orbit.move_by(delta);
            let d = orbit.current_distance();
            assert!(d >= min && d <= max, "distance {} escaped [{}, {}]", d, min, max);
        }
    }

    #[test]
    fn nan_delta_keeps_current_distance() {
        let mut orbit = OrbitCamera::new().distance_limits(5.0, 50.0).distance(20.0);
        orbit.move_by(f32::NAN);
        assert_eq!(orbit.current_distance(), 20.0);
        let orbit = orbit.distance(f32::NAN);
        assert_eq!(orbit.current_distance(), 20.0);
    }

    #[test]
    fn non_finite_limits_are_ignored() {
        let orbit = OrbitCamera::new()
            .distance_limits(5.0, 50.0)
            .distance_limits(f32::NAN, 10.0)
            .distance_limits(1.0, f32::INFINITY);
        assert_eq!(orbit.distance_range(), (5.0, 50.0));
    }

    #[test]
    fn rotate_is_additive() {
        let (a, b) = (0.7f32, -2.25f32);
        let mut split = OrbitCamera::new();
        split.rotate(a);
        split.rotate(b);
        let mut once = OrbitCamera::new();
        once.rotate(a + b);
        assert_eq!(split.current_angle(), once.current_angle());
    }

    #[test]
    fn rotation_is_unbounded() {
        let mut orbit = OrbitCamera::new();
        for _ in 0..100 {
            orbit.rotate(1.0);
        }
        assert_eq!(orbit.current_angle(), 100.0);
    }

    #[test]
    fn look_at_carries_up_and_target() {
        let orbit = OrbitCamera::new().up(Vec3::Z);
        let view = orbit.look_at(Vec3::ONE);
        assert_eq!(view.target, Vec3::ONE);
        assert_eq!(view.up, Vec3::Z);
        assert_eq!(view.eye, orbit.eye_position());
    }

    #[test]
    fn swapped_limits_are_reordered() {
        let orbit = OrbitCamera::new().distance_limits(30.0, 10.0);
        assert_eq!(orbit.distance_range(), (10.0, 30.0));
        assert_eq!(orbit.current_distance(), 20.0);
    }
}
