use glam::{Mat4, Vec3};

use crate::render::Projection;

/// Eye, target, and up vector, as consumed by [`RenderBackend::set_view`](crate::render::RenderBackend::set_view).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookAt {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl LookAt {
    pub fn new(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        Self { eye, target, up }
    }

    /// Right-handed view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.eye).normalize_or(Vec3::NEG_Z)
    }
}

/// A snapshot of the viewer: where it looks from and how it projects.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub view: LookAt,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            view: LookAt::new(Vec3::new(9.0, 7.0, -8.0), Vec3::new(-2.5, 3.0, 5.0), Vec3::Y),
            fov_y: 45.0,
            near: 1.0,
            far: 200.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, eye: Vec3) -> Self {
        self.view.eye = eye;
        self
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.view.target = target;
        self
    }

    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov_y = fov_degrees;
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view.view_matrix()
    }

    /// Projection for a viewport of the given aspect ratio.
    pub fn projection(&self, aspect: f32) -> Projection {
        Projection {
            fov_y: self.fov_y,
            aspect,
            near: self.near,
            far: self.far,
        }
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection(aspect).matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn view_matrix_maps_eye_to_origin() {
        let camera = Camera::new().at(Vec3::new(0.0, 2.0, 10.0)).looking_at(Vec3::ZERO);
        let eye_in_view = camera.view_matrix().transform_point3(camera.view.eye);
        assert_abs_diff_eq!(eye_in_view, Vec3::ZERO, epsilon = 1e-5);
    }

    #[test]
    fn target_lies_on_negative_z_in_view_space() {
        let camera = Camera::new().at(Vec3::new(3.0, 0.0, 0.0)).looking_at(Vec3::ZERO);
        let target = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(target, Vec3::new(0.0, 0.0, -3.0), epsilon = 1e-5);
    }
}
