//! Camera parameters and projection math

use crate::foundation::math::{utils, Mat4, Transform};

/// Perspective camera parameters
///
/// An `aspect` of 0.0 means "derive from the stage size"; cameras created
/// that way track the display surface they render to.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraParams {
    /// Width over height, or 0.0 to derive from the stage
    pub aspect: f32,

    /// Vertical field of view in degrees
    pub fov_y_deg: f32,

    /// Near clip plane distance
    pub near: f32,

    /// Far clip plane distance
    pub far: f32,
}

impl CameraParams {
    /// Create camera parameters with the default 60 degree field of view
    pub fn new(aspect: f32, near: f32, far: f32) -> Self {
        Self {
            aspect,
            fov_y_deg: 60.0,
            near,
            far,
        }
    }

    /// Set the vertical field of view (builder pattern)
    pub fn with_fov_y_deg(mut self, fov_y_deg: f32) -> Self {
        self.fov_y_deg = fov_y_deg;
        self
    }

    /// The aspect ratio used for projection, falling back to the stage's
    pub fn effective_aspect(&self, stage_aspect: f32) -> f32 {
        if self.aspect > 0.0 {
            self.aspect
        } else {
            stage_aspect
        }
    }

    /// Perspective projection matrix for a stage with the given aspect ratio
    pub fn projection_matrix(&self, stage_aspect: f32) -> Mat4 {
        Mat4::new_perspective(
            self.effective_aspect(stage_aspect),
            utils::deg_to_rad(self.fov_y_deg),
            self.near,
            self.far,
        )
    }
}

impl Default for CameraParams {
    fn default() -> Self {
        Self::new(0.0, 0.1, 100.0)
    }
}

/// View matrix for a camera with the given world transform
pub fn view_matrix(world: &Transform) -> Mat4 {
    world.inverse().to_matrix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn test_aspect_zero_derives_from_stage() {
        let auto = CameraParams::new(0.0, 0.1, 100.0);
        assert_relative_eq!(auto.effective_aspect(16.0 / 9.0), 16.0 / 9.0);

        let fixed = CameraParams::new(1.5, 0.1, 100.0);
        assert_relative_eq!(fixed.effective_aspect(16.0 / 9.0), 1.5);
    }

    #[test]
    fn test_projection_matrix_follows_fov() {
        let params = CameraParams::new(2.0, 0.1, 100.0).with_fov_y_deg(90.0);
        let projection = params.projection_matrix(16.0 / 9.0);

        let focal = 1.0 / (utils::deg_to_rad(90.0) * 0.5).tan();
        assert_relative_eq!(projection[(1, 1)], focal, epsilon = 1e-5);
        assert_relative_eq!(projection[(0, 0)], focal / 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_view_matrix_matches_look_at() {
        let mut world = Transform::from_position(Vec3::new(0.0, 0.8, 1.5));
        world.rotate_euler_deg(Vec3::new(-30.0, 0.0, 0.0), true);

        let forward = world.rotation * Vec3::new(0.0, 0.0, -1.0);
        let eye = Point3::new(0.0, 0.8, 1.5);
        let target = eye + forward;
        let expected = Mat4::look_at_rh(&eye, &target, &Vec3::y());

        assert_relative_eq!(view_matrix(&world), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_default_clip_planes() {
        let params = CameraParams::default();
        assert_relative_eq!(params.near, 0.1);
        assert_relative_eq!(params.far, 100.0);
        assert_relative_eq!(params.fov_y_deg, 60.0);
    }
}
