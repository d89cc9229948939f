//! Math utilities and types
//!
//! Provides fundamental math types for 3D scenes and camera work.

pub use nalgebra::{
    Vector2, Vector3, Vector4,
    Matrix3, Matrix4,
    Quaternion,
    Unit,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with only position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Move the transform by a delta vector
    ///
    /// With `local` set, the delta is interpreted along the transform's own
    /// axes (rotated by the current orientation); otherwise it is applied in
    /// parent space.
    pub fn translate(&mut self, delta: Vec3, local: bool) {
        if local {
            self.position += self.rotation * delta;
        } else {
            self.position += delta;
        }
    }

    /// Rotate by XYZ Euler angles given in degrees
    ///
    /// With `local` set, the rotation is composed after the current
    /// orientation (a turn about the transform's own axes); otherwise it is
    /// composed before it (a turn about the parent's axes).
    pub fn rotate_euler_deg(&mut self, degrees: Vec3, local: bool) {
        let rotation = Quat::from_euler_angles(
            utils::deg_to_rad(degrees.x),
            utils::deg_to_rad(degrees.y),
            utils::deg_to_rad(degrees.z),
        );
        self.rotation = if local {
            self.rotation * rotation
        } else {
            rotation * self.rotation
        };
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Apply this transform to a point
    pub fn transform_point(&self, point: Point3) -> Point3 {
        let matrix = self.to_matrix();
        matrix.transform_point(&point)
    }

    /// Combine this transform with another (self is the parent)
    pub fn combine(&self, other: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale.component_mul(&other.position)),
            rotation: self.rotation * other.rotation,
            scale: self.scale.component_mul(&other.scale),
        }
    }

    /// Get the inverse transform
    pub fn inverse(&self) -> Transform {
        let inv_scale = Vec3::new(1.0 / self.scale.x, 1.0 / self.scale.y, 1.0 / self.scale.z);
        let inv_rotation = self.rotation.inverse();
        let inv_position = inv_rotation * (-self.position.component_mul(&inv_scale));

        Transform {
            position: inv_position,
            rotation: inv_rotation,
            scale: inv_scale,
        }
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Radians to degrees conversion factor
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Convert radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * constants::RAD_TO_DEG
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_transform_defaults() {
        let transform = Transform::identity();
        assert_relative_eq!(transform.position, Vec3::zeros(), epsilon = EPSILON);
        assert_relative_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0), epsilon = EPSILON);
        let dot = transform.rotation.coords.dot(&Quat::identity().coords);
        assert!(dot.abs() > 1.0 - EPSILON);
    }

    #[test]
    fn test_translate_local_matches_global_for_identity_rotation() {
        let mut a = Transform::identity();
        let mut b = Transform::identity();
        a.translate(Vec3::new(0.0, 0.8, 1.5), true);
        b.translate(Vec3::new(0.0, 0.8, 1.5), false);
        assert_relative_eq!(a.position, b.position, epsilon = EPSILON);
        assert_relative_eq!(a.position, Vec3::new(0.0, 0.8, 1.5), epsilon = EPSILON);
    }

    #[test]
    fn test_translate_local_follows_rotation() {
        let mut transform = Transform::identity();
        transform.rotate_euler_deg(Vec3::new(0.0, 90.0, 0.0), true);
        transform.translate(Vec3::new(0.0, 0.0, -1.0), true);
        assert_relative_eq!(transform.position, Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_euler_deg_matches_axis_angle() {
        let mut transform = Transform::identity();
        transform.rotate_euler_deg(Vec3::new(-30.0, 0.0, 0.0), true);

        let expected = Quat::from_axis_angle(&Vec3::x_axis(), utils::deg_to_rad(-30.0));
        // Quaternions q and -q represent the same rotation
        let dot = transform.rotation.coords.dot(&expected.coords);
        assert!(dot.abs() > 1.0 - EPSILON);
    }

    #[test]
    fn test_rotate_euler_local_composes_after_current_orientation() {
        let base = Quat::from_axis_angle(&Vec3::y_axis(), utils::deg_to_rad(90.0));
        let pitch = Quat::from_axis_angle(&Vec3::x_axis(), utils::deg_to_rad(-30.0));

        let mut local = Transform::identity();
        local.rotation = base;
        local.rotate_euler_deg(Vec3::new(-30.0, 0.0, 0.0), true);
        let dot = local.rotation.coords.dot(&(base * pitch).coords);
        assert!(dot.abs() > 1.0 - EPSILON);

        let mut global = Transform::identity();
        global.rotation = base;
        global.rotate_euler_deg(Vec3::new(-30.0, 0.0, 0.0), false);
        let dot = global.rotation.coords.dot(&(pitch * base).coords);
        assert!(dot.abs() > 1.0 - EPSILON);
    }

    #[test]
    fn test_to_matrix_applies_scale_then_rotation_then_translation() {
        let mut transform = Transform::identity();
        transform.position = Vec3::new(1.0, 2.0, 3.0);
        transform.scale = Vec3::new(2.0, 2.0, 2.0);
        transform.rotate_euler_deg(Vec3::new(0.0, 90.0, 0.0), true);

        let point = transform.to_matrix().transform_point(&Point3::new(0.0, 0.0, -1.0));
        // Scaled to (0, 0, -2), rotated to (-2, 0, 0), then translated
        assert_relative_eq!(point, Point3::new(-1.0, 2.0, 3.0), epsilon = 1e-5);
    }

    #[test]
    fn test_combine_applies_parent_scale_and_position() {
        let mut parent = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));
        parent.scale = Vec3::new(2.0, 2.0, 2.0);
        let child = Transform::from_position(Vec3::new(1.0, 0.0, 0.0));

        let combined = parent.combine(&child);
        assert_relative_eq!(combined.position, Vec3::new(3.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(combined.scale, Vec3::new(2.0, 2.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_inverse_round_trips_points() {
        let mut transform = Transform::from_position(Vec3::new(0.0, 0.8, 1.5));
        transform.rotate_euler_deg(Vec3::new(-30.0, 0.0, 0.0), true);
        transform.scale = Vec3::new(10.0, 10.0, 10.0);

        let point = Point3::new(0.3, -0.2, 0.7);
        let round_trip = transform.inverse().transform_point(transform.transform_point(point));
        assert_relative_eq!(round_trip, point, epsilon = 1e-4);
    }
}
