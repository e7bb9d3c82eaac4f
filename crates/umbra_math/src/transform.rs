// Rotation utilities for instance transforms.
//
// glam::Quat already rotates points and vectors (`quat * v`); this adds the
// degree-based constructor the scene API uses and bounding box transformation.

use crate::{Aabb, Quat, Vec3};

/// Rotation of `degrees` about `axis` (normalized internally).
pub fn rotation_degrees(axis: Vec3, degrees: f32) -> Quat {
    Quat::from_axis_angle(axis.normalize(), degrees.to_radians())
}

/// Extension trait for rotations acting on bounding boxes.
pub trait QuatExt {
    /// Bounding box of the rotated box.
    ///
    /// Rotates all 8 corners and takes the componentwise extrema; the result
    /// is conservative, never tighter than the rotated volume.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl QuatExt for Quat {
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let mut result_min = Vec3::splat(f32::INFINITY);
        let mut result_max = Vec3::splat(f32::NEG_INFINITY);

        for corner in aabb.corners() {
            let rotated = *self * corner;
            result_min = result_min.min(rotated);
            result_max = result_max.max(rotated);
        }

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_near(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_rotation_degrees_quarter_turn() {
        let q = rotation_degrees(Vec3::Y, 90.0);
        assert_vec_near(q * Vec3::X, -Vec3::Z);
        assert_vec_near(q.inverse() * (q * Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Quat::IDENTITY.transform_aabb(&aabb);
        assert_vec_near(transformed.min(), aabb.min());
        assert_vec_near(transformed.max(), aabb.max());
    }

    #[test]
    fn test_transform_aabb_quarter_turn_about_y() {
        // x in [0, 2], z in [0, 1] rotates to x in [0, 1], z in [-2, 0].
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(2.0, 1.0, 1.0));
        let transformed = rotation_degrees(Vec3::Y, 90.0).transform_aabb(&aabb);
        assert_vec_near(transformed.min(), Vec3::new(0.0, 0.0, -2.0));
        assert_vec_near(transformed.max(), Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_transform_aabb_contains_rotated_corners() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 1.0, 4.0));
        let q = rotation_degrees(Vec3::new(1.0, 1.0, 0.0), 33.0);
        let transformed = q.transform_aabb(&aabb);
        for corner in aabb.corners() {
            let p = q * corner;
            for axis in 0..3 {
                assert!(transformed.axis_interval(axis).contains(p[axis]));
            }
        }
    }
}
