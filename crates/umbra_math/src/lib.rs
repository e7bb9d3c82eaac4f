//! Umbra math - vector algebra and geometric helpers shared by the renderer.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod onb;
mod ray;
mod transform;

pub use aabb::{Aabb, MIN_EXTENT};
pub use interval::Interval;
pub use onb::Onb;
pub use ray::Ray;
pub use transform::{rotation_degrees, QuatExt};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        // Colors multiply componentwise.
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
    }
}
