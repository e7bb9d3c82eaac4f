//! Constant-density participating media (smoke, fog).

use std::sync::Arc;

use rand::RngCore;
use thiserror::Error;
use umbra_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::{Color, Isotropic, Material};
use crate::sampling::gen_f32;
use crate::texture::Texture;

/// Errors raised when building scene geometry.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Medium density must be positive and finite, got {0}")]
    InvalidDensity(f32),
}

pub type GeometryResult<T> = Result<T, GeometryError>;

/// A volume of uniform density filling a closed boundary.
///
/// Rays passing through scatter at an exponentially distributed distance;
/// a scatter hands the path to an isotropic phase function.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    phase_function: Material,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, albedo: Color) -> GeometryResult<Self> {
        Self::textured(boundary, density, Texture::solid(albedo))
    }

    pub fn textured(
        boundary: Arc<dyn Hittable>,
        density: f32,
        albedo: Texture,
    ) -> GeometryResult<Self> {
        if !density.is_finite() || density <= 0.0 {
            return Err(GeometryError::InvalidDensity(density));
        }

        Ok(Self {
            boundary,
            neg_inv_density: -1.0 / density,
            phase_function: Isotropic::textured(albedo).into(),
        })
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        // Entry and exit along the whole line, then clipped to ray_t.
        let mut entry = HitRecord::default();
        if !self.boundary.hit(ray, Interval::UNIVERSE, &mut entry, rng) {
            return false;
        }

        let mut exit = HitRecord::default();
        let beyond_entry = Interval::new(entry.t + 0.0001, f32::INFINITY);
        if !self.boundary.hit(ray, beyond_entry, &mut exit, rng) {
            return false;
        }

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return false;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside {
            return false;
        }

        rec.t = t_enter + hit_distance / ray_length;
        rec.p = ray.at(rec.t);
        // Normal and face are arbitrary inside a volume.
        rec.normal = Vec3::X;
        rec.front_face = true;
        rec.u = 0.0;
        rec.v = 0.0;
        rec.material = &self.phase_function;
        true
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        self.boundary.bounding_box(time0, time1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Scatter;
    use crate::{Cuboid, Lambertian, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere() -> Arc<dyn Hittable> {
        Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Lambertian::new(Color::ONE).into()),
        ))
    }

    fn forward() -> Interval {
        Interval::new(0.001, f32::INFINITY)
    }

    #[test]
    fn test_rejects_bad_density() {
        for density in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let result = ConstantMedium::new(unit_sphere(), density, Color::ONE);
            assert!(matches!(result, Err(GeometryError::InvalidDensity(_))));
        }
        assert!(ConstantMedium::new(unit_sphere(), 0.01, Color::ONE).is_ok());
    }

    #[test]
    fn test_transmission_matches_beer_lambert() {
        let density = 0.5;
        let medium = ConstantMedium::new(unit_sphere(), density, Color::ONE).expect("valid");
        let mut rng = StdRng::seed_from_u64(31);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);

        let n = 10_000;
        let mut scattered = 0;
        for _ in 0..n {
            let mut rec = HitRecord::default();
            if medium.hit(&ray, forward(), &mut rec, &mut rng) {
                scattered += 1;
                assert!(rec.t >= 4.0 && rec.t <= 6.0, "t = {}", rec.t);
            }
        }

        // Path length 2 through the sphere.
        let expected = 1.0 - (-2.0f64 * density as f64).exp();
        let observed = scattered as f64 / n as f64;
        assert!((observed - expected).abs() < 0.03, "observed {observed}");
    }

    #[test]
    fn test_dense_medium_scatters_near_entry() {
        let medium = ConstantMedium::new(unit_sphere(), 1000.0, Color::splat(0.8)).expect("valid");
        let mut rng = StdRng::seed_from_u64(32);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z, 0.0);

        let mut rec = HitRecord::default();
        assert!(medium.hit(&ray, forward(), &mut rec, &mut rng));
        assert!((rec.t - 4.0).abs() < 0.05);
        assert_eq!(rec.normal, Vec3::X);
        assert!(rec.front_face);
        assert!(matches!(rec.material, Material::Isotropic(_)));

        let scatter = rec.material.scatter(&ray, &rec, &mut rng);
        assert!(scatter.is_some());
    }

    #[test]
    fn test_ray_starting_inside_clamps_entry() {
        let medium = ConstantMedium::new(unit_sphere(), 1000.0, Color::ONE).expect("valid");
        let mut rng = StdRng::seed_from_u64(33);
        let ray = Ray::new(Vec3::ZERO, Vec3::X, 0.0);

        let mut rec = HitRecord::default();
        assert!(medium.hit(&ray, forward(), &mut rec, &mut rng));
        assert!(rec.t >= 0.001 && rec.t < 0.1, "t = {}", rec.t);
    }

    #[test]
    fn test_missing_boundary_misses() {
        let fog: Arc<dyn Hittable> = Arc::new(Cuboid::new(
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
            Arc::new(Lambertian::new(Color::ONE).into()),
        ));
        let medium = ConstantMedium::new(fog, 1000.0, Color::ONE).expect("valid");
        let mut rng = StdRng::seed_from_u64(34);

        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::X, 0.0);
        assert!(!medium.hit(&ray, forward(), &mut rec, &mut rng));

        // Behind the camera.
        let away = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z, 0.0);
        assert!(!medium.hit(&away, forward(), &mut rec, &mut rng));

        let bbox = medium.bounding_box(0.0, 1.0).expect("bounded");
        assert_eq!(bbox.max(), Vec3::splat(1.0));
    }
}
