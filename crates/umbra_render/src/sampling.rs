//! Random sampling helpers.
//!
//! Every stochastic decision in the renderer draws from an explicit
//! `&mut dyn RngCore`, so a render is reproducible from its seed and worker
//! threads never share a generator.

use std::f32::consts::PI;

use rand::{Rng, RngCore};
use umbra_math::Vec3;

/// Uniform sample in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform sample in `[min, max)`.
#[inline]
pub fn gen_range_f32(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Uniformly distributed direction on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let a = gen_range_f32(rng, 0.0, 2.0 * PI);
    let z = gen_range_f32(rng, -1.0, 1.0);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Uniform point strictly inside the unit sphere (rejection sampled).
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_range_f32(rng, -1.0, 1.0),
            gen_range_f32(rng, -1.0, 1.0),
            gen_range_f32(rng, -1.0, 1.0),
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point inside the unit disk in the XY plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range_f32(rng, -1.0, 1.0), gen_range_f32(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted direction about `+Z` (Malley's method).
///
/// A uniform disk sample is lifted onto the hemisphere, giving density
/// `cos(theta) / pi`.
pub fn random_cosine_direction(rng: &mut dyn RngCore) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let phi = 2.0 * PI * r1;
    let radius = r2.sqrt();
    let z = (1.0 - r2).sqrt();

    Vec3::new(phi.cos() * radius, phi.sin() * radius, z)
}

/// Uniform direction inside the cone about `+Z` with half-angle
/// `acos(cos_theta_max)`.
///
/// `cos_theta_max = -1` covers the whole sphere.
pub fn random_in_cone(rng: &mut dyn RngCore, cos_theta_max: f32) -> Vec3 {
    let r1 = gen_f32(rng);
    let r2 = gen_f32(rng);

    let z = 1.0 + r2 * (cos_theta_max - 1.0);
    let phi = 2.0 * PI * r1;
    let sin_theta = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, z)
}

/// Solid angle of the cone with the given `cos_theta_max`.
#[inline]
pub fn cone_solid_angle(cos_theta_max: f32) -> f32 {
    2.0 * PI * (1.0 - cos_theta_max)
}
