//! Probability density functions over scatter directions.
//!
//! A `Pdf` both evaluates the density of a direction and draws directions
//! from that same density. `value` must match the density `generate` draws
//! from.

use std::f32::consts::PI;
use std::fmt;

use rand::RngCore;
use umbra_math::{Onb, Vec3};

use crate::hittable::Hittable;
use crate::sampling::{gen_f32, random_cosine_direction, random_unit_vector};

/// Distribution of scatter directions.
#[derive(Clone, Copy)]
pub enum Pdf<'a> {
    /// `cos(theta) / pi` about the basis `w` axis, zero below the horizon.
    Cosine(Onb),
    /// `1 / (4 pi)` over the whole sphere.
    UniformSphere,
    /// Directions from `origin` toward `object`, as the object samples them.
    Hittable {
        object: &'a dyn Hittable,
        origin: Vec3,
    },
    /// Equal-weight mixture of two distributions.
    Mixture(&'a Pdf<'a>, &'a Pdf<'a>),
}

impl<'a> Pdf<'a> {
    /// Cosine-weighted distribution about `normal`.
    pub fn cosine(normal: Vec3) -> Self {
        Pdf::Cosine(Onb::build_from_w(normal))
    }

    /// Distribution aimed at `object` as seen from `origin`.
    pub fn toward(object: &'a dyn Hittable, origin: Vec3) -> Self {
        Pdf::Hittable { object, origin }
    }

    pub fn mixture(a: &'a Pdf<'a>, b: &'a Pdf<'a>) -> Self {
        Pdf::Mixture(a, b)
    }

    /// Density of `direction` under this distribution.
    pub fn value(&self, direction: Vec3) -> f32 {
        match self {
            Pdf::Cosine(uvw) => {
                let cosine = direction.normalize().dot(uvw.w());
                if cosine <= 0.0 {
                    0.0
                } else {
                    cosine / PI
                }
            }
            Pdf::UniformSphere => 1.0 / (4.0 * PI),
            Pdf::Hittable { object, origin } => object.pdf_value(*origin, direction),
            Pdf::Mixture(a, b) => 0.5 * a.value(direction) + 0.5 * b.value(direction),
        }
    }

    /// Draw a direction from this distribution.
    pub fn generate(&self, rng: &mut dyn RngCore) -> Vec3 {
        match self {
            Pdf::Cosine(uvw) => uvw.local(random_cosine_direction(rng)),
            Pdf::UniformSphere => random_unit_vector(rng),
            Pdf::Hittable { object, origin } => object.random(*origin, rng),
            Pdf::Mixture(a, b) => {
                if gen_f32(rng) < 0.5 {
                    a.generate(rng)
                } else {
                    b.generate(rng)
                }
            }
        }
    }
}

impl fmt::Debug for Pdf<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pdf::Cosine(uvw) => f.debug_tuple("Cosine").field(&uvw.w()).finish(),
            Pdf::UniformSphere => f.write_str("UniformSphere"),
            Pdf::Hittable { origin, .. } => {
                f.debug_struct("Hittable").field("origin", origin).finish_non_exhaustive()
            }
            Pdf::Mixture(a, b) => f.debug_tuple("Mixture").field(a).field(b).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DiffuseLight, Sphere};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn light_sphere() -> Sphere {
        Sphere::new(
            Vec3::new(0.0, 5.0, 0.0),
            1.0,
            Arc::new(DiffuseLight::new(Color::ONE).into()),
        )
    }

    #[test]
    fn test_cosine_value_matches_analytic() {
        let pdf = Pdf::cosine(Vec3::Y);
        assert!((pdf.value(Vec3::Y) - 1.0 / PI).abs() < 1e-6);
        let tilted = Vec3::new(1.0, 1.0, 0.0);
        assert!((pdf.value(tilted) - (0.5f32).sqrt() / PI).abs() < 1e-6);
        assert_eq!(pdf.value(-Vec3::Y), 0.0);
        assert_eq!(pdf.value(Vec3::X), 0.0);
    }

    #[test]
    fn test_cosine_sampling_statistics() {
        let pdf = Pdf::cosine(Vec3::Y);
        let mut rng = StdRng::seed_from_u64(21);
        let n = 50_000;

        let mut mean_cos = 0.0f64;
        let mut mean_density = 0.0f64;
        for _ in 0..n {
            let d = pdf.generate(&mut rng);
            let cos = d.normalize().y;
            assert!(cos >= -1e-6);
            assert!((pdf.value(d) - cos.max(0.0) / PI).abs() < 1e-5);
            mean_cos += cos as f64;
            mean_density += pdf.value(d) as f64;
        }
        mean_cos /= n as f64;
        mean_density /= n as f64;

        // Under p = cos/pi: E[cos] = 2/3 and E[p] = 2 / (3 pi).
        assert!((mean_cos - 2.0 / 3.0).abs() < 0.01, "E[cos] = {mean_cos}");
        let expected = 2.0 / (3.0 * std::f64::consts::PI);
        assert!((mean_density - expected).abs() < 0.005, "E[p] = {mean_density}");
    }

    #[test]
    fn test_mixture_value_is_exact_average() {
        let light = light_sphere();
        let cosine = Pdf::cosine(Vec3::Y);
        let toward = Pdf::toward(&light, Vec3::ZERO);
        let mixture = Pdf::mixture(&toward, &cosine);

        for direction in [
            Vec3::Y,
            Vec3::new(0.1, 1.0, 0.05),
            Vec3::new(1.0, 0.2, 0.0),
            -Vec3::Y,
        ] {
            let expected = 0.5 * toward.value(direction) + 0.5 * cosine.value(direction);
            assert_eq!(mixture.value(direction), expected);
        }
    }

    #[test]
    fn test_mixture_samples_both_components() {
        let light = light_sphere();
        let cosine = Pdf::cosine(-Vec3::Y);
        let toward = Pdf::toward(&light, Vec3::ZERO);
        let mixture = Pdf::mixture(&toward, &cosine);
        let mut rng = StdRng::seed_from_u64(22);

        let (mut up, mut down) = (0, 0);
        for _ in 0..2000 {
            let d = mixture.generate(&mut rng);
            assert!(mixture.value(d) > 0.0);
            if d.y > 0.0 {
                up += 1;
            } else {
                down += 1;
            }
        }
        assert!((800..1200).contains(&up), "up = {up}, down = {down}");
    }

    #[test]
    fn test_uniform_sphere() {
        let pdf = Pdf::UniformSphere;
        let mut rng = StdRng::seed_from_u64(23);
        let d = pdf.generate(&mut rng);
        assert!((d.length() - 1.0).abs() < 1e-4);
        assert!((pdf.value(d) - 1.0 / (4.0 * PI)).abs() < 1e-7);
    }
}
