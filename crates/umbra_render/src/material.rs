//! Materials: how light scatters from and is emitted by surfaces.
//!
//! The set of materials is closed, so [`Material`] is an enum dispatched by
//! `match`; each variant wraps a small struct implementing [`Scatter`].

use std::f32::consts::PI;

use rand::RngCore;
use umbra_math::{Ray, Vec3};

use crate::hittable::HitRecord;
use crate::pdf::Pdf;
use crate::sampling::{gen_f32, random_in_unit_sphere};
use crate::texture::Texture;

/// Color type alias (linear RGB radiance or reflectance)
pub type Color = Vec3;

/// Result of a successful scatter event.
#[derive(Debug, Clone)]
pub struct ScatterRecord {
    /// Per-channel throughput applied to the light arriving along the
    /// scattered direction
    pub attenuation: Color,
    pub kind: ScatterKind,
}

/// How the outgoing direction is chosen.
#[derive(Debug, Clone)]
pub enum ScatterKind {
    /// A single deterministic outgoing ray; no density is involved.
    Specular(Ray),
    /// Directions are drawn from a distribution, which the integrator may
    /// mix with light sampling.
    Diffuse(Pdf<'static>),
}

/// Scattering and emission behavior at a surface point.
pub trait Scatter {
    /// Scatter `ray_in` at `rec`. `None` means the path ends here.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord>;

    /// Density of this material scattering `ray_in` into `scattered`.
    ///
    /// Only meaningful for [`ScatterKind::Diffuse`] materials.
    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        0.0
    }

    /// Radiance emitted toward `ray_in` at `rec`. Most materials are black.
    fn emitted(&self, _ray_in: &Ray, _rec: &HitRecord) -> Color {
        Color::ZERO
    }
}

/// Lambertian (ideal diffuse) reflector.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Texture,
}

impl Lambertian {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Texture::Solid(albedo))
    }

    pub fn textured(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Scatter for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            kind: ScatterKind::Diffuse(Pdf::cosine(rec.normal)),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        let cosine = rec.normal.dot(scattered.direction().normalize());
        if cosine > 0.0 {
            cosine / PI
        } else {
            0.0
        }
    }
}

/// Metal (specular) reflector with optional roughness.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Scatter for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let reflected = reflect(ray_in.direction().normalize(), rec.normal);
        let direction = reflected + self.fuzz * random_in_unit_sphere(rng);

        // Fuzz may push the reflection below the surface.
        if direction.dot(rec.normal) <= 0.0 {
            return None;
        }

        Some(ScatterRecord {
            attenuation: self.albedo,
            kind: ScatterKind::Specular(Ray::new(rec.p, direction, ray_in.time())),
        })
    }
}

/// Dielectric (glass, water) that reflects and refracts.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
}

impl Dielectric {
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    /// Schlick's approximation for reflectance.
    fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
        let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Scatter for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        let refraction_ratio = if rec.front_face { 1.0 / self.ior } else { self.ior };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Snell's law has no solution past the critical angle.
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction = if cannot_refract
            || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng)
        {
            reflect(unit_direction, rec.normal)
        } else {
            refract(unit_direction, rec.normal, refraction_ratio)
        };

        Some(ScatterRecord {
            attenuation: Color::ONE,
            kind: ScatterKind::Specular(Ray::new(rec.p, direction, ray_in.time())),
        })
    }
}

/// Area light emitter. One-sided: only the front face emits.
#[derive(Debug, Clone)]
pub struct DiffuseLight {
    emit: Texture,
}

impl DiffuseLight {
    pub fn new(emit: Color) -> Self {
        Self::textured(Texture::Solid(emit))
    }

    pub fn textured(emit: Texture) -> Self {
        Self { emit }
    }
}

impl Scatter for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        None
    }

    fn emitted(&self, _ray_in: &Ray, rec: &HitRecord) -> Color {
        if rec.front_face {
            self.emit.value(rec.u, rec.v, rec.p)
        } else {
            Color::ZERO
        }
    }
}

/// Phase function of a participating medium: scatters uniformly in all
/// directions.
#[derive(Debug, Clone)]
pub struct Isotropic {
    albedo: Texture,
}

impl Isotropic {
    pub fn new(albedo: Color) -> Self {
        Self::textured(Texture::Solid(albedo))
    }

    pub fn textured(albedo: Texture) -> Self {
        Self { albedo }
    }
}

impl Scatter for Isotropic {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        Some(ScatterRecord {
            attenuation: self.albedo.value(rec.u, rec.v, rec.p),
            kind: ScatterKind::Diffuse(Pdf::UniformSphere),
        })
    }

    fn scattering_pdf(&self, _ray_in: &Ray, _rec: &HitRecord, _scattered: &Ray) -> f32 {
        1.0 / (4.0 * PI)
    }
}

/// Any surface or volume material.
#[derive(Debug, Clone)]
pub enum Material {
    Lambertian(Lambertian),
    Metal(Metal),
    Dielectric(Dielectric),
    DiffuseLight(DiffuseLight),
    Isotropic(Isotropic),
}

/// Black, non-scattering material used by [`HitRecord::default`].
pub(crate) static ABSORBER: Material = Material::DiffuseLight(DiffuseLight {
    emit: Texture::Solid(Color::ZERO),
});

impl Scatter for Material {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterRecord> {
        match self {
            Material::Lambertian(m) => m.scatter(ray_in, rec, rng),
            Material::Metal(m) => m.scatter(ray_in, rec, rng),
            Material::Dielectric(m) => m.scatter(ray_in, rec, rng),
            Material::DiffuseLight(m) => m.scatter(ray_in, rec, rng),
            Material::Isotropic(m) => m.scatter(ray_in, rec, rng),
        }
    }

    fn scattering_pdf(&self, ray_in: &Ray, rec: &HitRecord, scattered: &Ray) -> f32 {
        match self {
            Material::Lambertian(m) => m.scattering_pdf(ray_in, rec, scattered),
            Material::Isotropic(m) => m.scattering_pdf(ray_in, rec, scattered),
            Material::Metal(_) | Material::Dielectric(_) | Material::DiffuseLight(_) => 0.0,
        }
    }

    fn emitted(&self, ray_in: &Ray, rec: &HitRecord) -> Color {
        match self {
            Material::DiffuseLight(m) => m.emitted(ray_in, rec),
            _ => Color::ZERO,
        }
    }
}

macro_rules! impl_from_material {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Material {
                fn from(material: $variant) -> Self {
                    Material::$variant(material)
                }
            }
        )*
    };
}

impl_from_material!(Lambertian, Metal, Dielectric, DiffuseLight, Isotropic);

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
pub(crate) fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a unit vector through a surface with relative index
/// `etai_over_etat`.
#[inline]
pub(crate) fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}
