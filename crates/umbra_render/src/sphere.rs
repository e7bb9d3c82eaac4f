//! Sphere primitives for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use rand::RngCore;
use umbra_math::{Aabb, Interval, Onb, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use crate::sampling::{cone_solid_angle, random_in_cone, random_unit_vector};

/// A static sphere.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Cosine of the half-angle of the cone the sphere subtends from
    /// `origin`, or -1 (the whole sphere) when `origin` is inside it.
    fn cos_theta_max(&self, origin: Vec3) -> f32 {
        let distance_squared = (self.center - origin).length_squared();
        let radius_squared = self.radius * self.radius;
        if distance_squared <= radius_squared {
            -1.0
        } else {
            (1.0 - radius_squared / distance_squared).sqrt()
        }
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        match nearest_root(self.center, self.radius, ray, ray_t) {
            Some(root) => {
                fill_record(rec, ray, root, self.center, self.radius, &self.material);
                true
            }
            None => false,
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }

    /// Uniform over the cone of directions that reach the sphere.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let probe = Ray::new(origin, direction, 0.0);
        if nearest_root(self.center, self.radius, &probe, Interval::new(0.001, f32::INFINITY))
            .is_none()
        {
            return 0.0;
        }

        1.0 / cone_solid_angle(self.cos_theta_max(origin))
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let direction = self.center - origin;
        if direction.length_squared() <= self.radius * self.radius {
            return random_unit_vector(rng);
        }

        let uvw = Onb::build_from_w(direction);
        uvw.local(random_in_cone(rng, self.cos_theta_max(origin)))
    }
}

/// A sphere whose center moves linearly during the shutter interval.
pub struct MovingSphere {
    center0: Vec3,
    center1: Vec3,
    time0: f32,
    time1: f32,
    radius: f32,
    material: Arc<Material>,
}

impl MovingSphere {
    /// Sphere at `center0` at `time0`, moving to `center1` at `time1`.
    pub fn new(
        center0: Vec3,
        center1: Vec3,
        time0: f32,
        time1: f32,
        radius: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            center0,
            center1,
            time0,
            time1,
            radius,
            material,
        }
    }

    /// Center at `time`, extrapolated linearly outside the keyframes.
    pub fn center(&self, time: f32) -> Vec3 {
        let span = self.time1 - self.time0;
        if span.abs() <= f32::EPSILON {
            return self.center0;
        }
        self.center0 + ((time - self.time0) / span) * (self.center1 - self.center0)
    }
}

impl Hittable for MovingSphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let center = self.center(ray.time());
        match nearest_root(center, self.radius, ray, ray_t) {
            Some(root) => {
                fill_record(rec, ray, root, center, self.radius, &self.material);
                true
            }
            None => false,
        }
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        let rvec = Vec3::splat(self.radius);
        let (c0, c1) = (self.center(time0), self.center(time1));
        let box0 = Aabb::from_points(c0 - rvec, c0 + rvec);
        let box1 = Aabb::from_points(c1 - rvec, c1 + rvec);
        Some(Aabb::surrounding(&box0, &box1))
    }
}

/// Smallest root of `|origin + t d - center|^2 = r^2` strictly inside
/// `ray_t`, falling back to the larger root.
fn nearest_root(center: Vec3, radius: f32, ray: &Ray, ray_t: Interval) -> Option<f32> {
    let oc = center - ray.origin();
    let a = ray.direction().length_squared();
    let h = ray.direction().dot(oc);
    let c = oc.length_squared() - radius * radius;

    let discriminant = h * h - a * c;
    if discriminant < 0.0 || a == 0.0 {
        return None;
    }

    let sqrtd = discriminant.sqrt();

    let root = (h - sqrtd) / a;
    if ray_t.surrounds(root) {
        return Some(root);
    }
    let root = (h + sqrtd) / a;
    ray_t.surrounds(root).then_some(root)
}

fn fill_record<'a>(
    rec: &mut HitRecord<'a>,
    ray: &Ray,
    root: f32,
    center: Vec3,
    radius: f32,
    material: &'a Material,
) {
    rec.t = root;
    rec.p = ray.at(root);
    let outward_normal = (rec.p - center) / radius;
    rec.set_face_normal(ray, outward_normal);
    (rec.u, rec.v) = sphere_uv(outward_normal);
    rec.material = material;
}

/// UV coordinates for a point on the unit sphere.
///
/// `u` is the angle around the Y axis from X=-1, `v` the angle from Y=-1 to
/// Y=+1, both normalized to [0, 1].
fn sphere_uv(p: Vec3) -> (f32, f32) {
    let theta = (-p.y).clamp(-1.0, 1.0).acos();
    let phi = (-p.z).atan2(p.x) + PI;
    (phi / (2.0 * PI), theta / PI)
}
