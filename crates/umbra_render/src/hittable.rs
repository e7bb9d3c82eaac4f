//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use rand::{Rng, RngCore};
use umbra_math::{Aabb, Interval, Ray, Vec3};

use crate::material::{Material, ABSORBER};

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal, always facing against the incoming ray
    pub normal: Vec3,
    /// Material at the intersection point, borrowed from the scene
    pub material: &'a Material,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Surface (texture) coordinates
    pub u: f32,
    pub v: f32,
    /// Whether the ray hit the outward-facing side of the surface
    pub front_face: bool,
}

impl Default for HitRecord<'_> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            material: &ABSORBER,
            t: 0.0,
            u: 0.0,
            v: 0.0,
            front_face: false,
        }
    }
}

impl HitRecord<'_> {
    /// Orient the normal against `ray` and remember which side was hit.
    ///
    /// `outward_normal` must point out of the surface and be unit length.
    /// A ray perpendicular to the normal counts as hitting the back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Anything a ray can hit: primitives, instance wrappers, media and
/// aggregates all speak this protocol, so they nest freely.
///
/// Implementations only write to `rec` when they return `true`; aggregates
/// rely on this to keep the closest hit while testing further candidates.
pub trait Hittable: Send + Sync {
    /// Test `ray` against the object for a parameter inside `ray_t`.
    ///
    /// `rng` serves objects with stochastic boundaries (participating media).
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool;

    /// Box enclosing the object over the shutter interval `[time0, time1]`,
    /// or `None` for unbounded objects.
    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb>;

    /// Solid-angle density of sampling `direction` from `origin` with
    /// [`Hittable::random`]. Zero for objects that are not light sources.
    fn pdf_value(&self, _origin: Vec3, _direction: Vec3) -> f32 {
        0.0
    }

    /// Random direction from `origin` toward the object.
    fn random(&self, _origin: Vec3, _rng: &mut dyn RngCore) -> Vec3 {
        Vec3::X
    }
}

/// A flat list of hittable objects, intersected by linear scan.
#[derive(Clone, Default)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
}

impl HittableList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object owned by this list.
    pub fn add<H: Hittable + 'static>(&mut self, object: H) {
        self.objects.push(Arc::new(object));
    }

    /// Add an object that may also be referenced elsewhere in the scene.
    pub fn add_shared(&mut self, object: Arc<dyn Hittable>) {
        self.objects.push(object);
    }

    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    pub fn into_objects(self) -> Vec<Arc<dyn Hittable>> {
        self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl From<Vec<Arc<dyn Hittable>>> for HittableList {
    fn from(objects: Vec<Arc<dyn Hittable>>) -> Self {
        Self { objects }
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if object.hit(ray, ray_t.with_max(closest_so_far), rec, rng) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self, time0: f32, time1: f32) -> Option<Aabb> {
        if self.objects.is_empty() {
            return None;
        }

        self.objects.iter().try_fold(Aabb::EMPTY, |acc, object| {
            object
                .bounding_box(time0, time1)
                .map(|bbox| Aabb::surrounding(&acc, &bbox))
        })
    }

    /// Members are sampled with equal probability.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        if self.objects.is_empty() {
            return 0.0;
        }

        let weight = 1.0 / self.objects.len() as f32;
        self.objects
            .iter()
            .map(|object| weight * object.pdf_value(origin, direction))
            .sum()
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        if self.objects.is_empty() {
            return Vec3::X;
        }

        let index = rng.gen_range(0..self.objects.len());
        self.objects[index].random(origin, rng)
    }
}
