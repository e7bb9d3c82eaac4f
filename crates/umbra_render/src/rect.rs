//! Axis-aligned rectangles and boxes built from them.

use std::sync::Arc;

use rand::RngCore;
use umbra_math::{Aabb, Interval, Ray, Vec3};

use crate::hittable::{HitRecord, Hittable, HittableList};
use crate::material::Material;
use crate::sampling::gen_range_f32;

/// Half-thickness given to a rectangle's box along its fixed axis.
const PLANE_PADDING: f32 = 0.0001;

/// Which coordinate plane a rectangle lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// `(a, b, k)` axis indices: the two in-plane axes and the fixed one.
    #[inline]
    fn axes(self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }

    /// Unit normal along the fixed axis, pointing toward `+axis`.
    #[inline]
    fn normal(self) -> Vec3 {
        match self {
            Plane::XY => Vec3::Z,
            Plane::XZ => Vec3::Y,
            Plane::YZ => Vec3::X,
        }
    }
}

/// A rectangle `[a0, a1] x [b0, b1]` lying in `plane` at offset `k`.
pub struct AaRect {
    plane: Plane,
    a: Interval,
    b: Interval,
    k: f32,
    material: Arc<Material>,
}

impl AaRect {
    pub fn new(
        plane: Plane,
        (a0, a1): (f32, f32),
        (b0, b1): (f32, f32),
        k: f32,
        material: Arc<Material>,
    ) -> Self {
        Self {
            plane,
            a: Interval::new(a0.min(a1), a0.max(a1)),
            b: Interval::new(b0.min(b1), b0.max(b1)),
            k,
            material,
        }
    }

    /// Rectangle in the plane `z = k`.
    pub fn xy(x0: f32, x1: f32, y0: f32, y1: f32, k: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::XY, (x0, x1), (y0, y1), k, material)
    }

    /// Rectangle in the plane `y = k`.
    pub fn xz(x0: f32, x1: f32, z0: f32, z1: f32, k: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::XZ, (x0, x1), (z0, z1), k, material)
    }

    /// Rectangle in the plane `x = k`.
    pub fn yz(y0: f32, y1: f32, z0: f32, z1: f32, k: f32, material: Arc<Material>) -> Self {
        Self::new(Plane::YZ, (y0, y1), (z0, z1), k, material)
    }

    pub fn plane(&self) -> Plane {
        self.plane
    }

    pub fn area(&self) -> f32 {
        self.a.size() * self.b.size()
    }

    /// Ray parameter and in-plane coordinates of the crossing, if it lies
    /// on the rectangle with `t` inside `ray_t` (bounds included).
    fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32, f32)> {
        let (ia, ib, ik) = self.plane.axes();
        let origin = ray.origin();
        let direction = ray.direction();

        let t = (self.k - origin[ik]) / direction[ik];
        if !t.is_finite() || !ray_t.contains(t) {
            return None;
        }

        let a = origin[ia] + t * direction[ia];
        let b = origin[ib] + t * direction[ib];
        if !self.a.contains(a) || !self.b.contains(b) {
            return None;
        }

        Some((t, a, b))
    }
}

impl Hittable for AaRect {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        _rng: &mut dyn RngCore,
    ) -> bool {
        let Some((t, a, b)) = self.intersect(ray, ray_t) else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        rec.u = (a - self.a.min) / self.a.size();
        rec.v = (b - self.b.min) / self.b.size();
        rec.set_face_normal(ray, self.plane.normal());
        rec.material = self.material.as_ref();
        true
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        let (ia, ib, ik) = self.plane.axes();
        let mut min = Vec3::ZERO;
        let mut max = Vec3::ZERO;
        min[ia] = self.a.min;
        max[ia] = self.a.max;
        min[ib] = self.b.min;
        max[ib] = self.b.max;
        min[ik] = self.k - PLANE_PADDING;
        max[ik] = self.k + PLANE_PADDING;
        Some(Aabb::from_points(min, max))
    }

    /// Area sampling converted to solid angle: `distance^2 / (|cos| * area)`.
    fn pdf_value(&self, origin: Vec3, direction: Vec3) -> f32 {
        let probe = Ray::new(origin, direction, 0.0);
        let Some((t, _, _)) = self.intersect(&probe, Interval::new(0.001, f32::INFINITY)) else {
            return 0.0;
        };

        let area = self.area();
        let length_squared = direction.length_squared();
        let cosine = direction.dot(self.plane.normal()).abs() / length_squared.sqrt();
        if area <= 0.0 || cosine <= 0.0 {
            return 0.0;
        }

        let distance_squared = t * t * length_squared;
        distance_squared / (cosine * area)
    }

    fn random(&self, origin: Vec3, rng: &mut dyn RngCore) -> Vec3 {
        let (ia, ib, ik) = self.plane.axes();
        let mut point = Vec3::ZERO;
        point[ia] = gen_range_f32(rng, self.a.min, self.a.max);
        point[ib] = gen_range_f32(rng, self.b.min, self.b.max);
        point[ik] = self.k;
        point - origin
    }
}

/// An axis-aligned box made of six rectangles sharing one material.
pub struct Cuboid {
    bbox: Aabb,
    sides: HittableList,
}

impl Cuboid {
    /// Box spanning corners `p0` and `p1` (any order).
    pub fn new(p0: Vec3, p1: Vec3, material: Arc<Material>) -> Self {
        let min = p0.min(p1);
        let max = p0.max(p1);

        let mut sides = HittableList::new();
        sides.add(AaRect::xy(min.x, max.x, min.y, max.y, max.z, material.clone()));
        sides.add(AaRect::xy(min.x, max.x, min.y, max.y, min.z, material.clone()));
        sides.add(AaRect::xz(min.x, max.x, min.z, max.z, max.y, material.clone()));
        sides.add(AaRect::xz(min.x, max.x, min.z, max.z, min.y, material.clone()));
        sides.add(AaRect::yz(min.y, max.y, min.z, max.z, max.x, material.clone()));
        sides.add(AaRect::yz(min.y, max.y, min.z, max.z, min.x, material));

        Self {
            bbox: Aabb::from_points(min, max),
            sides,
        }
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        self.sides.hit(ray, ray_t, rec, rng)
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox)
    }
}
