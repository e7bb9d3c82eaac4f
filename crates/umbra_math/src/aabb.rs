use crate::{Interval, Ray, Vec3};

/// Minimum extent of any bounding box axis.
///
/// Flat primitives (rectangles, axis-aligned triangles) would otherwise
/// produce zero-width slabs.
pub const MIN_EXTENT: f32 = 0.0001;

/// Axis-Aligned Bounding Box used by the BVH to reject rays early.
///
/// Stored as one [`Interval`] per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Box containing nothing. Identity element of [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Create a box from three intervals, widening any flat axis.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create a box from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Smallest box containing both `box0` and `box1`.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Interval for axis `n` (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// The eight corners, in `(x, y, z)` bit order of min/max selection.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// True if `other` lies entirely inside this box.
    pub fn contains_box(&self, other: &Aabb) -> bool {
        (0..3).all(|axis| {
            let outer = self.axis_interval(axis);
            let inner = other.axis_interval(axis);
            outer.min <= inner.min && inner.max <= outer.max
        })
    }

    /// Slab test: does `r` pass through the box for some `t` in `ray_t`?
    ///
    /// A zero direction component gives an infinite reciprocal. When the
    /// origin is outside that slab both slab distances share a sign and the
    /// interval collapses; when it is inside they span `(-inf, inf)`. The
    /// `0 * inf = NaN` produced by an origin exactly on a slab plane is
    /// discarded by `f32::max`/`f32::min`.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];

            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Move the box by `offset`.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.shift(offset.x),
            self.y.shift(offset.y),
            self.z.shift(offset.z),
        )
    }

    fn pad_to_minimums(&mut self) {
        for slab in [&mut self.x, &mut self.y, &mut self.z] {
            if slab.size() < MIN_EXTENT {
                *slab = slab.expand(MIN_EXTENT);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box() -> Aabb {
        Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn test_from_points_any_order() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 3.0), Vec3::new(0.0, 10.0, -3.0));
        assert_eq!(aabb.min(), Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(aabb.max(), Vec3::new(10.0, 10.0, 3.0));
    }

    #[test]
    fn test_flat_axis_is_padded() {
        let flat = Aabb::from_points(Vec3::new(0.0, 2.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        assert!(flat.y.size() >= MIN_EXTENT);
        assert!(flat.y.contains(2.0));
        assert_eq!(flat.x.size(), 1.0);
    }

    #[test]
    fn test_surrounding_is_smallest_containing_box() {
        let a = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 1.0, 2.0));
        let b = Aabb::from_points(Vec3::new(3.0, -2.0, 1.0), Vec3::new(10.0, 0.5, 1.5));
        let joined = Aabb::surrounding(&a, &b);

        assert!(joined.contains_box(&a));
        assert!(joined.contains_box(&b));
        // Every face of the union touches one of the inputs.
        for axis in 0..3 {
            let j = joined.axis_interval(axis);
            let (ia, ib) = (a.axis_interval(axis), b.axis_interval(axis));
            assert_eq!(j.min, ia.min.min(ib.min));
            assert_eq!(j.max, ia.max.max(ib.max));
        }
    }

    #[test]
    fn test_hit_and_miss() {
        let aabb = unit_box();

        let toward = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z, 0.0);
        assert!(aabb.hit(&toward, Interval::new(0.0, 100.0)));

        let away = Ray::new(Vec3::new(0.0, 0.0, -5.0), -Vec3::Z, 0.0);
        assert!(!aabb.hit(&away, Interval::new(0.0, 100.0)));

        let beside = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::Z, 0.0);
        assert!(!aabb.hit(&beside, Interval::new(0.0, 100.0)));

        // Box is behind the allowed range.
        assert!(!aabb.hit(&toward, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_axis_parallel_rays_do_not_panic() {
        let aabb = unit_box();
        // Zero x and y components, origin inside those slabs.
        let inside = Ray::new(Vec3::new(0.5, -0.5, -5.0), Vec3::new(0.0, 0.0, 2.0), 0.0);
        assert!(aabb.hit(&inside, Interval::new(0.0, f32::INFINITY)));

        // Zero x component, origin outside the x slab.
        let outside = Ray::new(Vec3::new(3.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(!aabb.hit(&outside, Interval::new(0.0, f32::INFINITY)));

        // Origin exactly on a slab plane.
        let on_plane = Ray::new(Vec3::new(1.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0), 0.0);
        assert!(aabb.hit(&on_plane, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_translate() {
        let moved = Aabb::from_points(Vec3::ZERO, Vec3::ONE).translate(Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(moved.min(), Vec3::new(5.0, 0.0, -1.0));
        assert_eq!(moved.max(), Vec3::new(6.0, 1.0, 0.0));
    }

    #[test]
    fn test_corners_cover_box() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        let corners = aabb.corners();
        assert_eq!(corners[0], aabb.min());
        assert_eq!(corners[7], aabb.max());
        let rebuilt = corners
            .iter()
            .fold(Aabb::EMPTY, |acc, &c| Aabb::surrounding(&acc, &Aabb::from_points(c, c)));
        assert!(rebuilt.contains_box(&aabb));
    }
}
