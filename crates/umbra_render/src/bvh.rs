//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over shared scene objects. Each node caches the box of
//! everything below it, so a ray that misses the box skips the subtree.

use std::cmp::Ordering;
use std::sync::Arc;

use rand::{Rng, RngCore};
use thiserror::Error;
use umbra_math::{Aabb, Interval, Ray};

use crate::hittable::{HitRecord, Hittable};

/// Errors that can occur while building a BVH.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BvhError {
    #[error("Cannot build a BVH from an empty object list")]
    Empty,

    #[error("Object {index} has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize },
}

pub type BvhResult<T> = Result<T, BvhError>;

/// BVH node.
///
/// Using an enum keeps the small cases (one or two objects) from paying for
/// an extra level of boxed children.
pub enum BvhNode {
    /// A single object, tested once.
    Leaf { object: Arc<dyn Hittable>, bbox: Aabb },
    /// Two objects, ordered by box minimum on the split axis.
    Pair {
        left: Arc<dyn Hittable>,
        right: Arc<dyn Hittable>,
        bbox: Aabb,
    },
    /// Internal node with two subtrees.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
}

type Entry = (Arc<dyn Hittable>, Aabb);

impl BvhNode {
    /// Build a BVH over `objects` for rays within the shutter `[time0, time1]`.
    ///
    /// Every object must have a bounding box over that interval.
    pub fn new(
        objects: Vec<Arc<dyn Hittable>>,
        time0: f32,
        time1: f32,
        rng: &mut dyn RngCore,
    ) -> BvhResult<Self> {
        if objects.is_empty() {
            return Err(BvhError::Empty);
        }

        let mut entries = objects
            .into_iter()
            .enumerate()
            .map(|(index, object)| match object.bounding_box(time0, time1) {
                Some(bbox) => Ok((object, bbox)),
                None => Err(BvhError::MissingBoundingBox { index }),
            })
            .collect::<BvhResult<Vec<Entry>>>()?;

        let node = Self::build(&mut entries, rng);

        log::info!(
            "Built BVH: {} objects, {} nodes, depth {}",
            entries.len(),
            node.node_count(),
            node.depth()
        );

        Ok(node)
    }

    /// Recursive construction on a random axis, split at the median.
    fn build(entries: &mut [Entry], rng: &mut dyn RngCore) -> Self {
        let axis = rng.gen_range(0..3);
        let compare = |a: &Entry, b: &Entry| box_compare(&a.1, &b.1, axis);

        match entries.len() {
            1 => BvhNode::Leaf {
                object: entries[0].0.clone(),
                bbox: entries[0].1,
            },
            2 => {
                let (first, second) = if compare(&entries[0], &entries[1]) == Ordering::Greater {
                    (&entries[1], &entries[0])
                } else {
                    (&entries[0], &entries[1])
                };
                BvhNode::Pair {
                    left: first.0.clone(),
                    right: second.0.clone(),
                    bbox: Aabb::surrounding(&first.1, &second.1),
                }
            }
            _ => {
                entries.sort_by(compare);

                let mid = entries.len() / 2;
                let (left_entries, right_entries) = entries.split_at_mut(mid);
                let left = Self::build(left_entries, rng);
                let right = Self::build(right_entries, rng);
                let bbox = Aabb::surrounding(&left.bbox(), &right.bbox());

                BvhNode::Branch {
                    left: Box::new(left),
                    right: Box::new(right),
                    bbox,
                }
            }
        }
    }

    #[inline]
    fn bbox(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bbox, .. }
            | BvhNode::Pair { bbox, .. }
            | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } | BvhNode::Pair { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.node_count() + right.node_count(),
        }
    }

    /// Length of the longest root-to-leaf path, counting nodes.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Leaf { .. } | BvhNode::Pair { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}

fn box_compare(a: &Aabb, b: &Aabb, axis: usize) -> Ordering {
    a.axis_interval(axis)
        .min
        .total_cmp(&b.axis_interval(axis).min)
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rec: &mut HitRecord<'a>,
        rng: &mut dyn RngCore,
    ) -> bool {
        if !self.bbox().hit(ray, ray_t) {
            return false;
        }

        match self {
            BvhNode::Leaf { object, .. } => object.hit(ray, ray_t, rec, rng),
            BvhNode::Pair { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t, rec, rng);
                // Only check right up to closest hit
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, ray_t.with_max(right_max), rec, rng);
                hit_left || hit_right
            }
            BvhNode::Branch { left, right, .. } => {
                let hit_left = left.hit(ray, ray_t, rec, rng);
                let right_max = if hit_left { rec.t } else { ray_t.max };
                let hit_right = right.hit(ray, ray_t.with_max(right_max), rec, rng);
                hit_left || hit_right
            }
        }
    }

    fn bounding_box(&self, _time0: f32, _time1: f32) -> Option<Aabb> {
        Some(self.bbox())
    }
}
