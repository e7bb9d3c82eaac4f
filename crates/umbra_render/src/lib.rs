//! Umbra - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering: spheres,
//! rectangles and boxes, instancing, participating media, a BVH, and light
//! importance sampling through mixture PDFs.

mod bvh;
mod camera;
mod hittable;
mod instance;
mod material;
mod medium;
mod pdf;
mod rect;
mod renderer;
mod sampling;
mod scene;
mod sphere;
mod texture;

pub use bvh::{BvhError, BvhNode, BvhResult};
pub use camera::Camera;
pub use hittable::{HitRecord, Hittable, HittableList};
pub use instance::{FlipFace, Rotate, Translate};
pub use material::{
    Color, Dielectric, DiffuseLight, Isotropic, Lambertian, Material, Metal, Scatter, ScatterKind,
    ScatterRecord,
};
pub use medium::{ConstantMedium, GeometryError, GeometryResult};
pub use pdf::Pdf;
pub use rect::{AaRect, Cuboid, Plane};
pub use renderer::{
    linear_to_gamma, pixel_rng, ray_color, render, render_pixel, Framebuffer,
    RenderConfig, RenderError, RenderResult,
};
pub use sampling::{
    gen_f32, gen_range_f32, random_cosine_direction, random_in_unit_disk, random_in_unit_sphere,
    random_unit_vector,
};
pub use scene::{Background, Scene};
pub use sphere::{MovingSphere, Sphere};
pub use texture::Texture;

/// Re-export Vec3 and common math types from umbra_math
pub use umbra_math::{Aabb, Interval, Onb, Quat, Ray, Vec3};
