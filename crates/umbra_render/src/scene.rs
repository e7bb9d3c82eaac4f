//! Scene description consumed by the integrator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use umbra_math::Ray;

use crate::hittable::Hittable;
use crate::material::Color;

/// Radiance returned by rays that escape the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Background {
    /// The same color in every direction.
    Solid(Color),
    /// Vertical blend from white at the horizon to sky blue overhead.
    SkyGradient,
}

impl Background {
    /// Radiance seen along `ray`.
    pub fn color(&self, ray: &Ray) -> Color {
        match self {
            Background::Solid(color) => *color,
            Background::SkyGradient => {
                let unit_direction = ray.direction().normalize();
                let a = 0.5 * (unit_direction.y + 1.0);
                let white = Color::new(1.0, 1.0, 1.0);
                let blue = Color::new(0.5, 0.7, 1.0);
                white * (1.0 - a) + blue * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Solid(Color::ZERO)
    }
}

/// Everything a render needs besides the camera.
#[derive(Clone)]
pub struct Scene {
    /// Root of the geometry, normally a [`BvhNode`](crate::BvhNode).
    pub world: Arc<dyn Hittable>,
    /// Emitters sampled directly for diffuse bounces. Several lights are
    /// grouped in one [`HittableList`](crate::HittableList), each weighted
    /// equally.
    pub lights: Option<Arc<dyn Hittable>>,
    pub background: Background,
}

impl Scene {
    pub fn new(world: Arc<dyn Hittable>, background: Background) -> Self {
        Self {
            world,
            lights: None,
            background,
        }
    }

    /// Enable direct light sampling toward `lights`.
    pub fn with_lights(mut self, lights: Arc<dyn Hittable>) -> Self {
        self.lights = Some(lights);
        self
    }
}
