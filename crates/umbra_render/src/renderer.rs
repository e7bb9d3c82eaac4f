//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Light importance sampling mixed with material sampling
//! - Parallel rendering over image rows
//! - Gamma correction and PNG output

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use image::{ImageFormat, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use umbra_math::{Interval, Ray};

use crate::camera::Camera;
use crate::hittable::HitRecord;
use crate::material::{Color, Scatter, ScatterKind};
use crate::pdf::Pdf;
use crate::scene::Scene;

/// Errors that can occur while rendering or writing an image.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Base seed; every pixel derives its own generator from it
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            seed: 0,
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(RenderError::InvalidConfig(
                "max_depth must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Compute the radiance arriving along a ray.
///
/// Diffuse bounces draw their direction from an equal mixture of the
/// material's distribution and one aimed at `scene.lights`, and weight the
/// result by `scattering_pdf / mixture_pdf`. Samples whose density is zero
/// or not finite contribute nothing.
pub fn ray_color(ray: &Ray, scene: &Scene, depth: u32, rng: &mut dyn RngCore) -> Color {
    // If we've exceeded max depth, return black (no light)
    if depth == 0 {
        return Color::ZERO;
    }

    let mut rec = HitRecord::default();
    if !scene
        .world
        .hit(ray, Interval::new(0.001, f32::INFINITY), &mut rec, rng)
    {
        return scene.background.color(ray);
    }

    let emitted = rec.material.emitted(ray, &rec);

    let Some(srec) = rec.material.scatter(ray, &rec, rng) else {
        return emitted;
    };

    let material_pdf = match srec.kind {
        ScatterKind::Specular(specular) => {
            return emitted + srec.attenuation * ray_color(&specular, scene, depth - 1, rng);
        }
        ScatterKind::Diffuse(pdf) => pdf,
    };

    let (direction, pdf_value) = match &scene.lights {
        Some(lights) => {
            let light_pdf = Pdf::toward(lights.as_ref(), rec.p);
            let mixture = Pdf::mixture(&light_pdf, &material_pdf);
            let direction = mixture.generate(rng);
            (direction, mixture.value(direction))
        }
        None => {
            let direction = material_pdf.generate(rng);
            (direction, material_pdf.value(direction))
        }
    };

    if pdf_value <= 0.0 || !pdf_value.is_finite() {
        return emitted;
    }

    let scattered = Ray::new(rec.p, direction, ray.time());
    let scattering_pdf = rec.material.scattering_pdf(ray, &rec, &scattered);
    if scattering_pdf <= 0.0 {
        return emitted;
    }

    let incoming = ray_color(&scattered, scene, depth - 1, rng);
    let contribution = srec.attenuation * scattering_pdf * incoming / pdf_value;
    if contribution.is_finite() {
        emitted + contribution
    } else {
        emitted
    }
}

/// Sum of `samples_per_pixel` radiance samples for pixel (x, y).
pub fn render_pixel(
    camera: &Camera,
    scene: &Scene,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Camera.get_ray already adds random offset for anti-aliasing
        let ray = camera.get_ray(x, y, rng);
        pixel_color += ray_color(&ray, scene, config.max_depth, rng);
    }

    pixel_color
}

/// Deterministic generator for one pixel, independent of thread scheduling.
pub fn pixel_rng(seed: u64, x: u32, y: u32) -> StdRng {
    let index = (u64::from(y) << 32) | u64::from(x);
    StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ index)
}

/// Render the entire scene.
///
/// Rows are distributed across the rayon thread pool. Each pixel seeds its
/// own generator from `config.seed`, so the result does not depend on the
/// number of threads.
pub fn render(camera: &Camera, scene: &Scene, config: &RenderConfig) -> RenderResult<Framebuffer> {
    config.validate()?;

    let (width, height) = (camera.image_width, camera.image_height);
    if width == 0 || height == 0 {
        return Err(RenderError::InvalidConfig(format!(
            "image must not be empty, got {width}x{height}"
        )));
    }

    log::info!(
        "Rendering {}x{} @ {} spp, max depth {}",
        width,
        height,
        config.samples_per_pixel,
        config.max_depth
    );
    let start = Instant::now();

    let mut framebuffer = Framebuffer::new(width, height, config.samples_per_pixel);
    let rows_remaining = AtomicUsize::new(height as usize);
    let report_every = (height as usize / 10).max(1);

    framebuffer
        .pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let y = y as u32;
            for (x, pixel) in row.iter_mut().enumerate() {
                let x = x as u32;
                let mut rng = pixel_rng(config.seed, x, y);
                *pixel = render_pixel(camera, scene, x, y, config, &mut rng);
            }

            let remaining = rows_remaining.fetch_sub(1, Ordering::Relaxed) - 1;
            if remaining % report_every == 0 {
                log::info!("{} rows remaining", remaining);
            }
        });

    log::info!("Rendered in {:?}", start.elapsed());

    Ok(framebuffer)
}

/// Per-pixel radiance sums, row-major from the top-left pixel.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    samples_per_pixel: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32, samples_per_pixel: u32) -> Self {
        Self {
            width,
            height,
            samples_per_pixel,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn samples_per_pixel(&self) -> u32 {
        self.samples_per_pixel
    }

    /// Summed radiance at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the summed radiance at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Averaged, gamma-corrected display color at (x, y) in `[0, 1]`.
    ///
    /// NaN channels resolve to black.
    pub fn resolve(&self, x: u32, y: u32) -> Color {
        let scale = 1.0 / self.samples_per_pixel.max(1) as f32;
        let sum = self.get(x, y);
        let channel = |c: f32| {
            if c.is_nan() {
                0.0
            } else {
                clamp_01(linear_to_gamma(scale * c))
            }
        };
        Color::new(channel(sum.x), channel(sum.y), channel(sum.z))
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for y in 0..self.height {
            for x in 0..self.width {
                bytes.extend_from_slice(&display_to_rgba(self.resolve(x, y)));
            }
        }
        bytes
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            Rgba(display_to_rgba(self.resolve(x, y)))
        })
    }

    /// Write the resolved image as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        let path = path.as_ref();
        self.to_image().save_with_format(path, ImageFormat::Png)?;
        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

fn display_to_rgba(color: Color) -> [u8; 4] {
    let to_byte = |c: f32| (256.0 * c.clamp(0.0, 0.999)) as u8;
    [to_byte(color.x), to_byte(color.y), to_byte(color.z), 255]
}
