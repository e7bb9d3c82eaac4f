//! Camera for ray generation.

use rand::RngCore;
use umbra_math::{Ray, Vec3};

use crate::sampling::{gen_f32, gen_range_f32, random_in_unit_disk};

/// Thin-lens camera with an open shutter interval.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    // Lens settings
    vfov: f32,          // Vertical field of view in degrees
    defocus_angle: f32, // Variation angle of rays through each pixel
    focus_dist: f32,    // Distance from camera to plane of perfect focus

    // Shutter open and close times
    time0: f32,
    time1: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    defocus_disk_u: Vec3,
    defocus_disk_v: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            defocus_angle: 0.0,
            focus_dist: 1.0,
            time0: 0.0,
            time1: 0.0,
            // Cached values (initialized to defaults)
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            defocus_disk_u: Vec3::ZERO,
            defocus_disk_v: Vec3::ZERO,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set lens settings.
    pub fn with_lens(mut self, vfov: f32, defocus_angle: f32, focus_dist: f32) -> Self {
        self.vfov = vfov;
        self.defocus_angle = defocus_angle;
        self.focus_dist = focus_dist;
        self
    }

    /// Keep the shutter open from `time0` to `time1`.
    ///
    /// Rays carry a time drawn uniformly from this interval, which moving
    /// objects use for motion blur.
    pub fn with_shutter(mut self, time0: f32, time1: f32) -> Self {
        self.time0 = time0.min(time1);
        self.time1 = time0.max(time1);
        self
    }

    pub fn shutter(&self) -> (f32, f32) {
        (self.time0, self.time1)
    }

    /// Initialize the camera (must be called before generating rays).
    pub fn initialize(&mut self) {
        self.center = self.look_from;

        // Calculate viewport dimensions
        let theta = self.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h * self.focus_dist;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height.max(1) as f32);

        // Calculate camera basis vectors
        self.w = (self.look_from - self.look_at).normalize();
        self.u = self.vup.cross(self.w).normalize();
        self.v = self.w.cross(self.u);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height.max(1) as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - self.focus_dist * self.w - viewport_u / 2.0 - viewport_v / 2.0;

        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        // Calculate defocus disk basis vectors
        let defocus_radius = self.focus_dist * (self.defocus_angle / 2.0).to_radians().tan();
        self.defocus_disk_u = self.u * defocus_radius;
        self.defocus_disk_v = self.v * defocus_radius;

        log::debug!(
            "Camera initialized: {}x{}, vfov {}, shutter [{}, {}]",
            self.image_width,
            self.image_height,
            self.vfov,
            self.time0,
            self.time1
        );
    }

    /// Generate a ray for pixel (i, j) with random sampling.
    pub fn get_ray(&self, i: u32, j: u32, rng: &mut dyn RngCore) -> Ray {
        let offset = sample_square(rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        let ray_origin = if self.defocus_angle <= 0.0 {
            self.center
        } else {
            self.defocus_disk_sample(rng)
        };

        let ray_direction = pixel_sample - ray_origin;
        let ray_time = if self.time1 > self.time0 {
            gen_range_f32(rng, self.time0, self.time1)
        } else {
            self.time0
        };

        Ray::new(ray_origin, ray_direction, ray_time)
    }

    /// Sample a point on the defocus disk.
    fn defocus_disk_sample(&self, rng: &mut dyn RngCore) -> Vec3 {
        let p = random_in_unit_disk(rng);
        self.center + p.x * self.defocus_disk_u + p.y * self.defocus_disk_v
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample a random point in the unit square [-0.5, 0.5] x [-0.5, 0.5].
fn sample_square(rng: &mut dyn RngCore) -> Vec3 {
    Vec3::new(gen_f32(rng) - 0.5, gen_f32(rng) - 0.5, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, -1.0),
                Vec3::new(0.0, 1.0, 0.0),
            )
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.w - Vec3::Z).length() < 0.001);
        assert!((camera.u - Vec3::X).length() < 0.001);
    }

    #[test]
    fn test_camera_ray_direction() {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_lens(90.0, 0.0, 1.0);

        camera.initialize();

        let mut rng = StdRng::seed_from_u64(42);

        // Center ray should point roughly towards -Z
        let ray = camera.get_ray(50, 50, &mut rng);
        let d = ray.direction().normalize();
        assert!(d.z < -0.99);

        // Top-left pixel looks up and to the left.
        let corner = camera.get_ray(0, 0, &mut rng).direction();
        assert!(corner.x < 0.0 && corner.y > 0.0);
    }

    #[test]
    fn test_shutter_times() {
        let mut still = Camera::new().with_resolution(10, 10);
        still.initialize();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(still.get_ray(5, 5, &mut rng).time(), 0.0);

        let mut blurred = Camera::new().with_resolution(10, 10).with_shutter(1.0, 0.0);
        blurred.initialize();
        assert_eq!(blurred.shutter(), (0.0, 1.0));
        let times: Vec<f32> = (0..200).map(|_| blurred.get_ray(5, 5, &mut rng).time()).collect();
        assert!(times.iter().all(|t| (0.0..=1.0).contains(t)));
        assert!(times.iter().any(|&t| t < 0.25) && times.iter().any(|&t| t > 0.75));
    }

    #[test]
    fn test_defocus_origins_stay_on_lens() {
        let mut camera = Camera::new()
            .with_resolution(20, 10)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_lens(40.0, 10.0, 5.0);
        camera.initialize();

        let radius = 5.0 * (5.0f32).to_radians().tan();
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..100 {
            let origin = camera.get_ray(10, 5, &mut rng).origin();
            assert!((origin.z - 5.0).abs() < 1e-5);
            assert!(origin.truncate().length() <= radius + 1e-5);
        }
    }
}
