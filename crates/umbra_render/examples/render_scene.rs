//! Renders one of the demo scenes to a PNG file.
//!
//! Usage: `render_scene [cornell|spheres] [config.json] [output.png]`
//!
//! The optional JSON file overrides fields of `RenderConfig`, e.g.
//! `{ "samples_per_pixel": 200, "max_depth": 50, "seed": 1 }`.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use umbra_render::{
    render, AaRect, Background, BvhNode, Camera, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, FlipFace, Hittable, HittableList, Lambertian, Material, Metal, MovingSphere,
    RenderConfig, Rotate, Scene, Sphere, Texture, Translate, Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let scene_name = args.next().unwrap_or_else(|| "cornell".to_string());

    let config = match args.next() {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {path}"))?;
            serde_json::from_str::<RenderConfig>(&text)
                .with_context(|| format!("Failed to parse config {path}"))?
        }
        None => RenderConfig {
            samples_per_pixel: 64,
            max_depth: 20,
            seed: 0,
        },
    };
    let output = args.next().unwrap_or_else(|| format!("{scene_name}.png"));

    log::info!("Umbra path tracer - scene '{}'", scene_name);

    let start = Instant::now();
    let (camera, scene) = match scene_name.as_str() {
        "cornell" => cornell_smoke(config.seed)?,
        "spheres" => bouncing_spheres(config.seed)?,
        other => bail!("Unknown scene '{other}', expected 'cornell' or 'spheres'"),
    };
    log::info!("Scene built in {:?}", start.elapsed());

    let framebuffer = render(&camera, &scene, &config)?;
    framebuffer.save_png(&output)?;

    Ok(())
}

fn material(m: impl Into<Material>) -> Arc<Material> {
    Arc::new(m.into())
}

/// Cornell box with two smoke-filled blocks, lit by a ceiling panel.
fn cornell_smoke(seed: u64) -> Result<(Camera, Scene)> {
    let red = material(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = material(Lambertian::new(Color::new(0.73, 0.73, 0.73)));
    let green = material(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light = material(DiffuseLight::new(Color::new(15.0, 15.0, 15.0)));

    // The panel faces down into the box.
    let panel: Arc<dyn Hittable> = Arc::new(FlipFace::new(Arc::new(AaRect::xz(
        213.0, 343.0, 227.0, 332.0, 554.0, light,
    ))));

    let mut objects: Vec<Arc<dyn Hittable>> = vec![
        Arc::new(AaRect::yz(0.0, 555.0, 0.0, 555.0, 555.0, green)),
        Arc::new(AaRect::yz(0.0, 555.0, 0.0, 555.0, 0.0, red)),
        Arc::new(AaRect::xz(0.0, 555.0, 0.0, 555.0, 0.0, white.clone())),
        Arc::new(AaRect::xz(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())),
        Arc::new(AaRect::xy(0.0, 555.0, 0.0, 555.0, 555.0, white.clone())),
        panel.clone(),
    ];

    let tall = Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 330.0, 165.0), white.clone());
    let tall = Rotate::y(Arc::new(tall), 15.0);
    let tall: Arc<dyn Hittable> =
        Arc::new(Translate::new(Arc::new(tall), Vec3::new(265.0, 0.0, 295.0)));

    let short = Cuboid::new(Vec3::ZERO, Vec3::new(165.0, 165.0, 165.0), white);
    let short = Rotate::y(Arc::new(short), -18.0);
    let short: Arc<dyn Hittable> =
        Arc::new(Translate::new(Arc::new(short), Vec3::new(130.0, 0.0, 65.0)));

    objects.push(Arc::new(ConstantMedium::new(tall, 0.01, Color::ZERO)?));
    objects.push(Arc::new(ConstantMedium::new(short, 0.01, Color::ONE)?));

    let mut rng = StdRng::seed_from_u64(seed);
    let world = BvhNode::new(objects, 0.0, 1.0, &mut rng)?;

    let mut camera = Camera::new()
        .with_resolution(600, 600)
        .with_position(
            Vec3::new(278.0, 278.0, -800.0), // look_from
            Vec3::new(278.0, 278.0, 0.0),    // look_at
            Vec3::new(0.0, 1.0, 0.0),        // vup
        )
        .with_lens(40.0, 0.0, 10.0)
        .with_shutter(0.0, 1.0);
    camera.initialize();

    let scene = Scene::new(Arc::new(world), Background::Solid(Color::ZERO)).with_lights(panel);
    Ok((camera, scene))
}

/// Checkered ground, a field of small spheres (diffuse ones bouncing during
/// the shutter) and three large feature spheres under a sky gradient.
fn bouncing_spheres(seed: u64) -> Result<(Camera, Scene)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = HittableList::new();

    let checker = Texture::checker(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9));
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        material(Lambertian::textured(checker)),
    ));

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            if choose_mat < 0.8 {
                // Diffuse
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                let center1 = center + Vec3::new(0.0, 0.5 * rng.gen::<f32>(), 0.0);
                world.add(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    material(Lambertian::new(albedo)),
                ));
            } else if choose_mat < 0.95 {
                // Metal
                let albedo = Color::new(
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                    0.5 + 0.5 * rng.gen::<f32>(),
                );
                let fuzz = 0.5 * rng.gen::<f32>();
                world.add(Sphere::new(center, 0.2, material(Metal::new(albedo, fuzz))));
            } else {
                // Glass
                world.add(Sphere::new(center, 0.2, material(Dielectric::new(1.5))));
            }
        }
    }

    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, material(Dielectric::new(1.5))));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        material(Lambertian::new(Color::new(0.4, 0.2, 0.1))),
    ));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)),
    ));

    log::info!("Created {} objects", world.len());
    let bvh = BvhNode::new(world.into_objects(), 0.0, 1.0, &mut rng)?;

    let mut camera = Camera::new()
        .with_resolution(800, 450)
        .with_position(
            Vec3::new(13.0, 2.0, 3.0), // look_from
            Vec3::new(0.0, 0.0, 0.0),  // look_at
            Vec3::new(0.0, 1.0, 0.0),  // vup
        )
        .with_lens(20.0, 0.6, 10.0)
        .with_shutter(0.0, 1.0);
    camera.initialize();

    Ok((camera, Scene::new(Arc::new(bvh), Background::SkyGradient)))
}
