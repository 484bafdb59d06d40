//! Simple multithreaded render example.
//!
//! Builds a scene in code, renders it on every available core and saves
//! the result as a binary PPM.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scanray_renderer::{render, Camera, Color, Light, Material, RenderConfig, Scene, Sphere, Vec3};
use std::fs::File;
use std::io::BufWriter;

fn main() {
    println!("scanray - Simple Example");
    println!("========================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?}", start.elapsed());

    let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
    let config = RenderConfig::new(800, 600)
        .with_threads(threads)
        .with_samples(8);

    println!(
        "Rendering {}x{} @ {} rays per pixel on {} threads...",
        config.width, config.height, config.samples_per_pixel, config.threads
    );

    let (image, stats) = render(&scene, &config).expect("Render failed");
    println!("Rendered in {:?}", stats.elapsed);
    for (worker, rows) in stats.rows_per_worker.iter().enumerate() {
        println!("  worker {}: {} scanlines", worker, rows);
    }

    let filename = "output.ppm";
    let mut writer = BufWriter::new(File::create(filename).expect("Failed to create file"));
    image.write_ppm(&mut writer).expect("Failed to save image");
    println!("Saved to {}", filename);
}

fn build_scene() -> Scene {
    let mut scene = Scene::new()
        // Ground
        .with_sphere(Sphere::new(
            Vec3::new(0.0, -1000.0, 2.0),
            999.0,
            Material::new(Color::new(0.5, 0.5, 0.5), 80.0, 0.0),
        ))
        // Mirror ball
        .with_sphere(Sphere::new(
            Vec3::new(0.0, 0.1, 4.0),
            1.1,
            Material::new(Color::new(0.2, 0.2, 0.2), 90.0, 0.8),
        ))
        .with_camera(Camera::new(
            Vec3::new(0.0, 6.0, -17.0),
            Vec3::new(0.0, -1.0, 0.0),
            45.0,
        ));

    // Small spheres around the mirror
    let mut rng = StdRng::seed_from_u64(42);
    for i in 0..12 {
        let angle = i as f64 * std::f64::consts::TAU / 12.0;
        let center = Vec3::new(3.5 * angle.cos(), -0.5, 4.0 + 3.5 * angle.sin());
        let color = Color::new(rng.gen(), rng.gen(), rng.gen());
        let reflectivity = if rng.gen::<f64>() < 0.3 { 0.4 } else { 0.0 };
        scene.add_sphere(Sphere::new(
            center,
            0.5,
            Material::new(color, rng.gen_range(10.0..80.0), reflectivity),
        ));
    }

    for position in [
        Vec3::new(-50.0, 100.0, -50.0),
        Vec3::new(40.0, 40.0, 150.0),
    ] {
        scene
            .add_light(Light::new(position))
            .expect("Light capacity exceeded");
    }

    println!("Created {} spheres", scene.sphere_count());
    scene
}
