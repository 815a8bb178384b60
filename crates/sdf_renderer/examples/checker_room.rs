//! Checker room example.
//!
//! Renders a mirror sphere and a carved tube over a checkered floor and
//! saves the result as PNG.
//!
//! Usage: cargo run --example checker_room [config.json] [output.png]

use std::sync::Arc;

use anyhow::{Context, Result};
use sdf_renderer::{
    Color, ImageBuffer, Material, NodeId, Pinhole, Raymarcher, RenderConfig, Scene, Shape, Vec3,
};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RenderConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => RenderConfig {
            antialias: 2,
            background: Color::new(0.6, 0.7, 0.9),
            ..Default::default()
        },
    };
    let output = args.next().unwrap_or_else(|| "checker_room.png".to_string());

    let (scene, root) = build_scene()?;
    log::info!("Scene:\n{}", scene.render_tree(root));
    log::debug!("{}", scene.describe(root));

    let camera = Pinhole::looking_at(
        Vec3::new(0.0, 2.5, -7.0),
        Vec3::new(0.0, 0.8, 0.0),
        45.0,
        WIDTH,
        HEIGHT,
    );

    let raymarcher = Raymarcher::new(&scene, root, config)?;
    let mut image = ImageBuffer::new(WIDTH, HEIGHT);
    let stats = raymarcher.render(&mut image, &camera);
    log::info!("Rendered {}x{}: {}", WIDTH, HEIGHT, stats);

    image::save_buffer(
        &output,
        &image.to_rgba(),
        WIDTH,
        HEIGHT,
        image::ColorType::Rgba8,
    )
    .with_context(|| format!("writing {output}"))?;
    log::info!("Saved to {}", output);

    Ok(())
}

fn build_scene() -> Result<(Scene, NodeId)> {
    let mut scene = Scene::new();

    let floor_material = Material::checker(
        Arc::new(Material::color(Color::splat(0.9))),
        Arc::new(Material::reflective(Color::splat(0.1), 0.3)),
        Vec3::splat(2.0),
    );
    let floor = scene.add_with_material(Shape::plane(Vec3::Y), Arc::new(floor_material));

    let mirror = scene.add_with_material(Shape::sphere(1.0), Arc::new(Material::mirror(1.0)));
    let mirror = scene.translated(mirror, Vec3::new(-1.3, 1.0, 0.5))?;

    // Sphere with a tube drilled through it
    let body = scene.add_with_material(
        Shape::sphere(0.8),
        Arc::new(Material::reflective(Color::new(0.9, 0.3, 0.2), 0.2)),
    );
    let drill = scene.add(Shape::tube(0.35, 2)?);
    let carved = scene.combine(Shape::Difference, &[body, drill])?;
    let carved = scene.scaled(carved, 1.2)?;
    let carved = scene.translated(carved, Vec3::new(1.4, 0.96, -0.2))?;

    let root = scene.combine(Shape::Union, &[floor, mirror, carved])?;
    Ok((scene, root))
}
