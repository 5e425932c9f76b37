//! Scene viewer
//!
//! `cargo run --example viewer [path/to/model.obj] [--2d]`
//!
//! Without a path the built-in figures are laid out in a ring lit by two
//! point lights. `--2d` starts with the orthographic camera.

use anyhow::Context;
use tartan::prelude::*;

fn figures() -> Vec<Model> {
    vec![
        Model::cube(),
        Model::sphere(),
        Model::cone(),
        Model::cylinder(),
        Model::torus(),
        Model::tetrahedron(),
        Model::octahedron(),
        Model::icosahedron(),
    ]
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let two_d = args.iter().any(|a| a == "--2d");
    let path = args.iter().find(|a| !a.starts_with("--"));

    let mut scene = Scene::new(Camera::default());

    match path {
        Some(path) => {
            let model = Model::parse(path).with_context(|| format!("loading {}", path))?;
            log::info!("Loaded {} with {} units", path, model.len());
            scene.add_model(model);
        }
        None => {
            let models = figures();
            let count = models.len() as f32;
            for (i, mut model) in models.into_iter().enumerate() {
                let angle = i as f32 / count * std::f32::consts::TAU;
                model.move_by(Vector3::new(angle.cos() * 3.0, 0.0, angle.sin() * 3.0));
                let spin = Behaviour::preset_rotate(RotationAngles::from_degrees(0.0, 45.0, 0.0));
                scene.add_model(model.with_behaviour(spin));
            }
            let mut floor = Model::square();
            floor.scale_by(Size::new(10.0, 1.0, 10.0));
            floor.move_by(Vector3::new(0.0, -1.0, 0.0));
            scene.add_model(floor);
        }
    }

    scene.add_light_source(LightSource::point(Vector3::new(0.0, 4.0, 0.0)))?;
    scene.add_light_source(
        LightSource::point(Vector3::new(5.0, 2.0, 0.0)).with_phong(PhongModel::from_color([1.0, 0.8, 0.6])),
    )?;

    scene.add_camera(Camera::fixed(
        Vector3::new(6.0, 6.0, 6.0),
        Vector3::new(0.0, 0.0, 0.0),
        CameraSettings::default(),
    ));
    let top = scene.add_camera(Camera::two_d(
        Vector3::new(0.0, 0.0, 12.0),
        Vector3::new(0.0, 0.0, 0.0),
        CameraSettings::default(),
    ));
    if two_d {
        scene.set_camera(top)?;
    }

    let settings = SceneSettings::default().with_title("tartan viewer");
    TartanApp::new(settings, scene)?.run()?;
    Ok(())
}
