//! # Graphics Module
//!
//! Everything needed to describe and draw a tartan scene.
//!
//! - **Geometry** ([`geometry`]) - Procedural primitives and transform bookkeeping
//! - **Models** ([`model`]) - Model units, complex models, behaviours
//! - **Light** ([`light`]) - Point light sources with attenuation
//! - **Camera System** ([`camera`]) - Spherical, first-person, 2D and static cameras
//! - **Resources** ([`resources`]) - Materials, `.obj` files, depth buffer
//! - **Rendering** ([`rendering`]) - Shader programs, pipelines, the render engine
//! - **Scene** ([`scene`]) - Models, lights and cameras with one current camera
//!
//! ## Usage
//!
//! ```no_run
//! use tartan::gfx::{camera::Camera, light::LightSource, model::Model, scene::Scene};
//! use cgmath::Vector3;
//!
//! let mut scene = Scene::new(Camera::default());
//! scene.add_model(Model::cube());
//! scene
//!     .add_light_source(LightSource::point(Vector3::new(2.0, 3.0, 2.0)))
//!     .unwrap();
//! ```

pub mod camera;
pub mod geometry;
pub mod light;
pub mod model;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use rendering::render_engine::RenderEngine;
