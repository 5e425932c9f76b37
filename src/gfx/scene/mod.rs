//! # Scene Management Module
//!
//! A [`Scene`] owns models, light sources and cameras, each addressed by a
//! typed id. One camera is current: it receives input, decides which shader
//! program the models use, and is the only camera whose figure isn't drawn.
//!
//! ## Usage
//!
//! ```rust
//! use tartan::gfx::camera::{Camera, CameraSettings};
//! use tartan::gfx::model::Model;
//! use tartan::gfx::scene::Scene;
//! use cgmath::Vector3;
//!
//! let mut scene = Scene::new(Camera::default());
//! let cube = scene.add_model(Model::cube());
//! let top = scene.add_camera(Camera::two_d(
//!     Vector3::new(0.0, 0.0, 10.0),
//!     Vector3::new(0.0, 0.0, 0.0),
//!     CameraSettings::default(),
//! ));
//! scene.set_camera(top).unwrap();
//! assert!(scene.model(cube).is_some());
//! ```

pub mod scene;
pub mod vertex;

// Re-export main types
pub use scene::{CameraId, DrawItem, LightId, ModelId, Scene};
pub use vertex::Vertex3D;
