//! # Tartan Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use tartan::prelude::*;
//!
//! let mut scene = Scene::new(Camera::default());
//! scene.add_model(Model::sphere());
//! ```

// Re-export core application types
pub use crate::app::TartanApp;
pub use crate::error::{Result, TartanError};
pub use crate::settings::SceneSettings;

// Re-export graphics and scene types
pub use crate::gfx::camera::{Camera, CameraKind, CameraSettings, CursorState};
pub use crate::gfx::geometry::{RotationAngles, Size};
pub use crate::gfx::light::{LightAttenuation, LightSource};
pub use crate::gfx::model::{Behaviour, ComplexModel, Model, ModelUnit};
pub use crate::gfx::rendering::ShaderKind;
pub use crate::gfx::resources::{Material, PhongModel};
pub use crate::gfx::scene::{CameraId, LightId, ModelId, Scene};

// Re-export common external dependencies
pub use cgmath::{Deg, Rad, Vector3};
