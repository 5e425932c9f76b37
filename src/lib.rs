//! Tartan 3D Scene Library
//!
//! A small scene graph built on wgpu and winit: composite models loaded from
//! `.obj`/`.mtl` files or generated procedurally, point light sources, several
//! camera kinds and two shader programs fed through a uniform dispatch table.

pub mod app;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod settings;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::TartanApp;
pub use error::{Result, TartanError};
pub use settings::SceneSettings;
