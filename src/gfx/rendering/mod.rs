//! Core rendering functionality
//!
//! Shader programs and their uniform dispatch, render pipelines and frame
//! rendering.

pub mod draw;
pub mod pipeline_manager;
pub mod render_engine;
pub mod shader;

// Re-export main types
pub use draw::DrawModel;
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use shader::{ShaderKind, ShaderProgram, MAX_LIGHT_SOURCES};
