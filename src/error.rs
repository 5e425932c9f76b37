//! Error types for the tartan library

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TartanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Wrong file extension for {}: expected .{expected}", path.display())]
    WrongExtension { path: PathBuf, expected: &'static str },

    #[error("Malformed OBJ at line {line}: {message}")]
    Malformed { line: usize, message: String },

    #[error("OBJ file does not reference a material library (mtllib)")]
    MissingMaterialLibrary,

    #[error("Object '{object}' has no material (usemtl)")]
    MissingMaterialName { object: String },

    #[error("Object '{object}' uses material '{material}' which is not in the material library")]
    UnknownMaterial { object: String, material: String },

    #[error("MTL error: {0}")]
    Mtl(#[from] tobj::LoadError),

    #[error("Scene already holds the maximum of {max} light sources")]
    TooManyLightSources { max: usize },

    #[error("{0} is not part of the scene")]
    NotInScene(&'static str),

    #[error("The current camera cannot be removed from the scene")]
    CameraInUse,

    #[error("Invalid behaviour parameters: {0}")]
    InvalidBehaviour(String),

    #[error("Failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("Failed to request adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("Shader '{name}' failed: {message}")]
    Shader { name: String, message: String },

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

pub type Result<T> = std::result::Result<T, TartanError>;
