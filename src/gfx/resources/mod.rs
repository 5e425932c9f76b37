//! Materials, `.obj` files and GPU textures

pub mod material;
pub mod obj_file;
pub mod texture_resource;

// Re-export main types
pub use material::{Material, PhongModel};
pub use obj_file::{ObjFile, ObjFileData};
pub use texture_resource::TextureResource;
