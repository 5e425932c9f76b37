//! # Models
//!
//! A [`ModelUnit`] is one mesh with one material and its own transform. A
//! [`ComplexModel`] groups units and moves, scales and rotates them together.
//! A [`Model`] adds file I/O and an optional [`Behaviour`] that animates it
//! over time.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use tartan::gfx::geometry::Size;
//! use tartan::gfx::model::Model;
//!
//! let mut cube = Model::cube();
//! cube.move_by(Vector3::new(0.0, 1.0, 0.0));
//! cube.scale_by(Size::uniform(2.0));
//! assert_eq!(cube.size(), Size::uniform(2.0));
//! ```

pub mod behaviour;
pub mod complex_model;
pub mod figures;
pub mod model;
pub mod model_unit;

pub use behaviour::Behaviour;
pub use complex_model::ComplexModel;
pub use model::Model;
pub use model_unit::{Mesh, ModelUnit};
