//! Core data structures and traits for meshtint
//!
//! This crate provides the value types shared by every stage of color
//! reduction: colors and the filament pool, palettes, colored meshes,
//! RGBA textures, and the nearest-color trait.

pub mod color;
pub mod palette;
pub mod point;
pub mod mesh;
pub mod texture;
pub mod traits;
pub mod error;

pub use color::*;
pub use palette::*;
pub use point::*;
pub use mesh::*;
pub use texture::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::Point3;
