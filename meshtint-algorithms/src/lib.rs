//! # Meshtint Algorithms
//!
//! Palette reduction for vertex-colored meshes headed for multi-material
//! 3D printing.
//!
//! This crate reduces an arbitrary set of vertex colors to a handful of
//! printable colors and cleans up the result, including palette selection,
//! color remapping, island merging, and texture quantization. The
//! [`ColorReducer`] pipeline runs all of it in order.

pub mod adjacency;
pub mod islands;
pub mod kmeans;
pub mod picked_palette;
pub mod pipeline;
pub mod remap;
pub mod selection;
pub mod texture;

// Re-export commonly used items
pub use adjacency::*;
pub use islands::*;
pub use kmeans::*;
pub use picked_palette::*;
pub use pipeline::*;
pub use remap::*;
pub use selection::*;
pub use texture::*;

use meshtint_core::{Color, Palette, Result};

/// Trait for palette selection strategies
pub trait PaletteSelector {
    /// Reduce `colors` to a palette of at most `count` named colors
    fn select(&self, colors: &[Color], count: usize) -> Result<Palette>;

    /// Short strategy name, used in log output
    fn name(&self) -> &'static str;
}
