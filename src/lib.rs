//! # Meshtint
//!
//! Palette reduction for vertex-colored meshes headed for multi-material
//! 3D printing.
//!
//! This is the umbrella crate that provides convenient access to all meshtint functionality.
//! You can use this crate to get everything in one place, or use individual crates for
//! more granular control over dependencies.
//!
//! ## Features
//!
//! - **Core**: Colors, palettes, colored meshes and textures
//! - **Algorithms**: Palette selection, remapping, island merging and texture quantization
//!
//! ## Quick Start
//!
//! ```rust
//! use meshtint::prelude::*;
//!
//! let red = Color::new(0.95, 0.1, 0.1);
//! let blue = Color::new(0.1, 0.2, 0.55);
//! let mut mesh = ColoredMesh::from_vertices_and_faces(
//!     vec![
//!         Vertex::with_color(0.0, 0.0, 0.0, red.clone()),
//!         Vertex::with_color(1.0, 0.0, 0.0, red),
//!         Vertex::with_color(0.0, 1.0, 0.0, blue),
//!     ],
//!     vec![vec![0, 1, 2]],
//! );
//!
//! let report = ColorReducer::new().reduce(&mut mesh).unwrap();
//! assert!(report.palette.len() <= 4);
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables core and algorithms
//! - `algorithms`: Palette reduction algorithms and the reduction pipeline

// Re-export core functionality
pub use meshtint_core::*;

// Re-export sub-crates
#[cfg(feature = "algorithms")]
pub use meshtint_algorithms as algorithms;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshtint_core::*;

    #[cfg(feature = "algorithms")]
    pub use meshtint_algorithms::*;
}
