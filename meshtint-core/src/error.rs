//! Error types for meshtint

use thiserror::Error;

/// Main error type for meshtint operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No vertex colors found")]
    NoColors,

    #[error("Palette is empty")]
    EmptyPalette,

    #[error("Face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    FaceIndexOutOfRange {
        face: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("Face {face} has {len} vertices, at least 3 are required")]
    DegenerateFace { face: usize, len: usize },

    #[error("Pixel buffer length {len} does not match RGBA dimensions {width}x{height}")]
    TextureSize {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("Invalid hex color: {0}")]
    InvalidHex(String),
}

/// Result type alias for meshtint operations
pub type Result<T> = std::result::Result<T, Error>;
