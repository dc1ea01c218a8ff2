//! Vertex types and related functionality

use crate::color::Color;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A mesh vertex with an optional color.
///
/// Vertices without a color take no part in palette selection and stay
/// colorless through remapping and island merging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Point3f,
    pub color: Option<Color>,
}

impl Vertex {
    /// Create a colorless vertex
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            color: None,
        }
    }

    /// Create a colored vertex
    pub fn with_color(x: f32, y: f32, z: f32, color: Color) -> Self {
        Self {
            position: Point3f::new(x, y, z),
            color: Some(color),
        }
    }

    /// Name of the vertex color, if the vertex is colored and the color is named
    pub fn color_name(&self) -> Option<&str> {
        self.color.as_ref().and_then(|c| c.name())
    }

    pub fn is_colored(&self) -> bool {
        self.color.is_some()
    }
}

impl Default for Vertex {
    fn default() -> Self {
        Self {
            position: Point3f::origin(),
            color: None,
        }
    }
}
