//! Mesh data structures and functionality

use crate::color::Color;
use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A polygon face as an ordered list of at least three vertex indices.
///
/// Polygons are kept as-is; fan triangulation is left to exporters.
pub type Face = Vec<usize>;

/// A polygon mesh with optionally colored vertices.
///
/// Topology is fixed once built. Processing only ever changes vertex colors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColoredMesh {
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
}

impl ColoredMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Vertex>, faces: Vec<Face>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: impl Into<Face>) {
        self.faces.push(face.into());
    }

    /// Colors of all colored vertices, in vertex order
    pub fn vertex_colors(&self) -> Vec<Color> {
        self.vertices
            .iter()
            .filter_map(|v| v.color.clone())
            .collect()
    }

    /// Number of vertices carrying a color
    pub fn colored_vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_colored()).count()
    }

    /// Check that every face has at least three indices, all within bounds
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();
        for (face_idx, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(Error::DegenerateFace {
                    face: face_idx,
                    len: face.len(),
                });
            }
            if let Some(&index) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(Error::FaceIndexOutOfRange {
                    face: face_idx,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }

    /// Vertex count per palette color name, in palette order.
    ///
    /// Every named palette entry appears, including those no vertex uses.
    /// Vertices whose color name is not in the palette are not counted.
    pub fn color_distribution(&self, palette: &Palette) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in self.vertices.iter().filter_map(|v| v.color_name()) {
            *counts.entry(name).or_insert(0) += 1;
        }

        palette
            .names()
            .map(|name| (name.to_string(), counts.get(name).copied().unwrap_or(0)))
            .collect()
    }

    /// Remove every vertex color
    pub fn clear_colors(&mut self) {
        for vertex in &mut self.vertices {
            vertex.color = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> ColoredMesh {
        let red = Color::named(0.9, 0.1, 0.1, "red");
        ColoredMesh::from_vertices_and_faces(
            vec![
                Vertex::with_color(0.0, 0.0, 0.0, red.clone()),
                Vertex::with_color(1.0, 0.0, 0.0, red),
                Vertex::new(0.0, 1.0, 0.0),
            ],
            vec![vec![0, 1, 2]],
        )
    }

    #[test]
    fn test_counts() {
        let mesh = triangle();
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.colored_vertex_count(), 2);
        assert_eq!(mesh.vertex_colors().len(), 2);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_validate() {
        let mut mesh = triangle();
        assert!(mesh.validate().is_ok());

        mesh.add_face(vec![0, 1]);
        assert_eq!(mesh.validate(), Err(Error::DegenerateFace { face: 1, len: 2 }));

        mesh.faces.pop();
        mesh.add_face(vec![0, 1, 7]);
        assert_eq!(
            mesh.validate(),
            Err(Error::FaceIndexOutOfRange {
                face: 1,
                index: 7,
                vertex_count: 3
            })
        );
    }

    #[test]
    fn test_color_distribution() {
        let mesh = triangle();
        let palette = Palette::from_colors(vec![
            Color::named(0.9, 0.1, 0.1, "red"),
            Color::named(0.2, 0.7, 0.2, "green"),
        ]);
        assert_eq!(
            mesh.color_distribution(&palette),
            vec![("red".to_string(), 2), ("green".to_string(), 0)]
        );
    }
}
