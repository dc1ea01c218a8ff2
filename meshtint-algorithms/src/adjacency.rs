//! Vertex and face adjacency graphs

use itertools::Itertools;
use meshtint_core::Face;
use std::collections::{BTreeSet, HashMap};

/// Undirected graph over dense entity indices (vertices or faces).
///
/// Neighbor sets are ordered, so traversals over them are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyGraph {
    neighbors: Vec<BTreeSet<usize>>,
}

impl AdjacencyGraph {
    /// A graph of `node_count` isolated nodes
    pub fn with_nodes(node_count: usize) -> Self {
        Self {
            neighbors: vec![BTreeSet::new(); node_count],
        }
    }

    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    /// Neighbors of `node` in ascending order; empty for unknown nodes
    pub fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors
            .get(node)
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    pub fn degree(&self, node: usize) -> usize {
        self.neighbors.get(node).map_or(0, |set| set.len())
    }

    pub fn contains_edge(&self, a: usize, b: usize) -> bool {
        self.neighbors.get(a).is_some_and(|set| set.contains(&b))
    }

    /// Add an undirected edge. Self loops and out-of-range nodes are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        let count = self.neighbors.len();
        if a == b || a >= count || b >= count {
            return;
        }
        self.neighbors[a].insert(b);
        self.neighbors[b].insert(a);
    }

    /// Check that every edge is stored in both directions
    pub fn is_symmetric(&self) -> bool {
        self.neighbors
            .iter()
            .enumerate()
            .all(|(a, set)| set.iter().all(|&b| self.contains_edge(b, a)))
    }
}

/// Build the vertex adjacency graph: two vertices are adjacent if they
/// appear together in any face.
///
/// Out-of-range indices and repeated indices within a face are skipped,
/// so malformed faces just contribute fewer edges.
pub fn build_vertex_adjacency(vertex_count: usize, faces: &[Face]) -> AdjacencyGraph {
    let mut graph = AdjacencyGraph::with_nodes(vertex_count);

    for face in faces {
        for (&v1, &v2) in face.iter().tuple_combinations() {
            graph.add_edge(v1, v2);
        }
    }

    graph
}

/// Undirected edge key, smaller index first
fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Build the face adjacency graph: two faces are adjacent when they share
/// an edge used by exactly two faces.
///
/// Edges are consecutive index pairs with the last index wrapping to the
/// first. Boundary edges (one face) and non-manifold edges (three or more
/// faces) contribute nothing.
pub fn build_face_adjacency(faces: &[Face]) -> AdjacencyGraph {
    let mut edge_faces: HashMap<(usize, usize), Vec<usize>> = HashMap::new();

    for (face_idx, face) in faces.iter().enumerate() {
        for (&v1, &v2) in face.iter().circular_tuple_windows() {
            edge_faces.entry(edge_key(v1, v2)).or_default().push(face_idx);
        }
    }

    let mut graph = AdjacencyGraph::with_nodes(faces.len());
    for face_indices in edge_faces.values() {
        if let [f1, f2] = face_indices.as_slice() {
            graph.add_edge(*f1, *f2);
        }
    }

    graph
}
