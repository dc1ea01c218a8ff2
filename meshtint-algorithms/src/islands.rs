//! Color island detection and merging
//!
//! An island is a maximal connected set of vertices (or faces) sharing one
//! color name. Islands smaller than a minimum size cannot be printed
//! cleanly, so they are recolored to the color most common among their
//! outside neighbors.
//!
//! Merging runs in rounds. Each round takes a snapshot of the current color
//! names, finds islands and neighbor colors from that snapshot only, and
//! writes recolorings into the vertices. Rounds repeat until one recolors
//! nothing or [`MAX_MERGE_ITERATIONS`] is reached. Two colors can keep
//! trading small islands forever, so the cap is what bounds the work.
//!
//! Only named colors take part. Palette colors are always named, so after
//! remapping every colored vertex qualifies.

use crate::adjacency::AdjacencyGraph;
use meshtint_core::{Color, Face, Palette, Vertex};
use std::collections::VecDeque;

/// Upper bound on merge rounds
pub const MAX_MERGE_ITERATIONS: usize = 10;

/// A connected component of same-colored vertices or faces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Island {
    /// Member indices in breadth-first order
    pub members: Vec<usize>,
    pub color_name: String,
}

impl Island {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Totals reported by a merge run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Vertex recolorings across all rounds
    pub merged: usize,
    /// Rounds run, including the final one that found nothing to merge
    pub iterations: usize,
}

/// Face min island size derived from the vertex one: `max(2, ceil(n / 3))`
pub fn default_face_min_size(vertex_min_size: usize) -> usize {
    vertex_min_size.div_ceil(3).max(2)
}

/// Color-name counts that remember first-insertion order.
///
/// `best` returns the highest count, and the earliest inserted name on ties.
#[derive(Debug, Default)]
struct NameTally<'a> {
    counts: Vec<(&'a str, usize)>,
}

impl<'a> NameTally<'a> {
    fn add(&mut self, name: &'a str) {
        match self.counts.iter_mut().find(|(n, _)| *n == name) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((name, 1)),
        }
    }

    fn best(&self) -> Option<&'a str> {
        let mut best = None;
        let mut best_count = 0;
        for &(name, count) in &self.counts {
            if count > best_count {
                best_count = count;
                best = Some(name);
            }
        }
        best
    }
}

/// Owned snapshot of every vertex color name
fn vertex_labels(vertices: &[Vertex]) -> Vec<Option<String>> {
    vertices
        .iter()
        .map(|v| v.color_name().map(str::to_owned))
        .collect()
}

fn as_refs(labels: &[Option<String>]) -> Vec<Option<&str>> {
    labels.iter().map(|l| l.as_deref()).collect()
}

/// Breadth-first components of equal labels. Unlabeled nodes are skipped.
fn connected_islands(labels: &[Option<&str>], graph: &AdjacencyGraph) -> Vec<Island> {
    let mut visited = vec![false; labels.len()];
    let mut islands = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..labels.len() {
        let Some(name) = labels[start] else {
            continue;
        };
        if visited[start] {
            continue;
        }

        let mut members = Vec::new();
        visited[start] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            members.push(node);
            for neighbor in graph.neighbors(node) {
                if neighbor < labels.len() && !visited[neighbor] && labels[neighbor] == Some(name) {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        islands.push(Island {
            members,
            color_name: name.to_string(),
        });
    }

    islands
}

/// Most common differently-colored label among the neighbors of an island
fn best_neighbor_label<'a>(
    island: &Island,
    labels: &[Option<&'a str>],
    graph: &AdjacencyGraph,
) -> Option<&'a str> {
    let mut tally = NameTally::default();
    for &member in &island.members {
        for neighbor in graph.neighbors(member) {
            if let Some(Some(name)) = labels.get(neighbor) {
                if *name != island.color_name {
                    tally.add(*name);
                }
            }
        }
    }
    tally.best()
}

/// Find all vertex islands in the vertex adjacency graph
pub fn find_vertex_islands(vertices: &[Vertex], adjacency: &AdjacencyGraph) -> Vec<Island> {
    let labels = vertex_labels(vertices);
    connected_islands(&as_refs(&labels), adjacency)
}

/// Recolor vertex islands smaller than `min_size` to their dominant neighbor color.
///
/// Within a round, islands are visited smallest first. An island's target
/// is the most frequent color among neighbors outside it (first encountered
/// on ties, walking members in breadth-first order and each member's
/// neighbors by ascending index). Islands whose target is not in `palette`
/// are left alone.
pub fn merge_small_islands(
    vertices: &mut [Vertex],
    adjacency: &AdjacencyGraph,
    min_size: usize,
    palette: &Palette,
) -> MergeStats {
    let mut stats = MergeStats::default();

    for _ in 0..MAX_MERGE_ITERATIONS {
        stats.iterations += 1;

        let snapshot = vertex_labels(vertices);
        let labels = as_refs(&snapshot);
        let mut islands = connected_islands(&labels, adjacency);
        islands.sort_by_key(|island| island.len());

        let mut merged = 0;
        for island in islands.iter().take_while(|island| island.len() < min_size) {
            let Some(target) = best_neighbor_label(island, &labels, adjacency)
                .and_then(|name| palette.find(name))
            else {
                continue;
            };

            for &v in &island.members {
                vertices[v].color = Some(target.clone());
            }
            merged += island.len();
        }

        stats.merged += merged;
        if merged == 0 {
            break;
        }
    }

    log::info!(
        "Merged {} vertices (vertex islands) in {} rounds",
        stats.merged,
        stats.iterations
    );
    stats
}

/// Most frequent color name among a face's vertices, first encountered on ties.
///
/// Faces with no named vertex colors have no dominant color.
pub fn face_dominant_color<'a>(face: &[usize], vertices: &'a [Vertex]) -> Option<&'a str> {
    let mut tally = NameTally::default();
    for name in face
        .iter()
        .filter_map(|&v| vertices.get(v))
        .filter_map(|vertex| vertex.color_name())
    {
        tally.add(name);
    }
    tally.best()
}

fn face_labels<'a>(faces: &[Face], vertices: &'a [Vertex]) -> Vec<Option<&'a str>> {
    faces
        .iter()
        .map(|face| face_dominant_color(face, vertices))
        .collect()
}

/// Find all face islands: faces connected in the face adjacency graph that
/// share a dominant color
pub fn find_face_islands(
    vertices: &[Vertex],
    faces: &[Face],
    face_adjacency: &AdjacencyGraph,
) -> Vec<Island> {
    connected_islands(&face_labels(faces, vertices), face_adjacency)
}

/// Recolor the vertices of `face` that show `from` (per the snapshot) to `target`
fn recolor_face_vertices(
    vertices: &mut [Vertex],
    face: &[usize],
    vertex_snapshot: &[Option<String>],
    from: &str,
    target: &Color,
    touched: &mut Vec<usize>,
) {
    for &v in face {
        if vertex_snapshot.get(v).and_then(|l| l.as_deref()) == Some(from) {
            vertices[v].color = Some(target.clone());
            touched.push(v);
        }
    }
}

/// Recolor isolated faces and undersized face islands.
///
/// Each round runs two passes, each against its own snapshot:
///
/// 1. Isolated faces: a face with a dominant color that none of its
///    adjacent faces share takes the most common dominant color among
///    those neighbors. Only its vertices showing the old color change.
///    When two isolated faces share such a vertex, the higher face index
///    writes last.
/// 2. Face islands: like vertex islands, over the face adjacency graph
///    and dominant face colors. Member faces' vertices showing the island
///    color are recolored.
///
/// `min_size` counts faces. Rounds stop once both passes recolor nothing
/// or at [`MAX_MERGE_ITERATIONS`].
pub fn merge_face_islands(
    vertices: &mut [Vertex],
    faces: &[Face],
    face_adjacency: &AdjacencyGraph,
    min_size: usize,
    palette: &Palette,
) -> MergeStats {
    let mut stats = MergeStats::default();

    for _ in 0..MAX_MERGE_ITERATIONS {
        stats.iterations += 1;
        let mut merged = 0;

        // Isolated faces
        let (vertex_snapshot, face_snapshot) = {
            let vertex_snapshot = vertex_labels(vertices);
            let face_snapshot: Vec<Option<String>> = face_labels(faces, vertices)
                .into_iter()
                .map(|l| l.map(str::to_owned))
                .collect();
            (vertex_snapshot, face_snapshot)
        };
        let face_colors = as_refs(&face_snapshot);

        for (face_idx, face) in faces.iter().enumerate() {
            let Some(own) = face_colors[face_idx] else {
                continue;
            };
            if face_adjacency.degree(face_idx) == 0 {
                continue;
            }

            let mut tally = NameTally::default();
            let mut shares_color = false;
            for neighbor in face_adjacency.neighbors(face_idx) {
                let Some(Some(color)) = face_colors.get(neighbor) else {
                    continue;
                };
                if *color == own {
                    shares_color = true;
                    break;
                }
                tally.add(*color);
            }
            if shares_color {
                continue;
            }

            let Some(target) = tally.best().and_then(|name| palette.find(name)) else {
                continue;
            };
            let mut touched = Vec::new();
            recolor_face_vertices(vertices, face, &vertex_snapshot, own, target, &mut touched);
            merged += touched.len();
        }

        // Face islands
        let vertex_snapshot = vertex_labels(vertices);
        let face_snapshot: Vec<Option<String>> = face_labels(faces, vertices)
            .into_iter()
            .map(|l| l.map(str::to_owned))
            .collect();
        let face_colors = as_refs(&face_snapshot);

        let mut islands = connected_islands(&face_colors, face_adjacency);
        islands.sort_by_key(|island| island.len());

        for island in islands.iter().take_while(|island| island.len() < min_size) {
            let Some(target) = best_neighbor_label(island, &face_colors, face_adjacency)
                .and_then(|name| palette.find(name))
            else {
                continue;
            };

            let mut touched = Vec::new();
            for &face_idx in &island.members {
                recolor_face_vertices(
                    vertices,
                    &faces[face_idx],
                    &vertex_snapshot,
                    &island.color_name,
                    target,
                    &mut touched,
                );
            }
            touched.sort_unstable();
            touched.dedup();
            merged += touched.len();
        }

        stats.merged += merged;
        if merged == 0 {
            break;
        }
    }

    log::info!(
        "Merged {} vertices (face islands) in {} rounds",
        stats.merged,
        stats.iterations
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjacency::{build_face_adjacency, build_vertex_adjacency};
    use rand::prelude::*;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn red() -> Color {
        Color::named(0.9, 0.1, 0.1, "red")
    }

    fn blue() -> Color {
        Color::named(0.1, 0.2, 0.5, "blue")
    }

    fn green() -> Color {
        Color::named(0.2, 0.7, 0.2, "green")
    }

    fn palette() -> Palette {
        Palette::from_colors(vec![red(), blue(), green()])
    }

    /// Triangle strip with faces [i, i+1, i+2]
    fn strip(colors: Vec<Color>) -> (Vec<Vertex>, Vec<Face>) {
        let vertices: Vec<Vertex> = colors
            .into_iter()
            .enumerate()
            .map(|(i, c)| Vertex::with_color(i as f32, (i % 2) as f32, 0.0, c))
            .collect();
        let faces = (0..vertices.len().saturating_sub(2))
            .map(|i| vec![i, i + 1, i + 2])
            .collect();
        (vertices, faces)
    }

    fn names(vertices: &[Vertex]) -> HashSet<String> {
        vertices
            .iter()
            .filter_map(|v| v.color_name().map(str::to_owned))
            .collect()
    }

    #[test]
    fn test_find_vertex_islands() {
        let (vertices, faces) = strip(vec![red(), red(), blue(), blue(), blue(), red()]);
        let graph = build_vertex_adjacency(vertices.len(), &faces);

        let islands = find_vertex_islands(&vertices, &graph);
        assert_eq!(islands.len(), 3);
        assert_eq!(islands[0].members, vec![0, 1]);
        assert_eq!(islands[1].color_name, "blue");
        assert_eq!(islands[1].len(), 3);
        assert_eq!(islands[2].members, vec![5]);
    }

    #[test]
    fn test_colorless_vertices_never_join_islands() {
        let (mut vertices, faces) = strip(vec![red(), red(), blue(), red()]);
        vertices[2].color = None;
        let graph = build_vertex_adjacency(vertices.len(), &faces);

        let islands = find_vertex_islands(&vertices, &graph);
        assert_eq!(islands.iter().map(|i| i.len()).sum::<usize>(), 3);

        let stats = merge_small_islands(&mut vertices, &graph, 2, &palette());
        assert_eq!(stats.merged, 0);
        assert!(vertices[2].color.is_none());
    }

    #[test]
    fn test_small_island_takes_dominant_neighbor() {
        let (mut vertices, faces) = strip(vec![red(), red(), blue(), red(), red(), green()]);
        let graph = build_vertex_adjacency(vertices.len(), &faces);

        let stats = merge_small_islands(&mut vertices, &graph, 2, &palette());
        assert!(stats.merged >= 1);
        assert!(vertices.iter().all(|v| v.color_name() == Some("red")));
    }

    #[test]
    fn test_target_must_be_in_palette() {
        let (mut vertices, faces) = strip(vec![red(), red(), blue(), red(), red()]);
        let graph = build_vertex_adjacency(vertices.len(), &faces);
        let only_blue = Palette::from_colors(vec![blue()]);

        let stats = merge_small_islands(&mut vertices, &graph, 2, &only_blue);
        assert_eq!(stats.merged, 0);
        assert_eq!(stats.iterations, 1);
        assert_eq!(vertices[2].color_name(), Some("blue"));
    }

    #[test]
    fn test_three_coloring_strip_terminates() {
        // Every island starts with a single vertex
        let cycle = [red(), green(), blue()];
        let colors = (0..12).map(|i| cycle[i % 3].clone()).collect();
        let (mut vertices, faces) = strip(colors);
        let graph = build_vertex_adjacency(vertices.len(), &faces);
        let before = names(&vertices);

        let stats = merge_small_islands(&mut vertices, &graph, 2, &palette());
        assert!(stats.iterations <= MAX_MERGE_ITERATIONS);
        assert!(names(&vertices).is_subset(&before));
    }

    #[test]
    fn test_swapping_islands_stop_at_cap() {
        // Both islands are undersized and each other's only neighbor, so
        // they trade colors every round.
        let (mut vertices, faces) = strip(vec![red(), red(), red(), blue(), blue(), blue()]);
        let graph = build_vertex_adjacency(vertices.len(), &faces);

        let stats = merge_small_islands(&mut vertices, &graph, 100, &palette());
        assert_eq!(stats.iterations, MAX_MERGE_ITERATIONS);
        assert_eq!(stats.merged, 6 * MAX_MERGE_ITERATIONS);
        // An even number of swaps restores the start
        assert_eq!(vertices[0].color_name(), Some("red"));
        assert_eq!(vertices[5].color_name(), Some("blue"));
    }

    #[test]
    fn test_face_dominant_color() {
        let vertices = vec![
            Vertex::with_color(0.0, 0.0, 0.0, blue()),
            Vertex::with_color(1.0, 0.0, 0.0, red()),
            Vertex::with_color(0.0, 1.0, 0.0, red()),
            Vertex::new(1.0, 1.0, 0.0),
        ];
        assert_eq!(face_dominant_color(&[0, 1, 2], &vertices), Some("red"));
        // Tie: first encountered wins
        assert_eq!(face_dominant_color(&[0, 1, 3], &vertices), Some("blue"));
        assert_eq!(face_dominant_color(&[3, 3, 3], &vertices), None);
    }

    #[test]
    fn test_isolated_face_is_absorbed() {
        let (mut vertices, faces) = strip(vec![red(), blue(), red(), blue(), red(), red()]);
        let faces: Vec<Face> = faces.into_iter().take(4).collect();
        let face_graph = build_face_adjacency(&faces);
        assert_eq!(find_face_islands(&vertices, &faces, &face_graph).len(), 3);

        let stats = merge_face_islands(&mut vertices, &faces, &face_graph, 2, &palette());
        assert!(stats.merged > 0);
        assert_eq!(names(&vertices), HashSet::from(["red".to_string()]));
    }

    #[test]
    fn test_undersized_face_island() {
        let mut colors = vec![red(); 16];
        for color in colors.iter_mut().skip(7).take(3) {
            *color = blue();
        }
        let (vertices, faces) = strip(colors);
        let face_graph = build_face_adjacency(&faces);

        let blue_islands: Vec<_> = find_face_islands(&vertices, &faces, &face_graph)
            .into_iter()
            .filter(|i| i.color_name == "blue")
            .collect();
        assert_eq!(blue_islands.len(), 1);
        assert_eq!(blue_islands[0].members, vec![6, 7, 8]);

        let mut kept = vertices.clone();
        let stats = merge_face_islands(&mut kept, &faces, &face_graph, 3, &palette());
        assert_eq!(stats, MergeStats { merged: 0, iterations: 1 });

        let mut merged = vertices;
        let stats = merge_face_islands(&mut merged, &faces, &face_graph, 4, &palette());
        assert_eq!(stats.merged, 3);
        assert!(merged.iter().all(|v| v.color_name() == Some("red")));
    }

    #[test]
    fn test_merging_never_adds_color_names() {
        let size = 12;
        let mut rng = StdRng::seed_from_u64(7);
        let choices = [red(), blue(), green()];

        let mut vertices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                let color = choices[rng.gen_range(0..choices.len())].clone();
                vertices.push(Vertex::with_color(x as f32, y as f32, 0.0, color));
            }
        }
        let mut faces = Vec::new();
        for y in 0..size - 1 {
            for x in 0..size - 1 {
                let tl = y * size + x;
                let tr = tl + 1;
                let bl = tl + size;
                let br = bl + 1;
                faces.push(vec![tl, bl, tr]);
                faces.push(vec![tr, bl, br]);
            }
        }

        let vertex_graph = build_vertex_adjacency(vertices.len(), &faces);
        let face_graph = build_face_adjacency(&faces);
        let before = names(&vertices);

        let vertex_stats = merge_small_islands(&mut vertices, &vertex_graph, 4, &palette());
        let after_vertex = names(&vertices);
        assert!(after_vertex.is_subset(&before));
        assert!(vertex_stats.iterations <= MAX_MERGE_ITERATIONS);

        let face_stats = merge_face_islands(&mut vertices, &faces, &face_graph, 2, &palette());
        assert!(names(&vertices).is_subset(&after_vertex));
        assert!(face_stats.iterations <= MAX_MERGE_ITERATIONS);
    }

    #[test]
    fn test_default_face_min_size() {
        assert_eq!(default_face_min_size(1), 2);
        assert_eq!(default_face_min_size(5), 2);
        assert_eq!(default_face_min_size(7), 3);
        assert_eq!(default_face_min_size(9), 3);
        assert_eq!(default_face_min_size(10), 4);
    }
}
