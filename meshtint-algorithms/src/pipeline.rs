//! End-to-end color reduction pipeline
//!
//! Runs the full reduction on a mesh in place: select a palette from the
//! vertex colors, snap every vertex to it, then merge small vertex and face
//! islands. Topology is never modified.

use crate::adjacency::{build_face_adjacency, build_vertex_adjacency};
use crate::islands::{default_face_min_size, merge_face_islands, merge_small_islands, MergeStats};
use crate::kmeans::{KMeansConfig, DEFAULT_MAX_SAMPLES};
use crate::remap::remap_colors;
use crate::selection::{
    FrequencySelector, GreedyCoverageSelector, KMeansSelector, PickedSelector, SimilaritySelector,
    DEFAULT_SIMILARITY_THRESHOLD,
};
use crate::PaletteSelector;
use meshtint_core::{default_color_pool, Color, ColoredMesh, Error, Palette, Result};
use serde::{Deserialize, Serialize};

/// How the palette is chosen from the mesh colors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// Most-matched colors of a named pool
    Frequency { pool: Vec<Color> },
    /// Greedy coverage of a named pool
    GreedyCoverage { pool: Vec<Color> },
    /// Pool-free k-means clustering
    KMeans(KMeansConfig),
    /// Pool-free single-pass similarity clustering
    Similarity { threshold: f32 },
    /// User-picked colors, taken verbatim
    Picked(Vec<Color>),
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        SelectionStrategy::Frequency {
            pool: default_color_pool(),
        }
    }
}

impl SelectionStrategy {
    /// K-means with the sample cap used for whole meshes
    pub fn kmeans() -> Self {
        SelectionStrategy::KMeans(KMeansConfig::default().with_max_samples(DEFAULT_MAX_SAMPLES))
    }

    pub fn similarity() -> Self {
        SelectionStrategy::Similarity {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }

    /// Selector implementing this strategy
    pub fn selector(&self) -> Box<dyn PaletteSelector> {
        match self {
            SelectionStrategy::Frequency { pool } => Box::new(FrequencySelector { pool: pool.clone() }),
            SelectionStrategy::GreedyCoverage { pool } => {
                Box::new(GreedyCoverageSelector { pool: pool.clone() })
            }
            SelectionStrategy::KMeans(config) => Box::new(KMeansSelector {
                config: config.clone(),
            }),
            SelectionStrategy::Similarity { threshold } => Box::new(SimilaritySelector {
                threshold: *threshold,
            }),
            SelectionStrategy::Picked(colors) => Box::new(PickedSelector {
                colors: colors.clone(),
            }),
        }
    }
}

/// Configuration for [`ColorReducer`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionConfig {
    /// Target palette size
    pub num_colors: usize,
    /// Vertex islands smaller than this are merged
    pub island_threshold: usize,
    pub strategy: SelectionStrategy,
    /// Face islands smaller than this are merged (None: derived from `island_threshold`)
    pub face_min_size: Option<usize>,
    pub merge_vertex_islands: bool,
    pub merge_face_islands: bool,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            num_colors: 4,
            island_threshold: 5,
            strategy: SelectionStrategy::default(),
            face_min_size: None,
            merge_vertex_islands: true,
            merge_face_islands: true,
        }
    }
}

impl ReductionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_num_colors(mut self, num_colors: usize) -> Self {
        self.num_colors = num_colors;
        self
    }

    pub fn with_island_threshold(mut self, island_threshold: usize) -> Self {
        self.island_threshold = island_threshold;
        self
    }

    pub fn with_strategy(mut self, strategy: SelectionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_face_min_size(mut self, face_min_size: usize) -> Self {
        self.face_min_size = Some(face_min_size);
        self
    }

    /// Enable or disable both island merging passes
    pub fn with_island_merging(mut self, enabled: bool) -> Self {
        self.merge_vertex_islands = enabled;
        self.merge_face_islands = enabled;
        self
    }

    /// Effective face min island size
    pub fn face_min_size(&self) -> usize {
        self.face_min_size
            .unwrap_or_else(|| default_face_min_size(self.island_threshold))
    }
}

/// Checkpoints reported to a progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStage {
    BuildingGraphs,
    SelectingPalette,
    Remapping,
    MergingVertexIslands,
    MergingFaceIslands,
    Finalizing,
    Done,
}

impl ProgressStage {
    /// Overall completion percentage when this stage starts
    pub fn percent(&self) -> u8 {
        match self {
            ProgressStage::BuildingGraphs => 20,
            ProgressStage::SelectingPalette => 30,
            ProgressStage::Remapping => 50,
            ProgressStage::MergingVertexIslands => 60,
            ProgressStage::MergingFaceIslands => 80,
            ProgressStage::Finalizing => 90,
            ProgressStage::Done => 100,
        }
    }
}

/// Summary of a reduction run
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionReport {
    pub palette: Palette,
    /// Vertices per palette color, in palette order, zero counts included
    pub distribution: Vec<(String, usize)>,
    /// Vertex recolorings from the vertex island pass
    pub vertex_merged: usize,
    /// Vertex recolorings from the face island pass
    pub face_merged: usize,
}

/// Reduces the vertex colors of a mesh to a small printable palette
#[derive(Debug, Clone, Default)]
pub struct ColorReducer {
    config: ReductionConfig,
}

impl ColorReducer {
    /// Create a reducer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReductionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Reduce `mesh` in place
    pub fn reduce(&self, mesh: &mut ColoredMesh) -> Result<ReductionReport> {
        self.reduce_with_progress(mesh, |_, _| {})
    }

    /// Reduce `mesh` in place, reporting each stage to `progress`.
    ///
    /// The mesh is validated before anything is touched, so on error the
    /// colors are unchanged unless the failure happens after remapping.
    pub fn reduce_with_progress<F>(&self, mesh: &mut ColoredMesh, mut progress: F) -> Result<ReductionReport>
    where
        F: FnMut(ProgressStage, u8),
    {
        let mut notify = |stage: ProgressStage| progress(stage, stage.percent());

        mesh.validate()?;
        log::info!("Reducing mesh: {} vertices, {} faces", mesh.vertex_count(), mesh.face_count());

        notify(ProgressStage::BuildingGraphs);
        let vertex_adjacency = build_vertex_adjacency(mesh.vertex_count(), &mesh.faces);

        let colors = mesh.vertex_colors();
        if colors.is_empty() {
            return Err(Error::NoColors);
        }

        notify(ProgressStage::SelectingPalette);
        let selector = self.config.strategy.selector();
        log::info!(
            "Selecting {} colors with the {} strategy",
            self.config.num_colors,
            selector.name()
        );
        let palette = selector.select(&colors, self.config.num_colors)?;
        if palette.is_empty() {
            return Err(Error::EmptyPalette);
        }
        log::info!("Selected palette: {}", palette.names().collect::<Vec<_>>().join(", "));

        notify(ProgressStage::Remapping);
        remap_colors(&mut mesh.vertices, &palette)?;

        notify(ProgressStage::MergingVertexIslands);
        let vertex_stats = if self.config.merge_vertex_islands {
            merge_small_islands(
                &mut mesh.vertices,
                &vertex_adjacency,
                self.config.island_threshold,
                &palette,
            )
        } else {
            MergeStats::default()
        };

        notify(ProgressStage::MergingFaceIslands);
        let face_stats = if self.config.merge_face_islands {
            let face_adjacency = build_face_adjacency(&mesh.faces);
            merge_face_islands(
                &mut mesh.vertices,
                &mesh.faces,
                &face_adjacency,
                self.config.face_min_size(),
                &palette,
            )
        } else {
            MergeStats::default()
        };

        notify(ProgressStage::Finalizing);
        let distribution = mesh.color_distribution(&palette);
        log::info!("Final color distribution:");
        for (name, count) in &distribution {
            log::info!("  {}: {} vertices", name, count);
        }

        notify(ProgressStage::Done);
        Ok(ReductionReport {
            palette,
            distribution,
            vertex_merged: vertex_stats.merged,
            face_merged: face_stats.merged,
        })
    }
}
