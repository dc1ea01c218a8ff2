//! K-means color clustering with k-means++ style seeding
//!
//! Clusters colors under the weighted color distance and returns the
//! centroids as a named palette. Two seeding policies are available:
//!
//! - [`Seeding::Deterministic`]: the first centroid is the sample closest to
//!   the global mean, each further centroid is the sample farthest from all
//!   centroids chosen so far (max-min greedy).
//! - [`Seeding::Random`]: classic k-means++ driven by a seeded PRNG. The
//!   first centroid is uniform, each further one is drawn with probability
//!   proportional to its squared distance to the nearest centroid.

use meshtint_core::{Color, Error, NearestColor, Palette, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Default iteration cap
pub const DEFAULT_MAX_ITERATIONS: usize = 20;

/// Centroids moving less than this (in color distance) count as converged
pub const DEFAULT_CONVERGENCE_THRESHOLD: f32 = 0.001;

/// Sample cap used when clustering mesh or texture colors
pub const DEFAULT_MAX_SAMPLES: usize = 10_000;

/// How initial centroids are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seeding {
    /// Mean-closest first centroid, then max-min distance greedy picks
    #[default]
    Deterministic,
    /// k-means++ weighted sampling from a PRNG seeded with `seed`
    Random { seed: u64 },
}

impl Seeding {
    /// Random seeding with a seed drawn from the thread RNG.
    ///
    /// Results are not reproducible; use `Random { seed }` when they must be.
    pub fn from_entropy() -> Self {
        Seeding::Random {
            seed: rand::random(),
        }
    }
}

/// How output centroids are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CentroidLabel {
    /// Sorted by cluster population, descending, named `color_1`, `color_2`, ...
    Population,
    /// Kept in seeding order, named by hex code
    Hex,
}

/// Configuration for k-means clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    pub max_iterations: usize,
    pub convergence_threshold: f32,
    pub seeding: Seeding,
    pub labels: CentroidLabel,
    /// Subsample inputs larger than this with a uniform stride
    pub max_samples: Option<usize>,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            seeding: Seeding::Deterministic,
            labels: CentroidLabel::Population,
            max_samples: None,
        }
    }
}

impl KMeansConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seeding(mut self, seeding: Seeding) -> Self {
        self.seeding = seeding;
        self
    }

    pub fn with_labels(mut self, labels: CentroidLabel) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_max_samples(mut self, max_samples: usize) -> Self {
        self.max_samples = Some(max_samples);
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_convergence_threshold(mut self, convergence_threshold: f32) -> Self {
        self.convergence_threshold = convergence_threshold;
        self
    }
}

/// Outcome of a clustering run
#[derive(Debug, Clone)]
pub struct KMeansResult {
    /// Named centroids
    pub palette: Palette,
    /// Number of samples assigned to each palette entry
    pub populations: Vec<usize>,
    /// Iterations actually run
    pub iterations: usize,
    /// Whether the run stopped before hitting the iteration cap
    pub converged: bool,
}

/// Take every `stride`-th color, `stride = max(1, floor(len / max_samples))`
pub fn subsample(colors: &[Color], max_samples: usize) -> Vec<Color> {
    if max_samples == 0 || colors.len() <= max_samples {
        return colors.to_vec();
    }
    let stride = (colors.len() / max_samples).max(1);
    colors.iter().step_by(stride).cloned().collect()
}

fn rgb_key(color: &Color) -> [u32; 3] {
    [color.r.to_bits(), color.g.to_bits(), color.b.to_bits()]
}

/// Distinct colors by RGB value, in first-seen order, with their multiplicity
fn distinct_colors(samples: &[Color]) -> (Vec<Color>, Vec<usize>) {
    let mut index: HashMap<[u32; 3], usize> = HashMap::new();
    let mut distinct = Vec::new();
    let mut counts = Vec::new();

    for sample in samples {
        let slot = *index.entry(rgb_key(sample)).or_insert_with(|| {
            distinct.push(Color::new(sample.r, sample.g, sample.b));
            counts.push(0);
            distinct.len() - 1
        });
        counts[slot] += 1;
    }

    (distinct, counts)
}

fn mean_color(colors: &[Color]) -> Color {
    let n = colors.len() as f64;
    let (r, g, b) = colors.iter().fold((0.0f64, 0.0f64, 0.0f64), |acc, c| {
        (acc.0 + c.r as f64, acc.1 + c.g as f64, acc.2 + c.b as f64)
    });
    Color::new((r / n) as f32, (g / n) as f32, (b / n) as f32)
}

/// Distance from each sample to its nearest centroid
fn nearest_centroid_distances(samples: &[Color], centroids: &[Color]) -> Vec<f32> {
    samples
        .iter()
        .map(|s| {
            centroids
                .nearest_with_distance(s)
                .map_or(f32::INFINITY, |(_, d)| d)
        })
        .collect()
}

fn seed_deterministic(samples: &[Color], k: usize) -> Vec<Color> {
    let mean = mean_color(samples);
    let first = samples.nearest_index(&mean).unwrap_or(0);
    let mut centroids = vec![Color::new(samples[first].r, samples[first].g, samples[first].b)];

    while centroids.len() < k {
        let distances = nearest_centroid_distances(samples, &centroids);

        let mut max_min_dist = -1.0f32;
        let mut best = 0;
        for (i, &d) in distances.iter().enumerate() {
            if d > max_min_dist {
                max_min_dist = d;
                best = i;
            }
        }

        // Every sample already coincides with a centroid
        if max_min_dist <= 0.0 {
            break;
        }
        centroids.push(Color::new(samples[best].r, samples[best].g, samples[best].b));
    }

    centroids
}

fn seed_random(samples: &[Color], k: usize, seed: u64) -> Vec<Color> {
    let mut rng = StdRng::seed_from_u64(seed);
    let first = rng.gen_range(0..samples.len());
    let mut centroids = vec![Color::new(samples[first].r, samples[first].g, samples[first].b)];

    while centroids.len() < k {
        let weights: Vec<f32> = nearest_centroid_distances(samples, &centroids)
            .into_iter()
            .map(|d| d * d)
            .collect();

        // All weights zero: nothing left to spread towards
        let Ok(dist) = WeightedIndex::new(&weights) else {
            break;
        };
        let pick = dist.sample(&mut rng);
        centroids.push(Color::new(samples[pick].r, samples[pick].g, samples[pick].b));
    }

    centroids
}

/// Name centroids and order them according to `labels`
fn label_centroids(
    centroids: Vec<Color>,
    populations: Vec<usize>,
    labels: CentroidLabel,
) -> (Palette, Vec<usize>) {
    match labels {
        CentroidLabel::Population => {
            let mut order: Vec<usize> = (0..centroids.len()).collect();
            order.sort_by(|&a, &b| populations[b].cmp(&populations[a]));

            let palette = order
                .iter()
                .enumerate()
                .map(|(rank, &i)| centroids[i].clone().with_name(format!("color_{}", rank + 1)))
                .collect();
            let populations = order.iter().map(|&i| populations[i]).collect();
            (palette, populations)
        }
        CentroidLabel::Hex => {
            let mut used: HashSet<String> = HashSet::new();
            let palette = centroids
                .into_iter()
                .map(|c| {
                    let hex = c.to_hex();
                    let mut name = hex.clone();
                    let mut suffix = 2;
                    while !used.insert(name.clone()) {
                        name = format!("{}-{}", hex, suffix);
                        suffix += 1;
                    }
                    c.with_name(name)
                })
                .collect();
            (palette, populations)
        }
    }
}

/// Cluster `colors` into at most `count` representative colors.
///
/// With fewer distinct input colors than `count`, every distinct color is
/// returned as its own cluster. Otherwise centroids are seeded per
/// `config.seeding` and refined by Lloyd iterations: assign each sample to
/// its nearest centroid, move each centroid to the mean of its samples
/// (empty clusters keep their centroid). The loop stops when assignments
/// stop changing, when no centroid moves more than the convergence
/// threshold, or at `max_iterations`.
///
/// Centroids may coincide; distinctness of the output is not guaranteed.
pub fn kmeans_palette(colors: &[Color], count: usize, config: &KMeansConfig) -> Result<KMeansResult> {
    if count == 0 {
        return Err(Error::InvalidData("Color count must be positive".to_string()));
    }
    if colors.is_empty() {
        return Err(Error::NoColors);
    }

    let samples = match config.max_samples {
        Some(max) => subsample(colors, max),
        None => colors.to_vec(),
    };

    let (distinct, multiplicity) = distinct_colors(&samples);
    if distinct.len() < count {
        log::debug!(
            "Only {} distinct colors for {} clusters, using them directly",
            distinct.len(),
            count
        );
        let (palette, populations) = label_centroids(distinct, multiplicity, config.labels);
        return Ok(KMeansResult {
            palette,
            populations,
            iterations: 0,
            converged: true,
        });
    }

    let mut centroids = match config.seeding {
        Seeding::Deterministic => seed_deterministic(&samples, count),
        Seeding::Random { seed } => seed_random(&samples, count, seed),
    };

    let mut assignments = vec![usize::MAX; samples.len()];
    let mut iterations = 0;
    let mut converged = false;

    for iter in 0..config.max_iterations {
        iterations = iter + 1;

        let mut changed = false;
        for (sample, assigned) in samples.iter().zip(assignments.iter_mut()) {
            let nearest = centroids.nearest_index(sample).unwrap_or(0);
            if *assigned != nearest {
                *assigned = nearest;
                changed = true;
            }
        }

        if iter > 0 && !changed {
            converged = true;
            break;
        }

        let mut sums = vec![(0.0f64, 0.0f64, 0.0f64, 0usize); centroids.len()];
        for (sample, &cluster) in samples.iter().zip(assignments.iter()) {
            let s = &mut sums[cluster];
            s.0 += sample.r as f64;
            s.1 += sample.g as f64;
            s.2 += sample.b as f64;
            s.3 += 1;
        }

        let mut max_shift = 0.0f32;
        for (centroid, &(r, g, b, n)) in centroids.iter_mut().zip(sums.iter()) {
            if n == 0 {
                continue;
            }
            let n = n as f64;
            let updated = Color::new((r / n) as f32, (g / n) as f32, (b / n) as f32);
            max_shift = max_shift.max(centroid.distance_to(&updated));
            *centroid = updated;
        }

        if max_shift <= config.convergence_threshold {
            converged = true;
            break;
        }
    }

    let mut populations = vec![0usize; centroids.len()];
    for &cluster in &assignments {
        if cluster < populations.len() {
            populations[cluster] += 1;
        }
    }

    log::debug!(
        "k-means: {} centroids from {} samples after {} iterations (converged: {})",
        centroids.len(),
        samples.len(),
        iterations,
        converged
    );

    let (palette, populations) = label_centroids(centroids, populations, config.labels);
    Ok(KMeansResult {
        palette,
        populations,
        iterations,
        converged,
    })
}

/// K-means palette over mesh vertex colors, subsampled to at most
/// [`DEFAULT_MAX_SAMPLES`] and named by hex code
pub fn extract_vertex_palette(colors: &[Color], count: usize) -> Result<Palette> {
    let config = KMeansConfig::default()
        .with_labels(CentroidLabel::Hex)
        .with_max_samples(DEFAULT_MAX_SAMPLES);
    Ok(kmeans_palette(colors, count, &config)?.palette)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_blobs() -> Vec<Color> {
        let mut colors = Vec::new();
        for i in 0..20 {
            let jitter = i as f32 * 0.002;
            colors.push(Color::new(0.9 - jitter, 0.1, 0.1));
            colors.push(Color::new(0.1, 0.2 + jitter, 0.8));
        }
        colors
    }

    #[test]
    fn test_single_cluster_is_mean() {
        let colors = vec![
            Color::new(0.0, 0.0, 0.0),
            Color::new(1.0, 0.5, 0.2),
            Color::new(0.4, 0.9, 0.6),
            Color::new(0.2, 0.2, 0.8),
        ];
        let result = kmeans_palette(&colors, 1, &KMeansConfig::default()).unwrap();
        let c = &result.palette.colors()[0];

        assert_eq!(result.palette.len(), 1);
        assert_relative_eq!(c.r, 0.4, epsilon = 1e-5);
        assert_relative_eq!(c.g, 0.4, epsilon = 1e-5);
        assert_relative_eq!(c.b, 0.4, epsilon = 1e-5);
        assert_eq!(result.populations, vec![4]);
        assert!(result.converged);
    }

    #[test]
    fn test_two_blobs_separate() {
        let result = kmeans_palette(&two_blobs(), 2, &KMeansConfig::default()).unwrap();
        assert_eq!(result.palette.len(), 2);
        assert_eq!(result.populations, vec![20, 20]);

        let reds = result.palette.iter().filter(|c| c.r > 0.5).count();
        assert_eq!(reds, 1);
    }

    /// Two spread-out clusters whose seeds sit away from the cluster means
    fn spread_clusters() -> Vec<Color> {
        vec![
            Color::new(0.6, 0.0, 0.0),
            Color::new(0.8, 0.0, 0.0),
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 0.0, 0.6),
            Color::new(0.0, 0.0, 0.8),
            Color::new(0.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_stops_at_iteration_cap() {
        let config = KMeansConfig::default().with_max_iterations(1);
        let result = kmeans_palette(&spread_clusters(), 2, &config).unwrap();

        assert_eq!(result.iterations, 1);
        assert!(!result.converged);
        assert_eq!(result.populations, vec![3, 3]);

        // Without the cap the run settles one iteration later
        let result = kmeans_palette(&spread_clusters(), 2, &KMeansConfig::default()).unwrap();
        assert_eq!(result.iterations, 2);
        assert!(result.converged);
    }

    #[test]
    fn test_stops_on_small_centroid_shift() {
        // The sample closest to the mean is the mean, so the first update moves nothing
        let colors = vec![
            Color::new(0.2, 0.2, 0.2),
            Color::new(0.4, 0.4, 0.4),
            Color::new(0.6, 0.6, 0.6),
        ];
        let result = kmeans_palette(&colors, 1, &KMeansConfig::default()).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(result.converged);

        // A loose threshold ends the run after the first update as well
        let config = KMeansConfig::default().with_convergence_threshold(1.0);
        let result = kmeans_palette(&spread_clusters(), 2, &config).unwrap();
        assert_eq!(result.iterations, 1);
        assert!(result.converged);
    }

    #[test]
    fn test_default_seeding_is_deterministic() {
        assert_eq!(Seeding::default(), Seeding::Deterministic);
        assert_eq!(KMeansConfig::default().seeding, Seeding::Deterministic);
    }

    #[test]
    fn test_fewer_distinct_than_requested() {
        let colors = vec![
            Color::new(1.0, 0.0, 0.0),
            Color::new(1.0, 0.0, 0.0),
            Color::new(0.0, 0.0, 1.0),
        ];
        let result = kmeans_palette(&colors, 5, &KMeansConfig::default()).unwrap();
        assert_eq!(result.palette.len(), 2);
        assert_eq!(result.populations, vec![2, 1]);
        assert_eq!(result.palette.colors()[0].name(), Some("color_1"));
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = KMeansConfig::default().with_seeding(Seeding::Random { seed: 42 });
        let a = kmeans_palette(&two_blobs(), 2, &config).unwrap();
        let b = kmeans_palette(&two_blobs(), 2, &config).unwrap();
        assert_eq!(a.palette, b.palette);
        assert_eq!(a.populations.iter().sum::<usize>(), 40);
    }

    #[test]
    fn test_hex_labels_are_unique() {
        let colors = vec![
            Color::new(0.5, 0.5, 0.5),
            Color::new(0.5, 0.5, 0.5),
            Color::new(0.5, 0.5, 0.501),
        ];
        let centroids = vec![colors[0].clone(), colors[2].clone()];
        let (palette, _) = label_centroids(centroids, vec![2, 1], CentroidLabel::Hex);
        let names: Vec<_> = palette.names().collect();
        assert_eq!(names, vec!["#808080", "#808080-2"]);
    }

    #[test]
    fn test_subsample_stride() {
        let colors: Vec<Color> = (0..25).map(|i| Color::new(i as f32 / 25.0, 0.0, 0.0)).collect();
        assert_eq!(subsample(&colors, 10).len(), 13);
        assert_eq!(subsample(&colors, 100).len(), 25);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            kmeans_palette(&[], 3, &KMeansConfig::default()).unwrap_err(),
            Error::NoColors
        );
        assert!(kmeans_palette(&two_blobs(), 0, &KMeansConfig::default()).is_err());
    }

    #[test]
    fn test_extract_vertex_palette_names_by_hex() {
        let palette = extract_vertex_palette(&two_blobs(), 2).unwrap();
        for color in palette.iter() {
            assert_eq!(color.name(), Some(color.to_hex().as_str()));
        }
    }
}
