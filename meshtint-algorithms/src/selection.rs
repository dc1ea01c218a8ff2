//! Palette selection strategies
//!
//! Each strategy reduces a set of observed vertex colors to at most `count`
//! representative colors:
//! - Frequency matching against a named pool
//! - Greedy coverage of a named pool
//! - K-means clustering (pool-free, see [`crate::kmeans`])
//! - Single-pass similarity clustering (pool-free)
//! - User-picked colors taken verbatim

use crate::kmeans::{kmeans_palette, KMeansConfig};
use crate::PaletteSelector;
use meshtint_core::{Color, Error, NearestColor, Palette, Result};

/// Colors closer than this join the same similarity cluster
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 1.0;

fn check_inputs(colors: &[Color], count: usize) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidData("Color count must be positive".to_string()));
    }
    if colors.is_empty() {
        return Err(Error::NoColors);
    }
    Ok(())
}

fn check_pool(pool: &[Color]) -> Result<()> {
    if pool.is_empty() {
        return Err(Error::InvalidData("Color pool is empty".to_string()));
    }
    Ok(())
}

/// Copy of `color` for a palette: unnamed colors are named by hex code
fn palette_entry(color: &Color) -> Color {
    match color.name {
        Some(_) => color.clone(),
        None => color.clone().with_name(color.to_hex()),
    }
}

/// Pick the `count` pool colors that most vertex colors are nearest to.
///
/// Every vertex color votes for its nearest pool color (earliest pool entry
/// on ties). Pool colors are ranked by votes, descending, with pool order
/// kept among equal counts. Colors with no votes are never returned, so the
/// palette may be shorter than `count`. Unnamed pool colors are named by hex
/// code.
pub fn select_colors_by_frequency(colors: &[Color], pool: &[Color], count: usize) -> Result<Palette> {
    check_inputs(colors, count)?;
    check_pool(pool)?;

    let mut matches = vec![0usize; pool.len()];
    for color in colors {
        if let Some(nearest) = pool.nearest_index(color) {
            matches[nearest] += 1;
        }
    }

    let mut ranked: Vec<usize> = (0..pool.len()).collect();
    ranked.sort_by(|&a, &b| matches[b].cmp(&matches[a]));

    log::info!("Color distribution:");
    for &i in ranked.iter().filter(|&&i| matches[i] > 0) {
        log::info!("  {}: {} vertices", pool[i].name().unwrap_or("?"), matches[i]);
    }

    Ok(ranked
        .into_iter()
        .filter(|&i| matches[i] > 0)
        .take(count)
        .map(|i| palette_entry(&pool[i]))
        .collect())
}

/// Nearest pool index among the unselected entries, earliest on ties
fn nearest_unselected(color: &Color, pool: &[Color], selected: &[bool]) -> Option<usize> {
    let mut best = None;
    let mut best_dist = f32::INFINITY;
    for (i, candidate) in pool.iter().enumerate() {
        if selected[i] {
            continue;
        }
        let dist = color.distance_to(candidate);
        if dist < best_dist {
            best_dist = dist;
            best = Some(i);
        }
    }
    best
}

/// Pick pool colors one at a time by remaining coverage.
///
/// Each vertex color starts assigned to its nearest pool color. Each round
/// picks the unselected pool color covering the most vertex colors (lowest
/// pool index on ties, and the lowest unselected index once nothing is
/// covered), then moves the vertex colors it covered to their nearest
/// still-unselected pool color. With at least `count` pool colors exactly
/// `count` distinct colors are returned, in pick order. Unnamed pool colors
/// are named by hex code.
pub fn select_colors_greedy(colors: &[Color], pool: &[Color], count: usize) -> Result<Palette> {
    check_inputs(colors, count)?;
    check_pool(pool)?;

    let mut selected = vec![false; pool.len()];
    let mut assignment: Vec<Option<usize>> = colors
        .iter()
        .map(|c| nearest_unselected(c, pool, &selected))
        .collect();
    let mut palette = Palette::new();

    while palette.len() < count && palette.len() < pool.len() {
        let mut coverage = vec![0usize; pool.len()];
        for &i in assignment.iter().flatten() {
            coverage[i] += 1;
        }

        let mut pick: Option<usize> = None;
        for i in (0..pool.len()).filter(|&i| !selected[i]) {
            match pick {
                Some(best) if coverage[i] <= coverage[best] => {}
                _ => pick = Some(i),
            }
        }
        let Some(pick) = pick else {
            break;
        };

        log::debug!(
            "Greedy pick {}: {} covering {} vertices",
            palette.len() + 1,
            pool[pick].name().unwrap_or("?"),
            coverage[pick]
        );

        selected[pick] = true;
        palette.push(palette_entry(&pool[pick]));

        for (color, assigned) in colors.iter().zip(assignment.iter_mut()) {
            if *assigned == Some(pick) {
                *assigned = nearest_unselected(color, pool, &selected);
            }
        }
    }

    Ok(palette)
}

/// Single-pass similarity clustering without a pool.
///
/// Colors are visited in order. Each joins the first cluster whose running
/// mean is closer than `threshold`, otherwise it opens a new cluster. The
/// `count` most populated clusters are returned as `color_1`, `color_2`, ...
pub fn select_colors_by_similarity(colors: &[Color], count: usize, threshold: f32) -> Result<Palette> {
    check_inputs(colors, count)?;

    let mut clusters: Vec<(Color, usize)> = Vec::new();
    for color in colors {
        match clusters
            .iter_mut()
            .find(|(representative, _)| color.distance_to(representative) < threshold)
        {
            Some((representative, n)) => {
                *n += 1;
                let n = *n as f32;
                representative.r = (representative.r * (n - 1.0) + color.r) / n;
                representative.g = (representative.g * (n - 1.0) + color.g) / n;
                representative.b = (representative.b * (n - 1.0) + color.b) / n;
            }
            None => clusters.push((Color::new(color.r, color.g, color.b), 1)),
        }
    }

    clusters.sort_by(|a, b| b.1.cmp(&a.1));

    log::info!("Color clusters found: {}", clusters.len());
    for (i, (representative, n)) in clusters.iter().take(count + 3).enumerate() {
        log::info!("  Cluster {}: {} vertices ({})", i + 1, n, representative.to_hex());
    }

    Ok(clusters
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, (representative, _))| representative.with_name(format!("color_{}", i + 1)))
        .collect())
}

/// Map each extracted color to its nearest pool color not used yet.
///
/// The result has no duplicates and holds `min(extracted, pool)` colors.
pub fn match_to_pool(extracted: &[Color], pool: &[Color]) -> Palette {
    let mut used = vec![false; pool.len()];
    let mut palette = Palette::new();

    for color in extracted {
        if let Some(i) = nearest_unselected(color, pool, &used) {
            used[i] = true;
            palette.push(palette_entry(&pool[i]));
        }
    }

    palette
}

/// Most-matched pool colors
#[derive(Debug, Clone)]
pub struct FrequencySelector {
    pub pool: Vec<Color>,
}

impl PaletteSelector for FrequencySelector {
    fn select(&self, colors: &[Color], count: usize) -> Result<Palette> {
        select_colors_by_frequency(colors, &self.pool, count)
    }

    fn name(&self) -> &'static str {
        "frequency"
    }
}

/// Greedy coverage over pool colors
#[derive(Debug, Clone)]
pub struct GreedyCoverageSelector {
    pub pool: Vec<Color>,
}

impl PaletteSelector for GreedyCoverageSelector {
    fn select(&self, colors: &[Color], count: usize) -> Result<Palette> {
        select_colors_greedy(colors, &self.pool, count)
    }

    fn name(&self) -> &'static str {
        "greedy-coverage"
    }
}

/// Pool-free k-means clustering
#[derive(Debug, Clone, Default)]
pub struct KMeansSelector {
    pub config: KMeansConfig,
}

impl PaletteSelector for KMeansSelector {
    fn select(&self, colors: &[Color], count: usize) -> Result<Palette> {
        Ok(kmeans_palette(colors, count, &self.config)?.palette)
    }

    fn name(&self) -> &'static str {
        "kmeans"
    }
}

/// Pool-free similarity clustering
#[derive(Debug, Clone)]
pub struct SimilaritySelector {
    pub threshold: f32,
}

impl Default for SimilaritySelector {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl PaletteSelector for SimilaritySelector {
    fn select(&self, colors: &[Color], count: usize) -> Result<Palette> {
        select_colors_by_similarity(colors, count, self.threshold)
    }

    fn name(&self) -> &'static str {
        "similarity"
    }
}

/// The first `count` user-picked colors, ignoring the mesh colors.
///
/// Unnamed picks are named by hex code. Since the mesh colors are not
/// consulted, an empty `colors` argument is not an error here; an empty
/// pick list is [`Error::EmptyPalette`].
#[derive(Debug, Clone)]
pub struct PickedSelector {
    pub colors: Vec<Color>,
}

impl PaletteSelector for PickedSelector {
    fn select(&self, _colors: &[Color], count: usize) -> Result<Palette> {
        if self.colors.is_empty() {
            return Err(Error::EmptyPalette);
        }
        Ok(self
            .colors
            .iter()
            .take(count)
            .map(palette_entry)
            .collect())
    }

    fn name(&self) -> &'static str {
        "picked"
    }
}
