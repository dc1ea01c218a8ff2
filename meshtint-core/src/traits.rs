//! Core traits for meshtint

use crate::color::Color;

/// Nearest-color lookup over an ordered set of candidate colors
pub trait NearestColor {
    /// Index of the candidate closest to `color`.
    ///
    /// Candidates are scanned in order and only a strictly smaller distance
    /// replaces the current best, so the earliest candidate wins ties.
    /// Returns `None` when there are no candidates.
    fn nearest_index(&self, color: &Color) -> Option<usize>;

    /// Index and distance of the closest candidate
    fn nearest_with_distance(&self, color: &Color) -> Option<(usize, f32)>;
}

impl NearestColor for [Color] {
    fn nearest_index(&self, color: &Color) -> Option<usize> {
        self.nearest_with_distance(color).map(|(index, _)| index)
    }

    fn nearest_with_distance(&self, color: &Color) -> Option<(usize, f32)> {
        if self.is_empty() {
            return None;
        }

        let mut best_index = 0;
        let mut best_dist = f32::INFINITY;
        for (i, candidate) in self.iter().enumerate() {
            let dist = color.distance_to(candidate);
            if dist < best_dist {
                best_dist = dist;
                best_index = i;
            }
        }
        Some((best_index, best_dist))
    }
}

impl NearestColor for Vec<Color> {
    fn nearest_index(&self, color: &Color) -> Option<usize> {
        self.as_slice().nearest_index(color)
    }

    fn nearest_with_distance(&self, color: &Color) -> Option<(usize, f32)> {
        self.as_slice().nearest_with_distance(color)
    }
}
