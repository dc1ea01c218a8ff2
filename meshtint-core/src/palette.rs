//! Ordered palettes of named colors

use crate::color::Color;
use crate::traits::NearestColor;
use serde::{Deserialize, Serialize};

/// An ordered set of representative colors.
///
/// Entries are looked up by name, which is the single canonical key used
/// by island merging and distribution reports. Order matters only for
/// display and slot assignment downstream.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    /// Create an empty palette
    pub fn new() -> Self {
        Self { colors: Vec::new() }
    }

    /// Create a palette from colors, keeping their order
    pub fn from_colors(colors: Vec<Color>) -> Self {
        Self { colors }
    }

    /// Get the number of colors
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Check if the palette is empty
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Color> {
        self.colors.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Color> {
        self.colors.get(index)
    }

    /// Find the entry carrying `name`
    pub fn find(&self, name: &str) -> Option<&Color> {
        self.colors.iter().find(|c| c.name() == Some(name))
    }

    /// Check whether an entry carries `name`
    pub fn contains_name(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Entry names in palette order; unnamed entries are skipped
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().filter_map(|c| c.name())
    }

    /// Closest entry to `color` (earliest wins ties)
    pub fn nearest(&self, color: &Color) -> Option<&Color> {
        self.colors
            .nearest_index(color)
            .map(|index| &self.colors[index])
    }

    pub fn push(&mut self, color: Color) {
        self.colors.push(color);
    }

    pub fn truncate(&mut self, len: usize) {
        self.colors.truncate(len);
    }

    pub fn into_colors(self) -> Vec<Color> {
        self.colors
    }
}

impl NearestColor for Palette {
    fn nearest_index(&self, color: &Color) -> Option<usize> {
        self.colors.nearest_index(color)
    }

    fn nearest_with_distance(&self, color: &Color) -> Option<(usize, f32)> {
        self.colors.nearest_with_distance(color)
    }
}

impl From<Vec<Color>> for Palette {
    fn from(colors: Vec<Color>) -> Self {
        Self::from_colors(colors)
    }
}

impl FromIterator<Color> for Palette {
    fn from_iter<I: IntoIterator<Item = Color>>(iter: I) -> Self {
        Self::from_colors(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Color;
    type IntoIter = std::slice::Iter<'a, Color>;

    fn into_iter(self) -> Self::IntoIter {
        self.colors.iter()
    }
}
