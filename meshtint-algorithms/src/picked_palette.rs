//! User-picked palettes
//!
//! Colors picked by hand (for instance with an eyedropper over the model)
//! and later handed to [`crate::selection::PickedSelector`] or
//! [`crate::texture::TextureSource::Picked`].

use meshtint_core::{Color, Palette};
use serde::{Deserialize, Serialize};

/// Picks closer than this to an existing pick are rejected as duplicates
pub const COLOR_TOLERANCE: f32 = 0.05;

/// An ordered list of picked colors without near-duplicates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PickedPalette {
    colors: Vec<Color>,
}

impl PickedPalette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a color unless it is within [`COLOR_TOLERANCE`] of an existing pick.
    ///
    /// Unnamed colors are named by their hex code. Returns whether the color
    /// was added.
    pub fn add(&mut self, color: Color) -> bool {
        if self
            .colors
            .iter()
            .any(|existing| existing.distance_to(&color) < COLOR_TOLERANCE)
        {
            log::debug!("Skipping {}: already picked", color.to_hex());
            return false;
        }

        let color = match color.name {
            Some(_) => color,
            None => {
                let hex = color.to_hex();
                color.with_name(hex)
            }
        };
        self.colors.push(color);
        true
    }

    /// Remove the pick at `index`, if any
    pub fn remove(&mut self, index: usize) -> Option<Color> {
        (index < self.colors.len()).then(|| self.colors.remove(index))
    }

    pub fn clear(&mut self) {
        self.colors.clear();
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn to_palette(&self) -> Palette {
        Palette::from_colors(self.colors.clone())
    }
}

impl From<PickedPalette> for Vec<Color> {
    fn from(picked: PickedPalette) -> Self {
        picked.colors
    }
}
