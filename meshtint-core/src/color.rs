//! RGB colors, the weighted color distance and the default filament pool

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An RGB color with components in `[0, 1]` and an optional symbolic name.
///
/// Colors are plain values. Anything that stores a palette color in a vertex
/// clones it, so later edits to a palette entry never leak into vertices
/// that were already assigned.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub name: Option<String>,
}

impl Color {
    /// Create an unnamed color
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, name: None }
    }

    /// Create a named color
    pub fn named(r: f32, g: f32, b: f32, name: impl Into<String>) -> Self {
        Self {
            r,
            g,
            b,
            name: Some(name.into()),
        }
    }

    /// Create an unnamed color from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rrggbb` (or `#rrggbbaa`, alpha ignored). The leading `#` is optional.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if !(digits.len() == 6 || digits.len() == 8) || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(hex.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| Error::InvalidHex(hex.to_string()))
        };

        Ok(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Return the same color carrying `name`
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name of the color, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Weighted color distance `sqrt(2·Δr² + 4·Δg² + 3·Δb²)`.
    ///
    /// Green differences weigh most, then blue, then red. Every nearest-color
    /// decision in meshtint uses this metric.
    pub fn distance_to(&self, other: &Color) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (2.0 * dr * dr + 4.0 * dg * dg + 3.0 * db * db).sqrt()
    }

    /// Same RGB components, names ignored
    pub fn same_rgb(&self, other: &Color) -> bool {
        self.r == other.r && self.g == other.g && self.b == other.b
    }

    /// Channels scaled to `0..=255`, rounded
    pub fn to_rgb8(&self) -> [u8; 3] {
        [to_byte(self.r), to_byte(self.g), to_byte(self.b)]
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// Uppercase `#RRGGBBFF`, the form slicer project files expect
    pub fn to_hex_argb(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02X}{:02X}{:02X}FF", r, g, b)
    }
}

fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// The fixed catalog of filament colors offered to pool-based selection.
pub const COLOR_POOL: [(&str, f32, f32, f32); 13] = [
    ("white", 1.0, 1.0, 1.0),
    ("black", 0.0, 0.0, 0.0),
    ("red", 0.9, 0.1, 0.1),
    ("orange", 1.0, 0.5, 0.0),
    ("yellow", 1.0, 0.9, 0.0),
    ("green", 0.2, 0.7, 0.2),
    ("dark_brown", 0.35, 0.2, 0.1),
    ("light_brown", 0.65, 0.45, 0.25),
    ("cream", 0.96, 0.92, 0.82),
    ("dark_blue", 0.1, 0.2, 0.5),
    ("light_blue", 0.4, 0.7, 0.9),
    ("gray", 0.5, 0.5, 0.5),
    ("pink", 1.0, 0.6, 0.7),
];

/// The filament pool as named colors, in catalog order
pub fn default_color_pool() -> Vec<Color> {
    COLOR_POOL
        .iter()
        .map(|&(name, r, g, b)| Color::named(r, g, b, name))
        .collect()
}
