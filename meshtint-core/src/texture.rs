//! RGBA pixel buffers

use crate::color::Color;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Pixels with an alpha below this value are treated as transparent (0.1 · 255).
pub const TRANSPARENT_ALPHA: f32 = 0.1 * 255.0;

/// Buffer length of a `width × height` RGBA8 texture, `None` on overflow
fn byte_len(width: usize, height: usize) -> Option<usize> {
    width.checked_mul(height).and_then(|pixels| pixels.checked_mul(4))
}

/// A row-major RGBA8 texture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Texture {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Texture {
    /// Wrap an RGBA8 buffer, checking that it holds exactly `width * height` pixels
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> Result<Self> {
        if byte_len(width, height) != Some(data.len()) {
            return Err(Error::TextureSize {
                len: data.len(),
                width,
                height,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A texture filled with one RGBA value
    pub fn filled(width: usize, height: usize, rgba: [u8; 4]) -> Result<Self> {
        let len = byte_len(width, height).ok_or_else(|| {
            Error::InvalidData(format!("Texture dimensions {}x{} overflow", width, height))
        })?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// RGBA of the pixel at linear index `index`
    pub fn pixel(&self, index: usize) -> [u8; 4] {
        let i = index * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    pub fn set_pixel(&mut self, index: usize, rgba: [u8; 4]) {
        let i = index * 4;
        self.data[i..i + 4].copy_from_slice(&rgba);
    }

    /// Unnamed color of the pixel at linear index `index`, alpha dropped
    pub fn color_at(&self, index: usize) -> Color {
        let [r, g, b, _] = self.pixel(index);
        Color::from_rgb8(r, g, b)
    }

    /// Whether the pixel is transparent enough to be ignored
    pub fn is_transparent(&self, index: usize) -> bool {
        (self.pixel(index)[3] as f32) < TRANSPARENT_ALPHA
    }
}
