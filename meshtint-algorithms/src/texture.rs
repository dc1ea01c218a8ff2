//! Texture palette extraction and quantization
//!
//! Used for textured models whose colors are baked into vertices from a
//! texture: the texture is clustered to a small palette first, then every
//! opaque pixel is snapped to it.

use crate::kmeans::{kmeans_palette, CentroidLabel, KMeansConfig, DEFAULT_MAX_SAMPLES};
use crate::selection::{match_to_pool, PickedSelector};
use crate::PaletteSelector;
use meshtint_core::{Color, Error, NearestColor, Palette, Result, Texture};

/// Where the quantization palette comes from
#[derive(Debug, Clone)]
pub enum TextureSource {
    /// User-picked colors, first `count` used verbatim
    Picked(Vec<Color>),
    /// Extracted colors matched to the nearest unused pool colors
    Pool(Vec<Color>),
    /// Extracted colors used directly
    Extracted,
}

/// A quantized texture with the palette it was snapped to
#[derive(Debug, Clone)]
pub struct QuantizedTexture {
    pub texture: Texture,
    pub palette: Palette,
}

/// Opaque pixel colors sampled with a uniform stride.
///
/// The stride is `max(1, floor(pixels / max_samples))`; pixels with alpha
/// below `0.1 · 255` are skipped.
pub fn sample_texture_colors(texture: &Texture, max_samples: usize) -> Vec<Color> {
    let total = texture.pixel_count();
    let stride = (total / max_samples.max(1)).max(1);

    (0..total)
        .step_by(stride)
        .filter(|&i| !texture.is_transparent(i))
        .map(|i| texture.color_at(i))
        .collect()
}

/// Cluster a texture into at most `count` hex-named colors.
///
/// A texture with no opaque pixels yields a single white color.
pub fn extract_texture_palette(texture: &Texture, count: usize, config: &KMeansConfig) -> Result<Palette> {
    let samples = sample_texture_colors(texture, DEFAULT_MAX_SAMPLES);
    if samples.is_empty() {
        log::warn!("Texture has no opaque pixels, falling back to white");
        let white = Color::new(1.0, 1.0, 1.0);
        let name = white.to_hex();
        return Ok(Palette::from_colors(vec![white.with_name(name)]));
    }

    let config = config.clone().with_labels(CentroidLabel::Hex);
    Ok(kmeans_palette(&samples, count, &config)?.palette)
}

/// Snap every opaque pixel to its nearest palette color.
///
/// Alpha is kept as-is and transparent pixels are copied unchanged.
pub fn quantize_texture(texture: &Texture, palette: &Palette) -> Result<Texture> {
    if palette.is_empty() {
        return Err(Error::EmptyPalette);
    }

    let snapped: Vec<[u8; 3]> = palette.iter().map(|c| c.to_rgb8()).collect();
    let mut quantized = texture.clone();

    for i in 0..texture.pixel_count() {
        if texture.is_transparent(i) {
            continue;
        }
        let alpha = texture.pixel(i)[3];
        if let Some(index) = palette.nearest_index(&texture.color_at(i)) {
            let [r, g, b] = snapped[index];
            quantized.set_pixel(i, [r, g, b, alpha]);
        }
    }

    Ok(quantized)
}

/// Pick a palette for `texture` from `source` and quantize the texture to it
pub fn preprocess_texture(
    texture: &Texture,
    count: usize,
    source: &TextureSource,
    config: &KMeansConfig,
) -> Result<QuantizedTexture> {
    if count == 0 {
        return Err(Error::InvalidData("Color count must be positive".to_string()));
    }

    log::info!("Analyzing texture ({}x{})", texture.width(), texture.height());

    let palette = match source {
        TextureSource::Picked(colors) => {
            log::info!("Using {} user-picked colors for texture", colors.len().min(count));
            PickedSelector {
                colors: colors.clone(),
            }
            .select(&[], count)?
        }
        TextureSource::Pool(pool) => {
            let extracted = extract_texture_palette(texture, count, config)?;
            log::info!("Extracted {} dominant colors, matching to pool", extracted.len());
            match_to_pool(extracted.colors(), pool)
        }
        TextureSource::Extracted => {
            let extracted = extract_texture_palette(texture, count, config)?;
            log::info!("Extracted {} dominant colors", extracted.len());
            extracted
        }
    };

    for (i, color) in palette.iter().enumerate() {
        log::info!("  {}. {} {}", i + 1, color.name().unwrap_or("-"), color.to_hex());
    }

    let texture = quantize_texture(texture, &palette)?;
    Ok(QuantizedTexture { texture, palette })
}

/// Nearest texel color at UV coordinates.
///
/// UVs wrap into `[0, 1)` and `v` is flipped to a top-left origin. The
/// texel is `floor(u · (w - 1)), floor(v · (h - 1))`.
pub fn sample_texture(texture: &Texture, u: f32, v: f32) -> Option<Color> {
    if texture.pixel_count() == 0 {
        return None;
    }

    let u = u - u.floor();
    let v = 1.0 - (v - v.floor());

    let x = (u * (texture.width() - 1) as f32).floor() as usize;
    let y = (v * (texture.height() - 1) as f32).floor() as usize;
    let x = x.min(texture.width() - 1);
    let y = y.min(texture.height() - 1);

    Some(texture.color_at(y * texture.width() + x))
}
