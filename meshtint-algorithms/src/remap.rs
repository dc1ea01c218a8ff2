//! Nearest-palette-color remapping of vertex colors

use meshtint_core::{Error, NearestColor, Palette, Result, Vertex};

/// Replace every vertex color with a copy of its nearest palette color.
///
/// Ties go to the earliest palette entry. Colorless vertices are left
/// untouched. Returns the number of vertices remapped.
pub fn remap_colors(vertices: &mut [Vertex], palette: &Palette) -> Result<usize> {
    if palette.is_empty() {
        return Err(Error::EmptyPalette);
    }

    let mut remapped = 0;
    for vertex in vertices.iter_mut() {
        let Some(color) = vertex.color.as_ref() else {
            continue;
        };
        if let Some(index) = palette.nearest_index(color) {
            vertex.color = palette.get(index).cloned();
            remapped += 1;
        }
    }

    log::debug!("Remapped {} vertices onto {} colors", remapped, palette.len());
    Ok(remapped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshtint_core::Color;

    fn palette() -> Palette {
        Palette::from_colors(vec![
            Color::named(0.9, 0.1, 0.1, "red"),
            Color::named(0.1, 0.2, 0.5, "dark_blue"),
        ])
    }

    #[test]
    fn test_remap_nearest() {
        let mut vertices = vec![
            Vertex::with_color(0.0, 0.0, 0.0, Color::new(1.0, 0.0, 0.0)),
            Vertex::with_color(1.0, 0.0, 0.0, Color::new(0.0, 0.1, 0.6)),
            Vertex::new(2.0, 0.0, 0.0),
        ];

        let remapped = remap_colors(&mut vertices, &palette()).unwrap();
        assert_eq!(remapped, 2);
        assert_eq!(vertices[0].color_name(), Some("red"));
        assert_eq!(vertices[1].color_name(), Some("dark_blue"));
        assert!(vertices[2].color.is_none());
    }

    #[test]
    fn test_remap_is_idempotent() {
        let mut vertices: Vec<Vertex> = (0..20)
            .map(|i| {
                let t = i as f32 / 19.0;
                Vertex::with_color(t, 0.0, 0.0, Color::new(t, 0.3, 1.0 - t))
            })
            .collect();

        remap_colors(&mut vertices, &palette()).unwrap();
        let once = vertices.clone();
        remap_colors(&mut vertices, &palette()).unwrap();
        assert_eq!(vertices, once);
    }

    #[test]
    fn test_remap_copies_palette_entries() {
        let mut palette = palette();
        let mut vertices = vec![Vertex::with_color(0.0, 0.0, 0.0, Color::new(1.0, 0.0, 0.0))];
        remap_colors(&mut vertices, &palette).unwrap();

        palette.truncate(0);
        assert_eq!(vertices[0].color.as_ref().map(|c| c.r), Some(0.9));
    }

    #[test]
    fn test_remap_empty_palette() {
        let mut vertices = vec![Vertex::with_color(0.0, 0.0, 0.0, Color::new(1.0, 0.0, 0.0))];
        assert_eq!(remap_colors(&mut vertices, &Palette::new()), Err(Error::EmptyPalette));
    }
}
