//! Texture quantization demo
//!
//! Generates a gradient texture with a transparent border, quantizes it to
//! a few colors from each palette source, and bakes the result onto the
//! vertices of a textured quad.

use anyhow::Result;
use meshtint_algorithms::{
    preprocess_texture, sample_texture, KMeansConfig, PickedPalette, TextureSource,
};
use meshtint_core::{default_color_pool, Color, ColoredMesh, Texture, Vertex};

fn gradient_texture(width: usize, height: usize) -> Result<Texture> {
    let mut data = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            let r = (255 * x / (width - 1)) as u8;
            let g = (255 * y / (height - 1)) as u8;
            let b = 255 - r / 2;
            let a = if border { 0 } else { 255 };
            data.extend_from_slice(&[r, g, b, a]);
        }
    }
    Ok(Texture::new(data, width, height)?)
}

fn main() -> Result<()> {
    println!("meshtint texture quantization");
    println!("=============================");

    let texture = gradient_texture(64, 48)?;
    println!("Texture: {}x{}", texture.width(), texture.height());

    let mut picked = PickedPalette::new();
    picked.add(Color::from_hex("#2040ff")?);
    picked.add(Color::from_hex("#ff20a0")?);
    picked.add(Color::from_hex("#2042fe")?);
    picked.add(Color::named(0.9, 0.9, 0.5, "sand"));
    println!("Picked {} colors", picked.len());

    let sources = [
        ("extracted", TextureSource::Extracted),
        ("pool", TextureSource::Pool(default_color_pool())),
        ("picked", TextureSource::Picked(picked.colors().to_vec())),
    ];

    for (label, source) in &sources {
        let quantized = preprocess_texture(&texture, 4, source, &KMeansConfig::default())?;
        println!("\nSource: {}", label);
        for color in &quantized.palette {
            println!("  {} {}", color.name().unwrap_or("-"), color.to_hex());
        }

        // Bake onto a quad spanning the full UV range
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let mut quad = ColoredMesh::new();
        for &(u, v) in &corners {
            let mut vertex = Vertex::new(u, v, 0.0);
            vertex.color = sample_texture(&quantized.texture, u, v);
            quad.add_vertex(vertex);
        }
        quad.add_face(vec![0, 1, 2, 3]);

        for (i, vertex) in quad.vertices.iter().enumerate() {
            let hex = vertex.color.as_ref().map(Color::to_hex).unwrap_or_default();
            println!("  corner {} -> {}", i, hex);
        }
    }

    Ok(())
}
