//! Palette reduction demo
//!
//! Builds a noisy two-tone sphere, then reduces it with each selection
//! strategy and prints the resulting palette and color distribution.

use anyhow::Result;
use meshtint_algorithms::{ColorReducer, ReductionConfig, SelectionStrategy};
use meshtint_core::{Color, ColoredMesh, Vertex};
use rand::prelude::*;
use rand::rngs::StdRng;

/// UV sphere whose upper half is orange and lower half teal, with color noise
fn noisy_sphere(rings: usize, segments: usize, seed: u64) -> ColoredMesh {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut mesh = ColoredMesh::new();

    for ring in 0..=rings {
        let phi = std::f32::consts::PI * ring as f32 / rings as f32;
        for segment in 0..segments {
            let theta = 2.0 * std::f32::consts::PI * segment as f32 / segments as f32;
            let (x, y, z) = (phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

            let base: (f32, f32, f32) = if y > 0.0 { (0.95, 0.5, 0.1) } else { (0.1, 0.6, 0.6) };
            let mut jitter = || rng.gen_range(-0.08..0.08);
            let color = Color::new(
                (base.0 + jitter()).clamp(0.0, 1.0),
                (base.1 + jitter()).clamp(0.0, 1.0),
                (base.2 + jitter()).clamp(0.0, 1.0),
            );
            mesh.add_vertex(Vertex::with_color(x, y, z, color));
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let next = (segment + 1) % segments;
            let a = ring * segments + segment;
            let b = ring * segments + next;
            let c = (ring + 1) * segments + segment;
            let d = (ring + 1) * segments + next;
            mesh.add_face(vec![a, c, b]);
            mesh.add_face(vec![b, c, d]);
        }
    }

    mesh
}

fn main() -> Result<()> {
    println!("meshtint palette reduction");
    println!("==========================");

    let mesh = noisy_sphere(24, 32, 7);
    println!(
        "Sphere: {} vertices, {} faces, {} colored",
        mesh.vertex_count(),
        mesh.face_count(),
        mesh.colored_vertex_count()
    );

    let strategies = [
        SelectionStrategy::default(),
        SelectionStrategy::GreedyCoverage {
            pool: meshtint_core::default_color_pool(),
        },
        SelectionStrategy::kmeans(),
        SelectionStrategy::similarity(),
        SelectionStrategy::Picked(vec![
            Color::from_hex("#f28019")?,
            Color::from_hex("#1a9999")?,
        ]),
    ];

    for strategy in strategies {
        let config = ReductionConfig::new()
            .with_num_colors(3)
            .with_island_threshold(5)
            .with_strategy(strategy);
        let reducer = ColorReducer::with_config(config);
        let mut reduced = mesh.clone();

        let report = reducer.reduce_with_progress(&mut reduced, |stage, percent| {
            println!("  [{:>3}%] {:?}", percent, stage);
        })?;

        println!("\nStrategy: {}", reducer.config().strategy.selector().name());
        for color in &report.palette {
            println!("  {} {}", color.name().unwrap_or("-"), color.to_hex_argb());
        }
        for (name, count) in &report.distribution {
            println!("  {:<12} {:>5} vertices", name, count);
        }
        println!(
            "  merged: {} (vertex islands), {} (face islands)",
            report.vertex_merged, report.face_merged
        );
    }

    Ok(())
}
