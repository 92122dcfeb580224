//! Print mesh statistics for a generated tree.
//!
//! ```text
//! RUST_LOG=debug cargo run --example tree_stats -- [seed] [levels]
//! ```

use anyhow::{Context, Result};
use sapling::prelude::*;

fn parse_arg<T: std::str::FromStr>(args: &[String], index: usize, name: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    args.get(index)
        .map(|raw| raw.parse::<T>().with_context(|| format!("invalid {name} `{raw}`")))
        .transpose()
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut properties = TreeProperties::default();
    if let Some(seed) = parse_arg(&args, 0, "seed")? {
        properties.seed = seed;
    }
    if let Some(levels) = parse_arg(&args, 1, "levels")? {
        properties.levels = levels;
    }

    let tree = Tree::new(properties).context("tree properties rejected")?;
    let skeleton = tree.skeleton();
    let mesh = tree.generate().context("failed to generate tree mesh")?;

    println!(
        "seed {}: {} branches, {} forks, {} leaves, depth {}",
        tree.properties().seed,
        skeleton.len(),
        skeleton.fork_count(),
        skeleton.leaf_count(),
        skeleton.max_depth()
    );
    println!(
        "trunk: {} vertices ({} seam twins), {} triangles",
        mesh.trunk.vertex_count(),
        mesh.seam_vertices,
        mesh.trunk.triangle_count()
    );
    println!(
        "twigs: {} vertices, {} triangles",
        mesh.twigs.vertex_count(),
        mesh.twigs.triangle_count()
    );

    if let Some(bounds) = mesh.bounds() {
        let size = bounds.size();
        let center = bounds.center();
        println!(
            "bounds: size ({:.3}, {:.3}, {:.3}), center ({:.3}, {:.3}, {:.3})",
            size.x, size.y, size.z, center.x, center.y, center.z
        );
    }

    let bytes: usize = [&mesh.trunk, &mesh.twigs]
        .iter()
        .map(|section| section.vertex_count() * TreeVertex::STRIDE + section.indices.len() * 4)
        .sum();
    println!("gpu upload: {} bytes", bytes);

    Ok(())
}
