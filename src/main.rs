//! deepdelve - deterministic underground world generation
//!
//! Headless preview: prints the biome drawn for each depth band, its dominant
//! materials, and one grown structure as ASCII.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::PreviewConfig;
use deepdelve_core::{generation_rng, sample_table, ContentId, BIOME_SALT, MATERIAL_SALT, STRUCTURE_SALT};
use deepdelve_world::{Biome, MaterialTable, Side, WorldgenContent};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "World generation preview for deepdelve", long_about = None)]
struct Args {
    /// Preview configuration file (TOML)
    #[arg(short, long, default_value = config::DEFAULT_PREVIEW_PATH)]
    config: PathBuf,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the generation profile id
    #[arg(long)]
    profile: Option<String>,

    /// Override the world depth
    #[arg(long)]
    max_depth: Option<i64>,

    /// Override the distance between previewed depth bands
    #[arg(long)]
    depth_step: Option<i64>,

    /// Load content from this JSON pack instead of the built-in presets
    #[arg(long)]
    content_pack: Option<PathBuf>,

    /// Depth of the previewed structure (default: middle of the world)
    #[arg(long)]
    structure_depth: Option<i64>,

    /// Horizontal position used when reporting spatial likelihood
    #[arg(long, default_value_t = 0.0)]
    x: f64,
}

impl Args {
    fn apply(&self, cfg: &mut PreviewConfig) {
        if let Some(seed) = self.seed {
            cfg.world_seed = seed;
        }
        if let Some(profile) = &self.profile {
            cfg.profile = profile.clone();
        }
        if let Some(max_depth) = self.max_depth {
            cfg.max_depth = max_depth;
        }
        if let Some(step) = self.depth_step {
            cfg.depth_step = step;
        }
        if let Some(pack) = &self.content_pack {
            cfg.content_pack = Some(pack.clone());
        }
    }
}

fn main() -> Result<()> {
    // WARN by default; RUST_LOG overrides
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    let mut cfg = PreviewConfig::load_from_path(&args.config);
    args.apply(&mut cfg);
    info!(?cfg, "preview configuration");

    let content = config::load_content(&cfg)?;
    let profile = cfg.profile_id()?;
    content
        .profile(&profile)
        .with_context(|| format!("profile `{profile}` is not available"))?;

    print_depth_bands(&content, &profile, &cfg, args.x)?;

    let structure_depth = args.structure_depth.unwrap_or(cfg.max_depth / 2);
    print_structure(&content, &profile, &cfg, structure_depth)
}

fn print_depth_bands(
    content: &WorldgenContent,
    profile: &ContentId,
    cfg: &PreviewConfig,
    x: f64,
) -> Result<()> {
    println!(
        "profile {profile}, seed {}, max depth {}",
        cfg.world_seed, cfg.max_depth
    );
    println!(
        "{:>6}  {:<20} {:>9}  {:<18} {:<18} {:<14}",
        "depth", "biome", "spatial", "filler", "ore", "sample"
    );

    for depth in cfg.depth_bands() {
        let mut rng = generation_rng(cfg.world_seed, depth, BIOME_SALT);
        let Some(biome) = content
            .biome_at_depth(profile, depth, cfg.max_depth, &mut rng)
            .with_context(|| format!("biome selection failed at depth {depth}"))?
        else {
            println!("{depth:>6}  (profile lists no biomes)");
            continue;
        };
        print_band(biome, cfg, depth, x);
    }
    Ok(())
}

fn print_band(biome: &Biome, cfg: &PreviewConfig, depth: i64, x: f64) {
    let tables = biome.tables_at(depth);
    let mut rng = generation_rng(cfg.world_seed, depth, MATERIAL_SALT);
    let sampled = sample_table(&tables.filler, &mut rng).unwrap_or("-");
    let up_flora = dominant(&tables.flora[Side::North.index()]);

    println!(
        "{:>6}  {:<20} {:>9.2e}  {:<18} {:<18} {:<14}{}",
        depth,
        biome.id().to_string(),
        biome.spatial_likelihood(x, depth as f64),
        dominant(&tables.filler),
        dominant(&tables.ore),
        sampled,
        if up_flora == "-" {
            String::new()
        } else {
            format!("  flora^ {up_flora}")
        }
    );
}

/// Entry with the largest share, formatted with its percentage.
fn dominant(table: &MaterialTable) -> String {
    table
        .iter()
        .filter(|(_, share)| **share > 0.0)
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(material, share)| format!("{material} {:.0}%", share * 100.0))
        .unwrap_or_else(|| "-".to_string())
}

fn print_structure(
    content: &WorldgenContent,
    profile: &ContentId,
    cfg: &PreviewConfig,
    depth: i64,
) -> Result<()> {
    let mut rng = generation_rng(cfg.world_seed, depth, STRUCTURE_SALT);
    let generated = content
        .structure_at_depth(profile, depth, cfg.max_depth, &mut rng)
        .with_context(|| format!("structure generation failed at depth {depth}"))?;

    let Some(generated) = generated else {
        println!("\nprofile {profile} defines no structures");
        return Ok(());
    };

    println!(
        "\n{} at depth {depth}: {} parts, {} attempts (budget {}), {}x{}",
        generated.structure,
        generated.placements.len(),
        generated.attempts,
        generated.budget,
        generated.matrix.width(),
        generated.matrix.height()
    );
    print!("{}", generated.matrix.render_ascii(' '));
    Ok(())
}
