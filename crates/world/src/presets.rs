//! Built-in worldgen content used when no content pack is supplied.

use crate::biome::{Biome, BiomeMaterials};
use crate::content::WorldgenContent;
use crate::curve::{ProbabilityCurve, ProbabilityCurve2d};
use crate::error::GenerationError;
use crate::material::MaterialLikelihood;
use crate::profile::BiomeGenerationProfile;
use crate::side::Side;
use crate::structure_template::{Cell, PartGrid, StructurePart};
use crate::structures::Structure;
use deepdelve_core::ContentId;
use std::collections::BTreeMap;

/// Deepest tile row of a standard world.
pub const DEFAULT_MAX_DEPTH: i64 = 1000;

/// Profile with every built-in biome and structure.
pub const STANDARD_PROFILE: &str = "dd:standard";
/// Profile without structures.
pub const BARREN_PROFILE: &str = "dd:barren";

/// Vault structure id.
pub const VAULT: &str = "dd:vault";
/// Mine structure id.
pub const MINE: &str = "dd:mine";

fn id(name: &str) -> Result<ContentId, GenerationError> {
    Ok(ContentId::parse(name)?)
}

/// Build, register and validate all built-in content.
pub fn default_content() -> Result<WorldgenContent, GenerationError> {
    let mut content = WorldgenContent::new();

    for biome in [stone_caverns()?, frozen_depths()?, magma_core()?] {
        content.add_biome(biome)?;
    }
    for part in vault_parts()?.into_iter().chain(mine_parts()?) {
        content.add_part(part)?;
    }

    content.add_structure(
        Structure::new(id(VAULT)?, vec![id("dd:vault_core")?], 6)?
            .with_depth_curve(ProbabilityCurve::new(VAULT, 70.0, 20.0)?),
    )?;
    content.add_structure(
        Structure::new(id(MINE)?, vec![id("dd:mine_shaft")?, id("dd:mine_tunnel")?], 12)?
            .with_depth_curve(ProbabilityCurve::new(MINE, 25.0, 25.0)?),
    )?;

    content.add_profile(BiomeGenerationProfile::new(
        id(STANDARD_PROFILE)?,
        BTreeMap::from([
            (id("dd:stone_caverns")?, 1.0),
            (id("dd:frozen_depths")?, 0.6),
            (id("dd:magma_core")?, 0.8),
        ]),
        BTreeMap::from([(id(VAULT)?, 0.3), (id(MINE)?, 1.0)]),
    )?)?;
    content.add_profile(BiomeGenerationProfile::new(
        id(BARREN_PROFILE)?,
        BTreeMap::from([(id("dd:stone_caverns")?, 1.0), (id("dd:magma_core")?, 1.0)]),
        BTreeMap::new(),
    )?)?;

    content.validate()?;
    Ok(content)
}

fn stone_caverns() -> Result<Biome, GenerationError> {
    let name = "dd:stone_caverns";
    Biome::new(
        id(name)?,
        ProbabilityCurve2d::new(name, 0.0, 150.0, 400.0, 200.0, 0.0)?,
        ProbabilityCurve::new(name, 20.0, 20.0)?,
        BiomeMaterials {
            filler: vec![
                MaterialLikelihood::new("stone", 0.0, 300.0)?,
                MaterialLikelihood::new("granite", 250.0, 120.0)?,
                MaterialLikelihood::new("dirt", 0.0, 40.0)?,
            ],
            ore: vec![
                MaterialLikelihood::new("coal_ore", 50.0, 120.0)?,
                MaterialLikelihood::new("copper_ore", 150.0, 80.0)?,
                // Shallow and deep iron seams share one id.
                MaterialLikelihood::new("iron_ore", 120.0, 60.0)?,
                MaterialLikelihood::new("iron_ore", 320.0, 90.0)?,
            ],
            flora: vec![
                MaterialLikelihood::flora("cave_moss", 80.0, 100.0, Side::North)?,
                MaterialLikelihood::flora("glow_mushroom", 250.0, 80.0, Side::North)?,
                MaterialLikelihood::flora("hanging_roots", 30.0, 50.0, Side::South)?,
                MaterialLikelihood::flora("wall_fern", 100.0, 80.0, Side::East)?,
                MaterialLikelihood::flora("wall_fern", 100.0, 80.0, Side::West)?,
            ],
            background: vec![
                MaterialLikelihood::new("stone_wall", 0.0, 300.0)?,
                MaterialLikelihood::new("dirt_wall", 0.0, 40.0)?,
            ],
        },
    )
}

fn frozen_depths() -> Result<Biome, GenerationError> {
    let name = "dd:frozen_depths";
    Biome::new(
        id(name)?,
        ProbabilityCurve2d::new(name, -300.0, 500.0, 250.0, 150.0, -12000.0)?,
        ProbabilityCurve::new(name, 50.0, 15.0)?,
        BiomeMaterials {
            filler: vec![
                MaterialLikelihood::new("packed_ice", 500.0, 150.0)?,
                MaterialLikelihood::new("frost_stone", 450.0, 200.0)?,
            ],
            ore: vec![
                MaterialLikelihood::new("silver_ore", 500.0, 100.0)?,
                MaterialLikelihood::new("sapphire_ore", 650.0, 60.0)?,
            ],
            flora: vec![
                MaterialLikelihood::flora("frost_lichen", 500.0, 200.0, Side::North)?,
                MaterialLikelihood::flora("icicle", 500.0, 200.0, Side::South)?,
            ],
            background: vec![MaterialLikelihood::new("ice_wall", 500.0, 250.0)?],
        },
    )
}

fn magma_core() -> Result<Biome, GenerationError> {
    let name = "dd:magma_core";
    Biome::new(
        id(name)?,
        ProbabilityCurve2d::new(name, 0.0, 850.0, 500.0, 120.0, 0.0)?,
        ProbabilityCurve::new(name, 85.0, 12.0)?,
        BiomeMaterials {
            filler: vec![
                MaterialLikelihood::new("basalt", 800.0, 150.0)?,
                MaterialLikelihood::new("obsidian", 950.0, 60.0)?,
            ],
            ore: vec![
                MaterialLikelihood::new("gold_ore", 750.0, 100.0)?,
                MaterialLikelihood::new("diamond_ore", 950.0, 50.0)?,
            ],
            flora: vec![MaterialLikelihood::flora(
                "ember_bloom",
                850.0,
                100.0,
                Side::North,
            )?],
            background: vec![
                MaterialLikelihood::new("basalt_wall", 800.0, 150.0)?,
                MaterialLikelihood::new("magma_wall", 980.0, 40.0)?,
            ],
        },
    )
}

fn palette(symbol: char) -> Option<Cell> {
    match symbol {
        '.' => Some(Cell::literal("Air")),
        '#' => Some(Cell::material("stone_brick")),
        'P' => Some(Cell::material("wood_plank")),
        'C' => Some(Cell::literal("Chest")),
        'T' => Some(Cell::literal("Torch")),
        'L' => Some(Cell::literal("Ladder")),
        _ => None,
    }
}

fn ascii_part(name: &str, rows: &[&str]) -> Result<StructurePart, GenerationError> {
    let part_id = id(name)?;
    let grid = PartGrid::from_ascii(&part_id, rows, palette)?;
    Ok(StructurePart::new(part_id, grid))
}

const VAULT_CORE: [&str; 5] = ["#####", "#...#", "#.C.#", "#...#", "#####"];
const VAULT_ROOM: [&str; 5] = ["#####", "#...#", "#.T.#", "#...#", "#####"];
const VAULT_HALL_H: [&str; 3] = ["####", "....", "####"];
const VAULT_HALL_V: [&str; 4] = ["#.#", "#.#", "#.#", "#.#"];

fn vault_parts() -> Result<Vec<StructurePart>, GenerationError> {
    let hall_h = id("dd:vault_hall_h")?;
    let hall_v = id("dd:vault_hall_v")?;
    let room = id("dd:vault_room")?;

    Ok(vec![
        ascii_part("dd:vault_core", &VAULT_CORE)?
            .with_connection(Side::North, hall_v.clone(), 1)
            .with_connection(Side::East, hall_h.clone(), 1)
            .with_connection(Side::South, hall_v.clone(), 1)
            .with_connection(Side::West, hall_h.clone(), 1),
        ascii_part("dd:vault_hall_h", &VAULT_HALL_H)?
            .with_connection(Side::East, room.clone(), -1)
            .with_connection(Side::West, room.clone(), -1),
        ascii_part("dd:vault_hall_v", &VAULT_HALL_V)?
            .with_connection(Side::North, room.clone(), -1)
            .with_connection(Side::South, room, -1),
        ascii_part("dd:vault_room", &VAULT_ROOM)?,
    ])
}

const MINE_SHAFT: [&str; 4] = ["PLP", "PLP", "PLP", "PLP"];
const MINE_TUNNEL: [&str; 3] = ["PPPPPP", "..T...", "PPPPPP"];

fn mine_parts() -> Result<Vec<StructurePart>, GenerationError> {
    let shaft = id("dd:mine_shaft")?;
    let tunnel = id("dd:mine_tunnel")?;

    Ok(vec![
        ascii_part("dd:mine_shaft", &MINE_SHAFT)?
            .with_connection(Side::North, shaft.clone(), 0)
            .with_connection(Side::South, shaft.clone(), 0)
            .with_connection(Side::East, tunnel.clone(), 1)
            .with_connection(Side::West, tunnel.clone(), 1),
        ascii_part("dd:mine_tunnel", &MINE_TUNNEL)?
            .with_connection(Side::East, tunnel.clone(), 0)
            .with_connection(Side::East, shaft.clone(), -1)
            .with_connection(Side::West, tunnel.clone(), 0)
            .with_connection(Side::West, shaft, -1),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialCategory;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn default_content_is_valid() {
        let content = default_content().expect("built-in content validates");
        assert_eq!(content.profile_ids().count(), 2);
        assert_eq!(content.biomes().iter().count(), 3);
        assert_eq!(content.structures().iter().count(), 2);
        assert_eq!(content.parts().len(), 6);
    }

    #[test]
    fn every_builtin_category_is_normalized_across_depths() {
        let content = default_content().unwrap();
        for biome in content.biomes().iter() {
            for depth in (0..=DEFAULT_MAX_DEPTH).step_by(50) {
                for category in MaterialCategory::ALL {
                    let sum: f64 = biome.material_table(category, depth).values().sum();
                    assert!(
                        (sum - 1.0).abs() < 1e-9,
                        "{} {category:?} at {depth}: {sum}",
                        biome.id()
                    );
                }
            }
        }
    }

    #[test]
    fn iron_seams_aggregate_into_one_entry() {
        let content = default_content().unwrap();
        let caverns = content
            .biomes()
            .get(&ContentId::parse("dd:stone_caverns").unwrap())
            .unwrap();
        let ores = caverns.material_table(MaterialCategory::Ore, 200);
        assert_eq!(ores.len(), 3);
        assert!(ores.contains_key("iron_ore"));
    }

    #[test]
    fn barren_profile_never_yields_structures() {
        let content = default_content().unwrap();
        let barren = ContentId::parse(BARREN_PROFILE).unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        for depth in (0..DEFAULT_MAX_DEPTH).step_by(100) {
            let structure = content
                .structure_at_depth(&barren, depth, DEFAULT_MAX_DEPTH, &mut rng)
                .unwrap();
            assert!(structure.is_none());
        }
    }

    #[test]
    fn vault_always_keeps_its_core() {
        let content = default_content().unwrap();
        let vault = content
            .structures()
            .get(&ContentId::parse(VAULT).unwrap())
            .unwrap();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let generated = vault.generate(content.parts(), &mut rng).unwrap();
            assert_eq!(generated.placements[0].part.path(), "vault_core");
            assert_eq!(
                generated
                    .matrix
                    .rows()
                    .flatten()
                    .filter(|cell| cell.as_deref() == Some("Chest"))
                    .count(),
                1
            );
        }
    }
}
