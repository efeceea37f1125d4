#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod content_id;
pub mod sampling;

use rand::{rngs::StdRng, SeedableRng};

pub use content_id::{ContentId, ContentIdError, DEFAULT_NAMESPACE};
pub use sampling::{sample_table, weighted_index};

/// Salt for streams that pick a biome for a depth band.
pub const BIOME_SALT: u64 = 0x42_49_4F_4D_u64; // "BIOM"
/// Salt for streams that pick and grow structures.
pub const STRUCTURE_SALT: u64 = 0x53_54_52_55_u64; // "STRU"
/// Salt for streams that draw per-tile materials.
pub const MATERIAL_SALT: u64 = 0x4D_41_54_4C_u64; // "MATL"

/// Derive a reproducible RNG for one generation request.
///
/// Every request (depth band, purpose) gets its own stream so that results
/// never depend on the order in which a host generates chunks.
pub fn generation_rng(world_seed: u64, depth: i64, salt: u64) -> StdRng {
    let seed = world_seed ^ (depth as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ salt;
    StdRng::seed_from_u64(seed)
}
