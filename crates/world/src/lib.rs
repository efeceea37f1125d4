#![warn(missing_docs)]
//! Procedural content for underground worlds.
//!
//! Two algorithms live here: the biome/material likelihood model, which turns
//! depth-indexed Gaussian curves into normalized per-depth material tables,
//! and structure assembly, which grows connected parts into a single tile
//! matrix. Both are pure and deterministic for a given RNG stream; placing
//! their output into world storage is left to the world builder.

mod biome;
mod content;
mod curve;
mod error;
mod material;
mod matrix;
pub mod presets;
mod profile;
mod side;
mod structure_template;
mod structures;

pub use biome::{Biome, BiomeMaterials, BiomeRegistry, DepthTables, DEPTH_SCALE};
pub use content::WorldgenContent;
pub use curve::{ProbabilityCurve, ProbabilityCurve2d};
pub use error::GenerationError;
pub use material::{MaterialCategory, MaterialLikelihood, MaterialTable};
pub use matrix::TileMatrix;
pub use profile::BiomeGenerationProfile;
pub use side::Side;
pub use structure_template::{Cell, Connection, PartGrid, PartRegistry, StructurePart};
pub use structures::{
    attach_origin, BudgetPolicy, GeneratedStructure, PartBounds, PlacedPart, Placement,
    Structure, StructureRegistry,
};
