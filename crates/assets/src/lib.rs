#![warn(missing_docs)]
//! JSON content packs for world generation.
//!
//! A pack lists biomes, structure parts, structures and generation profiles.
//! Loading always validates the assembled [`WorldgenContent`], so a pack that
//! loads is safe to generate from.

mod definitions;
mod loader;

pub use definitions::{
    BiomeDefinition, ConnectionDefinition, CurveDefinition, MaterialDefinition,
    MaterialsDefinition, PackDefinition, PartDefinition, ProfileDefinition,
    SpatialCurveDefinition, StructureDefinition,
};
pub use loader::{content_from_file, content_from_str};

use deepdelve_core::ContentIdError;
use deepdelve_world::{GenerationError, WorldgenContent};
use thiserror::Error;

/// Errors emitted during pack loading.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Wrap IO errors when reading packs.
    #[error("failed to read content pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse content pack: {0}")]
    Parse(#[from] serde_json::Error),
    /// An id in the pack is malformed.
    #[error("invalid id in content pack: {0}")]
    InvalidId(#[from] ContentIdError),
    /// The pack parsed but describes inconsistent content.
    #[error("invalid content pack: {0}")]
    Content(#[from] GenerationError),
}

/// Parse a JSON string into the raw pack definition without building content.
pub fn load_pack_from_str(input: &str) -> Result<PackDefinition, AssetError> {
    Ok(serde_json::from_str(input)?)
}

/// Build validated content from an already parsed pack.
pub fn build_content(pack: PackDefinition) -> Result<WorldgenContent, AssetError> {
    let content = pack.into_content()?;
    content.validate()?;
    Ok(content)
}
