use std::fs;
use std::path::Path;

use deepdelve_world::WorldgenContent;

use crate::{build_content, load_pack_from_str, AssetError};

/// Load validated worldgen content from the provided JSON file path.
pub fn content_from_file(path: &Path) -> Result<WorldgenContent, AssetError> {
    let data = fs::read_to_string(path)?;
    content_from_str(&data)
}

/// Load validated worldgen content from an in-memory JSON string.
pub fn content_from_str(input: &str) -> Result<WorldgenContent, AssetError> {
    build_content(load_pack_from_str(input)?)
}
