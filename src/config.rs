use anyhow::{Context, Result};
use deepdelve_core::ContentId;
use deepdelve_world::presets::{default_content, DEFAULT_MAX_DEPTH, STANDARD_PROFILE};
use deepdelve_world::WorldgenContent;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const DEFAULT_PREVIEW_PATH: &str = "config/preview.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub world_seed: u64,
    /// Depth treated as the bottom of the world.
    pub max_depth: i64,
    pub profile: String,
    /// Distance between previewed depth bands.
    pub depth_step: i64,
    /// JSON content pack replacing the built-in content.
    pub content_pack: Option<PathBuf>,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            world_seed: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            profile: STANDARD_PROFILE.to_string(),
            depth_step: 100,
            content_pack: None,
        }
    }
}

impl PreviewConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<PreviewConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    PreviewConfig::default()
                }
            },
            Err(err) => {
                if err.kind() == std::io::ErrorKind::NotFound {
                    warn!("Preview config not found at {}. Using defaults", path.display());
                } else {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                PreviewConfig::default()
            }
        }
    }

    /// Profile id to generate with.
    pub fn profile_id(&self) -> Result<ContentId> {
        ContentId::parse(&self.profile)
            .with_context(|| format!("invalid profile id `{}`", self.profile))
    }

    /// Depths to preview: `0, step, 2*step, ...` up to and including `max_depth`.
    pub fn depth_bands(&self) -> impl Iterator<Item = i64> {
        let step = self.depth_step.max(1) as usize;
        (0..=self.max_depth.max(0)).step_by(step)
    }
}

/// Content from the configured pack, or the built-in presets.
pub fn load_content(config: &PreviewConfig) -> Result<WorldgenContent> {
    match &config.content_pack {
        Some(path) => {
            info!("Loading content pack {}", path.display());
            deepdelve_assets::content_from_file(path)
                .with_context(|| format!("failed to load content pack {}", path.display()))
        }
        None => default_content().context("built-in content is invalid"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("deepdelve_{tag}_{timestamp}"));
        fs::create_dir_all(&dir).expect("scratch dir create");
        dir
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = scratch_dir("partial_config");
        let path = dir.join("preview.toml");
        fs::write(&path, "world_seed = 42\nprofile = \"dd:barren\"\n").expect("write config");

        let cfg = PreviewConfig::load_from_path(&path);
        assert_eq!(cfg.world_seed, 42);
        assert_eq!(cfg.profile, "dd:barren");
        assert_eq!(cfg.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(cfg.content_pack, None);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_or_missing_file_falls_back() {
        let dir = scratch_dir("bad_config");
        let path = dir.join("preview.toml");
        fs::write(&path, "world_seed = \"not a number\"").expect("write config");

        assert_eq!(PreviewConfig::load_from_path(&path), PreviewConfig::default());
        assert_eq!(
            PreviewConfig::load_from_path(&dir.join("absent.toml")),
            PreviewConfig::default()
        );

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn depth_bands_cover_the_range() {
        let cfg = PreviewConfig {
            max_depth: 250,
            depth_step: 100,
            ..Default::default()
        };
        assert_eq!(cfg.depth_bands().collect::<Vec<_>>(), vec![0, 100, 200]);

        let degenerate = PreviewConfig {
            max_depth: 2,
            depth_step: 0,
            ..Default::default()
        };
        assert_eq!(degenerate.depth_bands().count(), 3);
    }

    #[test]
    fn shipped_config_parses() {
        let contents = fs::read_to_string(DEFAULT_PREVIEW_PATH).expect("shipped config exists");
        let cfg: PreviewConfig = toml::from_str(&contents).expect("shipped config parses");
        assert!(cfg.profile_id().is_ok());
        assert!(load_content(&cfg).is_ok());
    }
}
