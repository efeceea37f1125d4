//! The full set of static worldgen definitions for one world.

use crate::biome::{Biome, BiomeRegistry};
use crate::error::GenerationError;
use crate::profile::BiomeGenerationProfile;
use crate::structure_template::{PartRegistry, StructurePart};
use crate::structures::{GeneratedStructure, Structure, StructureRegistry};
use deepdelve_core::ContentId;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::debug;

/// Registries of biomes, structure parts and structures, plus named profiles.
///
/// Populated once at startup and read-only afterwards; generation calls only
/// borrow it, so one instance can serve any number of independent requests.
#[derive(Debug, Clone, Default)]
pub struct WorldgenContent {
    biomes: BiomeRegistry,
    parts: PartRegistry,
    structures: StructureRegistry,
    profiles: BTreeMap<ContentId, BiomeGenerationProfile>,
}

impl WorldgenContent {
    /// Empty content set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a biome.
    pub fn add_biome(&mut self, biome: Biome) -> Result<(), GenerationError> {
        self.biomes.register(biome)
    }

    /// Register a structure part.
    pub fn add_part(&mut self, part: StructurePart) -> Result<(), GenerationError> {
        self.parts.register(part)
    }

    /// Register a structure.
    pub fn add_structure(&mut self, structure: Structure) -> Result<(), GenerationError> {
        self.structures.register(structure)
    }

    /// Register a profile.
    pub fn add_profile(&mut self, profile: BiomeGenerationProfile) -> Result<(), GenerationError> {
        if self.profiles.contains_key(profile.id()) {
            return Err(GenerationError::DuplicateId {
                kind: "profile",
                id: profile.id().clone(),
            });
        }
        self.profiles.insert(profile.id().clone(), profile);
        Ok(())
    }

    /// Fail on the first unresolvable reference anywhere in the content.
    pub fn validate(&self) -> Result<(), GenerationError> {
        self.parts.validate()?;
        self.structures.validate(&self.parts)?;
        for profile in self.profiles.values() {
            profile.validate(&self.biomes, &self.structures)?;
        }
        debug!(
            profiles = self.profiles.len(),
            parts = self.parts.len(),
            "worldgen content validated"
        );
        Ok(())
    }

    /// Biome registry.
    pub fn biomes(&self) -> &BiomeRegistry {
        &self.biomes
    }

    /// Part registry.
    pub fn parts(&self) -> &PartRegistry {
        &self.parts
    }

    /// Structure registry.
    pub fn structures(&self) -> &StructureRegistry {
        &self.structures
    }

    /// Profile ids in order.
    pub fn profile_ids(&self) -> impl Iterator<Item = &ContentId> {
        self.profiles.keys()
    }

    /// Look up a profile.
    pub fn profile(&self, id: &ContentId) -> Result<&BiomeGenerationProfile, GenerationError> {
        self.profiles
            .get(id)
            .ok_or_else(|| GenerationError::UnknownProfile(id.clone()))
    }

    /// Draw the biome governing `depth` under `profile`.
    pub fn biome_at_depth<R: Rng + ?Sized>(
        &self,
        profile: &ContentId,
        depth: i64,
        max_depth: i64,
        rng: &mut R,
    ) -> Result<Option<&Biome>, GenerationError> {
        let selected = self
            .profile(profile)?
            .select_biome(&self.biomes, depth, max_depth, rng)?;
        Ok(selected.and_then(|id| self.biomes.get(id)))
    }

    /// Draw a structure for `depth` under `profile` and grow it.
    ///
    /// `Ok(None)` when the profile defines no structures.
    pub fn structure_at_depth<R: Rng + ?Sized>(
        &self,
        profile: &ContentId,
        depth: i64,
        max_depth: i64,
        rng: &mut R,
    ) -> Result<Option<GeneratedStructure>, GenerationError> {
        let Some(structure_id) = self
            .profile(profile)?
            .select_structure(&self.structures, depth, max_depth, rng)?
        else {
            return Ok(None);
        };

        // select_structure already resolved the id against this registry.
        let Some(structure) = self.structures.get(structure_id) else {
            return Ok(None);
        };
        structure.generate(&self.parts, rng).map(Some)
    }
}
