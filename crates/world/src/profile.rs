//! Generation profiles: which biomes and structures a world uses, and how often.

use crate::biome::BiomeRegistry;
use crate::error::GenerationError;
use crate::structures::StructureRegistry;
use deepdelve_core::{weighted_index, ContentId};
use rand::Rng;
use std::collections::BTreeMap;

/// Named frequency configuration for biome and structure selection.
///
/// Weights are static multipliers, not probabilities; they need not sum to one.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeGenerationProfile {
    id: ContentId,
    biome_weights: BTreeMap<ContentId, f64>,
    structure_weights: BTreeMap<ContentId, f64>,
}

impl BiomeGenerationProfile {
    /// Build a profile. Weights must be finite and non-negative.
    pub fn new(
        id: ContentId,
        biome_weights: BTreeMap<ContentId, f64>,
        structure_weights: BTreeMap<ContentId, f64>,
    ) -> Result<Self, GenerationError> {
        for (entry, &weight) in biome_weights.iter().chain(structure_weights.iter()) {
            if !weight.is_finite() || weight < 0.0 {
                return Err(GenerationError::InvalidWeight {
                    profile: id,
                    entry: entry.clone(),
                    weight,
                });
            }
        }
        Ok(Self {
            id,
            biome_weights,
            structure_weights,
        })
    }

    /// Profile id.
    pub fn id(&self) -> &ContentId {
        &self.id
    }

    /// Biome frequency weights.
    pub fn biome_weights(&self) -> &BTreeMap<ContentId, f64> {
        &self.biome_weights
    }

    /// Structure frequency weights.
    pub fn structure_weights(&self) -> &BTreeMap<ContentId, f64> {
        &self.structure_weights
    }

    /// Draw the active biome for `depth`.
    ///
    /// Each biome scores `depth_likelihood * weight` and one weighted draw
    /// picks among them. If every score is zero the choice is uniform.
    /// Returns `Ok(None)` only when the profile lists no biomes.
    pub fn select_biome<R: Rng + ?Sized>(
        &self,
        biomes: &BiomeRegistry,
        depth: i64,
        max_depth: i64,
        rng: &mut R,
    ) -> Result<Option<&ContentId>, GenerationError> {
        let mut candidates = Vec::with_capacity(self.biome_weights.len());
        let mut scores = Vec::with_capacity(self.biome_weights.len());
        for (biome_id, weight) in &self.biome_weights {
            let biome = biomes
                .get(biome_id)
                .ok_or_else(|| GenerationError::UnknownBiome {
                    biome: biome_id.clone(),
                    profile: self.id.clone(),
                })?;
            candidates.push(biome_id);
            scores.push(biome.depth_likelihood(depth, max_depth) * weight);
        }
        Ok(weighted_index(&scores, rng).map(|i| candidates[i]))
    }

    /// Draw a structure for `depth`, or `None` if the profile has none.
    ///
    /// Same mechanism as [`Self::select_biome`], scoring each structure by
    /// its own depth likelihood times its weight.
    pub fn select_structure<R: Rng + ?Sized>(
        &self,
        structures: &StructureRegistry,
        depth: i64,
        max_depth: i64,
        rng: &mut R,
    ) -> Result<Option<&ContentId>, GenerationError> {
        let mut candidates = Vec::with_capacity(self.structure_weights.len());
        let mut scores = Vec::with_capacity(self.structure_weights.len());
        for (structure_id, weight) in &self.structure_weights {
            let structure =
                structures
                    .get(structure_id)
                    .ok_or_else(|| GenerationError::UnknownStructure {
                        structure: structure_id.clone(),
                        profile: self.id.clone(),
                    })?;
            candidates.push(structure_id);
            scores.push(structure.depth_likelihood(depth, max_depth) * weight);
        }
        Ok(weighted_index(&scores, rng).map(|i| candidates[i]))
    }

    /// Check that every referenced biome and structure is registered.
    pub fn validate(
        &self,
        biomes: &BiomeRegistry,
        structures: &StructureRegistry,
    ) -> Result<(), GenerationError> {
        if let Some(biome) = self.biome_weights.keys().find(|id| biomes.get(id).is_none()) {
            return Err(GenerationError::UnknownBiome {
                biome: biome.clone(),
                profile: self.id.clone(),
            });
        }
        if let Some(structure) = self
            .structure_weights
            .keys()
            .find(|id| structures.get(id).is_none())
        {
            return Err(GenerationError::UnknownStructure {
                structure: structure.clone(),
                profile: self.id.clone(),
            });
        }
        Ok(())
    }
}
