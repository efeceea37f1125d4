//! Biomes: depth and spatial likelihood plus categorized material lists.

use crate::curve::{ProbabilityCurve, ProbabilityCurve2d};
use crate::error::GenerationError;
use crate::material::{normalized_table, MaterialCategory, MaterialLikelihood, MaterialTable};
use crate::side::Side;
use deepdelve_core::ContentId;
use std::collections::BTreeMap;

/// Scale that depths are normalized onto before evaluating a depth curve.
pub const DEPTH_SCALE: f64 = 100.0;

/// Material lists for the four categories of a biome.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BiomeMaterials {
    /// Bulk rock.
    pub filler: Vec<MaterialLikelihood>,
    /// Ore veins.
    pub ore: Vec<MaterialLikelihood>,
    /// Plants; every entry carries a growth direction.
    pub flora: Vec<MaterialLikelihood>,
    /// Background walls.
    pub background: Vec<MaterialLikelihood>,
}

/// All category tables for a single depth.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthTables {
    /// Filler distribution.
    pub filler: MaterialTable,
    /// Ore distribution.
    pub ore: MaterialTable,
    /// Background distribution.
    pub background: MaterialTable,
    /// Flora distribution per growth direction, indexed by [`Side::index`].
    pub flora: [MaterialTable; 4],
}

/// A region's geology: where it occurs and what it is made of.
#[derive(Debug, Clone, PartialEq)]
pub struct Biome {
    id: ContentId,
    spatial_curve: ProbabilityCurve2d,
    depth_curve: ProbabilityCurve,
    materials: BiomeMaterials,
}

impl Biome {
    /// Build a biome. Flora entries without a growth direction are rejected.
    pub fn new(
        id: ContentId,
        spatial_curve: ProbabilityCurve2d,
        depth_curve: ProbabilityCurve,
        materials: BiomeMaterials,
    ) -> Result<Self, GenerationError> {
        if let Some(entry) = materials
            .flora
            .iter()
            .find(|entry| entry.growth_direction.is_none())
        {
            return Err(GenerationError::MissingGrowthDirection {
                biome: id,
                material: entry.material.clone(),
            });
        }

        Ok(Self {
            id,
            spatial_curve,
            depth_curve,
            materials,
        })
    }

    /// Biome id.
    pub fn id(&self) -> &ContentId {
        &self.id
    }

    /// Material entries of one category.
    pub fn entries(&self, category: MaterialCategory) -> &[MaterialLikelihood] {
        match category {
            MaterialCategory::Filler => &self.materials.filler,
            MaterialCategory::Ore => &self.materials.ore,
            MaterialCategory::Flora => &self.materials.flora,
            MaterialCategory::Background => &self.materials.background,
        }
    }

    /// Likelihood of this biome at `depth`, with depth mapped onto `0..=100`.
    ///
    /// Depths outside `0..=max_depth` extrapolate. A zero `max_depth` yields
    /// zero likelihood at depth zero and a vanishing one elsewhere.
    pub fn depth_likelihood(&self, depth: i64, max_depth: i64) -> f64 {
        let normalized = depth as f64 / max_depth as f64 * DEPTH_SCALE;
        if normalized.is_nan() {
            return 0.0;
        }
        self.depth_curve.density(normalized)
    }

    /// Likelihood of this biome at a horizontal/vertical world position.
    pub fn spatial_likelihood(&self, x: f64, y: f64) -> f64 {
        self.spatial_curve.density2d(x, y)
    }

    /// Normalized distribution over the materials of `category` at `depth`.
    ///
    /// Each entry's curve is evaluated at the raw depth. Entries sharing an
    /// id are summed after normalization. An all-zero sum yields all zeros.
    pub fn material_table(&self, category: MaterialCategory, depth: i64) -> MaterialTable {
        normalized_table(self.entries(category), depth as f64)
    }

    /// Flora distributions, one per growth direction.
    ///
    /// Plants only compete with plants growing the same way.
    pub fn flora_table(&self, depth: i64) -> [MaterialTable; 4] {
        Side::ALL.map(|side| {
            normalized_table(
                self.materials
                    .flora
                    .iter()
                    .filter(|entry| entry.growth_direction == Some(side)),
                depth as f64,
            )
        })
    }

    /// Every category table for one depth.
    pub fn tables_at(&self, depth: i64) -> DepthTables {
        DepthTables {
            filler: self.material_table(MaterialCategory::Filler, depth),
            ore: self.material_table(MaterialCategory::Ore, depth),
            background: self.material_table(MaterialCategory::Background, depth),
            flora: self.flora_table(depth),
        }
    }
}

/// Startup-populated map from biome id to biome.
#[derive(Debug, Clone, Default)]
pub struct BiomeRegistry {
    biomes: BTreeMap<ContentId, Biome>,
}

impl BiomeRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a biome; ids must be unique.
    pub fn register(&mut self, biome: Biome) -> Result<(), GenerationError> {
        if self.biomes.contains_key(biome.id()) {
            return Err(GenerationError::DuplicateId {
                kind: "biome",
                id: biome.id().clone(),
            });
        }
        self.biomes.insert(biome.id().clone(), biome);
        Ok(())
    }

    /// Look up a biome.
    pub fn get(&self, id: &ContentId) -> Option<&Biome> {
        self.biomes.get(id)
    }

    /// Biomes in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Biome> {
        self.biomes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(name: &str) -> ContentId {
        ContentId::parse(name).unwrap()
    }

    fn biome(materials: BiomeMaterials) -> Biome {
        Biome::new(
            id("caverns"),
            ProbabilityCurve2d::uncorrelated("caverns", 0.0, 0.0, 50.0, 50.0).unwrap(),
            ProbabilityCurve::new("caverns", 50.0, 20.0).unwrap(),
            materials,
        )
        .unwrap()
    }

    #[test]
    fn depth_likelihood_peaks_at_curve_mean() {
        let biome = biome(BiomeMaterials::default());
        let max_depth = 1000;
        let at_mean = biome.depth_likelihood(500, max_depth);
        let above = biome.depth_likelihood(300, max_depth);
        let surface = biome.depth_likelihood(0, max_depth);
        let below = biome.depth_likelihood(700, max_depth);
        assert!(at_mean > above && above > surface);
        assert!(at_mean > below);
    }

    #[test]
    fn depth_likelihood_tolerates_odd_bounds() {
        let biome = biome(BiomeMaterials::default());
        assert_eq!(biome.depth_likelihood(0, 0), 0.0);
        assert!(biome.depth_likelihood(10, 0).is_finite());
        assert!(biome.depth_likelihood(5000, 1000) >= 0.0);
        assert!(biome.depth_likelihood(-20, 1000) >= 0.0);
    }

    #[test]
    fn material_table_normalizes_filler() {
        let biome = biome(BiomeMaterials {
            filler: vec![
                MaterialLikelihood::new("stone", 0.0, 100.0).unwrap(),
                MaterialLikelihood::new("basalt", 400.0, 100.0).unwrap(),
            ],
            ..Default::default()
        });

        for depth in [0, 100, 200, 400] {
            let table = biome.material_table(MaterialCategory::Filler, depth);
            let sum: f64 = table.values().sum();
            assert!((sum - 1.0).abs() < 1e-9, "depth {depth}: sum {sum}");
        }

        let shallow = biome.material_table(MaterialCategory::Filler, 0);
        assert!(shallow["stone"] > shallow["basalt"]);
    }

    #[test]
    fn unused_category_is_empty() {
        let biome = biome(BiomeMaterials::default());
        assert!(biome.material_table(MaterialCategory::Ore, 10).is_empty());
    }

    #[test]
    fn flora_is_partitioned_by_direction() {
        let biome = biome(BiomeMaterials {
            flora: vec![
                MaterialLikelihood::flora("moss", 50.0, 30.0, Side::North).unwrap(),
                MaterialLikelihood::flora("vine", 50.0, 30.0, Side::South).unwrap(),
                MaterialLikelihood::flora("root", 80.0, 30.0, Side::South).unwrap(),
            ],
            ..Default::default()
        });

        let tables = biome.flora_table(50);
        assert_eq!(tables[Side::North.index()].len(), 1);
        assert!((tables[Side::North.index()]["moss"] - 1.0).abs() < 1e-9);
        assert!(tables[Side::East.index()].is_empty());
        assert!(tables[Side::West.index()].is_empty());

        let south = &tables[Side::South.index()];
        assert!((south.values().sum::<f64>() - 1.0).abs() < 1e-9);
        assert!(south["vine"] > south["root"]);
    }

    #[test]
    fn flora_without_direction_is_rejected() {
        let err = Biome::new(
            id("caverns"),
            ProbabilityCurve2d::uncorrelated("caverns", 0.0, 0.0, 1.0, 1.0).unwrap(),
            ProbabilityCurve::new("caverns", 50.0, 20.0).unwrap(),
            BiomeMaterials {
                flora: vec![MaterialLikelihood::new("moss", 1.0, 1.0).unwrap()],
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, GenerationError::MissingGrowthDirection { .. }));
    }

    #[test]
    fn spatial_likelihood_prefers_curve_center() {
        let biome = biome(BiomeMaterials::default());
        assert!(biome.spatial_likelihood(0.0, 0.0) > biome.spatial_likelihood(80.0, -40.0));
    }
}
