//! Serde shapes of a content pack and their conversion into world types.

use std::collections::BTreeMap;

use deepdelve_core::ContentId;
use deepdelve_world::{
    Biome, BiomeGenerationProfile, BiomeMaterials, BudgetPolicy, Cell, GenerationError,
    MaterialLikelihood, PartGrid, ProbabilityCurve, ProbabilityCurve2d, Side, Structure,
    StructurePart, WorldgenContent,
};
use serde::Deserialize;

use crate::AssetError;

/// Top-level pack layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackDefinition {
    /// Biome definitions.
    #[serde(default)]
    pub biomes: Vec<BiomeDefinition>,
    /// Structure part definitions.
    #[serde(default)]
    pub parts: Vec<PartDefinition>,
    /// Structure definitions.
    #[serde(default)]
    pub structures: Vec<StructureDefinition>,
    /// Generation profiles.
    #[serde(default)]
    pub profiles: Vec<ProfileDefinition>,
}

/// 1-D Gaussian parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CurveDefinition {
    /// Peak location.
    pub mean: f64,
    /// Spread; must be positive.
    pub stddev: f64,
}

/// 2-D Gaussian parameters.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SpatialCurveDefinition {
    /// Horizontal peak.
    pub mean_x: f64,
    /// Vertical peak.
    pub mean_y: f64,
    /// Horizontal spread.
    pub stddev_x: f64,
    /// Vertical spread.
    pub stddev_y: f64,
    /// Correlation between the axes.
    #[serde(default)]
    pub covariance: f64,
}

/// One material entry.
#[derive(Debug, Clone, Deserialize)]
pub struct MaterialDefinition {
    /// Material id.
    pub material: String,
    /// Depth at which the material peaks.
    pub mean: f64,
    /// Spread around `mean`.
    pub stddev: f64,
    /// Required for flora, ignored elsewhere.
    #[serde(default)]
    pub growth_direction: Option<Side>,
}

/// Material lists per category.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaterialsDefinition {
    /// Filler entries.
    #[serde(default)]
    pub filler: Vec<MaterialDefinition>,
    /// Ore entries.
    #[serde(default)]
    pub ore: Vec<MaterialDefinition>,
    /// Flora entries.
    #[serde(default)]
    pub flora: Vec<MaterialDefinition>,
    /// Background entries.
    #[serde(default)]
    pub background: Vec<MaterialDefinition>,
}

/// A biome as authored.
#[derive(Debug, Clone, Deserialize)]
pub struct BiomeDefinition {
    /// Biome id.
    pub id: String,
    /// Depth curve over `0..=100`.
    pub depth: CurveDefinition,
    /// Spatial curve.
    pub spatial: SpatialCurveDefinition,
    /// Material lists.
    #[serde(default)]
    pub materials: MaterialsDefinition,
}

/// A connection option on one side of a part.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionDefinition {
    /// Id of the attaching part.
    pub part: String,
    /// Shift along the side.
    #[serde(default)]
    pub offset: i32,
}

/// A structure part authored as ASCII rows.
#[derive(Debug, Clone, Deserialize)]
pub struct PartDefinition {
    /// Part id.
    pub id: String,
    /// Grid rows, top to bottom; one palette symbol per cell.
    pub rows: Vec<String>,
    /// Symbol to cell mapping.
    pub palette: BTreeMap<char, Cell>,
    /// Attachment options per side.
    #[serde(default)]
    pub connections: BTreeMap<Side, Vec<ConnectionDefinition>>,
}

/// A structure as authored.
#[derive(Debug, Clone, Deserialize)]
pub struct StructureDefinition {
    /// Structure id.
    pub id: String,
    /// Ids of candidate seed parts.
    pub seed_choices: Vec<String>,
    /// Upper bound of the growth budget.
    pub max_parts: u32,
    /// Optional depth curve weighting selection.
    #[serde(default)]
    pub depth: Option<CurveDefinition>,
    /// What the growth budget counts.
    #[serde(default)]
    pub budget_policy: BudgetPolicy,
}

/// A generation profile as authored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileDefinition {
    /// Profile id.
    pub id: String,
    /// Biome id to frequency weight.
    #[serde(default)]
    pub biomes: BTreeMap<String, f64>,
    /// Structure id to frequency weight.
    #[serde(default)]
    pub structures: BTreeMap<String, f64>,
}

impl PackDefinition {
    /// Register every definition into a fresh content set.
    ///
    /// Cross references are not checked here; see
    /// [`WorldgenContent::validate`].
    pub fn into_content(self) -> Result<WorldgenContent, AssetError> {
        let mut content = WorldgenContent::new();
        for biome in self.biomes {
            content.add_biome(biome.build()?)?;
        }
        for part in self.parts {
            content.add_part(part.build()?)?;
        }
        for structure in self.structures {
            content.add_structure(structure.build()?)?;
        }
        for profile in self.profiles {
            content.add_profile(profile.build()?)?;
        }
        Ok(content)
    }
}

impl BiomeDefinition {
    fn build(self) -> Result<Biome, AssetError> {
        let id = ContentId::parse(&self.id)?;
        let owner = id.to_string();
        let spatial = ProbabilityCurve2d::new(
            &owner,
            self.spatial.mean_x,
            self.spatial.mean_y,
            self.spatial.stddev_x,
            self.spatial.stddev_y,
            self.spatial.covariance,
        )?;
        let depth = ProbabilityCurve::new(&owner, self.depth.mean, self.depth.stddev)?;

        let materials = BiomeMaterials {
            filler: build_materials(self.materials.filler, false)?,
            ore: build_materials(self.materials.ore, false)?,
            flora: build_materials(self.materials.flora, true)?,
            background: build_materials(self.materials.background, false)?,
        };
        Ok(Biome::new(id, spatial, depth, materials)?)
    }
}

fn build_materials(
    entries: Vec<MaterialDefinition>,
    keep_direction: bool,
) -> Result<Vec<MaterialLikelihood>, GenerationError> {
    entries
        .into_iter()
        .map(|entry| {
            let mut built = MaterialLikelihood::new(entry.material, entry.mean, entry.stddev)?;
            if keep_direction {
                built.growth_direction = entry.growth_direction;
            }
            Ok(built)
        })
        .collect()
}

impl PartDefinition {
    fn build(self) -> Result<StructurePart, AssetError> {
        let id = ContentId::parse(&self.id)?;
        let rows: Vec<&str> = self.rows.iter().map(String::as_str).collect();
        let palette = &self.palette;
        let grid = PartGrid::from_ascii(&id, &rows, |symbol| palette.get(&symbol).cloned())?;

        let mut part = StructurePart::new(id, grid);
        for (side, connections) in self.connections {
            for connection in connections {
                part = part.with_connection(side, ContentId::parse(&connection.part)?, connection.offset);
            }
        }
        Ok(part)
    }
}

impl StructureDefinition {
    fn build(self) -> Result<Structure, AssetError> {
        let id = ContentId::parse(&self.id)?;
        let seeds = self
            .seed_choices
            .iter()
            .map(|seed| ContentId::parse(seed))
            .collect::<Result<Vec<_>, _>>()?;

        let mut structure = Structure::new(id, seeds, self.max_parts)?.with_budget_policy(self.budget_policy);
        if let Some(depth) = self.depth {
            let curve = ProbabilityCurve::new(&structure.id().to_string(), depth.mean, depth.stddev)?;
            structure = structure.with_depth_curve(curve);
        }
        Ok(structure)
    }
}

impl ProfileDefinition {
    fn build(self) -> Result<BiomeGenerationProfile, AssetError> {
        let id = ContentId::parse(&self.id)?;
        let biomes = parse_weights(self.biomes)?;
        let structures = parse_weights(self.structures)?;
        Ok(BiomeGenerationProfile::new(id, biomes, structures)?)
    }
}

fn parse_weights(raw: BTreeMap<String, f64>) -> Result<BTreeMap<ContentId, f64>, AssetError> {
    raw.into_iter()
        .map(|(id, weight)| -> Result<_, AssetError> { Ok((ContentId::parse(&id)?, weight)) })
        .collect()
}
