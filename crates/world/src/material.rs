//! Per-material depth likelihoods.

use crate::curve::ProbabilityCurve;
use crate::error::GenerationError;
use crate::side::Side;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Normalized material weights at one depth, keyed by material id.
///
/// Values sum to 1.0, or are all 0.0 when no material applies.
pub type MaterialTable = BTreeMap<String, f64>;

/// Material category within a biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Bulk rock filling solid ground.
    Filler,
    /// Ore veins replacing filler.
    Ore,
    /// Plants growing off solid surfaces.
    Flora,
    /// Background wall tiles.
    Background,
}

impl MaterialCategory {
    /// All categories.
    pub const ALL: [MaterialCategory; 4] = [
        MaterialCategory::Filler,
        MaterialCategory::Ore,
        MaterialCategory::Flora,
        MaterialCategory::Background,
    ];
}

/// A material paired with the curve ranking it by depth.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLikelihood {
    /// Material identifier. Several entries may share one id to form an aggregate.
    pub material: String,
    /// Density over depth.
    pub curve: ProbabilityCurve,
    /// Direction a flora entry grows towards. Only set for flora.
    pub growth_direction: Option<Side>,
}

impl MaterialLikelihood {
    /// Non-flora entry.
    pub fn new(material: impl Into<String>, mean: f64, stddev: f64) -> Result<Self, GenerationError> {
        let material = material.into();
        let curve = ProbabilityCurve::new(&material, mean, stddev)?;
        Ok(Self {
            material,
            curve,
            growth_direction: None,
        })
    }

    /// Flora entry growing towards `direction`.
    pub fn flora(
        material: impl Into<String>,
        mean: f64,
        stddev: f64,
        direction: Side,
    ) -> Result<Self, GenerationError> {
        let mut entry = Self::new(material, mean, stddev)?;
        entry.growth_direction = Some(direction);
        Ok(entry)
    }

    /// Unnormalized likelihood at `depth`.
    pub fn likelihood(&self, depth: f64) -> f64 {
        self.curve.density(depth)
    }
}

/// Normalize the likelihoods of `entries` at `depth` into a [`MaterialTable`].
///
/// Entries sharing a material id are summed after normalization. A zero sum
/// produces an all-zero table rather than an error.
pub(crate) fn normalized_table<'a, I>(entries: I, depth: f64) -> MaterialTable
where
    I: IntoIterator<Item = &'a MaterialLikelihood>,
{
    let mut raw: Vec<(&str, f64)> = entries
        .into_iter()
        .map(|entry| {
            let value = entry.likelihood(depth);
            let value = if value.is_finite() && value > 0.0 { value } else { 0.0 };
            (entry.material.as_str(), value)
        })
        .collect();

    let mut sum: f64 = raw.iter().map(|(_, v)| v).sum();
    if !sum.is_finite() {
        let max = raw.iter().map(|(_, v)| *v).fold(0.0, f64::max);
        for (_, value) in &mut raw {
            *value /= max;
        }
        sum = raw.iter().map(|(_, v)| v).sum();
    }
    let mut table = MaterialTable::new();
    for (material, value) in raw {
        let share = if sum > 0.0 { value / sum } else { 0.0 };
        *table.entry(material.to_string()).or_insert(0.0) += share;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(material: &str, mean: f64, stddev: f64) -> MaterialLikelihood {
        MaterialLikelihood::new(material, mean, stddev).unwrap()
    }

    #[test]
    fn table_sums_to_one() {
        let entries = [entry("stone", 10.0, 20.0), entry("granite", 60.0, 20.0)];
        let table = normalized_table(&entries, 35.0);
        let sum: f64 = table.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!((table["stone"] - table["granite"]).abs() < 1e-9);
    }

    #[test]
    fn shared_ids_are_aggregated() {
        let entries = [
            entry("iron", 10.0, 5.0),
            entry("iron", 10.0, 5.0),
            entry("coal", 10.0, 5.0),
        ];
        let table = normalized_table(&entries, 10.0);
        assert_eq!(table.len(), 2);
        assert!((table["iron"] - 2.0 / 3.0).abs() < 1e-9);
        assert!((table["coal"] - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn needle_curves_still_normalize() {
        let entries = [entry("quartz", 5.0, 4e-309), entry("mica", 5.0, 4e-309)];
        let table = normalized_table(&entries, 5.0);
        assert!((table["quartz"] - 0.5).abs() < 1e-9);
        assert!((table["mica"] - 0.5).abs() < 1e-9);
    }

    #[test]
    fn vanishing_likelihoods_give_zero_table() {
        let entries = [entry("stone", 0.0, 0.001), entry("granite", 0.0, 0.001)];
        let table = normalized_table(&entries, 1.0e6);
        assert_eq!(table.len(), 2);
        assert!(table.values().all(|v| *v == 0.0));
    }

    #[test]
    fn empty_entry_list_gives_empty_table() {
        let table = normalized_table(std::iter::empty(), 5.0);
        assert!(table.is_empty());
    }
}
