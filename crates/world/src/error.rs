//! Configuration errors raised while building or generating content.

use deepdelve_core::{ContentId, ContentIdError};
use thiserror::Error;

/// Fatal content-authoring errors.
///
/// These surface malformed static definitions and always name the offending
/// identifier. Degenerate probabilities are never reported here; they are
/// resolved by fallback policy at the call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GenerationError {
    /// A connection table or seed list references a part that is not registered.
    #[error("structure part `{part}` referenced by `{referenced_by}` is not registered")]
    UnknownPart {
        /// The unresolvable part id.
        part: ContentId,
        /// The part or structure holding the reference.
        referenced_by: ContentId,
    },
    /// A profile references a biome that is not registered.
    #[error("biome `{biome}` referenced by profile `{profile}` is not registered")]
    UnknownBiome {
        /// The unresolvable biome id.
        biome: ContentId,
        /// Profile holding the reference.
        profile: ContentId,
    },
    /// A profile references a structure that is not registered.
    #[error("structure `{structure}` referenced by profile `{profile}` is not registered")]
    UnknownStructure {
        /// The unresolvable structure id.
        structure: ContentId,
        /// Profile holding the reference.
        profile: ContentId,
    },
    /// No profile with this id exists.
    #[error("generation profile `{0}` is not registered")]
    UnknownProfile(ContentId),
    /// A probability curve was configured with a non-positive or non-finite deviation.
    #[error("probability curve for `{owner}` has invalid standard deviation {stddev}")]
    InvalidStdDev {
        /// Name of the definition owning the curve.
        owner: String,
        /// The rejected value.
        stddev: f64,
    },
    /// A 2-D curve's covariance does not form a positive-definite matrix.
    #[error("probability curve for `{owner}` has covariance {covariance} outside (-{limit}, {limit})")]
    InvalidCovariance {
        /// Name of the definition owning the curve.
        owner: String,
        /// The rejected covariance.
        covariance: f64,
        /// `stddev_x * stddev_y`; covariance must stay strictly inside this bound.
        limit: f64,
    },
    /// A frequency weight was negative or non-finite.
    #[error("weight {weight} for `{entry}` in profile `{profile}` must be finite and non-negative")]
    InvalidWeight {
        /// Profile holding the weight.
        profile: ContentId,
        /// Biome or structure the weight applies to.
        entry: ContentId,
        /// The rejected value.
        weight: f64,
    },
    /// A structure was defined without any seed part.
    #[error("structure `{0}` has no seed part choices")]
    EmptySeedChoices(ContentId),
    /// A part grid had no cells.
    #[error("structure part `{0}` has an empty grid")]
    EmptyGrid(ContentId),
    /// A part grid's rows disagree on width.
    #[error("structure part `{part}` row {row} has width {found}, expected {expected}")]
    RaggedGrid {
        /// Part being built.
        part: ContentId,
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// An ASCII grid used a symbol the palette does not map.
    #[error("structure part `{part}` uses unmapped palette symbol {symbol:?}")]
    UnknownPaletteSymbol {
        /// Part being built.
        part: ContentId,
        /// The unmapped character.
        symbol: char,
    },
    /// Two definitions of the same kind share an id.
    #[error("duplicate {kind} id `{id}`")]
    DuplicateId {
        /// Definition kind, e.g. "biome".
        kind: &'static str,
        /// The repeated id.
        id: ContentId,
    },
    /// An authored id failed to parse.
    #[error(transparent)]
    InvalidId(#[from] ContentIdError),
    /// A flora entry lacks a growth direction.
    #[error("flora material `{material}` in biome `{biome}` has no growth direction")]
    MissingGrowthDirection {
        /// Biome holding the entry.
        biome: ContentId,
        /// The flora material.
        material: String,
    },
}
