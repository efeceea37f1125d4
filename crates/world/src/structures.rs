//! Randomized structure assembly.
//!
//! A structure grows outward from a seed part. Each round snapshots the
//! frontier, tries one randomly chosen connection per side of every part in
//! the snapshot, keeps candidates whose bounds collide with nothing already
//! placed, and retires the processed parts. Growth stops once the attempt
//! budget is exceeded or the frontier empties, and the accepted parts are
//! flattened into a single [`TileMatrix`].

use crate::curve::ProbabilityCurve;
use crate::error::GenerationError;
use crate::matrix::TileMatrix;
use crate::side::Side;
use crate::structure_template::{PartRegistry, StructurePart};
use deepdelve_core::ContentId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, trace};

/// Fraction of `max_parts` that bounds the randomly drawn budget from below.
const MIN_BUDGET_FRACTION: f64 = 0.66;

/// Inclusive tile bounds of a placed part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PartBounds {
    /// Leftmost column.
    pub min_x: i32,
    /// Rightmost column.
    pub max_x: i32,
    /// Top row.
    pub min_y: i32,
    /// Bottom row.
    pub max_y: i32,
}

impl PartBounds {
    fn of(origin: (i32, i32), width: i32, height: i32) -> Self {
        Self {
            min_x: origin.0,
            max_x: origin.0 + width - 1,
            min_y: origin.1,
            max_y: origin.1 + height - 1,
        }
    }

    /// Whether the two bounds share at least one tile.
    pub fn intersects(self, other: PartBounds) -> bool {
        ranges_intersect(self.min_x, self.max_x, other.min_x, other.max_x)
            && ranges_intersect(self.min_y, self.max_y, other.min_y, other.max_y)
    }

    /// Smallest bounds covering both.
    pub fn union(self, other: PartBounds) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_y: self.min_y.min(other.min_y),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Width in tiles.
    pub fn width(self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Height in tiles.
    pub fn height(self) -> i32 {
        self.max_y - self.min_y + 1
    }

    fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            min_x: self.min_x + dx,
            max_x: self.max_x + dx,
            min_y: self.min_y + dy,
            max_y: self.max_y + dy,
        }
    }
}

fn ranges_intersect(a_min: i32, a_max: i32, b_min: i32, b_max: i32) -> bool {
    a_min <= b_max && b_min <= a_max
}

/// What the growth budget counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetPolicy {
    /// Every attempt, rejected or not. Collision-heavy connection tables
    /// may stop well short of `max_parts`.
    #[default]
    AllAttempts,
    /// Only accepted placements (the seed part excluded).
    AcceptedOnly,
}

/// Structure template: where growth starts and how large it may get.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    id: ContentId,
    seed_choices: Vec<ContentId>,
    max_parts: u32,
    depth_curve: Option<ProbabilityCurve>,
    budget_policy: BudgetPolicy,
}

impl Structure {
    /// Build a structure; at least one seed part is required.
    pub fn new(
        id: ContentId,
        seed_choices: Vec<ContentId>,
        max_parts: u32,
    ) -> Result<Self, GenerationError> {
        if seed_choices.is_empty() {
            return Err(GenerationError::EmptySeedChoices(id));
        }
        Ok(Self {
            id,
            seed_choices,
            max_parts,
            depth_curve: None,
            budget_policy: BudgetPolicy::default(),
        })
    }

    /// Weight structure selection by depth.
    #[must_use]
    pub fn with_depth_curve(mut self, curve: ProbabilityCurve) -> Self {
        self.depth_curve = Some(curve);
        self
    }

    /// Change what the growth budget counts.
    #[must_use]
    pub fn with_budget_policy(mut self, policy: BudgetPolicy) -> Self {
        self.budget_policy = policy;
        self
    }

    /// Structure id.
    pub fn id(&self) -> &ContentId {
        &self.id
    }

    /// Candidate seed parts.
    pub fn seed_choices(&self) -> &[ContentId] {
        &self.seed_choices
    }

    /// Upper bound of the growth budget.
    pub fn max_parts(&self) -> u32 {
        self.max_parts
    }

    /// Budget policy in effect.
    pub fn budget_policy(&self) -> BudgetPolicy {
        self.budget_policy
    }

    /// Relative likelihood of this structure at `depth`; `1.0` without a depth curve.
    pub fn depth_likelihood(&self, depth: i64, max_depth: i64) -> f64 {
        let Some(curve) = &self.depth_curve else {
            return 1.0;
        };
        let normalized = depth as f64 / max_depth as f64 * crate::biome::DEPTH_SCALE;
        if normalized.is_nan() {
            return 0.0;
        }
        curve.density(normalized)
    }

    /// Grow the structure and flatten it into a tile matrix.
    pub fn get_structure_matrix<R: Rng + ?Sized>(
        &self,
        parts: &PartRegistry,
        rng: &mut R,
    ) -> Result<TileMatrix, GenerationError> {
        self.generate(parts, rng).map(|generated| generated.matrix)
    }

    /// Grow the structure, returning the matrix plus a record of the growth.
    ///
    /// Fails only when a seed or connection references an unregistered part.
    #[instrument(skip(self, parts, rng), fields(structure = %self.id, max_parts = self.max_parts))]
    pub fn generate<R: Rng + ?Sized>(
        &self,
        parts: &PartRegistry,
        rng: &mut R,
    ) -> Result<GeneratedStructure, GenerationError> {
        let lower = (MIN_BUDGET_FRACTION * f64::from(self.max_parts)).ceil() as u32;
        let budget = rng.gen_range(lower..=self.max_parts).max(1);

        let seed_id = &self.seed_choices[rng.gen_range(0..self.seed_choices.len())];
        let seed = parts.resolve(seed_id, &self.id)?;
        debug!(seed = %seed_id, budget, "starting structure growth");

        let mut session = GenerationSession::new(seed);
        while session.spent(self.budget_policy) <= budget && !session.frontier.is_empty() {
            session.grow_round(parts, rng)?;
        }

        debug!(
            placed = session.placed.len(),
            attempts = session.attempts,
            "structure growth complete"
        );
        Ok(session.finish(self.id.clone(), budget))
    }
}

/// A part instance at a fixed origin.
#[derive(Debug, Clone, Copy)]
pub struct PlacedPart<'a> {
    /// Template being instantiated.
    pub part: &'a StructurePart,
    /// Top-left corner.
    pub origin: (i32, i32),
}

impl PlacedPart<'_> {
    /// Tiles covered by this instance.
    pub fn bounds(&self) -> PartBounds {
        PartBounds::of(self.origin, self.part.width(), self.part.height())
    }
}

/// Origin for `candidate` attached to `parent` on `side`, shifted by `offset`.
///
/// North and West candidates are pulled back by their own size so that their
/// far edge touches the parent.
pub fn attach_origin(
    parent: &PlacedPart<'_>,
    candidate: &StructurePart,
    side: Side,
    offset: i32,
) -> (i32, i32) {
    let (px, py) = parent.origin;
    match side {
        Side::North => (px + offset, py - candidate.height()),
        Side::East => (px + parent.part.width(), py + offset),
        Side::South => (px + offset, py + parent.part.height()),
        Side::West => (px - candidate.width(), py + offset),
    }
}

/// State of one growth call. Never outlives it.
struct GenerationSession<'a> {
    frontier: Vec<usize>,
    placed: Vec<PlacedPart<'a>>,
    bboxes: Vec<PartBounds>,
    attempts: u32,
}

impl<'a> GenerationSession<'a> {
    fn new(seed: &'a StructurePart) -> Self {
        let seed = PlacedPart {
            part: seed,
            origin: (0, 0),
        };
        Self {
            frontier: vec![0],
            bboxes: vec![seed.bounds()],
            placed: vec![seed],
            attempts: 0,
        }
    }

    fn spent(&self, policy: BudgetPolicy) -> u32 {
        match policy {
            BudgetPolicy::AllAttempts => self.attempts,
            BudgetPolicy::AcceptedOnly => self.placed.len() as u32 - 1,
        }
    }

    /// Process every part of the current frontier once.
    ///
    /// Parts accepted during the round only join the next round's frontier.
    fn grow_round<R: Rng + ?Sized>(
        &mut self,
        parts: &'a PartRegistry,
        rng: &mut R,
    ) -> Result<(), GenerationError> {
        let snapshot = std::mem::take(&mut self.frontier);
        for parent_idx in snapshot {
            let parent = self.placed[parent_idx];
            for side in Side::ALL {
                let options = parent.part.connections(side);
                if options.is_empty() {
                    continue;
                }

                let connection = &options[rng.gen_range(0..options.len())];
                let template = parts.resolve(&connection.part, parent.part.id())?;
                let candidate = PlacedPart {
                    part: template,
                    origin: attach_origin(&parent, template, side, connection.offset),
                };
                self.attempts += 1;

                let bounds = candidate.bounds();
                if self.bboxes.iter().any(|placed| placed.intersects(bounds)) {
                    trace!(part = %template.id(), ?side, origin = ?candidate.origin, "candidate collides");
                    continue;
                }

                self.frontier.push(self.placed.len());
                self.placed.push(candidate);
                self.bboxes.push(bounds);
            }
        }
        Ok(())
    }

    fn finish(self, structure: ContentId, budget: u32) -> GeneratedStructure {
        let union = self
            .bboxes
            .iter()
            .copied()
            .reduce(PartBounds::union)
            .unwrap_or(PartBounds::of((0, 0), 0, 0));

        let mut matrix = TileMatrix::empty(union.width() as usize, union.height() as usize);
        let mut placements = Vec::with_capacity(self.placed.len());

        for placed in &self.placed {
            let dx = (placed.origin.0 - union.min_x) as usize;
            let dy = (placed.origin.1 - union.min_y) as usize;
            for (y, row) in placed.part.grid().rows().enumerate() {
                for (x, cell) in row.iter().enumerate() {
                    matrix.set(dx + x, dy + y, cell.resolve());
                }
            }
            placements.push(Placement {
                part: placed.part.id().clone(),
                bounds: placed.bounds().shifted(-union.min_x, -union.min_y),
            });
        }

        GeneratedStructure {
            structure,
            matrix,
            placements,
            attempts: self.attempts,
            budget,
        }
    }
}

/// An accepted part in matrix coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Template id.
    pub part: ContentId,
    /// Covered tiles, relative to the matrix origin.
    pub bounds: PartBounds,
}

/// Result of growing a structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedStructure {
    /// Structure that was grown.
    pub structure: ContentId,
    /// Flattened tiles.
    pub matrix: TileMatrix,
    /// Accepted parts in placement order; the seed comes first.
    pub placements: Vec<Placement>,
    /// Candidate placements tried, rejected ones included.
    pub attempts: u32,
    /// Budget drawn for this run.
    pub budget: u32,
}

/// Startup-populated map from structure id to template.
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    structures: BTreeMap<ContentId, Structure>,
}

impl StructureRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a structure; ids must be unique.
    pub fn register(&mut self, structure: Structure) -> Result<(), GenerationError> {
        if self.structures.contains_key(structure.id()) {
            return Err(GenerationError::DuplicateId {
                kind: "structure",
                id: structure.id().clone(),
            });
        }
        self.structures.insert(structure.id().clone(), structure);
        Ok(())
    }

    /// Look up a structure.
    pub fn get(&self, id: &ContentId) -> Option<&Structure> {
        self.structures.get(id)
    }

    /// Check that every seed part is registered.
    pub fn validate(&self, parts: &PartRegistry) -> Result<(), GenerationError> {
        for structure in self.structures.values() {
            for seed in structure.seed_choices() {
                parts.resolve(seed, structure.id())?;
            }
        }
        Ok(())
    }

    /// Structures in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Structure> {
        self.structures.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure_template::{Cell, PartGrid};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn id(name: &str) -> ContentId {
        ContentId::parse(name).unwrap()
    }

    fn block(name: &str, width: usize, height: usize, fill: &str) -> StructurePart {
        let grid = PartGrid::filled(&id(name), width, height, Cell::literal(fill)).unwrap();
        StructurePart::new(id(name), grid)
    }

    #[test]
    fn lone_seed_yields_its_own_grid() {
        let mut parts = PartRegistry::new();
        parts.register(block("room", 3, 3, "Air")).unwrap();
        let structure = Structure::new(id("cell"), vec![id("room")], 1).unwrap();

        let mut rng = StdRng::seed_from_u64(9);
        let matrix = structure.get_structure_matrix(&parts, &mut rng).unwrap();
        assert_eq!((matrix.width(), matrix.height()), (3, 3));
        for y in 0..3 {
            for x in 0..3 {
                assert_eq!(matrix.get(x, y), Some("Air"));
            }
        }
    }

    #[test]
    fn attach_origin_touches_parent_on_every_side() {
        let parent_part = block("hub", 4, 3, "Air");
        let candidate = block("arm", 2, 5, "Air");
        let parent = PlacedPart {
            part: &parent_part,
            origin: (10, 20),
        };

        assert_eq!(attach_origin(&parent, &candidate, Side::North, 1), (11, 15));
        assert_eq!(attach_origin(&parent, &candidate, Side::East, -1), (14, 19));
        assert_eq!(attach_origin(&parent, &candidate, Side::South, 0), (10, 23));
        assert_eq!(attach_origin(&parent, &candidate, Side::West, 2), (8, 22));

        for side in Side::ALL {
            let placed = PlacedPart {
                part: &candidate,
                origin: attach_origin(&parent, &candidate, side, 0),
            };
            assert!(!placed.bounds().intersects(parent.bounds()), "{side:?} overlaps");
        }
    }

    #[test]
    fn single_east_chain_places_parts_side_by_side() {
        let mut parts = PartRegistry::new();
        parts
            .register(block("seg", 2, 1, "rail").with_connection(Side::East, id("seg"), 0))
            .unwrap();
        let structure = Structure::new(id("line"), vec![id("seg")], 4).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        let generated = structure.generate(&parts, &mut rng).unwrap();

        // One attempt per round, each accepted, until attempts exceed the budget.
        assert_eq!(generated.attempts, generated.budget + 1);
        assert_eq!(generated.placements.len() as u32, generated.attempts + 1);
        assert_eq!(generated.matrix.height(), 1);
        assert_eq!(generated.matrix.width(), 2 * generated.placements.len());
        assert!((3..=4).contains(&generated.budget));
    }

    #[test]
    fn rejected_attempts_consume_budget() {
        // Every part after the seed folds one of its two connections back onto
        // its parent, so each later round spends four attempts for two parts.
        let mut parts = PartRegistry::new();
        parts
            .register(
                block("hub", 1, 1, "Air")
                    .with_connection(Side::North, id("hub"), 0)
                    .with_connection(Side::South, id("hub"), 0),
            )
            .unwrap();
        let structure = Structure::new(id("column"), vec![id("hub")], 10).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let generated = structure.generate(&parts, &mut rng).unwrap();
        let placed = generated.placements.len() as u32;

        assert!((7..=10).contains(&generated.budget));
        assert_eq!(placed, generated.attempts / 2 + 2);
        assert!(generated.attempts > placed - 1, "no attempt was rejected");
        assert!(placed < generated.budget + 1);
        assert_eq!(generated.matrix.width(), 1);
        assert_eq!(generated.matrix.height() as u32, placed);
    }

    #[test]
    fn accepted_only_policy_ignores_collisions() {
        let mut parts = PartRegistry::new();
        parts
            .register(
                block("seg", 1, 1, "rail")
                    .with_connection(Side::East, id("seg"), 0)
                    .with_connection(Side::West, id("seg"), 0),
            )
            .unwrap();
        let structure = Structure::new(id("line"), vec![id("seg")], 6)
            .unwrap()
            .with_budget_policy(BudgetPolicy::AcceptedOnly);

        let mut rng = StdRng::seed_from_u64(11);
        let generated = structure.generate(&parts, &mut rng).unwrap();

        // Collisions are free, so accepted placements overtake the budget.
        assert!(generated.placements.len() as u32 > generated.budget);
        assert!(generated.attempts > generated.budget);
    }

    #[test]
    fn unknown_connection_target_aborts() {
        let mut parts = PartRegistry::new();
        parts
            .register(block("room", 2, 2, "Air").with_connection(Side::South, id("missing"), 0))
            .unwrap();
        let structure = Structure::new(id("broken"), vec![id("room")], 5).unwrap();

        let mut rng = StdRng::seed_from_u64(0);
        let err = structure.get_structure_matrix(&parts, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GenerationError::UnknownPart {
                part: id("missing"),
                referenced_by: id("room"),
            }
        );
    }

    #[test]
    fn unknown_seed_aborts() {
        let parts = PartRegistry::new();
        let structure = Structure::new(id("orphan"), vec![id("nowhere")], 5).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            structure.generate(&parts, &mut rng),
            Err(GenerationError::UnknownPart { .. })
        ));
    }

    #[test]
    fn empty_seed_list_is_rejected() {
        assert_eq!(
            Structure::new(id("none"), Vec::new(), 3),
            Err(GenerationError::EmptySeedChoices(id("none")))
        );
    }

    #[test]
    fn zero_max_parts_still_runs_one_round() {
        let mut parts = PartRegistry::new();
        parts
            .register(block("seg", 1, 1, "rail").with_connection(Side::South, id("seg"), 0))
            .unwrap();
        let structure = Structure::new(id("stub"), vec![id("seg")], 0).unwrap();

        let mut rng = StdRng::seed_from_u64(5);
        let generated = structure.generate(&parts, &mut rng).unwrap();
        assert_eq!(generated.budget, 1);
        assert_eq!(generated.placements.len(), 3);
        assert_eq!(generated.matrix.height(), 3);
    }

    #[test]
    fn depth_likelihood_defaults_to_one() {
        let structure = Structure::new(id("s"), vec![id("p")], 1).unwrap();
        assert_eq!(structure.depth_likelihood(10, 100), 1.0);

        let deep = structure.with_depth_curve(ProbabilityCurve::new("s", 90.0, 5.0).unwrap());
        assert!(deep.depth_likelihood(90, 100) > deep.depth_likelihood(10, 100));
    }
}
