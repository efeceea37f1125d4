//! Structure part templates and their registry.
//!
//! A part is an immutable grid of cells plus, for each side, the list of
//! parts that may attach there. Parts are registered once at startup and
//! looked up by id while structures grow.

use crate::error::GenerationError;
use crate::side::Side;
use deepdelve_core::ContentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One cell of a part grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    /// A fixed tile id placed verbatim, e.g. `"Air"`.
    Literal(String),
    /// A material id the world builder instantiates.
    #[serde(rename = "material")]
    MaterialRef(String),
}

impl Cell {
    /// Shorthand for [`Cell::Literal`].
    pub fn literal(id: impl Into<String>) -> Self {
        Self::Literal(id.into())
    }

    /// Shorthand for [`Cell::MaterialRef`].
    pub fn material(id: impl Into<String>) -> Self {
        Self::MaterialRef(id.into())
    }

    /// The identifier string this cell flattens to.
    pub fn resolve(&self) -> &str {
        match self {
            Self::Literal(id) | Self::MaterialRef(id) => id,
        }
    }
}

/// Rectangular, row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl PartGrid {
    /// Build a grid from rows. Rows must be non-empty and of equal width.
    pub fn new(part: &ContentId, rows: Vec<Vec<Cell>>) -> Result<Self, GenerationError> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if height == 0 || width == 0 {
            return Err(GenerationError::EmptyGrid(part.clone()));
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(GenerationError::RaggedGrid {
                    part: part.clone(),
                    row: row_idx,
                    expected: width,
                    found: row.len(),
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Build a grid from text rows, one palette symbol per cell.
    ///
    /// Each character of each row is mapped through `cell_for_symbol`; a
    /// symbol the palette does not map is an error. Symbols need not be ASCII.
    pub fn from_ascii(
        part: &ContentId,
        rows: &[&str],
        mut cell_for_symbol: impl FnMut(char) -> Option<Cell>,
    ) -> Result<Self, GenerationError> {
        let mut parsed = Vec::with_capacity(rows.len());
        for row in rows {
            let mut cells = Vec::with_capacity(row.len());
            for symbol in row.chars() {
                let cell = cell_for_symbol(symbol).ok_or_else(|| GenerationError::UnknownPaletteSymbol {
                    part: part.clone(),
                    symbol,
                })?;
                cells.push(cell);
            }
            parsed.push(cells);
        }
        Self::new(part, parsed)
    }

    /// A grid filled with one cell.
    pub fn filled(part: &ContentId, width: usize, height: usize, cell: Cell) -> Result<Self, GenerationError> {
        Self::new(part, vec![vec![cell; width]; height])
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(x, y)`, if in bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells.get(y * self.width + x)
    }

    /// Rows of the grid, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width)
    }
}

/// An attachment option: which part may attach, and how far it is shifted
/// along the side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    /// Part to attach.
    pub part: ContentId,
    /// Shift along the axis perpendicular to the side.
    pub offset: i32,
}

/// Immutable structure part template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructurePart {
    id: ContentId,
    grid: PartGrid,
    sides: [Vec<Connection>; 4],
}

impl StructurePart {
    /// Part with no connections.
    pub fn new(id: ContentId, grid: PartGrid) -> Self {
        Self {
            id,
            grid,
            sides: Default::default(),
        }
    }

    /// Add an attachment option on `side`.
    #[must_use]
    pub fn with_connection(mut self, side: Side, part: ContentId, offset: i32) -> Self {
        self.sides[side.index()].push(Connection { part, offset });
        self
    }

    /// Part id.
    pub fn id(&self) -> &ContentId {
        &self.id
    }

    /// Cell grid.
    pub fn grid(&self) -> &PartGrid {
        &self.grid
    }

    /// Width in cells.
    pub fn width(&self) -> i32 {
        self.grid.width() as i32
    }

    /// Height in cells.
    pub fn height(&self) -> i32 {
        self.grid.height() as i32
    }

    /// Attachment options on `side`.
    pub fn connections(&self, side: Side) -> &[Connection] {
        &self.sides[side.index()]
    }
}

/// Startup-populated map from part id to template.
#[derive(Debug, Clone, Default)]
pub struct PartRegistry {
    parts: BTreeMap<ContentId, StructurePart>,
}

impl PartRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a part; ids must be unique.
    pub fn register(&mut self, part: StructurePart) -> Result<(), GenerationError> {
        if self.parts.contains_key(part.id()) {
            return Err(GenerationError::DuplicateId {
                kind: "structure part",
                id: part.id().clone(),
            });
        }
        self.parts.insert(part.id().clone(), part);
        Ok(())
    }

    /// Look up a part.
    pub fn get(&self, id: &ContentId) -> Option<&StructurePart> {
        self.parts.get(id)
    }

    /// Look up a part that `referenced_by` depends on; missing parts are fatal.
    pub fn resolve(
        &self,
        id: &ContentId,
        referenced_by: &ContentId,
    ) -> Result<&StructurePart, GenerationError> {
        self.parts.get(id).ok_or_else(|| GenerationError::UnknownPart {
            part: id.clone(),
            referenced_by: referenced_by.clone(),
        })
    }

    /// Check that every connection target is registered.
    pub fn validate(&self) -> Result<(), GenerationError> {
        for part in self.parts.values() {
            for side in Side::ALL {
                for connection in part.connections(side) {
                    self.resolve(&connection.part, part.id())?;
                }
            }
        }
        Ok(())
    }

    /// Number of registered parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether no parts are registered.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts in id order.
    pub fn iter(&self) -> impl Iterator<Item = &StructurePart> {
        self.parts.values()
    }
}
