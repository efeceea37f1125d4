//! Flattened tile output of structure growth.

use std::fmt;

/// Flattened structure output: material ids, or `None` for empty cells.
///
/// Row-major with `y` growing downwards. The world builder stamps this into
/// world storage at a placement coordinate of its choosing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileMatrix {
    width: usize,
    height: usize,
    cells: Vec<Option<String>>,
}

impl TileMatrix {
    /// All-empty matrix.
    pub fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at `(x, y)`; `None` both for empty cells and out-of-bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&str> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells[y * self.width + x].as_deref()
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, id: &str) {
        debug_assert!(x < self.width && y < self.height, "cell out of bounds");
        self.cells[y * self.width + x] = Some(id.to_string());
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Number of non-empty cells.
    pub fn filled_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Render one character per cell: the first character of the id, or
    /// `blank` for empty cells.
    pub fn render_ascii(&self, blank: char) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.rows() {
            for cell in row {
                out.push(
                    cell.as_deref()
                        .and_then(|id| id.chars().next())
                        .unwrap_or(blank),
                );
            }
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for TileMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_ascii(' '))
    }
}
