//! Grid generation with radius-based placement exclusion.
//!
//! The grid is a square matrix of cells. Candidate relay positions are
//! placed row by row; a position is only accepted if an earlier placement
//! "radiates" onto it, which guarantees every relay can reach an ancestor
//! and keeps placements from clustering arbitrarily.

use std::collections::HashSet;
use std::fmt;

use log::debug;
use rand::seq::index;
use rand::Rng;

use super::types::Node;

/// One cell of the topology grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    /// No relay may occupy this cell. Renders as "0".
    Empty,
    /// Accepted placement not yet materialized as a node. Renders as "-1".
    Candidate,
    /// Cell occupied by a finalized node, carrying its name.
    Assigned(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "0"),
            Self::Candidate => write!(f, "-1"),
            Self::Assigned(name) => write!(f, "{}", name),
        }
    }
}

/// Errors reported by grid construction and generation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GridError {
    #[error("min_per_row ({min}) must not exceed max_per_row ({max})")]
    RowBoundsInverted { min: usize, max: usize },
    #[error("max_per_row must be at least 1")]
    MaxPerRowZero,
    #[error("row bounds (min {min}, max {max}) must not exceed the grid size {size}")]
    RowBoundsExceedSize { min: usize, max: usize, size: usize },
    #[error("affect_radius ({radius}) must be between 1 and size / 2 ({limit})")]
    RadiusOutOfRange { radius: usize, limit: usize },
    #[error("the grid is empty")]
    EmptyGrid,
    #[error("grid row {row} has {len} cells, expected {expected} (square matrix required)")]
    RaggedRow { row: usize, len: usize, expected: usize },
}

/// Parameters for [`generate_grid`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridConfig {
    /// Number of rows and columns.
    pub size: usize,
    /// Minimum candidate placements attempted per row.
    pub min_per_row: usize,
    /// Maximum candidate placements attempted per row.
    pub max_per_row: usize,
    /// How far an accepted placement radiates onto later rows.
    pub affect_radius: usize,
}

impl GridConfig {
    /// Check every precondition, reporting the first violated one.
    pub fn validate(&self) -> Result<(), GridError> {
        if self.min_per_row > self.max_per_row {
            return Err(GridError::RowBoundsInverted {
                min: self.min_per_row,
                max: self.max_per_row,
            });
        }
        if self.max_per_row < 1 {
            return Err(GridError::MaxPerRowZero);
        }
        if self.min_per_row > self.size || self.max_per_row > self.size {
            return Err(GridError::RowBoundsExceedSize {
                min: self.min_per_row,
                max: self.max_per_row,
                size: self.size,
            });
        }
        if self.affect_radius < 1 || self.affect_radius > self.size / 2 {
            return Err(GridError::RadiusOutOfRange {
                radius: self.affect_radius,
                limit: self.size / 2,
            });
        }
        Ok(())
    }
}

/// Square matrix of candidate relay positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: usize,
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    fn empty(size: usize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::Empty; size]; size],
        }
    }

    /// Build a grid from an externally supplied matrix where zero marks an
    /// empty cell and any other value marks a candidate.
    pub fn from_matrix(matrix: &[Vec<i32>]) -> Result<Self, GridError> {
        if matrix.is_empty() || matrix.iter().any(|row| row.is_empty()) {
            return Err(GridError::EmptyGrid);
        }
        let size = matrix.len();
        for (row, cols) in matrix.iter().enumerate() {
            if cols.len() != size {
                return Err(GridError::RaggedRow {
                    row,
                    len: cols.len(),
                    expected: size,
                });
            }
        }

        let mut grid = Grid::empty(size);
        for (row, cols) in matrix.iter().enumerate() {
            for (col, &value) in cols.iter().enumerate() {
                if value != 0 {
                    grid.cells[row][col] = Cell::Candidate;
                }
            }
        }
        Ok(grid)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    pub fn is_candidate(&self, row: usize, col: usize) -> bool {
        matches!(self.cells[row][col], Cell::Candidate)
    }

    /// Columns of candidate cells in the given row, left to right.
    pub fn candidates_in_row(&self, row: usize) -> Vec<usize> {
        (0..self.size)
            .filter(|&col| self.is_candidate(row, col))
            .collect()
    }

    pub fn candidate_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| matches!(cell, Cell::Candidate))
            .count()
    }

    /// Rewrite the grid in place so every cell carries the name of the node
    /// occupying it. Candidate cells that produced no node become empty.
    pub fn assign_names(&mut self, nodes: &[Node]) {
        for row in &mut self.cells {
            for cell in row.iter_mut() {
                if matches!(cell, Cell::Candidate) {
                    *cell = Cell::Empty;
                }
            }
        }
        for node in nodes {
            let (row, col) = node.position;
            self.cells[row][col] = Cell::Assigned(node.name.clone());
        }
    }

    /// Render one row as display tokens, for reports and tests.
    pub fn row_tokens(&self, row: usize) -> Vec<String> {
        self.cells[row].iter().map(Cell::to_string).collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            writeln!(f, "{}", self.row_tokens(row).join(" "))?;
        }
        Ok(())
    }
}

/// Euclidean distance between two grid coordinates, in cell units.
pub fn distance_between(a: (usize, usize), b: (usize, usize)) -> f64 {
    let dr = a.0 as f64 - b.0 as f64;
    let dc = a.1 as f64 - b.1 as f64;
    (dr * dr + dc * dc).sqrt()
}

/// Cells within `radius` of `coord`, including `coord` itself.
///
/// The forward set expands onto later rows (increasing row index) and
/// sideways; with `reverse` it expands onto earlier rows instead, which is
/// the shape used when asking whether a cell has a qualifying placement
/// above it.
pub fn affected_cells(
    coord: (usize, usize),
    radius: usize,
    size: usize,
    reverse: bool,
) -> Result<HashSet<(usize, usize)>, GridError> {
    if radius < 1 || radius > size / 2 {
        return Err(GridError::RadiusOutOfRange {
            radius,
            limit: size / 2,
        });
    }

    let (row, col) = coord;
    let mut affected = HashSet::from([coord]);

    for i in 1..=radius {
        let target_row = if reverse {
            match row.checked_sub(i) {
                Some(r) => r,
                None => break,
            }
        } else {
            let r = row + i;
            if r >= size {
                break;
            }
            r
        };

        affected.insert((target_row, col));
        for j in 1..=radius {
            if let Some(left) = col.checked_sub(j) {
                affected.insert((target_row, left));
            }
            if col + j < size {
                affected.insert((target_row, col + j));
            }
        }
    }

    Ok(affected)
}

/// Generate a grid of candidate positions.
///
/// Row 0 receives exactly one candidate, the root anchor, at a uniformly
/// chosen column in the middle half of the row. Every later row draws a
/// random number of columns in `[min_per_row, max_per_row]`; a column is
/// accepted only if some earlier placement radiates onto it, and accepted
/// placements radiate onto rows below them in turn.
///
/// # Arguments
/// * `cfg` - Validated size, per-row bounds and radius
/// * `rng` - Randomness source; seed it for reproducible grids
pub fn generate_grid<R: Rng + ?Sized>(cfg: &GridConfig, rng: &mut R) -> Result<Grid, GridError> {
    cfg.validate()?;

    let size = cfg.size;
    let mut grid = Grid::empty(size);

    let left_limit = size / 4;
    let right_limit = size / 4 * 2;
    let anchor_col = rng.gen_range(left_limit..=right_limit);
    grid.cells[0][anchor_col] = Cell::Candidate;

    let mut affected = affected_cells((0, anchor_col), cfg.affect_radius, size, false)?;

    for row in 1..size {
        let amount = rng.gen_range(cfg.min_per_row..=cfg.max_per_row);
        for col in index::sample(rng, size, amount) {
            if affected.contains(&(row, col)) {
                grid.cells[row][col] = Cell::Candidate;
                affected.extend(affected_cells((row, col), cfg.affect_radius, size, false)?);
            }
        }
    }

    debug!(
        "generated {}x{} grid with {} candidate cells (anchor column {})",
        size,
        size,
        grid.candidate_count(),
        anchor_col
    );
    Ok(grid)
}
