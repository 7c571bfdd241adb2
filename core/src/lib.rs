#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Gridfire engine.
//!
//! This crate defines the grid vocabulary that connects the pathfinding,
//! level-generation, and pursuit systems: cell coordinates, cardinal
//! directions, the passability alphabet, and the dense [`Grid`] those
//! systems query. Grids are immutable while a query is in flight; the
//! level generator mutates its private board only during construction
//! and hands out a finished, read-only grid.

use std::{error::Error, fmt};

use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Cardinal movement directions available to grid agents.
///
/// Movement and reachability are strictly 4-directional; diagonals exist
/// only as a terrain-generation heuristic and never appear here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Returns the direction pointing the opposite way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
        }
    }

    /// Cell reached by taking one step from `cell` in this direction.
    ///
    /// Returns `None` when the step would leave the coordinate space
    /// (underflow past row or column zero); upper bounds are the grid's
    /// concern.
    #[must_use]
    pub fn step_from(self, cell: CellCoord) -> Option<CellCoord> {
        match self {
            Self::North => cell
                .row()
                .checked_sub(1)
                .map(|row| CellCoord::new(cell.column(), row)),
            Self::East => cell
                .column()
                .checked_add(1)
                .map(|column| CellCoord::new(column, cell.row())),
            Self::South => cell
                .row()
                .checked_add(1)
                .map(|row| CellCoord::new(cell.column(), row)),
            Self::West => cell
                .column()
                .checked_sub(1)
                .map(|column| CellCoord::new(column, cell.row())),
        }
    }
}

/// Passability state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passability {
    /// The cell is traversable floor.
    Open,
    /// The cell is an impassable obstacle.
    Blocked,
}

impl Passability {
    /// Reports whether the cell state permits traversal.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Weapon varieties carried by enemies and placed as pickups.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Common sidearm; the fallback of the rarity distribution.
    Pistol,
    /// Rapid-fire weapon; rarest draw.
    MachineGun,
    /// Close-range spread weapon.
    Shotgun,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Dense rectangular occupancy grid storing one [`Passability`] per cell.
///
/// Cells are stored in row-major order. The grid never resizes after
/// construction; queries treat it as immutable.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Passability>,
}

impl Grid {
    /// Creates a grid of the provided dimensions with every cell `Open`.
    #[must_use]
    pub fn new(columns: u32, rows: u32) -> Self {
        let capacity_u64 = u64::from(columns) * u64::from(rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![Passability::Open; capacity],
        }
    }

    /// Builds a grid from row-major cells, validating the cell count.
    pub fn from_cells(
        columns: u32,
        rows: u32,
        cells: Vec<Passability>,
    ) -> Result<Self, GridShapeError> {
        let expected_u64 = u64::from(columns) * u64::from(rows);
        let expected = usize::try_from(expected_u64).unwrap_or(usize::MAX);
        if cells.len() != expected {
            return Err(GridShapeError {
                columns,
                rows,
                actual: cells.len(),
            });
        }
        Ok(Self {
            columns,
            rows,
            cells,
        })
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells contained in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the grid contains no cells at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Reports whether the cell lies within the grid bounds.
    #[must_use]
    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Passability captured for the provided cell, if it lies in bounds.
    #[must_use]
    pub fn passability(&self, cell: CellCoord) -> Option<Passability> {
        self.index(cell).map(|index| self.cells[index])
    }

    /// Reports whether the cell is in bounds and traversable.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        self.passability(cell).is_some_and(Passability::is_open)
    }

    /// Overwrites the passability of the provided cell.
    ///
    /// Out-of-bounds cells are ignored. Only the level generator's
    /// construction phase mutates a grid; finished grids stay read-only.
    pub fn set(&mut self, cell: CellCoord, passability: Passability) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = passability;
            }
        }
    }

    /// Number of `Open` cells in the grid.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_open()).count()
    }

    /// Iterator over the coordinates of every `Open` cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        let columns = self.columns;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_open())
            .map(move |(index, _)| {
                let index = index as u64;
                let column = (index % u64::from(columns)) as u32;
                let row = (index / u64::from(columns)) as u32;
                CellCoord::new(column, row)
            })
    }

    /// Dense passability cells stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Passability] {
        &self.cells
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.in_bounds(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            row.checked_mul(width)?.checked_add(column)
        } else {
            None
        }
    }
}

/// Error raised when a cell buffer does not match the declared dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridShapeError {
    /// Declared number of columns.
    pub columns: u32,
    /// Declared number of rows.
    pub rows: u32,
    /// Number of cells actually provided.
    pub actual: usize,
}

impl fmt::Display for GridShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected {}x{} = {} cells, received {}",
            self.columns,
            self.rows,
            u64::from(self.columns) * u64::from(self.rows),
            self.actual
        )
    }
}

impl Error for GridShapeError {}
