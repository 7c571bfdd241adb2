#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Uniform-cost grid pathfinding for the Gridfire systems.
//!
//! All edge costs are 1, so a breadth-first sweep with a FIFO frontier
//! settles every cell at its true shortest distance without a priority
//! queue. The same sweep backs [`find_path`], [`distance_field`], and
//! [`is_fully_connected`], so movement, validation, and tooling can never
//! disagree about which cells count as neighbors.

use std::collections::VecDeque;

use gridfire_core::{CellCoord, Direction, Grid};
use thiserror::Error;

/// Sentinel hop count marking a cell the sweep never reached.
pub const UNREACHED: u16 = u16::MAX;

/// Fixed neighbor visitation order: up, down, left, right.
///
/// Ties between equally short paths resolve toward the earliest listed
/// direction, which keeps query results reproducible across runs.
const NEIGHBOR_ORDER: [Direction; 4] = [
    Direction::North,
    Direction::South,
    Direction::West,
    Direction::East,
];

/// Outcome of a shortest-path query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathResult {
    /// Cells from start to goal inclusive, in traversal order.
    ///
    /// Always holds at least one cell; a query whose start equals its
    /// goal yields the single-cell route.
    Found(Vec<CellCoord>),
    /// The goal cannot be reached from the start through open cells.
    NotFound,
}

impl PathResult {
    /// Reports whether a route was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Consumes the result, yielding the route cells if one was found.
    #[must_use]
    pub fn into_cells(self) -> Option<Vec<CellCoord>> {
        match self {
            Self::Found(cells) => Some(cells),
            Self::NotFound => None,
        }
    }
}

/// Contract violations raised by malformed queries.
///
/// An unreachable goal is a normal outcome ([`PathResult::NotFound`]),
/// never an error; these variants only cover inputs the caller should
/// not have constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The grid holds no cells at all.
    #[error("path query over an empty grid")]
    EmptyGrid,
    /// A query endpoint lies outside the grid bounds.
    #[error("query cell {cell:?} lies outside the grid")]
    OutOfBounds {
        /// The offending endpoint.
        cell: CellCoord,
    },
}

/// Dense hop-count field produced by a breadth-first sweep.
///
/// Mirrors the queried grid's dimensions and stores the distance from
/// the sweep's start for every reachable open cell, [`UNREACHED`] for
/// the rest. An internal artifact of the search, exposed for tests and
/// map tooling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    columns: u32,
    rows: u32,
    distances: Vec<u16>,
}

impl DistanceField {
    /// Number of columns covered by the field.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows covered by the field.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Hop count captured for the provided cell, if it lies within the
    /// field. In-bounds unreachable cells report [`UNREACHED`].
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u16> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        index(width, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    /// Reports whether the sweep reached the provided cell.
    #[must_use]
    pub fn is_reached(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some_and(|hops| hops != UNREACHED)
    }

    /// Dense hop counts stored in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[u16] {
        &self.distances
    }
}

/// Computes the shortest route between two open cells.
///
/// Returns [`PathResult::NotFound`] when either endpoint is blocked or
/// the goal is unreachable; rejects empty grids and out-of-bounds
/// endpoints outright. Pure: the grid is never mutated and no state
/// survives the call.
pub fn find_path(grid: &Grid, start: CellCoord, goal: CellCoord) -> Result<PathResult, PathError> {
    if grid.is_empty() {
        return Err(PathError::EmptyGrid);
    }
    if !grid.in_bounds(start) {
        return Err(PathError::OutOfBounds { cell: start });
    }
    if !grid.in_bounds(goal) {
        return Err(PathError::OutOfBounds { cell: goal });
    }
    if !grid.is_open(start) || !grid.is_open(goal) {
        return Ok(PathResult::NotFound);
    }
    if start == goal {
        return Ok(PathResult::Found(vec![start]));
    }

    let width = usize::try_from(grid.columns()).unwrap_or(0);
    let sweep = Sweep::run(grid, start, Some(goal));

    let reached_goal = index(width, goal)
        .and_then(|offset| sweep.distances.get(offset).copied())
        .is_some_and(|hops| hops != UNREACHED);
    if !reached_goal {
        return Ok(PathResult::NotFound);
    }

    match sweep.reconstruct(width, start, goal) {
        Some(cells) => Ok(PathResult::Found(cells)),
        None => Ok(PathResult::NotFound),
    }
}

/// Computes the hop count from `start` to every reachable open cell.
///
/// A blocked start yields a field with every cell [`UNREACHED`].
pub fn distance_field(grid: &Grid, start: CellCoord) -> Result<DistanceField, PathError> {
    if grid.is_empty() {
        return Err(PathError::EmptyGrid);
    }
    if !grid.in_bounds(start) {
        return Err(PathError::OutOfBounds { cell: start });
    }

    let sweep = Sweep::run(grid, start, None);
    Ok(DistanceField {
        columns: grid.columns(),
        rows: grid.rows(),
        distances: sweep.distances,
    })
}

/// Determines whether every open cell can reach every other open cell
/// through 4-directional moves over open cells.
///
/// A grid with no open cells reports `false`: the level generator's
/// floor invariant requires a populated, traversable open set, so an
/// empty one is a failing board rather than a vacuously connected one.
#[must_use]
pub fn is_fully_connected(grid: &Grid) -> bool {
    let open_count = grid.open_cell_count();
    let Some(seed) = grid.open_cells().next() else {
        return false;
    };

    let sweep = Sweep::run(grid, seed, None);
    sweep.reached == open_count
}

/// Working state of one breadth-first sweep.
///
/// Distances and predecessor directions are dense and row-major; the
/// predecessor of a settled cell is the direction of the move that first
/// entered it, so walking opposites from the goal recovers the route.
struct Sweep {
    distances: Vec<u16>,
    predecessors: Vec<Option<Direction>>,
    reached: usize,
}

impl Sweep {
    fn run(grid: &Grid, start: CellCoord, stop_at: Option<CellCoord>) -> Self {
        let width = usize::try_from(grid.columns()).unwrap_or(0);
        let cell_count = grid.cell_count();
        let mut sweep = Self {
            distances: vec![UNREACHED; cell_count],
            predecessors: vec![None; cell_count],
            reached: 0,
        };

        if !grid.is_open(start) {
            return sweep;
        }

        let Some(start_index) = index(width, start) else {
            return sweep;
        };
        sweep.distances[start_index] = 0;
        sweep.reached = 1;

        let mut frontier = VecDeque::new();
        frontier.push_back(start);

        while let Some(cell) = frontier.pop_front() {
            if stop_at == Some(cell) {
                break;
            }

            let Some(cell_index) = index(width, cell) else {
                continue;
            };
            let distance = sweep.distances[cell_index];
            if distance >= UNREACHED.saturating_sub(1) {
                continue;
            }
            let next_distance = distance + 1;

            for direction in NEIGHBOR_ORDER {
                let Some(neighbor) = direction.step_from(cell) else {
                    continue;
                };
                if !grid.is_open(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = index(width, neighbor) else {
                    continue;
                };
                if sweep.distances[neighbor_index] != UNREACHED {
                    continue;
                }

                sweep.distances[neighbor_index] = next_distance;
                sweep.predecessors[neighbor_index] = Some(direction);
                sweep.reached += 1;
                frontier.push_back(neighbor);
            }
        }

        sweep
    }

    /// Walks predecessor links from `goal` back to `start`, returning
    /// the route in traversal order. `None` indicates a broken link
    /// chain, which a settled goal never produces.
    fn reconstruct(&self, width: usize, start: CellCoord, goal: CellCoord) -> Option<Vec<CellCoord>> {
        let mut cells = vec![goal];
        let mut cursor = goal;

        while cursor != start {
            let entered_by = (*self.predecessors.get(index(width, cursor)?)?)?;
            cursor = entered_by.opposite().step_from(cursor)?;
            cells.push(cursor);
        }

        cells.reverse();
        Some(cells)
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridfire_core::Passability;

    fn grid_from_rows(rows: &[&str]) -> Grid {
        let height = u32::try_from(rows.len()).expect("row count fits u32");
        let width = rows
            .first()
            .map(|row| u32::try_from(row.len()).expect("column count fits u32"))
            .unwrap_or(0);
        let mut grid = Grid::new(width, height);
        for (row_index, row) in rows.iter().enumerate() {
            for (column_index, cell) in row.chars().enumerate() {
                if cell == '#' {
                    grid.set(
                        CellCoord::new(column_index as u32, row_index as u32),
                        Passability::Blocked,
                    );
                }
            }
        }
        grid
    }

    #[test]
    fn distance_field_sets_start_to_zero() {
        let grid = grid_from_rows(&["...", "...", "...", "..."]);
        let field = distance_field(&grid, CellCoord::new(1, 2)).expect("well-formed query");

        assert_eq!(field.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(field.distance(CellCoord::new(0, 0)), Some(3));
    }

    #[test]
    fn distance_field_respects_walls() {
        let grid = grid_from_rows(&["...", ".#.", "...", "..."]);
        let field = distance_field(&grid, CellCoord::new(1, 2)).expect("well-formed query");

        assert_eq!(field.distance(CellCoord::new(1, 1)), Some(UNREACHED));
        assert!(!field.is_reached(CellCoord::new(1, 1)));
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(4));
        assert_eq!(field.distance(CellCoord::new(0, 1)), Some(2));
    }

    #[test]
    fn distance_field_from_blocked_start_reaches_nothing() {
        let grid = grid_from_rows(&["...", ".#.", "..."]);
        let field = distance_field(&grid, CellCoord::new(1, 1)).expect("well-formed query");

        assert!(field.cells().iter().all(|&hops| hops == UNREACHED));
    }

    #[test]
    fn tie_break_follows_neighbor_order() {
        // Two equally short routes exist; up/down/left/right order makes
        // the sweep discover the southern route first.
        let grid = grid_from_rows(&["..", ".."]);
        let result =
            find_path(&grid, CellCoord::new(0, 0), CellCoord::new(1, 1)).expect("well-formed");

        assert_eq!(
            result,
            PathResult::Found(vec![
                CellCoord::new(0, 0),
                CellCoord::new(0, 1),
                CellCoord::new(1, 1),
            ])
        );
    }

    #[test]
    fn path_result_accessors_expose_cells() {
        let found = PathResult::Found(vec![CellCoord::new(2, 2)]);
        assert!(found.is_found());
        assert_eq!(found.into_cells(), Some(vec![CellCoord::new(2, 2)]));

        assert!(!PathResult::NotFound.is_found());
        assert_eq!(PathResult::NotFound.into_cells(), None);
    }
}
