#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Seeded level generation for Gridfire.
//!
//! The generator rolls a bordered board, scatters obstacles with a
//! clustering rule, and keeps re-rolling terrain until the open floor is
//! fully connected and large enough. Placement then draws the player
//! spawn, enemies, and weapon pickups from the open cells without
//! replacement. Every draw comes from one ChaCha stream, so a seed fully
//! determines the level.

use gridfire_core::{CellCoord, Grid, Passability, WeaponKind};
use gridfire_system_pathfinding::is_fully_connected;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

/// Tuning knobs controlling every adjustable aspect of level generation.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelSpec {
    /// Inclusive lower bound of the row-count roll.
    pub row_min: u32,
    /// Exclusive upper bound of the row-count roll; a bound at or below
    /// `row_min` pins the roll to `row_min`.
    pub row_max: u32,
    /// Inclusive lower bound of the column-count roll.
    pub col_min: u32,
    /// Exclusive upper bound of the column-count roll; a bound at or
    /// below `col_min` pins the roll to `col_min`.
    pub col_max: u32,
    /// Chance for an interior cell to turn into an obstacle on its own.
    pub base_obstacle_prob: f64,
    /// Chance applied instead when an orthogonal neighbor is already an
    /// obstacle; raising this grows long obstacle runs.
    pub adjacent_obstacle_prob: f64,
    /// Chance applied when only a diagonal neighbor is already an
    /// obstacle; raising this thickens obstacle clumps.
    pub diagonal_obstacle_prob: f64,
    /// Minimum number of open cells an acceptable board must keep.
    pub min_open_cells: usize,
    /// Divisor converting `difficulty × area` into an enemy count.
    pub enemy_area_divisor: f64,
    /// Weapon roll below this value yields a machine gun.
    pub machine_gun_threshold: f64,
    /// Weapon roll below this value (and above the machine-gun bound)
    /// yields a shotgun; everything above falls back to the pistol.
    /// The thresholds are cumulative, not independent probabilities.
    pub shotgun_threshold: f64,
    /// Terrain rolls allowed before generation gives up.
    pub max_attempts: u32,
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            row_min: 10,
            row_max: 30,
            col_min: 10,
            col_max: 30,
            base_obstacle_prob: 0.1,
            adjacent_obstacle_prob: 0.3,
            diagonal_obstacle_prob: 0.1,
            min_open_cells: 10,
            enemy_area_divisor: 80.0,
            machine_gun_threshold: 0.2,
            shotgun_threshold: 0.4,
            max_attempts: 1_000,
        }
    }
}

/// A cell consumed by an enemy or weapon pickup, with its weapon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Placement {
    /// Open cell the placement occupies.
    pub cell: CellCoord,
    /// Weapon carried by the enemy or offered by the pickup.
    pub weapon: WeaponKind,
}

/// A finished level: the terrain grid plus every placement record.
///
/// Placements occupy distinct open cells. Occupants never affect
/// passability; only `Blocked` terrain obstructs movement.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelMap {
    grid: Grid,
    player_spawn: CellCoord,
    enemies: Vec<Placement>,
    pickups: Vec<Placement>,
}

impl LevelMap {
    /// Assembles a level from already-validated parts.
    ///
    /// Intended for level loaders; the generator upholds the placement
    /// invariants itself, while loaders are expected to re-validate
    /// connectivity before trusting a hand-authored map.
    #[must_use]
    pub fn from_parts(
        grid: Grid,
        player_spawn: CellCoord,
        enemies: Vec<Placement>,
        pickups: Vec<Placement>,
    ) -> Self {
        Self {
            grid,
            player_spawn,
            enemies,
            pickups,
        }
    }

    /// Terrain grid backing the level.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cell where the player starts.
    #[must_use]
    pub const fn player_spawn(&self) -> CellCoord {
        self.player_spawn
    }

    /// Enemy placements in the order they were drawn.
    #[must_use]
    pub fn enemies(&self) -> &[Placement] {
        &self.enemies
    }

    /// Weapon-pickup placements in the order they were drawn.
    #[must_use]
    pub fn pickups(&self) -> &[Placement] {
        &self.pickups
    }
}

/// Error raised when no acceptable terrain emerges within the attempt
/// budget. Recoverable: relax the spec or retry with a fresh seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Every terrain roll came out disconnected or too cramped.
    #[error("no acceptable terrain after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of boards rolled and rejected.
        attempts: u32,
    },
}

/// Deterministic level generator owning its random stream.
#[derive(Clone, Debug)]
pub struct LevelGenerator {
    spec: LevelSpec,
    rng: ChaCha8Rng,
}

impl LevelGenerator {
    /// Creates a generator for the provided spec, seeded so that every
    /// produced level is reproducible from the seed alone.
    #[must_use]
    pub fn new(spec: LevelSpec, seed: u64) -> Self {
        Self {
            spec,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Spec the generator was configured with.
    #[must_use]
    pub fn spec(&self) -> &LevelSpec {
        &self.spec
    }

    /// Produces a level for the given difficulty.
    ///
    /// The returned map's open floor is fully connected and holds at
    /// least `min_open_cells` cells; all placements sit on distinct open
    /// cells. Fails with [`GenerationError::AttemptsExhausted`] instead
    /// of looping forever when the spec is unsatisfiable.
    pub fn generate(&mut self, difficulty: f64) -> Result<LevelMap, GenerationError> {
        let rows = roll_dimension(&mut self.rng, self.spec.row_min, self.spec.row_max);
        let columns = roll_dimension(&mut self.rng, self.spec.col_min, self.spec.col_max);

        let grid = self.roll_terrain(columns, rows)?;
        Ok(self.populate(grid, difficulty))
    }

    /// Rolls fresh terrain onto a re-bordered blank board until both
    /// acceptance checks pass, keeping the dimensions fixed across
    /// attempts.
    fn roll_terrain(&mut self, columns: u32, rows: u32) -> Result<Grid, GenerationError> {
        // Connectivity only counts a non-empty open set, so an accepted
        // board always has at least one open cell for placement.
        let required_open = self.spec.min_open_cells.max(1);

        for _ in 0..self.spec.max_attempts {
            let mut grid = bordered_board(columns, rows);
            self.scatter_obstacles(&mut grid);
            if grid.open_cell_count() >= required_open && is_fully_connected(&grid) {
                return Ok(grid);
            }
        }

        Err(GenerationError::AttemptsExhausted {
            attempts: self.spec.max_attempts,
        })
    }

    /// Scatters obstacles across the interior in row-major order.
    ///
    /// One probability roll decides each cell; earlier cells in the same
    /// pass feed the adjacency checks of later ones, which is what makes
    /// obstacles clump instead of landing as isolated specks. Diagonal
    /// adjacency matters only here, never for movement.
    fn scatter_obstacles(&mut self, grid: &mut Grid) {
        let columns = grid.columns();
        let rows = grid.rows();
        if columns < 3 || rows < 3 {
            return;
        }

        for row in 1..rows - 1 {
            for column in 1..columns - 1 {
                let cell = CellCoord::new(column, row);
                let roll: f64 = self.rng.gen();

                let beside_obstacle = has_blocked_orthogonal(grid, cell);
                let cornering_obstacle = has_blocked_diagonal(grid, cell);
                let becomes_obstacle = (beside_obstacle && roll < self.spec.adjacent_obstacle_prob)
                    || (cornering_obstacle && roll < self.spec.diagonal_obstacle_prob)
                    || roll < self.spec.base_obstacle_prob;

                if becomes_obstacle {
                    grid.set(cell, Passability::Blocked);
                }
            }
        }
    }

    /// Draws the player spawn, enemies, and pickups without replacement.
    fn populate(&mut self, grid: Grid, difficulty: f64) -> LevelMap {
        let mut pool: Vec<CellCoord> = grid.open_cells().collect();

        let area = f64::from(grid.columns()) * f64::from(grid.rows());
        let raw_count = (difficulty * area / self.spec.enemy_area_divisor).floor();
        let enemy_target = if raw_count.is_finite() && raw_count > 0.0 {
            raw_count as usize
        } else {
            0
        };

        let player_spawn = draw_cell(&mut self.rng, &mut pool);

        // The difficulty model can demand more enemies than the floor
        // holds; the pool caps it so placement always terminates.
        let enemy_count = enemy_target.min(pool.len());
        let mut enemies = Vec::with_capacity(enemy_count);
        for _ in 0..enemy_count {
            let cell = draw_cell(&mut self.rng, &mut pool);
            let weapon = weapon_for_roll(&self.spec, self.rng.gen());
            enemies.push(Placement { cell, weapon });
        }

        let pickup_count = (enemy_count / 2).min(pool.len());
        let mut pickups = Vec::with_capacity(pickup_count);
        for _ in 0..pickup_count {
            let cell = draw_cell(&mut self.rng, &mut pool);
            let weapon = weapon_for_roll(&self.spec, self.rng.gen());
            pickups.push(Placement { cell, weapon });
        }

        LevelMap {
            grid,
            player_spawn,
            enemies,
            pickups,
        }
    }
}

/// Uniform roll from `[min, max)`, pinned to `min` on a degenerate range.
fn roll_dimension(rng: &mut ChaCha8Rng, min: u32, max: u32) -> u32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..max)
    }
}

/// Blank board of the given dimensions with its boundary ring blocked.
fn bordered_board(columns: u32, rows: u32) -> Grid {
    let mut grid = Grid::new(columns, rows);
    if columns == 0 || rows == 0 {
        return grid;
    }

    for column in 0..columns {
        grid.set(CellCoord::new(column, 0), Passability::Blocked);
        grid.set(CellCoord::new(column, rows - 1), Passability::Blocked);
    }
    for row in 0..rows {
        grid.set(CellCoord::new(0, row), Passability::Blocked);
        grid.set(CellCoord::new(columns - 1, row), Passability::Blocked);
    }

    grid
}

fn has_blocked_orthogonal(grid: &Grid, cell: CellCoord) -> bool {
    [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)]
        .into_iter()
        .any(|(column_delta, row_delta)| blocked_at_offset(grid, cell, column_delta, row_delta))
}

fn has_blocked_diagonal(grid: &Grid, cell: CellCoord) -> bool {
    [(-1i64, -1i64), (1, -1), (-1, 1), (1, 1)]
        .into_iter()
        .any(|(column_delta, row_delta)| blocked_at_offset(grid, cell, column_delta, row_delta))
}

fn blocked_at_offset(grid: &Grid, cell: CellCoord, column_delta: i64, row_delta: i64) -> bool {
    let column = i64::from(cell.column()) + column_delta;
    let row = i64::from(cell.row()) + row_delta;
    let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
        return false;
    };
    matches!(
        grid.passability(CellCoord::new(column, row)),
        Some(Passability::Blocked)
    )
}

/// Removes and returns one uniformly chosen cell from the pool.
fn draw_cell(rng: &mut ChaCha8Rng, pool: &mut Vec<CellCoord>) -> CellCoord {
    debug_assert!(!pool.is_empty(), "draw_cell requires open cells");
    let index = rng.gen_range(0..pool.len());
    pool.swap_remove(index)
}

/// Maps one uniform roll onto a weapon via cumulative thresholds.
fn weapon_for_roll(spec: &LevelSpec, roll: f64) -> WeaponKind {
    if roll < spec.machine_gun_threshold {
        WeaponKind::MachineGun
    } else if roll < spec.shotgun_threshold {
        WeaponKind::Shotgun
    } else {
        WeaponKind::Pistol
    }
}
