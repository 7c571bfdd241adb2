#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pursuit planning system that routes enemies toward the player.
//!
//! Routes are a function of the terrain and the player's occupied cell,
//! so the system caches that cell and recomputes only when it changes.
//! Ticks where the player stays inside one cell cost nothing, no matter
//! how many pursuers are registered.

use gridfire_core::{CellCoord, EnemyId, Grid};
use gridfire_system_pathfinding::{find_path, PathError, PathResult};

/// Position snapshot of a single pursuing enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pursuer {
    /// Identifier of the enemy the route belongs to.
    pub id: EnemyId,
    /// Open cell the enemy currently occupies.
    pub cell: CellCoord,
}

/// Fresh route issued to one pursuer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteAssignment {
    /// Enemy the route was computed for.
    pub pursuer: EnemyId,
    /// Route from the pursuer's cell to the player's cell, or
    /// [`PathResult::NotFound`] when the player is walled off. The
    /// caller decides what an idle pursuer does with an absent route.
    pub route: PathResult,
}

/// Pure system that recomputes pursuit routes on player cell changes.
#[derive(Debug, Default)]
pub struct Pursuit {
    player_cell: Option<CellCoord>,
}

impl Pursuit {
    /// Plans routes for every pursuer if the player's cell changed since
    /// the last call, pushing one assignment per pursuer into `out`.
    ///
    /// An unchanged player cell emits nothing and leaves previously
    /// issued routes in force. Contract violations from the underlying
    /// path queries propagate unchanged; the cached cell is only updated
    /// after every pursuer was routed, so a failed call is retried in
    /// full on the next tick.
    pub fn handle(
        &mut self,
        grid: &Grid,
        pursuers: &[Pursuer],
        player_cell: CellCoord,
        out: &mut Vec<RouteAssignment>,
    ) -> Result<(), PathError> {
        if self.player_cell == Some(player_cell) {
            return Ok(());
        }

        for pursuer in pursuers {
            let route = find_path(grid, pursuer.cell, player_cell)?;
            out.push(RouteAssignment {
                pursuer: pursuer.id,
                route,
            });
        }

        self.player_cell = Some(player_cell);
        Ok(())
    }

    /// Forgets the tracked player cell, forcing the next [`Self::handle`]
    /// call to plan from scratch. Intended for level transitions.
    pub fn reset(&mut self) {
        self.player_cell = None;
    }
}
