use gridfire_core::{CellCoord, EnemyId, Grid, Passability};
use gridfire_system_pathfinding::{PathError, PathResult};
use gridfire_system_pursuit::{Pursuer, Pursuit, RouteAssignment};

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

fn pursuer(id: u32, column: u32, row: u32) -> Pursuer {
    Pursuer {
        id: EnemyId::new(id),
        cell: CellCoord::new(column, row),
    }
}

#[test]
fn routes_are_issued_once_per_player_cell() {
    let grid = grid_from_rows(&[".....", ".....", "....."]);
    let pursuers = [pursuer(0, 0, 0), pursuer(1, 4, 2)];
    let mut pursuit = Pursuit::default();
    let mut out = Vec::new();

    pursuit
        .handle(&grid, &pursuers, CellCoord::new(2, 1), &mut out)
        .expect("well-formed query");
    assert_eq!(out.len(), 2);

    // Same player cell: previously issued routes stay in force.
    out.clear();
    pursuit
        .handle(&grid, &pursuers, CellCoord::new(2, 1), &mut out)
        .expect("well-formed query");
    assert!(out.is_empty());

    // The player stepped into a new cell: everyone replans.
    pursuit
        .handle(&grid, &pursuers, CellCoord::new(3, 1), &mut out)
        .expect("well-formed query");
    assert_eq!(out.len(), 2);
}

#[test]
fn routes_run_from_pursuer_to_player() {
    let grid = grid_from_rows(&["....", ".##.", "...."]);
    let pursuers = [pursuer(0, 0, 2), pursuer(1, 3, 0)];
    let player = CellCoord::new(3, 2);
    let mut pursuit = Pursuit::default();
    let mut out = Vec::new();

    pursuit
        .handle(&grid, &pursuers, player, &mut out)
        .expect("well-formed query");

    assert_eq!(out.len(), 2);
    for (assignment, expected) in out.iter().zip(&pursuers) {
        assert_eq!(assignment.pursuer, expected.id);
        let cells = assignment
            .route
            .clone()
            .into_cells()
            .expect("player is reachable");
        assert_eq!(cells.first(), Some(&expected.cell));
        assert_eq!(cells.last(), Some(&player));
    }
}

#[test]
fn walled_off_player_yields_absent_routes() {
    let grid = grid_from_rows(&["...#.", "...#.", "...#."]);
    let pursuers = [pursuer(0, 0, 1)];
    let player = CellCoord::new(4, 1);
    let mut pursuit = Pursuit::default();
    let mut out = Vec::new();

    pursuit
        .handle(&grid, &pursuers, player, &mut out)
        .expect("well-formed query");

    assert_eq!(
        out,
        vec![RouteAssignment {
            pursuer: EnemyId::new(0),
            route: PathResult::NotFound,
        }]
    );
}

#[test]
fn pursuer_standing_on_player_gets_single_cell_route() {
    let grid = grid_from_rows(&["...", "..."]);
    let cell = CellCoord::new(1, 1);
    let pursuers = [Pursuer {
        id: EnemyId::new(7),
        cell,
    }];
    let mut pursuit = Pursuit::default();
    let mut out = Vec::new();

    pursuit
        .handle(&grid, &pursuers, cell, &mut out)
        .expect("well-formed query");

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].route, PathResult::Found(vec![cell]));
}

#[test]
fn contract_violations_propagate_and_do_not_cache() {
    let grid = grid_from_rows(&["...", "..."]);
    let outside = CellCoord::new(9, 9);
    let pursuers = [pursuer(0, 0, 0)];
    let mut pursuit = Pursuit::default();
    let mut out = Vec::new();

    let result = pursuit.handle(&grid, &pursuers, outside, &mut out);
    assert_eq!(result, Err(PathError::OutOfBounds { cell: outside }));

    // The failed cell was not cached: a valid follow-up plans routes.
    let player = CellCoord::new(2, 1);
    pursuit
        .handle(&grid, &pursuers, player, &mut out)
        .expect("well-formed query");
    assert_eq!(out.len(), 1);
}
