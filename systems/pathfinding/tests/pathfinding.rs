use std::collections::{HashMap, HashSet};

use gridfire_core::{CellCoord, Grid, Passability};
use gridfire_system_pathfinding::{
    distance_field, find_path, is_fully_connected, PathError, PathResult, UNREACHED,
};

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

/// Independent shortest-distance oracle: repeated relaxation over raw
/// coordinate deltas, sharing no code with the sweep under test.
fn oracle_distance(grid: &Grid, start: CellCoord, goal: CellCoord) -> Option<usize> {
    if !grid.is_open(start) || !grid.is_open(goal) {
        return None;
    }

    let mut distances: HashMap<CellCoord, usize> = HashMap::new();
    let _ = distances.insert(start, 0);

    loop {
        let mut changed = false;
        for cell in grid.open_cells() {
            let Some(&here) = distances.get(&cell) else {
                continue;
            };
            for (column_delta, row_delta) in [(0i64, -1i64), (0, 1), (-1, 0), (1, 0)] {
                let column = i64::from(cell.column()) + column_delta;
                let row = i64::from(cell.row()) + row_delta;
                let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
                    continue;
                };
                let neighbor = CellCoord::new(column, row);
                if !grid.is_open(neighbor) {
                    continue;
                }
                let better = distances
                    .get(&neighbor)
                    .map_or(true, |&known| known > here + 1);
                if better {
                    let _ = distances.insert(neighbor, here + 1);
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
    }

    distances.get(&goal).copied()
}

fn assert_valid_path(grid: &Grid, cells: &[CellCoord], start: CellCoord, goal: CellCoord) {
    assert_eq!(cells.first(), Some(&start), "path must begin at the start");
    assert_eq!(cells.last(), Some(&goal), "path must end at the goal");
    for cell in cells {
        assert!(grid.is_open(*cell), "path visits blocked cell {cell:?}");
    }
    for pair in cells.windows(2) {
        assert_eq!(
            pair[0].manhattan_distance(pair[1]),
            1,
            "consecutive path cells must be 4-adjacent"
        );
    }
    let distinct: HashSet<&CellCoord> = cells.iter().collect();
    assert_eq!(distinct.len(), cells.len(), "path must not revisit a cell");
}

fn bordered_open_5x5() -> Grid {
    grid_from_rows(&["#####", "#...#", "#...#", "#...#", "#####"])
}

fn cluttered_6x6() -> Grid {
    grid_from_rows(&[
        "......", //
        ".##.#.", //
        ".#..#.", //
        ".#.##.", //
        ".#....", //
        "......",
    ])
}

#[test]
fn scenario_a_shortest_path_has_exactly_four_edges() {
    let grid = bordered_open_5x5();
    let start = CellCoord::new(1, 1);
    let goal = CellCoord::new(3, 3);

    let result = find_path(&grid, start, goal).expect("well-formed query");
    let cells = result.into_cells().expect("open interior must connect");

    assert_eq!(cells.len() - 1, 4, "expected a 4-edge route");
    assert_valid_path(&grid, &cells, start, goal);
}

#[test]
fn scenario_b_isolated_goal_reports_not_found() {
    let grid = grid_from_rows(&["#####", "#.#.#", "###.#", "#...#", "#####"]);

    let result = find_path(&grid, CellCoord::new(1, 1), CellCoord::new(3, 3));
    assert_eq!(result, Ok(PathResult::NotFound));
}

#[test]
fn found_paths_are_valid_over_every_open_pair() {
    let grid = cluttered_6x6();
    let open: Vec<CellCoord> = grid.open_cells().collect();

    for &start in &open {
        for &goal in &open {
            let result = find_path(&grid, start, goal).expect("well-formed query");
            if let PathResult::Found(cells) = result {
                assert_valid_path(&grid, &cells, start, goal);
            }
        }
    }
}

#[test]
fn path_lengths_match_brute_force_distances() {
    let grid = cluttered_6x6();
    let open: Vec<CellCoord> = grid.open_cells().collect();

    for &start in &open {
        for &goal in &open {
            let expected = oracle_distance(&grid, start, goal);
            let result = find_path(&grid, start, goal).expect("well-formed query");
            match (expected, result) {
                (Some(distance), PathResult::Found(cells)) => {
                    assert_eq!(
                        cells.len() - 1,
                        distance,
                        "route from {start:?} to {goal:?} is not shortest"
                    );
                }
                (None, PathResult::NotFound) => {}
                (expected, result) => {
                    panic!("oracle {expected:?} disagrees with {result:?} for {start:?}->{goal:?}")
                }
            }
        }
    }
}

#[test]
fn not_found_coincides_with_unreachability() {
    let grid = grid_from_rows(&["..#..", "..#..", "#####", "..#..", "..#.."]);
    let open: Vec<CellCoord> = grid.open_cells().collect();

    for &start in &open {
        let field = distance_field(&grid, start).expect("well-formed query");
        for &goal in &open {
            let result = find_path(&grid, start, goal).expect("well-formed query");
            assert_eq!(
                result == PathResult::NotFound,
                !field.is_reached(goal),
                "reachability and path outcome disagree for {start:?}->{goal:?}"
            );
        }
    }
}

#[test]
fn degenerate_query_yields_single_cell_path() {
    let grid = cluttered_6x6();
    for cell in grid.open_cells() {
        let result = find_path(&grid, cell, cell).expect("well-formed query");
        assert_eq!(result, PathResult::Found(vec![cell]));
    }
}

#[test]
fn blocked_endpoints_are_a_defined_not_found() {
    let grid = grid_from_rows(&["...", ".#.", "..."]);
    let blocked = CellCoord::new(1, 1);
    let open = CellCoord::new(0, 0);

    assert_eq!(find_path(&grid, blocked, open), Ok(PathResult::NotFound));
    assert_eq!(find_path(&grid, open, blocked), Ok(PathResult::NotFound));
}

#[test]
fn malformed_queries_fail_fast() {
    let empty = Grid::new(0, 0);
    assert_eq!(
        find_path(&empty, CellCoord::new(0, 0), CellCoord::new(0, 0)),
        Err(PathError::EmptyGrid)
    );

    let grid = grid_from_rows(&["...", "..."]);
    let outside = CellCoord::new(3, 0);
    assert_eq!(
        find_path(&grid, outside, CellCoord::new(0, 0)),
        Err(PathError::OutOfBounds { cell: outside })
    );
    assert_eq!(
        find_path(&grid, CellCoord::new(0, 0), outside),
        Err(PathError::OutOfBounds { cell: outside })
    );
    assert_eq!(
        distance_field(&empty, CellCoord::new(0, 0)),
        Err(PathError::EmptyGrid)
    );
}

#[test]
fn connectivity_matches_flood_reachability() {
    assert!(is_fully_connected(&bordered_open_5x5()));
    assert!(is_fully_connected(&cluttered_6x6()));

    let split = grid_from_rows(&["..#..", "..#..", "..#.."]);
    assert!(!is_fully_connected(&split));
}

#[test]
fn connectivity_is_false_without_open_cells() {
    assert!(!is_fully_connected(&Grid::new(0, 0)));
    assert!(!is_fully_connected(&grid_from_rows(&["###", "###"])));
}

#[test]
fn distance_field_marks_unreachable_cells() {
    let grid = grid_from_rows(&["..#..", "..#..", "..#.."]);
    let field = distance_field(&grid, CellCoord::new(0, 0)).expect("well-formed query");

    assert_eq!(field.distance(CellCoord::new(1, 2)), Some(3));
    assert_eq!(field.distance(CellCoord::new(3, 0)), Some(UNREACHED));
    assert_eq!(field.distance(CellCoord::new(5, 0)), None);
}
