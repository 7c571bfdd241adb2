//! Text codec for level files in the editor interchange format.
//!
//! Rows are separated by newlines and cells by `|`. The cell alphabet
//! is `o` (obstacle), a single space (open floor), `p` (player spawn),
//! `e,<weapon>` (enemy), and `w,<weapon>` (weapon pickup) with weapon
//! tokens `pistol`, `machineGun`, and `shotgun`. Every token round-trips
//! losslessly, so hand-authored and generated levels share one format.

use std::{error::Error, fmt};

use gridfire_core::{CellCoord, Grid, GridShapeError, Passability, WeaponKind};
use gridfire_system_levelgen::{LevelMap, Placement};

const CELL_DELIMITER: char = '|';
const OBSTACLE_TOKEN: &str = "o";
const OPEN_TOKEN: &str = " ";
const PLAYER_TOKEN: &str = "p";
const ENEMY_TAG: &str = "e";
const PICKUP_TAG: &str = "w";
const WEAPON_DELIMITER: char = ',';

/// Encodes a level into the editor text format.
pub(crate) fn encode(map: &LevelMap) -> String {
    let grid = map.grid();
    let columns = usize::try_from(grid.columns()).unwrap_or(0);
    let rows = usize::try_from(grid.rows()).unwrap_or(0);

    let mut tokens: Vec<Vec<String>> = Vec::with_capacity(rows);
    for row in 0..grid.rows() {
        let mut line = Vec::with_capacity(columns);
        for column in 0..grid.columns() {
            let open = grid.is_open(CellCoord::new(column, row));
            line.push(if open { OPEN_TOKEN } else { OBSTACLE_TOKEN }.to_owned());
        }
        tokens.push(line);
    }

    place_token(&mut tokens, map.player_spawn(), PLAYER_TOKEN.to_owned());
    for placement in map.enemies() {
        place_token(&mut tokens, placement.cell, tagged_token(ENEMY_TAG, placement.weapon));
    }
    for placement in map.pickups() {
        place_token(&mut tokens, placement.cell, tagged_token(PICKUP_TAG, placement.weapon));
    }

    tokens
        .iter()
        .map(|line| line.join(&CELL_DELIMITER.to_string()))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Decodes a level from the editor text format.
///
/// Validates rectangularity, the token vocabulary, and that exactly one
/// player spawn is present. Connectivity is deliberately not checked
/// here; loaders decide whether a disconnected map is acceptable.
pub(crate) fn decode(value: &str) -> Result<LevelMap, LevelTransferError> {
    if value.trim().is_empty() {
        return Err(LevelTransferError::EmptyPayload);
    }

    let lines: Vec<&str> = value.lines().collect();
    let expected_columns = lines
        .first()
        .map(|line| line.split(CELL_DELIMITER).count())
        .unwrap_or(0);

    let mut cells = Vec::with_capacity(lines.len() * expected_columns);
    let mut player_spawn = None;
    let mut enemies = Vec::new();
    let mut pickups = Vec::new();

    for (row_index, line) in lines.iter().enumerate() {
        let tokens: Vec<&str> = line.split(CELL_DELIMITER).collect();
        if tokens.len() != expected_columns {
            return Err(LevelTransferError::RaggedRow {
                row: row_index,
                expected: expected_columns,
                actual: tokens.len(),
            });
        }

        for (column_index, token) in tokens.iter().enumerate() {
            let cell = coordinate(column_index, row_index)?;
            match parse_token(token)? {
                CellToken::Obstacle => cells.push(Passability::Blocked),
                CellToken::Open => cells.push(Passability::Open),
                CellToken::Player => {
                    if player_spawn.replace(cell).is_some() {
                        return Err(LevelTransferError::DuplicatePlayer {
                            row: row_index,
                            column: column_index,
                        });
                    }
                    cells.push(Passability::Open);
                }
                CellToken::Enemy(weapon) => {
                    enemies.push(Placement { cell, weapon });
                    cells.push(Passability::Open);
                }
                CellToken::Pickup(weapon) => {
                    pickups.push(Placement { cell, weapon });
                    cells.push(Passability::Open);
                }
            }
        }
    }

    let columns = u32::try_from(expected_columns).map_err(|_| LevelTransferError::BoardTooLarge)?;
    let rows = u32::try_from(lines.len()).map_err(|_| LevelTransferError::BoardTooLarge)?;
    let grid = Grid::from_cells(columns, rows, cells).map_err(LevelTransferError::Shape)?;

    let player_spawn = player_spawn.ok_or(LevelTransferError::MissingPlayer)?;
    Ok(LevelMap::from_parts(grid, player_spawn, enemies, pickups))
}

enum CellToken {
    Obstacle,
    Open,
    Player,
    Enemy(WeaponKind),
    Pickup(WeaponKind),
}

fn parse_token(token: &str) -> Result<CellToken, LevelTransferError> {
    match token {
        OBSTACLE_TOKEN => return Ok(CellToken::Obstacle),
        OPEN_TOKEN => return Ok(CellToken::Open),
        PLAYER_TOKEN => return Ok(CellToken::Player),
        _ => {}
    }

    if let Some((tag, weapon)) = token.split_once(WEAPON_DELIMITER) {
        let weapon = parse_weapon(weapon)?;
        match tag {
            ENEMY_TAG => return Ok(CellToken::Enemy(weapon)),
            PICKUP_TAG => return Ok(CellToken::Pickup(weapon)),
            _ => {}
        }
    }

    Err(LevelTransferError::UnknownToken(token.to_owned()))
}

fn tagged_token(tag: &str, weapon: WeaponKind) -> String {
    format!("{tag}{WEAPON_DELIMITER}{}", weapon_token(weapon))
}

fn weapon_token(weapon: WeaponKind) -> &'static str {
    match weapon {
        WeaponKind::Pistol => "pistol",
        WeaponKind::MachineGun => "machineGun",
        WeaponKind::Shotgun => "shotgun",
    }
}

fn parse_weapon(token: &str) -> Result<WeaponKind, LevelTransferError> {
    match token {
        "pistol" => Ok(WeaponKind::Pistol),
        "machineGun" => Ok(WeaponKind::MachineGun),
        "shotgun" => Ok(WeaponKind::Shotgun),
        _ => Err(LevelTransferError::UnknownWeapon(token.to_owned())),
    }
}

fn place_token(tokens: &mut [Vec<String>], cell: CellCoord, token: String) {
    let Ok(row) = usize::try_from(cell.row()) else {
        return;
    };
    let Ok(column) = usize::try_from(cell.column()) else {
        return;
    };
    if let Some(slot) = tokens.get_mut(row).and_then(|line| line.get_mut(column)) {
        *slot = token;
    }
}

fn coordinate(column: usize, row: usize) -> Result<CellCoord, LevelTransferError> {
    let column = u32::try_from(column).map_err(|_| LevelTransferError::BoardTooLarge)?;
    let row = u32::try_from(row).map_err(|_| LevelTransferError::BoardTooLarge)?;
    Ok(CellCoord::new(column, row))
}

/// Errors that can occur while decoding a level file.
#[derive(Debug)]
pub(crate) enum LevelTransferError {
    /// The provided text was empty or contained only whitespace.
    EmptyPayload,
    /// A row held a different number of cells than the first row.
    RaggedRow {
        /// Zero-based index of the offending row.
        row: usize,
        /// Cell count established by the first row.
        expected: usize,
        /// Cell count actually found.
        actual: usize,
    },
    /// A cell token was outside the level alphabet.
    UnknownToken(String),
    /// A weapon suffix named no known weapon.
    UnknownWeapon(String),
    /// No cell carried the player token.
    MissingPlayer,
    /// More than one cell carried the player token.
    DuplicatePlayer {
        /// Zero-based row of the second player token.
        row: usize,
        /// Zero-based column of the second player token.
        column: usize,
    },
    /// The board dimensions exceed the coordinate space.
    BoardTooLarge,
    /// The parsed cells did not match the derived dimensions.
    Shape(GridShapeError),
}

impl fmt::Display for LevelTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "level text was empty"),
            Self::RaggedRow {
                row,
                expected,
                actual,
            } => write!(
                f,
                "row {row} holds {actual} cells where {expected} were expected"
            ),
            Self::UnknownToken(token) => write!(f, "cell token '{token}' is not recognised"),
            Self::UnknownWeapon(token) => write!(f, "weapon '{token}' is not recognised"),
            Self::MissingPlayer => write!(f, "level contains no player spawn"),
            Self::DuplicatePlayer { row, column } => {
                write!(f, "second player spawn at row {row}, column {column}")
            }
            Self::BoardTooLarge => write!(f, "board dimensions exceed the coordinate space"),
            Self::Shape(error) => write!(f, "level shape is inconsistent: {error}"),
        }
    }
}

impl Error for LevelTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Shape(error) => Some(error),
            _ => None,
        }
    }
}
