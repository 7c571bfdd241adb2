#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter for generating and inspecting Gridfire levels.

mod level_transfer;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use gridfire_core::{CellCoord, EnemyId};
use gridfire_system_levelgen::{LevelGenerator, LevelMap, LevelSpec};
use gridfire_system_pathfinding::{is_fully_connected, PathResult};
use gridfire_system_pursuit::{Pursuer, Pursuit};

#[derive(Debug, Parser)]
#[command(
    name = "gridfire",
    about = "Generate, inspect, and validate Gridfire levels"
)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Generate a fresh level and print it with pursuit routes.
    Generate(GenerateArgs),
    /// Load a level file, validate it, and print it with pursuit routes.
    Load(LoadArgs),
    /// Report connectivity and floor statistics for a level file.
    Check(LoadArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// Difficulty fed to the enemy-count model.
    #[arg(long, default_value_t = 1.0)]
    difficulty: f64,
    /// Seed for the level roll; drawn from entropy when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Pin both board dimensions to SIZE instead of rolling them.
    #[arg(long)]
    size: Option<u32>,
    /// Minimum number of open cells an acceptable board must keep.
    #[arg(long)]
    min_open_cells: Option<usize>,
    /// Write the level to PATH in the editor text format.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct LoadArgs {
    /// Level file in the editor text format.
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    match Cli::parse().command {
        CliCommand::Generate(args) => generate(args),
        CliCommand::Load(args) => load(args),
        CliCommand::Check(args) => check(args),
    }
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    let mut spec = LevelSpec::default();
    if let Some(size) = args.size {
        spec.row_min = size;
        spec.row_max = size;
        spec.col_min = size;
        spec.col_max = size;
    }
    if let Some(min_open_cells) = args.min_open_cells {
        spec.min_open_cells = min_open_cells;
    }

    let mut generator = LevelGenerator::new(spec, seed);
    let map = generator
        .generate(args.difficulty)
        .context("rolling a level")?;

    println!("seed: {seed}");
    print_map(&map)?;

    if let Some(path) = args.output {
        fs::write(&path, level_transfer::encode(&map))
            .with_context(|| format!("writing level file {}", path.display()))?;
        println!("saved to {}", path.display());
    }

    Ok(())
}

fn load(args: LoadArgs) -> anyhow::Result<()> {
    let map = read_level(&args.path)?;
    // Hand-authored maps carry no generator guarantee; refuse the ones a
    // player could get stuck in, like the editor does on save.
    if !is_fully_connected(map.grid()) {
        bail!("level {} has disconnected open space", args.path.display());
    }
    print_map(&map)
}

fn check(args: LoadArgs) -> anyhow::Result<()> {
    let map = read_level(&args.path)?;
    let grid = map.grid();
    let spawn = map.player_spawn();

    println!(
        "{}x{} board, {} open cells",
        grid.columns(),
        grid.rows(),
        grid.open_cell_count()
    );
    println!(
        "player at ({}, {}), {} enemies, {} pickups",
        spawn.column(),
        spawn.row(),
        map.enemies().len(),
        map.pickups().len()
    );

    if !is_fully_connected(grid) {
        bail!("level {} has disconnected open space", args.path.display());
    }
    println!("open space fully connected");
    Ok(())
}

fn read_level(path: &PathBuf) -> anyhow::Result<LevelMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading level file {}", path.display()))?;
    let map = level_transfer::decode(&text)
        .with_context(|| format!("parsing level file {}", path.display()))?;
    Ok(map)
}

fn print_map(map: &LevelMap) -> anyhow::Result<()> {
    println!("{}", render_board(map));

    let pursuers: Vec<Pursuer> = map
        .enemies()
        .iter()
        .enumerate()
        .map(|(index, placement)| Pursuer {
            id: EnemyId::new(index as u32),
            cell: placement.cell,
        })
        .collect();

    let mut pursuit = Pursuit::default();
    let mut assignments = Vec::new();
    pursuit
        .handle(map.grid(), &pursuers, map.player_spawn(), &mut assignments)
        .context("planning pursuit routes")?;

    for assignment in &assignments {
        let cell = pursuers[assignment.pursuer.get() as usize].cell;
        match &assignment.route {
            PathResult::Found(cells) => println!(
                "enemy {} at ({}, {}): {} steps to the player",
                assignment.pursuer.get(),
                cell.column(),
                cell.row(),
                cells.len() - 1
            ),
            PathResult::NotFound => println!(
                "enemy {} at ({}, {}): no route to the player",
                assignment.pursuer.get(),
                cell.column(),
                cell.row()
            ),
        }
    }

    Ok(())
}

fn render_board(map: &LevelMap) -> String {
    let grid = map.grid();
    let mut rows: Vec<Vec<char>> = (0..grid.rows())
        .map(|row| {
            (0..grid.columns())
                .map(|column| {
                    if grid.is_open(CellCoord::new(column, row)) {
                        '.'
                    } else {
                        'o'
                    }
                })
                .collect()
        })
        .collect();

    mark(&mut rows, map.player_spawn(), 'p');
    for placement in map.enemies() {
        mark(&mut rows, placement.cell, 'e');
    }
    for placement in map.pickups() {
        mark(&mut rows, placement.cell, 'w');
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

fn mark(rows: &mut [Vec<char>], cell: CellCoord, marker: char) {
    let (Ok(row), Ok(column)) = (usize::try_from(cell.row()), usize::try_from(cell.column()))
    else {
        return;
    };
    if let Some(slot) = rows.get_mut(row).and_then(|line| line.get_mut(column)) {
        *slot = marker;
    }
}
