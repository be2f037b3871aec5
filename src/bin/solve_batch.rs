//! Batch solver for many matrix games.
//!
//! Reads a JSON list of games and writes one CSV report per game into an
//! output directory, so reports never overwrite each other. Game names become
//! file names: they must be unique and must not contain path separators.
//!
//! Input format:
//! ```text
//! [
//!   { "name": "pennies", "matrix": [[1, -1], [-1, 1]] },
//!   { "name": "defence", "matrix": [[3, -2, 1], [-1, 4, 0]], "role": "min" }
//! ]
//! ```
//!
//! Usage:
//!   cargo run --release --bin solve_batch -- games.json --out-dir reports [--parallel]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use matrix_game_solver::game::{export, GameSolver, PayoffMatrix, Perspective, SolverConfig};
use matrix_game_solver::GameError;

#[derive(Parser)]
#[command(name = "solve_batch")]
#[command(about = "Solve a list of matrix games and write one report per game")]
struct Args {
    /// JSON file with the games to solve
    games: PathBuf,

    /// Directory for the reports
    #[arg(short, long, default_value = "reports")]
    out_dir: PathBuf,

    /// Configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solve games on all cores
    #[arg(long)]
    parallel: bool,
}

#[derive(Deserialize)]
struct GameInput {
    name: String,
    matrix: PayoffMatrix,
    #[serde(default)]
    role: Perspective,
}

struct Outcome {
    name: String,
    result: std::result::Result<String, GameError>,
}

/// Reject names that would collide or escape the output directory.
fn check_names(games: &[GameInput]) -> Result<()> {
    let mut seen = FxHashSet::default();
    for (index, game) in games.iter().enumerate() {
        let name = game.name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            bail!("game #{} has unusable name '{}'", index + 1, name);
        }
        if !seen.insert(name) {
            bail!("game #{} reuses the name '{}'", index + 1, name);
        }
    }
    Ok(())
}

fn solve_one(
    solver: &GameSolver,
    base: &SolverConfig,
    out_dir: &Path,
    game: &GameInput,
) -> Outcome {
    let config = base
        .clone()
        .with_output_path(out_dir.join(format!("{}.csv", game.name)));
    let result = solver
        .resolve(&game.matrix, game.role)
        .and_then(|resolution| export(&resolution, &config))
        .map(|bundle| bundle.title);
    Outcome {
        name: game.name.clone(),
        result,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SolverConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SolverConfig::default(),
    };

    let text = fs::read_to_string(&args.games)
        .with_context(|| format!("reading {}", args.games.display()))?;
    let games: Vec<GameInput> = serde_json::from_str(&text)
        .with_context(|| format!("parsing {}", args.games.display()))?;
    check_names(&games).with_context(|| format!("checking {}", args.games.display()))?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    let solver = GameSolver::new(config.clone())?;

    let bar = ProgressBar::new(games.len() as u64);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let outcomes: Vec<Outcome> = if args.parallel {
        games
            .par_iter()
            .map(|game| {
                let outcome = solve_one(&solver, &config, &args.out_dir, game);
                bar.inc(1);
                outcome
            })
            .collect()
    } else {
        games
            .iter()
            .map(|game| {
                bar.set_message(game.name.clone());
                let outcome = solve_one(&solver, &config, &args.out_dir, game);
                bar.inc(1);
                outcome
            })
            .collect()
    };
    bar.finish_and_clear();

    let mut failures = 0;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(title) => println!("{:<24} {}", outcome.name, title),
            Err(e) => {
                failures += 1;
                eprintln!("{:<24} error: {}", outcome.name, e);
            }
        }
    }

    println!(
        "\nSolved {}/{} games in {:.2}s -> {}",
        outcomes.len() - failures,
        outcomes.len(),
        start.elapsed().as_secs_f64(),
        args.out_dir.display()
    );

    if failures > 0 {
        anyhow::bail!("{} game(s) failed", failures);
    }
    Ok(())
}
