//! Matrix game solver binary.
//!
//! Usage:
//!   cargo run --release --bin solve_game -- [OPTIONS]
//!
//! Examples:
//!   solve_game --matrix "2,-1; -1,1"
//!   solve_game --matrix-file game.txt --role min --output result.csv --json
//!
//! Set `RUST_LOG=debug` to see formulation and engine details.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use matrix_game_solver::game::{
    export, BackendKind, ColumnConvention, GameSolver, PayoffMatrix, Perspective, SolverConfig,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Backend {
    Simplex,
    Glpk,
}

#[derive(Parser)]
#[command(name = "solve_game")]
#[command(about = "Optimal mixed strategies for a two-player zero-sum matrix game")]
struct Args {
    /// Payoff matrix inline: cells separated by commas or spaces, rows by ';'
    #[arg(short, long, conflicts_with = "matrix_file")]
    matrix: Option<String>,

    /// File with one matrix row per line
    #[arg(short = 'f', long)]
    matrix_file: Option<PathBuf>,

    /// Whether the row player maximises or minimises the payoffs (max|min)
    #[arg(short, long, default_value = "max")]
    role: Perspective,

    /// Configuration JSON file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// CSV output file (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// LP engine (overrides the config)
    #[arg(short, long, value_enum)]
    backend: Option<Backend>,

    /// Also write a JSON report next to the CSV
    #[arg(long)]
    json: bool,

    /// Derive the column strategy from the negated transpose
    #[arg(long)]
    negated_columns: bool,

    /// Solve both orientations in parallel
    #[arg(long)]
    parallel: bool,
}

fn load_config(args: &Args) -> Result<SolverConfig> {
    let mut config = match &args.config {
        Some(path) => SolverConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SolverConfig::default(),
    };

    if let Some(output) = &args.output {
        config = config.with_output_path(output);
    }
    if let Some(backend) = args.backend {
        config = config.with_backend(match backend {
            Backend::Simplex => BackendKind::Simplex,
            Backend::Glpk => BackendKind::Glpk,
        });
    }
    if args.json {
        config = config.with_json(true);
    }
    if args.negated_columns {
        config = config.with_column_convention(ColumnConvention::Negated);
    }
    if args.parallel {
        config = config.with_parallel(true);
    }

    Ok(config)
}

fn load_matrix(args: &Args) -> Result<PayoffMatrix> {
    let text = match (&args.matrix, &args.matrix_file) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
        }
        (None, None) => bail!("provide a payoff matrix with --matrix or --matrix-file"),
    };
    Ok(text.parse::<PayoffMatrix>()?)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let matrix = load_matrix(&args)?;

    println!(
        "Inputs - Rows: {}, Columns: {}, Row player: {}",
        matrix.rows(),
        matrix.cols(),
        args.role
    );

    let start = Instant::now();
    let solver = GameSolver::new(config.clone())?;
    let resolution = solver.resolve(&matrix, args.role)?;
    let bundle = export(&resolution, &config)?;

    println!("Output - {}", bundle.title);
    println!();
    bundle.table.print();
    println!();
    println!("Saved CSV: {}", bundle.path.display());
    if let Some(json_path) = &bundle.json_path {
        println!("Saved JSON: {}", json_path.display());
    }
    log::debug!(
        "solved with '{}' in {:.3}s",
        solver.backend_name(),
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
