//! Matrix game solving.
//!
//! This module solves two-player zero-sum games given as payoff matrices and
//! exports the resulting strategies.
//!
//! # Overview
//!
//! 1. Build a [`PayoffMatrix`] (validated on construction)
//! 2. Create a [`GameSolver`] from a [`SolverConfig`]
//! 3. Call [`GameSolver::resolve`] to get the value and both strategies
//! 4. Call [`export`] to write the strategy table
//!
//! # Example
//!
//! ```no_run
//! use matrix_game_solver::game::{export, GameSolver, PayoffMatrix, Perspective, SolverConfig};
//!
//! let config = SolverConfig::default();
//! let solver = GameSolver::new(config.clone()).unwrap();
//!
//! let matrix: PayoffMatrix = "3 -2\n-1 4".parse().unwrap();
//! let resolution = solver.resolve(&matrix, Perspective::Maximizer).unwrap();
//!
//! let bundle = export(&resolution, &config).unwrap();
//! println!("{} -> {}", bundle.title, bundle.path.display());
//! ```
//!
//! # Theory
//!
//! The row player picks a mixed strategy `x` to maximise its worst-case
//! payoff over the column player's pure replies:
//!
//! ```text
//! v = max_x min_j sum_i a[i][j] * x_i
//! ```
//!
//! The minimax theorem guarantees this equals the column player's
//! `min_y max_i sum_j a[i][j] * y_j`, so the LP always has an optimum.

pub mod config;
pub mod matrix;
pub mod output;
pub mod random;
pub mod solver;

pub use config::{BackendKind, ColumnConvention, ConfigError, SolverConfig};
pub use matrix::{PayoffMatrix, Perspective};
pub use output::{export, title_for, ExportBundle, StrategyRow, StrategyTable, CSV_HEADER};
pub use solver::{round_to, GameSolver, Resolution, Solution};
