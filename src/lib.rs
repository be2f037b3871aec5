//! # Matrix Game Solver
//!
//! Optimal mixed strategies and values for two-player zero-sum games given
//! as payoff matrices, computed by linear programming.
//!
//! ## Features
//!
//! - **LP Formulation**: Builds the row player's maximin program for any finite matrix
//! - **Pluggable Engines**: In-process simplex by default, GLPK behind a feature flag
//! - **Both Players**: Solves the matrix and its transpose in one call
//! - **Export**: Strategy table as CSV (and optionally JSON)
//!
//! ## Quick Start
//!
//! ```
//! use matrix_game_solver::{GameSolver, PayoffMatrix, Perspective, SolverConfig};
//!
//! let solver = GameSolver::new(SolverConfig::default()).unwrap();
//! let matrix = PayoffMatrix::new(vec![vec![2.0, -1.0], vec![-1.0, 1.0]]).unwrap();
//!
//! let resolution = solver.resolve(&matrix, Perspective::Maximizer).unwrap();
//! assert_eq!(resolution.value, 0.2);
//! assert_eq!(resolution.row_strategy, vec![0.4, 0.6]);
//! ```
//!
//! ## Modules
//!
//! - [`game`]: Payoff matrices, the game solver, configuration and export
//! - [`lp`]: LP model and the backend seam to external engines
//! - [`error`]: Error taxonomy shared by both
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         GameSolver                              │
//! │  - resolve(): orientation + row solve + column solve            │
//! │  - solve():   formulate + invoke + round                        │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ LpModel
//!                               ▼
//!                    ┌─────────────────────┐
//!                    │  LpBackend (trait)  │
//!                    └─────────────────────┘
//!                     │                   │
//!                     ▼                   ▼
//!              ┌────────────┐      ┌────────────┐
//!              │  Simplex   │      │    GLPK    │
//!              │  (minilp)  │      │ (glpsol)   │
//!              └────────────┘      └────────────┘
//! ```

#![warn(missing_docs)]

/// Error types.
pub mod error;

/// Game solving module.
///
/// Matrices, solver, resolver and report export.
pub mod game;

/// Linear-programming layer.
///
/// Model formulation and engine backends.
pub mod lp;

// Re-export commonly used types at crate root for convenience
pub use error::{GameError, MatrixDefect, Result};
pub use game::{
    export, ExportBundle, GameSolver, PayoffMatrix, Perspective, Resolution, Solution,
    SolverConfig, StrategyTable,
};
