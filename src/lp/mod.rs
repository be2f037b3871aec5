//! Linear-programming layer.
//!
//! This module turns a payoff matrix into a linear program and hands it to an
//! engine. No LP algorithm lives here: the engines are external crates or
//! processes reached through the [`LpBackend`] trait.
//!
//! # Flow
//!
//! ```text
//! PayoffMatrix ──formulate──▶ LpModel ──LpBackend::solve──▶ LpSolution
//! ```
//!
//! # Backends
//!
//! - [`SimplexBackend`]: in-process simplex from `minilp` (default)
//! - `GlpkBackend`: the `glpsol` executable, behind the `glpk` feature
//!
//! Any other engine can be plugged in by implementing [`LpBackend`] and
//! passing it to [`GameSolver::with_backend`](crate::game::GameSolver::with_backend).

pub mod backend;
pub mod model;

#[cfg(feature = "glpk")]
pub mod glpk;

pub use backend::{build_backend, LpBackend, LpSolution, SimplexBackend};
pub use model::{LinearConstraint, LpModel, Relation, Sense, VarId, Variable};

#[cfg(feature = "glpk")]
pub use glpk::GlpkBackend;
