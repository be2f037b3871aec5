//! Error types shared by the LP layer and the game solver.
//!
//! Every failure is returned to the caller. Nothing here is ever mapped to a
//! default value or a partial result.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::game::config::ConfigError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GameError>;

/// What is wrong with a payoff matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixDefect {
    /// The matrix has no rows.
    NoRows,
    /// The matrix has rows but no columns.
    NoColumns,
    /// A row has a different length than the first row.
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// An entry is NaN or infinite.
    NonFinite {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// The offending value.
        value: f64,
    },
    /// A cell in textual input is not a number.
    Parse {
        /// 1-based input line.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },
}

impl fmt::Display for MatrixDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixDefect::NoRows => write!(f, "matrix has no rows"),
            MatrixDefect::NoColumns => write!(f, "matrix has no columns"),
            MatrixDefect::Ragged { row, expected, found } => write!(
                f,
                "row {} has {} entries, expected {}",
                row, found, expected
            ),
            MatrixDefect::NonFinite { row, col, value } => {
                write!(f, "entry ({}, {}) is not finite: {}", row, col, value)
            }
            MatrixDefect::Parse { line, token } => {
                write!(f, "line {}: '{}' is not a number", line, token)
            }
        }
    }
}

/// Errors raised while formulating, solving or exporting a game.
#[derive(Debug)]
pub enum GameError {
    /// The payoff matrix was rejected before formulation.
    InvalidMatrix(MatrixDefect),
    /// The LP engine could not be located or invoked.
    SolverUnavailable {
        /// Backend name.
        backend: String,
        /// Why the engine could not be used.
        reason: String,
    },
    /// The engine reported the model infeasible.
    Infeasible {
        /// Backend name.
        backend: String,
    },
    /// The engine reported the model unbounded.
    Unbounded {
        /// Backend name.
        backend: String,
    },
    /// The engine stopped with some other non-optimal status or unreadable output.
    SolverFailed {
        /// Backend name.
        backend: String,
        /// Engine-provided detail.
        reason: String,
    },
    /// The engine returned no value for a model variable.
    MissingVariable {
        /// Name of the variable.
        name: String,
    },
    /// Persisting a report failed.
    FileWrite {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The solver configuration is invalid.
    Config(ConfigError),
}

impl GameError {
    /// Wrap an I/O failure for `path`.
    pub fn file_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GameError::FileWrite {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidMatrix(defect) => write!(f, "invalid payoff matrix: {}", defect),
            GameError::SolverUnavailable { backend, reason } => {
                write!(f, "LP backend '{}' is unavailable: {}", backend, reason)
            }
            GameError::Infeasible { backend } => {
                write!(f, "LP backend '{}' reported the problem infeasible", backend)
            }
            GameError::Unbounded { backend } => {
                write!(f, "LP backend '{}' reported the problem unbounded", backend)
            }
            GameError::SolverFailed { backend, reason } => {
                write!(f, "LP backend '{}' failed: {}", backend, reason)
            }
            GameError::MissingVariable { name } => {
                write!(f, "solver returned no value for variable '{}'", name)
            }
            GameError::FileWrite { path, source } => {
                write!(f, "could not write {}: {}", path.display(), source)
            }
            GameError::Config(err) => write!(f, "invalid configuration: {}", err),
        }
    }
}

impl std::error::Error for GameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GameError::FileWrite { source, .. } => Some(source),
            GameError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MatrixDefect> for GameError {
    fn from(defect: MatrixDefect) -> Self {
        GameError::InvalidMatrix(defect)
    }
}

impl From<ConfigError> for GameError {
    fn from(err: ConfigError) -> Self {
        GameError::Config(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_file_write_exposes_io_cause() {
        let err = GameError::file_write(
            "out/report.csv",
            io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        );
        assert!(err.to_string().contains("out/report.csv"));
        let cause = err.source().expect("io cause");
        assert!(cause.to_string().contains("read-only"));
    }

    #[test]
    fn test_defect_messages() {
        let err: GameError = MatrixDefect::Ragged { row: 2, expected: 3, found: 1 }.into();
        assert_eq!(
            err.to_string(),
            "invalid payoff matrix: row 2 has 1 entries, expected 3"
        );
        assert!(err.source().is_none());
    }
}
