//! Configuration options for the game solver.
//!
//! The defaults reproduce the plain behaviour: in-process simplex engine,
//! three-decimal rounding, column strategy taken from the transposed matrix,
//! sequential solves and a single `output.csv` report that is overwritten on
//! every export.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Largest rounding precision accepted by [`SolverConfig::validate`].
pub const MAX_PRECISION: u32 = 12;

/// Which LP engine answers the formulated problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-process dense simplex (`minilp`).
    #[default]
    Simplex,
    /// External `glpsol` process (requires the `glpk` feature).
    Glpk,
}

/// How the column player's strategy is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnConvention {
    /// Solve the transpose as a maximizer. Its value equals the row value for
    /// symmetric games and fully mixed 2x2 games.
    #[default]
    Transpose,
    /// Solve the negated transpose, giving the column player's minimax
    /// strategy. Its value is the negated game value.
    Negated,
}

/// Configuration for [`GameSolver`](crate::game::GameSolver).
///
/// # Example
/// ```
/// use matrix_game_solver::game::SolverConfig;
///
/// let config = SolverConfig::default();
/// assert_eq!(config.precision, Some(3));
/// assert!(!config.parallel);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// LP engine to use.
    pub backend: BackendKind,

    /// Command used to launch GLPK when `backend` is `Glpk`.
    pub glpk_command: String,

    /// Decimal places kept in reported values and probabilities.
    ///
    /// Rounding is presentation only; rounded strategies are never
    /// renormalised. `None` reports the raw engine output.
    pub precision: Option<u32>,

    /// Orientation used for the column player's solve.
    pub column_convention: ColumnConvention,

    /// Run the row and column solves on the rayon pool.
    ///
    /// The solves are independent, so this only changes wall time.
    pub parallel: bool,

    /// Where the CSV report is written. Relative paths resolve against the
    /// working directory, and an existing file is overwritten.
    pub output_path: PathBuf,

    /// Also write a JSON report next to the CSV.
    pub write_json: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Simplex,
            glpk_command: "glpsol".to_string(),
            precision: Some(3),
            column_convention: ColumnConvention::Transpose,
            parallel: false,
            output_path: PathBuf::from("output.csv"),
            write_json: false,
        }
    }
}

impl SolverConfig {
    /// Create a new SolverConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    /// Parse a configuration from JSON text and validate it.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: SolverConfig =
            serde_json::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder method: set the LP backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Builder method: set the GLPK command.
    pub fn with_glpk_command(mut self, command: impl Into<String>) -> Self {
        self.glpk_command = command.into();
        self
    }

    /// Builder method: set rounding precision (`None` disables rounding).
    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    /// Builder method: set the column convention.
    pub fn with_column_convention(mut self, convention: ColumnConvention) -> Self {
        self.column_convention = convention;
        self
    }

    /// Builder method: solve both orientations in parallel.
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    /// Builder method: set the CSV output path.
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Builder method: toggle the JSON report.
    pub fn with_json(mut self, enable: bool) -> Self {
        self.write_json = enable;
        self
    }

    /// Path of the JSON report, derived from the CSV path.
    pub fn json_path(&self) -> PathBuf {
        self.output_path.with_extension("json")
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(precision) = self.precision {
            if precision > MAX_PRECISION {
                return Err(ConfigError::InvalidPrecision(precision));
            }
        }

        if self.output_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyOutputPath);
        }

        if self.backend == BackendKind::Glpk && self.glpk_command.trim().is_empty() {
            return Err(ConfigError::EmptyCommand);
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Rounding precision is above [`MAX_PRECISION`].
    InvalidPrecision(u32),
    /// The output path is empty.
    EmptyOutputPath,
    /// The GLPK command is empty.
    EmptyCommand,
    /// The configuration file could not be read.
    Io(String),
    /// The configuration file is not valid JSON for this struct.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidPrecision(val) => {
                write!(f, "Precision {} is out of range [0, {}]", val, MAX_PRECISION)
            }
            ConfigError::EmptyOutputPath => write!(f, "Output path is empty"),
            ConfigError::EmptyCommand => write!(f, "GLPK command is empty"),
            ConfigError::Io(msg) => write!(f, "Could not read config: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Could not parse config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SolverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.backend, BackendKind::Simplex);
        assert_eq!(config.column_convention, ColumnConvention::Transpose);
        assert_eq!(config.output_path, PathBuf::from("output.csv"));
    }

    #[test]
    fn test_precision_bounds() {
        let config = SolverConfig::default().with_precision(Some(MAX_PRECISION + 1));
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidPrecision(MAX_PRECISION + 1))
        );
        assert!(SolverConfig::default().with_precision(None).validate().is_ok());
    }

    #[test]
    fn test_empty_output_path_rejected() {
        let config = SolverConfig::default().with_output_path("");
        assert_eq!(config.validate(), Err(ConfigError::EmptyOutputPath));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SolverConfig::from_json(r#"{ "precision": 4, "column_convention": "negated" }"#)
                .unwrap();
        assert_eq!(config.precision, Some(4));
        assert_eq!(config.column_convention, ColumnConvention::Negated);
        assert_eq!(config.glpk_command, "glpsol");
        assert!(!config.write_json);
    }

    #[test]
    fn test_json_is_validated() {
        let err = SolverConfig::from_json(r#"{ "precision": 99 }"#).unwrap_err();
        assert_eq!(err, ConfigError::InvalidPrecision(99));

        let err = SolverConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_json_path_follows_csv_path() {
        let config = SolverConfig::default().with_output_path("reports/game.csv");
        assert_eq!(config.json_path(), PathBuf::from("reports/game.json"));
    }
}
