//! Strategy tables and report export.
//!
//! The CSV layout is consumed by other tools, so the header text and column
//! order are fixed:
//!
//! ```text
//! Strategy,Row Player Probability,Column Player Probability
//! Strategy 1,0.4,0.667
//! Strategy 2,0.6,0.333
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::game::config::SolverConfig;
use crate::game::solver::Resolution;

/// Header line of the CSV report.
pub const CSV_HEADER: &str = "Strategy,Row Player Probability,Column Player Probability";

/// Format a probability or value the way the report has always shown them:
/// shortest round-trip form, always with a decimal point (`0.0`, `0.25`).
///
/// Magnitudes below `1e-4` or from `1e16` up use exponent notation with a
/// signed, at least two-digit exponent (`1e+20`, `1.5e-07`).
pub fn format_decimal(x: f64) -> String {
    let text = format!("{:?}", x);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// Title line shown with a solved game.
pub fn title_for(value: f64) -> String {
    format!("Game Value: {}", format_decimal(value))
}

/// One line of the strategy table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyRow {
    /// `Strategy {index + 1}`.
    pub label: String,
    /// Row player's probability for this index.
    pub row_player: f64,
    /// Column player's probability for this index.
    pub column_player: f64,
}

/// Both players' strategies side by side.
///
/// The table is as long as the longer strategy; the shorter side is padded
/// with `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StrategyTable {
    /// Rows in strategy order.
    pub rows: Vec<StrategyRow>,
}

impl StrategyTable {
    /// Pair up the two strategies.
    pub fn from_strategies(row_strategy: &[f64], col_strategy: &[f64]) -> Self {
        let len = row_strategy.len().max(col_strategy.len());
        let rows = (0..len)
            .map(|i| StrategyRow {
                label: format!("Strategy {}", i + 1),
                row_player: row_strategy.get(i).copied().unwrap_or(0.0),
                column_player: col_strategy.get(i).copied().unwrap_or(0.0),
            })
            .collect();
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as CSV text, header included.
    pub fn to_csv(&self) -> String {
        let mut out = String::with_capacity(64 * (self.rows.len() + 1));
        out.push_str(CSV_HEADER);
        out.push('\n');
        for row in &self.rows {
            out.push_str(&format!(
                "{},{},{}\n",
                row.label,
                format_decimal(row.row_player),
                format_decimal(row.column_player)
            ));
        }
        out
    }

    /// Write the CSV to `path`, replacing any existing file, and return the
    /// absolute path written.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = path.as_ref();
        write_file(path, self.to_csv().as_bytes())
    }

    /// Print as an aligned text table.
    pub fn print(&self) {
        println!("{:<14}{:>12}{:>12}", "Strategy", "Row", "Column");
        for row in &self.rows {
            println!(
                "{:<14}{:>12}{:>12}",
                row.label,
                format_decimal(row.row_player),
                format_decimal(row.column_player)
            );
        }
    }
}

/// What a caller receives after exporting a solved game.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle {
    /// The strategy table that was written.
    pub table: StrategyTable,
    /// `Game Value: {value}`.
    pub title: String,
    /// Absolute path of the CSV report.
    pub path: PathBuf,
    /// Absolute path of the JSON report, when one was written.
    pub json_path: Option<PathBuf>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    title: &'a str,
    resolution: &'a Resolution,
    table: &'a StrategyTable,
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    let mut file = File::create(path).map_err(|e| GameError::file_write(path, e))?;
    file.write_all(bytes)
        .map_err(|e| GameError::file_write(path, e))?;
    fs::canonicalize(path).map_err(|e| GameError::file_write(path, e))
}

/// Write the report for `resolution` to the paths in `config`.
///
/// The CSV at `config.output_path` is overwritten on every call.
pub fn export(resolution: &Resolution, config: &SolverConfig) -> Result<ExportBundle> {
    let table = StrategyTable::from_strategies(&resolution.row_strategy, &resolution.col_strategy);
    let title = title_for(resolution.value);
    let path = table.write_csv(&config.output_path)?;

    let json_path = if config.write_json {
        let target = config.json_path();
        let report = JsonReport {
            title: &title,
            resolution,
            table: &table,
        };
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| GameError::file_write(&target, io::Error::from(e)))?;
        Some(write_file(&target, json.as_bytes())?)
    } else {
        None
    };

    log::info!("{} written to {}", title, path.display());

    Ok(ExportBundle {
        table,
        title,
        path,
        json_path,
    })
}
