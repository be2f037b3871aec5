//! Payoff matrices and the row player's perspective.
//!
//! A [`PayoffMatrix`] can only be built from a non-empty, rectangular grid of
//! finite numbers, so everything downstream of construction may assume a
//! well-formed game.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, MatrixDefect, Result};

/// Payoffs to the row player, stored row-major.
///
/// `get(i, j)` is what the row player wins when it plays pure strategy `i`
/// and the column player plays pure strategy `j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl PayoffMatrix {
    /// Build a matrix from nested rows, rejecting empty, ragged or
    /// non-finite input.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self> {
        let first = rows.first().ok_or(MatrixDefect::NoRows)?;
        let cols = first.len();
        if cols == 0 {
            return Err(MatrixDefect::NoColumns.into());
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatrixDefect::Ragged {
                    row: i,
                    expected: cols,
                    found: row.len(),
                }
                .into());
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(MatrixDefect::NonFinite { row: i, col: j, value }.into());
                }
                data.push(value);
            }
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build a matrix from borrowed rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        Self::new(rows.to_vec())
    }

    /// Number of row-player strategies.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of column-player strategies.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Whether the game has as many row strategies as column strategies.
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Payoff at row `i`, column `j`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.rows && j < self.cols, "index ({}, {}) out of bounds", i, j);
        self.data[i * self.cols + j]
    }

    /// Row `i` as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Column `j`, copied out.
    pub fn column(&self, j: usize) -> Vec<f64> {
        (0..self.rows).map(|i| self.get(i, j)).collect()
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.cols)
    }

    /// The same game seen from the column player's side of the table.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.get(i, j));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Every payoff with its sign flipped.
    pub fn negated(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| -x).collect(),
        }
    }

    /// Largest absolute payoff; `0.0` for an all-zero game.
    pub fn max_abs(&self) -> f64 {
        self.data.iter().fold(0.0, |acc, &x| acc.max(x.abs()))
    }

    /// Every payoff divided by `divisor`.
    ///
    /// Optimal strategies are unchanged by a positive divisor; the game
    /// value is divided by it.
    ///
    /// # Panics
    /// Panics unless `divisor` is positive and finite.
    pub fn scaled_down(&self, divisor: f64) -> Self {
        assert!(divisor > 0.0 && divisor.is_finite(), "divisor must be positive and finite");
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| x / divisor).collect(),
        }
    }

    /// Expected payoff to the row player when both players mix.
    pub fn expected_payoff(&self, row_strategy: &[f64], col_strategy: &[f64]) -> f64 {
        self.iter_rows()
            .zip(row_strategy)
            .map(|(row, &x)| {
                x * row
                    .iter()
                    .zip(col_strategy)
                    .map(|(&a, &y)| a * y)
                    .sum::<f64>()
            })
            .sum()
    }

    /// Worst-case payoff the row player secures with `row_strategy`:
    /// `min_j sum_i a[i][j] * x[i]`.
    pub fn row_guarantee(&self, row_strategy: &[f64]) -> f64 {
        (0..self.cols)
            .map(|j| {
                (0..self.rows)
                    .map(|i| self.get(i, j) * row_strategy.get(i).copied().unwrap_or(0.0))
                    .sum::<f64>()
            })
            .fold(f64::INFINITY, f64::min)
    }

    /// Most the row player can win against `col_strategy`:
    /// `max_i sum_j a[i][j] * y[j]`.
    pub fn column_guarantee(&self, col_strategy: &[f64]) -> f64 {
        self.iter_rows()
            .map(|row| {
                row.iter()
                    .enumerate()
                    .map(|(j, &a)| a * col_strategy.get(j).copied().unwrap_or(0.0))
                    .sum::<f64>()
            })
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Nested-row copy of the payoffs.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for PayoffMatrix {
    type Error = GameError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::new(rows)
    }
}

impl From<PayoffMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PayoffMatrix) -> Self {
        matrix.to_rows()
    }
}

/// Parses one row per line; cells are separated by whitespace or commas and
/// `;` separates rows on a single line, so `"2 -1\n-1 1"` and `"2,-1; -1,1"`
/// describe the same game. Blank lines are skipped.
impl FromStr for PayoffMatrix {
    type Err = GameError;

    fn from_str(text: &str) -> Result<Self> {
        let mut rows = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            for segment in line.split(';') {
                let mut row = Vec::new();
                for token in segment
                    .split(|c: char| c == ',' || c.is_whitespace())
                    .filter(|t| !t.is_empty())
                {
                    let value = token.parse::<f64>().map_err(|_| MatrixDefect::Parse {
                        line: line_no + 1,
                        token: token.to_string(),
                    })?;
                    row.push(value);
                }
                if !row.is_empty() {
                    rows.push(row);
                }
            }
        }
        Self::new(rows)
    }
}

impl fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            let cells: Vec<String> = row.iter().map(|x| format!("{:>8}", x)).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

/// Whether the row player maximises or minimises the listed payoffs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Perspective {
    /// Payoffs are the row player's winnings.
    #[default]
    #[serde(rename = "max", alias = "maximizer")]
    Maximizer,
    /// Payoffs are the row player's losses; the matrix is transposed once
    /// before solving so the LP row player is always the maximizer.
    #[serde(rename = "min", alias = "minimizer")]
    Minimizer,
}

impl Perspective {
    /// Short name, as typed on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Perspective::Maximizer => "max",
            Perspective::Minimizer => "min",
        }
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}imiser", self.as_str())
    }
}

impl FromStr for Perspective {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max" | "maximizer" | "maximiser" => Ok(Perspective::Maximizer),
            "min" | "minimizer" | "minimiser" => Ok(Perspective::Minimizer),
            other => Err(format!("expected 'max' or 'min', got '{}'", other)),
        }
    }
}
