//! Game solver and dual-orientation resolver.
//!
//! [`GameSolver::solve`] answers one orientation of a game: it formulates the
//! row player's maximin LP, hands it to the configured backend and rounds the
//! result for presentation. [`GameSolver::resolve`] runs it twice, once on
//! the (possibly reoriented) matrix and once on its transpose, to obtain
//! strategies for both players.
//!
//! # Sign convention
//!
//! Under the default [`ColumnConvention::Transpose`] the column player's
//! strategy comes from solving `Mᵀ` as if the column player were maximising
//! the same payoffs. For symmetric games and fully mixed 2x2 games the
//! mirrored value equals the row value (not its negation). Under
//! [`ColumnConvention::Negated`] the column player solves `-Mᵀ`, which gives
//! its minimax strategy and a mirrored value of exactly `-value`.
//!
//! Only the value of the first solve is ever reported.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::game::config::{ColumnConvention, SolverConfig};
use crate::game::matrix::{PayoffMatrix, Perspective};
use crate::lp::{build_backend, LpBackend, LpModel, VarId};

/// Round `x` to `decimals` places, mapping `-0.0` to `0.0`.
///
/// Magnitudes too large to scale by `10^decimals` have no fractional part
/// left to round and are returned as they are.
pub fn round_to(x: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let shifted = x * factor;
    if !shifted.is_finite() {
        return x;
    }
    let rounded = shifted.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Game value and row-player strategy for one orientation of a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Value of the game to the row player.
    pub value: f64,
    /// Probability of each row strategy, in row order.
    pub strategy: Vec<f64>,
}

impl Solution {
    /// Sum of the strategy components. May differ from 1 by rounding.
    pub fn strategy_sum(&self) -> f64 {
        self.strategy.iter().sum()
    }

    /// The value followed by every strategy component.
    pub fn flatten(&self) -> Vec<f64> {
        std::iter::once(self.value)
            .chain(self.strategy.iter().copied())
            .collect()
    }
}

/// Strategies for both players of a resolved game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Value of the game, taken from the row orientation.
    pub value: f64,
    /// Row player's strategy; one entry per row of the oriented matrix.
    pub row_strategy: Vec<f64>,
    /// Column player's strategy; one entry per column of the oriented matrix.
    pub col_strategy: Vec<f64>,
    /// Perspective the input was declared in.
    pub perspective: Perspective,
}

/// Solves matrix games through a pluggable LP backend.
///
/// # Example
/// ```
/// use matrix_game_solver::game::{GameSolver, PayoffMatrix, Perspective, SolverConfig};
///
/// let solver = GameSolver::new(SolverConfig::default()).unwrap();
/// let matrix = PayoffMatrix::new(vec![vec![3.0, -2.0], vec![-1.0, 4.0]]).unwrap();
/// let resolution = solver.resolve(&matrix, Perspective::Maximizer).unwrap();
/// assert_eq!(resolution.value, 1.0);
/// assert_eq!(resolution.row_strategy, vec![0.5, 0.5]);
/// ```
pub struct GameSolver {
    config: SolverConfig,
    backend: Box<dyn LpBackend>,
}

impl GameSolver {
    /// Create a solver using the backend named in `config`.
    ///
    /// The backend's availability is checked here, before the first solve.
    pub fn new(config: SolverConfig) -> Result<Self> {
        let backend = build_backend(&config)?;
        Self::with_backend(config, backend)
    }

    /// Create a solver around any backend.
    pub fn with_backend(config: SolverConfig, backend: Box<dyn LpBackend>) -> Result<Self> {
        config.validate()?;
        if let Err(e) = backend.check_available() {
            log::warn!("LP backend '{}' is unavailable", backend.name());
            return Err(e);
        }
        log::debug!("using LP backend '{}'", backend.name());
        Ok(Self { config, backend })
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Name of the active backend.
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    fn present(&self, x: f64) -> f64 {
        match self.config.precision {
            Some(decimals) => round_to(x, decimals),
            None => x,
        }
    }

    /// Solve `matrix` for the row player.
    ///
    /// The engine sees the payoffs divided by their largest magnitude, so
    /// every coefficient lies in `[-1, 1]` whatever the input's scale; the
    /// value is scaled back afterwards. Errors from the backend are returned
    /// unchanged.
    pub fn solve(&self, matrix: &PayoffMatrix) -> Result<Solution> {
        let scale = matrix.max_abs();
        let unit: Cow<'_, PayoffMatrix> = if scale > 0.0 && scale != 1.0 {
            Cow::Owned(matrix.scaled_down(scale))
        } else {
            Cow::Borrowed(matrix)
        };
        let scale = if scale > 0.0 { scale } else { 1.0 };

        let model = LpModel::formulate(&unit);
        let lp = self.backend.solve(&model)?;

        let value = self.present(lp.objective * scale);
        let strategy = (0..matrix.rows())
            .map(|i| lp.value(VarId::Weight(i)).map(|x| self.present(x)))
            .collect::<Result<Vec<f64>>>()?;

        let solution = Solution { value, strategy };
        let drift = solution.strategy_sum() - 1.0;
        if drift.abs() > 1e-9 {
            log::debug!("rounded strategy sums to 1{:+e}", drift);
        }
        Ok(solution)
    }

    /// Validate raw rows and solve them.
    pub fn solve_rows(&self, rows: &[Vec<f64>]) -> Result<Solution> {
        let matrix = PayoffMatrix::from_rows(rows)?;
        self.solve(&matrix)
    }

    /// Solve a game for both players.
    ///
    /// A `Minimizer` row player is handled by transposing the input once,
    /// before either solve, so the LP row player always maximises. The row
    /// strategy then has one entry per row of the transposed matrix.
    pub fn resolve(&self, matrix: &PayoffMatrix, perspective: Perspective) -> Result<Resolution> {
        let oriented: Cow<'_, PayoffMatrix> = match perspective {
            Perspective::Maximizer => Cow::Borrowed(matrix),
            Perspective::Minimizer => Cow::Owned(matrix.transpose()),
        };
        let mirrored = match self.config.column_convention {
            ColumnConvention::Transpose => oriented.transpose(),
            ColumnConvention::Negated => oriented.transpose().negated(),
        };

        let (row, col) = if self.config.parallel {
            let (row, col) = rayon::join(|| self.solve(&oriented), || self.solve(&mirrored));
            (row?, col?)
        } else {
            let row = self.solve(&oriented)?;
            let col = self.solve(&mirrored)?;
            (row, col)
        };

        log::info!(
            "solved {}x{} game ({}): value {}",
            oriented.rows(),
            oriented.cols(),
            perspective,
            row.value
        );
        log::debug!("mirrored value {} discarded", col.value);

        Ok(Resolution {
            value: row.value,
            row_strategy: row.strategy,
            col_strategy: col.strategy,
            perspective,
        })
    }

    /// Validate raw rows and resolve them.
    pub fn resolve_rows(&self, rows: &[Vec<f64>], perspective: Perspective) -> Result<Resolution> {
        let matrix = PayoffMatrix::from_rows(rows)?;
        self.resolve(&matrix, perspective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{GameError, MatrixDefect};
    use crate::lp::{LpSolution, SimplexBackend};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Counts calls before delegating to the simplex engine.
    struct CountingBackend {
        calls: Arc<AtomicUsize>,
    }

    impl LpBackend for CountingBackend {
        fn name(&self) -> &str {
            "counting"
        }

        fn check_available(&self) -> Result<()> {
            Ok(())
        }

        fn solve(&self, model: &LpModel) -> Result<LpSolution> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            SimplexBackend::new().solve(model)
        }
    }

    struct OfflineBackend;

    impl LpBackend for OfflineBackend {
        fn name(&self) -> &str {
            "offline"
        }

        fn check_available(&self) -> Result<()> {
            Err(GameError::SolverUnavailable {
                backend: "offline".to_string(),
                reason: "not installed".to_string(),
            })
        }

        fn solve(&self, _model: &LpModel) -> Result<LpSolution> {
            unreachable!("never available")
        }
    }

    struct InfeasibleBackend;

    impl LpBackend for InfeasibleBackend {
        fn name(&self) -> &str {
            "broken"
        }

        fn check_available(&self) -> Result<()> {
            Ok(())
        }

        fn solve(&self, _model: &LpModel) -> Result<LpSolution> {
            Err(GameError::Infeasible {
                backend: "broken".to_string(),
            })
        }
    }

    fn solver() -> GameSolver {
        GameSolver::new(SolverConfig::default()).unwrap()
    }

    fn matrix(rows: Vec<Vec<f64>>) -> PayoffMatrix {
        PayoffMatrix::new(rows).unwrap()
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.24999999, 3), 0.25);
        assert_eq!(round_to(0.33333, 3), 0.333);
        assert_eq!(round_to(-0.0001, 3), 0.0);
        assert!(round_to(-0.0001, 3).is_sign_positive());
        assert_eq!(round_to(2.5, 0), 3.0);
        // x * 10^3 overflows; the value passes through untouched
        assert_eq!(round_to(1e306, 3), 1e306);
        assert_eq!(round_to(-f64::MAX, 12), -f64::MAX);
    }

    #[test]
    fn test_two_by_two_mixed() {
        let solution = solver().solve(&matrix(vec![vec![3.0, -2.0], vec![-1.0, 4.0]])).unwrap();
        assert_eq!(solution.value, 1.0);
        assert_eq!(solution.strategy, vec![0.5, 0.5]);
        assert_eq!(solution.flatten(), vec![1.0, 0.5, 0.5]);
    }

    #[test]
    fn test_asymmetric_two_by_two() {
        // Equalising 3x - 1 = 1 - 2x gives x = 0.4 and v = 0.2
        let solution = solver().solve(&matrix(vec![vec![2.0, -1.0], vec![-1.0, 1.0]])).unwrap();
        assert_eq!(solution.value, 0.2);
        assert_eq!(solution.strategy, vec![0.4, 0.6]);
    }

    #[test]
    fn test_saddle_point() {
        // Row 1 dominates; column 0 is the column player's best reply
        let solution = solver().solve(&matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0]])).unwrap();
        assert_eq!(solution.value, 3.0);
        assert_eq!(solution.strategy, vec![0.0, 1.0]);
    }

    #[test]
    fn test_single_cell() {
        let solution = solver().solve(&matrix(vec![vec![-7.5]])).unwrap();
        assert_eq!(solution.value, -7.5);
        assert_eq!(solution.strategy, vec![1.0]);
    }

    #[test]
    fn test_extreme_magnitudes_keep_the_strategy() {
        // Scaling every payoff by e > 0 scales the value and keeps x = (0.5, 0.5)
        for e in [1e-30, 1e-12, 1e20, 1e100, 1e200] {
            let game = matrix(vec![vec![3.0 * e, -2.0 * e], vec![-e, 4.0 * e]]);
            let solution = solver().solve(&game).unwrap();
            assert_eq!(solution.strategy, vec![0.5, 0.5], "e = {}", e);

            let exact = GameSolver::new(SolverConfig::default().with_precision(None))
                .unwrap()
                .solve(&game)
                .unwrap();
            assert!(((exact.value - e) / e).abs() < 1e-9, "e = {}", e);
        }
    }

    #[test]
    fn test_largest_finite_payoffs() {
        let solution = solver().solve(&matrix(vec![vec![1e306]])).unwrap();
        assert!((solution.value / 1e306 - 1.0).abs() < 1e-12);
        assert_eq!(solution.strategy, vec![1.0]);

        let solution = solver()
            .solve(&matrix(vec![vec![f64::MAX, -f64::MAX], vec![-f64::MAX, f64::MAX]]))
            .unwrap();
        assert_eq!(solution.strategy, vec![0.5, 0.5]);
    }

    #[test]
    fn test_all_zero_game() {
        let solution = solver().solve(&matrix(vec![vec![0.0, 0.0], vec![0.0, 0.0]])).unwrap();
        assert_eq!(solution.value, 0.0);
        assert!((solution.strategy_sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rock_paper_scissors() {
        let rps = matrix(vec![
            vec![0.0, -1.0, 1.0],
            vec![1.0, 0.0, -1.0],
            vec![-1.0, 1.0, 0.0],
        ]);
        let solution = solver().solve(&rps).unwrap();
        assert_eq!(solution.value, 0.0);
        assert_eq!(solution.strategy, vec![0.333, 0.333, 0.333]);
        // Presentation rounding leaves the drift in place
        assert!((solution.strategy_sum() - 0.999).abs() < 1e-12);
    }

    #[test]
    fn test_unrounded_precision() {
        let config = SolverConfig::default().with_precision(None);
        let solver = GameSolver::new(config).unwrap();
        let rps = matrix(vec![
            vec![0.0, -1.0, 1.0],
            vec![1.0, 0.0, -1.0],
            vec![-1.0, 1.0, 0.0],
        ]);
        let solution = solver.solve(&rps).unwrap();
        assert!((solution.strategy_sum() - 1.0).abs() < 1e-9);
        assert!((solution.strategy[0] - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_resolve_transpose_convention() {
        let resolution = solver()
            .resolve(&matrix(vec![vec![3.0, -2.0], vec![-1.0, 4.0]]), Perspective::Maximizer)
            .unwrap();
        assert_eq!(resolution.value, 1.0);
        assert_eq!(resolution.row_strategy, vec![0.5, 0.5]);
        assert_eq!(resolution.col_strategy, vec![0.6, 0.4]);
    }

    #[test]
    fn test_resolve_negated_convention() {
        let config =
            SolverConfig::default().with_column_convention(ColumnConvention::Negated);
        let solver = GameSolver::new(config).unwrap();
        let game = matrix(vec![vec![3.0, -2.0], vec![-1.0, 4.0]]);
        let resolution = solver.resolve(&game, Perspective::Maximizer).unwrap();

        // Column player's minimax: 3y - 2(1-y) = -y + 4(1-y) gives y = 0.6
        assert_eq!(resolution.col_strategy, vec![0.6, 0.4]);
        assert!((game.column_guarantee(&resolution.col_strategy) - resolution.value).abs() < 1e-9);
    }

    #[test]
    fn test_minimizer_transposes_once() {
        let game = matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 0.0, 1.0]]);
        let resolution = solver().resolve(&game, Perspective::Minimizer).unwrap();

        // Oriented matrix is 3x2, so the row player has three strategies
        assert_eq!(resolution.row_strategy.len(), 3);
        assert_eq!(resolution.col_strategy.len(), 2);
        assert_eq!(resolution.perspective, Perspective::Minimizer);

        let direct = solver().solve(&game.transpose()).unwrap();
        assert_eq!(resolution.value, direct.value);
        assert_eq!(resolution.row_strategy, direct.strategy);
    }

    #[test]
    fn test_non_square_lengths() {
        let game = matrix(vec![vec![1.0, 2.0, 3.0], vec![4.0, 0.0, 1.0]]);
        let resolution = solver().resolve(&game, Perspective::Maximizer).unwrap();
        assert_eq!(resolution.row_strategy.len(), 2);
        assert_eq!(resolution.col_strategy.len(), 3);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let game = matrix(vec![
            vec![4.0, -1.0, 0.5],
            vec![-2.0, 3.0, 1.0],
            vec![0.0, 1.0, -3.0],
        ]);
        let sequential = solver().resolve(&game, Perspective::Maximizer).unwrap();
        let parallel = GameSolver::new(SolverConfig::default().with_parallel(true))
            .unwrap()
            .resolve(&game, Perspective::Maximizer)
            .unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_empty_matrix_never_reaches_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = CountingBackend {
            calls: Arc::clone(&calls),
        };
        let solver = GameSolver::with_backend(SolverConfig::default(), Box::new(backend)).unwrap();

        let err = solver.resolve_rows(&[], Perspective::Maximizer).unwrap_err();
        assert!(matches!(err, GameError::InvalidMatrix(MatrixDefect::NoRows)));
        let err = solver.solve_rows(&[vec![]]).unwrap_err();
        assert!(matches!(err, GameError::InvalidMatrix(MatrixDefect::NoColumns)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        solver.resolve_rows(&[vec![1.0]], Perspective::Maximizer).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_unavailable_backend_is_rejected_up_front() {
        let result = GameSolver::with_backend(SolverConfig::default(), Box::new(OfflineBackend));
        assert!(matches!(result, Err(GameError::SolverUnavailable { .. })));
    }

    #[test]
    fn test_backend_status_is_not_masked() {
        let solver =
            GameSolver::with_backend(SolverConfig::default(), Box::new(InfeasibleBackend))
                .unwrap();
        let err = solver
            .resolve(&matrix(vec![vec![1.0, 0.0]]), Perspective::Maximizer)
            .unwrap_err();
        assert!(matches!(err, GameError::Infeasible { .. }));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SolverConfig::default().with_precision(Some(40));
        assert!(matches!(GameSolver::new(config), Err(GameError::Config(_))));
    }
}
