//! LP formulation of a matrix game.
//!
//! For an R×C payoff matrix `a` the row player's maximin problem is
//!
//! ```text
//! maximize    v
//! subject to  sum_i a[i][j] * x_i - v >= 0     for every column j
//!             sum_i x_i               == 1
//!             x_i >= 0,  v free
//! ```
//!
//! By the minimax theorem this LP is feasible and bounded for any finite
//! matrix. The model is a plain value object so any [`LpBackend`] can read it.
//!
//! [`LpBackend`]: crate::lp::LpBackend

use crate::error::Result;
use crate::game::PayoffMatrix;

/// Identity of a decision variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VarId {
    /// Probability weight of row strategy `i`.
    Weight(usize),
    /// The game value.
    Value,
}

impl VarId {
    /// Name used by text-based engines (`x0`, `x1`, ..., `v`).
    pub fn name(&self) -> String {
        match self {
            VarId::Weight(i) => format!("x{}", i),
            VarId::Value => "v".to_string(),
        }
    }
}

/// A decision variable and its bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Which variable this is.
    pub id: VarId,
    /// Lower bound (`f64::NEG_INFINITY` when free).
    pub lower: f64,
    /// Upper bound (`f64::INFINITY` when free).
    pub upper: f64,
}

impl Variable {
    /// A variable bounded below by zero.
    pub fn non_negative(id: VarId) -> Self {
        Self {
            id,
            lower: 0.0,
            upper: f64::INFINITY,
        }
    }

    /// An unbounded variable.
    pub fn free(id: VarId) -> Self {
        Self {
            id,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }
}

/// Comparison between a constraint's left-hand side and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `lhs >= rhs`
    Ge,
    /// `lhs <= rhs`
    Le,
    /// `lhs == rhs`
    Eq,
}

/// `sum(coeff * var) <relation> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// Non-zero terms of the left-hand side.
    pub terms: Vec<(VarId, f64)>,
    /// Comparison operator.
    pub relation: Relation,
    /// Right-hand side constant.
    pub rhs: f64,
}

/// Optimisation direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Maximise the objective.
    Maximize,
    /// Minimise the objective.
    Minimize,
}

/// A linear program ready to hand to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct LpModel {
    /// Decision variables, weights first and the value last.
    pub variables: Vec<Variable>,
    /// Column constraints followed by the probability constraint.
    pub constraints: Vec<LinearConstraint>,
    /// Objective terms.
    pub objective: Vec<(VarId, f64)>,
    /// Optimisation direction.
    pub sense: Sense,
}

impl LpModel {
    /// Build the row player's maximin LP for `matrix`.
    pub fn formulate(matrix: &PayoffMatrix) -> Self {
        let (rows, cols) = matrix.shape();

        let mut variables: Vec<Variable> =
            (0..rows).map(|i| Variable::non_negative(VarId::Weight(i))).collect();
        variables.push(Variable::free(VarId::Value));

        let mut constraints = Vec::with_capacity(cols + 1);
        for j in 0..cols {
            let mut terms: Vec<(VarId, f64)> = (0..rows)
                .map(|i| (VarId::Weight(i), matrix.get(i, j)))
                .filter(|&(_, a)| a != 0.0)
                .collect();
            terms.push((VarId::Value, -1.0));
            constraints.push(LinearConstraint {
                terms,
                relation: Relation::Ge,
                rhs: 0.0,
            });
        }

        constraints.push(LinearConstraint {
            terms: (0..rows).map(|i| (VarId::Weight(i), 1.0)).collect(),
            relation: Relation::Eq,
            rhs: 1.0,
        });

        log::debug!(
            "formulated {}x{} game: {} variables, {} constraints",
            rows,
            cols,
            variables.len(),
            constraints.len()
        );

        Self {
            variables,
            constraints,
            objective: vec![(VarId::Value, 1.0)],
            sense: Sense::Maximize,
        }
    }

    /// Validate raw rows and formulate. Fails with `InvalidMatrix` on empty,
    /// ragged or non-finite input.
    pub fn formulate_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let matrix = PayoffMatrix::from_rows(rows)?;
        Ok(Self::formulate(&matrix))
    }

    /// Number of row-strategy weights in the model.
    pub fn num_weights(&self) -> usize {
        self.variables
            .iter()
            .filter(|v| matches!(v.id, VarId::Weight(_)))
            .count()
    }

    /// Evaluate the objective at `value_of`.
    pub fn objective_value<F>(&self, mut value_of: F) -> Result<f64>
    where
        F: FnMut(VarId) -> Result<f64>,
    {
        self.objective
            .iter()
            .try_fold(0.0, |acc, &(id, coeff)| Ok(acc + coeff * value_of(id)?))
    }
}
