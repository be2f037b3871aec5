//! The seam between formulated models and whatever engine solves them.
//!
//! A backend receives an [`LpModel`], blocks until the engine reaches a
//! terminal status and maps that status onto the crate's error taxonomy.
//! There is no timeout: a solve waits as long as the engine takes.

use rustc_hash::FxHashMap;

use crate::error::{GameError, Result};
use crate::game::config::{BackendKind, SolverConfig};
use crate::lp::model::{LpModel, Relation, Sense, VarId};

/// Optimal variable assignment returned by a backend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LpSolution {
    /// Optimal value of every model variable.
    pub values: FxHashMap<VarId, f64>,
    /// Optimal objective value.
    pub objective: f64,
}

impl LpSolution {
    /// Value of `id`, or `MissingVariable` when the engine did not report it.
    pub fn value(&self, id: VarId) -> Result<f64> {
        self.values
            .get(&id)
            .copied()
            .ok_or_else(|| GameError::MissingVariable { name: id.name() })
    }
}

/// An LP engine.
///
/// Implementations must be stateless between calls; each `solve` receives a
/// freshly built model.
pub trait LpBackend: Send + Sync {
    /// Short name used in logs and errors.
    fn name(&self) -> &str;

    /// Check that the engine can be invoked at all.
    fn check_available(&self) -> Result<()>;

    /// Solve `model` to optimality.
    fn solve(&self, model: &LpModel) -> Result<LpSolution>;
}

/// In-process dense simplex engine backed by `minilp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplexBackend;

impl SimplexBackend {
    /// Create the backend.
    pub fn new() -> Self {
        Self
    }
}

impl LpBackend for SimplexBackend {
    fn name(&self) -> &str {
        "simplex"
    }

    fn check_available(&self) -> Result<()> {
        Ok(())
    }

    fn solve(&self, model: &LpModel) -> Result<LpSolution> {
        let direction = match model.sense {
            Sense::Maximize => minilp::OptimizationDirection::Maximize,
            Sense::Minimize => minilp::OptimizationDirection::Minimize,
        };
        let mut problem = minilp::Problem::new(direction);

        let objective: FxHashMap<VarId, f64> = model.objective.iter().copied().collect();
        let mut handles = FxHashMap::default();
        for var in &model.variables {
            let coeff = objective.get(&var.id).copied().unwrap_or(0.0);
            let handle = problem.add_var(coeff, (var.lower, var.upper));
            handles.insert(var.id, handle);
        }

        for constraint in &model.constraints {
            let mut expr = minilp::LinearExpr::empty();
            for &(id, coeff) in &constraint.terms {
                let handle = handles.get(&id).copied().ok_or_else(|| {
                    GameError::MissingVariable { name: id.name() }
                })?;
                expr.add(handle, coeff);
            }
            let op = match constraint.relation {
                Relation::Ge => minilp::ComparisonOp::Ge,
                Relation::Le => minilp::ComparisonOp::Le,
                Relation::Eq => minilp::ComparisonOp::Eq,
            };
            problem.add_constraint(expr, op, constraint.rhs);
        }

        let solution = problem.solve().map_err(|e| match e {
            minilp::Error::Infeasible => GameError::Infeasible {
                backend: self.name().to_string(),
            },
            minilp::Error::Unbounded => GameError::Unbounded {
                backend: self.name().to_string(),
            },
        })?;

        // minilp reports a direction without a bound as an infinite optimum
        // rather than `Error::Unbounded`.
        let objective = solution.objective();
        let values: FxHashMap<VarId, f64> = handles
            .iter()
            .map(|(&id, &handle)| (id, solution[handle]))
            .collect();
        if !objective.is_finite() || values.values().any(|x| !x.is_finite()) {
            return Err(GameError::Unbounded {
                backend: self.name().to_string(),
            });
        }

        Ok(LpSolution { values, objective })
    }
}

/// Build the backend selected by `config`.
pub fn build_backend(config: &SolverConfig) -> Result<Box<dyn LpBackend>> {
    match config.backend {
        BackendKind::Simplex => Ok(Box::new(SimplexBackend::new())),
        #[cfg(feature = "glpk")]
        BackendKind::Glpk => Ok(Box::new(crate::lp::glpk::GlpkBackend::new(
            config.glpk_command.clone(),
        ))),
        #[cfg(not(feature = "glpk"))]
        BackendKind::Glpk => Err(GameError::SolverUnavailable {
            backend: "glpk".to_string(),
            reason: "built without the `glpk` feature".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::PayoffMatrix;
    use crate::lp::model::{LinearConstraint, Variable};

    #[test]
    fn test_simplex_solves_matching_pennies() {
        let matrix = PayoffMatrix::new(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap();
        let model = LpModel::formulate(&matrix);
        let solution = SimplexBackend::new().solve(&model).unwrap();

        assert!(solution.objective.abs() < 1e-9);
        assert!((solution.value(VarId::Weight(0)).unwrap() - 0.5).abs() < 1e-9);
        assert!((solution.value(VarId::Weight(1)).unwrap() - 0.5).abs() < 1e-9);
        assert!((solution.value(VarId::Value).unwrap() - solution.objective).abs() < 1e-9);
    }

    #[test]
    fn test_simplex_reports_infeasible() {
        let model = LpModel {
            variables: vec![Variable::non_negative(VarId::Weight(0))],
            constraints: vec![LinearConstraint {
                terms: vec![(VarId::Weight(0), 1.0)],
                relation: Relation::Le,
                rhs: -1.0,
            }],
            objective: vec![(VarId::Weight(0), 1.0)],
            sense: Sense::Maximize,
        };
        assert!(matches!(
            SimplexBackend::new().solve(&model),
            Err(GameError::Infeasible { .. })
        ));
    }

    #[test]
    fn test_simplex_reports_unbounded() {
        let model = LpModel {
            variables: vec![Variable::non_negative(VarId::Weight(0))],
            constraints: vec![LinearConstraint {
                terms: vec![(VarId::Weight(0), 1.0)],
                relation: Relation::Ge,
                rhs: 1.0,
            }],
            objective: vec![(VarId::Weight(0), 1.0)],
            sense: Sense::Maximize,
        };
        assert!(matches!(
            SimplexBackend::new().solve(&model),
            Err(GameError::Unbounded { .. })
        ));
    }

    #[test]
    fn test_simplex_reports_unbounded_free_variable() {
        // A free objective variable bounded only from below
        let model = LpModel {
            variables: vec![Variable::free(VarId::Value)],
            constraints: vec![LinearConstraint {
                terms: vec![(VarId::Value, 1.0)],
                relation: Relation::Ge,
                rhs: -5.0,
            }],
            objective: vec![(VarId::Value, 1.0)],
            sense: Sense::Maximize,
        };
        assert!(matches!(
            SimplexBackend::new().solve(&model),
            Err(GameError::Unbounded { backend }) if backend == "simplex"
        ));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let solution = LpSolution::default();
        assert!(matches!(
            solution.value(VarId::Weight(3)),
            Err(GameError::MissingVariable { name }) if name == "x3"
        ));
    }

    #[cfg(not(feature = "glpk"))]
    #[test]
    fn test_glpk_requires_feature() {
        let config = SolverConfig::default().with_backend(BackendKind::Glpk);
        assert!(matches!(
            build_backend(&config),
            Err(GameError::SolverUnavailable { .. })
        ));
    }
}
