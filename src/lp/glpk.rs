//! GLPK backend: writes the model as an `.lp` file and runs `glpsol`.
//!
//! Only compiled with the `glpk` feature. The `glpsol` binary must be on the
//! `PATH` (or configured through `glpk_command`).

use std::cmp::Ordering;
use std::io::ErrorKind;
use std::process::{Command, Stdio};

use lp_solvers::lp_format::{Constraint, LpObjective};
use lp_solvers::problem::{Problem, StrExpression, Variable};
use lp_solvers::solvers::{GlpkSolver, SolverTrait, Status};

use crate::error::{GameError, Result};
use crate::lp::backend::{LpBackend, LpSolution};
use crate::lp::model::{LpModel, Relation, Sense, VarId};

/// External GLPK engine.
#[derive(Debug, Clone)]
pub struct GlpkBackend {
    command: String,
}

impl GlpkBackend {
    /// Use `command` to launch `glpsol`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn unavailable(&self, reason: impl Into<String>) -> GameError {
        GameError::SolverUnavailable {
            backend: self.name().to_string(),
            reason: reason.into(),
        }
    }
}

/// Render `terms` in LP file syntax, e.g. `3 x0 - 1 x1 - 1 v`.
fn expression(terms: &[(VarId, f64)]) -> StrExpression {
    let mut text = String::new();
    for (k, &(id, coeff)) in terms.iter().enumerate() {
        let sign = if coeff < 0.0 { "-" } else { "+" };
        if k == 0 {
            if coeff < 0.0 {
                text.push_str("- ");
            }
        } else {
            text.push_str(&format!(" {} ", sign));
        }
        text.push_str(&format!("{} {}", coeff.abs(), id.name()));
    }
    if text.is_empty() {
        text.push('0');
    }
    StrExpression(text)
}

fn to_problem(model: &LpModel) -> Problem {
    Problem {
        name: "matrix_game".to_string(),
        sense: match model.sense {
            Sense::Maximize => LpObjective::Maximize,
            Sense::Minimize => LpObjective::Minimize,
        },
        objective: expression(&model.objective),
        variables: model
            .variables
            .iter()
            .map(|v| Variable {
                name: v.id.name(),
                is_integer: false,
                lower_bound: v.lower,
                upper_bound: v.upper,
            })
            .collect(),
        constraints: model
            .constraints
            .iter()
            .map(|c| Constraint {
                lhs: expression(&c.terms),
                operator: match c.relation {
                    Relation::Ge => Ordering::Greater,
                    Relation::Le => Ordering::Less,
                    Relation::Eq => Ordering::Equal,
                },
                rhs: c.rhs,
            })
            .collect(),
    }
}

impl LpBackend for GlpkBackend {
    fn name(&self) -> &str {
        "glpk"
    }

    fn check_available(&self) -> Result<()> {
        match Command::new(&self.command)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
        {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(self.unavailable(format!(
                "'{} --version' exited with {}",
                self.command, status
            ))),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(self.unavailable(format!("'{}' not found on PATH", self.command)))
            }
            Err(e) => Err(self.unavailable(format!("could not run '{}': {}", self.command, e))),
        }
    }

    fn solve(&self, model: &LpModel) -> Result<LpSolution> {
        let problem = to_problem(model);
        let solver = GlpkSolver::new().command_name(self.command.clone());
        let solution = solver.run(&problem).map_err(|reason| GameError::SolverFailed {
            backend: self.name().to_string(),
            reason,
        })?;

        match solution.status {
            Status::Optimal => {}
            Status::Infeasible => {
                return Err(GameError::Infeasible {
                    backend: self.name().to_string(),
                })
            }
            Status::Unbounded => {
                return Err(GameError::Unbounded {
                    backend: self.name().to_string(),
                })
            }
            other => {
                return Err(GameError::SolverFailed {
                    backend: self.name().to_string(),
                    reason: format!("terminated with status {:?}", other),
                })
            }
        }

        let mut values = rustc_hash::FxHashMap::default();
        for var in &model.variables {
            let name = var.id.name();
            let value = solution
                .results
                .get(&name)
                .copied()
                .ok_or(GameError::MissingVariable { name })?;
            values.insert(var.id, f64::from(value));
        }

        let objective = model.objective_value(|id| {
            values
                .get(&id)
                .copied()
                .ok_or_else(|| GameError::MissingVariable { name: id.name() })
        })?;

        Ok(LpSolution { values, objective })
    }
}
