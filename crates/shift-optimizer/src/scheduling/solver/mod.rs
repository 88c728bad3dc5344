//! Solver seam: the optimizer hands a [`DecisionModel`] to a backend and gets a
//! status plus one value per variable back.

mod milp;

pub use milp::MilpBackend;

use super::model::DecisionModel;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    Error,
}

impl SolveStatus {
    pub fn label(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::Error => "error",
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Status reported by the backend and the value of every model variable, in
/// [`DecisionModel::variables`] order. Values are only meaningful when the
/// status is [`SolveStatus::Optimal`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOutcome {
    pub status: SolveStatus,
    pub values: Vec<f64>,
}

impl SolverOutcome {
    pub fn optimal(values: Vec<f64>) -> Self {
        Self {
            status: SolveStatus::Optimal,
            values,
        }
    }

    pub fn without_solution(status: SolveStatus) -> Self {
        Self {
            status,
            values: Vec::new(),
        }
    }
}

/// Unexpected fault inside the solver; not attributable to the request.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("{backend} returned {returned} values for {expected} variables")]
    ValueCount {
        backend: &'static str,
        expected: usize,
        returned: usize,
    },
    #[error("{backend} returned a solution that breaks {rule}")]
    InvalidSolution {
        backend: &'static str,
        rule: String,
    },
    #[error("{backend} failed: {detail}")]
    Backend {
        backend: &'static str,
        detail: String,
    },
    #[error("solver task did not complete: {0}")]
    Aborted(String),
}

/// A combinatorial optimization capability. Implementations must build an
/// isolated solver instance per call so concurrent requests never share one.
pub trait SolverBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, model: &DecisionModel) -> Result<SolverOutcome, SolverError>;
}
