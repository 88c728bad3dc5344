use super::{SolveStatus, SolverBackend, SolverError, SolverOutcome};
use crate::scheduling::model::{Comparison, DecisionModel};
use good_lp::{
    constraint, microlp, variable, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::debug;

/// Mixed-integer backend on `good_lp` with the pure-Rust `microlp` solver.
#[derive(Debug, Default, Clone, Copy)]
pub struct MilpBackend;

impl MilpBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SolverBackend for MilpBackend {
    fn name(&self) -> &'static str {
        "milp"
    }

    fn solve(&self, model: &DecisionModel) -> Result<SolverOutcome, SolverError> {
        if model.variables().is_empty() {
            return Ok(SolverOutcome::optimal(Vec::new()));
        }

        let mut problem_vars = ProblemVariables::new();
        let vars: Vec<Variable> = model
            .variables()
            .iter()
            .map(|_| problem_vars.add(variable().binary()))
            .collect();

        let objective: Expression = model
            .objective()
            .iter()
            .map(|(id, weight)| *weight * vars[id.0])
            .sum();

        let mut problem = problem_vars.maximise(objective).using(microlp);
        for linear in model.constraints() {
            let lhs: Expression = linear
                .terms
                .iter()
                .map(|(id, coefficient)| *coefficient * vars[id.0])
                .sum();
            let rhs = linear.rhs;
            problem = match linear.comparison {
                Comparison::LessOrEqual => problem.with(constraint!(lhs <= rhs)),
                Comparison::Equal => problem.with(constraint!(lhs == rhs)),
            };
        }

        debug!(
            variables = vars.len(),
            constraints = model.constraints().len(),
            "invoking microlp"
        );

        match problem.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|var| solution.value(*var)).collect();
                Ok(SolverOutcome::optimal(values))
            }
            Err(ResolutionError::Infeasible) => {
                Ok(SolverOutcome::without_solution(SolveStatus::Infeasible))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(SolverOutcome::without_solution(SolveStatus::Unbounded))
            }
            Err(other) => {
                debug!(error = %other, "microlp reported an error status");
                Ok(SolverOutcome::without_solution(SolveStatus::Error))
            }
        }
    }
}
