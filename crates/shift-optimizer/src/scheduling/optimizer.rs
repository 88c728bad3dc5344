use super::baseline;
use super::domain::{ScheduleRequest, ScheduleResult, ScheduleStatus};
use super::extract::extract;
use super::model::DecisionModel;
use super::solver::{SolveStatus, SolverBackend, SolverError, SolverOutcome};
use super::validation::{validate, ValidatedInput, ValidationError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Where a request currently is in the optimization pipeline.
///
/// `Validating → Building → Solving → Extracting → Responding`, or
/// `Solving → Failing → Responding` when the solver does not certify an optimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validating,
    Building,
    Solving,
    Extracting,
    Failing,
    Responding,
}

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            PipelineStage::Validating => "validating",
            PipelineStage::Building => "building",
            PipelineStage::Solving => "solving",
            PipelineStage::Extracting => "extracting",
            PipelineStage::Failing => "failing",
            PipelineStage::Responding => "responding",
        }
    }
}

fn enter(stage: PipelineStage) {
    debug!(stage = stage.label(), "pipeline stage");
}

#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The solver did not certify an optimum; carries the `infeasible` result.
    #[error("{}", .0.message)]
    Infeasible(Box<ScheduleResult>),
    #[error(transparent)]
    Solver(#[from] SolverError),
    #[error("solver did not finish within {}s", .deadline.as_secs_f64())]
    Timeout { deadline: Duration },
}

/// Runs requests through validation, model building, solving and extraction.
///
/// Holds no per-request state, so one instance can serve concurrent requests.
#[derive(Clone)]
pub struct ShiftOptimizer {
    backend: Arc<dyn SolverBackend>,
    deadline: Option<Duration>,
}

impl ShiftOptimizer {
    pub fn new(backend: Arc<dyn SolverBackend>) -> Self {
        Self {
            backend,
            deadline: None,
        }
    }

    /// Bounds each solver call made through [`ShiftOptimizer::optimize`].
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Synchronous pipeline without a deadline.
    pub fn optimize_blocking(
        &self,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResult, SchedulingError> {
        let (input, model) = prepare(request)?;
        enter(PipelineStage::Solving);
        let outcome = self.backend.solve(&model).inspect_err(log_solver_fault)?;
        finish(self.backend.name(), &input, &model, outcome)
    }

    /// Async pipeline; the solve runs on the blocking pool under the configured
    /// deadline.
    pub async fn optimize(
        &self,
        request: ScheduleRequest,
    ) -> Result<ScheduleResult, SchedulingError> {
        let (input, model) = prepare(&request)?;
        let model = Arc::new(model);

        enter(PipelineStage::Solving);
        let backend = Arc::clone(&self.backend);
        let solve_model = Arc::clone(&model);
        let task = tokio::task::spawn_blocking(move || backend.solve(&solve_model));

        let joined = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    // The blocking thread cannot be interrupted; its result is dropped.
                    warn!(
                        backend = self.backend.name(),
                        deadline_secs = deadline.as_secs_f64(),
                        "solver deadline exceeded"
                    );
                    return Err(SchedulingError::Timeout { deadline });
                }
            },
            None => task.await,
        };

        let outcome = joined
            .map_err(|err| SolverError::Aborted(err.to_string()))
            .and_then(|solved| solved)
            .inspect_err(log_solver_fault)?;
        finish(self.backend.name(), &input, &model, outcome)
    }

    /// Greedy baseline: same validation and result shape, no solver involved.
    pub fn plan_greedy(&self, request: &ScheduleRequest) -> Result<ScheduleResult, SchedulingError> {
        enter(PipelineStage::Validating);
        let input = validate(request)?;
        let result = baseline::plan(&input);
        enter(PipelineStage::Responding);
        Ok(result)
    }
}

fn prepare(request: &ScheduleRequest) -> Result<(ValidatedInput, DecisionModel), SchedulingError> {
    enter(PipelineStage::Validating);
    let input = validate(request)?;

    enter(PipelineStage::Building);
    let model = DecisionModel::build(&input);
    debug!(
        employees = input.employees.len(),
        shifts = input.shifts.len(),
        variables = model.variables().len(),
        constraints = model.constraints().len(),
        "assignment model built"
    );
    Ok((input, model))
}

fn finish(
    backend: &'static str,
    input: &ValidatedInput,
    model: &DecisionModel,
    outcome: SolverOutcome,
) -> Result<ScheduleResult, SchedulingError> {
    debug!(status = %outcome.status, "solver finished");
    if outcome.status == SolveStatus::Optimal {
        verify_solution(backend, model, &outcome.values).inspect_err(log_solver_fault)?;
    }

    let result = extract(input, model, &outcome);
    if result.status == ScheduleStatus::Infeasible {
        enter(PipelineStage::Failing);
        error!(
            status = %outcome.status,
            "solver did not certify an optimum; the empty roster is always feasible, so this needs investigation"
        );
        enter(PipelineStage::Responding);
        return Err(SchedulingError::Infeasible(Box::new(result)));
    }

    enter(PipelineStage::Extracting);
    debug!(
        assigned = result.assignments.len(),
        unassigned = result.unassigned_shifts.len(),
        "roster extracted"
    );
    enter(PipelineStage::Responding);
    Ok(result)
}

/// An optimal outcome must carry one binary value per variable and honor
/// every constraint before it is turned into a roster.
fn verify_solution(
    backend: &'static str,
    model: &DecisionModel,
    values: &[f64],
) -> Result<(), SolverError> {
    if values.len() != model.variables().len() {
        return Err(SolverError::ValueCount {
            backend,
            expected: model.variables().len(),
            returned: values.len(),
        });
    }
    if model.is_satisfied_by(values) {
        return Ok(());
    }
    let rule = model
        .constraints()
        .iter()
        .find(|constraint| !constraint.is_satisfied_by(values))
        .map(|constraint| constraint.name.clone())
        .unwrap_or_else(|| "binary variable domain".to_string());
    Err(SolverError::InvalidSolution { backend, rule })
}

fn log_solver_fault(err: &SolverError) {
    error!(error = %err, "solver fault");
}
