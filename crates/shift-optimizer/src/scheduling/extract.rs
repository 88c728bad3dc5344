use super::domain::{Assignment, Diagnostic, ScheduleResult, ScheduleStatus};
use super::model::{DecisionModel, INTEGRALITY_TOLERANCE};
use super::solver::{SolveStatus, SolverOutcome};
use super::validation::ValidatedInput;
use std::collections::HashSet;

/// Turns a solver outcome into a roster.
///
/// Anything other than an optimal status yields an `infeasible` result with no
/// assignments; it is never downgraded to `partial`. Optimal values must
/// already have been checked against the model.
pub fn extract(
    input: &ValidatedInput,
    model: &DecisionModel,
    outcome: &SolverOutcome,
) -> ScheduleResult {
    if outcome.status != SolveStatus::Optimal {
        return infeasible(outcome.status, input.diagnostics.clone());
    }

    let assignments = model
        .variables()
        .iter()
        .zip(&outcome.values)
        .filter(|(_, value)| (*value - 1.0).abs() <= INTEGRALITY_TOLERANCE)
        .map(|(variable, _)| {
            let employee = &input.employees[variable.employee];
            Assignment {
                shift_id: input.shifts[variable.shift].id.clone(),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
            }
        })
        .collect();

    summarize(input, assignments)
}

/// Derives `success`/`partial` from a set of assignments. Shared with the greedy
/// planner so both report coverage the same way.
pub fn summarize(input: &ValidatedInput, assignments: Vec<Assignment>) -> ScheduleResult {
    let assigned: HashSet<&str> = assignments
        .iter()
        .map(|assignment| assignment.shift_id.as_str())
        .collect();
    let unassigned_shifts: Vec<String> = input
        .shifts
        .iter()
        .filter(|shift| !assigned.contains(shift.id.as_str()))
        .map(|shift| shift.id.clone())
        .collect();

    let (status, message) = if unassigned_shifts.is_empty() {
        (
            ScheduleStatus::Success,
            "Schedule generated successfully".to_string(),
        )
    } else {
        (
            ScheduleStatus::Partial,
            format!(
                "Some shifts could not be assigned: {}",
                unassigned_shifts.join(", ")
            ),
        )
    };

    ScheduleResult {
        status,
        message,
        assignments,
        unassigned_shifts,
        diagnostics: input.diagnostics.clone(),
    }
}

pub(crate) fn infeasible(status: SolveStatus, diagnostics: Vec<Diagnostic>) -> ScheduleResult {
    ScheduleResult {
        status: ScheduleStatus::Infeasible,
        message: format!("No feasible solution found (solver status: {status})"),
        assignments: Vec::new(),
        unassigned_shifts: Vec::new(),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::domain::{EmployeeRecord, ScheduleRequest, ShiftRecord};
    use crate::scheduling::validation::validate;

    fn input() -> ValidatedInput {
        let employee = |id: &str, name: &str| EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            skills: vec!["cashier".to_string()],
            max_hours: 40.0,
            availability_start: "2025-07-01T00:00:00".to_string(),
            availability_end: "2025-07-08T00:00:00".to_string(),
        };
        let shift = |id: &str, day: u32| ShiftRecord {
            id: id.to_string(),
            role: "evening_cashier".to_string(),
            start_time: format!("2025-07-0{day}T16:00:00"),
            end_time: format!("2025-07-0{day}T22:00:00"),
            required_skill: "cashier".to_string(),
        };
        validate(&ScheduleRequest {
            period: "2025-07-01/2025-07-07".to_string(),
            employees: vec![employee("E1", "Ada"), employee("E2", "Brook")],
            shifts: vec![shift("S1", 1), shift("S2", 2), shift("S3", 3)],
        })
        .expect("valid")
    }

    #[test]
    fn optimal_values_become_assignments_in_employee_order() {
        let input = input();
        let model = DecisionModel::build(&input);
        let mut values = vec![0.0; model.variables().len()];
        values[model.variable(1, 0).0] = 1.0;
        values[model.variable(0, 2).0] = 0.9999999;
        values[model.variable(0, 1).0] = 1.0;

        let result = extract(&input, &model, &SolverOutcome::optimal(values));

        assert_eq!(result.status, ScheduleStatus::Success);
        assert_eq!(result.message, "Schedule generated successfully");
        let pairs: Vec<_> = result
            .assignments
            .iter()
            .map(|a| (a.employee_id.as_str(), a.shift_id.as_str()))
            .collect();
        assert_eq!(pairs, vec![("E1", "S2"), ("E1", "S3"), ("E2", "S1")]);
        assert_eq!(result.assignments[2].employee_name, "Brook");
        assert!(result.unassigned_shifts.is_empty());
    }

    #[test]
    fn missing_coverage_is_partial_and_named() {
        let input = input();
        let model = DecisionModel::build(&input);
        let mut values = vec![0.0; model.variables().len()];
        values[model.variable(0, 1).0] = 1.0;

        let result = extract(&input, &model, &SolverOutcome::optimal(values));

        assert_eq!(result.status, ScheduleStatus::Partial);
        assert_eq!(result.unassigned_shifts, vec!["S1", "S3"]);
        assert_eq!(result.message, "Some shifts could not be assigned: S1, S3");
    }

    #[test]
    fn non_optimal_status_is_infeasible_not_partial() {
        let input = input();
        let model = DecisionModel::build(&input);

        for status in [
            SolveStatus::Infeasible,
            SolveStatus::Unbounded,
            SolveStatus::Error,
        ] {
            let result = extract(&input, &model, &SolverOutcome::without_solution(status));
            assert_eq!(result.status, ScheduleStatus::Infeasible);
            assert!(result.assignments.is_empty());
            assert!(result.message.contains(status.label()));
        }
    }
}
