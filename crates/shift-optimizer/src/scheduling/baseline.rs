//! Greedy roster used as a quick baseline next to the exact model.
//!
//! Shifts are filled in input order. For each shift, eligible employees are
//! ranked by hours already assigned (fewest first, ties by name) and the first
//! one whose cap still has room takes the shift. No optimality claim is made.

use super::domain::{Assignment, ScheduleResult};
use super::extract::summarize;
use super::model::INTEGRALITY_TOLERANCE;
use super::validation::ValidatedInput;

pub fn plan(input: &ValidatedInput) -> ScheduleResult {
    let mut assigned_hours = vec![0.0_f64; input.employees.len()];
    let mut assignments = Vec::new();

    for shift in &input.shifts {
        let duration = shift.duration_hours();

        let mut candidates: Vec<usize> = input
            .employees
            .iter()
            .enumerate()
            .filter(|(_, employee)| employee.is_eligible_for(shift))
            .map(|(index, _)| index)
            .collect();
        candidates.sort_by(|&a, &b| {
            assigned_hours[a]
                .total_cmp(&assigned_hours[b])
                .then_with(|| by_name(&input.employees[a].name, &input.employees[b].name))
        });

        let chosen = candidates.into_iter().find(|&index| {
            assigned_hours[index] + duration
                <= input.employees[index].max_hours + INTEGRALITY_TOLERANCE
        });

        if let Some(index) = chosen {
            let employee = &input.employees[index];
            assigned_hours[index] += duration;
            assignments.push(Assignment {
                shift_id: shift.id.clone(),
                employee_id: employee.id.clone(),
                employee_name: employee.name.clone(),
            });
        }
    }

    summarize(input, assignments)
}

/// Case-insensitive name order, falling back to exact order for names that
/// differ only in case.
fn by_name(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
