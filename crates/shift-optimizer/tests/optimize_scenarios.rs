use proptest::prelude::*;
use shift_optimizer::scheduling::{
    validate, DecisionModel, EmployeeRecord, MilpBackend, ScheduleRequest, ScheduleStatus,
    SchedulingError, ShiftOptimizer, ShiftRecord, SolverBackend, SolverError, SolverOutcome,
    ValidationError,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn barista(max_hours: f64) -> EmployeeRecord {
    EmployeeRecord {
        id: "E1".to_string(),
        name: "Ada Lovelace".to_string(),
        skills: vec!["barista".to_string()],
        max_hours,
        availability_start: "2025-07-01T08:00:00".to_string(),
        availability_end: "2025-07-01T16:00:00".to_string(),
    }
}

fn shift(id: &str, skill: &str, start: &str, end: &str) -> ShiftRecord {
    ShiftRecord {
        id: id.to_string(),
        role: "front_of_house".to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        required_skill: skill.to_string(),
    }
}

fn morning_shift() -> ShiftRecord {
    shift("S1", "barista", "2025-07-01T09:00:00", "2025-07-01T13:00:00")
}

fn request(employees: Vec<EmployeeRecord>, shifts: Vec<ShiftRecord>) -> ScheduleRequest {
    ScheduleRequest {
        period: "2025-07-01/2025-07-07".to_string(),
        employees,
        shifts,
    }
}

fn optimizer() -> ShiftOptimizer {
    ShiftOptimizer::new(Arc::new(MilpBackend::new()))
}

#[test]
fn qualified_available_employee_covers_the_shift() {
    let result = optimizer()
        .optimize_blocking(&request(vec![barista(8.0)], vec![morning_shift()]))
        .expect("optimizes");

    assert_eq!(result.status, ScheduleStatus::Success);
    assert_eq!(result.assignments.len(), 1);
    let assignment = &result.assignments[0];
    assert_eq!(assignment.shift_id, "S1");
    assert_eq!(assignment.employee_id, "E1");
    assert_eq!(assignment.employee_name, "Ada Lovelace");
    assert!(result.unassigned_shifts.is_empty());
}

#[test]
fn hour_cap_below_shift_length_leaves_it_unassigned() {
    let result = optimizer()
        .optimize_blocking(&request(vec![barista(2.0)], vec![morning_shift()]))
        .expect("optimizes");

    assert_eq!(result.status, ScheduleStatus::Partial);
    assert!(result.assignments.is_empty());
    assert_eq!(result.unassigned_shifts, vec!["S1"]);
    assert!(result.message.contains("S1"));
}

#[test]
fn unknown_skill_is_partial_with_a_diagnostic() {
    let result = optimizer()
        .optimize_blocking(&request(
            vec![barista(8.0)],
            vec![
                morning_shift(),
                shift("S2", "sommelier", "2025-07-01T10:00:00", "2025-07-01T12:00:00"),
            ],
        ))
        .expect("optimizes");

    assert_eq!(result.status, ScheduleStatus::Partial);
    assert_eq!(result.unassigned_shifts, vec!["S2"]);
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].subject_id, "S2");
}

#[test]
fn zero_shifts_is_an_empty_success() {
    let result = optimizer()
        .optimize_blocking(&request(vec![barista(8.0)], vec![]))
        .expect("optimizes");

    assert_eq!(result.status, ScheduleStatus::Success);
    assert!(result.assignments.is_empty());
    assert!(result.unassigned_shifts.is_empty());
}

#[test]
fn no_employees_leaves_every_shift_unassigned() {
    let result = optimizer()
        .optimize_blocking(&request(vec![], vec![morning_shift()]))
        .expect("optimizes");

    assert_eq!(result.status, ScheduleStatus::Partial);
    assert_eq!(result.unassigned_shifts, vec!["S1"]);
}

#[test]
fn exact_model_beats_greedy_when_order_matters() {
    // Greedy hands S1 to Ada (fewest hours, name order) and then has nobody
    // left for S2, which only Ada can work; the exact model gives S1 to Brook.
    let employees = vec![
        EmployeeRecord {
            id: "E1".to_string(),
            name: "Ada".to_string(),
            skills: vec!["barista".to_string(), "roaster".to_string()],
            max_hours: 4.0,
            availability_start: "2025-07-01T08:00:00".to_string(),
            availability_end: "2025-07-01T18:00:00".to_string(),
        },
        EmployeeRecord {
            id: "E2".to_string(),
            name: "Brook".to_string(),
            skills: vec!["barista".to_string()],
            max_hours: 8.0,
            availability_start: "2025-07-01T08:00:00".to_string(),
            availability_end: "2025-07-01T18:00:00".to_string(),
        },
    ];
    let shifts = vec![
        shift("S1", "barista", "2025-07-01T09:00:00", "2025-07-01T13:00:00"),
        shift("S2", "roaster", "2025-07-01T13:00:00", "2025-07-01T17:00:00"),
    ];
    let request = request(employees, shifts);
    let optimizer = optimizer();

    let greedy = optimizer.plan_greedy(&request).expect("greedy plans");
    let exact = optimizer.optimize_blocking(&request).expect("optimizes");

    assert_eq!(greedy.status, ScheduleStatus::Partial);
    assert_eq!(exact.status, ScheduleStatus::Success);
    assert_eq!(exact.assignments.len(), 2);
}

struct CountingBackend {
    calls: AtomicUsize,
}

impl SolverBackend for CountingBackend {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn solve(&self, model: &DecisionModel) -> Result<SolverOutcome, SolverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        MilpBackend::new().solve(model)
    }
}

#[test]
fn inverted_shift_is_rejected_before_solving() {
    let backend = Arc::new(CountingBackend {
        calls: AtomicUsize::new(0),
    });
    let optimizer = ShiftOptimizer::new(backend.clone());
    let inverted = shift("S1", "barista", "2025-07-01T13:00:00", "2025-07-01T09:00:00");

    let err = optimizer
        .optimize_blocking(&request(vec![barista(8.0)], vec![inverted]))
        .expect_err("validation fails");

    assert!(matches!(
        err,
        SchedulingError::Validation(ValidationError::InvertedShift { ref shift_id }) if shift_id == "S1"
    ));
    assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn repeated_runs_produce_identical_rosters() {
    let employees = vec![barista(8.0), {
        let mut other = barista(6.0);
        other.id = "E2".to_string();
        other.name = "Brook".to_string();
        other
    }];
    let shifts = vec![
        morning_shift(),
        shift("S2", "barista", "2025-07-01T12:00:00", "2025-07-01T16:00:00"),
        shift("S3", "barista", "2025-07-01T08:00:00", "2025-07-01T10:00:00"),
    ];
    let request = request(employees, shifts);
    let optimizer = optimizer();

    let first = optimizer.optimize_blocking(&request).expect("optimizes");
    let second = optimizer.optimize_blocking(&request).expect("optimizes");

    assert_eq!(first.status, second.status);
    assert_eq!(first.assigned_shift_ids(), second.assigned_shift_ids());
    assert_eq!(first, second);
}

const SKILLS: [&str; 3] = ["barista", "cook", "cashier"];

fn employee_strategy() -> impl Strategy<Value = (Vec<usize>, u32, u32, u32)> {
    (
        prop::collection::vec(0..SKILLS.len(), 1..3),
        0u32..12,
        0u32..12,
        1u32..16,
    )
}

fn shift_strategy() -> impl Strategy<Value = (usize, u32, u32)> {
    (0..SKILLS.len(), 0u32..20, 1u32..6)
}

fn build_request(
    employees: Vec<(Vec<usize>, u32, u32, u32)>,
    shifts: Vec<(usize, u32, u32)>,
) -> ScheduleRequest {
    let stamp = |hour: u32| {
        let day = 1 + hour / 24;
        format!("2025-07-{:02}T{:02}:00:00", day, hour % 24)
    };

    let employees = employees
        .into_iter()
        .enumerate()
        .map(|(index, (skills, start, span, max_hours))| EmployeeRecord {
            id: format!("E{index}"),
            name: format!("Employee {index}"),
            skills: skills.into_iter().map(|s| SKILLS[s].to_string()).collect(),
            max_hours: f64::from(max_hours),
            availability_start: stamp(start),
            availability_end: stamp(start + span + 6),
        })
        .collect();
    let shifts = shifts
        .into_iter()
        .enumerate()
        .map(|(index, (skill, start, length))| ShiftRecord {
            id: format!("S{index}"),
            role: "floor".to_string(),
            start_time: stamp(start),
            end_time: stamp(start + length),
            required_skill: SKILLS[skill].to_string(),
        })
        .collect();

    ScheduleRequest {
        period: "2025-07-01/2025-07-02".to_string(),
        employees,
        shifts,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn solved_rosters_respect_every_hard_rule(
        employees in prop::collection::vec(employee_strategy(), 0..4),
        shifts in prop::collection::vec(shift_strategy(), 0..5),
    ) {
        let request = build_request(employees, shifts);
        let input = validate(&request).expect("generated requests are valid");
        let result = optimizer().optimize_blocking(&request).expect("optimizes");

        prop_assert_ne!(result.status, ScheduleStatus::Infeasible);

        let employees: HashMap<&str, _> =
            input.employees.iter().map(|e| (e.id.as_str(), e)).collect();
        let shifts: HashMap<&str, _> = input.shifts.iter().map(|s| (s.id.as_str(), s)).collect();
        let mut per_shift: HashMap<&str, usize> = HashMap::new();
        let mut hours: HashMap<&str, f64> = HashMap::new();

        for assignment in &result.assignments {
            let employee = employees[assignment.employee_id.as_str()];
            let shift = shifts[assignment.shift_id.as_str()];
            prop_assert!(employee.skills.contains(&shift.required_skill));
            prop_assert!(employee.availability.contains(&shift.window));
            *per_shift.entry(shift.id.as_str()).or_default() += 1;
            *hours.entry(employee.id.as_str()).or_default() += shift.duration_hours();
        }

        prop_assert!(per_shift.values().all(|count| *count <= 1));
        for (id, worked) in hours {
            prop_assert!(worked <= employees[id].max_hours + 1e-6);
        }
        prop_assert_eq!(
            result.assignments.len() + result.unassigned_shifts.len(),
            input.shifts.len()
        );
    }

    #[test]
    fn exact_coverage_is_never_below_greedy(
        employees in prop::collection::vec(employee_strategy(), 0..4),
        shifts in prop::collection::vec(shift_strategy(), 0..5),
    ) {
        let request = build_request(employees, shifts);
        let optimizer = optimizer();
        let exact = optimizer.optimize_blocking(&request).expect("optimizes");
        let greedy = optimizer.plan_greedy(&request).expect("greedy plans");

        prop_assert!(exact.assignments.len() >= greedy.assignments.len());
    }
}
