use crate::infra::build_optimizer;
use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use shift_optimizer::config::SolverConfig;
use shift_optimizer::error::AppError;
use shift_optimizer::scheduling::{
    validate, EmployeeRecord, RosterImporter, ScheduleRequest, ScheduleResult, SchedulingError,
    ShiftOptimizer, ShiftRecord, WeeklyCalendar,
};
use std::path::PathBuf;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Strategy {
    /// Integer program: maximizes the number of covered shifts
    #[default]
    Exact,
    /// Fast baseline: hands each shift to the least-loaded eligible employee
    Greedy,
}

#[derive(Args, Debug)]
pub(crate) struct OptimizeArgs {
    /// Scheduling period as YYYY-MM-DD/YYYY-MM-DD
    #[arg(long)]
    pub(crate) period: String,
    /// employees.csv export (id,name,skills,max_hours,availability_start,availability_end)
    #[arg(long)]
    pub(crate) employees: PathBuf,
    /// shifts.csv export (id,role,start_time,end_time,required_skill)
    #[arg(long)]
    pub(crate) shifts: PathBuf,
    #[arg(long, value_enum, default_value_t = Strategy::Exact)]
    pub(crate) strategy: Strategy,
    /// Print the Monday-to-Sunday grid for the week containing this date (YYYY-MM-DD)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) calendar_week: Option<NaiveDate>,
    /// Emit the result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Skip the greedy baseline comparison
    #[arg(long)]
    pub(crate) skip_baseline: bool,
    /// Emit the exact result as JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let OptimizeArgs {
        period,
        employees,
        shifts,
        strategy,
        calendar_week,
        json,
    } = args;

    let request = ScheduleRequest {
        period,
        employees: RosterImporter::employees_from_path(&employees)?,
        shifts: RosterImporter::shifts_from_path(&shifts)?,
    };

    let optimizer = build_optimizer(&SolverConfig::default());
    let result = solve(&optimizer, request.clone(), strategy).await?;

    if json {
        println!("{}", to_json(&result)?);
        return Ok(());
    }

    render_result(&result, strategy);
    if let Some(anchor) = calendar_week {
        let input = validate(&request).map_err(SchedulingError::from)?;
        render_calendar(&WeeklyCalendar::for_week(&input, &result.assignments, anchor));
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let request = demo_request();
    let optimizer = build_optimizer(&SolverConfig::default());
    let exact = solve(&optimizer, request.clone(), Strategy::Exact).await?;

    if args.json {
        println!("{}", to_json(&exact)?);
        return Ok(());
    }

    println!("Shift optimizer demo");
    println!(
        "Period {} | {} employees | {} shifts",
        request.period,
        request.employees.len(),
        request.shifts.len()
    );
    render_result(&exact, Strategy::Exact);

    if !args.skip_baseline {
        let greedy = solve(&optimizer, request.clone(), Strategy::Greedy).await?;
        render_result(&greedy, Strategy::Greedy);
        println!(
            "\nCoverage: exact {} / greedy {} of {} shifts",
            exact.assignments.len(),
            greedy.assignments.len(),
            request.shifts.len()
        );
    }

    let input = validate(&request).map_err(SchedulingError::from)?;
    render_calendar(&WeeklyCalendar::for_week(
        &input,
        &exact.assignments,
        input.period.start,
    ));
    Ok(())
}

/// Infeasible outcomes are still printable results on the command line.
async fn solve(
    optimizer: &ShiftOptimizer,
    request: ScheduleRequest,
    strategy: Strategy,
) -> Result<ScheduleResult, AppError> {
    let outcome = match strategy {
        Strategy::Exact => optimizer.optimize(request).await,
        Strategy::Greedy => optimizer.plan_greedy(&request),
    };
    match outcome {
        Ok(result) => Ok(result),
        Err(SchedulingError::Infeasible(result)) => Ok(*result),
        Err(err) => Err(err.into()),
    }
}

fn to_json(result: &ScheduleResult) -> Result<String, AppError> {
    Ok(serde_json::to_string_pretty(result)?)
}

fn render_result(result: &ScheduleResult, strategy: Strategy) {
    let label = match strategy {
        Strategy::Exact => "Exact",
        Strategy::Greedy => "Greedy baseline",
    };
    println!("\n{} roster: {} ({})", label, result.status.label(), result.message);

    if result.assignments.is_empty() {
        println!("  No assignments");
    }
    for assignment in &result.assignments {
        println!(
            "  {:<8} -> {} ({})",
            assignment.shift_id, assignment.employee_name, assignment.employee_id
        );
    }

    if !result.unassigned_shifts.is_empty() {
        println!("  Unassigned: {}", result.unassigned_shifts.join(", "));
    }
    for diagnostic in &result.diagnostics {
        println!("  ! {}", diagnostic.message);
    }
}

fn render_calendar(calendar: &WeeklyCalendar) {
    println!("\nWeek of {}", calendar.week_start);
    for row in &calendar.rows {
        println!("{} ({})", row.employee_name, row.employee_id);
        for (day, slots) in calendar.days.iter().zip(&row.days) {
            if slots.is_empty() {
                continue;
            }
            let cells: Vec<String> = slots
                .iter()
                .map(|slot| format!("{} {}-{} {}", slot.shift_id, slot.start, slot.end, slot.role))
                .collect();
            println!("  {} {}: {}", day.format("%a"), day, cells.join("; "));
        }
    }
}

/// A small café week. Nobody is rostered for Saturday, so the weekend bar
/// shift is left open.
fn demo_request() -> ScheduleRequest {
    let employee = |id: &str, name: &str, skills: &[&str], max_hours: f64, from: &str, to: &str| {
        EmployeeRecord {
            id: id.to_string(),
            name: name.to_string(),
            skills: skills.iter().map(|skill| skill.to_string()).collect(),
            max_hours,
            availability_start: from.to_string(),
            availability_end: to.to_string(),
        }
    };
    let shift = |id: &str, role: &str, start: &str, end: &str, skill: &str| ShiftRecord {
        id: id.to_string(),
        role: role.to_string(),
        start_time: start.to_string(),
        end_time: end.to_string(),
        required_skill: skill.to_string(),
    };

    ScheduleRequest {
        period: "2025-07-07/2025-07-13".to_string(),
        employees: vec![
            employee(
                "E1",
                "Ada",
                &["cashier", "barista"],
                16.0,
                "2025-07-07T06:00:00",
                "2025-07-09T22:00:00",
            ),
            employee(
                "E2",
                "Brook",
                &["cook"],
                12.0,
                "2025-07-07T05:00:00",
                "2025-07-11T23:00:00",
            ),
            employee(
                "E3",
                "Cyd",
                &["barista"],
                8.0,
                "2025-07-07T06:00:00",
                "2025-07-08T20:00:00",
            ),
        ],
        shifts: vec![
            shift(
                "S1",
                "morning_bar",
                "2025-07-07T07:00:00",
                "2025-07-07T13:00:00",
                "barista",
            ),
            shift(
                "S2",
                "lunch_till",
                "2025-07-07T11:00:00",
                "2025-07-07T17:00:00",
                "cashier",
            ),
            shift(
                "S3",
                "morning_kitchen",
                "2025-07-08T06:00:00",
                "2025-07-08T12:00:00",
                "cook",
            ),
            shift(
                "S4",
                "evening_kitchen",
                "2025-07-09T16:00:00",
                "2025-07-09T22:00:00",
                "cook",
            ),
            shift(
                "S5",
                "weekend_bar",
                "2025-07-12T08:00:00",
                "2025-07-12T14:00:00",
                "barista",
            ),
        ],
    }
}
