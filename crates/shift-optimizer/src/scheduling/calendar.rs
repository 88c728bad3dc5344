use super::domain::Assignment;
use super::validation::ValidatedInput;
use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSlot {
    pub shift_id: String,
    pub role: String,
    pub start: String,
    pub end: String,
    pub duration_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarRow {
    pub employee_id: String,
    pub employee_name: String,
    /// Seven cells, Monday first.
    pub days: Vec<Vec<CalendarSlot>>,
}

/// Monday-to-Sunday grid of assigned shifts, one row per employee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyCalendar {
    pub week_start: NaiveDate,
    pub days: Vec<NaiveDate>,
    pub rows: Vec<CalendarRow>,
}

impl WeeklyCalendar {
    /// Lays out the week containing `anchor`. Shifts are placed on the day they
    /// start; rows follow employee input order and include idle employees.
    pub fn for_week(input: &ValidatedInput, assignments: &[Assignment], anchor: NaiveDate) -> Self {
        let week_start = anchor - Duration::days(i64::from(anchor.weekday().num_days_from_monday()));
        let days: Vec<NaiveDate> = (0..7).map(|offset| week_start + Duration::days(offset)).collect();
        let shifts: HashMap<&str, _> = input
            .shifts
            .iter()
            .map(|shift| (shift.id.as_str(), shift))
            .collect();

        let rows = input
            .employees
            .iter()
            .map(|employee| {
                let mut cells: Vec<Vec<CalendarSlot>> = vec![Vec::new(); 7];
                for assignment in assignments
                    .iter()
                    .filter(|assignment| assignment.employee_id == employee.id)
                {
                    let Some(shift) = shifts.get(assignment.shift_id.as_str()) else {
                        continue;
                    };
                    let Some(position) = days
                        .iter()
                        .position(|day| *day == shift.window.start.date())
                    else {
                        continue;
                    };
                    cells[position].push(CalendarSlot {
                        shift_id: shift.id.clone(),
                        role: shift.role.clone(),
                        start: shift.window.start.format("%H:%M").to_string(),
                        end: shift.window.end.format("%H:%M").to_string(),
                        duration_hours: shift.duration_hours(),
                    });
                }
                for cell in &mut cells {
                    cell.sort_by(|a, b| a.start.cmp(&b.start));
                }
                CalendarRow {
                    employee_id: employee.id.clone(),
                    employee_name: employee.name.clone(),
                    days: cells,
                }
            })
            .collect();

        Self {
            week_start,
            days,
            rows,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.days.iter())
            .map(Vec::len)
            .sum()
    }
}
