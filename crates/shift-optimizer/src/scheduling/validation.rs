//! Request parsing and sanity checks that run before any model is built.
//!
//! Structural problems (bad timestamps, inverted shifts, duplicate ids, unusable
//! hour caps) reject the request. Coverage problems (a shift nobody can work)
//! are reported as [`Diagnostic`]s and left for the optimizer to surface as
//! unassigned shifts.

use super::domain::{
    Diagnostic, DiagnosticKind, Employee, EmployeeRecord, ScheduleRequest, SchedulingPeriod,
    Shift, ShiftRecord, TimeWindow, DATE_FORMAT, TIMESTAMP_FORMAT,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Request contents after parsing, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedInput {
    pub period: SchedulingPeriod,
    pub employees: Vec<Employee>,
    pub shifts: Vec<Shift>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidatedInput {
    /// Employees who hold the skill and are available for the whole shift.
    pub fn eligible_employees<'a>(&'a self, shift: &'a Shift) -> impl Iterator<Item = &'a Employee> {
        self.employees
            .iter()
            .filter(move |employee| employee.is_eligible_for(shift))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid period '{value}': expected YYYY-MM-DD/YYYY-MM-DD")]
    MalformedPeriod { value: String },
    #[error("invalid period '{value}': end date is before start date")]
    InvertedPeriod { value: String },
    #[error("invalid {field} '{value}' for {entity} {id}: expected YYYY-MM-DDTHH:MM:SS")]
    MalformedTimestamp {
        entity: &'static str,
        id: String,
        field: &'static str,
        value: String,
    },
    #[error("Invalid shift {shift_id}: end_time must be after start_time")]
    InvertedShift { shift_id: String },
    #[error("duplicate {entity} id '{id}'")]
    DuplicateId { entity: &'static str, id: String },
    #[error("invalid max_hours {value} for employee {employee_id}: must be a non-negative number")]
    InvalidMaxHours { employee_id: String, value: f64 },
}

/// Parses and checks a request, collecting non-fatal diagnostics on the way.
pub fn validate(request: &ScheduleRequest) -> Result<ValidatedInput, ValidationError> {
    let period = parse_period(&request.period)?;
    debug!(start = %period.start, end = %period.end, "scheduling period parsed");

    let employees = request
        .employees
        .iter()
        .map(parse_employee)
        .collect::<Result<Vec<_>, _>>()?;
    let shifts = request
        .shifts
        .iter()
        .map(parse_shift)
        .collect::<Result<Vec<_>, _>>()?;

    ensure_unique("employee", employees.iter().map(|employee| employee.id.as_str()))?;
    ensure_unique("shift", shifts.iter().map(|shift| shift.id.as_str()))?;

    let mut diagnostics = Vec::new();

    for employee in &employees {
        if employee.availability.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::EmptyAvailability,
                &employee.id,
                format!(
                    "Employee {} has no availability: window ends at or before it starts",
                    employee.id
                ),
            ));
        }
    }

    for shift in &shifts {
        if !period.covers(&shift.window) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::OutsidePeriod,
                &shift.id,
                format!(
                    "Shift {} ({} to {}) falls outside the period {} to {}",
                    shift.id, shift.window.start, shift.window.end, period.start, period.end
                ),
            ));
        }

        let eligible = employees
            .iter()
            .filter(|employee| employee.is_eligible_for(shift))
            .count();
        debug!(shift = %shift.id, skill = %shift.required_skill, eligible, "eligibility computed");

        if eligible == 0 {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::NoEligibleEmployee,
                &shift.id,
                format!(
                    "No eligible employees for shift {} with skill {} at {}",
                    shift.id,
                    shift.required_skill,
                    shift.window.start.format(TIMESTAMP_FORMAT)
                ),
            ));
        }
    }

    for diagnostic in &diagnostics {
        warn!(kind = ?diagnostic.kind, subject = %diagnostic.subject_id, "{}", diagnostic.message);
    }

    Ok(ValidatedInput {
        period,
        employees,
        shifts,
        diagnostics,
    })
}

pub fn parse_period(raw: &str) -> Result<SchedulingPeriod, ValidationError> {
    let malformed = || ValidationError::MalformedPeriod {
        value: raw.to_string(),
    };

    let (start, end) = raw.split_once('/').ok_or_else(malformed)?;
    let start = parse_date(start).ok_or_else(malformed)?;
    let end = parse_date(end).ok_or_else(malformed)?;

    if end < start {
        return Err(ValidationError::InvertedPeriod {
            value: raw.to_string(),
        });
    }

    Ok(SchedulingPeriod { start, end })
}

/// Parses a `YYYY-MM-DDTHH:MM:SS` timestamp. Surrounding whitespace is not
/// part of the format and is rejected.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if raw.trim() != raw {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.trim() != raw {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

fn timestamp(
    entity: &'static str,
    id: &str,
    field: &'static str,
    raw: &str,
) -> Result<NaiveDateTime, ValidationError> {
    parse_timestamp(raw).ok_or_else(|| ValidationError::MalformedTimestamp {
        entity,
        id: id.to_string(),
        field,
        value: raw.to_string(),
    })
}

fn parse_employee(record: &EmployeeRecord) -> Result<Employee, ValidationError> {
    if !record.max_hours.is_finite() || record.max_hours < 0.0 {
        return Err(ValidationError::InvalidMaxHours {
            employee_id: record.id.clone(),
            value: record.max_hours,
        });
    }

    let start = timestamp(
        "employee",
        &record.id,
        "availability_start",
        &record.availability_start,
    )?;
    let end = timestamp(
        "employee",
        &record.id,
        "availability_end",
        &record.availability_end,
    )?;

    Ok(Employee {
        id: record.id.clone(),
        name: record.name.clone(),
        skills: record
            .skills
            .iter()
            .map(|skill| skill.trim().to_string())
            .filter(|skill| !skill.is_empty())
            .collect(),
        max_hours: record.max_hours,
        availability: TimeWindow::new(start, end),
    })
}

fn parse_shift(record: &ShiftRecord) -> Result<Shift, ValidationError> {
    let start = timestamp("shift", &record.id, "start_time", &record.start_time)?;
    let end = timestamp("shift", &record.id, "end_time", &record.end_time)?;

    if end <= start {
        return Err(ValidationError::InvertedShift {
            shift_id: record.id.clone(),
        });
    }

    Ok(Shift {
        id: record.id.clone(),
        role: record.role.clone(),
        window: TimeWindow::new(start, end),
        required_skill: record.required_skill.trim().to_string(),
    })
}

fn ensure_unique<'a>(
    entity: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ValidationError::DuplicateId {
                entity,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
