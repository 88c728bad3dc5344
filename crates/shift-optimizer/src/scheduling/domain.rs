use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Wire format for shift and availability timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
/// Wire format for each half of the scheduling period.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Employee as submitted by the caller; timestamps are still raw strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub max_hours: f64,
    pub availability_start: String,
    pub availability_end: String,
}

/// Shift as submitted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftRecord {
    pub id: String,
    pub role: String,
    pub start_time: String,
    pub end_time: String,
    pub required_skill: String,
}

/// A single optimization request: `period` is `YYYY-MM-DD/YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub period: String,
    #[serde(default)]
    pub employees: Vec<EmployeeRecord>,
    #[serde(default)]
    pub shifts: Vec<ShiftRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SchedulingPeriod {
    pub fn covers(&self, window: &TimeWindow) -> bool {
        window.start.date() >= self.start && window.end.date() <= self.end
    }
}

/// Span of wall-clock time between two timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// True when `other` lies entirely inside this window, endpoints inclusive.
    pub fn contains(&self, other: &TimeWindow) -> bool {
        self.start <= other.start && self.end >= other.end
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    pub fn duration_hours(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 3600.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub skills: BTreeSet<String>,
    pub max_hours: f64,
    pub availability: TimeWindow,
}

impl Employee {
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }

    /// Skill match and availability containment; the hour cap is not considered.
    pub fn is_eligible_for(&self, shift: &Shift) -> bool {
        self.has_skill(&shift.required_skill) && self.availability.contains(&shift.window)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shift {
    pub id: String,
    pub role: String,
    pub window: TimeWindow,
    pub required_skill: String,
}

impl Shift {
    pub fn duration_hours(&self) -> f64 {
        self.window.duration_hours()
    }
}

/// Output record linking a shift to the employee who covers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "shiftId")]
    pub shift_id: String,
    #[serde(rename = "empId")]
    pub employee_id: String,
    #[serde(rename = "empName")]
    pub employee_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Success,
    Partial,
    Infeasible,
}

impl ScheduleStatus {
    pub fn label(self) -> &'static str {
        match self {
            ScheduleStatus::Success => "success",
            ScheduleStatus::Partial => "partial",
            ScheduleStatus::Infeasible => "infeasible",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Nobody holds the skill and is available for the whole shift.
    NoEligibleEmployee,
    /// The shift does not fall inside the requested period.
    OutsidePeriod,
    /// Availability ends at or before it starts.
    EmptyAvailability,
}

/// Non-fatal finding raised while validating a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub subject_id: String,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject_id: impl Into<String>, message: String) -> Self {
        Self {
            kind,
            subject_id: subject_id.into(),
            message,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleResult {
    pub status: ScheduleStatus,
    #[serde(default)]
    pub message: String,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub unassigned_shifts: Vec<String>,
    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl ScheduleResult {
    pub fn assigned_shift_ids(&self) -> BTreeSet<&str> {
        self.assignments
            .iter()
            .map(|assignment| assignment.shift_id.as_str())
            .collect()
    }
}
