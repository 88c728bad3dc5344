//! Shift assignment pipeline: validate → build → solve → extract.

pub mod baseline;
pub mod calendar;
pub mod domain;
pub mod extract;
pub mod import;
pub mod model;
pub mod optimizer;
pub mod router;
pub mod solver;
pub mod validation;

pub use calendar::{CalendarRow, CalendarSlot, WeeklyCalendar};
pub use domain::{
    Assignment, Diagnostic, DiagnosticKind, Employee, EmployeeRecord, ScheduleRequest,
    ScheduleResult, ScheduleStatus, SchedulingPeriod, Shift, ShiftRecord, TimeWindow,
};
pub use import::{RosterImportError, RosterImporter};
pub use model::{ConstraintFamily, DecisionModel, DecisionVariable, LinearConstraint, VariableId};
pub use optimizer::{PipelineStage, SchedulingError, ShiftOptimizer};
pub use router::{schedule_router, scheduling_error_response};
pub use solver::{MilpBackend, SolveStatus, SolverBackend, SolverError, SolverOutcome};
pub use validation::{validate, ValidatedInput, ValidationError};
