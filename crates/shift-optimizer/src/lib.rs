//! Shift roster optimization.
//!
//! Requests are validated, translated into a binary assignment model, handed to a
//! [`scheduling::SolverBackend`], and the solved values are turned back into a
//! roster with explicit coverage gaps.

pub mod config;
pub mod error;
pub mod scheduling;
pub mod telemetry;
