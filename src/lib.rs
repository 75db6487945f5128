//! Shift Segment Suggestion Engine
//!
//! This crate turns the daily packets of a transit operator roster into
//! suggested payroll segments. Each run stops at the sentinel row, routes
//! every ambiguous packet to manual entry with the reasons attached, and for
//! the rest proposes contiguous REG / OT / CTE / LPI segments with labor
//! codes.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
