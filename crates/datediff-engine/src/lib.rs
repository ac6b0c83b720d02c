//! # datediff-engine
//!
//! Deterministic date difference computation.
//!
//! Given two datetime strings and a unit, computes how much time passed
//! between them as a single integer: days, weekdays, weeks, hours, minutes,
//! seconds or complete calendar years. Malformed input is reported as a
//! typed validation error before any arithmetic runs.
//!
//! ## Modules
//!
//! - [`calculator`] — [`DiffCalculator`], unit dispatch, interval decomposition, weekday counting
//! - [`parse`] — datetime string → absolute instant
//! - [`error`] — Error types

pub mod calculator;
pub mod error;
pub mod parse;

pub use calculator::{calculate, count_weekdays, CalculationType, DiffCalculator, DiffResult, Interval};
pub use error::DiffError;
pub use parse::{DateTimeParser, ParsedDateTime};
