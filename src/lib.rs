//! Battle report aggregation and formatting.
//!
//! Folds per-unit stat tables into party totals, scores them in military
//! points, narrates fleet losses and renders either a detailed text report or
//! a one-line digest.

pub mod cli;
pub mod data;
pub mod parallel;
pub mod report;
pub mod server;
