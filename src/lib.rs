//! Averages, moving averages and standard deviations over numeric sequences,
//! plus the pieces behind the `numstat` command-line tool.

pub mod config;
pub mod demo;
pub mod greet;
pub mod stats;

pub use stats::{StatsError, average, moving_average, stddev};
