//! Benchmark harness: repeated, shuffled, timed trials of every strategy.

pub mod harness;
pub mod namespace;
pub mod report;
pub mod results;
pub mod schedule;

pub use harness::{Benchmark, run_trial};
pub use results::{BenchmarkResults, TrialRecord};
