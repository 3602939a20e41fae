use std::io::{self, Write};

use crate::bench::results::{BenchmarkResults, TrialRecord};

pub fn write_iteration_header<W: Write>(out: &mut W, iteration: usize) -> io::Result<()> {
    writeln!(out, "Iteration {}:", iteration + 1)
}

pub fn write_trial<W: Write>(out: &mut W, trial: &TrialRecord) -> io::Result<()> {
    if trial.succeeded == trial.total {
        writeln!(out, "{}: {:?}", trial.strategy, trial.elapsed)
    } else {
        writeln!(
            out,
            "{}: {:?} ({} of {} items succeeded)",
            trial.strategy, trial.elapsed, trial.succeeded, trial.total
        )
    }
}

pub fn write_averages<W: Write>(out: &mut W, results: &BenchmarkResults) -> io::Result<()> {
    writeln!(out, "Average Results:")?;
    for (name, average) in results.averages() {
        writeln!(out, "{}: {:?}", name, average)?;
    }
    Ok(())
}
