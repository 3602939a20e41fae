use std::collections::BTreeMap;
use std::time::Duration;

/// What one timed trial produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialRecord {
    pub iteration: usize,
    pub strategy: &'static str,
    pub elapsed: Duration,
    pub succeeded: usize,
    pub total: usize,
}

/// Durations per strategy, in the order the trials were executed.
#[derive(Debug, Default, Clone)]
pub struct BenchmarkResults {
    durations: BTreeMap<&'static str, Vec<Duration>>,
    trials: Vec<TrialRecord>,
}

impl BenchmarkResults {
    /// Fold one more trial into the results.
    pub fn record(mut self, trial: TrialRecord) -> Self {
        self.durations
            .entry(trial.strategy)
            .or_default()
            .push(trial.elapsed);
        self.trials.push(trial);
        self
    }

    pub fn durations(&self) -> &BTreeMap<&'static str, Vec<Duration>> {
        &self.durations
    }

    pub fn trials(&self) -> &[TrialRecord] {
        &self.trials
    }

    /// Arithmetic mean of the recorded durations of `strategy`.
    pub fn average(&self, strategy: &str) -> Option<Duration> {
        let durations = self.durations.get(strategy)?;
        let count = u32::try_from(durations.len()).ok().filter(|n| *n > 0)?;
        let total: Duration = durations.iter().sum();
        Some(total / count)
    }

    pub fn averages(&self) -> impl Iterator<Item = (&'static str, Duration)> + '_ {
        self.durations
            .keys()
            .filter_map(|name| self.average(name).map(|avg| (*name, avg)))
    }
}
