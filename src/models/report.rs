use std::path::PathBuf;

use crate::common::errors::ItemError;

/// Result of processing one input identifier.
#[derive(Debug)]
pub struct ItemOutcome {
    pub source: PathBuf,
    pub result: Result<(), ItemError>,
}

impl ItemOutcome {
    pub fn success(source: PathBuf) -> Self {
        Self {
            source,
            result: Ok(()),
        }
    }

    pub fn failure(source: PathBuf, err: ItemError) -> Self {
        Self {
            source,
            result: Err(err),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item outcomes of one strategy run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    pub fn new(outcomes: Vec<ItemOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &ItemError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.source, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_successes_and_failures() {
        let report = BatchReport::new(vec![
            ItemOutcome::success("a.jpg".into()),
            ItemOutcome::failure("b.png".into(), ItemError::Cancelled),
            ItemOutcome::success("c.png".into()),
        ]);
        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, &PathBuf::from("b.png"));
        assert!(failures[0].1.is_cancelled());
    }
}
