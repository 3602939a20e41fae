use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_rayon::AsyncThreadPool;

use crate::common::WORKER_RAYON_POOL;
use crate::common::errors::ItemError;
use crate::models::{BatchReport, ItemOutcome};
use crate::operations::transform::{TransformOrder, process_item};
use crate::strategies::{ImagePipeline, RunContext, record_outcome};
use crate::utils::output_path;

pub const NAME: &str = "Sequential Processing";

/// Baseline: one thread of control, one item at a time, in input order.
pub struct SequentialStrategy {
    inputs: Arc<[PathBuf]>,
    output_root: PathBuf,
    order: TransformOrder,
}

impl SequentialStrategy {
    pub fn new(inputs: Arc<[PathBuf]>, output_root: impl Into<PathBuf>, order: TransformOrder) -> Self {
        Self {
            inputs,
            output_root: output_root.into(),
            order,
        }
    }
}

impl ImagePipeline for SequentialStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// The whole loop runs as a single job on the worker pool. The cancel
    /// signal is checked between items; the per-item timeout does not apply
    /// since nothing here can interrupt a running transform.
    async fn run(&self, ctx: &RunContext) -> BatchReport {
        let inputs = self.inputs.clone();
        let output_root = self.output_root.clone();
        let order = self.order;
        let cancel = ctx.cancel.clone();

        let batch = WORKER_RAYON_POOL.spawn_async(move || {
            inputs
                .iter()
                .map(|source| {
                    let result = if cancel.is_cancelled() {
                        Err(ItemError::Cancelled)
                    } else {
                        let destination = output_path(&output_root, source);
                        process_item(source, &destination, order).map_err(ItemError::from)
                    };
                    record_outcome(NAME, source, result)
                })
                .collect::<Vec<_>>()
        });

        // Own task so a panicking transform comes back as a JoinError.
        match tokio::spawn(batch).await {
            Ok(outcomes) => BatchReport::new(outcomes),
            Err(join_err) => BatchReport::new(
                self.inputs
                    .iter()
                    .map(|source| {
                        ItemOutcome::failure(
                            source.clone(),
                            ItemError::Aborted(format!("sequential worker failed: {join_err}")),
                        )
                    })
                    .collect(),
            ),
        }
    }
}
