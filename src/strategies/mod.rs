//! The three ways of pushing a batch through the transforms.

pub mod context;
pub mod parallel;
pub mod pipeline;
pub mod sequential;

pub use context::RunContext;
pub use parallel::ParallelStrategy;
pub use pipeline::StagedPipeline;
pub use sequential::SequentialStrategy;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::future::join_all;
use log::error;
use tokio::task::JoinHandle;

use crate::common::errors::ItemError;
use crate::models::{BatchReport, ItemOutcome};
use crate::operations::transform::TransformOrder;

/// A strategy that processes its configured inputs into its own output root.
pub trait ImagePipeline {
    fn name(&self) -> &'static str;

    fn output_root(&self) -> &Path;

    /// Process every input and return once all of them are done.
    ///
    /// Per-item failures end up in the report; they never abort the batch.
    fn run(&self, ctx: &RunContext) -> impl Future<Output = BatchReport> + Send;
}

/// The strategies the benchmark compares.
pub enum Strategy {
    Pipeline(StagedPipeline),
    Sequential(SequentialStrategy),
    Parallel(ParallelStrategy),
}

impl Strategy {
    /// All three strategies over the same inputs, each writing below
    /// `output_base` in a directory of its own.
    ///
    /// With `uniform_order` the non-pipeline strategies resize before
    /// converting to grayscale, like the pipeline does.
    pub fn all(inputs: Arc<[PathBuf]>, output_base: &Path, uniform_order: bool) -> Vec<Strategy> {
        let order = if uniform_order {
            TransformOrder::ResizeThenGrayscale
        } else {
            TransformOrder::GrayscaleThenResize
        };
        vec![
            Strategy::Pipeline(StagedPipeline::new(
                inputs.clone(),
                output_base.join("output-pipeline"),
            )),
            Strategy::Sequential(SequentialStrategy::new(
                inputs.clone(),
                output_base.join("output-sequential"),
                order,
            )),
            Strategy::Parallel(ParallelStrategy::new(
                inputs,
                output_base.join("output-parallel"),
                order,
            )),
        ]
    }
}

impl ImagePipeline for Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Pipeline(s) => s.name(),
            Strategy::Sequential(s) => s.name(),
            Strategy::Parallel(s) => s.name(),
        }
    }

    fn output_root(&self) -> &Path {
        match self {
            Strategy::Pipeline(s) => s.output_root(),
            Strategy::Sequential(s) => s.output_root(),
            Strategy::Parallel(s) => s.output_root(),
        }
    }

    async fn run(&self, ctx: &RunContext) -> BatchReport {
        match self {
            Strategy::Pipeline(s) => s.run(ctx).await,
            Strategy::Sequential(s) => s.run(ctx).await,
            Strategy::Parallel(s) => s.run(ctx).await,
        }
    }
}

/// Turn one item's result into an outcome, logging failures with the
/// identifier that caused them.
pub(crate) fn record_outcome(
    strategy: &str,
    source: &Path,
    result: Result<(), ItemError>,
) -> ItemOutcome {
    match result {
        Ok(()) => ItemOutcome::success(source.to_path_buf()),
        Err(err) => {
            error!(
                "[{}] Error image: {:?}: {}",
                strategy,
                source,
                describe_error(&err)
            );
            ItemOutcome::failure(source.to_path_buf(), err)
        }
    }
}

fn describe_error(err: &ItemError) -> String {
    let mut message = err.to_string();
    let mut last = message.clone();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        let text = inner.to_string();
        // Wrapped io errors often repeat their wrapper's text verbatim.
        if text != last {
            message.push_str(": ");
            message.push_str(&text);
            last = text;
        }
        cause = inner.source();
    }
    message
}

/// Join barrier over one task per input; `handles[i]` belongs to `sources[i]`.
pub(crate) async fn join_items(
    strategy: &str,
    sources: &[PathBuf],
    handles: Vec<JoinHandle<Result<(), ItemError>>>,
) -> BatchReport {
    let results = join_all(handles).await;
    let outcomes = sources
        .iter()
        .zip(results)
        .map(|(source, joined)| {
            let result = joined.unwrap_or_else(|join_err| Err(join_err.into()));
            record_outcome(strategy, source, result)
        })
        .collect();
    BatchReport::new(outcomes)
}
