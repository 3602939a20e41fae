use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_rayon::AsyncThreadPool;

use crate::common::WORKER_RAYON_POOL;
use crate::common::cancel::ItemGuard;
use crate::common::errors::ItemError;
use crate::models::BatchReport;
use crate::operations::transform::{TransformOrder, load, store};
use crate::strategies::{ImagePipeline, RunContext, join_items};
use crate::utils::output_path;

pub const NAME: &str = "Parallel Processing without Pipeline";

/// One task per input running the whole transform chain locally, with no
/// stage decomposition.
pub struct ParallelStrategy {
    inputs: Arc<[PathBuf]>,
    output_root: PathBuf,
    order: TransformOrder,
}

impl ParallelStrategy {
    pub fn new(inputs: Arc<[PathBuf]>, output_root: impl Into<PathBuf>, order: TransformOrder) -> Self {
        Self {
            inputs,
            output_root: output_root.into(),
            order,
        }
    }
}

impl ImagePipeline for ParallelStrategy {
    fn name(&self) -> &'static str {
        NAME
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    async fn run(&self, ctx: &RunContext) -> BatchReport {
        let handles = self
            .inputs
            .iter()
            .map(|source| {
                let ctx = ctx.clone();
                let source = source.clone();
                let destination = output_path(&self.output_root, &source);
                let order = self.order;
                tokio::spawn(async move {
                    ctx.supervise(|guard| {
                        WORKER_RAYON_POOL
                            .spawn_async(move || transform_one(&source, &destination, order, &guard))
                    })
                    .await
                })
            })
            .collect();

        join_items(NAME, &self.inputs, handles).await
    }
}

/// The full chain for one item, skipping the write if the item was abandoned.
fn transform_one(
    source: &Path,
    destination: &Path,
    order: TransformOrder,
    guard: &ItemGuard,
) -> Result<(), ItemError> {
    if guard.is_abandoned() {
        return Err(ItemError::Cancelled);
    }
    let img = order.apply(load(source)?);
    if !guard.commit() {
        return Err(ItemError::Cancelled);
    }
    store(destination, &img)?;
    Ok(())
}
