//! Staged pipeline strategy.
//!
//! Every input gets its own [`PipelineInstance`]: four stage tasks
//! (load, resize, grayscale, store) chained by oneshot channels, so while
//! one item is being resized another can already be loading. Instances run
//! concurrently and `run` returns once all of them have been joined.

pub mod stage;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::common::cancel::{CancelToken, ItemGuard};
use crate::common::errors::ItemError;
use crate::models::{BatchReport, WorkItem};
use crate::strategies::{ImagePipeline, RunContext, join_items};
use stage::{Inlet, StageKind, run_stage};

pub const NAME: &str = "Pipeline";

/// The stage tasks and channels that process exactly one input.
///
/// Dropping an instance aborts whichever of its stages are still running.
pub struct PipelineInstance {
    source: PathBuf,
    stages: Vec<(StageKind, JoinHandle<Result<(), ItemError>>)>,
    completion: oneshot::Receiver<WorkItem>,
}

impl PipelineInstance {
    /// Build the channel chain for `source` and spawn one task per stage.
    ///
    /// `guard` is the item's write claim; the store stage commits it.
    pub fn spawn(
        source: PathBuf,
        output_root: &Path,
        cancel: &CancelToken,
        guard: &ItemGuard,
    ) -> Self {
        let mut stages = Vec::with_capacity(StageKind::CHAIN.len());

        let seed = Inlet::Seed(WorkItem::new(source.clone(), output_root));
        let (tx, mut upstream) = oneshot::channel();
        let load = run_stage(StageKind::Load, seed, tx, cancel.clone(), guard.clone());
        stages.push((StageKind::Load, tokio::spawn(load)));

        for kind in StageKind::CHAIN.into_iter().skip(1) {
            let (tx, rx) = oneshot::channel();
            let stage = run_stage(
                kind,
                Inlet::Channel(upstream),
                tx,
                cancel.clone(),
                guard.clone(),
            );
            stages.push((kind, tokio::spawn(stage)));
            upstream = rx;
        }

        Self {
            source,
            stages,
            completion: upstream,
        }
    }

    /// Wait for every stage to exit and report how the item fared.
    ///
    /// The most upstream failure is the cause; stages below it only closed
    /// their channels empty.
    pub async fn join(mut self) -> Result<(), ItemError> {
        let mut first_err = None;
        for (kind, handle) in self.stages.iter_mut() {
            let exit = match handle.await {
                Ok(exit) => exit,
                Err(join_err) => Err(ItemError::from(join_err)),
            };
            if let Err(err) = exit {
                debug!("Stage {} failed for {:?}: {}", kind, self.source, err);
                first_err.get_or_insert(err);
            }
        }

        if let Some(err) = first_err {
            return Err(err);
        }
        match self.completion.try_recv() {
            Ok(_) => Ok(()),
            Err(_) => Err(ItemError::Drained),
        }
    }
}

impl Drop for PipelineInstance {
    fn drop(&mut self) {
        for (_, handle) in &self.stages {
            handle.abort();
        }
    }
}

pub struct StagedPipeline {
    inputs: Arc<[PathBuf]>,
    output_root: PathBuf,
}

impl StagedPipeline {
    pub fn new(inputs: Arc<[PathBuf]>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            inputs,
            output_root: output_root.into(),
        }
    }
}

impl ImagePipeline for StagedPipeline {
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
                let cancel = ctx.cancel.clone();
                let source = source.clone();
                let output_root = self.output_root.clone();
                tokio::spawn(async move {
                    ctx.supervise(|guard| async move {
                        PipelineInstance::spawn(source, &output_root, &cancel, &guard)
                            .join()
                            .await
                    })
                    .await
                })
            })
            .collect();

        join_items(NAME, &self.inputs, handles).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    #[tokio::test(flavor = "multi_thread")]
    async fn instance_stores_item() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("one.png");
        RgbImage::from_pixel(20, 10, Rgb([5, 6, 7]))
            .save_with_format(&source, ImageFormat::Png)
            .unwrap();
        let out = dir.path().join("out");

        PipelineInstance::spawn(source, &out, &CancelToken::new(), &ItemGuard::new())
            .join()
            .await
            .unwrap();

        assert!(out.join("one.png").is_file());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn instance_reports_load_failure_as_cause() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("corrupt.jpg");
        std::fs::write(&source, b"nope").unwrap();
        let out = dir.path().join("out");

        let err = PipelineInstance::spawn(source, &out, &CancelToken::new(), &ItemGuard::new())
            .join()
            .await
            .unwrap_err();

        assert!(matches!(err, ItemError::Transform(_)), "{err:?}");
        assert!(!out.join("corrupt.jpg").exists());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn dropped_instance_never_stores() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("big.png");
        RgbImage::from_pixel(1500, 1500, Rgb([50, 60, 70]))
            .save_with_format(&source, ImageFormat::Png)
            .unwrap();
        let out = dir.path().join("out");
        let guard = ItemGuard::new();

        let instance = PipelineInstance::spawn(source, &out, &CancelToken::new(), &guard);
        assert!(guard.abandon());
        drop(instance);
        tokio::time::sleep(std::time::Duration::from_millis(500)).await;

        assert!(!out.exists());
    }
}
