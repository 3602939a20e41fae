use std::fmt;

use image::DynamicImage;
use tokio::sync::oneshot;
use tokio_rayon::AsyncThreadPool;

use crate::common::WORKER_RAYON_POOL;
use crate::common::cancel::{CancelToken, ItemGuard};
use crate::common::errors::ItemError;
use crate::models::WorkItem;
use crate::operations::transform::{grayscale, load, resize, store};

/// One transform step of a pipeline instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Load,
    Resize,
    Grayscale,
    Store,
}

impl StageKind {
    pub const CHAIN: [StageKind; 4] = [
        StageKind::Load,
        StageKind::Resize,
        StageKind::Grayscale,
        StageKind::Store,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StageKind::Load => "load",
            StageKind::Resize => "resize",
            StageKind::Grayscale => "grayscale",
            StageKind::Store => "store",
        }
    }

    /// Apply this stage's transform to `item`.
    ///
    /// `Store` writes only if it can commit `guard`.
    pub fn apply(self, mut item: WorkItem, guard: &ItemGuard) -> Result<WorkItem, ItemError> {
        match self {
            StageKind::Load => item.image = Some(load(&item.source)?),
            StageKind::Resize => item.image = Some(resize(take_payload(&mut item)?)),
            StageKind::Grayscale => item.image = Some(grayscale(take_payload(&mut item)?)),
            // The payload is released once it is on disk.
            StageKind::Store => {
                let img = take_payload(&mut item)?;
                if !guard.commit() {
                    return Err(ItemError::Cancelled);
                }
                store(&item.destination, &img)?;
            }
        }
        Ok(item)
    }
}

fn take_payload(item: &mut WorkItem) -> Result<DynamicImage, ItemError> {
    item.image.take().ok_or(ItemError::Drained)
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a stage gets its single item from.
pub enum Inlet {
    /// The first stage builds the item itself.
    Seed(WorkItem),
    Channel(oneshot::Receiver<WorkItem>),
}

/// Body of one stage task.
///
/// Receives zero or one item, applies `kind` on the worker pool, forwards
/// the result and returns; `downstream` is dropped on every exit path, which
/// closes it. An upstream that closed empty makes this stage close empty too.
/// Once handed to the pool the job runs to completion, but it does nothing
/// for an item that has been abandoned in the meantime.
pub async fn run_stage(
    kind: StageKind,
    inlet: Inlet,
    downstream: oneshot::Sender<WorkItem>,
    cancel: CancelToken,
    guard: ItemGuard,
) -> Result<(), ItemError> {
    let item = match inlet {
        Inlet::Seed(item) => item,
        Inlet::Channel(upstream) => tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ItemError::Cancelled),
            received = upstream => match received {
                Ok(item) => item,
                Err(_) => return Ok(()),
            },
        },
    };
    if cancel.is_cancelled() {
        return Err(ItemError::Cancelled);
    }

    let item = WORKER_RAYON_POOL
        .spawn_async(move || {
            if guard.is_abandoned() {
                return Err(ItemError::Cancelled);
            }
            kind.apply(item, &guard)
        })
        .await?;

    // A dropped receiver means the instance is being torn down; nothing to do.
    let _ = downstream.send(item);
    Ok(())
}
