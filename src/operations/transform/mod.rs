//! The four per-image transforms every strategy is built from.
//!
//! `load` and `store` touch the filesystem and can fail; `resize` and
//! `grayscale` are pure. Each works on exactly one image.

pub mod decode;
pub mod encode;
pub mod grayscale;
pub mod resize;

pub use decode::load;
pub use encode::store;
pub use grayscale::grayscale;
pub use resize::resize;

use crate::common::errors::TransformError;
use image::DynamicImage;
use std::path::Path;

/// Order of the two pure transforms between `load` and `store`.
///
/// Both orders give a 500x500 single-channel result; they differ in cost,
/// since converting first means the resampler only works on one channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOrder {
    ResizeThenGrayscale,
    GrayscaleThenResize,
}

impl TransformOrder {
    pub fn apply(self, img: DynamicImage) -> DynamicImage {
        match self {
            TransformOrder::ResizeThenGrayscale => grayscale(resize(img)),
            TransformOrder::GrayscaleThenResize => resize(grayscale(img)),
        }
    }
}

/// Load, transform and store one image end to end on the calling thread.
pub fn process_item(
    source: &Path,
    destination: &Path,
    order: TransformOrder,
) -> Result<(), TransformError> {
    let img = load(source)?;
    let img = order.apply(img);
    store(destination, &img)
}
