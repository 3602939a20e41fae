use crate::common::{OUTPUT_HEIGHT, OUTPUT_WIDTH};
use image::DynamicImage;
use image::imageops::FilterType;

/// Resample to exactly `OUTPUT_WIDTH` x `OUTPUT_HEIGHT`, ignoring aspect ratio.
pub fn resize(img: DynamicImage) -> DynamicImage {
    img.resize_exact(OUTPUT_WIDTH, OUTPUT_HEIGHT, FilterType::Lanczos3)
}
