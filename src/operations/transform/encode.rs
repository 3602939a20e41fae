use crate::common::errors::TransformError;
use image::{DynamicImage, ImageError, ImageFormat};
use std::path::Path;

/// Encode `img` as JPEG and write it to `path`, creating missing parent
/// directories first. The extension of `path` does not affect the encoding.
pub fn store(path: &Path, img: &DynamicImage) -> Result<(), TransformError> {
    let write_err = |source: ImageError| TransformError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent_path) = path.parent() {
        // Racing creators are fine: create_dir_all treats an existing tree as success.
        std::fs::create_dir_all(parent_path).map_err(|e| write_err(ImageError::IoError(e)))?;
    }

    img.save_with_format(path, ImageFormat::Jpeg)
        .map_err(write_err)
}
