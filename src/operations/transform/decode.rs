use crate::common::SUPPORTED_IMAGE_FORMATS;
use crate::common::errors::TransformError;
use image::{DynamicImage, ImageError, ImageFormat, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Read and decode the image at `path`.
///
/// The format is sniffed from the file content, not the extension. Content
/// that matches no known format is a decode error; a recognised format outside
/// [`SUPPORTED_IMAGE_FORMATS`] is rejected before any pixel is decoded.
pub fn load(path: &Path) -> Result<DynamicImage, TransformError> {
    let decode_err = |source: ImageError| TransformError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let file_in_memory = std::fs::read(path).map_err(|e| decode_err(ImageError::IoError(e)))?;

    let format = detect_format(&file_in_memory).map_err(decode_err)?;
    if !SUPPORTED_IMAGE_FORMATS.contains(&format) {
        return Err(TransformError::UnsupportedFormat {
            path: path.to_path_buf(),
            format,
        });
    }

    image::load_from_memory_with_format(&file_in_memory, format).map_err(decode_err)
}

fn detect_format(file_in_memory: &[u8]) -> Result<ImageFormat, ImageError> {
    let reader = ImageReader::new(Cursor::new(file_in_memory)).with_guessed_format()?;
    reader.format().ok_or_else(|| {
        ImageError::Unsupported(image::error::UnsupportedError::from_format_and_kind(
            image::error::ImageFormatHint::Unknown,
            image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown),
        ))
    })
}
