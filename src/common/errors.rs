use std::path::PathBuf;
use std::time::Duration;

use log::error;
use thiserror::Error;

/// Failure of a single transform on a single image.
#[derive(Debug, Error)]
pub enum TransformError {
    #[error("failed to decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("unsupported image format {format:?} for {path:?}")]
    UnsupportedFormat {
        path: PathBuf,
        format: image::ImageFormat,
    },
    #[error("failed to write image {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Why one item of a batch did not produce an artifact.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("cancelled before completion")]
    Cancelled,
    #[error("timed out after {0:?}")]
    TimedOut(Duration),
    #[error("task aborted: {0}")]
    Aborted(String),
    #[error("pipeline finished without storing the item")]
    Drained,
}

impl ItemError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ItemError::Cancelled)
    }
}

impl From<tokio::task::JoinError> for ItemError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_cancelled() {
            ItemError::Cancelled
        } else {
            ItemError::Aborted(err.to_string())
        }
    }
}

/// Log the whole cause chain of `err` and hand it back to the caller.
pub fn handle_error(err: anyhow::Error) -> anyhow::Error {
    error!("{:?}", err);
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn unsupported_format_names_path_and_format() {
        let err = TransformError::UnsupportedFormat {
            path: PathBuf::from("images/c.gif"),
            format: image::ImageFormat::Gif,
        };
        assert_eq!(
            err.to_string(),
            "unsupported image format Gif for \"images/c.gif\""
        );
    }

    #[test]
    fn item_error_is_transparent_over_transform_error() {
        let err: ItemError = TransformError::Write {
            path: PathBuf::from("out/a.jpg"),
            source: image::ImageError::IoError(io::Error::other("disk full")),
        }
        .into();
        assert_eq!(err.to_string(), "failed to write image \"out/a.jpg\"");
        assert!(!err.is_cancelled());
    }

    #[test]
    fn timed_out_formats_duration() {
        let err = ItemError::TimedOut(Duration::from_secs(3));
        assert_eq!(err.to_string(), "timed out after 3s");
    }
}
