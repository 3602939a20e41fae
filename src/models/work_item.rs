use image::DynamicImage;
use std::path::{Path, PathBuf};

use crate::utils::output_path;

/// One input image on its way through a pipeline instance.
///
/// Owned by exactly one stage at a time; stages move it downstream rather
/// than share it.
#[derive(Debug)]
pub struct WorkItem {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub image: Option<DynamicImage>,
}

impl WorkItem {
    pub fn new(source: impl Into<PathBuf>, output_root: impl AsRef<Path>) -> Self {
        let source = source.into();
        let destination = output_path(output_root, &source);
        Self {
            source,
            destination,
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destination_mirrors_source_name() {
        let item = WorkItem::new("images/b.png", "out");
        assert_eq!(item.destination, PathBuf::from("out/b.png"));
        assert!(item.image.is_none());
    }
}
