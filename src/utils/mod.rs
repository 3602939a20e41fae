use std::path::{Path, PathBuf};

/// Destination of `source` inside `output_root`: same file name, new root.
///
/// Inputs come from a single flat directory, so file names are unique.
pub fn output_path(output_root: impl AsRef<Path>, source: impl AsRef<Path>) -> PathBuf {
    let source = source.as_ref();
    match source.file_name() {
        Some(name) => output_root.as_ref().join(name),
        None => output_root.as_ref().join(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_keeps_file_name_under_new_root() {
        assert_eq!(
            output_path("/tmp/output-pipeline", "./images/a.jpg"),
            PathBuf::from("/tmp/output-pipeline/a.jpg")
        );
    }
}
