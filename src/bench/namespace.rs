use anyhow::{Context, Result};
use log::debug;
use std::io::ErrorKind;
use std::path::Path;

/// Remove `output_root` and everything below it. A missing root is already
/// clear.
pub fn clear_output_root(output_root: &Path) -> Result<()> {
    match std::fs::remove_dir_all(output_root) {
        Ok(()) => {
            debug!("Cleared output root {:?}", output_root);
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).context(format!("failed to clear output root {:?}", output_root)),
    }
}
