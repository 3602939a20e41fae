use anyhow::Result;
use std::path::PathBuf;

use crate::bootstrap::inputs::list_input_files;
use crate::bootstrap::logger::initialize_logger;
use crate::config::BenchConfig;

/// Everything the benchmark needs before its first trial.
pub struct Setup {
    pub config: BenchConfig,
    pub inputs: Vec<PathBuf>,
}

/// Start logging, read the configuration and enumerate the batch.
///
/// Any failure here is fatal: no trial has run yet.
pub fn initialize() -> Result<Setup> {
    initialize_logger();
    let config = BenchConfig::from_env()?;
    let inputs = list_input_files(&config.input_dir)?;
    Ok(Setup { config, inputs })
}
