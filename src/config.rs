use anyhow::{Context, Result, bail};
use dotenv::dotenv;
use log::info;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::common::{DEFAULT_INPUT_DIR, DEFAULT_ITERATIONS};

/// Benchmark settings, read from `BENCH_*` environment variables.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BenchConfig {
    /// Directory whose files form the batch
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Where the per-strategy output roots go; defaults to the input directory's parent
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Trials per strategy
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Fixed seed for the trial order, for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// Cap on items processed at once by the concurrent strategies
    #[serde(default)]
    pub max_in_flight: Option<usize>,
    /// Give up on an item after this many seconds
    #[serde(default)]
    pub item_timeout_secs: Option<u64>,
    /// Make every strategy resize before converting to grayscale
    #[serde(default)]
    pub uniform_order: bool,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from(DEFAULT_INPUT_DIR)
}

fn default_iterations() -> usize {
    DEFAULT_ITERATIONS
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: None,
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            max_in_flight: None,
            item_timeout_secs: None,
            uniform_order: false,
        }
    }
}

impl BenchConfig {
    /// Load `.env` if present, then read `BENCH_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let config = Self::from_vars(std::env::vars())?;
        info!("Loaded benchmark config: {:?}", config);
        Ok(config)
    }

    /// Build from explicit key/value pairs, as `envy` sees the environment.
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let config: BenchConfig = envy::prefixed("BENCH_")
            .from_iter(vars)
            .context("failed to parse BENCH_* configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            bail!("BENCH_ITERATIONS must be at least 1");
        }
        Ok(())
    }

    /// Parent directory of the per-strategy output roots.
    pub fn output_base(&self) -> PathBuf {
        if let Some(dir) = &self.output_dir {
            return dir.clone();
        }
        match self.input_dir.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    pub fn item_timeout(&self) -> Option<Duration> {
        self.item_timeout_secs.map(Duration::from_secs)
    }
}
