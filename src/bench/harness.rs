use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_rayon::AsyncThreadPool;

use crate::bench::namespace::clear_output_root;
use crate::bench::report::{write_averages, write_iteration_header, write_trial};
use crate::bench::results::{BenchmarkResults, TrialRecord};
use crate::bench::schedule::trial_order;
use crate::common::WORKER_RAYON_POOL;
use crate::common::cancel::CancelToken;
use crate::config::BenchConfig;
use crate::strategies::{ImagePipeline, RunContext, Strategy};

/// Runs every strategy `iterations` times over one fixed batch.
pub struct Benchmark {
    config: BenchConfig,
    cancel: CancelToken,
}

impl Benchmark {
    pub fn new(config: BenchConfig) -> Self {
        Self {
            config,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Benchmark all strategies on `inputs`, printing progress to stdout.
    pub async fn run(&self, inputs: Vec<PathBuf>) -> Result<BenchmarkResults> {
        self.run_with_output(inputs, &mut io::stdout()).await
    }

    /// Same as [`run`](Self::run) with the human-readable report going to `out`.
    ///
    /// Every strategy gets the same inputs; only the order of strategies
    /// within an iteration is shuffled. All output roots are removed when the
    /// run ends, even if it stopped early.
    pub async fn run_with_output<W: Write + Send>(
        &self,
        inputs: Vec<PathBuf>,
        out: &mut W,
    ) -> Result<BenchmarkResults> {
        let inputs: Arc<[PathBuf]> = inputs.into();
        let strategies = Strategy::all(
            inputs.clone(),
            &self.config.output_base(),
            self.config.uniform_order,
        );
        let ctx = RunContext::new()
            .with_cancel(self.cancel.clone())
            .with_item_timeout(self.config.item_timeout())
            .with_max_in_flight(self.config.max_in_flight);

        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let plan = trial_order(self.config.iterations, strategies.len(), &mut rng);

        info!(
            "Benchmarking {} strategies over {} inputs, {} iterations",
            strategies.len(),
            inputs.len(),
            self.config.iterations
        );

        let outcome = self.run_plan(&strategies, &plan, &ctx, out).await;
        settle_workers().await;
        let cleanup = clear_all(&strategies);
        let results = outcome?;
        cleanup?;

        write_averages(out, &results).context("failed to write averages")?;
        Ok(results)
    }

    async fn run_plan<W: Write + Send>(
        &self,
        strategies: &[Strategy],
        plan: &[Vec<usize>],
        ctx: &RunContext,
        out: &mut W,
    ) -> Result<BenchmarkResults> {
        let mut results = BenchmarkResults::default();
        for (iteration, order) in plan.iter().enumerate() {
            write_iteration_header(out, iteration).context("failed to write report")?;
            for &index in order {
                if self.cancel.is_cancelled() {
                    warn!("Benchmark cancelled during iteration {}", iteration + 1);
                    return Ok(results);
                }
                let trial = run_trial(iteration, &strategies[index], ctx).await?;
                write_trial(out, &trial).context("failed to write report")?;
                results = results.record(trial);
            }
            writeln!(out).context("failed to write report")?;
        }
        Ok(results)
    }
}

/// One timed run of `strategy` over a freshly cleared output root.
pub async fn run_trial(
    iteration: usize,
    strategy: &Strategy,
    ctx: &RunContext,
) -> Result<TrialRecord> {
    settle_workers().await;
    clear_output_root(strategy.output_root())?;

    let start = Instant::now();
    let report = strategy.run(ctx).await;
    let elapsed = start.elapsed();

    info!(
        duration = &*format!("{:?}", elapsed);
        "{}: {} of {} items succeeded",
        strategy.name(),
        report.succeeded(),
        report.total()
    );

    Ok(TrialRecord {
        iteration,
        strategy: strategy.name(),
        elapsed,
        succeeded: report.succeeded(),
        total: report.total(),
    })
}

/// Reclamation pass, run before an output root is cleared.
///
/// Jobs submitted from outside the pool start in FIFO order, so once a
/// freshly queued no-op has run every earlier job has been picked up; the
/// broadcast then returns only after each worker finished what it held.
/// Work abandoned by an earlier trial is gone by the time the next one is
/// timed and its buffers are released.
async fn settle_workers() {
    WORKER_RAYON_POOL.spawn_async(|| ()).await;
    let settled = tokio::task::spawn_blocking(|| WORKER_RAYON_POOL.broadcast(|_| ())).await;
    if let Err(err) = settled {
        warn!("Worker settle pass failed: {}", err);
    }
}

fn clear_all(strategies: &[Strategy]) -> Result<()> {
    let mut first_err = None;
    for strategy in strategies {
        if let Err(err) = clear_output_root(strategy.output_root()) {
            first_err.get_or_insert(err);
        }
    }
    match first_err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
