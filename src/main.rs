use anyhow::Result;
use log::{error, info, warn};

use pipeline_bench::bench::Benchmark;
use pipeline_bench::bootstrap::setup::initialize;
use pipeline_bench::common::BENCH_RUNTIME;
use pipeline_bench::common::cancel::CancelToken;
use pipeline_bench::common::errors::handle_error;

fn main() -> Result<()> {
    let setup = initialize().map_err(|e| handle_error(e.context("Startup failed")))?;
    if setup.inputs.is_empty() {
        warn!("No input files in {:?}", setup.config.input_dir);
    }

    let cancel = CancelToken::new();
    let benchmark = Benchmark::new(setup.config).with_cancel(cancel.clone());

    BENCH_RUNTIME.block_on(async {
        BENCH_RUNTIME.spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Ctrl-C received, cancelling in-flight work");
                cancel.cancel();
            }
        });

        match benchmark.run(setup.inputs).await {
            Ok(results) => {
                info!("Benchmark finished: {} trials", results.trials().len());
                Ok(())
            }
            Err(err) => {
                error!("Benchmark aborted");
                Err(handle_error(err))
            }
        }
    })
}
