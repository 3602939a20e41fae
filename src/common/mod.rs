pub mod cancel;
pub mod errors;

pub const OUTPUT_WIDTH: u32 = 500;

pub const OUTPUT_HEIGHT: u32 = 500;

pub const DEFAULT_ITERATIONS: usize = 5;

pub const DEFAULT_INPUT_DIR: &str = "./images";

pub const SUPPORTED_IMAGE_FORMATS: &[image::ImageFormat] =
    &[image::ImageFormat::Jpeg, image::ImageFormat::Png];

use std::sync::LazyLock;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio::runtime::{Builder, Runtime};

pub static CURRENT_NUM_THREADS: LazyLock<usize> = LazyLock::new(|| rayon::current_num_threads());

// Drives every strategy and the harness itself.
pub static BENCH_RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    Builder::new_multi_thread()
        .worker_threads(*CURRENT_NUM_THREADS)
        .thread_name("bench-orchestrator")
        .enable_all()
        .build()
        .expect("Failed to build benchmark Tokio runtime")
});

// Rayon thread pool for the transform work (decode, resample, encode).
// It does not create a global Rayon pool, so it does not interfere with other threads.
// Jobs are submitted with `tokio_rayon::AsyncThreadPool::spawn_async`.
pub static WORKER_RAYON_POOL: LazyLock<ThreadPool> = LazyLock::new(|| {
    ThreadPoolBuilder::new()
        .num_threads(*CURRENT_NUM_THREADS)
        .thread_name(|i| format!("transform-worker-{}", i))
        .build()
        .expect("Failed to build Worker Rayon pool")
});

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_rayon::AsyncThreadPool;

    #[tokio::test]
    async fn jobs_run_on_named_transform_workers() {
        let name = WORKER_RAYON_POOL
            .spawn_async(|| std::thread::current().name().map(str::to_owned))
            .await;
        assert!(name.unwrap().starts_with("transform-worker-"));
    }

    #[tokio::test]
    async fn panicking_job_surfaces_as_task_panic() {
        let joined = tokio::spawn(WORKER_RAYON_POOL.spawn_async(|| -> u8 { panic!("boom") })).await;
        assert!(joined.unwrap_err().is_panic());
    }
}
