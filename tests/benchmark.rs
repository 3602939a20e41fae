mod common;

use std::collections::BTreeSet;
use std::time::Duration;

use image::ImageFormat;
use pipeline_bench::bench::Benchmark;
use pipeline_bench::common::cancel::CancelToken;
use pipeline_bench::config::BenchConfig;
use pipeline_bench::strategies::{parallel, pipeline, sequential};

use common::{write_corrupt, write_image};

fn config_for(dir: &std::path::Path, iterations: usize, seed: u64) -> BenchConfig {
    BenchConfig {
        input_dir: dir.join("images"),
        iterations,
        seed: Some(seed),
        ..BenchConfig::default()
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn five_iterations_give_five_durations_per_strategy() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    let inputs = vec![
        write_image(&images, "a.jpg", 80, 60, ImageFormat::Jpeg),
        write_image(&images, "b.png", 30, 30, ImageFormat::Png),
    ];

    let mut out = Vec::new();
    let results = Benchmark::new(config_for(dir.path(), 5, 3))
        .run_with_output(inputs, &mut out)
        .await
        .unwrap();

    let keys: BTreeSet<_> = results.durations().keys().copied().collect();
    assert_eq!(
        keys,
        BTreeSet::from([pipeline::NAME, sequential::NAME, parallel::NAME])
    );
    for (name, durations) in results.durations() {
        assert_eq!(durations.len(), 5, "{name}");
        let mean = durations.iter().map(Duration::as_secs_f64).sum::<f64>() / 5.0;
        let average = results.average(name).unwrap().as_secs_f64();
        assert!((mean - average).abs() < 1e-6, "{name}: {mean} vs {average}");
    }
    assert!(results.trials().iter().all(|t| t.succeeded == 2 && t.total == 2));

    let text = String::from_utf8(out).unwrap();
    for i in 1..=5 {
        assert!(text.contains(&format!("Iteration {i}:")));
    }
    assert!(text.contains("Average Results:"));

    // Output roots are removed once the run is over.
    for root in ["output-pipeline", "output-sequential", "output-parallel"] {
        assert!(!dir.path().join(root).exists(), "{root} left behind");
    }
    assert!(images.join("a.jpg").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn trial_order_is_shuffled_but_strategies_each_run_once_per_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    let inputs = vec![write_image(&images, "a.png", 20, 20, ImageFormat::Png)];

    let results = Benchmark::new(config_for(dir.path(), 8, 11))
        .run_with_output(inputs, &mut Vec::new())
        .await
        .unwrap();

    let trials = results.trials();
    assert_eq!(trials.len(), 24);
    let mut orders = BTreeSet::new();
    for iteration in trials.chunks(3) {
        let names: BTreeSet<_> = iteration.iter().map(|t| t.strategy).collect();
        assert_eq!(names.len(), 3);
        assert!(iteration.iter().all(|t| t.iteration == iteration[0].iteration));
        orders.insert(iteration.iter().map(|t| t.strategy).collect::<Vec<_>>());
    }
    assert!(orders.len() > 1, "eight iterations never changed order");
}

#[tokio::test(flavor = "multi_thread")]
async fn partial_failures_do_not_abort_the_benchmark() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    let inputs = vec![
        write_image(&images, "a.png", 20, 20, ImageFormat::Png),
        write_corrupt(&images, "broken.jpg"),
    ];

    let mut out = Vec::new();
    let results = Benchmark::new(config_for(dir.path(), 2, 5))
        .run_with_output(inputs, &mut out)
        .await
        .unwrap();

    assert_eq!(results.trials().len(), 6);
    assert!(results.trials().iter().all(|t| t.succeeded == 1 && t.total == 2));
    assert!(String::from_utf8(out).unwrap().contains("(1 of 2 items succeeded)"));
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelled_benchmark_stops_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    let inputs = vec![write_image(&images, "a.png", 20, 20, ImageFormat::Png)];
    let cancel = CancelToken::new();
    cancel.cancel();

    let results = Benchmark::new(config_for(dir.path(), 3, 1))
        .with_cancel(cancel)
        .run_with_output(inputs, &mut Vec::new())
        .await
        .unwrap();

    assert!(results.trials().is_empty());
    assert!(!dir.path().join("output-pipeline").exists());
}

#[tokio::test(flavor = "multi_thread")]
async fn output_roots_stay_removed_after_a_cancelled_run() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir(&images).unwrap();
    let inputs: Vec<_> = (0..3)
        .map(|i| write_image(&images, &format!("{i}.png"), 1500, 1500, ImageFormat::Png))
        .collect();
    let cancel = CancelToken::new();
    let trigger = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        })
    };

    Benchmark::new(config_for(dir.path(), 2, 11))
        .with_cancel(cancel)
        .run_with_output(inputs, &mut Vec::new())
        .await
        .unwrap();
    trigger.await.unwrap();

    // Nothing abandoned on the worker pool may recreate them later.
    tokio::time::sleep(Duration::from_secs(2)).await;
    for root in ["output-pipeline", "output-sequential", "output-parallel"] {
        assert!(!dir.path().join(root).exists(), "{root} reappeared");
    }
}
