#![cfg(feature = "metrics")]

//! Tests for the metrics module.

use anyhow::Result;
use ironfold::metrics::{CounterMetric, GaugeMetric, MetricsCollector};
use ironfold::reductions::Sum;
use ironfold::{ExecMode, ReductionSpec, Runner};
use serde_json::json;

#[test]
fn collector_tracks_custom_metrics() {
    let collector = MetricsCollector::new();
    collector.register(Box::new(CounterMetric::with_value("tokens_rejected", 5)));
    collector.register(Box::new(
        GaugeMetric::new("merge_ratio", 2.5).with_description("partials per round"),
    ));

    let snapshot = collector.snapshot();
    assert_eq!(snapshot.get("tokens_rejected"), Some(&json!(5)));
    assert_eq!(snapshot.get("merge_ratio"), Some(&json!(2.5)));
}

#[test]
fn increment_counter_accumulates() {
    let collector = MetricsCollector::new();
    collector.increment_counter("requests", 1);
    collector.increment_counter("requests", 5);

    assert_eq!(collector.snapshot().get("requests"), Some(&json!(6)));
}

#[test]
fn runner_records_run_stats() -> Result<()> {
    let metrics = MetricsCollector::new();
    let runner = Runner {
        mode: ExecMode::Parallel {
            threads: None,
            chunks: Some(4),
        },
        metrics: Some(metrics.clone()),
        ..Default::default()
    };

    let spec = ReductionSpec::from_fn(Sum::<u64>::new());
    runner.reduce(&spec, (1..=100u64).collect())?;
    runner.reduce(&spec, (1..=50u64).collect())?;

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.get("runs"), Some(&json!(2)));
    assert_eq!(snapshot.get("elements_total"), Some(&json!(150)));
    assert_eq!(snapshot.get("chunks_total"), Some(&json!(8)));
    assert!(snapshot.contains_key("wall_ms_total"));
    Ok(())
}

#[test]
fn save_to_file_writes_json() -> Result<()> {
    let metrics = MetricsCollector::new();
    metrics.increment_counter("things", 3);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("metrics.json");
    metrics.save_to_file(path.to_str().unwrap())?;

    let contents = std::fs::read_to_string(&path)?;
    let parsed: serde_json::Value = serde_json::from_str(&contents)?;
    assert_eq!(parsed.get("things"), Some(&json!(3)));
    Ok(())
}
