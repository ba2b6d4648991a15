//! Metrics collection and reporting for reduction runs.
//!
//! A [`MetricsCollector`] attached to a [`Runner`](crate::runner::Runner)
//! records built-in run statistics (runs executed, elements folded, chunks
//! used, wall time) and any custom [`Metric`]s the caller registers. The
//! collector is cheaply cloneable and thread-safe; snapshots serialize to
//! JSON and can be printed or saved to a file.
//!
//! ```no_run
//! use ironfold::metrics::MetricsCollector;
//! use ironfold::reductions::Sum;
//! use ironfold::{ExecMode, ReductionSpec, Runner};
//!
//! # fn main() -> anyhow::Result<()> {
//! let metrics = MetricsCollector::new();
//! let runner = Runner {
//!     mode: ExecMode::Parallel { threads: None, chunks: Some(4) },
//!     metrics: Some(metrics.clone()),
//!     ..Default::default()
//! };
//!
//! let spec = ReductionSpec::from_fn(Sum::<u64>::new());
//! let total = runner.reduce(&spec, (1..=100u64).collect())?;
//! assert_eq!(total, 5050);
//!
//! metrics.print();
//! metrics.save_to_file("metrics.json")?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use serde_json::{Value, json};

/// Trait for custom metrics.
///
/// Implement this to expose your own measurements through a
/// [`MetricsCollector`] snapshot alongside the built-in run statistics.
pub trait Metric: Send + Sync {
    /// The name of this metric (e.g., `tokens_rejected`).
    fn name(&self) -> &str;

    /// The current value of this metric as a JSON value.
    fn value(&self) -> Value;

    /// Optional description of what this metric measures.
    fn description(&self) -> Option<&str> {
        None
    }
}

/// A monotonically increasing counter.
pub struct CounterMetric {
    name: String,
    count: u64,
}

impl CounterMetric {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_value(name, 0)
    }

    pub fn with_value(name: impl Into<String>, count: u64) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }
}

impl Metric for CounterMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.count)
    }
}

/// A point-in-time floating measurement.
pub struct GaugeMetric {
    name: String,
    value: f64,
    description: Option<String>,
}

impl GaugeMetric {
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Metric for GaugeMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn value(&self) -> Value {
        json!(self.value)
    }

    fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Default)]
struct RunStats {
    runs: u64,
    elements: u64,
    chunks: u64,
    wall: Duration,
}

struct MetricsCollectorInner {
    custom: HashMap<String, Box<dyn Metric>>,
    stats: RunStats,
}

/// Thread-safe container for reduction run metrics.
#[derive(Clone)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsCollectorInner>>,
}

impl MetricsCollector {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MetricsCollectorInner {
                custom: HashMap::new(),
                stats: RunStats::default(),
            })),
        }
    }

    /// Register a custom metric. A metric with the same name is replaced.
    pub fn register(&self, metric: Box<dyn Metric>) {
        let mut inner = self.inner.lock().unwrap();
        inner.custom.insert(metric.name().to_string(), metric);
    }

    /// Increment a counter metric by name, creating it at `value` if absent.
    pub fn increment_counter(&self, name: &str, value: u64) {
        let mut inner = self.inner.lock().unwrap();
        let count = match inner.custom.get(name) {
            Some(existing) => existing.value().as_u64().unwrap_or(0) + value,
            None => value,
        };
        inner.custom.insert(
            name.to_string(),
            Box::new(CounterMetric::with_value(name, count)),
        );
    }

    /// Called by the runner after each reduction.
    pub(crate) fn record_run(&self, elements: usize, chunks: usize, wall: Duration) {
        let mut inner = self.inner.lock().unwrap();
        inner.stats.runs += 1;
        inner.stats.elements += elements as u64;
        inner.stats.chunks += chunks as u64;
        inner.stats.wall += wall;
    }

    /// All metric names and values, built-in run statistics included.
    #[must_use]
    pub fn snapshot(&self) -> HashMap<String, Value> {
        let inner = self.inner.lock().unwrap();
        let mut out: HashMap<String, Value> = inner
            .custom
            .iter()
            .map(|(name, metric)| (name.clone(), metric.value()))
            .collect();
        out.insert("runs".to_string(), json!(inner.stats.runs));
        out.insert("elements_total".to_string(), json!(inner.stats.elements));
        out.insert("chunks_total".to_string(), json!(inner.stats.chunks));
        out.insert(
            "wall_ms_total".to_string(),
            json!(inner.stats.wall.as_millis() as u64),
        );
        out
    }

    /// Print all metrics to stdout in a human-readable format.
    pub fn print(&self) {
        println!("\n========== Reduction Metrics ==========");
        let mut entries: Vec<_> = self.snapshot().into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (name, value) in entries {
            println!("{name}: {value}");
        }
        println!("=======================================\n");
    }

    /// Save all metrics to a JSON file.
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let snapshot = self.snapshot();
        let mut file = File::create(path)?;
        let formatted = serde_json::to_string_pretty(&json!(snapshot))?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
