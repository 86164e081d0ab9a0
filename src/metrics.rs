//! Self-observability instruments for the collector.
//!
//! # Metrics
//!
//! - `jmx_config_reload_success_total` - Counter of successful config reloads
//! - `jmx_config_reload_failure_total` - Counter of failed config reloads
//! - `jmx_scrape_duration_seconds` - Gauge, duration of the last cycle
//! - `jmx_scrape_error` - Gauge, non-zero if the last cycle failed
//! - `jmx_scrape_cached_beans` - Gauge, cached match outcomes after the
//!   last cycle

use std::sync::atomic::{AtomicU64, Ordering};

use crate::transformer::engine::Sample;
use crate::transformer::rules::MetricType;

/// Thread-safe counter using atomic operations
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter initialized to 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the counter by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Thread-safe gauge using atomic operations
#[derive(Debug, Default)]
pub struct Gauge {
    /// Stored as bits of f64 for atomic operations
    value: AtomicU64,
}

impl Gauge {
    /// Create a new gauge initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0.0_f64.to_bits()),
        }
    }

    /// Set the gauge to a specific value
    pub fn set(&self, v: f64) {
        self.value.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> f64 {
        f64::from_bits(self.value.load(Ordering::Relaxed))
    }
}

/// The collector's own counters and gauges, updated once per cycle.
#[derive(Debug, Default)]
pub struct CollectorMetrics {
    /// Number of successful configuration reloads
    pub config_reload_success: Counter,
    /// Number of failed configuration reloads
    pub config_reload_failure: Counter,
    /// Duration of the last collection cycle, in seconds
    pub scrape_duration_seconds: Gauge,
    /// 1.0 when the last cycle failed, else 0.0
    pub scrape_error: Gauge,
    /// Cached match outcomes observed in the last cycle
    pub scrape_cached_beans: Gauge,
}

impl CollectorMetrics {
    /// Create a fresh instrument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the instruments as samples, so the serving collaborator can
    /// append them to collector output.
    pub fn samples(&self) -> Vec<Sample> {
        fn sample(name: &str, metric_type: MetricType, help: &str, value: f64) -> Sample {
            Sample {
                name: name.to_string(),
                metric_type,
                help: help.to_string(),
                label_names: Vec::new(),
                label_values: Vec::new(),
                value,
            }
        }

        vec![
            sample(
                "jmx_config_reload_success_total",
                MetricType::Counter,
                "Number of times configuration have successfully been reloaded.",
                self.config_reload_success.get() as f64,
            ),
            sample(
                "jmx_config_reload_failure_total",
                MetricType::Counter,
                "Number of times configuration have failed to be reloaded.",
                self.config_reload_failure.get() as f64,
            ),
            sample(
                "jmx_scrape_duration_seconds",
                MetricType::Gauge,
                "Time this JMX scrape took, in seconds.",
                self.scrape_duration_seconds.get(),
            ),
            sample(
                "jmx_scrape_error",
                MetricType::Gauge,
                "Non-zero if this scrape failed.",
                self.scrape_error.get(),
            ),
            sample(
                "jmx_scrape_cached_beans",
                MetricType::Gauge,
                "Number of beans with their matching rule cached",
                self.scrape_cached_beans.get(),
            ),
        ]
    }
}
