//! Collection cycle orchestration and configuration hot reload.
//!
//! [`Collector`] owns the atomically-swappable active [`Configuration`],
//! the bean identity cache shared across cycles, and the self-metrics.
//! Every `collect()` call re-checks the backing file, runs the producer
//! against a fresh [`SampleReceiver`], and finishes the cycle with
//! staleness eviction and gauge updates. Cycles may run concurrently; the
//! only serialization point is the short reload lock.

pub mod properties;
pub mod source;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, error, info};

use crate::config::{ConfigError, Configuration};
use crate::error::CollectError;
use crate::metrics::CollectorMetrics;
use crate::transformer::engine::{Sample, SampleReceiver};

use properties::MBeanPropertyCache;
use source::MBeanSource;

/// The collector: configuration manager plus cycle driver.
pub struct Collector {
    source: Box<dyn MBeanSource>,
    config_path: Option<PathBuf>,
    active: ArcSwap<Configuration>,
    reload_lock: Mutex<()>,
    property_cache: MBeanPropertyCache,
    metrics: CollectorMetrics,
    started_at: Instant,
}

impl Collector {
    /// Create a collector over a fixed configuration (no reload source).
    pub fn new(source: Box<dyn MBeanSource>, configuration: Configuration) -> Self {
        Self {
            source,
            config_path: None,
            active: ArcSwap::from_pointee(configuration),
            reload_lock: Mutex::new(()),
            property_cache: MBeanPropertyCache::new(),
            metrics: CollectorMetrics::new(),
            started_at: Instant::now(),
        }
    }

    /// Create a collector backed by a configuration file. The file is
    /// re-checked on every collection and hot-reloaded when it changes.
    ///
    /// # Errors
    ///
    /// The initial load is fatal: a broken file means no collector.
    pub fn from_file(
        source: Box<dyn MBeanSource>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        let configuration = Configuration::load(&path)?;
        let mut collector = Self::new(source, configuration);
        collector.config_path = Some(path);
        Ok(collector)
    }

    /// The collector's self-metrics.
    pub fn metrics(&self) -> &CollectorMetrics {
        &self.metrics
    }

    /// The bean identity cache shared across cycles.
    pub fn property_cache(&self) -> &MBeanPropertyCache {
        &self.property_cache
    }

    /// The currently active configuration, reloading first when the
    /// backing file changed.
    pub fn configuration(&self) -> Arc<Configuration> {
        self.latest_configuration()
    }

    /// Check the backing file and swap in a fresh configuration when it
    /// is newer than the active one. Reload failure keeps the previous
    /// configuration; it is never fatal.
    fn latest_configuration(&self) -> Arc<Configuration> {
        if let Some(path) = &self.config_path {
            let _guard = self.reload_lock.lock();
            let active = self.active.load_full();
            let modified = std::fs::metadata(path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            if modified > active.last_update() {
                debug!(path = %path.display(), "Configuration file changed, reloading");
                match Configuration::load(path) {
                    Ok(fresh) => {
                        self.active.store(Arc::new(fresh));
                        self.metrics.config_reload_success.inc();
                        info!(path = %path.display(), "Configuration reloaded");
                    }
                    Err(e) => {
                        self.metrics.config_reload_failure.inc();
                        error!(
                            error = %e,
                            "Configuration reload failed, keeping previous configuration"
                        );
                    }
                }
            }
        }
        self.active.load_full()
    }

    /// Run one collection cycle.
    ///
    /// A producer failure is absorbed here: the error gauge goes to 1,
    /// the cycle yields no samples, and the collector stays usable.
    ///
    /// # Errors
    ///
    /// Fails only while the configured start delay has not elapsed.
    pub fn collect(&self) -> Result<Vec<Sample>, CollectError> {
        // Pin the configuration for the whole cycle; a concurrent reload
        // must not switch rule sets mid-scrape.
        let configuration = self.latest_configuration();
        let start = Instant::now();

        if !configuration.start_delay.is_zero()
            && self.started_at.elapsed() < configuration.start_delay
        {
            self.metrics.scrape_error.set(1.0);
            return Err(CollectError::StartupDelay);
        }

        let mut receiver = SampleReceiver::new(&configuration);
        let scrape_result = self
            .source
            .scrape(&configuration, &self.property_cache, &mut receiver);
        let (samples, staleness) = receiver.finish();

        let (samples, error_flag) = match scrape_result {
            Ok(()) => (samples, 0.0),
            Err(e) => {
                error!(error = %e, "JMX scrape failed");
                (Vec::new(), 1.0)
            }
        };

        configuration.rules_cache().evict_stale(&staleness);

        self.metrics
            .scrape_duration_seconds
            .set(start.elapsed().as_secs_f64());
        self.metrics.scrape_error.set(error_flag);
        self.metrics
            .scrape_cached_beans
            .set(staleness.cached_count() as f64);

        Ok(samples)
    }
}
