//! mbean-collector library
//!
//! This crate provides the collector core of a JMX exporter: it turns
//! MBean attribute readings into Prometheus-style samples, driven by an
//! ordered list of user-configured pattern/template rules, with match
//! caching across collection cycles and hot-reloadable configuration.
//!
//! The protocol client that reaches the monitored JVM and the HTTP
//! surface that serves the samples are external collaborators; see
//! [`collector::source::MBeanSource`] and [`collector::Collector`] for
//! the two boundaries.

pub mod collector;
pub mod config;
pub mod error;
pub mod metrics;
pub mod transformer;

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging subsystem
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
///
/// # Errors
/// Returns an error if the logging system fails to initialize
pub fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
