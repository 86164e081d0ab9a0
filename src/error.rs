//! Cycle-level error types.
//!
//! Most failure modes never surface here: per-attribute problems drop the
//! single reading inside the engine, producer failures are absorbed at
//! the cycle boundary and recorded on the error gauge. What remains is
//! the one condition a caller of `collect()` must handle itself.

use thiserror::Error;

/// Errors returned by `Collector::collect`
#[derive(Error, Debug)]
pub enum CollectError {
    /// The configured start delay has not elapsed yet; no collection was
    /// attempted.
    #[error("Collector waiting for startDelaySeconds")]
    StartupDelay,
}
