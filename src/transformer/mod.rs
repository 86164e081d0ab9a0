//! Rule-driven transformation of MBean attribute readings into samples.
//!
//! The submodules cover the full path from configured rule to emitted
//! sample: rule compilation ([`rules`]), name hygiene ([`naming`]), match
//! outcome caching ([`cache`]), and the per-cycle evaluation engine
//! ([`engine`]).

pub mod cache;
pub mod engine;
pub mod naming;
pub mod rules;

pub use cache::{CachedOutcome, MatchedRulesCache, StalenessTracker};
pub use engine::{MatchedRule, Sample, SampleReceiver};
pub use rules::{MetricType, Rule, RuleConfig, RuleError, RuleSet};
