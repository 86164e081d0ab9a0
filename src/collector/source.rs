//! The producer boundary: bean identity, raw attribute values, and the
//! trait a protocol client implements to feed readings into a cycle.
//!
//! The collector core never talks to a remote JVM itself. Whatever
//! enumerates beans and reads attributes (an RMI client, an HTTP agent, a
//! test fixture) implements [`MBeanSource`] and is driven once per
//! collection cycle.

use std::fmt;

use thiserror::Error;

use crate::collector::properties::MBeanPropertyCache;
use crate::config::Configuration;
use crate::transformer::engine::SampleReceiver;

/// Error for object name strings that do not follow `domain:key=value,...`
#[derive(Error, Debug)]
#[error("Invalid ObjectName: {0}")]
pub struct ObjectNameError(pub String);

/// A bean identifier: a domain and its raw key-property-list string.
///
/// The property list is kept unparsed here; the insertion-ordered
/// decomposition is memoized by [`MBeanPropertyCache`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectName {
    domain: String,
    key_property_list: String,
}

impl ObjectName {
    /// Parse an object name string, splitting at the first `:`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectNameError`] when the separator is missing or the
    /// domain is empty.
    pub fn parse(s: &str) -> Result<Self, ObjectNameError> {
        let (domain, key_property_list) = s
            .split_once(':')
            .ok_or_else(|| ObjectNameError(s.to_string()))?;
        if domain.is_empty() {
            return Err(ObjectNameError(s.to_string()));
        }
        Ok(Self {
            domain: domain.to_string(),
            key_property_list: key_property_list.to_string(),
        })
    }

    /// The bean domain, e.g. `java.lang`
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The raw key-property-list, e.g. `type=Memory`
    pub fn key_property_list(&self) -> &str {
        &self.key_property_list
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.domain, self.key_property_list)
    }
}

/// A raw attribute value as reported by the producer.
///
/// Only numbers and booleans can become sample values; other variants are
/// dropped by the engine unless the matching rule supplies a literal
/// value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Integral value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value, coerced to 1.0 / 0.0
    Boolean(bool),
    /// String value; never coerced
    String(String),
    /// Absent value
    Null,
}

impl AttributeValue {
    /// Coerce into a sample value: numbers as-is, booleans as 1.0/0.0,
    /// everything else `None`.
    pub fn as_sample_value(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            AttributeValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            AttributeValue::String(_) | AttributeValue::Null => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Float(v) => write!(f, "{}", v),
            AttributeValue::Boolean(b) => write!(f, "{}", b),
            AttributeValue::String(s) => write!(f, "{}", s),
            AttributeValue::Null => write!(f, "null"),
        }
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Float(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Boolean(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        AttributeValue::String(v.to_string())
    }
}

/// A producer of attribute readings, driven once per collection cycle.
///
/// Implementations are expected to:
/// - consult [`Configuration::accepts`] when enumerating beans so the
///   include/exclude filters take effect,
/// - resolve bean identity through `properties` (and call
///   [`MBeanPropertyCache::only_keep`] with the live bean set so stale
///   identities are pruned),
/// - call [`SampleReceiver::record_bean`] once per discovered attribute.
///
/// A returned error aborts the cycle; the collector records it on the
/// error gauge and produces no samples for the cycle.
pub trait MBeanSource: Send + Sync {
    /// Feed one cycle worth of readings into the receiver.
    fn scrape(
        &self,
        configuration: &Configuration,
        properties: &MBeanPropertyCache,
        receiver: &mut SampleReceiver<'_>,
    ) -> anyhow::Result<()>;
}
