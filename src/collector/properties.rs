//! Memoized decomposition of bean key-property-lists.
//!
//! Parsing `k1=v1,k2=v2,...` with quoting rules is regex work we do not
//! want to repeat for every bean on every scrape, so the insertion-ordered
//! result is cached per [`ObjectName`] until the bean disappears.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;

use super::source::ObjectName;

/// One `key=value` pair. Name: anything but comma, equals, colon, star or
/// question mark. Value: double-quoted with backslash escapes, or an
/// unquoted run without comma, equals, colon or quote (may be empty).
static PROPERTY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^([^,=:*?]+)=("(?:[^\\"]*(?:\\.)?)*"|[^,=:"]*)"#)
        .expect("property pattern is valid")
});

/// Insertion-ordered key properties of one bean.
pub type KeyProperties = Vec<(String, String)>;

/// Cache of [`ObjectName`] to parsed key properties.
///
/// Concurrent-safe: overlapping scrape cycles may look up and insert
/// simultaneously. A race recomputes the same entry, which is harmless.
#[derive(Debug, Default)]
pub struct MBeanPropertyCache {
    entries: DashMap<ObjectName, Arc<KeyProperties>>,
}

impl MBeanPropertyCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the key properties for a bean, parsing and caching on first
    /// sight.
    pub fn key_properties(&self, object_name: &ObjectName) -> Arc<KeyProperties> {
        if let Some(entry) = self.entries.get(object_name) {
            return entry.value().clone();
        }
        let parsed = Arc::new(parse_key_properties(object_name.key_property_list()));
        self.entries
            .entry(object_name.clone())
            .or_insert(parsed)
            .value()
            .clone()
    }

    /// Drop every cached bean not present in the live set. Called once per
    /// cycle by the producer.
    pub fn only_keep(&self, live: &HashSet<ObjectName>) {
        self.entries.retain(|object_name, _| live.contains(object_name));
    }

    /// Number of cached beans.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Tolerant parse of a key-property-list string.
///
/// Parsing stops cleanly at the first segment that does not look like
/// `key=value`; whatever was parsed up to that point is returned. Quoted
/// values keep their quotes, matching how the original exporter exposes
/// them.
fn parse_key_properties(list: &str) -> KeyProperties {
    let mut properties = Vec::new();
    let mut rest = list;
    while let Some(caps) = PROPERTY_PATTERN.captures(rest) {
        properties.push((caps[1].to_string(), caps[2].to_string()));
        let end = caps.get(0).map(|m| m.end()).unwrap_or(rest.len());
        rest = &rest[end..];
        rest = rest.strip_prefix(',').unwrap_or(rest);
    }
    properties
}
