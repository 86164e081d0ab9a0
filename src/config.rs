//! Configuration loading and the immutable runtime configuration.
//!
//! A [`Configuration`] is built from YAML, validated as a whole, and never
//! mutated afterwards; reloading produces a brand-new instance with a
//! fresh rule set and a fresh match cache. The collector swaps whole
//! instances atomically, so a half-built configuration is never visible.

use std::path::Path;
use std::time::{Duration, SystemTime};

use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::collector::source::{ObjectName, ObjectNameError};
use crate::transformer::cache::MatchedRulesCache;
use crate::transformer::rules::{RuleConfig, RuleError, RuleSet};

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading the configuration file
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    /// Error parsing the configuration file
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Invalid configuration: {0}")]
    Validation(String),

    /// Rule compilation or validation error
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// An include/exclude filter entry that is not a valid object name
    #[error("Invalid object name filter '{entry}': {source}")]
    Filter {
        entry: String,
        #[source]
        source: ObjectNameError,
    },
}

/// The YAML shape of the configuration file.
///
/// `whitelistObjectNames` and `blacklistObjectNames` are accepted as
/// legacy spellings of the include/exclude keys.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigModel {
    #[serde(rename = "startDelaySeconds", default)]
    start_delay_seconds: u64,

    #[serde(rename = "hostPort", default)]
    host_port: Option<String>,

    #[serde(rename = "jmxUrl", default)]
    jmx_url: Option<String>,

    #[serde(default)]
    username: Option<String>,

    #[serde(default)]
    password: Option<String>,

    #[serde(default)]
    ssl: bool,

    #[serde(rename = "lowercaseOutputName", default)]
    lowercase_output_name: bool,

    #[serde(rename = "lowercaseOutputLabelNames", default)]
    lowercase_output_label_names: bool,

    #[serde(
        rename = "includeObjectNames",
        alias = "whitelistObjectNames",
        default
    )]
    include_object_names: Option<Vec<String>>,

    #[serde(
        rename = "excludeObjectNames",
        alias = "blacklistObjectNames",
        default
    )]
    exclude_object_names: Vec<String>,

    #[serde(default)]
    rules: Vec<RuleConfig>,
}

/// An object name pattern used by the include/exclude filters.
///
/// Supports `*` and `?` wildcards in the domain and in property values,
/// and a trailing `,*` entry allowing additional properties beyond the
/// ones listed.
#[derive(Debug, Clone)]
pub struct ObjectNamePattern {
    raw: String,
    domain: Regex,
    properties: Vec<(String, Regex)>,
    match_any_properties: bool,
    allow_extra_properties: bool,
}

impl ObjectNamePattern {
    /// Parse a filter entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Filter`] for entries that are not valid
    /// object name patterns.
    pub fn parse(entry: &str) -> Result<Self, ConfigError> {
        let filter_error = |message: String| ConfigError::Filter {
            entry: entry.to_string(),
            source: ObjectNameError(message),
        };

        let name = ObjectName::parse(entry).map_err(|source| ConfigError::Filter {
            entry: entry.to_string(),
            source,
        })?;

        let list = name.key_property_list();
        let mut properties = Vec::new();
        let mut allow_extra_properties = false;
        let match_any_properties = list.is_empty() || list == "*";

        if !match_any_properties {
            for segment in list.split(',') {
                if segment == "*" {
                    allow_extra_properties = true;
                    continue;
                }
                let (key, value) = segment
                    .split_once('=')
                    .ok_or_else(|| filter_error(format!("malformed property '{}'", segment)))?;
                if key.is_empty() {
                    return Err(filter_error(format!("empty property key in '{}'", segment)));
                }
                properties.push((key.to_string(), wildcard_regex(value)));
            }
        }

        Ok(Self {
            raw: entry.to_string(),
            domain: wildcard_regex(name.domain()),
            properties,
            match_any_properties,
            allow_extra_properties,
        })
    }

    /// The pattern as configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when the candidate bean matches this pattern.
    pub fn matches(&self, candidate: &ObjectName) -> bool {
        if !self.domain.is_match(candidate.domain()) {
            return false;
        }
        if self.match_any_properties {
            return true;
        }

        let candidate_properties: Vec<(&str, &str)> = candidate
            .key_property_list()
            .split(',')
            .filter_map(|segment| segment.split_once('='))
            .collect();

        for (key, value_pattern) in &self.properties {
            let matched = candidate_properties
                .iter()
                .any(|(k, v)| k == key && value_pattern.is_match(v));
            if !matched {
                return false;
            }
        }

        self.allow_extra_properties || candidate_properties.len() == self.properties.len()
    }
}

/// Translate a `*`/`?` wildcard expression into an anchored regex.
fn wildcard_regex(expression: &str) -> Regex {
    let mut pattern = String::with_capacity(expression.len() + 8);
    pattern.push('^');
    for c in expression.chars() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    Regex::new(&pattern).expect("escaped wildcard pattern compiles")
}

/// The immutable runtime configuration of one load.
#[derive(Debug)]
pub struct Configuration {
    /// Connection target for the producer; opaque to the core
    pub jmx_url: String,
    /// Credential for the producer; opaque to the core
    pub username: Option<String>,
    /// Credential for the producer; opaque to the core
    pub password: Option<String>,
    /// TLS flag for the producer; opaque to the core
    pub ssl: bool,
    /// Collections fail until this much time has passed since start
    pub start_delay: Duration,
    /// Lowercase emitted sample names
    pub lowercase_output_name: bool,
    /// Lowercase emitted label names
    pub lowercase_output_label_names: bool,

    /// Include filters; `None` entries match every bean
    include_object_names: Vec<Option<ObjectNamePattern>>,
    /// Exclude filters; empty means exclude nothing
    exclude_object_names: Vec<ObjectNamePattern>,
    rules: RuleSet,
    rules_cache: MatchedRulesCache,
    pub(crate) last_update: SystemTime,
}

impl Configuration {
    /// Build a configuration from YAML text.
    ///
    /// An empty document yields the default configuration: match-all
    /// include filter, no excludes, a single default-export rule.
    ///
    /// # Errors
    ///
    /// Any parse or validation failure fails the whole load; nothing of a
    /// partially-built configuration escapes.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let model: ConfigModel =
            serde_yaml::from_str::<Option<ConfigModel>>(yaml)?.unwrap_or_default();
        Self::from_model(model)
    }

    /// Load a configuration file; the load timestamp is taken from the
    /// file's modification time so the collector can detect later edits.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut configuration = Self::from_yaml(&contents)?;
        configuration.last_update = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(configuration)
    }

    fn from_model(model: ConfigModel) -> Result<Self, ConfigError> {
        let jmx_url = match (&model.host_port, &model.jmx_url) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::Validation(
                    "At most one of hostPort and jmxUrl must be provided".to_string(),
                ));
            }
            (Some(host_port), None) => {
                format!("service:jmx:rmi:///jndi/rmi://{}/jmxrmi", host_port)
            }
            (None, Some(url)) => url.clone(),
            (None, None) => String::new(),
        };

        // Absent include list means one match-all entry.
        let include_object_names = match &model.include_object_names {
            None => vec![None],
            Some(entries) => entries
                .iter()
                .map(|entry| ObjectNamePattern::parse(entry).map(Some))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let exclude_object_names = model
            .exclude_object_names
            .iter()
            .map(|entry| ObjectNamePattern::parse(entry))
            .collect::<Result<Vec<_>, _>>()?;

        let rules = RuleSet::compile(&model.rules)?;
        let rules_cache = MatchedRulesCache::new(rules.len());

        Ok(Self {
            jmx_url,
            username: model.username,
            password: model.password,
            ssl: model.ssl,
            start_delay: Duration::from_secs(model.start_delay_seconds),
            lowercase_output_name: model.lowercase_output_name,
            lowercase_output_label_names: model.lowercase_output_label_names,
            include_object_names,
            exclude_object_names,
            rules,
            rules_cache,
            last_update: SystemTime::UNIX_EPOCH,
        })
    }

    /// The compiled rule set.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The match cache scoped to this configuration instance.
    pub fn rules_cache(&self) -> &MatchedRulesCache {
        &self.rules_cache
    }

    /// Include filters, in configured order.
    pub fn include_object_names(&self) -> &[Option<ObjectNamePattern>] {
        &self.include_object_names
    }

    /// Exclude filters, in configured order.
    pub fn exclude_object_names(&self) -> &[ObjectNamePattern] {
        &self.exclude_object_names
    }

    /// True when the bean passes the include/exclude filters. Producers
    /// consult this while enumerating beans.
    pub fn accepts(&self, candidate: &ObjectName) -> bool {
        let included = self
            .include_object_names
            .iter()
            .any(|entry| entry.as_ref().map_or(true, |p| p.matches(candidate)));
        if !included {
            return false;
        }
        !self
            .exclude_object_names
            .iter()
            .any(|pattern| pattern.matches(candidate))
    }

    /// When this configuration was loaded.
    pub fn last_update(&self) -> SystemTime {
        self.last_update
    }
}
