//! Rule model: YAML shape, compilation, and load-time validation.
//!
//! A rule decides whether an MBean attribute reading becomes a sample and
//! how the sample is named and labeled. Rules are compiled once at
//! configuration load and are immutable afterwards; the evaluation engine
//! walks them in configured order and stops at the first match.
//!
//! # Example Configuration (YAML)
//!
//! ```yaml
//! pattern: "java.lang<type=Memory><>HeapMemoryUsage_(\\w+)"
//! name: "jvm_memory_heap_$1_bytes"
//! type: GAUGE
//! attrNameSnakeCase: true
//! cache: true
//! labels:
//!   area: "heap"
//! ```

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised while compiling or validating rules
#[derive(Error, Debug)]
pub enum RuleError {
    /// Invalid regex pattern
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// Rule validation error
    #[error("Rule validation error: {0}")]
    Validation(String),

    /// Rule compilation failed (with rule index for context)
    #[error("Failed to compile rule at index {index}: {source}")]
    InvalidRule {
        index: usize,
        #[source]
        source: Box<RuleError>,
    },
}

/// Result type for rule operations
pub type RuleResult<T> = Result<T, RuleError>;

/// Prometheus metric type tag carried through to emitted samples.
///
/// The default is `Untyped` when a rule does not specify a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    /// Gauge metric - a value that can go up and down
    Gauge,
    /// Counter metric - a monotonically increasing value
    Counter,
    /// Histogram metric - observations counted in buckets
    Histogram,
    /// Untyped metric - type is not specified
    #[default]
    Untyped,
}

impl MetricType {
    /// Returns the Prometheus type string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
            MetricType::Histogram => "histogram",
            MetricType::Untyped => "untyped",
        }
    }
}

impl Serialize for MetricType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for MetricType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.to_lowercase().as_str() {
            "gauge" => Ok(MetricType::Gauge),
            "counter" => Ok(MetricType::Counter),
            "histogram" => Ok(MetricType::Histogram),
            // UNTYPED predates the OpenMetrics data model; UNKNOWN is its
            // successor. Both map to the default type.
            "untyped" | "unknown" => Ok(MetricType::Untyped),
            other => Err(serde::de::Error::custom(format!(
                "unknown metric type '{}', expected one of: gauge, counter, histogram, untyped",
                other
            ))),
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The YAML shape of a single rule, prior to compilation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    /// Regex matched against the flattened bean name + attribute + value
    /// string. Absent means match-everything.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Sample name template; supports `$1`, `$2`, ... and `$name` capture
    /// references. Absent selects the default export format.
    #[serde(default)]
    pub name: Option<String>,

    /// Literal replacement for the sample value, substituted from captures
    /// and parsed as a number. YAML scalars of any type are accepted.
    #[serde(default)]
    pub value: Option<serde_yaml::Value>,

    /// Factor the sample value is multiplied with (unit conversions)
    #[serde(rename = "valueFactor", default = "default_value_factor")]
    pub value_factor: f64,

    /// Match and export the attribute name in snake_case
    #[serde(rename = "attrNameSnakeCase", default)]
    pub attr_name_snake_case: bool,

    /// Cache the match outcome for this rule across collection cycles
    #[serde(default)]
    pub cache: bool,

    /// Metric type tag
    #[serde(rename = "type", default)]
    pub metric_type: MetricType,

    /// Help text template
    #[serde(default)]
    pub help: Option<String>,

    /// Label name -> label value templates. Sorted by label name so that
    /// repeated runs emit labels in a stable order.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

fn default_value_factor() -> f64 {
    1.0
}

/// A compiled, immutable rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Whole-string pattern; `None` matches everything
    pub pattern: Option<Regex>,
    /// The pattern as configured, for diagnostics
    pub raw_pattern: Option<String>,
    /// Sample name template
    pub name: Option<String>,
    /// Literal value template
    pub value: Option<String>,
    /// Value multiplier
    pub value_factor: f64,
    /// Snake-case the attribute name before matching and exporting
    pub attr_name_snake_case: bool,
    /// Cache-eligibility
    pub cache: bool,
    /// Metric type tag
    pub metric_type: MetricType,
    /// Help template
    pub help: Option<String>,
    /// Label name templates, sorted by name at load time
    pub label_names: Vec<String>,
    /// Label value templates, parallel to `label_names`
    pub label_values: Vec<String>,
}

impl Rule {
    /// Compile and validate a configured rule.
    ///
    /// The user pattern is embedded in `^.*(?:<pattern>).*$` so a rule
    /// matches anywhere in the flattened bean string while the engine can
    /// treat every match as whole-string.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::Validation` when the rule shape is inconsistent
    /// (labels or help without a name, a name without a pattern, a
    /// non-finite value factor) and `RuleError::InvalidPattern` when the
    /// pattern does not compile.
    pub fn compile(config: &RuleConfig) -> RuleResult<Self> {
        if (!config.labels.is_empty() || config.help.is_some()) && config.name.is_none() {
            return Err(RuleError::Validation(
                "Must provide name, if help or labels are given".to_string(),
            ));
        }
        if config.name.is_some() && config.pattern.is_none() {
            return Err(RuleError::Validation(
                "Must provide pattern, if name is given".to_string(),
            ));
        }
        if !config.value_factor.is_finite() {
            return Err(RuleError::Validation(
                "valueFactor must be a finite number".to_string(),
            ));
        }

        let pattern = config
            .pattern
            .as_deref()
            .map(|p| {
                Regex::new(&format!("^.*(?:{}).*$", p)).map_err(|e| RuleError::InvalidPattern {
                    pattern: p.to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()?;

        let (label_names, label_values) = config
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .unzip();

        Ok(Self {
            pattern,
            raw_pattern: config.pattern.clone(),
            name: config.name.clone(),
            value: config.value.as_ref().map(scalar_to_string).transpose()?,
            value_factor: config.value_factor,
            attr_name_snake_case: config.attr_name_snake_case,
            cache: config.cache,
            metric_type: config.metric_type,
            help: config.help.clone(),
            label_names,
            label_values,
        })
    }

    /// Match the rule pattern against a flattened bean string.
    ///
    /// Returns the captures on a match, `None` otherwise. Rules without a
    /// pattern never produce captures; callers treat them as matching
    /// everything.
    pub fn captures<'t>(&self, input: &'t str) -> Option<regex::Captures<'t>> {
        self.pattern.as_ref().and_then(|p| p.captures(input))
    }
}

/// Stringify a YAML scalar the way the rule `value` field expects.
fn scalar_to_string(value: &serde_yaml::Value) -> RuleResult<String> {
    match value {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        other => Err(RuleError::Validation(format!(
            "rule value must be a scalar, got: {:?}",
            other
        ))),
    }
}

/// The ordered, validated rule list of one configuration.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile a rule set from its YAML shape.
    ///
    /// An empty list yields a single default rule (match everything,
    /// default export), mirroring a configuration without a `rules` key.
    pub fn compile(configs: &[RuleConfig]) -> RuleResult<Self> {
        if configs.is_empty() {
            let default_rule =
                Rule::compile(&RuleConfig::default()).expect("default rule always compiles");
            return Ok(Self {
                rules: vec![default_rule],
            });
        }

        let rules = configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                Rule::compile(config).map_err(|e| RuleError::InvalidRule {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<RuleResult<Vec<_>>>()?;

        Ok(Self { rules })
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when the set holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate rules in configured order
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Get a rule by index
    pub fn get(&self, index: usize) -> Option<&Rule> {
        self.rules.get(index)
    }
}

/// Substitute capture references into a template string.
///
/// `$1`, `$2`, ... consume all following digits; `$name` references take a
/// letter followed by alphanumerics, deliberately excluding underscores so
/// that templates like `$type_$attr` split into two references. Unknown
/// groups substitute as the empty string; a `$` not followed by a
/// reference stays literal.
pub(crate) fn substitute_captures(template: &str, captures: &regex::Captures<'_>) -> String {
    let mut result = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }
        match chars.peek() {
            Some(&first) if first.is_ascii_digit() => {
                let mut group_num = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_digit() {
                        group_num.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Ok(index) = group_num.parse::<usize>() {
                    if let Some(m) = captures.get(index) {
                        result.push_str(m.as_str());
                    }
                }
            }
            Some(&first) if first.is_alphabetic() => {
                let mut group_name = String::new();
                while let Some(&next) = chars.peek() {
                    if next.is_alphanumeric() {
                        group_name.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if let Some(m) = captures.name(&group_name) {
                    result.push_str(m.as_str());
                }
            }
            _ => {
                result.push('$');
            }
        }
    }

    result
}
