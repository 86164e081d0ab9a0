//! Rule evaluation: turning one attribute reading into at most one sample.
//!
//! A [`SampleReceiver`] is created fresh for every collection cycle. The
//! producer feeds it one `record_bean` call per discovered attribute; the
//! receiver walks the configured rules in order, consults the match cache,
//! and collects the resulting samples together with the staleness record
//! for cycle-end eviction.

use std::borrow::Cow;
use std::sync::Arc;

use tracing::debug;

use crate::collector::source::AttributeValue;
use crate::config::Configuration;
use crate::transformer::cache::{CachedOutcome, StalenessTracker};
use crate::transformer::naming::{safe_name, snake_and_lower_case};
use crate::transformer::rules::{substitute_captures, MetricType, Rule};

/// Sentinel standing in for the live value in cache keys of cache-eligible
/// rules. A cached rule must not let distinct values produce distinct
/// cache entries.
const CACHE_VALUE_TOKEN: &str = "<cache>";

const SEP: char = '_';

/// One emitted metric sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Sanitized sample name
    pub name: String,
    /// Metric type tag
    pub metric_type: MetricType,
    /// Help text
    pub help: String,
    /// Label names, parallel to `label_values`
    pub label_names: Vec<String>,
    /// Label values
    pub label_values: Vec<String>,
    /// Numeric value
    pub value: f64,
}

/// The resolved shape of a rule match, cacheable across cycles.
#[derive(Debug, Clone)]
pub struct MatchedRule {
    /// Resolved sample name
    pub name: String,
    /// The cache key this outcome was computed for
    pub match_name: String,
    /// Metric type tag
    pub metric_type: MetricType,
    /// Resolved help text
    pub help: String,
    /// Resolved label names
    pub label_names: Vec<String>,
    /// Resolved label values
    pub label_values: Vec<String>,
    /// Literal value override from the rule's value template
    pub value: Option<f64>,
    /// Value multiplier
    pub value_factor: f64,
}

/// Outcome of walking the rule list for one reading.
enum RuleOutcome {
    /// A rule matched and resolved into a sample shape
    Matched(Arc<MatchedRule>),
    /// No rule matched; the reading produces nothing
    Unmatched,
    /// The reading is abandoned (unparsable computed value, empty
    /// computed name); not an error
    Dropped,
}

/// Per-cycle rule evaluation engine and sample sink.
pub struct SampleReceiver<'a> {
    configuration: &'a Configuration,
    staleness: StalenessTracker,
    samples: Vec<Sample>,
}

impl<'a> SampleReceiver<'a> {
    /// Create a receiver for one cycle against the given configuration.
    pub fn new(configuration: &'a Configuration) -> Self {
        Self {
            configuration,
            staleness: StalenessTracker::new(),
            samples: Vec::new(),
        }
    }

    /// Samples collected so far.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Consume the receiver, yielding the cycle's samples and the
    /// staleness record for eviction.
    pub fn finish(self) -> (Vec<Sample>, StalenessTracker) {
        (self.samples, self.staleness)
    }

    /// Record one attribute reading.
    ///
    /// `bean_properties` is the bean's insertion-ordered identity
    /// property list, `attr_keys` the composite path leading to
    /// `attr_name`. At most one sample is appended; readings that match
    /// no rule, fail value parsing, resolve to an empty name, or carry an
    /// unsupported value type are dropped silently.
    #[allow(clippy::too_many_arguments)]
    pub fn record_bean(
        &mut self,
        domain: &str,
        bean_properties: &[(String, String)],
        attr_keys: &[String],
        attr_name: &str,
        attr_type: &str,
        attr_description: &str,
        value: &AttributeValue,
    ) {
        let bean_name = format!(
            "{}<{}><{}>",
            domain,
            join_properties(bean_properties),
            attr_keys.join(", ")
        );

        let help = default_help(domain, bean_properties, attr_name, attr_description);

        let outcome = self.match_rules(
            &bean_name,
            bean_properties,
            attr_keys,
            attr_name,
            domain,
            &help,
            value,
        );
        let matched_rule = match outcome {
            RuleOutcome::Matched(matched) => matched,
            RuleOutcome::Unmatched | RuleOutcome::Dropped => return,
        };

        // A literal value from the rule overrides the reading; either way
        // the multiplier applies.
        let resolved = match matched_rule.value {
            Some(literal) => literal,
            None => match value.as_sample_value() {
                Some(v) => v,
                None => {
                    debug!(
                        bean = %bean_name,
                        attribute = %attr_name,
                        attribute_type = %attr_type,
                        value = %value,
                        "Ignoring unsupported bean value"
                    );
                    return;
                }
            },
        };

        self.samples.push(Sample {
            name: matched_rule.name.clone(),
            metric_type: matched_rule.metric_type,
            help: matched_rule.help.clone(),
            label_names: matched_rule.label_names.clone(),
            label_values: matched_rule.label_values.clone(),
            value: resolved * matched_rule.value_factor,
        });
    }

    /// Walk the rule list in configured order; first match wins.
    #[allow(clippy::too_many_arguments)]
    fn match_rules(
        &mut self,
        bean_name: &str,
        bean_properties: &[(String, String)],
        attr_keys: &[String],
        attr_name: &str,
        domain: &str,
        default_help: &str,
        value: &AttributeValue,
    ) -> RuleOutcome {
        let configuration = self.configuration;
        for (rule_index, rule) in configuration.rules().iter().enumerate() {
            // A cache-eligible rule keys its outcome on a fixed token
            // instead of the live value; caching per distinct value would
            // pin the first-seen value forever.
            let match_value: Cow<'_, str> = if rule.cache {
                Cow::Borrowed(CACHE_VALUE_TOKEN)
            } else {
                Cow::Owned(value.to_string())
            };

            let attribute_name: Cow<'_, str> = if rule.attr_name_snake_case {
                Cow::Owned(snake_and_lower_case(attr_name))
            } else {
                Cow::Borrowed(attr_name)
            };

            let match_name = format!("{}{}: {}", bean_name, attribute_name, match_value);

            if rule.cache {
                if let Some(cached) = configuration.rules_cache().get(rule_index, &match_name) {
                    self.staleness.add(rule_index, &match_name);
                    match cached {
                        CachedOutcome::Matched(matched) => return RuleOutcome::Matched(matched),
                        // Cached as not matching this rule; move on
                        // without re-running the pattern.
                        CachedOutcome::Unmatched => continue,
                    }
                }
            }

            let captures = if rule.pattern.is_some() {
                match rule.captures(&match_name) {
                    Some(captures) => Some(captures),
                    None => {
                        self.add_to_cache(rule_index, rule, &match_name, CachedOutcome::Unmatched);
                        continue;
                    }
                }
            } else {
                None
            };

            let mut literal_value = None;
            if let Some(template) = rule.value.as_deref().filter(|t| !t.is_empty()) {
                let rendered = match &captures {
                    Some(captures) => substitute_captures(template, captures),
                    None => template.to_string(),
                };
                match rendered.parse::<f64>() {
                    Ok(v) => literal_value = Some(v),
                    Err(_) => {
                        debug!(
                            value = %rendered,
                            bean = %bean_name,
                            attribute = %attr_name,
                            "Unable to parse configured value to number"
                        );
                        return RuleOutcome::Dropped;
                    }
                }
            }

            // No name template: default export format.
            if rule.name.is_none() {
                let matched = Arc::new(self.default_export(
                    &match_name,
                    domain,
                    bean_properties,
                    attr_keys,
                    &attribute_name,
                    default_help,
                    literal_value,
                    rule,
                ));
                self.add_to_cache(
                    rule_index,
                    rule,
                    &match_name,
                    CachedOutcome::Matched(matched.clone()),
                );
                return RuleOutcome::Matched(matched);
            }

            // Load-time validation guarantees a pattern whenever a name
            // template exists, so captures are present here.
            let captures = captures.expect("rule with name template has a pattern");
            let name_template = rule.name.as_deref().unwrap_or_default();

            let mut name = safe_name(&substitute_captures(name_template, &captures));
            if name.is_empty() {
                return RuleOutcome::Dropped;
            }
            if self.configuration.lowercase_output_name {
                name = name.to_lowercase();
            }

            let help = match rule.help.as_deref() {
                Some(template) => substitute_captures(template, &captures),
                None => default_help.to_string(),
            };

            let mut label_names = Vec::with_capacity(rule.label_names.len());
            let mut label_values = Vec::with_capacity(rule.label_names.len());
            for (name_template, value_template) in
                rule.label_names.iter().zip(rule.label_values.iter())
            {
                let mut label_name = safe_name(&substitute_captures(name_template, &captures));
                let label_value = substitute_captures(value_template, &captures);
                if self.configuration.lowercase_output_label_names {
                    label_name = label_name.to_lowercase();
                }
                if !label_name.is_empty() && !label_value.is_empty() {
                    label_names.push(label_name);
                    label_values.push(label_value);
                }
            }

            let matched = Arc::new(MatchedRule {
                name,
                match_name: match_name.clone(),
                metric_type: rule.metric_type,
                help,
                label_names,
                label_values,
                value: literal_value,
                value_factor: rule.value_factor,
            });
            self.add_to_cache(
                rule_index,
                rule,
                &match_name,
                CachedOutcome::Matched(matched.clone()),
            );
            return RuleOutcome::Matched(matched);
        }

        RuleOutcome::Unmatched
    }

    /// Cache an outcome and tag it as fresh, when the rule allows caching.
    fn add_to_cache(
        &mut self,
        rule_index: usize,
        rule: &Rule,
        cache_key: &str,
        outcome: CachedOutcome,
    ) {
        if rule.cache {
            self.configuration
                .rules_cache()
                .put(rule_index, cache_key, outcome);
            self.staleness.add(rule_index, cache_key);
        }
    }

    /// Default export: `domain_firstPropValue_attrKeys..._attrName`, with
    /// every identity property after the first becoming a label.
    #[allow(clippy::too_many_arguments)]
    fn default_export(
        &self,
        match_name: &str,
        domain: &str,
        bean_properties: &[(String, String)],
        attr_keys: &[String],
        attr_name: &str,
        help: &str,
        value: Option<f64>,
        rule: &Rule,
    ) -> MatchedRule {
        let mut name = String::with_capacity(domain.len() + attr_name.len() + 16);
        name.push_str(domain);
        if let Some((_, first_value)) = bean_properties.first() {
            name.push(SEP);
            name.push_str(first_value);
        }
        for key in attr_keys {
            name.push(SEP);
            name.push_str(key);
        }
        name.push(SEP);
        name.push_str(attr_name);

        let mut full_name = safe_name(&name);
        if self.configuration.lowercase_output_name {
            full_name = full_name.to_lowercase();
        }

        let mut label_names = Vec::new();
        let mut label_values = Vec::new();
        // The first property went into the name; the rest become labels.
        for (key, property_value) in bean_properties.iter().skip(1) {
            let mut label_name = safe_name(key);
            if self.configuration.lowercase_output_label_names {
                label_name = label_name.to_lowercase();
            }
            label_names.push(label_name);
            label_values.push(property_value.clone());
        }

        MatchedRule {
            name: full_name,
            match_name: match_name.to_string(),
            metric_type: rule.metric_type,
            help: help.to_string(),
            label_names,
            label_values,
            value,
            value_factor: rule.value_factor,
        }
    }
}

fn join_properties(properties: &[(String, String)]) -> String {
    properties
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Help text from bean metadata, prefixed with the attribute description
/// when it adds information beyond the attribute name.
fn default_help(
    domain: &str,
    bean_properties: &[(String, String)],
    attr_name: &str,
    attr_description: &str,
) -> String {
    let property = |key: &str| {
        bean_properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or("null")
    };

    let help = format!(
        "{}:name={},type={},attribute={}",
        domain,
        property("name"),
        property("type"),
        attr_name
    );

    if !attr_description.is_empty() && attr_description != attr_name {
        format!("{} {}", attr_description, help)
    } else {
        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;

    fn configuration(yaml: &str) -> Configuration {
        Configuration::from_yaml(yaml).unwrap()
    }

    fn memory_properties() -> Vec<(String, String)> {
        vec![("type".to_string(), "Memory".to_string())]
    }

    fn record_heap_used(receiver: &mut SampleReceiver<'_>, value: i64) {
        receiver.record_bean(
            "java.lang",
            &memory_properties(),
            &[],
            "HeapMemoryUsage.used",
            "long",
            "",
            &AttributeValue::Integer(value),
        );
    }

    // ==========================================================================
    // Default export
    // ==========================================================================

    #[test]
    fn test_default_export_name_and_value() {
        let config = configuration("rules:\n  - pattern: Memory");
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 123456);

        let samples = receiver.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "java_lang_Memory_HeapMemoryUsage_used");
        assert_eq!(samples[0].value, 123456.0);
        assert!(samples[0].label_names.is_empty());
    }

    #[test]
    fn test_default_export_extra_properties_become_labels() {
        let config = configuration("rules:\n  - pattern: GarbageCollector");
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "java.lang",
            &[
                ("type".to_string(), "GarbageCollector".to_string()),
                ("name".to_string(), "G1 Young Generation".to_string()),
            ],
            &[],
            "CollectionCount",
            "long",
            "",
            &AttributeValue::Integer(7),
        );

        let samples = receiver.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(
            samples[0].name,
            "java_lang_GarbageCollector_CollectionCount"
        );
        assert_eq!(samples[0].label_names, vec!["name"]);
        assert_eq!(samples[0].label_values, vec!["G1 Young Generation"]);
    }

    #[test]
    fn test_default_help_includes_bean_metadata() {
        let config = configuration("rules:\n  - pattern: Memory");
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 1);

        assert_eq!(
            receiver.samples()[0].help,
            "java.lang:name=null,type=Memory,attribute=HeapMemoryUsage.used"
        );
    }

    #[test]
    fn test_description_prefixes_help_when_different() {
        let config = configuration("rules:\n  - pattern: Memory");
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "java.lang",
            &memory_properties(),
            &[],
            "HeapMemoryUsage.used",
            "long",
            "Used heap",
            &AttributeValue::Integer(1),
        );

        assert!(receiver.samples()[0]
            .help
            .starts_with("Used heap java.lang:"));
    }

    // ==========================================================================
    // Name, help and label templates
    // ==========================================================================

    #[test]
    fn test_name_template_substitution() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage.(\\w+)"
    name: jvm_memory_heap_$1_bytes
    type: GAUGE
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        let samples = receiver.samples();
        assert_eq!(samples[0].name, "jvm_memory_heap_used_bytes");
        assert_eq!(samples[0].metric_type, MetricType::Gauge);
    }

    #[test]
    fn test_help_and_label_templates() {
        let config = configuration(
            r#"
rules:
  - pattern: "type=(\\w+)[^:]*HeapMemoryUsage.(\\w+)"
    name: jvm_memory_$2
    help: "Heap $2 of $1"
    labels:
      area: heap
      kind: $2
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        let samples = receiver.samples();
        assert_eq!(samples[0].name, "jvm_memory_used");
        assert_eq!(samples[0].help, "Heap used of Memory");
        assert_eq!(samples[0].label_names, vec!["area", "kind"]);
        assert_eq!(samples[0].label_values, vec!["heap", "used"]);
    }

    #[test]
    fn test_empty_label_value_is_skipped() {
        let config = configuration(
            r#"
rules:
  - pattern: "(zzz)?HeapMemoryUsage"
    name: jvm_memory
    labels:
      gone: $1
      kept: "yes"
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        let samples = receiver.samples();
        assert_eq!(samples[0].label_names, vec!["kept"]);
    }

    #[test]
    fn test_empty_resolved_name_drops_reading() {
        let config = configuration(
            r#"
rules:
  - pattern: "(zzz)?HeapMemoryUsage"
    name: "$1"
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);
        assert!(receiver.samples().is_empty());
    }

    // ==========================================================================
    // Matching order and caching
    // ==========================================================================

    #[test]
    fn test_first_matching_rule_wins() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage"
    name: first_rule
  - pattern: "HeapMemoryUsage"
    name: second_rule
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        let samples = receiver.samples();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].name, "first_rule");
    }

    #[test]
    fn test_unmatched_rule_continues_to_next() {
        let config = configuration(
            r#"
rules:
  - pattern: "NoSuchAttribute"
    name: never
  - pattern: "HeapMemoryUsage"
    name: fallback
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        assert_eq!(receiver.samples()[0].name, "fallback");
    }

    #[test]
    fn test_idempotent_evaluation() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage.(\\w+)"
    name: jvm_memory_$1
    cache: true
"#,
        );
        let mut first = SampleReceiver::new(&config);
        record_heap_used(&mut first, 42);
        let mut second = SampleReceiver::new(&config);
        record_heap_used(&mut second, 42);

        assert_eq!(first.samples(), second.samples());
    }

    #[test]
    fn test_cache_eligible_rule_uses_value_sentinel() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage"
    name: jvm_memory
    cache: true
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        let key = "java.lang<type=Memory><>HeapMemoryUsage.used: <cache>";
        assert!(matches!(
            config.rules_cache().get(0, key),
            Some(CachedOutcome::Matched(_))
        ));

        // A different live value hits the same entry.
        let (_, staleness) = {
            let mut next = SampleReceiver::new(&config);
            record_heap_used(&mut next, 99);
            next.finish()
        };
        assert!(staleness.contains(0, key));
        assert_eq!(config.rules_cache().entry_count(), 1);
    }

    #[test]
    fn test_cached_unmatched_skips_pattern_and_falls_through() {
        // Rule 0 is pre-seeded as Unmatched for this bean even though its
        // pattern would match; the cached outcome must win and evaluation
        // must fall through to rule 1.
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage"
    name: cached_rule
    cache: true
  - pattern: "HeapMemoryUsage"
    name: fallback_rule
"#,
        );
        let key = "java.lang<type=Memory><>HeapMemoryUsage.used: <cache>";
        config.rules_cache().put(0, key, CachedOutcome::Unmatched);

        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        assert_eq!(receiver.samples()[0].name, "fallback_rule");
        let (_, staleness) = receiver.finish();
        assert!(staleness.contains(0, key), "cached key must be kept fresh");
    }

    #[test]
    fn test_pattern_failure_caches_unmatched() {
        let config = configuration(
            r#"
rules:
  - pattern: "NoSuchAttribute"
    name: never
    cache: true
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        assert!(receiver.samples().is_empty());
        let key = "java.lang<type=Memory><>HeapMemoryUsage.used: <cache>";
        assert!(matches!(
            config.rules_cache().get(0, key),
            Some(CachedOutcome::Unmatched)
        ));
    }

    #[test]
    fn test_no_rule_matches_drops_reading() {
        let config = configuration("rules:\n  - pattern: Threading");
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);
        assert!(receiver.samples().is_empty());
    }

    // ==========================================================================
    // Values
    // ==========================================================================

    #[test]
    fn test_value_template_overrides_reading() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage"
    name: jvm_memory
    value: 1
    valueFactor: 0.001
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        assert_eq!(receiver.samples()[0].value, 0.001);
    }

    #[test]
    fn test_value_template_from_capture() {
        let config = configuration(
            r#"
rules:
  - pattern: "State: (\\d+)-ish"
    name: state
    value: $1
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "app",
            &[],
            &[],
            "State",
            "java.lang.String",
            "",
            &AttributeValue::from("3-ish"),
        );

        assert_eq!(receiver.samples()[0].value, 3.0);
    }

    #[test]
    fn test_unparsable_value_template_drops_reading() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage"
    name: jvm_memory
    value: not_a_number
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);
        assert!(receiver.samples().is_empty());
    }

    #[test]
    fn test_boolean_value_coerces() {
        let config = configuration("rules:\n  - pattern: Verbose");
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "java.lang",
            &memory_properties(),
            &[],
            "Verbose",
            "boolean",
            "",
            &AttributeValue::Boolean(true),
        );

        assert_eq!(receiver.samples()[0].value, 1.0);
    }

    #[test]
    fn test_string_value_without_override_drops_reading() {
        let config = configuration("rules:\n  - pattern: Name");
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "java.lang",
            &memory_properties(),
            &[],
            "Name",
            "java.lang.String",
            "",
            &AttributeValue::from("G1"),
        );
        assert!(receiver.samples().is_empty());
    }

    #[test]
    fn test_value_factor_applies_to_reading() {
        let config = configuration(
            r#"
rules:
  - pattern: "HeapMemoryUsage"
    name: jvm_memory_kb
    valueFactor: 0.001
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 4000);
        assert_eq!(receiver.samples()[0].value, 4.0);
    }

    // ==========================================================================
    // Attribute name folding and output case folding
    // ==========================================================================

    #[test]
    fn test_snake_case_attribute_matching() {
        let config = configuration(
            r#"
rules:
  - pattern: "heap_memory_usage.used"
    attrNameSnakeCase: true
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        record_heap_used(&mut receiver, 42);

        // The default export uses the folded attribute name too.
        assert_eq!(
            receiver.samples()[0].name,
            "java_lang_Memory_heap_memory_usage_used"
        );
    }

    #[test]
    fn test_lowercase_output_flags() {
        let config = configuration(
            r#"
lowercaseOutputName: true
lowercaseOutputLabelNames: true
rules:
  - pattern: "CollectionCount"
"#,
        );
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "java.lang",
            &[
                ("type".to_string(), "GarbageCollector".to_string()),
                ("Name".to_string(), "G1".to_string()),
            ],
            &[],
            "CollectionCount",
            "long",
            "",
            &AttributeValue::Integer(1),
        );

        let samples = receiver.samples();
        assert_eq!(
            samples[0].name,
            "java_lang_garbagecollector_collectioncount"
        );
        assert_eq!(samples[0].label_names, vec!["name"]);
        // Label values keep their original case.
        assert_eq!(samples[0].label_values, vec!["G1"]);
    }

    #[test]
    fn test_composite_attribute_path_in_default_export() {
        let config = configuration("rules:\n  - pattern: Usage");
        let mut receiver = SampleReceiver::new(&config);
        receiver.record_bean(
            "java.lang",
            &[("type".to_string(), "MemoryPool".to_string())],
            &["Usage".to_string()],
            "committed",
            "long",
            "",
            &AttributeValue::Integer(5),
        );

        assert_eq!(
            receiver.samples()[0].name,
            "java_lang_MemoryPool_Usage_committed"
        );
    }
}
