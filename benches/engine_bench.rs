//! Rule evaluation benchmarks
//!
//! Measures a single `record_bean` call on the three interesting paths:
//! default export, name-template matching, and the warm match cache.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use mbean_collector::collector::source::AttributeValue;
use mbean_collector::config::Configuration;
use mbean_collector::transformer::engine::SampleReceiver;

fn record_one(configuration: &Configuration) {
    let properties = vec![("type".to_string(), "Memory".to_string())];
    let mut receiver = SampleReceiver::new(configuration);
    receiver.record_bean(
        "java.lang",
        &properties,
        &[],
        "HeapMemoryUsage.used",
        "long",
        "",
        &AttributeValue::Integer(52428800),
    );
}

fn benchmark_record_bean(c: &mut Criterion) {
    let default_export = Configuration::from_yaml("rules:\n  - pattern: Memory").unwrap();

    let templated = Configuration::from_yaml(
        r#"
rules:
  - pattern: "HeapMemoryUsage.(\\w+)"
    name: jvm_memory_heap_$1_bytes
    type: GAUGE
    labels:
      area: heap
"#,
    )
    .unwrap();

    let cached = Configuration::from_yaml(
        r#"
rules:
  - pattern: "HeapMemoryUsage.(\\w+)"
    name: jvm_memory_heap_$1_bytes
    cache: true
"#,
    )
    .unwrap();
    // Warm the cache; every benchmark iteration after this hits it.
    record_one(&cached);

    let mut group = c.benchmark_group("record_bean");

    group.bench_with_input(
        BenchmarkId::new("default_export", "memory"),
        &default_export,
        |b, config| b.iter(|| record_one(config)),
    );

    group.bench_with_input(
        BenchmarkId::new("templated", "memory"),
        &templated,
        |b, config| b.iter(|| record_one(config)),
    );

    group.bench_with_input(
        BenchmarkId::new("cached", "memory"),
        &cached,
        |b, config| b.iter(|| record_one(config)),
    );

    group.finish();
}

fn benchmark_rule_walk(c: &mut Criterion) {
    // Twenty non-matching rules in front of the one that matches, to
    // measure the per-rule walk cost.
    let mut yaml = String::from("rules:\n");
    for i in 0..20 {
        yaml.push_str(&format!("  - pattern: \"NoSuchAttribute{}\"\n", i));
    }
    yaml.push_str("  - pattern: \"HeapMemoryUsage\"\n");
    let configuration = Configuration::from_yaml(&yaml).unwrap();

    c.bench_function("rule_walk/21_rules", |b| {
        b.iter(|| record_one(&configuration))
    });
}

criterion_group!(benches, benchmark_record_bean, benchmark_rule_walk);
criterion_main!(benches);
