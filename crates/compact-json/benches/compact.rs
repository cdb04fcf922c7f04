use codspeed_criterion_compat::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Value};

/// An array of `count` records that repeat a handful of shapes, like a typical config or fixture.
fn repetitive(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|idx| {
            json!({
                "id": idx,
                "kind": if idx % 2 == 0 { "primary resource" } else { "secondary resource" },
                "tags": ["alpha", "beta", "gamma"],
                "limits": {"min": 0, "max": 100, "step": 0.5},
                "enabled": idx % 3 == 0
            })
        })
        .collect();
    Value::Array(items)
}

fn wide_object(count: usize, sorted: bool) -> Value {
    let mut keys: Vec<String> = (0..count).map(|idx| format!("property_{idx:05}")).collect();
    if !sorted {
        keys.reverse();
    }
    Value::Object(keys.into_iter().map(|key| (key, json!(1))).collect())
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for count in [100, 10_000] {
        let input = repetitive(count);
        group.bench_with_input(BenchmarkId::new("deduplicated", count), &input, |b, input| {
            b.iter(|| compact_json::build(input));
        });
        group.bench_with_input(BenchmarkId::new("plain", count), &input, |b, input| {
            b.iter(|| compact_json::options().deduplicate(false).build(input));
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for (sorted, name) in [(true, "sorted"), (false, "unsorted")] {
        let input = wide_object(1_000, sorted);
        let compiled = compact_json::build(&input);
        let root = compiled.document().root();
        group.bench_with_input(BenchmarkId::new(name, 1_000), &root, |b, root| {
            b.iter(|| root.get("property_00500").is_ok());
        });
    }
    group.finish();
}

fn bench_display(c: &mut Criterion) {
    let input = repetitive(1_000);
    let compiled = compact_json::build(&input);
    c.bench_function("display", |b| {
        b.iter(|| compiled.document().to_string());
    });
}

criterion_group!(benches, bench_build, bench_lookup, bench_display);
criterion_main!(benches);
