//! Benchmarks for descriptor parsing and the resolution pass sequence.
//!
//! These benchmarks measure the performance of parsing deployment
//! descriptors and running the full pass pipeline over descriptors of
//! various sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use mta_resolve::descriptor::{self, ApplicationColor};
use mta_resolve::passes::DescriptorResolver;
use mta_resolve::platform::CloudTarget;
use mta_resolve::store::{ConfigurationEntry, FileStore};

/// Minimal descriptor with one module and one resource.
const MINIMAL_DESCRIPTOR: &str = r#"
id: bench.minimal
version: 1.0.0
modules:
  - name: web
    type: nodejs
    requires:
      - db
resources:
  - name: db
    type: hdi-container
"#;

/// Build a descriptor with `n` deployer/consumer module pairs, each with
/// its own container and configuration reference.
fn synthetic_descriptor(n: usize) -> String {
    let mut yaml = String::from("id: bench.synthetic\nversion: 1.0.0\nmodules:\n");
    for i in 0..n {
        yaml.push_str(&format!(
            "  - name: deployer-{i}\n    type: hdi\n    requires:\n      - db-{i}\n    properties:\n      zdm-mode: true\n"
        ));
        yaml.push_str(&format!(
            "  - name: consumer-{i}\n    type: nodejs\n    requires:\n      - db-{i}\n      - api-{i}\n"
        ));
    }
    yaml.push_str("resources:\n");
    for i in 0..n {
        yaml.push_str(&format!("  - name: db-{i}\n    type: hdi-container\n"));
        yaml.push_str(&format!(
            "  - name: api-{i}\n    type: configuration\n    properties:\n      provider-id: \"bench:api-{i}\"\n"
        ));
    }
    yaml
}

fn entry_store(n: usize) -> FileStore {
    let entries = (0..n)
        .map(|i| ConfigurationEntry {
            provider_nid: "mta".to_string(),
            provider_id: format!("bench:api-{i}"),
            provider_version: Some("1.0.0".to_string()),
            target: CloudTarget::new("acme", "prod"),
            content: format!(r#"{{"url":"https://api-{i}.example.com"}}"#),
            content_id: None,
        })
        .collect();
    FileStore::with_entries(entries)
}

fn bench_descriptor_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("descriptor_parsing");

    group.bench_function("minimal", |b| {
        b.iter(|| descriptor::parse(black_box(MINIMAL_DESCRIPTOR)).unwrap())
    });

    for size in [10, 50] {
        let yaml = synthetic_descriptor(size);
        group.bench_with_input(BenchmarkId::new("synthetic", size), &yaml, |b, yaml| {
            b.iter(|| descriptor::parse(black_box(yaml)).unwrap())
        });
    }

    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolution");

    for size in [10, 50] {
        let yaml = synthetic_descriptor(size);
        let parsed = descriptor::parse(&yaml).unwrap();
        let resolver = DescriptorResolver::new(CloudTarget::new("acme", "prod"))
            .with_store(Box::new(entry_store(size)))
            .with_color(Some(ApplicationColor::Blue));

        group.bench_with_input(BenchmarkId::new("full_pipeline", size), &parsed, |b, parsed| {
            b.iter(|| resolver.resolve(black_box(parsed.clone())).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_descriptor_parsing, bench_resolution);
criterion_main!(benches);
