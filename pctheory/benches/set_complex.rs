// Benchmarks for subset enumeration and set-complex construction.
//
// Subset enumeration classifies every proper subset of the prime form
// through the shared cache; Kh runs two K constructions against the full
// catalogue. Both are measured serially and on the rayon pool.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pctheory::config::EngineConfig;
use pctheory::set_complex::SetComplex;
use pctheory::setclass::{ClassificationCache, SetClass};
use std::hint::black_box;

const NEXUSES: &[&str] = &["4-Z15", "6-Z17", "8-28"];

fn bench_subset_classes(c: &mut Criterion) {
    let mut group = c.benchmark_group("abstract_subset_classes");
    for &name in NEXUSES {
        let nexus = SetClass::load_from_name(name).unwrap();
        for parallel in [false, true] {
            let label = if parallel { "parallel" } else { "serial" };
            group.bench_with_input(BenchmarkId::new(label, name), &nexus, |b, nexus| {
                b.iter(|| {
                    let cache = ClassificationCache::new(nexus.group());
                    black_box(nexus.abstract_subset_classes_with(&cache, parallel).unwrap())
                })
            });
        }
    }
    group.finish();
}

fn bench_kh(c: &mut Criterion) {
    let mut group = c.benchmark_group("kh");
    group.sample_size(20);
    for &name in NEXUSES {
        let nexus = SetClass::load_from_name(name).unwrap();
        for parallel in [false, true] {
            let config = EngineConfig {
                parallel,
                ..Default::default()
            };
            let label = if parallel { "parallel" } else { "serial" };
            group.bench_with_input(BenchmarkId::new(label, name), &nexus, |b, nexus| {
                b.iter(|| black_box(SetComplex::kh_with(nexus, &config).unwrap()))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_subset_classes, bench_kh);
criterion_main!(benches);
