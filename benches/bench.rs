// Criterion benchmarks for Santa Algo

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use santa_algo::core::{is_excluded_pair, Engine};
use santa_algo::models::{ExclusionPair, MatchConstraints, Participant};

fn create_roster(size: usize) -> Vec<Participant> {
    (0..size)
        .map(|i| {
            let email = format!("person{}@example.com", i);
            Participant::new(email.clone(), format!("Person {}", i), email)
        })
        .collect()
}

fn create_exclusions(roster: &[Participant], count: usize) -> Vec<ExclusionPair> {
    (0..count.min(roster.len().saturating_sub(1)))
        .map(|i| ExclusionPair::bidirectional(&roster[i].id, &roster[i + 1].id))
        .collect()
}

fn bench_exclusion_predicate(c: &mut Criterion) {
    let roster = create_roster(50);
    let pairs = create_exclusions(&roster, 25);

    c.bench_function("is_excluded_pair", |b| {
        b.iter(|| {
            is_excluded_pair(
                black_box(&roster[0].id),
                black_box(&roster[49].id),
                black_box(&pairs),
            )
        });
    });
}

fn bench_generate(c: &mut Criterion) {
    let engine = Engine::with_defaults();
    let mut group = c.benchmark_group("generate");

    for size in [10, 25, 50, 100] {
        let roster = create_roster(size);
        let pairs = create_exclusions(&roster, size / 4);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let constraints = MatchConstraints {
                    participants: black_box(&roster),
                    exclusion_pairs: black_box(&pairs),
                    historical_data: &[],
                    current_year: 2024,
                };
                engine.generate(&constraints).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_exclusion_predicate, bench_generate);
criterion_main!(benches);
