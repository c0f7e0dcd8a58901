use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use fair_dice::game::{win_probability, FaceSet, ProbabilityMatrix};
use fair_dice::protocol::CommitmentScheme;
use fair_dice::HashAlgorithm;

fn commit_and_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("commitment");
    for algorithm in [HashAlgorithm::Sha3_256, HashAlgorithm::Sha256] {
        let scheme = CommitmentScheme::new(algorithm);
        let mut rng = StdRng::seed_from_u64(42);

        group.bench_function(BenchmarkId::new("commit", algorithm), |b| {
            b.iter(|| black_box(scheme.commit(&mut rng, black_box(3), 6)))
        });

        let commitment = scheme.commit(&mut rng, 3, 6).expect("valid range");
        group.bench_function(BenchmarkId::new("verify", algorithm), |b| {
            b.iter(|| {
                black_box(scheme.verify(
                    commitment.secret_key(),
                    black_box(3),
                    commitment.tag(),
                ))
            })
        });
    }
    group.finish();
}

fn probabilities(c: &mut Criterion) {
    let mut group = c.benchmark_group("probability");
    for faces in [6usize, 20, 100] {
        let a = FaceSet::new((1..=faces as u32).collect()).expect("non-empty");
        let b = FaceSet::new((1..=faces as u32).rev().map(|f| f + 1).collect()).expect("non-empty");
        let dice = vec![a.clone(), b.clone(), a.clone(), b.clone()];

        group.bench_function(BenchmarkId::new("pair", faces), |bench| {
            bench.iter(|| black_box(win_probability(&a, &b)))
        });
        group.bench_function(BenchmarkId::new("matrix_4", faces), |bench| {
            bench.iter(|| black_box(ProbabilityMatrix::compute(&dice)))
        });
    }
    group.finish();
}

criterion_group!(benches, commit_and_verify, probabilities);
criterion_main!(benches);
