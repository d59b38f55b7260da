//! Benchmarks for isotower field, polynomial and construction operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use isotower::cm::hilbert_class_polynomial;
use isotower::{
    build_supersingular_curve, modular4, Field, FieldTower, Poly, PrimeModulus, QuadraticModulus,
    Ring,
};

// 2^61 - 1, a Mersenne prime = 3 (mod 4)
const P: u64 = 2_305_843_009_213_693_951;

fn bench_fp_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fp Operations");

    let m = PrimeModulus::new(P).unwrap();
    let a = m.element(123456789);
    let b = m.element(987654321);

    group.bench_function("add", |bencher| {
        bencher.iter(|| black_box(a) + black_box(b))
    });

    group.bench_function("mul", |bencher| {
        bencher.iter(|| black_box(a) * black_box(b))
    });

    group.bench_function("inverse", |bencher| bencher.iter(|| black_box(a).inverse()));

    group.bench_function("sqrt", |bencher| {
        bencher.iter(|| black_box(a * a).sqrt())
    });

    group.finish();
}

fn bench_fp2_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fp2 Operations");

    let k = QuadraticModulus::complex(PrimeModulus::new(P).unwrap()).unwrap();
    let a = k.element(123, 456);
    let b = k.element(789, 101112);

    group.bench_function("mul", |bencher| {
        bencher.iter(|| black_box(a) * black_box(b))
    });

    group.bench_function("inverse", |bencher| bencher.iter(|| black_box(a).inverse()));

    group.bench_function("pow_p", |bencher| {
        bencher.iter(|| black_box(a).pow(u128::from(P)))
    });

    group.bench_function("sqrt", |bencher| {
        bencher.iter(|| black_box(a * a).sqrt())
    });

    group.bench_function("modular4", |bencher| {
        bencher.iter(|| modular4(black_box(a), black_box(b)))
    });

    group.finish();
}

fn bench_root_finding(c: &mut Criterion) {
    let mut group = c.benchmark_group("Root Finding");

    let k = QuadraticModulus::complex(PrimeModulus::new(P).unwrap()).unwrap();
    for degree in [2usize, 4, 8] {
        let roots: Vec<_> = (0..degree as u64).map(|n| k.element(n + 2, 3 * n)).collect();
        let f = Poly::from_roots(&roots).unwrap();
        group.bench_with_input(BenchmarkId::new("roots", degree), &f, |bencher, f| {
            bencher.iter(|| black_box(f).roots())
        });
    }

    group.finish();
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("Construction");
    group.sample_size(10);

    for d in [-23i64, -71, -167] {
        group.bench_with_input(BenchmarkId::new("hilbert", d), &d, |bencher, &d| {
            bencher.iter(|| hilbert_class_polynomial(black_box(d)))
        });
    }

    for p in [433u64, 1009] {
        let k = QuadraticModulus::for_prime(PrimeModulus::new(p).unwrap());
        group.bench_with_input(BenchmarkId::new("supersingular", p), &k, |bencher, &k| {
            bencher.iter(|| build_supersingular_curve(black_box(k)))
        });
    }

    group.bench_function("tower_2^61-1", |bencher| {
        bencher.iter(|| FieldTower::build(black_box(P)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_fp_operations,
    bench_fp2_operations,
    bench_root_finding,
    bench_construction,
);
criterion_main!(benches);
