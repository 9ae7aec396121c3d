use argon2_core::derivation::argon2::{Params, Variant, hash};

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

pub fn bench_argon2(c: &mut Criterion) {
    let params = Params::new(4096, 3, 1, 32);

    for variant in [Variant::Argon2d, Variant::Argon2i, Variant::Argon2id] {
        c.bench_function(&format!("{variant} m=4096 t=3 p=1"), |b| {
            b.iter(|| hash(black_box(b"password"), black_box(b"somesalt"), &params, variant))
        });
    }

    let parallel = Params::new(16384, 2, 4, 32);
    c.bench_function("argon2id m=16384 t=2 p=4", |b| {
        b.iter(|| {
            hash(
                black_box(b"password"),
                black_box(b"somesalt"),
                &parallel,
                Variant::Argon2id,
            )
        })
    });
}

criterion_group!(benches, bench_argon2);
criterion_main!(benches);
