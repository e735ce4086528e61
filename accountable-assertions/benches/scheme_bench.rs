use accountable_assertions::chameleon::ChameleonHash;
use accountable_assertions::{Authenticator, Context, Rand, SecretKey};
use criterion::{Criterion, SamplingMode, black_box, criterion_group, criterion_main};
use std::time::Duration;

const SK: SecretKey = [0x42; 32];
const CT: Context = [0x41, 0x04, 0xff, 0x17, 0x5f, 0xa9, 0x17, 0xab];
const R: Rand = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    0x08, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06,
    0x07, 0x08,
];

fn bench_chameleon(c: &mut Criterion) {
    let secret = ChameleonHash::from_secret_key(&SK).expect("bench key is valid");
    let public =
        ChameleonHash::from_public_key(&secret.public_key_bytes()).expect("derived key is valid");

    let mut group = c.benchmark_group("chameleon");

    group.bench_function("hash_public", |b| {
        b.iter(|| public.hash(black_box(b"benchmark message"), black_box(&R)))
    });

    group.bench_function("hash_secret", |b| {
        b.iter(|| secret.hash(black_box(b"benchmark message"), black_box(&R)))
    });

    group.bench_function("collision", |b| {
        b.iter(|| secret.collision(black_box(b"benchmark message"), black_box(&R), black_box(b"rewritten")))
    });

    group.finish();
}

fn bench_authenticator(c: &mut Criterion) {
    let auth = Authenticator::from_secret_key(&SK).expect("bench key is valid");
    let public =
        Authenticator::from_public_params(&auth.public_params()).expect("derived params are valid");
    let token = auth
        .authenticate(&CT, b"benchmark statement")
        .expect("authentication succeeds");

    let mut group = c.benchmark_group("authenticator");
    // each walk performs ~130 point multiplications
    group.sampling_mode(SamplingMode::Flat);
    group.measurement_time(Duration::from_secs(20));
    group.sample_size(20);

    group.bench_function("keygen", |b| {
        b.iter(|| Authenticator::from_secret_key(black_box(&SK)))
    });

    group.bench_function("authenticate", |b| {
        b.iter(|| auth.authenticate(black_box(&CT), black_box(b"benchmark statement")))
    });

    group.bench_function("verify", |b| {
        b.iter(|| public.verify(black_box(&token), black_box(&CT), black_box(b"benchmark statement")))
    });

    group.finish();
}

criterion_group! {
    name = scheme;
    config = Criterion::default();
    targets = bench_chameleon, bench_authenticator
}
criterion_main!(scheme);
