use bvh_landmarks::{map_landmarks, parse_bvh, MapperConfig};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const HUMANOID: &str = include_str!("../tests/data/humanoid.bvh");

/// The fixture's hierarchy with its first frame repeated `frames` times.
fn long_capture(frames: usize) -> String {
    let motion = HUMANOID.find("MOTION").unwrap();
    let first_frame = HUMANOID[motion..].lines().nth(3).unwrap();
    let mut text = format!("{}MOTION\nFrames: {frames}\nFrame Time: 0.008333\n", &HUMANOID[..motion]);
    for _ in 0..frames {
        text.push_str(first_frame);
        text.push('\n');
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let text = long_capture(2000);
    let skeleton = parse_bvh(&text).unwrap();
    let config = MapperConfig::default();

    let mut group = c.benchmark_group("sample-size-example");
    group.sample_size(10);
    group.bench_function("parse + fk, 2000 frames", |b| b.iter(|| parse_bvh(black_box(&text)).unwrap()));
    group.bench_function("landmarks, 2000 frames", |b| {
        b.iter(|| map_landmarks(black_box(&skeleton), &config).unwrap())
    });
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
