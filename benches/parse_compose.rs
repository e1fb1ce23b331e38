use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};
use namefix::{expand, parse, subject_568, CLASS_CODE_INDEX};

const NAMES: [&str; 4] = [
    "adam_sandler_snl_001_id002040_1000001100000000000000110000.jpg",
    "ayers_rock_text2_001_id004158_0100000000000010100000000010.jpg",
    "eva-green-casino-royale-james_bond_vesper_lynd_01_001_id003287_1000000100000000000000110001.jpg",
    "sphinx-egypt_001_id001905_0100000000000011000000000000 2.jpg",
];

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse stimulus name", |b| {
        b.iter(|| {
            for name in NAMES {
                black_box(parse(black_box(name)));
            }
        })
    });
}

fn bench_parse_compose(c: &mut Criterion) {
    c.bench_function("parse + canonical [4 names]", |b| {
        b.iter(|| {
            for (i, name) in NAMES.into_iter().enumerate() {
                let parsed = parse(black_box(name)).unwrap();
                black_box(parsed.canonical(i, &CLASS_CODE_INDEX, ".jpg"));
            }
        })
    });
}

fn bench_montage_expand(c: &mut Criterion) {
    let (error, _) = subject_568();
    c.bench_function("expand subject-568 montage [110 channels]", |b| {
        b.iter(|| black_box(expand(black_box(&error))).len())
    });
}

criterion_group!(benches, bench_parse, bench_parse_compose, bench_montage_expand);
criterion_main!(benches);
