use criterion::{Criterion, criterion_group, criterion_main};
use mineboard_core::*;
use std::hint::black_box;

fn generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for (name, config) in [
        ("beginner", GameConfig::BEGINNER),
        ("intermediate", GameConfig::INTERMEDIATE),
        ("expert", GameConfig::EXPERT),
    ] {
        let start = (config.rows() / 2, config.columns() / 2);
        group.bench_function(name, |b| {
            let mut seed = 0;
            b.iter(|| {
                seed += 1;
                black_box(Board::generate(config, Some(start), seed))
            })
        });
    }
    group.finish();
}

fn flood_fill(c: &mut Criterion) {
    // a sparse board opens almost everything from one click
    let config = GameConfig::new((128, 128), 64).expect("valid config");
    let board = Board::generate(config, Some((64, 64)), 42).expect("board fits");

    c.bench_function("flood_fill/128x128", |b| {
        b.iter_batched(
            || board.clone(),
            |mut board| black_box(board.reveal((64, 64))),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, generation, flood_fill);
criterion_main!(benches);
