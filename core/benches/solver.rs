use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::hint::black_box;
use sweeper_core::{Board, BoardGenerator, Difficulty, GameConfig, ShuffleGenerator, solver};

const TIERS: [(u8, u8); 3] = [(9, 9), (16, 16), (32, 32)];

fn candidates(config: &GameConfig, count: usize) -> Vec<Board> {
    let mut generator = ShuffleGenerator::new(SmallRng::seed_from_u64(0x5eed));
    (0..count)
        .map(|_| {
            let mut board = Board::new(config.size());
            generator.fill(config, &mut board);
            board
        })
        .collect()
}

fn bench_verifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("verifier");

    for difficulty in Difficulty::ALL {
        for (width, height) in TIERS {
            let config = GameConfig::new(width, height, difficulty.index()).unwrap();
            let boards = candidates(&config, 64);

            group.bench_with_input(
                BenchmarkId::new(format!("{difficulty:?}"), format!("{width}x{height}")),
                &boards,
                |b, boards| {
                    let mut next = boards.iter().cycle();
                    b.iter(|| solver::analyze(black_box(next.next().unwrap())))
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_verifier);
criterion_main!(benches);
