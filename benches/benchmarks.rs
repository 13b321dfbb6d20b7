use bitboard_repl::bitboard::Bitboard;
use bitboard_repl::parse;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

const SEED: u64 = 0x0123_4567_89ab_cdef;

fn grid_rendering(c: &mut Criterion) {
    let board = Bitboard::new(SEED);

    c.bench_function("grid rendering", |b| {
        b.iter(|| black_box(board).to_grid_string())
    });
}

fn binary_rendering(c: &mut Criterion) {
    let board = Bitboard::new(SEED);

    c.bench_function("binary rendering", |b| {
        b.iter(|| black_box(board).to_binary_string())
    });
}

fn binary_parsing(c: &mut Criterion) {
    let bits = Bitboard::new(SEED).to_binary_string();

    c.bench_function("binary string parsing", |b| {
        b.iter(|| parse::parse_binary_string(black_box(&bits)).unwrap())
    });
}

fn set_all_bits(c: &mut Criterion) {
    c.bench_function("set all 64 bits", |b| {
        b.iter(|| {
            let mut board = Bitboard::empty();
            for n in 0..64 {
                board.set(black_box(n)).unwrap();
            }
            board
        })
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default();
    targets = grid_rendering, binary_rendering, binary_parsing, set_all_bits
}
criterion_main!(benches);
