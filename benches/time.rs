//! Criterion benchmarks measure time of the clearly separated pieces of code.

use std::fs;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use magpie::chess::attacks::AttackTables;
use magpie::chess::movegen;
use magpie::chess::perft::perft;
use magpie::chess::position::Position;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};

fn read_positions() -> Vec<String> {
    fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/data/positions.fen"))
        .expect("benchmarks are given the positions file")
        .lines()
        .map(str::to_string)
        .collect()
}

fn parse_positions(positions: &[String]) {
    for position in positions {
        let pos = Position::try_from(position.as_str());
        assert!(pos.is_ok());
    }
}

fn parse(c: &mut Criterion) {
    let positions = read_positions();
    c.bench_with_input(
        BenchmarkId::new("parse", format!("{} positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| parse_positions(positions));
        },
    );
}

criterion_group! {
    name = position;
    config = Criterion::default().sample_size(10);
    targets = parse
}

fn generate_moves(positions: &[Position], tables: &AttackTables) {
    for position in positions {
        let _ = criterion::black_box(movegen::legal_moves(position, tables));
    }
}

fn movegen_bench(c: &mut Criterion) {
    let tables = AttackTables::new();
    let mut group = c.benchmark_group("Move generation");
    let serialized = read_positions();
    let positions = serialized
        .iter()
        .map(|input| Position::try_from(input.as_str()).unwrap())
        .collect::<Vec<_>>();
    group.bench_with_input(
        BenchmarkId::new("magpie", format!("{} arbitrary positions", positions.len())),
        &positions,
        |b, positions| {
            b.iter(|| generate_moves(positions, &tables));
        },
    );
    // Add a benchmark for shakmaty: this is a reasonable reference that has
    // stable performance and can be compared to.
    let shakmaty_positions = serialized
        .iter()
        .filter_map(|input| {
            let setup: shakmaty::fen::Fen = input.parse().ok()?;
            setup.into_position::<Chess>(CastlingMode::Standard).ok()
        })
        .collect::<Vec<_>>();
    group.bench_with_input(
        BenchmarkId::new(
            "reference implementation: shakmaty",
            format!("{} arbitrary positions", shakmaty_positions.len()),
        ),
        &shakmaty_positions,
        |b, positions| {
            b.iter(|| {
                for position in positions {
                    let _ = criterion::black_box(position.legal_moves());
                }
            });
        },
    );
    group.finish();
}

criterion_group! {
    name = movegen;
    config = Criterion::default().sample_size(100);
    targets = movegen_bench
}

fn perft_bench(c: &mut Criterion) {
    let tables = AttackTables::new();
    let mut group = c.benchmark_group("Perft");
    for (name, fen, depth) in [
        (
            "starting position",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            4,
        ),
        (
            "kiwipete",
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            3,
        ),
        ("endgame", "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 4),
    ] {
        let position = Position::from_fen(fen).unwrap();
        group.bench_with_input(
            BenchmarkId::new(name, format!("depth {depth}")),
            &(position, depth),
            |b, (position, depth)| {
                b.iter(|| perft(position, &tables, *depth));
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft_group;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(position, movegen, perft_group);
