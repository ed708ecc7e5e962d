//! iai benchmarks are measuring projected processor cycles spent on executing a
//! piece of code. They are less noisy and give a better understanding of
//! whether the performance is "objectively" changing between different
//! versions.
//!
//! It doesn't eliminate the necessity of measuring the time, though, because
//! knowing the absolute values is very important, too. Hence, the two sets of
//! benchmarks are very similar but complement each other.
//!
//! Another problem is that there seems to be no way to benchmark a specific
//! piece of code with iai: the measurements include the whole function
//! execution (including building the attack tables).

use magpie::chess::attacks::AttackTables;
use magpie::chess::perft::perft;
use magpie::chess::position::Position;

fn parse_positions() {
    for serialized_position in include_str!("../data/positions.fen").lines() {
        let _ = iai::black_box(
            Position::try_from(serialized_position).expect("benchmarks are given valid positions"),
        );
    }
}

fn build_tables() {
    let _ = iai::black_box(AttackTables::new());
}

fn perft_starting_position() {
    let tables = AttackTables::new();
    let _ = iai::black_box(perft(&Position::starting(), &tables, 3));
}

iai::main!(parse_positions, build_tables, perft_starting_position);
