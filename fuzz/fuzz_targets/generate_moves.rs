#![no_main]
use std::sync::OnceLock;

use itertools::Itertools;
use libfuzzer_sys::fuzz_target;
use magpie::chess::attacks::AttackTables;
use magpie::chess::{movegen, position};
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position};

static TABLES: OnceLock<AttackTables> = OnceLock::new();

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = position::Position::from_fen(input) else {
        return;
    };
    let shakmaty_setup: shakmaty::fen::Fen = input
        .parse()
        .expect("when we parsed a valid position it should be accepted by shakmaty");
    // shakmaty is stricter about some positions (e.g. impossible checks).
    let Ok(shakmaty_position) = shakmaty_setup.into_position::<Chess>(CastlingMode::Standard) else {
        return;
    };
    let tables = TABLES.get_or_init(AttackTables::new);
    assert_eq!(
        movegen::legal_moves(&position, tables)
            .iter()
            .map(ToString::to_string)
            .sorted()
            .collect::<Vec<_>>(),
        shakmaty_position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .sorted()
            .collect::<Vec<_>>()
    );
});
