use std::fs;
use std::sync::OnceLock;

use itertools::Itertools;
use magpie::chess::attacks::AttackTables;
use magpie::chess::core::{Move, Promotion, Square};
use magpie::chess::movegen;
use magpie::chess::perft::perft;
use magpie::chess::position::Position;
use pretty_assertions::assert_eq;

fn tables() -> &'static AttackTables {
    static TABLES: OnceLock<AttackTables> = OnceLock::new();
    TABLES.get_or_init(AttackTables::new)
}

/// Appends the default clocks to the trimmed FEN.
fn sanitize_fen(input: &str) -> String {
    let input = input.trim();
    if input.split(' ').count() == 4 {
        format!("{input} 0 1")
    } else {
        input.to_string()
    }
}

#[test]
#[should_panic(expected = "expected 1 white king, got 0")]
fn no_white_king() {
    drop(Position::try_from("3k4/8/8/8/8/8/8/8 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected 1 black king, got 0")]
fn no_black_king() {
    drop(Position::try_from("8/8/8/8/8/8/8/3K4 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected 1 white king, got 3")]
fn too_many_kings() {
    drop(Position::try_from("1kkk4/8/8/8/8/8/8/1KKK4 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected <= 8 white pawns, got 9")]
fn too_many_white_pawns() {
    drop(Position::try_from("rnbqkbnr/pppppppp/8/8/8/P7/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected <= 8 black pawns, got 9")]
fn too_many_black_pawns() {
    drop(Position::try_from("rnbqkbnr/pppppppp/p7/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "pawns can not be placed on backranks")]
fn pawns_on_backranks() {
    drop(Position::try_from("3kr3/8/8/8/8/5Q2/8/1KP5 w - - 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected en passant square to be on rank 6, got 3")]
fn wrong_en_passant_player() {
    drop(Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e3 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected en passant square to be on rank 3, got 4")]
fn wrong_en_passant_rank() {
    drop(Position::try_from("rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq e4 0 1").unwrap());
}

#[test]
#[should_panic(expected = "en passant square is not beyond pushed pawn")]
fn en_passant_not_beyond_pawn() {
    drop(Position::try_from("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq d3 0 1").unwrap());
}

#[test]
#[should_panic(expected = "more than 1 check after double pawn push is impossible")]
fn en_passant_double_check() {
    drop(Position::try_from("r2qkbnr/ppp3Np/8/4Q3/4P3/8/PP4PP/RNB1KB1R b KQkq e3 0 1").unwrap());
}

#[test]
#[should_panic(expected = "expected <= 2 checks, got 3")]
fn triple_check() {
    drop(Position::try_from("2r3r1/P3k3/prp5/1B5p/5P2/2Q1n2p/PP4KP/3R4 w - - 0 34").unwrap());
}

#[test]
#[should_panic(
    expected = "the only possible checks after double pawn push are either discovery targeting the \
    original pawn square or the pushed pawn itself"
)]
fn check_with_unrelated_en_passant() {
    drop(
        Position::try_from("rnbqk1nr/bb3p1p/1q2r3/2pPp3/3P4/7P/1PP1NpPP/R1BQKBNR w KQkq c6 0 1")
            .unwrap(),
    );
}

#[test]
#[should_panic(expected = "doubly pushed pawn can not be the only blocker on a diagonal")]
fn double_push_blocks_existing_check() {
    drop(Position::try_from("q6k/8/8/3pP3/8/8/8/7K w - d6 0 1").unwrap());
}

#[test]
fn clean_board_str() {
    for input in [
        "fen rn1qkb1r/pp3ppp/2p1pn2/3p1b2/2PP4/5NP1/PP2PPBP/RNBQK2R w KQkq - 0 1",
        "epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -",
        "rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n",
        "\n epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -",
    ] {
        assert!(Position::try_from(input).is_ok(), "{input:?}");
    }
    // Only try_from cleans up the input.
    assert!(Position::from_fen(
        "\n epd rnbqkb1r/ppp1pp1p/5np1/3p4/3P1B2/5N2/PPP1PPPP/RN1QKB1R w KQkq -\n"
    )
    .is_err());
}

#[test]
fn arbitrary_positions() {
    for serialized_position in
        fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/data/positions.fen"))
            .unwrap()
            .lines()
    {
        let position = Position::try_from(serialized_position).unwrap();
        assert_eq!(position.fen(), sanitize_fen(serialized_position));
    }
}

fn setup(input: &str) -> Position {
    Position::try_from(input).expect("parsing legal position: {input}")
}

fn get_moves(position: &Position) -> Vec<String> {
    movegen::legal_moves(position, tables())
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect::<Vec<_>>()
}

fn sorted_moves(moves: &[&str]) -> Vec<String> {
    moves
        .iter()
        .map(|m| (*m).to_string())
        .sorted()
        .collect::<Vec<_>>()
}

#[test]
fn starting_moves_generation() {
    assert_eq!(
        get_moves(&Position::starting()),
        sorted_moves(&[
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ])
    );
}

#[test]
fn basic_moves_generation() {
    assert_eq!(
        get_moves(&setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - e6 0 1")),
        sorted_moves(&[
            "a2a3", "a2a4", "d5d6", "d5e6", "b7b8q", "b7b8r", "b7b8b", "b7b8n", "b7c8q", "b7c8r",
            "b7c8b", "b7c8n", "e2e1", "e2e3", "e2e4", "e2e5", "e2b2", "e2c2", "e2d2", "e2f2",
            "e2g2", "e2h2", "d4b3", "d4c2", "d4f3", "d4b5", "d4c6", "d4e6", "d4f5", "g5c1", "g5d2",
            "g5e3", "g5f4", "g5g4", "g5g3", "g5g2", "g5g1", "g5h4", "g5e5", "g5f5", "g5h5", "g5h6",
            "g5f6", "g5e7", "g5d8", "g6f5", "g6h5", "g6f6", "g6h6", "g6f7",
        ])
    );
}

#[test]
fn double_check_evasions() {
    assert_eq!(
        get_moves(&setup("3kn3/R2p1N2/8/8/7B/6K1/3R4/8 b - - 0 1")),
        sorted_moves(&["d8c8"])
    );
    assert_eq!(
        get_moves(&setup("8/5Nk1/7p/4Bp2/3q4/8/8/5KR1 b - - 0 1")),
        sorted_moves(&["g7f8", "g7f7", "g7h7"])
    );
    assert_eq!(
        get_moves(&setup("8/5Pk1/7p/4Bp2/3q4/8/8/5KR1 b - - 0 1")),
        sorted_moves(&["g7f8", "g7f7", "g7h7"])
    );
}

#[test]
fn check_evasions() {
    assert_eq!(
        get_moves(&setup("3kn3/R2p4/8/6B1/8/6K1/3R4/8 b - - 0 1")),
        sorted_moves(&["e8f6", "d8c8"])
    );
    assert_eq!(
        get_moves(&setup("2R5/8/6k1/8/8/8/PPn5/KR6 w - - 0 1")),
        sorted_moves(&["c8c2"])
    );
}

#[test]
fn pins() {
    // The pawn is pinned but can capture en passant.
    assert_eq!(
        get_moves(&setup("6qk/8/8/3Pp3/8/8/K7/8 w - e6 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3", "d5e6"])
    );
    // The pawn is pinned but there is no en passant: it can't move.
    assert_eq!(
        get_moves(&setup("6qk/8/8/3Pp3/8/8/K7/8 w - - 0 1")),
        sorted_moves(&["a2a1", "a2a3", "a2b1", "a2b2", "a2b3"])
    );
    // The pawn is pinned and can't move.
    assert_eq!(
        get_moves(&setup("k7/1p6/8/8/8/8/8/4K2B b - - 0 1")),
        sorted_moves(&["a8a7", "a8b8"])
    );
}

/// Castling moves of the side to move, sorted.
fn castles(position: &Position) -> Vec<String> {
    get_moves(position)
        .into_iter()
        .filter(|m| ["e1c1", "e1g1", "e8c8", "e8g8"].contains(&m.as_str()))
        .collect()
}

#[test]
fn castle() {
    for (fen, expected) in [
        ("r3k2r/8/8/8/8/8/6N1/4K3 b kq - 0 1", vec!["e8c8", "e8g8"]),
        ("4k3/8/8/8/8/8/8/R3K2R w KQ - 0 1", vec!["e1c1", "e1g1"]),
        // Destination is attacked.
        ("r3k2r/8/8/8/8/8/6R1/4K3 b kq - 0 1", vec!["e8c8"]),
        ("r3k2r/8/8/8/8/8/6R1/4K3 b k - 0 1", vec![]),
        // b8 is attacked, but the king does not walk through it.
        ("r3k2r/8/8/8/8/8/1R6/4K3 b q - 0 1", vec!["e8c8"]),
        // Transit square is attacked.
        ("r3k2r/8/8/8/8/8/3R4/4K3 b kq - 0 1", vec!["e8g8"]),
        // The king is in check.
        ("4k3/8/8/8/8/8/4r3/R3K2R w KQ - 0 1", vec![]),
        ("r3k2r/8/8/8/8/8/4R3/4K3 b kq - 0 1", vec![]),
        // Diagonal attack on the transit square.
        ("r3k2r/8/8/8/8/B7/8/4K3 b kq - 0 1", vec!["e8c8"]),
    ] {
        assert_eq!(castles(&setup(fen)), sorted_moves(&expected), "{fen}");
    }
}

#[test]
fn chess_programming_wiki_perft_positions() {
    // Positions from https://www.chessprogramming.org/Perft_Results with
    // depth=1. Position 1 is the starting position: handled in detail before.
    for (fen, expected) in [
        (
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            48,
        ),
        ("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1", 14),
        (
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            6,
        ),
        // Mirrored.
        (
            "r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1",
            6,
        ),
        ("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8", 44),
        (
            "r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10",
            46,
        ),
    ] {
        assert_eq!(get_moves(&setup(fen)).len(), expected, "{fen}");
    }
}

#[test]
fn basic_moves() {
    let mut position = setup("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
    position.make_move(Move::new(Square::E2, Square::E4, None));
    assert_eq!(
        position.fen(),
        "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"
    );
    position.make_move(Move::new(Square::E7, Square::E5, None));
    assert_eq!(
        position.fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2"
    );
    position.make_move(Move::new(Square::G1, Square::F3, None));
    assert_eq!(
        position.fen(),
        "rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 1 2"
    );
    position.make_move(Move::new(Square::E8, Square::E7, None));
    assert_eq!(
        position.fen(),
        "rnbq1bnr/ppppkppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQ - 2 3"
    );
}

#[test]
fn promotion_moves() {
    let mut position = setup("2n4k/1PP5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 w - - 0 1");
    position.make_move(Move::new(Square::B7, Square::C8, Some(Promotion::Queen)));
    assert_eq!(
        position.fen(),
        "2Q4k/2P5/6K1/3Pp1Q1/3N4/3P4/P3R3/8 b - - 0 1"
    );
}

#[test]
fn castling_reset() {
    let mut position = setup("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    position.make_move(Move::new(Square::A1, Square::A8, None));
    assert_eq!(position.fen(), "R3k2r/8/8/8/8/8/8/4K2R b Kk - 0 1");
}

#[test]
fn uci_moves_sequence() {
    let mut position = Position::starting();
    for uci in ["e2e4", "d7d5", "e4e5", "f7f5", "e5f6", "g8h6", "f6g7", "e8f7", "g7h8q"] {
        position
            .try_make_move(Move::from_uci(uci).unwrap(), tables())
            .unwrap();
    }
    assert_eq!(
        position.fen(),
        "rnbq1b1Q/ppp1pk1p/7n/3p4/8/8/PPPP1PPP/RNBQKBNR b KQ - 0 5"
    );
    assert!(position
        .try_make_move(Move::from_uci("a7a5").unwrap(), tables())
        .is_ok());
    assert!(position
        .try_make_move(Move::from_uci("e1e3").unwrap(), tables())
        .is_err());
}

#[test]
fn perft_starting_position() {
    let position = Position::starting();
    assert_eq!(perft(&position, tables(), 0), 1);
    assert_eq!(perft(&position, tables(), 1), 20);
    assert_eq!(perft(&position, tables(), 2), 400);
    assert_eq!(perft(&position, tables(), 3), 8902);
    assert_eq!(perft(&position, tables(), 4), 197_281);
}

// Expensive in the Debug setting: run with --ignored in release mode.
#[ignore]
#[test]
fn perft_starting_position_deep() {
    assert_eq!(perft(&Position::starting(), tables(), 5), 4_865_609);
}

// Position 2.
#[test]
fn perft_kiwipete() {
    let position = setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - ");
    assert_eq!(perft(&position, tables(), 1), 48);
    assert_eq!(perft(&position, tables(), 2), 2039);
    assert_eq!(perft(&position, tables(), 3), 97862);
}

#[ignore]
#[test]
fn perft_kiwipete_deep() {
    let position = setup("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - ");
    assert_eq!(perft(&position, tables(), 4), 4_085_603);
}

// Position 3.
#[test]
fn perft_endgame() {
    let position = setup("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
    assert_eq!(perft(&position, tables(), 1), 14);
    assert_eq!(perft(&position, tables(), 2), 191);
    assert_eq!(perft(&position, tables(), 3), 2812);
    assert_eq!(perft(&position, tables(), 4), 43238);
    assert_eq!(perft(&position, tables(), 5), 674_624);
}

// Position 4.
#[test]
fn perft_complex() {
    let position = setup("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
    assert_eq!(perft(&position, tables(), 1), 6);
    assert_eq!(perft(&position, tables(), 2), 264);
    assert_eq!(perft(&position, tables(), 3), 9467);
}

#[ignore]
#[test]
fn perft_complex_deep() {
    let position = setup("r2q1rk1/pP1p2pp/Q4n2/bbp1p3/Np6/1B3NBn/pPPP1PPP/R3K2R b KQ - 0 1");
    assert_eq!(perft(&position, tables(), 4), 422_333);
}

// Position 5.
#[test]
fn perft_fifth() {
    let position = setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&position, tables(), 1), 44);
    assert_eq!(perft(&position, tables(), 2), 1486);
    assert_eq!(perft(&position, tables(), 3), 62379);
}

#[ignore]
#[test]
fn perft_fifth_deep() {
    let position = setup("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
    assert_eq!(perft(&position, tables(), 4), 2_103_487);
}

// Position 6.
#[test]
fn perft_sixth() {
    let position =
        setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    assert_eq!(perft(&position, tables(), 1), 46);
    assert_eq!(perft(&position, tables(), 2), 2079);
    assert_eq!(perft(&position, tables(), 3), 89890);
}

#[ignore]
#[test]
fn perft_sixth_deep() {
    let position =
        setup("r4rk1/1pp1qppp/p1np1n2/2b1p1B1/2B1P1b1/P1NP1N2/1PP1QPPP/R4RK1 w - - 0 10");
    assert_eq!(perft(&position, tables(), 4), 3_894_594);
}
