//! Legal [move generation]: produces every move of the side to move that does
//! not leave its king in check.
//!
//! The generator does not play the moves to check their legality. Instead, it
//! computes the squares attacked by the opponent, the pieces checking the king
//! and the pieces pinned to it and only emits the moves that respect these
//! constraints. The only exception is en passant, which is rare enough to be
//! verified by simulating the capture.
//!
//! [move generation]: https://www.chessprogramming.org/Move_Generation

use arrayvec::ArrayVec;

use crate::chess::attacks::AttackTables;
use crate::chess::bitboard::{Bitboard, Pieces};
use crate::chess::core::{
    CastleRights,
    File,
    Move,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};
use crate::chess::position::Position;

/// Upper bound on the number of legal moves in any reachable position (the
/// known maximum is 218).
pub const MAX_MOVES: usize = 256;

/// Legal moves of a position. Lives on the stack: generating moves does not
/// allocate.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Terminal state of the game: the side to move has no legal moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move is in check.
    Checkmate,
    /// The side to move is not in check.
    Stalemate,
}

/// Information about the opponent's pressure on our king, computed once per
/// position before the moves are generated.
struct AttackInfo {
    /// Squares attacked by the opponent. Our king is removed from the
    /// occupancy: it can not step back along the ray of a checking slider.
    attacks: Bitboard,
    /// Opponent pieces giving check.
    checkers: Bitboard,
    /// Our pieces that are the only blocker between our king and an opponent
    /// slider.
    pins: Bitboard,
    safe_king_squares: Bitboard,
}

impl AttackInfo {
    fn new(position: &Position, tables: &AttackTables, king: Square) -> Self {
        let they = position.side_to_move().opponent();
        let (our_pieces, their_pieces) = (position.pieces(they.opponent()), position.pieces(they));
        let occupancy = position.occupancy();

        let mut attacks = Bitboard::empty();
        let occupancy_without_king = occupancy - king;
        for kind in PieceKind::ALL {
            let piece = Piece::new(they, kind);
            for square in their_pieces.bitboard_for(kind).iter() {
                attacks |= tables.attacks(piece, square, occupancy_without_king);
            }
        }

        let checkers = attackers(tables, king, occupancy, their_pieces, they);

        let mut pins = Bitboard::empty();
        let snipers = (tables.bishop_attacks(king, Bitboard::empty())
            & (their_pieces.bishops | their_pieces.queens))
            | (tables.rook_attacks(king, Bitboard::empty())
                & (their_pieces.rooks | their_pieces.queens));
        for sniper in snipers.iter() {
            let blockers = tables.between(king, sniper) & occupancy;
            if blockers.count() == 1 && (blockers & our_pieces.all()).has_any() {
                pins |= blockers;
            }
        }

        let safe_king_squares = tables.king_attacks(king) - our_pieces.all() - attacks;

        Self {
            attacks,
            checkers,
            pins,
            safe_king_squares,
        }
    }
}

/// Pieces of the attacker targeting the square given the occupancy.
#[must_use]
pub fn attackers(
    tables: &AttackTables,
    square: Square,
    occupancy: Bitboard,
    pieces: &Pieces,
    attacker: Player,
) -> Bitboard {
    // A pawn of the attacker hits the square iff our pawn standing on the
    // square would hit the attacker's pawn.
    (tables.pawn_attacks(square, attacker.opponent()) & pieces.pawns)
        | (tables.knight_attacks(square) & pieces.knights)
        | (tables.king_attacks(square) & pieces.king)
        | (tables.bishop_attacks(square, occupancy) & (pieces.bishops | pieces.queens))
        | (tables.rook_attacks(square, occupancy) & (pieces.rooks | pieces.queens))
}

/// Produces a list of legal moves (i.e. the moves that do not leave the King in
/// check).
///
/// The position is expected to be valid (see [`Position::validate`]): the
/// result is unspecified otherwise.
///
/// This is a performance and correctness-critical path: every modification
/// should be benchmarked and carefully tested.
#[must_use]
pub fn legal_moves(position: &Position, tables: &AttackTables) -> MoveList {
    let mut moves = MoveList::new();
    let us = position.side_to_move();
    let they = us.opponent();
    let (our_pieces, their_pieces) = (position.pieces(us), position.pieces(they));
    debug_assert_eq!(our_pieces.king.count(), 1, "{position}");
    let Some(king) = our_pieces.king.first() else {
        return moves;
    };
    let attack_info = AttackInfo::new(position, tables, king);
    let occupancy = position.occupancy();
    let (our_occupancy, their_occupancy) = (our_pieces.all(), their_pieces.all());

    // Moving the king to safety is always correct regardless of the checks.
    for safe_square in attack_info.safe_king_squares.iter() {
        moves.push(Move::new(king, safe_square, None));
    }
    // If there are checks, the moves are restricted to resolving them.
    let check_mask = match attack_info.checkers.count() {
        0 => Bitboard::full(),
        // Capture the checker or block the ray. The ray is empty for knights
        // and pawns.
        1 => {
            let checker = attack_info.checkers.as_square();
            attack_info.checkers | tables.between(king, checker)
        },
        // Double checks can only be evaded by the king moves to safety: no
        // need to consider other moves.
        _ => return moves,
    };
    // Pinned pieces can only move along the line connecting them to the king.
    let allowed = |from: Square, to: Square| {
        check_mask.contains(to)
            && (!attack_info.pins.contains(from) || tables.line(king, from).contains(to))
    };

    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
    ] {
        let piece = Piece::new(us, kind);
        for from in our_pieces.bitboard_for(kind).iter() {
            let targets = tables.attacks(piece, from, occupancy) - our_occupancy;
            for to in targets.iter() {
                if allowed(from, to) {
                    moves.push(Move::new(from, to, None));
                }
            }
        }
    }

    let promotion_rank = Rank::backrank(they);
    let add_pawn_moves = |moves: &mut MoveList, from: Square, to: Square| {
        if to.rank() == promotion_rank {
            for promotion in Promotion::ALL {
                moves.push(Move::new(from, to, Some(promotion)));
            }
        } else {
            moves.push(Move::new(from, to, None));
        }
    };
    // Regular pawn pushes.
    let push_direction = us.push_direction();
    let pawn_pushes = our_pieces.pawns.shift(push_direction) - occupancy;
    let original_squares = pawn_pushes.shift(push_direction.opposite());
    for (from, to) in itertools::zip(original_squares.iter(), pawn_pushes.iter()) {
        if allowed(from, to) {
            add_pawn_moves(&mut moves, from, to);
        }
    }
    // Double pawn pushes are never promoting.
    let third_rank = Rank::pawns_starting(us).mask().shift(push_direction);
    let double_pushes = (pawn_pushes & third_rank).shift(push_direction) - occupancy;
    let original_squares = double_pushes
        .shift(push_direction.opposite())
        .shift(push_direction.opposite());
    for (from, to) in itertools::zip(original_squares.iter(), double_pushes.iter()) {
        if allowed(from, to) {
            moves.push(Move::new(from, to, None));
        }
    }
    // Captures.
    for from in our_pieces.pawns.iter() {
        for to in (tables.pawn_attacks(from, us) & their_occupancy).iter() {
            if allowed(from, to) {
                add_pawn_moves(&mut moves, from, to);
            }
        }
    }

    // En passant can expose the king along the rank through both pawns, which
    // the pins do not account for: simulate the capture instead.
    if let Some(en_passant_square) = position.en_passant_square() {
        if let Some(captured) = en_passant_square.shift(they.push_direction()) {
            if their_pieces.pawns.contains(captured) {
                let candidates = tables.pawn_attacks(en_passant_square, they) & our_pieces.pawns;
                for from in candidates.iter() {
                    let occupancy_after = (occupancy - from - captured) | en_passant_square;
                    let checks =
                        attackers(tables, king, occupancy_after, their_pieces, they) - captured;
                    if checks.is_empty() {
                        moves.push(Move::new(from, en_passant_square, None));
                    }
                }
            }
        }
    }

    if attack_info.checkers.is_empty() {
        generate_castles(position, &attack_info, king, &mut moves);
    }
    moves
}

/// Castling is encoded as the king moving two squares towards the rook.
fn generate_castles(
    position: &Position,
    attack_info: &AttackInfo,
    king: Square,
    moves: &mut MoveList,
) {
    let us = position.side_to_move();
    let backrank = Rank::backrank(us);
    if king != Square::new(File::E, backrank) {
        return;
    }
    let occupancy = position.occupancy();
    let rank_mask = backrank.mask();
    let short_walk = (File::F.mask() | File::G.mask()) & rank_mask;
    let long_walk = (File::C.mask() | File::D.mask()) & rank_mask;
    for (rights, rook, must_be_empty, must_be_safe, destination) in [
        (
            CastleRights::short(us),
            File::H,
            short_walk,
            short_walk,
            File::G,
        ),
        (
            CastleRights::long(us),
            File::A,
            long_walk | (File::B.mask() & rank_mask),
            long_walk,
            File::C,
        ),
    ] {
        if position.castling().contains(rights)
            && position.pieces(us).rooks.contains(Square::new(rook, backrank))
            && (occupancy & must_be_empty).is_empty()
            && (attack_info.attacks & must_be_safe).is_empty()
        {
            moves.push(Move::new(king, Square::new(destination, backrank), None));
        }
    }
}

/// Checks whether the move is one of the [`legal_moves`].
#[must_use]
pub fn is_legal_move(position: &Position, tables: &AttackTables, candidate: Move) -> bool {
    legal_moves(position, tables).contains(&candidate)
}

/// Whether the king of the side to move is attacked.
#[must_use]
pub fn in_check(position: &Position, tables: &AttackTables) -> bool {
    let us = position.side_to_move();
    let they = us.opponent();
    position.pieces(us).king.first().is_some_and(|king| {
        attackers(
            tables,
            king,
            position.occupancy(),
            position.pieces(they),
            they,
        )
        .has_any()
    })
}

/// Returns the outcome if the game is over, i.e. there are no legal moves.
#[must_use]
pub fn outcome(position: &Position, tables: &AttackTables) -> Option<Outcome> {
    if !legal_moves(position, tables).is_empty() {
        return None;
    }
    if in_check(position, tables) {
        Some(Outcome::Checkmate)
    } else {
        Some(Outcome::Stalemate)
    }
}
