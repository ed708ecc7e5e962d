//! [Perft] (performance test, move path enumeration) counts the leaf nodes of
//! the legal move tree of given depth. The numbers are well-known for many
//! positions, which makes perft the main correctness test of the move
//! generator.
//!
//! [Perft]: https://www.chessprogramming.org/Perft

use crate::chess::attacks::AttackTables;
use crate::chess::core::Move;
use crate::chess::movegen;
use crate::chess::position::Position;

/// Counts the leaf nodes of the move tree. The last level is not played out:
/// the number of legal moves is used directly ("bulk counting").
#[must_use]
pub fn perft(position: &Position, tables: &AttackTables, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = movegen::legal_moves(position, tables);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|&next_move| {
            let mut next_position = position.clone();
            next_position.make_move(next_move);
            perft(&next_position, tables, depth - 1)
        })
        .sum()
}

/// Splits the perft result by the first move. Useful for finding the
/// offending move when the total does not match a reference.
#[must_use]
pub fn divide(position: &Position, tables: &AttackTables, depth: u8) -> Vec<(Move, u64)> {
    if depth == 0 {
        return Vec::new();
    }
    movegen::legal_moves(position, tables)
        .iter()
        .map(|&next_move| {
            let mut next_position = position.clone();
            next_position.make_move(next_move);
            (next_move, perft(&next_position, tables, depth - 1))
        })
        .collect()
}
