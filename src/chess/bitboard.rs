//! [`Bitboard`]-based representation for [`crate::chess::position::Position`].
//! Bitboard utilizes the fact that modern processors operate on 64 bit
//! integers, and the bit operations can be performed simultaneously. This
//! results in very efficient calculation of possible attack vectors.
//!
//! The board is piece-centric: each of the 12 pieces (6 kinds for each
//! player) is stored as a set of squares. Answering "which piece is on this
//! square" is the slow operation in this representation and should be avoided
//! on the hot path.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt::{self, Write};
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not, Sub, SubAssign};

use itertools::Itertools;

use crate::chess::core::{Direction, File, Piece, PieceKind, Player, Rank, Square};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the chess
/// board.
///
/// Mirroring [`Square`] semantics, the least significant bit corresponds to
/// A1, and the most significant bit - to H8.
///
/// Bitboard is a thin wrapper around [u64].
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs Bitboard from pre-calculated bits.
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self { bits }
    }

    /// Constructs a bitboard representing empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self::from_bits(0)
    }

    /// Constructs a bitboard representing the universal set, it contains all
    /// squares by setting all bits to binary one.
    #[must_use]
    pub const fn full() -> Self {
        Self::from_bits(u64::MAX)
    }

    /// Returns raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    #[must_use]
    pub fn from_squares(squares: &[Square]) -> Self {
        squares
            .iter()
            .fold(Self::empty(), |result, square| result | Self::from(*square))
    }

    /// Returns true if this bitboard contains given square.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square as u8)) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    #[must_use]
    pub const fn has_any(self) -> bool {
        self.bits != 0
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    /// Converts a bitboard with exactly one square set into that square.
    #[must_use]
    pub const fn as_square(self) -> Square {
        debug_assert!(self.bits.count_ones() == 1);
        Square::from_index(self.bits.trailing_zeros() as u8)
    }

    /// Returns the least significant square of the set, if any.
    #[must_use]
    pub fn first(self) -> Option<Square> {
        self.iter().next()
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Moves every square of the set one step towards the direction. Squares
    /// that would leave the board (including wrapping around the A and H
    /// files) are dropped.
    #[must_use]
    pub const fn shift(self, direction: Direction) -> Self {
        const NOT_A_FILE: u64 = !0x0101_0101_0101_0101;
        const NOT_H_FILE: u64 = !0x8080_8080_8080_8080;
        let bits = self.bits;
        Self::from_bits(match direction {
            Direction::Up => bits << 8,
            Direction::Down => bits >> 8,
            Direction::Left => (bits & NOT_A_FILE) >> 1,
            Direction::Right => (bits & NOT_H_FILE) << 1,
            Direction::UpLeft => (bits & NOT_A_FILE) << 7,
            Direction::UpRight => (bits & NOT_H_FILE) << 9,
            Direction::DownLeft => (bits & NOT_A_FILE) >> 9,
            Direction::DownRight => (bits & NOT_H_FILE) >> 7,
        })
    }

    /// Mirrors the set vertically: rank 1 becomes rank 8 and vice versa.
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Self::from_bits(self.bits.swap_bytes())
    }
}

impl fmt::Debug for Bitboard {
    /// Dumps the set as an 8x8 grid with rank 8 on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = Rank::iter()
            .rev()
            .map(|rank| {
                File::iter()
                    .map(|file| {
                        if self.contains(Square::new(file, rank)) {
                            '1'
                        } else {
                            '.'
                        }
                    })
                    .join(SQUARE_SEPARATOR)
            })
            .join(LINE_SEPARATOR);
        f.write_str(&dump)
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits | rhs.bits)
    }
}

impl BitOr<Square> for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Square) -> Self::Output {
        self | Self::from(rhs)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl BitOrAssign<Square> for Bitboard {
    fn bitor_assign(&mut self, rhs: Square) {
        *self |= Self::from(rhs);
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits & rhs.bits)
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.bits &= rhs.bits;
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self::from_bits(self.bits ^ rhs.bits)
    }
}

impl BitXorAssign for Bitboard {
    fn bitxor_assign(&mut self, rhs: Self) {
        self.bits ^= rhs.bits;
    }
}

impl Sub for Bitboard {
    type Output = Self;

    /// [Relative component], i.e. Result = LHS \ RHS.
    ///
    /// [Relative component]: https://en.wikipedia.org/wiki/Complement_%28set_theory%29#Relative_complement
    fn sub(self, rhs: Self) -> Self::Output {
        self & !rhs
    }
}

impl Sub<Square> for Bitboard {
    type Output = Self;

    fn sub(self, rhs: Square) -> Self::Output {
        self - Self::from(rhs)
    }
}

impl SubAssign for Bitboard {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl SubAssign<Square> for Bitboard {
    fn sub_assign(&mut self, rhs: Square) {
        *self = *self - rhs;
    }
}

impl Not for Bitboard {
    type Output = Self;

    /// Returns [complement
    /// set](https://en.wikipedia.org/wiki/Complement_%28set_theory%29) of Self,
    /// i.e. flipping the set squares to unset and vice versa.
    fn not(self) -> Self::Output {
        Self::from_bits(!self.bits)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self::from_bits(1u64 << square as u8)
    }
}

/// Iterates over set squares in a given [Bitboard] from least significant 1
/// bits (LS1B) to most significant 1 bits (MS1B) through implementing
/// [`BitScan`] forward operation.
///
/// [BitScan]: https://www.chessprogramming.org/BitScan
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let next_index = self.bits.trailing_zeros();
        // Reset LS1B.
        self.bits &= self.bits - 1;
        Some(Square::from_index(next_index as u8))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl ExactSizeIterator for BitboardIterator {}

/// Piece-centric representation of all material owned by one player. Uses
/// [Bitboard] to store a set of squares occupied by each piece kind.
#[derive(Copy, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub struct Pieces {
    pub king: Bitboard,
    pub queens: Bitboard,
    pub rooks: Bitboard,
    pub bishops: Bitboard,
    pub knights: Bitboard,
    pub pawns: Bitboard,
}

impl Pieces {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            king: Bitboard::empty(),
            queens: Bitboard::empty(),
            rooks: Bitboard::empty(),
            bishops: Bitboard::empty(),
            knights: Bitboard::empty(),
            pawns: Bitboard::empty(),
        }
    }

    #[must_use]
    pub fn new_white() -> Self {
        Self {
            king: Square::E1.into(),
            queens: Square::D1.into(),
            rooks: Bitboard::from_squares(&[Square::A1, Square::H1]),
            bishops: Bitboard::from_squares(&[Square::C1, Square::F1]),
            knights: Bitboard::from_squares(&[Square::B1, Square::G1]),
            pawns: Rank::Two.mask(),
        }
    }

    #[must_use]
    pub fn new_black() -> Self {
        Self::new_white().flip_vertical()
    }

    /// Mirrors every piece set vertically.
    #[must_use]
    pub const fn flip_vertical(self) -> Self {
        Self {
            king: self.king.flip_vertical(),
            queens: self.queens.flip_vertical(),
            rooks: self.rooks.flip_vertical(),
            bishops: self.bishops.flip_vertical(),
            knights: self.knights.flip_vertical(),
            pawns: self.pawns.flip_vertical(),
        }
    }

    /// All squares occupied by the player.
    #[must_use]
    pub fn all(&self) -> Bitboard {
        self.king | self.queens | self.rooks | self.bishops | self.knights | self.pawns
    }

    #[must_use]
    pub const fn bitboard_for(&self, kind: PieceKind) -> Bitboard {
        match kind {
            PieceKind::King => self.king,
            PieceKind::Queen => self.queens,
            PieceKind::Rook => self.rooks,
            PieceKind::Bishop => self.bishops,
            PieceKind::Knight => self.knights,
            PieceKind::Pawn => self.pawns,
        }
    }

    pub fn bitboard_for_mut(&mut self, kind: PieceKind) -> &mut Bitboard {
        match kind {
            PieceKind::King => &mut self.king,
            PieceKind::Queen => &mut self.queens,
            PieceKind::Rook => &mut self.rooks,
            PieceKind::Bishop => &mut self.bishops,
            PieceKind::Knight => &mut self.knights,
            PieceKind::Pawn => &mut self.pawns,
        }
    }

    #[must_use]
    pub fn at(&self, square: Square) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.bitboard_for(*kind).contains(square))
    }
}

/// Piece-centric implementation of the chess board: 12 mutually exclusive
/// bitboards, one per piece.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Board {
    white_pieces: Pieces,
    black_pieces: Pieces,
}

impl Board {
    #[must_use]
    pub fn starting() -> Self {
        Self {
            white_pieces: Pieces::new_white(),
            black_pieces: Pieces::new_black(),
        }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            white_pieces: Pieces::empty(),
            black_pieces: Pieces::empty(),
        }
    }

    #[must_use]
    pub const fn player_pieces(&self, player: Player) -> &Pieces {
        match player {
            Player::White => &self.white_pieces,
            Player::Black => &self.black_pieces,
        }
    }

    pub fn player_pieces_mut(&mut self, player: Player) -> &mut Pieces {
        match player {
            Player::White => &mut self.white_pieces,
            Player::Black => &mut self.black_pieces,
        }
    }

    /// All occupied squares.
    #[must_use]
    pub fn occupancy(&self) -> Bitboard {
        self.white_pieces.all() | self.black_pieces.all()
    }

    // This is slow for the piece-centric representation: avoid calling it in
    // hot loops.
    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        if let Some(kind) = self.white_pieces.at(square) {
            return Some(Piece::new(Player::White, kind));
        }
        self.black_pieces
            .at(square)
            .map(|kind| Piece::new(Player::Black, kind))
    }
}

impl fmt::Display for Board {
    /// Prints board representation in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0u8;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                const RANK_SEPARATOR: char = '/';
                f.write_char(RANK_SEPARATOR)?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Board {
    /// Dumps the board in a simple format ('.' for empty square, FEN algebraic
    /// symbol for piece) a-la Stockfish "debug" command in UCI mode.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dump = Rank::iter()
            .rev()
            .map(|rank| {
                File::iter()
                    .map(|file| match self.at(Square::new(file, rank)) {
                        Some(piece) => piece.to_string(),
                        None => ".".to_string(),
                    })
                    .join(SQUARE_SEPARATOR)
            })
            .join(LINE_SEPARATOR);
        f.write_str(&dump)
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";
