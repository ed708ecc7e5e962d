//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};
use std::mem;

use anyhow::bail;
use itertools::Itertools;

use crate::chess::bitboard::Bitboard;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Represents any kind of a legal chess move. The move is packed into 16 bits
/// and has one-to-one correspondence with the UCI move representation:
///
/// | Bits   | Meaning                                              |
/// | ------ | ---------------------------------------------------- |
/// | 0..6   | Source square                                        |
/// | 6..12  | Destination square                                   |
/// | 12..15 | Promotion: 0 - none, 1 - N, 2 - B, 3 - R, 4 - Q      |
///
/// Castling is encoded as a king moving two files and en passant is a pawn
/// move to the en passant square: the position resolves both when the move is
/// applied.
///
/// ```
/// use magpie::chess::core::{Move, Promotion, Square};
///
/// let promotion = Move::new(Square::E7, Square::E8, Some(Promotion::Queen));
/// assert_eq!(promotion.from(), Square::E7);
/// assert_eq!(promotion.to(), Square::E8);
/// assert_eq!(promotion.to_string(), "e7e8q");
/// assert_eq!(std::mem::size_of::<Move>(), 2);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    bits: u16,
}

impl Move {
    const SQUARE_MASK: u16 = 0b11_1111;
    const TO_SHIFT: u16 = 6;
    const PROMOTION_SHIFT: u16 = 12;

    /// Packs the move. Promotions are only valid for moves onto the back
    /// ranks.
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        debug_assert!(promotion.is_none() || matches!(to.rank(), Rank::One | Rank::Eight));
        let promotion = match promotion {
            Some(promotion) => promotion as u16,
            None => 0,
        };
        Self {
            bits: from as u16 | (to as u16) << Self::TO_SHIFT | promotion << Self::PROMOTION_SHIFT,
        }
    }

    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_index((self.bits & Self::SQUARE_MASK) as u8)
    }

    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_index(((self.bits >> Self::TO_SHIFT) & Self::SQUARE_MASK) as u8)
    }

    #[must_use]
    pub const fn promotion(self) -> Option<Promotion> {
        match self.bits >> Self::PROMOTION_SHIFT {
            1 => Some(Promotion::Knight),
            2 => Some(Promotion::Bishop),
            3 => Some(Promotion::Rook),
            4 => Some(Promotion::Queen),
            _ => None,
        }
    }

    /// Returns the packed representation.
    #[must_use]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Parses a move in UCI long algebraic notation (e.g. "e2e4" or "a7a8q").
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not 4 or 5 ASCII characters or any of
    /// the squares or the promotion symbol can not be parsed.
    pub fn from_uci(input: &str) -> anyhow::Result<Self> {
        if !input.is_ascii() || !(4..=5).contains(&input.len()) {
            bail!("UCI move should be 4 or 5 ASCII characters, got '{input}'");
        }
        let from = Square::try_from(&input[0..2])?;
        let to = Square::try_from(&input[2..4])?;
        let promotion = match input[4..].chars().next() {
            Some(symbol) => Some(Promotion::try_from(symbol)?),
            None => None,
        };
        if promotion.is_some() && !matches!(to.rank(), Rank::One | Rank::Eight) {
            bail!("promotion is only possible on the back rank, got '{input}'");
        }
        Ok(Self::new(from, to, promotion))
    }
}

impl TryFrom<u16> for Move {
    type Error = anyhow::Error;

    /// Validates a raw packed move.
    fn try_from(bits: u16) -> anyhow::Result<Self> {
        let promotion = bits >> Self::PROMOTION_SHIFT;
        if promotion > Promotion::Queen as u16 {
            bail!("promotion bits should be within 0..=4, got {promotion}");
        }
        let candidate = Self { bits };
        if candidate.from() == candidate.to() {
            bail!("move source and destination should differ, got {}", candidate.from());
        }
        if candidate.promotion().is_some() && !matches!(candidate.to().rank(), Rank::One | Rank::Eight)
        {
            bail!("promotion is only possible on the back rank, got {candidate}");
        }
        Ok(candidate)
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promotion) = self.promotion() {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use magpie::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte and the absence of
/// a square costs nothing extra.
///
/// ```
/// use magpie::chess::core::Square;
/// use std::mem;
///
/// assert_eq!(mem::size_of::<Square>(), 1);
/// assert_eq!(mem::size_of::<Option<Square>>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::from_index(file as u8 + (rank as u8) * BOARD_WIDTH)
    }

    /// Only the lowest 6 bits of the index are used.
    pub(crate) const fn from_index(index: u8) -> Self {
        debug_assert!(index < BOARD_SIZE);
        unsafe { mem::transmute(index & (BOARD_SIZE - 1)) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Mirrors the square vertically: A1 becomes A8, E2 becomes E7.
    #[must_use]
    pub const fn flip(self) -> Self {
        Self::from_index(self as u8 ^ 0b11_1000)
    }

    /// Moves the square by given number of files and ranks. Returns [`None`]
    /// if the result falls off the board.
    #[must_use]
    pub fn offset(self, d_file: i8, d_rank: i8) -> Option<Self> {
        let file = self.file() as i8 + d_file;
        let rank = self.rank() as i8 + d_rank;
        let width = BOARD_WIDTH as i8;
        if (0..width).contains(&file) && (0..width).contains(&rank) {
            Some(Self::from_index((file + rank * width) as u8))
        } else {
            None
        }
    }

    /// Steps one square towards the direction.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (d_file, d_rank) = direction.delta();
        self.offset(d_file, d_rank)
    }

    /// Iterates over all squares from A1 to H8.
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE).map(Self::from_index)
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(Self::from_index(square_index)),
            _ => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    /// Returns a bitboard with all squares of the file set.
    #[must_use]
    pub const fn mask(self) -> Bitboard {
        Bitboard::from_bits(0x0101_0101_0101_0101 << self as u8)
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_WIDTH).map(|column| unsafe { mem::transmute::<u8, Self>(column) })
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    /// Returns a bitboard with all squares of the rank set.
    #[must_use]
    pub const fn mask(self) -> Bitboard {
        Bitboard::from_bits(0xFF << (self as u8 * BOARD_WIDTH))
    }

    /// The rank where player's pieces start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where player's pawns start.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    pub fn iter() -> impl DoubleEndedIterator<Item = Self> {
        (0..BOARD_WIDTH).map(|row| unsafe { mem::transmute::<u8, Self>(row) })
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White = 0,
    Black = 1,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the player's pawns advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PieceKind {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceKind {
    #[allow(missing_docs)]
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player.
///
/// Each of the 12 pieces has a unique index in `0..12` which is used to
/// address per-piece tables:
///
/// ```
/// use magpie::chess::core::{Piece, PieceKind, Player};
///
/// let piece = Piece::new(Player::Black, PieceKind::Rook);
/// assert_eq!(piece.index(), 9);
/// assert_eq!(Piece::try_from(9usize).unwrap(), piece);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    #[allow(missing_docs)]
    pub owner: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    /// Number of distinct pieces.
    pub const COUNT: usize = 12;

    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self { owner, kind }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.owner as usize * PieceKind::ALL.len() + self.kind as usize
    }

    /// Iterates over all pieces in the order of their indices.
    pub fn iter() -> impl Iterator<Item = Self> {
        [Player::White, Player::Black]
            .into_iter()
            .flat_map(|owner| PieceKind::ALL.into_iter().map(move |kind| Self::new(owner, kind)))
    }
}

impl TryFrom<usize> for Piece {
    type Error = anyhow::Error;

    fn try_from(index: usize) -> anyhow::Result<Self> {
        if index >= Self::COUNT {
            bail!("piece index should be in 0..{}, got {index}", Self::COUNT);
        }
        let owner = if index < PieceKind::ALL.len() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self::new(owner, PieceKind::ALL[index % PieceKind::ALL.len()]))
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            // White player: uppercase symbols.
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            // Black player: lowercase symbols.
            Player::Black => f.write_str(&symbol),
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured, player loses ability to castle its corresponding
    /// side.
    ///
    /// - When castling h-side (short), the king ends up on [`File::G`] and the
    ///   rook on [`File::F`]
    /// - When castling a-side (long), the king ends up on [`File::C`] and the
    ///   rook on [`File::D`]
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// FEN symbols in the canonical order.
    const SYMBOLS: [(char, Self); 4] = [
        ('K', Self::WHITE_SHORT),
        ('Q', Self::WHITE_LONG),
        ('k', Self::BLACK_SHORT),
        ('q', Self::BLACK_LONG),
    ];

    #[must_use]
    pub const fn short(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    #[must_use]
    pub const fn long(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format. The user
    /// is responsible for providing valid input cleaned up from the actual FEN
    /// chunk.
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if given pattern does not match
    ///
    /// [`CastleRights`] := "-" | (K)? (Q)? (k)? (q)?
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        let mut result = Self::empty();
        let mut symbols = Self::SYMBOLS.iter();
        for symbol in input.chars() {
            // Symbols have to come in the canonical order without repetition.
            match symbols.find(|(candidate, _)| *candidate == symbol) {
                Some((_, right)) => result |= *right,
                None => bail!("unknown castle rights: {input}"),
            }
        }
        if result.is_empty() {
            bail!("unknown castle rights: {input}");
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (symbol, right) in Self::SYMBOLS {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Promotion {
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
}

impl Promotion {
    #[allow(missing_docs)]
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of 'q', 'r', 'b', 'n', got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// Directions a bishop slides in.
    pub const DIAGONAL: [Self; 4] = [Self::UpLeft, Self::UpRight, Self::DownLeft, Self::DownRight];
    /// Directions a rook slides in.
    pub const ORTHOGONAL: [Self; 4] = [Self::Up, Self::Right, Self::Left, Self::Down];

    /// Change of (file, rank) after a single step.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }

    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::UpLeft => Self::DownRight,
            Self::Up => Self::Down,
            Self::UpRight => Self::DownLeft,
            Self::Right => Self::Left,
            Self::Left => Self::Right,
            Self::DownLeft => Self::UpRight,
            Self::Down => Self::Up,
            Self::DownRight => Self::UpLeft,
        }
    }
}
