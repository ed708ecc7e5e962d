//! Provides fully-specified [Chess Position] implementation: stores information
//! about the board and tracks the state of castling, 50-move rule draw, etc.
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::chess::attacks::{AttackTables, KNIGHT_DELTAS};
use crate::chess::bitboard::{Bitboard, Board, Pieces};
use crate::chess::core::{
    CastleRights,
    Direction,
    File,
    Move,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_WIDTH,
};
use crate::chess::movegen;

/// State of the chess game: board, half-move counters and castling rights,
/// etc. It has 1:1 relationship with [Forsyth-Edwards Notation] (FEN).
///
/// [`Position::try_from()`] provides a convenient interface for creating a
/// [`Position`]. It will clean up the input (trim newlines and whitespace) and
/// attempt to parse in either FEN or a version of [Extended Position
/// Description] (EPD). The EPD format does not support [Operations]: the
/// support exists for compatibility with databases which provide trimmed FEN
/// lines (all FEN parts except Halfmove Clock and Fullmove Counter).
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
/// [Extended Position Description]: https://www.chessprogramming.org/Extended_Position_Description
/// [Operations]: https://www.chessprogramming.org/Extended_Position_Description#Operations
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: Board,
    castling: CastleRights,
    side_to_move: Player,
    /// [Halfmove Clock][^ply] keeps track of the number of (half-)moves
    /// since the last capture or pawn move and is used to enforce
    /// fifty[^fifty]-move draw rule.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    /// [^ply]: "Half-move" or ["ply"](https://www.chessprogramming.org/Ply) means a move of only
    ///     one side.
    /// [^fifty]: 50 __full__ moves
    halfmove_clock: u8,
    fullmove_counter: NonZeroU16,
    en_passant_square: Option<Square>,
}

impl Position {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use magpie::chess::position::Position;
    ///
    /// let starting_position = Position::starting();
    /// assert_eq!(
    ///     &starting_position.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        Self {
            board: Board::starting(),
            castling: CastleRights::ALL,
            ..Self::empty()
        }
    }

    /// Creates a position without any pieces and rights. It is not a valid
    /// chess position and is meant to be filled with [`Position::put`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            board: Board::empty(),
            castling: CastleRights::empty(),
            side_to_move: Player::White,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
            en_passant_square: None,
        }
    }

    /// Restores the starting position: the standard piece layout, all
    /// castling rights, no en passant square and the initial clocks.
    pub fn reset(&mut self) {
        *self = Self::starting();
    }

    /// Places the piece on an empty square.
    pub fn put(&mut self, piece: Piece, square: Square) {
        debug_assert!(
            !self.occupancy().contains(square),
            "{square} is already occupied"
        );
        *self
            .board
            .player_pieces_mut(piece.owner)
            .bitboard_for_mut(piece.kind) |= square;
    }

    /// Removes the piece standing on the square and returns it.
    pub fn remove(&mut self, square: Square) -> Option<Piece> {
        let piece = self.at(square)?;
        *self
            .board
            .player_pieces_mut(piece.owner)
            .bitboard_for_mut(piece.kind) -= square;
        Some(piece)
    }

    #[must_use]
    pub fn at(&self, square: Square) -> Option<Piece> {
        self.board.at(square)
    }

    #[must_use]
    pub const fn pieces(&self, player: Player) -> &Pieces {
        self.board.player_pieces(player)
    }

    /// Squares occupied by pieces of the player.
    #[must_use]
    pub fn player_occupancy(&self, player: Player) -> Bitboard {
        self.pieces(player).all()
    }

    /// All occupied squares.
    #[must_use]
    pub fn occupancy(&self) -> Bitboard {
        self.board.occupancy()
    }

    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[must_use]
    pub const fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[must_use]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    /// Serializes the position in FEN format.
    #[must_use]
    pub fn fen(&self) -> String {
        self.to_string()
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Position::try_from`] for cleaning up the
    /// input if it is coming from untrusted source and is likely to contain
    /// extra symbols.
    ///
    /// # Errors
    ///
    /// Returns an error naming the malformed field or, if the input is well
    /// formed, the reason why the position can not occur in a game (see
    /// [`Position::validate`]).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement")
        };
        let mut ranks = Rank::iter().rev();
        for rank_fen in pieces_placement.split('/') {
            let Some(rank) = ranks.next() else {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            };
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        if file > BOARD_WIDTH {
                            bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen}");
                        }
                    },
                    _ => {
                        let piece = Piece::try_from(symbol)?;
                        if file >= BOARD_WIDTH {
                            bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen}");
                        }
                        result.put(piece, Square::new(File::try_from(file)?, rank));
                        file += 1;
                    },
                }
            }
            if file != BOARD_WIDTH {
                bail!("incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of length {file}");
            }
        }
        if ranks.next().is_some() {
            bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_square = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        result.halfmove_clock = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("halfmove clock can not contain anything other than digits");
                }
                value
                    .parse::<u8>()
                    .with_context(|| format!("incorrect FEN: halfmove clock can not be parsed {value}"))?
            },
            // This is a correct EPD: exit early.
            None => {
                result.validate()?;
                return Ok(result);
            },
        };
        result.fullmove_counter = match parts.next() {
            Some(value) => {
                if !value.bytes().all(|c| c.is_ascii_digit()) {
                    bail!("fullmove counter can not contain anything other than digits");
                }
                value.parse::<NonZeroU16>().with_context(|| {
                    format!("incorrect FEN: fullmove counter can not be parsed {value}")
                })?
            },
            None => bail!("incorrect FEN: missing fullmove counter"),
        };
        if parts.next().is_some() {
            bail!("trailing symbols are not allowed in FEN");
        }
        result.validate()?;
        Ok(result)
    }

    /// Checks that the position could occur in a game: the move generator
    /// relies on these properties.
    ///
    /// - Each side has exactly one king.
    /// - Each side has at most 8 pawns and no pawns are on the back ranks.
    /// - The en passant square (if any) is right behind a pawn that could have
    ///   just been pushed by the opponent.
    /// - There are at most 2 checks and, after a double pawn push, the checks
    ///   are consistent with that push.
    ///
    /// # Errors
    ///
    /// Returns the first violated property.
    pub fn validate(&self) -> anyhow::Result<()> {
        for player in [Player::White, Player::Black] {
            let pieces = self.pieces(player);
            let player_name = match player {
                Player::White => "white",
                Player::Black => "black",
            };
            if pieces.king.count() != 1 {
                bail!("expected 1 {player_name} king, got {}", pieces.king.count());
            }
            if pieces.pawns.count() > 8 {
                bail!("expected <= 8 {player_name} pawns, got {}", pieces.pawns.count());
            }
        }
        let pawns = self.pieces(Player::White).pawns | self.pieces(Player::Black).pawns;
        if (pawns & (Rank::One.mask() | Rank::Eight.mask())).has_any() {
            bail!("pawns can not be placed on backranks");
        }
        let us = self.side_to_move;
        let they = us.opponent();
        let king = self.pieces(us).king.as_square();
        let checkers = self.slow_attackers(king, they);
        if checkers.count() > 2 {
            bail!("expected <= 2 checks, got {}", checkers.count());
        }
        let Some(en_passant_square) = self.en_passant_square else {
            return Ok(());
        };
        let expected_rank = match us {
            Player::White => Rank::Six,
            Player::Black => Rank::Three,
        };
        if en_passant_square.rank() != expected_rank {
            bail!("expected en passant square to be on rank {expected_rank}, got {}", en_passant_square.rank());
        }
        let (Some(pushed_pawn), Some(original_square)) = (
            en_passant_square.shift(they.push_direction()),
            en_passant_square.shift(us.push_direction()),
        ) else {
            bail!("en passant square is not beyond pushed pawn");
        };
        if !self.pieces(they).pawns.contains(pushed_pawn)
            || self.occupancy().contains(en_passant_square)
            || self.occupancy().contains(original_square)
        {
            bail!("en passant square is not beyond pushed pawn");
        }
        if checkers.count() > 1 {
            bail!("more than 1 check after double pawn push is impossible");
        }
        if let Some(checker) = checkers.first() {
            if checker != pushed_pawn && !squares_between(checker, king).contains(original_square) {
                bail!(
                    "the only possible checks after double pawn push are either discovery \
                    targeting the original pawn square or the pushed pawn itself"
                );
            }
        }
        let their_pieces = self.pieces(they);
        let diagonal_sliders = their_pieces.bishops | their_pieces.queens;
        for direction in Direction::DIAGONAL {
            let mut blockers = ray(king, direction) & self.occupancy();
            // The pushed pawn is the closest blocker and the slider is right behind it.
            if closest(blockers, direction) == Some(pushed_pawn) {
                blockers -= pushed_pawn;
                if closest(blockers, direction).is_some_and(|square| diagonal_sliders.contains(square))
                {
                    bail!("doubly pushed pawn can not be the only blocker on a diagonal");
                }
            }
        }
        Ok(())
    }

    /// Pieces of the attacker targeting the square. Unlike the move generator,
    /// this walks the board square by square and does not need the attack
    /// tables.
    fn slow_attackers(&self, target: Square, attacker: Player) -> Bitboard {
        let pieces = self.pieces(attacker);
        let occupancy = self.occupancy();
        let mut attackers = Bitboard::empty();
        let pawn_rank = match attacker {
            Player::White => -1,
            Player::Black => 1,
        };
        for d_file in [-1, 1] {
            if let Some(square) = target.offset(d_file, pawn_rank) {
                if pieces.pawns.contains(square) {
                    attackers |= square;
                }
            }
        }
        for &(d_file, d_rank) in &KNIGHT_DELTAS {
            if let Some(square) = target.offset(d_file, d_rank) {
                if pieces.knights.contains(square) {
                    attackers |= square;
                }
            }
        }
        for (directions, sliders) in [
            (Direction::DIAGONAL, pieces.bishops | pieces.queens),
            (Direction::ORTHOGONAL, pieces.rooks | pieces.queens),
        ] {
            for direction in directions {
                if let Some(square) = target.shift(direction) {
                    if pieces.king.contains(square) {
                        attackers |= square;
                    }
                }
                if let Some(square) = closest(ray(target, direction) & occupancy, direction) {
                    if sliders.contains(square) {
                        attackers |= square;
                    }
                }
            }
        }
        attackers
    }

    /// Applies a legal move: handles captures, en passant, promotions,
    /// castling and updates the rights and clocks.
    ///
    /// The move has to be legal in this position (e.g. coming from
    /// [`movegen::legal_moves`]), otherwise the resulting position is
    /// unspecified. Use [`Position::try_make_move`] for untrusted input.
    pub fn make_move(&mut self, next_move: Move) {
        let us = self.side_to_move;
        let they = us.opponent();
        let (from, to) = (next_move.from(), next_move.to());
        let Some(piece) = self.remove(from) else {
            debug_assert!(false, "no piece to move on {from}");
            return;
        };
        debug_assert_eq!(piece.owner, us);
        let mut captured = self.remove(to).is_some();
        let en_passant_square = self.en_passant_square.take();
        match piece.kind {
            PieceKind::Pawn => {
                if Some(to) == en_passant_square {
                    if let Some(pushed_pawn) = to.shift(they.push_direction()) {
                        captured |= self.remove(pushed_pawn).is_some();
                    }
                }
                // Only record en passant square when it can actually be captured.
                if (to.rank() as i8 - from.rank() as i8).abs() == 2 {
                    let target = Bitboard::from(to);
                    let neighbours = target.shift(Direction::Left) | target.shift(Direction::Right);
                    if (neighbours & self.pieces(they).pawns).has_any() {
                        self.en_passant_square = from.shift(us.push_direction());
                    }
                }
            },
            PieceKind::King => {
                // Castling is encoded as the king moving two squares.
                let rook_hop = match (from.file(), to.file()) {
                    (File::E, File::G) => Some((File::H, File::F)),
                    (File::E, File::C) => Some((File::A, File::D)),
                    _ => None,
                };
                if let Some((rook_from, rook_to)) = rook_hop {
                    let backrank = Rank::backrank(us);
                    if let Some(rook) = self.remove(Square::new(rook_from, backrank)) {
                        self.put(rook, Square::new(rook_to, backrank));
                    }
                }
            },
            _ => (),
        }
        let kind = next_move.promotion().map_or(piece.kind, PieceKind::from);
        self.put(Piece::new(us, kind), to);

        for (square, rights) in [
            (Square::E1, CastleRights::WHITE_BOTH),
            (Square::H1, CastleRights::WHITE_SHORT),
            (Square::A1, CastleRights::WHITE_LONG),
            (Square::E8, CastleRights::BLACK_BOTH),
            (Square::H8, CastleRights::BLACK_SHORT),
            (Square::A8, CastleRights::BLACK_LONG),
        ] {
            if from == square || to == square {
                self.castling.remove(rights);
            }
        }

        if captured || piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        }
        if us == Player::Black {
            self.fullmove_counter = self.fullmove_counter.saturating_add(1);
        }
        self.side_to_move = they;
    }

    /// Applies the move only if it is legal in this position.
    ///
    /// # Errors
    ///
    /// Returns an error and leaves the position untouched if the move is not
    /// legal.
    pub fn try_make_move(&mut self, next_move: Move, tables: &AttackTables) -> anyhow::Result<()> {
        if !movegen::is_legal_move(self, tables, next_move) {
            bail!("illegal move {next_move} in position {self}");
        }
        self.make_move(next_move);
        Ok(())
    }
}

/// Empty-board ray from the square (exclusive) towards the direction.
fn ray(from: Square, direction: Direction) -> Bitboard {
    let mut result = Bitboard::empty();
    let mut current = from;
    while let Some(next) = current.shift(direction) {
        result |= next;
        current = next;
    }
    result
}

/// Squares strictly between two aligned squares; empty if they are not
/// aligned.
fn squares_between(from: Square, to: Square) -> Bitboard {
    for direction in Direction::DIAGONAL.into_iter().chain(Direction::ORTHOGONAL) {
        let towards = ray(from, direction);
        if towards.contains(to) {
            return towards - ray(to, direction) - to;
        }
    }
    Bitboard::empty()
}

/// The square closest to the ray origin when the set lies on a ray going
/// towards the direction.
fn closest(squares: Bitboard, direction: Direction) -> Option<Square> {
    match direction {
        Direction::Up | Direction::UpLeft | Direction::UpRight | Direction::Right => squares.first(),
        Direction::Down | Direction::DownLeft | Direction::DownRight | Direction::Left => {
            squares.iter().last()
        },
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Trims the input and parses it as FEN or EPD, optionally prefixed with
    /// "fen " or "epd ".
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Position {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", &self.board)?;
        write!(f, "{} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_square {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)?;
        Ok(())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?}", &self.board)?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_square)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {}", &self.to_string())?;
        Ok(())
    }
}
