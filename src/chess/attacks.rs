//! Mappings of occupied squares to the attacked squares for each piece. The
//! mappings are pre-calculated once in [`AttackTables::new`] to provide an
//! efficient way of generating moves:
//!
//! - Knight and king targets are looked up directly.
//! - Sliding pieces (bishops, rooks and queens) use [Magic Bitboards]: the
//!   occupancy of the squares relevant to the piece is hashed with a
//!   pre-calculated multiplier into an index of a shared attack table.
//! - Pawn pushes and captures depend on the owner: Black tables are the
//!   vertical mirror of White ones.
//!
//! [Magic Bitboards]: https://www.chessprogramming.org/Magic_Bitboards

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{Direction, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE};
use crate::chess::generated::{BISHOP_MAGICS, ROOK_MAGICS};

const SQUARES: usize = BOARD_SIZE as usize;
const BISHOP_TABLE_SIZE: usize = 5248;
const ROOK_TABLE_SIZE: usize = 102_400;

pub(super) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Everything needed to find an index of the sliding piece attacks for given
/// square and occupancy.
#[derive(Copy, Clone, Debug)]
struct Magic {
    mask: Bitboard,
    magic: u64,
    shift: u32,
    offset: usize,
}

impl Magic {
    const EMPTY: Self = Self {
        mask: Bitboard::empty(),
        magic: 0,
        shift: 0,
        offset: 0,
    };

    fn index(&self, occupancy: Bitboard) -> usize {
        let relevant = (occupancy & self.mask).bits();
        self.offset + (relevant.wrapping_mul(self.magic) >> self.shift) as usize
    }
}

/// Magic lookup structures of one sliding piece kind (bishop or rook) with the
/// attack sets of all squares packed into one table.
struct SlidingAttacks {
    magics: [Magic; SQUARES],
    attacks: Box<[Bitboard]>,
}

impl SlidingAttacks {
    /// Fills the table by enumerating every subset of every relevant
    /// occupancy mask.
    ///
    /// # Panics
    ///
    /// If any multiplier maps two subsets with different attacks onto the same
    /// entry or the table size does not match the sum of per-square sizes.
    fn new(multipliers: &[u64; SQUARES], directions: [Direction; 4], table_size: usize) -> Self {
        let mut magics = [Magic::EMPTY; SQUARES];
        let mut attacks = vec![Bitboard::empty(); table_size];
        let mut filled = vec![false; table_size];
        let mut offset = 0;
        for square in Square::iter() {
            let mask = relevant_occupancy(square, directions);
            let magic = Magic {
                mask,
                magic: multipliers[square.index()],
                shift: u64::BITS - mask.count(),
                offset,
            };
            // Carry-Rippler enumeration of all subsets of the mask.
            let mut subset = Bitboard::empty();
            loop {
                let index = magic.index(subset);
                let expected = sliding_attacks(square, directions, subset);
                assert!(
                    !filled[index] || attacks[index] == expected,
                    "destructive magic collision for {square}"
                );
                attacks[index] = expected;
                filled[index] = true;
                subset = Bitboard::from_bits(subset.bits().wrapping_sub(mask.bits()) & mask.bits());
                if subset.is_empty() {
                    break;
                }
            }
            magics[square.index()] = magic;
            offset += 1 << mask.count();
        }
        assert_eq!(offset, table_size, "unexpected sliding attacks table size");
        Self {
            magics,
            attacks: attacks.into_boxed_slice(),
        }
    }

    fn get(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.attacks[self.magics[square.index()].index(occupancy)]
    }
}

/// Pre-calculated attack and ray tables. The tables are built once and are
/// immutable afterwards, so they can be shared between threads by reference.
///
/// ```
/// use magpie::chess::attacks::AttackTables;
/// use magpie::chess::bitboard::Bitboard;
/// use magpie::chess::core::Square;
///
/// let tables = AttackTables::new();
/// assert_eq!(tables.knight_attacks(Square::A1).count(), 2);
/// assert_eq!(tables.rook_attacks(Square::A1, Bitboard::empty()).count(), 14);
/// assert_eq!(tables.between(Square::A1, Square::A4).count(), 2);
/// ```
pub struct AttackTables {
    /// Squares a piece can move to from the square on an empty board, indexed
    /// by [`Piece::index`].
    targets: [[Bitboard; SQUARES]; Piece::COUNT],
    /// Squares attacked by a pawn of the player, indexed by player.
    pawn_attacks: [[Bitboard; SQUARES]; 2],
    bishops: SlidingAttacks,
    rooks: SlidingAttacks,
    between: Box<[Bitboard]>,
    lines: Box<[Bitboard]>,
}

impl AttackTables {
    /// Builds all tables. This takes a noticeable amount of time and should be
    /// done once per program.
    #[must_use]
    pub fn new() -> Self {
        let bishops = SlidingAttacks::new(&BISHOP_MAGICS, Direction::DIAGONAL, BISHOP_TABLE_SIZE);
        let rooks = SlidingAttacks::new(&ROOK_MAGICS, Direction::ORTHOGONAL, ROOK_TABLE_SIZE);

        let mut white_pawn_attacks = [Bitboard::empty(); SQUARES];
        for square in Square::iter() {
            white_pawn_attacks[square.index()] = pawn_captures(square);
        }
        let pawn_attacks = [white_pawn_attacks, mirror(&white_pawn_attacks)];

        let mut targets = [[Bitboard::empty(); SQUARES]; Piece::COUNT];
        for kind in PieceKind::ALL {
            let mut white = [Bitboard::empty(); SQUARES];
            for square in Square::iter() {
                white[square.index()] = match kind {
                    PieceKind::Pawn => white_pawn_targets(square),
                    PieceKind::Knight => step_targets(square, &KNIGHT_DELTAS),
                    PieceKind::King => step_targets(square, &KING_DELTAS),
                    PieceKind::Bishop => bishops.get(square, Bitboard::empty()),
                    PieceKind::Rook => rooks.get(square, Bitboard::empty()),
                    PieceKind::Queen => {
                        bishops.get(square, Bitboard::empty()) | rooks.get(square, Bitboard::empty())
                    },
                };
            }
            targets[Piece::new(Player::Black, kind).index()] = mirror(&white);
            targets[Piece::new(Player::White, kind).index()] = white;
        }

        let mut between = vec![Bitboard::empty(); SQUARES * SQUARES];
        let mut lines = vec![Bitboard::empty(); SQUARES * SQUARES];
        for from in Square::iter() {
            for to in Square::iter() {
                if from == to {
                    continue;
                }
                let index = from.index() * SQUARES + to.index();
                for sliders in [&bishops, &rooks] {
                    if sliders.get(from, Bitboard::empty()).contains(to) {
                        between[index] = sliders.get(from, to.into()) & sliders.get(to, from.into());
                        lines[index] = (sliders.get(from, Bitboard::empty())
                            & sliders.get(to, Bitboard::empty()))
                            | from
                            | to;
                    }
                }
            }
        }

        Self {
            targets,
            pawn_attacks,
            bishops,
            rooks,
            between: between.into_boxed_slice(),
            lines: lines.into_boxed_slice(),
        }
    }

    /// Squares attacked by the piece standing on the square. Pawns attack
    /// diagonally and sliding pieces are blocked by the occupancy.
    #[must_use]
    pub fn attacks(&self, piece: Piece, square: Square, occupancy: Bitboard) -> Bitboard {
        match piece.kind {
            PieceKind::Pawn => self.pawn_attacks(square, piece.owner),
            PieceKind::Knight => self.knight_attacks(square),
            PieceKind::King => self.king_attacks(square),
            PieceKind::Bishop => self.bishop_attacks(square, occupancy),
            PieceKind::Rook => self.rook_attacks(square, occupancy),
            PieceKind::Queen => self.queen_attacks(square, occupancy),
        }
    }

    /// Squares the piece could reach from the square on an empty board. For
    /// pawns this includes pushes (double push from the starting rank) and
    /// captures.
    #[must_use]
    pub fn targets(&self, piece: Piece, square: Square) -> Bitboard {
        self.targets[piece.index()][square.index()]
    }

    /// Squares attacked by a pawn of the player standing on the square.
    #[must_use]
    pub fn pawn_attacks(&self, square: Square, player: Player) -> Bitboard {
        self.pawn_attacks[player as usize][square.index()]
    }

    #[must_use]
    pub fn knight_attacks(&self, square: Square) -> Bitboard {
        self.targets[Piece::new(Player::White, PieceKind::Knight).index()][square.index()]
    }

    #[must_use]
    pub fn king_attacks(&self, square: Square) -> Bitboard {
        self.targets[Piece::new(Player::White, PieceKind::King).index()][square.index()]
    }

    #[must_use]
    pub fn bishop_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.bishops.get(square, occupancy)
    }

    #[must_use]
    pub fn rook_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.rooks.get(square, occupancy)
    }

    #[must_use]
    pub fn queen_attacks(&self, square: Square, occupancy: Bitboard) -> Bitboard {
        self.bishop_attacks(square, occupancy) | self.rook_attacks(square, occupancy)
    }

    /// Squares strictly between two squares on the same rank, file or
    /// diagonal. Empty if the squares are not aligned.
    #[must_use]
    pub fn between(&self, from: Square, to: Square) -> Bitboard {
        self.between[from.index() * SQUARES + to.index()]
    }

    /// The whole line (from edge to edge) passing through both squares. Empty
    /// if the squares are not aligned.
    #[must_use]
    pub fn line(&self, from: Square, to: Square) -> Bitboard {
        self.lines[from.index() * SQUARES + to.index()]
    }
}

impl Default for AttackTables {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives Black tables from White ones: the square and the result are both
/// flipped vertically.
fn mirror(white: &[Bitboard; SQUARES]) -> [Bitboard; SQUARES] {
    let mut black = [Bitboard::empty(); SQUARES];
    for square in Square::iter() {
        black[square.index()] = white[square.flip().index()].flip_vertical();
    }
    black
}

fn step_targets(square: Square, deltas: &[(i8, i8)]) -> Bitboard {
    deltas
        .iter()
        .filter_map(|&(d_file, d_rank)| square.offset(d_file, d_rank))
        .fold(Bitboard::empty(), |targets, target| targets | target)
}

fn pawn_captures(square: Square) -> Bitboard {
    step_targets(square, &[(-1, 1), (1, 1)])
}

fn white_pawn_targets(square: Square) -> Bitboard {
    match square.rank() {
        Rank::One | Rank::Eight => Bitboard::empty(),
        Rank::Two => pawn_captures(square) | step_targets(square, &[(0, 1), (0, 2)]),
        _ => pawn_captures(square) | step_targets(square, &[(0, 1)]),
    }
}

/// Casts rays from the square until they hit an occupied square (inclusive)
/// or leave the board.
fn sliding_attacks(square: Square, directions: [Direction; 4], occupancy: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::empty();
    for direction in directions {
        let mut current = square;
        while let Some(next) = current.shift(direction) {
            attacks |= next;
            if occupancy.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

/// Squares whose occupancy changes the attacks of a slider: the rays without
/// their last square.
fn relevant_occupancy(square: Square, directions: [Direction; 4]) -> Bitboard {
    let mut mask = Bitboard::empty();
    for direction in directions {
        let mut current = square;
        while let Some(next) = current.shift(direction) {
            if next.shift(direction).is_none() {
                break;
            }
            mask |= next;
            current = next;
        }
    }
    mask
}
