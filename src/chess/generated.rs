//! Magic multipliers for the sliding piece attack tables, found by the build
//! script.

use crate::chess::core::BOARD_SIZE;

pub(super) const BISHOP_MAGICS: [u64; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/bishop_magics"));
pub(super) const ROOK_MAGICS: [u64; BOARD_SIZE as usize] =
    include!(concat!(env!("OUT_DIR"), "/rook_magics"));
