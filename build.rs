//! Retrieves information about the version of the crate from Git and the build
//! environment and searches for the [magic] constants used to index sliding
//! piece attack tables. Both are written to files in the output directory and
//! are accessed at compile time by the crate.
//!
//! [magic]: https://www.chessprogramming.org/Magic_Bitboards

use std::path::Path;
use std::{env, fs};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BOARD_WIDTH: i32 = 8;
const BOARD_SIZE: i32 = BOARD_WIDTH * BOARD_WIDTH;

/// Fixed seed keeps the generated constants identical between builds.
const SEED: u64 = 0x6d61_6770_6965;

const BISHOP_DIRECTIONS: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const ROOK_DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn generate_file(filename: &str, contents: &str) {
    let out_dir = env::var_os("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join(filename);
    fs::write(dest_path, contents).unwrap();
}

fn generate_build_info() {
    let features = format!(
        "{}bmi2",
        if cfg!(target_feature = "bmi2") {
            "+"
        } else {
            "-"
        }
    );
    generate_file("features", &features);
}

fn is_within_board(file: i32, rank: i32) -> bool {
    (0..BOARD_WIDTH).contains(&file) && (0..BOARD_WIDTH).contains(&rank)
}

fn to_bit(file: i32, rank: i32) -> u64 {
    1 << (file + rank * BOARD_WIDTH)
}

/// Casts rays from the square until they hit an occupied square (inclusive)
/// or leave the board.
fn sliding_attacks(square: i32, directions: &[(i32, i32)], occupancy: u64) -> u64 {
    let (file, rank) = (square % BOARD_WIDTH, square / BOARD_WIDTH);
    let mut attacks = 0;
    for (d_file, d_rank) in directions {
        let (mut file, mut rank) = (file + d_file, rank + d_rank);
        while is_within_board(file, rank) {
            attacks |= to_bit(file, rank);
            if occupancy & to_bit(file, rank) != 0 {
                break;
            }
            file += d_file;
            rank += d_rank;
        }
    }
    attacks
}

/// Squares whose occupancy affects the attacks: the rays without the last
/// square on each of them.
fn relevant_occupancy(square: i32, directions: &[(i32, i32)]) -> u64 {
    let (file, rank) = (square % BOARD_WIDTH, square / BOARD_WIDTH);
    let mut mask = 0;
    for (d_file, d_rank) in directions {
        let (mut file, mut rank) = (file + d_file, rank + d_rank);
        while is_within_board(file + d_file, rank + d_rank) {
            mask |= to_bit(file, rank);
            file += d_file;
            rank += d_rank;
        }
    }
    mask
}

/// Tries random sparse candidates until one maps every occupancy subset of
/// the mask to an index without destructive collisions.
fn find_magic(square: i32, directions: &[(i32, i32)], rng: &mut StdRng) -> u64 {
    let mask = relevant_occupancy(square, directions);
    let bits = mask.count_ones();
    let shift = 64 - bits;
    let mut subsets = Vec::with_capacity(1 << bits);
    let mut subset = 0u64;
    loop {
        subsets.push((subset, sliding_attacks(square, directions, subset)));
        subset = subset.wrapping_sub(mask) & mask;
        if subset == 0 {
            break;
        }
    }
    let mut table: Vec<Option<u64>> = vec![None; 1 << bits];
    loop {
        let magic = rng.r#gen::<u64>() & rng.r#gen::<u64>() & rng.r#gen::<u64>();
        if (mask.wrapping_mul(magic) & 0xFF00_0000_0000_0000).count_ones() < 6 {
            continue;
        }
        table.fill(None);
        let valid = subsets.iter().all(|&(subset, attacks)| {
            let index = (subset.wrapping_mul(magic) >> shift) as usize;
            match table[index] {
                Some(existing) => existing == attacks,
                None => {
                    table[index] = Some(attacks);
                    true
                },
            }
        });
        if valid {
            return magic;
        }
    }
}

fn generate_magics(filename: &str, directions: &[(i32, i32)], rng: &mut StdRng) {
    let magics: Vec<String> = (0..BOARD_SIZE)
        .map(|square| format!("{:#018x}", find_magic(square, directions, rng)))
        .collect();
    generate_file(filename, &format!("[\n{},\n]", magics.join(",\n")));
}

fn main() -> shadow_rs::SdResult<()> {
    generate_build_info();
    let mut rng = StdRng::seed_from_u64(SEED);
    generate_magics("bishop_magics", &BISHOP_DIRECTIONS, &mut rng);
    generate_magics("rook_magics", &ROOK_DIRECTIONS, &mut rng);
    shadow_rs::new()
}
