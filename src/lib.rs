//! Chess rules core: board representation, [FEN] parsing and serialization,
//! position validation, legal move generation and [perft].
//!
//! The attack tables used by the move generator are built once with
//! [`chess::attacks::AttackTables::new`] and are then shared (by reference)
//! between all positions and threads.
//!
//! ```
//! use magpie::chess::attacks::AttackTables;
//! use magpie::chess::movegen;
//! use magpie::chess::position::Position;
//!
//! let tables = AttackTables::new();
//! let position = Position::starting();
//! assert_eq!(movegen::legal_moves(&position, &tables).len(), 20);
//! ```
//!
//! [FEN]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
//! [perft]: https://www.chessprogramming.org/Perft

pub mod chess;

use shadow_rs::shadow;

shadow!(build);

/// Build type and target. Produced by `build.rs`.
const FEATURES: &str = include_str!(concat!(env!("OUT_DIR"), "/features"));

/// Returns the full crate version that can be used to identify how it was
/// built in the first place.
fn engine_version() -> String {
    format!(
        "{} (commit {}, branch {})",
        build::PKG_VERSION,
        build::SHORT_COMMIT,
        build::BRANCH
    )
}

/// Prints information about the version on startup.
pub fn print_engine_info() {
    println!("Magpie chess move generator {}", engine_version());
}

/// Prints information the build type, features and whether the build is clean
/// on startup.
pub fn print_binary_info() {
    println!("Release build: {}", !shadow_rs::is_debug());
    println!("Features: {FEATURES}");
    if !shadow_rs::git_clean() {
        println!("Warning: built with uncommitted changes");
    }
    println!();
}
