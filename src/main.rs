use std::io;
use std::io::prelude::*;

use itertools::Itertools;
use magpie::chess::attacks::AttackTables;
use magpie::chess::core::Move;
use magpie::chess::movegen;
use magpie::chess::perft;
use magpie::chess::position::Position;

fn main() -> anyhow::Result<()> {
    magpie::print_engine_info();
    magpie::print_binary_info();
    let tables = AttackTables::new();
    let mut position = Position::starting();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line == "quit" {
            break;
        } else if let Some(fen) = line.strip_prefix("position ") {
            let parsed = if fen == "startpos" {
                Ok(Position::starting())
            } else {
                Position::try_from(fen)
            };
            position = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    println!("Error reading the position: {e}");
                    continue;
                },
            };
        } else if line == "moves" {
            println!(
                "{}",
                movegen::legal_moves(&position, &tables).iter().join(" ")
            );
        } else if line == "d" {
            println!("{position:?}");
        } else if let Some(depth) = line.strip_prefix("perft ") {
            let depth = match depth.parse::<u8>() {
                Ok(depth) => depth,
                Err(e) => {
                    println!("Error reading the depth: {e}");
                    continue;
                },
            };
            let mut total = 0;
            for (next_move, nodes) in perft::divide(&position, &tables, depth) {
                println!("{next_move}: {nodes}");
                total += nodes;
            }
            if depth == 0 {
                total = 1;
            }
            println!("Nodes searched: {total}");
        } else if let Some(uci) = line.strip_prefix("move ") {
            let result = Move::from_uci(uci)
                .and_then(|next_move| position.try_make_move(next_move, &tables));
            if let Err(e) = result {
                println!("Error making the move: {e}");
            }
        } else if !line.is_empty() {
            println!("unknown command: {line}");
        }
    }
    Ok(())
}
