// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fs::File, path::PathBuf};

use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, prelude::*, EnvFilter, FmtSubscriber};
use warden::{
    eval::Weights,
    game::{Game, Status},
    tracing::record::GameRecordLayer,
};

/// Plays a sequence of moves from the starting position and lists the legal moves of the side to move.
#[derive(Debug, StructOpt)]
struct Options {
    /// Moves to play from the starting position, in UCI notation (e.g. e2e4 e7e5 g1f3).
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
    /// File to write a game record to, one JSON event per line.
    #[structopt(long)]
    record: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Options::from_args();
    if let Some(ref record) = args.record {
        let file = File::create(record)?;
        tracing_subscriber::registry()
            .with(GameRecordLayer::new(file))
            .init();
    } else {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(LevelFilter::INFO)
            .with_env_filter(EnvFilter::from_env("WARDEN_LOG"))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let mut game = Game::new(Weights::default());
    for mov in &args.moves {
        game.make_uci_move(mov)?;
    }

    print!("{}", game.board());
    match game.status() {
        Status::Checkmate(color) => println!("{} is checkmated", color),
        Status::Stalemate => println!("stalemate"),
        Status::Ongoing => {
            for mov in game.legal_moves() {
                println!("{}", mov.as_uci());
            }
        }
    }

    Ok(())
}
