// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{fs::File, io::BufReader, path::PathBuf};

use structopt::StructOpt;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};
use warden::{
    core::Color,
    eval::{self, Weights},
    game::Game,
};

/// Evaluates the position reached by a sequence of moves and prints every term of the evaluation.
#[derive(Debug, StructOpt)]
struct Options {
    /// Moves to play from the starting position, in UCI notation.
    #[structopt(name = "MOVES")]
    moves: Vec<String>,
    /// JSON file of aspect weights. Missing fields keep their defaults.
    #[structopt(long)]
    weights: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .with_env_filter(EnvFilter::from_env("WARDEN_LOG"))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Options::from_args();
    let weights: Weights = match args.weights {
        Some(ref path) => serde_json::from_reader(BufReader::new(File::open(path)?))?,
        None => Weights::default(),
    };

    let mut game = Game::new(weights);
    for mov in &args.moves {
        game.make_uci_move(mov)?;
    }

    let board = game.board();
    let white = game.side(Color::White).breakdown(board, game.side(Color::Black));
    let black = game.side(Color::Black).breakdown(board, game.side(Color::White));
    print!("{}", board);
    println!("{:<20} | {:>6} | {:>6} |", "Term", "White", "Black");
    println!("{:<20} | {:>6} | {:>6} |", "pieces", white.pieces, black.pieces);
    for (w, b) in white.aspects.iter().zip(&black.aspects) {
        println!("{:<20} | {:>6} | {:>6} |", w.kind.name(), w.weighted, b.weighted);
    }
    println!("{:<20} | {:>6} | {:>6} |", "total", white.total(), black.total());
    println!("{:<20} {}", "Evaluation:", eval::evaluate(&game));
    Ok(())
}
