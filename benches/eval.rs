// Copyright 2021-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warden::{
    board::Board,
    core::{Color, Piece, Square, D4, E5, E6, F8, G3, G6, H3, H4, H5},
    eval::{self, Weights},
    game::Game,
};

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("opening-eval", |b| {
        let mut game = Game::new(Weights::default());
        for mov in ["d2d4", "g8f6", "c2c4", "e7e6", "g1f3", "d7d5", "b1c3", "f8e7"] {
            game.make_uci_move(mov).unwrap();
        }

        b.iter(|| {
            let game = black_box(&game);
            eval::evaluate(game)
        });
    });

    c.bench_function("endgame-eval", |b| {
        let pieces: Vec<(Square, Piece)> = [
            (F8, 'Q'),
            (E6, 'k'),
            (G6, 'p'),
            (E5, 'p'),
            (H5, 'p'),
            (D4, 'r'),
            (H4, 'P'),
            (G3, 'K'),
            (H3, 'P'),
        ]
        .iter()
        .map(|&(sq, c)| (sq, Piece::from_symbol(c).unwrap()))
        .collect();
        let board = Board::with_pieces(&pieces, Color::White).unwrap();
        let game = Game::from_board(board, Weights::default()).unwrap();
        b.iter(|| {
            let game = black_box(&game);
            eval::evaluate(game)
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
