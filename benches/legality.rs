// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use warden::{eval::Weights, game::Game};

fn play(moves: &[&str]) -> Game {
    let mut game = Game::new(Weights::default());
    for mov in moves {
        game.make_uci_move(mov).unwrap();
    }

    game
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("start-position-legality-pass", |b| {
        let mut game = Game::new(Weights::default());
        b.iter(|| {
            black_box(&mut game).legality_pass();
        });
    });

    c.bench_function("italian-legality-pass", |b| {
        let mut game = play(&[
            "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "c2c3", "g8f6", "d2d3", "d7d6", "e1g1",
            "e8g8",
        ]);
        b.iter(|| {
            black_box(&mut game).legality_pass();
        });
    });

    c.bench_function("quiet-move-clonemake", |b| {
        let game = play(&["e2e4", "e7e5"]);
        b.iter(|| {
            let mut game = black_box(&game).clone();
            game.make_uci_move(black_box("g1f3")).unwrap();
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
