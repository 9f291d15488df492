// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use tracing::{debug_span, trace};

use crate::{
    board::Board,
    core::*,
    eval::{relative_value, table_value, AspectKind, Context, Draw, Score, Value},
    game::{Game, Status},
    side::Side,
    tracing::constants::{ASPECT_TERM, EVALUATE},
};

/// One aspect's contribution to a side's total.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AspectRow {
    pub kind: AspectKind,
    pub value: i32,
    pub weighted: Score,
}

/// A side's evaluation split into its terms: the summed relative values of its pieces and one row per aspect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breakdown {
    pub color: Color,
    pub pieces: Score,
    pub aspects: Vec<AspectRow>,
}

impl Breakdown {
    pub fn of(side: &Side, board: &Board, opponent: &Side) -> Breakdown {
        let enemy_pawn_control = opponent.pawn_controlled_squares();
        let weights = side.weights();
        let king = side.king().square();
        let pieces = side
            .units()
            .iter()
            .map(|unit| relative_value(unit, board, enemy_pawn_control, weights))
            .sum::<Score>()
            + Score(table_value(PieceKind::King, side.color(), king));

        let ctx = Context {
            board,
            side,
            opponent,
        };
        let aspects = side
            .aspects()
            .iter()
            .map(|aspect| {
                let value = aspect.value(&ctx);
                let weighted = aspect.evaluate(&ctx);
                trace!(
                    event = ASPECT_TERM,
                    side = %side.color(),
                    aspect = %aspect.kind(),
                    value,
                    weighted = weighted.0
                );
                AspectRow {
                    kind: aspect.kind(),
                    value,
                    weighted,
                }
            })
            .collect();

        Breakdown {
            color: side.color(),
            pieces,
            aspects,
        }
    }

    pub fn total(&self) -> Score {
        self.pieces + self.aspects.iter().map(|row| row.weighted).sum::<Score>()
    }

    pub fn weighted(&self, kind: AspectKind) -> Option<Score> {
        self.aspects
            .iter()
            .find(|row| row.kind == kind)
            .map(|row| row.weighted)
    }
}

struct Evaluator<'a> {
    game: &'a Game,
    #[cfg(feature = "trace-eval")]
    remarks: Vec<&'static str>,
}

impl<'a> Evaluator<'a> {
    fn new(game: &'a Game) -> Evaluator<'a> {
        Evaluator {
            game,
            #[cfg(feature = "trace-eval")]
            remarks: vec![],
        }
    }

    fn evaluate(&mut self) -> Value {
        let _span = debug_span!(EVALUATE).entered();

        // A side without moves is either mated or stalemated; nothing else matters.
        match self.game.status() {
            Status::Checkmate(loser) => return Value::Win(loser.toggle()),
            Status::Stalemate => return Value::Draw(Draw::Stalemate),
            Status::Ongoing => {}
        }

        let board = self.game.board();
        let white = self.game.side(Color::White);
        let black = self.game.side(Color::Black);
        let white_terms = white.breakdown(board, black);
        let black_terms = black.breakdown(board, white);
        let total = white_terms.total() - black_terms.total();
        let value = match self.insufficient_material(total) {
            Some(draw) => Value::Draw(draw),
            None => Value::Score(total),
        };

        self.dump_evaluation(&white_terms, &black_terms, value);
        value
    }

    /// Late check for material that cannot force a win, looking only at the side that the score favors.
    fn insufficient_material(&mut self, total: Score) -> Option<Draw> {
        let winning_side = if total > Score::ZERO {
            Color::White
        } else {
            Color::Black
        };

        let board = self.game.board();
        if !board.pawns(winning_side).is_empty() {
            return None;
        }

        // Without pawns the winning side has to mate with pieces alone.
        let knights = board.knights(winning_side);
        let bishops = board.bishops(winning_side);
        let rooks = board.rooks(winning_side);
        let queens = board.queens(winning_side);
        let heavy = rooks | queens;
        if heavy.is_empty() && (knights | bishops).len() == 1 {
            self.remark("draw by insufficient material: lone minor piece");
            return Some(Draw::LoneMinorPiece);
        }

        if board.pieces(winning_side.toggle()).len() == 1
            && heavy.is_empty()
            && bishops.is_empty()
            && knights.len() == 2
        {
            self.remark("draw by insufficient material: two knights");
            return Some(Draw::TwoKnights);
        }

        if board.pieces(winning_side).len() == 1 && board.pieces(winning_side.toggle()).len() == 1 {
            self.remark("draw by insufficient material: bare kings");
            return Some(Draw::BareKings);
        }

        None
    }

    #[cfg(feature = "trace-eval")]
    fn remark(&mut self, remark: &'static str) {
        self.remarks.push(remark);
    }

    #[cfg(not(feature = "trace-eval"))]
    fn remark(&mut self, _: &'static str) {}

    #[cfg(feature = "trace-eval")]
    fn dump_evaluation(&self, white: &Breakdown, black: &Breakdown, value: Value) {
        println!("==============================================");
        println!("{}", self.game.board());
        println!("==============================================");
        println!("Term                 | White | Black | Total |");
        println!("----------------------------------------------");
        println!(
            "{:<20} | {:^5} | {:^5} | {:^5} |",
            "pieces",
            white.pieces,
            black.pieces,
            white.pieces - black.pieces
        );
        for (w, b) in white.aspects.iter().zip(&black.aspects) {
            println!(
                "{:<20} | {:^5} | {:^5} | {:^5} |",
                w.kind.name(),
                w.weighted,
                b.weighted,
                w.weighted - b.weighted
            );
        }
        println!("----------------------------------------------");
        println!("Final Score: {}", value);
        println!("----------------------------------------------");
        println!("Remarks");
        println!("----------------------------------------------");
        for remark in &self.remarks {
            println!("{}", remark);
        }
    }

    #[cfg(not(feature = "trace-eval"))]
    fn dump_evaluation(&self, _: &Breakdown, _: &Breakdown, _: Value) {}
}

/// Evaluates the whole game from White's point of view: White's total minus Black's.
pub fn evaluate(game: &Game) -> Value {
    Evaluator::new(game).evaluate()
}
