// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! One color's pieces, the per-pass state hanging off them, and the stages of the legality pipeline that operate on
//! them.
//!
//! A `Side` does not own the board and does not know its opponent. Every stage is handed exactly the outside state it
//! needs (the board, the opponent's tracker, or the squares the opponent controls), and `Game` is responsible for
//! running the stages of both sides in the right order.

use tracing::trace;

use crate::{
    board::{Board, BoardError},
    core::*,
    eval::{self, Aspect, Breakdown, Score, Weights},
    movegen,
    tracker::Tracker,
};

/// A non-king piece on the board, with the moves and controlled squares computed for it by the current pass.
#[derive(Clone, Debug)]
pub struct Unit {
    piece: Piece,
    square: Square,
    controlled: SquareSet,
    moves: Vec<Move>,
}

impl Unit {
    fn new(piece: Piece, square: Square) -> Unit {
        Unit {
            piece,
            square,
            controlled: SquareSet::empty(),
            moves: Vec::new(),
        }
    }

    pub fn piece(&self) -> Piece {
        self.piece
    }

    pub fn kind(&self) -> PieceKind {
        self.piece.kind
    }

    pub fn color(&self) -> Color {
        self.piece.color
    }

    pub fn square(&self) -> Square {
        self.square
    }

    /// Squares this piece attacks or defends.
    pub fn controlled(&self) -> SquareSet {
        self.controlled
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    fn clear(&mut self) {
        self.controlled = SquareSet::empty();
        self.moves.clear();
    }
}

#[derive(Clone, Debug)]
pub struct King {
    square: Square,
    controlled: SquareSet,
    moves: Vec<Move>,
    tracker: Tracker,
}

impl King {
    pub fn square(&self) -> Square {
        self.square
    }

    pub fn controlled(&self) -> SquareSet {
        self.controlled
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn is_in_check(&self) -> bool {
        self.tracker.is_in_check()
    }
}

#[derive(Clone, Debug)]
pub struct Side {
    color: Color,
    units: Vec<Unit>,
    king: King,
    aspects: Vec<Aspect>,
    weights: Weights,
}

impl Side {
    /// Builds the roster of `color` from the pieces standing on the board.
    pub fn new(color: Color, board: &Board, weights: Weights) -> Result<Side, BoardError> {
        let king_square = board.king(color).ok_or(BoardError::MissingKing(color))?;
        let units = board
            .iter()
            .filter(|(_, piece)| piece.color == color && piece.kind != PieceKind::King)
            .map(|(square, piece)| Unit::new(piece, square))
            .collect();

        Ok(Side {
            color,
            units,
            king: King {
                square: king_square,
                controlled: SquareSet::empty(),
                moves: Vec::new(),
                tracker: Tracker::new(color),
            },
            aspects: eval::standard_aspects(&weights),
            weights,
        })
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn king(&self) -> &King {
        &self.king
    }

    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn unit_at(&self, square: Square) -> Option<&Unit> {
        self.units.iter().find(|unit| unit.square == square)
    }

    pub(crate) fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.king.tracker
    }
}

/// The legality pipeline. Each stage must run for both sides before the next stage runs for either.
impl Side {
    /// Clears all per-pass state: moves, controlled squares, checks and pins.
    pub fn reset(&mut self) {
        for unit in &mut self.units {
            unit.clear();
        }

        self.king.controlled = SquareSet::empty();
        self.king.moves.clear();
        self.king.tracker.reset();
    }

    /// Stage 1: controlled squares and pseudo-legal moves of every non-king piece. Checks against the enemy king are
    /// recorded in `enemy` as they are found.
    pub fn calculate_regular_piece_moves(&mut self, board: &Board, enemy: &mut Tracker) {
        for unit in &mut self.units {
            unit.controlled = movegen::controlled_squares(unit.piece, unit.square, board);
            movegen::report_check(unit.piece, unit.square, unit.controlled, board, enemy);
            movegen::pseudo_legal_moves(unit.piece, unit.square, board, &mut unit.moves);
        }

        trace!(side = %self.color, moves = self.regular_move_count(), "regular piece moves");
    }

    /// The king's own controlled squares. Runs alongside stage 1, since the opponent's king moves depend on it.
    pub fn calculate_king_control(&mut self, board: &Board, enemy: &mut Tracker) {
        let piece = Piece::new(self.color, PieceKind::King);
        self.king.controlled = movegen::controlled_squares(piece, self.king.square, board);
        movegen::report_check(piece, self.king.square, self.king.controlled, board, enemy);
    }

    /// Stage 2: finds the pins against this side's king and keeps only the moves that stay on the pin line.
    pub fn purge_regular_piece_moves_regarding_pins(&mut self, board: &Board) {
        self.king.tracker.detect_pins(self.king.square, board);
        let color = self.color;
        for unit in &mut self.units {
            if let Some(pin) = self.king.tracker.pin_on(unit.square) {
                let allowed = pin.allowed;
                unit.moves.retain(|mov| allowed.contains(mov.destination()));
            }

            unit.moves
                .retain(|&mov| !mov.is_en_passant() || movegen::en_passant_is_safe(color, mov, board));
        }

        trace!(side = %self.color, pins = self.king.tracker.pins().len(), "pins purged");
    }

    /// Stage 3: king moves, which may not enter any square in `opponent_control`.
    pub fn calculate_king_moves(&mut self, board: &Board, opponent_control: SquareSet) {
        movegen::king_moves(
            self.color,
            self.king.square,
            board,
            opponent_control,
            self.king.is_in_check(),
            &mut self.king.moves,
        );

        trace!(side = %self.color, moves = self.king.moves.len(), "king moves");
    }

    /// Stage 4: while in check, only moves that end the check survive. A double check leaves the king as the only
    /// piece able to move.
    pub fn limit_moves_if_in_check(&mut self) {
        if !self.king.is_in_check() {
            return;
        }

        let ending = self.king.tracker.squares_to_end_check();
        if ending.is_empty() {
            for unit in &mut self.units {
                unit.moves.clear();
            }

            trace!(side = %self.color, "double check, only king moves remain");
            return;
        }

        for unit in &mut self.units {
            unit.moves.retain(|mov| {
                ending.contains(mov.destination())
                    || mov.captured_square().map_or(false, |sq| ending.contains(sq))
            });
        }

        trace!(side = %self.color, moves = self.number_of_possible_moves(), "moves limited by check");
    }
}

/// Queries over the results of the last pass.
impl Side {
    pub fn possible_moves(&self) -> Vec<Move> {
        self.units
            .iter()
            .flat_map(|unit| unit.moves.iter().copied())
            .chain(self.king.moves.iter().copied())
            .collect()
    }

    pub fn number_of_possible_moves(&self) -> usize {
        self.regular_move_count() + self.king.moves.len()
    }

    fn regular_move_count(&self) -> usize {
        self.units.iter().map(|unit| unit.moves.len()).sum()
    }

    /// Legal moves of the piece on `square`, if this side has a piece there.
    pub fn moves_from(&self, square: Square) -> Option<&[Move]> {
        if self.king.square == square {
            return Some(&self.king.moves);
        }

        self.unit_at(square).map(|unit| unit.moves())
    }

    /// Sum of the base values of every non-king piece.
    pub fn count_material(&self) -> i32 {
        self.units
            .iter()
            .map(|unit| eval::base_value(unit.kind()))
            .sum()
    }

    pub fn count_pawns(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.kind() == PieceKind::Pawn)
            .count()
    }

    /// Squares attacked by this side's pawns.
    pub fn pawn_controlled_squares(&self) -> SquareSet {
        self.units
            .iter()
            .filter(|unit| unit.kind() == PieceKind::Pawn)
            .fold(SquareSet::empty(), |acc, unit| acc | unit.controlled)
    }

    /// Every square this side attacks or defends, the king's included.
    pub fn controlled_squares(&self) -> SquareSet {
        self.units
            .iter()
            .fold(self.king.controlled, |acc, unit| acc | unit.controlled)
    }

    pub fn is_in_check(&self) -> bool {
        self.king.is_in_check()
    }

    pub fn is_checkmated(&self) -> bool {
        self.is_in_check() && self.number_of_possible_moves() == 0
    }

    pub fn is_stalemated(&self) -> bool {
        !self.is_in_check() && self.number_of_possible_moves() == 0
    }

    /// Sum of the relative values of every piece plus every weighted aspect. Recomputed on every call.
    pub fn evaluate(&self, board: &Board, opponent: &Side) -> Score {
        self.breakdown(board, opponent).total()
    }

    pub fn breakdown(&self, board: &Board, opponent: &Side) -> Breakdown {
        Breakdown::of(self, board, opponent)
    }
}

/// Roster maintenance, applied after the board has executed a move.
impl Side {
    pub(crate) fn move_unit(&mut self, from: Square, to: Square) -> bool {
        if self.king.square == from {
            self.king.square = to;
            return true;
        }

        match self.units.iter_mut().find(|unit| unit.square == from) {
            Some(unit) => {
                unit.square = to;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_unit(&mut self, square: Square) -> Option<Unit> {
        let index = self.units.iter().position(|unit| unit.square == square)?;
        Some(self.units.remove(index))
    }

    /// Replaces the pawn on `square` with a freshly built piece of `kind`.
    pub(crate) fn promote(&mut self, square: Square, kind: PieceKind) -> bool {
        match self.units.iter_mut().find(|unit| unit.square == square) {
            Some(unit) => {
                *unit = Unit::new(Piece::new(self.color, kind), square);
                true
            }
            None => false,
        }
    }
}
