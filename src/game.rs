// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A `Game` ties a board to the two sides playing on it and keeps their legal moves current.

use thiserror::Error;
use tracing::{debug, debug_span, trace};

use crate::{
    board::{Board, BoardError},
    core::*,
    eval::Weights,
    invariant::invariant,
    side::Side,
    tracing::constants::{LEGALITY_PASS, MOVE_APPLIED},
};

pub use crate::invariant::InvariantViolation;

/// The operand of a move query does not name a piece of the side to move.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidOperand {
    #[error("no piece on square {0}")]
    EmptySquare(Square),
    #[error("piece on {0} belongs to {1}, who is not to move")]
    NotSideToMove(Square, Color),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoveError {
    #[error(transparent)]
    InvalidOperand(#[from] InvalidOperand),
    #[error("illegal move: {0}")]
    IllegalMove(Move),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Parse(#[from] MoveParseError),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    /// The given color has been checkmated.
    Checkmate(Color),
    Stalemate,
}

#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    sides: [Side; 2],
    weights: Weights,
}

impl Game {
    /// A game from the standard starting position.
    pub fn new(weights: Weights) -> Game {
        match Game::from_board(Board::start_position(), weights) {
            Ok(game) => game,
            Err(_) => unreachable!("the start position has both kings"),
        }
    }

    /// Builds both sides from the pieces on `board` and runs the first legality pass.
    pub fn from_board(board: Board, weights: Weights) -> Result<Game, BoardError> {
        let white = Side::new(Color::White, &board, weights)?;
        let black = Side::new(Color::Black, &board, weights)?;
        let mut game = Game {
            board,
            sides: [white, black],
            weights,
        };

        game.legality_pass();
        Ok(game)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn side(&self, color: Color) -> &Side {
        &self.sides[color as usize]
    }

    pub fn side_to_move(&self) -> &Side {
        self.side(self.board.side_to_move())
    }

    pub fn opponent(&self, color: Color) -> &Side {
        self.side(color.toggle())
    }

    /// Recomputes the legal moves of both sides from the current board.
    ///
    /// The stages are interleaved across the two sides: each side's king moves depend on the squares the other side
    /// controls, and each side's check limiting depends on the checks the other side reported.
    pub fn legality_pass(&mut self) {
        let _span = debug_span!(LEGALITY_PASS, to_move = %self.board.side_to_move()).entered();
        let board = &self.board;
        let [white, black] = &mut self.sides;

        white.reset();
        black.reset();

        white.calculate_regular_piece_moves(board, black.tracker_mut());
        black.calculate_regular_piece_moves(board, white.tracker_mut());
        white.calculate_king_control(board, black.tracker_mut());
        black.calculate_king_control(board, white.tracker_mut());
        trace!("controlled squares computed");

        white.purge_regular_piece_moves_regarding_pins(board);
        black.purge_regular_piece_moves_regarding_pins(board);

        let white_control = white.controlled_squares();
        let black_control = black.controlled_squares();
        white.calculate_king_moves(board, black_control);
        black.calculate_king_moves(board, white_control);

        white.limit_moves_if_in_check();
        black.limit_moves_if_in_check();

        for side in &self.sides {
            if side.is_in_check() {
                debug!(side = %side.color(), checks = side.king().tracker().checks().len(), "in check");
            }
        }
    }

    /// Legal moves of the piece on `square`, which must belong to the side to move.
    pub fn legal_moves_from(&self, square: Square) -> Result<&[Move], InvalidOperand> {
        let piece = self
            .board
            .piece_at(square)
            .ok_or(InvalidOperand::EmptySquare(square))?;
        if piece.color != self.board.side_to_move() {
            return Err(InvalidOperand::NotSideToMove(square, piece.color));
        }

        self.side(piece.color)
            .moves_from(square)
            .ok_or(InvalidOperand::EmptySquare(square))
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.side_to_move().possible_moves()
    }

    pub fn status(&self) -> Status {
        let side = self.side_to_move();
        if side.is_checkmated() {
            Status::Checkmate(side.color())
        } else if side.is_stalemated() {
            Status::Stalemate
        } else {
            Status::Ongoing
        }
    }

    /// Plays a legal move of the side to move, updates both rosters, and recomputes legal moves.
    pub fn make_move(&mut self, mov: Move) -> Result<(), MoveError> {
        let legal = self.legal_moves_from(mov.source())?;
        if !legal.contains(&mov) {
            return Err(MoveError::IllegalMove(mov));
        }

        let us = self.board.side_to_move();
        let effects = self.board.make_move(mov)?;
        let [white, black] = &mut self.sides;
        let (mover, other) = match us {
            Color::White => (white, black),
            Color::Black => (black, white),
        };

        if let Some((square, piece)) = effects.captured {
            let removed = other.remove_unit(square);
            invariant!(
                removed.map(|unit| unit.piece()) == Some(piece),
                "captured {} on {} was not on the {} roster",
                piece,
                square,
                other.color()
            );
        }

        let moved = mover.move_unit(mov.source(), mov.destination());
        invariant!(moved, "no {} piece on {} to move", us, mov.source());
        if let Some((from, to)) = effects.rook_hop {
            let hopped = mover.move_unit(from, to);
            invariant!(hopped, "no {} rook on {} to castle with", us, from);
        }

        if let Some(kind) = effects.promoted {
            let promoted = mover.promote(mov.destination(), kind);
            invariant!(promoted, "no {} pawn on {} to promote", us, mov.destination());
        }

        debug!(event = MOVE_APPLIED, mov = %mov, side = %us);
        self.legality_pass();
        Ok(())
    }

    /// Parses and plays a move in coordinate notation.
    pub fn make_uci_move(&mut self, text: &str) -> Result<Move, MoveError> {
        let mov = Move::from_uci(&self.board, text)?;
        self.make_move(mov)?;
        Ok(mov)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::tracker::CheckState;

    fn game(pieces: &[(Square, char)], to_move: Color) -> Game {
        let placed: Vec<_> = pieces
            .iter()
            .map(|&(sq, c)| (sq, Piece::from_symbol(c).unwrap()))
            .collect();
        let board = Board::with_pieces(&placed, to_move).unwrap();
        Game::from_board(board, Weights::default()).unwrap()
    }

    fn destinations(moves: &[Move]) -> HashSet<Square> {
        moves.iter().map(|m| m.destination()).collect()
    }

    #[test]
    fn start_position_has_twenty_moves_each() {
        let game = Game::new(Weights::default());
        assert_eq!(game.side(Color::White).number_of_possible_moves(), 20);
        assert_eq!(game.side(Color::Black).number_of_possible_moves(), 20);
        assert_eq!(game.status(), Status::Ongoing);
    }

    #[test]
    fn material_symmetry_at_start() {
        let game = Game::new(Weights::default());
        assert_eq!(game.side(Color::White).count_material(), 3900);
        assert_eq!(game.side(Color::Black).count_material(), 3900);
    }

    #[test]
    fn knight_reachability() {
        let game = game(&[(A1, 'K'), (H8, 'k'), (D4, 'N')], Color::White);
        let moves = game.legal_moves_from(D4).unwrap();
        let expected: HashSet<_> = [C2, E2, B3, F3, B5, F5, C6, E6].into_iter().collect();
        assert_eq!(destinations(moves), expected);
    }

    #[test]
    fn bishop_pinned_on_file_has_no_moves() {
        let game = game(&[(E1, 'K'), (E3, 'B'), (E8, 'r'), (A8, 'k')], Color::White);
        assert!(game.legal_moves_from(E3).unwrap().is_empty());
        assert_eq!(game.side(Color::White).king().tracker().pins().len(), 1);
    }

    #[test]
    fn pinned_rook_slides_along_pin() {
        let game = game(&[(E1, 'K'), (E3, 'R'), (E8, 'r'), (A8, 'k')], Color::White);
        let targets = destinations(game.legal_moves_from(E3).unwrap());
        let expected: HashSet<_> = [E2, E4, E5, E6, E7, E8].into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn double_check_leaves_only_king_moves() {
        // Rook on e8 and bishop on b4 both check the king on e1.
        let game = game(
            &[(E1, 'K'), (D1, 'Q'), (B2, 'R'), (H4, 'N'), (E8, 'r'), (B4, 'b'), (A8, 'k')],
            Color::White,
        );
        let white = game.side(Color::White);
        assert_eq!(white.king().tracker().state(), CheckState::DoubleCheck);
        for unit in white.units() {
            assert!(unit.moves().is_empty(), "{} on {} can move", unit.piece(), unit.square());
        }

        let king_moves = destinations(white.king().moves());
        let expected: HashSet<_> = [F1, F2].into_iter().collect();
        assert_eq!(king_moves, expected);
    }

    #[test]
    fn knight_check_allows_capture_or_king_moves() {
        let game = game(
            &[(E1, 'K'), (B4, 'B'), (A4, 'R'), (F3, 'n'), (E8, 'k')],
            Color::White,
        );
        let white = game.side(Color::White);
        let checks = white.king().tracker().checks();
        assert_eq!(checks.len(), 1);
        assert!(checks[0].blocking.is_empty());

        // The rook on a4 cannot reach f3; the bishop cannot either. Only the king moves.
        assert!(game.legal_moves_from(A4).unwrap().is_empty());
        assert!(game.legal_moves_from(B4).unwrap().is_empty());
        assert!(!white.king().moves().is_empty());
    }

    #[test]
    fn knight_check_can_be_captured() {
        let game = game(&[(E1, 'K'), (H3, 'R'), (F3, 'n'), (E8, 'k')], Color::White);
        let moves = game.legal_moves_from(H3).unwrap();
        assert_eq!(moves, &[Move::capture(H3, F3)]);
    }

    #[test]
    fn slider_check_can_be_blocked_or_captured() {
        let game = game(
            &[(E1, 'K'), (A4, 'R'), (H5, 'B'), (E8, 'r'), (H8, 'k')],
            Color::White,
        );
        let rook = destinations(game.legal_moves_from(A4).unwrap());
        assert_eq!(rook, [E4].into_iter().collect());
        let bishop = destinations(game.legal_moves_from(H5).unwrap());
        assert_eq!(bishop, [E2, E8].into_iter().collect());
    }

    #[test]
    fn king_cannot_retreat_along_check_line() {
        let game = game(&[(E2, 'K'), (E8, 'r'), (A8, 'k')], Color::White);
        let king_moves = destinations(game.legal_moves_from(E2).unwrap());
        assert!(!king_moves.contains(&E1));
        assert!(!king_moves.contains(&E3));
        assert!(king_moves.contains(&D1));
    }

    #[test]
    fn king_cannot_capture_defended_piece() {
        let game = game(&[(E1, 'K'), (E2, 'q'), (E4, 'r'), (A8, 'k')], Color::White);
        assert!(game.side(Color::White).is_checkmated());
    }

    #[test]
    fn invalid_operands() {
        let game = Game::new(Weights::default());
        assert_eq!(
            game.legal_moves_from(E4).unwrap_err(),
            InvalidOperand::EmptySquare(E4)
        );
        assert_eq!(
            game.legal_moves_from(E7).unwrap_err(),
            InvalidOperand::NotSideToMove(E7, Color::Black)
        );
    }

    #[test]
    fn illegal_move_is_rejected() {
        let mut game = Game::new(Weights::default());
        let err = game.make_move(Move::quiet(E2, E5)).unwrap_err();
        assert_eq!(err, MoveError::IllegalMove(Move::quiet(E2, E5)));
        let err = game.make_move(Move::quiet(E7, E5)).unwrap_err();
        assert!(matches!(err, MoveError::InvalidOperand(_)));
    }

    #[test]
    fn fools_mate() {
        let mut game = Game::new(Weights::default());
        for mov in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.make_uci_move(mov).unwrap();
        }

        assert_eq!(game.status(), Status::Checkmate(Color::White));
        assert!(game.side(Color::Black).king().tracker().checks().is_empty());
    }

    #[test]
    fn capture_removes_unit() {
        let mut game = Game::new(Weights::default());
        for mov in ["e2e4", "d7d5", "e4d5"] {
            game.make_uci_move(mov).unwrap();
        }

        assert_eq!(game.side(Color::Black).count_material(), 3800);
        assert_eq!(game.side(Color::Black).count_pawns(), 7);
        assert!(game.side(Color::White).unit_at(D5).is_some());
    }

    #[test]
    fn en_passant_capture() {
        let mut game = Game::new(Weights::default());
        for mov in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            game.make_uci_move(mov).unwrap();
        }

        assert!(game.legal_moves_from(E5).unwrap().contains(&Move::en_passant(E5, D6)));
        game.make_uci_move("e5d6").unwrap();
        assert!(game.board().is_empty(D5));
        assert_eq!(game.side(Color::Black).count_pawns(), 7);
    }

    #[test]
    fn castling_moves_rook_on_roster() {
        let mut game = Game::new(Weights::default());
        for mov in ["e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "g8f6", "e1g1"] {
            game.make_uci_move(mov).unwrap();
        }

        let white = game.side(Color::White);
        assert_eq!(white.king().square(), G1);
        assert!(white.unit_at(F1).is_some());
        assert!(white.unit_at(H1).is_none());
    }

    #[test]
    fn promotion_replaces_unit() {
        let mut game = game(&[(E1, 'K'), (B7, 'P'), (H8, 'k')], Color::White);
        game.make_move(Move::promotion(B7, B8, PieceKind::Queen)).unwrap();
        let white = game.side(Color::White);
        assert_eq!(white.unit_at(B8).unwrap().kind(), PieceKind::Queen);
        assert_eq!(white.count_material(), 900);
        assert!(game.side(Color::Black).is_in_check());
    }

    #[test]
    fn en_passant_resolves_pawn_check() {
        // Black's d7-d5 gives check from d5; capturing en passant removes the checker.
        let mut game = game(&[(E4, 'K'), (E5, 'P'), (D7, 'p'), (A8, 'k')], Color::Black);
        game.make_move(Move::double_pawn_push(D7, D5)).unwrap();
        assert!(game.side(Color::White).is_in_check());
        let moves = game.legal_moves_from(E5).unwrap();
        assert_eq!(moves, &[Move::en_passant(E5, D6)]);
    }
}
