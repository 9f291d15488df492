// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-pass bookkeeping of the threats against one king.
//!
//! Every king owns a `Tracker`. At the start of a legality pass it is cleared; while the pieces of the opposing side
//! scan their controlled squares they append a `Check` for every line that reaches the king, and the king's own ray
//! scan records every `Pin` on its friendly pieces. The side then consumes both to prune its moves. Nothing in a
//! tracker survives into the next pass.

use tracing::debug;

use crate::{
    board::Board,
    core::{self, Color, Direction, Piece, Square, SquareSet},
    invariant::invariant,
    tracing::constants::{CHECK, PIN},
};

/// A single check against a king.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Check {
    /// The square of the piece giving check.
    pub attacker: Square,
    pub attacker_piece: Piece,
    /// The squares strictly between the attacker and the king. Empty for checks that cannot be blocked: those given
    /// by knights, pawns, or an adjacent king.
    pub blocking: SquareSet,
}

impl Check {
    pub fn is_blockable(&self) -> bool {
        !self.blocking.is_empty()
    }

    /// Squares that end this check when a friendly piece moves there, by blocking or by capturing the attacker.
    pub fn ending_squares(&self) -> SquareSet {
        self.blocking | SquareSet::of(self.attacker)
    }
}

/// A friendly piece that cannot leave the line between its king and an enemy slider.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pin {
    pub pinned: Square,
    pub pinner: Square,
    /// Squares the pinned piece may still move to: the rest of the line between king and pinner, plus the pinner
    /// itself. The pinned piece's own square is not included.
    pub allowed: SquareSet,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CheckState {
    NotInCheck,
    SingleCheck,
    DoubleCheck,
}

impl CheckState {
    /// Each recorded check moves the state forward. Within one pass it never moves back.
    fn advance(self) -> CheckState {
        match self {
            CheckState::NotInCheck => CheckState::SingleCheck,
            CheckState::SingleCheck | CheckState::DoubleCheck => CheckState::DoubleCheck,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Tracker {
    color: Color,
    state: CheckState,
    checks: Vec<Check>,
    pins: Vec<Pin>,
}

impl Tracker {
    /// Creates an empty tracker for the king of the given color.
    pub fn new(color: Color) -> Tracker {
        Tracker {
            color,
            state: CheckState::NotInCheck,
            checks: Vec::with_capacity(2),
            pins: Vec::new(),
        }
    }

    pub fn reset(&mut self) {
        self.state = CheckState::NotInCheck;
        self.checks.clear();
        self.pins.clear();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    pub fn is_in_check(&self) -> bool {
        self.state != CheckState::NotInCheck
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    pub fn pins(&self) -> &[Pin] {
        &self.pins
    }

    pub fn pin_on(&self, square: Square) -> Option<&Pin> {
        self.pins.iter().find(|pin| pin.pinned == square)
    }

    pub fn add_check(&mut self, check: Check) {
        invariant!(
            check.attacker_piece.color != self.color,
            "{} on {} gives check to its own king",
            check.attacker_piece,
            check.attacker
        );

        debug!(event = CHECK, attacker = %check.attacker, piece = %check.attacker_piece, king = %self.color);
        self.state = self.state.advance();
        self.checks.push(check);
    }

    /// The squares a non-king piece may move to in order to end the current check.
    ///
    /// Empty when there is no check (nothing to constrain) and when there is a double check, since no single move
    /// other than a king move can end two checks at once. Otherwise it is the blocking line of the one check plus
    /// the attacker's own square.
    pub fn squares_to_end_check(&self) -> SquareSet {
        match self.state {
            CheckState::NotInCheck => SquareSet::empty(),
            CheckState::SingleCheck => self.checks[0].ending_squares(),
            CheckState::DoubleCheck => {
                let common = self
                    .checks
                    .iter()
                    .fold(SquareSet::all(), |acc, check| acc & check.ending_squares());
                invariant!(
                    common.is_empty(),
                    "double check on the {} king can be resolved by a non-king move to {:?}",
                    self.color,
                    common.into_iter().collect::<Vec<_>>()
                );

                SquareSet::empty()
            }
        }
    }

    /// Scans the eight rays leaving the king. A ray whose first piece is friendly and whose next piece is an enemy
    /// slider travelling along that ray pins the friendly piece to the line.
    pub fn detect_pins(&mut self, king: Square, board: &Board) {
        invariant!(
            board.piece_at(king).map(|p| p.color) == Some(self.color),
            "pin scan from {} does not start at the {} king",
            king,
            self.color
        );

        for dir in Direction::ALL {
            if let Some(pin) = self.scan_ray(king, dir, board) {
                self.add_pin(pin, board);
            }
        }
    }

    fn scan_ray(&self, king: Square, dir: Direction, board: &Board) -> Option<Pin> {
        let mut candidate = None;
        let mut cursor = king;
        while let Some(next) = cursor.step(dir) {
            cursor = next;
            let piece = match board.piece_at(next) {
                Some(piece) => piece,
                None => continue,
            };

            match candidate {
                None if piece.color == self.color => candidate = Some(next),
                None => return None,
                Some(pinned) => {
                    if piece.color != self.color && piece.kind.slides_along(dir) {
                        return Some(Pin {
                            pinned,
                            pinner: next,
                            allowed: (core::between(king, next) | SquareSet::of(next)) & !SquareSet::of(pinned),
                        });
                    }

                    return None;
                }
            }
        }

        None
    }

    fn add_pin(&mut self, pin: Pin, board: &Board) {
        invariant!(
            board.piece_at(pin.pinned).map(|p| p.color) == Some(self.color),
            "piece on {} is pinned to the opposing {} king",
            pin.pinned,
            self.color
        );
        invariant!(
            self.pin_on(pin.pinned).is_none(),
            "piece on {} is pinned twice",
            pin.pinned
        );

        debug!(event = PIN, pinned = %pin.pinned, pinner = %pin.pinner);
        self.pins.push(pin);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::*;

    fn board(pieces: &[(Square, char)]) -> Board {
        let placed: Vec<_> = pieces
            .iter()
            .map(|&(sq, c)| (sq, Piece::from_symbol(c).unwrap()))
            .collect();
        Board::with_pieces(&placed, Color::White).unwrap()
    }

    fn rook_check(attacker: Square, king: Square) -> Check {
        Check {
            attacker,
            attacker_piece: Piece::new(Color::Black, PieceKind::Rook),
            blocking: between(attacker, king),
        }
    }

    #[test]
    fn state_advances_and_resets() {
        let mut tracker = Tracker::new(Color::White);
        assert_eq!(tracker.state(), CheckState::NotInCheck);
        tracker.add_check(rook_check(E8, E1));
        assert_eq!(tracker.state(), CheckState::SingleCheck);
        tracker.add_check(Check {
            attacker: D3,
            attacker_piece: Piece::new(Color::Black, PieceKind::Knight),
            blocking: SquareSet::empty(),
        });
        assert_eq!(tracker.state(), CheckState::DoubleCheck);
        tracker.reset();
        assert_eq!(tracker.state(), CheckState::NotInCheck);
        assert!(tracker.checks().is_empty());
    }

    #[test]
    fn no_check_means_no_constraint() {
        let tracker = Tracker::new(Color::White);
        assert!(tracker.squares_to_end_check().is_empty());
    }

    #[test]
    fn single_slider_check_ends_on_line_or_attacker() {
        let mut tracker = Tracker::new(Color::White);
        tracker.add_check(rook_check(E5, E1));
        let squares = tracker.squares_to_end_check();
        assert_eq!(squares.len(), 4);
        for sq in [E2, E3, E4, E5] {
            assert!(squares.contains(sq));
        }
    }

    #[test]
    fn knight_check_is_not_blockable() {
        let mut tracker = Tracker::new(Color::White);
        let check = Check {
            attacker: F3,
            attacker_piece: Piece::new(Color::Black, PieceKind::Knight),
            blocking: SquareSet::empty(),
        };
        tracker.add_check(check);
        assert!(!check.is_blockable());
        assert_eq!(tracker.squares_to_end_check(), SquareSet::of(F3));
    }

    #[test]
    fn double_check_has_no_ending_squares() {
        let mut tracker = Tracker::new(Color::White);
        tracker.add_check(rook_check(E8, E1));
        tracker.add_check(Check {
            attacker: A5,
            attacker_piece: Piece::new(Color::Black, PieceKind::Bishop),
            blocking: between(A5, E1),
        });
        assert!(tracker.squares_to_end_check().is_empty());
    }

    #[test]
    #[should_panic(expected = "invariant violation")]
    fn check_against_own_king_is_a_violation() {
        let mut tracker = Tracker::new(Color::Black);
        tracker.add_check(rook_check(E8, E1));
    }

    #[test]
    fn bishop_pinned_on_file() {
        let board = board(&[(E1, 'K'), (E3, 'B'), (E8, 'r'), (A8, 'k')]);
        let mut tracker = Tracker::new(Color::White);
        tracker.detect_pins(E1, &board);
        let pin = tracker.pin_on(E3).expect("bishop should be pinned");
        assert_eq!(pin.pinner, E8);
        assert!(pin.allowed.contains(E2));
        assert!(pin.allowed.contains(E7));
        assert!(pin.allowed.contains(E8));
        assert!(!pin.allowed.contains(E3));
        assert!(!pin.allowed.contains(D2));
    }

    #[test]
    fn no_pin_behind_two_friendly_pieces() {
        let board = board(&[(E1, 'K'), (E2, 'N'), (E3, 'B'), (E8, 'r'), (A8, 'k')]);
        let mut tracker = Tracker::new(Color::White);
        tracker.detect_pins(E1, &board);
        assert!(tracker.pins().is_empty());
    }

    #[test]
    fn no_pin_when_slider_does_not_travel_the_ray() {
        let board = board(&[(E1, 'K'), (F2, 'N'), (H4, 'r'), (E3, 'P'), (E6, 'b'), (A8, 'k')]);
        let mut tracker = Tracker::new(Color::White);
        tracker.detect_pins(E1, &board);
        assert!(tracker.pins().is_empty());
    }

    #[test]
    fn enemy_piece_between_is_not_pinned() {
        let board = board(&[(E1, 'K'), (E3, 'n'), (E8, 'r'), (A8, 'k')]);
        let mut tracker = Tracker::new(Color::White);
        tracker.detect_pins(E1, &board);
        assert!(tracker.pins().is_empty());
    }

    #[test]
    fn diagonal_pin_by_queen() {
        let board = board(&[(E1, 'K'), (D2, 'N'), (A5, 'q'), (H8, 'k')]);
        let mut tracker = Tracker::new(Color::White);
        tracker.detect_pins(E1, &board);
        let pin = tracker.pin_on(D2).expect("knight should be pinned");
        assert_eq!(pin.allowed.len(), 3);
        assert!(pin.allowed.contains(C3) && pin.allowed.contains(B4) && pin.allowed.contains(A5));
        assert!(!pin.allowed.contains(D2));
    }
}
