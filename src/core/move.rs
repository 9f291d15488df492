// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::{board::Board, core::*};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write};
use thiserror::Error;

/// Everything about a move that is not captured by its source and destination squares.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Special {
    Capture,
    DoublePawnPush,
    KingsideCastle,
    QueensideCastle,
    EnPassant,
    Promotion { kind: PieceKind, capture: bool },
}

/// A move on the board: an origin square, a destination square, and an optional flag describing the special rules
/// that apply to it. Moves are plain values and are never mutated once produced.
///
/// Castles are encoded using the king's start and destination squares; the rook's hop is implied.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    source: Square,
    destination: Square,
    special: Option<Special>,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoveParseError {
    #[error("move string too short: {0}")]
    TooShort(String),
    #[error("invalid square in move: {0}")]
    InvalidSquare(String),
    #[error("no piece on source square {0}")]
    NoPiece(Square),
    #[error("invalid promotion piece: {0}")]
    InvalidPromotion(char),
    #[error("promotion requires a piece")]
    MissingPromotion,
}

impl Move {
    /// Constructs a new quiet move from the source square to the destination
    /// square.
    pub const fn quiet(source: Square, destination: Square) -> Move {
        Move {
            source,
            destination,
            special: None,
        }
    }

    const fn with(source: Square, destination: Square, special: Special) -> Move {
        Move {
            source,
            destination,
            special: Some(special),
        }
    }

    /// Constructs a new capture move from the source square to the destination
    /// square.
    pub const fn capture(source: Square, destination: Square) -> Move {
        Move::with(source, destination, Special::Capture)
    }

    /// Constructs a new en passsant move from the source square to the
    /// destination square.
    pub const fn en_passant(source: Square, destination: Square) -> Move {
        Move::with(source, destination, Special::EnPassant)
    }

    /// Constructs a new double pawn push move from the source square to
    /// the destination square.
    pub const fn double_pawn_push(source: Square, destination: Square) -> Move {
        Move::with(source, destination, Special::DoublePawnPush)
    }

    /// Constructs a new promotion from the source square to the destination square, promoting the current piece to
    /// the given piece kind.
    pub fn promotion(source: Square, destination: Square, kind: PieceKind) -> Move {
        assert!(is_promotion_kind(kind), "invalid promotion piece");
        Move::with(
            source,
            destination,
            Special::Promotion {
                kind,
                capture: false,
            },
        )
    }

    /// Constructs a new promotion capture move from the source square to the
    /// destination square, promoting the current piece to the given piece kind.
    pub fn promotion_capture(source: Square, destination: Square, kind: PieceKind) -> Move {
        assert!(is_promotion_kind(kind), "invalid promotion piece");
        Move::with(
            source,
            destination,
            Special::Promotion {
                kind,
                capture: true,
            },
        )
    }

    /// Constructs a new kingside castle from the source square to the
    /// destination square.
    pub const fn kingside_castle(source: Square, destination: Square) -> Move {
        Move::with(source, destination, Special::KingsideCastle)
    }

    /// Constructs a new queenside castle from the source square to the
    /// destination square.
    pub const fn queenside_castle(source: Square, destination: Square) -> Move {
        Move::with(source, destination, Special::QueensideCastle)
    }

    /// Returns the source square of this move.
    pub const fn source(self) -> Square {
        self.source
    }

    /// Returns the destination square of this move.
    pub const fn destination(self) -> Square {
        self.destination
    }

    pub const fn special(self) -> Option<Special> {
        self.special
    }

    /// If this move is a promotion, returns the piece kind that the
    /// pawn is being promoted to.
    pub fn promotion_piece(self) -> Option<PieceKind> {
        match self.special {
            Some(Special::Promotion { kind, .. }) => Some(kind),
            _ => None,
        }
    }

    pub fn is_quiet(self) -> bool {
        self.special.is_none()
    }

    pub fn is_capture(self) -> bool {
        matches!(
            self.special,
            Some(Special::Capture)
                | Some(Special::EnPassant)
                | Some(Special::Promotion { capture: true, .. })
        )
    }

    pub fn is_en_passant(self) -> bool {
        self.special == Some(Special::EnPassant)
    }

    pub fn is_double_pawn_push(self) -> bool {
        self.special == Some(Special::DoublePawnPush)
    }

    pub fn is_promotion(self) -> bool {
        self.promotion_piece().is_some()
    }

    pub fn is_kingside_castle(self) -> bool {
        self.special == Some(Special::KingsideCastle)
    }

    pub fn is_queenside_castle(self) -> bool {
        self.special == Some(Special::QueensideCastle)
    }

    pub fn is_castle(self) -> bool {
        self.is_kingside_castle() || self.is_queenside_castle()
    }

    /// The square of the piece removed by this move, if it is a capture. This is the destination square except for
    /// en-passant, where the captured pawn sits beside the capturing pawn.
    pub fn captured_square(self) -> Option<Square> {
        if self.is_en_passant() {
            Square::from_coords(self.destination.col(), self.source.row())
        } else if self.is_capture() {
            Some(self.destination)
        } else {
            None
        }
    }

    /// Returns the coordinate-notation string for this move, e.g. `e2e4` or `e7e8q`.
    pub fn as_uci(self) -> String {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{}{}", self.source, self.destination);
        if let Some(kind) = self.promotion_piece() {
            let _ = write!(&mut buf, "{}", kind);
        }

        buf
    }

    /// Parses a coordinate-notation move against the given board. The board is needed to recover the special flags
    /// that the notation leaves implicit; the result is not checked for legality.
    pub fn from_uci(board: &Board, move_str: &str) -> Result<Move, MoveParseError> {
        let chars: Vec<_> = move_str.chars().collect();
        if chars.len() < 4 {
            return Err(MoveParseError::TooShort(move_str.to_string()));
        }

        let parse_square = |file: char, rank: char| -> Result<Square, MoveParseError> {
            Square::parse(file, rank).ok_or_else(|| MoveParseError::InvalidSquare(move_str.to_string()))
        };

        let source = parse_square(chars[0], chars[1])?;
        let dest = parse_square(chars[2], chars[3])?;
        let promotion = match chars.get(4) {
            Some('n') => Some(PieceKind::Knight),
            Some('b') => Some(PieceKind::Bishop),
            Some('r') => Some(PieceKind::Rook),
            Some('q') => Some(PieceKind::Queen),
            Some(&c) => return Err(MoveParseError::InvalidPromotion(c)),
            None => None,
        };

        let moving_piece = board
            .piece_at(source)
            .ok_or(MoveParseError::NoPiece(source))?;
        let is_capture = board
            .piece_at(dest)
            .map_or(false, |p| p.color != moving_piece.color);

        match moving_piece.kind {
            PieceKind::Pawn => {
                let color = moving_piece.color;
                if dest.row() == color.promotion_row() {
                    let kind = promotion.ok_or(MoveParseError::MissingPromotion)?;
                    return Ok(if is_capture {
                        Move::promotion_capture(source, dest, kind)
                    } else {
                        Move::promotion(source, dest, kind)
                    });
                }

                if (dest.row() - source.row()).abs() == 2 {
                    return Ok(Move::double_pawn_push(source, dest));
                }

                if dest.col() != source.col() {
                    if !is_capture && board.en_passant_square() == Some(dest) {
                        return Ok(Move::en_passant(source, dest));
                    }

                    return Ok(Move::capture(source, dest));
                }

                Ok(Move::quiet(source, dest))
            }
            PieceKind::King if dest.col() - source.col() == 2 => {
                Ok(Move::kingside_castle(source, dest))
            }
            PieceKind::King if source.col() - dest.col() == 2 => {
                Ok(Move::queenside_castle(source, dest))
            }
            _ if is_capture => Ok(Move::capture(source, dest)),
            _ => Ok(Move::quiet(source, dest)),
        }
    }
}

fn is_promotion_kind(kind: PieceKind) -> bool {
    matches!(
        kind,
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
    )
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_uci())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self.special {
            Some(special) => write!(f, "{} ({:?})", self.as_uci(), special),
            None => write!(f, "{}", self.as_uci()),
        }
    }
}
