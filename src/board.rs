// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::core::{self, *};

/// Possible errors that can arise when placing or removing pieces on a `Board`.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum BoardError {
    #[error("square {0} is already occupied")]
    SquareOccupied(Square),
    #[error("no piece on square {0}")]
    EmptySquare(Square),
    #[error("{0} has no king")]
    MissingKing(Color),
    #[error("{0} has more than one king")]
    DuplicateKing(Color),
}

/// The 8x8 grid of squares, each holding at most one piece. The Board is the single source of truth for where pieces
/// stand; everything else in the engine derives its view of the game from it.
///
/// Besides placement, the board carries the flags that the rules of chess need and that are not visible from the
/// placement alone: side to move, castle rights, and the en-passant target square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    /// The en-passant square, if the previous move was a double pawn push.
    en_passant_square: Option<Square>,
    /// The halfmove clock, or the progress to a draw by the 50-move Rule.
    halfmove_clock: u16,
    /// The fullmove clock, or number of times white has moved this game.
    fullmove_clock: u16,
    /// Castle status for both players.
    castle_status: CastleStatus,
    /// Color whose turn it is to move.
    side_to_move: Color,
}

/// A queryable (kind, color, square) tuple, enough for a renderer to draw the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub kind: PieceKind,
    pub color: Color,
    pub square: Square,
}

/// What happened on the board as a result of a move, so that owners of per-piece state can follow along.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveEffects {
    pub moved: Piece,
    pub captured: Option<(Square, Piece)>,
    pub rook_hop: Option<(Square, Square)>,
    pub promoted: Option<PieceKind>,
}

impl Board {
    pub fn en_passant_square(&self) -> Option<Square> {
        self.en_passant_square
    }

    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    pub fn fullmove_clock(&self) -> u16 {
        self.fullmove_clock
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn castle_status(&self) -> CastleStatus {
        self.castle_status
    }

    pub fn can_castle_kingside(&self, color: Color) -> bool {
        self.castle_status.contains(kingside_castle_mask(color))
    }

    pub fn can_castle_queenside(&self, color: Color) -> bool {
        self.castle_status.contains(queenside_castle_mask(color))
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    pub fn is_empty(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Iterates over every occupied square and the piece standing on it.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        core::squares().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    pub fn views(&self) -> Vec<PieceView> {
        self.iter()
            .map(|(square, piece)| PieceView {
                kind: piece.kind,
                color: piece.color,
                square,
            })
            .collect()
    }

    pub fn pieces(&self, color: Color) -> SquareSet {
        self.iter()
            .filter(|(_, piece)| piece.color == color)
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn occupancy(&self) -> SquareSet {
        self.iter().map(|(sq, _)| sq).collect()
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> SquareSet {
        self.iter()
            .filter(|&(_, piece)| piece == Piece::new(color, kind))
            .map(|(sq, _)| sq)
            .collect()
    }

    pub fn pawns(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Pawn)
    }

    pub fn bishops(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Bishop)
    }

    pub fn knights(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Knight)
    }

    pub fn rooks(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Rook)
    }

    pub fn queens(&self, color: Color) -> SquareSet {
        self.pieces_of_kind(color, PieceKind::Queen)
    }

    /// Number of pawns of both colors still on the board.
    pub fn count_pawns(&self) -> u32 {
        self.iter()
            .filter(|(_, piece)| piece.kind == PieceKind::Pawn)
            .count() as u32
    }

    pub fn king(&self, color: Color) -> Option<Square> {
        let mut kings = self.pieces_of_kind(color, PieceKind::King).into_iter();
        let king = kings.next();
        debug_assert!(kings.next().is_none(), "more than one {} king", color);
        king
    }
}

impl Board {
    /// An empty board with White to move and no castle rights.
    pub fn new() -> Board {
        Board {
            squares: [None; 64],
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_clock: 1,
            castle_status: CastleStatus::NONE,
            side_to_move: Color::White,
        }
    }

    pub fn start_position() -> Board {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut board = Board::new();
        for square in core::squares() {
            board.squares[square.index()] = Color::ALL.iter().find_map(|&color| {
                if square.row() == color.home_row() {
                    Some(Piece::new(color, back_rank[square.col() as usize]))
                } else if square.row() == color.pawn_row() {
                    Some(Piece::new(color, PieceKind::Pawn))
                } else {
                    None
                }
            });
        }

        board.castle_status = CastleStatus::WHITE | CastleStatus::BLACK;
        board
    }

    /// Builds a board from a list of placements. Each side must have exactly one king. Castle rights are granted
    /// wherever a king and rook stand on their home squares; they can be narrowed afterwards with
    /// `set_castle_status`.
    pub fn with_pieces(pieces: &[(Square, Piece)], side_to_move: Color) -> Result<Board, BoardError> {
        let mut board = Board::new();
        for &(square, piece) in pieces {
            board.add_piece(square, piece)?;
        }

        for color in Color::ALL {
            match board.pieces_of_kind(color, PieceKind::King).len() {
                0 => return Err(BoardError::MissingKing(color)),
                1 => {}
                _ => return Err(BoardError::DuplicateKing(color)),
            }
        }

        let rook = |color| Some(Piece::new(color, PieceKind::Rook));
        let mut status = CastleStatus::NONE;
        for color in Color::ALL {
            if board.piece_at(king_start(color)) != Some(Piece::new(color, PieceKind::King)) {
                continue;
            }

            if board.piece_at(kingside_rook(color)) == rook(color) {
                status |= kingside_castle_mask(color);
            }

            if board.piece_at(queenside_rook(color)) == rook(color) {
                status |= queenside_castle_mask(color);
            }
        }

        board.castle_status = status;
        board.side_to_move = side_to_move;
        Ok(board)
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_castle_status(&mut self, status: CastleStatus) {
        self.castle_status = status;
    }

    pub fn set_en_passant_square(&mut self, square: Option<Square>) {
        self.en_passant_square = square;
    }

    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), BoardError> {
        let slot = &mut self.squares[square.index()];
        if slot.is_some() {
            return Err(BoardError::SquareOccupied(square));
        }

        *slot = Some(piece);
        Ok(())
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<Piece, BoardError> {
        self.squares[square.index()]
            .take()
            .ok_or(BoardError::EmptySquare(square))
    }
}

//
// Make move and associated state update functions.
//

impl Board {
    /// Makes a move on the board, updating all internal state to reflect the effects of the move. The move is assumed
    /// to be legal; this only fails if the board does not have pieces where the move says they should be, and the
    /// board is left untouched when it does.
    pub fn make_move(&mut self, mov: Move) -> Result<MoveEffects, BoardError> {
        let mut next = self.clone();
        let effects = next.apply_move(mov)?;
        *self = next;
        Ok(effects)
    }

    fn apply_move(&mut self, mov: Move) -> Result<MoveEffects, BoardError> {
        let us = self.side_to_move;
        let them = us.toggle();
        let moving_piece = self
            .piece_at(mov.source())
            .ok_or(BoardError::EmptySquare(mov.source()))?;

        // If this move is a capture, we need to remove the captured piece from the board before we proceed. The
        // target square is the destination square except for en-passant.
        let captured = match mov.captured_square() {
            Some(target_square) => {
                let piece = self.remove_piece(target_square)?;

                // If this piece is a rook on its starting square, invalidate the castle for the other player.
                if target_square == kingside_rook(them) {
                    self.castle_status &= !kingside_castle_mask(them);
                } else if target_square == queenside_rook(them) {
                    self.castle_status &= !queenside_castle_mask(them);
                }

                Some((target_square, piece))
            }
            None => None,
        };

        // Castles are encoded using the king's start and stop position, so the rook's hop is handled here and the
        // king moves below with every other piece.
        let rook_hop = if mov.is_castle() {
            let (rook_square, new_rook_square) = if mov.is_kingside_castle() {
                (kingside_rook(us), kingside_rook_landing(us))
            } else {
                (queenside_rook(us), queenside_rook_landing(us))
            };

            let rook = self.remove_piece(rook_square)?;
            self.add_piece(new_rook_square, rook)?;
            Some((rook_square, new_rook_square))
        } else {
            None
        };

        // Unless this is a promotion, the piece that lands on the destination is the piece that left the source.
        let piece_to_add = match mov.promotion_piece() {
            Some(kind) => Piece::new(us, kind),
            None => moving_piece,
        };

        self.remove_piece(mov.source())?;
        self.add_piece(mov.destination(), piece_to_add)?;
        if mov.is_double_pawn_push() {
            self.en_passant_square =
                Square::from_coords(mov.source().col(), mov.source().row() + us.forward());
        } else {
            self.en_passant_square = None;
        }

        // Side to move may have invalidated their castle rights by moving their rooks or king.
        match moving_piece.kind {
            PieceKind::Rook if mov.source() == queenside_rook(us) => {
                self.castle_status &= !queenside_castle_mask(us);
            }
            PieceKind::Rook if mov.source() == kingside_rook(us) => {
                self.castle_status &= !kingside_castle_mask(us);
            }
            PieceKind::King => {
                self.castle_status &= !castle_mask(us);
            }
            _ => {}
        }

        self.side_to_move = them;
        if mov.is_capture() || moving_piece.kind == PieceKind::Pawn {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if self.side_to_move == Color::White {
            self.fullmove_clock += 1;
        }

        Ok(MoveEffects {
            moved: moving_piece,
            captured,
            rook_hop,
            promoted: mov.promotion_piece(),
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in (0..8).rev() {
            for col in 0..8 {
                match Square::from_coords(col, row).and_then(|sq| self.piece_at(sq)) {
                    Some(piece) => write!(f, " {} ", piece)?,
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", row + 1)?;
        }

        writeln!(f, "{}", "-".repeat(24))?;
        for file in 'a'..='h' {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

pub(crate) fn king_start(color: Color) -> Square {
    match color {
        Color::White => E1,
        Color::Black => E8,
    }
}

pub(crate) fn kingside_rook(color: Color) -> Square {
    match color {
        Color::White => H1,
        Color::Black => H8,
    }
}

pub(crate) fn queenside_rook(color: Color) -> Square {
    match color {
        Color::White => A1,
        Color::Black => A8,
    }
}

pub(crate) fn kingside_king_landing(color: Color) -> Square {
    match color {
        Color::White => G1,
        Color::Black => G8,
    }
}

pub(crate) fn queenside_king_landing(color: Color) -> Square {
    match color {
        Color::White => C1,
        Color::Black => C8,
    }
}

fn kingside_rook_landing(color: Color) -> Square {
    match color {
        Color::White => F1,
        Color::Black => F8,
    }
}

fn queenside_rook_landing(color: Color) -> Square {
    match color {
        Color::White => D1,
        Color::Black => D8,
    }
}

fn kingside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_KINGSIDE,
        Color::Black => CastleStatus::BLACK_KINGSIDE,
    }
}

fn queenside_castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE_QUEENSIDE,
        Color::Black => CastleStatus::BLACK_QUEENSIDE,
    }
}

fn castle_mask(color: Color) -> CastleStatus {
    match color {
        Color::White => CastleStatus::WHITE,
        Color::Black => CastleStatus::BLACK,
    }
}
