// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece terms: base material and the positional ("relative") value of a single piece.

use crate::{
    board::Board,
    core::*,
    eval::{Score, Weights},
    side::Unit,
};

const QUEEN_WEIGHT: i32 = 900;
const ROOK_WEIGHT: i32 = 500;
const BISHOP_WEIGHT: i32 = 300;
const KNIGHT_WEIGHT: i32 = 300;
const PAWN_WEIGHT: i32 = 100;

/// Base material of a piece kind. Kings have no material value; they are never traded.
pub fn base_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_WEIGHT,
        PieceKind::Knight => KNIGHT_WEIGHT,
        PieceKind::Bishop => BISHOP_WEIGHT,
        PieceKind::Rook => ROOK_WEIGHT,
        PieceKind::Queen => QUEEN_WEIGHT,
        PieceKind::King => 0,
    }
}

// Piece-square tables are laid out as seen from White's side of the board: the first row is the eighth rank.

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
     50,  50,  50,  50,  50,  50,  50,  50,
     10,  10,  20,  30,  30,  20,  10,  10,
      5,   5,  10,  25,  25,  10,   5,   5,
      0,   0,   0,  20,  20,   0,   0,   0,
      5,  -5, -10,   0,   0, -10,  -5,   5,
      5,  10,  10, -20, -20,  10,  10,   5,
      0,   0,   0,   0,   0,   0,   0,   0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
      0,   0,   0,   0,   0,   0,   0,   0,
      5,  10,  10,  10,  10,  10,  10,   5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
     -5,   0,   0,   0,   0,   0,   0,  -5,
      0,   0,   0,   5,   5,   0,   0,   0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20, -10, -10,  -5,  -5, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,   5,   5,   5,   0, -10,
     -5,   0,   5,   5,   5,   5,   0,  -5,
      0,   0,   5,   5,   5,   5,   0,  -5,
    -10,   5,   5,   5,   5,   5,   0, -10,
    -10,   0,   5,   0,   0,   0,   0, -10,
    -20, -10, -10,  -5,  -5, -10, -10, -20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
];

/// Piece-square table entry for a piece of the given kind and color standing on `square`. Black reads the tables
/// mirrored top to bottom.
pub fn table_value(kind: PieceKind, color: Color, square: Square) -> i32 {
    let row = match color {
        Color::White => 7 - square.row(),
        Color::Black => square.row(),
    };
    let index = (row * 8 + square.col()) as usize;
    let table = match kind {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    };

    table[index]
}

/// The positional value of one non-king piece: its table entry plus a heuristic particular to its kind.
///
/// `enemy_pawn_control` is the set of squares attacked by the opponent's pawns; a knight does not count squares in it
/// towards its mobility.
pub fn relative_value(
    unit: &Unit,
    board: &Board,
    enemy_pawn_control: SquareSet,
    weights: &Weights,
) -> Score {
    let color = unit.color();
    let table = table_value(unit.kind(), color, unit.square());
    let heuristic = match unit.kind() {
        PieceKind::Knight => {
            let pawns_on_board = board.count_pawns() as i32;
            let safe_mobility = (unit.controlled() & !enemy_pawn_control).len() as i32;
            -(weights.knight_pawn_decay * pawns_on_board) / 16
                + weights.knight_mobility * safe_mobility
        }
        PieceKind::Bishop => {
            let reach = (unit.controlled() & !board.pieces(color)).len() as i32;
            weights.bishop_mobility * reach
        }
        PieceKind::Rook => {
            let file = SquareSet::column(unit.square().col());
            if (file & (board.pawns(color) | board.pawns(color.toggle()))).is_empty() {
                weights.rook_open_file
            } else if (file & board.pawns(color)).is_empty() {
                weights.rook_semi_open_file
            } else {
                0
            }
        }
        PieceKind::Pawn | PieceKind::Queen | PieceKind::King => 0,
    };

    Score(table + heuristic)
}
