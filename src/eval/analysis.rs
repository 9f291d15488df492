// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pawn-structure analyses on a static board. Each returns the set of pawns of one color with a given property.

use crate::{
    board::Board,
    core::*,
};

/// Returns the set of doubled pawns left by the given color.
pub fn doubled_pawns(board: &Board, color: Color) -> SquareSet {
    let pawns = board.pawns(color);
    let mut answer = SquareSet::empty();
    for col in 0..8 {
        let pawns_on_file = pawns & SquareSet::column(col);
        if pawns_on_file.len() > 1 {
            answer |= pawns_on_file;
        }
    }

    answer
}

/// Returns the set of backward pawns left by the given color.
pub fn backward_pawns(board: &Board, color: Color) -> SquareSet {
    fn walk_rows<I>(rows: I, current_file_pawns: SquareSet, adjacent_file_pawns: SquareSet) -> SquareSet
    where
        I: Iterator<Item = i32>,
    {
        for row in rows.map(SquareSet::row) {
            let current_file_row = row & current_file_pawns;
            let adjacent_file_row = row & adjacent_file_pawns;
            if !current_file_row.is_empty() && adjacent_file_row.is_empty() {
                return current_file_row;
            }

            if !adjacent_file_row.is_empty() && current_file_row.is_empty() {
                break;
            }
        }

        SquareSet::empty()
    }

    let pawns = board.pawns(color);
    let mut answer = SquareSet::empty();
    for col in 0..8 {
        let pawns_on_current_file = pawns & SquareSet::column(col);
        let pawns_on_adjacent_files = pawns & SquareSet::neighbor_columns(col);
        if pawns_on_current_file.is_empty() {
            continue;
        }

        // Walk from this color's side of the board towards the opponent.
        answer |= match color {
            Color::White => walk_rows(0..8, pawns_on_current_file, pawns_on_adjacent_files),
            Color::Black => walk_rows((0..8).rev(), pawns_on_current_file, pawns_on_adjacent_files),
        };
    }

    answer
}

pub fn isolated_pawns(board: &Board, color: Color) -> SquareSet {
    let pawns = board.pawns(color);
    let mut answer = SquareSet::empty();
    for col in 0..8 {
        let pawns_on_current_file = pawns & SquareSet::column(col);
        if (pawns & SquareSet::neighbor_columns(col)).is_empty() {
            answer |= pawns_on_current_file;
        }
    }

    answer
}

/// Returns the set of passed pawns of the given color: pawns with no enemy pawn ahead of them on their own file or
/// on either adjacent file.
pub fn passed_pawns(board: &Board, color: Color) -> SquareSet {
    let enemy_pawns = board.pawns(color.toggle());
    let mut answer = SquareSet::empty();
    for pawn in board.pawns(color) {
        let lanes = SquareSet::column(pawn.col()) | SquareSet::neighbor_columns(pawn.col());
        let blocked = (lanes & enemy_pawns)
            .into_iter()
            .any(|enemy| (enemy.row() - pawn.row()) * color.forward() > 0);
        if !blocked {
            answer.insert(pawn);
        }
    }

    answer
}

/// Counts the groups of adjacent files that hold at least one pawn of the given color.
pub fn pawn_islands(board: &Board, color: Color) -> u32 {
    let pawns = board.pawns(color);
    let mut islands = 0;
    let mut in_island = false;
    for col in 0..8 {
        let occupied = !(pawns & SquareSet::column(col)).is_empty();
        if occupied && !in_island {
            islands += 1;
        }

        in_island = occupied;
    }

    islands
}
