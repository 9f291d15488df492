// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Attack sets for every kind of piece. Leapers (kings, knights and pawns) read from tables built once on first use;
//! sliders walk their rays square by square and stop at the first occupied square, which is itself attacked.

use lazy_static::lazy_static;

use crate::core::*;

const KNIGHT_JUMPS: [(i32, i32); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Attacked squares for a leaping piece, indexed by square.
struct LeapTable([SquareSet; 64]);

impl LeapTable {
    fn new<I>(jumps: impl Fn(Square) -> I) -> LeapTable
    where
        I: IntoIterator<Item = (i32, i32)>,
    {
        let mut table = [SquareSet::empty(); 64];
        for sq in squares() {
            table[sq.index()] = jumps(sq)
                .into_iter()
                .filter_map(|(dcol, drow)| sq.offset(dcol, drow))
                .collect();
        }

        LeapTable(table)
    }

    fn attacks(&self, sq: Square) -> SquareSet {
        self.0[sq.index()]
    }
}

lazy_static! {
    static ref KING_TABLE: LeapTable = LeapTable::new(|_| Direction::ALL.map(Direction::offsets));
    static ref KNIGHT_TABLE: LeapTable = LeapTable::new(|_| KNIGHT_JUMPS);
    static ref WHITE_PAWN_TABLE: LeapTable = pawn_table(Color::White);
    static ref BLACK_PAWN_TABLE: LeapTable = pawn_table(Color::Black);
}

fn pawn_table(color: Color) -> LeapTable {
    LeapTable::new(move |sq| {
        // A pawn never stands on its promotion row, so it attacks nothing from there.
        if sq.row() == color.promotion_row() {
            vec![]
        } else {
            vec![(-1, color.forward()), (1, color.forward())]
        }
    })
}

/// Squares reached by sliding from `sq` along every direction `kind` slides along, up to and including the first
/// occupied square on each ray.
fn slide(sq: Square, occupancy: SquareSet, kind: PieceKind) -> SquareSet {
    let mut result = SquareSet::empty();
    for dir in Direction::ALL.iter().copied().filter(|&dir| kind.slides_along(dir)) {
        let mut cursor = sq;
        while let Some(next) = cursor.step(dir) {
            result.insert(next);
            if occupancy.contains(next) {
                break;
            }

            cursor = next;
        }
    }

    result
}

pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    match color {
        Color::White => WHITE_PAWN_TABLE.attacks(sq),
        Color::Black => BLACK_PAWN_TABLE.attacks(sq),
    }
}

pub fn knight_attacks(sq: Square) -> SquareSet {
    KNIGHT_TABLE.attacks(sq)
}

pub fn king_attacks(sq: Square) -> SquareSet {
    KING_TABLE.attacks(sq)
}

pub fn bishop_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    slide(sq, occupancy, PieceKind::Bishop)
}

pub fn rook_attacks(sq: Square, occupancy: SquareSet) -> SquareSet {
    slide(sq, occupancy, PieceKind::Rook)
}

/// Returns the direction pointing from `from` towards `to`, if the two squares share a rank, file, or diagonal.
fn direction_between(from: Square, to: Square) -> Option<Direction> {
    let (dcol, drow) = (to.col() - from.col(), to.row() - from.row());
    if from == to || (dcol != 0 && drow != 0 && dcol.abs() != drow.abs()) {
        return None;
    }

    Direction::from_offsets(dcol.signum(), drow.signum())
}

/// The squares strictly between two squares that share a line. Empty if they are adjacent or do not share a line.
pub fn between(from: Square, to: Square) -> SquareSet {
    let dir = match direction_between(from, to) {
        Some(dir) => dir,
        None => return SquareSet::empty(),
    };

    let mut result = SquareSet::empty();
    let mut cursor = from;
    while let Some(next) = cursor.step(dir) {
        if next == to {
            break;
        }

        result.insert(next);
        cursor = next;
    }

    result
}

/// The squares a piece of the given kind and color standing on `sq` attacks, given the occupied squares of the board.
pub fn attacks(kind: PieceKind, color: Color, sq: Square, occupancy: SquareSet) -> SquareSet {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::King => king_attacks(sq),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => slide(sq, occupancy, kind),
    }
}
