// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::Square;
use std::ops;

const FIRST_COLUMN: u64 = 0x0101_0101_0101_0101;
const FIRST_ROW: u64 = 0xFF;

/// A set of squares on the chessboard, one bit per square. Piece placements, attacked squares, pin lines and move
/// restrictions are all expressed as SquareSets so that they can be combined with the usual set operators.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SquareSet(u64);

impl SquareSet {
    /// Every light square on the board.
    pub const LIGHT: SquareSet = SquareSet(0x55AA_55AA_55AA_55AA);

    pub const fn empty() -> SquareSet {
        SquareSet(0)
    }

    pub const fn all() -> SquareSet {
        SquareSet(!0)
    }

    /// Creates a SquareSet containing exactly one square.
    pub const fn of(square: Square) -> SquareSet {
        SquareSet(1u64 << square.0)
    }

    /// Every square in the given zero-based column. Out-of-range columns give the empty set.
    pub const fn column(col: i32) -> SquareSet {
        if col < 0 || col >= 8 {
            return SquareSet::empty();
        }

        SquareSet(FIRST_COLUMN << col)
    }

    /// Every square in the given zero-based row. Out-of-range rows give the empty set.
    pub const fn row(row: i32) -> SquareSet {
        if row < 0 || row >= 8 {
            return SquareSet::empty();
        }

        SquareSet(FIRST_ROW << (row * 8))
    }

    /// The columns on either side of the given one, for as many of them as are on the board.
    pub const fn neighbor_columns(col: i32) -> SquareSet {
        SquareSet(SquareSet::column(col - 1).0 | SquareSet::column(col + 1).0)
    }

    pub const fn contains(&self, square: Square) -> bool {
        self.0 & (1u64 << square.0) != 0
    }

    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square.0;
    }

    pub fn remove(&mut self, square: Square) {
        self.0 &= !(1u64 << square.0);
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl ops::BitOr for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        SquareSet(self.0 | rhs.0)
    }
}

impl ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl ops::BitAnd for SquareSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        SquareSet(self.0 & rhs.0)
    }
}

impl ops::BitAndAssign for SquareSet {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl ops::Not for SquareSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        SquareSet(!self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        let mut set = SquareSet::empty();
        for sq in iter {
            set.insert(sq);
        }

        set
    }
}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = SquareSetIterator;

    fn into_iter(self) -> Self::IntoIter {
        SquareSetIterator(self.0)
    }
}

/// Iterates the squares of a [`SquareSet`] from a1 towards h8, clearing the lowest bit at each step.
pub struct SquareSetIterator(u64);

impl Iterator for SquareSetIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            return None;
        }

        let next = self.0.trailing_zeros() as u8;
        self.0 &= self.0 - 1;
        Some(Square(next))
    }
}

#[cfg(test)]
mod tests {
    use super::SquareSet;
    use crate::core::*;

    #[test]
    fn insert_and_remove() {
        let mut set = SquareSet::empty();
        assert!(!set.contains(A1));
        set.insert(A1);
        assert!(set.contains(A1));
        set.remove(A1);
        assert!(!set.contains(A1));
        assert!(set.is_empty());
    }

    #[test]
    fn iterates_in_square_order() {
        let set: SquareSet = vec![A5, A3, A4, A3].into_iter().collect();
        assert_eq!(set.len(), 3);
        let squares: Vec<_> = set.into_iter().collect();
        assert_eq!(squares, vec![A3, A4, A5]);
    }

    #[test]
    fn columns_and_rows() {
        let d_file = SquareSet::column(3);
        assert_eq!(d_file.len(), 8);
        assert!(d_file.contains(D1) && d_file.contains(D8));
        assert!(!d_file.contains(E4));
        let seventh = SquareSet::row(6);
        assert!(seventh.contains(A7) && seventh.contains(H7));
        assert_eq!(d_file & seventh, SquareSet::of(D7));
        assert!(SquareSet::column(8).is_empty());
        assert!(SquareSet::row(-1).is_empty());
    }

    #[test]
    fn neighbor_columns_at_the_edge() {
        assert_eq!(SquareSet::neighbor_columns(0), SquareSet::column(1));
        assert_eq!(
            SquareSet::neighbor_columns(4),
            SquareSet::column(3) | SquareSet::column(5)
        );
        assert_eq!(SquareSet::neighbor_columns(7).len(), 8);
    }

    #[test]
    fn light_squares() {
        assert!(!SquareSet::LIGHT.contains(A1));
        assert!(SquareSet::LIGHT.contains(B1));
        assert!(SquareSet::LIGHT.contains(H1));
        assert!(!SquareSet::LIGHT.contains(H8));
        for sq in squares() {
            assert_eq!(sq.is_light(), SquareSet::LIGHT.contains(sq));
        }
    }

    #[test]
    fn assigning_operators() {
        let mut set = SquareSet::of(C3);
        set |= SquareSet::of(D4);
        assert_eq!(set.len(), 2);
        set &= !SquareSet::of(C3);
        assert_eq!(set, SquareSet::of(D4));
    }
}
