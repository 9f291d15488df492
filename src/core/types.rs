// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// A square on the chessboard. Squares are numbered a1 = 0 through h8 = 63, row by row, and are addressed by
/// zero-based (column, row) coordinates everywhere else in the engine.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square(pub(in crate::core) u8);

impl Square {
    /// Creates a square from zero-based column and row coordinates, or `None` if the coordinates fall off of the
    /// board.
    pub const fn from_coords(col: i32, row: i32) -> Option<Square> {
        if col < 0 || col >= 8 || row < 0 || row >= 8 {
            return None;
        }

        Some(Square((row * 8 + col) as u8))
    }

    /// Parses a file letter and a rank digit, as in "e4".
    pub fn parse(file: char, rank: char) -> Option<Square> {
        if !file.is_ascii_lowercase() || !rank.is_ascii_digit() {
            return None;
        }

        Square::from_coords(file as i32 - 'a' as i32, rank as i32 - '1' as i32)
    }

    /// Returns the square `dcol` columns and `drow` rows away from this one, if it is on the board.
    pub const fn offset(self, dcol: i32, drow: i32) -> Option<Square> {
        Square::from_coords(self.col() + dcol, self.row() + drow)
    }

    /// Returns the next square in the given direction, if it is on the board.
    pub const fn step(self, dir: Direction) -> Option<Square> {
        let (dcol, drow) = dir.offsets();
        self.offset(dcol, drow)
    }

    pub const fn col(self) -> i32 {
        (self.0 & 7) as i32
    }

    pub const fn row(self) -> i32 {
        (self.0 >> 3) as i32
    }

    /// Light squares are those where the column and row sum to an odd number; a1 is dark.
    pub const fn is_light(self) -> bool {
        (self.col() + self.row()) % 2 == 1
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = (b'a' + self.col() as u8) as char;
        write!(f, "{}{}", file, self.row() + 1)
    }
}

/// Every square on the board, a1 first.
pub fn squares() -> impl DoubleEndedIterator<Item = Square> {
    (0..64).map(Square)
}

macro_rules! named_squares {
    (@next $index:expr,) => {};
    (@next $index:expr, $name:ident $($rest:ident)*) => {
        pub const $name: Square = Square($index);
        named_squares!(@next $index + 1, $($rest)*);
    };
    ($($name:ident)*) => {
        named_squares!(@next 0u8, $($name)*);
    };
}

named_squares! {
    A1 B1 C1 D1 E1 F1 G1 H1
    A2 B2 C2 D2 E2 F2 G2 H2
    A3 B3 C3 D3 E3 F3 G3 H3
    A4 B4 C4 D4 E4 F4 G4 H4
    A5 B5 C5 D5 E5 F5 G5 H5
    A6 B6 C6 D6 E6 F6 G6 H6
    A7 B7 C7 D7 E7 F7 G7 H7
    A8 B8 C8 D8 E8 F8 G8 H8
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    pub const fn toggle(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The row increment that moves a piece of this color towards the opponent.
    pub const fn forward(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// The row this color's pieces start on.
    pub const fn home_row(self) -> i32 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    pub const fn pawn_row(self) -> i32 {
        self.home_row() + self.forward()
    }

    pub const fn promotion_row(self) -> i32 {
        self.toggle().home_row()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const fn is_slider(self) -> bool {
        matches!(self, PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)
    }

    /// Whether or not a piece of this kind travels along rays pointing in the given direction.
    pub const fn slides_along(self, dir: Direction) -> bool {
        match self {
            PieceKind::Bishop => dir.is_diagonal(),
            PieceKind::Rook => !dir.is_diagonal(),
            PieceKind::Queen => true,
            _ => false,
        }
    }

    /// The lowercase letter used for this kind in move strings and board diagrams.
    pub const fn symbol(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<PieceKind> {
        let kind = match symbol.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return None,
        };

        Some(kind)
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub color: Color,
    pub kind: PieceKind,
}

impl Piece {
    pub const fn new(color: Color, kind: PieceKind) -> Piece {
        Piece { color, kind }
    }

    /// Reads the conventional one-letter piece symbol: uppercase for White, lowercase for Black.
    pub fn from_symbol(symbol: char) -> Option<Piece> {
        let kind = PieceKind::from_symbol(symbol)?;
        let color = if symbol.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Some(Piece { color, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.color {
            Color::White => write!(f, "{}", self.kind.symbol().to_ascii_uppercase()),
            Color::Black => write!(f, "{}", self.kind.symbol()),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// The (column, row) step taken by one move in this direction.
    pub const fn offsets(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// The direction whose step has the given signs, if any. Both components must be -1, 0 or 1.
    pub fn from_offsets(dcol: i32, drow: i32) -> Option<Direction> {
        Direction::ALL
            .iter()
            .copied()
            .find(|dir| dir.offsets() == (dcol, drow))
    }

    pub const fn is_diagonal(self) -> bool {
        let (dcol, drow) = self.offsets();
        dcol != 0 && drow != 0
    }
}

bitflags! {
    /// Which of the four castles are still available to the two players.
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE = 0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coords_roundtrip() {
        let sq = Square::from_coords(4, 0).unwrap();
        assert_eq!(sq, E1);
        assert_eq!(sq.col(), 4);
        assert_eq!(sq.row(), 0);
        assert_eq!(H8, Square::from_coords(7, 7).unwrap());
    }

    #[test]
    fn coords_off_board() {
        assert_eq!(Square::from_coords(-1, 0), None);
        assert_eq!(Square::from_coords(0, 8), None);
        assert_eq!(H8.offset(1, 0), None);
        assert_eq!(A1.step(Direction::SouthWest), None);
        assert_eq!(A1.step(Direction::NorthEast), Some(B2));
    }

    #[test]
    fn square_names() {
        assert_eq!(Square::parse('e', '4'), Some(E4));
        assert_eq!(Square::parse('h', '8'), Some(H8));
        assert_eq!(Square::parse('i', '1'), None);
        assert_eq!(Square::parse('a', '9'), None);
        assert_eq!(Square::parse('E', '4'), None);
        assert_eq!(C7.to_string(), "c7");
        assert_eq!(squares().count(), 64);
        assert_eq!(squares().next_back(), Some(H8));
    }

    #[test]
    fn color_rows() {
        assert_eq!(Color::White.pawn_row(), 1);
        assert_eq!(Color::Black.pawn_row(), 6);
        assert_eq!(Color::White.promotion_row(), 7);
        assert_eq!(Color::Black.promotion_row(), 0);
    }

    #[test]
    fn piece_symbols() {
        let white_knight = Piece::from_symbol('N').unwrap();
        assert_eq!(white_knight, Piece::new(Color::White, PieceKind::Knight));
        assert_eq!(white_knight.to_string(), "N");
        let black_queen = Piece::from_symbol('q').unwrap();
        assert_eq!(black_queen, Piece::new(Color::Black, PieceKind::Queen));
        assert_eq!(black_queen.to_string(), "q");
        assert!(Piece::from_symbol('x').is_none());
    }

    #[test]
    fn sliders_match_rays() {
        assert!(PieceKind::Bishop.slides_along(Direction::NorthEast));
        assert!(!PieceKind::Bishop.slides_along(Direction::North));
        assert!(PieceKind::Rook.slides_along(Direction::West));
        assert!(!PieceKind::Rook.slides_along(Direction::SouthWest));
        assert!(PieceKind::Queen.slides_along(Direction::South));
        assert!(!PieceKind::Knight.slides_along(Direction::South));
    }

    #[test]
    fn directions_from_offsets() {
        assert_eq!(Direction::from_offsets(1, -1), Some(Direction::SouthEast));
        assert_eq!(Direction::from_offsets(0, 0), None);
    }
}
