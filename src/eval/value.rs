// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::{core::Color, eval::Score};

/// Why a game is scored as drawn.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Draw {
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// The side ahead has no pawns and a single knight or bishop.
    LoneMinorPiece,
    /// The side ahead has no pawns and exactly two knights against a bare king.
    TwoKnights,
    /// Only the two kings are left.
    BareKings,
}

impl fmt::Display for Draw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Draw::Stalemate => "stalemate",
            Draw::LoneMinorPiece => "lone minor piece",
            Draw::TwoKnights => "two knights",
            Draw::BareKings => "bare kings",
        };

        f.write_str(reason)
    }
}

/// The value of a whole game, from White's point of view. A game that is over, or that can no longer be won, says
/// so directly instead of hiding the outcome in a magic centipawn number.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// The given color has checkmated its opponent.
    Win(Color),
    Draw(Draw),
    /// White's total minus Black's.
    Score(Score),
}

impl Value {
    /// The color that has won, if any.
    pub fn winner(self) -> Option<Color> {
        match self {
            Value::Win(color) => Some(color),
            Value::Draw(_) | Value::Score(_) => None,
        }
    }

    /// Centipawns in White's favor. Draws count as zero and wins saturate at the ends of the range, so that values
    /// can be compared and sorted.
    pub fn white_advantage(self) -> i32 {
        match self {
            Value::Win(Color::White) => i32::MAX,
            Value::Win(Color::Black) => i32::MIN,
            Value::Draw(_) => 0,
            Value::Score(score) => score.centipawns(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Win(color) => write!(f, "{} wins by checkmate", color),
            Value::Draw(reason) => write!(f, "draw ({})", reason),
            Value::Score(score) => write!(f, "{}", score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcomes_order_by_white_advantage() {
        let values = [
            Value::Win(Color::Black),
            Value::Score(Score(-250)),
            Value::Draw(Draw::BareKings),
            Value::Score(Score(40)),
            Value::Win(Color::White),
        ];

        for pair in values.windows(2) {
            assert!(pair[0].white_advantage() < pair[1].white_advantage());
        }
    }

    #[test]
    fn describes_the_outcome() {
        assert_eq!(Value::Win(Color::White).to_string(), "white wins by checkmate");
        assert_eq!(Value::Draw(Draw::TwoKnights).to_string(), "draw (two knights)");
        assert_eq!(Value::Score(Score(-42)).to_string(), "-42");
        assert_eq!(Value::Win(Color::Black).winner(), Some(Color::Black));
        assert_eq!(Value::Draw(Draw::Stalemate).winner(), None);
    }
}
