// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::{fmt, ops};

use derive_more::{Add, AddAssign, From, Neg, Sub, Sum};

/// A raw evaluation term in centipawns. Scores are what aspects and pieces produce; they are summed per side and
/// the difference between the two sides becomes the game's `Value` unless the game is over or drawn.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Add, Sub, Neg, AddAssign, Sum, From,
)]
pub struct Score(pub i32);

impl Score {
    pub const ZERO: Score = Score(0);

    pub fn centipawns(self) -> i32 {
        self.0
    }
}

impl ops::Mul<i32> for Score {
    type Output = Score;

    fn mul(self, rhs: i32) -> Self::Output {
        Score(self.0.saturating_mul(rhs))
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Score;

    #[test]
    fn score_arithmetic() {
        let total: Score = vec![Score(3), Score(-1), Score(10)].into_iter().sum();
        assert_eq!(total, Score(12));
        assert_eq!(-total * 2, Score(-24));
        assert_eq!(Score(5) - Score(7), Score(-2));
    }
}
