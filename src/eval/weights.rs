// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use serde::{Deserialize, Serialize};

/// Every tunable coefficient of the evaluator, in centipawns per unit of the term it scales.
///
/// Weights are fixed when a `Side` is built. Fields missing from a deserialized document keep their default value, so
/// a weights file only needs to name the terms it overrides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub material: i32,
    pub mobility: i32,
    pub pawn_shield: i32,
    pub bishop_pair: i32,
    pub connected_rooks: i32,
    pub passed_pawns: i32,
    pub pawn_islands: i32,
    pub doubled_pawns: i32,
    pub isolated_pawns: i32,
    pub backward_pawns: i32,
    pub pawn_mobility: i32,
    pub pins: i32,
    pub color_weakness: i32,
    pub opponent_checkmated: i32,

    /// Loss of knight value per sixteen pawns left on the board.
    pub knight_pawn_decay: i32,
    /// Knight value per square it reaches that no enemy pawn controls.
    pub knight_mobility: i32,
    pub bishop_mobility: i32,
    pub rook_open_file: i32,
    pub rook_semi_open_file: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            material: 1,
            mobility: 10,
            pawn_shield: 30,
            bishop_pair: 50,
            connected_rooks: 15,
            passed_pawns: 20,
            pawn_islands: -15,
            doubled_pawns: -10,
            isolated_pawns: -17,
            backward_pawns: -10,
            pawn_mobility: 5,
            pins: -20,
            color_weakness: -5,
            opponent_checkmated: 10000,
            knight_pawn_decay: 100,
            knight_mobility: 20,
            bishop_mobility: 5,
            rook_open_file: 25,
            rook_semi_open_file: 10,
        }
    }
}
