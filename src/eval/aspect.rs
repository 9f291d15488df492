// Copyright 2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Side-level evaluation aspects.
//!
//! An aspect is a scalar measurement of one side's position (pawns in front of the king, number of pins, ...) paired
//! with a fixed coefficient. Its contribution is always `coefficient * value`, recomputed from the current state on
//! every call. Adding a new aspect means adding an `AspectKind` variant, its measurement in `Aspect::value`, and its
//! coefficient in `Weights`.

use std::fmt;

use serde::Serialize;

use crate::{
    board::Board,
    core::*,
    eval::{analysis, Score, Weights},
    side::Side,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AspectKind {
    Material,
    Mobility,
    PawnShield,
    BishopPair,
    ConnectedRooks,
    PassedPawns,
    PawnIslands,
    DoubledPawns,
    IsolatedPawns,
    BackwardPawns,
    PawnMobility,
    Pins,
    ColorWeakness,
    OpponentCheckmated,
}

impl AspectKind {
    pub const ALL: [AspectKind; 14] = [
        AspectKind::Material,
        AspectKind::Mobility,
        AspectKind::PawnShield,
        AspectKind::BishopPair,
        AspectKind::ConnectedRooks,
        AspectKind::PassedPawns,
        AspectKind::PawnIslands,
        AspectKind::DoubledPawns,
        AspectKind::IsolatedPawns,
        AspectKind::BackwardPawns,
        AspectKind::PawnMobility,
        AspectKind::Pins,
        AspectKind::ColorWeakness,
        AspectKind::OpponentCheckmated,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AspectKind::Material => "material",
            AspectKind::Mobility => "mobility",
            AspectKind::PawnShield => "pawn shield",
            AspectKind::BishopPair => "bishop pair",
            AspectKind::ConnectedRooks => "connected rooks",
            AspectKind::PassedPawns => "passed pawns",
            AspectKind::PawnIslands => "pawn islands",
            AspectKind::DoubledPawns => "doubled pawns",
            AspectKind::IsolatedPawns => "isolated pawns",
            AspectKind::BackwardPawns => "backward pawns",
            AspectKind::PawnMobility => "pawn mobility",
            AspectKind::Pins => "pins",
            AspectKind::ColorWeakness => "color weakness",
            AspectKind::OpponentCheckmated => "opponent checkmated",
        }
    }

    /// The coefficient configured for this aspect.
    pub fn coefficient(self, weights: &Weights) -> i32 {
        match self {
            AspectKind::Material => weights.material,
            AspectKind::Mobility => weights.mobility,
            AspectKind::PawnShield => weights.pawn_shield,
            AspectKind::BishopPair => weights.bishop_pair,
            AspectKind::ConnectedRooks => weights.connected_rooks,
            AspectKind::PassedPawns => weights.passed_pawns,
            AspectKind::PawnIslands => weights.pawn_islands,
            AspectKind::DoubledPawns => weights.doubled_pawns,
            AspectKind::IsolatedPawns => weights.isolated_pawns,
            AspectKind::BackwardPawns => weights.backward_pawns,
            AspectKind::PawnMobility => weights.pawn_mobility,
            AspectKind::Pins => weights.pins,
            AspectKind::ColorWeakness => weights.color_weakness,
            AspectKind::OpponentCheckmated => weights.opponent_checkmated,
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Everything an aspect may look at: the board and both sides as left by the last legality pass.
#[derive(Copy, Clone)]
pub struct Context<'a> {
    pub board: &'a Board,
    pub side: &'a Side,
    pub opponent: &'a Side,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aspect {
    kind: AspectKind,
    coefficient: i32,
}

impl Aspect {
    pub fn new(kind: AspectKind, coefficient: i32) -> Aspect {
        Aspect { kind, coefficient }
    }

    pub fn kind(&self) -> AspectKind {
        self.kind
    }

    pub fn coefficient(&self) -> i32 {
        self.coefficient
    }

    pub fn evaluate(&self, ctx: &Context<'_>) -> Score {
        Score(self.value(ctx)) * self.coefficient
    }

    /// The unweighted measurement.
    pub fn value(&self, ctx: &Context<'_>) -> i32 {
        let board = ctx.board;
        let color = ctx.side.color();
        match self.kind {
            AspectKind::Material => ctx.side.count_material(),
            AspectKind::Mobility => ctx.side.number_of_possible_moves() as i32,
            AspectKind::PawnShield => pawn_shield(board, color, ctx.side.king().square()),
            AspectKind::BishopPair => bishop_pair(board, color) as i32,
            AspectKind::ConnectedRooks => connected_rooks(board, color),
            AspectKind::PassedPawns => analysis::passed_pawns(board, color).len() as i32,
            AspectKind::PawnIslands => analysis::pawn_islands(board, color) as i32,
            AspectKind::DoubledPawns => analysis::doubled_pawns(board, color).len() as i32,
            AspectKind::IsolatedPawns => analysis::isolated_pawns(board, color).len() as i32,
            AspectKind::BackwardPawns => analysis::backward_pawns(board, color).len() as i32,
            AspectKind::PawnMobility => ctx
                .side
                .units()
                .iter()
                .filter(|unit| unit.kind() == PieceKind::Pawn)
                .map(|unit| unit.moves().len() as i32)
                .sum(),
            AspectKind::Pins => ctx.side.king().tracker().pins().len() as i32,
            AspectKind::ColorWeakness => color_weakness(board, color),
            AspectKind::OpponentCheckmated => ctx.opponent.is_checkmated() as i32,
        }
    }
}

/// One aspect of every kind, weighted by `weights`.
pub fn standard_aspects(weights: &Weights) -> Vec<Aspect> {
    AspectKind::ALL
        .iter()
        .map(|&kind| Aspect::new(kind, kind.coefficient(weights)))
        .collect()
}

/// Friendly pawns on the three squares directly in front of the king, 0 to 3.
fn pawn_shield(board: &Board, color: Color, king: Square) -> i32 {
    let own_pawn = Some(Piece::new(color, PieceKind::Pawn));
    (-1..=1)
        .filter_map(|dcol| king.offset(dcol, color.forward()))
        .filter(|&sq| board.piece_at(sq) == own_pawn)
        .count() as i32
}

/// Both a light-squared and a dark-squared bishop.
fn bishop_pair(board: &Board, color: Color) -> bool {
    let bishops = board.bishops(color);
    !(bishops & SquareSet::LIGHT).is_empty() && !(bishops & !SquareSet::LIGHT).is_empty()
}

/// Pairs of rooks that see each other along a rank or file.
fn connected_rooks(board: &Board, color: Color) -> i32 {
    let rooks: Vec<Square> = board.rooks(color).into_iter().collect();
    let occupancy = board.occupancy();
    let mut pairs = 0;
    for (i, &a) in rooks.iter().enumerate() {
        for &b in &rooks[i + 1..] {
            let aligned = a.row() == b.row() || a.col() == b.col();
            if aligned && (between(a, b) & occupancy).is_empty() {
                pairs += 1;
            }
        }
    }

    pairs
}

/// For each square color that has no friendly bishop to cover it, the friendly pawns standing on the other color.
/// Those pawns can never guard the uncovered squares.
fn color_weakness(board: &Board, color: Color) -> i32 {
    let bishops = board.bishops(color);
    let pawns = board.pawns(color);
    let dark = !SquareSet::LIGHT;
    let mut weakness = 0;
    if (bishops & SquareSet::LIGHT).is_empty() {
        weakness += (pawns & dark).len();
    }

    if (bishops & dark).is_empty() {
        weakness += (pawns & SquareSet::LIGHT).len();
    }

    weakness as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Game;

    fn board(pieces: &[(Square, char)]) -> Board {
        let placed: Vec<_> = pieces
            .iter()
            .map(|&(sq, c)| (sq, Piece::from_symbol(c).unwrap()))
            .collect();
        Board::with_pieces(&placed, Color::White).unwrap()
    }

    #[test]
    fn pawn_shield_max_and_decrement() {
        let full = board(&[(G1, 'K'), (F2, 'P'), (G2, 'P'), (H2, 'P'), (E8, 'k')]);
        assert_eq!(pawn_shield(&full, Color::White, G1), 3);

        let missing = board(&[(G1, 'K'), (F2, 'P'), (H2, 'P'), (E8, 'k')]);
        assert_eq!(pawn_shield(&missing, Color::White, G1), 2);
    }

    #[test]
    fn pawn_shield_ignores_enemy_pawns() {
        let b = board(&[(G1, 'K'), (F2, 'p'), (G2, 'P'), (E8, 'k')]);
        assert_eq!(pawn_shield(&b, Color::White, G1), 1);
    }

    #[test]
    fn pawn_shield_on_board_edge() {
        let b = board(&[(H1, 'K'), (G2, 'P'), (H2, 'P'), (E8, 'k')]);
        assert_eq!(pawn_shield(&b, Color::White, H1), 2);
        let black = board(&[(E1, 'K'), (B8, 'k'), (A7, 'p'), (B7, 'p'), (C7, 'p')]);
        assert_eq!(pawn_shield(&black, Color::Black, B8), 3);
    }

    #[test]
    fn bishop_pair_needs_both_colors() {
        let pair = board(&[(E1, 'K'), (C1, 'B'), (F1, 'B'), (E8, 'k')]);
        assert!(bishop_pair(&pair, Color::White));

        let same_color = board(&[(E1, 'K'), (C1, 'B'), (E3, 'B'), (E8, 'k')]);
        assert!(!bishop_pair(&same_color, Color::White));
    }

    #[test]
    fn rooks_connected_when_nothing_between() {
        let connected = board(&[(E1, 'K'), (A1, 'R'), (A5, 'R'), (E8, 'k')]);
        assert_eq!(connected_rooks(&connected, Color::White), 1);

        let blocked = board(&[(E1, 'K'), (A1, 'R'), (H1, 'R'), (E8, 'k')]);
        assert_eq!(connected_rooks(&blocked, Color::White), 0);
    }

    #[test]
    fn color_weakness_without_light_bishop() {
        // c1 is dark: the light squares are uncovered, and the pawns on dark squares cannot help.
        let b = board(&[(E1, 'K'), (C1, 'B'), (A1, 'P'), (C3, 'P'), (B3, 'P'), (E8, 'k')]);
        assert_eq!(color_weakness(&b, Color::White), 2);
    }

    #[test]
    fn no_bishops_weakens_both_colors() {
        let b = board(&[(E1, 'K'), (A2, 'P'), (B2, 'P'), (E8, 'k')]);
        assert_eq!(color_weakness(&b, Color::White), 2);
    }

    fn game(pieces: &[(Square, char)], weights: Weights) -> Game {
        let placed: Vec<_> = pieces
            .iter()
            .map(|&(sq, c)| (sq, Piece::from_symbol(c).unwrap()))
            .collect();
        let board = Board::with_pieces(&placed, Color::White).unwrap();
        Game::from_board(board, weights).unwrap()
    }

    fn aspect_of(game: &Game, color: Color, kind: AspectKind) -> (i32, Score) {
        let ctx = Context {
            board: game.board(),
            side: game.side(color),
            opponent: game.side(color.toggle()),
        };
        let aspect = Aspect::new(kind, kind.coefficient(game.weights()));
        (aspect.value(&ctx), aspect.evaluate(&ctx))
    }

    #[test]
    fn mobility_at_the_start() {
        let game = Game::new(Weights::default());
        assert_eq!(
            aspect_of(&game, Color::White, AspectKind::Mobility),
            (20, Score(200))
        );
        assert_eq!(
            aspect_of(&game, Color::Black, AspectKind::PawnMobility),
            (16, Score(80))
        );
    }

    #[test]
    fn one_pin_is_penalized() {
        let game = game(&[(E1, 'K'), (E3, 'B'), (E8, 'r'), (A8, 'k')], Weights::default());
        assert_eq!(
            aspect_of(&game, Color::White, AspectKind::Pins),
            (1, Score(-20))
        );
        assert_eq!(
            aspect_of(&game, Color::Black, AspectKind::Pins),
            (0, Score(0))
        );
    }

    #[test]
    fn checkmating_the_opponent_is_rewarded() {
        let mut game = Game::new(Weights::default());
        for mov in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            game.make_uci_move(mov).unwrap();
        }

        assert_eq!(
            aspect_of(&game, Color::Black, AspectKind::OpponentCheckmated),
            (1, Score(10000))
        );
        assert_eq!(
            aspect_of(&game, Color::White, AspectKind::OpponentCheckmated),
            (0, Score(0))
        );

        let mut unrewarded = Game::new(Weights {
            opponent_checkmated: 0,
            ..Weights::default()
        });
        for mov in ["f2f3", "e7e5", "g2g4", "d8h4"] {
            unrewarded.make_uci_move(mov).unwrap();
        }

        let black = game.side(Color::Black);
        let plain = unrewarded.side(Color::Black);
        assert_eq!(
            black.evaluate(game.board(), game.side(Color::White))
                - plain.evaluate(unrewarded.board(), unrewarded.side(Color::White)),
            Score(10000)
        );
    }

    #[test]
    fn coefficients_follow_weights() {
        let mut weights = Weights::default();
        weights.pins = -40;
        let aspects = standard_aspects(&weights);
        let pins = aspects.iter().find(|a| a.kind() == AspectKind::Pins).unwrap();
        assert_eq!(pins.coefficient(), -40);
        let shield = aspects.iter().find(|a| a.kind() == AspectKind::PawnShield).unwrap();
        assert_eq!(shield.coefficient(), 30);
    }
}
