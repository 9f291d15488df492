// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-piece move geometry. Nothing in here knows about pins or checks against the moving side; those are applied
//! afterwards by the side that owns the piece.

use crate::board::{self, Board};
use crate::core::*;
use crate::tracker::{Check, Tracker};

const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// Squares controlled by `piece` standing on `square`: every square it attacks, including squares held by its own
/// pieces. Sliding rays continue through the enemy king, so a king in check cannot step back along the checking line.
pub fn controlled_squares(piece: Piece, square: Square, board: &Board) -> SquareSet {
    let mut occupancy = board.occupancy();
    if let Some(king) = board.king(piece.color.toggle()) {
        occupancy.remove(king);
    }

    attacks(piece.kind, piece.color, square, occupancy)
}

/// Records a check against the enemy king if `controlled` reaches it.
pub fn report_check(
    piece: Piece,
    square: Square,
    controlled: SquareSet,
    board: &Board,
    enemy: &mut Tracker,
) {
    let king = match board.king(piece.color.toggle()) {
        Some(king) => king,
        None => return,
    };

    if !controlled.contains(king) {
        return;
    }

    let blocking = if piece.kind.is_slider() {
        between(square, king)
    } else {
        SquareSet::empty()
    };

    enemy.add_check(Check {
        attacker: square,
        attacker_piece: piece,
        blocking,
    });
}

/// Moves for a non-king piece that respect the geometry of the piece and the occupancy of the board. The enemy king
/// is never a capture target.
pub fn pseudo_legal_moves(piece: Piece, square: Square, board: &Board, moves: &mut Vec<Move>) {
    debug_assert!(
        piece.kind != PieceKind::King,
        "kings have their own movegen routine"
    );

    if piece.kind == PieceKind::Pawn {
        return pawn_moves(piece.color, square, board, moves);
    }

    let own = board.pieces(piece.color);
    let enemy = board.pieces(piece.color.toggle());
    let enemy_king = board.king(piece.color.toggle());
    for target in attacks(piece.kind, piece.color, square, board.occupancy()) & !own {
        if Some(target) == enemy_king {
            continue;
        }

        if enemy.contains(target) {
            moves.push(Move::capture(square, target));
        } else {
            moves.push(Move::quiet(square, target));
        }
    }
}

fn pawn_moves(us: Color, square: Square, board: &Board, moves: &mut Vec<Move>) {
    let them = us.toggle();
    let forward = us.forward();
    let start_row = us.pawn_row();
    let enemy = board.pieces(them);
    let enemy_king = board.king(them);

    // Single and double pushes.
    if let Some(one) = square.offset(0, forward) {
        if board.is_empty(one) {
            push_pawn_move(us, square, one, false, moves);
            if square.row() == start_row {
                if let Some(two) = square.offset(0, 2 * forward) {
                    if board.is_empty(two) {
                        moves.push(Move::double_pawn_push(square, two));
                    }
                }
            }
        }
    }

    // Captures, including en-passant.
    for target in pawn_attacks(square, us) {
        if enemy.contains(target) {
            if Some(target) != enemy_king {
                push_pawn_move(us, square, target, true, moves);
            }
        } else if board.side_to_move() == us && board.en_passant_square() == Some(target) {
            let victim = Square::from_coords(target.col(), square.row());
            let victim_piece = victim.and_then(|sq| board.piece_at(sq));
            if victim_piece == Some(Piece::new(them, PieceKind::Pawn)) {
                moves.push(Move::en_passant(square, target));
            }
        }
    }
}

fn push_pawn_move(us: Color, source: Square, target: Square, capture: bool, moves: &mut Vec<Move>) {
    if target.row() != us.promotion_row() {
        if capture {
            moves.push(Move::capture(source, target));
        } else {
            moves.push(Move::quiet(source, target));
        }

        return;
    }

    for kind in PROMOTION_KINDS {
        if capture {
            moves.push(Move::promotion_capture(source, target, kind));
        } else {
            moves.push(Move::promotion(source, target, kind));
        }
    }
}

/// An en-passant capture lifts two pawns off the same rank at once, which can open a line onto the king that no
/// single-piece pin covers. Replays the capture on the occupancy and looks for an enemy slider with a clear line.
pub fn en_passant_is_safe(us: Color, mov: Move, board: &Board) -> bool {
    let king = match board.king(us) {
        Some(king) => king,
        None => return true,
    };

    let mut occupancy = board.occupancy();
    occupancy.remove(mov.source());
    if let Some(victim) = mov.captured_square() {
        occupancy.remove(victim);
    }
    occupancy.insert(mov.destination());

    let them = us.toggle();
    let straight = board.rooks(them) | board.queens(them);
    let diagonal = board.bishops(them) | board.queens(them);
    (rook_attacks(king, occupancy) & straight).is_empty()
        && (bishop_attacks(king, occupancy) & diagonal).is_empty()
}

/// King moves onto squares the opponent does not control, plus castling when the king is not in check and the
/// squares it crosses are empty and uncontrolled.
pub fn king_moves(
    us: Color,
    square: Square,
    board: &Board,
    forbidden: SquareSet,
    in_check: bool,
    moves: &mut Vec<Move>,
) {
    let own = board.pieces(us);
    let enemy = board.pieces(us.toggle());
    let enemy_king = board.king(us.toggle());
    for target in king_attacks(square) & !own & !forbidden {
        if Some(target) == enemy_king {
            continue;
        }

        if enemy.contains(target) {
            moves.push(Move::capture(square, target));
        } else {
            moves.push(Move::quiet(square, target));
        }
    }

    if in_check || square != board::king_start(us) {
        return;
    }

    let own_rook = Some(Piece::new(us, PieceKind::Rook));
    if board.can_castle_kingside(us) && board.piece_at(board::kingside_rook(us)) == own_rook {
        let crossing = between(square, board::kingside_rook(us));
        if (crossing & board.occupancy()).is_empty() && (crossing & forbidden).is_empty() {
            moves.push(Move::kingside_castle(square, board::kingside_king_landing(us)));
        }
    }

    if board.can_castle_queenside(us) && board.piece_at(board::queenside_rook(us)) == own_rook {
        let crossing = between(square, board::queenside_rook(us));
        let destination = board::queenside_king_landing(us);
        let path = between(square, destination) | SquareSet::of(destination);
        if (crossing & board.occupancy()).is_empty() && (path & forbidden).is_empty() {
            moves.push(Move::queenside_castle(square, destination));
        }
    }
}
