//! Pawn move generation.
//!
//! Pawns advance along the long diagonal and capture along the two
//! orthogonals flanking it (White: push up-right, capture up and right;
//! Black mirrored). The double step is available while the pawn has never
//! moved and both squares ahead are empty.

use crate::chess_move::Move;
use crate::color::Color;
use crate::direction::Direction;
use crate::piece::Piece;
use crate::position::Position;

use super::pin_allows;

pub(super) fn pawn_moves(
    squares: &[Piece; 64],
    from: Position,
    side: Color,
    out: &mut Vec<Move>,
) {
    let piece = squares[from.index()];

    for dir in Direction::pawn_captures(side) {
        if !pin_allows(piece, dir) {
            continue;
        }
        if let Some(to) = from.step(dir)
            && squares[to.index()].is_color(side.opponent())
        {
            out.push(Move::new(from, to));
        }
    }

    let push = Direction::pawn_push(side);
    if !pin_allows(piece, push) {
        return;
    }
    if let Some(to) = from.step(push)
        && squares[to.index()].is_empty()
    {
        out.push(Move::new(from, to));
        if !piece.has_moved()
            && let Some(far) = from.offset(push, 2)
            && squares[far.index()].is_empty()
        {
            out.push(Move::new(from, far));
        }
    }
}
