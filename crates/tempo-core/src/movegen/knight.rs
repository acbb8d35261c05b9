//! Knight move generation.

use crate::chess_move::Move;
use crate::color::Color;
use crate::direction::Direction;
use crate::piece::{Piece, PinAxis};
use crate::position::Position;

/// Generate knight moves. A pinned knight can never stay on its pin axis,
/// so it generates nothing at all.
pub(super) fn knight_moves(
    squares: &[Piece; 64],
    from: Position,
    side: Color,
    out: &mut Vec<Move>,
) {
    if squares[from.index()].pin() != PinAxis::None {
        return;
    }
    for jump in Direction::KNIGHT_JUMPS {
        let Some(to) = from.step(jump) else { continue };
        let target = squares[to.index()];
        if target.is_empty() || target.is_color(side.opponent()) {
            out.push(Move::new(from, to));
        }
    }
}
