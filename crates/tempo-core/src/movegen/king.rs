//! King move generation.

use crate::chess_move::Move;
use crate::color::Color;
use crate::direction::Direction;
use crate::piece::Piece;
use crate::position::Position;

/// Generate king moves: one step along any ray direction onto an empty or
/// enemy square that the opposing side does not attack.
///
/// The attacked map already accounts for the see-through-king rule, so a
/// checked king cannot retreat along the checking ray, and defended enemy
/// pieces are never captured.
pub(super) fn king_moves(
    squares: &[Piece; 64],
    from: Position,
    side: Color,
    out: &mut Vec<Move>,
) {
    for dir in Direction::RAYS {
        let Some(to) = from.step(dir) else { continue };
        let target = squares[to.index()];
        if target.is_attacked() {
            continue;
        }
        if target.is_empty() || target.is_color(side.opponent()) {
            out.push(Move::new(from, to));
        }
    }
}
