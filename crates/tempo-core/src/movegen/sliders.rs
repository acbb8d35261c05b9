//! Sliding piece (queen, rook, bishop) move generation.

use crate::chess_move::Move;
use crate::color::Color;
use crate::direction::Direction;
use crate::piece::Piece;
use crate::position::Position;

use super::pin_allows;

/// Generate slider moves: walk each applicable ray, stopping at the first
/// occupied square, which is a capture when enemy. A pinned slider only
/// walks rays on its pin axis.
pub(super) fn slider_moves(
    squares: &[Piece; 64],
    from: Position,
    side: Color,
    out: &mut Vec<Move>,
) {
    let piece = squares[from.index()];
    for dir in Direction::RAYS {
        let applies = piece.kind().is_some_and(|kind| kind.slides_along(dir));
        if !applies || !pin_allows(piece, dir) {
            continue;
        }
        let mut dist = 1;
        while let Some(to) = from.offset(dir, dist) {
            let target = squares[to.index()];
            if target.is_empty() {
                out.push(Move::new(from, to));
                dist += 1;
                continue;
            }
            if target.is_color(side.opponent()) {
                out.push(Move::new(from, to));
            }
            break;
        }
    }
}
