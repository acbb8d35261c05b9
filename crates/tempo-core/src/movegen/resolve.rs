//! Single-check resolution: find the non-king moves that block the check
//! ray or capture the checking piece.
//!
//! Rather than generating every friendly move and filtering, the probe runs
//! backwards: from each square on the check ray, look outward for a friendly
//! piece that could land there.

use crate::chess_move::Move;
use crate::color::Color;
use crate::direction::Direction;
use crate::piece::{Piece, PinAxis};
use crate::piece_kind::PieceKind;
use crate::position::Position;

use super::pin_allows;

/// Return `true` if `piece`, sitting `dist` squares along `dir` from the
/// check square, can move back onto it. `occupied` says whether the check
/// square holds the checker (a capture) or is an empty blocking square.
fn can_reach(piece: Piece, side: Color, dir: Direction, dist: i8, occupied: bool) -> bool {
    if !pin_allows(piece, dir) {
        return false;
    }
    match piece.kind() {
        Some(kind) if kind.slides_along(dir) => true,
        Some(PieceKind::Pawn) => {
            if occupied {
                // Capturing the checker.
                dist == 1 && Direction::pawn_captures(side).contains(&dir.opposite())
            } else {
                // Blocking by push; the walked squares are empty, which is
                // exactly the double-step requirement.
                dir.opposite() == Direction::pawn_push(side)
                    && (dist == 1 || (dist == 2 && !piece.has_moved()))
            }
        }
        // Kings never block their own check; knights are probed separately.
        _ => false,
    }
}

pub(super) fn resolving_moves(squares: &[Piece; 64], side: Color, out: &mut Vec<Move>) {
    for cs in Position::all() {
        if !squares[cs.index()].is_check_square() {
            continue;
        }
        let target = squares[cs.index()];
        if !target.is_empty() && !target.is_color(side.opponent()) {
            continue;
        }
        let occupied = !target.is_empty();

        for dir in Direction::RAYS {
            let mut dist = 1;
            while let Some(from) = cs.offset(dir, dist) {
                let piece = squares[from.index()];
                if piece.is_empty() {
                    dist += 1;
                    continue;
                }
                if piece.is_color(side)
                    && piece.kind() != Some(PieceKind::King)
                    && can_reach(piece, side, dir, dist, occupied)
                {
                    out.push(Move::new(from, cs));
                }
                break;
            }
        }

        for jump in Direction::KNIGHT_JUMPS {
            let Some(from) = cs.step(jump) else { continue };
            let piece = squares[from.index()];
            if piece.is_color(side)
                && piece.kind() == Some(PieceKind::Knight)
                && piece.pin() == PinAxis::None
            {
                out.push(Move::new(from, cs));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::Board;
    use crate::position::Position;

    fn pos(file: i8, rank: i8) -> Position {
        Position::new(file, rank).unwrap()
    }

    fn has_move(board: &Board, from: Position, to: Position) -> bool {
        board
            .legal_moves()
            .iter()
            .any(|m| m.from() == from && m.to() == to)
    }

    #[test]
    fn knight_blocks_check() {
        // Black rook checks up the file; the white knight can interpose.
        let board: Board = "k7/8/8/R7/2n5/8/8/7K w 0".parse().unwrap();
        assert!(has_move(&board, pos(2, 4), pos(0, 3)));
    }

    #[test]
    fn pinned_knight_cannot_block() {
        // The knight could capture the checking rook, but a bishop pins it
        // to the king along the diagonal.
        let board: Board = "k7/1n6/8/R7/4B3/8/8/7K w 0".parse().unwrap();
        assert!(!has_move(&board, pos(1, 1), pos(0, 3)));
    }

    #[test]
    fn pawn_blocks_by_double_push() {
        // Black rook checks along rank 6 toward the king; the unmoved white
        // pawn at its origin can double-step onto the ray.
        let board: Board = "8/8/8/8/p7/8/k5R1/7K w 0".parse().unwrap();
        assert!(has_move(&board, pos(0, 4), pos(2, 6)));
    }

    #[test]
    fn rook_captures_checker() {
        let board: Board = "k7/8/R7/8/r7/8/8/7K w 0".parse().unwrap();
        assert!(has_move(&board, pos(0, 4), pos(0, 2)));
    }
}
