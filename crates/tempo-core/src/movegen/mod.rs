//! Legal move generation.
//!
//! Generation dispatches on the color-less check class. Out of check, every
//! friendly piece generates under its pin axis; in single check, only king
//! moves and moves landing on a check square are produced; in double check,
//! the king moves alone.

mod king;
mod knight;
mod pawn;
mod resolve;
mod sliders;

use crate::analysis::{CheckClass, CheckState};
use crate::chess_move::Move;
use crate::color::Color;
use crate::direction::Direction;
use crate::piece::{Piece, PinAxis};
use crate::piece_kind::PieceKind;
use crate::position::Position;

use self::king::king_moves;
use self::knight::knight_moves;
use self::pawn::pawn_moves;
use self::resolve::resolving_moves;
use self::sliders::slider_moves;

/// Return `true` if the piece's pin axis permits motion along `dir`.
fn pin_allows(piece: Piece, dir: Direction) -> bool {
    piece.pin() == PinAxis::None || dir.axis() == Some(piece.pin())
}

/// Find the given side's king.
fn king_of(squares: &[Piece; 64], side: Color) -> Option<Position> {
    Position::all().find(|pos| {
        let piece = squares[pos.index()];
        piece.kind() == Some(PieceKind::King) && piece.is_color(side)
    })
}

/// Generate the legal moves for `side` under the analyzed flags.
///
/// The squares must carry fresh analysis output: pin axes, check-square
/// marks, and the attacked map for the opposing side.
pub(crate) fn generate(squares: &[Piece; 64], side: Color, check: CheckState) -> Vec<Move> {
    let mut moves = Vec::new();
    let Some(king) = king_of(squares, side) else {
        return moves;
    };

    match check.level().class() {
        CheckClass::None => {
            for from in Position::all() {
                let piece = squares[from.index()];
                if !piece.is_color(side) {
                    continue;
                }
                match piece.kind() {
                    Some(PieceKind::King) => king_moves(squares, from, side, &mut moves),
                    Some(PieceKind::Knight) => knight_moves(squares, from, side, &mut moves),
                    Some(PieceKind::Pawn) => pawn_moves(squares, from, side, &mut moves),
                    Some(PieceKind::Queen | PieceKind::Bishop | PieceKind::Rook) => {
                        slider_moves(squares, from, side, &mut moves);
                    }
                    _ => {}
                }
            }
        }
        CheckClass::Single => {
            king_moves(squares, king, side, &mut moves);
            resolving_moves(squares, side, &mut moves);
        }
        CheckClass::Double => {
            king_moves(squares, king, side, &mut moves);
        }
    }

    moves
}
