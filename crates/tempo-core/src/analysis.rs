//! Position analysis: check detection, pin marking, check-ray marking, and
//! the attacked-square map.
//!
//! One pass over the board produces everything move generation needs: the
//! [`CheckState`], a pin axis on every pinned piece, the check-square flag
//! along the active check ray, and the attacked flag on every square the
//! opposing side reaches. All three flags are ephemeral and must be cleared
//! (via [`Piece::reset`]) before a pass.

use crate::color::Color;
use crate::direction::Direction;
use crate::error::AnalysisError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;

/// How deep in check each king is.
///
/// Named for the side whose king is attacked. Both-sides values do not
/// exist: a position with both kings in check fails analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckLevel {
    None,
    White,
    WhiteDouble,
    Black,
    BlackDouble,
}

/// The color-less projection of a [`CheckLevel`], which is what move
/// generation dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckClass {
    None,
    Single,
    Double,
}

impl CheckLevel {
    /// Return the color-less check class.
    #[inline]
    pub const fn class(self) -> CheckClass {
        match self {
            CheckLevel::None => CheckClass::None,
            CheckLevel::White | CheckLevel::Black => CheckClass::Single,
            CheckLevel::WhiteDouble | CheckLevel::BlackDouble => CheckClass::Double,
        }
    }

    /// Return `true` if this level means the given side's king is attacked.
    #[inline]
    pub const fn applies_to(self, color: Color) -> bool {
        match self {
            CheckLevel::None => false,
            CheckLevel::White | CheckLevel::WhiteDouble => matches!(color, Color::White),
            CheckLevel::Black | CheckLevel::BlackDouble => matches!(color, Color::Black),
        }
    }

    /// Promote the level by one new check against `color`'s king.
    ///
    /// Fails on a third check or when the other king is already in check.
    fn promoted(self, color: Color) -> Result<CheckLevel, AnalysisError> {
        match (self, color) {
            (CheckLevel::None, Color::White) => Ok(CheckLevel::White),
            (CheckLevel::White, Color::White) => Ok(CheckLevel::WhiteDouble),
            (CheckLevel::WhiteDouble, Color::White) => {
                Err(AnalysisError::TripleCheck { color })
            }
            (CheckLevel::None, Color::Black) => Ok(CheckLevel::Black),
            (CheckLevel::Black, Color::Black) => Ok(CheckLevel::BlackDouble),
            (CheckLevel::BlackDouble, Color::Black) => {
                Err(AnalysisError::TripleCheck { color })
            }
            _ => Err(AnalysisError::BothKingsInCheck),
        }
    }
}

/// The derived check state: the level plus the checking piece's square.
///
/// For a double check, `checker` holds the piece found last (the ray
/// attacker when a knight opened the sequence).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckState {
    level: CheckLevel,
    checker: Option<Position>,
}

impl CheckState {
    /// The quiet state: nobody in check.
    pub const NONE: CheckState = CheckState {
        level: CheckLevel::None,
        checker: None,
    };

    /// Return the check level.
    #[inline]
    pub const fn level(self) -> CheckLevel {
        self.level
    }

    /// Return the checking piece's square, if any side is in check.
    #[inline]
    pub const fn checker(self) -> Option<Position> {
        self.checker
    }
}

/// Locate both kings, erroring if either is missing.
fn find_kings(squares: &[Piece; 64]) -> Result<[Position; 2], AnalysisError> {
    let mut kings = [None; 2];
    for pos in Position::all() {
        let piece = squares[pos.index()];
        if piece.kind() == Some(PieceKind::King)
            && let Some(color) = piece.color()
        {
            kings[color.index()] = Some(pos);
        }
    }
    match kings {
        [Some(white), Some(black)] => Ok([white, black]),
        [None, _] => Err(AnalysisError::MissingKing {
            color: Color::White,
        }),
        _ => Err(AnalysisError::MissingKing {
            color: Color::Black,
        }),
    }
}

/// Return `true` if `piece` (an enemy of `king_color`'s king) attacks the
/// king along ray direction `dir` from `dist` squares away.
fn attacks_along(piece: Piece, king_color: Color, dir: Direction, dist: i8) -> bool {
    if dir.is_diagonal() && piece.is_diagonal_slider() {
        return true;
    }
    if dir.is_orthogonal() && piece.is_orthogonal_slider() {
        return true;
    }
    // A pawn checks from one square out, on a ray it captures along.
    piece.kind() == Some(PieceKind::Pawn)
        && dist == 1
        && Direction::pawn_captures(king_color.opponent()).contains(&dir.opposite())
}

/// Run check and pin analysis over the board.
///
/// Expects every square's ephemeral flags to be clear. On success the pin
/// axes and check-square flags are set and the new [`CheckState`] returned;
/// on failure the board is in an impossible state and the squares must not
/// be trusted.
pub(crate) fn analyze(squares: &mut [Piece; 64]) -> Result<CheckState, AnalysisError> {
    let kings = find_kings(squares)?;
    let mut level = CheckLevel::None;
    let mut checker = None;

    // Knight checks first. Two knights on the same king cannot arise from
    // legal play and is reported as its own diagnostic.
    for color in [Color::White, Color::Black] {
        let king = kings[color.index()];
        let mut found = None;
        for jump in Direction::KNIGHT_JUMPS {
            let Some(pos) = king.step(jump) else { continue };
            let piece = squares[pos.index()];
            if piece.kind() == Some(PieceKind::Knight) && piece.is_color(color.opponent()) {
                if found.is_some() {
                    return Err(AnalysisError::DoubleKnightCheck { color });
                }
                found = Some(pos);
            }
        }
        if let Some(pos) = found {
            level = level.promoted(color)?;
            checker = Some(pos);
            squares[pos.index()].set_check_square(true);
        }
    }

    // Ray scan: walk outward from each king. The first piece met either
    // checks (enemy attacker), or may be pinned by the next piece behind it.
    for color in [Color::White, Color::Black] {
        let king = kings[color.index()];
        for dir in Direction::RAYS {
            let mut dist = 1;
            while let Some(pos) = king.offset(dir, dist) {
                let piece = squares[pos.index()];
                if piece.is_empty() {
                    dist += 1;
                    continue;
                }
                if piece.is_color(color.opponent()) {
                    if attacks_along(piece, color, dir, dist) {
                        level = level.promoted(color)?;
                        checker = Some(pos);
                        for k in 1..=dist {
                            if let Some(ray_sq) = king.offset(dir, k) {
                                squares[ray_sq.index()].set_check_square(true);
                            }
                        }
                    }
                } else {
                    // Friendly blocker: pinned if the next piece out attacks
                    // along this ray.
                    let mut behind = dist + 1;
                    while let Some(back_pos) = king.offset(dir, behind) {
                        let back = squares[back_pos.index()];
                        if back.is_empty() {
                            behind += 1;
                            continue;
                        }
                        if back.is_color(color.opponent())
                            && attacks_along(back, color, dir, behind)
                            && let Some(axis) = dir.axis()
                        {
                            squares[pos.index()].set_pin(axis);
                        }
                        break;
                    }
                }
                break;
            }
        }
    }

    Ok(CheckState { level, checker })
}

/// Mark every square attacked by `attacker`.
///
/// Slider rays mark through the first obstruction inclusive, with one
/// exception: the defending king does not stop a ray, so the square behind a
/// checked king along the checking ray stays attacked and the king cannot
/// retreat along it.
pub(crate) fn mark_attacked(squares: &mut [Piece; 64], attacker: Color) {
    let defender = attacker.opponent();
    for from in Position::all() {
        let piece = squares[from.index()];
        if !piece.is_color(attacker) {
            continue;
        }
        match piece.kind() {
            Some(PieceKind::Knight) => {
                for jump in Direction::KNIGHT_JUMPS {
                    if let Some(pos) = from.step(jump) {
                        squares[pos.index()].set_attacked(true);
                    }
                }
            }
            Some(PieceKind::King) => {
                for dir in Direction::RAYS {
                    if let Some(pos) = from.step(dir) {
                        squares[pos.index()].set_attacked(true);
                    }
                }
            }
            Some(PieceKind::Pawn) => {
                for dir in Direction::pawn_captures(attacker) {
                    if let Some(pos) = from.step(dir) {
                        squares[pos.index()].set_attacked(true);
                    }
                }
            }
            Some(kind) => {
                for dir in Direction::RAYS {
                    if !kind.slides_along(dir) {
                        continue;
                    }
                    let mut dist = 1;
                    while let Some(pos) = from.offset(dir, dist) {
                        let target = squares[pos.index()];
                        squares[pos.index()].set_attacked(true);
                        if target.is_empty() {
                            dist += 1;
                            continue;
                        }
                        // See through the defender's king only.
                        if target.kind() == Some(PieceKind::King) && target.is_color(defender)
                        {
                            dist += 1;
                            continue;
                        }
                        break;
                    }
                }
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CheckClass, CheckLevel, CheckState};
    use crate::board::Board;
    use crate::color::Color;
    use crate::error::{AnalysisError, FenError};
    use crate::piece::PinAxis;
    use crate::position::Position;

    fn pos(file: i8, rank: i8) -> Position {
        Position::new(file, rank).unwrap()
    }

    #[test]
    fn knight_check_detected() {
        let board: Board = "K7/2n5/8/8/8/8/8/7k w 0".parse().unwrap();
        assert_eq!(board.check().level(), CheckLevel::Black);
        assert_eq!(board.check().checker(), Some(pos(2, 1)));
        for p in Position::all() {
            assert_eq!(board.piece_at(p).pin(), PinAxis::None);
        }
    }

    #[test]
    fn queen_pinned_through_diagonal() {
        let board: Board = "k7/1PP5/8/8/4b3/8/6Q1/7K w 0".parse().unwrap();
        assert_eq!(board.check().level(), CheckLevel::None);
        assert_eq!(board.piece_at(pos(6, 6)).pin(), PinAxis::DiagonalSe);
        for p in Position::all() {
            if p != pos(6, 6) {
                assert_eq!(board.piece_at(p).pin(), PinAxis::None);
            }
        }
    }

    #[test]
    fn interposed_rook_breaks_pin() {
        let board: Board = "k7/P7/8/8/4b3/5R2/6Q1/7K w 0".parse().unwrap();
        assert_eq!(board.check().level(), CheckLevel::White);
        assert_eq!(board.check().checker(), Some(pos(0, 1)));
        for p in Position::all() {
            assert_eq!(board.piece_at(p).pin(), PinAxis::None);
        }
    }

    #[test]
    fn double_check_knight_and_queen() {
        let board: Board = "kp6/p7/1NQ5/8/8/8/8/7K w 0".parse().unwrap();
        assert_eq!(board.check().level(), CheckLevel::WhiteDouble);
        assert_eq!(board.check().checker(), Some(pos(2, 2)));
        assert_eq!(board.check().level().class(), CheckClass::Double);
        // Both the knight's square and the queen's ray are check squares.
        assert!(board.piece_at(pos(1, 2)).is_check_square());
        assert!(board.piece_at(pos(1, 1)).is_check_square());
        assert!(board.piece_at(pos(2, 2)).is_check_square());
    }

    #[test]
    fn triple_check_rejected() {
        let err = "kp6/p7/1NQ5/8/8/8/8/6rK w 0".parse::<Board>().unwrap_err();
        assert!(matches!(err, FenError::Analysis(_)));
    }

    #[test]
    fn missing_king_rejected() {
        let err = "8/8/8/8/8/8/8/7k w 0".parse::<Board>().unwrap_err();
        assert_eq!(
            err,
            FenError::MissingKing {
                color: Color::Black
            }
        );
    }

    #[test]
    fn two_knight_check_is_diagnosed() {
        // Knights on both jump squares of the white king.
        let board = "k7/2N5/1N6/8/8/8/8/7K w 0".parse::<Board>();
        assert!(matches!(
            board,
            Err(FenError::Analysis(AnalysisError::DoubleKnightCheck {
                color: Color::White
            }))
        ));
    }

    #[test]
    fn xray_marks_square_behind_king() {
        // Black rook checks the white king along rank 0; the square behind
        // the king stays attacked, so the king may not retreat along the ray.
        let board: Board = "1k5R/8/8/8/8/8/8/7K w 0".parse().unwrap();
        assert_eq!(board.check().level(), CheckLevel::White);
        assert!(board.piece_at(pos(0, 0)).is_attacked());
        for mv in board.legal_moves() {
            assert_ne!(mv.to(), pos(0, 0));
        }
    }

    #[test]
    fn quiet_start_position() {
        let board = Board::new();
        assert_eq!(board.check(), CheckState::NONE);
        for p in Position::all() {
            assert!(!board.piece_at(p).is_check_square());
            assert_eq!(board.piece_at(p).pin(), PinAxis::None);
        }
    }
}
