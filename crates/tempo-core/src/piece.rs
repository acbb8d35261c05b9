//! Per-square piece record, bit-packed into a single `u16`.

use std::fmt;

use crate::color::Color;
use crate::piece_kind::PieceKind;

const COLOR_MASK: u16 = 0x0003;
const KIND_MASK: u16 = 0x001C;
const PIN_MASK: u16 = 0x00E0;
const KIND_SHIFT: u32 = 2;
const PIN_SHIFT: u32 = 5;
const ATTACKED_BIT: u16 = 1 << 8;
const CHECK_SQUARE_BIT: u16 = 1 << 9;
const HAS_MOVED_BIT: u16 = 1 << 10;

/// The axis a pinned piece is confined to.
///
/// `DiagonalSe` is the axis of the up-right/down-left ray pair, `DiagonalSw`
/// the other diagonal. A piece pinned on an axis may only move along that
/// axis; a pinned knight may not move at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PinAxis {
    None = 0,
    DiagonalSe = 1,
    DiagonalSw = 2,
    Vertical = 3,
    Horizontal = 4,
}

/// The full per-square record.
///
/// Bit layout:
/// ```text
/// bits 0-1: occupancy color (0 = empty, 1 = White, 2 = Black)
/// bits 2-4: piece kind
/// bits 5-7: pin axis
/// bit  8:   attacked by the opposing side
/// bit  9:   lies on the active check ray
/// bit 10:   has moved at least once
/// ```
///
/// Color, kind, and the has-moved flag are persistent; the pin axis and the
/// attacked/check-square flags are rederived on every analysis pass and
/// cleared by [`reset`](Piece::reset).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece(u16);

impl Piece {
    /// The empty square.
    pub const EMPTY: Piece = Piece(0);

    /// Create an occupied square holding a fresh (unmoved) piece.
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Piece {
        Piece((color as u16 + 1) | ((kind as u16) << KIND_SHIFT))
    }

    /// Return `true` if no piece occupies the square.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 & COLOR_MASK == 0
    }

    /// Return the color of the occupying piece, or `None` for an empty square.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self.0 & COLOR_MASK {
            1 => Some(Color::White),
            2 => Some(Color::Black),
            _ => None,
        }
    }

    /// Return the kind of the occupying piece, or `None` for an empty square.
    #[inline]
    pub const fn kind(self) -> Option<PieceKind> {
        if self.is_empty() {
            return None;
        }
        Some(match (self.0 & KIND_MASK) >> KIND_SHIFT {
            0 => PieceKind::King,
            1 => PieceKind::Queen,
            2 => PieceKind::Bishop,
            3 => PieceKind::Knight,
            4 => PieceKind::Pawn,
            _ => PieceKind::Rook,
        })
    }

    /// Return `true` if the square holds a piece of the given color.
    #[inline]
    pub fn is_color(self, color: Color) -> bool {
        self.color() == Some(color)
    }

    /// Return the pin axis, `PinAxis::None` when unpinned.
    #[inline]
    pub const fn pin(self) -> PinAxis {
        match (self.0 & PIN_MASK) >> PIN_SHIFT {
            1 => PinAxis::DiagonalSe,
            2 => PinAxis::DiagonalSw,
            3 => PinAxis::Vertical,
            4 => PinAxis::Horizontal,
            _ => PinAxis::None,
        }
    }

    /// Set the pin axis.
    #[inline]
    pub fn set_pin(&mut self, axis: PinAxis) {
        self.0 = (self.0 & !PIN_MASK) | ((axis as u16) << PIN_SHIFT);
    }

    /// Return `true` if the opposing side attacks this square.
    #[inline]
    pub const fn is_attacked(self) -> bool {
        self.0 & ATTACKED_BIT != 0
    }

    /// Set or clear the attacked flag.
    #[inline]
    pub fn set_attacked(&mut self, attacked: bool) {
        if attacked {
            self.0 |= ATTACKED_BIT;
        } else {
            self.0 &= !ATTACKED_BIT;
        }
    }

    /// Return `true` if this square lies on the active check ray (or is the
    /// checking piece's square).
    #[inline]
    pub const fn is_check_square(self) -> bool {
        self.0 & CHECK_SQUARE_BIT != 0
    }

    /// Set or clear the check-square flag.
    #[inline]
    pub fn set_check_square(&mut self, on: bool) {
        if on {
            self.0 |= CHECK_SQUARE_BIT;
        } else {
            self.0 &= !CHECK_SQUARE_BIT;
        }
    }

    /// Return `true` if the piece has moved at least once.
    #[inline]
    pub const fn has_moved(self) -> bool {
        self.0 & HAS_MOVED_BIT != 0
    }

    /// Set or clear the has-moved flag.
    #[inline]
    pub fn set_has_moved(&mut self, moved: bool) {
        if moved {
            self.0 |= HAS_MOVED_BIT;
        } else {
            self.0 &= !HAS_MOVED_BIT;
        }
    }

    /// Clear the ephemeral flags (pin axis, attacked, check-square),
    /// preserving color, kind, and has-moved.
    #[inline]
    pub fn reset(&mut self) {
        self.0 &= COLOR_MASK | KIND_MASK | HAS_MOVED_BIT;
    }

    /// Return `true` for pieces that attack along diagonals (queen, bishop).
    #[inline]
    pub fn is_diagonal_slider(self) -> bool {
        matches!(self.kind(), Some(PieceKind::Queen | PieceKind::Bishop))
    }

    /// Return `true` for pieces that attack along orthogonals (queen, rook).
    #[inline]
    pub fn is_orthogonal_slider(self) -> bool {
        matches!(self.kind(), Some(PieceKind::Queen | PieceKind::Rook))
    }

    /// Return the board-notation letter, with the owner encoded in its
    /// case. Empty squares have no letter.
    #[inline]
    pub fn letter(self) -> Option<char> {
        Some(self.kind()?.letter(self.color()?))
    }

    /// Parse a board-notation letter into an unmoved piece.
    #[inline]
    pub fn from_letter(c: char) -> Option<Piece> {
        let (kind, color) = PieceKind::parse_letter(c)?;
        Some(Piece::new(kind, color))
    }
}

impl fmt::Debug for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter() {
            Some(c) => {
                write!(f, "Piece({c}")?;
                if self.pin() != PinAxis::None {
                    write!(f, " pin={:?}", self.pin())?;
                }
                if self.is_attacked() {
                    write!(f, " atk")?;
                }
                if self.is_check_square() {
                    write!(f, " chk")?;
                }
                if self.has_moved() {
                    write!(f, " moved")?;
                }
                write!(f, ")")
            }
            None => write!(f, "Piece(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Piece, PinAxis};
    use crate::color::Color;
    use crate::piece_kind::PieceKind;

    #[test]
    fn empty_square() {
        let piece = Piece::EMPTY;
        assert!(piece.is_empty());
        assert_eq!(piece.color(), None);
        assert_eq!(piece.kind(), None);
        assert_eq!(piece.letter(), None);
    }

    #[test]
    fn new_roundtrip() {
        let kinds = [
            PieceKind::King,
            PieceKind::Queen,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Pawn,
            PieceKind::Rook,
        ];
        for color in [Color::White, Color::Black] {
            for kind in kinds {
                let piece = Piece::new(kind, color);
                assert_eq!(piece.color(), Some(color));
                assert_eq!(piece.kind(), Some(kind));
                assert!(!piece.has_moved());
                assert_eq!(piece.pin(), PinAxis::None);
            }
        }
    }

    #[test]
    fn letter_case_encodes_color() {
        assert_eq!(Piece::new(PieceKind::King, Color::White).letter(), Some('k'));
        assert_eq!(Piece::new(PieceKind::King, Color::Black).letter(), Some('K'));
        assert_eq!(Piece::from_letter('q').unwrap().color(), Some(Color::White));
        assert_eq!(Piece::from_letter('Q').unwrap().color(), Some(Color::Black));
        assert_eq!(Piece::from_letter('x'), None);
    }

    #[test]
    fn flags_read_write() {
        let mut piece = Piece::new(PieceKind::Knight, Color::White);
        piece.set_pin(PinAxis::Horizontal);
        piece.set_attacked(true);
        piece.set_check_square(true);
        piece.set_has_moved(true);
        assert_eq!(piece.pin(), PinAxis::Horizontal);
        assert!(piece.is_attacked());
        assert!(piece.is_check_square());
        assert!(piece.has_moved());

        piece.set_attacked(false);
        assert!(!piece.is_attacked());
    }

    #[test]
    fn reset_preserves_identity() {
        let mut piece = Piece::new(PieceKind::Queen, Color::Black);
        piece.set_has_moved(true);
        piece.set_pin(PinAxis::DiagonalSw);
        piece.set_attacked(true);
        piece.set_check_square(true);

        piece.reset();

        assert_eq!(piece.kind(), Some(PieceKind::Queen));
        assert_eq!(piece.color(), Some(Color::Black));
        assert!(piece.has_moved());
        assert_eq!(piece.pin(), PinAxis::None);
        assert!(!piece.is_attacked());
        assert!(!piece.is_check_square());
    }

    #[test]
    fn slider_queries() {
        assert!(Piece::new(PieceKind::Queen, Color::White).is_diagonal_slider());
        assert!(Piece::new(PieceKind::Queen, Color::White).is_orthogonal_slider());
        assert!(Piece::new(PieceKind::Bishop, Color::Black).is_diagonal_slider());
        assert!(!Piece::new(PieceKind::Bishop, Color::Black).is_orthogonal_slider());
        assert!(Piece::new(PieceKind::Rook, Color::White).is_orthogonal_slider());
        assert!(!Piece::new(PieceKind::Rook, Color::White).is_diagonal_slider());
        assert!(!Piece::new(PieceKind::Pawn, Color::White).is_diagonal_slider());
        assert!(!Piece::EMPTY.is_orthogonal_slider());
    }
}
