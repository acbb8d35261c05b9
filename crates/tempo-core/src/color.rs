//! Side colors, turn parity, and the case convention that encodes a
//! piece's owner in board notation.
//!
//! Two conventions from the serialized formats live here so no other
//! module re-derives them: the side to move follows the half-move
//! counter's parity (even is White), and piece letters carry their owner
//! in their case, with White lowercase and Black uppercase (the reverse
//! of common FEN).

use std::fmt;

/// A side of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    /// Return the index (0 for White, 1 for Black) for per-side tables
    /// such as king positions or clocks.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Return the side this one is playing against.
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Return the side to move at the given half-move counter. White
    /// moves on even counts.
    #[inline]
    pub const fn for_ply(move_counter: u32) -> Color {
        if move_counter % 2 == 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Return the wire letter: `w` or `b`.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    /// Parse a wire letter (`w`/`b`).
    #[inline]
    pub fn from_letter(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }

    /// Return the side encoded by a piece letter's case: lowercase is
    /// White, uppercase is Black.
    #[inline]
    pub fn of_case(c: char) -> Color {
        if c.is_ascii_lowercase() {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Apply this side's case to a base piece letter.
    #[inline]
    pub fn apply_case(self, base: char) -> char {
        match self {
            Color::White => base.to_ascii_lowercase(),
            Color::Black => base.to_ascii_uppercase(),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn opponent_roundtrip() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent().opponent(), Color::White);
    }

    #[test]
    fn ply_parity() {
        assert_eq!(Color::for_ply(0), Color::White);
        assert_eq!(Color::for_ply(1), Color::Black);
        assert_eq!(Color::for_ply(6), Color::White);
        assert_eq!(Color::for_ply(7), Color::Black);
    }

    #[test]
    fn wire_letters() {
        assert_eq!(Color::White.letter(), 'w');
        assert_eq!(Color::Black.letter(), 'b');
        assert_eq!(Color::from_letter('w'), Some(Color::White));
        assert_eq!(Color::from_letter('b'), Some(Color::Black));
        assert_eq!(Color::from_letter('x'), None);
        assert_eq!(format!("{}", Color::White), "w");
        assert_eq!(format!("{}", Color::Black), "b");
    }

    #[test]
    fn case_convention_is_inverted() {
        // White pieces print lowercase, Black uppercase.
        assert_eq!(Color::White.apply_case('K'), 'k');
        assert_eq!(Color::Black.apply_case('k'), 'K');
        assert_eq!(Color::of_case('q'), Color::White);
        assert_eq!(Color::of_case('Q'), Color::Black);
        for side in [Color::White, Color::Black] {
            assert_eq!(Color::of_case(side.apply_case('r')), side);
        }
    }
}
