//! Move representation and the `"<FROM>:<TO>"` wire literal.

use std::fmt;
use std::str::FromStr;

use crate::error::PositionError;
use crate::position::Position;

/// A move: source and destination squares.
///
/// There are no distinct move kinds; every move copies the piece on `from`
/// to `to`, capturing whatever stood there.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Position,
    to: Position,
}

impl Move {
    /// Create a move.
    #[inline]
    pub const fn new(from: Position, to: Position) -> Move {
        Move { from, to }
    }

    /// Return the source square.
    #[inline]
    pub const fn from(self) -> Position {
        self.from
    }

    /// Return the destination square.
    #[inline]
    pub const fn to(self) -> Position {
        self.to
    }
}

impl FromStr for Move {
    type Err = PositionError;

    /// Parse a move literal such as `"A7:A6"`.
    fn from_str(s: &str) -> Result<Move, PositionError> {
        let Some((from, to)) = s.split_once(':') else {
            return Err(PositionError::BadMoveLiteral {
                found: s.to_string(),
            });
        };
        Ok(Move {
            from: from.parse()?,
            to: to.parse()?,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.from, self.to)
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::Move;
    use crate::position::Position;

    #[test]
    fn literal_roundtrip() {
        let mv: Move = "A7:A6".parse().unwrap();
        assert_eq!(mv.from(), Position::new(7, 6).unwrap());
        assert_eq!(mv.to(), Position::new(7, 5).unwrap());
        assert_eq!(mv.to_string(), "A7:A6");
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("".parse::<Move>().is_err());
        assert!("A7".parse::<Move>().is_err());
        assert!("A7A6".parse::<Move>().is_err());
        assert!("A7:".parse::<Move>().is_err());
        assert!("A9:A6".parse::<Move>().is_err());
        assert!("a7:A6".parse::<Move>().is_err());
    }

    #[test]
    fn display_matches_square_notation() {
        let mv = Move::new(Position::new(4, 0).unwrap(), Position::new(5, 1).unwrap());
        assert_eq!(mv.to_string(), "D1:C2");
    }
}
