//! The sixteen movement directions: four diagonals, four orthogonals, and
//! eight knight jumps.

use crate::color::Color;
use crate::piece::PinAxis;

/// A movement direction, mapped to a unit vector in (file, rank) space.
///
/// The first eight variants are ray directions (sliders walk along them);
/// the last eight are the knight's leaps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    UpRight = 0,
    DownRight = 1,
    DownLeft = 2,
    UpLeft = 3,
    Up = 4,
    Right = 5,
    Down = 6,
    Left = 7,
    KnightUur = 8,
    KnightRru = 9,
    KnightRrd = 10,
    KnightDdr = 11,
    KnightDdl = 12,
    KnightLld = 13,
    KnightLlu = 14,
    KnightUul = 15,
}

impl Direction {
    /// The eight ray directions, diagonals first.
    pub const RAYS: [Direction; 8] = [
        Direction::UpRight,
        Direction::DownRight,
        Direction::DownLeft,
        Direction::UpLeft,
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The eight knight jumps.
    pub const KNIGHT_JUMPS: [Direction; 8] = [
        Direction::KnightUur,
        Direction::KnightRru,
        Direction::KnightRrd,
        Direction::KnightDdr,
        Direction::KnightDdl,
        Direction::KnightLld,
        Direction::KnightLlu,
        Direction::KnightUul,
    ];

    /// Return the (file, rank) unit vector for this direction.
    #[inline]
    pub const fn vector(self) -> (i8, i8) {
        match self {
            Direction::UpRight => (1, 1),
            Direction::DownRight => (1, -1),
            Direction::DownLeft => (-1, -1),
            Direction::UpLeft => (-1, 1),
            Direction::Up => (0, 1),
            Direction::Right => (1, 0),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::KnightUur => (1, 2),
            Direction::KnightRru => (2, 1),
            Direction::KnightRrd => (2, -1),
            Direction::KnightDdr => (1, -2),
            Direction::KnightDdl => (-1, -2),
            Direction::KnightLld => (-2, -1),
            Direction::KnightLlu => (-2, 1),
            Direction::KnightUul => (-1, 2),
        }
    }

    /// Return `true` for the four diagonal ray directions.
    #[inline]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Direction::UpRight | Direction::DownRight | Direction::DownLeft | Direction::UpLeft
        )
    }

    /// Return `true` for the four orthogonal ray directions.
    #[inline]
    pub const fn is_orthogonal(self) -> bool {
        matches!(
            self,
            Direction::Up | Direction::Right | Direction::Down | Direction::Left
        )
    }

    /// Return the direction pointing the opposite way.
    #[inline]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::UpRight => Direction::DownLeft,
            Direction::DownRight => Direction::UpLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::UpLeft => Direction::DownRight,
            Direction::Up => Direction::Down,
            Direction::Right => Direction::Left,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::KnightUur => Direction::KnightDdl,
            Direction::KnightRru => Direction::KnightLld,
            Direction::KnightRrd => Direction::KnightLlu,
            Direction::KnightDdr => Direction::KnightUul,
            Direction::KnightDdl => Direction::KnightUur,
            Direction::KnightLld => Direction::KnightRru,
            Direction::KnightLlu => Direction::KnightRrd,
            Direction::KnightUul => Direction::KnightDdr,
        }
    }

    /// Return the pin axis a ray direction lies on, or `None` for knight jumps.
    #[inline]
    pub const fn axis(self) -> Option<PinAxis> {
        match self {
            Direction::UpRight | Direction::DownLeft => Some(PinAxis::DiagonalSe),
            Direction::DownRight | Direction::UpLeft => Some(PinAxis::DiagonalSw),
            Direction::Up | Direction::Down => Some(PinAxis::Vertical),
            Direction::Right | Direction::Left => Some(PinAxis::Horizontal),
            _ => None,
        }
    }

    /// The forward push direction for a pawn of the given color.
    ///
    /// This variant's pawns advance along the long diagonal: White toward the
    /// high corner, Black toward the low corner.
    #[inline]
    pub const fn pawn_push(color: Color) -> Direction {
        match color {
            Color::White => Direction::UpRight,
            Color::Black => Direction::DownLeft,
        }
    }

    /// The two capture directions for a pawn of the given color.
    #[inline]
    pub const fn pawn_captures(color: Color) -> [Direction; 2] {
        match color {
            Color::White => [Direction::Up, Direction::Right],
            Color::Black => [Direction::Down, Direction::Left],
        }
    }
}
