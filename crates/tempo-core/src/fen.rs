//! Board serialization: `<ranks> <side> <counter>`.
//!
//! Ranks are emitted in linear order (rank 0 first), each as run-length
//! digits for empty squares and piece letters otherwise. Lowercase letters
//! are White and uppercase are Black, and the printed counter is the
//! half-move counter halved; parsing doubles it and adds one when Black is
//! to move. The parser only accepts canonical strings (no split empty runs,
//! no leading zeros), so parse ∘ serialize is the identity on its domain.

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;

/// The serialized starting position.
pub const STARTING_FEN: &str = "krbpp3/rqnp4/nbp5/pp5P/p5PP/5PBN/4PNQR/3PPBRK w 0";

impl FromStr for Board {
    type Err = FenError;

    fn from_str(s: &str) -> Result<Board, FenError> {
        let mut squares = [Piece::EMPTY; 64];
        let mut chars = s.chars();
        let mut rank = 0usize;
        let mut file = 0u8;
        let mut prev_digit = false;

        loop {
            let Some(c) = chars.next() else {
                return Err(FenError::MissingSide);
            };
            match c {
                '1'..='8' => {
                    if prev_digit {
                        return Err(FenError::ConsecutiveDigits { rank });
                    }
                    let run = c as u8 - b'0';
                    if file + run > 8 {
                        return Err(FenError::RankTooLong { rank });
                    }
                    file += run;
                    prev_digit = true;
                }
                '/' => {
                    if file != 8 || rank >= 7 {
                        return Err(FenError::UnexpectedRankSeparator { rank });
                    }
                    rank += 1;
                    file = 0;
                    prev_digit = false;
                }
                ' ' => {
                    if rank != 7 || file != 8 {
                        return Err(FenError::IncompleteRanks { rank });
                    }
                    break;
                }
                _ => {
                    let piece =
                        Piece::from_letter(c).ok_or(FenError::UnknownChar { character: c })?;
                    if file >= 8 {
                        return Err(FenError::RankTooLong { rank });
                    }
                    squares[file as usize + 8 * rank] = piece;
                    file += 1;
                    prev_digit = false;
                }
            }
        }

        let side = match chars.next() {
            Some(c) => {
                Color::from_letter(c).ok_or(FenError::InvalidSide { found: c })?
            }
            None => return Err(FenError::MissingSide),
        };

        match chars.next() {
            Some(' ') => {}
            _ => return Err(FenError::MissingCounter),
        }

        let counter_str = chars.as_str();
        let canonical = !counter_str.is_empty()
            && counter_str.bytes().all(|b| b.is_ascii_digit())
            && (counter_str == "0" || !counter_str.starts_with('0'));
        if !canonical {
            return Err(FenError::InvalidCounter {
                found: counter_str.to_string(),
            });
        }
        let printed: u32 = counter_str
            .parse()
            .map_err(|_| FenError::InvalidCounter {
                found: counter_str.to_string(),
            })?;
        let move_counter = printed * 2 + (side == Color::Black) as u32;

        for color in [Color::White, Color::Black] {
            let kings = squares
                .iter()
                .filter(|p| p.kind() == Some(PieceKind::King) && p.is_color(color))
                .count();
            match kings {
                0 => return Err(FenError::MissingKing { color }),
                1 => {}
                _ => return Err(FenError::DuplicateKing { color }),
            }
        }

        Ok(Board::from_parts(squares, move_counter)?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in 0..8 {
            let mut empty_run = 0u8;
            for file in 0..8 {
                let pos = Position::new(file, rank).expect("loop coordinates are in bounds");
                match self.piece_at(pos).letter() {
                    Some(c) => {
                        if empty_run > 0 {
                            write!(f, "{empty_run}")?;
                            empty_run = 0;
                        }
                        write!(f, "{c}")?;
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                write!(f, "{empty_run}")?;
            }
            if rank < 7 {
                write!(f, "/")?;
            }
        }
        write!(f, " {} {}", self.side_to_move(), self.move_counter() / 2)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{self}\")")
    }
}

#[cfg(test)]
mod tests {
    use super::STARTING_FEN;
    use crate::board::Board;
    use crate::color::Color;
    use crate::error::FenError;
    use crate::piece_kind::PieceKind;
    use crate::position::Position;

    #[test]
    fn start_position_serializes_to_starting_fen() {
        assert_eq!(Board::new().to_string(), STARTING_FEN);
    }

    #[test]
    fn starting_fen_roundtrip() {
        let board: Board = STARTING_FEN.parse().unwrap();
        assert_eq!(board.to_string(), STARTING_FEN);
        assert_eq!(board.side_to_move(), Color::White);
        assert_eq!(board.move_counter(), 0);
    }

    #[test]
    fn parse_reproduces_start_placement() {
        let board: Board = STARTING_FEN.parse().unwrap();
        let fresh = Board::new();
        for pos in Position::all() {
            assert_eq!(
                board.piece_at(pos).kind(),
                fresh.piece_at(pos).kind(),
                "kind mismatch at {pos}"
            );
            assert_eq!(
                board.piece_at(pos).color(),
                fresh.piece_at(pos).color(),
                "color mismatch at {pos}"
            );
            assert_eq!(
                board.piece_at(pos).has_moved(),
                fresh.piece_at(pos).has_moved(),
                "has-moved mismatch at {pos}"
            );
        }
    }

    #[test]
    fn counter_encodes_side_parity() {
        let board: Board = "k7/8/8/8/8/8/8/7K b 3".parse().unwrap();
        assert_eq!(board.move_counter(), 7);
        assert_eq!(board.side_to_move(), Color::Black);
        assert_eq!(board.to_string(), "k7/8/8/8/8/8/8/7K b 3");

        let board: Board = "k7/8/8/8/8/8/8/7K w 3".parse().unwrap();
        assert_eq!(board.move_counter(), 6);
        assert_eq!(board.side_to_move(), Color::White);
    }

    #[test]
    fn off_origin_pawns_parse_as_moved() {
        // Index 24 is a white pawn origin; index 33 is not.
        let board: Board = "k7/8/8/p7/1p6/8/8/7K w 0".parse().unwrap();
        assert!(!board.piece_at(Position::new(0, 3).unwrap()).has_moved());
        assert!(board.piece_at(Position::new(1, 4).unwrap()).has_moved());
    }

    #[test]
    fn black_pawn_origins_respected() {
        // Index 31 is a black pawn origin; index 30 is not.
        let board: Board = "k7/8/8/6PP/8/8/8/7K w 0".parse().unwrap();
        assert!(board.piece_at(Position::new(6, 3).unwrap()).has_moved());
        assert!(!board.piece_at(Position::new(7, 3).unwrap()).has_moved());
    }

    #[test]
    fn rejects_unknown_character() {
        assert_eq!(
            "kx6/8/8/8/8/8/8/7K w 0".parse::<Board>().unwrap_err(),
            FenError::UnknownChar { character: 'x' }
        );
    }

    #[test]
    fn rejects_bad_rank_lengths() {
        assert!(matches!(
            "k8/8/8/8/8/8/8/7K w 0".parse::<Board>().unwrap_err(),
            FenError::RankTooLong { rank: 0 }
        ));
        assert!(matches!(
            "k6/8/8/8/8/8/8/7K w 0".parse::<Board>().unwrap_err(),
            FenError::UnexpectedRankSeparator { rank: 0 }
        ));
    }

    #[test]
    fn rejects_misplaced_separators_and_spaces() {
        assert!(matches!(
            "k7/8/8/8/8/8/8/7K/8 w 0".parse::<Board>().unwrap_err(),
            FenError::UnexpectedRankSeparator { .. }
        ));
        assert!(matches!(
            "k7/8/8 w 0".parse::<Board>().unwrap_err(),
            FenError::IncompleteRanks { .. }
        ));
    }

    #[test]
    fn rejects_split_empty_runs() {
        assert!(matches!(
            "k43/8/8/8/8/8/8/7K w 0".parse::<Board>().unwrap_err(),
            FenError::ConsecutiveDigits { rank: 0 }
        ));
    }

    #[test]
    fn rejects_bad_side_and_counter() {
        assert_eq!(
            "k7/8/8/8/8/8/8/7K x 0".parse::<Board>().unwrap_err(),
            FenError::InvalidSide { found: 'x' }
        );
        assert_eq!(
            "k7/8/8/8/8/8/8/7K w".parse::<Board>().unwrap_err(),
            FenError::MissingCounter
        );
        assert!(matches!(
            "k7/8/8/8/8/8/8/7K w -1".parse::<Board>().unwrap_err(),
            FenError::InvalidCounter { .. }
        ));
        assert!(matches!(
            "k7/8/8/8/8/8/8/7K w 007".parse::<Board>().unwrap_err(),
            FenError::InvalidCounter { .. }
        ));
        assert_eq!(
            "k7/8/8/8/8/8/8/7K".parse::<Board>().unwrap_err(),
            FenError::MissingSide
        );
    }

    #[test]
    fn rejects_wrong_king_counts() {
        assert_eq!(
            "k6k/8/8/8/8/8/8/7K w 0".parse::<Board>().unwrap_err(),
            FenError::DuplicateKing {
                color: Color::White
            }
        );
        assert_eq!(
            "8/8/8/8/8/8/8/7K w 0".parse::<Board>().unwrap_err(),
            FenError::MissingKing {
                color: Color::White
            }
        );
    }

    #[test]
    fn roundtrip_on_accepted_strings() {
        let inputs = [
            STARTING_FEN,
            "k7/8/8/8/8/8/8/7K w 0",
            "k7/8/8/8/8/8/8/7K b 12",
            "k7/1PP5/8/8/4b3/8/6Q1/7K w 0",
            "1k5R/8/8/8/8/8/8/7K w 0",
            "kp6/p7/1NQ5/8/8/8/8/7K w 0",
        ];
        for input in inputs {
            let board: Board = input.parse().unwrap();
            assert_eq!(board.to_string(), input, "roundtrip failed for {input}");
        }
    }

    #[test]
    fn parse_runs_the_pipeline() {
        let board: Board = "k7/8/8/8/8/8/8/7K w 0".parse().unwrap();
        assert!(!board.legal_moves().is_empty());
        assert_eq!(board.piece_at(Position::new(0, 0).unwrap()).kind(), Some(PieceKind::King));
    }
}
