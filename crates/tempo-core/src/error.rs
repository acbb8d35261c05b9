//! Error types for coordinates, board serialization, analysis, and moves.

use crate::chess_move::Move;
use crate::color::Color;

/// Errors from parsing square strings and move literals.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// A square string is not exactly two characters.
    #[error("square string must be two characters, got {found:?}")]
    BadLength {
        /// The offending input.
        found: String,
    },
    /// The file letter is outside `A..H`.
    #[error("invalid file letter '{character}'")]
    BadFile {
        /// The offending character.
        character: char,
    },
    /// The rank digit is outside `1..8`.
    #[error("invalid rank digit '{character}'")]
    BadRank {
        /// The offending character.
        character: char,
    },
    /// A move literal is missing the `:` separator.
    #[error("move literal must be \"<from>:<to>\", got {found:?}")]
    BadMoveLiteral {
        /// The offending input.
        found: String,
    },
}

/// Errors from the position analysis pass.
///
/// These signal an impossible board, not a bad input: a position reached
/// through legal play can never trigger them. A session that sees one must
/// end with an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// Two knights simultaneously give check to the same king.
    #[error("two knights give check to the {color} king")]
    DoubleKnightCheck {
        /// The side whose king is attacked.
        color: Color,
    },
    /// Both kings are in check at once.
    #[error("both kings are in check")]
    BothKingsInCheck,
    /// A third piece gives check to an already double-checked king.
    #[error("triple check on the {color} king")]
    TripleCheck {
        /// The side whose king is attacked.
        color: Color,
    },
    /// A side has no king on the board.
    #[error("no {color} king on the board")]
    MissingKing {
        /// The kingless side.
        color: Color,
    },
}

/// Errors from applying a move to a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    /// Source and destination are the same square.
    #[error("move source and destination are identical")]
    NullMove,
    /// The move is not in the current legal-move set.
    #[error("move {mv} is not legal in this position")]
    NotLegal {
        /// The rejected move.
        mv: Move,
    },
    /// The position reached after the move failed analysis.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Errors from parsing a serialized board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    /// An unrecognized character appeared in the ranks section.
    #[error("unknown character '{character}' in board string")]
    UnknownChar {
        /// The offending character.
        character: char,
    },
    /// A rank segment describes more than 8 squares.
    #[error("rank {rank} describes more than 8 squares")]
    RankTooLong {
        /// Zero-based rank index.
        rank: usize,
    },
    /// A `/` appeared before the current rank reached 8 squares, or after
    /// the eighth rank.
    #[error("misplaced rank separator after rank {rank}")]
    UnexpectedRankSeparator {
        /// Zero-based rank index.
        rank: usize,
    },
    /// Two consecutive run-length digits; empty runs must be written as a
    /// single digit so that serialization round-trips.
    #[error("split empty-square run in rank {rank}")]
    ConsecutiveDigits {
        /// Zero-based rank index.
        rank: usize,
    },
    /// The ranks section ended before describing all 64 squares.
    #[error("board string ends inside rank {rank}")]
    IncompleteRanks {
        /// Zero-based rank index.
        rank: usize,
    },
    /// No side-to-move field after the ranks.
    #[error("missing side to move")]
    MissingSide,
    /// The side-to-move field is not `w` or `b`.
    #[error("invalid side to move '{found}'")]
    InvalidSide {
        /// The offending character.
        found: char,
    },
    /// No move counter after the side field.
    #[error("missing move counter")]
    MissingCounter,
    /// The move counter is not a canonical non-negative integer.
    #[error("invalid move counter {found:?}")]
    InvalidCounter {
        /// The offending text.
        found: String,
    },
    /// A side has more than one king.
    #[error("more than one {color} king")]
    DuplicateKing {
        /// The side with duplicate kings.
        color: Color,
    },
    /// A side has no king.
    #[error("missing {color} king")]
    MissingKing {
        /// The kingless side.
        color: Color,
    },
    /// The parsed position failed analysis.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}
