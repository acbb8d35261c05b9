//! The board: piece placement, move counters, check state, move history,
//! and the cached legal-move set.

use tracing::debug;

use crate::analysis::{self, CheckState};
use crate::chess_move::Move;
use crate::color::Color;
use crate::error::{AnalysisError, MoveError};
use crate::movegen;
use crate::piece::Piece;
use crate::piece_kind::PieceKind;
use crate::position::Position;

/// Linear indices of the white pawns in the starting array. A parsed pawn
/// outside this set is considered to have already moved.
pub(crate) const WHITE_PAWN_ORIGINS: [usize; 7] = [3, 4, 11, 18, 24, 25, 32];

/// Linear indices of the black pawns in the starting array.
pub(crate) const BLACK_PAWN_ORIGINS: [usize; 7] = [31, 38, 39, 45, 52, 59, 60];

/// The non-standard starting array: each side's pieces fill a triangle in
/// its corner, with the pawn chains facing each other across the long
/// diagonal.
const STARTING_LAYOUT: [(usize, PieceKind, Color); 30] = [
    (0, PieceKind::King, Color::White),
    (1, PieceKind::Rook, Color::White),
    (2, PieceKind::Bishop, Color::White),
    (3, PieceKind::Pawn, Color::White),
    (4, PieceKind::Pawn, Color::White),
    (8, PieceKind::Rook, Color::White),
    (9, PieceKind::Queen, Color::White),
    (10, PieceKind::Knight, Color::White),
    (11, PieceKind::Pawn, Color::White),
    (16, PieceKind::Knight, Color::White),
    (17, PieceKind::Bishop, Color::White),
    (18, PieceKind::Pawn, Color::White),
    (24, PieceKind::Pawn, Color::White),
    (25, PieceKind::Pawn, Color::White),
    (32, PieceKind::Pawn, Color::White),
    (31, PieceKind::Pawn, Color::Black),
    (38, PieceKind::Pawn, Color::Black),
    (39, PieceKind::Pawn, Color::Black),
    (45, PieceKind::Pawn, Color::Black),
    (46, PieceKind::Bishop, Color::Black),
    (47, PieceKind::Knight, Color::Black),
    (52, PieceKind::Pawn, Color::Black),
    (53, PieceKind::Knight, Color::Black),
    (54, PieceKind::Queen, Color::Black),
    (55, PieceKind::Rook, Color::Black),
    (59, PieceKind::Pawn, Color::Black),
    (60, PieceKind::Pawn, Color::Black),
    (61, PieceKind::Bishop, Color::Black),
    (62, PieceKind::Rook, Color::Black),
    (63, PieceKind::King, Color::Black),
];

/// The outcome of a finished (or ongoing) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// The game continues.
    Ongoing,
    /// The given side delivered checkmate.
    Win(Color),
    /// The side to move has no legal moves and is not in check.
    Stalemate,
    /// Fifty reversible half-moves have accumulated.
    MoveRule,
}

/// Complete game position: the 64-square array plus derived state.
///
/// Every mutation rolls the board forward through the per-ply pipeline
/// (flag reset, analysis, attack map, move generation), so the check state
/// and the cached legal moves are never stale.
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Piece; 64],
    check: CheckState,
    move_counter: u32,
    capture_counter: u32,
    history: Vec<Move>,
    legal_moves: Vec<Move>,
}

impl Board {
    /// Return the starting position.
    pub fn new() -> Board {
        let mut squares = [Piece::EMPTY; 64];
        for (index, kind, color) in STARTING_LAYOUT {
            squares[index] = Piece::new(kind, color);
        }
        let mut board = Board {
            squares,
            check: CheckState::NONE,
            move_counter: 0,
            capture_counter: 0,
            history: Vec::new(),
            legal_moves: Vec::new(),
        };
        board
            .refresh()
            .expect("the starting position analyzes cleanly");
        board
    }

    /// Construct a board from a parsed square array and move counter.
    ///
    /// Pawn has-moved flags are assigned from the origin-square sets, and
    /// the per-ply pipeline runs before the board is returned.
    pub(crate) fn from_parts(
        mut squares: [Piece; 64],
        move_counter: u32,
    ) -> Result<Board, AnalysisError> {
        for index in 0..64 {
            let piece = squares[index];
            if piece.kind() != Some(PieceKind::Pawn) {
                continue;
            }
            let origins: &[usize] = match piece.color() {
                Some(Color::White) => &WHITE_PAWN_ORIGINS,
                Some(Color::Black) => &BLACK_PAWN_ORIGINS,
                None => continue,
            };
            squares[index].set_has_moved(!origins.contains(&index));
        }
        let mut board = Board {
            squares,
            check: CheckState::NONE,
            move_counter,
            capture_counter: 0,
            history: Vec::new(),
            legal_moves: Vec::new(),
        };
        board.refresh()?;
        Ok(board)
    }

    /// Return the piece record on the given square.
    #[inline]
    pub fn piece_at(&self, pos: Position) -> Piece {
        self.squares[pos.index()]
    }

    /// Return the side to move, derived from move-counter parity.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        Color::for_ply(self.move_counter)
    }

    /// Return the current check state.
    #[inline]
    pub fn check(&self) -> CheckState {
        self.check
    }

    /// Return the cached legal moves for the side to move.
    #[inline]
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    /// Return the moves applied so far, in order.
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Return the half-move counter.
    #[inline]
    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }

    /// Return the number of half-moves since the last capture.
    #[inline]
    pub fn capture_counter(&self) -> u32 {
        self.capture_counter
    }

    /// Return `true` if the move is in the cached legal-move set.
    #[inline]
    pub fn is_legal(&self, mv: Move) -> bool {
        self.legal_moves.contains(&mv)
    }

    /// Apply a legal move and roll the board forward one ply.
    ///
    /// Returns `true` if the move captured a piece. The moved piece is
    /// marked as having moved; counters, history, and all derived state are
    /// updated.
    pub fn apply(&mut self, mv: Move) -> Result<bool, MoveError> {
        if mv.from() == mv.to() {
            return Err(MoveError::NullMove);
        }
        if !self.is_legal(mv) {
            return Err(MoveError::NotLegal { mv });
        }

        let mut piece = self.squares[mv.from().index()];
        let captured = !self.squares[mv.to().index()].is_empty();
        piece.set_has_moved(true);
        self.squares[mv.to().index()] = piece;
        self.squares[mv.from().index()] = Piece::EMPTY;

        self.move_counter += 1;
        self.capture_counter = if captured { 0 } else { self.capture_counter + 1 };
        self.history.push(mv);

        self.refresh()?;
        debug!(%mv, captured, move_counter = self.move_counter, "applied move");
        Ok(captured)
    }

    /// The per-ply pipeline: clear ephemeral flags, rerun analysis, rebuild
    /// the attacked map for the side not to move, and regenerate the legal
    /// moves.
    fn refresh(&mut self) -> Result<(), AnalysisError> {
        for square in &mut self.squares {
            square.reset();
        }
        let opponent = self.side_to_move().opponent();
        self.check = analysis::analyze(&mut self.squares)?;
        analysis::mark_attacked(&mut self.squares, opponent);
        self.legal_moves = movegen::generate(&self.squares, self.side_to_move(), self.check);
        Ok(())
    }

    /// Classify the position after the latest ply.
    pub fn result(&self) -> GameResult {
        if self.capture_counter == 50 {
            return GameResult::MoveRule;
        }
        if self.legal_moves.is_empty() {
            return if self.check.level().applies_to(self.side_to_move()) {
                GameResult::Win(self.side_to_move().opponent())
            } else {
                GameResult::Stalemate
            };
        }
        GameResult::Ongoing
    }

    /// Return a pretty-printable wrapper for this board.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

/// Wrapper for pretty-printing a board as an 8x8 grid, files A..H left to
/// right and rank 8 on top.
pub struct PrettyBoard<'a>(&'a Board);

impl std::fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for rank in (0..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in (0..8).rev() {
                let pos = Position::new(file, rank).expect("loop coordinates are in bounds");
                let c = self.0.piece_at(pos).letter().unwrap_or('.');
                if file > 0 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   A B C D E F G H")
    }
}
