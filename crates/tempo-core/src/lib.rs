//! Core rules engine: board representation, position analysis, and legal
//! move generation for the service's non-standard chess variant.

mod analysis;
mod board;
mod chess_move;
mod color;
mod direction;
mod error;
mod fen;
mod movegen;
mod piece;
mod piece_kind;
mod position;

pub use analysis::{CheckClass, CheckLevel, CheckState};
pub use board::{Board, GameResult, PrettyBoard};
pub use chess_move::Move;
pub use color::Color;
pub use direction::Direction;
pub use error::{AnalysisError, FenError, MoveError, PositionError};
pub use fen::STARTING_FEN;
pub use piece::{Piece, PinAxis};
pub use piece_kind::PieceKind;
pub use position::Position;
