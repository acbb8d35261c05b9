//! Session and registry errors.

use tempo_core::AnalysisError;
use uuid::Uuid;

/// Errors surfaced to the transport layer by sessions and the registry.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session with the given id exists.
    #[error("game {id} not found")]
    NotFound {
        /// The unknown game id.
        id: Uuid,
    },

    /// The game has already ended.
    #[error("game has already ended")]
    Ended,

    /// The subscriber id does not belong to this session.
    #[error("unknown subscriber")]
    UnknownSubscriber,

    /// A viewer tried to submit a move.
    #[error("viewers cannot submit moves")]
    ViewerMove,

    /// A player moved out of turn. The offender is closed and the opponent
    /// credited with the win.
    #[error("move submitted out of turn")]
    WrongTurn,

    /// A move was malformed or not in the legal set. Same policy as
    /// [`WrongTurn`](SessionError::WrongTurn).
    #[error("illegal move {literal:?}")]
    IllegalMove {
        /// The submitted move literal.
        literal: String,
    },

    /// The mover's clock had already expired when the move arrived.
    #[error("clock expired")]
    FlagFall,

    /// The board reached an impossible state; the session ends with an
    /// error event.
    #[error(transparent)]
    IllegalState(#[from] AnalysisError),
}
