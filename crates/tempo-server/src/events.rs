//! The wire events exchanged with players and viewers.
//!
//! Every message is a JSON object with a `type` discriminator and camelCase
//! payload keys. Colors travel as `"w"`/`"b"`, moves as `"<FROM>:<TO>"`
//! literals, and board states as serialized FEN strings.

use serde::{Deserialize, Serialize};

/// How a finished game is reported on the wire.
///
/// Every draw is reported as `stalemate`; the wire outcome set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Stalemate,
}

/// A wire event. Server-to-client unless noted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    /// First hello to a player: the full game snapshot plus their color.
    Connect {
        fen: String,
        move_history: Vec<String>,
        colour: String,
        legal_moves: Vec<String>,
    },
    /// Same payload as `connect`, sent to a player returning within the
    /// forfeit window.
    Reconnect {
        fen: String,
        move_history: Vec<String>,
        colour: String,
        legal_moves: Vec<String>,
    },
    /// First hello to a viewer.
    ConnectViewer {
        fen: String,
        move_history: Vec<String>,
    },
    /// A player dropped; carries the dropped side's color.
    Disconnect { colour: String },
    /// Client-to-server: a move submission.
    SendMove {
        #[serde(rename = "move")]
        mv: String,
    },
    /// A move was applied; the new position and legal moves follow.
    Move {
        #[serde(rename = "move")]
        mv: String,
        fen: String,
        legal_moves: Vec<String>,
    },
    /// The game is over.
    End { outcome: Outcome, victor: String },
    /// A fatal session error.
    Error { text: String },
}
