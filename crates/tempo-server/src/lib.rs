//! Live game coordination: sessions, subscribers, wire events, clocks, and
//! the session registry.
//!
//! The transport layer (connection upgrades, authentication, pings) lives
//! outside this crate. It hands an authenticated user id to
//! [`Session::subscribe`], pumps [`Event`]s from the returned handle to the
//! peer, and feeds inbound `sendMove` payloads to [`Session::submit_move`].

mod clock;
mod error;
mod events;
mod registry;
mod session;
mod subscriber;

pub use clock::{ClockExpired, GameClock};
pub use error::SessionError;
pub use events::{Event, Outcome};
pub use registry::Registry;
pub use session::{GameConfig, Session, Snapshot};
pub use subscriber::{
    CloseReason, ConnectionState, EVENT_QUEUE_DEPTH, PONG_WAIT, Role, SubscriberHandle,
    SubscriberId, WRITE_TIMEOUT, ping_interval,
};
