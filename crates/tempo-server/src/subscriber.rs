//! Subscribers: the per-connection fan-out endpoints a session owns.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use tempo_core::Color;

use crate::events::Event;

/// Session-local subscriber identifier. Subscribers are table entries owned
/// by their session; handles refer back to it by id only.
pub type SubscriberId = u64;

/// Depth of each subscriber's outbound event queue. An enqueue that would
/// overflow closes the subscriber instead of blocking the session.
pub const EVENT_QUEUE_DEPTH: usize = 10;

/// Timeout wrapped around every outbound transport write.
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(5);

/// How long the transport waits for a pong before declaring the peer dead.
pub const PONG_WAIT: Duration = Duration::from_secs(60);

/// Ping cadence, slightly inside the pong window.
pub fn ping_interval() -> Duration {
    PONG_WAIT.mul_f64(0.9)
}

/// What a subscriber is to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    White,
    Black,
    Viewer,
}

impl Role {
    /// Return the playing color, `None` for viewers.
    #[inline]
    pub const fn color(self) -> Option<Color> {
        match self {
            Role::White => Some(Color::White),
            Role::Black => Some(Color::Black),
            Role::Viewer => None,
        }
    }

    /// Return the role for a playing color.
    #[inline]
    pub const fn for_color(color: Color) -> Role {
        match color {
            Color::White => Role::White,
            Color::Black => Role::Black,
        }
    }
}

/// Connection lifecycle of a subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    PreConnected,
    Connected,
    Disconnected,
    Closed,
}

/// Why a subscriber was closed, delivered through the done signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The outbound queue overflowed.
    TooSlow,
    /// The game ended normally.
    GameOver,
    /// The subscriber broke the move protocol.
    IllegalMove,
    /// A newer connection for the same player took over.
    Replaced,
    /// The transport reported the peer gone.
    Transport,
    /// The server is shutting down.
    Shutdown,
}

/// A session's record of one subscriber: the outbound queue plus the done
/// signal. The receiving halves live in the [`SubscriberHandle`] held by
/// the transport.
#[derive(Debug)]
pub(crate) struct Subscriber {
    pub(crate) user_id: String,
    pub(crate) role: Role,
    pub(crate) state: ConnectionState,
    queue: mpsc::Sender<Event>,
    done: watch::Sender<Option<CloseReason>>,
}

impl Subscriber {
    /// Create a connected subscriber and the receiver halves for its handle.
    pub(crate) fn connected(
        user_id: &str,
        role: Role,
    ) -> (
        Subscriber,
        mpsc::Receiver<Event>,
        watch::Receiver<Option<CloseReason>>,
    ) {
        let (queue, events) = mpsc::channel(EVENT_QUEUE_DEPTH);
        let (done, done_rx) = watch::channel(None);
        let subscriber = Subscriber {
            user_id: user_id.to_string(),
            role,
            state: ConnectionState::Connected,
            queue,
            done,
        };
        (subscriber, events, done_rx)
    }

    /// Enqueue an event without blocking. `false` means the queue was full
    /// or the receiver is gone, and the subscriber must be closed.
    pub(crate) fn try_deliver(&self, event: Event) -> bool {
        self.queue.try_send(event).is_ok()
    }

    /// Mark the subscriber closed and fire its done signal.
    pub(crate) fn close(&mut self, reason: CloseReason) {
        self.state = ConnectionState::Closed;
        let _ = self.done.send(Some(reason));
    }
}

/// The transport-facing half of a subscription: the event stream and the
/// done signal, plus the assigned role.
#[derive(Debug)]
pub struct SubscriberHandle {
    /// Table id inside the owning session.
    pub id: SubscriberId,
    /// The role the session assigned.
    pub role: Role,
    /// Outbound events, bounded at [`EVENT_QUEUE_DEPTH`].
    pub events: mpsc::Receiver<Event>,
    /// Fires once with the close reason when the session closes this
    /// subscriber.
    pub done: watch::Receiver<Option<CloseReason>>,
}

#[cfg(test)]
mod tests {
    use super::{CloseReason, ConnectionState, EVENT_QUEUE_DEPTH, Role, Subscriber, ping_interval};
    use crate::events::Event;
    use tempo_core::Color;

    #[test]
    fn role_colors() {
        assert_eq!(Role::White.color(), Some(Color::White));
        assert_eq!(Role::Black.color(), Some(Color::Black));
        assert_eq!(Role::Viewer.color(), None);
        assert_eq!(Role::for_color(Color::Black), Role::Black);
    }

    #[test]
    fn ping_cadence_sits_inside_pong_window() {
        assert!(ping_interval() < super::PONG_WAIT);
    }

    #[tokio::test]
    async fn queue_bounds_and_close_signal() {
        let (mut sub, mut events, mut done) = Subscriber::connected("alice", Role::White);
        assert_eq!(sub.state, ConnectionState::Connected);

        for _ in 0..EVENT_QUEUE_DEPTH {
            assert!(sub.try_deliver(Event::Disconnect {
                colour: "w".to_string()
            }));
        }
        // Queue is full now.
        assert!(!sub.try_deliver(Event::Disconnect {
            colour: "w".to_string()
        }));

        sub.close(CloseReason::TooSlow);
        assert_eq!(sub.state, ConnectionState::Closed);
        done.changed().await.unwrap();
        assert_eq!(*done.borrow(), Some(CloseReason::TooSlow));

        // Buffered events stay readable after the close.
        assert!(events.recv().await.is_some());
    }
}
