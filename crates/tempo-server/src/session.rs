//! Live game sessions: two player slots, a viewer set, the authoritative
//! board, event fan-out, clocks, and the disconnect/forfeit machinery.
//!
//! All mutation runs under one state mutex, so moves within a session are
//! totally ordered and event emission preserves apply order. The clock has
//! its own mutex and is only ever taken after the state lock. Timers are
//! plain spawned tasks holding weak session references; firing late is
//! harmless because every timer re-validates under the lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use tempo_core::{Board, Color, GameResult, Move, MoveError};

use crate::clock::GameClock;
use crate::error::SessionError;
use crate::events::{Event, Outcome};
use crate::subscriber::{
    CloseReason, ConnectionState, Role, Subscriber, SubscriberHandle, SubscriberId,
};

/// Per-game time control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    /// Starting time on each clock.
    pub game_length: Duration,
    /// Time credited to the mover after each move.
    pub increment: Duration,
}

impl GameConfig {
    /// How long a disconnected player has to return before forfeiting.
    pub fn forfeit_window(&self) -> Duration {
        self.game_length / 10
    }
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            game_length: Duration::from_secs(600),
            increment: Duration::from_secs(5),
        }
    }
}

/// A game snapshot as shipped in connect/reconnect payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Serialized board.
    pub fen: String,
    /// Move literals in apply order.
    pub move_history: Vec<String>,
    /// Legal move literals for the side to move.
    pub legal_moves: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    InPlay,
    Ended,
}

/// One player seat: the expected user and the currently attached
/// subscriber, if any.
#[derive(Debug)]
struct PlayerSlot {
    user_id: String,
    color: Color,
    sub: Option<SubscriberId>,
    connection: ConnectionState,
}

/// Everything behind the serial mutation gate.
struct GameState {
    board: Board,
    phase: Phase,
    players: [PlayerSlot; 2],
    subscribers: HashMap<SubscriberId, Subscriber>,
    next_id: SubscriberId,
    updated_at: DateTime<Utc>,
    flag_timer: Option<JoinHandle<()>>,
    forfeit_timers: [Option<JoinHandle<()>>; 2],
}

/// A live game. Owned by the registry; timers and transport handlers hold
/// weak or id-based references only.
pub struct Session {
    id: Uuid,
    config: GameConfig,
    created_at: DateTime<Utc>,
    state: Mutex<GameState>,
    clock: Mutex<GameClock>,
}

impl Session {
    /// Create a session between two users. White's clock starts running
    /// immediately and the flag watchdog is armed.
    pub(crate) fn create(
        id: Uuid,
        white_user: &str,
        black_user: &str,
        config: GameConfig,
    ) -> Arc<Session> {
        let session = Arc::new(Session {
            id,
            config,
            created_at: Utc::now(),
            state: Mutex::new(GameState {
                board: Board::new(),
                phase: Phase::InPlay,
                players: [
                    PlayerSlot {
                        user_id: white_user.to_string(),
                        color: Color::White,
                        sub: None,
                        connection: ConnectionState::PreConnected,
                    },
                    PlayerSlot {
                        user_id: black_user.to_string(),
                        color: Color::Black,
                        sub: None,
                        connection: ConnectionState::PreConnected,
                    },
                ],
                subscribers: HashMap::new(),
                next_id: 0,
                updated_at: Utc::now(),
                flag_timer: None,
                forfeit_timers: [None, None],
            }),
            clock: Mutex::new(GameClock::new(config.game_length, Instant::now())),
        });
        let mut state = session.lock_state();
        session.arm_flag_locked(&mut state, config.game_length);
        drop(state);
        info!(id = %session.id, "session created");
        session
    }

    /// Return the session id.
    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Return the time control.
    #[inline]
    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Return the creation timestamp.
    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Return the timestamp of the last applied move.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.lock_state().updated_at
    }

    /// Return `true` once the game is over.
    pub fn is_ended(&self) -> bool {
        self.lock_state().phase == Phase::Ended
    }

    /// Return the current board, history, and legal moves.
    pub fn snapshot(&self) -> Snapshot {
        snapshot_locked(&self.lock_state())
    }

    /// Return the time left on a side's clock.
    pub fn remaining(&self, side: Color) -> Duration {
        let clock = self.clock.lock().expect("clock mutex poisoned");
        clock.remaining(side, Instant::now())
    }

    /// Attach a user to the game.
    ///
    /// A user matching a player seat gets that seat (a `connect` greeting on
    /// first attach, `reconnect` afterwards, which also cancels any pending
    /// forfeit); everyone else becomes a viewer.
    pub fn subscribe(
        self: &Arc<Session>,
        user_id: &str,
    ) -> Result<(SubscriberHandle, Role), SessionError> {
        let mut state = self.lock_state();
        if state.phase == Phase::Ended {
            return Err(SessionError::Ended);
        }
        let snapshot = snapshot_locked(&state);
        let seat = state
            .players
            .iter()
            .find(|slot| slot.user_id == user_id)
            .map(|slot| slot.color);

        let (role, hello) = match seat {
            Some(color) => {
                let first_attach =
                    state.players[color.index()].connection == ConnectionState::PreConnected;
                if let Some(old) = state.players[color.index()].sub {
                    self.close_subscriber_locked(&mut state, old, CloseReason::Replaced);
                }
                let hello = if first_attach {
                    Event::Connect {
                        fen: snapshot.fen,
                        move_history: snapshot.move_history,
                        colour: color.to_string(),
                        legal_moves: snapshot.legal_moves,
                    }
                } else {
                    if let Some(timer) = state.forfeit_timers[color.index()].take() {
                        timer.abort();
                    }
                    Event::Reconnect {
                        fen: snapshot.fen,
                        move_history: snapshot.move_history,
                        colour: color.to_string(),
                        legal_moves: snapshot.legal_moves,
                    }
                };
                (Role::for_color(color), hello)
            }
            None => (
                Role::Viewer,
                Event::ConnectViewer {
                    fen: snapshot.fen,
                    move_history: snapshot.move_history,
                },
            ),
        };

        let (subscriber, events, done) = Subscriber::connected(user_id, role);
        // The queue is freshly created; the greeting always fits.
        let _ = subscriber.try_deliver(hello);
        let id = state.next_id;
        state.next_id += 1;
        state.subscribers.insert(id, subscriber);
        if let Some(color) = role.color() {
            let slot = &mut state.players[color.index()];
            slot.sub = Some(id);
            slot.connection = ConnectionState::Connected;
        }
        debug!(session = %self.id, user = user_id, ?role, "subscribed");
        Ok((SubscriberHandle { id, role, events, done }, role))
    }

    /// Submit a move on behalf of a subscriber.
    ///
    /// Any protocol failure (viewer moving, wrong turn, malformed or illegal
    /// move) closes the offender; for players the opponent is credited with
    /// the win.
    pub fn submit_move(
        self: &Arc<Session>,
        id: SubscriberId,
        literal: &str,
    ) -> Result<(), SessionError> {
        let mut state = self.lock_state();
        if state.phase == Phase::Ended {
            return Err(SessionError::Ended);
        }
        let role = state
            .subscribers
            .get(&id)
            .map(|sub| sub.role)
            .ok_or(SessionError::UnknownSubscriber)?;
        let Some(color) = role.color() else {
            warn!(session = %self.id, "viewer tried to move");
            self.close_subscriber_locked(&mut state, id, CloseReason::IllegalMove);
            return Err(SessionError::ViewerMove);
        };
        if color != state.board.side_to_move() {
            self.punish_locked(&mut state, id, color, "out of turn");
            return Err(SessionError::WrongTurn);
        }
        let mv: Move = match literal.parse() {
            Ok(mv) => mv,
            Err(_) => {
                self.punish_locked(&mut state, id, color, "malformed move");
                return Err(SessionError::IllegalMove {
                    literal: literal.to_string(),
                });
            }
        };
        match state.board.apply(mv) {
            Ok(_) => {}
            Err(MoveError::Analysis(err)) => {
                warn!(session = %self.id, error = %err, "analysis failed, ending session");
                self.fanout_locked(
                    &mut state,
                    None,
                    &Event::Error {
                        text: err.to_string(),
                    },
                );
                self.halt_locked(&mut state, CloseReason::GameOver);
                return Err(SessionError::IllegalState(err));
            }
            Err(_) => {
                self.punish_locked(&mut state, id, color, "illegal move");
                return Err(SessionError::IllegalMove {
                    literal: literal.to_string(),
                });
            }
        }

        let tick = {
            let mut clock = self.clock.lock().expect("clock mutex poisoned");
            clock.record_move(Instant::now(), self.config.increment)
        };
        state.updated_at = Utc::now();
        let next_remaining = match tick {
            Ok(left) => left,
            Err(_) => {
                self.end_locked(&mut state, GameResult::Win(color.opponent()));
                return Err(SessionError::FlagFall);
            }
        };

        let snapshot = snapshot_locked(&state);
        self.fanout_locked(
            &mut state,
            Some(id),
            &Event::Move {
                mv: mv.to_string(),
                fen: snapshot.fen,
                legal_moves: snapshot.legal_moves,
            },
        );

        match state.board.result() {
            GameResult::Ongoing => self.arm_flag_locked(&mut state, next_remaining),
            result => self.end_locked(&mut state, result),
        }
        Ok(())
    }

    /// Handle a transport-level disconnect of a subscriber.
    ///
    /// Viewers are simply dropped; a player's departure is announced to the
    /// remaining subscribers and starts the forfeit countdown.
    pub fn on_disconnect(self: &Arc<Session>, id: SubscriberId) {
        let mut state = self.lock_state();
        if state.phase == Phase::Ended {
            return;
        }
        let Some(role) = state.subscribers.get(&id).map(|sub| sub.role) else {
            return;
        };
        self.close_subscriber_locked(&mut state, id, CloseReason::Transport);
        if let Some(color) = role.color() {
            debug!(session = %self.id, %color, "player disconnected");
            self.fanout_locked(
                &mut state,
                Some(id),
                &Event::Disconnect {
                    colour: color.to_string(),
                },
            );
            self.arm_forfeit_locked(&mut state, color);
        }
    }

    /// Force the game to end with the given result, publishing `end` to
    /// every subscriber.
    pub fn handle_win(&self, result: GameResult) {
        let mut state = self.lock_state();
        if state.phase == Phase::Ended {
            return;
        }
        self.end_locked(&mut state, result);
    }

    /// Close the session without a result: all subscribers are closed and
    /// timers cancelled. Used on server shutdown.
    pub fn close(&self) {
        let mut state = self.lock_state();
        self.halt_locked(&mut state, CloseReason::Shutdown);
    }

    fn lock_state(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().expect("session mutex poisoned")
    }

    /// Close the offender and credit the opponent with the win.
    fn punish_locked(
        self: &Arc<Session>,
        state: &mut GameState,
        offender: SubscriberId,
        offender_color: Color,
        why: &str,
    ) {
        warn!(session = %self.id, color = %offender_color, why, "closing offender");
        self.close_subscriber_locked(state, offender, CloseReason::IllegalMove);
        self.end_locked(state, GameResult::Win(offender_color.opponent()));
    }

    /// Publish the end event and tear the session down.
    fn end_locked(&self, state: &mut GameState, result: GameResult) {
        let (outcome, victor) = match result {
            GameResult::Win(color) => (Outcome::Win, color),
            // The wire outcome set is closed; every draw reports as a
            // stalemate with White named as victor.
            _ => (Outcome::Stalemate, Color::White),
        };
        // Late subscribers lose the race for the end event; they are closed
        // just below either way.
        let _ = deliver_locked(state, None, &Event::End {
            outcome,
            victor: victor.to_string(),
        });
        self.halt_locked(state, CloseReason::GameOver);
        info!(session = %self.id, ?result, "session ended");
    }

    /// Cancel timers, close every subscriber, and mark the session ended.
    fn halt_locked(&self, state: &mut GameState, reason: CloseReason) {
        if let Some(timer) = state.flag_timer.take() {
            timer.abort();
        }
        for slot in &mut state.forfeit_timers {
            if let Some(timer) = slot.take() {
                timer.abort();
            }
        }
        let ids: Vec<SubscriberId> = state.subscribers.keys().copied().collect();
        for id in ids {
            self.close_subscriber_locked(state, id, reason);
        }
        for slot in &mut state.players {
            slot.connection = ConnectionState::Closed;
        }
        state.phase = Phase::Ended;
    }

    /// Remove one subscriber, fire its done signal, and update its seat.
    fn close_subscriber_locked(
        &self,
        state: &mut GameState,
        id: SubscriberId,
        reason: CloseReason,
    ) {
        let Some(mut subscriber) = state.subscribers.remove(&id) else {
            return;
        };
        subscriber.close(reason);
        debug!(session = %self.id, user = %subscriber.user_id, ?reason, "subscriber closed");
        if let Some(color) = subscriber.role.color() {
            let slot = &mut state.players[color.index()];
            if slot.sub == Some(id) {
                slot.sub = None;
                slot.connection = match reason {
                    CloseReason::GameOver | CloseReason::Shutdown => ConnectionState::Closed,
                    _ => ConnectionState::Disconnected,
                };
            }
        }
    }

    /// Deliver an event to every subscriber except the originator, closing
    /// any whose queue overflows. A dropped player is announced as a
    /// disconnect and put on the forfeit clock, exactly as if the transport
    /// had reported them gone.
    fn fanout_locked(
        self: &Arc<Session>,
        state: &mut GameState,
        except: Option<SubscriberId>,
        event: &Event,
    ) {
        let mut pending = vec![(except, event.clone())];
        while let Some((skip, event)) = pending.pop() {
            for id in deliver_locked(state, skip, &event) {
                let role = state.subscribers.get(&id).map(|sub| sub.role);
                warn!(session = %self.id, subscriber = id, "closing subscriber: too slow");
                self.close_subscriber_locked(state, id, CloseReason::TooSlow);
                if let Some(color) = role.and_then(Role::color)
                    && state.phase == Phase::InPlay
                {
                    pending.push((
                        Some(id),
                        Event::Disconnect {
                            colour: color.to_string(),
                        },
                    ));
                    self.arm_forfeit_locked(state, color);
                }
            }
        }
    }

    /// (Re)arm the watchdog that fires when the running clock hits zero.
    fn arm_flag_locked(self: &Arc<Session>, state: &mut GameState, duration: Duration) {
        if let Some(timer) = state.flag_timer.take() {
            timer.abort();
        }
        let weak = Arc::downgrade(self);
        state.flag_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(session) = weak.upgrade() {
                session.flag_fall();
            }
        }));
    }

    fn flag_fall(self: &Arc<Session>) {
        let mut state = self.lock_state();
        if state.phase == Phase::Ended {
            return;
        }
        let now = Instant::now();
        let (expired, loser, left) = {
            let clock = self.clock.lock().expect("clock mutex poisoned");
            let loser = clock.running();
            (clock.expired(now), loser, clock.remaining(loser, now))
        };
        if !expired {
            // A move landed while this timer was in flight.
            self.arm_flag_locked(&mut state, left);
            return;
        }
        info!(session = %self.id, loser = %loser, "flag fell");
        self.end_locked(&mut state, GameResult::Win(loser.opponent()));
    }

    /// Arm the forfeit countdown for a disconnected player.
    fn arm_forfeit_locked(self: &Arc<Session>, state: &mut GameState, color: Color) {
        if let Some(timer) = state.forfeit_timers[color.index()].take() {
            timer.abort();
        }
        let weak = Arc::downgrade(self);
        let window = self.config.forfeit_window();
        state.forfeit_timers[color.index()] = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            if let Some(session) = weak.upgrade() {
                session.forfeit_fire(color);
            }
        }));
    }

    fn forfeit_fire(self: &Arc<Session>, color: Color) {
        let mut state = self.lock_state();
        if state.phase == Phase::Ended {
            return;
        }
        if state.players[color.index()].connection != ConnectionState::Disconnected {
            return;
        }
        info!(session = %self.id, %color, "forfeit window elapsed");
        self.end_locked(&mut state, GameResult::Win(color.opponent()));
    }
}

/// Enqueue an event for everyone but `except`, returning the subscribers
/// whose queues rejected it.
fn deliver_locked(
    state: &GameState,
    except: Option<SubscriberId>,
    event: &Event,
) -> Vec<SubscriberId> {
    let mut dropped = Vec::new();
    for (&id, subscriber) in &state.subscribers {
        if Some(id) == except || subscriber.state == ConnectionState::Closed {
            continue;
        }
        if !subscriber.try_deliver(event.clone()) {
            dropped.push(id);
        }
    }
    dropped
}

fn snapshot_locked(state: &GameState) -> Snapshot {
    Snapshot {
        fen: state.board.to_string(),
        move_history: state.board.history().iter().map(|m| m.to_string()).collect(),
        legal_moves: state
            .board
            .legal_moves()
            .iter()
            .map(|m| m.to_string())
            .collect(),
    }
}
