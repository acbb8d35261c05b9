//! The two-sided game clock.
//!
//! Pure bookkeeping, no tasks: the session owns the timers and feeds the
//! clock explicit instants, which keeps the arithmetic testable.

use std::time::Duration;

use tokio::time::Instant;

use tempo_core::Color;

/// The running clock had already reached zero when a move was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("clock expired")]
pub struct ClockExpired;

/// Countdown clocks for both sides. Exactly one runs at a time: the side to
/// move's.
#[derive(Debug, Clone)]
pub struct GameClock {
    remaining: [Duration; 2],
    running: Color,
    last_update: Instant,
}

impl GameClock {
    /// Create a clock with both sides at `game_length`; White's side starts
    /// running at `now`.
    pub fn new(game_length: Duration, now: Instant) -> GameClock {
        GameClock {
            remaining: [game_length; 2],
            running: Color::White,
            last_update: now,
        }
    }

    /// Return the side whose clock is running.
    #[inline]
    pub fn running(&self) -> Color {
        self.running
    }

    /// Return the time left on a side's clock as of `now`.
    pub fn remaining(&self, side: Color, now: Instant) -> Duration {
        let banked = self.remaining[side.index()];
        if side == self.running {
            banked.saturating_sub(now.saturating_duration_since(self.last_update))
        } else {
            banked
        }
    }

    /// Return `true` if the running side's clock has reached zero.
    pub fn expired(&self, now: Instant) -> bool {
        self.remaining(self.running, now).is_zero()
    }

    /// Record a completed move at `now`: charge the elapsed time to the
    /// moving side, add its increment, and flip the running side.
    ///
    /// Returns the time left for the side now to move, or
    /// [`ClockExpired`] if the mover's flag had already fallen.
    pub fn record_move(
        &mut self,
        now: Instant,
        increment: Duration,
    ) -> Result<Duration, ClockExpired> {
        let elapsed = now.saturating_duration_since(self.last_update);
        let mover = self.running.index();
        if self.remaining[mover] <= elapsed {
            self.remaining[mover] = Duration::ZERO;
            return Err(ClockExpired);
        }
        self.remaining[mover] = self.remaining[mover] - elapsed + increment;
        self.last_update = now;
        self.running = self.running.opponent();
        Ok(self.remaining[self.running.index()])
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use tempo_core::Color;

    use super::GameClock;

    const LENGTH: Duration = Duration::from_secs(60);
    const INCREMENT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn move_charges_elapsed_and_adds_increment() {
        let t0 = Instant::now();
        let mut clock = GameClock::new(LENGTH, t0);
        assert_eq!(clock.running(), Color::White);

        let t1 = t0 + Duration::from_secs(5);
        let black_left = clock.record_move(t1, INCREMENT).unwrap();
        assert_eq!(black_left, LENGTH);
        assert_eq!(clock.running(), Color::Black);
        assert_eq!(clock.remaining(Color::White, t1), LENGTH - Duration::from_secs(5) + INCREMENT);
    }

    #[tokio::test]
    async fn reads_subtract_running_elapsed_only() {
        let t0 = Instant::now();
        let clock = GameClock::new(LENGTH, t0);
        let t1 = t0 + Duration::from_secs(10);
        assert_eq!(clock.remaining(Color::White, t1), Duration::from_secs(50));
        assert_eq!(clock.remaining(Color::Black, t1), LENGTH);
    }

    #[tokio::test]
    async fn flag_fall_detected() {
        let t0 = Instant::now();
        let mut clock = GameClock::new(LENGTH, t0);
        let late = t0 + LENGTH + Duration::from_secs(1);
        assert!(clock.expired(late));
        assert!(clock.record_move(late, INCREMENT).is_err());
        assert_eq!(clock.remaining(Color::White, late), Duration::ZERO);
    }

    #[tokio::test]
    async fn alternating_moves_keep_both_clocks_honest() {
        let t0 = Instant::now();
        let mut clock = GameClock::new(LENGTH, t0);

        let t1 = t0 + Duration::from_secs(3);
        clock.record_move(t1, INCREMENT).unwrap();
        let t2 = t1 + Duration::from_secs(7);
        clock.record_move(t2, INCREMENT).unwrap();

        assert_eq!(clock.running(), Color::White);
        assert_eq!(clock.remaining(Color::White, t2), LENGTH - Duration::from_secs(3) + INCREMENT);
        assert_eq!(clock.remaining(Color::Black, t2), LENGTH - Duration::from_secs(7) + INCREMENT);
    }
}
