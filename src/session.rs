//! One timed typing attempt: the target text, the countdown clock that ends
//! it, and the score captured when the clock runs out.

use std::time::{Duration, Instant};

use crate::scoring;
use crate::tracker::InputTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockState {
    Idle,
    Running,
    Expired,
}

/// Fixed-duration countdown driven by the event loop's periodic tick.
///
/// Expiry fires exactly once per run: the first tick that observes the
/// deadline moves the clock to `Expired` and returns the elapsed run time;
/// every later tick is inert. `restart` begins a new run with a fresh start
/// instant and a bumped generation, so a completion pending against a
/// superseded run can never fire.
#[derive(Debug, Clone)]
pub struct SessionClock {
    state: ClockState,
    duration: Duration,
    started_at: Option<Instant>,
    generation: u64,
}

impl SessionClock {
    pub fn new(duration: Duration) -> Self {
        Self {
            state: ClockState::Idle,
            duration,
            started_at: None,
            generation: 0,
        }
    }

    pub fn start(&mut self) {
        self.start_at(Instant::now());
    }

    pub fn start_at(&mut self, now: Instant) {
        self.state = ClockState::Running;
        self.started_at = Some(now);
        self.generation += 1;
    }

    /// Begin a fresh run, cancelling whatever the previous run had pending.
    pub fn restart(&mut self) {
        self.start();
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whole seconds left in the current run, clamped at zero.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs_at(Instant::now())
    }

    pub fn remaining_secs_at(&self, now: Instant) -> u64 {
        match (self.state, self.started_at) {
            (ClockState::Running, Some(start)) => self
                .duration
                .saturating_sub(now.duration_since(start))
                .as_secs(),
            (ClockState::Idle, _) => self.duration.as_secs(),
            _ => 0,
        }
    }

    /// Advance the clock on a periodic tick.
    pub fn on_tick(&mut self) -> Option<Duration> {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Option<Duration> {
        if self.state != ClockState::Running {
            return None;
        }
        let start = self.started_at?;
        let elapsed = now.duration_since(start);
        if elapsed >= self.duration {
            self.state = ClockState::Expired;
            Some(elapsed)
        } else {
            None
        }
    }
}

/// One scored attempt, frozen at timer expiry and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub captured: String,
    pub wpm: f64,
    pub accuracy: f64,
    pub elapsed: Duration,
}

/// A session owns its target text for its whole lifetime; a restart replaces
/// the session value rather than mutating it back into shape.
#[derive(Debug, Clone)]
pub struct Session {
    pub target: String,
    pub clock: SessionClock,
    pub tracker: InputTracker,
    pub result: Option<SessionResult>,
}

impl Session {
    pub fn new(target: String, duration: Duration) -> Self {
        let mut clock = SessionClock::new(duration);
        clock.start();
        Self {
            target,
            clock,
            tracker: InputTracker::new(),
            result: None,
        }
    }

    /// Timer-driven capture: the first tick past the deadline freezes
    /// whatever is in the buffer and scores it. Returns true on that tick.
    pub fn on_tick(&mut self) -> bool {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> bool {
        match self.clock.tick_at(now) {
            Some(elapsed) => {
                self.capture(elapsed);
                true
            }
            None => false,
        }
    }

    fn capture(&mut self, elapsed: Duration) {
        let captured = self.tracker.buffer().to_string();
        let secs = elapsed.as_secs_f64();
        self.result = Some(SessionResult {
            wpm: scoring::wpm(&captured, secs),
            accuracy: scoring::accuracy(&captured, &self.target),
            captured,
            elapsed,
        });
    }

    pub fn has_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn write(&mut self, c: char) {
        if !self.has_finished() {
            self.tracker.write(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.has_finished() {
            self.tracker.backspace();
        }
    }
}
