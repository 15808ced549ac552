use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::Cell;
use core::fmt;
use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Duration {
        (**self).now()
    }
}

/// Wall clock backed by `web_time`, so it reads `performance.now()` on the web and `std::time` natively.
#[derive(Copy, Clone, Debug)]
pub struct SystemClock {
    origin: web_time::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: web_time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn set(&self, now: Duration) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum TimerState {
    Idle,
    Running { started: Duration },
    Stopped { started: Duration, stopped: Duration },
}

/// Stopwatch without pause: `stop` ends the run, the next `start` begins a fresh one.
#[derive(Clone, Debug)]
pub struct Timer<C> {
    clock: C,
    state: TimerState,
}

impl<C: Clock> Timer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
        }
    }

    pub fn start(&mut self) {
        self.state = TimerState::Running {
            started: self.clock.now(),
        };
    }

    pub fn stop(&mut self) -> Result<()> {
        match self.state {
            TimerState::Idle => Err(GameError::TimerNotStarted),
            TimerState::Running { started } => {
                self.state = TimerState::Stopped {
                    started,
                    stopped: self.clock.now(),
                };
                Ok(())
            }
            TimerState::Stopped { .. } => Ok(()),
        }
    }

    /// Forgets any run, as if the timer was never started.
    pub fn clear(&mut self) {
        self.state = TimerState::Idle;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    pub fn has_started(&self) -> bool {
        !matches!(self.state, TimerState::Idle)
    }

    pub fn elapsed(&self) -> Result<Duration> {
        match self.state {
            TimerState::Idle => Err(GameError::TimerNotStarted),
            TimerState::Running { started } => Ok(self.clock.now().saturating_sub(started)),
            TimerState::Stopped { started, stopped } => Ok(stopped.saturating_sub(started)),
        }
    }

    pub fn elapsed_secs(&self) -> Result<f64> {
        self.elapsed().map(|elapsed| elapsed.as_secs_f64())
    }

    pub fn display(&self) -> TimeDisplay {
        self.elapsed()
            .map_or(TimeDisplay::Blank, TimeDisplay::from_duration)
    }
}

/// Clock face shown next to the puzzle, `MM:SS.CC`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeDisplay {
    Blank,
    Elapsed { minutes: u8, seconds: u8, centis: u8 },
}

impl TimeDisplay {
    /// Longest time the face can show, 99:59.99.
    pub const MAX_MILLIS: u128 = (99 * 60 + 59) * 1000 + 999;

    pub fn from_duration(elapsed: Duration) -> Self {
        let millis = elapsed.as_millis().min(Self::MAX_MILLIS);
        Self::Elapsed {
            minutes: (millis / 60_000) as u8,
            seconds: (millis / 1000 % 60) as u8,
            centis: (millis / 10 % 100) as u8,
        }
    }

    /// Digits only, `MMSSCC`, or dashes when blank.
    pub fn compact(&self) -> String {
        match *self {
            Self::Blank => String::from("------"),
            Self::Elapsed {
                minutes,
                seconds,
                centis,
            } => format!("{minutes:02}{seconds:02}{centis:02}"),
        }
    }
}

impl fmt::Display for TimeDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Blank => write!(f, "--:--.--"),
            Self::Elapsed {
                minutes,
                seconds,
                centis,
            } => write!(f, "{minutes:02}:{seconds:02}.{centis:02}"),
        }
    }
}
