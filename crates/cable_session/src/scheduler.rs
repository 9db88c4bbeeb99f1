//! Countdown to the next automatic cue.

use crate::Countdown;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::trace;

/// Whether the countdown is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchedulerPhase {
    /// Primed but waiting for the first narrative state
    #[default]
    Dormant,
    /// Counting down
    Counting,
}

/// Result of one ticker pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tick {
    /// The tick belongs to a retired ticker
    Stale,
    /// Seconds left after this tick
    Counting(u32),
    /// The countdown ran out and restarted at the full interval
    Expired,
}

/// Generation-tagged countdown timer.
///
/// Every [`reset`](Self::reset) retires the previous ticker, so at most one
/// ticker drives the countdown at a time. Ticks carrying an old generation are
/// ignored.
#[derive(Debug)]
pub struct CueScheduler {
    interval: u32,
    period: Duration,
    generation: u64,
    remaining: u32,
    pulse: bool,
    phase: SchedulerPhase,
    ticker: Option<JoinHandle<()>>,
}

impl CueScheduler {
    /// Creates a dormant scheduler counting `interval` one-second ticks.
    pub fn new(interval: u32) -> Self {
        Self {
            interval,
            period: Duration::from_secs(1),
            generation: 0,
            remaining: interval,
            pulse: false,
            phase: SchedulerPhase::Dormant,
            ticker: None,
        }
    }

    /// Current countdown.
    pub fn countdown(&self) -> Countdown {
        Countdown {
            remaining: self.remaining,
            pulse: self.pulse,
        }
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current phase.
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    /// Rewinds to a dormant full interval, ready for a new channel.
    pub fn prime(&mut self) {
        self.retire();
        self.phase = SchedulerPhase::Dormant;
        self.remaining = self.interval;
        self.pulse = false;
    }

    /// Restarts the countdown at the full interval and spawns a new ticker.
    ///
    /// `on_tick` runs once per period with the generation it was spawned
    /// for; returning `false` ends the ticker.
    pub fn reset<F>(&mut self, on_tick: F) -> u64
    where
        F: FnMut(u64) -> bool + Send + 'static,
    {
        self.retire();
        self.phase = SchedulerPhase::Counting;
        self.remaining = self.interval;
        self.pulse = false;
        self.ticker = Some(spawn_ticker(self.period, self.generation, on_tick));
        self.generation
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self, generation: u64) -> Tick {
        if generation != self.generation || self.phase != SchedulerPhase::Counting {
            return Tick::Stale;
        }
        if self.remaining <= 1 {
            self.pulse = true;
            self.remaining = self.interval;
            Tick::Expired
        } else {
            self.remaining -= 1;
            Tick::Counting(self.remaining)
        }
    }

    /// Stops counting and retires the ticker.
    pub fn halt(&mut self) {
        self.retire();
        self.phase = SchedulerPhase::Dormant;
        self.pulse = false;
    }

    fn retire(&mut self) {
        self.generation += 1;
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for CueScheduler {
    fn drop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

fn spawn_ticker<F>(period: Duration, generation: u64, mut on_tick: F) -> JoinHandle<()>
where
    F: FnMut(u64) -> bool + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if !on_tick(generation) {
                trace!(generation, "Ticker retired");
                break;
            }
        }
    })
}
