//! Blocking tick scheduler.
//!
//! [`Ticker`] calls [`Simulation::advance`] on the current thread, sleeping
//! for the configured tick interval between generations. Cancellation is
//! only observed between ticks; a step in progress always completes.

use super::driver::{GenerationReport, Simulation};
use super::error::NkError;
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// How a [`Ticker::run`] call ended.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerOutcome {
    /// Generations completed during this run.
    pub ticks: u64,

    /// Whether the cancellation flag stopped the run.
    pub cancelled: bool,

    /// The step failure that halted the simulation, if any.
    pub halted: Option<NkError>,
}

/// Drives a simulation at a fixed tick rate.
///
/// ```
/// use nk_landscape::nk::{NkConfig, Simulation, Ticker};
/// use std::time::Duration;
///
/// let mut sim = Simulation::new(NkConfig::default().with_seed(1)).unwrap();
/// let outcome = Ticker::new()
///     .with_interval(Duration::ZERO)
///     .with_max_ticks(3)
///     .run(&mut sim, |report| println!("{}", report.message));
/// assert_eq!(outcome.ticks, 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Ticker {
    interval: Option<Duration>,
    max_ticks: Option<u64>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Ticker {
    /// Creates a ticker using the simulation's own tick interval, with no
    /// tick limit and no cancellation flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides [`NkConfig::tick_interval`](super::NkConfig::tick_interval).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Stops after this many generations.
    pub fn with_max_ticks(mut self, ticks: u64) -> Self {
        self.max_ticks = Some(ticks);
        self
    }

    /// Stops before the next tick once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Runs until the tick limit, cancellation, or a halted step.
    ///
    /// `on_report` receives every committed generation. Without a tick
    /// limit or a cancellation flag this only returns on failure.
    pub fn run<R, F>(&self, sim: &mut Simulation<R>, mut on_report: F) -> TickerOutcome
    where
        R: Rng,
        F: FnMut(&GenerationReport),
    {
        let mut ticks = 0u64;
        loop {
            if self.max_ticks.is_some_and(|max| ticks >= max) {
                return TickerOutcome {
                    ticks,
                    cancelled: false,
                    halted: None,
                };
            }
            if self.is_cancelled() {
                tracing::info!(ticks, "ticker cancelled");
                return TickerOutcome {
                    ticks,
                    cancelled: true,
                    halted: None,
                };
            }

            if ticks > 0 {
                let interval = self
                    .interval
                    .unwrap_or_else(|| sim.config().tick_interval());
                if !interval.is_zero() {
                    std::thread::sleep(interval);
                }
            }

            match sim.advance() {
                Ok(report) => {
                    ticks += 1;
                    on_report(&report);
                }
                Err(err) => {
                    return TickerOutcome {
                        ticks,
                        cancelled: false,
                        halted: Some(err),
                    };
                }
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}
