//! Simulation observer trait for progress reporting and data collection.

use wh_agent::Agent;
use wh_core::Tick;

use crate::TickReport;

/// Callbacks invoked by [`World::run`][crate::World::run] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
///         if tick.0 % self.interval == 0 {
///             println!("{tick}: {} moved, {} blocked", report.moved, report.blocked);
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called before the world steps from `tick`.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after the step; `tick` is the tick the world has reached.
    fn on_tick_end(&mut self, _tick: Tick, _report: &TickReport) {}

    /// Called with every agent's state: once for the initial positions at
    /// tick 0, then after every step.
    fn on_frame(&mut self, _tick: Tick, _agents: &[Agent]) {}

    /// Called once after the final tick of [`World::run`][crate::World::run].
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

impl<O: SimObserver + ?Sized> SimObserver for &mut O {
    fn on_tick_start(&mut self, tick: Tick) {
        (**self).on_tick_start(tick)
    }

    fn on_tick_end(&mut self, tick: Tick, report: &TickReport) {
        (**self).on_tick_end(tick, report)
    }

    fn on_frame(&mut self, tick: Tick, agents: &[Agent]) {
        (**self).on_frame(tick, agents)
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        (**self).on_sim_end(final_tick)
    }
}
