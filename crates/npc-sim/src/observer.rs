//! Simulation observer trait for progress reporting and data collection.

use npc_core::{AgentId, Tick};
use npc_schedule::Category;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — transition printer
///
/// ```rust,ignore
/// struct TransitionPrinter;
///
/// impl SimObserver for TransitionPrinter {
///     fn on_schedule_change(
///         &mut self,
///         tick: Tick,
///         agent: AgentId,
///         _from: Option<Category>,
///         to: Option<Category>,
///     ) {
///         println!("{tick}: {agent} -> {to:?}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.  `live` is the number of live agents
    /// that were stepped.
    fn on_tick_end(&mut self, _tick: Tick, _live: usize) {}

    /// Called whenever an agent's active schedule category changed this tick
    /// — a new plan was selected, or the old one ended (`to == None`).
    fn on_schedule_change(
        &mut self,
        _tick: Tick,
        _agent: AgentId,
        _from: Option<Category>,
        _to: Option<Category>,
    ) {
    }

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
