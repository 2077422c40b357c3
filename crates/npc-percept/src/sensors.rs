//! The `Sensors` trait — the seam between the scheduler and the sensory
//! subsystem.
//!
//! Line-of-sight tests, hearing-list maintenance, and damage bookkeeping all
//! live on the far side of this trait.  The simulation loop guarantees
//! `refresh` is called exactly once per live agent per tick, before any
//! scheduling decision, inside the perception refresh window.

use npc_core::{AgentId, Tick};

use crate::PerceptionState;

/// Supplies perceived world state to the scheduler.
///
/// Implementations must be `Send + Sync` — they are shared across the whole
/// simulation and hold no per-call mutable state of their own (per-agent
/// world data belongs to the application, behind interior references the
/// implementation owns).
pub trait Sensors: Send + Sync + 'static {
    /// Recompute `percept` for `agent` at `tick`.
    ///
    /// Called with the refresh window already open (`begin_refresh` done,
    /// `seal` pending).  Implementations set condition flags, report the best
    /// heard sound, and update enemy memory; they must not retain the
    /// `&mut PerceptionState` beyond this call.
    fn refresh(&self, agent: AgentId, tick: Tick, percept: &mut PerceptionState);
}

/// A [`Sensors`] that never perceives anything.
///
/// Useful as a placeholder in tests and for scripted scenes where all
/// conditions are injected by hand between ticks.
pub struct NullSensors;

impl Sensors for NullSensors {
    fn refresh(&self, _agent: AgentId, _tick: Tick, _percept: &mut PerceptionState) {}
}
