//! `npc-sim` — tick loop orchestrator for the rust_npc framework.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   for each live agent, in ascending AgentId order:
//!     ① Refresh   — open the perception window, Sensors::refresh, seal.
//!     ② Schedule  — AgentScheduler::tick (interrupt test, task advance,
//!                   selection; squad slot arbitration is first-come in
//!                   this deterministic order).
//!     ③ Observe   — on_schedule_change when the active category moved.
//! ```
//!
//! Population and squad membership change between ticks through `Sim`'s
//! methods; despawning releases the agent's squad slots and promotes a new
//! leader if it led.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use npc_engine::{ArchetypeSet, BaseArchetype};
//! use npc_percept::NullSensors;
//! use npc_schedule::ScheduleTable;
//! use npc_sim::{NoopObserver, SimBuilder};
//!
//! let mut set = ArchetypeSet::new();
//! let grunt = set.register(ScheduleTable::builder().build(), Box::new(BaseArchetype))?;
//! let mut sim = SimBuilder::new(config, set, NullSensors)
//!     .agents(vec![grunt; 8])
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod sim;


pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
