//! `npc-engine` — the per-agent schedule execution state machine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`status`]    | `MonsterState`, `SchedulerPhase`, `TaskStatus`           |
//! | [`archetype`] | `Archetype` trait, `SelectCtx`/`TaskCtx`, `ArchetypeSet` |
//! | [`base`]      | Built-in schedule selection and engine task handlers     |
//! | [`scheduler`] | `AgentScheduler` — the tick state machine                |
//! | [`snapshot`]  | `SchedulerSnapshot` — category-based persistence         |
//!
//! # Tick algorithm (summary)
//!
//! ```text
//! tick():
//!   if a schedule is active:
//!     ① interrupt test — any interrupt-mask condition, or a heard sound
//!       matching the sound mask, abandons the plan (reselect next tick)
//!     ② start or run the cursor task; Complete advances the cursor (the
//!       next task starts on the following tick — at most one task completes
//!       per tick), Failed switches to the fail plan immediately
//!   else:
//!     ③ select a category (archetype chain, danger sound preempts),
//!       resolve it to a schedule, start task 0
//! ```
//!
//! `StartTask`/`RunTask` dispatch walks the archetype parent chain exactly
//! like schedule-category resolution: an archetype that returns `None` for a
//! task defers to its parent, and the engine's built-in handlers are the
//! root of every chain.

pub mod archetype;
pub mod base;
pub mod scheduler;
pub mod snapshot;
pub mod status;

#[cfg(test)]
mod tests;

pub use archetype::{Archetype, ArchetypeSet, BaseArchetype, SelectCtx, TaskCtx};
pub use scheduler::AgentScheduler;
pub use snapshot::SchedulerSnapshot;
pub use status::{MonsterState, SchedulerPhase, TaskStatus};
