//! `npc-schedule` — plan data model and per-archetype schedule tables.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`task`]     | `TaskAction` (open action space), `TaskDef`             |
//! | [`category`] | `Category` — abstract, archetype-independent plan kinds |
//! | [`schedule`] | `ScheduleDef` — immutable ordered task plan + masks     |
//! | [`table`]    | `ScheduleTable` + builder (parent-chain overrides)      |
//! | [`registry`] | `ScheduleRegistry` — arena, built-in defaults, resolve  |
//! | [`error`]    | `ScheduleError`, `ScheduleResult<T>`                    |
//!
//! # Resolution model (summary)
//!
//! Every archetype owns a `ScheduleTable` mapping categories it customizes to
//! concrete `ScheduleId`s, plus an optional parent archetype.  Resolution
//! walks child → parent → … → built-in defaults:
//!
//! ```text
//! resolve(archetype, category):
//!     for table in chain(archetype):
//!         if let Some(id) = table.lookup(category): return id
//!     defaults[category]            // every engine category has one
//! ```
//!
//! All definitions are created at registration time and immutable afterward;
//! `ScheduleId` is an arena index, so identity comparisons are exact and
//! resolution is pure — the same `(archetype, category)` pair always yields
//! the same `ScheduleId` for the registry's lifetime.

pub mod category;
pub mod error;
pub mod registry;
pub mod schedule;
pub mod table;
pub mod task;

#[cfg(test)]
mod tests;

pub use category::Category;
pub use error::{ScheduleError, ScheduleResult};
pub use registry::ScheduleRegistry;
pub use schedule::ScheduleDef;
pub use table::{ScheduleTable, TableBuilder};
pub use task::{TaskAction, TaskDef};
