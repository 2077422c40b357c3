//! `npc-core` — foundational types for the `rust_npc` behavior-scheduling
//! framework.
//!
//! This crate is a dependency of every other `npc-*` crate.  It intentionally
//! has no `npc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                            |
//! |-------------|-----------------------------------------------------|
//! | [`ids`]     | `AgentId`, `SquadId`, `ArchetypeId`, `ScheduleId`   |
//! | [`pos`]     | `Vec3`, distance helpers                            |
//! | [`time`]    | `Tick`, `SimClock`, `SimConfig`                     |
//! | [`rng`]     | `AgentRng` (per-agent), `SimRng` (global)           |
//! | [`error`]   | `NpcError`, `NpcResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                              |
//! |---------|---------------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on all public types (snapshot support).   |

pub mod error;
pub mod ids;
pub mod pos;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{NpcError, NpcResult};
pub use ids::{AgentId, ArchetypeId, ScheduleId, SquadId};
pub use pos::Vec3;
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
