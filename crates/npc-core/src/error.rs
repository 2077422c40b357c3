//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `NpcError` via `From` impls, or keep them separate and wrap `NpcError` as
//! one variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.
//!
//! Note that an ordinary task failure is *not* an error — it is a
//! `TaskStatus::Failed` value handled by the fail-schedule fallback.  These
//! variants cover genuine misuse or misconfiguration only.

use thiserror::Error;

use crate::{AgentId, ArchetypeId, SquadId};

/// The top-level error type for `npc-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum NpcError {
    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("archetype {0} not registered")]
    ArchetypeNotFound(ArchetypeId),

    #[error("squad {0} not found")]
    SquadNotFound(SquadId),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `npc-*` crates.
pub type NpcResult<T> = Result<T, NpcError>;
