use npc_core::{ArchetypeId, ScheduleId};
use thiserror::Error;

use crate::Category;

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("schedule '{name}' has no tasks")]
    EmptySchedule { name: String },

    #[error("category {0} unresolved: no table entry, no built-in default")]
    UnresolvedCategory(Category),

    #[error("parent archetype {parent} not registered (child must register after parent)")]
    UnknownParent { parent: ArchetypeId },

    #[error("schedule {0} not in registry")]
    UnknownSchedule(ScheduleId),

    #[error("archetype {0} not registered")]
    UnknownArchetype(ArchetypeId),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
