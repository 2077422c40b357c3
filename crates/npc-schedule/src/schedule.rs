//! `ScheduleDef` — an immutable ordered plan of tasks plus interrupt masks.

use npc_percept::{Conditions, SoundTypes};

use crate::{ScheduleError, ScheduleResult, TaskDef};

/// An ordered plan of tasks with the conditions that may preempt it.
///
/// Built once at archetype registration and owned by the
/// [`ScheduleRegistry`][crate::ScheduleRegistry]; referenced everywhere by
/// `ScheduleId`, never cloned mid-execution.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScheduleDef {
    /// Display name, for logs and debugging only.
    pub name: String,
    /// Ordered task sequence.  Never empty.
    tasks: Vec<TaskDef>,
    /// Conditions that abandon this schedule the moment any one becomes true.
    pub interrupt_mask: Conditions,
    /// Heard-sound types that abandon this schedule.
    pub sound_mask: SoundTypes,
}

impl ScheduleDef {
    /// Construct a definition, rejecting empty task lists.
    pub fn new(
        name: impl Into<String>,
        tasks: Vec<TaskDef>,
        interrupt_mask: Conditions,
        sound_mask: SoundTypes,
    ) -> ScheduleResult<Self> {
        let name = name.into();
        if tasks.is_empty() {
            return Err(ScheduleError::EmptySchedule { name });
        }
        Ok(Self { name, tasks, interrupt_mask, sound_mask })
    }

    /// Read-only slice of the task sequence (length ≥ 1).
    #[inline]
    pub fn tasks(&self) -> &[TaskDef] {
        &self.tasks
    }

    /// Number of tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Always `false` — kept for API symmetry with collection types.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The task at `cursor`, or `None` if out of range.
    #[inline]
    pub fn task_at(&self, cursor: usize) -> Option<&TaskDef> {
        self.tasks.get(cursor)
    }
}
