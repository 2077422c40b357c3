//! Scheduler persistence.
//!
//! Snapshots store the active schedule's *category*, never its raw
//! `ScheduleId`: registries are rebuilt at startup and arena indices are not
//! stable across sessions, but a category re-resolves through the same
//! tables to the same plan.  The cursor is clamped on restore in case the
//! schedule content changed between save and load.

use npc_core::Tick;
use npc_schedule::Category;

use crate::{AgentScheduler, MonsterState};

/// Portable execution state of one [`AgentScheduler`].
///
/// Produced by [`AgentScheduler::snapshot`], reinstated by
/// [`AgentScheduler::restore`].
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SchedulerSnapshot {
    pub state: MonsterState,
    /// Category of the active schedule, or `None` when between plans.
    pub active_category: Option<Category>,
    pub cursor: u32,
    pub wait_until: Option<Tick>,
    pub fail_category: Option<Category>,
}

impl AgentScheduler {
    /// Capture the current execution state for persistence.
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            state: self.state(),
            active_category: self.active_category(),
            cursor: self.cursor() as u32,
            wait_until: self.wait_until(),
            fail_category: self.fail_category(),
        }
    }
}
