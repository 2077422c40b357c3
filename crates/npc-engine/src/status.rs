//! High-level agent state and per-task status enums.

/// The agent's high-level disposition, used by schedule selection.
///
/// Transitions are owned by the application's sensory/combat layer (the
/// scheduler never changes state on its own); selection logic only reads it.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MonsterState {
    /// No known threats; ambient behavior.
    #[default]
    Idle,
    /// Something suspicious happened; no confirmed enemy.
    Alert,
    /// Has an enemy.
    Combat,
    /// Under external script control; selection defers to scripted plans.
    Script,
    /// Playing dead / lying in wait.
    Prone,
    /// Dying or dead.
    Dead,
}

/// Where the scheduler is in a plan's lifecycle.
///
/// `Selecting` exists only inside a tick (selection always installs a plan
/// before the tick returns); the other variants are what an observer sees at
/// tick boundaries and say *how* the previous plan ended.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SchedulerPhase {
    /// Never had a plan (freshly spawned or just restored without one).
    #[default]
    NoSchedule,
    /// Choosing a category this tick.
    Selecting,
    /// A plan is active and its cursor task is being stepped.
    Running,
    /// The last plan ran its final task to completion.
    Completed,
    /// The last plan was abandoned by an interrupt condition or sound.
    Interrupted,
    /// A task failed; the fail plan is being installed.
    Failed,
}

/// The status a task reports each time it is stepped.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TaskStatus {
    /// Still working; step again next tick.
    #[default]
    Running,
    /// Done; the cursor may advance.
    Complete,
    /// Preconditions unmet; trigger the schedule's fail plan.  Expected and
    /// recoverable — never an error.
    Failed,
}
