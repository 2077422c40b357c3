//! Atomic task steps: `TaskAction` and `TaskDef`.
//!
//! # Open action space
//!
//! `TaskAction` is a `u16` namespace rather than a closed enum so that
//! archetypes can define their own actions without touching this crate.
//! Values below [`TaskAction::ENGINE_LIMIT`] are reserved for the engine's
//! built-in task handlers; archetype actions start at the limit (use
//! [`TaskAction::custom`]).  Unrecognized actions delegate up the archetype
//! parent chain at execution time, mirroring the table-based schedule
//! resolution.

use crate::Category;

// ── TaskAction ────────────────────────────────────────────────────────────────

/// Identifier of one task's behavior.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskAction(pub u16);

impl TaskAction {
    /// Report `Running` until `param` simulated seconds have elapsed, then
    /// `Complete`.
    pub const WAIT: TaskAction = TaskAction(0);
    /// Like `WAIT`, but for a uniform random duration in `[0.1, param]` s.
    pub const WAIT_RANDOM: TaskAction = TaskAction(1);
    /// Designate the recovery category used if a later task in this schedule
    /// fails.  `param` encodes the `Category`.  Completes immediately.
    pub const SET_FAIL_CATEGORY: TaskAction = TaskAction(2);
    /// Revert to the generic fail category.  Completes immediately.
    pub const CLEAR_FAIL_CATEGORY: TaskAction = TaskAction(3);
    /// Halt movement (side effect owned by the archetype's motor; the engine
    /// handler completes immediately).
    pub const STOP_MOVING: TaskAction = TaskAction(4);
    /// Turn toward the current enemy (or its last known position).
    pub const FACE_ENEMY: TaskAction = TaskAction(5);
    /// Turn toward the origin of this tick's best heard sound.  Fails if no
    /// sound was heard.
    pub const FACE_BEST_SOUND: TaskAction = TaskAction(6);
    /// Store the enemy's current position in the agent's memory.
    pub const REMEMBER_ENEMY_POS: TaskAction = TaskAction(7);

    /// First action value available to archetype-defined tasks.
    pub const ENGINE_LIMIT: u16 = 64;

    /// The `n`-th archetype-defined action.
    #[inline]
    pub const fn custom(n: u16) -> TaskAction {
        TaskAction(Self::ENGINE_LIMIT + n)
    }

    /// `true` if this action is in the engine-reserved range.
    #[inline]
    pub fn is_engine(self) -> bool {
        self.0 < Self::ENGINE_LIMIT
    }
}

// ── TaskDef ───────────────────────────────────────────────────────────────────

/// One atomic step of a schedule: an action plus a single numeric parameter.
///
/// Immutable once constructed.  The meaning of `param` is defined by the
/// action (seconds for waits, an encoded `Category` for
/// `SET_FAIL_CATEGORY`, archetype-defined otherwise).
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskDef {
    pub action: TaskAction,
    pub param: f32,
}

impl TaskDef {
    #[inline]
    pub const fn new(action: TaskAction, param: f32) -> Self {
        Self { action, param }
    }

    /// Convenience for parameterless tasks.
    #[inline]
    pub const fn bare(action: TaskAction) -> Self {
        Self { action, param: 0.0 }
    }

    /// A `SET_FAIL_CATEGORY` task with the category encoded in `param`.
    #[inline]
    pub fn set_fail(category: Category) -> Self {
        Self { action: TaskAction::SET_FAIL_CATEGORY, param: category.0 as f32 }
    }

    /// Decode `param` as a `Category` (for `SET_FAIL_CATEGORY`).
    ///
    /// The encoding is exact: every `u16` is representable in f32.
    #[inline]
    pub fn param_as_category(&self) -> Category {
        Category(self.param as u16)
    }
}
