//! The `Archetype` trait and the registry that dispatches through the
//! parent chain.
//!
//! An archetype bundles the two override points a monster type has: schedule
//! *selection* (which category fits the situation) and task *execution*
//! (what an action identifier does).  Both return `Option` — `None` means
//! "not my business, ask my parent" — so dispatch is an explicit chain walk
//! over registration data rather than language-level virtual calls, the same
//! discipline the schedule tables use.  The root of every chain is the
//! engine's built-in behavior in [`base`][crate::base].

use npc_core::{AgentId, AgentRng, ArchetypeId, SimClock, Tick};
use npc_percept::PerceptionState;
use npc_schedule::{Category, ScheduleRegistry, ScheduleResult, ScheduleTable, TaskDef};
use npc_squad::{MemberRef, SquadCoordinator};

use crate::{MonsterState, TaskStatus, base};

// ── Contexts ──────────────────────────────────────────────────────────────────

/// Everything selection logic may look at (and the squad slots it may take).
pub struct SelectCtx<'a> {
    pub agent: AgentId,
    pub state: MonsterState,
    pub percept: &'a PerceptionState,
    pub rng: &'a mut AgentRng,
    /// The agent's squad, when it belongs to one.  Selection occupies attack
    /// slots here; the scheduler releases them when the plan ends.
    pub squad: Option<&'a mut SquadCoordinator>,
    /// This agent's roster ref, valid whenever `squad` is `Some`.
    pub member: Option<MemberRef>,
}

impl SelectCtx<'_> {
    /// Occupy a squad slot if the agent is in a squad and a unit is free.
    /// Without a squad this always fails — slot-gated plans are squad plans.
    pub fn try_occupy_slot(&mut self, class: npc_squad::SlotClass) -> bool {
        match (self.squad.as_deref_mut(), self.member) {
            (Some(squad), Some(member)) => squad.try_occupy(member, class),
            _ => false,
        }
    }
}

/// Everything a task handler may touch.
///
/// Side effects beyond these fields (movement, animation, sound emission)
/// are owned by the archetype implementation itself, typically through
/// handles it captured at construction; the scheduler only sees the returned
/// [`TaskStatus`].
pub struct TaskCtx<'a> {
    pub agent: AgentId,
    pub clock: &'a SimClock,
    pub percept: &'a PerceptionState,
    pub rng: &'a mut AgentRng,
    /// The agent's squad, when it belongs to one — task handlers that gate
    /// mid-plan actions on a slot (suppressing fire, grenades) take it here.
    pub squad: Option<&'a mut SquadCoordinator>,
    /// This agent's roster ref, valid whenever `squad` is `Some`.
    pub member: Option<MemberRef>,
    pub(crate) wait_until: &'a mut Option<Tick>,
    pub(crate) fail_category: &'a mut Option<Category>,
}

impl TaskCtx<'_> {
    /// Occupy a squad slot if the agent is in a squad and a unit is free.
    /// Without a squad this always fails — slot-gated tasks are squad tasks.
    pub fn try_occupy_slot(&mut self, class: npc_squad::SlotClass) -> bool {
        match (self.squad.as_deref_mut(), self.member) {
            (Some(squad), Some(member)) => squad.try_occupy(member, class),
            _ => false,
        }
    }

    /// Arm the wait timer: report the current task `Complete` once the clock
    /// passes `deadline`.
    pub fn set_wait_deadline(&mut self, deadline: Tick) {
        *self.wait_until = Some(deadline);
    }

    /// The armed wait deadline, if any.
    pub fn wait_deadline(&self) -> Option<Tick> {
        *self.wait_until
    }

    /// `true` once the armed deadline has passed (or none is armed).
    pub fn wait_elapsed(&self) -> bool {
        self.wait_until
            .map(|deadline| self.clock.current_tick >= deadline)
            .unwrap_or(true)
    }

    /// Designate the category to switch to if a later task in this schedule
    /// fails (the "set fail schedule" task uses this).
    pub fn set_fail_category(&mut self, category: Category) {
        *self.fail_category = Some(category);
    }

    /// Revert to the generic fail category.
    pub fn clear_fail_category(&mut self) {
        *self.fail_category = None;
    }
}

// ── Archetype trait ───────────────────────────────────────────────────────────

/// Per-monster-type behavior overrides.
///
/// All methods default to `None` (defer to parent), so a leaf archetype
/// implements only what it customizes.  Implementations must be
/// `Send + Sync`: one instance is shared by every agent of the type, and
/// per-agent mutable state belongs in the simulation's per-agent arrays, not
/// in the archetype.
pub trait Archetype: Send + Sync + 'static {
    /// Choose a schedule category for the current situation, or `None` to
    /// defer to the parent archetype (ultimately the built-in rules).
    fn select_schedule(&self, _ctx: &mut SelectCtx<'_>) -> Option<Category> {
        None
    }

    /// Begin executing `task`.  `None` defers to the parent chain; the
    /// engine's handlers cover the reserved actions and fail unknown ones.
    fn start_task(&self, _task: &TaskDef, _ctx: &mut TaskCtx<'_>) -> Option<TaskStatus> {
        None
    }

    /// Step `task` for one tick (called every tick after a `Running` start
    /// until the task completes or fails).  `None` defers to the parent.
    fn run_task(&self, _task: &TaskDef, _ctx: &mut TaskCtx<'_>) -> Option<TaskStatus> {
        None
    }
}

/// An [`Archetype`] with no overrides at all — pure built-in behavior.
pub struct BaseArchetype;

impl Archetype for BaseArchetype {}

// ── ArchetypeSet ──────────────────────────────────────────────────────────────

/// The session-wide pairing of schedule tables and behavior hooks, indexed
/// by `ArchetypeId`.
///
/// Registering through this type keeps the two parallel arenas aligned: the
/// id returned by [`register`][Self::register] addresses both the table (for
/// category resolution) and the hooks (for selection/task dispatch), and the
/// parent chain declared on the table drives both.
pub struct ArchetypeSet {
    registry: ScheduleRegistry,
    hooks: Vec<Box<dyn Archetype>>,
}

impl ArchetypeSet {
    pub fn new() -> Self {
        Self { registry: ScheduleRegistry::new(), hooks: Vec::new() }
    }

    /// The underlying schedule registry (for adding schedule definitions
    /// before registering the archetype that references them).
    pub fn registry(&self) -> &ScheduleRegistry {
        &self.registry
    }

    /// Add a schedule definition; returns its stable identity.
    pub fn add_schedule(&mut self, def: npc_schedule::ScheduleDef) -> npc_core::ScheduleId {
        self.registry.add_schedule(def)
    }

    /// Register an archetype: its schedule table and its behavior hooks.
    pub fn register(
        &mut self,
        table: ScheduleTable,
        hooks: Box<dyn Archetype>,
    ) -> ScheduleResult<ArchetypeId> {
        let id = self.registry.add_archetype(table)?;
        debug_assert_eq!(id.index(), self.hooks.len());
        self.hooks.push(hooks);
        Ok(id)
    }

    // ── Chain dispatch ────────────────────────────────────────────────────

    /// Walk the chain for schedule selection; the built-in rules are the
    /// root and always produce a category.
    pub fn select(&self, archetype: ArchetypeId, ctx: &mut SelectCtx<'_>) -> Category {
        let mut cursor = Some(archetype);
        while let Some(arch) = cursor {
            if let Some(category) = self.hooks[arch.index()].select_schedule(ctx) {
                return category;
            }
            cursor = self.parent_of(arch);
        }
        base::default_select(ctx)
    }

    /// Walk the chain for `start_task`; the engine handlers are the root.
    pub fn start_task(
        &self,
        archetype: ArchetypeId,
        task: &TaskDef,
        ctx: &mut TaskCtx<'_>,
    ) -> TaskStatus {
        let mut cursor = Some(archetype);
        while let Some(arch) = cursor {
            if let Some(status) = self.hooks[arch.index()].start_task(task, ctx) {
                return status;
            }
            cursor = self.parent_of(arch);
        }
        base::start_engine_task(task, ctx)
    }

    /// Walk the chain for `run_task`; the engine handlers are the root.
    pub fn run_task(
        &self,
        archetype: ArchetypeId,
        task: &TaskDef,
        ctx: &mut TaskCtx<'_>,
    ) -> TaskStatus {
        let mut cursor = Some(archetype);
        while let Some(arch) = cursor {
            if let Some(status) = self.hooks[arch.index()].run_task(task, ctx) {
                return status;
            }
            cursor = self.parent_of(arch);
        }
        base::run_engine_task(task, ctx)
    }

    fn parent_of(&self, archetype: ArchetypeId) -> Option<ArchetypeId> {
        // Tables registered through `register` always exist for valid ids.
        self.registry.table(archetype).ok().and_then(|t| t.parent)
    }
}

impl Default for ArchetypeSet {
    fn default() -> Self {
        Self::new()
    }
}
