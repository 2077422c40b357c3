//! `AgentScheduler` — per-agent plan execution, advanced once per tick.

use npc_core::{AgentId, AgentRng, ArchetypeId, ScheduleId, SimClock, Tick};
use npc_percept::PerceptionState;
use npc_schedule::Category;
use npc_squad::{MemberRef, SquadCoordinator};
use tracing::{debug, error};

use crate::{ArchetypeSet, MonsterState, SchedulerPhase, SelectCtx, TaskCtx, TaskStatus};

/// Consecutive fail-plan switches allowed within one tick before the engine
/// gives up and substitutes the stand-idle plan.  Bounds the pathological
/// case of a fail plan whose own first task fails instantly.
const MAX_FAIL_SWITCHES: u32 = 4;

/// The identity of the plan being executed: the resolved schedule plus the
/// category it came from (kept for persistence, which must reload by
/// category, never by raw index).
#[derive(Copy, Clone, Debug)]
struct ActivePlan {
    schedule: ScheduleId,
    category: Category,
}

/// Per-agent schedule execution state.
///
/// Created at spawn, discarded at removal; stepped exactly once per
/// simulation tick by the owning loop.  All task side effects happen inside
/// archetype handlers — this type only sequences them.
pub struct AgentScheduler {
    agent: AgentId,
    archetype: ArchetypeId,
    state: MonsterState,
    active: Option<ActivePlan>,
    phase: SchedulerPhase,
    /// Index into the active schedule's task list.  Invariant: in bounds
    /// whenever `active` is `Some`.
    cursor: usize,
    /// Whether the cursor task has had its start call yet.  At most one task
    /// completes per tick, so an instantly-completing start leaves the next
    /// task unstarted until the following tick.
    started: bool,
    task_status: TaskStatus,
    /// Wait-task deadline in simulation time (not wall clock).
    wait_until: Option<Tick>,
    /// Recovery category designated by a "set fail category" task earlier in
    /// the active schedule; `None` means the generic fail category.
    fail_category: Option<Category>,
}

impl AgentScheduler {
    pub fn new(agent: AgentId, archetype: ArchetypeId) -> Self {
        Self {
            agent,
            archetype,
            state: MonsterState::Idle,
            active: None,
            phase: SchedulerPhase::NoSchedule,
            cursor: 0,
            started: false,
            task_status: TaskStatus::default(),
            wait_until: None,
            fail_category: None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn agent(&self) -> AgentId {
        self.agent
    }

    pub fn archetype(&self) -> ArchetypeId {
        self.archetype
    }

    pub fn state(&self) -> MonsterState {
        self.state
    }

    /// Set the high-level state.  Owned by the application's sensory layer;
    /// takes effect at the next selection.
    pub fn set_state(&mut self, state: MonsterState) {
        self.state = state;
    }

    /// Identity of the active schedule, if one is running.
    pub fn active_schedule(&self) -> Option<ScheduleId> {
        self.active.map(|a| a.schedule)
    }

    /// Category the active schedule was resolved from.
    pub fn active_category(&self) -> Option<Category> {
        self.active.map(|a| a.category)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// How the current (or most recent) plan is faring.
    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn task_status(&self) -> TaskStatus {
        self.task_status
    }

    pub(crate) fn wait_until(&self) -> Option<Tick> {
        self.wait_until
    }

    pub(crate) fn fail_category(&self) -> Option<Category> {
        self.fail_category
    }

    // ── Tick entry point ──────────────────────────────────────────────────

    /// Advance one simulation tick.
    ///
    /// `percept` must have been refreshed (and sealed) this tick.  `squad`
    /// carries the agent's coordinator and roster ref when it is in a squad.
    pub fn tick(
        &mut self,
        set: &ArchetypeSet,
        clock: &SimClock,
        percept: &mut PerceptionState,
        rng: &mut AgentRng,
        mut squad: Option<(&mut SquadCoordinator, MemberRef)>,
    ) {
        match self.active {
            Some(active) => {
                // ── Interrupt test, before any task work ──────────────────
                let def = set.registry().schedule(active.schedule);
                if percept.has_any(def.interrupt_mask) || percept.sound_matches(def.sound_mask) {
                    debug!(
                        agent = %self.agent,
                        schedule = %def.name,
                        "schedule interrupted"
                    );
                    self.release_slots(&mut squad);
                    self.active = None;
                    self.phase = SchedulerPhase::Interrupted;
                    // Reselect on the next tick.
                    return;
                }

                // ── Cursor invariant ──────────────────────────────────────
                if self.cursor >= def.len() {
                    debug_assert!(
                        false,
                        "task cursor {} out of range for schedule '{}'",
                        self.cursor, def.name
                    );
                    error!(
                        agent = %self.agent,
                        schedule = %def.name,
                        cursor = self.cursor,
                        "task cursor out of range; forcing completion"
                    );
                    self.cursor = def.len() - 1;
                    self.finish(percept, &mut squad);
                    return;
                }

                // ── Start or run the cursor task ──────────────────────────
                if !self.started {
                    let mut fail_budget = MAX_FAIL_SWITCHES;
                    self.start_current_task(set, clock, percept, rng, &mut squad, &mut fail_budget);
                    return;
                }

                let task = def.tasks()[self.cursor];
                let status = {
                    let member = squad.as_ref().map(|(_, member)| *member);
                    let mut ctx = TaskCtx {
                        agent: self.agent,
                        clock,
                        percept,
                        rng,
                        squad: squad.as_mut().map(|(coord, _)| &mut **coord),
                        member,
                        wait_until: &mut self.wait_until,
                        fail_category: &mut self.fail_category,
                    };
                    set.run_task(self.archetype, &task, &mut ctx)
                };
                self.task_status = status;

                match status {
                    TaskStatus::Running => {}
                    TaskStatus::Complete => {
                        self.cursor += 1;
                        if self.cursor >= def.len() {
                            self.finish(percept, &mut squad);
                        } else {
                            // The next task starts on the following tick.
                            self.started = false;
                        }
                    }
                    TaskStatus::Failed => {
                        self.phase = SchedulerPhase::Failed;
                        let mut fail_budget = MAX_FAIL_SWITCHES;
                        if self.switch_to_fail(set, percept, &mut squad, &mut fail_budget) {
                            self.start_current_task(
                                set, clock, percept, rng, &mut squad, &mut fail_budget,
                            );
                        }
                    }
                }
            }

            None => {
                // ── Selection ─────────────────────────────────────────────
                self.phase = SchedulerPhase::Selecting;
                percept.set_schedule_done(false);
                let category = {
                    let member = squad.as_ref().map(|(_, member)| *member);
                    let mut ctx = SelectCtx {
                        agent: self.agent,
                        state: self.state,
                        percept,
                        rng,
                        squad: squad.as_mut().map(|(coord, _)| &mut **coord),
                        member,
                    };
                    set.select(self.archetype, &mut ctx)
                };
                let schedule = set.registry().resolve(self.archetype, category);
                self.begin(set, schedule, category, percept);
                let mut fail_budget = MAX_FAIL_SWITCHES;
                self.start_current_task(set, clock, percept, rng, &mut squad, &mut fail_budget);
            }
        }
    }

    // ── Plan lifecycle helpers ────────────────────────────────────────────

    fn begin(
        &mut self,
        set: &ArchetypeSet,
        schedule: ScheduleId,
        category: Category,
        percept: &mut PerceptionState,
    ) {
        debug!(
            agent = %self.agent,
            %category,
            schedule = %set.registry().schedule(schedule).name,
            "starting schedule"
        );
        self.active = Some(ActivePlan { schedule, category });
        self.phase = SchedulerPhase::Running;
        self.cursor = 0;
        self.started = false;
        self.task_status = TaskStatus::Running;
        self.wait_until = None;
        self.fail_category = None;
        percept.set_task_failed(false);
    }

    /// Give the cursor task its start call.  At most one task completes per
    /// tick: an instantly-completing start advances the cursor but leaves the
    /// next task unstarted until the following tick, so a plan of N
    /// instantaneous tasks spans N ticks and is observable while it runs.
    /// A failing start switches to the fail plan and starts that plan's
    /// first task, bounded by the fail budget.
    fn start_current_task(
        &mut self,
        set: &ArchetypeSet,
        clock: &SimClock,
        percept: &mut PerceptionState,
        rng: &mut AgentRng,
        squad: &mut Option<(&mut SquadCoordinator, MemberRef)>,
        fail_budget: &mut u32,
    ) {
        loop {
            let Some(active) = self.active else { return };
            let def = set.registry().schedule(active.schedule);
            if self.cursor >= def.len() {
                self.finish(percept, squad);
                return;
            }

            let task = def.tasks()[self.cursor];
            self.wait_until = None;
            self.started = true;
            let status = {
                let member = squad.as_ref().map(|(_, member)| *member);
                let mut ctx = TaskCtx {
                    agent: self.agent,
                    clock,
                    percept,
                    rng,
                    squad: squad.as_mut().map(|(coord, _)| &mut **coord),
                    member,
                    wait_until: &mut self.wait_until,
                    fail_category: &mut self.fail_category,
                };
                set.start_task(self.archetype, &task, &mut ctx)
            };
            self.task_status = status;

            match status {
                TaskStatus::Running => return,
                TaskStatus::Complete => {
                    self.cursor += 1;
                    if self.cursor >= def.len() {
                        self.finish(percept, squad);
                    } else {
                        self.started = false;
                    }
                    return;
                }
                TaskStatus::Failed => {
                    self.phase = SchedulerPhase::Failed;
                    if !self.switch_to_fail(set, percept, squad, fail_budget) {
                        return;
                    }
                }
            }
        }
    }

    /// Switch to the fail plan (explicit fail category if one was set, else
    /// the generic one).  Returns `false` when the budget ran out and the
    /// stand-idle substitute was installed without further starting.
    fn switch_to_fail(
        &mut self,
        set: &ArchetypeSet,
        percept: &mut PerceptionState,
        squad: &mut Option<(&mut SquadCoordinator, MemberRef)>,
        fail_budget: &mut u32,
    ) -> bool {
        self.release_slots(squad);
        let category = self.fail_category.take().unwrap_or(Category::FAIL);

        if *fail_budget == 0 {
            error!(
                agent = %self.agent,
                %category,
                "fail-plan switch limit reached; standing idle"
            );
            let schedule = set.registry().stand_idle();
            // Record the substitute's own category so a snapshot taken in
            // this state restores to stand-idle, not the doomed fail plan.
            self.begin(set, schedule, Category::IDLE_STAND, percept);
            percept.set_task_failed(true);
            self.task_status = TaskStatus::Running;
            return false;
        }
        *fail_budget -= 1;

        let schedule = set.registry().resolve(self.archetype, category);
        self.begin(set, schedule, category, percept);
        // Leave the failure visible to sensors/selection until the next
        // normally selected schedule clears it.
        percept.set_task_failed(true);
        true
    }

    fn finish(
        &mut self,
        percept: &mut PerceptionState,
        squad: &mut Option<(&mut SquadCoordinator, MemberRef)>,
    ) {
        debug!(agent = %self.agent, "schedule complete");
        percept.set_schedule_done(true);
        self.release_slots(squad);
        self.active = None;
        self.phase = SchedulerPhase::Completed;
        self.started = false;
        self.task_status = TaskStatus::Complete;
        self.wait_until = None;
    }

    // ── Persistence ───────────────────────────────────────────────────────

    /// Reinstate a [`SchedulerSnapshot`][crate::SchedulerSnapshot] against a
    /// (possibly rebuilt) archetype set.
    ///
    /// The stored category is re-resolved through the current tables; the
    /// cursor is clamped into the resolved schedule's bounds.  The restored
    /// task resumes with a `run` step on the next tick, as if it had
    /// reported `Running` when the snapshot was taken.
    pub fn restore(&mut self, snapshot: &crate::SchedulerSnapshot, set: &ArchetypeSet) {
        self.state = snapshot.state;
        self.wait_until = snapshot.wait_until;
        self.fail_category = snapshot.fail_category;
        match snapshot.active_category {
            Some(category) => {
                let schedule = set.registry().resolve(self.archetype, category);
                let last = set.registry().schedule(schedule).len() - 1;
                self.active = Some(ActivePlan { schedule, category });
                self.phase = SchedulerPhase::Running;
                self.cursor = (snapshot.cursor as usize).min(last);
                self.started = true;
                self.task_status = TaskStatus::Running;
            }
            None => {
                self.active = None;
                self.phase = SchedulerPhase::NoSchedule;
                self.cursor = 0;
                self.started = false;
                self.task_status = TaskStatus::default();
            }
        }
    }

    /// Release every squad slot this agent holds.  Called whenever the
    /// active plan ends for any reason; selection re-occupies next tick if
    /// it still wants an attack.
    fn release_slots(&self, squad: &mut Option<(&mut SquadCoordinator, MemberRef)>) {
        if let Some((coordinator, member)) = squad {
            coordinator.release_all(*member);
        }
    }
}
