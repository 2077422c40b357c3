//! Unit tests for npc-engine.

use npc_core::{AgentId, AgentRng, ArchetypeId, SimClock};
use npc_percept::{Conditions, PerceptionState, SoundDescriptor, SoundTypes};
use npc_schedule::{Category, ScheduleDef, ScheduleTable, TaskAction, TaskDef};
use npc_squad::{MemberRef, SlotCapacities, SlotClass, SquadCoordinator};

use crate::{
    AgentScheduler, Archetype, ArchetypeSet, BaseArchetype, MonsterState, SchedulerPhase,
    SelectCtx, TaskStatus,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn base_set() -> (ArchetypeSet, ArchetypeId) {
    let mut set = ArchetypeSet::new();
    let arch = set
        .register(ScheduleTable::builder().build(), Box::new(BaseArchetype))
        .unwrap();
    (set, arch)
}

/// Archetype whose selection always returns the same category.
struct FixedSelect(Category);

impl Archetype for FixedSelect {
    fn select_schedule(&self, _ctx: &mut SelectCtx<'_>) -> Option<Category> {
        Some(self.0)
    }
}

/// A set with one archetype that always selects `category`, resolved to a
/// schedule built from `tasks` (plus the given interrupt conditions).
fn fixed_set(
    category: Category,
    tasks: Vec<TaskDef>,
    interrupts: Conditions,
    sounds: SoundTypes,
) -> (ArchetypeSet, ArchetypeId) {
    let mut set = ArchetypeSet::new();
    let schedule = set.add_schedule(
        ScheduleDef::new("TestSchedule", tasks, interrupts, sounds).unwrap(),
    );
    let table = ScheduleTable::builder().entry(category, schedule).build();
    let arch = set.register(table, Box::new(FixedSelect(category))).unwrap();
    (set, arch)
}

fn sealed() -> PerceptionState {
    sealed_with(Conditions::empty())
}

fn sealed_with(flags: Conditions) -> PerceptionState {
    let mut percept = PerceptionState::new();
    percept.begin_refresh();
    percept.set(flags);
    percept.seal();
    percept
}

/// An archetype that maps both its selected category and FAIL to a schedule
/// that fails on its first task, so every fail switch fails again.
fn doomed_set() -> (ArchetypeSet, ArchetypeId) {
    let mut set = ArchetypeSet::new();
    let doomed = set.add_schedule(
        ScheduleDef::new(
            "Doomed",
            vec![TaskDef::bare(TaskAction::FACE_BEST_SOUND)],
            Conditions::empty(),
            SoundTypes::empty(),
        )
        .unwrap(),
    );
    let table = ScheduleTable::builder()
        .entry(Category::custom(0), doomed)
        .entry(Category::FAIL, doomed)
        .build();
    let arch = set
        .register(table, Box::new(FixedSelect(Category::custom(0))))
        .unwrap();
    (set, arch)
}

fn danger_sound() -> SoundDescriptor {
    SoundDescriptor {
        types: SoundTypes::DANGER,
        origin: npc_core::Vec3::new(10.0, 0.0, 0.0),
        volume: 300.0,
    }
}

fn rig(agent: u32) -> (SimClock, AgentRng, AgentScheduler) {
    let id = AgentId(agent);
    (SimClock::new(100), AgentRng::new(0xBEEF, id), AgentScheduler::new(id, ArchetypeId(0)))
}

// ── Built-in selection ────────────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use super::*;

    #[test]
    fn idle_agent_stands_idle() {
        let (set, _) = base_set();
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        assert_eq!(sched.active_category(), Some(Category::IDLE_STAND));
        // STOP_MOVING completed instantly; the WAIT starts next tick.
        assert_eq!(sched.cursor(), 1);
        assert_eq!(sched.task_status(), TaskStatus::Complete);

        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.task_status(), TaskStatus::Running);
    }

    #[test]
    fn new_enemy_wakes_an_idle_agent() {
        let (set, _) = base_set();
        let (clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed_with(Conditions::NEW_ENEMY);

        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        // The plan must still be observable at the end of its selection
        // tick, even though its first task completed instantly.
        assert_eq!(sched.active_category(), Some(Category::WAKE_ANGRY));
        assert_eq!(sched.phase(), SchedulerPhase::Running);
    }

    #[test]
    fn danger_sound_preempts_combat() {
        let (set, _) = base_set();
        let (clock, mut rng, mut sched) = rig(1);
        sched.set_state(MonsterState::Combat);

        let mut percept = PerceptionState::new();
        percept.begin_refresh();
        percept.set(Conditions::CAN_MELEE_ATTACK1);
        percept.hear(danger_sound());
        percept.seal();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(
            sched.active_category(),
            Some(Category::TAKE_COVER_FROM_BEST_SOUND)
        );
    }

    #[test]
    fn combat_prefers_melee_when_in_reach() {
        let (set, _) = base_set();
        let (clock, mut rng, mut sched) = rig(1);
        sched.set_state(MonsterState::Combat);
        let mut percept =
            sealed_with(Conditions::CAN_MELEE_ATTACK1 | Conditions::CAN_RANGE_ATTACK1);

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.active_category(), Some(Category::MELEE_ATTACK1));
    }

    #[test]
    fn hurt_agent_covers_or_flinches() {
        // The split is random per agent; either branch is legal, anything
        // else is not.
        for agent in 0..20 {
            let (set, _) = base_set();
            let (clock, mut rng, mut sched) = rig(agent);
            sched.set_state(MonsterState::Combat);
            let mut percept = sealed_with(Conditions::HEAVY_DAMAGE);

            sched.tick(&set, &clock, &mut percept, &mut rng, None);
            let category = sched.active_category().unwrap();
            assert!(
                category == Category::TAKE_COVER_FROM_ENEMY
                    || category == Category::SMALL_FLINCH,
                "unexpected hurt response {category}"
            );
        }
    }

    #[test]
    fn occluded_enemy_means_standoff() {
        let (set, _) = base_set();
        let (clock, mut rng, mut sched) = rig(1);
        sched.set_state(MonsterState::Combat);
        let mut percept = sealed_with(Conditions::ENEMY_OCCLUDED);

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.active_category(), Some(Category::STANDOFF));
    }
}

// ── Task execution ────────────────────────────────────────────────────────────

#[cfg(test)]
mod execution {
    use super::*;

    #[test]
    fn instant_tasks_complete_one_per_tick() {
        let tasks = vec![
            TaskDef::bare(TaskAction::STOP_MOVING),
            TaskDef::bare(TaskAction::FACE_ENEMY),
            TaskDef::bare(TaskAction::REMEMBER_ENEMY_POS),
        ];
        let (set, _) =
            fixed_set(Category::custom(0), tasks, Conditions::empty(), SoundTypes::empty());
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        // Three instantaneous tasks take three ticks, one completion each.
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.active_category(), Some(Category::custom(0)));
        assert_eq!(sched.cursor(), 1);

        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.cursor(), 2);

        // The last completion finishes the schedule naturally.
        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert!(sched.active_category().is_none());
        assert_eq!(sched.task_status(), TaskStatus::Complete);
        assert_eq!(sched.phase(), SchedulerPhase::Completed);
        assert!(percept.has_all(Conditions::SCHEDULE_DONE));

        // The fourth tick reselects and clears the completion flag.
        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert!(sched.active_category().is_some());
        assert!(!percept.has_all(Conditions::SCHEDULE_DONE));
    }

    #[test]
    fn wait_completes_at_its_deadline() {
        // 0.3 s at 100 ms/tick = 3 ticks.
        let tasks = vec![TaskDef::new(TaskAction::WAIT, 0.3)];
        let (set, _) =
            fixed_set(Category::custom(0), tasks, Conditions::empty(), SoundTypes::empty());
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.task_status(), TaskStatus::Running);

        for _ in 0..2 {
            clock.advance();
            sched.tick(&set, &clock, &mut percept, &mut rng, None);
            assert_eq!(sched.task_status(), TaskStatus::Running);
        }

        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.task_status(), TaskStatus::Complete);
        assert!(sched.active_category().is_none());
        assert!(percept.has_all(Conditions::SCHEDULE_DONE));
    }

    #[test]
    fn random_wait_deadline_stays_in_bounds() {
        let tasks = vec![TaskDef::new(TaskAction::WAIT_RANDOM, 0.5)];
        let (set, _) =
            fixed_set(Category::custom(0), tasks, Conditions::empty(), SoundTypes::empty());
        let (clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        let deadline = sched.snapshot().wait_until.expect("wait must be armed");
        let elapsed = deadline - clock.current_tick;
        assert!((1..=5).contains(&elapsed), "deadline {elapsed} ticks out");
    }
}

// ── Interrupts ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod interrupts {
    use super::*;

    fn long_wait_set(interrupts: Conditions, sounds: SoundTypes) -> (ArchetypeSet, ArchetypeId) {
        fixed_set(
            Category::custom(0),
            vec![TaskDef::new(TaskAction::WAIT, 60.0)],
            interrupts,
            sounds,
        )
    }

    #[test]
    fn interrupt_condition_abandons_the_schedule() {
        let (set, _) = long_wait_set(Conditions::NEW_ENEMY, SoundTypes::empty());
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert!(sched.active_category().is_some());

        clock.advance();
        percept.begin_refresh();
        percept.set(Conditions::NEW_ENEMY);
        percept.seal();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        // Abandoned, not completed.
        assert!(sched.active_category().is_none());
        assert_eq!(sched.phase(), SchedulerPhase::Interrupted);
        assert!(!percept.has_all(Conditions::SCHEDULE_DONE));
    }

    #[test]
    fn unrelated_condition_does_not_interrupt() {
        let (set, _) = long_wait_set(Conditions::NEW_ENEMY, SoundTypes::empty());
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        clock.advance();
        percept.begin_refresh();
        percept.set(Conditions::LIGHT_DAMAGE);
        percept.seal();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        assert!(sched.active_category().is_some());
        assert_eq!(sched.task_status(), TaskStatus::Running);
    }

    #[test]
    fn matching_sound_abandons_the_schedule() {
        let (set, _) = long_wait_set(Conditions::empty(), SoundTypes::DANGER);
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        clock.advance();
        percept.begin_refresh();
        percept.hear(danger_sound());
        percept.seal();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        assert!(sched.active_category().is_none());
    }
}

// ── Failure handling ──────────────────────────────────────────────────────────

#[cfg(test)]
mod failure {
    use super::*;

    #[test]
    fn failed_task_switches_to_the_generic_fail_plan() {
        // FACE_BEST_SOUND fails when nothing was heard.
        let tasks = vec![TaskDef::bare(TaskAction::FACE_BEST_SOUND)];
        let (set, _) =
            fixed_set(Category::custom(0), tasks, Conditions::empty(), SoundTypes::empty());
        let (clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        // Switched to the fail plan in the same tick; its first task ran.
        assert_eq!(sched.active_category(), Some(Category::FAIL));
        assert_eq!(sched.phase(), SchedulerPhase::Running);
        assert_eq!(sched.cursor(), 1);
        assert!(percept.has_all(Conditions::TASK_FAILED));
    }

    #[test]
    fn designated_fail_category_wins_over_the_generic_one() {
        let tasks = vec![
            TaskDef::set_fail(Category::STANDOFF),
            TaskDef::bare(TaskAction::FACE_BEST_SOUND),
        ];
        let (set, _) =
            fixed_set(Category::custom(0), tasks, Conditions::empty(), SoundTypes::empty());
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        // Tick one arms the fail category; tick two fails the sound task.
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.active_category(), Some(Category::custom(0)));
        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        assert_eq!(sched.active_category(), Some(Category::STANDOFF));
        assert!(percept.has_all(Conditions::TASK_FAILED));
    }

    #[test]
    fn cleared_fail_category_reverts_to_generic() {
        let tasks = vec![
            TaskDef::set_fail(Category::STANDOFF),
            TaskDef::bare(TaskAction::CLEAR_FAIL_CATEGORY),
            TaskDef::bare(TaskAction::FACE_BEST_SOUND),
        ];
        let (set, _) =
            fixed_set(Category::custom(0), tasks, Conditions::empty(), SoundTypes::empty());
        let (mut clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        // Set, clear, then fail: one task per tick.
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        assert_eq!(sched.active_category(), Some(Category::FAIL));
    }

    #[test]
    fn failing_fail_plan_degrades_to_stand_idle() {
        let (set, _) = doomed_set();
        let (clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        assert_eq!(sched.active_schedule(), Some(set.registry().stand_idle()));
        assert!(percept.has_all(Conditions::TASK_FAILED));
    }
}

// ── Squad slot integration ────────────────────────────────────────────────────

#[cfg(test)]
mod squad {
    use super::*;

    /// Selection that attacks only with an engage slot in hand, the gating
    /// discipline squad shooters use.
    struct SlotGated;

    impl Archetype for SlotGated {
        fn select_schedule(&self, ctx: &mut SelectCtx<'_>) -> Option<Category> {
            if ctx.try_occupy_slot(SlotClass::ENGAGE) {
                Some(Category::RANGE_ATTACK1)
            } else {
                Some(Category::STANDOFF)
            }
        }
    }

    fn slot_set() -> ArchetypeSet {
        let mut set = ArchetypeSet::new();
        let attack = set.add_schedule(
            ScheduleDef::new(
                "SlotAttack",
                vec![TaskDef::new(TaskAction::WAIT, 60.0)],
                Conditions::NEW_ENEMY,
                SoundTypes::empty(),
            )
            .unwrap(),
        );
        // Standoff completes instantly so the loser re-bids every tick.
        let standoff = set.add_schedule(
            ScheduleDef::new(
                "SlotStandoff",
                vec![TaskDef::bare(TaskAction::STOP_MOVING)],
                Conditions::empty(),
                SoundTypes::empty(),
            )
            .unwrap(),
        );
        let table = ScheduleTable::builder()
            .entry(Category::RANGE_ATTACK1, attack)
            .entry(Category::STANDOFF, standoff)
            .build();
        set.register(table, Box::new(SlotGated)).unwrap();
        set
    }

    fn squad_of_two() -> (SquadCoordinator, MemberRef, MemberRef) {
        let mut coordinator =
            SquadCoordinator::new(SlotCapacities::new().with(SlotClass::ENGAGE, 1));
        let a = coordinator.add_member(AgentId(1));
        let b = coordinator.add_member(AgentId(2));
        (coordinator, a, b)
    }

    #[test]
    fn one_slot_means_one_attacker() {
        let set = slot_set();
        let (mut coordinator, a, b) = squad_of_two();
        let (clock, mut rng_a, mut sched_a) = rig(1);
        let (_, mut rng_b, mut sched_b) = rig(2);
        let mut percept_a = sealed();
        let mut percept_b = sealed();

        sched_a.tick(&set, &clock, &mut percept_a, &mut rng_a, Some((&mut coordinator, a)));
        sched_b.tick(&set, &clock, &mut percept_b, &mut rng_b, Some((&mut coordinator, b)));

        assert_eq!(sched_a.active_category(), Some(Category::RANGE_ATTACK1));
        assert_eq!(sched_b.active_category(), None); // standoff finished instantly
        assert_eq!(coordinator.occupancy(SlotClass::ENGAGE), 1);
        assert!(coordinator.holds(a, SlotClass::ENGAGE));
    }

    #[test]
    fn interrupt_releases_the_slot_for_the_next_bidder() {
        let set = slot_set();
        let (mut coordinator, a, b) = squad_of_two();
        let (mut clock, mut rng_a, mut sched_a) = rig(1);
        let (_, mut rng_b, mut sched_b) = rig(2);
        let mut percept_a = sealed();
        let mut percept_b = sealed();

        sched_a.tick(&set, &clock, &mut percept_a, &mut rng_a, Some((&mut coordinator, a)));
        sched_b.tick(&set, &clock, &mut percept_b, &mut rng_b, Some((&mut coordinator, b)));
        assert!(coordinator.holds(a, SlotClass::ENGAGE));

        // A's attack is interrupted; its slot must come free.
        clock.advance();
        percept_a.begin_refresh();
        percept_a.set(Conditions::NEW_ENEMY);
        percept_a.seal();
        sched_a.tick(&set, &clock, &mut percept_a, &mut rng_a, Some((&mut coordinator, a)));
        assert_eq!(coordinator.occupancy(SlotClass::ENGAGE), 0);

        // B bids again next selection and wins it.
        sched_b.tick(&set, &clock, &mut percept_b, &mut rng_b, Some((&mut coordinator, b)));
        assert_eq!(sched_b.active_category(), Some(Category::RANGE_ATTACK1));
        assert!(coordinator.holds(b, SlotClass::ENGAGE));
    }
}

// ── Persistence ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod persistence {
    use super::*;
    use crate::SchedulerSnapshot;

    #[test]
    fn snapshot_roundtrips_through_a_fresh_scheduler() {
        let (set, arch) = base_set();
        let (mut clock, mut rng, mut sched) = rig(1);
        sched.set_state(MonsterState::Alert);
        let mut percept = sealed();

        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        clock.advance();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);

        let snap = sched.snapshot();
        let mut restored = AgentScheduler::new(AgentId(1), arch);
        restored.restore(&snap, &set);

        assert_eq!(restored.snapshot(), snap);
        assert_eq!(restored.state(), MonsterState::Alert);
        assert_eq!(restored.active_category(), sched.active_category());
        assert_eq!(restored.cursor(), sched.cursor());
    }

    #[test]
    fn restore_clamps_an_out_of_range_cursor() {
        let (set, arch) = base_set();
        let snap = SchedulerSnapshot {
            state: MonsterState::Idle,
            active_category: Some(Category::IDLE_STAND),
            cursor: 99,
            wait_until: None,
            fail_category: None,
        };

        let mut sched = AgentScheduler::new(AgentId(1), arch);
        sched.restore(&snap, &set);

        // DefaultIdleStand has two tasks; the cursor lands on the last.
        assert_eq!(sched.cursor(), 1);
        assert_eq!(sched.active_category(), Some(Category::IDLE_STAND));
    }

    #[test]
    fn degraded_scheduler_snapshots_as_stand_idle() {
        // Once the fail-switch limit substitutes the stand-idle plan, the
        // snapshot must carry stand-idle's category, not the doomed one.
        let (set, arch) = doomed_set();
        let (clock, mut rng, mut sched) = rig(1);
        let mut percept = sealed();
        sched.tick(&set, &clock, &mut percept, &mut rng, None);
        assert_eq!(sched.active_schedule(), Some(set.registry().stand_idle()));

        let snap = sched.snapshot();
        assert_eq!(snap.active_category, Some(Category::IDLE_STAND));

        let mut restored = AgentScheduler::new(AgentId(1), arch);
        restored.restore(&snap, &set);
        assert_eq!(restored.active_schedule(), Some(set.registry().stand_idle()));
    }
}
