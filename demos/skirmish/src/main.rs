//! skirmish — smallest example for the rust_npc behavior framework.
//!
//! Four squad grunts hold a courtyard while a scripted intruder appears,
//! trades fire, lobs a grenade, and finally goes down.  The interesting part
//! is what the schedule log shows: at most two grunts shoot at once (the
//! ENGAGE slots), a third gives covering fire (the SPECIAL slot), everyone
//! dives for cover when the grenade lands, and the survivors celebrate.

use std::sync::{Arc, Mutex};

use anyhow::Result;

use npc_core::{AgentId, SimConfig, Tick, Vec3};
use npc_engine::{Archetype, ArchetypeSet, MonsterState, SelectCtx, TaskCtx, TaskStatus};
use npc_percept::{Conditions, PerceptionState, Sensors, SoundDescriptor, SoundTypes};
use npc_schedule::{Category, ScheduleDef, ScheduleTable, TaskAction, TaskDef};
use npc_squad::{SlotCapacities, SlotClass};
use npc_sim::{SimBuilder, SimObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const GRUNT_COUNT:      usize = 4;
const SEED:             u64   = 42;
const TICK_DURATION_MS: u32   = 100; // 10 Hz think rate, like the original
const TOTAL_TICKS:      u64   = 120; // 12 simulated seconds

// Grunt-specific task actions, above the engine-reserved range.
const TASK_CALL_CONTACT: TaskAction = TaskAction::custom(0);
const TASK_BURST_FIRE:   TaskAction = TaskAction::custom(1);

// ── Scripted battlefield ──────────────────────────────────────────────────────

/// What the world looks like this tick.  The main loop rewrites it between
/// phases; the sensors translate it into per-agent condition flags.
#[derive(Default)]
struct Battlefield {
    enemy_visible: bool,
    enemy_dead:    bool,
    /// Set for exactly one tick when the intruder is first spotted.
    fresh_contact: bool,
    /// A live grenade on the ground, while it sizzles.
    grenade_at:    Option<Vec3>,
}

#[derive(Clone, Default)]
struct SkirmishSensors(Arc<Mutex<Battlefield>>);

impl Sensors for SkirmishSensors {
    fn refresh(&self, _agent: AgentId, _tick: Tick, percept: &mut PerceptionState) {
        let world = self.0.lock().expect("battlefield lock");
        if world.fresh_contact {
            percept.set(Conditions::NEW_ENEMY);
        }
        if world.enemy_visible && !world.enemy_dead {
            percept.set(Conditions::SEE_ENEMY | Conditions::CAN_RANGE_ATTACK1);
        }
        if world.enemy_dead {
            percept.set(Conditions::ENEMY_DEAD);
        }
        if let Some(origin) = world.grenade_at {
            percept.hear(SoundDescriptor {
                types: SoundTypes::DANGER,
                origin,
                volume: 400.0,
            });
        }
    }
}

// ── Grunt archetype ───────────────────────────────────────────────────────────

/// A squad shooter in the mold of the original military grunts: it attacks
/// only while holding a squad slot, falls back to covering fire on the
/// secondary slot, and stands off when the squad's guns are all taken.
struct GruntArchetype;

impl Archetype for GruntArchetype {
    fn select_schedule(&self, ctx: &mut SelectCtx<'_>) -> Option<Category> {
        // A sizzling grenade outranks everything; the stock rules already
        // dive for cover, so just decline the decision.
        if ctx.percept.sound_matches(SoundTypes::DANGER) {
            return None;
        }
        if ctx.state == MonsterState::Combat
            && ctx.percept.has_all(Conditions::CAN_RANGE_ATTACK1)
            && !ctx.percept.has_any(Conditions::NEW_ENEMY | Conditions::ENEMY_DEAD)
        {
            if ctx.try_occupy_slot(SlotClass::ENGAGE) {
                return Some(Category::RANGE_ATTACK1);
            }
            if ctx.try_occupy_slot(SlotClass::SPECIAL) {
                return Some(Category::RANGE_ATTACK2);
            }
            return Some(Category::STANDOFF);
        }
        // Everything else (idling, waking, cover, victory) is stock behavior.
        None
    }

    fn start_task(&self, task: &TaskDef, ctx: &mut TaskCtx<'_>) -> Option<TaskStatus> {
        match task.action {
            TASK_CALL_CONTACT => {
                tracing::info!(agent = %ctx.agent, "radio: contact!");
                Some(TaskStatus::Complete)
            }
            TASK_BURST_FIRE => {
                ctx.set_wait_deadline(ctx.clock.deadline_after_secs(task.param));
                Some(TaskStatus::Running)
            }
            _ => None,
        }
    }

    fn run_task(&self, task: &TaskDef, ctx: &mut TaskCtx<'_>) -> Option<TaskStatus> {
        match task.action {
            TASK_BURST_FIRE => Some(if ctx.wait_elapsed() {
                TaskStatus::Complete
            } else {
                TaskStatus::Running
            }),
            _ => None,
        }
    }
}

/// Register the grunt's schedules and table; returns the archetype set and id.
fn build_grunt() -> Result<(ArchetypeSet, npc_core::ArchetypeId)> {
    let mut set = ArchetypeSet::new();

    let combat_breaks = Conditions::ENEMY_DEAD | Conditions::HEAVY_DAMAGE | Conditions::NO_AMMO;

    let wake = set.add_schedule(ScheduleDef::new(
        "GruntWakeAngry",
        vec![
            TaskDef::bare(TaskAction::STOP_MOVING),
            TaskDef::bare(TASK_CALL_CONTACT),
            TaskDef::bare(TaskAction::FACE_ENEMY),
        ],
        Conditions::empty(),
        SoundTypes::empty(),
    )?);

    let range_attack = set.add_schedule(ScheduleDef::new(
        "GruntRangeAttack",
        vec![
            TaskDef::bare(TaskAction::STOP_MOVING),
            TaskDef::bare(TaskAction::FACE_ENEMY),
            TaskDef::new(TASK_BURST_FIRE, 1.0),
        ],
        combat_breaks,
        SoundTypes::DANGER,
    )?);

    let covering_fire = set.add_schedule(ScheduleDef::new(
        "GruntCoveringFire",
        vec![
            TaskDef::bare(TaskAction::FACE_ENEMY),
            TaskDef::new(TASK_BURST_FIRE, 0.5),
        ],
        combat_breaks,
        SoundTypes::DANGER,
    )?);

    let table = ScheduleTable::builder()
        .entry(Category::WAKE_ANGRY, wake)
        .entry(Category::RANGE_ATTACK1, range_attack)
        .entry(Category::RANGE_ATTACK2, covering_fire)
        .build();
    let grunt = set.register(table, Box::new(GruntArchetype))?;
    Ok((set, grunt))
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints every schedule transition and counts them.
#[derive(Default)]
struct TransitionLog {
    transitions: usize,
}

impl SimObserver for TransitionLog {
    fn on_schedule_change(
        &mut self,
        tick: Tick,
        agent: AgentId,
        _from: Option<Category>,
        to: Option<Category>,
    ) {
        if let Some(category) = to {
            println!("  {tick:>5}  grunt-{}  -> {category}", agent.0);
            self.transitions += 1;
        }
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== skirmish — rust_npc behavior framework ===");
    println!("Grunts: {GRUNT_COUNT}  |  Ticks: {TOTAL_TICKS}  |  Seed: {SEED}");
    println!();

    // 1. Register the grunt archetype (schedules + behavior hooks).
    let (set, grunt) = build_grunt()?;

    // 2. Build the sim: four grunts, one squad, two ENGAGE + one SPECIAL slot.
    let sensors = SkirmishSensors::default();
    let world = sensors.clone();
    let config = SimConfig {
        tick_duration_ms: TICK_DURATION_MS,
        total_ticks:      TOTAL_TICKS,
        seed:             SEED,
    };
    let mut sim = SimBuilder::new(config, set, sensors)
        .agents(vec![grunt; GRUNT_COUNT])
        .build()?;

    let squad = sim.form_squad(
        SlotCapacities::new()
            .with(SlotClass::ENGAGE, 2)
            .with(SlotClass::SPECIAL, 1),
    );
    for i in 0..GRUNT_COUNT {
        sim.join_squad(AgentId(i as u32), squad)?;
    }

    let mut log = TransitionLog::default();

    // 3. Quiet patrol: a second of nothing happening.
    println!("-- patrol --");
    sim.run_ticks(10, &mut log)?;

    // 4. Contact: the intruder steps into view.
    println!("-- contact --");
    {
        let mut w = world.0.lock().expect("battlefield lock");
        w.enemy_visible = true;
        w.fresh_contact = true;
    }
    for i in 0..GRUNT_COUNT {
        sim.set_state(AgentId(i as u32), MonsterState::Combat)?;
    }
    sim.run_ticks(1, &mut log)?;
    world.0.lock().expect("battlefield lock").fresh_contact = false;

    // 5. Firefight: slots arbitrate who shoots.
    println!("-- firefight --");
    sim.run_ticks(49, &mut log)?;
    let coordinator = sim.squad(squad).expect("squad disbanded mid-fight");
    println!(
        "  [engage {}/{}, special {}/{}]",
        coordinator.occupancy(SlotClass::ENGAGE),
        coordinator.capacity(SlotClass::ENGAGE),
        coordinator.occupancy(SlotClass::SPECIAL),
        coordinator.capacity(SlotClass::SPECIAL),
    );

    // 6. Grenade: a danger sound preempts everything for two ticks.
    println!("-- grenade! --");
    world.0.lock().expect("battlefield lock").grenade_at = Some(Vec3::new(4.0, 0.0, 0.0));
    sim.run_ticks(2, &mut log)?;
    world.0.lock().expect("battlefield lock").grenade_at = None;
    sim.run_ticks(28, &mut log)?;

    // 7. The intruder goes down.
    println!("-- enemy down --");
    {
        let mut w = world.0.lock().expect("battlefield lock");
        w.enemy_visible = false;
        w.enemy_dead = true;
    }
    sim.run_ticks(30, &mut log)?;

    // 8. Summary table.
    println!();
    println!("{} transitions over {} ticks", log.transitions, sim.clock.current_tick.0);
    println!();
    println!("{:<10} {:<10} {:<28} {:<12}", "Grunt", "State", "Schedule", "Phase");
    println!("{}", "-".repeat(62));
    for i in 0..GRUNT_COUNT {
        let agent = AgentId(i as u32);
        let sched = sim.scheduler(agent).expect("agent exists");
        let category = sched
            .active_category()
            .map_or_else(|| "-".to_string(), |c| c.to_string());
        println!(
            "{:<10} {:<10} {:<28} {:<12}",
            format!("grunt-{i}"),
            format!("{:?}", sched.state()),
            category,
            format!("{:?}", sched.phase()),
        );
    }

    Ok(())
}
