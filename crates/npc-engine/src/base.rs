//! Built-in schedule selection and engine task handlers — the root of every
//! archetype chain.
//!
//! Selection mirrors the original base monster's priority ladder: a heard
//! danger sound preempts everything; otherwise the high-level state picks a
//! family of plans and the condition flags pick within it.  The hurt
//! response in combat keeps the original's split — roughly nine times in ten
//! a badly hurt agent breaks for cover, otherwise it flinches through the
//! pain.

use npc_percept::{Conditions, SoundTypes};
use npc_schedule::{Category, TaskAction, TaskDef};
use tracing::warn;

use crate::{MonsterState, SelectCtx, TaskCtx, TaskStatus};

// ── Selection ─────────────────────────────────────────────────────────────────

/// The built-in category choice when no archetype in the chain claims the
/// decision.
pub fn default_select(ctx: &mut SelectCtx<'_>) -> Category {
    // Dangerous sounds preempt all state-based selection.
    if ctx.percept.sound_matches(SoundTypes::DANGER) {
        return Category::TAKE_COVER_FROM_BEST_SOUND;
    }

    match ctx.state {
        MonsterState::Idle => {
            if ctx.percept.has_any(Conditions::NEW_ENEMY | Conditions::PROVOKED) {
                Category::WAKE_ANGRY
            } else {
                Category::IDLE_STAND
            }
        }

        MonsterState::Alert => {
            if ctx.percept.has_all(Conditions::HEAR_SOUND) {
                Category::ALERT_FACE
            } else {
                Category::ALERT_STAND
            }
        }

        MonsterState::Combat => combat_select(ctx),

        // Scripted and prone agents hold still unless a script archetype
        // overrides; the plans themselves come from the script layer.
        MonsterState::Script | MonsterState::Prone => Category::IDLE_STAND,

        MonsterState::Dead => Category::DIE,
    }
}

fn combat_select(ctx: &mut SelectCtx<'_>) -> Category {
    let percept = ctx.percept;

    if percept.has_all(Conditions::ENEMY_DEAD) {
        return Category::VICTORY_DANCE;
    }
    if percept.has_all(Conditions::NEW_ENEMY) {
        return Category::WAKE_ANGRY;
    }
    if percept.has_all(Conditions::HEAVY_DAMAGE) {
        // Hurt: mostly run for cover, occasionally just flinch.
        return if ctx.rng.roll(99) < 90 {
            Category::TAKE_COVER_FROM_ENEMY
        } else {
            Category::SMALL_FLINCH
        };
    }
    if percept.has_all(Conditions::CAN_MELEE_ATTACK1) {
        return Category::MELEE_ATTACK1;
    }
    if percept.has_all(Conditions::CAN_RANGE_ATTACK1) {
        return Category::RANGE_ATTACK1;
    }
    if percept.has_all(Conditions::ENEMY_OCCLUDED) {
        return Category::STANDOFF;
    }
    Category::CHASE_ENEMY
}

// ── Engine task handlers ──────────────────────────────────────────────────────

/// Start one of the engine-reserved tasks.
///
/// Instantaneous tasks report `Complete` here and are never `run`; timed
/// tasks arm the wait deadline and report `Running`.
pub fn start_engine_task(task: &TaskDef, ctx: &mut TaskCtx<'_>) -> TaskStatus {
    match task.action {
        TaskAction::WAIT => {
            ctx.set_wait_deadline(ctx.clock.deadline_after_secs(task.param));
            TaskStatus::Running
        }
        TaskAction::WAIT_RANDOM => {
            let max = task.param.max(0.1);
            let secs = ctx.rng.gen_range(0.1..=max);
            ctx.set_wait_deadline(ctx.clock.deadline_after_secs(secs));
            TaskStatus::Running
        }
        TaskAction::SET_FAIL_CATEGORY => {
            ctx.set_fail_category(task.param_as_category());
            TaskStatus::Complete
        }
        TaskAction::CLEAR_FAIL_CATEGORY => {
            ctx.clear_fail_category();
            TaskStatus::Complete
        }
        // Motor/orientation side effects are archetype business; the engine
        // fallbacks are inert and succeed so defaulted plans still flow.
        TaskAction::STOP_MOVING | TaskAction::FACE_ENEMY | TaskAction::REMEMBER_ENEMY_POS => {
            TaskStatus::Complete
        }
        TaskAction::FACE_BEST_SOUND => {
            if ctx.percept.best_sound().is_some() {
                TaskStatus::Complete
            } else {
                TaskStatus::Failed
            }
        }
        unknown => {
            warn!(agent = %ctx.agent, action = unknown.0, "no handler for task action");
            TaskStatus::Failed
        }
    }
}

/// Step one of the engine-reserved tasks.
pub fn run_engine_task(task: &TaskDef, ctx: &mut TaskCtx<'_>) -> TaskStatus {
    match task.action {
        TaskAction::WAIT | TaskAction::WAIT_RANDOM => {
            if ctx.wait_elapsed() {
                TaskStatus::Complete
            } else {
                TaskStatus::Running
            }
        }
        // Anything else either completed at start or belongs to an
        // archetype; completing keeps a misconfigured plan moving.
        _ => TaskStatus::Complete,
    }
}
