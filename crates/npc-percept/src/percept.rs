//! Per-agent perception snapshot: `SoundDescriptor` and `PerceptionState`.

use npc_core::Vec3;

use crate::{Conditions, SoundTypes};

// ── SoundDescriptor ───────────────────────────────────────────────────────────

/// The single "best" sound an agent heard this tick.
///
/// The sensory subsystem ranks all audible sounds and reports at most one per
/// tick; ranking policy (loudest, nearest, most dangerous) belongs to the
/// sensors, not to the scheduler.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SoundDescriptor {
    /// Classification bits (a sound may carry several).
    pub types: SoundTypes,
    /// World position of the emitter.
    pub origin: Vec3,
    /// Loudness in world units of audible radius.
    pub volume: f32,
}

// ── PerceptionState ───────────────────────────────────────────────────────────

/// Per-agent snapshot of currently-true condition flags plus auxiliary
/// sensed data.  Owned by exactly one agent, rebuilt every tick.
///
/// # Mutation discipline
///
/// Writable only between [`begin_refresh`][Self::begin_refresh] and
/// [`seal`][Self::seal].  The scheduler reads it for the remainder of the
/// tick; the two scheduler-owned bits (`TASK_FAILED`, `SCHEDULE_DONE`) are
/// set through dedicated methods that bypass the seal.
#[derive(Clone, Debug, Default)]
pub struct PerceptionState {
    conditions: Conditions,
    /// Best heard sound this tick, if any.
    best_sound: Option<SoundDescriptor>,
    /// Where the enemy was last actually seen.
    pub enemy_last_seen: Option<Vec3>,
    /// Damage accumulated since the previous tick (drives LIGHT/HEAVY_DAMAGE).
    pub damage_taken: f32,
    /// `false` during the sensory refresh window, `true` the rest of the tick.
    sealed: bool,
}

impl PerceptionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Refresh window ────────────────────────────────────────────────────

    /// Open the per-tick refresh window: clear all sensed conditions and
    /// transient data, keep scheduler-owned bits, and allow mutation.
    pub fn begin_refresh(&mut self) {
        self.conditions &= !Conditions::SENSED;
        self.best_sound = None;
        self.damage_taken = 0.0;
        self.sealed = false;
    }

    /// Close the refresh window.  Mutation after this point is a programming
    /// error until the next `begin_refresh`.
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    #[inline]
    fn assert_unsealed(&self) {
        debug_assert!(
            !self.sealed,
            "PerceptionState mutated outside the sensory refresh window"
        );
    }

    // ── Condition mutation (refresh window only) ──────────────────────────

    pub fn set(&mut self, flags: Conditions) {
        self.assert_unsealed();
        self.conditions |= flags;
    }

    pub fn clear(&mut self, flags: Conditions) {
        self.assert_unsealed();
        self.conditions &= !flags;
    }

    /// Record the best heard sound and set `HEAR_SOUND`.
    pub fn hear(&mut self, sound: SoundDescriptor) {
        self.assert_unsealed();
        self.best_sound = Some(sound);
        self.conditions |= Conditions::HEAR_SOUND;
    }

    /// Fold damage into the snapshot; thresholds for LIGHT/HEAVY_DAMAGE are
    /// the sensors' business, so only the raw amount is accumulated here.
    pub fn take_damage(&mut self, amount: f32) {
        self.assert_unsealed();
        self.damage_taken += amount;
    }

    // ── Scheduler-owned bits (bypass the seal) ────────────────────────────

    /// Set or clear `TASK_FAILED`.  Called by the scheduler, any time.
    pub fn set_task_failed(&mut self, failed: bool) {
        if failed {
            self.conditions |= Conditions::TASK_FAILED;
        } else {
            self.conditions &= !Conditions::TASK_FAILED;
        }
    }

    /// Set or clear `SCHEDULE_DONE`.  Called by the scheduler, any time.
    pub fn set_schedule_done(&mut self, done: bool) {
        if done {
            self.conditions |= Conditions::SCHEDULE_DONE;
        } else {
            self.conditions &= !Conditions::SCHEDULE_DONE;
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The conjunction primitive: `true` iff *every* bit in `mask` is set.
    #[inline]
    pub fn has_all(&self, mask: Conditions) -> bool {
        self.conditions.contains(mask)
    }

    /// Intersection test: `true` iff *any* bit in `mask` is set.  This is
    /// what schedule interrupt masks are tested with.
    #[inline]
    pub fn has_any(&self, mask: Conditions) -> bool {
        self.conditions.intersects(mask)
    }

    /// The raw condition bits (read-only).
    #[inline]
    pub fn conditions(&self) -> Conditions {
        self.conditions
    }

    /// Best heard sound this tick, if any.
    #[inline]
    pub fn best_sound(&self) -> Option<&SoundDescriptor> {
        self.best_sound.as_ref()
    }

    /// `true` iff the best heard sound intersects `mask`.
    #[inline]
    pub fn sound_matches(&self, mask: SoundTypes) -> bool {
        self.best_sound
            .as_ref()
            .is_some_and(|s| s.types.intersects(mask))
    }
}
