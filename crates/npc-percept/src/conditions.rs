//! Condition and sound-type bitmasks.
//!
//! Each condition is a named boolean predicate about perceived world state,
//! represented as one bit in a fixed-width mask so schedule interrupt masks
//! can be tested with a single AND.  The set below is the engine-generic
//! vocabulary; the meaning of each bit is fixed, but which bits a given
//! archetype sets or tests is up to its sensors and selection logic.

use bitflags::bitflags;

bitflags! {
    /// Perceived-world condition flags, recomputed once per tick.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct Conditions: u32 {
        /// An enemy is currently visible.
        const SEE_ENEMY          = 1 << 0;
        /// The current enemy exists but is hidden behind cover.
        const ENEMY_OCCLUDED     = 1 << 1;
        /// The current enemy died this tick.
        const ENEMY_DEAD         = 1 << 2;
        /// The current enemy is beyond effective range.
        const ENEMY_TOO_FAR      = 1 << 3;
        /// The current enemy is looking at this agent.
        const ENEMY_FACING_ME    = 1 << 4;
        /// An enemy was acquired this tick (had none before).
        const NEW_ENEMY          = 1 << 5;
        /// Took minor damage since the last tick.
        const LIGHT_DAMAGE       = 1 << 6;
        /// Took major damage since the last tick.
        const HEAVY_DAMAGE       = 1 << 7;
        /// Primary ranged attack is possible right now.
        const CAN_RANGE_ATTACK1  = 1 << 8;
        /// Secondary ranged attack is possible right now.
        const CAN_RANGE_ATTACK2  = 1 << 9;
        /// Primary melee attack is possible right now.
        const CAN_MELEE_ATTACK1  = 1 << 10;
        /// Secondary melee attack is possible right now.
        const CAN_MELEE_ATTACK2  = 1 << 11;
        /// Weapon is empty; a reload is needed before ranged attacks.
        const NO_AMMO            = 1 << 12;
        /// A sound of interest was heard this tick (see best sound).
        const HEAR_SOUND         = 1 << 13;
        /// Was deliberately provoked (shot at, pushed) without seeing an enemy.
        const PROVOKED           = 1 << 14;
        /// A friendly player is pushing against this agent.
        const CLIENT_PUSH        = 1 << 15;
        /// The most recent task reported failure.
        const TASK_FAILED        = 1 << 16;
        /// The active schedule ran to natural completion last tick.
        const SCHEDULE_DONE      = 1 << 17;
    }
}

impl Conditions {
    /// The flags that are transient by definition and cleared at the start of
    /// every refresh window.  `TASK_FAILED`/`SCHEDULE_DONE` are owned by the
    /// scheduler and survive the sensory refresh.
    pub const SENSED: Conditions = Conditions::from_bits_truncate(
        Conditions::all().bits()
            & !Conditions::TASK_FAILED.bits()
            & !Conditions::SCHEDULE_DONE.bits(),
    );
}

bitflags! {
    /// Classification bits carried by a heard sound.
    ///
    /// A single sound may carry several types (a grenade bounce is both
    /// COMBAT and DANGER).  Schedule sound-interrupt masks are tested by
    /// intersection against these bits.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
    pub struct SoundTypes: u16 {
        /// Gunfire, explosions, impacts.
        const COMBAT  = 1 << 0;
        /// Ambient world noise (doors, machinery, breaking glass).
        const WORLD   = 1 << 1;
        /// Imminent threat at the sound origin — incoming grenade, falling
        /// object.  Preempts normal schedule selection.
        const DANGER  = 1 << 2;
        /// Player footsteps and weapon handling.
        const PLAYER  = 1 << 3;
        /// A dead body (smellable-style attractor in the original).
        const CARCASS = 1 << 4;
        /// Food/garbage attractor.
        const GARBAGE = 1 << 5;
    }
}
