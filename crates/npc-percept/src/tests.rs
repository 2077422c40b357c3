//! Unit tests for npc-percept.

use npc_core::Vec3;

use crate::{Conditions, PerceptionState, SoundDescriptor, SoundTypes};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn danger_sound() -> SoundDescriptor {
    SoundDescriptor {
        types:  SoundTypes::COMBAT | SoundTypes::DANGER,
        origin: Vec3::new(10.0, 0.0, 0.0),
        volume: 384.0,
    }
}

// ── Condition queries ─────────────────────────────────────────────────────────

#[cfg(test)]
mod queries {
    use super::*;

    #[test]
    fn has_all_is_conjunction() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.set(Conditions::SEE_ENEMY);
        p.seal();

        assert!(p.has_all(Conditions::SEE_ENEMY));
        // Both bits in the mask must be set for the conjunction to hold.
        assert!(!p.has_all(Conditions::SEE_ENEMY | Conditions::CAN_MELEE_ATTACK1));
    }

    #[test]
    fn has_any_is_intersection() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.set(Conditions::LIGHT_DAMAGE);
        p.seal();

        assert!(p.has_any(Conditions::LIGHT_DAMAGE | Conditions::HEAVY_DAMAGE));
        assert!(!p.has_any(Conditions::SEE_ENEMY | Conditions::NEW_ENEMY));
    }

    #[test]
    fn empty_mask_semantics() {
        let p = PerceptionState::new();
        // Conjunction over the empty set is vacuously true; intersection with
        // the empty set is always false.
        assert!(p.has_all(Conditions::empty()));
        assert!(!p.has_any(Conditions::empty()));
    }
}

// ── Refresh window ────────────────────────────────────────────────────────────

#[cfg(test)]
mod refresh {
    use super::*;

    #[test]
    fn begin_refresh_clears_sensed_bits() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.set(Conditions::SEE_ENEMY | Conditions::HEAR_SOUND);
        p.hear(danger_sound());
        p.take_damage(5.0);
        p.seal();

        p.begin_refresh();
        assert!(!p.has_any(Conditions::SENSED));
        assert!(p.best_sound().is_none());
        assert_eq!(p.damage_taken, 0.0);
    }

    #[test]
    fn scheduler_bits_survive_refresh() {
        let mut p = PerceptionState::new();
        p.set_task_failed(true);
        p.begin_refresh();
        p.seal();

        assert!(p.has_all(Conditions::TASK_FAILED));
        p.set_task_failed(false);
        assert!(!p.has_any(Conditions::TASK_FAILED));
    }

    #[test]
    fn scheduler_bits_mutable_while_sealed() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.seal();
        // Must not trip the seal assertion.
        p.set_schedule_done(true);
        assert!(p.has_all(Conditions::SCHEDULE_DONE));
    }

    #[test]
    #[should_panic(expected = "refresh window")]
    #[cfg(debug_assertions)]
    fn sealed_mutation_panics_in_debug() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.seal();
        p.set(Conditions::SEE_ENEMY);
    }
}

// ── Sounds ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod sounds {
    use super::*;

    #[test]
    fn hear_sets_flag_and_best_sound() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.hear(danger_sound());
        p.seal();

        assert!(p.has_all(Conditions::HEAR_SOUND));
        assert_eq!(p.best_sound().unwrap().volume, 384.0);
    }

    #[test]
    fn sound_matches_by_intersection() {
        let mut p = PerceptionState::new();
        p.begin_refresh();
        p.hear(danger_sound());
        p.seal();

        assert!(p.sound_matches(SoundTypes::DANGER));
        assert!(p.sound_matches(SoundTypes::DANGER | SoundTypes::GARBAGE));
        assert!(!p.sound_matches(SoundTypes::PLAYER));
    }

    #[test]
    fn no_sound_never_matches() {
        let p = PerceptionState::new();
        assert!(!p.sound_matches(SoundTypes::all()));
    }
}
