//! Unit tests for npc-core.

use crate::{AgentId, AgentRng, ScheduleId, SimClock, SimConfig, Tick, Vec3};

// ── Tick / SimClock ───────────────────────────────────────────────────────────

#[cfg(test)]
mod time {
    use super::*;

    #[test]
    fn tick_arithmetic() {
        assert_eq!(Tick(5).offset(3), Tick(8));
        assert_eq!(Tick(8).since(Tick(5)), 3);
        assert_eq!(Tick(5) + 2, Tick(7));
        assert_eq!(Tick(7) - Tick(5), 2);
    }

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new(100);
        assert_eq!(clock.current_tick, Tick::ZERO);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.elapsed_ms(), 200);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(100); // 10 ticks per second
        assert_eq!(clock.ticks_for_secs(1.0), 10);
        assert_eq!(clock.ticks_for_secs(0.25), 3); // 250 ms → 3 ticks
        assert_eq!(clock.ticks_for_secs(0.01), 1); // sub-tick wait still waits one tick
        assert_eq!(clock.ticks_for_secs(0.0), 1);  // never lands on the current tick
    }

    #[test]
    fn deadline_is_relative_to_now() {
        let mut clock = SimClock::new(100);
        clock.advance();
        clock.advance();
        assert_eq!(clock.deadline_after_secs(1.0), Tick(12));
    }

    #[test]
    fn config_end_tick() {
        let config = SimConfig { total_ticks: 50, ..Default::default() };
        assert_eq!(config.end_tick(), Tick(50));
        assert_eq!(config.make_clock().tick_duration_ms, 100);
    }
}

// ── IDs ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ids {
    use super::*;

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert_eq!(ScheduleId::default(), ScheduleId::INVALID);
        assert_ne!(AgentId(0), AgentId::INVALID);
    }

    #[test]
    fn index_round_trip() {
        let id = AgentId(7);
        assert_eq!(id.index(), 7);
        assert_eq!(AgentId::try_from(7usize).unwrap(), id);
    }
}

// ── RNG ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod rng {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = AgentRng::new(42, AgentId(3));
        let mut b = AgentRng::new(42, AgentId(3));
        for _ in 0..16 {
            assert_eq!(a.gen_range(0..1000), b.gen_range(0..1000));
        }
    }

    #[test]
    fn different_agents_diverge() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let va: Vec<u32> = (0..8).map(|_| a.gen_range(0..u32::MAX)).collect();
        let vb: Vec<u32> = (0..8).map(|_| b.gen_range(0..u32::MAX)).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn roll_is_inclusive() {
        let mut rng = AgentRng::new(1, AgentId(0));
        for _ in 0..256 {
            let v = rng.roll(9);
            assert!(v <= 9);
        }
    }
}

// ── Vec3 ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pos {
    use super::*;

    #[test]
    fn distance() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance_sq(b), 25.0);
        assert_eq!(a.distance(b), 5.0);
    }
}
