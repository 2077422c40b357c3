//! The `Sim` struct and its tick loop.

use npc_core::{AgentId, AgentRng, ArchetypeId, SimClock, SimConfig, SquadId, Tick};
use npc_engine::{AgentScheduler, ArchetypeSet, MonsterState};
use npc_percept::{PerceptionState, Sensors};
use npc_squad::{MemberRef, SlotCapacities, SquadCoordinator};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::{SimError, SimObserver, SimResult};

/// The main simulation runner.
///
/// `Sim<S>` owns all per-agent state in parallel arrays indexed by `AgentId`
/// and drives the three-phase tick loop:
///
/// 1. **Refresh**: open each live agent's perception window, call
///    [`Sensors::refresh`], seal.
/// 2. **Schedule**: step each live agent's [`AgentScheduler`] in ascending
///    `AgentId` order.  Sequential, deterministic: squad slot arbitration is
///    first-come within this order.
/// 3. **Observe**: report schedule changes and tick boundaries to the
///    [`SimObserver`].
///
/// Spawn/despawn and squad membership changes happen between ticks, through
/// the methods on this type.  Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<S: Sensors> {
    /// Global configuration (total ticks, seed, tick duration).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: SimClock,

    /// Schedule tables and behavior hooks, shared by all agents.
    pub archetypes: ArchetypeSet,

    /// The sensory subsystem.  Called once per live agent per tick.
    pub sensors: S,

    // Per-agent parallel arrays.  Indices are never reused: a despawned
    // agent's slot stays allocated but dead, so `AgentId`s stay unambiguous
    // for the whole run.
    schedulers: Vec<AgentScheduler>,
    percepts: Vec<PerceptionState>,
    rngs: Vec<AgentRng>,
    alive: Vec<bool>,
    membership: Vec<Option<(SquadId, MemberRef)>>,

    squads: FxHashMap<SquadId, SquadCoordinator>,
    next_squad: u32,
}

impl<S: Sensors> Sim<S> {
    pub(crate) fn from_parts(config: SimConfig, archetypes: ArchetypeSet, sensors: S) -> Self {
        Self {
            clock: config.make_clock(),
            config,
            archetypes,
            sensors,
            schedulers: Vec::new(),
            percepts: Vec::new(),
            rngs: Vec::new(),
            alive: Vec::new(),
            membership: Vec::new(),
            squads: FxHashMap::default(),
            next_squad: 0,
        }
    }

    // ── Population ────────────────────────────────────────────────────────

    /// Spawn an agent of `archetype`.  Its RNG is seeded deterministically
    /// from the run seed and the new id, so later spawns never perturb
    /// earlier agents' random streams.
    pub fn spawn(&mut self, archetype: ArchetypeId) -> SimResult<AgentId> {
        // Reject ids the archetype set never produced.
        self.archetypes.registry().table(archetype)?;

        let agent = AgentId(self.schedulers.len() as u32);
        self.schedulers.push(AgentScheduler::new(agent, archetype));
        self.percepts.push(PerceptionState::new());
        self.rngs.push(AgentRng::new(self.config.seed, agent));
        self.alive.push(true);
        self.membership.push(None);
        debug!(%agent, %archetype, "agent spawned");
        Ok(agent)
    }

    /// Remove an agent from the simulation.  Its squad slots are released,
    /// its membership dropped (promoting a new leader if it led), and its
    /// squad disbanded if it was the last member.
    pub fn despawn(&mut self, agent: AgentId) -> SimResult<()> {
        let index = self.check_agent(agent)?;
        self.leave_squad(agent)?;
        self.alive[index] = false;
        debug!(%agent, "agent despawned");
        Ok(())
    }

    pub fn is_alive(&self, agent: AgentId) -> bool {
        self.alive.get(agent.index()).copied().unwrap_or(false)
    }

    /// Number of live agents.
    pub fn live_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    // ── Squads ────────────────────────────────────────────────────────────

    /// Form an empty squad with the given slot capacities.
    pub fn form_squad(&mut self, capacities: SlotCapacities) -> SquadId {
        let id = SquadId(self.next_squad);
        self.next_squad += 1;
        self.squads.insert(id, SquadCoordinator::new(capacities));
        id
    }

    /// Add `agent` to `squad`, leaving its previous squad first if any.
    pub fn join_squad(&mut self, agent: AgentId, squad: SquadId) -> SimResult<()> {
        let index = self.check_agent(agent)?;
        if !self.squads.contains_key(&squad) {
            return Err(SimError::UnknownSquad(squad));
        }
        self.leave_squad(agent)?;
        // Checked present above; leave_squad cannot remove it (the agent was
        // not a member).
        let coordinator = self.squads.get_mut(&squad).ok_or(SimError::UnknownSquad(squad))?;
        let member = coordinator.add_member(agent);
        self.membership[index] = Some((squad, member));
        Ok(())
    }

    /// Remove `agent` from its squad, if it is in one.  Disbands the squad
    /// when the last member leaves.
    pub fn leave_squad(&mut self, agent: AgentId) -> SimResult<()> {
        let index = self.check_agent(agent)?;
        if let Some((squad, member)) = self.membership[index].take() {
            if let Some(coordinator) = self.squads.get_mut(&squad) {
                coordinator.remove_member(member);
                if coordinator.is_disbanded() {
                    self.squads.remove(&squad);
                    debug!(%squad, "squad disbanded");
                }
            }
        }
        Ok(())
    }

    pub fn squad(&self, squad: SquadId) -> Option<&SquadCoordinator> {
        self.squads.get(&squad)
    }

    /// The squad `agent` currently belongs to.
    pub fn squad_of(&self, agent: AgentId) -> Option<SquadId> {
        self.membership
            .get(agent.index())
            .and_then(|m| m.map(|(squad, _)| squad))
    }

    // ── Per-agent access ──────────────────────────────────────────────────

    pub fn scheduler(&self, agent: AgentId) -> Option<&AgentScheduler> {
        self.schedulers.get(agent.index())
    }

    pub fn percept(&self, agent: AgentId) -> Option<&PerceptionState> {
        self.percepts.get(agent.index())
    }

    /// Set an agent's high-level state.  State transitions are the
    /// application's business (its combat/damage layer decides when an agent
    /// is alerted or in combat); the engine only reads the state.
    pub fn set_state(&mut self, agent: AgentId, state: MonsterState) -> SimResult<()> {
        let index = self.check_agent(agent)?;
        self.schedulers[index].set_state(state);
        Ok(())
    }

    fn check_agent(&self, agent: AgentId) -> SimResult<usize> {
        let index = agent.index();
        if index >= self.schedulers.len() || !self.alive[index] {
            return Err(SimError::UnknownAgent(agent));
        }
        Ok(index)
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`, calling observer
    /// hooks at every boundary.  Use [`NoopObserver`][crate::NoopObserver]
    /// if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        self.process_tick(now, observer);
        observer.on_tick_end(now, self.live_count());
        self.clock.advance();
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick<O: SimObserver>(&mut self, now: Tick, observer: &mut O) {
        for index in 0..self.schedulers.len() {
            if !self.alive[index] {
                continue;
            }
            let agent = AgentId(index as u32);

            // ── Phase 1: sensory refresh ──────────────────────────────────
            let percept = &mut self.percepts[index];
            percept.begin_refresh();
            self.sensors.refresh(agent, now, percept);
            percept.seal();

            // ── Phase 2: scheduling ───────────────────────────────────────
            let before = self.schedulers[index].active_category();
            let squad = match self.membership[index] {
                Some((squad, member)) => {
                    self.squads.get_mut(&squad).map(|coordinator| (coordinator, member))
                }
                None => None,
            };
            self.schedulers[index].tick(
                &self.archetypes,
                &self.clock,
                percept,
                &mut self.rngs[index],
                squad,
            );

            // ── Phase 3: observation ──────────────────────────────────────
            let after = self.schedulers[index].active_category();
            if before != after {
                observer.on_schedule_change(now, agent, before, after);
            }
        }
    }
}
