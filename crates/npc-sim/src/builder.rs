//! Fluent builder for constructing a [`Sim`].

use npc_core::{ArchetypeId, SimConfig};
use npc_engine::{ArchetypeSet, MonsterState};
use npc_percept::Sensors;

use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<S>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, tick duration
/// - [`ArchetypeSet`] — registered schedule tables and behavior hooks
/// - `S: Sensors` — the sensory implementation
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                         |
/// |----------------------|---------------------------------|
/// | `.agents(v)`         | No agents (spawn after `build`) |
/// | `.initial_states(v)` | All `MonsterState::Idle`        |
///
/// # Example
///
/// ```rust,ignore
/// let mut set = ArchetypeSet::new();
/// let grunt = set.register(table, Box::new(GruntArchetype))?;
/// let mut sim = SimBuilder::new(config, set, WorldSensors::new(world))
///     .agents(vec![grunt; 4])
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<S: Sensors> {
    config:     SimConfig,
    archetypes: ArchetypeSet,
    sensors:    S,
    agents:     Vec<ArchetypeId>,
    states:     Option<Vec<MonsterState>>,
}

impl<S: Sensors> SimBuilder<S> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, archetypes: ArchetypeSet, sensors: S) -> Self {
        Self { config, archetypes, sensors, agents: Vec::new(), states: None }
    }

    /// The initial population: one archetype binding per agent, spawned in
    /// order (so `AgentId(i)` gets `v[i]`).
    pub fn agents(mut self, archetypes: Vec<ArchetypeId>) -> Self {
        self.agents = archetypes;
        self
    }

    /// Initial high-level state per agent (must match the `agents` length).
    /// If not called, everyone starts `Idle`.
    pub fn initial_states(mut self, states: Vec<MonsterState>) -> Self {
        self.states = Some(states);
        self
    }

    /// Validate inputs, spawn the initial population, and return a
    /// ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<S>> {
        let agent_count = self.agents.len();

        let states = match self.states {
            Some(s) => {
                if s.len() != agent_count {
                    return Err(SimError::AgentCountMismatch {
                        expected: agent_count,
                        got:      s.len(),
                        what:     "initial states",
                    });
                }
                s
            }
            None => vec![MonsterState::Idle; agent_count],
        };

        let mut sim = Sim::from_parts(self.config, self.archetypes, self.sensors);
        for (archetype, state) in self.agents.into_iter().zip(states) {
            let agent = sim.spawn(archetype)?;
            sim.set_state(agent, state)?;
        }
        Ok(sim)
    }
}
