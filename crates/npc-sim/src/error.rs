use npc_core::{AgentId, SquadId};
use npc_schedule::ScheduleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error("{what} length {got} does not match agent count {expected}")]
    AgentCountMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("no agent with id {0}")]
    UnknownAgent(AgentId),

    #[error("no squad with id {0}")]
    UnknownSquad(SquadId),

    #[error("schedule registration error: {0}")]
    Schedule(#[from] ScheduleError),
}

pub type SimResult<T> = Result<T, SimError>;
