//! Generational member arena for one squad.
//!
//! Members reference each other (and the coordinator references members)
//! through `MemberRef` — an index plus a generation counter.  A slot whose
//! member died may be reused for a new member with a bumped generation, so a
//! stale `MemberRef` held across ticks is *detected* (lookup returns `None`)
//! rather than silently pointing at the wrong agent.  This replaces the
//! original's weak cross-pointers between squad members.

use npc_core::AgentId;

/// A liveness-checked reference to a squad member.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MemberRef {
    pub index: u32,
    pub generation: u32,
}

#[derive(Clone, Debug)]
struct MemberSlot {
    agent: AgentId,
    generation: u32,
    alive: bool,
}

/// The members of one squad, with leader tracking.
///
/// Iteration and leader-promotion order is ascending slot index, which the
/// simulation keeps aligned with its deterministic agent order.
#[derive(Clone, Debug, Default)]
pub struct SquadRoster {
    slots: Vec<MemberSlot>,
    leader: Option<MemberRef>,
    live_count: usize,
}

impl SquadRoster {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Membership ────────────────────────────────────────────────────────

    /// Add `agent` to the squad, reusing a vacated slot if one exists.
    /// The first member added becomes the leader.
    pub fn add(&mut self, agent: AgentId) -> MemberRef {
        let member = match self.slots.iter_mut().position(|s| !s.alive) {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.generation += 1;
                slot.agent = agent;
                slot.alive = true;
                MemberRef { index: index as u32, generation: slot.generation }
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(MemberSlot { agent, generation: 0, alive: true });
                MemberRef { index, generation: 0 }
            }
        };
        self.live_count += 1;
        if self.leader.is_none() {
            self.leader = Some(member);
        }
        member
    }

    /// Remove a member (death/despawn).  Stale refs are a no-op.
    ///
    /// If the removed member was the leader, leadership passes to the live
    /// member with the lowest slot index; removing the last member leaves the
    /// roster empty (the squad disbands).
    pub fn remove(&mut self, member: MemberRef) -> Option<AgentId> {
        let slot = self.slot_mut(member)?;
        slot.alive = false;
        let agent = slot.agent;
        self.live_count -= 1;

        if self.leader == Some(member) {
            self.leader = self.first_live();
        }
        Some(agent)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The agent behind `member`, or `None` if the ref is stale.
    pub fn get(&self, member: MemberRef) -> Option<AgentId> {
        self.slot(member).map(|s| s.agent)
    }

    /// `true` if `member` still refers to a live squad member.
    pub fn is_live(&self, member: MemberRef) -> bool {
        self.slot(member).is_some()
    }

    /// The member ref for `agent`, if it is in this squad.
    pub fn find(&self, agent: AgentId) -> Option<MemberRef> {
        self.slots.iter().enumerate().find_map(|(i, s)| {
            (s.alive && s.agent == agent)
                .then_some(MemberRef { index: i as u32, generation: s.generation })
        })
    }

    /// Current leader, if the squad is non-empty.
    pub fn leader(&self) -> Option<MemberRef> {
        self.leader
    }

    pub fn is_leader(&self, member: MemberRef) -> bool {
        self.leader == Some(member) && self.is_live(member)
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// `true` once the last member has left — the squad should disband.
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Live members in ascending slot-index order.
    pub fn members(&self) -> impl Iterator<Item = (MemberRef, AgentId)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, s)| {
            s.alive.then_some((
                MemberRef { index: i as u32, generation: s.generation },
                s.agent,
            ))
        })
    }

    // ── Private helpers ───────────────────────────────────────────────────

    fn slot(&self, member: MemberRef) -> Option<&MemberSlot> {
        self.slots
            .get(member.index as usize)
            .filter(|s| s.alive && s.generation == member.generation)
    }

    fn slot_mut(&mut self, member: MemberRef) -> Option<&mut MemberSlot> {
        self.slots
            .get_mut(member.index as usize)
            .filter(|s| s.alive && s.generation == member.generation)
    }

    fn first_live(&self) -> Option<MemberRef> {
        self.slots.iter().enumerate().find_map(|(i, s)| {
            s.alive
                .then_some(MemberRef { index: i as u32, generation: s.generation })
        })
    }
}
