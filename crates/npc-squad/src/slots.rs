//! Capacity-limited attack slots shared across one squad.
//!
//! A slot class gates how many squad members may simultaneously perform a
//! class of action ("at most one member shoots, at most two flank").  A
//! member occupies at most one unit of a given class at a time, tracked as a
//! per-member bitmask so abandoning a schedule (or dying) can release
//! everything the member held without knowing which plan took it.

use npc_core::AgentId;

use crate::{MemberRef, SquadRoster};

// ── SlotClass ─────────────────────────────────────────────────────────────────

/// A class of capacity-limited squad action.
///
/// The engine defines the two classes the stock selection logic uses;
/// applications may define more (up to [`SlotClass::MAX`]).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotClass(pub u8);

impl SlotClass {
    /// Direct-fire engagement of the current enemy.
    pub const ENGAGE: SlotClass = SlotClass(0);
    /// Indirect/secondary attack (grenades in the original).
    pub const SPECIAL: SlotClass = SlotClass(1);

    /// Number of representable slot classes (bitmask width).
    pub const MAX: usize = 8;

    #[inline]
    fn bit(self) -> u8 {
        debug_assert!((self.0 as usize) < Self::MAX);
        1 << self.0
    }
}

// ── SlotCapacities ────────────────────────────────────────────────────────────

/// Per-class occupancy limits, fixed at squad formation.
///
/// Unlisted classes have capacity 0 (nobody may occupy them).
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotCapacities([u8; SlotClass::MAX]);

impl SlotCapacities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the capacity for `class` (builder style).
    pub fn with(mut self, class: SlotClass, capacity: u8) -> Self {
        self.0[class.0 as usize] = capacity;
        self
    }

    #[inline]
    pub fn capacity(&self, class: SlotClass) -> u8 {
        self.0[class.0 as usize]
    }
}

// ── SquadCoordinator ──────────────────────────────────────────────────────────

/// Shared, per-squad slot state plus the member roster.
///
/// Mutated only through `try_occupy`/`release`/`release_all` and the roster
/// membership calls; occupancy never exceeds the configured capacity, and a
/// failed `try_occupy` means "action unavailable this tick", never an error.
#[derive(Clone, Debug)]
pub struct SquadCoordinator {
    roster: SquadRoster,
    capacities: SlotCapacities,
    /// Units currently occupied, per class.
    occupied: [u8; SlotClass::MAX],
    /// Per-member-slot bitmask of classes held; parallel to the roster arena.
    held: Vec<u8>,
}

impl SquadCoordinator {
    /// Create a coordinator for a newly formed squad.
    pub fn new(capacities: SlotCapacities) -> Self {
        Self {
            roster: SquadRoster::new(),
            capacities,
            occupied: [0; SlotClass::MAX],
            held: Vec::new(),
        }
    }

    // ── Membership (delegates to the roster, keeps `held` aligned) ────────

    pub fn add_member(&mut self, agent: AgentId) -> MemberRef {
        let member = self.roster.add(agent);
        let index = member.index as usize;
        if index >= self.held.len() {
            self.held.resize(index + 1, 0);
        }
        self.held[index] = 0;
        member
    }

    /// Remove a member, releasing everything it held.  Stale refs no-op.
    pub fn remove_member(&mut self, member: MemberRef) -> Option<AgentId> {
        if !self.roster.is_live(member) {
            return None;
        }
        self.release_all(member);
        self.roster.remove(member)
    }

    pub fn roster(&self) -> &SquadRoster {
        &self.roster
    }

    /// `true` once the last member has left; the owner should drop this
    /// coordinator.
    pub fn is_disbanded(&self) -> bool {
        self.roster.is_empty()
    }

    // ── Slot arbitration ──────────────────────────────────────────────────

    /// Occupy one unit of `class` for `member`.
    ///
    /// Succeeds iff the ref is live, the member doesn't already hold this
    /// class, and occupancy is below capacity.  Holding the class already
    /// counts as success — re-requesting a held slot is idempotent, matching
    /// how selection logic re-runs every tick.
    pub fn try_occupy(&mut self, member: MemberRef, class: SlotClass) -> bool {
        if !self.roster.is_live(member) {
            return false;
        }
        let index = member.index as usize;
        if self.held[index] & class.bit() != 0 {
            return true;
        }
        if self.occupied[class.0 as usize] >= self.capacities.capacity(class) {
            return false;
        }
        self.occupied[class.0 as usize] += 1;
        self.held[index] |= class.bit();
        true
    }

    /// Release `member`'s unit of `class`, if held.  Stale refs no-op.
    pub fn release(&mut self, member: MemberRef, class: SlotClass) {
        if !self.roster.is_live(member) {
            return;
        }
        let index = member.index as usize;
        if self.held[index] & class.bit() != 0 {
            self.held[index] &= !class.bit();
            self.occupied[class.0 as usize] -= 1;
        }
    }

    /// Release every slot `member` holds (schedule abandoned, member died).
    pub fn release_all(&mut self, member: MemberRef) {
        if !self.roster.is_live(member) {
            return;
        }
        let index = member.index as usize;
        let mut held = self.held[index];
        while held != 0 {
            let class = held.trailing_zeros() as u8;
            self.occupied[class as usize] -= 1;
            held &= held - 1;
        }
        self.held[index] = 0;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// Units of `class` currently occupied.
    #[inline]
    pub fn occupancy(&self, class: SlotClass) -> u8 {
        self.occupied[class.0 as usize]
    }

    #[inline]
    pub fn capacity(&self, class: SlotClass) -> u8 {
        self.capacities.capacity(class)
    }

    /// `true` if `member` currently holds a unit of `class`.
    pub fn holds(&self, member: MemberRef, class: SlotClass) -> bool {
        self.roster.is_live(member) && self.held[member.index as usize] & class.bit() != 0
    }
}
