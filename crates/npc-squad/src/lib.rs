//! `npc-squad` — squad membership and shared attack-slot arbitration.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`roster`] | `SquadRoster` (generational member arena), `MemberRef`    |
//! | [`slots`]  | `SlotClass`, `SlotCapacities`, `SquadCoordinator`         |
//!
//! # Concurrency model
//!
//! None needed.  The simulation steps agents sequentially in a fixed order,
//! so `try_occupy` calls never race: within one tick, the first member
//! processed wins the last free unit of a slot class and later callers fail
//! until a release.  Turn order *is* the lock.

pub mod roster;
pub mod slots;


pub use roster::{MemberRef, SquadRoster};
pub use slots::{SlotCapacities, SlotClass, SquadCoordinator};
