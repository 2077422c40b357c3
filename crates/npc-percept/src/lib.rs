//! `npc-percept` — perceived world state for the `rust_npc` framework.
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`conditions`] | `Conditions` and `SoundTypes` bitflags                 |
//! | [`percept`]    | `SoundDescriptor`, `PerceptionState`                   |
//! | [`sensors`]    | `Sensors` trait, `NullSensors`                         |
//!
//! # Refresh window
//!
//! A `PerceptionState` is valid for exactly one tick.  The simulation loop
//! calls `begin_refresh` (which clears the transient conditions and unseals
//! the state), lets the sensory subsystem write into it, then calls `seal`.
//! From that point until the next tick the state is read-only: mutating a
//! sealed state is a programming error, caught by `debug_assert!` in debug
//! builds and ignored-but-harmless in release.

pub mod conditions;
pub mod percept;
pub mod sensors;

#[cfg(test)]
mod tests;

pub use conditions::{Conditions, SoundTypes};
pub use percept::{PerceptionState, SoundDescriptor};
pub use sensors::{NullSensors, Sensors};
