//! Encounter state: who is fighting, on which side, and how they stand.
//!
//! The [`Roster`] is owned exclusively by the scheduler for the duration of an
//! encounter. Everything else reads it, or mutates a single combatant during
//! that combatant's own turn.
pub mod combatant;
pub mod common;
pub mod roster;

pub use combatant::Combatant;
pub use common::{CombatantId, Control, Team};
pub use roster::Roster;
