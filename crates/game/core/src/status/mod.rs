//! Status effects: catalog definitions, live instances, and the per-combatant
//! ledger that stacks, ticks and expires them.
//!
//! # Lifecycle
//!
//! ```text
//! apply ──► (no instance) ──► insert, sort by ui_priority ──► EffectAdded
//!       └─► (instance)    ──► max(duration), min(cap, stacks+n) ──► EffectUpdated
//! tick(PerTurnEnd) ──► dot pass ──► duration pass ──► EffectUpdated / EffectRemoved
//! ```
mod def;
mod instance;
mod ledger;

pub use def::{StatusEffectDef, StatusType, TickTiming};
pub use instance::StatusEffectInstance;
pub use ledger::{ApplyOutcome, DotHit, StatusLedger};
