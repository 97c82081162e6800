//! Stat system.
//!
//! ```text
//! [ StatBlock: base ]  +  [ StatBlock: equipment / bonuses ]
//!                      ↓
//!             [ StatBlock: total ]   (HP here is the live value)
//!                      ↓ × StatMultipliers (from the status ledger)
//!             [ StatBlock: effective ]  → damage resolver, gauge advance
//! ```
//!
//! Totals are plain additive combinations; status effects never rewrite the
//! stored totals, they only scale the effective view taken at use time.

pub mod block;
pub mod modifiers;

pub use block::StatBlock;
pub use modifiers::StatMultipliers;
