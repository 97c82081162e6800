//! Injectable sources of nondeterminism.
//!
//! The core never reads a clock or a thread-local RNG: every probability
//! check goes through an [`RngOracle`] with an explicit seed.
mod rng;
mod rolls;

pub use rng::{FixedRoll, PcgRng, RngOracle, RollContext, compute_seed};
pub use rolls::ActionRolls;
