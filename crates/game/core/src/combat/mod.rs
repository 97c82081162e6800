//! Combat resolution.
//!
//! Pure functions only: the resolver maps stats, skill and crit flag to an
//! integer, and the crit roll maps a rate and a seeded oracle to a flag. HP is
//! mutated elsewhere, through [`crate::Combatant::take_damage`].

pub mod damage;

pub use damage::{MITIGATION_BASE, calculate_damage, mitigation, resolve_damage, roll_crit};
