use super::rng::{RngOracle, RollContext, compute_seed};
use crate::combat::roll_crit;
use crate::state::CombatantId;

/// Every probability check made while one action resolves.
///
/// Seeds are derived from `(battle seed, action nonce, actor, context)`, so the
/// same battle seed replays the same encounter roll for roll.
#[derive(Clone, Copy)]
pub struct ActionRolls<'a> {
    oracle: &'a dyn RngOracle,
    battle_seed: u64,
    nonce: u64,
    actor: CombatantId,
}

impl<'a> ActionRolls<'a> {
    pub fn new(oracle: &'a dyn RngOracle, battle_seed: u64, nonce: u64, actor: CombatantId) -> Self {
        Self {
            oracle,
            battle_seed,
            nonce,
            actor,
        }
    }

    fn seed(&self, context: RollContext) -> u64 {
        compute_seed(self.battle_seed, self.nonce, self.actor.0, context)
    }

    /// Percentage check: `chance >= 100` always passes, `0` never does.
    pub fn check(&self, context: RollContext, chance: u32) -> bool {
        match chance {
            0 => false,
            c if c >= 100 => true,
            c => self.oracle.roll_percent(self.seed(context)) < c,
        }
    }

    pub fn crit(&self, target: CombatantId, crit_rate: f32) -> bool {
        roll_crit(crit_rate, self.oracle, self.seed(RollContext::Crit { target: target.0 }))
    }
}

impl std::fmt::Debug for ActionRolls<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionRolls")
            .field("battle_seed", &self.battle_seed)
            .field("nonce", &self.nonce)
            .field("actor", &self.actor)
            .finish_non_exhaustive()
    }
}
