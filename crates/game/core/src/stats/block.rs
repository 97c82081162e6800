//! Numeric combat profile.

use core::ops::{Add, AddAssign};

/// Numeric profile of a combatant.
///
/// Integer stats are non-negative in authored data; rates are fractions in
/// `[0, 1]` (`crit_dmg` is the *extra* multiplier on a crit, so `0.5` means
/// ×1.5). Combination is component-wise addition and never clamps: clamping HP
/// to `[0, max]` is the owner's job.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBlock {
    pub hp: i32,
    pub atk: i32,
    pub def: i32,
    pub spd: i32,
    pub crit_rate: f32,
    pub crit_dmg: f32,
    pub resist: f32,
    pub accuracy: f32,
}

impl StatBlock {
    /// Integer core of a stat block; rates start at zero.
    pub const fn new(hp: i32, atk: i32, def: i32, spd: i32) -> Self {
        Self {
            hp,
            atk,
            def,
            spd,
            crit_rate: 0.0,
            crit_dmg: 0.0,
            resist: 0.0,
            accuracy: 0.0,
        }
    }

    pub fn with_crit(mut self, crit_rate: f32, crit_dmg: f32) -> Self {
        self.crit_rate = crit_rate;
        self.crit_dmg = crit_dmg;
        self
    }

    pub fn with_resist(mut self, resist: f32, accuracy: f32) -> Self {
        self.resist = resist;
        self.accuracy = accuracy;
        self
    }

    /// Speed accessor used by the turn gauges.
    #[inline]
    pub fn speed(&self) -> i32 {
        self.spd
    }
}

impl Add for StatBlock {
    type Output = StatBlock;

    fn add(self, rhs: StatBlock) -> StatBlock {
        StatBlock {
            hp: self.hp + rhs.hp,
            atk: self.atk + rhs.atk,
            def: self.def + rhs.def,
            spd: self.spd + rhs.spd,
            crit_rate: self.crit_rate + rhs.crit_rate,
            crit_dmg: self.crit_dmg + rhs.crit_dmg,
            resist: self.resist + rhs.resist,
            accuracy: self.accuracy + rhs.accuracy,
        }
    }
}

impl AddAssign for StatBlock {
    fn add_assign(&mut self, rhs: StatBlock) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn addition_is_component_wise() {
        let base = StatBlock::new(1000, 120, 80, 100).with_crit(0.15, 0.5);
        let gear = StatBlock::new(200, 30, -10, 5).with_resist(0.1, 0.2);

        let total = base + gear;

        assert_eq!(total.hp, 1200);
        assert_eq!(total.atk, 150);
        assert_eq!(total.def, 70);
        assert_eq!(total.spd, 105);
        assert_eq!(total.crit_rate, 0.15);
        assert_eq!(total.crit_dmg, 0.5);
        assert_eq!(total.resist, 0.1);
        assert_eq!(total.accuracy, 0.2);
    }

    #[test]
    fn default_is_additive_identity() {
        let block = StatBlock::new(10, 20, 30, 40).with_crit(0.1, 0.2);
        let mut acc = StatBlock::default();
        acc += block;
        assert_eq!(acc, block);
    }
}
