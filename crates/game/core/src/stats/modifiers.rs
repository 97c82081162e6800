//! Status-derived stat scaling.

use super::block::StatBlock;

/// Multipliers computed from live status effects.
///
/// Each factor is `1 + Σ(stacks × modPercent)` floored at zero, so a heavy
/// debuff can zero a stat but never flip its sign.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatMultipliers {
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
}

impl StatMultipliers {
    pub const IDENTITY: Self = Self {
        attack: 1.0,
        defense: 1.0,
        speed: 1.0,
    };

    /// Scale ATK, DEF and SPD of `total`; HP and rates pass through unchanged.
    pub fn apply(&self, total: &StatBlock) -> StatBlock {
        StatBlock {
            atk: scale(total.atk, self.attack),
            def: scale(total.def, self.defense),
            spd: scale(total.spd, self.speed),
            ..*total
        }
    }
}

impl Default for StatMultipliers {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn scale(value: i32, factor: f32) -> i32 {
    (value as f32 * factor).round() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_leaves_stats_untouched() {
        let total = StatBlock::new(500, 100, 50, 90).with_crit(0.2, 0.5);
        assert_eq!(StatMultipliers::IDENTITY.apply(&total), total);
    }

    #[test]
    fn scales_only_combat_stats() {
        let total = StatBlock::new(500, 100, 50, 90);
        let mods = StatMultipliers {
            attack: 1.2,
            defense: 0.5,
            speed: 0.0,
        };

        let effective = mods.apply(&total);

        assert_eq!(effective.hp, 500);
        assert_eq!(effective.atk, 120);
        assert_eq!(effective.def, 25);
        assert_eq!(effective.spd, 0);
    }
}
