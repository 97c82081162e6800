//! Damage calculation.

use crate::env::RngOracle;
use crate::skill::{SkillDef, SkillTags};
use crate::stats::StatBlock;

/// DEF scale of the mitigation curve.
pub const MITIGATION_BASE: f32 = 1000.0;

/// Fraction of damage that gets through `defense`.
///
/// ```text
/// mitigation = 1000 / (1000 + max(0, DEF))
/// ```
#[inline]
pub fn mitigation(defense: i32) -> f32 {
    MITIGATION_BASE / (MITIGATION_BASE + defense.max(0) as f32)
}

/// Core formula over raw numbers.
///
/// ```text
/// raw    = ATK * power + flat
/// damage = round(max(0, raw * crit_multiplier * mitigation(DEF)))
/// ```
pub fn calculate_damage(attack: i32, defense: i32, power: f32, flat: i32, crit_multiplier: f32) -> i32 {
    let raw = attack as f32 * power + flat as f32;
    let damage = (raw * crit_multiplier * mitigation(defense)).max(0.0);
    damage.round() as i32
}

/// Damage `skill` deals from `attacker` to `defender`.
///
/// Deterministic for fixed inputs; the crit flag is rolled by the caller.
/// `IGNORE_DEF` skills resolve as if the defender had no DEF.
pub fn resolve_damage(attacker: &StatBlock, defender: &StatBlock, skill: &SkillDef, crit: bool) -> i32 {
    let crit_multiplier = if crit { 1.0 + attacker.crit_dmg } else { 1.0 };
    let defense = if skill.tags.contains(SkillTags::IGNORE_DEF) {
        0
    } else {
        defender.def
    };
    calculate_damage(attacker.atk, defense, skill.power, skill.flat_damage, crit_multiplier)
}

/// Crit check against `crit_rate` (a fraction; values ≥ 1 always crit).
pub fn roll_crit(crit_rate: f32, oracle: &(impl RngOracle + ?Sized), seed: u64) -> bool {
    if crit_rate <= 0.0 {
        return false;
    }
    oracle.roll_unit(seed) < crit_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::FixedRoll;

    fn stats(atk: i32, def: i32) -> StatBlock {
        StatBlock::new(1000, atk, def, 100)
    }

    #[test]
    fn reference_fixture() {
        let skill = SkillDef::attack("strike", 1.0);
        assert_eq!(resolve_damage(&stats(200, 0), &stats(0, 100), &skill, false), 182);
    }

    #[test]
    fn zero_defense_is_unmitigated() {
        let skill = SkillDef::attack("strike", 1.0);
        assert_eq!(resolve_damage(&stats(100, 0), &stats(0, 0), &skill, false), 100);
    }

    #[test]
    fn negative_defense_counts_as_zero() {
        assert_eq!(calculate_damage(100, -500, 1.0, 0, 1.0), 100);
    }

    #[test]
    fn crit_scales_by_crit_damage() {
        let attacker = stats(200, 0).with_crit(1.0, 0.5);
        let skill = SkillDef::attack("strike", 1.0);
        // 200 * 1.5 * 1000/1100 = 272.7
        assert_eq!(resolve_damage(&attacker, &stats(0, 100), &skill, true), 273);
    }

    #[test]
    fn flat_damage_precedes_mitigation() {
        let skill = SkillDef::attack("jab", 1.0).with_flat_damage(20);
        // (100 + 20) * 1000/1200 = 100
        assert_eq!(resolve_damage(&stats(100, 0), &stats(0, 200), &skill, false), 100);
    }

    #[test]
    fn ignore_def_skips_mitigation() {
        let mut skill = SkillDef::attack("pierce", 1.0);
        skill.tags |= SkillTags::IGNORE_DEF;
        assert_eq!(resolve_damage(&stats(200, 0), &stats(0, 100), &skill, false), 200);
    }

    #[test]
    fn never_negative() {
        assert_eq!(calculate_damage(10, 0, 1.0, -50, 1.0), 0);
    }

    #[test]
    fn crit_roll_respects_rate() {
        assert!(!roll_crit(0.0, &FixedRoll::PASS, 1));
        assert!(roll_crit(0.25, &FixedRoll::PASS, 1));
        assert!(!roll_crit(0.25, &FixedRoll::FAIL, 1));
        assert!(roll_crit(1.0, &FixedRoll::FAIL, 1));
    }
}
