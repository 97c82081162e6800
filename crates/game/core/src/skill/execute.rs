use super::def::{SkillDef, SkillTags};
use crate::combat::resolve_damage;
use crate::env::{ActionRolls, RollContext};
use crate::events::EventSink;
use crate::state::{CombatantId, Roster};

/// What one skill use did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SkillOutcome {
    /// Targets that were alive when the skill reached them.
    pub affected: Vec<CombatantId>,
    pub damage_dealt: i32,
    pub healing_done: i32,
    /// Result of the skill's single status-application roll.
    pub effects_rolled: bool,
}

/// Executes `skill` from `user` against `targets`.
///
/// For every living target, in order: damage (`DAMAGE`), healing (`HEAL`,
/// `round(ATK × heal_ratio)`), cleanse (`CLEANSE`), then the skill's status
/// effects. The status roll happens once per use and its outcome is shared
/// by every target and every listed effect; a target killed by this very
/// hit receives no effects. Passive skills do nothing.
pub fn execute_skill(
    roster: &mut Roster,
    user: CombatantId,
    skill: &SkillDef,
    targets: &[CombatantId],
    rolls: &ActionRolls<'_>,
    sink: &mut impl EventSink,
) -> SkillOutcome {
    let mut outcome = SkillOutcome::default();
    if !skill.is_active() {
        return outcome;
    }
    let Some(user_stats) = roster
        .get(user)
        .filter(|c| c.is_alive())
        .map(|c| c.effective_stats())
    else {
        return outcome;
    };

    let key = skill.key();
    outcome.effects_rolled =
        !skill.effects.is_empty() && rolls.check(RollContext::SkillEffects, skill.apply_chance);

    for &target_id in targets {
        let Some(target) = roster.get_mut(target_id) else {
            continue;
        };
        if target.is_dead() {
            continue;
        }
        outcome.affected.push(target_id);

        if skill.tags.contains(SkillTags::DAMAGE) {
            let crit = rolls.crit(target_id, user_stats.crit_rate);
            let damage = resolve_damage(&user_stats, &target.effective_stats(), skill, crit);
            outcome.damage_dealt += target.take_damage(damage, Some(user), Some(&key), crit, sink);
        }

        if skill.tags.contains(SkillTags::HEAL) {
            let amount = (user_stats.atk as f32 * skill.heal_ratio).round() as i32;
            outcome.healing_done += target.heal(amount, Some(user), Some(&key), sink);
        }

        if skill.tags.contains(SkillTags::CLEANSE) {
            target.cleanse(sink);
        }

        if outcome.effects_rolled && target.is_alive() {
            for effect in &skill.effects {
                target.apply_status(effect, skill.apply_duration, skill.apply_stacks, Some(user), sink);
            }
        }
    }

    outcome
}
