//! A single participant in an encounter.

use std::sync::Arc;

use arrayvec::ArrayVec;

use super::common::{CombatantId, Control, Team};
use crate::config::BattleConfig;
use crate::events::{BattleEvent, EventSink};
use crate::skill::{SkillDef, SkillInstance};
use crate::stats::StatBlock;
use crate::status::{ApplyOutcome, StatusEffectDef, StatusLedger, TickTiming};

/// Skill loadout, slot 0 first.
pub type SkillSlots = ArrayVec<SkillInstance, { BattleConfig::MAX_SKILL_SLOTS }>;

/// A combatant owns its stats, status ledger, skill slots and ATB gauge.
///
/// `stats.hp` is the live HP value and is kept in `[0, max_hp]`. A combatant
/// is dead exactly when that value is zero.
#[derive(Clone, Debug)]
pub struct Combatant {
    pub(crate) id: CombatantId,
    pub name: String,
    /// Catalog id of the unit this combatant was built from, if any.
    pub unit_id: String,
    pub team: Team,
    pub control: Control,

    base_stats: StatBlock,
    bonus_stats: StatBlock,
    stats: StatBlock,
    max_hp: i32,

    gauge: f32,
    skills: SkillSlots,
    status: StatusLedger,
}

impl Combatant {
    /// Creates a combatant at full HP with an empty loadout.
    pub fn new(name: impl Into<String>, team: Team, base_stats: StatBlock) -> Self {
        let max_hp = base_stats.hp.max(0);
        Self {
            id: CombatantId::UNASSIGNED,
            name: name.into(),
            unit_id: String::new(),
            team,
            control: Control::Auto,
            base_stats,
            bonus_stats: StatBlock::default(),
            stats: StatBlock {
                hp: max_hp,
                ..base_stats
            },
            max_hp,
            gauge: 0.0,
            skills: SkillSlots::new(),
            status: StatusLedger::new(),
        }
    }

    pub fn with_control(mut self, control: Control) -> Self {
        self.control = control;
        self
    }

    pub fn with_unit_id(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = unit_id.into();
        self
    }

    /// Adds equipment or other flat bonuses on top of the base stats and
    /// restores HP to the new maximum.
    pub fn with_bonus(mut self, bonus: StatBlock) -> Self {
        self.bonus_stats = bonus;
        let total = self.base_stats + self.bonus_stats;
        self.max_hp = total.hp.max(0);
        self.stats = StatBlock {
            hp: self.max_hp,
            ..total
        };
        self
    }

    /// Appends a skill. The first skill becomes the cooldown-exempt basic
    /// action; skills past the slot capacity are ignored.
    pub fn with_skill(mut self, def: Arc<SkillDef>) -> Self {
        self.push_skill(def);
        self
    }

    pub fn with_skills(mut self, defs: impl IntoIterator<Item = Arc<SkillDef>>) -> Self {
        for def in defs {
            self.push_skill(def);
        }
        self
    }

    fn push_skill(&mut self, def: Arc<SkillDef>) {
        let slot = if self.skills.is_empty() {
            SkillInstance::basic(def)
        } else {
            SkillInstance::new(def)
        };
        if let Err(err) = self.skills.try_push(slot) {
            tracing::warn!(
                target: "battle::combatant",
                name = %self.name,
                skill = %err.element().def.key(),
                "skill slots full, skill ignored"
            );
        }
    }

    // ===== identity & liveness =====

    #[inline]
    pub fn id(&self) -> CombatantId {
        self.id
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.stats.hp > 0
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    #[inline]
    pub fn is_manual(&self) -> bool {
        self.control == Control::Manual
    }

    // ===== stats =====

    #[inline]
    pub fn hp(&self) -> i32 {
        self.stats.hp
    }

    #[inline]
    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn base_stats(&self) -> &StatBlock {
        &self.base_stats
    }

    /// Base plus bonuses, with live HP.
    pub fn stats(&self) -> &StatBlock {
        &self.stats
    }

    /// Total stats scaled by the status ledger's ATK/DEF/SPD multipliers.
    pub fn effective_stats(&self) -> StatBlock {
        self.status.multipliers().apply(&self.stats)
    }

    // ===== HP path =====

    /// Reduces HP by `amount`, floored at zero.
    ///
    /// Raises `Damaged`, then `Died` on the hit that reaches zero. Damage to
    /// an already-dead combatant changes nothing and raises nothing.
    /// Returns the HP actually removed.
    pub fn take_damage(
        &mut self,
        amount: i32,
        source: Option<CombatantId>,
        skill: Option<&str>,
        crit: bool,
        sink: &mut impl EventSink,
    ) -> i32 {
        if self.is_dead() {
            return 0;
        }
        let dealt = amount.max(0).min(self.stats.hp);
        self.stats.hp -= dealt;

        sink.emit(BattleEvent::Damaged {
            target: self.id,
            amount: dealt,
            hp: self.stats.hp,
            source,
            skill: skill.map(str::to_owned),
            crit,
        });
        if self.stats.hp == 0 {
            tracing::debug!(target: "battle::combatant", id = ?self.id, name = %self.name, "died");
            sink.emit(BattleEvent::Died {
                target: self.id,
                killer: source,
            });
        }
        dealt
    }

    /// Restores HP, clamped to the maximum. The dead are not revived.
    /// Returns the HP actually restored.
    pub fn heal(
        &mut self,
        amount: i32,
        source: Option<CombatantId>,
        skill: Option<&str>,
        sink: &mut impl EventSink,
    ) -> i32 {
        if self.is_dead() {
            return 0;
        }
        let healed = amount.max(0).min(self.max_hp - self.stats.hp);
        self.stats.hp += healed;

        sink.emit(BattleEvent::Healed {
            target: self.id,
            amount: healed,
            hp: self.stats.hp,
            source,
            skill: skill.map(str::to_owned),
        });
        healed
    }

    // ===== status =====

    pub fn status(&self) -> &StatusLedger {
        &self.status
    }

    /// Applies `def` through the ledger's refresh-and-stack rule.
    ///
    /// An `Instant` effect with a dot also deals `dot × stacks` right away.
    pub fn apply_status(
        &mut self,
        def: &Arc<StatusEffectDef>,
        duration: u32,
        stacks: u32,
        source: Option<CombatantId>,
        sink: &mut impl EventSink,
    ) -> ApplyOutcome {
        let outcome = self
            .status
            .apply(self.id, Arc::clone(def), duration, stacks, source, sink);

        if outcome != ApplyOutcome::Dropped
            && def.tick_timing == TickTiming::Instant
            && def.dot_per_tick != 0
        {
            let stacks = stacks.clamp(1, def.stack_cap()) as i32;
            self.apply_dot(def.dot_per_tick.saturating_mul(stacks), source, sink);
        }
        outcome
    }

    pub fn remove_status(&mut self, effect_id: &str, sink: &mut impl EventSink) -> bool {
        self.status.remove(self.id, effect_id, sink)
    }

    /// Strips every harmful effect.
    pub fn cleanse(&mut self, sink: &mut impl EventSink) -> usize {
        self.status.remove_harmful(self.id, sink)
    }

    /// Runs the ledger tick for `timing`: dot damage first, then (at turn end)
    /// the duration pass, so a one-turn dot still gets its final tick.
    pub fn tick_status(&mut self, timing: TickTiming, sink: &mut impl EventSink) {
        for hit in self.status.dot_hits(timing) {
            self.apply_dot(hit.amount, hit.source, sink);
        }
        if timing == TickTiming::PerTurnEnd {
            self.status.advance_durations(self.id, sink);
        }
    }

    /// Negative dot values heal.
    fn apply_dot(&mut self, amount: i32, source: Option<CombatantId>, sink: &mut impl EventSink) {
        if amount >= 0 {
            self.take_damage(amount, source, None, false, sink);
        } else {
            self.heal(amount.saturating_neg(), source, None, sink);
        }
    }

    #[inline]
    pub fn is_action_prevented(&self) -> bool {
        self.status.is_action_prevented()
    }

    // ===== skills =====

    pub fn skills(&self) -> &[SkillInstance] {
        &self.skills
    }

    pub fn skill(&self, index: usize) -> Option<&SkillInstance> {
        self.skills.get(index)
    }

    pub(crate) fn skill_mut(&mut self, index: usize) -> Option<&mut SkillInstance> {
        self.skills.get_mut(index)
    }

    /// Turn-start cooldown step for every non-exempt slot.
    pub fn tick_cooldowns(&mut self) {
        for slot in self.skills.iter_mut() {
            slot.tick();
        }
    }

    // ===== ATB gauge =====

    #[inline]
    pub fn gauge(&self) -> f32 {
        self.gauge
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.is_alive() && self.gauge >= 1.0
    }

    /// Gauge fill per simulated second.
    pub fn fill_rate(&self, rate_factor: f32) -> f32 {
        let speed = self.stats.speed().max(0) as f32 * self.status.speed_multiplier();
        (speed * rate_factor).max(0.0)
    }

    /// Advances the gauge by `dt` simulated seconds, clamped to 1.
    /// Dead combatants do not charge.
    pub fn advance_gauge(&mut self, dt: f32, rate_factor: f32) {
        if self.is_dead() || dt <= 0.0 {
            return;
        }
        self.gauge = (self.gauge + self.fill_rate(rate_factor) * dt).min(1.0);
    }

    /// Seconds until the gauge reaches 1, `None` if it never will.
    pub fn time_to_ready(&self, rate_factor: f32) -> Option<f32> {
        if self.is_dead() {
            return None;
        }
        if self.gauge >= 1.0 {
            return Some(0.0);
        }
        let rate = self.fill_rate(rate_factor);
        (rate > 0.0).then(|| (1.0 - self.gauge) / rate)
    }

    pub(crate) fn set_gauge(&mut self, gauge: f32) {
        self.gauge = gauge.clamp(0.0, 1.0);
    }

    pub fn reset_gauge(&mut self) {
        self.gauge = 0.0;
    }
}
