use std::sync::Arc;

use arrayvec::ArrayVec;

use super::def::{StatusEffectDef, TickTiming};
use super::instance::StatusEffectInstance;
use crate::config::BattleConfig;
use crate::events::{BattleEvent, EventSink};
use crate::state::CombatantId;
use crate::stats::StatMultipliers;

/// Result of [`StatusLedger::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new instance was inserted.
    Added,
    /// An existing instance was refreshed in place.
    Updated,
    /// The ledger was full and the effect was discarded.
    Dropped,
}

/// Damage owed by one effect for a tick; the owner routes it through its HP path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DotHit {
    pub effect: String,
    pub amount: i32,
    pub source: Option<CombatantId>,
}

/// Live status effects of one combatant, ordered by descending `ui_priority`
/// with ties in insertion order.
///
/// At most one instance per definition id exists at any time.
#[derive(Clone, Debug, Default)]
pub struct StatusLedger {
    effects: ArrayVec<StatusEffectInstance, { BattleConfig::MAX_STATUS_EFFECTS }>,
}

impl StatusLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refresh-and-stack: an existing instance keeps the longer duration and
    /// sums stacks up to the cap; otherwise a new instance is inserted.
    pub fn apply(
        &mut self,
        owner: CombatantId,
        def: Arc<StatusEffectDef>,
        duration: u32,
        stacks: u32,
        source: Option<CombatantId>,
        sink: &mut impl EventSink,
    ) -> ApplyOutcome {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.def.id == def.id) {
            existing.remaining_turns = existing.remaining_turns.max(duration);
            existing.stacks = existing
                .stacks
                .saturating_add(stacks)
                .min(existing.def.stack_cap());
            sink.emit(BattleEvent::EffectUpdated(existing.change(owner)));
            return ApplyOutcome::Updated;
        }

        let instance = StatusEffectInstance::new(def, duration, stacks, source);
        let change = instance.change(owner);
        if self.effects.try_push(instance).is_err() {
            tracing::warn!(
                target: "battle::status",
                owner = ?owner,
                effect = %change.effect,
                "status ledger full, effect dropped"
            );
            return ApplyOutcome::Dropped;
        }
        // slice sort is stable, so equal priorities stay in insertion order
        self.effects
            .sort_by(|a, b| b.def.ui_priority.cmp(&a.def.ui_priority));
        sink.emit(BattleEvent::EffectAdded(change));
        ApplyOutcome::Added
    }

    /// Removes the instance of `effect_id`, returning whether one existed.
    pub fn remove(
        &mut self,
        owner: CombatantId,
        effect_id: &str,
        sink: &mut impl EventSink,
    ) -> bool {
        match self.effects.iter().position(|e| e.def.id == effect_id) {
            Some(index) => {
                let removed = self.effects.remove(index);
                sink.emit(BattleEvent::EffectRemoved(removed.change(owner)));
                true
            }
            None => false,
        }
    }

    /// Removes every harmful effect; returns how many went.
    pub fn remove_harmful(&mut self, owner: CombatantId, sink: &mut impl EventSink) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < self.effects.len() {
            if self.effects[index].def.is_harmful {
                let instance = self.effects.remove(index);
                sink.emit(BattleEvent::EffectRemoved(instance.change(owner)));
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }

    /// Dot damage owed by every effect firing at `timing`, in ledger order.
    pub fn dot_hits(&self, timing: TickTiming) -> Vec<DotHit> {
        self.effects
            .iter()
            .filter(|e| e.def.tick_timing == timing && e.def.dot_per_tick != 0)
            .map(|e| DotHit {
                effect: e.def.id.clone(),
                amount: e.def.dot_per_tick.saturating_mul(e.stacks as i32),
                source: e.source,
            })
            .collect()
    }

    /// End-of-turn duration pass: every instance loses one turn, expired ones
    /// are removed and the survivors report their new state.
    pub fn advance_durations(&mut self, owner: CombatantId, sink: &mut impl EventSink) {
        for effect in self.effects.iter_mut() {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
        }

        let mut index = 0;
        while index < self.effects.len() {
            if self.effects[index].remaining_turns == 0 {
                let expired = self.effects.remove(index);
                sink.emit(BattleEvent::EffectRemoved(expired.change(owner)));
            } else {
                index += 1;
            }
        }

        for effect in &self.effects {
            sink.emit(BattleEvent::EffectUpdated(effect.change(owner)));
        }
    }

    pub fn attack_multiplier(&self) -> f32 {
        self.multiplier(|def| def.atk_mod_percent)
    }

    pub fn defense_multiplier(&self) -> f32 {
        self.multiplier(|def| def.def_mod_percent)
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.multiplier(|def| def.speed_mod_percent)
    }

    pub fn multipliers(&self) -> StatMultipliers {
        StatMultipliers {
            attack: self.attack_multiplier(),
            defense: self.defense_multiplier(),
            speed: self.speed_multiplier(),
        }
    }

    pub fn is_action_prevented(&self) -> bool {
        self.effects.iter().any(|e| e.def.prevents_action)
    }

    pub fn get(&self, effect_id: &str) -> Option<&StatusEffectInstance> {
        self.effects.iter().find(|e| e.def.id == effect_id)
    }

    pub fn contains(&self, effect_id: &str) -> bool {
        self.get(effect_id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffectInstance> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    fn multiplier(&self, percent: impl Fn(&StatusEffectDef) -> f32) -> f32 {
        let sum: f32 = self
            .effects
            .iter()
            .map(|e| e.stacks as f32 * percent(&e.def))
            .sum();
        (1.0 + sum).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusType;

    const OWNER: CombatantId = CombatantId(1);

    fn burn() -> Arc<StatusEffectDef> {
        Arc::new(
            StatusEffectDef::new("burn", StatusType::Dot)
                .with_timing(TickTiming::PerTurnEnd)
                .with_dot(50)
                .with_max_stacks(3)
                .with_priority(5)
                .harmful(),
        )
    }

    fn stun() -> Arc<StatusEffectDef> {
        Arc::new(
            StatusEffectDef::new("stun", StatusType::Control)
                .with_priority(10)
                .preventing_action()
                .harmful(),
        )
    }

    #[test]
    fn reapply_refreshes_instead_of_duplicating() {
        let mut ledger = StatusLedger::new();
        let mut events = Vec::new();

        assert_eq!(
            ledger.apply(OWNER, burn(), 3, 1, None, &mut events),
            ApplyOutcome::Added
        );
        assert_eq!(
            ledger.apply(OWNER, burn(), 2, 1, None, &mut events),
            ApplyOutcome::Updated
        );

        assert_eq!(ledger.len(), 1);
        let instance = ledger.get("burn").unwrap();
        assert_eq!(instance.remaining_turns, 3, "max of durations, not sum");
        assert_eq!(instance.stacks, 2);
        assert!(matches!(events[0], BattleEvent::EffectAdded(_)));
        assert!(matches!(events[1], BattleEvent::EffectUpdated(_)));
    }

    #[test]
    fn stacks_never_exceed_cap() {
        let mut ledger = StatusLedger::new();
        let mut sink = crate::events::NullSink;

        ledger.apply(OWNER, burn(), 1, 5, None, &mut sink);
        assert_eq!(ledger.get("burn").unwrap().stacks, 3);

        ledger.apply(OWNER, burn(), 1, 2, None, &mut sink);
        assert_eq!(ledger.get("burn").unwrap().stacks, 3);
    }

    #[test]
    fn ordered_by_descending_priority_then_insertion() {
        let mut ledger = StatusLedger::new();
        let mut sink = crate::events::NullSink;
        let low_a = Arc::new(StatusEffectDef::new("a", StatusType::Buff).with_priority(1));
        let low_b = Arc::new(StatusEffectDef::new("b", StatusType::Buff).with_priority(1));

        ledger.apply(OWNER, low_a, 1, 1, None, &mut sink);
        ledger.apply(OWNER, burn(), 1, 1, None, &mut sink);
        ledger.apply(OWNER, low_b, 1, 1, None, &mut sink);
        ledger.apply(OWNER, stun(), 1, 1, None, &mut sink);

        let order: Vec<_> = ledger.iter().map(|e| e.id()).collect();
        assert_eq!(order, ["stun", "burn", "a", "b"]);
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let mut ledger = StatusLedger::new();
        let mut events = Vec::new();

        assert!(!ledger.remove(OWNER, "burn", &mut events));
        assert!(events.is_empty());

        ledger.apply(OWNER, burn(), 1, 1, None, &mut events);
        assert!(ledger.remove(OWNER, "burn", &mut events));
        assert!(matches!(events.last(), Some(BattleEvent::EffectRemoved(_))));
        assert!(ledger.is_empty());
    }

    #[test]
    fn duration_pass_expires_and_updates() {
        let mut ledger = StatusLedger::new();
        let mut sink = crate::events::NullSink;
        ledger.apply(OWNER, burn(), 1, 2, None, &mut sink);
        ledger.apply(OWNER, stun(), 2, 1, None, &mut sink);

        let hits = ledger.dot_hits(TickTiming::PerTurnEnd);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].amount, 100);

        let mut events = Vec::new();
        ledger.advance_durations(OWNER, &mut events);

        assert!(!ledger.contains("burn"));
        assert_eq!(ledger.get("stun").unwrap().remaining_turns, 1);
        assert!(matches!(&events[0], BattleEvent::EffectRemoved(c) if c.effect == "burn"));
        assert!(matches!(&events[1], BattleEvent::EffectUpdated(c) if c.effect == "stun"));
    }

    #[test]
    fn multipliers_floor_at_zero() {
        let mut ledger = StatusLedger::new();
        let mut sink = crate::events::NullSink;
        let weaken = Arc::new(
            StatusEffectDef::new("weaken", StatusType::Debuff)
                .with_modifiers(-0.4, 0.25, 0.0)
                .with_max_stacks(5),
        );

        ledger.apply(OWNER, weaken, 2, 3, None, &mut sink);

        assert_eq!(ledger.attack_multiplier(), 0.0);
        assert!((ledger.defense_multiplier() - 1.75).abs() < 1e-6);
        assert_eq!(ledger.speed_multiplier(), 1.0);
    }

    #[test]
    fn cleanse_keeps_beneficial_effects() {
        let mut ledger = StatusLedger::new();
        let mut sink = crate::events::NullSink;
        let haste = Arc::new(StatusEffectDef::new("haste", StatusType::Buff));
        ledger.apply(OWNER, burn(), 2, 1, None, &mut sink);
        ledger.apply(OWNER, haste, 2, 1, None, &mut sink);
        ledger.apply(OWNER, stun(), 2, 1, None, &mut sink);

        assert!(ledger.is_action_prevented());
        assert_eq!(ledger.remove_harmful(OWNER, &mut sink), 2);
        assert!(!ledger.is_action_prevented());
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains("haste"));
    }

    #[test]
    fn full_ledger_drops_new_effects() {
        let mut ledger = StatusLedger::new();
        let mut sink = crate::events::NullSink;
        for i in 0..BattleConfig::MAX_STATUS_EFFECTS {
            let def = Arc::new(StatusEffectDef::new(format!("e{i}"), StatusType::Other));
            ledger.apply(OWNER, def, 1, 1, None, &mut sink);
        }

        let overflow = Arc::new(StatusEffectDef::new("overflow", StatusType::Other));
        assert_eq!(
            ledger.apply(OWNER, overflow, 1, 1, None, &mut sink),
            ApplyOutcome::Dropped
        );
        assert!(!ledger.contains("overflow"));
    }
}
