//! One combatant's turn, from start-of-turn tick to terminal check.

use std::sync::Arc;

use super::{PendingAction, Phase, StepOutcome, TurnScheduler};
use crate::config::SchedulingMode;
use crate::env::ActionRolls;
use crate::events::{BattleEvent, EventSink};
use crate::skill::{TimedAction, execute_skill, resolve_targets};
use crate::state::{Combatant, CombatantId, Team};
use crate::status::TickTiming;

impl TurnScheduler {
    /// Runs the turn of the combatant at `index`, or suspends it when a
    /// manual actor must be answered first.
    pub(super) fn take_turn(&mut self, index: usize, sink: &mut impl EventSink) -> StepOutcome {
        let discrete = self.config.mode == SchedulingMode::DiscreteStep;
        let Some(combatant) = self.roster.at_mut(index) else {
            return StepOutcome::Waiting;
        };
        let actor = combatant.id();
        self.current_actor = Some(actor);
        self.phase = Phase::ExecutingAction { actor };
        tracing::debug!(target: "battle::turn", actor = ?actor, name = %combatant.name, "turn started");
        sink.emit(BattleEvent::TurnStarted { actor });

        combatant.tick_status(TickTiming::PerTurnStart, sink);
        combatant.tick_cooldowns();

        if combatant.is_dead() {
            tracing::debug!(target: "battle::turn", actor = ?actor, "actor fell to start-of-turn effects");
            combatant.reset_gauge();
            sink.emit(BattleEvent::TurnEnded { actor });
            self.finish_turn(sink);
            return self.after_turn(actor);
        }

        if combatant.is_action_prevented() {
            tracing::debug!(target: "battle::turn", actor = ?actor, "action prevented");
            sink.emit(BattleEvent::ActionPrevented { actor });
            self.end_turn(index, sink);
            return self.after_turn(actor);
        }

        let manual = combatant.is_manual();
        if manual && discrete {
            let targets = self.default_targets(index, 0);
            self.pending = Some(PendingAction {
                actor,
                skill_index: 0,
                targets,
            });
            self.phase = Phase::AwaitingPlayerAction { actor };
            tracing::debug!(target: "battle::turn", actor = ?actor, "awaiting player action");
            sink.emit(BattleEvent::PlayerTurnBegan { actor });
            return StepOutcome::AwaitingPlayer { actor };
        }

        let slot = if manual { 0 } else { self.choose_auto_skill(index) };
        self.perform_action(index, slot, &[], sink);
        self.end_turn(index, sink);
        self.after_turn(actor)
    }

    /// Executes the skill in `slot_index` for the combatant at `index`.
    ///
    /// Bad input never aborts the turn: the index is clamped, a slot that is
    /// not ready falls back to the basic skill, and a passive skill or an
    /// empty target list turns the action into a pass.
    pub(super) fn perform_action(
        &mut self,
        index: usize,
        slot_index: usize,
        requested: &[CombatantId],
        sink: &mut impl EventSink,
    ) {
        let Some(user) = self.roster.at(index) else {
            return;
        };
        let actor = user.id();
        self.phase = Phase::ExecutingAction { actor };

        let slots = user.skills();
        if slots.is_empty() {
            tracing::warn!(target: "battle::turn", actor = ?actor, "no skills equipped, passing");
            return;
        }
        let mut slot = slot_index.min(slots.len() - 1);
        if slot != slot_index {
            tracing::warn!(target: "battle::turn", actor = ?actor, requested = slot_index, clamped = slot, "skill index out of range");
        }
        if !slots[slot].is_ready() {
            tracing::warn!(
                target: "battle::turn",
                actor = ?actor,
                slot,
                cooldown = slots[slot].cooldown(),
                "skill on cooldown, using basic skill"
            );
            slot = 0;
        }

        let skill = Arc::clone(&slots[slot].def);
        if !skill.is_active() {
            tracing::debug!(target: "battle::turn", actor = ?actor, skill = %skill.key(), "passive skill, passing");
            return;
        }

        let preferred = self.preferred_for(user);
        let targets = resolve_targets(&self.roster, user, &skill.targeting, requested, preferred);
        if targets.is_empty() {
            tracing::debug!(target: "battle::turn", actor = ?actor, skill = %skill.key(), "no valid targets, passing");
            return;
        }

        self.nonce += 1;
        let key = skill.key();
        let rolls = ActionRolls::new(self.oracle.as_ref(), self.config.seed, self.nonce, actor);
        sink.emit(BattleEvent::SkillUsed {
            actor,
            skill: key.clone(),
            slot,
            targets: targets.clone(),
        });

        let outcome = execute_skill(&mut self.roster, actor, &skill, &targets, &rolls, sink);
        let bridged = self
            .bridge
            .apply(&mut self.roster, actor, &key, &targets, &rolls, sink);

        if let Some(used) = self.roster.at_mut(index).and_then(|c| c.skill_mut(slot)) {
            used.trigger();
        }

        tracing::debug!(
            target: "battle::turn",
            actor = ?actor,
            skill = %key,
            targets = targets.len(),
            damage = outcome.damage_dealt,
            healing = outcome.healing_done,
            effects = outcome.effects_rolled,
            bridged,
            "skill resolved"
        );
    }

    /// Gauge reset, end-of-turn tick, terminal check.
    pub(super) fn end_turn(&mut self, index: usize, sink: &mut impl EventSink) {
        let Some(combatant) = self.roster.at_mut(index) else {
            self.finish_turn(sink);
            return;
        };
        let actor = combatant.id();
        self.phase = Phase::EndingTurn { actor };

        combatant.reset_gauge();
        combatant.tick_status(TickTiming::PerTurnEnd, sink);
        sink.emit(BattleEvent::TurnEnded { actor });
        self.finish_turn(sink);
    }

    /// Closes a suspended turn that can no longer be executed.
    pub(super) fn abandon_turn(&mut self, actor: CombatantId, sink: &mut impl EventSink) {
        if let Some(combatant) = self.roster.get_mut(actor) {
            combatant.reset_gauge();
        }
        sink.emit(BattleEvent::TurnEnded { actor });
        self.finish_turn(sink);
    }

    fn finish_turn(&mut self, sink: &mut impl EventSink) {
        self.current_actor = None;
        self.phase = Phase::SelectingActor;
        self.check_terminal(sink);
        self.clear_dead_target(sink);
    }

    fn after_turn(&self, actor: CombatantId) -> StepOutcome {
        match self.phase {
            Phase::Terminal(outcome) => StepOutcome::Finished(outcome),
            _ => StepOutcome::Acted { actor },
        }
    }

    /// First ready, active skill past the basic slot; otherwise the basic skill.
    fn choose_auto_skill(&self, index: usize) -> usize {
        self.roster
            .at(index)
            .and_then(|c| {
                c.skills()
                    .iter()
                    .enumerate()
                    .skip(1)
                    .find(|(_, s)| s.is_ready() && s.def.is_active())
                    .map(|(slot, _)| slot)
            })
            .unwrap_or(0)
    }

    fn default_targets(&self, index: usize, slot: usize) -> Vec<CombatantId> {
        let Some(user) = self.roster.at(index) else {
            return Vec::new();
        };
        let Some(skill) = user.skill(slot) else {
            return Vec::new();
        };
        resolve_targets(&self.roster, user, &skill.def.targeting, &[], self.preferred_for(user))
    }

    /// The shared selection is the player's pick and only steers the player side.
    fn preferred_for(&self, user: &Combatant) -> Option<CombatantId> {
        match user.team {
            Team::Player => self.preferred_target,
            Team::Enemy => None,
        }
    }
}
