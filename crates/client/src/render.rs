//! Event stream rendering for the terminal.

use std::collections::HashMap;

use battle_core::{BattleEvent, CombatantId, EffectChange, Roster};
use battle_runtime::{Event, StageEvent};

pub struct Renderer {
    json: bool,
    names: HashMap<CombatantId, String>,
}

impl Renderer {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            names: HashMap::new(),
        }
    }

    /// Remembers display names for the combatants of a freshly installed roster.
    pub fn learn(&mut self, roster: &Roster) {
        for combatant in roster.iter() {
            self.names.insert(combatant.id(), combatant.name.clone());
        }
    }

    fn name(&self, id: CombatantId) -> String {
        match self.names.get(&id) {
            Some(name) => format!("{}{}", name, id),
            None => id.to_string(),
        }
    }

    fn names(&self, ids: &[CombatantId]) -> String {
        ids.iter()
            .map(|&id| self.name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// One output line for `event`, or `None` when it is not worth printing.
    pub fn render(&self, event: &Event) -> Option<String> {
        if self.json {
            return match serde_json::to_string(event) {
                Ok(line) => Some(line),
                Err(err) => {
                    tracing::warn!("failed to encode event as JSON: {}", err);
                    None
                }
            };
        }
        match event {
            Event::Battle(event) => self.battle_line(event),
            Event::Stage(event) => Some(Self::stage_line(event)),
        }
    }

    fn battle_line(&self, event: &BattleEvent) -> Option<String> {
        let line = match event {
            BattleEvent::RosterChanged { combatants } => {
                format!("roster: {}", self.names(combatants))
            }
            BattleEvent::TurnStarted { .. } | BattleEvent::TurnEnded { .. } => return None,
            BattleEvent::PlayerTurnBegan { actor } => format!("{} awaits orders", self.name(*actor)),
            BattleEvent::ActionPrevented { actor } => format!("{} cannot act", self.name(*actor)),
            BattleEvent::SkillUsed {
                actor,
                skill,
                targets,
                ..
            } => format!("{} uses {} on {}", self.name(*actor), skill, self.names(targets)),
            BattleEvent::Damaged {
                target,
                amount,
                hp,
                crit,
                ..
            } => format!(
                "  {} takes {}{} damage ({} HP left)",
                self.name(*target),
                amount,
                if *crit { " critical" } else { "" },
                hp
            ),
            BattleEvent::Healed {
                target, amount, hp, ..
            } => format!("  {} recovers {} HP ({} HP)", self.name(*target), amount, hp),
            BattleEvent::Died { target, .. } => format!("  {} falls", self.name(*target)),
            BattleEvent::EffectAdded(change) => self.effect_line("gains", change),
            BattleEvent::EffectUpdated(change) => self.effect_line("refreshes", change),
            BattleEvent::EffectRemoved(change) => {
                format!("  {} loses {}", self.name(change.owner), change.effect)
            }
            BattleEvent::TargetChanged { target: Some(target) } => {
                format!("target: {}", self.name(*target))
            }
            BattleEvent::TargetChanged { target: None } => "target cleared".to_string(),
            BattleEvent::ActionRejected { reason, .. } => format!("action rejected: {}", reason),
            BattleEvent::EnemiesDefeated => "all enemies defeated".to_string(),
            BattleEvent::PlayersDefeated => "the party has fallen".to_string(),
        };
        Some(line)
    }

    fn effect_line(&self, verb: &str, change: &EffectChange) -> String {
        format!(
            "  {} {} {} x{} ({} turns)",
            self.name(change.owner),
            verb,
            change.effect,
            change.stacks,
            change.remaining_turns
        )
    }

    fn stage_line(event: &StageEvent) -> String {
        match event {
            StageEvent::WaveStarted {
                stage,
                wave,
                total_waves,
                players,
                enemies,
                ..
            } => format!(
                "== {} wave {}/{}: {} allies vs {} enemies ==",
                stage,
                wave + 1,
                total_waves,
                players,
                enemies
            ),
            StageEvent::StageCleared { stage, waves } => {
                format!("== {} cleared ({} waves) ==", stage, waves)
            }
            StageEvent::StageFailed {
                stage,
                wave,
                reason,
            } => format!("== {} failed on wave {}: {} ==", stage, wave + 1, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_ids_fall_back_to_the_id() {
        let renderer = Renderer::new(false);
        let line = renderer
            .render(&Event::Battle(BattleEvent::Died {
                target: CombatantId(4),
                killer: None,
            }))
            .unwrap();
        assert_eq!(line, "  #4 falls");
    }

    #[test]
    fn turn_markers_are_skipped_in_text_mode() {
        let renderer = Renderer::new(false);
        let event = Event::Battle(BattleEvent::TurnStarted { actor: CombatantId(0) });
        assert!(renderer.render(&event).is_none());
        assert!(Renderer::new(true).render(&event).is_some());
    }

    #[test]
    fn json_lines_round_trip() {
        let event = Event::Stage(StageEvent::StageCleared {
            stage: "first_steps".into(),
            waves: 2,
        });
        let line = Renderer::new(true).render(&event).unwrap();
        assert_eq!(serde_json::from_str::<Event>(&line).unwrap(), event);
    }
}
