//! Skill-keyed status application rules.
//!
//! Skills and status effects are authored independently; the bridge maps a
//! skill's key to extra effects applied after the skill resolves. A key with
//! no rules is the normal case and does nothing.

use std::sync::Arc;

use crate::env::{ActionRolls, RollContext};
use crate::events::EventSink;
use crate::state::{CombatantId, Roster};
use crate::status::StatusEffectDef;

/// Who a rule's effects land on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ApplyTo {
    /// Every target the skill resolved against.
    #[default]
    Targets,
    /// The skill's user.
    #[cfg_attr(feature = "serde", serde(rename = "Self", alias = "User"))]
    #[strum(serialize = "Self")]
    User,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BridgeRule {
    pub skill_key: String,
    pub apply_to: ApplyTo,
    /// Percent in `[0, 100]`, rolled independently for each recipient.
    pub chance: u32,
    pub duration: u32,
    pub stacks: u32,
    pub effects: Vec<Arc<StatusEffectDef>>,
}

impl BridgeRule {
    pub fn new(skill_key: impl Into<String>, effects: Vec<Arc<StatusEffectDef>>) -> Self {
        Self {
            skill_key: skill_key.into(),
            apply_to: ApplyTo::Targets,
            chance: 100,
            duration: 2,
            stacks: 1,
            effects,
        }
    }
}

/// Rule table looked up by exact (case-sensitive) skill key.
#[derive(Clone, Debug, Default)]
pub struct StatusBridge {
    rules: Vec<BridgeRule>,
}

impl StatusBridge {
    pub fn new(rules: Vec<BridgeRule>) -> Self {
        Self { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> &[BridgeRule] {
        &self.rules
    }

    /// Applies every rule matching `skill_key`. Returns the number of
    /// (rule, recipient) pairs whose roll passed.
    pub fn apply(
        &self,
        roster: &mut Roster,
        user: CombatantId,
        skill_key: &str,
        targets: &[CombatantId],
        rolls: &ActionRolls<'_>,
        sink: &mut impl EventSink,
    ) -> usize {
        if skill_key.is_empty() {
            return 0;
        }

        let mut applied = 0;
        for (index, rule) in self.rules.iter().enumerate() {
            if rule.skill_key != skill_key || rule.effects.is_empty() {
                continue;
            }
            let recipients = match rule.apply_to {
                ApplyTo::User => std::slice::from_ref(&user),
                ApplyTo::Targets => targets,
            };
            for &recipient in recipients {
                let Some(target) = roster.get_mut(recipient).filter(|c| c.is_alive()) else {
                    continue;
                };
                let context = RollContext::BridgeRule {
                    rule: index as u32,
                    target: recipient.0,
                };
                if !rolls.check(context, rule.chance) {
                    continue;
                }
                for effect in &rule.effects {
                    target.apply_status(effect, rule.duration, rule.stacks, Some(user), sink);
                }
                tracing::trace!(
                    target: "battle::bridge",
                    skill = %skill_key,
                    recipient = ?recipient,
                    effects = rule.effects.len(),
                    "bridge rule applied"
                );
                applied += 1;
            }
        }
        applied
    }
}
