use std::sync::Arc;

use super::def::StatusEffectDef;
use crate::events::EffectChange;
use crate::state::CombatantId;

/// A live application of a [`StatusEffectDef`] to one combatant.
///
/// `source` is attribution only: the applier may die or leave the roster
/// while the effect lives on.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusEffectInstance {
    pub def: Arc<StatusEffectDef>,
    pub remaining_turns: u32,
    pub stacks: u32,
    pub source: Option<CombatantId>,
}

impl StatusEffectInstance {
    /// Duration is floored at one turn; stacks are clamped into `[1, cap]`.
    pub fn new(
        def: Arc<StatusEffectDef>,
        duration: u32,
        stacks: u32,
        source: Option<CombatantId>,
    ) -> Self {
        let stacks = stacks.clamp(1, def.stack_cap());
        Self {
            def,
            remaining_turns: duration.max(1),
            stacks,
            source,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub(crate) fn change(&self, owner: CombatantId) -> EffectChange {
        EffectChange {
            owner,
            effect: self.def.id.clone(),
            stacks: self.stacks,
            remaining_turns: self.remaining_turns,
            source: self.source,
        }
    }
}
