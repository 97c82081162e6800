use std::sync::Arc;

use super::def::SkillDef;

/// Cooldown capability shared by everything that occupies a skill slot.
pub trait TimedAction {
    /// Turns left before the action can be used again.
    fn cooldown(&self) -> u32;

    /// Cooldown set when the action is used.
    fn max_cooldown(&self) -> u32;

    fn is_ready(&self) -> bool {
        self.cooldown() == 0
    }
}

/// A skill equipped by one combatant, with its own cooldown counter.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillInstance {
    pub def: Arc<SkillDef>,
    cooldown_remaining: u32,
    cooldown_exempt: bool,
}

impl SkillInstance {
    pub fn new(def: Arc<SkillDef>) -> Self {
        let cooldown_exempt = def.cooldown_exempt;
        Self {
            def,
            cooldown_remaining: 0,
            cooldown_exempt,
        }
    }

    /// Slot-0 constructor: the basic action is never gated by cooldown.
    pub fn basic(def: Arc<SkillDef>) -> Self {
        Self {
            cooldown_exempt: true,
            ..Self::new(def)
        }
    }

    #[inline]
    pub fn is_cooldown_exempt(&self) -> bool {
        self.cooldown_exempt
    }

    /// Starts the cooldown after a use.
    pub fn trigger(&mut self) {
        if !self.cooldown_exempt {
            self.cooldown_remaining = self.def.base_cooldown;
        }
    }

    /// One turn-start of the owner.
    pub fn tick(&mut self) {
        if !self.cooldown_exempt {
            self.cooldown_remaining = self.cooldown_remaining.saturating_sub(1);
        }
    }

    /// Overrides the counter, e.g. when restoring a snapshot.
    pub fn set_cooldown(&mut self, turns: u32) {
        self.cooldown_remaining = turns;
    }
}

impl TimedAction for SkillInstance {
    fn cooldown(&self) -> u32 {
        if self.cooldown_exempt {
            0
        } else {
            self.cooldown_remaining
        }
    }

    fn max_cooldown(&self) -> u32 {
        self.def.base_cooldown
    }
}
