//! Skill catalog entries.

use std::sync::Arc;

use bitflags::bitflags;

use crate::status::StatusEffectDef;

/// Whether a skill does anything when executed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum SkillKind {
    #[default]
    Active,
    /// Never executes and is never picked by the auto-selector.
    Passive,
}

/// Elemental affinity. Carried as metadata; the resolver ignores it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Wind,
    Light,
    Dark,
}

bitflags! {
    /// What a skill does to each of its targets.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(transparent))]
    pub struct SkillTags: u16 {
        const SINGLE_TARGET = 1 << 0;
        const AREA          = 1 << 1;
        const DAMAGE        = 1 << 2;
        const HEAL          = 1 << 3;
        const APPLY_STATUS  = 1 << 4;
        /// Strip every harmful effect from the target.
        const CLEANSE       = 1 << 5;
        /// Resolve damage as if the defender had zero DEF.
        const IGNORE_DEF    = 1 << 6;
    }
}

/// Which side of the field a skill selects from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetTeam {
    #[cfg_attr(feature = "serde", serde(alias = "Self"))]
    SelfOnly,
    Ally,
    #[default]
    Enemy,
    AllAllies,
    AllEnemies,
}

impl TargetTeam {
    /// The `All*` selectors ignore `max_targets` unless it is set explicitly.
    #[inline]
    pub const fn is_area(self) -> bool {
        matches!(self, TargetTeam::AllAllies | TargetTeam::AllEnemies)
    }

    #[inline]
    pub const fn is_hostile(self) -> bool {
        matches!(self, TargetTeam::Enemy | TargetTeam::AllEnemies)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillTargeting {
    pub target_team: TargetTeam,
    /// 0 means every candidate.
    pub max_targets: u32,
    /// Only meaningful for ally selectors.
    pub include_self: bool,
}

impl SkillTargeting {
    pub const fn single_enemy() -> Self {
        Self {
            target_team: TargetTeam::Enemy,
            max_targets: 1,
            include_self: false,
        }
    }

    pub const fn new(target_team: TargetTeam, max_targets: u32) -> Self {
        Self {
            target_team,
            max_targets,
            include_self: false,
        }
    }

    /// Upper bound on resolved targets, `None` when unlimited.
    pub fn limit(&self) -> Option<usize> {
        match (self.target_team, self.max_targets) {
            (TargetTeam::SelfOnly, _) => Some(1),
            (_, 0) => None,
            (team, _) if team.is_area() && self.max_targets == 1 => None,
            (_, n) => Some(n as usize),
        }
    }
}

impl Default for SkillTargeting {
    fn default() -> Self {
        Self::single_enemy()
    }
}

/// Immutable definition of a skill.
///
/// Status effects are held by shared reference so every combatant using the
/// skill applies the very same definitions.
#[derive(Clone, Debug, PartialEq)]
pub struct SkillDef {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub kind: SkillKind,
    pub tags: SkillTags,
    pub element: Element,
    pub targeting: SkillTargeting,
    /// Turns a non-exempt slot waits after use.
    pub base_cooldown: u32,
    /// Never gated by cooldown, wherever it sits in the loadout.
    pub cooldown_exempt: bool,

    /// Multiplier on the user's ATK.
    pub power: f32,
    pub flat_damage: i32,
    /// Healing as a fraction of the user's ATK.
    pub heal_ratio: f32,

    pub effects: Vec<Arc<StatusEffectDef>>,
    /// Percent chance in `[0, 100]`, rolled once per use.
    pub apply_chance: u32,
    pub apply_duration: u32,
    pub apply_stacks: u32,
}

impl SkillDef {
    pub fn new(id: impl Into<String>, tags: SkillTags) -> Self {
        let id = id.into();
        Self {
            display_name: id.clone(),
            id,
            tags,
            ..Self::default()
        }
    }

    /// A single-target damage skill scaled off ATK.
    pub fn attack(id: impl Into<String>, power: f32) -> Self {
        Self::new(id, SkillTags::SINGLE_TARGET | SkillTags::DAMAGE).with_power(power)
    }

    pub fn with_power(mut self, power: f32) -> Self {
        self.power = power;
        self
    }

    pub fn with_flat_damage(mut self, flat: i32) -> Self {
        self.flat_damage = flat;
        self
    }

    pub fn with_heal_ratio(mut self, ratio: f32) -> Self {
        self.heal_ratio = ratio;
        self.tags |= SkillTags::HEAL;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.base_cooldown = turns;
        self
    }

    pub fn with_targeting(mut self, targeting: SkillTargeting) -> Self {
        self.targeting = targeting;
        self
    }

    pub fn with_kind(mut self, kind: SkillKind) -> Self {
        self.kind = kind;
        self
    }

    /// Status effects applied on a successful roll.
    pub fn with_effects(
        mut self,
        effects: impl IntoIterator<Item = Arc<StatusEffectDef>>,
        chance: u32,
        duration: u32,
        stacks: u32,
    ) -> Self {
        self.effects = effects.into_iter().collect();
        self.apply_chance = chance.min(100);
        self.apply_duration = duration;
        self.apply_stacks = stacks;
        self.tags |= SkillTags::APPLY_STATUS;
        self
    }

    /// Identity used for bridge lookups: id, else display name, else kind.
    pub fn key(&self) -> String {
        if !self.id.is_empty() {
            self.id.clone()
        } else if !self.display_name.is_empty() {
            self.display_name.clone()
        } else {
            self.kind.to_string()
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.kind == SkillKind::Active
    }
}

impl Default for SkillDef {
    fn default() -> Self {
        Self {
            id: String::new(),
            display_name: String::new(),
            description: String::new(),
            kind: SkillKind::Active,
            tags: SkillTags::empty(),
            element: Element::Neutral,
            targeting: SkillTargeting::default(),
            base_cooldown: 0,
            cooldown_exempt: false,
            power: 1.0,
            flat_damage: 0,
            heal_ratio: 0.0,
            effects: Vec::new(),
            apply_chance: 100,
            apply_duration: 2,
            apply_stacks: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_falls_back_through_name_and_kind() {
        let mut skill = SkillDef::attack("fireball", 2.0);
        skill.display_name = "Fireball".into();
        assert_eq!(skill.key(), "fireball");

        skill.id.clear();
        assert_eq!(skill.key(), "Fireball");

        skill.display_name.clear();
        assert_eq!(skill.key(), "active");
    }

    #[test]
    fn targeting_limits() {
        assert_eq!(SkillTargeting::single_enemy().limit(), Some(1));
        assert_eq!(SkillTargeting::new(TargetTeam::Enemy, 0).limit(), None);
        assert_eq!(SkillTargeting::new(TargetTeam::AllEnemies, 1).limit(), None);
        assert_eq!(SkillTargeting::new(TargetTeam::AllAllies, 2).limit(), Some(2));
        assert_eq!(SkillTargeting::new(TargetTeam::SelfOnly, 0).limit(), Some(1));
    }
}
