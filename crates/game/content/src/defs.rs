//! Authored content records.
//!
//! Records reference each other by string id (a unit lists skill ids, a skill
//! lists status effect ids). [`Catalog`](crate::Catalog) resolves the ids into
//! shared core definitions.

use battle_core::{ApplyTo, Control, Element, SkillKind, SkillTags, SkillTargeting, StatBlock, Team};

/// A skill as written in a catalog file.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillRecord {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub kind: SkillKind,
    pub tags: SkillTags,
    pub element: Element,
    pub targeting: SkillTargeting,
    pub base_cooldown: u32,
    pub cooldown_exempt: bool,
    pub power: f32,
    pub flat_damage: i32,
    pub heal_ratio: f32,
    /// Status effect ids.
    pub effects: Vec<String>,
    pub apply_chance: u32,
    pub apply_duration: u32,
    pub apply_stacks: u32,
}

impl Default for SkillRecord {
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

/// A unit template. The first listed skill becomes the basic skill.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitDef {
    pub id: String,
    pub display_name: String,
    pub rarity: u8,
    pub role: String,
    pub base_stats: StatBlock,
    /// Skill ids, in slot order.
    pub skills: Vec<String>,
    /// Only honored for the player side; spawned enemies are always automatic.
    pub control: Control,
}

impl UnitDef {
    pub fn name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.id
        } else {
            &self.display_name
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpawnDef {
    pub unit: String,
    pub count: u32,
    pub team: Team,
}

impl Default for SpawnDef {
    fn default() -> Self {
        Self {
            unit: String::new(),
            count: 1,
            team: Team::Enemy,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WaveDef {
    pub spawns: Vec<SpawnDef>,
}

impl WaveDef {
    /// Combatants this wave adds, counting every spawn entry.
    pub fn size(&self) -> u32 {
        self.spawns.iter().map(|s| s.count).sum()
    }
}

/// An ordered sequence of waves fought by the same party.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StageDef {
    pub id: String,
    pub display_name: String,
    /// Unit ids of the default player party.
    pub party: Vec<String>,
    pub waves: Vec<WaveDef>,
}

/// A status bridge rule as written in a catalog file.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BridgeRuleDef {
    pub skill_key: String,
    pub apply_to: ApplyTo,
    pub chance: u32,
    pub duration: u32,
    pub stacks: u32,
    /// Status effect ids.
    pub effects: Vec<String>,
}

impl Default for BridgeRuleDef {
    fn default() -> Self {
        Self {
            skill_key: String::new(),
            apply_to: ApplyTo::Targets,
            chance: 100,
            duration: 2,
            stacks: 1,
            effects: Vec::new(),
        }
    }
}
