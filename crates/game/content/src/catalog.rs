//! Resolved content registry.
//!
//! A [`Catalog`] owns one shared [`StatusEffectDef`] / [`SkillDef`] per id, so
//! every combatant built from it applies the very same definitions. Entries
//! must be added bottom-up: effects, then skills and bridge rules, then units,
//! then stages.

use std::collections::HashMap;
use std::sync::Arc;

use battle_core::{BridgeRule, Combatant, Control, SkillDef, StatusBridge, StatusEffectDef, Team};

use crate::defs::{BridgeRuleDef, SkillRecord, StageDef, UnitDef};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },

    #[error("'{owner}' references unknown status effect '{effect}'")]
    UnknownEffect { owner: String, effect: String },

    #[error("unit '{unit}' references unknown skill '{skill}'")]
    UnknownSkill { unit: String, skill: String },

    #[error("unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unknown stage '{0}'")]
    UnknownStage(String),

    #[error("stage '{stage}' has no wave {wave}")]
    UnknownWave { stage: String, wave: usize },

    #[error("{kind} entry is missing an id")]
    MissingId { kind: &'static str },
}

#[derive(Clone, Debug, Default)]
pub struct Catalog {
    effects: HashMap<String, Arc<StatusEffectDef>>,
    skills: HashMap<String, Arc<SkillDef>>,
    units: HashMap<String, UnitDef>,
    stages: Vec<StageDef>,
    bridge_rules: Vec<BridgeRule>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    // ===== registration =====

    pub fn add_effect(&mut self, def: StatusEffectDef) -> Result<Arc<StatusEffectDef>, CatalogError> {
        if def.id.is_empty() {
            return Err(CatalogError::MissingId { kind: "status effect" });
        }
        if self.effects.contains_key(&def.id) {
            return Err(CatalogError::Duplicate {
                kind: "status effect",
                id: def.id,
            });
        }
        let def = Arc::new(def);
        self.effects.insert(def.id.clone(), Arc::clone(&def));
        Ok(def)
    }

    /// Resolves a skill record's effect ids and registers the result.
    pub fn add_skill(&mut self, record: SkillRecord) -> Result<Arc<SkillDef>, CatalogError> {
        if record.id.is_empty() {
            return Err(CatalogError::MissingId { kind: "skill" });
        }
        if self.skills.contains_key(&record.id) {
            return Err(CatalogError::Duplicate {
                kind: "skill",
                id: record.id,
            });
        }
        let effects = self.resolve_effects(&record.id, &record.effects)?;
        let display_name = if record.display_name.is_empty() {
            record.id.clone()
        } else {
            record.display_name
        };

        let mut def = SkillDef {
            id: record.id,
            display_name,
            description: record.description,
            kind: record.kind,
            tags: record.tags,
            element: record.element,
            targeting: record.targeting,
            base_cooldown: record.base_cooldown,
            cooldown_exempt: record.cooldown_exempt,
            power: record.power,
            flat_damage: record.flat_damage,
            heal_ratio: record.heal_ratio,
            ..SkillDef::default()
        };
        if !effects.is_empty() {
            def = def.with_effects(
                effects,
                record.apply_chance,
                record.apply_duration,
                record.apply_stacks,
            );
        }

        let def = Arc::new(def);
        self.skills.insert(def.id.clone(), Arc::clone(&def));
        Ok(def)
    }

    pub fn add_bridge_rule(&mut self, record: BridgeRuleDef) -> Result<(), CatalogError> {
        let effects = self.resolve_effects(&record.skill_key, &record.effects)?;
        if !self.skills.contains_key(&record.skill_key) {
            tracing::warn!(
                target: "battle::content",
                skill = %record.skill_key,
                "bridge rule keyed on a skill the catalog does not define"
            );
        }
        let mut rule = BridgeRule::new(record.skill_key, effects);
        rule.apply_to = record.apply_to;
        rule.chance = record.chance.min(100);
        rule.duration = record.duration;
        rule.stacks = record.stacks;
        self.bridge_rules.push(rule);
        Ok(())
    }

    pub fn add_unit(&mut self, unit: UnitDef) -> Result<(), CatalogError> {
        if unit.id.is_empty() {
            return Err(CatalogError::MissingId { kind: "unit" });
        }
        if self.units.contains_key(&unit.id) {
            return Err(CatalogError::Duplicate {
                kind: "unit",
                id: unit.id,
            });
        }
        if let Some(missing) = unit.skills.iter().find(|s| !self.skills.contains_key(*s)) {
            return Err(CatalogError::UnknownSkill {
                unit: unit.id.clone(),
                skill: missing.clone(),
            });
        }
        self.units.insert(unit.id.clone(), unit);
        Ok(())
    }

    pub fn add_stage(&mut self, stage: StageDef) -> Result<(), CatalogError> {
        if stage.id.is_empty() {
            return Err(CatalogError::MissingId { kind: "stage" });
        }
        if self.stage(&stage.id).is_some() {
            return Err(CatalogError::Duplicate {
                kind: "stage",
                id: stage.id,
            });
        }
        let referenced = stage
            .party
            .iter()
            .chain(stage.waves.iter().flat_map(|w| w.spawns.iter().map(|s| &s.unit)));
        for unit in referenced {
            if !self.units.contains_key(unit) {
                return Err(CatalogError::UnknownUnit(unit.clone()));
            }
        }
        self.stages.push(stage);
        Ok(())
    }

    fn resolve_effects(
        &self,
        owner: &str,
        ids: &[String],
    ) -> Result<Vec<Arc<StatusEffectDef>>, CatalogError> {
        ids.iter()
            .map(|id| {
                self.effects
                    .get(id)
                    .cloned()
                    .ok_or_else(|| CatalogError::UnknownEffect {
                        owner: owner.to_string(),
                        effect: id.clone(),
                    })
            })
            .collect()
    }

    // ===== lookup =====

    pub fn effect(&self, id: &str) -> Option<&Arc<StatusEffectDef>> {
        self.effects.get(id)
    }

    pub fn skill(&self, id: &str) -> Option<&Arc<SkillDef>> {
        self.skills.get(id)
    }

    pub fn unit(&self, id: &str) -> Option<&UnitDef> {
        self.units.get(id)
    }

    pub fn stage(&self, id: &str) -> Option<&StageDef> {
        self.stages.iter().find(|s| s.id == id)
    }

    /// Stages in registration order.
    pub fn stages(&self) -> &[StageDef] {
        &self.stages
    }

    pub fn bridge(&self) -> StatusBridge {
        StatusBridge::new(self.bridge_rules.clone())
    }

    // ===== roster assembly =====

    /// Builds a fresh combatant from a unit template.
    pub fn spawn(&self, unit_id: &str, team: Team) -> Result<Combatant, CatalogError> {
        let unit = self
            .units
            .get(unit_id)
            .ok_or_else(|| CatalogError::UnknownUnit(unit_id.to_string()))?;
        Ok(self.build(unit, unit.name().to_string(), team))
    }

    /// The player party: one combatant per unit id, in order.
    pub fn party(&self, unit_ids: &[String]) -> Result<Vec<Combatant>, CatalogError> {
        unit_ids
            .iter()
            .map(|id| self.spawn(id, Team::Player))
            .collect()
    }

    /// Full roster for one wave of a stage: the party first, then the spawns
    /// in authored order. Repeated spawns get a numbered name.
    pub fn wave_roster(
        &self,
        stage_id: &str,
        wave: usize,
        party: &[String],
    ) -> Result<Vec<Combatant>, CatalogError> {
        let stage = self
            .stage(stage_id)
            .ok_or_else(|| CatalogError::UnknownStage(stage_id.to_string()))?;
        let wave_def = stage.waves.get(wave).ok_or_else(|| CatalogError::UnknownWave {
            stage: stage_id.to_string(),
            wave,
        })?;

        let mut roster = self.party(party)?;
        for spawn in &wave_def.spawns {
            let unit = self
                .units
                .get(&spawn.unit)
                .ok_or_else(|| CatalogError::UnknownUnit(spawn.unit.clone()))?;
            for n in 0..spawn.count {
                let name = if spawn.count > 1 {
                    format!("{} {}", unit.name(), n + 1)
                } else {
                    unit.name().to_string()
                };
                roster.push(self.build(unit, name, spawn.team));
            }
        }
        Ok(roster)
    }

    fn build(&self, unit: &UnitDef, name: String, team: Team) -> Combatant {
        let control = match team {
            Team::Player => unit.control,
            Team::Enemy => Control::Auto,
        };
        // Skill ids were checked when the unit was registered.
        let skills = unit.skills.iter().filter_map(|id| self.skills.get(id).cloned());
        Combatant::new(name, team, unit.base_stats)
            .with_unit_id(unit.id.clone())
            .with_control(control)
            .with_skills(skills)
    }
}
