//! Content factory for building a catalog from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, StatusEffectDef};

use crate::catalog::Catalog;
use crate::defs::{BridgeRuleDef, SkillRecord, StageDef, UnitDef};
use crate::loaders::{
    BridgeLoader, ConfigLoader, LoadResult, SkillLoader, StageLoader, StatusLoader, UnitLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// ├── status_effects.ron
/// ├── skills.ron
/// ├── units.ron
/// ├── bridge.ron        (optional)
/// └── stages/
///     └── first_steps.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `battle.toml`, or the defaults when the
    /// file does not exist.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("battle.toml");
        if !path.exists() {
            tracing::debug!(target: "battle::content", path = %path.display(), "no battle.toml, using defaults");
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load status effects from `status_effects.ron`.
    pub fn load_status_effects(&self) -> LoadResult<Vec<StatusEffectDef>> {
        StatusLoader::load(&self.data_dir.join("status_effects.ron"))
    }

    /// Load skill records from `skills.ron`.
    pub fn load_skills(&self) -> LoadResult<Vec<SkillRecord>> {
        SkillLoader::load(&self.data_dir.join("skills.ron"))
    }

    /// Load unit templates from `units.ron`.
    pub fn load_units(&self) -> LoadResult<Vec<UnitDef>> {
        UnitLoader::load(&self.data_dir.join("units.ron"))
    }

    /// Load bridge rules from `bridge.ron`. The file is optional.
    pub fn load_bridge(&self) -> LoadResult<Vec<BridgeRuleDef>> {
        let path = self.data_dir.join("bridge.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        BridgeLoader::load(&path)
    }

    /// Load every stage under `stages/`.
    pub fn load_stages(&self) -> LoadResult<Vec<StageDef>> {
        StageLoader::load_dir(&self.data_dir.join("stages"))
    }

    /// Load a single stage from `stages/{stage_id}.ron`.
    pub fn load_stage(&self, stage_id: &str) -> LoadResult<StageDef> {
        let path = self.data_dir.join("stages").join(format!("{}.ron", stage_id));
        StageLoader::load(&path)
    }

    /// Load and cross-link every catalog file.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let mut catalog = Catalog::new();

        for effect in self.load_status_effects()? {
            catalog.add_effect(effect)?;
        }
        for skill in self.load_skills()? {
            catalog.add_skill(skill)?;
        }
        for rule in self.load_bridge()? {
            catalog.add_bridge_rule(rule)?;
        }
        for unit in self.load_units()? {
            catalog.add_unit(unit)?;
        }
        for stage in self.load_stages()? {
            catalog.add_stage(stage)?;
        }

        tracing::info!(
            target: "battle::content",
            dir = %self.data_dir.display(),
            stages = catalog.stages().len(),
            bridge_rules = catalog.bridge().rules().len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    /// The catalog shipped in the repository's `data/` directory.
    fn shipped() -> ContentFactory {
        ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../data"))
    }

    #[test]
    fn shipped_catalog_loads() {
        let catalog = shipped().load_catalog().unwrap();

        let fireball = catalog.skill("fireball").unwrap();
        assert_eq!(fireball.power, 2.0);
        assert_eq!(fireball.apply_chance, 80);
        assert_eq!(fireball.effects[0].id, "burn");

        let bash = catalog.skill("bash").unwrap();
        assert_eq!(bash.apply_chance, 60);
        assert_eq!(bash.apply_duration, 1);
        assert!(bash.effects[0].prevents_action);

        let stage = catalog.stage("first_steps").unwrap();
        assert_eq!(stage.waves.len(), 2);
        let roster = catalog.wave_roster(&stage.id, 0, &stage.party).unwrap();
        assert!(roster.len() > stage.party.len());
    }

    #[test]
    fn shipped_config_loads() {
        let config = shipped().load_config().unwrap();
        assert!(config.rate_factor > 0.0);
    }

    #[test]
    fn missing_optional_files_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        assert_eq!(factory.load_config().unwrap(), BattleConfig::default());
        assert!(factory.load_bridge().unwrap().is_empty());
        assert!(factory.load_skills().is_err());
    }
}
