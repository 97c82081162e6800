//! Skill catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defs::SkillRecord;
use crate::loaders::{LoadResult, read_file};

/// Skill catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCatalog {
    pub skills: Vec<SkillRecord>,
}

/// Loader for the skill catalog.
pub struct SkillLoader;

impl SkillLoader {
    /// Load skill records from a RON file.
    ///
    /// Status effects are still referenced by id; resolve them through
    /// [`Catalog::add_skill`](crate::Catalog::add_skill).
    pub fn load(path: &Path) -> LoadResult<Vec<SkillRecord>> {
        let content = read_file(path)?;
        let catalog: SkillCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse skill catalog RON: {}", e))?;

        Ok(catalog.skills)
    }
}
