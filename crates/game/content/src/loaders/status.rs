//! Status effect catalog loader.

use std::path::Path;

use battle_core::StatusEffectDef;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Status effect catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusCatalog {
    pub effects: Vec<StatusEffectDef>,
}

/// Loader for the status effect catalog.
pub struct StatusLoader;

impl StatusLoader {
    /// Load status effect definitions from a RON file containing a
    /// `StatusCatalog`.
    pub fn load(path: &Path) -> LoadResult<Vec<StatusEffectDef>> {
        let content = read_file(path)?;
        let catalog: StatusCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse status catalog RON: {}", e))?;

        Ok(catalog.effects)
    }
}
