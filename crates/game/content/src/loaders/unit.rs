//! Unit catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defs::UnitDef;
use crate::loaders::{LoadResult, read_file};

/// Unit catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub units: Vec<UnitDef>,
}

/// Loader for the unit catalog.
pub struct UnitLoader;

impl UnitLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<UnitDef>> {
        let content = read_file(path)?;
        let catalog: UnitCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;

        Ok(catalog.units)
    }
}
