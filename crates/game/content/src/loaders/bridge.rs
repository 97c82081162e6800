//! Status bridge rule loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defs::BridgeRuleDef;
use crate::loaders::{LoadResult, read_file};

/// Bridge rule table structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeTable {
    pub rules: Vec<BridgeRuleDef>,
}

/// Loader for skill-keyed status rules.
pub struct BridgeLoader;

impl BridgeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<BridgeRuleDef>> {
        let content = read_file(path)?;
        let table: BridgeTable = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse bridge rules RON: {}", e))?;

        Ok(table.rules)
    }
}
