//! Stage loader.
//!
//! One stage per file, so a data directory can hold any number of them.

use std::path::Path;

use crate::defs::StageDef;
use crate::loaders::{LoadResult, read_file};

/// Loader for stage definitions.
pub struct StageLoader;

impl StageLoader {
    /// Load a single stage from a RON file. A stage without an `id` takes the
    /// file stem.
    pub fn load(path: &Path) -> LoadResult<StageDef> {
        let content = read_file(path)?;
        let mut stage: StageDef = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse stage RON {}: {}", path.display(), e))?;

        if stage.id.is_empty() {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                stage.id = stem.to_string();
            }
        }
        Ok(stage)
    }

    /// Load every `*.ron` stage in `dir`, ordered by file name.
    pub fn load_dir(dir: &Path) -> LoadResult<Vec<StageDef>> {
        let entries = std::fs::read_dir(dir)
            .map_err(|e| anyhow::anyhow!("Failed to read stage directory {}: {}", dir.display(), e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| anyhow::anyhow!("Failed to read stage directory {}: {}", dir.display(), e))?
                .path();
            if path.extension().is_some_and(|ext| ext == "ron") {
                paths.push(path);
            }
        }
        paths.sort();

        paths.iter().map(|p| Self::load(p)).collect()
    }
}
