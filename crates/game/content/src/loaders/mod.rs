//! Content loaders for reading battle data from files.
//!
//! Catalogs are RON, the battle configuration is TOML. Loaders return plain
//! records; [`ContentFactory`] assembles them into a [`Catalog`](crate::Catalog).

pub mod bridge;
pub mod config;
pub mod factory;
pub mod skill;
pub mod stage;
pub mod status;
pub mod unit;

pub use bridge::BridgeLoader;
pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use skill::SkillLoader;
pub use stage::StageLoader;
pub use status::StatusLoader;
pub use unit::UnitLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
