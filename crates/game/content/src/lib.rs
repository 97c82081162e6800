//! Data-driven battle content.
//!
//! This crate holds the authored side of a battle and the loaders for it:
//! - Status effects, skills and units (RON)
//! - Stages made of enemy waves (RON, one file per stage)
//! - Skill-keyed status bridge rules (RON)
//! - Battle configuration (TOML)
//!
//! Loaded records reference each other by id; [`Catalog`] resolves them into
//! shared `battle-core` definitions and builds rosters from them.

pub mod catalog;
pub mod defs;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{Catalog, CatalogError};
pub use defs::{BridgeRuleDef, SkillRecord, SpawnDef, StageDef, UnitDef, WaveDef};

#[cfg(feature = "loaders")]
pub use loaders::{
    BridgeLoader, ConfigLoader, ContentFactory, LoadResult, SkillLoader, StageLoader,
    StatusLoader, UnitLoader,
};
