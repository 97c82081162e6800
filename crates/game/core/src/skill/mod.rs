//! Skills: catalog entries, per-combatant slots with cooldowns, target
//! resolution and execution against the roster.
mod def;
mod execute;
mod slot;
mod targeting;

pub use def::{Element, SkillDef, SkillKind, SkillTags, SkillTargeting, TargetTeam};
pub use execute::{SkillOutcome, execute_skill};
pub use slot::{SkillInstance, TimedAction};
pub use targeting::resolve_targets;
