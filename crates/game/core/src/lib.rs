//! Deterministic turn-based combat simulation.
//!
//! `battle-core` holds the canonical rules: stat blocks, status effects,
//! skills, damage resolution, the status bridge and the ATB turn scheduler.
//! It performs no I/O and reads no clock. Everything observable leaves through
//! an [`EventSink`], and every probability check goes through an
//! [`RngOracle`], so the same seed and inputs replay the same encounter.
//! All roster mutation flows through [`TurnScheduler`].
pub mod bridge;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod skill;
pub mod state;
pub mod stats;
pub mod status;

pub use bridge::{ApplyTo, BridgeRule, StatusBridge};
pub use combat::{calculate_damage, resolve_damage, roll_crit};
pub use config::{BattleConfig, SchedulingMode};
pub use engine::{Outcome, PendingAction, Phase, StepOutcome, SubmitError, TurnScheduler};
pub use env::{ActionRolls, FixedRoll, PcgRng, RngOracle, RollContext, compute_seed};
pub use error::{BattleError, ErrorSeverity};
pub use events::{BattleEvent, EffectChange, EventSink, NullSink};
pub use skill::{
    Element, SkillDef, SkillInstance, SkillKind, SkillOutcome, SkillTags, SkillTargeting,
    TargetTeam, TimedAction, execute_skill, resolve_targets,
};
pub use state::{Combatant, CombatantId, Control, Roster, Team};
pub use stats::{StatBlock, StatMultipliers};
pub use status::{
    ApplyOutcome, DotHit, StatusEffectDef, StatusEffectInstance, StatusLedger, StatusType,
    TickTiming,
};
