//! Runtime orchestration for battle encounters.
//!
//! This crate puts the synchronous [`battle_core::TurnScheduler`] behind an
//! async worker task. Consumers embed [`Runtime`] to drive encounters, answer
//! player turns through a [`PlayerActionProvider`], and subscribe to events
//! through [`RuntimeHandle`]. [`StageController`] chains encounters into waves.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - [`stage`] runs stages wave by wave
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod events;
pub mod runtime;
pub mod stage;

mod workers;

pub use api::{
    ActionRequest, BattleSnapshot, DefaultActionProvider, PlayerAction, PlayerActionProvider,
    Result, RuntimeError, RuntimeHandle, StepReport,
};
pub use events::{Event, EventBus, FailureReason, StageEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use stage::{StageController, StageReport, StageResult};
