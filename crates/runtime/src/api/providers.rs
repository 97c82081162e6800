//! Asynchronous abstraction for sourcing player intent.
//!
//! When a manually controlled combatant's turn suspends the scheduler, the
//! runtime asks a [`PlayerActionProvider`] what to do. Implementations can be
//! a terminal prompt, a UI, a scripted fixture or an autopilot.

use async_trait::async_trait;
use battle_core::{CombatantId, PendingAction};

use super::errors::Result;
use super::handle::BattleSnapshot;

/// Everything a provider needs to decide.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// The suspended turn, pre-filled with the default choice.
    pub pending: PendingAction,
    pub snapshot: BattleSnapshot,
}

impl ActionRequest {
    pub fn actor(&self) -> CombatantId {
        self.pending.actor
    }
}

/// A player's answer: a skill slot and the requested targets. Invalid input
/// is repaired by the scheduler, not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerAction {
    pub skill_index: usize,
    pub targets: Vec<CombatantId>,
}

impl From<&PendingAction> for PlayerAction {
    fn from(pending: &PendingAction) -> Self {
        Self {
            skill_index: pending.skill_index,
            targets: pending.targets.clone(),
        }
    }
}

#[async_trait]
pub trait PlayerActionProvider: Send + Sync {
    async fn provide_action(&self, request: &ActionRequest) -> Result<PlayerAction>;
}

/// Always takes the default action: basic skill on the default target.
pub struct DefaultActionProvider;

#[async_trait]
impl PlayerActionProvider for DefaultActionProvider {
    async fn provide_action(&self, request: &ActionRequest) -> Result<PlayerAction> {
        Ok(PlayerAction::from(&request.pending))
    }
}
