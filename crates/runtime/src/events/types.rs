//! Stage progression events.

use battle_core::CombatantId;
use serde::{Deserialize, Serialize};

/// Why a stage ended without being cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum FailureReason {
    /// Every player combatant fell.
    PartyDefeated,
    /// The last player and the last enemy fell in the same check.
    MutualWipe,
    /// Nobody left alive could ever act again.
    Stalled,
}

/// Events raised by the stage controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageEvent {
    /// A wave's roster was installed. `wave` is zero-based.
    WaveStarted {
        stage: String,
        wave: usize,
        total_waves: usize,
        combatants: Vec<CombatantId>,
        players: usize,
        enemies: usize,
    },

    /// Every wave was beaten.
    StageCleared { stage: String, waves: usize },

    StageFailed {
        stage: String,
        wave: usize,
        reason: FailureReason,
    },
}
