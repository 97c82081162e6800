//! Scheduler states and the values a scheduling pass reports.

use crate::state::{CombatantId, Team};

/// How an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Outcome {
    /// No enemy is left standing.
    Victory,
    /// No player is left standing.
    Defeat,
    /// Both sides fell in the same check.
    MutualWipe,
}

impl Outcome {
    pub fn winner(self) -> Option<Team> {
        match self {
            Outcome::Victory => Some(Team::Player),
            Outcome::Defeat => Some(Team::Enemy),
            Outcome::MutualWipe => None,
        }
    }
}

/// Turn-loop state machine.
///
/// ```text
/// Idle ──set_units──► SelectingActor ──► AdvancingGauges ──► SelectingActor
///                          │
///                          ▼
///               ExecutingAction ◄── AwaitingPlayerAction (discrete, manual)
///                          │
///                          ▼
///                     EndingTurn ──► SelectingActor | Terminal
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    /// No roster installed.
    #[default]
    Idle,
    AdvancingGauges,
    SelectingActor,
    AwaitingPlayerAction {
        actor: CombatantId,
    },
    ExecutingAction {
        actor: CombatantId,
    },
    EndingTurn {
        actor: CombatantId,
    },
    Terminal(Outcome),
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Terminal(_))
    }
}

/// Action a manually controlled actor will take once the caller submits
/// (or gives up and resolves the default).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingAction {
    pub actor: CombatantId,
    pub skill_index: usize,
    pub targets: Vec<CombatantId>,
}

/// Result of one scheduling pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    /// No roster installed.
    Idle,
    /// Time advanced but nobody was ready.
    Waiting,
    /// A full turn was taken.
    Acted { actor: CombatantId },
    /// A manual actor's turn began and the loop is suspended.
    AwaitingPlayer { actor: CombatantId },
    /// Nobody alive can ever fill their gauge.
    Stalled,
    Finished(Outcome),
}
