//! Errors surfaced at the scheduler's inbound boundary.

use crate::error::{BattleError, ErrorSeverity};
use crate::state::CombatantId;

/// Why a submitted player action was refused.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubmitError {
    #[error("no player action is pending")]
    NotAwaiting,

    #[error("awaited actor {actor} can no longer act")]
    ActorUnavailable { actor: CombatantId },
}

impl BattleError for SubmitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // try again once a manual actor's turn begins
            SubmitError::NotAwaiting => ErrorSeverity::Recoverable,
            SubmitError::ActorUnavailable { .. } => ErrorSeverity::Validation,
        }
    }

    fn actor(&self) -> Option<CombatantId> {
        match self {
            SubmitError::NotAwaiting => None,
            SubmitError::ActorUnavailable { actor } => Some(*actor),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SubmitError::NotAwaiting => "SUBMIT_NOT_AWAITING",
            SubmitError::ActorUnavailable { .. } => "SUBMIT_ACTOR_UNAVAILABLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        let stale = SubmitError::ActorUnavailable { actor: CombatantId(3) };
        assert_eq!(stale.severity(), ErrorSeverity::Validation);
        assert_eq!(stale.actor(), Some(CombatantId(3)));
        assert_eq!(stale.to_string(), "awaited actor #3 can no longer act");
        assert!(SubmitError::NotAwaiting.severity().is_recoverable());
    }
}
