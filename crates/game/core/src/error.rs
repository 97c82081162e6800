//! Common error infrastructure for battle-core.
//!
//! The simulation never aborts an encounter: malformed input is recovered
//! locally (clamped index, fallback target, skipped turn). Errors only surface
//! at the inbound boundary, where an external caller hands the scheduler
//! something it must refuse. Domain-specific errors live next to the
//! operation that produces them and implement [`BattleError`].

use crate::state::CombatantId;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative input.
    ///
    /// Examples: submitting an action while the loop is still advancing gauges
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: awaited actor died or left the roster
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - battle state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all battle-core errors.
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the combatant the error is about, if any.
    fn actor(&self) -> Option<CombatantId> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
