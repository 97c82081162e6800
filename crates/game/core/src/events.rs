//! Outbound notifications raised by the simulation.
//!
//! The core pushes every observable change into an [`EventSink`] supplied by
//! the caller. Nothing in the core reads events back, so correctness never
//! depends on anyone listening; [`NullSink`] discards them outright.

use crate::state::CombatantId;

/// Snapshot of a status-effect instance at the moment it changed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EffectChange {
    pub owner: CombatantId,
    pub effect: String,
    pub stacks: u32,
    pub remaining_turns: u32,
    pub source: Option<CombatantId>,
}

/// Events raised by the scheduler, combatants and status ledgers.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    /// The roster was replaced; ids are listed in roster order.
    RosterChanged { combatants: Vec<CombatantId> },

    /// A combatant's gauge filled and its turn began.
    TurnStarted { actor: CombatantId },

    /// A manually controlled combatant is waiting for a submitted action.
    PlayerTurnBegan { actor: CombatantId },

    /// A control effect made the actor skip its action.
    ActionPrevented { actor: CombatantId },

    /// A skill was executed against the resolved targets.
    SkillUsed {
        actor: CombatantId,
        skill: String,
        slot: usize,
        targets: Vec<CombatantId>,
    },

    Damaged {
        target: CombatantId,
        amount: i32,
        hp: i32,
        source: Option<CombatantId>,
        skill: Option<String>,
        crit: bool,
    },

    Healed {
        target: CombatantId,
        amount: i32,
        hp: i32,
        source: Option<CombatantId>,
        skill: Option<String>,
    },

    /// HP reached zero. Raised exactly once per combatant.
    Died {
        target: CombatantId,
        killer: Option<CombatantId>,
    },

    EffectAdded(EffectChange),
    EffectUpdated(EffectChange),
    EffectRemoved(EffectChange),

    TurnEnded { actor: CombatantId },

    /// The shared target selection changed (`None` when cleared).
    TargetChanged { target: Option<CombatantId> },

    /// A submitted action was refused.
    ActionRejected {
        actor: Option<CombatantId>,
        reason: String,
    },

    EnemiesDefeated,
    PlayersDefeated,
}

impl BattleEvent {
    /// Returns true for the two terminal notifications.
    pub fn is_terminal(&self) -> bool {
        matches!(self, BattleEvent::EnemiesDefeated | BattleEvent::PlayersDefeated)
    }
}

/// Observer interface at the system boundary.
pub trait EventSink {
    fn emit(&mut self, event: BattleEvent);
}

impl EventSink for Vec<BattleEvent> {
    fn emit(&mut self, event: BattleEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: BattleEvent) {
        (**self).emit(event);
    }
}

/// Sink that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: BattleEvent) {}
}
