//! Turn scheduling.
//!
//! The [`TurnScheduler`] owns the roster for the lifetime of an encounter and
//! is the only thing that mutates it. It is driven by external ticks: every
//! call to [`TurnScheduler::tick`] runs one scheduling pass and takes at most
//! one turn, so no two combatants ever act at once.
//!
//! # Per-turn sequence
//!
//! 1. `Tick(PerTurnStart)` for the actor
//! 2. non-basic cooldowns count down
//! 3. if a control effect prevents action, jump to 6
//! 4. choose the action (suspend for a manual actor in discrete-step mode)
//! 5. execute the skill, then the status bridge
//! 6. gauge back to 0, `Tick(PerTurnEnd)`
//! 7. terminal check
//! 8. drop the preferred target if it died

mod errors;
mod gauge;
mod phase;
mod turn;

pub use errors::SubmitError;
pub use phase::{Outcome, PendingAction, Phase, StepOutcome};

use crate::bridge::StatusBridge;
use crate::config::{BattleConfig, SchedulingMode};
use crate::env::{PcgRng, RngOracle};
use crate::events::{BattleEvent, EventSink};
use crate::state::{Combatant, CombatantId, Roster, Team};

/// Owns the roster and drives the turn loop.
pub struct TurnScheduler {
    config: BattleConfig,
    roster: Roster,
    bridge: StatusBridge,
    oracle: Box<dyn RngOracle>,

    phase: Phase,
    pending: Option<PendingAction>,
    current_actor: Option<CombatantId>,
    preferred_target: Option<CombatantId>,

    next_id: u32,
    /// Executed actions; part of every roll seed.
    nonce: u64,
    /// Simulated seconds since the roster was installed.
    elapsed: f32,
    /// Simulated time not yet consumed by `PerSecond` ticks.
    second_carry: f32,
}

impl TurnScheduler {
    pub fn new(config: BattleConfig) -> Self {
        Self {
            config,
            roster: Roster::new(),
            bridge: StatusBridge::default(),
            oracle: Box::new(PcgRng),
            phase: Phase::Idle,
            pending: None,
            current_actor: None,
            preferred_target: None,
            next_id: 0,
            nonce: 0,
            elapsed: 0.0,
            second_carry: 0.0,
        }
    }

    pub fn with_bridge(mut self, bridge: StatusBridge) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn with_oracle(mut self, oracle: Box<dyn RngOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    // ===== accessors =====

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn mode(&self) -> SchedulingMode {
        self.config.mode
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    pub fn current_actor(&self) -> Option<CombatantId> {
        self.current_actor
    }

    pub fn preferred_target(&self) -> Option<CombatantId> {
        self.preferred_target
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    // ===== inbound contract =====

    /// Replaces the whole roster.
    ///
    /// Every combatant gets a fresh id (ids are never reused), every gauge
    /// starts at 0, and pending action, current actor and preferred target
    /// are cleared. Returns the assigned ids in roster order.
    pub fn set_units(
        &mut self,
        units: Vec<Combatant>,
        sink: &mut impl EventSink,
    ) -> Vec<CombatantId> {
        let mut units = units;
        for unit in units.iter_mut() {
            unit.id = CombatantId(self.next_id);
            self.next_id = self.next_id.wrapping_add(1);
            unit.reset_gauge();
        }

        self.roster = Roster::from_vec(units);
        self.pending = None;
        self.current_actor = None;
        self.elapsed = 0.0;
        self.second_carry = 0.0;
        if self.preferred_target.take().is_some() {
            sink.emit(BattleEvent::TargetChanged { target: None });
        }
        self.phase = if self.roster.is_empty() {
            Phase::Idle
        } else {
            Phase::SelectingActor
        };

        let ids = self.roster.ids();
        tracing::info!(
            target: "battle::scheduler",
            combatants = ids.len(),
            players = self.roster.living_count(Team::Player),
            enemies = self.roster.living_count(Team::Enemy),
            "roster installed"
        );
        sink.emit(BattleEvent::RosterChanged {
            combatants: ids.clone(),
        });
        ids
    }

    /// Sets or clears the shared target selection.
    ///
    /// Only a living member of the roster can be selected; anything else is
    /// refused and `false` returned.
    pub fn set_preferred_target(
        &mut self,
        target: Option<CombatantId>,
        sink: &mut impl EventSink,
    ) -> bool {
        if target.is_some_and(|id| !self.roster.is_alive(id)) {
            tracing::warn!(target: "battle::scheduler", selection = ?target, "ignoring invalid target selection");
            return false;
        }
        if self.preferred_target != target {
            self.preferred_target = target;
            sink.emit(BattleEvent::TargetChanged { target });
        }
        true
    }

    /// One scheduling pass with the configured fixed time step.
    pub fn step(&mut self, sink: &mut impl EventSink) -> StepOutcome {
        self.tick(self.config.fixed_dt, sink)
    }

    /// One scheduling pass.
    ///
    /// In continuous mode every gauge advances by `dt` and the first ready
    /// combatant in roster order acts. In discrete-step mode `dt` is ignored:
    /// time jumps to the moment the next gauge fills and the highest gauge
    /// acts. Either way at most one turn is taken.
    pub fn tick(&mut self, dt: f32, sink: &mut impl EventSink) -> StepOutcome {
        if let Phase::Terminal(outcome) = self.phase {
            return StepOutcome::Finished(outcome);
        }
        if self.roster.is_empty() {
            self.phase = Phase::Idle;
            return StepOutcome::Idle;
        }

        self.prune_stale_state(sink);
        if let Some(pending) = &self.pending {
            return StepOutcome::AwaitingPlayer {
                actor: pending.actor,
            };
        }
        if let Phase::Terminal(outcome) = self.phase {
            return StepOutcome::Finished(outcome);
        }

        let next = match self.config.mode {
            SchedulingMode::Continuous => self.advance_continuous(dt, sink),
            SchedulingMode::DiscreteStep => self.advance_discrete(sink),
        };
        if let Phase::Terminal(outcome) = self.phase {
            return StepOutcome::Finished(outcome);
        }

        match next {
            Ok(Some(index)) => self.take_turn(index, sink),
            Ok(None) => StepOutcome::Waiting,
            Err(outcome) => outcome,
        }
    }

    /// Hands the pending manual action to the scheduler and finishes the turn.
    ///
    /// An out-of-range index is clamped, a slot still on cooldown falls back
    /// to the basic skill, and invalid targets are replaced by the default
    /// ones. Refused (with an `ActionRejected` event) when nothing is pending
    /// or the awaited actor is gone; in the latter case the turn is abandoned.
    pub fn submit_player_action(
        &mut self,
        skill_index: usize,
        targets: Vec<CombatantId>,
        sink: &mut impl EventSink,
    ) -> Result<(), SubmitError> {
        let Some(pending) = self.pending.as_mut() else {
            tracing::warn!(target: "battle::scheduler", skill_index, "player action submitted while none is pending");
            sink.emit(BattleEvent::ActionRejected {
                actor: None,
                reason: SubmitError::NotAwaiting.to_string(),
            });
            return Err(SubmitError::NotAwaiting);
        };
        pending.skill_index = skill_index;
        pending.targets = targets;
        self.resolve_pending(sink)
    }

    /// Finishes the pending manual turn with whatever it currently holds
    /// (the basic skill against the default target unless narrowed).
    pub fn resolve_pending_default(&mut self, sink: &mut impl EventSink) -> Result<(), SubmitError> {
        if self.pending.is_none() {
            return Err(SubmitError::NotAwaiting);
        }
        self.resolve_pending(sink)
    }

    fn resolve_pending(&mut self, sink: &mut impl EventSink) -> Result<(), SubmitError> {
        let Some(pending) = self.pending.take() else {
            return Err(SubmitError::NotAwaiting);
        };
        let Some(index) = self
            .roster
            .index_of(pending.actor)
            .filter(|&i| self.roster.at(i).is_some_and(Combatant::is_alive))
        else {
            let err = SubmitError::ActorUnavailable {
                actor: pending.actor,
            };
            tracing::warn!(target: "battle::scheduler", actor = ?pending.actor, "rejecting action for unavailable actor");
            sink.emit(BattleEvent::ActionRejected {
                actor: Some(pending.actor),
                reason: err.to_string(),
            });
            self.abandon_turn(pending.actor, sink);
            return Err(err);
        };

        self.perform_action(index, pending.skill_index, &pending.targets, sink);
        self.end_turn(index, sink);
        Ok(())
    }

    /// Drops references into the roster that no longer resolve to a living
    /// combatant.
    fn prune_stale_state(&mut self, sink: &mut impl EventSink) {
        let stale_pending = self
            .pending
            .as_ref()
            .map(|p| p.actor)
            .filter(|&actor| !self.roster.is_alive(actor));
        if let Some(actor) = stale_pending {
            tracing::warn!(target: "battle::scheduler", actor = ?actor, "pending actor left the fight, abandoning turn");
            self.pending = None;
            self.abandon_turn(actor, sink);
        }
        if self.pending.is_none() && self.current_actor.is_some_and(|a| !self.roster.is_alive(a)) {
            self.current_actor = None;
        }
        self.clear_dead_target(sink);
    }

    fn clear_dead_target(&mut self, sink: &mut impl EventSink) {
        if self.preferred_target.is_some_and(|t| !self.roster.is_alive(t)) {
            self.preferred_target = None;
            sink.emit(BattleEvent::TargetChanged { target: None });
        }
    }

    /// Emits the terminal notifications if a side has been wiped out.
    fn check_terminal(&mut self, sink: &mut impl EventSink) -> Option<Outcome> {
        if self.roster.is_empty() {
            return None;
        }
        let enemies_down = self.roster.living_count(Team::Enemy) == 0;
        let players_down = self.roster.living_count(Team::Player) == 0;

        if enemies_down {
            sink.emit(BattleEvent::EnemiesDefeated);
        }
        if players_down {
            sink.emit(BattleEvent::PlayersDefeated);
        }
        let outcome = match (enemies_down, players_down) {
            (true, true) => Outcome::MutualWipe,
            (true, false) => Outcome::Victory,
            (false, true) => Outcome::Defeat,
            (false, false) => return None,
        };

        tracing::info!(target: "battle::scheduler", outcome = %outcome, elapsed = self.elapsed, "encounter finished");
        self.pending = None;
        self.current_actor = None;
        self.phase = Phase::Terminal(outcome);
        Some(outcome)
    }
}

impl std::fmt::Debug for TurnScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnScheduler")
            .field("mode", &self.config.mode)
            .field("phase", &self.phase)
            .field("combatants", &self.roster.len())
            .field("pending", &self.pending)
            .field("preferred_target", &self.preferred_target)
            .field("elapsed", &self.elapsed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
