//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for the
//! scheduler's inbound contract and for streaming events from specific topics.

use battle_core::{
    BattleEvent, Combatant, CombatantId, Outcome, PendingAction, Phase, Roster, SchedulingMode,
    StepOutcome, TurnScheduler,
};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// What one scheduling pass did.
#[derive(Debug, Clone)]
pub struct StepReport {
    pub outcome: StepOutcome,
    /// Events emitted during the pass, in order.
    pub events: Vec<BattleEvent>,
}

/// Read-only copy of the encounter at one point in time.
#[derive(Debug, Clone)]
pub struct BattleSnapshot {
    pub mode: SchedulingMode,
    pub phase: Phase,
    pub roster: Roster,
    pub pending: Option<PendingAction>,
    pub preferred_target: Option<CombatantId>,
    pub elapsed: f32,
}

impl BattleSnapshot {
    pub(crate) fn capture(scheduler: &TurnScheduler) -> Self {
        Self {
            mode: scheduler.mode(),
            phase: scheduler.phase(),
            roster: scheduler.roster().clone(),
            pending: scheduler.pending().cloned(),
            preferred_target: scheduler.preferred_target(),
            elapsed: scheduler.elapsed(),
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }
}

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Replace the roster. Returns the ids assigned, in roster order.
    pub async fn set_roster(&self, units: Vec<Combatant>) -> Result<Vec<CombatantId>> {
        self.request(|reply| Command::SetRoster { units, reply }).await
    }

    /// Set or clear the shared target selection. Returns `false` when the
    /// target is not a living combatant.
    pub async fn set_preferred_target(&self, target: Option<CombatantId>) -> Result<bool> {
        self.request(|reply| Command::SetPreferredTarget { target, reply })
            .await
    }

    /// One scheduling pass with the configured fixed time step.
    pub async fn step(&self) -> Result<StepReport> {
        self.request(|reply| Command::Step { dt: None, reply }).await
    }

    /// One scheduling pass advancing `dt` simulated seconds.
    pub async fn tick(&self, dt: f32) -> Result<StepReport> {
        self.request(|reply| Command::Step { dt: Some(dt), reply })
            .await
    }

    /// Answer the pending manual action.
    pub async fn submit_player_action(
        &self,
        skill_index: usize,
        targets: Vec<CombatantId>,
    ) -> Result<()> {
        self.request(|reply| Command::SubmitPlayerAction {
            skill_index,
            targets,
            reply,
        })
        .await??;
        Ok(())
    }

    /// Finish the pending manual action with its default choice.
    pub async fn resolve_pending_default(&self) -> Result<()> {
        self.request(|reply| Command::ResolvePendingDefault { reply })
            .await??;
        Ok(())
    }

    /// Query the current encounter (read-only snapshot)
    pub async fn query_state(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// ```rust,ignore
    /// use battle_runtime::Topic;
    ///
    /// let mut combat = handle.subscribe(Topic::Combat);
    /// while let Ok(event) = combat.recv().await {
    ///     // damage, healing, deaths
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to every event, in publication order
    pub fn subscribe_all(&self) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe_all()
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
