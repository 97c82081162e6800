//! Simulation worker that owns the authoritative [`TurnScheduler`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! them to the scheduler one at a time, and republishes every emitted event
//! on the [`EventBus`].

use battle_core::{BattleEvent, Combatant, CombatantId, EventSink, SubmitError, TurnScheduler};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::api::{BattleSnapshot, StepReport};
use crate::events::{Event, EventBus};

/// Commands that can be sent to the simulation worker
pub enum Command {
    /// Replace the whole roster; replies with the assigned ids.
    SetRoster {
        units: Vec<Combatant>,
        reply: oneshot::Sender<Vec<CombatantId>>,
    },
    /// Set or clear the shared target selection.
    SetPreferredTarget {
        target: Option<CombatantId>,
        reply: oneshot::Sender<bool>,
    },
    /// Run one scheduling pass. `None` uses the configured fixed step.
    Step {
        dt: Option<f32>,
        reply: oneshot::Sender<StepReport>,
    },
    /// Answer the pending manual action.
    SubmitPlayerAction {
        skill_index: usize,
        targets: Vec<CombatantId>,
        reply: oneshot::Sender<Result<(), SubmitError>>,
    },
    /// Finish the pending manual action with its default choice.
    ResolvePendingDefault {
        reply: oneshot::Sender<Result<(), SubmitError>>,
    },
    /// Read-only copy of the encounter.
    QueryState { reply: oneshot::Sender<BattleSnapshot> },
}

/// Forwards scheduler events to the bus and keeps a copy for the caller.
struct BusSink<'a> {
    bus: &'a EventBus,
    log: Vec<BattleEvent>,
}

impl<'a> BusSink<'a> {
    fn new(bus: &'a EventBus) -> Self {
        Self {
            bus,
            log: Vec::new(),
        }
    }
}

impl EventSink for BusSink<'_> {
    fn emit(&mut self, event: BattleEvent) {
        self.bus.publish(Event::Battle(event.clone()));
        self.log.push(event);
    }
}

/// Background task that processes battle commands.
pub struct SimulationWorker {
    scheduler: TurnScheduler,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        scheduler: TurnScheduler,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        tracing::info!(target: "battle::worker", mode = %scheduler.mode(), "simulation worker initialized");
        Self {
            scheduler,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Ends when every handle has been dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "battle::worker", "command channel closed, worker stopping");
    }

    fn handle_command(&mut self, cmd: Command) {
        let mut sink = BusSink::new(&self.event_bus);
        match cmd {
            Command::SetRoster { units, reply } => {
                let ids = self.scheduler.set_units(units, &mut sink);
                if reply.send(ids).is_err() {
                    debug!(target: "battle::worker", "SetRoster reply channel closed (caller dropped)");
                }
            }
            Command::SetPreferredTarget { target, reply } => {
                let accepted = self.scheduler.set_preferred_target(target, &mut sink);
                if reply.send(accepted).is_err() {
                    debug!(target: "battle::worker", "SetPreferredTarget reply channel closed (caller dropped)");
                }
            }
            Command::Step { dt, reply } => {
                let outcome = match dt {
                    Some(dt) => self.scheduler.tick(dt, &mut sink),
                    None => self.scheduler.step(&mut sink),
                };
                let report = StepReport {
                    outcome,
                    events: std::mem::take(&mut sink.log),
                };
                if reply.send(report).is_err() {
                    debug!(target: "battle::worker", "Step reply channel closed (caller dropped)");
                }
            }
            Command::SubmitPlayerAction {
                skill_index,
                targets,
                reply,
            } => {
                let result = self
                    .scheduler
                    .submit_player_action(skill_index, targets, &mut sink);
                if reply.send(result).is_err() {
                    debug!(target: "battle::worker", "SubmitPlayerAction reply channel closed (caller dropped)");
                }
            }
            Command::ResolvePendingDefault { reply } => {
                let result = self.scheduler.resolve_pending_default(&mut sink);
                if reply.send(result).is_err() {
                    debug!(target: "battle::worker", "ResolvePendingDefault reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(BattleSnapshot::capture(&self.scheduler)).is_err() {
                    debug!(target: "battle::worker", "QueryState reply channel closed (caller dropped)");
                }
            }
        }
    }
}
