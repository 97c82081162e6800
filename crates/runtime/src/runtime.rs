//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive encounters.

use std::env;
use std::time::Duration;

use battle_core::{
    BattleConfig, BattleError, SchedulingMode, StatusBridge, StepOutcome, TurnScheduler,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::{
    ActionRequest, PlayerActionProvider, Result, RuntimeError, RuntimeHandle, StepReport,
};
use crate::events::EventBus;
use crate::workers::{Command, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle: BattleConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    /// Pause between a cleared wave and the next one.
    pub next_wave_delay: Duration,
    /// Resolve a pending player action with its default after this long.
    /// `None` waits for the provider indefinitely.
    pub player_action_timeout: Option<Duration>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
            next_wave_delay: Duration::from_millis(800),
            player_action_timeout: None,
        }
    }
}

impl RuntimeConfig {
    pub fn new(battle: BattleConfig) -> Self {
        Self {
            battle,
            ..Self::default()
        }
    }

    /// Construct configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of `self`.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - RNG seed
    /// - `BATTLE_MODE` - `continuous` or `discrete-step`
    /// - `BATTLE_RATE_FACTOR` - gauge fill per point of SPD per second
    /// - `BATTLE_EVENT_BUFFER` - per-topic broadcast capacity (default: 256)
    /// - `BATTLE_WAVE_DELAY_MS` - pause between waves (default: 800)
    /// - `BATTLE_PLAYER_TIMEOUT_MS` - player action timeout, 0 disables (default: none)
    ///
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(seed) = read_env::<u64>("BATTLE_SEED") {
            self.battle.seed = seed;
        }
        if let Some(mode) = read_env::<SchedulingMode>("BATTLE_MODE") {
            self.battle.mode = mode;
        }
        if let Some(rate) = read_env::<f32>("BATTLE_RATE_FACTOR").filter(|r| *r > 0.0) {
            self.battle.rate_factor = rate;
        }
        if let Some(capacity) = read_env::<usize>("BATTLE_EVENT_BUFFER") {
            self.event_buffer_size = capacity.max(1);
        }
        if let Some(ms) = read_env::<u64>("BATTLE_WAVE_DELAY_MS") {
            self.next_wave_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = read_env::<u64>("BATTLE_PLAYER_TIMEOUT_MS") {
            self.player_action_timeout = (ms > 0).then(|| Duration::from_millis(ms));
        }
        self
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    let raw = env::var(key).ok()?;
    let parsed = raw.trim().parse().ok();
    if parsed.is_none() {
        tracing::warn!(target: "battle::config", key, value = %raw, "ignoring unparseable environment override");
    }
    parsed
}

/// Main runtime that drives one encounter at a time.
///
/// [`RuntimeHandle`] provides a cloneable façade for clients; the runtime
/// itself adds the loop that answers suspended player turns.
pub struct Runtime {
    handle: RuntimeHandle,
    config: RuntimeConfig,
    player_provider: Option<Box<dyn PlayerActionProvider>>,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Set the player action provider
    pub fn set_player_provider(&mut self, provider: impl PlayerActionProvider + 'static) {
        self.player_provider = Some(Box::new(provider));
    }

    /// One scheduling pass. A manual turn that suspends the scheduler is
    /// answered through the player provider before returning.
    pub async fn step(&mut self) -> Result<StepReport> {
        let report = self.handle.step().await?;
        if let StepOutcome::AwaitingPlayer { actor } = report.outcome {
            tracing::debug!(target: "battle::runtime", actor = ?actor, "asking player provider");
            self.answer_player().await?;
        }
        Ok(report)
    }

    /// Step until the encounter can make no further progress. Returns the
    /// final pass: `Finished`, `Stalled` or `Idle`.
    pub async fn run_until_finished(&mut self) -> Result<StepOutcome> {
        loop {
            let report = self.step().await?;
            match report.outcome {
                StepOutcome::Finished(_) | StepOutcome::Stalled | StepOutcome::Idle => {
                    return Ok(report.outcome);
                }
                StepOutcome::Waiting
                | StepOutcome::Acted { .. }
                | StepOutcome::AwaitingPlayer { .. } => {}
            }
        }
    }

    async fn answer_player(&self) -> Result<()> {
        let provider = self
            .player_provider
            .as_ref()
            .ok_or(RuntimeError::ProviderNotSet)?;

        let snapshot = self.handle.query_state().await?;
        let Some(pending) = snapshot.pending.clone() else {
            return Ok(());
        };
        let request = ActionRequest { pending, snapshot };

        let answer = match self.config.player_action_timeout {
            Some(limit) => match tokio::time::timeout(limit, provider.provide_action(&request)).await {
                Ok(answer) => Some(answer?),
                Err(_) => {
                    tracing::warn!(
                        target: "battle::runtime",
                        actor = ?request.actor(),
                        timeout_ms = limit.as_millis() as u64,
                        "player action timed out, using default"
                    );
                    None
                }
            },
            None => Some(provider.provide_action(&request).await?),
        };

        let result = match answer {
            Some(action) => {
                self.handle
                    .submit_player_action(action.skill_index, action.targets)
                    .await
            }
            None => self.handle.resolve_pending_default().await,
        };
        match result {
            // The scheduler already closed the turn; the loop can go on.
            Err(RuntimeError::Submit(err)) => {
                tracing::warn!(
                    target: "battle::runtime",
                    error = %err,
                    code = err.error_code(),
                    severity = err.severity().as_str(),
                    "player action refused"
                );
                Ok(())
            }
            other => other,
        }
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker, which stops once every handle clone is gone.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    bridge: StatusBridge,
    player_provider: Option<Box<dyn PlayerActionProvider>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            bridge: StatusBridge::default(),
            player_provider: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Skill-keyed status rules applied after every skill.
    pub fn bridge(mut self, bridge: StatusBridge) -> Self {
        self.bridge = bridge;
        self
    }

    /// Set player action provider (optional)
    pub fn player_provider(mut self, provider: impl PlayerActionProvider + 'static) -> Self {
        self.player_provider = Some(Box::new(provider));
        self
    }

    /// Build the runtime and spawn its worker. Must be called inside a tokio
    /// runtime.
    pub fn build(self) -> Runtime {
        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        let scheduler = TurnScheduler::new(self.config.battle.clone()).with_bridge(self.bridge);
        let worker = SimulationWorker::new(scheduler, command_rx, event_bus);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        Runtime {
            handle,
            config: self.config,
            player_provider: self.player_provider,
            worker_handle,
        }
    }
}
