//! Stage and wave progression.
//!
//! A stage is fought wave by wave. Every wave installs a fresh roster (the
//! party rebuilt at full strength plus the wave's spawns), runs the encounter
//! to its end and, on victory, waits `next_wave_delay` before the next one.

use std::time::Duration;

use battle_content::{Catalog, CatalogError, StageDef};
use battle_core::{Outcome, StepOutcome, Team};

use crate::api::Result;
use crate::events::{Event, FailureReason, StageEvent};
use crate::runtime::Runtime;

/// How a stage run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageResult {
    Cleared,
    Failed(FailureReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: String,
    pub total_waves: usize,
    pub waves_cleared: usize,
    pub result: StageResult,
}

impl StageReport {
    pub fn is_cleared(&self) -> bool {
        self.result == StageResult::Cleared
    }
}

pub struct StageController<'a> {
    catalog: &'a Catalog,
    stage: &'a StageDef,
    party: Vec<String>,
    next_wave_delay: Option<Duration>,
}

impl<'a> StageController<'a> {
    /// Controller for `stage_id` with the stage's default party.
    pub fn new(catalog: &'a Catalog, stage_id: &str) -> Result<Self> {
        let stage = catalog
            .stage(stage_id)
            .ok_or_else(|| CatalogError::UnknownStage(stage_id.to_string()))?;
        Ok(Self {
            catalog,
            stage,
            party: stage.party.clone(),
            next_wave_delay: None,
        })
    }

    /// Replace the player party (unit ids, in roster order).
    pub fn with_party(mut self, party: Vec<String>) -> Self {
        self.party = party;
        self
    }

    /// Override the runtime's configured pause between waves.
    pub fn with_wave_delay(mut self, delay: Duration) -> Self {
        self.next_wave_delay = Some(delay);
        self
    }

    pub fn stage(&self) -> &StageDef {
        self.stage
    }

    /// Fight every wave in order until the party falls or the stage is cleared.
    pub async fn run(&self, runtime: &mut Runtime) -> Result<StageReport> {
        let handle = runtime.handle();
        let bus = handle.event_bus().clone();
        let delay = self
            .next_wave_delay
            .unwrap_or(runtime.config().next_wave_delay);
        let total_waves = self.stage.waves.len();
        let stage = self.stage.id.clone();

        tracing::info!(target: "battle::stage", stage = %stage, waves = total_waves, party = ?self.party, "stage started");

        for wave in 0..total_waves {
            if wave > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let units = self.catalog.wave_roster(&stage, wave, &self.party)?;
            let players = units.iter().filter(|c| c.team == Team::Player).count();
            let enemies = units.len() - players;
            let combatants = handle.set_roster(units).await?;

            tracing::info!(
                target: "battle::stage",
                stage = %stage,
                wave = wave + 1,
                total = total_waves,
                players,
                enemies,
                "wave started"
            );
            bus.publish(Event::Stage(StageEvent::WaveStarted {
                stage: stage.clone(),
                wave,
                total_waves,
                combatants,
                players,
                enemies,
            }));

            let reason = match runtime.run_until_finished().await? {
                StepOutcome::Finished(Outcome::Victory) => continue,
                StepOutcome::Finished(Outcome::Defeat) => FailureReason::PartyDefeated,
                StepOutcome::Finished(Outcome::MutualWipe) => FailureReason::MutualWipe,
                other => {
                    tracing::warn!(target: "battle::stage", stage = %stage, wave = wave + 1, outcome = ?other, "wave cannot progress");
                    FailureReason::Stalled
                }
            };

            tracing::warn!(target: "battle::stage", stage = %stage, wave = wave + 1, %reason, "stage failed");
            bus.publish(Event::Stage(StageEvent::StageFailed {
                stage: stage.clone(),
                wave,
                reason,
            }));
            return Ok(StageReport {
                stage,
                total_waves,
                waves_cleared: wave,
                result: StageResult::Failed(reason),
            });
        }

        tracing::info!(target: "battle::stage", stage = %stage, waves = total_waves, "stage cleared");
        bus.publish(Event::Stage(StageEvent::StageCleared {
            stage: stage.clone(),
            waves: total_waves,
        }));
        Ok(StageReport {
            stage,
            total_waves,
            waves_cleared: total_waves,
            result: StageResult::Cleared,
        })
    }
}
