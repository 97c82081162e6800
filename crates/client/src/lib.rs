//! Terminal client for running battle stages.
//!
//! The client is the composition root: it loads content through
//! [`battle_content::ContentFactory`], layers configuration (`battle.toml`,
//! then `BATTLE_*` environment variables, then command-line flags), builds a
//! [`battle_runtime::Runtime`] and runs one stage while a printer task renders
//! the event stream.

pub mod cli;
pub mod logging;
pub mod provider;
pub mod render;

use anyhow::Result;
use battle_content::ContentFactory;
use battle_core::{BattleEvent, SchedulingMode};
use battle_runtime::{
    DefaultActionProvider, Event, Runtime, RuntimeConfig, RuntimeHandle, StageController,
    StageEvent, StageResult,
};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::cli::Args;
use crate::provider::StdinProvider;
use crate::render::Renderer;

/// Runs the stage selected by `args` to completion.
pub async fn run(args: Args) -> Result<()> {
    let factory = ContentFactory::new(&args.data);
    let catalog = factory.load_catalog()?;

    if args.list_stages {
        for stage in catalog.stages() {
            println!("{}\t{}\t{} waves", stage.id, stage.display_name, stage.waves.len());
        }
        return Ok(());
    }

    let stage_id = match &args.stage {
        Some(id) => id.clone(),
        None => catalog
            .stages()
            .first()
            .map(|stage| stage.id.clone())
            .ok_or_else(|| anyhow::anyhow!("no stages found in {}", factory.data_dir().display()))?,
    };

    let mut config = RuntimeConfig::new(factory.load_config()?).with_env_overrides();
    if let Some(mode) = args.mode {
        config.battle.mode = mode;
    }
    if let Some(seed) = args.seed {
        config.battle.seed = seed;
    } else if args.random_seed {
        config.battle.seed = rand::random();
    }

    tracing::info!(
        stage = %stage_id,
        mode = %config.battle.mode,
        seed = config.battle.seed,
        "starting battle"
    );

    let builder = Runtime::builder().config(config.clone()).bridge(catalog.bridge());
    let mut runtime = if args.manual {
        if config.battle.mode == SchedulingMode::Continuous {
            tracing::warn!("--manual has no effect in continuous mode; every combatant acts on its own");
        }
        builder.player_provider(StdinProvider::new()).build()
    } else {
        builder.player_provider(DefaultActionProvider).build()
    };

    let handle = runtime.handle();
    let events = handle.subscribe_all();
    let printer = tokio::spawn(print_events(handle, events, Renderer::new(args.json)));

    let mut controller = StageController::new(&catalog, &stage_id)?;
    if !args.party.is_empty() {
        controller = controller.with_party(args.party.clone());
    }
    let report = controller.run(&mut runtime).await?;

    if let Err(err) = printer.await {
        tracing::warn!("event printer stopped abnormally: {}", err);
    }
    runtime.shutdown().await?;

    if !args.json {
        match report.result {
            StageResult::Cleared => println!(
                "{}: cleared {}/{} waves",
                report.stage, report.waves_cleared, report.total_waves
            ),
            StageResult::Failed(reason) => println!(
                "{}: failed ({}) after {}/{} waves",
                report.stage, reason, report.waves_cleared, report.total_waves
            ),
        }
    }
    tracing::info!(stage = %report.stage, result = ?report.result, "battle finished");
    Ok(())
}

/// Prints events until the stage reports its result. Returning drops the
/// printer's handle so the runtime can shut down.
async fn print_events(
    handle: RuntimeHandle,
    mut events: broadcast::Receiver<Event>,
    mut renderer: Renderer,
) {
    loop {
        let event = match events.recv().await {
            Ok(event) => event,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "event printer fell behind");
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        if let Event::Battle(BattleEvent::RosterChanged { .. }) = &event {
            match handle.query_state().await {
                Ok(snapshot) => renderer.learn(&snapshot.roster),
                Err(err) => tracing::debug!("cannot refresh combatant names: {}", err),
            }
        }
        if let Some(line) = renderer.render(&event) {
            println!("{}", line);
        }
        if matches!(
            event,
            Event::Stage(StageEvent::StageCleared { .. } | StageEvent::StageFailed { .. })
        ) {
            break;
        }
    }
}
