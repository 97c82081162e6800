//! Command-line interface.

use std::path::PathBuf;

use battle_core::SchedulingMode;
use clap::Parser;

/// Run a battle stage from a content directory and print what happens.
#[derive(Parser, Debug)]
#[command(name = "battle")]
#[command(version)]
pub struct Args {
    /// Content directory (battle.toml, catalogs, stages/)
    #[arg(long, value_name = "DIR", default_value = "data")]
    pub data: PathBuf,

    /// Stage to run; defaults to the first stage in the catalog
    #[arg(long, value_name = "ID")]
    pub stage: Option<String>,

    /// Player party as unit ids; defaults to the stage's party
    #[arg(long, value_name = "UNITS", value_delimiter = ',')]
    pub party: Vec<String>,

    /// Scheduling mode: continuous or discrete-step
    #[arg(long, value_name = "MODE", value_parser = parse_mode)]
    pub mode: Option<SchedulingMode>,

    /// RNG seed; overrides battle.toml and BATTLE_SEED
    #[arg(long, conflicts_with = "random_seed")]
    pub seed: Option<u64>,

    /// Pick a fresh random seed
    #[arg(long)]
    pub random_seed: bool,

    /// Prompt on stdin for manual combatants' actions (discrete-step mode)
    #[arg(long)]
    pub manual: bool,

    /// Print events as JSON lines instead of text
    #[arg(long)]
    pub json: bool,

    /// Also write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// List the stages in the catalog and exit
    #[arg(long)]
    pub list_stages: bool,
}

pub fn parse_args() -> Args {
    Args::parse()
}

fn parse_mode(raw: &str) -> Result<SchedulingMode, String> {
    raw.parse()
        .map_err(|_| format!("unknown mode '{}', expected continuous or discrete-step", raw))
}
