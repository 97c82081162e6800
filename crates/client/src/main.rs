//! `battle` binary.
//!
//! ```bash
//! # Run the first stage in ./data with the default seed
//! cargo run -p battle-client
//!
//! # Discrete-step mode, answering manual turns on stdin
//! cargo run -p battle-client -- --mode discrete-step --manual --stage first_steps
//! ```

use anyhow::Result;
use battle_client::{cli, logging, run};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = cli::parse_args();
    let _guard = logging::setup_logging(args.log_file.as_deref())?;

    run(args).await
}
