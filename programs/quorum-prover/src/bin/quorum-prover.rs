use std::path::Path;

use clap::Parser;
use tendermint_quorum_prover::{
    cli::QuorumProverCli, config::ProverConfig, observability::init_observability, runner,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = QuorumProverCli::parse();
    let config = ProverConfig::load(cli.config.as_deref().map(Path::new))?;

    init_observability(&config.observability)?;
    info!(
        "Observability initialized with level: {}",
        config.observability.level()
    );

    runner::run(cli.command, &config).await
}
