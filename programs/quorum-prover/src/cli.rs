//! Contains the command line interface for the quorum prover.

use std::convert::Infallible;

use alloy_primitives::B256;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Extracts EVM-verifiable quorum proofs from CometBFT commits.
#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct QuorumProverCli {
    /// Path to a JSON configuration file.
    #[clap(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The subcommands of the quorum prover.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Build the quorum proof of a committed block.
    Prove(ProveCmd),
    /// Recover the signers of a quorum proof.
    Verify(VerifyCmd),
    /// List the validators that signed a committed block.
    Signers(SignersCmd),
}

/// Where the signed header is read from.
#[derive(Clone, Debug, Args)]
pub struct HeaderSource {
    /// CometBFT RPC endpoint.
    #[clap(long, env = "TENDERMINT_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Block height to prove. Defaults to the latest commit.
    #[clap(long)]
    pub height: Option<u64>,

    /// Read the signed header from a JSON file instead of the RPC endpoint.
    #[clap(long, conflicts_with_all = ["rpc_url", "height"])]
    pub header: Option<String>,
}

/// The arguments of the `prove` command.
#[derive(Clone, Debug, Args)]
pub struct ProveCmd {
    /// Header source.
    #[clap(flatten)]
    pub source: HeaderSource,

    /// Output encoding of the proof.
    #[clap(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Recover votes in parallel.
    #[clap(long)]
    pub parallel: bool,

    /// Output path. If not provided, the output will be written to stdout.
    #[clap(long, short = 'o', value_parser = parse_output_path, default_value = "-")]
    pub output_path: OutputPath,
}

/// The arguments of the `verify` command.
#[derive(Clone, Debug, Args)]
pub struct VerifyCmd {
    /// Path to a JSON quorum proof, as written by `prove`.
    #[clap(long)]
    pub proof: String,

    /// Hash of the block the proof commits to.
    #[clap(long)]
    pub block_hash: B256,

    /// Chain id the votes were cast on.
    #[clap(long)]
    pub chain_id: String,

    /// Output path. If not provided, the output will be written to stdout.
    #[clap(long, short = 'o', value_parser = parse_output_path, default_value = "-")]
    pub output_path: OutputPath,
}

/// The arguments of the `signers` command.
#[derive(Clone, Debug, Args)]
pub struct SignersCmd {
    /// Header source.
    #[clap(flatten)]
    pub source: HeaderSource,

    /// Output path. If not provided, the output will be written to stdout.
    #[clap(long, short = 'o', value_parser = parse_output_path, default_value = "-")]
    pub output_path: OutputPath,
}

/// Encoding of a written proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty printed JSON.
    Json,
    /// `0x` prefixed ABI encoding of the `QuorumProof` tuple.
    Abi,
}

/// The output path for files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputPath {
    /// Write the output to stdout.
    Stdout,
    /// Write the output to a file.
    File(String),
}

#[allow(clippy::unnecessary_wraps)]
fn parse_output_path(path: &str) -> Result<OutputPath, Infallible> {
    if path == "-" {
        Ok(OutputPath::Stdout)
    } else {
        Ok(OutputPath::File(path.to_string()))
    }
}
