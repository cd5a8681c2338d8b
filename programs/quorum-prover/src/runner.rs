//! Executes the quorum prover commands.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy_primitives::{Address, Bytes};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tendermint::block::{signed_header::SignedHeader as TmSignedHeader, Height};
use tendermint_quorum_proof::{
    build_proof, recover_signers, verify_proof, CommonEncodedVotePart, QuorumProof, SignedHeader,
};
use tendermint_rpc::{Client, HttpClient, Url};

use crate::{
    cli::{Commands, HeaderSource, OutputFormat, OutputPath, ProveCmd, SignersCmd, VerifyCmd},
    config::ProverConfig,
};

/// A validator that signed the committed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignerEntry {
    /// Native validator address
    pub validator_address: String,
    /// Address `ecrecover` returns for the validator's votes
    pub evm_address: Address,
    /// Recovery id as carried in the proof
    pub v: u8,
    /// Uncompressed SEC1 public key
    pub public_key: Bytes,
}

/// Runs `command` with the settings of `config`.
///
/// # Errors
/// Returns an error if the header cannot be loaded, the proof cannot be built
/// or verified, or the output cannot be written.
pub async fn run(command: Commands, config: &ProverConfig) -> Result<()> {
    match command {
        Commands::Prove(cmd) => prove(&cmd, config).await,
        Commands::Verify(cmd) => verify(&cmd),
        Commands::Signers(cmd) => signers(&cmd, config).await,
    }
}

async fn prove(cmd: &ProveCmd, config: &ProverConfig) -> Result<()> {
    let header = load_signed_header(&cmd.source, config).await?;
    let proof = prove_header(&header, cmd.parallel || config.parallel)?;

    let output = match cmd.format {
        OutputFormat::Json => serde_json::to_string_pretty(&proof)?,
        OutputFormat::Abi => format!("0x{}", hex::encode(proof.abi_encode())),
    };
    write_output(&cmd.output_path, &output)
}

fn verify(cmd: &VerifyCmd) -> Result<()> {
    let proof_bz = std::fs::read(&cmd.proof)
        .with_context(|| format!("failed to read proof file {}", cmd.proof))?;
    let proof: QuorumProof = serde_json::from_slice(&proof_bz)?;

    let signers = verify_proof(&proof, &cmd.block_hash, &cmd.chain_id)?;
    tracing::info!(signers = signers.len(), "verified quorum proof");

    write_output(&cmd.output_path, &serde_json::to_string_pretty(&signers)?)
}

async fn signers(cmd: &SignersCmd, config: &ProverConfig) -> Result<()> {
    let header = load_signed_header(&cmd.source, config).await?;
    let entries = list_signers(&header)?;

    write_output(&cmd.output_path, &serde_json::to_string_pretty(&entries)?)
}

/// Builds the quorum proof of a `tendermint` signed header.
///
/// # Errors
/// Returns an error if the header is malformed or a vote for the block does
/// not recover to its validator.
pub fn prove_header(header: &TmSignedHeader, parallel: bool) -> Result<QuorumProof> {
    let header = SignedHeader::try_from(header)?;

    #[cfg(feature = "parallel")]
    if parallel {
        return Ok(tendermint_quorum_proof::build_proof_parallel(&header)?);
    }
    #[cfg(not(feature = "parallel"))]
    if parallel {
        tracing::warn!("built without the parallel feature, recovering sequentially");
    }

    Ok(build_proof(&header)?)
}

/// Lists the signers of a `tendermint` signed header in proof order.
///
/// # Errors
/// See [`prove_header`].
pub fn list_signers(header: &TmSignedHeader) -> Result<Vec<SignerEntry>> {
    let header = SignedHeader::try_from(header)?;
    let common = CommonEncodedVotePart::from_commit(&header.commit)?;

    Ok(recover_signers(&header, &common)?
        .into_values()
        .map(|(signer, _)| SignerEntry {
            validator_address: signer.validator_address.to_string(),
            evm_address: signer.evm_address,
            v: signer.v,
            public_key: signer.uncompressed_public_key().into(),
        })
        .collect())
}

async fn load_signed_header(source: &HeaderSource, config: &ProverConfig) -> Result<TmSignedHeader> {
    if let Some(path) = &source.header {
        return read_signed_header(&PathBuf::from(path));
    }

    let rpc_url = source
        .rpc_url
        .as_ref()
        .or(config.rpc_url.as_ref())
        .context("no RPC url given, pass --rpc-url or set rpc_url in the config")?;
    let url = Url::from_str(rpc_url)
        .with_context(|| format!("invalid tendermint RPC URL: {rpc_url}"))?;
    let client = HttpClient::new(url)?;

    let response = match source.height {
        Some(height) => client.commit(Height::try_from(height)?).await?,
        None => client.latest_commit().await?,
    };
    tracing::info!(
        height = %response.signed_header.header.height,
        canonical = response.canonical,
        "fetched commit"
    );

    Ok(response.signed_header)
}

/// Reads a signed header in the RPC JSON format.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_signed_header(path: &Path) -> Result<TmSignedHeader> {
    let header_bz = std::fs::read(path)
        .with_context(|| format!("failed to read header file {}", path.display()))?;
    serde_json::from_slice(&header_bz)
        .with_context(|| format!("invalid signed header in {}", path.display()))
}

fn write_output(output_path: &OutputPath, output: &str) -> Result<()> {
    match output_path {
        OutputPath::File(path) => {
            std::fs::write(PathBuf::from(path), output)?;
            tracing::info!(path = %path, "wrote output");
        }
        OutputPath::Stdout => {
            println!("{output}");
        }
    }

    Ok(())
}
