//! Assembly of the quorum proof from a signed header.

use std::collections::BTreeMap;

use alloy_primitives::{Address, B256};

use crate::{
    encoding::{encode_chain_id, encode_timestamp},
    error::QuorumProofError,
    message::assemble,
    recover::{recover_signer, RecoveredSigner},
    types::{CommonEncodedVotePart, QuorumProof, RecoveredSignature, SignedHeader, VoteRecord},
};

/// Signatures of a commit keyed by the recovered signer address.
pub type SignerSignatures = BTreeMap<Address, (RecoveredSigner, RecoveredSignature)>;

/// Builds the quorum proof of `header`.
///
/// Only votes for the committed block are included. Each vote is recovered
/// against its declared validator address, so a single bad vote fails the
/// whole proof. Entries are ordered by ascending signer address, which is the
/// order the destination verifier expects.
///
/// # Errors
/// - [`QuorumProofError::EncodingFailure`] if the vote cannot be encoded
/// - [`QuorumProofError::InvalidSignature`] or
///   [`QuorumProofError::RecoveryMismatch`] for the first vote that does not
///   recover to its validator
/// - [`QuorumProofError::EmptyQuorum`] if no vote is for the committed block
#[tracing::instrument(skip_all, fields(chain_id = %header.chain_id, height = header.commit.height))]
pub fn build_proof(header: &SignedHeader) -> Result<QuorumProof, QuorumProofError> {
    let common = CommonEncodedVotePart::from_commit(&header.commit)?;
    let signers = recover_signers(header, &common)?;
    Ok(into_proof(signers, common))
}

/// Same as [`build_proof`], recovering votes on the rayon thread pool.
///
/// # Errors
/// See [`build_proof`].
#[cfg(feature = "parallel")]
#[tracing::instrument(skip_all, fields(chain_id = %header.chain_id, height = header.commit.height))]
pub fn build_proof_parallel(header: &SignedHeader) -> Result<QuorumProof, QuorumProofError> {
    use rayon::prelude::*;

    let common = CommonEncodedVotePart::from_commit(&header.commit)?;
    let encoded_chain_id = encode_chain_id(&header.chain_id);
    let block_hash = header.commit.block_id.hash;

    // Collecting into a Vec keeps vote order, so duplicates resolve as in
    // `build_proof`.
    let recovered = header
        .commit
        .votes
        .par_iter()
        .filter(|vote| vote.for_block)
        .map(|vote| recover_vote(vote, &common, &block_hash, &encoded_chain_id))
        .collect::<Result<Vec<_>, _>>()?;

    let signers = collect_signers(recovered)?;
    Ok(into_proof(signers, common))
}

/// Recovers every vote for the committed block of `header`.
///
/// A validator that appears more than once keeps its last vote.
///
/// # Errors
/// See [`build_proof`].
pub fn recover_signers(
    header: &SignedHeader,
    common: &CommonEncodedVotePart,
) -> Result<SignerSignatures, QuorumProofError> {
    let encoded_chain_id = encode_chain_id(&header.chain_id);
    let block_hash = header.commit.block_id.hash;

    let recovered = header
        .commit
        .votes
        .iter()
        .filter(|vote| vote.for_block)
        .map(|vote| recover_vote(vote, common, &block_hash, &encoded_chain_id))
        .collect::<Result<Vec<_>, _>>()?;

    collect_signers(recovered)
}

fn recover_vote(
    vote: &VoteRecord,
    common: &CommonEncodedVotePart,
    block_hash: &B256,
    encoded_chain_id: &[u8],
) -> Result<(RecoveredSigner, RecoveredSignature), QuorumProofError> {
    let encoded_timestamp = encode_timestamp(&vote.timestamp);
    let message = assemble(common, block_hash, &encoded_timestamp, encoded_chain_id)?;
    let signer = recover_signer(&message, &vote.signature, &vote.validator_address)?;

    tracing::debug!(
        validator = %signer.validator_address,
        evm_address = %signer.evm_address,
        v = signer.v,
        "recovered vote signer"
    );

    let signature = RecoveredSignature {
        r: B256::from_slice(&vote.signature[..32]),
        s: B256::from_slice(&vote.signature[32..]),
        v: signer.v,
        encoded_timestamp: encoded_timestamp.into(),
    };
    Ok((signer, signature))
}

fn collect_signers(
    recovered: Vec<(RecoveredSigner, RecoveredSignature)>,
) -> Result<SignerSignatures, QuorumProofError> {
    let total = recovered.len();
    let signers: SignerSignatures = recovered
        .into_iter()
        .map(|(signer, signature)| (signer.evm_address, (signer, signature)))
        .collect();

    if signers.is_empty() {
        return Err(QuorumProofError::EmptyQuorum);
    }
    if signers.len() != total {
        tracing::warn!(
            votes = total,
            signers = signers.len(),
            "duplicate votes in commit, keeping the last vote of each validator"
        );
    }

    Ok(signers)
}

fn into_proof(signers: SignerSignatures, common: CommonEncodedVotePart) -> QuorumProof {
    tracing::info!(signers = signers.len(), "built quorum proof");

    QuorumProof {
        signatures: signers
            .into_values()
            .map(|(_, signature)| signature)
            .collect(),
        common_encoded_vote_part: common,
    }
}
