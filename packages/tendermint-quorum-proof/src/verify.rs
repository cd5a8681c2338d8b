//! Destination-side checks of a quorum proof.
//!
//! Mirrors what an EVM verifier does with a [`QuorumProof`]: rebuild each sign
//! message from the shared segments and recover the signer with the single
//! recovery id carried in the proof.

use alloy_primitives::{Address, Signature, SignatureError, B256};
use sha2::{Digest, Sha256};

use crate::{
    encoding::encode_chain_id,
    error::QuorumProofError,
    message::assemble,
    types::{QuorumProof, RecoveredSignature},
};

/// Recover an EVM address from a SHA-256 hashed message and a proof entry.
///
/// # Errors
/// Returns an error if `v` is not `27` or `28` or recovery fails.
pub fn recover_evm_address(
    message: &[u8],
    signature: &RecoveredSignature,
) -> Result<Address, SignatureError> {
    let mut signature_65 = [0_u8; 65];
    signature_65[..32].copy_from_slice(signature.r.as_slice());
    signature_65[32..64].copy_from_slice(signature.s.as_slice());
    signature_65[64] = signature.v;

    let signature = Signature::try_from(signature_65.as_slice())?;
    let prehash = B256::from_slice(&Sha256::digest(message));
    signature.recover_address_from_prehash(&prehash)
}

/// Recover the signer of every entry of `proof`, in proof order.
///
/// # Errors
/// Returns [`QuorumProofError::UnrecoverableProofEntry`] for the first entry
/// that cannot be recovered.
pub fn verify_proof(
    proof: &QuorumProof,
    block_hash: &B256,
    chain_id: &str,
) -> Result<Vec<Address>, QuorumProofError> {
    let encoded_chain_id = encode_chain_id(chain_id);

    proof
        .signatures
        .iter()
        .enumerate()
        .map(|(index, signature)| {
            let message = assemble(
                &proof.common_encoded_vote_part,
                block_hash,
                &signature.encoded_timestamp,
                &encoded_chain_id,
            )?;
            recover_evm_address(&message, signature).map_err(|e| {
                QuorumProofError::UnrecoverableProofEntry {
                    index,
                    reason: e.to_string(),
                }
            })
        })
        .collect()
}
