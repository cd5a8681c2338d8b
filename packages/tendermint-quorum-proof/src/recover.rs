//! Public key recovery of CometBFT secp256k1 vote signatures.
//!
//! Validators publish 64-byte `r || s` signatures without a recovery id. Each
//! signature matches two candidate public keys, so both are tried and the one
//! whose native address equals the declared validator address wins.

use alloy_primitives::Address;
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha2::{Digest, Sha256};
use tendermint::account;

use crate::error::QuorumProofError;

/// Offset between a recovery id and the `v` value of an EVM signature.
pub const EVM_RECOVERY_ID_OFFSET: u8 = 27;

/// A vote signer identified through public key recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredSigner {
    /// Native address, `RIPEMD160(SHA256(compressed key))`
    pub validator_address: account::Id,
    /// Destination address, the last 20 bytes of `keccak256(uncompressed key)`
    pub evm_address: Address,
    /// The recovered key
    pub public_key: VerifyingKey,
    /// `27` or `28`
    pub v: u8,
}

impl RecoveredSigner {
    /// SEC1 uncompressed encoding of the recovered key.
    #[must_use]
    pub fn uncompressed_public_key(&self) -> Vec<u8> {
        self.public_key.to_encoded_point(false).as_bytes().to_vec()
    }
}

/// Recovers the signer of `message` and checks it against `expected`.
///
/// The message is hashed with SHA-256, the consensus engine's hash. Candidates
/// for which recovery is not defined are skipped.
///
/// # Errors
/// - [`QuorumProofError::InvalidSignature`] if the signature is not a valid
///   64-byte `r || s` pair
/// - [`QuorumProofError::RecoveryMismatch`] if no candidate yields `expected`,
///   e.g. for a corrupted vote or an ed25519 validator
pub fn recover_signer(
    message: &[u8],
    signature: &[u8],
    expected: &account::Id,
) -> Result<RecoveredSigner, QuorumProofError> {
    let signature =
        Signature::from_slice(signature).map_err(|e| QuorumProofError::InvalidSignature {
            validator: *expected,
            reason: e.to_string(),
        })?;
    let prehash = Sha256::digest(message);

    // candidate ids 0 and 1: parity of R.y, x never reduced
    for candidate in [false, true] {
        let recovery_id = RecoveryId::new(candidate, false);
        let Ok(public_key) =
            VerifyingKey::recover_from_prehash(&prehash[..], &signature, recovery_id)
        else {
            tracing::trace!(candidate, validator = %expected, "no key for recovery id");
            continue;
        };

        let validator_address = account::Id::from(public_key);
        if validator_address == *expected {
            return Ok(RecoveredSigner {
                validator_address,
                evm_address: Address::from_public_key(&public_key),
                public_key,
                v: EVM_RECOVERY_ID_OFFSET + u8::from(candidate),
            });
        }
    }

    Err(QuorumProofError::RecoveryMismatch {
        validator: *expected,
    })
}
