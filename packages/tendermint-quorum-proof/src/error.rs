//! Error types for quorum proof construction

use tendermint::account;
use thiserror::Error;

/// Errors returned while building or checking a quorum proof.
///
/// None of these are retried internally: a proof is either complete and
/// internally consistent, or it is not produced at all.
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum QuorumProofError {
    /// The canonical vote could not be encoded.
    #[error("canonical vote encoding failed: {reason}")]
    EncodingFailure {
        /// Reason for error
        reason: String,
    },

    /// Neither recovery candidate yields the declared validator address.
    #[error("no recovery id yields validator address {validator}")]
    RecoveryMismatch {
        /// Address the vote was declared for
        validator: account::Id,
    },

    /// No vote in the commit was cast for the canonical block.
    #[error("no valid vote for canonical block")]
    EmptyQuorum,

    /// The raw signature is not a well-formed 64-byte `r || s` pair.
    #[error("invalid signature from validator {validator}: {reason}")]
    InvalidSignature {
        /// Address the vote was declared for
        validator: account::Id,
        /// Reason for error
        reason: String,
    },

    /// The consensus header cannot be mapped onto the proof model.
    #[error("invalid header: {reason}")]
    InvalidHeader {
        /// Reason for error
        reason: String,
    },

    /// Destination-side recovery of a proof entry failed.
    #[error("signature {index} in proof does not recover: {reason}")]
    UnrecoverableProofEntry {
        /// Position of the entry in the proof
        index: usize,
        /// Reason for error
        reason: String,
    },
}

impl From<prost::EncodeError> for QuorumProofError {
    fn from(err: prost::EncodeError) -> Self {
        Self::EncodingFailure {
            reason: err.to_string(),
        }
    }
}

impl From<prost::DecodeError> for QuorumProofError {
    fn from(err: prost::DecodeError) -> Self {
        Self::EncodingFailure {
            reason: err.to_string(),
        }
    }
}
