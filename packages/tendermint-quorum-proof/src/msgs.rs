//! ABI types consumed by the destination-chain verifier.
#![allow(missing_docs, clippy::pedantic, clippy::nursery)]

use alloy_sol_types::SolValue;

use crate::types::{self, RecoveredSignature};

alloy_sol_types::sol! {
    interface ITendermintQuorumMsgs {
        /// A validator precommit signature with its recovery id.
        #[derive(Debug, PartialEq, Eq)]
        struct TmSignature {
            bytes32 r;
            bytes32 s;
            uint8 v;
            bytes encodedTimestamp;
        }

        /// Vote segments shared by all signatures of a header.
        #[derive(Debug, PartialEq, Eq)]
        struct CommonEncodedVotePart {
            bytes signedDataPrefix;
            bytes signedDataSuffix;
        }

        /// Signatures sorted by ascending signer address.
        #[derive(Debug, PartialEq, Eq)]
        struct QuorumProof {
            CommonEncodedVotePart commonEncodedVotePart;
            TmSignature[] signatures;
        }
    }
}

use ITendermintQuorumMsgs::{CommonEncodedVotePart, QuorumProof, TmSignature};

impl From<&RecoveredSignature> for TmSignature {
    fn from(signature: &RecoveredSignature) -> Self {
        Self {
            r: signature.r,
            s: signature.s,
            v: signature.v,
            encodedTimestamp: signature.encoded_timestamp.clone(),
        }
    }
}

impl From<&types::CommonEncodedVotePart> for CommonEncodedVotePart {
    fn from(common: &types::CommonEncodedVotePart) -> Self {
        Self {
            signedDataPrefix: common.signed_data_prefix.clone(),
            signedDataSuffix: common.signed_data_suffix.clone(),
        }
    }
}

impl From<&types::QuorumProof> for QuorumProof {
    fn from(proof: &types::QuorumProof) -> Self {
        Self {
            commonEncodedVotePart: (&proof.common_encoded_vote_part).into(),
            signatures: proof.signatures.iter().map(Into::into).collect(),
        }
    }
}

impl types::QuorumProof {
    /// ABI encoding of the proof as a `QuorumProof` tuple.
    #[must_use]
    pub fn abi_encode(&self) -> Vec<u8> {
        QuorumProof::from(self).abi_encode()
    }
}
