//! Quorum proofs for CometBFT commits that an EVM verifier can check.
//!
//! The proof carries, for every validator that precommitted the block, the
//! `r`, `s` and recovery id of its secp256k1 signature and its vote timestamp,
//! plus the vote segments shared by all validators. A verifier rebuilds each
//! sign message from these segments and recovers the signer with `ecrecover`.
#![deny(missing_docs, clippy::nursery, clippy::pedantic)]

pub mod conversions;
pub mod encoding;
pub mod error;
pub mod message;
pub mod msgs;
pub mod proof;
pub mod recover;
pub mod types;
pub mod verify;

pub use error::QuorumProofError;
#[cfg(feature = "parallel")]
pub use proof::build_proof_parallel;
pub use proof::{build_proof, recover_signers};
pub use types::{
    BlockId, Commit, CommonEncodedVotePart, PartSetHeader, QuorumProof, RecoveredSignature,
    SignedHeader, VoteRecord,
};
pub use verify::verify_proof;
