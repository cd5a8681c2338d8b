//! Input and output types of the quorum proof.

use alloy_primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};
use tendermint::account;
use tendermint_proto::{google::protobuf::Timestamp, v0_38::types::SignedMsgType};

/// A finalized consensus header reduced to what the proof needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedHeader {
    /// The chain identifier every vote commits to
    pub chain_id: String,
    /// The commit carrying the validator votes
    pub commit: Commit,
}

/// The commit of a [`SignedHeader`].
#[derive(Debug, Clone, PartialEq)]
pub struct Commit {
    /// Vote type of the commit, always a precommit for finalized blocks
    pub msg_type: SignedMsgType,
    /// Block height
    pub height: u64,
    /// Consensus round in which the block was committed
    pub round: u32,
    /// The committed block id
    pub block_id: BlockId,
    /// Votes in validator set order
    pub votes: Vec<VoteRecord>,
}

/// Canonical block id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId {
    /// Block hash
    pub hash: B256,
    /// Part set header
    pub part_set_header: PartSetHeader,
}

/// Canonical part set header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartSetHeader {
    /// Number of block parts
    pub total: u32,
    /// Merkle root of the block parts
    pub hash: B256,
}

/// A single validator vote from the commit.
#[derive(Debug, Clone, PartialEq)]
pub struct VoteRecord {
    /// Native address of the validator that cast the vote
    pub validator_address: account::Id,
    /// Whether the vote is for the committed block id
    pub for_block: bool,
    /// Raw `r || s` signature, without recovery id
    pub signature: Vec<u8>,
    /// Time at which the validator signed
    pub timestamp: Timestamp,
}

/// The segments of the signed vote that are shared by all validators of a
/// header.
///
/// A validator's signed message is
/// `len || prefix || block_hash || suffix || 0x2a len(ts) ts || 0x32 len(chain_id) chain_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonEncodedVotePart {
    /// `{type, height, round}` framing followed by the block-id and block-hash keys
    pub signed_data_prefix: Bytes,
    /// Part set header field, including its key
    pub signed_data_suffix: Bytes,
}

/// A validator signature made recoverable for a destination-chain verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredSignature {
    /// `r` scalar
    pub r: B256,
    /// `s` scalar
    pub s: B256,
    /// Recovery id in the `27 + parity` convention
    pub v: u8,
    /// Protobuf timestamp of the vote
    pub encoded_timestamp: Bytes,
}

/// The proof bundle handed to a destination-chain verifier.
///
/// Signatures are sorted by ascending signer address; signer identities are
/// not part of the bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuorumProof {
    /// One entry per distinct signer that voted for the block
    pub signatures: Vec<RecoveredSignature>,
    /// Segments shared by every entry
    pub common_encoded_vote_part: CommonEncodedVotePart,
}
