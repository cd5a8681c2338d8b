//! Common test utilities and fixtures
#![allow(dead_code)]

use alloy_primitives::{Address, B256};
use k256::ecdsa::{signature::Signer, Signature, SigningKey};
use tendermint::{
    account, block,
    block::{header::Version, parts::Header as TmPartSetHeader, CommitSig},
    chain,
    vote::{CanonicalVote, Type},
    AppHash, Hash, Time,
};
use tendermint_proto::{google::protobuf::Timestamp, v0_38::types::SignedMsgType, Protobuf};
use tendermint_quorum_proof::{BlockId, Commit, PartSetHeader, SignedHeader, VoteRecord};

pub const CHAIN_ID: &str = "band-laozi-testnet6";
pub const HEIGHT: u64 = 25_113_117;
pub const ROUND: u16 = 1;
pub const BLOCK_HASH: [u8; 32] = [0x3a; 32];
pub const PART_SET_HASH: [u8; 32] = [0x5c; 32];
pub const PART_SET_TOTAL: u32 = 1;
/// Seconds of the first vote timestamp; later votes add one second each
pub const BASE_TIME: i64 = 1_700_000_000;

/// How a validator took part in the commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participation {
    Commit,
    Nil,
    Absent,
}

/// A secp256k1 validator with a deterministic key
pub struct TestValidator {
    pub key: SigningKey,
    pub address: account::Id,
    pub evm_address: Address,
}

impl TestValidator {
    pub fn new(seed: u8) -> Self {
        let key = SigningKey::from_slice(&[seed; 32]).expect("valid secret key");
        let verifying_key = *key.verifying_key();
        Self {
            address: account::Id::from(verifying_key),
            evm_address: Address::from_public_key(&verifying_key),
            key,
        }
    }

    /// Signs the precommit of the fixture block at `time` and returns `r || s`
    pub fn sign_precommit(&self, time: Time) -> Vec<u8> {
        self.sign(&sign_bytes(Some(block_id()), time))
    }

    /// Signs a nil precommit at `time`
    pub fn sign_nil(&self, time: Time) -> Vec<u8> {
        self.sign(&sign_bytes(None, time))
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.key.sign(message);
        signature
            .normalize_s()
            .unwrap_or(signature)
            .to_bytes()
            .to_vec()
    }
}

pub fn validators(count: u8) -> Vec<TestValidator> {
    (1..=count).map(TestValidator::new).collect()
}

pub fn vote_time(index: usize) -> Time {
    let index = i64::try_from(index).expect("small index");
    // distinct nanos so every validator has a different encoded timestamp
    Time::from_unix_timestamp(BASE_TIME + index, 1_000 * u32::try_from(index).unwrap() + 7)
        .expect("valid time")
}

pub fn block_id() -> block::Id {
    block::Id {
        hash: Hash::Sha256(BLOCK_HASH),
        part_set_header: TmPartSetHeader::new(PART_SET_TOTAL, Hash::Sha256(PART_SET_HASH))
            .expect("valid part set header"),
    }
}

/// Sign bytes of a precommit as produced by the `tendermint` crate
pub fn sign_bytes(block_id: Option<block::Id>, time: Time) -> Vec<u8> {
    let canonical_vote = CanonicalVote {
        vote_type: Type::Precommit,
        height: block::Height::try_from(HEIGHT).expect("valid height"),
        round: ROUND.into(),
        block_id,
        timestamp: Some(time),
        chain_id: chain::Id::try_from(CHAIN_ID).expect("valid chain id"),
    };

    <CanonicalVote as Protobuf<tendermint_proto::v0_38::types::CanonicalVote>>::encode_length_delimited_vec(
        canonical_vote,
    )
}

/// Builds a signed header where validator `i` takes part as `participation[i]`
pub fn signed_header(validators: &[TestValidator], participation: &[Participation]) -> SignedHeader {
    let votes = validators
        .iter()
        .zip(participation)
        .enumerate()
        .filter_map(|(index, (validator, participation))| {
            let time = vote_time(index);
            let (for_block, signature) = match participation {
                Participation::Absent => return None,
                Participation::Commit => (true, validator.sign_precommit(time)),
                Participation::Nil => (false, validator.sign_nil(time)),
            };
            Some(VoteRecord {
                validator_address: validator.address,
                for_block,
                signature,
                timestamp: Timestamp::from(time),
            })
        })
        .collect();

    SignedHeader {
        chain_id: CHAIN_ID.to_string(),
        commit: Commit {
            msg_type: SignedMsgType::Precommit,
            height: HEIGHT,
            round: u32::from(ROUND),
            block_id: BlockId {
                hash: B256::from(BLOCK_HASH),
                part_set_header: PartSetHeader {
                    total: PART_SET_TOTAL,
                    hash: B256::from(PART_SET_HASH),
                },
            },
            votes,
        },
    }
}

/// The same commit as [`signed_header`], as a `tendermint` light-block header
pub fn tendermint_signed_header(
    validators: &[TestValidator],
    participation: &[Participation],
) -> block::signed_header::SignedHeader {
    let height = block::Height::try_from(HEIGHT).expect("valid height");

    let signatures = validators
        .iter()
        .zip(participation)
        .enumerate()
        .map(|(index, (validator, participation))| {
            let time = vote_time(index);
            match participation {
                Participation::Absent => CommitSig::BlockIdFlagAbsent,
                Participation::Commit => CommitSig::BlockIdFlagCommit {
                    validator_address: validator.address,
                    timestamp: time,
                    signature: tendermint::Signature::new(validator.sign_precommit(time))
                        .expect("valid signature"),
                },
                Participation::Nil => CommitSig::BlockIdFlagNil {
                    validator_address: validator.address,
                    timestamp: time,
                    signature: tendermint::Signature::new(validator.sign_nil(time))
                        .expect("valid signature"),
                },
            }
        })
        .collect();

    let header = block::Header {
        version: Version { block: 11, app: 0 },
        chain_id: chain::Id::try_from(CHAIN_ID).expect("valid chain id"),
        height,
        time: vote_time(0),
        last_block_id: None,
        last_commit_hash: None,
        data_hash: None,
        validators_hash: Hash::Sha256([0x01; 32]),
        next_validators_hash: Hash::Sha256([0x01; 32]),
        consensus_hash: Hash::Sha256([0x02; 32]),
        app_hash: AppHash::try_from(vec![0x03; 32]).expect("valid app hash"),
        last_results_hash: None,
        evidence_hash: None,
        proposer_address: validators[0].address,
    };
    let commit = block::Commit {
        height,
        round: ROUND.into(),
        block_id: block_id(),
        signatures,
    };

    block::signed_header::SignedHeader::new(header, commit).expect("valid signed header")
}
