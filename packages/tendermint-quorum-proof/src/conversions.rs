//! Conversion from `tendermint` light-block types.

use alloy_primitives::B256;
use tendermint::{block::CommitSig, Hash};
use tendermint_proto::{google::protobuf::Timestamp, v0_38::types::SignedMsgType};

use crate::{
    error::QuorumProofError,
    types::{BlockId, Commit, PartSetHeader, SignedHeader, VoteRecord},
};

impl TryFrom<&tendermint::block::signed_header::SignedHeader> for SignedHeader {
    type Error = QuorumProofError;

    /// Absent votes carry no validator address and are dropped; nil votes are
    /// kept but not counted for the block.
    fn try_from(
        signed_header: &tendermint::block::signed_header::SignedHeader,
    ) -> Result<Self, Self::Error> {
        let commit = &signed_header.commit;

        let votes = commit
            .signatures
            .iter()
            .filter_map(|commit_sig| match commit_sig {
                CommitSig::BlockIdFlagAbsent => None,
                CommitSig::BlockIdFlagCommit {
                    validator_address,
                    timestamp,
                    signature,
                } => Some((validator_address, timestamp, signature, true)),
                CommitSig::BlockIdFlagNil {
                    validator_address,
                    timestamp,
                    signature,
                } => Some((validator_address, timestamp, signature, false)),
            })
            .map(|(validator_address, timestamp, signature, for_block)| {
                let signature = match signature {
                    Some(signature) => signature.as_bytes().to_vec(),
                    None if for_block => {
                        return Err(QuorumProofError::InvalidHeader {
                            reason: format!("commit vote of {validator_address} has no signature"),
                        })
                    }
                    None => Vec::new(),
                };

                Ok(VoteRecord {
                    validator_address: *validator_address,
                    for_block,
                    signature,
                    timestamp: Timestamp::from(*timestamp),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            chain_id: signed_header.header.chain_id.to_string(),
            commit: Commit {
                msg_type: SignedMsgType::Precommit,
                height: commit.height.value(),
                round: commit.round.value(),
                block_id: BlockId {
                    hash: sha256_hash(&commit.block_id.hash, "block hash")?,
                    part_set_header: PartSetHeader {
                        total: commit.block_id.part_set_header.total,
                        hash: sha256_hash(&commit.block_id.part_set_header.hash, "part set hash")?,
                    },
                },
                votes,
            },
        })
    }
}

fn sha256_hash(hash: &Hash, name: &str) -> Result<B256, QuorumProofError> {
    match hash {
        Hash::Sha256(bytes) => Ok(B256::from(*bytes)),
        Hash::None => Err(QuorumProofError::InvalidHeader {
            reason: format!("{name} is empty"),
        }),
    }
}
