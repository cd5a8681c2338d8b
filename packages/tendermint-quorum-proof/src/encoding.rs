//! Canonical protobuf encoding of CometBFT precommit votes.
//!
//! Validators sign `MarshalDelimited(CanonicalVote)`:
//!
//! ```text
//! CanonicalVote {
//!     1: type       (varint)
//!     2: height     (sfixed64)
//!     3: round      (sfixed64)
//!     4: block_id   (CanonicalBlockID { 1: hash, 2: CanonicalPartSetHeader { 1: total, 2: hash } })
//!     5: timestamp  (google.protobuf.Timestamp, never elided)
//!     6: chain_id   (string)
//! }
//! ```
//!
//! Zero-valued scalar fields are elided (a round of `0` does not appear on the
//! wire), which is why the prefix is produced by the protobuf encoder instead
//! of being laid out by hand.

use alloy_primitives::B256;
use prost::Message;
use tendermint_proto::{
    google::protobuf::Timestamp,
    v0_38::types::{CanonicalPartSetHeader, CanonicalVote, SignedMsgType},
};

use crate::{
    error::QuorumProofError,
    types::{Commit, CommonEncodedVotePart},
};

/// Key of a length-delimited (wire type 2) field.
const fn length_delimited_key(field_number: u8) -> u8 {
    (field_number << 3) | 2
}

/// `CanonicalVote.block_id`
pub const BLOCK_ID_KEY: u8 = length_delimited_key(4);
/// `CanonicalBlockID.hash`
pub const BLOCK_HASH_KEY: u8 = length_delimited_key(1);
/// `CanonicalBlockID.part_set_header`
pub const PART_SET_HEADER_KEY: u8 = length_delimited_key(2);
/// `CanonicalVote.timestamp`
pub const TIMESTAMP_KEY: u8 = length_delimited_key(5);
/// `CanonicalVote.chain_id`
pub const CHAIN_ID_KEY: u8 = length_delimited_key(6);

/// Seconds of `0001-01-01T00:00:00Z` relative to the unix epoch, the zero
/// value of a Go `time.Time`.
pub const ZERO_TIME_SECONDS: i64 = -62_135_596_800;

/// `CanonicalVote.timestamp` holding the zero time: key, length and
/// `Timestamp { seconds: ZERO_TIME_SECONDS }`.
///
/// The consensus engine never elides the timestamp, so a vote encoded with
/// only `{type, height, round}` set always ends with these bytes. Re-check if
/// the upstream vote encoding changes.
pub const ZERO_TIMESTAMP_FIELD: [u8; 13] = [
    0x2a, 0x0b, 0x08, 0x80, 0x92, 0xb8, 0xc3, 0x98, 0xfe, 0xff, 0xff, 0xff, 0x01,
];

/// Length of a SHA-256 block hash.
const HASH_LEN: u8 = 32;

/// Encodes the `{type, height, round}` head of a canonical vote.
///
/// # Errors
/// Returns [`QuorumProofError::EncodingFailure`] if the height does not fit
/// the `sfixed64` field or the encoding does not end with
/// [`ZERO_TIMESTAMP_FIELD`].
pub fn encode_prefix(
    msg_type: SignedMsgType,
    height: u64,
    round: u32,
) -> Result<Vec<u8>, QuorumProofError> {
    let height = i64::try_from(height).map_err(|_| QuorumProofError::EncodingFailure {
        reason: format!("height {height} exceeds sfixed64"),
    })?;

    let vote = CanonicalVote {
        r#type: msg_type as i32,
        height,
        round: i64::from(round),
        block_id: None,
        timestamp: Some(Timestamp {
            seconds: ZERO_TIME_SECONDS,
            nanos: 0,
        }),
        chain_id: String::new(),
    };

    let mut delimited = Vec::with_capacity(vote.encoded_len() + 1);
    vote.encode_length_delimited(&mut delimited)?;

    let body_len = prost::decode_length_delimiter(delimited.as_slice())?;
    let body = &delimited[prost::length_delimiter_len(body_len)..];

    body.strip_suffix(&ZERO_TIMESTAMP_FIELD)
        .map(<[u8]>::to_vec)
        .ok_or_else(|| QuorumProofError::EncodingFailure {
            reason: "canonical vote does not end with the zero timestamp".into(),
        })
}

/// Encodes the part set header field of the block id, key included.
///
/// # Errors
/// Returns [`QuorumProofError::EncodingFailure`] if the buffer cannot hold the
/// encoding.
pub fn encode_suffix(total: u32, hash: &B256) -> Result<Vec<u8>, QuorumProofError> {
    let part_set_header = CanonicalPartSetHeader {
        total,
        hash: hash.to_vec(),
    };

    let mut suffix = Vec::with_capacity(part_set_header.encoded_len() + 2);
    suffix.push(PART_SET_HEADER_KEY);
    part_set_header.encode_length_delimited(&mut suffix)?;
    Ok(suffix)
}

/// Encodes a vote timestamp as a bare `google.protobuf.Timestamp` message.
#[must_use]
pub fn encode_timestamp(timestamp: &Timestamp) -> Vec<u8> {
    timestamp.encode_to_vec()
}

/// Encodes the `chain_id` field, key included.
#[must_use]
pub fn encode_chain_id(chain_id: &str) -> Vec<u8> {
    let mut encoded = Vec::with_capacity(chain_id.len() + 2);
    encoded.push(CHAIN_ID_KEY);
    prost::encoding::encode_varint(chain_id.len() as u64, &mut encoded);
    encoded.extend_from_slice(chain_id.as_bytes());
    encoded
}

impl CommonEncodedVotePart {
    /// Derives the shared vote segments of a commit.
    ///
    /// The prefix is extended with the block id key and length and the block
    /// hash key and length, so that the block hash follows it directly.
    ///
    /// # Errors
    /// Fails if the prefix or the suffix cannot be encoded.
    pub fn from_commit(commit: &Commit) -> Result<Self, QuorumProofError> {
        let suffix = encode_suffix(
            commit.block_id.part_set_header.total,
            &commit.block_id.part_set_header.hash,
        )?;
        let mut prefix = encode_prefix(commit.msg_type, commit.height, commit.round)?;

        // 72 for any part set total below 128
        let block_id_len = 2 + usize::from(HASH_LEN) + suffix.len();
        prefix.push(BLOCK_ID_KEY);
        prost::encode_length_delimiter(block_id_len, &mut prefix)?;
        prefix.extend_from_slice(&[BLOCK_HASH_KEY, HASH_LEN]);

        Ok(Self {
            signed_data_prefix: prefix.into(),
            signed_data_suffix: suffix.into(),
        })
    }
}


#[cfg(test)]
mod encode_prefix {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::first_block(1)]
    #[case::regular(4_242_424)]
    #[case::beyond_u32(u64::from(u32::MAX) + 7)]
    fn starts_with_type_and_height(#[case] height: u64) {
        let prefix = encode_prefix(SignedMsgType::Precommit, height, 0).unwrap();
        assert!(hex::encode(&prefix).starts_with("080211"));
        assert_eq!(&prefix[3..11], &height.to_le_bytes());
    }

    #[test]
    fn elides_zero_round() {
        let prefix = encode_prefix(SignedMsgType::Precommit, 10, 0).unwrap();
        // type (2 bytes) + height (9 bytes)
        assert_eq!(prefix.len(), 11);

        let prefix = encode_prefix(SignedMsgType::Precommit, 10, 1).unwrap();
        // type (2 bytes) + height (9 bytes) + round (9 bytes)
        assert_eq!(prefix.len(), 20);
        assert_eq!(prefix[11], 0x19);
        assert_eq!(&prefix[12..], &1_u64.to_le_bytes());
    }

    #[test]
    fn is_deterministic() {
        let first = encode_prefix(SignedMsgType::Precommit, 4_242_424, 3).unwrap();
        let second = encode_prefix(SignedMsgType::Precommit, 4_242_424, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn fails_on_height_overflow() {
        let res = encode_prefix(SignedMsgType::Precommit, u64::MAX, 0);
        assert!(matches!(res, Err(QuorumProofError::EncodingFailure { .. })));
    }
}



#[cfg(test)]
mod encode_chain_id {
    use super::*;

    #[test]
    fn prepends_key_and_length() {
        assert_eq!(encode_chain_id("band"), b"\x32\x04band");
    }
}
