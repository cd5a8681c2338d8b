//! Reconstruction of the exact bytes a validator signed.

use alloy_primitives::B256;

use crate::{encoding::TIMESTAMP_KEY, error::QuorumProofError, types::CommonEncodedVotePart};

/// Assembles the sign bytes of a single precommit.
///
/// The body is
/// `prefix || block_hash || suffix || 0x2a len(ts) || ts || encoded_chain_id`
/// and is preceded by its own length delimiter, as the consensus engine frames
/// the whole vote before signing.
///
/// # Errors
/// Returns [`QuorumProofError::EncodingFailure`] if a length delimiter cannot
/// be written.
pub fn assemble(
    common: &CommonEncodedVotePart,
    block_hash: &B256,
    encoded_timestamp: &[u8],
    encoded_chain_id: &[u8],
) -> Result<Vec<u8>, QuorumProofError> {
    let body_len = common.signed_data_prefix.len()
        + block_hash.len()
        + common.signed_data_suffix.len()
        + 1
        + prost::length_delimiter_len(encoded_timestamp.len())
        + encoded_timestamp.len()
        + encoded_chain_id.len();

    let mut message = Vec::with_capacity(body_len + prost::length_delimiter_len(body_len));
    prost::encode_length_delimiter(body_len, &mut message)?;
    message.extend_from_slice(&common.signed_data_prefix);
    message.extend_from_slice(block_hash.as_slice());
    message.extend_from_slice(&common.signed_data_suffix);
    message.push(TIMESTAMP_KEY);
    prost::encode_length_delimiter(encoded_timestamp.len(), &mut message)?;
    message.extend_from_slice(encoded_timestamp);
    message.extend_from_slice(encoded_chain_id);

    debug_assert_eq!(
        message.len(),
        body_len + prost::length_delimiter_len(body_len)
    );
    Ok(message)
}
