use crypto_utils::hash::blake2b_256;

use crate::encode::{write_outpoint, write_output, write_var_bytes, OVERWINTERED_FLAG};
use crate::params::ZcashTxFormat;
use crate::transaction::{UnsignedTx, ZcashHeader};
use crate::types::Input;

const PREVOUTS_PERSONALIZATION: &[u8; 16] = b"ZcashPrevoutHash";
const SEQUENCE_PERSONALIZATION: &[u8; 16] = b"ZcashSequencHash";
const OUTPUTS_PERSONALIZATION: &[u8; 16] = b"ZcashOutputsHash";
const SIGHASH_PERSONALIZATION_PREFIX: &[u8; 12] = b"ZcashSigHash";

/// Transaction-wide components of the Overwinter / Sapling preimage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZcashHashes {
    pub hash_prevouts: [u8; 32],
    pub hash_sequence: [u8; 32],
    pub hash_outputs: [u8; 32],
}

impl ZcashHashes {
    pub fn new(tx: &UnsignedTx) -> Self {
        let mut prevouts = Vec::with_capacity(tx.inputs.len() * 36);
        let mut sequences = Vec::with_capacity(tx.inputs.len() * 4);
        for input in &tx.inputs {
            write_outpoint(&mut prevouts, &input.spent_output.outpoint);
            sequences.extend_from_slice(&input.sequence.to_le_bytes());
        }

        let mut outputs = Vec::with_capacity(tx.outputs.len() * 34);
        for output in &tx.outputs {
            write_output(&mut outputs, output);
        }

        Self {
            hash_prevouts: blake2b_256(PREVOUTS_PERSONALIZATION, &prevouts),
            hash_sequence: blake2b_256(SEQUENCE_PERSONALIZATION, &sequences),
            hash_outputs: blake2b_256(OUTPUTS_PERSONALIZATION, &outputs),
        }
    }
}

/// "ZcashSigHash" followed by the little-endian consensus branch ID.
pub(crate) fn sighash_personalization(branch_id: u32) -> [u8; 16] {
    let mut personalization = [0u8; 16];
    personalization[..12].copy_from_slice(SIGHASH_PERSONALIZATION_PREFIX);
    personalization[12..].copy_from_slice(&branch_id.to_le_bytes());
    personalization
}

/// Transparent-input digest for Overwinter (ZIP-143) and Sapling (ZIP-243).
pub(super) fn signature_hash(
    tx: &UnsignedTx,
    header: &ZcashHeader,
    hashes: &ZcashHashes,
    input: &Input,
    script_code: &[u8],
    hash_type: u32,
) -> [u8; 32] {
    let sapling = header.format == ZcashTxFormat::Sapling;

    let mut buf = Vec::with_capacity(256 + script_code.len());
    buf.extend_from_slice(&(tx.version | OVERWINTERED_FLAG).to_le_bytes());
    buf.extend_from_slice(&header.version_group_id.to_le_bytes());
    buf.extend_from_slice(&hashes.hash_prevouts);
    buf.extend_from_slice(&hashes.hash_sequence);
    buf.extend_from_slice(&hashes.hash_outputs);
    buf.extend_from_slice(&[0u8; 32]); // hashJoinSplits
    if sapling {
        buf.extend_from_slice(&[0u8; 32]); // hashShieldedSpends
        buf.extend_from_slice(&[0u8; 32]); // hashShieldedOutputs
    }
    buf.extend_from_slice(&tx.lock_time.to_le_bytes());
    buf.extend_from_slice(&header.expiry_height.to_le_bytes());
    if sapling {
        buf.extend_from_slice(&0i64.to_le_bytes()); // valueBalance
    }
    buf.extend_from_slice(&hash_type.to_le_bytes());

    write_outpoint(&mut buf, &input.spent_output.outpoint);
    write_var_bytes(&mut buf, script_code);
    buf.extend_from_slice(&input.spent_output.value.to_le_bytes());
    buf.extend_from_slice(&input.sequence.to_le_bytes());

    blake2b_256(&sighash_personalization(header.branch_id), &buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personalization_layout() {
        let p = sighash_personalization(0x76B8_09BB);
        assert_eq!(&p[..12], b"ZcashSigHash");
        assert_eq!(&p[12..], &[0xBB, 0x09, 0xB8, 0x76]);
    }

    #[test]
    fn field_personalizations_are_sixteen_bytes() {
        assert_eq!(PREVOUTS_PERSONALIZATION.len(), 16);
        assert_eq!(SEQUENCE_PERSONALIZATION.len(), 16);
        assert_eq!(OUTPUTS_PERSONALIZATION.len(), 16);
    }
}
