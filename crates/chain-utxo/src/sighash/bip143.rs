use crypto_utils::hash::sha256d;

use crate::encode::{write_outpoint, write_output, write_var_bytes};
use crate::transaction::UnsignedTx;
use crate::types::Input;

/// Transaction-wide components of the BIP143 preimage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bip143Hashes {
    pub hash_prevouts: [u8; 32],
    pub hash_sequence: [u8; 32],
    pub hash_outputs: [u8; 32],
}

impl Bip143Hashes {
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
            hash_prevouts: sha256d(&prevouts),
            hash_sequence: sha256d(&sequences),
            hash_outputs: sha256d(&outputs),
        }
    }
}

/// BIP143 digest for SIGHASH_ALL, with or without the fork-id bit in
/// `hash_type`.
pub(super) fn signature_hash(
    tx: &UnsignedTx,
    hashes: &Bip143Hashes,
    input: &Input,
    script_code: &[u8],
    hash_type: u32,
) -> [u8; 32] {
    let mut buf = Vec::with_capacity(160 + script_code.len());
    buf.extend_from_slice(&tx.version.to_le_bytes());
    buf.extend_from_slice(&hashes.hash_prevouts);
    buf.extend_from_slice(&hashes.hash_sequence);
    write_outpoint(&mut buf, &input.spent_output.outpoint);
    write_var_bytes(&mut buf, script_code);
    buf.extend_from_slice(&input.spent_output.value.to_le_bytes());
    buf.extend_from_slice(&input.sequence.to_le_bytes());
    buf.extend_from_slice(&hashes.hash_outputs);
    buf.extend_from_slice(&tx.lock_time.to_le_bytes());
    buf.extend_from_slice(&hash_type.to_le_bytes());
    sha256d(&buf)
}
