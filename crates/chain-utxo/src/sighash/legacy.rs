use crypto_utils::hash::sha256d;

use crate::encode::{write_compact_size, write_outpoint, write_output, write_var_bytes};
use crate::transaction::UnsignedTx;

/// Pre-segwit digest: every input script is emptied except the one being
/// signed, which carries `script_code`; the hash type is appended as a
/// 4-byte integer.
pub(super) fn signature_hash(
    tx: &UnsignedTx,
    index: usize,
    script_code: &[u8],
    hash_type: u32,
) -> [u8; 32] {
    let mut buf = Vec::with_capacity(64 + tx.inputs.len() * 41 + script_code.len());
    buf.extend_from_slice(&tx.version.to_le_bytes());

    write_compact_size(&mut buf, tx.inputs.len() as u64);
    for (i, input) in tx.inputs.iter().enumerate() {
        write_outpoint(&mut buf, &input.spent_output.outpoint);
        if i == index {
            write_var_bytes(&mut buf, script_code);
        } else {
            write_compact_size(&mut buf, 0);
        }
        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }

    write_compact_size(&mut buf, tx.outputs.len() as u64);
    for output in &tx.outputs {
        write_output(&mut buf, output);
    }

    buf.extend_from_slice(&tx.lock_time.to_le_bytes());
    buf.extend_from_slice(&hash_type.to_le_bytes());
    sha256d(&buf)
}
