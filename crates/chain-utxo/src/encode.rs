//! Wire encoding: CompactSize integers, outpoints, outputs, and whole
//! transactions in the Bitcoin and Zcash (v3 / v4) layouts.

use crate::params::ZcashTxFormat;
use crate::sign::CompletedInput;
use crate::transaction::{TxOut, UnsignedTx};
use crate::types::Outpoint;

/// Flag bit marking a Zcash transaction as overwintered.
pub const OVERWINTERED_FLAG: u32 = 1 << 31;

const SEGWIT_MARKER: u8 = 0x00;
const SEGWIT_FLAG: u8 = 0x01;

/// Write a Bitcoin-style CompactSize (variable-length integer).
pub fn write_compact_size(buf: &mut Vec<u8>, val: u64) {
    if val < 0xFD {
        buf.push(val as u8);
    } else if val <= 0xFFFF {
        buf.push(0xFD);
        buf.extend_from_slice(&(val as u16).to_le_bytes());
    } else if val <= 0xFFFF_FFFF {
        buf.push(0xFE);
        buf.extend_from_slice(&(val as u32).to_le_bytes());
    } else {
        buf.push(0xFF);
        buf.extend_from_slice(&val.to_le_bytes());
    }
}

/// CompactSize length prefix followed by the bytes.
pub fn write_var_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_compact_size(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

pub fn write_outpoint(buf: &mut Vec<u8>, outpoint: &Outpoint) {
    buf.extend_from_slice(&outpoint.hash);
    buf.extend_from_slice(&outpoint.index.to_le_bytes());
}

/// 8-byte little-endian value followed by the locking script.
pub fn write_output(buf: &mut Vec<u8>, output: &TxOut) {
    buf.extend_from_slice(&output.value.to_le_bytes());
    write_var_bytes(buf, &output.script_pubkey);
}

/// Serialize `tx`, with unlocking data from `completed` when present and
/// empty scripts otherwise. Witness data is written only when
/// `include_witness` is set and at least one input carries a witness.
pub(crate) fn serialize_transaction(
    tx: &UnsignedTx,
    completed: Option<&[CompletedInput]>,
    include_witness: bool,
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(10 + tx.inputs.len() * 150 + tx.outputs.len() * 40);

    let has_witness = include_witness
        && completed.is_some_and(|inputs| inputs.iter().any(|c| !c.witness.is_empty()));

    // Header
    match &tx.zcash {
        Some(header) => {
            buf.extend_from_slice(&(tx.version | OVERWINTERED_FLAG).to_le_bytes());
            buf.extend_from_slice(&header.version_group_id.to_le_bytes());
        }
        None => {
            buf.extend_from_slice(&tx.version.to_le_bytes());
            if has_witness {
                buf.push(SEGWIT_MARKER);
                buf.push(SEGWIT_FLAG);
            }
        }
    }

    // Inputs
    write_compact_size(&mut buf, tx.inputs.len() as u64);
    for (i, input) in tx.inputs.iter().enumerate() {
        write_outpoint(&mut buf, &input.spent_output.outpoint);
        let script_sig = completed
            .and_then(|c| c.get(i))
            .map(|c| c.script_sig.as_slice())
            .unwrap_or(&[]);
        write_var_bytes(&mut buf, script_sig);
        buf.extend_from_slice(&input.sequence.to_le_bytes());
    }

    // Outputs
    write_compact_size(&mut buf, tx.outputs.len() as u64);
    for output in &tx.outputs {
        write_output(&mut buf, output);
    }

    // Witnesses
    if has_witness {
        for i in 0..tx.inputs.len() {
            let stack = completed
                .and_then(|c| c.get(i))
                .map(|c| c.witness.as_slice())
                .unwrap_or(&[]);
            write_compact_size(&mut buf, stack.len() as u64);
            for item in stack {
                write_var_bytes(&mut buf, item);
            }
        }
    }

    buf.extend_from_slice(&tx.lock_time.to_le_bytes());

    if let Some(header) = &tx.zcash {
        buf.extend_from_slice(&header.expiry_height.to_le_bytes());
        if header.format == ZcashTxFormat::Sapling {
            buf.extend_from_slice(&0i64.to_le_bytes()); // valueBalance
            write_compact_size(&mut buf, 0); // nShieldedSpend
            write_compact_size(&mut buf, 0); // nShieldedOutput
        }
        write_compact_size(&mut buf, 0); // nJoinSplit
    }

    buf
}
