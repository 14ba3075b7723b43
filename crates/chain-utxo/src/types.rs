use crate::error::UtxoError;

/// Sequence number used when the caller does not set one: final, no
/// relative lock-time, no replace-by-fee signalling.
pub const DEFAULT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// Reference to an output of a previous transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outpoint {
    /// Transaction hash in internal (wire) byte order.
    pub hash: [u8; 32],
    /// Output index within that transaction.
    pub index: u32,
}

impl Outpoint {
    pub fn new(hash: [u8; 32], index: u32) -> Self {
        Self { hash, index }
    }

    /// Parse a display-order (big-endian) txid hex string into an outpoint.
    pub fn from_txid_hex(txid_hex: &str, index: u32) -> Result<Self, UtxoError> {
        let bytes = hex::decode(txid_hex)
            .map_err(|e| UtxoError::MalformedInput(format!("invalid txid hex: {e}")))?;
        if bytes.len() != 32 {
            return Err(UtxoError::MalformedInput(format!(
                "txid must be 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut hash = [0u8; 32];
        for (i, &b) in bytes.iter().rev().enumerate() {
            hash[i] = b;
        }
        Ok(Self { hash, index })
    }

    /// Display-order hex of the referenced transaction id.
    pub fn txid_hex(&self) -> String {
        let mut display = self.hash;
        display.reverse();
        hex::encode(display)
    }
}

/// A spendable output, as reported by the node that funds the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub outpoint: Outpoint,
    /// Value in the chain's base unit (satoshi, zatoshi, ...).
    pub value: u64,
    /// The locking script of the output.
    pub pubkey_script: Vec<u8>,
}

/// An output selected for spending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Input {
    pub spent_output: Output,
    /// Redeem script (P2SH) or witness script (P2WSH) that the spent
    /// output's script commits to. `None` spends `pubkey_script` directly.
    pub sig_script: Option<Vec<u8>>,
    pub sequence: u32,
}

impl Input {
    pub fn new(spent_output: Output) -> Self {
        Self {
            spent_output,
            sig_script: None,
            sequence: DEFAULT_SEQUENCE,
        }
    }

    pub fn with_sig_script(mut self, sig_script: Vec<u8>) -> Self {
        self.sig_script = Some(sig_script);
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }
}

/// A payment target. The address is resolved to a locking script when the
/// transaction is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub address: String,
    pub value: u64,
}

impl Recipient {
    pub fn new(address: impl Into<String>, value: u64) -> Self {
        Self {
            address: address.into(),
            value,
        }
    }
}

/// Amounts go on the wire as signed 64-bit integers; anything that would
/// read back negative is rejected rather than clamped.
pub(crate) fn checked_amount(value: u64, what: &str) -> Result<i64, UtxoError> {
    i64::try_from(value).map_err(|_| {
        UtxoError::ValueRange(format!("{what} value {value} is negative as a signed amount"))
    })
}
