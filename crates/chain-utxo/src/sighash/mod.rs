//! SighashEngine: per-input signature digests.
//!
//! The algorithm is chosen once per input from the chain family and the
//! resolved [`SpendPath`], then dispatched by [`SighashCache`]. The
//! BIP143 and Zcash variants share whole-transaction hash components
//! across inputs; the cache computes each of them at most once.

mod bip143;
mod legacy;
mod zcash;

use std::cell::OnceCell;

use crate::error::UtxoError;
use crate::params::ChainFamily;
use crate::script::SpendPath;
use crate::transaction::UnsignedTx;

pub use bip143::Bip143Hashes;
pub use zcash::ZcashHashes;

/// Sign over all inputs and all outputs.
pub const SIGHASH_ALL: u32 = 0x01;

/// Bitcoin Cash replay-protection flag.
pub const SIGHASH_FORKID: u32 = 0x40;

/// Signature digest algorithm for one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SighashAlgorithm {
    /// Pre-segwit: substituted-script copy of the transaction, double SHA-256.
    Legacy,
    /// BIP143 witness digest.
    Bip143,
    /// BIP143 preimage with the fork-id flag (Bitcoin Cash, every input).
    Bip143ForkId,
    /// ZIP-143 / ZIP-243 BLAKE2b digest keyed by consensus branch ID.
    ZcashBlake2b,
}

impl SighashAlgorithm {
    pub fn select(family: ChainFamily, path: &SpendPath) -> Result<Self, UtxoError> {
        match family {
            ChainFamily::BitcoinCash => Ok(SighashAlgorithm::Bip143ForkId),
            ChainFamily::Zcash => Ok(SighashAlgorithm::ZcashBlake2b),
            ChainFamily::Bitcoin if path.is_witness() => Ok(SighashAlgorithm::Bip143),
            ChainFamily::Bitcoin => Ok(SighashAlgorithm::Legacy),
            ChainFamily::Decred => Err(UtxoError::UnsupportedAddressType(
                "Decred signature hashes".into(),
            )),
        }
    }

    /// Hash type committed to by the digest and appended to the signature.
    pub fn hash_type(self) -> u32 {
        match self {
            SighashAlgorithm::Bip143ForkId => SIGHASH_ALL | SIGHASH_FORKID,
            _ => SIGHASH_ALL,
        }
    }
}

/// Digest computation over one unsigned transaction.
pub struct SighashCache<'a> {
    tx: &'a UnsignedTx,
    bip143: OnceCell<Bip143Hashes>,
    zcash: OnceCell<ZcashHashes>,
}

impl<'a> SighashCache<'a> {
    pub fn new(tx: &'a UnsignedTx) -> Self {
        Self {
            tx,
            bip143: OnceCell::new(),
            zcash: OnceCell::new(),
        }
    }

    /// Digest for input `index` under its selected algorithm.
    pub fn signature_hash(&self, index: usize) -> Result<[u8; 32], UtxoError> {
        let (input, path) = self
            .tx
            .inputs
            .get(index)
            .zip(self.tx.spend_paths.get(index))
            .ok_or_else(|| {
                UtxoError::DigestComputation(format!(
                    "input index {index} out of range for {} inputs",
                    self.tx.inputs.len()
                ))
            })?;

        let algorithm = SighashAlgorithm::select(self.tx.params.family, path)?;
        let hash_type = algorithm.hash_type();
        tracing::trace!(index, ?algorithm, hash_type, "computing signature digest");

        let digest = match algorithm {
            SighashAlgorithm::Legacy => {
                legacy::signature_hash(self.tx, index, path.script_code(), hash_type)
            }
            SighashAlgorithm::Bip143 | SighashAlgorithm::Bip143ForkId => {
                let hashes = self.bip143.get_or_init(|| Bip143Hashes::new(self.tx));
                bip143::signature_hash(self.tx, hashes, input, path.script_code(), hash_type)
            }
            SighashAlgorithm::ZcashBlake2b => {
                let header = self.tx.zcash.as_ref().ok_or_else(|| {
                    UtxoError::DigestComputation("missing Zcash header".into())
                })?;
                let hashes = self.zcash.get_or_init(|| ZcashHashes::new(self.tx));
                zcash::signature_hash(
                    self.tx,
                    header,
                    hashes,
                    input,
                    path.script_code(),
                    hash_type,
                )
            }
        };
        Ok(digest)
    }

    /// Digests for every input, in input order.
    pub fn all(&self) -> Result<Vec<[u8; 32]>, UtxoError> {
        (0..self.tx.inputs.len())
            .map(|index| self.signature_hash(index))
            .collect()
    }
}
