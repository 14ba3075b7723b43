//! UTXO transaction engine for Bitcoin-derived chains.
//!
//! Encodes and decodes Base58Check, bech32 segwit and CashAddr addresses,
//! assembles transactions from spendable outputs and recipients, computes
//! legacy, BIP143, fork-id and Zcash Overwinter / Sapling signature
//! digests, completes inputs from external signatures, and serializes the
//! result to each chain's wire format.

pub mod address;
pub mod encode;
pub mod error;
pub mod params;
pub mod script;
pub mod sighash;
pub mod sign;
pub mod transaction;
pub mod types;

pub use address::{Address, AddressFormat, Payload};
pub use error::UtxoError;
pub use params::{ChainFamily, ChainParams};
pub use sighash::SighashAlgorithm;
pub use transaction::{build_tx, SignedTx, Tx, TxOptions, TxOut, UnsignedTx};
pub use types::{Input, Outpoint, Output, Recipient};
