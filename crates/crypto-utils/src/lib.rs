//! # crypto-utils
//!
//! Hash primitives and secp256k1 helpers shared by the UTXO transaction
//! engine: double SHA-256, HASH160, BLAKE-256, personalized BLAKE2b-256, and encoding of
//! externally produced `(R,S)` signatures.

pub mod error;
pub mod hash;
pub mod signature;

pub use error::CryptoError;
