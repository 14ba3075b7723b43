use blake_hash::{Blake256, Digest as _};
use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Single SHA-256.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// Double SHA-256, the digest behind Base58Check checksums, txids and the
/// legacy / BIP143 signature hashes.
pub fn sha256d(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// HASH160: RIPEMD-160(SHA-256(data)), used for pubkey-hash and script-hash
/// payloads.
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

pub fn ripemd160(data: &[u8]) -> [u8; 20] {
    Ripemd160::digest(data).into()
}

/// BLAKE-256 (the SHA-3 finalist, not BLAKE2), used by Decred.
pub fn blake256(data: &[u8]) -> [u8; 32] {
    let mut result = [0u8; 32];
    result.copy_from_slice(Blake256::digest(data).as_slice());
    result
}

/// Double BLAKE-256, the digest behind Decred Base58Check checksums.
pub fn blake256d(data: &[u8]) -> [u8; 32] {
    blake256(&blake256(data))
}

/// BLAKE2b-256 keyed with a 16-byte personalization string.
pub fn blake2b_256(personalization: &[u8; 16], data: &[u8]) -> [u8; 32] {
    let hash = blake2b_simd::Params::new()
        .hash_length(32)
        .personal(personalization)
        .hash(data);

    let mut result = [0u8; 32];
    result.copy_from_slice(hash.as_bytes());
    result
}
