use k256::ecdsa::Signature;

use crate::error::CryptoError;

/// Length of a compact `R || S` signature.
pub const COMPACT_SIGNATURE_LEN: usize = 64;

/// Length of a recoverable `R || S || V` signature.
pub const RECOVERABLE_SIGNATURE_LEN: usize = 65;

/// DER-encode an externally produced secp256k1 signature.
///
/// Accepts either the 64-byte compact form or the 65-byte recoverable form
/// (the trailing recovery byte is ignored). High-S values are normalized to
/// low-S before encoding, so the output is always a standard signature.
pub fn der_encode(signature: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let compact = match signature.len() {
        COMPACT_SIGNATURE_LEN | RECOVERABLE_SIGNATURE_LEN => &signature[..COMPACT_SIGNATURE_LEN],
        other => {
            return Err(CryptoError::InvalidSignature(format!(
                "expected 64 or 65 bytes, got {other}"
            )))
        }
    };

    let sig = Signature::from_slice(compact)
        .map_err(|e| CryptoError::InvalidSignature(format!("invalid (r, s) pair: {e}")))?;
    let sig = sig.normalize_s().unwrap_or(sig);

    Ok(sig.to_der().as_bytes().to_vec())
}

/// Check that `pubkey` is a valid SEC1-encoded secp256k1 point (compressed or
/// uncompressed).
pub fn validate_public_key(pubkey: &[u8]) -> Result<(), CryptoError> {
    k256::PublicKey::from_sec1_bytes(pubkey)
        .map(|_| ())
        .map_err(|e| CryptoError::InvalidPublicKey(format!("{e}")))
}
