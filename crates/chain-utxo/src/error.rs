use thiserror::Error;

/// UTXO transaction engine errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UtxoError {
    #[error("checksum mismatch: {0}")]
    Checksum(String),

    #[error("unsupported address type: {0}")]
    UnsupportedAddressType(String),

    #[error("malformed input: {0}")]
    MalformedInput(String),

    #[error("value out of range: {0}")]
    ValueRange(String),

    #[error("signature count mismatch: expected {expected}, got {got}")]
    SignatureCountMismatch { expected: usize, got: usize },

    #[error("transaction already signed")]
    AlreadySigned,

    #[error("digest computation failed: {0}")]
    DigestComputation(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

impl From<crypto_utils::CryptoError> for UtxoError {
    fn from(e: crypto_utils::CryptoError) -> Self {
        match e {
            crypto_utils::CryptoError::InvalidSignature(msg) => UtxoError::InvalidSignature(msg),
            crypto_utils::CryptoError::InvalidPublicKey(msg) => UtxoError::InvalidPublicKey(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_checksum() {
        let err = UtxoError::Checksum("base58check".into());
        assert_eq!(err.to_string(), "checksum mismatch: base58check");
    }

    #[test]
    fn display_unsupported_address_type() {
        let err = UtxoError::UnsupportedAddressType("witness program".into());
        assert_eq!(err.to_string(), "unsupported address type: witness program");
    }

    #[test]
    fn display_signature_count_mismatch() {
        let err = UtxoError::SignatureCountMismatch {
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "signature count mismatch: expected 3, got 2"
        );
    }

    #[test]
    fn display_already_signed() {
        assert_eq!(
            UtxoError::AlreadySigned.to_string(),
            "transaction already signed"
        );
    }

    #[test]
    fn crypto_errors_convert() {
        let err: UtxoError =
            crypto_utils::CryptoError::InvalidPublicKey("bad point".into()).into();
        assert_eq!(err, UtxoError::InvalidPublicKey("bad point".into()));
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(UtxoError::MalformedInput("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn debug_format_works() {
        let debug = format!("{:?}", UtxoError::AlreadySigned);
        assert!(debug.contains("AlreadySigned"));
    }
}
