use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_signature() {
        let err = CryptoError::InvalidSignature("r is zero".into());
        assert_eq!(err.to_string(), "invalid signature: r is zero");
    }

    #[test]
    fn display_invalid_public_key() {
        let err = CryptoError::InvalidPublicKey("not on curve".into());
        assert_eq!(err.to_string(), "invalid public key: not on curve");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> =
            Box::new(CryptoError::InvalidSignature("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
