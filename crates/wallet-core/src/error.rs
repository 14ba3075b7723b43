use chain_utxo::UtxoError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WalletError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),
}

impl From<crypto_utils::CryptoError> for WalletError {
    fn from(e: crypto_utils::CryptoError) -> Self {
        WalletError::SigningFailed(e.to_string())
    }
}

impl From<UtxoError> for WalletError {
    fn from(e: UtxoError) -> Self {
        match e {
            UtxoError::SignatureCountMismatch { .. }
            | UtxoError::AlreadySigned
            | UtxoError::InvalidSignature(_)
            | UtxoError::InvalidPublicKey(_) => WalletError::SigningFailed(e.to_string()),
            _ => WalletError::TransactionFailed(e.to_string()),
        }
    }
}
