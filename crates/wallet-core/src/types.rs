use chain_utxo::params::{self, ChainParams};
use serde::{Deserialize, Serialize};

/// Supported UTXO networks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Chain {
    Bitcoin,
    BitcoinTestnet,
    BitcoinRegtest,
    BitcoinCash,
    BitcoinCashTestnet,
    BitcoinCashRegtest,
    Zcash,
    ZcashTestnet,
    ZcashRegtest,
    Litecoin,
    LitecoinTestnet,
    LitecoinRegtest,
    Dogecoin,
    DogecoinTestnet,
    DogecoinRegtest,
    Dash,
    DashTestnet,
    DigiByte,
    DigiByteTestnet,
    DigiByteRegtest,
    Qtum,
    QtumTestnet,
    Peercoin,
    PeercoinTestnet,
    Bitgesell,
    BitgesellTestnet,
    Decred,
    DecredTestnet,
}

impl Chain {
    pub const ALL: [Chain; 28] = [
        Chain::Bitcoin,
        Chain::BitcoinTestnet,
        Chain::BitcoinRegtest,
        Chain::BitcoinCash,
        Chain::BitcoinCashTestnet,
        Chain::BitcoinCashRegtest,
        Chain::Zcash,
        Chain::ZcashTestnet,
        Chain::ZcashRegtest,
        Chain::Litecoin,
        Chain::LitecoinTestnet,
        Chain::LitecoinRegtest,
        Chain::Dogecoin,
        Chain::DogecoinTestnet,
        Chain::DogecoinRegtest,
        Chain::Dash,
        Chain::DashTestnet,
        Chain::DigiByte,
        Chain::DigiByteTestnet,
        Chain::DigiByteRegtest,
        Chain::Qtum,
        Chain::QtumTestnet,
        Chain::Peercoin,
        Chain::PeercoinTestnet,
        Chain::Bitgesell,
        Chain::BitgesellTestnet,
        Chain::Decred,
        Chain::DecredTestnet,
    ];

    /// Address, digest and wire-format parameters for this network
    pub fn params(&self) -> ChainParams {
        match self {
            Chain::Bitcoin => params::BITCOIN_MAINNET,
            Chain::BitcoinTestnet => params::BITCOIN_TESTNET,
            Chain::BitcoinRegtest => params::BITCOIN_REGTEST,
            Chain::BitcoinCash => params::BITCOIN_CASH_MAINNET,
            Chain::BitcoinCashTestnet => params::BITCOIN_CASH_TESTNET,
            Chain::BitcoinCashRegtest => params::BITCOIN_CASH_REGTEST,
            Chain::Zcash => params::ZCASH_MAINNET,
            Chain::ZcashTestnet => params::ZCASH_TESTNET,
            Chain::ZcashRegtest => params::ZCASH_REGTEST,
            Chain::Litecoin => params::LITECOIN_MAINNET,
            Chain::LitecoinTestnet => params::LITECOIN_TESTNET,
            Chain::LitecoinRegtest => params::LITECOIN_REGTEST,
            Chain::Dogecoin => params::DOGECOIN_MAINNET,
            Chain::DogecoinTestnet => params::DOGECOIN_TESTNET,
            Chain::DogecoinRegtest => params::DOGECOIN_REGTEST,
            Chain::Dash => params::DASH_MAINNET,
            Chain::DashTestnet => params::DASH_TESTNET,
            Chain::DigiByte => params::DIGIBYTE_MAINNET,
            Chain::DigiByteTestnet => params::DIGIBYTE_TESTNET,
            Chain::DigiByteRegtest => params::DIGIBYTE_REGTEST,
            Chain::Qtum => params::QTUM_MAINNET,
            Chain::QtumTestnet => params::QTUM_TESTNET,
            Chain::Peercoin => params::PEERCOIN_MAINNET,
            Chain::PeercoinTestnet => params::PEERCOIN_TESTNET,
            Chain::Bitgesell => params::BITGESELL_MAINNET,
            Chain::BitgesellTestnet => params::BITGESELL_TESTNET,
            Chain::Decred => params::DECRED_MAINNET,
            Chain::DecredTestnet => params::DECRED_TESTNET,
        }
    }

    /// Native token symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Chain::Bitcoin | Chain::BitcoinTestnet | Chain::BitcoinRegtest => "BTC",
            Chain::BitcoinCash | Chain::BitcoinCashTestnet | Chain::BitcoinCashRegtest => "BCH",
            Chain::Zcash | Chain::ZcashTestnet | Chain::ZcashRegtest => "ZEC",
            Chain::Litecoin | Chain::LitecoinTestnet | Chain::LitecoinRegtest => "LTC",
            Chain::Dogecoin | Chain::DogecoinTestnet | Chain::DogecoinRegtest => "DOGE",
            Chain::Dash | Chain::DashTestnet => "DASH",
            Chain::DigiByte | Chain::DigiByteTestnet | Chain::DigiByteRegtest => "DGB",
            Chain::Qtum | Chain::QtumTestnet => "QTUM",
            Chain::Peercoin | Chain::PeercoinTestnet => "PPC",
            Chain::Bitgesell | Chain::BitgesellTestnet => "BGL",
            Chain::Decred | Chain::DecredTestnet => "DCR",
        }
    }

    /// Whether this is a test or regression network
    pub fn is_testnet(&self) -> bool {
        !matches!(
            self,
            Chain::Bitcoin
                | Chain::BitcoinCash
                | Chain::Zcash
                | Chain::Litecoin
                | Chain::Dogecoin
                | Chain::Dash
                | Chain::DigiByte
                | Chain::Qtum
                | Chain::Peercoin
                | Chain::Bitgesell
                | Chain::Decred
        )
    }
}

/// A spendable output as reported by a node or indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtxoData {
    /// Display-order (big-endian) transaction id hex
    pub txid: String,
    pub vout: u32,
    pub amount_sat: u64,
    #[serde(with = "hex_bytes")]
    pub script_pubkey: Vec<u8>,
    /// Redeem script (P2SH) or witness script (P2WSH)
    #[serde(default, with = "hex_bytes_opt", skip_serializing_if = "Option::is_none")]
    pub sub_script: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

/// A payment target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientData {
    pub address: String,
    pub amount_sat: u64,
}

/// Per-transaction settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfig {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub lock_time: u32,
    /// Required on Zcash networks
    #[serde(default)]
    pub expiry_height: Option<u32>,
}

/// Everything needed to build one transaction, as submitted by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxRequest {
    pub chain: Chain,
    pub utxos: Vec<UtxoData>,
    pub recipients: Vec<RecipientData>,
    #[serde(default)]
    pub config: TxConfig,
}

/// Decoded address details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInfo {
    pub chain: Chain,
    pub kind: AddressKind,
    #[serde(with = "hex_bytes")]
    pub script_pubkey: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressKind {
    PubkeyHash,
    ScriptHash,
    WitnessProgram,
}

/// Unsigned transaction and the digests an external signer must sign
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    /// One 32-byte digest per input, in input order
    pub sighashes: Vec<Vec<u8>>,
    /// Wire bytes with empty unlocking scripts
    pub unsigned_tx: Vec<u8>,
    pub fee_sat: u64,
}

/// Signed transaction ready for broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw_tx: Vec<u8>,
    /// Display-order transaction id hex
    pub txid: String,
}

mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

mod hex_bytes_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        bytes: &Option<Vec<u8>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match bytes {
            Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<u8>>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|s| hex::decode(s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
