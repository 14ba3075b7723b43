//! Immutable per-network parameters: address version tags, bech32 / CashAddr
//! prefixes, digest family and the Zcash network-upgrade schedule.

use crypto_utils::hash::{blake256, blake256d, hash160, ripemd160, sha256d};

/// Digest and wire-format family a chain belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainFamily {
    /// Bitcoin and its direct derivatives: legacy digests for non-witness
    /// spends, BIP143 for witness spends.
    Bitcoin,
    /// Bitcoin Cash: BIP143 preimage with the fork-id flag on every input.
    BitcoinCash,
    /// Zcash transparent transactions: Overwinter / Sapling BLAKE2b digests
    /// and the extended header.
    Zcash,
    /// Decred: addresses only. Its transaction format and signature hashes
    /// are not produced by this engine.
    Decred,
}

/// Hash function family behind Base58Check checksums and address hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashScheme {
    /// Double SHA-256 checksums, RIPEMD-160(SHA-256) hashes.
    Sha256,
    /// Double BLAKE-256 checksums, RIPEMD-160(BLAKE-256) hashes.
    Blake256,
}

impl HashScheme {
    /// Four-byte Base58Check checksum of `payload`.
    pub fn checksum(self, payload: &[u8]) -> [u8; 4] {
        let digest = match self {
            HashScheme::Sha256 => sha256d(payload),
            HashScheme::Blake256 => blake256d(payload),
        };
        [digest[0], digest[1], digest[2], digest[3]]
    }

    /// 20-byte hash committed to by pubkey-hash and script-hash addresses.
    pub fn hash160(self, data: &[u8]) -> [u8; 20] {
        match self {
            HashScheme::Sha256 => hash160(data),
            HashScheme::Blake256 => ripemd160(&blake256(data)),
        }
    }
}

/// Zcash transaction format implied by a network upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZcashTxFormat {
    /// Pre-Overwinter. Not produced by this engine.
    Sprout,
    /// v3, ZIP-143 signature digest.
    Overwinter,
    /// v4, ZIP-243 signature digest.
    Sapling,
}

impl ZcashTxFormat {
    /// Transaction version number (without the overwintered flag bit).
    pub fn version(self) -> Option<u32> {
        match self {
            ZcashTxFormat::Sprout => None,
            ZcashTxFormat::Overwinter => Some(3),
            ZcashTxFormat::Sapling => Some(4),
        }
    }

    /// Version group ID carried in the header after the version.
    pub fn version_group_id(self) -> Option<u32> {
        match self {
            ZcashTxFormat::Sprout => None,
            ZcashTxFormat::Overwinter => Some(OVERWINTER_VERSION_GROUP_ID),
            ZcashTxFormat::Sapling => Some(SAPLING_VERSION_GROUP_ID),
        }
    }
}

/// Overwinter version group ID.
pub const OVERWINTER_VERSION_GROUP_ID: u32 = 0x03C4_8270;

/// Sapling version group ID.
pub const SAPLING_VERSION_GROUP_ID: u32 = 0x892F_2085;

/// A Zcash network upgrade and the consensus branch ID it activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkUpgrade {
    pub name: &'static str,
    pub activation_height: u32,
    pub branch_id: u32,
    pub tx_format: ZcashTxFormat,
}

const fn upgrade(
    name: &'static str,
    activation_height: u32,
    branch_id: u32,
    tx_format: ZcashTxFormat,
) -> NetworkUpgrade {
    NetworkUpgrade {
        name,
        activation_height,
        branch_id,
        tx_format,
    }
}

pub const ZCASH_MAINNET_UPGRADES: &[NetworkUpgrade] = &[
    upgrade("sprout", 0, 0x0000_0000, ZcashTxFormat::Sprout),
    upgrade("overwinter", 347_500, 0x5BA8_1B19, ZcashTxFormat::Overwinter),
    upgrade("sapling", 419_200, 0x76B8_09BB, ZcashTxFormat::Sapling),
    upgrade("blossom", 653_600, 0x2BB4_0E60, ZcashTxFormat::Sapling),
    upgrade("heartwood", 903_000, 0xF5B9_230B, ZcashTxFormat::Sapling),
    upgrade("canopy", 1_046_400, 0xE9FF_75A6, ZcashTxFormat::Sapling),
    upgrade("nu5", 1_687_104, 0xC2D6_D0B4, ZcashTxFormat::Sapling),
    upgrade("nu6", 2_726_400, 0xC8E7_1055, ZcashTxFormat::Sapling),
];

pub const ZCASH_TESTNET_UPGRADES: &[NetworkUpgrade] = &[
    upgrade("sprout", 0, 0x0000_0000, ZcashTxFormat::Sprout),
    upgrade("overwinter", 207_500, 0x5BA8_1B19, ZcashTxFormat::Overwinter),
    upgrade("sapling", 280_000, 0x76B8_09BB, ZcashTxFormat::Sapling),
    upgrade("blossom", 584_000, 0x2BB4_0E60, ZcashTxFormat::Sapling),
    upgrade("heartwood", 903_800, 0xF5B9_230B, ZcashTxFormat::Sapling),
    upgrade("canopy", 1_028_500, 0xE9FF_75A6, ZcashTxFormat::Sapling),
    upgrade("nu5", 1_842_420, 0xC2D6_D0B4, ZcashTxFormat::Sapling),
    upgrade("nu6", 2_976_000, 0xC8E7_1055, ZcashTxFormat::Sapling),
];

/// Regtest node started with `-nuparams` activating one upgrade per block,
/// so every branch is reachable from a short chain.
pub const ZCASH_REGTEST_UPGRADES: &[NetworkUpgrade] = &[
    upgrade("sprout", 0, 0x0000_0000, ZcashTxFormat::Sprout),
    upgrade("overwinter", 1, 0x5BA8_1B19, ZcashTxFormat::Overwinter),
    upgrade("sapling", 2, 0x76B8_09BB, ZcashTxFormat::Sapling),
    upgrade("blossom", 3, 0x2BB4_0E60, ZcashTxFormat::Sapling),
    upgrade("heartwood", 4, 0xF5B9_230B, ZcashTxFormat::Sapling),
    upgrade("canopy", 5, 0xE9FF_75A6, ZcashTxFormat::Sapling),
    upgrade("nu5", 6, 0xC2D6_D0B4, ZcashTxFormat::Sapling),
    upgrade("nu6", 7, 0xC8E7_1055, ZcashTxFormat::Sapling),
];

/// Parameters for one network of one chain.
///
/// Values are plain `'static` tables, so a `ChainParams` is `Copy` and can be
/// handed to every codec and digest function by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainParams {
    pub name: &'static str,
    pub family: ChainFamily,
    /// Base58Check version tag for pay-to-pubkey-hash (1 or 2 bytes).
    pub pubkey_hash_tag: &'static [u8],
    /// Base58Check version tag for pay-to-script-hash (1 or 2 bytes).
    pub script_hash_tag: &'static [u8],
    /// Human-readable part for segwit addresses; `None` when the chain has
    /// no witness support.
    pub bech32_hrp: Option<&'static str>,
    /// CashAddr network prefix (Bitcoin Cash only).
    pub cashaddr_prefix: Option<&'static str>,
    pub hash_scheme: HashScheme,
    /// Default transaction version for the Bitcoin and Bitcoin Cash families.
    /// Zcash derives its version from the active upgrade instead.
    pub tx_version: u32,
    /// Zcash upgrade schedule, ordered by activation height. Empty elsewhere.
    pub upgrades: &'static [NetworkUpgrade],
}

impl ChainParams {
    /// Whether witness programs can be paid to and spent from.
    pub fn supports_segwit(&self) -> bool {
        self.family == ChainFamily::Bitcoin && self.bech32_hrp.is_some()
    }

    /// The upgrade in force at `height`: the entry with the highest
    /// activation height not above `height`.
    pub fn upgrade_at(&self, height: u32) -> Option<&'static NetworkUpgrade> {
        self.upgrades
            .iter()
            .filter(|u| u.activation_height <= height)
            .last()
    }
}

const fn bitcoin_like(
    name: &'static str,
    pubkey_hash_tag: &'static [u8],
    script_hash_tag: &'static [u8],
    bech32_hrp: Option<&'static str>,
    tx_version: u32,
) -> ChainParams {
    ChainParams {
        name,
        family: ChainFamily::Bitcoin,
        pubkey_hash_tag,
        script_hash_tag,
        bech32_hrp,
        cashaddr_prefix: None,
        hash_scheme: HashScheme::Sha256,
        tx_version,
        upgrades: &[],
    }
}

const fn bitcoin_cash(
    name: &'static str,
    pubkey_hash_tag: &'static [u8],
    script_hash_tag: &'static [u8],
    prefix: &'static str,
) -> ChainParams {
    ChainParams {
        name,
        family: ChainFamily::BitcoinCash,
        pubkey_hash_tag,
        script_hash_tag,
        bech32_hrp: None,
        cashaddr_prefix: Some(prefix),
        hash_scheme: HashScheme::Sha256,
        tx_version: 1,
        upgrades: &[],
    }
}

const fn zcash(
    name: &'static str,
    pubkey_hash_tag: &'static [u8],
    script_hash_tag: &'static [u8],
    upgrades: &'static [NetworkUpgrade],
) -> ChainParams {
    ChainParams {
        name,
        family: ChainFamily::Zcash,
        pubkey_hash_tag,
        script_hash_tag,
        bech32_hrp: None,
        cashaddr_prefix: None,
        hash_scheme: HashScheme::Sha256,
        tx_version: 4,
        upgrades,
    }
}

const fn decred(
    name: &'static str,
    pubkey_hash_tag: &'static [u8],
    script_hash_tag: &'static [u8],
) -> ChainParams {
    ChainParams {
        name,
        family: ChainFamily::Decred,
        pubkey_hash_tag,
        script_hash_tag,
        bech32_hrp: None,
        cashaddr_prefix: None,
        hash_scheme: HashScheme::Blake256,
        tx_version: 1,
        upgrades: &[],
    }
}

pub const BITCOIN_MAINNET: ChainParams = bitcoin_like("bitcoin", &[0x00], &[0x05], Some("bc"), 2);
pub const BITCOIN_TESTNET: ChainParams =
    bitcoin_like("bitcoin-testnet", &[0x6F], &[0xC4], Some("tb"), 2);
pub const BITCOIN_REGTEST: ChainParams =
    bitcoin_like("bitcoin-regtest", &[0x6F], &[0xC4], Some("bcrt"), 2);

pub const BITCOIN_CASH_MAINNET: ChainParams =
    bitcoin_cash("bitcoincash", &[0x00], &[0x05], "bitcoincash");
pub const BITCOIN_CASH_TESTNET: ChainParams =
    bitcoin_cash("bitcoincash-testnet", &[0x6F], &[0xC4], "bchtest");
pub const BITCOIN_CASH_REGTEST: ChainParams =
    bitcoin_cash("bitcoincash-regtest", &[0x6F], &[0xC4], "bchreg");

pub const ZCASH_MAINNET: ChainParams =
    zcash("zcash", &[0x1C, 0xB8], &[0x1C, 0xBD], ZCASH_MAINNET_UPGRADES);
pub const ZCASH_TESTNET: ChainParams =
    zcash("zcash-testnet", &[0x1D, 0x25], &[0x1C, 0xBA], ZCASH_TESTNET_UPGRADES);
pub const ZCASH_REGTEST: ChainParams =
    zcash("zcash-regtest", &[0x1D, 0x25], &[0x1C, 0xBA], ZCASH_REGTEST_UPGRADES);

pub const LITECOIN_MAINNET: ChainParams =
    bitcoin_like("litecoin", &[0x30], &[0x32], Some("ltc"), 2);
pub const LITECOIN_TESTNET: ChainParams =
    bitcoin_like("litecoin-testnet", &[0x6F], &[0x3A], Some("tltc"), 2);
pub const LITECOIN_REGTEST: ChainParams =
    bitcoin_like("litecoin-regtest", &[0x6F], &[0x3A], Some("rltc"), 2);

pub const DOGECOIN_MAINNET: ChainParams = bitcoin_like("dogecoin", &[0x1E], &[0x16], None, 1);
pub const DOGECOIN_TESTNET: ChainParams =
    bitcoin_like("dogecoin-testnet", &[0x71], &[0xC4], None, 1);
pub const DOGECOIN_REGTEST: ChainParams =
    bitcoin_like("dogecoin-regtest", &[0x6F], &[0xC4], None, 1);

pub const DASH_MAINNET: ChainParams = bitcoin_like("dash", &[0x4C], &[0x10], None, 2);
pub const DASH_TESTNET: ChainParams = bitcoin_like("dash-testnet", &[0x8C], &[0x13], None, 2);

pub const DIGIBYTE_MAINNET: ChainParams =
    bitcoin_like("digibyte", &[0x1E], &[0x3F], Some("dgb"), 2);
pub const DIGIBYTE_TESTNET: ChainParams =
    bitcoin_like("digibyte-testnet", &[0x7E], &[0x8C], Some("dgbt"), 2);
pub const DIGIBYTE_REGTEST: ChainParams =
    bitcoin_like("digibyte-regtest", &[0x7E], &[0x8C], Some("dgbrt"), 2);

pub const QTUM_MAINNET: ChainParams = bitcoin_like("qtum", &[0x3A], &[0x32], Some("qc"), 2);
pub const QTUM_TESTNET: ChainParams =
    bitcoin_like("qtum-testnet", &[0x78], &[0x6E], Some("tq"), 2);

pub const PEERCOIN_MAINNET: ChainParams =
    bitcoin_like("peercoin", &[0x37], &[0x75], Some("pc"), 3);
pub const PEERCOIN_TESTNET: ChainParams =
    bitcoin_like("peercoin-testnet", &[0x6F], &[0xC4], Some("tpc"), 3);

pub const BITGESELL_MAINNET: ChainParams =
    bitcoin_like("bitgesell", &[0x0A], &[0x19], Some("bgl"), 2);
pub const BITGESELL_TESTNET: ChainParams =
    bitcoin_like("bitgesell-testnet", &[0x22], &[0x32], Some("tbgl"), 2);

// secp256k1 ECDSA pubkey-hash ("Ds" / "Ts") and script-hash ("Dc" / "Tc").
pub const DECRED_MAINNET: ChainParams = decred("decred", &[0x07, 0x3F], &[0x07, 0x1A]);
pub const DECRED_TESTNET: ChainParams = decred("decred-testnet", &[0x0F, 0x21], &[0x0E, 0xFC]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bitcoin_supports_segwit() {
        assert!(BITCOIN_MAINNET.supports_segwit());
        assert!(LITECOIN_TESTNET.supports_segwit());
    }

    #[test]
    fn non_witness_chains_do_not_support_segwit() {
        assert!(!DOGECOIN_MAINNET.supports_segwit());
        assert!(!BITCOIN_CASH_MAINNET.supports_segwit());
        assert!(!ZCASH_MAINNET.supports_segwit());
    }

    #[test]
    fn zcash_tags_are_two_bytes() {
        for params in [ZCASH_MAINNET, ZCASH_TESTNET, ZCASH_REGTEST] {
            assert_eq!(params.pubkey_hash_tag.len(), 2);
            assert_eq!(params.script_hash_tag.len(), 2);
        }
    }

    #[test]
    fn upgrade_selection_picks_highest_active() {
        assert_eq!(ZCASH_MAINNET.upgrade_at(0).unwrap().name, "sprout");
        assert_eq!(ZCASH_MAINNET.upgrade_at(347_499).unwrap().name, "sprout");
        assert_eq!(ZCASH_MAINNET.upgrade_at(347_500).unwrap().name, "overwinter");
        assert_eq!(ZCASH_MAINNET.upgrade_at(419_199).unwrap().name, "overwinter");
        assert_eq!(ZCASH_MAINNET.upgrade_at(419_200).unwrap().name, "sapling");
        assert_eq!(ZCASH_MAINNET.upgrade_at(1_046_400).unwrap().name, "canopy");
        assert_eq!(ZCASH_MAINNET.upgrade_at(u32::MAX).unwrap().name, "nu6");
    }

    #[test]
    fn regtest_reaches_every_upgrade() {
        for (height, expected) in ZCASH_REGTEST_UPGRADES.iter().enumerate() {
            let upgrade = ZCASH_REGTEST.upgrade_at(height as u32).unwrap();
            assert_eq!(upgrade.name, expected.name);
        }
        let overwinter = ZCASH_REGTEST.upgrade_at(1).unwrap();
        assert_eq!(overwinter.tx_format, ZcashTxFormat::Overwinter);
        assert_eq!(ZCASH_REGTEST.upgrade_at(1_000).unwrap().name, "nu6");
    }

    #[test]
    fn checksum_schemes_differ() {
        let payload = [0x07, 0x3F, 0x00];
        assert_eq!(HashScheme::Sha256.checksum(&payload), sha256d(&payload)[..4]);
        assert_eq!(HashScheme::Blake256.checksum(&payload), blake256d(&payload)[..4]);
        assert_ne!(
            HashScheme::Sha256.checksum(&payload),
            HashScheme::Blake256.checksum(&payload)
        );
    }

    #[test]
    fn decred_params() {
        for params in [DECRED_MAINNET, DECRED_TESTNET] {
            assert_eq!(params.family, ChainFamily::Decred);
            assert_eq!(params.hash_scheme, HashScheme::Blake256);
            assert_eq!(params.pubkey_hash_tag.len(), 2);
            assert!(!params.supports_segwit());
        }
    }

    #[test]
    fn non_zcash_chains_have_no_upgrades() {
        assert!(BITCOIN_MAINNET.upgrade_at(1_000_000).is_none());
    }

    #[test]
    fn tx_format_versions() {
        assert_eq!(ZcashTxFormat::Overwinter.version(), Some(3));
        assert_eq!(ZcashTxFormat::Sapling.version(), Some(4));
        assert_eq!(ZcashTxFormat::Sprout.version(), None);
        assert_eq!(
            ZcashTxFormat::Sapling.version_group_id(),
            Some(SAPLING_VERSION_GROUP_ID)
        );
        assert_eq!(
            ZcashTxFormat::Overwinter.version_group_id(),
            Some(OVERWINTER_VERSION_GROUP_ID)
        );
    }

    #[test]
    fn clone_and_copy() {
        let params = BITCOIN_MAINNET;
        let copy = params;
        assert_eq!(params, copy);
    }
}
