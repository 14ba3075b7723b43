use proptest::prelude::*;

use chain_utxo::address::{self, base58check, cashaddr, segwit};
use chain_utxo::params::{
    ChainParams, HashScheme, BITCOIN_CASH_MAINNET, BITCOIN_MAINNET, DECRED_MAINNET,
    DECRED_TESTNET, DOGECOIN_MAINNET, LITECOIN_MAINNET, ZCASH_MAINNET, ZCASH_TESTNET,
};
use chain_utxo::UtxoError;

const ALL_PARAMS: [ChainParams; 8] = [
    BITCOIN_MAINNET,
    BITCOIN_CASH_MAINNET,
    ZCASH_MAINNET,
    ZCASH_TESTNET,
    LITECOIN_MAINNET,
    DOGECOIN_MAINNET,
    DECRED_MAINNET,
    DECRED_TESTNET,
];

fn arb_scheme() -> impl Strategy<Value = HashScheme> {
    prop_oneof![Just(HashScheme::Sha256), Just(HashScheme::Blake256)]
}

fn arb_tag() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        any::<u8>().prop_map(|b| vec![b]),
        any::<[u8; 2]>().prop_map(|b| b.to_vec()),
    ]
}

fn arb_cash_hash() -> impl Strategy<Value = Vec<u8>> {
    prop::sample::select(vec![20usize, 24, 28, 32, 40, 48, 56, 64])
        .prop_flat_map(|len| prop::collection::vec(any::<u8>(), len))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn base58check_roundtrip(
        tag in arb_tag(),
        hash in prop::array::uniform20(any::<u8>()),
        scheme in arb_scheme(),
    ) {
        let encoded = base58check::encode(&tag, &hash, scheme);
        let decoded = base58check::decode(&encoded, scheme).unwrap();
        prop_assert_eq!(decoded.tag, tag);
        prop_assert_eq!(decoded.hash, hash);
    }

    #[test]
    fn cashaddr_roundtrip(kind in 0u8..16, hash in arb_cash_hash()) {
        let encoded = cashaddr::encode("bitcoincash", kind, &hash).unwrap();
        let decoded = cashaddr::decode(&encoded, "bitcoincash").unwrap();
        prop_assert_eq!(decoded.kind, kind);
        prop_assert_eq!(decoded.hash, hash);
    }

    #[test]
    fn segwit_roundtrip(hash in prop::array::uniform32(any::<u8>())) {
        let encoded = segwit::encode("bc", 0, &hash).unwrap();
        let decoded = segwit::decode(&encoded, "bc").unwrap();
        prop_assert_eq!(decoded.version, 0);
        prop_assert_eq!(decoded.program, hash.to_vec());
    }

    #[test]
    fn chain_address_roundtrip(hash in prop::array::uniform20(any::<u8>()), script in any::<bool>()) {
        for params in ALL_PARAMS {
            let tag = if script { params.script_hash_tag } else { params.pubkey_hash_tag };
            let encoded = base58check::encode(tag, &hash, params.hash_scheme);
            let decoded = address::decode(&encoded, &params).unwrap();
            prop_assert_eq!(address::encode(&decoded, &params).unwrap(), encoded);
        }
    }

    #[test]
    fn base58check_detects_single_character_change(
        hash in prop::array::uniform20(any::<u8>()),
        position in 1usize..34,
        replacement in prop::sample::select(
            "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz".chars().collect::<Vec<_>>()
        ),
        scheme in arb_scheme(),
    ) {
        let encoded = base58check::encode(&[0x00], &hash, scheme);
        let position = position % encoded.len();
        let mut chars: Vec<char> = encoded.chars().collect();
        prop_assume!(chars[position] != replacement);
        chars[position] = replacement;
        let corrupted: String = chars.into_iter().collect();
        prop_assert!(base58check::decode(&corrupted, scheme).is_err());
    }

    #[test]
    fn cashaddr_detects_single_character_change(
        hash in prop::array::uniform20(any::<u8>()),
        position in 0usize..42,
        replacement in prop::sample::select(
            "qpzry9x8gf2tvdw0s3jn54khce6mua7l".chars().collect::<Vec<_>>()
        ),
    ) {
        let encoded = cashaddr::encode("bitcoincash", 0, &hash).unwrap();
        let (prefix, body) = encoded.split_at("bitcoincash:".len());
        let mut chars: Vec<char> = body.chars().collect();
        let position = position % chars.len();
        prop_assume!(chars[position] != replacement);
        chars[position] = replacement;
        let corrupted = format!("{prefix}{}", chars.into_iter().collect::<String>());
        let err = cashaddr::decode(&corrupted, "bitcoincash").unwrap_err();
        prop_assert!(matches!(err, UtxoError::Checksum(_)));
    }

    #[test]
    fn decoders_never_panic_on_strings(input in ".{0,100}") {
        for params in ALL_PARAMS {
            let _ = address::decode(&input, &params);
        }
        let _ = base58check::decode(&input, HashScheme::Sha256);
        let _ = base58check::decode(&input, HashScheme::Blake256);
        let _ = cashaddr::decode(&input, "bitcoincash");
        let _ = segwit::decode(&input, "bc");
    }

    #[test]
    fn decoders_never_panic_on_bytes(bytes in prop::collection::vec(any::<u8>(), 0..100)) {
        let input = String::from_utf8_lossy(&bytes);
        for params in ALL_PARAMS {
            let _ = address::decode(&input, &params);
        }
        let _ = cashaddr::decode(&input, "bitcoincash");
    }

    #[test]
    fn decoders_never_panic_on_near_miss(
        body in "[qpzry9x8gf2tvdw0s3jn54khce6mua7lQPZRY]{0,60}",
        prefix in prop::sample::select(vec!["", "bitcoincash:", "bc1", "BC1", "bchreg:", ":"]),
    ) {
        let input = format!("{prefix}{body}");
        for params in ALL_PARAMS {
            let _ = address::decode(&input, &params);
        }
    }
}
