//! CashAddr: Bitcoin Cash's base32 address format with a 40-bit BCH-code
//! checksum.

use crate::error::UtxoError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Feedback taps of the checksum polynomial.
const GENERATORS: [u64; 5] = [
    0x98_f2bc_8e61,
    0x79_b76d_99e2,
    0xf3_3e5f_b3c4,
    0xae_2eab_e2a8,
    0x1e_4f43_e470,
];

const CHECKSUM_LEN: usize = 8;

/// Hash lengths indexed by the size bits of the version byte.
const HASH_SIZES: [usize; 8] = [20, 24, 28, 32, 40, 48, 56, 64];

/// Type field for pay-to-pubkey-hash payloads.
pub const TYPE_PUBKEY_HASH: u8 = 0;

/// Type field for pay-to-script-hash payloads.
pub const TYPE_SCRIPT_HASH: u8 = 1;

/// Decoded CashAddr payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashPayload {
    /// Address type from the high bits of the version byte.
    pub kind: u8,
    pub hash: Vec<u8>,
}

/// Encode `hash` as a CashAddr string `prefix:payload`.
pub fn encode(prefix: &str, kind: u8, hash: &[u8]) -> Result<String, UtxoError> {
    if kind > 0x0F {
        return Err(UtxoError::UnsupportedAddressType(format!(
            "cashaddr type {kind} does not fit in four bits"
        )));
    }
    let size_bits = HASH_SIZES
        .iter()
        .position(|&len| len == hash.len())
        .ok_or_else(|| {
            UtxoError::MalformedInput(format!("unsupported cashaddr hash length {}", hash.len()))
        })?;

    let mut raw = Vec::with_capacity(1 + hash.len());
    raw.push((kind << 3) | size_bits as u8);
    raw.extend_from_slice(hash);

    let payload = convert_bits(&raw, 8, 5, true)
        .ok_or_else(|| UtxoError::MalformedInput("cashaddr payload conversion failed".into()))?;
    let checksum = create_checksum(prefix, &payload);

    let mut out = String::with_capacity(prefix.len() + 1 + payload.len() + CHECKSUM_LEN);
    out.push_str(prefix);
    out.push(':');
    for value in payload.iter().chain(checksum.iter()) {
        out.push(CHARSET[*value as usize] as char);
    }
    Ok(out)
}

/// Decode a CashAddr string. A missing prefix is taken to be
/// `default_prefix`; an explicit prefix must match it.
pub fn decode(address: &str, default_prefix: &str) -> Result<CashPayload, UtxoError> {
    let has_lower = address.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = address.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(UtxoError::MalformedInput("cashaddr must not mix case".into()));
    }
    let address = address.to_ascii_lowercase();

    let (prefix, body) = match address.rsplit_once(':') {
        Some((prefix, body)) => (prefix, body),
        None => (default_prefix, address.as_str()),
    };
    if prefix != default_prefix {
        return Err(UtxoError::MalformedInput(format!(
            "expected cashaddr prefix {default_prefix}, got {prefix}"
        )));
    }

    let data = body
        .bytes()
        .map(|c| {
            CHARSET
                .iter()
                .position(|&x| x == c)
                .map(|p| p as u8)
                .ok_or_else(|| {
                    UtxoError::MalformedInput(format!("invalid cashaddr character {:?}", c as char))
                })
        })
        .collect::<Result<Vec<u8>, UtxoError>>()?;

    if data.len() <= CHECKSUM_LEN {
        return Err(UtxoError::MalformedInput("cashaddr payload too short".into()));
    }

    let mut values = expand_prefix(prefix);
    values.extend_from_slice(&data);
    if polymod(&values) != 0 {
        return Err(UtxoError::Checksum("cashaddr checksum mismatch".into()));
    }

    let payload = &data[..data.len() - CHECKSUM_LEN];
    let raw = convert_bits(payload, 5, 8, false)
        .ok_or_else(|| UtxoError::MalformedInput("invalid cashaddr padding".into()))?;

    let (&version, hash) = raw
        .split_first()
        .ok_or_else(|| UtxoError::MalformedInput("empty cashaddr payload".into()))?;
    if version & 0x80 != 0 {
        return Err(UtxoError::MalformedInput(
            "reserved bit set in cashaddr version byte".into(),
        ));
    }
    let expected_len = HASH_SIZES[(version & 0x07) as usize];
    if hash.len() != expected_len {
        return Err(UtxoError::MalformedInput(format!(
            "cashaddr version declares {expected_len} hash bytes, got {}",
            hash.len()
        )));
    }

    Ok(CashPayload {
        kind: (version >> 3) & 0x0F,
        hash: hash.to_vec(),
    })
}

/// 40-bit checksum polynomial over GF(32) values.
fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (i, generator) in GENERATORS.iter().enumerate() {
            if (c0 >> i) & 1 == 1 {
                c ^= generator;
            }
        }
    }
    c ^ 1
}

/// Lower five bits of each prefix character followed by a zero separator.
fn expand_prefix(prefix: &str) -> Vec<u8> {
    let mut out: Vec<u8> = prefix.bytes().map(|c| c & 0x1F).collect();
    out.push(0);
    out
}

fn create_checksum(prefix: &str, payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(payload);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let modulus = polymod(&values);

    let mut checksum = [0u8; CHECKSUM_LEN];
    for (i, slot) in checksum.iter_mut().enumerate() {
        *slot = ((modulus >> (5 * (7 - i))) & 0x1F) as u8;
    }
    checksum
}

/// Regroup `data` from `from`-bit to `to`-bit values. Without padding,
/// leftover bits must be fewer than `from` and all zero.
fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let max_value: u32 = (1 << to) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        let value = u32::from(value);
        if value >> from != 0 {
            return None;
        }
        acc = (acc << from) | value;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & max_value) as u8);
        }
        acc &= (1 << bits) - 1;
    }

    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE_HASH: &str = "f5bf48b397dae70be82b3cca4793f8eb2b6cdac9";

    fn spec_hash() -> Vec<u8> {
        hex::decode(REFERENCE_HASH).unwrap()
    }

    #[test]
    fn regtest_p2pkh_vector() {
        let addr = encode("bchreg", TYPE_PUBKEY_HASH, &spec_hash()).unwrap();
        assert_eq!(addr, "bchreg:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eyphnpcjvs");
    }

    #[test]
    fn reference_vectors() {
        let hash = spec_hash();
        assert_eq!(
            encode("bitcoincash", TYPE_PUBKEY_HASH, &hash).unwrap(),
            "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2"
        );
        assert_eq!(
            encode("bchtest", TYPE_SCRIPT_HASH, &hash).unwrap(),
            "bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t"
        );
        assert_eq!(
            encode("pref", TYPE_SCRIPT_HASH, &hash).unwrap(),
            "pref:pr6m7j9njldwwzlg9v7v53unlr4jkmx6ey65nvtks5"
        );
        assert_eq!(
            encode("prefix", 15, &hash).unwrap(),
            "prefix:0r6m7j9njldwwzlg9v7v53unlr4jkmx6ey3qnjwsrf"
        );
    }

    #[test]
    fn decode_reference_vector() {
        let payload =
            decode("bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", "bitcoincash")
                .unwrap();
        assert_eq!(payload.kind, TYPE_PUBKEY_HASH);
        assert_eq!(payload.hash, spec_hash());
    }

    #[test]
    fn decode_without_prefix() {
        let payload = decode("qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg2", "bitcoincash").unwrap();
        assert_eq!(payload.hash, spec_hash());
    }

    #[test]
    fn decode_uppercase() {
        let payload = decode(
            "BITCOINCASH:QR6M7J9NJLDWWZLG9V7V53UNLR4JKMX6EYLEP8EKG2",
            "bitcoincash",
        )
        .unwrap();
        assert_eq!(payload.hash, spec_hash());
    }

    #[test]
    fn mixed_case_rejected() {
        assert!(decode(
            "bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekG2",
            "bitcoincash"
        )
        .is_err());
    }

    #[test]
    fn wrong_prefix_rejected() {
        assert!(decode("bchtest:pr6m7j9njldwwzlg9v7v53unlr4jkmx6eyvwc0uz5t", "bitcoincash").is_err());
    }

    #[test]
    fn checksum_error_detected() {
        let err = decode("bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekg3", "bitcoincash")
            .unwrap_err();
        assert!(matches!(err, UtxoError::Checksum(_)));
    }

    #[test]
    fn invalid_character_rejected() {
        let err = decode("bitcoincash:qr6m7j9njldwwzlg9v7v53unlr4jkmx6eylep8ekgb", "bitcoincash")
            .unwrap_err();
        assert!(matches!(err, UtxoError::MalformedInput(_)));
    }

    #[test]
    fn p2sh32_vector() {
        let addr = encode("bitcoincash", TYPE_SCRIPT_HASH, &[0x5A; 32]).unwrap();
        assert_eq!(
            addr,
            "bitcoincash:pdd95kj6tfd95kj6tfd95kj6tfd95kj6tfd95kj6tfd95kj6tfd957tscxn3g"
        );
        let payload = decode(&addr, "bitcoincash").unwrap();
        assert_eq!(payload.kind, TYPE_SCRIPT_HASH);
        assert_eq!(payload.hash, vec![0x5A; 32]);
    }

    #[test]
    fn unsupported_hash_length_rejected() {
        assert!(encode("bitcoincash", TYPE_PUBKEY_HASH, &[0u8; 21]).is_err());
    }

    #[test]
    fn convert_bits_roundtrip() {
        let data = [0xFFu8, 0x00, 0xA5];
        let five = convert_bits(&data, 8, 5, true).unwrap();
        let back = convert_bits(&five, 5, 8, false).unwrap();
        assert_eq!(back, data.to_vec());
    }

    #[test]
    fn empty_and_short_inputs_rejected() {
        assert!(decode("", "bitcoincash").is_err());
        assert!(decode("bitcoincash:", "bitcoincash").is_err());
        assert!(decode("bitcoincash:qqqqqqqq", "bitcoincash").is_err());
    }
}
