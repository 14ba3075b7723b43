use crate::error::UtxoError;
use crate::params::HashScheme;

const HASH_LEN: usize = 20;
const CHECKSUM_LEN: usize = 4;

/// Raw Base58Check payload: a 1- or 2-byte version tag and a 20-byte hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedHash {
    pub tag: Vec<u8>,
    pub hash: [u8; 20],
}

/// Base58(tag || hash || checksum(tag || hash)), the checksum being the
/// first four bytes of the scheme's double hash.
pub fn encode(tag: &[u8], hash: &[u8; 20], scheme: HashScheme) -> String {
    let mut payload = Vec::with_capacity(tag.len() + HASH_LEN + CHECKSUM_LEN);
    payload.extend_from_slice(tag);
    payload.extend_from_slice(hash);

    let checksum = scheme.checksum(&payload);
    payload.extend_from_slice(&checksum);

    bs58::encode(&payload).into_string()
}

/// Decode a Base58Check address into its version tag and hash.
///
/// The tag width is inferred from the decoded length: 25 bytes carry a
/// one-byte tag, 26 bytes (Zcash, Decred) a two-byte tag.
pub fn decode(address: &str, scheme: HashScheme) -> Result<VersionedHash, UtxoError> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| UtxoError::MalformedInput(format!("invalid base58: {e}")))?;

    let tag_len = match decoded.len() {
        25 => 1,
        26 => 2,
        other => {
            return Err(UtxoError::MalformedInput(format!(
                "expected 25 or 26 decoded bytes, got {other}"
            )))
        }
    };

    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_LEN);
    if checksum != scheme.checksum(payload) {
        return Err(UtxoError::Checksum("base58check checksum mismatch".into()));
    }

    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[tag_len..]);
    Ok(VersionedHash {
        tag: payload[..tag_len].to_vec(),
        hash,
    })
}
