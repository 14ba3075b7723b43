use bitcoin::bech32::{segwit, Fe32, Hrp};

use crate::error::UtxoError;

/// A decoded witness program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessProgram {
    pub version: u8,
    pub program: Vec<u8>,
}

/// Encode a witness program under `hrp`. Version 0 uses bech32, later
/// versions bech32m.
pub fn encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, UtxoError> {
    let hrp = Hrp::parse(hrp)
        .map_err(|e| UtxoError::MalformedInput(format!("invalid bech32 prefix: {e}")))?;
    let version = Fe32::try_from(version)
        .map_err(|e| UtxoError::MalformedInput(format!("invalid witness version: {e}")))?;

    segwit::encode(hrp, version, program)
        .map_err(|e| UtxoError::MalformedInput(format!("invalid witness program: {e}")))
}

/// Decode a segwit address, requiring the human-readable part to be
/// `expected_hrp`.
pub fn decode(address: &str, expected_hrp: &str) -> Result<WitnessProgram, UtxoError> {
    let (hrp, version, program) = segwit::decode(address)
        .map_err(|e| UtxoError::MalformedInput(format!("invalid segwit address: {e}")))?;

    if !hrp.to_string().eq_ignore_ascii_case(expected_hrp) {
        return Err(UtxoError::MalformedInput(format!(
            "expected bech32 prefix {expected_hrp}, got {hrp}"
        )));
    }

    Ok(WitnessProgram {
        version: version.to_u8(),
        program,
    })
}

/// Whether `address` parses as a segwit address under any prefix.
pub fn is_segwit(address: &str) -> bool {
    segwit::decode(address).is_ok()
}

/// Whether `address` starts with `hrp` followed by the bech32 separator.
pub(crate) fn has_prefix(address: &str, hrp: &str) -> bool {
    address
        .get(..hrp.len() + 1)
        .map(|head| head.ends_with('1') && head[..hrp.len()].eq_ignore_ascii_case(hrp))
        .unwrap_or(false)
}
