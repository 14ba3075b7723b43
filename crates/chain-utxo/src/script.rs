//! Locking-script templates, script shape detection and spend-path
//! resolution.

use crypto_utils::hash::{sha256, sha256d};

use crate::error::UtxoError;
use crate::params::ChainParams;
use crate::types::Input;

pub const OP_0: u8 = 0x00;
pub const OP_PUSHDATA1: u8 = 0x4C;
pub const OP_PUSHDATA2: u8 = 0x4D;
pub const OP_PUSHDATA4: u8 = 0x4E;
pub const OP_1: u8 = 0x51;
pub const OP_16: u8 = 0x60;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_HASH160: u8 = 0xA9;
pub const OP_HASH256: u8 = 0xAA;
pub const OP_CHECKSIG: u8 = 0xAC;

/// OP_DUP OP_HASH160 <20-byte hash> OP_EQUALVERIFY OP_CHECKSIG
pub fn p2pkh(pubkey_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(25);
    script.push(OP_DUP);
    script.push(OP_HASH160);
    script.push(0x14);
    script.extend_from_slice(pubkey_hash);
    script.push(OP_EQUALVERIFY);
    script.push(OP_CHECKSIG);
    script
}

/// OP_HASH160 <20-byte hash> OP_EQUAL
pub fn p2sh(script_hash: &[u8; 20]) -> Vec<u8> {
    let mut script = Vec::with_capacity(23);
    script.push(OP_HASH160);
    script.push(0x14);
    script.extend_from_slice(script_hash);
    script.push(OP_EQUAL);
    script
}

/// OP_HASH256 <32-byte hash> OP_EQUAL (Bitcoin Cash P2SH32)
pub fn p2sh32(script_hash: &[u8; 32]) -> Vec<u8> {
    let mut script = Vec::with_capacity(35);
    script.push(OP_HASH256);
    script.push(0x20);
    script.extend_from_slice(script_hash);
    script.push(OP_EQUAL);
    script
}

/// OP_n <program> for witness version `n`.
pub fn witness_program(version: u8, program: &[u8]) -> Result<Vec<u8>, UtxoError> {
    if version > 16 {
        return Err(UtxoError::MalformedInput(format!(
            "witness version {version} out of range"
        )));
    }
    if !(2..=40).contains(&program.len()) {
        return Err(UtxoError::MalformedInput(format!(
            "witness program length {} out of range",
            program.len()
        )));
    }
    let mut script = Vec::with_capacity(2 + program.len());
    script.push(if version == 0 { OP_0 } else { OP_1 + version - 1 });
    script.push(program.len() as u8);
    script.extend_from_slice(program);
    Ok(script)
}

/// Append a minimal push of `data` to `script`.
pub fn push_data(script: &mut Vec<u8>, data: &[u8]) {
    let len = data.len();
    if len < OP_PUSHDATA1 as usize {
        script.push(len as u8);
    } else if len <= 0xFF {
        script.push(OP_PUSHDATA1);
        script.push(len as u8);
    } else if len <= 0xFFFF {
        script.push(OP_PUSHDATA2);
        script.extend_from_slice(&(len as u16).to_le_bytes());
    } else {
        script.push(OP_PUSHDATA4);
        script.extend_from_slice(&(len as u32).to_le_bytes());
    }
    script.extend_from_slice(data);
}

/// Recognized locking-script templates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptShape {
    PubkeyHash([u8; 20]),
    ScriptHash([u8; 20]),
    ScriptHash32([u8; 32]),
    WitnessPubkeyHash([u8; 20]),
    WitnessScriptHash([u8; 32]),
    /// Witness program of a version (or v0 length) with no spend support.
    OtherWitness { version: u8 },
    NonStandard,
}

impl ScriptShape {
    pub fn classify(script: &[u8]) -> Self {
        match script {
            [OP_DUP, OP_HASH160, 0x14, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG] if hash.len() == 20 => {
                ScriptShape::PubkeyHash(to_array(hash))
            }
            [OP_HASH160, 0x14, hash @ .., OP_EQUAL] if hash.len() == 20 => {
                ScriptShape::ScriptHash(to_array(hash))
            }
            [OP_HASH256, 0x20, hash @ .., OP_EQUAL] if hash.len() == 32 => {
                ScriptShape::ScriptHash32(to_array(hash))
            }
            [OP_0, 0x14, program @ ..] if program.len() == 20 => {
                ScriptShape::WitnessPubkeyHash(to_array(program))
            }
            [OP_0, 0x20, program @ ..] if program.len() == 32 => {
                ScriptShape::WitnessScriptHash(to_array(program))
            }
            [op, len, program @ ..]
                if (*op == OP_0 || (OP_1..=OP_16).contains(op))
                    && (2..=40).contains(&program.len())
                    && *len as usize == program.len() =>
            {
                let version = if *op == OP_0 { 0 } else { op - OP_1 + 1 };
                ScriptShape::OtherWitness { version }
            }
            _ => ScriptShape::NonStandard,
        }
    }

    pub fn is_witness(&self) -> bool {
        matches!(
            self,
            ScriptShape::WitnessPubkeyHash(_)
                | ScriptShape::WitnessScriptHash(_)
                | ScriptShape::OtherWitness { .. }
        )
    }
}

fn to_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

/// How a single input is signed and where its unlocking data goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpendPath {
    /// Signature data in `scriptSig`. `redeem_script` is pushed last for
    /// P2SH spends.
    Legacy {
        script_code: Vec<u8>,
        redeem_script: Option<Vec<u8>>,
    },
    /// Native P2WPKH: witness `[sig, pubkey]`.
    WitnessPubkeyHash { script_code: Vec<u8> },
    /// Native P2WSH: witness `[sig, pubkey, witness_script]`.
    WitnessScript { witness_script: Vec<u8> },
    /// P2SH-wrapped P2WPKH: `scriptSig` pushes the redeem script, witness
    /// `[sig, pubkey]`.
    NestedWitnessPubkeyHash {
        redeem_script: Vec<u8>,
        script_code: Vec<u8>,
    },
}

impl SpendPath {
    /// Resolve the spend path of `input` from the shape of the script it
    /// spends and its optional sub-script.
    pub fn resolve(input: &Input, params: &ChainParams) -> Result<Self, UtxoError> {
        let spent = &input.spent_output.pubkey_script;
        let sub_script = input.sig_script.as_deref();

        match (ScriptShape::classify(spent), sub_script) {
            (ScriptShape::WitnessPubkeyHash(hash), None) => {
                require_segwit(params)?;
                Ok(SpendPath::WitnessPubkeyHash {
                    script_code: p2pkh(&hash),
                })
            }
            (ScriptShape::WitnessPubkeyHash(_), Some(_)) => Err(UtxoError::MalformedInput(
                "P2WPKH outputs are spent without a sub-script".into(),
            )),
            (ScriptShape::WitnessScriptHash(program), Some(witness_script)) => {
                require_segwit(params)?;
                if sha256(witness_script) != program {
                    return Err(UtxoError::MalformedInput(
                        "witness script does not match the P2WSH program".into(),
                    ));
                }
                Ok(SpendPath::WitnessScript {
                    witness_script: witness_script.to_vec(),
                })
            }
            (ScriptShape::WitnessScriptHash(_), None) => Err(UtxoError::DigestComputation(
                "P2WSH spend requires the witness script".into(),
            )),
            (ScriptShape::OtherWitness { version }, _) => Err(UtxoError::UnsupportedAddressType(
                format!("spending witness version {version} outputs"),
            )),
            (ScriptShape::ScriptHash(hash), Some(redeem_script)) => {
                if params.hash_scheme.hash160(redeem_script) != hash {
                    return Err(UtxoError::MalformedInput(
                        "redeem script does not match the P2SH hash".into(),
                    ));
                }
                match ScriptShape::classify(redeem_script) {
                    ScriptShape::WitnessPubkeyHash(pubkey_hash) => {
                        require_segwit(params)?;
                        Ok(SpendPath::NestedWitnessPubkeyHash {
                            redeem_script: redeem_script.to_vec(),
                            script_code: p2pkh(&pubkey_hash),
                        })
                    }
                    shape if shape.is_witness() => Err(UtxoError::UnsupportedAddressType(
                        "P2SH-wrapped witness script spends".into(),
                    )),
                    _ => Ok(SpendPath::Legacy {
                        script_code: redeem_script.to_vec(),
                        redeem_script: Some(redeem_script.to_vec()),
                    }),
                }
            }
            (ScriptShape::ScriptHash32(hash), Some(redeem_script)) => {
                if sha256d(redeem_script) != hash {
                    return Err(UtxoError::MalformedInput(
                        "redeem script does not match the P2SH32 hash".into(),
                    ));
                }
                Ok(SpendPath::Legacy {
                    script_code: redeem_script.to_vec(),
                    redeem_script: Some(redeem_script.to_vec()),
                })
            }
            (ScriptShape::ScriptHash(_) | ScriptShape::ScriptHash32(_), None) => {
                Err(UtxoError::DigestComputation(
                    "P2SH spend requires the redeem script".into(),
                ))
            }
            (_, Some(_)) => Err(UtxoError::MalformedInput(
                "sub-script given for a script that does not commit to one".into(),
            )),
            (_, None) => Ok(SpendPath::Legacy {
                script_code: spent.clone(),
                redeem_script: None,
            }),
        }
    }

    /// Whether the signature goes into the witness.
    pub fn is_witness(&self) -> bool {
        !matches!(self, SpendPath::Legacy { .. })
    }

    /// The script committed to by the signature digest.
    pub fn script_code(&self) -> &[u8] {
        match self {
            SpendPath::Legacy { script_code, .. }
            | SpendPath::WitnessPubkeyHash { script_code }
            | SpendPath::NestedWitnessPubkeyHash { script_code, .. } => script_code,
            SpendPath::WitnessScript { witness_script } => witness_script,
        }
    }
}

fn require_segwit(params: &ChainParams) -> Result<(), UtxoError> {
    if params.supports_segwit() {
        Ok(())
    } else {
        Err(UtxoError::UnsupportedAddressType(format!(
            "{} has no witness spends",
            params.name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crypto_utils::hash::hash160;
    use crate::params::{BITCOIN_CASH_MAINNET, BITCOIN_MAINNET, ZCASH_MAINNET};
    use crate::types::{Outpoint, Output};

    fn input_spending(script: Vec<u8>) -> Input {
        Input::new(Output {
            outpoint: Outpoint::new([0x11; 32], 0),
            value: 1_000,
            pubkey_script: script,
        })
    }

    #[test]
    fn p2pkh_layout() {
        let script = p2pkh(&[0xAB; 20]);
        assert_eq!(script.len(), 25);
        assert_eq!(&script[..3], &[0x76, 0xA9, 0x14]);
        assert_eq!(&script[23..], &[0x88, 0xAC]);
    }

    #[test]
    fn p2sh_layouts() {
        assert!(hex::encode(p2sh(&[0x01; 20])).starts_with("a914"));
        let script = p2sh32(&[0x02; 32]);
        assert_eq!(script.len(), 35);
        assert_eq!(&script[..2], &[0xAA, 0x20]);
        assert_eq!(script[34], 0x87);
    }

    #[test]
    fn witness_program_versions() {
        assert_eq!(witness_program(0, &[0u8; 20]).unwrap()[..2], [0x00, 0x14]);
        assert_eq!(witness_program(1, &[0u8; 32]).unwrap()[..2], [0x51, 0x20]);
        assert_eq!(witness_program(16, &[0u8; 2]).unwrap()[..2], [0x60, 0x02]);
        assert!(witness_program(17, &[0u8; 20]).is_err());
        assert!(witness_program(0, &[0u8; 1]).is_err());
        assert!(witness_program(0, &[0u8; 41]).is_err());
    }

    #[test]
    fn push_data_boundaries() {
        let mut script = Vec::new();
        push_data(&mut script, &[0xAA; 75]);
        assert_eq!(script[0], 75);
        assert_eq!(script.len(), 76);

        let mut script = Vec::new();
        push_data(&mut script, &[0xAA; 76]);
        assert_eq!(&script[..2], &[OP_PUSHDATA1, 76]);

        let mut script = Vec::new();
        push_data(&mut script, &[0xAA; 256]);
        assert_eq!(&script[..3], &[OP_PUSHDATA2, 0x00, 0x01]);
        assert_eq!(script.len(), 259);

        let mut script = Vec::new();
        push_data(&mut script, &[]);
        assert_eq!(script, vec![0x00]);
    }

    #[test]
    fn classify_templates() {
        assert_eq!(
            ScriptShape::classify(&p2pkh(&[1; 20])),
            ScriptShape::PubkeyHash([1; 20])
        );
        assert_eq!(
            ScriptShape::classify(&p2sh(&[2; 20])),
            ScriptShape::ScriptHash([2; 20])
        );
        assert_eq!(
            ScriptShape::classify(&p2sh32(&[3; 32])),
            ScriptShape::ScriptHash32([3; 32])
        );
        assert_eq!(
            ScriptShape::classify(&witness_program(0, &[4; 20]).unwrap()),
            ScriptShape::WitnessPubkeyHash([4; 20])
        );
        assert_eq!(
            ScriptShape::classify(&witness_program(0, &[5; 32]).unwrap()),
            ScriptShape::WitnessScriptHash([5; 32])
        );
        assert_eq!(
            ScriptShape::classify(&witness_program(1, &[6; 32]).unwrap()),
            ScriptShape::OtherWitness { version: 1 }
        );
        assert_eq!(ScriptShape::classify(&[]), ScriptShape::NonStandard);
        assert_eq!(ScriptShape::classify(&[0x6A, 0x01, 0x00]), ScriptShape::NonStandard);
    }

    #[test]
    fn truncated_templates_are_nonstandard() {
        let mut script = p2pkh(&[1; 20]);
        script.remove(5);
        assert_eq!(ScriptShape::classify(&script), ScriptShape::NonStandard);
    }

    #[test]
    fn resolve_p2pkh() {
        let script = p2pkh(&[7; 20]);
        let path = SpendPath::resolve(&input_spending(script.clone()), &BITCOIN_MAINNET).unwrap();
        assert_eq!(
            path,
            SpendPath::Legacy {
                script_code: script,
                redeem_script: None
            }
        );
        assert!(!path.is_witness());
    }

    #[test]
    fn resolve_p2wpkh_uses_p2pkh_script_code() {
        let script = witness_program(0, &[8; 20]).unwrap();
        let path = SpendPath::resolve(&input_spending(script), &BITCOIN_MAINNET).unwrap();
        assert_eq!(path.script_code(), p2pkh(&[8; 20]).as_slice());
        assert!(path.is_witness());
    }

    #[test]
    fn resolve_witness_on_non_segwit_chain() {
        let script = witness_program(0, &[8; 20]).unwrap();
        for params in [BITCOIN_CASH_MAINNET, ZCASH_MAINNET] {
            let err = SpendPath::resolve(&input_spending(script.clone()), &params).unwrap_err();
            assert!(matches!(err, UtxoError::UnsupportedAddressType(_)));
        }
    }

    #[test]
    fn resolve_p2wsh() {
        let witness_script = p2pkh(&[9; 20]);
        let script = witness_program(0, &sha256(&witness_script)).unwrap();
        let input = input_spending(script.clone()).with_sig_script(witness_script.clone());
        let path = SpendPath::resolve(&input, &BITCOIN_MAINNET).unwrap();
        assert_eq!(path, SpendPath::WitnessScript { witness_script });

        let err = SpendPath::resolve(&input_spending(script), &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::DigestComputation(_)));
    }

    #[test]
    fn resolve_p2wsh_wrong_script() {
        let script = witness_program(0, &[0; 32]).unwrap();
        let input = input_spending(script).with_sig_script(vec![0x51]);
        let err = SpendPath::resolve(&input, &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::MalformedInput(_)));
    }

    #[test]
    fn resolve_nested_p2wpkh() {
        let redeem = witness_program(0, &[10; 20]).unwrap();
        let input = input_spending(p2sh(&hash160(&redeem))).with_sig_script(redeem.clone());
        let path = SpendPath::resolve(&input, &BITCOIN_MAINNET).unwrap();
        assert_eq!(
            path,
            SpendPath::NestedWitnessPubkeyHash {
                redeem_script: redeem,
                script_code: p2pkh(&[10; 20]),
            }
        );
    }

    #[test]
    fn resolve_nested_p2wsh_unsupported() {
        let redeem = witness_program(0, &[11; 32]).unwrap();
        let input = input_spending(p2sh(&hash160(&redeem))).with_sig_script(redeem);
        let err = SpendPath::resolve(&input, &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::UnsupportedAddressType(_)));
    }

    #[test]
    fn resolve_p2sh_legacy_redeem() {
        let redeem = p2pkh(&[12; 20]);
        let input = input_spending(p2sh(&hash160(&redeem))).with_sig_script(redeem.clone());
        let path = SpendPath::resolve(&input, &BITCOIN_CASH_MAINNET).unwrap();
        assert_eq!(
            path,
            SpendPath::Legacy {
                script_code: redeem.clone(),
                redeem_script: Some(redeem),
            }
        );
    }

    #[test]
    fn resolve_p2sh32() {
        let redeem = p2pkh(&[13; 20]);
        let input = input_spending(p2sh32(&sha256d(&redeem))).with_sig_script(redeem.clone());
        let path = SpendPath::resolve(&input, &BITCOIN_CASH_MAINNET).unwrap();
        assert_eq!(path.script_code(), redeem.as_slice());
    }

    #[test]
    fn resolve_p2sh_errors() {
        let err = SpendPath::resolve(&input_spending(p2sh(&[1; 20])), &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::DigestComputation(_)));

        let input = input_spending(p2sh(&[1; 20])).with_sig_script(vec![0x51]);
        let err = SpendPath::resolve(&input, &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::MalformedInput(_)));
    }

    #[test]
    fn resolve_sub_script_on_p2pkh_rejected() {
        let input = input_spending(p2pkh(&[1; 20])).with_sig_script(vec![0x51]);
        let err = SpendPath::resolve(&input, &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::MalformedInput(_)));
    }

    #[test]
    fn resolve_taproot_unsupported() {
        let script = witness_program(1, &[0; 32]).unwrap();
        let err = SpendPath::resolve(&input_spending(script), &BITCOIN_MAINNET).unwrap_err();
        assert!(matches!(err, UtxoError::UnsupportedAddressType(_)));
    }
}
