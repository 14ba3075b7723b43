//! AddressCodec: conversion between address strings and raw payloads for
//! the three address families, driven by [`ChainParams`].

pub mod base58check;
pub mod cashaddr;
pub mod segwit;

use crate::error::UtxoError;
use crate::params::{ChainFamily, ChainParams};
use crate::script;

/// Textual family an address was parsed from or is rendered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFormat {
    Base58Check,
    Bech32,
    CashAddr,
}

/// What an address pays to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    PubkeyHash([u8; 20]),
    /// 20-byte HASH160, or 32-byte HASH256 for CashAddr P2SH32.
    ScriptHash(Vec<u8>),
    WitnessProgram { version: u8, program: Vec<u8> },
}

/// A decoded address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub format: AddressFormat,
    pub payload: Payload,
}

impl Address {
    /// Pay-to-pubkey-hash address for a SEC1 public key, in the chain's
    /// native format (CashAddr on Bitcoin Cash, Base58Check elsewhere).
    pub fn p2pkh_from_pubkey(pubkey: &[u8], params: &ChainParams) -> Self {
        let format = if params.cashaddr_prefix.is_some() {
            AddressFormat::CashAddr
        } else {
            AddressFormat::Base58Check
        };
        Self {
            format,
            payload: Payload::PubkeyHash(params.hash_scheme.hash160(pubkey)),
        }
    }

    /// The locking script that pays to this address.
    pub fn script_pubkey(&self) -> Result<Vec<u8>, UtxoError> {
        match &self.payload {
            Payload::PubkeyHash(hash) => Ok(script::p2pkh(hash)),
            Payload::ScriptHash(hash) => match hash.len() {
                20 => Ok(script::p2sh(&fixed(hash)?)),
                32 => Ok(script::p2sh32(&fixed(hash)?)),
                other => Err(UtxoError::UnsupportedAddressType(format!(
                    "{other}-byte script hash"
                ))),
            },
            Payload::WitnessProgram { version, program } => {
                script::witness_program(*version, program)
            }
        }
    }
}

fn fixed<const N: usize>(bytes: &[u8]) -> Result<[u8; N], UtxoError> {
    bytes
        .try_into()
        .map_err(|_| UtxoError::MalformedInput(format!("expected {N} bytes, got {}", bytes.len())))
}

/// Decode `address` for the network described by `params`.
///
/// Bech32 and CashAddr strings are accepted in either all-lowercase or
/// all-uppercase form, and CashAddr strings may omit the network prefix.
pub fn decode(address: &str, params: &ChainParams) -> Result<Address, UtxoError> {
    match params.family {
        ChainFamily::BitcoinCash => decode_bitcoin_cash(address, params),
        ChainFamily::Bitcoin | ChainFamily::Zcash | ChainFamily::Decred => {
            decode_base58_or_segwit(address, params)
        }
    }
}

/// Whether `address` decodes for `params`.
pub fn validate(address: &str, params: &ChainParams) -> bool {
    decode(address, params).is_ok()
}

/// Render `address` for the network described by `params`.
///
/// Output is canonical: bech32 and CashAddr strings are lowercase and
/// CashAddr always carries its prefix, so `encode(decode(s))` equals `s`
/// only when `s` was already in that form.
pub fn encode(address: &Address, params: &ChainParams) -> Result<String, UtxoError> {
    match (address.format, &address.payload) {
        (AddressFormat::Base58Check, Payload::PubkeyHash(hash)) => {
            Ok(base58check::encode(
                params.pubkey_hash_tag,
                hash,
                params.hash_scheme,
            ))
        }
        (AddressFormat::Base58Check, Payload::ScriptHash(hash)) => {
            Ok(base58check::encode(
                params.script_hash_tag,
                &fixed(hash)?,
                params.hash_scheme,
            ))
        }
        (AddressFormat::CashAddr, payload) => {
            let prefix = params.cashaddr_prefix.ok_or_else(|| {
                UtxoError::UnsupportedAddressType(format!("{} has no CashAddr prefix", params.name))
            })?;
            match payload {
                Payload::PubkeyHash(hash) => {
                    cashaddr::encode(prefix, cashaddr::TYPE_PUBKEY_HASH, hash)
                }
                Payload::ScriptHash(hash) => {
                    cashaddr::encode(prefix, cashaddr::TYPE_SCRIPT_HASH, hash)
                }
                Payload::WitnessProgram { .. } => Err(UtxoError::UnsupportedAddressType(
                    "witness program as CashAddr".into(),
                )),
            }
        }
        (AddressFormat::Bech32, Payload::WitnessProgram { version, program }) => {
            let hrp = params.bech32_hrp.ok_or_else(|| {
                UtxoError::UnsupportedAddressType(format!("{} has no segwit addresses", params.name))
            })?;
            segwit::encode(hrp, *version, program)
        }
        (format, _) => Err(UtxoError::UnsupportedAddressType(format!(
            "payload cannot be rendered as {format:?}"
        ))),
    }
}

fn decode_base58_or_segwit(address: &str, params: &ChainParams) -> Result<Address, UtxoError> {
    if let Some(hrp) = params.bech32_hrp {
        if segwit::has_prefix(address, hrp) {
            let program = segwit::decode(address, hrp)?;
            return Ok(Address {
                format: AddressFormat::Bech32,
                payload: Payload::WitnessProgram {
                    version: program.version,
                    program: program.program,
                },
            });
        }
    }

    match base58check::decode(address, params.hash_scheme) {
        Ok(versioned) => {
            let payload = payload_for_tag(&versioned, params)?;
            Ok(Address {
                format: AddressFormat::Base58Check,
                payload,
            })
        }
        Err(_) if params.bech32_hrp.is_none() && segwit::is_segwit(address) => {
            Err(UtxoError::UnsupportedAddressType(format!(
                "{} has no segwit addresses",
                params.name
            )))
        }
        Err(e) => Err(e),
    }
}

/// Legacy Base58Check is tried first, then CashAddr.
fn decode_bitcoin_cash(address: &str, params: &ChainParams) -> Result<Address, UtxoError> {
    let legacy_err = match base58check::decode(address, params.hash_scheme) {
        Ok(versioned) => {
            let payload = payload_for_tag(&versioned, params)?;
            return Ok(Address {
                format: AddressFormat::Base58Check,
                payload,
            });
        }
        Err(e) => e,
    };

    let prefix = params.cashaddr_prefix.ok_or_else(|| {
        UtxoError::UnsupportedAddressType(format!("{} has no CashAddr prefix", params.name))
    })?;

    let cash_err = match cashaddr::decode(address, prefix) {
        Ok(decoded) => {
            let payload = match (decoded.kind, decoded.hash.len()) {
                (cashaddr::TYPE_PUBKEY_HASH, 20) => Payload::PubkeyHash(fixed(&decoded.hash)?),
                (cashaddr::TYPE_SCRIPT_HASH, 20 | 32) => Payload::ScriptHash(decoded.hash),
                (kind, len) => {
                    return Err(UtxoError::UnsupportedAddressType(format!(
                        "cashaddr type {kind} with {len}-byte hash"
                    )))
                }
            };
            return Ok(Address {
                format: AddressFormat::CashAddr,
                payload,
            });
        }
        Err(e) => e,
    };

    if segwit::is_segwit(address) {
        return Err(UtxoError::UnsupportedAddressType(
            "segwit addresses on Bitcoin Cash".into(),
        ));
    }

    // Report the error of the format the string most resembles.
    if !address.contains(':') && matches!(legacy_err, UtxoError::Checksum(_)) {
        Err(legacy_err)
    } else {
        Err(cash_err)
    }
}

fn payload_for_tag(
    versioned: &base58check::VersionedHash,
    params: &ChainParams,
) -> Result<Payload, UtxoError> {
    if versioned.tag == params.pubkey_hash_tag {
        Ok(Payload::PubkeyHash(versioned.hash))
    } else if versioned.tag == params.script_hash_tag {
        Ok(Payload::ScriptHash(versioned.hash.to_vec()))
    } else {
        Err(UtxoError::UnsupportedAddressType(format!(
            "version tag {} is not used by {}",
            hex::encode(&versioned.tag),
            params.name
        )))
    }
}
