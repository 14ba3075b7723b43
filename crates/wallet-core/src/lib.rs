//! Wallet-facing entry points over the UTXO engine. Arguments are owned,
//! plain-data values so the functions can sit behind a foreign-language
//! binding or a JSON request handler unchanged.

pub mod error;
pub mod types;

use chain_utxo::address::{self, Address, Payload};
use chain_utxo::{Input, Outpoint, Output, Recipient, TxOptions, UnsignedTx};
use error::WalletError;
use types::{
    AddressInfo, AddressKind, Chain, RecipientData, SignedTransaction, TxConfig, TxRequest,
    UnsignedTransaction, UtxoData,
};

/// Validate an address for a given chain
pub fn validate_address(addr: String, chain: Chain) -> Result<bool, WalletError> {
    Ok(address::validate(&addr, &chain.params()))
}

/// Decode an address into its kind and locking script
pub fn decode_address(addr: String, chain: Chain) -> Result<AddressInfo, WalletError> {
    let decoded = address::decode(&addr, &chain.params())
        .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
    let script_pubkey = decoded
        .script_pubkey()
        .map_err(|e| WalletError::InvalidAddress(e.to_string()))?;
    let kind = match decoded.payload {
        Payload::PubkeyHash(_) => AddressKind::PubkeyHash,
        Payload::ScriptHash(_) => AddressKind::ScriptHash,
        Payload::WitnessProgram { .. } => AddressKind::WitnessProgram,
    };
    Ok(AddressInfo {
        chain,
        kind,
        script_pubkey,
    })
}

/// Pay-to-pubkey-hash address for a compressed or uncompressed SEC1 public
/// key, in the chain's native format
pub fn pubkey_to_address(pubkey: Vec<u8>, chain: Chain) -> Result<String, WalletError> {
    crypto_utils::signature::validate_public_key(&pubkey)?;
    let params = chain.params();
    let addr = Address::p2pkh_from_pubkey(&pubkey, &params);
    address::encode(&addr, &params).map_err(|e| WalletError::InvalidAddress(e.to_string()))
}

/// Build an unsigned transaction and the digests to sign
pub fn build_transaction(
    chain: Chain,
    utxos: Vec<UtxoData>,
    recipients: Vec<RecipientData>,
    config: TxConfig,
) -> Result<UnsignedTransaction, WalletError> {
    let tx = assemble(chain, utxos, recipients, config)?;
    let sighashes = tx.sighashes()?.iter().map(|d| d.to_vec()).collect();
    Ok(UnsignedTransaction {
        sighashes,
        unsigned_tx: tx.serialize(),
        fee_sat: tx.fee(),
    })
}

/// Build a transaction from a JSON-encoded [`TxRequest`]
pub fn build_transaction_json(request_json: String) -> Result<UnsignedTransaction, WalletError> {
    let request: TxRequest = serde_json::from_str(&request_json)
        .map_err(|e| WalletError::InvalidInput(format!("invalid request: {e}")))?;
    build_transaction(
        request.chain,
        request.utxos,
        request.recipients,
        request.config,
    )
}

/// Digests to sign, one per UTXO in order
pub fn transaction_sighashes(
    chain: Chain,
    utxos: Vec<UtxoData>,
    recipients: Vec<RecipientData>,
    config: TxConfig,
) -> Result<Vec<Vec<u8>>, WalletError> {
    Ok(build_transaction(chain, utxos, recipients, config)?.sighashes)
}

/// Rebuild the transaction, apply one 64-byte `R‖S` signature per UTXO and
/// serialize it for broadcast
pub fn sign_transaction(
    chain: Chain,
    utxos: Vec<UtxoData>,
    recipients: Vec<RecipientData>,
    config: TxConfig,
    signatures: Vec<Vec<u8>>,
    pubkey: Vec<u8>,
) -> Result<SignedTransaction, WalletError> {
    let tx = assemble(chain, utxos, recipients, config)?;
    let signed = tx.sign(&signatures, &pubkey)?;
    tracing::info!(
        chain = ?chain,
        txid = %signed.txid_hex(),
        "signed transaction"
    );
    Ok(SignedTransaction {
        raw_tx: signed.serialize(),
        txid: signed.txid_hex(),
    })
}

fn assemble(
    chain: Chain,
    utxos: Vec<UtxoData>,
    recipients: Vec<RecipientData>,
    config: TxConfig,
) -> Result<UnsignedTx, WalletError> {
    // Build inputs
    let inputs = utxos
        .into_iter()
        .map(|utxo| {
            let outpoint = Outpoint::from_txid_hex(&utxo.txid, utxo.vout)
                .map_err(|e| WalletError::InvalidInput(e.to_string()))?;
            let mut input = Input::new(Output {
                outpoint,
                value: utxo.amount_sat,
                pubkey_script: utxo.script_pubkey,
            });
            if let Some(sub_script) = utxo.sub_script {
                input = input.with_sig_script(sub_script);
            }
            if let Some(sequence) = utxo.sequence {
                input = input.with_sequence(sequence);
            }
            Ok(input)
        })
        .collect::<Result<Vec<_>, WalletError>>()?;

    let recipients: Vec<Recipient> = recipients
        .into_iter()
        .map(|r| Recipient::new(r.address, r.amount_sat))
        .collect();

    let options = TxOptions {
        version: config.version,
        lock_time: config.lock_time,
        expiry_height: config.expiry_height,
    };

    Ok(UnsignedTx::build(
        &chain.params(),
        inputs,
        &recipients,
        &options,
    )?)
}
