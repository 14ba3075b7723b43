//! ScriptCompletion: turn external `(R,S)` signatures into `scriptSig`
//! and witness data.

use crypto_utils::signature::{der_encode, validate_public_key};

use crate::error::UtxoError;
use crate::script::{push_data, SpendPath};
use crate::sighash::SighashAlgorithm;
use crate::transaction::UnsignedTx;

/// Unlocking data for one input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedInput {
    pub script_sig: Vec<u8>,
    pub witness: Vec<Vec<u8>>,
}

/// Build unlocking data for every input of `tx`.
///
/// `signatures` holds one 64-byte `R‖S` (or 65-byte `R‖S‖V`) value per input,
/// in input order, all made by the key `pubkey`. Nothing is returned unless
/// every input completes.
pub fn complete<S: AsRef<[u8]>>(
    tx: &UnsignedTx,
    signatures: &[S],
    pubkey: &[u8],
) -> Result<Vec<CompletedInput>, UtxoError> {
    if signatures.len() != tx.inputs.len() {
        return Err(UtxoError::SignatureCountMismatch {
            expected: tx.inputs.len(),
            got: signatures.len(),
        });
    }
    validate_public_key(pubkey)?;

    let family = tx.params.family;
    tx.spend_paths
        .iter()
        .zip(signatures)
        .enumerate()
        .map(|(index, (path, signature))| -> Result<CompletedInput, UtxoError> {
            let hash_type = SighashAlgorithm::select(family, path)?.hash_type();
            let mut sig = der_encode(signature.as_ref()).map_err(|e| {
                UtxoError::InvalidSignature(format!("input {index}: {e}"))
            })?;
            sig.push(hash_type as u8);
            Ok(complete_input(path, sig, pubkey))
        })
        .collect()
}

fn complete_input(path: &SpendPath, sig: Vec<u8>, pubkey: &[u8]) -> CompletedInput {
    match path {
        SpendPath::Legacy { redeem_script, .. } => {
            let mut script_sig = Vec::with_capacity(sig.len() + pubkey.len() + 3);
            push_data(&mut script_sig, &sig);
            push_data(&mut script_sig, pubkey);
            if let Some(redeem_script) = redeem_script {
                push_data(&mut script_sig, redeem_script);
            }
            CompletedInput {
                script_sig,
                witness: Vec::new(),
            }
        }
        SpendPath::WitnessPubkeyHash { .. } => CompletedInput {
            script_sig: Vec::new(),
            witness: vec![sig, pubkey.to_vec()],
        },
        SpendPath::WitnessScript { witness_script } => CompletedInput {
            script_sig: Vec::new(),
            witness: vec![sig, pubkey.to_vec(), witness_script.clone()],
        },
        SpendPath::NestedWitnessPubkeyHash { redeem_script, .. } => {
            let mut script_sig = Vec::with_capacity(redeem_script.len() + 1);
            push_data(&mut script_sig, redeem_script);
            CompletedInput {
                script_sig,
                witness: vec![sig, pubkey.to_vec()],
            }
        }
    }
}
