//! TxAssembler and the transaction types it produces.
//!
//! [`UnsignedTx::build`] resolves recipients and spend paths up front;
//! [`UnsignedTx::sign`] produces a separate [`SignedTx`] value. [`Tx`] wraps
//! both states for callers that drive the sighashes → sign → serialize
//! sequence on one object.

use crypto_utils::hash::sha256d;

use crate::address;
use crate::encode::serialize_transaction;
use crate::error::UtxoError;
use crate::params::{ChainFamily, ChainParams, ZcashTxFormat};
use crate::script::SpendPath;
use crate::sighash::SighashCache;
use crate::sign::{self, CompletedInput};
use crate::types::{checked_amount, Input, Recipient};

/// Zcash expiry heights must stay below the block-height / timestamp
/// threshold.
pub const MAX_EXPIRY_HEIGHT: u32 = 499_999_999;

/// Per-transaction settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TxOptions {
    /// Overrides the chain's default version. On Zcash it must match the
    /// version of the active upgrade.
    pub version: Option<u32>,
    pub lock_time: u32,
    /// Zcash only; also selects the consensus branch ID.
    pub expiry_height: Option<u32>,
}

impl TxOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_lock_time(mut self, lock_time: u32) -> Self {
        self.lock_time = lock_time;
        self
    }

    pub fn with_expiry_height(mut self, expiry_height: u32) -> Self {
        self.expiry_height = Some(expiry_height);
        self
    }
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOut {
    pub value: u64,
    pub script_pubkey: Vec<u8>,
}

/// Overwinter / Sapling header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZcashHeader {
    pub format: ZcashTxFormat,
    pub version_group_id: u32,
    pub branch_id: u32,
    pub expiry_height: u32,
}

/// An assembled transaction with empty unlocking scripts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTx {
    pub(crate) params: ChainParams,
    pub(crate) version: u32,
    pub(crate) lock_time: u32,
    pub(crate) inputs: Vec<Input>,
    pub(crate) spend_paths: Vec<SpendPath>,
    pub(crate) outputs: Vec<TxOut>,
    pub(crate) zcash: Option<ZcashHeader>,
}

impl UnsignedTx {
    /// Assemble a transaction spending `inputs` to `recipients`.
    ///
    /// Fails on an empty input or recipient list, on any value that does
    /// not fit a signed 64-bit amount, when outputs exceed inputs, and on
    /// any recipient address that does not decode for `params`. Decred
    /// parameters are rejected outright.
    pub fn build(
        params: &ChainParams,
        inputs: Vec<Input>,
        recipients: &[Recipient],
        options: &TxOptions,
    ) -> Result<Self, UtxoError> {
        if params.family == ChainFamily::Decred {
            return Err(UtxoError::UnsupportedAddressType(format!(
                "{} transactions are not supported",
                params.name
            )));
        }
        if inputs.is_empty() {
            return Err(UtxoError::MalformedInput("transaction has no inputs".into()));
        }
        if recipients.is_empty() {
            return Err(UtxoError::MalformedInput("transaction has no recipients".into()));
        }

        let (version, zcash) = resolve_version(params, options)?;

        // Resolve spend paths
        let mut input_total: i64 = 0;
        let mut spend_paths = Vec::with_capacity(inputs.len());
        for input in &inputs {
            let value = checked_amount(input.spent_output.value, "input")?;
            input_total = input_total
                .checked_add(value)
                .ok_or_else(|| UtxoError::ValueRange("input total overflows".into()))?;
            spend_paths.push(SpendPath::resolve(input, params)?);
        }

        // Build outputs
        let mut output_total: i64 = 0;
        let mut outputs = Vec::with_capacity(recipients.len());
        for recipient in recipients {
            let value = checked_amount(recipient.value, "output")?;
            output_total = output_total
                .checked_add(value)
                .ok_or_else(|| UtxoError::ValueRange("output total overflows".into()))?;
            let script_pubkey = address::decode(&recipient.address, params)?.script_pubkey()?;
            outputs.push(TxOut {
                value: recipient.value,
                script_pubkey,
            });
        }

        if output_total > input_total {
            return Err(UtxoError::ValueRange(format!(
                "outputs total {output_total} exceeds inputs total {input_total}"
            )));
        }

        tracing::debug!(
            chain = params.name,
            version,
            inputs = inputs.len(),
            outputs = outputs.len(),
            fee = input_total - output_total,
            "built unsigned transaction"
        );

        Ok(Self {
            params: *params,
            version,
            lock_time: options.lock_time,
            inputs,
            spend_paths,
            outputs,
            zcash,
        })
    }

    pub fn params(&self) -> &ChainParams {
        &self.params
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn lock_time(&self) -> u32 {
        self.lock_time
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn spend_paths(&self) -> &[SpendPath] {
        &self.spend_paths
    }

    pub fn outputs(&self) -> &[TxOut] {
        &self.outputs
    }

    pub fn zcash_header(&self) -> Option<&ZcashHeader> {
        self.zcash.as_ref()
    }

    /// Inputs total minus outputs total.
    pub fn fee(&self) -> u64 {
        let inputs: u64 = self.inputs.iter().map(|i| i.spent_output.value).sum();
        let outputs: u64 = self.outputs.iter().map(|o| o.value).sum();
        inputs - outputs
    }

    /// Signature digest for one input.
    pub fn sighash(&self, index: usize) -> Result<[u8; 32], UtxoError> {
        SighashCache::new(self).signature_hash(index)
    }

    /// Signature digests for every input, in input order.
    pub fn sighashes(&self) -> Result<Vec<[u8; 32]>, UtxoError> {
        let digests = SighashCache::new(self).all()?;
        tracing::debug!(
            chain = self.params.name,
            count = digests.len(),
            "computed signature digests"
        );
        Ok(digests)
    }

    /// Complete every input with `signatures` (one per input, made by
    /// `pubkey` over [`UnsignedTx::sighashes`]).
    pub fn sign<S: AsRef<[u8]>>(
        &self,
        signatures: &[S],
        pubkey: &[u8],
    ) -> Result<SignedTx, UtxoError> {
        let completed = sign::complete(self, signatures, pubkey)?;
        tracing::debug!(
            chain = self.params.name,
            inputs = completed.len(),
            "signed transaction"
        );
        Ok(SignedTx {
            unsigned: self.clone(),
            completed,
        })
    }

    /// Wire bytes with empty unlocking scripts.
    pub fn serialize(&self) -> Vec<u8> {
        serialize_transaction(self, None, false)
    }

    /// Transaction id in internal byte order.
    pub fn txid(&self) -> [u8; 32] {
        sha256d(&self.serialize())
    }

    pub fn txid_hex(&self) -> String {
        display_hex(self.txid())
    }
}

/// Version and Zcash header for a new transaction.
fn resolve_version(
    params: &ChainParams,
    options: &TxOptions,
) -> Result<(u32, Option<ZcashHeader>), UtxoError> {
    if params.family != ChainFamily::Zcash {
        if options.expiry_height.is_some() {
            return Err(UtxoError::MalformedInput(format!(
                "expiry height is not used by {}",
                params.name
            )));
        }
        return Ok((options.version.unwrap_or(params.tx_version), None));
    }

    let expiry_height = options.expiry_height.ok_or_else(|| {
        UtxoError::DigestComputation("Zcash transactions require an expiry height".into())
    })?;
    if expiry_height > MAX_EXPIRY_HEIGHT {
        return Err(UtxoError::ValueRange(format!(
            "expiry height {expiry_height} above {MAX_EXPIRY_HEIGHT}"
        )));
    }

    let upgrade = params.upgrade_at(expiry_height).ok_or_else(|| {
        UtxoError::DigestComputation(format!("{} has no upgrade schedule", params.name))
    })?;
    let (version, version_group_id) = upgrade
        .tx_format
        .version()
        .zip(upgrade.tx_format.version_group_id())
        .ok_or_else(|| {
            UtxoError::DigestComputation(format!(
                "no overwintered upgrade active at height {expiry_height}"
            ))
        })?;
    if let Some(requested) = options.version {
        if requested != version {
            return Err(UtxoError::MalformedInput(format!(
                "{} requires version {version} at height {expiry_height}, got {requested}",
                upgrade.name
            )));
        }
    }

    tracing::debug!(
        upgrade = upgrade.name,
        branch_id = upgrade.branch_id,
        expiry_height,
        "selected Zcash network upgrade"
    );

    Ok((
        version,
        Some(ZcashHeader {
            format: upgrade.tx_format,
            version_group_id,
            branch_id: upgrade.branch_id,
            expiry_height,
        }),
    ))
}

fn display_hex(mut hash: [u8; 32]) -> String {
    hash.reverse();
    hex::encode(hash)
}

/// A transaction with every input completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTx {
    unsigned: UnsignedTx,
    completed: Vec<CompletedInput>,
}

impl SignedTx {
    pub fn unsigned(&self) -> &UnsignedTx {
        &self.unsigned
    }

    pub fn completed_inputs(&self) -> &[CompletedInput] {
        &self.completed
    }

    pub fn has_witness(&self) -> bool {
        self.completed.iter().any(|c| !c.witness.is_empty())
    }

    /// Final wire bytes, including witness data when any input has some.
    pub fn serialize(&self) -> Vec<u8> {
        serialize_transaction(&self.unsigned, Some(&self.completed), true)
    }

    /// Transaction id over the serialization without witness data.
    pub fn txid(&self) -> [u8; 32] {
        sha256d(&serialize_transaction(
            &self.unsigned,
            Some(&self.completed),
            false,
        ))
    }

    pub fn txid_hex(&self) -> String {
        display_hex(self.txid())
    }
}

#[derive(Debug, Clone)]
enum TxState {
    Unsigned(UnsignedTx),
    Signed(SignedTx),
}

/// A transaction moving from unsigned to signed exactly once.
#[derive(Debug, Clone)]
pub struct Tx {
    state: TxState,
}

/// Assemble an unsigned [`Tx`].
pub fn build_tx(
    params: &ChainParams,
    inputs: Vec<Input>,
    recipients: &[Recipient],
    options: &TxOptions,
) -> Result<Tx, UtxoError> {
    UnsignedTx::build(params, inputs, recipients, options).map(Tx::from)
}

impl From<UnsignedTx> for Tx {
    fn from(unsigned: UnsignedTx) -> Self {
        Self {
            state: TxState::Unsigned(unsigned),
        }
    }
}

impl Tx {
    pub fn unsigned(&self) -> &UnsignedTx {
        match &self.state {
            TxState::Unsigned(unsigned) => unsigned,
            TxState::Signed(signed) => &signed.unsigned,
        }
    }

    pub fn signed(&self) -> Option<&SignedTx> {
        match &self.state {
            TxState::Unsigned(_) => None,
            TxState::Signed(signed) => Some(signed),
        }
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.state, TxState::Signed(_))
    }

    pub fn sighashes(&self) -> Result<Vec<[u8; 32]>, UtxoError> {
        self.unsigned().sighashes()
    }

    /// Sign every input. Fails with [`UtxoError::AlreadySigned`] on a
    /// second call; on any error the transaction is left unchanged.
    pub fn sign<S: AsRef<[u8]>>(&mut self, signatures: &[S], pubkey: &[u8]) -> Result<(), UtxoError> {
        let signed = match &self.state {
            TxState::Unsigned(unsigned) => unsigned.sign(signatures, pubkey)?,
            TxState::Signed(_) => return Err(UtxoError::AlreadySigned),
        };
        self.state = TxState::Signed(signed);
        Ok(())
    }

    pub fn serialize(&self) -> Vec<u8> {
        match &self.state {
            TxState::Unsigned(unsigned) => unsigned.serialize(),
            TxState::Signed(signed) => signed.serialize(),
        }
    }

    pub fn txid(&self) -> [u8; 32] {
        match &self.state {
            TxState::Unsigned(unsigned) => unsigned.txid(),
            TxState::Signed(signed) => signed.txid(),
        }
    }

    pub fn txid_hex(&self) -> String {
        display_hex(self.txid())
    }
}
