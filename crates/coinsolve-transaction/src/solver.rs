//! Unlocking-script construction.
//!
//! The solver classifies the script an input spends, finds the keys it
//! needs in a `Hash160Lookup`, signs the input's sighash and assembles the
//! pushes that satisfy the template:
//!
//! | Template  | Unlocking script                          |
//! |-----------|-------------------------------------------|
//! | P2PKH     | `<sig> <sec>`                             |
//! | P2PK      | `<sig>`                                   |
//! | Multisig  | `OP_0 <sig>{m}`                           |
//! | P2SH      | inner solution, then `<redeem script>`    |
//!
//! Each signature is DER with the low byte of the sighash type appended.

use coinsolve_primitives::ec::NonceMode;
use coinsolve_primitives::hash::hash160;
use coinsolve_script::chunk::encode_push_datas;
use coinsolve_script::{classify, Script, ScriptType};

use crate::lookup::{Hash160Lookup, KeyEntry};
use crate::sighash::{compute_sighash, SIGHASH_FORKID};
use crate::transaction::Transaction;
use crate::SolverError;

/// Signer settings for a `Solver`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignerConfig {
    /// How ECDSA nonces are chosen. Deterministic unless set otherwise.
    pub nonce_mode: NonceMode,
}

/// Builds unlocking scripts for transaction inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    config: SignerConfig,
}

/// Per-input outcome of `sign_transaction`.
#[derive(Debug, Default)]
pub struct SigningReport {
    results: Vec<Result<(), SolverError>>,
}

impl SigningReport {
    /// The outcome of input `index`, if the transaction had that many.
    pub fn result(&self, index: usize) -> Option<&Result<(), SolverError>> {
        self.results.get(index)
    }

    /// Number of inputs that received an unlocking script.
    pub fn signed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_ok()).count()
    }

    /// Inputs left unsigned, with the reason.
    pub fn failures(&self) -> impl Iterator<Item = (usize, &SolverError)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// Whether every input was signed.
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }

    /// Number of inputs the pass covered.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether the transaction had no inputs.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Sign one input with the default (deterministic) solver.
///
/// See `Solver::sign_input`.
pub fn sign_input(
    tx: &Transaction,
    input_index: usize,
    locking_script: &Script,
    lookup: &Hash160Lookup,
    sighash_type: u32,
) -> Result<Script, SolverError> {
    Solver::default().sign_input(tx, input_index, locking_script, lookup, sighash_type)
}

/// Sign every input of `tx` in place with the default solver.
///
/// See `Solver::sign_transaction`.
pub fn sign_transaction(
    tx: &mut Transaction,
    lookup: &Hash160Lookup,
    sighash_type: u32,
) -> SigningReport {
    Solver::default().sign_transaction(tx, lookup, sighash_type)
}

impl Solver {
    /// A solver with the given configuration.
    pub fn new(config: SignerConfig) -> Self {
        Solver { config }
    }

    /// The signer configuration in use.
    pub fn config(&self) -> SignerConfig {
        self.config
    }

    /// Produce the unlocking script for one input.
    ///
    /// The transaction is not modified.
    ///
    /// # Arguments
    /// * `tx` - The transaction being signed.
    /// * `input_index` - Index of the input to sign.
    /// * `locking_script` - The locking script of the output this input
    ///   spends.
    /// * `lookup` - Keys and redeem scripts available for signing.
    /// * `sighash_type` - Sighash flags; the low byte is appended to each
    ///   signature.
    ///
    /// # Returns
    /// The unlocking script, or a `SolverError` naming what was missing.
    pub fn sign_input(
        &self,
        tx: &Transaction,
        input_index: usize,
        locking_script: &Script,
        lookup: &Hash160Lookup,
        sighash_type: u32,
    ) -> Result<Script, SolverError> {
        if input_index >= tx.inputs.len() {
            return Err(SolverError::InputOutOfRange {
                index: input_index,
                count: tx.inputs.len(),
            });
        }
        if sighash_type & SIGHASH_FORKID != 0 && tx.inputs[input_index].source_tx_output().is_none()
        {
            return Err(SolverError::MissingSourceOutput(input_index));
        }

        let input = InputContext {
            tx,
            input_index,
            lookup,
            sighash_type,
        };
        let pushes = match classify(locking_script.to_bytes()) {
            ScriptType::PayToScriptHash(script_hash) => self.solve_p2sh(&input, &script_hash)?,
            template => self.solve_template(&input, &template, locking_script.to_bytes())?,
        };

        let parts: Vec<&[u8]> = pushes.iter().map(Vec::as_slice).collect();
        Ok(Script::from(encode_push_datas(&parts)?))
    }

    /// Sign every input of `tx` in place.
    ///
    /// Each input is solved against the locking script of its attached
    /// source output. Inputs that cannot be signed keep their current
    /// unlocking script and are reported; the others are still signed.
    ///
    /// All inputs are solved against the unmodified transaction before any
    /// script is written back. With the `parallel` feature the solving
    /// runs on the rayon thread pool.
    ///
    /// # Arguments
    /// * `tx` - The transaction to sign.
    /// * `lookup` - Keys and redeem scripts available for signing.
    /// * `sighash_type` - Sighash flags used for every input.
    ///
    /// # Returns
    /// A report with one entry per input.
    pub fn sign_transaction(
        &self,
        tx: &mut Transaction,
        lookup: &Hash160Lookup,
        sighash_type: u32,
    ) -> SigningReport {
        let solved = self.solve_all(tx, lookup, sighash_type);

        let mut results = Vec::with_capacity(solved.len());
        for (index, outcome) in solved.into_iter().enumerate() {
            match outcome {
                Ok(script) => {
                    tx.inputs[index].unlocking_script = Some(script);
                    results.push(Ok(()));
                }
                Err(e) => {
                    log::warn!("input {} left unsigned: {}", index, e);
                    results.push(Err(e));
                }
            }
        }

        let report = SigningReport { results };
        log::info!(
            "signed {} of {} input(s)",
            report.signed_count(),
            report.len()
        );
        report
    }

    #[cfg(feature = "parallel")]
    fn solve_all(
        &self,
        tx: &Transaction,
        lookup: &Hash160Lookup,
        sighash_type: u32,
    ) -> Vec<Result<Script, SolverError>> {
        use rayon::prelude::*;

        (0..tx.inputs.len())
            .into_par_iter()
            .map(|index| self.solve_from_source(tx, index, lookup, sighash_type))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn solve_all(
        &self,
        tx: &Transaction,
        lookup: &Hash160Lookup,
        sighash_type: u32,
    ) -> Vec<Result<Script, SolverError>> {
        (0..tx.inputs.len())
            .map(|index| self.solve_from_source(tx, index, lookup, sighash_type))
            .collect()
    }

    fn solve_from_source(
        &self,
        tx: &Transaction,
        index: usize,
        lookup: &Hash160Lookup,
        sighash_type: u32,
    ) -> Result<Script, SolverError> {
        let locking_script = tx.inputs[index]
            .source_tx_script()
            .ok_or(SolverError::MissingSourceOutput(index))?;
        self.sign_input(tx, index, locking_script, lookup, sighash_type)
    }

    // -----------------------------------------------------------------------
    // Templates
    // -----------------------------------------------------------------------

    /// Resolve the redeem script and solve it in place of the P2SH script.
    fn solve_p2sh(
        &self,
        input: &InputContext<'_>,
        script_hash: &[u8; 20],
    ) -> Result<Vec<Vec<u8>>, SolverError> {
        let redeem_script = input
            .lookup
            .redeem_script(script_hash)
            .ok_or(SolverError::RedeemScriptNotFound {
                script_hash: *script_hash,
            })?;
        let inner = classify(redeem_script.to_bytes());
        log::debug!(
            "input {}: p2sh redeem script is {}",
            input.input_index,
            inner.name()
        );
        if let ScriptType::PayToScriptHash(_) = inner {
            return Err(SolverError::UnsolvableScript("nested p2sh".to_string()));
        }

        let mut pushes = self.solve_template(input, &inner, redeem_script.to_bytes())?;
        pushes.push(redeem_script.to_bytes().to_vec());
        Ok(pushes)
    }

    /// Pushes satisfying a non-P2SH template, signed over `script_code`.
    fn solve_template(
        &self,
        input: &InputContext<'_>,
        template: &ScriptType,
        script_code: &[u8],
    ) -> Result<Vec<Vec<u8>>, SolverError> {
        match template {
            ScriptType::PayToPublicKeyHash(hash) => {
                let entry = input
                    .lookup
                    .get(hash)
                    .ok_or(SolverError::KeyNotFound { hash160: *hash })?;
                log::debug!(
                    "input {}: p2pkh with {} key",
                    input.input_index,
                    if entry.compressed() { "compressed" } else { "uncompressed" }
                );
                let sig = self.sign_with(input, script_code, entry)?;
                Ok(vec![sig, entry.sec()])
            }
            ScriptType::PayToPublicKey(sec) => {
                let hash = hash160(sec);
                let entry = input
                    .lookup
                    .get(&hash)
                    .ok_or(SolverError::KeyNotFound { hash160: hash })?;
                log::debug!("input {}: p2pk", input.input_index);
                Ok(vec![self.sign_with(input, script_code, entry)?])
            }
            ScriptType::Multisig {
                threshold,
                public_keys,
            } => self.solve_multisig(input, script_code, *threshold as usize, public_keys),
            other => Err(SolverError::UnsolvableScript(other.name().to_string())),
        }
    }

    /// `OP_0` followed by the first `required` signatures in key order.
    fn solve_multisig(
        &self,
        input: &InputContext<'_>,
        script_code: &[u8],
        required: usize,
        public_keys: &[Vec<u8>],
    ) -> Result<Vec<Vec<u8>>, SolverError> {
        let entries: Vec<&KeyEntry> = public_keys
            .iter()
            .filter_map(|sec| input.lookup.get(&hash160(sec)))
            .take(required)
            .collect();
        log::debug!(
            "input {}: {}-of-{} multisig, {} key(s) available",
            input.input_index,
            required,
            public_keys.len(),
            entries.len()
        );
        if entries.len() < required {
            return Err(SolverError::InsufficientSignatures {
                required,
                found: entries.len(),
            });
        }

        let digest = input.sighash(script_code)?;
        let mut pushes = Vec::with_capacity(required + 1);
        pushes.push(Vec::new());
        for entry in entries {
            pushes.push(self.signature_push(&digest, entry, input.sighash_type)?);
        }
        Ok(pushes)
    }

    fn sign_with(
        &self,
        input: &InputContext<'_>,
        script_code: &[u8],
        entry: &KeyEntry,
    ) -> Result<Vec<u8>, SolverError> {
        let digest = input.sighash(script_code)?;
        self.signature_push(&digest, entry, input.sighash_type)
    }

    /// DER signature with the sighash byte appended.
    fn signature_push(
        &self,
        digest: &[u8; 32],
        entry: &KeyEntry,
        sighash_type: u32,
    ) -> Result<Vec<u8>, SolverError> {
        let signature = entry
            .private_key()
            .sign_with_mode(digest, self.config.nonce_mode)?;
        let mut push = signature.to_der();
        push.push(sighash_type as u8);
        Ok(push)
    }
}

/// The input being solved and what it is solved with.
struct InputContext<'a> {
    tx: &'a Transaction,
    input_index: usize,
    lookup: &'a Hash160Lookup,
    sighash_type: u32,
}

impl InputContext<'_> {
    fn sighash(&self, script_code: &[u8]) -> Result<[u8; 32], SolverError> {
        Ok(compute_sighash(
            self.tx,
            self.input_index,
            script_code,
            self.sighash_type,
        )?)
    }
}
