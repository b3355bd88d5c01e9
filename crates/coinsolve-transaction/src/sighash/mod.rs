//! Signature hash computation for transaction signing.
//!
//! Two digest algorithms are supported and picked by the sighash type:
//! types carrying `SIGHASH_FORKID` use the BIP-143 digest, which commits to
//! the spent value; all others use the legacy digest.
//!
//! See <https://github.com/bitcoin-sv/bitcoin-sv/blob/master/doc/abc/replay-protected-sighash.md#digest-algorithm>

use coinsolve_primitives::hash::sha256d;
use coinsolve_primitives::util::{ByteWriter, VarInt};

use crate::transaction::Transaction;
use crate::TransactionError;

// -----------------------------------------------------------------------
// Sighash flag constants
// -----------------------------------------------------------------------

/// Sign all inputs and all outputs (the default).
pub const SIGHASH_ALL: u32 = 0x01;

/// Sign all inputs but no outputs, allowing outputs to be modified.
pub const SIGHASH_NONE: u32 = 0x02;

/// Sign all inputs and only the output with the same index as the signed input.
pub const SIGHASH_SINGLE: u32 = 0x03;

/// Combined with another flag: only sign the current input, allowing other
/// inputs to be added later.
pub const SIGHASH_ANYONECANPAY: u32 = 0x80;

/// Replay-protection flag used by BCH and BSV.
pub const SIGHASH_FORKID: u32 = 0x40;

/// `SIGHASH_ALL | SIGHASH_FORKID`.
pub const SIGHASH_ALL_FORKID: u32 = SIGHASH_ALL | SIGHASH_FORKID;

/// Mask applied to extract the base sighash type (ALL, NONE, SINGLE).
pub const SIGHASH_MASK: u32 = 0x1f;

/// Legacy digest of a SIGHASH_SINGLE input with no matching output: the
/// number one as a little-endian 256-bit integer.
const SIGHASH_SINGLE_BUG: [u8; 32] = {
    let mut one = [0u8; 32];
    one[0] = 1;
    one
};

/// Compute the digest that signs input `input_index`.
///
/// # Arguments
/// * `tx`           - The transaction being signed.
/// * `input_index`  - Index of the input being signed.
/// * `script_code`  - The script being satisfied: the spent locking script,
///                    or the redeem script for P2SH.
/// * `sighash_type` - Combined sighash flags.
///
/// # Returns
/// The 32-byte digest, `InputOutOfRange`, or `MissingSourceOutput` when a
/// FORKID digest is requested for an input without its spent output.
pub fn compute_sighash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> Result<[u8; 32], TransactionError> {
    if input_index >= tx.inputs.len() {
        return Err(TransactionError::InputOutOfRange {
            index: input_index,
            count: tx.inputs.len(),
        });
    }

    if sighash_type & SIGHASH_FORKID != 0 {
        let value = tx.inputs[input_index]
            .source_tx_value()
            .ok_or(TransactionError::MissingSourceOutput(input_index))?;
        let preimage = calc_preimage(tx, input_index, script_code, sighash_type, value)?;
        return Ok(sha256d(&preimage));
    }

    Ok(legacy_sighash(tx, input_index, script_code, sighash_type))
}

// -----------------------------------------------------------------------
// BIP-143 (FORKID) signature hash
// -----------------------------------------------------------------------

/// Compute the BIP-143 pre-image bytes before double-hashing.
///
/// The preimage consists of:
/// 1. nVersion (4 bytes LE)
/// 2. hashPrevouts (32 bytes) - sha256d of all outpoints unless ANYONECANPAY
/// 3. hashSequence (32 bytes) - sha256d of all sequences unless ANYONECANPAY/SINGLE/NONE
/// 4. outpoint (32+4 bytes) - txid + vout of the input being signed
/// 5. scriptCode (varint + script) - the script being satisfied
/// 6. value (8 bytes LE) - value of the output being spent
/// 7. nSequence (4 bytes LE) - sequence of the input being signed
/// 8. hashOutputs (32 bytes) - sha256d of all outputs or one output
/// 9. nLocktime (4 bytes LE)
/// 10. sighashType (4 bytes LE)
pub fn calc_preimage(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
    value: u64,
) -> Result<Vec<u8>, TransactionError> {
    let input = tx.inputs.get(input_index).ok_or(TransactionError::InputOutOfRange {
        index: input_index,
        count: tx.inputs.len(),
    })?;
    let base_type = sighash_type & SIGHASH_MASK;
    let anyone_can_pay = sighash_type & SIGHASH_ANYONECANPAY != 0;

    let hash_prevouts = if !anyone_can_pay {
        prevouts_hash(tx)
    } else {
        [0u8; 32]
    };

    let hash_sequence =
        if !anyone_can_pay && base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
            sequence_hash(tx)
        } else {
            [0u8; 32]
        };

    let hash_outputs = if base_type != SIGHASH_SINGLE && base_type != SIGHASH_NONE {
        outputs_hash(tx, None)
    } else if base_type == SIGHASH_SINGLE && input_index < tx.outputs.len() {
        outputs_hash(tx, Some(input_index))
    } else {
        [0u8; 32]
    };

    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);
    writer.write_bytes(&hash_prevouts);
    writer.write_bytes(&hash_sequence);
    writer.write_bytes(&input.source_txid);
    writer.write_u32_le(input.source_tx_out_index);
    writer.write_var_bytes(script_code);
    writer.write_u64_le(value);
    writer.write_u32_le(input.sequence_number);
    writer.write_bytes(&hash_outputs);
    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);

    Ok(writer.into_bytes())
}

fn prevouts_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 36);
    for input in &tx.inputs {
        writer.write_bytes(&input.source_txid);
        writer.write_u32_le(input.source_tx_out_index);
    }
    sha256d(writer.as_bytes())
}

fn sequence_hash(tx: &Transaction) -> [u8; 32] {
    let mut writer = ByteWriter::with_capacity(tx.inputs.len() * 4);
    for input in &tx.inputs {
        writer.write_u32_le(input.sequence_number);
    }
    sha256d(writer.as_bytes())
}

/// sha256d of every output, or of output `only` alone.
fn outputs_hash(tx: &Transaction, only: Option<usize>) -> [u8; 32] {
    let mut writer = ByteWriter::new();
    match only {
        Some(n) => tx.outputs[n].write_to(&mut writer),
        None => {
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
    }
    sha256d(writer.as_bytes())
}

// -----------------------------------------------------------------------
// Legacy signature hash
// -----------------------------------------------------------------------

/// The legacy digest: a modified copy of the transaction with every
/// input script blanked except the signed one, which carries
/// `script_code`.
fn legacy_sighash(
    tx: &Transaction,
    input_index: usize,
    script_code: &[u8],
    sighash_type: u32,
) -> [u8; 32] {
    let base_type = sighash_type & SIGHASH_MASK;
    if base_type == SIGHASH_SINGLE && input_index >= tx.outputs.len() {
        return SIGHASH_SINGLE_BUG;
    }
    let drop_other_sequences = base_type == SIGHASH_NONE || base_type == SIGHASH_SINGLE;

    let mut writer = ByteWriter::with_capacity(256);
    writer.write_u32_le(tx.version);

    if sighash_type & SIGHASH_ANYONECANPAY != 0 {
        let input = &tx.inputs[input_index];
        writer.write_varint(VarInt::from(1u64));
        input.write_with_script(&mut writer, script_code, input.sequence_number);
    } else {
        writer.write_varint(VarInt::from(tx.inputs.len()));
        for (i, input) in tx.inputs.iter().enumerate() {
            if i == input_index {
                input.write_with_script(&mut writer, script_code, input.sequence_number);
            } else {
                let sequence = if drop_other_sequences { 0 } else { input.sequence_number };
                input.write_with_script(&mut writer, &[], sequence);
            }
        }
    }

    match base_type {
        SIGHASH_NONE => writer.write_varint(VarInt::from(0u64)),
        SIGHASH_SINGLE => {
            // Outputs before the signed one are blanked to value -1 and an
            // empty script.
            writer.write_varint(VarInt::from(input_index + 1));
            for _ in 0..input_index {
                writer.write_u64_le(u64::MAX);
                writer.write_varint(VarInt::from(0u64));
            }
            tx.outputs[input_index].write_to(&mut writer);
        }
        _ => {
            writer.write_varint(VarInt::from(tx.outputs.len()));
            for output in &tx.outputs {
                output.write_to(&mut writer);
            }
        }
    }

    writer.write_u32_le(tx.lock_time);
    writer.write_u32_le(sighash_type);
    sha256d(writer.as_bytes())
}
