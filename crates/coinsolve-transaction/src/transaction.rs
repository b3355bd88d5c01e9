//! Core transaction type: version, inputs, outputs and lock time, with
//! wire-format serialization and transaction ids.

use std::fmt;

use coinsolve_primitives::hash::sha256d;
use coinsolve_primitives::util::{ByteReader, ByteWriter, VarInt};
use coinsolve_script::Script;

use crate::input::TransactionInput;
use crate::output::TransactionOutput;
use crate::sighash;
use crate::TransactionError;

/// A transaction.
///
/// # Wire format
///
/// | Field        | Size                      |
/// |--------------|---------------------------|
/// | version      | 4 bytes (LE)              |
/// | input count  | VarInt                    |
/// | inputs       | variable (per input)      |
/// | output count | VarInt                    |
/// | outputs      | variable (per output)     |
/// | lock_time    | 4 bytes (LE)              |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Transaction format version.
    pub version: u32,
    /// Inputs in signing order.
    pub inputs: Vec<TransactionInput>,
    /// Outputs in serialization order.
    pub outputs: Vec<TransactionOutput>,
    /// Block height or timestamp before which the transaction is not final.
    pub lock_time: u32,
}

impl Transaction {
    /// Create an empty version-1 transaction with lock time 0.
    pub fn new() -> Self {
        Transaction {
            version: 1,
            inputs: Vec::new(),
            outputs: Vec::new(),
            lock_time: 0,
        }
    }

    // -----------------------------------------------------------------
    // Deserialization
    // -----------------------------------------------------------------

    /// Parse a transaction from a hex-encoded string.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactionError> {
        let bytes = hex::decode(hex_str).map_err(|e| {
            TransactionError::SerializationError(format!("invalid hex: {}", e))
        })?;
        Self::from_bytes(&bytes)
    }

    /// Parse a transaction from raw bytes.
    ///
    /// # Arguments
    /// * `bytes` - Exactly one serialized transaction.
    ///
    /// # Returns
    /// The transaction, or `SerializationError` if the data is truncated,
    /// malformed or has trailing bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TransactionError> {
        let mut reader = ByteReader::new(bytes);
        let tx = Self::read_from(&mut reader)?;
        if reader.remaining() != 0 {
            return Err(TransactionError::SerializationError(format!(
                "trailing {} bytes after transaction",
                reader.remaining()
            )));
        }
        Ok(tx)
    }

    /// Deserialize a transaction from a `ByteReader`.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let version = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading version: {}", e))
        })?;

        let input_count = read_count(reader, "input count")?;
        let mut inputs = Vec::with_capacity(input_count.min(reader.remaining()));
        for _ in 0..input_count {
            inputs.push(TransactionInput::read_from(reader)?);
        }

        let output_count = read_count(reader, "output count")?;
        let mut outputs = Vec::with_capacity(output_count.min(reader.remaining()));
        for _ in 0..output_count {
            outputs.push(TransactionOutput::read_from(reader)?);
        }

        let lock_time = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading lock time: {}", e))
        })?;

        Ok(Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    // -----------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------

    /// Wire encoding of the transaction.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = ByteWriter::with_capacity(256);
        writer.write_u32_le(self.version);

        writer.write_varint(VarInt::from(self.inputs.len()));
        for input in &self.inputs {
            input.write_to(&mut writer);
        }

        writer.write_varint(VarInt::from(self.outputs.len()));
        for output in &self.outputs {
            output.write_to(&mut writer);
        }

        writer.write_u32_le(self.lock_time);
        writer.into_bytes()
    }

    /// Hex of the wire encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    // -----------------------------------------------------------------
    // Transaction ID
    // -----------------------------------------------------------------

    /// Double SHA-256 of the serialized transaction, in internal byte order.
    pub fn tx_id(&self) -> [u8; 32] {
        sha256d(&self.to_bytes())
    }

    /// The txid as displayed by explorers (byte-reversed hex).
    pub fn tx_id_hex(&self) -> String {
        let mut id = self.tx_id();
        id.reverse();
        hex::encode(id)
    }

    // -----------------------------------------------------------------
    // Inputs and outputs
    // -----------------------------------------------------------------

    /// Append an input.
    pub fn add_input(&mut self, input: TransactionInput) {
        self.inputs.push(input);
    }

    /// Append an output.
    pub fn add_output(&mut self, output: TransactionOutput) {
        self.outputs.push(output);
    }

    /// Add an input spending a known output.
    ///
    /// # Arguments
    /// * `prev_tx_id` - Hex txid of the previous transaction, display order.
    /// * `vout` - The output index being spent.
    /// * `locking_script` - Locking script of the spent output.
    /// * `value` - Value of the spent output.
    ///
    /// # Returns
    /// `Ok(())`, or `SerializationError` if the txid is not 32 bytes of hex.
    pub fn add_input_from(
        &mut self,
        prev_tx_id: &str,
        vout: u32,
        locking_script: Script,
        value: u64,
    ) -> Result<(), TransactionError> {
        let mut txid: [u8; 32] = hex::decode(prev_tx_id)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| {
                TransactionError::SerializationError(format!("invalid txid: {}", prev_tx_id))
            })?;
        txid.reverse();

        let mut input = TransactionInput::new(txid, vout);
        input.set_source_output(Some(TransactionOutput::new(value, locking_script)));
        self.inputs.push(input);
        Ok(())
    }

    /// Number of inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of outputs.
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    // -----------------------------------------------------------------
    // Signature hash
    // -----------------------------------------------------------------

    /// Signature hash of one input; see `sighash::compute_sighash`.
    pub fn signature_hash(
        &self,
        input_index: usize,
        script_code: &[u8],
        sighash_type: u32,
    ) -> Result<[u8; 32], TransactionError> {
        sighash::compute_sighash(self, input_index, script_code, sighash_type)
    }
}

fn read_count(reader: &mut ByteReader<'_>, what: &str) -> Result<usize, TransactionError> {
    let count = reader
        .read_varint()
        .map_err(|e| TransactionError::SerializationError(format!("reading {}: {}", what, e)))?;
    usize::try_from(count.value())
        .map_err(|_| TransactionError::SerializationError(format!("{} too large", what)))
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
