//! Transaction input: the outpoint being spent, its unlocking script and
//! sequence number, plus an optional copy of the spent output.

use coinsolve_primitives::util::{ByteReader, ByteWriter, VarInt};
use coinsolve_script::Script;

use crate::output::TransactionOutput;
use crate::TransactionError;

/// Default sequence number indicating a finalized input (no relative lock-time).
pub const DEFAULT_SEQUENCE_NUMBER: u32 = 0xFFFF_FFFF;

/// A single input in a transaction.
///
/// The spent output is not part of the wire format. Signing needs its
/// locking script, and FORKID sighashes also need its value, so callers
/// attach it with `set_source_output` before a signing pass.
///
/// # Wire format
///
/// | Field               | Size             |
/// |---------------------|------------------|
/// | source_txid         | 32 bytes (LE)    |
/// | source_tx_out_index | 4 bytes (LE)     |
/// | script length       | VarInt           |
/// | unlocking_script    | variable         |
/// | sequence_number     | 4 bytes (LE)     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// Txid of the spent output's transaction, in internal byte order.
    pub source_txid: [u8; 32],

    /// Index of the output within the source transaction.
    pub source_tx_out_index: u32,

    /// Sequence number; `DEFAULT_SEQUENCE_NUMBER` unless set.
    pub sequence_number: u32,

    /// The unlocking script (scriptSig). `None` until the input is signed.
    pub unlocking_script: Option<Script>,

    source_output: Option<TransactionOutput>,
}

impl TransactionInput {
    /// An input spending `source_txid:source_tx_out_index` with a final
    /// sequence number and no unlocking script.
    pub fn new(source_txid: [u8; 32], source_tx_out_index: u32) -> Self {
        TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number: DEFAULT_SEQUENCE_NUMBER,
            unlocking_script: None,
            source_output: None,
        }
    }

    /// Deserialize an input from a `ByteReader`.
    ///
    /// # Arguments
    /// * `reader` - The reader positioned at the start of an encoded input.
    ///
    /// # Returns
    /// The input, or `SerializationError` if the data is truncated.
    pub fn read_from(reader: &mut ByteReader<'_>) -> Result<Self, TransactionError> {
        let source_txid = reader.read_array::<32>().map_err(|e| {
            TransactionError::SerializationError(format!("reading source txid: {}", e))
        })?;

        let source_tx_out_index = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading output index: {}", e))
        })?;

        let script_bytes = reader.read_var_bytes().map_err(|e| {
            TransactionError::SerializationError(format!("reading unlocking script: {}", e))
        })?;

        let sequence_number = reader.read_u32_le().map_err(|e| {
            TransactionError::SerializationError(format!("reading sequence number: {}", e))
        })?;

        let unlocking_script = if script_bytes.is_empty() {
            None
        } else {
            Some(Script::from_bytes(script_bytes))
        };

        Ok(TransactionInput {
            source_txid,
            source_tx_out_index,
            sequence_number,
            unlocking_script,
            source_output: None,
        })
    }

    /// Serialize this input into a `ByteWriter`.
    pub fn write_to(&self, writer: &mut ByteWriter) {
        let script = self
            .unlocking_script
            .as_ref()
            .map(Script::to_bytes)
            .unwrap_or_default();
        self.write_with_script(writer, script, self.sequence_number);
    }

    /// Serialize with a substitute script and sequence number, as the
    /// legacy sighash preimage requires.
    pub(crate) fn write_with_script(&self, writer: &mut ByteWriter, script: &[u8], sequence: u32) {
        writer.write_bytes(&self.source_txid);
        writer.write_u32_le(self.source_tx_out_index);
        writer.write_varint(VarInt::from(script.len()));
        writer.write_bytes(script);
        writer.write_u32_le(sequence);
    }

    /// Attach (or clear) the output this input spends.
    pub fn set_source_output(&mut self, output: Option<TransactionOutput>) {
        self.source_output = output;
    }

    /// The output this input spends, if attached.
    pub fn source_tx_output(&self) -> Option<&TransactionOutput> {
        self.source_output.as_ref()
    }

    /// Value of the spent output, if attached.
    pub fn source_tx_value(&self) -> Option<u64> {
        self.source_output.as_ref().map(|o| o.value)
    }

    /// Locking script of the spent output, if attached.
    pub fn source_tx_script(&self) -> Option<&Script> {
        self.source_output.as_ref().map(|o| &o.locking_script)
    }
}
