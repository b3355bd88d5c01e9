//! Splitting script bytes into opcodes and pushes, and encoding pushes.

use coinsolve_primitives::util::ByteReader;

use crate::opcodes::*;
use crate::ScriptError;

/// One element of a script: a bare opcode, or a push with its payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    /// The opcode byte. For direct pushes this is the payload length.
    pub op: u8,
    /// Pushed bytes. `None` for non-push opcodes.
    pub data: Option<Vec<u8>>,
}

impl ScriptChunk {
    /// Whether this chunk only places data on the stack.
    ///
    /// `OP_0` counts as a push of the empty string.
    pub fn is_push(&self) -> bool {
        self.op == OP_0 || (self.data.is_some() && self.op <= OP_PUSHDATA4)
    }

    /// The bytes this chunk pushes, with `OP_0` as the empty string.
    pub fn push_data(&self) -> Option<&[u8]> {
        match (&self.data, self.op) {
            (Some(data), op) if op <= OP_PUSHDATA4 => Some(data.as_slice()),
            (None, OP_0) => Some(&[][..]),
            _ => None,
        }
    }

    /// ASM token: hex for pushes, the opcode name otherwise.
    pub fn to_asm_string(&self) -> String {
        match &self.data {
            Some(data) if self.op > OP_0 && self.op <= OP_PUSHDATA4 => hex::encode(data),
            _ => opcode_to_string(self.op),
        }
    }
}

/// Decode script bytes into chunks.
///
/// An `OP_RETURN` outside any `OP_IF`-style block ends parsing: the chunk
/// carries every remaining byte, starting with the `OP_RETURN` itself, as
/// its data.
///
/// # Arguments
/// * `bytes` - Raw script bytes.
///
/// # Returns
/// The chunks, or `MalformedScript` if a push runs past the end.
pub fn decode_script(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    decode(bytes, true)
}

/// Decode script bytes into chunks, one per opcode, with no special case
/// for `OP_RETURN`. This is the view ASM rendering uses.
pub fn decode_ops(bytes: &[u8]) -> Result<Vec<ScriptChunk>, ScriptError> {
    decode(bytes, false)
}

/// Decode as many whole chunks as possible, one per opcode.
///
/// # Returns
/// The chunks before the first truncated push, and the error for that
/// push if there was one.
pub fn decode_ops_prefix(bytes: &[u8]) -> (Vec<ScriptChunk>, Option<ScriptError>) {
    decode_prefix(bytes, false)
}

fn decode(bytes: &[u8], split_at_return: bool) -> Result<Vec<ScriptChunk>, ScriptError> {
    match decode_prefix(bytes, split_at_return) {
        (chunks, None) => Ok(chunks),
        (_, Some(err)) => Err(err),
    }
}

fn decode_prefix(bytes: &[u8], split_at_return: bool) -> (Vec<ScriptChunk>, Option<ScriptError>) {
    let mut reader = ByteReader::new(bytes);
    let mut chunks = Vec::new();
    let mut depth: usize = 0;

    while reader.remaining() > 0 {
        let offset = bytes.len() - reader.remaining();
        let op = match reader.read_u8() {
            Ok(op) => op,
            Err(_) => return (chunks, Some(malformed(offset))),
        };
        let chunk = match op {
            OP_IF | OP_NOTIF | OP_VERIF | OP_VERNOTIF => {
                depth += 1;
                ScriptChunk { op, data: None }
            }
            OP_ENDIF => {
                depth = depth.saturating_sub(1);
                ScriptChunk { op, data: None }
            }
            OP_RETURN if split_at_return && depth == 0 => {
                chunks.push(ScriptChunk {
                    op,
                    data: Some(bytes[offset..].to_vec()),
                });
                break;
            }
            OP_DATA_1..=OP_PUSHDATA4 => match read_push_payload(&mut reader, op) {
                Ok(data) => ScriptChunk { op, data: Some(data) },
                Err(_) => return (chunks, Some(malformed(offset))),
            },
            _ => ScriptChunk { op, data: None },
        };
        chunks.push(chunk);
    }

    (chunks, None)
}

/// Decode bytes that must consist only of pushes.
///
/// Unlike `decode_script`, `OP_RETURN` gets no special treatment here; any
/// non-push opcode yields `Ok(None)`.
///
/// # Returns
/// `Ok(Some(payloads))` for a push-only sequence, `Ok(None)` if a non-push
/// opcode appears, or `MalformedScript` for a truncated push.
pub fn decode_pushes(bytes: &[u8]) -> Result<Option<Vec<Vec<u8>>>, ScriptError> {
    let mut reader = ByteReader::new(bytes);
    let mut pushes = Vec::new();
    while reader.remaining() > 0 {
        let offset = bytes.len() - reader.remaining();
        let op = reader.read_u8().map_err(|_| malformed(offset))?;
        match op {
            OP_0 => pushes.push(Vec::new()),
            OP_DATA_1..=OP_PUSHDATA4 => {
                pushes.push(read_push_payload(&mut reader, op).map_err(|_| malformed(offset))?)
            }
            _ => return Ok(None),
        }
    }
    Ok(Some(pushes))
}

/// Read the payload following a push opcode.
fn read_push_payload(
    reader: &mut ByteReader<'_>,
    op: u8,
) -> Result<Vec<u8>, coinsolve_primitives::PrimitivesError> {
    let len = match op {
        OP_PUSHDATA1 => reader.read_u8()? as usize,
        OP_PUSHDATA2 => reader.read_u16_le()? as usize,
        OP_PUSHDATA4 => reader.read_u32_le()? as usize,
        direct => direct as usize,
    };
    Ok(reader.read_bytes(len)?.to_vec())
}

fn malformed(offset: usize) -> ScriptError {
    ScriptError::MalformedScript(format!("push at offset {} runs past end of script", offset))
}

/// Prefix for pushing `data_len` bytes with the smallest encoding.
///
/// # Returns
/// The opcode and length bytes, or `DataTooBig` beyond the 4-byte length
/// range.
pub fn push_data_prefix(data_len: usize) -> Result<Vec<u8>, ScriptError> {
    match data_len {
        0..=0x4b => Ok(vec![data_len as u8]),
        0x4c..=0xff => Ok(vec![OP_PUSHDATA1, data_len as u8]),
        0x100..=0xffff => {
            let mut prefix = vec![OP_PUSHDATA2];
            prefix.extend_from_slice(&(data_len as u16).to_le_bytes());
            Ok(prefix)
        }
        _ => {
            let len = u32::try_from(data_len).map_err(|_| ScriptError::DataTooBig)?;
            let mut prefix = vec![OP_PUSHDATA4];
            prefix.extend_from_slice(&len.to_le_bytes());
            Ok(prefix)
        }
    }
}

/// Concatenate minimally-prefixed pushes of each part.
pub fn encode_push_datas(parts: &[&[u8]]) -> Result<Vec<u8>, ScriptError> {
    let mut out = Vec::with_capacity(parts.iter().map(|p| p.len() + 5).sum());
    for part in parts {
        out.extend_from_slice(&push_data_prefix(part.len())?);
        out.extend_from_slice(part);
    }
    Ok(out)
}
