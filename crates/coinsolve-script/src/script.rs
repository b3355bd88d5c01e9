//! Script byte strings: locking scripts on outputs and unlocking scripts on
//! inputs.
//!
//! A `Script` is a plain byte vector. It is not validated on construction,
//! so any output found on chain can be held and classified.

use std::fmt;

use crate::chunk::{decode_ops, decode_ops_prefix, decode_script, push_data_prefix, ScriptChunk};
use crate::opcodes::*;
use crate::script_type::{classify, ScriptType};
use crate::ScriptError;

/// ASM token marking where a truncated push begins.
pub const ASM_ERROR_TOKEN: &str = "[error]";

/// A script as raw bytes.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Vec<u8>);

impl Script {
    // -----------------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------------

    /// An empty script.
    pub fn new() -> Self {
        Script(Vec::new())
    }

    /// Create a script from hex.
    ///
    /// # Arguments
    /// * `hex_str` - A hex string (e.g. "76a914...88ac").
    ///
    /// # Returns
    /// The script, or `HexDecode` for invalid hex.
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptError> {
        Ok(Script(hex::decode(hex_str)?))
    }

    /// Wrap raw bytes without validating them.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Script(bytes.to_vec())
    }

    /// Parse space-separated ASM.
    ///
    /// Opcode names are emitted as opcodes; any other token must be hex and
    /// is pushed with the minimal prefix.
    pub fn from_asm(asm: &str) -> Result<Self, ScriptError> {
        let mut script = Script::new();
        for token in asm.split_whitespace() {
            match string_to_opcode(token) {
                Some(op) if !(OP_DATA_1..=OP_PUSHDATA4).contains(&op) => script.0.push(op),
                _ => {
                    let data = hex::decode(token)
                        .map_err(|_| ScriptError::InvalidAsmToken(token.to_string()))?;
                    script.append_push_data(&data)?;
                }
            }
        }
        Ok(script)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Lowercase hex of the script bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// Render as ASM.
    ///
    /// A push that runs past the end renders as a final `[error]` token
    /// after the chunks that did decode.
    pub fn to_asm(&self) -> String {
        let (chunks, err) = decode_ops_prefix(&self.0);
        let mut tokens: Vec<String> = chunks.iter().map(ScriptChunk::to_asm_string).collect();
        if err.is_some() {
            tokens.push(ASM_ERROR_TOKEN.to_string());
        }
        tokens.join(" ")
    }

    /// The raw script bytes.
    pub fn to_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Take the raw bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the script has no bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Decode into chunks; see `decode_script` for `OP_RETURN` handling.
    pub fn chunks(&self) -> Result<Vec<ScriptChunk>, ScriptError> {
        decode_script(&self.0)
    }

    /// Match against the standard templates.
    pub fn classify(&self) -> ScriptType {
        classify(&self.0)
    }

    /// Whether the script decodes and contains only pushes, as an unlocking
    /// script must.
    pub fn is_push_only(&self) -> bool {
        decode_ops(&self.0)
            .map(|chunks| chunks.iter().all(ScriptChunk::is_push))
            .unwrap_or(false)
    }

    // -----------------------------------------------------------------------
    // Building
    // -----------------------------------------------------------------------

    /// Append a push of `data` with the minimal prefix.
    ///
    /// # Arguments
    /// * `data` - Bytes to push. An empty slice appends `OP_0`.
    pub fn append_push_data(&mut self, data: &[u8]) -> Result<(), ScriptError> {
        self.0.extend_from_slice(&push_data_prefix(data.len())?);
        self.0.extend_from_slice(data);
        Ok(())
    }

    /// Append bare opcodes. Push opcodes are rejected; use
    /// `append_push_data` for those.
    pub fn append_opcodes(&mut self, opcodes: &[u8]) -> Result<(), ScriptError> {
        if let Some(&op) = opcodes
            .iter()
            .find(|op| (OP_DATA_1..=OP_PUSHDATA4).contains(*op))
        {
            return Err(ScriptError::PushOpcode(opcode_to_string(op)));
        }
        self.0.extend_from_slice(opcodes);
        Ok(())
    }
}

impl From<Vec<u8>> for Script {
    fn from(bytes: Vec<u8>) -> Self {
        Script(bytes)
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl serde::Serialize for Script {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Script {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Script::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
