/// Error types for script, template, network and address operations.
///
/// Classification and address derivation never surface these: a script
/// that fails to decode is simply `Unknown`. They come back from builders,
/// parsers and the network registry.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A push announced more bytes than the script contains.
    #[error("malformed script: {0}")]
    MalformedScript(String),

    /// A token in an ASM string is neither an opcode nor hex data.
    #[error("invalid ASM token: {0}")]
    InvalidAsmToken(String),

    /// A push opcode was passed where a bare opcode is required.
    #[error("use append_push_data for push opcodes: {0}")]
    PushOpcode(String),

    /// Push payload is larger than a 4-byte length can describe.
    #[error("push data too big")]
    DataTooBig,

    /// Template builder arguments do not describe a standard script.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// An address string could not be decoded.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Address version byte belongs to neither address kind of the network.
    #[error("address version {version:#04x} is not used by network {network}")]
    AddressVersionMismatch { version: u8, network: String },

    /// Network parameters violate an invariant.
    #[error("invalid network parameters for {code}: {reason}")]
    InvalidNetwork { code: String, reason: String },

    /// No network is registered under this code.
    #[error("unknown network: {0}")]
    UnknownNetwork(String),

    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("primitives error: {0}")]
    Primitives(#[from] coinsolve_primitives::PrimitivesError),
}
