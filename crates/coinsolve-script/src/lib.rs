/// Script templates, classification and address rendering.
///
/// Scripts are held as raw bytes and matched against the standard output
/// templates (P2PKH, P2PK, P2SH, bare multisig and null data). Addresses are
/// derived per network from a `NetworkRegistry` of version bytes.

pub mod opcodes;
pub mod chunk;
pub mod script;
pub mod script_type;
pub mod network;
pub mod address;

mod error;
pub use error::ScriptError;
pub use script::Script;
pub use chunk::ScriptChunk;
pub use script_type::{
    classify, script_for_multisig, script_for_nulldata, script_for_p2pk, script_for_p2pkh,
    script_for_p2sh, ScriptType,
};
pub use network::{NetworkParams, NetworkRegistry};
pub use address::{address_for_public_key, address_for_script, Address, AddressKind};
