#![deny(missing_docs)]

//! Script recognition, address rendering and transaction signing for
//! Bitcoin-family networks.
//!
//! Re-exports the workspace crates, plus the entry points most callers
//! need at the top level.

pub use coinsolve_primitives as primitives;
pub use coinsolve_script as script;
pub use coinsolve_transaction as transaction;

pub use coinsolve_script::{
    address_for_script, classify, Address, NetworkParams, NetworkRegistry, Script, ScriptType,
};
pub use coinsolve_transaction::{
    build_hash160_lookup, sign_input, sign_transaction, Hash160Lookup, SignerConfig,
    SigningReport, Solver, SolverError, Transaction,
};
