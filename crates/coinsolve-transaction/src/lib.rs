/// Transactions, signature hashing, key lookup and unlocking-script
/// solving.
///
/// `sign_input` produces the unlocking script for one input from the
/// locking script it spends and a `Hash160Lookup` of available keys.
/// `sign_transaction` does the same for every input and writes the
/// results back.
///
/// The `parallel` feature solves inputs on the rayon pool. Its ordering
/// test only builds with the feature on:
/// `cargo test -p coinsolve-transaction --features parallel`.

pub mod transaction;
pub mod input;
pub mod output;
pub mod sighash;
pub mod lookup;
pub mod solver;

mod error;
pub use error::{SolverError, TransactionError};
pub use transaction::Transaction;
pub use input::TransactionInput;
pub use output::TransactionOutput;
pub use sighash::compute_sighash;
pub use lookup::{build_hash160_lookup, Hash160Lookup, KeyEntry};
pub use solver::{sign_input, sign_transaction, SignerConfig, SigningReport, Solver};

#[cfg(test)]
mod tests;
