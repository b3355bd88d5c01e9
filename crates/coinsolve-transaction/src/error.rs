use coinsolve_primitives::PrimitivesError;
use coinsolve_script::ScriptError;

/// Error types for transaction parsing and signature hashing.
#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    /// Wire bytes are truncated, malformed or have trailing data.
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// An input index past the end of the input list.
    #[error("input index {index} out of range (tx has {count} inputs)")]
    InputOutOfRange { index: usize, count: usize },

    /// A FORKID sighash needs the spent output's value, which the input
    /// does not carry.
    #[error("input {0} has no source output")]
    MissingSourceOutput(usize),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}

/// Why an input could not be signed.
///
/// Misses in the lookup are reported here rather than panicking; the
/// solver never retries.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// No key in the lookup hashes to this hash160.
    #[error("no key for hash160 {}", hex::encode(.hash160))]
    KeyNotFound { hash160: [u8; 20] },

    /// The lookup holds no redeem script with this hash.
    #[error("no redeem script for script hash {}", hex::encode(.script_hash))]
    RedeemScriptNotFound { script_hash: [u8; 20] },

    /// Fewer multisig keys are resolvable than the threshold requires.
    #[error("multisig needs {required} signatures, only {found} keys available")]
    InsufficientSignatures { required: usize, found: usize },

    /// The script template cannot be satisfied by signing. Carries the
    /// template name.
    #[error("cannot sign {0} script")]
    UnsolvableScript(String),

    /// The input has no source output to take the locking script from.
    #[error("input {0} has no source output")]
    MissingSourceOutput(usize),

    #[error("input index {index} out of range (tx has {count} inputs)")]
    InputOutOfRange { index: usize, count: usize },

    #[error("transaction error: {0}")]
    Transaction(#[from] TransactionError),

    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    #[error("primitives error: {0}")]
    Primitives(#[from] PrimitivesError),
}
