/// coinsolve - Cryptographic primitives, hashing, and binary encoding.
///
/// This crate provides the foundational building blocks used by the script
/// and transaction crates:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160)
/// - Elliptic curve cryptography (secp256k1 keys, ECDSA signatures, generators)
/// - Base58 and Base58Check encoding/decoding
/// - Variable-length integer encoding and little-endian reader/writer

pub mod hash;
pub mod util;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
