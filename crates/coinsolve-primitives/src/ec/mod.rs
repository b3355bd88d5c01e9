/// Elliptic curve cryptography on secp256k1.
///
/// Secret exponents, SEC-encoded public keys, low-S DER signatures with a
/// selectable nonce mode, and the generator they are all defined over.

pub mod generator;
pub mod private_key;
pub mod public_key;
pub mod signature;

pub use generator::Generator;
pub use private_key::{DecodedWif, PrivateKey};
pub use public_key::PublicKey;
pub use signature::{NonceMode, Signature};
