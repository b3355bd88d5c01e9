//! Key material for a signing pass.
//!
//! A `Hash160Lookup` answers "which key hashes to this hash160?" and "which
//! redeem script hashes to this script hash?". It is built once before a
//! pass and only read while signing, so it can be shared across threads.

use std::collections::HashMap;

use coinsolve_primitives::ec::{Generator, PrivateKey, PublicKey};
use coinsolve_primitives::hash::hash160;
use coinsolve_primitives::PrimitivesError;
use coinsolve_script::Script;

/// A key found in the lookup, with the SEC form whose hash matched.
#[derive(Clone, Debug)]
pub struct KeyEntry {
    private_key: PrivateKey,
    public_key: PublicKey,
    generator: Generator,
    compressed: bool,
}

impl KeyEntry {
    /// The signing key.
    pub fn private_key(&self) -> &PrivateKey {
        &self.private_key
    }

    /// Public key derived under `generator`.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Generator the public key was derived under.
    pub fn generator(&self) -> Generator {
        self.generator
    }

    /// Whether the compressed SEC form is the one that hashes to the key.
    pub fn compressed(&self) -> bool {
        self.compressed
    }

    /// The SEC bytes to push alongside a signature.
    pub fn sec(&self) -> Vec<u8> {
        self.public_key.to_sec(self.compressed)
    }
}

/// Maps hash160 digests to keys and script hashes to redeem scripts.
#[derive(Clone, Debug, Default)]
pub struct Hash160Lookup {
    keys: HashMap<[u8; 20], KeyEntry>,
    redeem_scripts: HashMap<[u8; 20], Script>,
}

/// Build a lookup holding every key under every generator.
///
/// Each key is indexed by the hash160 of both its compressed and its
/// uncompressed public key, so outputs created with either form can be
/// spent.
///
/// # Arguments
/// * `secret_exponents` - The private keys to index.
/// * `generators` - Curves to derive public keys on.
///
/// # Returns
/// The lookup, or a `PrimitivesError` if a public key cannot be derived.
pub fn build_hash160_lookup<I>(
    secret_exponents: I,
    generators: &[Generator],
) -> Result<Hash160Lookup, PrimitivesError>
where
    I: IntoIterator<Item = PrivateKey>,
{
    let mut lookup = Hash160Lookup::new();
    for key in secret_exponents {
        for generator in generators {
            lookup.add_key(key.clone(), *generator)?;
        }
    }
    log::debug!(
        "built hash160 lookup with {} key hashes over {} generator(s)",
        lookup.key_count(),
        generators.len()
    );
    Ok(lookup)
}

impl Hash160Lookup {
    /// An empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index one key under both of its SEC hashes.
    pub fn add_key(&mut self, key: PrivateKey, generator: Generator) -> Result<(), PrimitivesError> {
        let public_key = generator.public_key(&key)?;
        for compressed in [true, false] {
            self.keys.insert(
                public_key.hash160(compressed),
                KeyEntry {
                    private_key: key.clone(),
                    public_key: public_key.clone(),
                    generator,
                    compressed,
                },
            );
        }
        Ok(())
    }

    /// Register a P2SH redeem script under its hash160.
    ///
    /// # Returns
    /// The script hash the script was stored under.
    pub fn add_redeem_script(&mut self, script: Script) -> [u8; 20] {
        let script_hash = hash160(script.to_bytes());
        self.redeem_scripts.insert(script_hash, script);
        script_hash
    }

    /// Register several redeem scripts.
    pub fn extend_redeem_scripts<I>(&mut self, scripts: I)
    where
        I: IntoIterator<Item = Script>,
    {
        for script in scripts {
            self.add_redeem_script(script);
        }
    }

    /// The key whose compressed or uncompressed public key hashes to
    /// `hash160`.
    pub fn get(&self, hash160: &[u8; 20]) -> Option<&KeyEntry> {
        self.keys.get(hash160)
    }

    /// The redeem script hashing to `script_hash`.
    pub fn redeem_script(&self, script_hash: &[u8; 20]) -> Option<&Script> {
        self.redeem_scripts.get(script_hash)
    }

    /// Number of indexed key hashes (two per key and generator).
    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    /// Number of registered redeem scripts.
    pub fn redeem_script_count(&self) -> usize {
        self.redeem_scripts.len()
    }

    /// Whether the lookup holds neither keys nor redeem scripts.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.redeem_scripts.is_empty()
    }
}
