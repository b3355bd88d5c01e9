//! Address derivation and Base58Check address handling.
//!
//! `address_for_script` renders any locking script as a human-readable
//! string for a given network. `Address` is the decoded form of a P2PKH or
//! P2SH address string.

use std::fmt;

use coinsolve_primitives::base58::{check_decode, check_encode_with_version};
use coinsolve_primitives::hash::hash160;

use crate::network::NetworkParams;
use crate::script::Script;
use crate::script_type::{classify, script_for_p2pkh, script_for_p2sh, ScriptType};
use crate::ScriptError;

/// Placeholder for scripts that have no address form.
pub const UNKNOWN_ADDRESS: &str = "???";

/// Version byte plus 20-byte hash.
const ADDRESS_PAYLOAD_LEN: usize = 21;

// ---------------------------------------------------------------------------
// Script to address
// ---------------------------------------------------------------------------

/// Render a locking script as an address string.
///
/// P2PKH and P2PK scripts use the network's address version (P2PK hashes
/// the SEC key exactly as pushed, so compressed and uncompressed keys give
/// different addresses). P2SH uses the P2SH version. Null data renders as
/// `(nulldata <hex>)`. Multisig and anything unrecognised render as `???`.
///
/// # Arguments
/// * `script` - Raw locking-script bytes.
/// * `params` - Network whose version bytes to use.
///
/// # Returns
/// A non-empty string; this never fails.
pub fn address_for_script(script: &[u8], params: &NetworkParams) -> String {
    match classify(script) {
        ScriptType::PayToPublicKeyHash(h) => {
            Address::from_public_key_hash(&h, params).to_string()
        }
        ScriptType::PayToPublicKey(sec) => address_for_public_key(&sec, params),
        ScriptType::PayToScriptHash(h) => Address::from_script_hash(&h, params).to_string(),
        ScriptType::NullData(payload) => format!("(nulldata {})", hex::encode(payload)),
        ScriptType::Multisig { .. } | ScriptType::Unknown(_) => UNKNOWN_ADDRESS.to_string(),
    }
}

/// P2PKH address of a SEC-encoded public key.
///
/// The key bytes are hashed as given; no point validation is done.
pub fn address_for_public_key(sec: &[u8], params: &NetworkParams) -> String {
    Address::from_public_key_hash(&hash160(sec), params).to_string()
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// Which of the two hash-based templates an address pays to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AddressKind {
    PublicKeyHash,
    ScriptHash,
}

/// A decoded Base58Check address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    version: u8,
    hash: [u8; 20],
    kind: AddressKind,
}

impl Address {
    /// P2PKH address for a public-key hash.
    ///
    /// # Arguments
    /// * `hash` - The 20-byte hash160 of a SEC public key.
    /// * `params` - Network supplying the version byte.
    pub fn from_public_key_hash(hash: &[u8; 20], params: &NetworkParams) -> Self {
        Address {
            version: params.address_version(),
            hash: *hash,
            kind: AddressKind::PublicKeyHash,
        }
    }

    /// P2SH address for a redeem-script hash.
    pub fn from_script_hash(hash: &[u8; 20], params: &NetworkParams) -> Self {
        Address {
            version: params.p2sh_version(),
            hash: *hash,
            kind: AddressKind::ScriptHash,
        }
    }

    /// Parse a Base58Check address belonging to `params`.
    ///
    /// # Arguments
    /// * `addr` - The address string.
    /// * `params` - Network the address must belong to.
    ///
    /// # Returns
    /// The address, `InvalidAddress` for bad encoding, checksum or length,
    /// or `AddressVersionMismatch` when the version byte is neither of the
    /// network's address versions.
    pub fn from_string(addr: &str, params: &NetworkParams) -> Result<Self, ScriptError> {
        let payload = check_decode(addr)
            .map_err(|e| ScriptError::InvalidAddress(format!("{}: {}", addr, e)))?;
        if payload.len() != ADDRESS_PAYLOAD_LEN {
            return Err(ScriptError::InvalidAddress(format!(
                "{}: decoded to {} bytes, expected {}",
                addr,
                payload.len(),
                ADDRESS_PAYLOAD_LEN
            )));
        }

        let version = payload[0];
        let kind = if version == params.address_version() {
            AddressKind::PublicKeyHash
        } else if version == params.p2sh_version() {
            AddressKind::ScriptHash
        } else {
            return Err(ScriptError::AddressVersionMismatch {
                version,
                network: params.code().to_string(),
            });
        };

        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(Address { version, hash, kind })
    }

    /// Base58Check version byte.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The 20-byte hash160 the address commits to.
    pub fn hash(&self) -> &[u8; 20] {
        &self.hash
    }

    /// Whether the hash is of a public key or a script.
    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    /// The locking script paying to this address.
    pub fn to_script(&self) -> Script {
        match self.kind {
            AddressKind::PublicKeyHash => script_for_p2pkh(&self.hash),
            AddressKind::ScriptHash => script_for_p2sh(&self.hash),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&check_encode_with_version(self.version, &self.hash))
    }
}
