//! secp256k1 secret exponents.
//!
//! A `PrivateKey` is a scalar in `[1, n-1]`. It can be built from raw bytes,
//! hex, WIF or a small integer and exported back to WIF under any network
//! prefix in either compression form.

use k256::ecdsa::SigningKey;
use k256::Scalar;
use rand::rngs::OsRng;
use zeroize::Zeroizing;

use crate::base58;
use crate::ec::public_key::PublicKey;
use crate::ec::signature::{NonceMode, Signature};
use crate::PrimitivesError;

/// Serialized scalar width.
const PRIVATE_KEY_BYTES_LEN: usize = 32;

/// Suffix marking a WIF whose public key is used in compressed form.
const COMPRESS_MAGIC: u8 = 0x01;

/// A secp256k1 signing key.
#[derive(Clone)]
pub struct PrivateKey {
    inner: SigningKey,
}

/// The parts of a decoded WIF string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedWif {
    /// The secret exponent.
    pub key: PrivateKey,
    /// The network prefix byte (0x80 on BTC mainnet, 0xef on testnets, ...).
    pub prefix: u8,
    /// Whether the WIF carried the compressed-public-key marker.
    pub compressed: bool,
}

impl PrivateKey {
    /// Generate a key from the OS random number generator.
    pub fn random() -> Self {
        PrivateKey {
            inner: SigningKey::random(&mut OsRng),
        }
    }

    /// Create a key from a 32-byte big-endian scalar.
    ///
    /// # Arguments
    /// * `bytes` - Exactly 32 bytes.
    ///
    /// # Returns
    /// `Ok(PrivateKey)`, `InvalidKeyLength` for the wrong width, or
    /// `InvalidPrivateKey` for zero or a value not below the group order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != PRIVATE_KEY_BYTES_LEN {
            return Err(PrimitivesError::InvalidKeyLength {
                expected: PRIVATE_KEY_BYTES_LEN,
                got: bytes.len(),
            });
        }
        let inner = SigningKey::from_bytes(bytes.into())
            .map_err(|e| PrimitivesError::InvalidPrivateKey(e.to_string()))?;
        Ok(PrivateKey { inner })
    }

    /// Create a key from a 64-character hex scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        let bytes = Zeroizing::new(hex::decode(hex_str)?);
        Self::from_bytes(&bytes)
    }

    /// Create a key from a small integer secret exponent.
    ///
    /// Handy for fixtures: `from_secret_exponent(1)` is the key whose public
    /// key is the generator point.
    ///
    /// # Arguments
    /// * `exponent` - Any non-zero value.
    ///
    /// # Returns
    /// `Ok(PrivateKey)` or `InvalidPrivateKey` when `exponent` is zero.
    pub fn from_secret_exponent(exponent: u64) -> Result<Self, PrimitivesError> {
        let mut bytes = Zeroizing::new([0u8; PRIVATE_KEY_BYTES_LEN]);
        bytes[PRIVATE_KEY_BYTES_LEN - 8..].copy_from_slice(&exponent.to_be_bytes());
        Self::from_bytes(&bytes[..])
    }

    /// Decode a WIF string, keeping its prefix and compression flag.
    ///
    /// # Arguments
    /// * `wif` - Base58Check of `prefix ‖ scalar [‖ 0x01]`.
    ///
    /// # Returns
    /// The decoded parts, or `InvalidWif` / `ChecksumMismatch`.
    pub fn decode_wif(wif: &str) -> Result<DecodedWif, PrimitivesError> {
        let payload = Zeroizing::new(base58::check_decode(wif)?);
        let compressed = match payload.len() {
            34 if payload[33] == COMPRESS_MAGIC => true,
            34 => {
                return Err(PrimitivesError::InvalidWif(
                    "unexpected compression marker".to_string(),
                ))
            }
            33 => false,
            n => {
                return Err(PrimitivesError::InvalidWif(format!(
                    "unexpected payload length {}",
                    n
                )))
            }
        };
        let key = Self::from_bytes(&payload[1..1 + PRIVATE_KEY_BYTES_LEN])?;
        Ok(DecodedWif {
            key,
            prefix: payload[0],
            compressed,
        })
    }

    /// Decode a WIF string, discarding prefix and compression flag.
    pub fn from_wif(wif: &str) -> Result<Self, PrimitivesError> {
        Self::decode_wif(wif).map(|decoded| decoded.key)
    }

    /// Encode as WIF.
    ///
    /// # Arguments
    /// * `prefix` - The network's WIF prefix byte.
    /// * `compressed` - Append the compressed-public-key marker.
    ///
    /// # Returns
    /// The Base58Check string.
    pub fn to_wif(&self, prefix: u8, compressed: bool) -> String {
        let mut payload = Zeroizing::new(Vec::with_capacity(PRIVATE_KEY_BYTES_LEN + 1));
        payload.extend_from_slice(&self.to_bytes()[..]);
        if compressed {
            payload.push(COMPRESS_MAGIC);
        }
        base58::check_encode_with_version(prefix, &payload)
    }

    /// The scalar as 32 big-endian bytes, wiped when dropped.
    pub fn to_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.inner.to_bytes().into())
    }

    /// Hex of the 32-byte scalar.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.to_bytes()[..])
    }

    /// The public key `d·G`.
    pub fn pub_key(&self) -> PublicKey {
        PublicKey::from_k256_verifying_key(self.inner.verifying_key())
    }

    /// Sign a digest with an RFC6979 nonce.
    pub fn sign(&self, hash: &[u8]) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self, NonceMode::Deterministic)
    }

    /// Sign a digest with the given nonce mode.
    pub fn sign_with_mode(
        &self,
        hash: &[u8],
        mode: NonceMode,
    ) -> Result<Signature, PrimitivesError> {
        Signature::sign(hash, self, mode)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.inner
    }

    pub(crate) fn to_scalar(&self) -> Scalar {
        *self.inner.as_nonzero_scalar().as_ref()
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("pub_key", &self.pub_key().to_hex())
            .finish_non_exhaustive()
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PrivateKey {}
