//! ECDSA signatures over secp256k1.
//!
//! Signing always yields a low-S signature. The nonce is either derived
//! deterministically (RFC6979) or drawn from the operating system RNG,
//! selected by `NonceMode`. Signatures serialize to strict DER, which is the
//! form embedded in unlocking scripts ahead of the sighash byte.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier, RandomizedPrehashSigner};
use k256::ecdsa;
use k256::elliptic_curve::ff::PrimeField;
use k256::elliptic_curve::scalar::IsHigh;
use k256::{FieldBytes, Scalar};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::util::ByteReader;
use crate::PrimitivesError;

/// DER tag for a SEQUENCE.
const DER_SEQUENCE: u8 = 0x30;

/// DER tag for an INTEGER.
const DER_INTEGER: u8 = 0x02;

/// How the per-signature nonce `k` is chosen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonceMode {
    /// RFC6979: `k` derived from the key and message. Repeatable output.
    #[default]
    Deterministic,
    /// `k` drawn from the OS RNG. Output differs between calls.
    Randomized,
}

/// An ECDSA signature `(r, s)` with `s` in the lower half of the group order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: [u8; 32],
}

impl Signature {
    /// Build a signature from big-endian `r` and `s`.
    ///
    /// `s` is normalized to the lower half of the order if it is high.
    /// Values that are zero or not below the group order are rejected.
    ///
    /// # Arguments
    /// * `r` - The R component (32 bytes, big-endian).
    /// * `s` - The S component (32 bytes, big-endian).
    ///
    /// # Returns
    /// `Ok(Signature)` or `InvalidSignature` for out-of-range components.
    pub fn from_scalars(r: [u8; 32], s: [u8; 32]) -> Result<Self, PrimitivesError> {
        let r_scalar = scalar_in_range(&r, "R")?;
        let s_scalar = scalar_in_range(&s, "S")?;
        Ok(Self::from_k256_scalars(&r_scalar, &s_scalar))
    }

    /// The R component.
    pub fn r(&self) -> &[u8; 32] {
        &self.r
    }

    /// The S component, always low.
    pub fn s(&self) -> &[u8; 32] {
        &self.s
    }

    /// Sign a message digest with the given key.
    ///
    /// Digests shorter than 32 bytes are left-padded with zeros and longer
    /// ones truncated, so any hash output can be passed directly.
    ///
    /// # Arguments
    /// * `hash` - The digest to sign, normally a 32-byte sighash.
    /// * `priv_key` - The signing key.
    /// * `mode` - Deterministic (RFC6979) or randomized nonce.
    ///
    /// # Returns
    /// A low-S `Signature`, or `InvalidSignature` if the backend rejects
    /// the digest.
    pub fn sign(
        hash: &[u8],
        priv_key: &PrivateKey,
        mode: NonceMode,
    ) -> Result<Self, PrimitivesError> {
        let digest = digest_to_field(hash);
        let signing_key = priv_key.signing_key();
        let sig: ecdsa::Signature = match mode {
            NonceMode::Deterministic => signing_key.sign_prehash(&digest),
            NonceMode::Randomized => signing_key.sign_prehash_with_rng(&mut OsRng, &digest),
        }
        .map_err(|e| PrimitivesError::InvalidSignature(e.to_string()))?;

        let (r, s) = sig.split_scalars();
        Ok(Self::from_k256_scalars(r.as_ref(), s.as_ref()))
    }

    /// Check this signature against a digest and public key.
    pub fn verify(&self, hash: &[u8], pub_key: &PublicKey) -> bool {
        let sig = match ecdsa::Signature::from_scalars(
            FieldBytes::from(self.r),
            FieldBytes::from(self.s),
        ) {
            Ok(sig) => sig,
            Err(_) => return false,
        };
        pub_key
            .verifying_key()
            .verify_prehash(&digest_to_field(hash), &sig)
            .is_ok()
    }

    /// Encode as strict DER: `30 len 02 rlen r 02 slen s`.
    ///
    /// Integers are minimal, with a single 0x00 pad when the high bit is set.
    pub fn to_der(&self) -> Vec<u8> {
        let r = der_integer(&self.r);
        let s = der_integer(&self.s);
        let body_len = 2 + r.len() + 2 + s.len();

        let mut out = Vec::with_capacity(2 + body_len);
        out.push(DER_SEQUENCE);
        out.push(body_len as u8);
        out.push(DER_INTEGER);
        out.push(r.len() as u8);
        out.extend_from_slice(&r);
        out.push(DER_INTEGER);
        out.push(s.len() as u8);
        out.extend_from_slice(&s);
        out
    }

    /// Decode a DER signature.
    ///
    /// Trailing bytes after the sequence are rejected, so a script push of
    /// `der ‖ sighash_byte` must have the sighash byte stripped first. A high
    /// `S` is accepted and normalized.
    ///
    /// # Arguments
    /// * `bytes` - DER-encoded signature.
    ///
    /// # Returns
    /// `Ok(Signature)` or `InvalidSignature` describing the first defect.
    pub fn from_der(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        let malformed = |what: &str| PrimitivesError::InvalidSignature(format!("malformed DER: {}", what));

        let mut reader = ByteReader::new(bytes);
        if reader.read_u8().map_err(|_| malformed("empty"))? != DER_SEQUENCE {
            return Err(malformed("missing sequence tag"));
        }
        let body_len = reader.read_u8().map_err(|_| malformed("missing length"))? as usize;
        if body_len != reader.remaining() {
            return Err(malformed("sequence length mismatch"));
        }

        let r = read_der_integer(&mut reader).map_err(|_| malformed("bad R"))?;
        let s = read_der_integer(&mut reader).map_err(|_| malformed("bad S"))?;
        if reader.remaining() != 0 {
            return Err(malformed("trailing bytes"));
        }
        Self::from_scalars(r, s)
    }

    fn from_k256_scalars(r: &Scalar, s: &Scalar) -> Self {
        let s = if bool::from(s.is_high()) { -*s } else { *s };
        Signature {
            r: r.to_bytes().into(),
            s: s.to_bytes().into(),
        }
    }
}

/// Left-pad or truncate a digest to the 32-byte field size.
fn digest_to_field(hash: &[u8]) -> [u8; 32] {
    let mut out = [0u8; 32];
    if hash.len() >= 32 {
        out.copy_from_slice(&hash[..32]);
    } else {
        out[32 - hash.len()..].copy_from_slice(hash);
    }
    out
}

/// Parse a 32-byte big-endian value as a non-zero scalar below the order.
fn scalar_in_range(bytes: &[u8; 32], label: &str) -> Result<Scalar, PrimitivesError> {
    let scalar = Option::<Scalar>::from(Scalar::from_repr(FieldBytes::from(*bytes)))
        .ok_or_else(|| PrimitivesError::InvalidSignature(format!("{} is not below the group order", label)))?;
    if bool::from(scalar.is_zero()) {
        return Err(PrimitivesError::InvalidSignature(format!("{} is zero", label)));
    }
    Ok(scalar)
}

/// Minimal DER integer body for an unsigned big-endian value.
fn der_integer(value: &[u8; 32]) -> Vec<u8> {
    let first = value.iter().position(|&b| b != 0).unwrap_or(31);
    let trimmed = &value[first..];
    let mut out = Vec::with_capacity(trimmed.len() + 1);
    if trimmed[0] & 0x80 != 0 {
        out.push(0x00);
    }
    out.extend_from_slice(trimmed);
    out
}

/// Read one `02 len bytes` element and widen it to 32 bytes.
fn read_der_integer(reader: &mut ByteReader<'_>) -> Result<[u8; 32], PrimitivesError> {
    if reader.read_u8()? != DER_INTEGER {
        return Err(PrimitivesError::InvalidSignature("expected integer".into()));
    }
    let len = reader.read_u8()? as usize;
    let body = reader.read_bytes(len)?;
    match body {
        [] => return Err(PrimitivesError::InvalidSignature("empty integer".into())),
        [b, ..] if b & 0x80 != 0 => {
            return Err(PrimitivesError::InvalidSignature("negative integer".into()))
        }
        [0x00, next, ..] if next & 0x80 == 0 => {
            return Err(PrimitivesError::InvalidSignature("non-minimal integer".into()))
        }
        _ => {}
    }
    let body = if body[0] == 0x00 && body.len() > 1 { &body[1..] } else { body };
    if body.len() > 32 {
        return Err(PrimitivesError::InvalidSignature("integer wider than 32 bytes".into()));
    }
    let mut out = [0u8; 32];
    out[32 - body.len()..].copy_from_slice(body);
    Ok(out)
}
