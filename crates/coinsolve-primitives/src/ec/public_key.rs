//! secp256k1 public keys and their SEC encodings.
//!
//! A point has two SEC encodings, 33-byte compressed and 65-byte
//! uncompressed, and each encoding hashes to a different hash160. Scripts
//! commit to one of them, so both are exposed side by side.

use k256::ecdsa::VerifyingKey;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use std::fmt;

use crate::ec::signature::Signature;
use crate::hash::hash160;
use crate::PrimitivesError;

/// Length of a compressed SEC encoding (prefix + x).
pub const COMPRESSED_LEN: usize = 33;

/// Length of an uncompressed SEC encoding (0x04 + x + y).
pub const UNCOMPRESSED_LEN: usize = 65;

/// A point on secp256k1 usable for signature verification.
#[derive(Clone, Debug)]
pub struct PublicKey {
    inner: VerifyingKey,
}

impl PublicKey {
    /// Parse a SEC-encoded point.
    ///
    /// # Arguments
    /// * `bytes` - 33-byte compressed or 65-byte uncompressed encoding.
    ///
    /// # Returns
    /// `Ok(PublicKey)`, or `InvalidPublicKey` when the length is wrong, the
    /// prefix does not match the length, or the point is not on the curve.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PrimitivesError> {
        if bytes.len() != COMPRESSED_LEN && bytes.len() != UNCOMPRESSED_LEN {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "SEC encoding must be {} or {} bytes, got {}",
                COMPRESSED_LEN,
                UNCOMPRESSED_LEN,
                bytes.len()
            )));
        }
        // k256 also takes the SEC1 compact tag 0x05; SEC keys here never use it.
        let prefix_ok = match bytes.len() {
            COMPRESSED_LEN => matches!(bytes[0], 0x02 | 0x03),
            _ => bytes[0] == 0x04,
        };
        if !prefix_ok {
            return Err(PrimitivesError::InvalidPublicKey(format!(
                "prefix {:#04x} does not match a {} byte SEC encoding",
                bytes[0],
                bytes.len()
            )));
        }
        let inner = VerifyingKey::from_sec1_bytes(bytes)?;
        Ok(PublicKey { inner })
    }

    /// Parse a hex SEC encoding.
    pub fn from_hex(hex_str: &str) -> Result<Self, PrimitivesError> {
        Self::from_bytes(&hex::decode(hex_str)?)
    }

    /// 33-byte compressed SEC encoding.
    pub fn to_compressed(&self) -> [u8; COMPRESSED_LEN] {
        let mut out = [0u8; COMPRESSED_LEN];
        out.copy_from_slice(self.inner.to_encoded_point(true).as_bytes());
        out
    }

    /// 65-byte uncompressed SEC encoding.
    pub fn to_uncompressed(&self) -> [u8; UNCOMPRESSED_LEN] {
        let mut out = [0u8; UNCOMPRESSED_LEN];
        out.copy_from_slice(self.inner.to_encoded_point(false).as_bytes());
        out
    }

    /// SEC encoding in the requested form.
    ///
    /// # Arguments
    /// * `compressed` - `true` for 33 bytes, `false` for 65.
    pub fn to_sec(&self, compressed: bool) -> Vec<u8> {
        self.inner.to_encoded_point(compressed).as_bytes().to_vec()
    }

    /// hash160 of the compressed encoding.
    pub fn hash160_compressed(&self) -> [u8; 20] {
        hash160(&self.to_compressed())
    }

    /// hash160 of the uncompressed encoding.
    pub fn hash160_uncompressed(&self) -> [u8; 20] {
        hash160(&self.to_uncompressed())
    }

    /// hash160 of the encoding in the requested form.
    pub fn hash160(&self, compressed: bool) -> [u8; 20] {
        if compressed {
            self.hash160_compressed()
        } else {
            self.hash160_uncompressed()
        }
    }

    /// Compressed encoding as lowercase hex.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_compressed())
    }

    /// Verify `sig` over the digest `hash`.
    pub fn verify(&self, hash: &[u8], sig: &Signature) -> bool {
        sig.verify(hash, self)
    }

    pub(crate) fn from_k256_verifying_key(vk: &VerifyingKey) -> Self {
        PublicKey { inner: *vk }
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.inner
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_compressed() == other.to_compressed()
    }
}

impl Eq for PublicKey {}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ec::PrivateKey;

    const G_COMPRESSED: &str =
        "0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798";
    const G_UNCOMPRESSED: &str = "0479be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798\
                                  483ada7726a3c4655da4fbfc0e1108a8fd17b448a68554199c47d08ffb10d4b8";

    /// The generator point in both encodings, and their distinct hash160s.
    #[test]
    fn test_generator_encodings() {
        let g = PrivateKey::from_secret_exponent(1).unwrap().pub_key();
        assert_eq!(hex::encode(g.to_compressed()), G_COMPRESSED);
        assert_eq!(hex::encode(g.to_uncompressed()), G_UNCOMPRESSED);
        assert_eq!(g.to_sec(true), g.to_compressed().to_vec());
        assert_eq!(g.to_sec(false), g.to_uncompressed().to_vec());
        assert_eq!(
            hex::encode(g.hash160_compressed()),
            "751e76e8199196d454941c45d1b3a323f1433bd6"
        );
        assert_eq!(
            hex::encode(g.hash160_uncompressed()),
            "91b24bf9f5288532960ac687abb035127b1d28a5"
        );
        assert_eq!(g.hash160(true), g.hash160_compressed());
    }

    /// Both encodings of one point parse to the same key.
    #[test]
    fn test_parse_both_forms() {
        let a = PublicKey::from_hex(G_COMPRESSED).unwrap();
        let b = PublicKey::from_hex(G_UNCOMPRESSED).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), G_COMPRESSED);
    }

    /// Off-curve points and wrong lengths are rejected.
    #[test]
    fn test_invalid_encodings() {
        let mut off_curve = hex::decode(G_UNCOMPRESSED).unwrap();
        off_curve[1] ^= 0x04;
        assert!(PublicKey::from_bytes(&off_curve).is_err());
        assert!(PublicKey::from_bytes(&[0x05]).is_err());
        assert!(PublicKey::from_bytes(&[]).is_err());

        let mut bad_prefix = hex::decode(G_COMPRESSED).unwrap();
        bad_prefix[0] = 0x05;
        assert!(PublicKey::from_bytes(&bad_prefix).is_err());
    }

    /// A prefix must match the encoding length it appears with.
    #[test]
    fn test_prefix_must_match_length() {
        let compressed = hex::decode(G_COMPRESSED).unwrap();
        let uncompressed = hex::decode(G_UNCOMPRESSED).unwrap();
        for prefix in [0x00u8, 0x01, 0x04, 0x05, 0x06, 0x07, 0xff] {
            let mut bytes = compressed.clone();
            bytes[0] = prefix;
            assert!(PublicKey::from_bytes(&bytes).is_err(), "33 bytes, prefix {:#04x}", prefix);
        }
        for prefix in [0x00u8, 0x02, 0x03, 0x05, 0x06, 0x07] {
            let mut bytes = uncompressed.clone();
            bytes[0] = prefix;
            assert!(PublicKey::from_bytes(&bytes).is_err(), "65 bytes, prefix {:#04x}", prefix);
        }
        assert!(PublicKey::from_bytes(&compressed).is_ok());
        assert!(PublicKey::from_bytes(&uncompressed).is_ok());
    }
}
