//! Curve generators that secret exponents are interpreted under.
//!
//! Every supported network signs on secp256k1, so there is a single
//! variant today. Keeping the generator explicit lets key material and
//! network parameters say which curve they belong to.

use std::fmt;
use std::str::FromStr;

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::ProjectivePoint;
use serde::{Deserialize, Serialize};

use crate::ec::private_key::PrivateKey;
use crate::ec::public_key::PublicKey;
use crate::PrimitivesError;

/// Group order `n` of secp256k1, big-endian.
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// A named elliptic-curve generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    #[default]
    Secp256k1,
}

impl Generator {
    /// Canonical lowercase curve name.
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Secp256k1 => "secp256k1",
        }
    }

    /// Group order, big-endian.
    pub fn order(&self) -> [u8; 32] {
        match self {
            Generator::Secp256k1 => SECP256K1_ORDER,
        }
    }

    /// Multiply the generator by a secret exponent.
    ///
    /// # Arguments
    /// * `key` - The secret exponent.
    ///
    /// # Returns
    /// The public point as a `PublicKey`.
    pub fn public_key(&self, key: &PrivateKey) -> Result<PublicKey, PrimitivesError> {
        match self {
            Generator::Secp256k1 => {
                let point = (ProjectivePoint::GENERATOR * key.to_scalar()).to_affine();
                PublicKey::from_bytes(point.to_encoded_point(true).as_bytes())
            }
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Generator {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "secp256k1" => Ok(Generator::Secp256k1),
            other => Err(PrimitivesError::UnsupportedCurve(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Scalar multiplication agrees with the signing key's own public key.
    #[test]
    fn test_public_key_matches_signing_key() {
        for se in [1u64, 2, 3, 1000, u64::MAX] {
            let key = PrivateKey::from_secret_exponent(se).unwrap();
            let via_generator = Generator::Secp256k1.public_key(&key).unwrap();
            assert_eq!(via_generator, key.pub_key(), "secret exponent {}", se);
        }
    }

    /// Names parse case-insensitively and unknown curves are rejected.
    #[test]
    fn test_name_parsing() {
        assert_eq!("SECP256K1".parse::<Generator>().unwrap(), Generator::Secp256k1);
        assert_eq!(Generator::Secp256k1.to_string(), "secp256k1");
        assert!(matches!(
            "ed25519".parse::<Generator>(),
            Err(PrimitivesError::UnsupportedCurve(_))
        ));
    }

    /// The order constant is n and rejects itself as a secret exponent.
    #[test]
    fn test_order_is_not_a_valid_key() {
        let order = Generator::Secp256k1.order();
        assert!(PrivateKey::from_bytes(&order).is_err());
    }
}
