use proptest::prelude::*;

use coinsolve_primitives::base58;
use coinsolve_primitives::ec::{Generator, NonceMode, PrivateKey, Signature};
use coinsolve_primitives::hash::{hash160, sha256};
use coinsolve_primitives::util::{ByteReader, VarInt};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn wif_roundtrip_keeps_prefix_and_compression(
        seed in prop::array::uniform32(any::<u8>()),
        prefix in any::<u8>(),
        compressed in any::<bool>(),
    ) {
        // Not every 32-byte string is a scalar in [1, n-1].
        if let Ok(key) = PrivateKey::from_bytes(&seed) {
            let decoded = PrivateKey::decode_wif(&key.to_wif(prefix, compressed)).unwrap();
            prop_assert_eq!(decoded.key, key);
            prop_assert_eq!(decoded.prefix, prefix);
            prop_assert_eq!(decoded.compressed, compressed);
        }
    }

    #[test]
    fn sign_verify_and_der_roundtrip(
        se in 1u64..=u64::MAX,
        msg in prop::collection::vec(any::<u8>(), 0..256),
        randomized in any::<bool>(),
    ) {
        let key = PrivateKey::from_secret_exponent(se).unwrap();
        let mode = if randomized { NonceMode::Randomized } else { NonceMode::Deterministic };
        let hash = sha256(&msg);
        let sig = key.sign_with_mode(&hash, mode).unwrap();
        prop_assert!(key.pub_key().verify(&hash, &sig));

        let der = sig.to_der();
        prop_assert!(der.len() <= 72);
        prop_assert_eq!(Signature::from_der(&der).unwrap(), sig);
    }

    #[test]
    fn generator_and_pub_key_hashes_agree(se in 1u64..=u64::MAX) {
        let key = PrivateKey::from_secret_exponent(se).unwrap();
        let pub_key = Generator::Secp256k1.public_key(&key).unwrap();
        prop_assert_eq!(pub_key.hash160_compressed(), hash160(&pub_key.to_compressed()));
        prop_assert_eq!(pub_key.hash160_uncompressed(), hash160(&pub_key.to_uncompressed()));
        prop_assert_ne!(pub_key.hash160_compressed(), pub_key.hash160_uncompressed());
    }

    #[test]
    fn base58check_versioned_roundtrip(version in any::<u8>(), payload in prop::collection::vec(any::<u8>(), 0..64)) {
        let encoded = base58::check_encode_with_version(version, &payload);
        let decoded = base58::check_decode(&encoded).unwrap();
        prop_assert_eq!(decoded[0], version);
        prop_assert_eq!(&decoded[1..], &payload[..]);
    }

    #[test]
    fn varint_reader_consumes_exact_width(value in any::<u64>()) {
        let encoded = VarInt(value).to_bytes();
        let mut reader = ByteReader::new(&encoded);
        prop_assert_eq!(reader.read_varint().unwrap(), VarInt(value));
        prop_assert_eq!(reader.remaining(), 0);
    }
}
