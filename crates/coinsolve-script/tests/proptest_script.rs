use proptest::prelude::*;

use coinsolve_script::{
    address_for_script, classify, script_for_multisig, script_for_p2pkh, script_for_p2sh,
    NetworkRegistry, Script, ScriptType,
};

fn sec_key() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 32).prop_map(|mut k| {
            k.insert(0, 0x02);
            k
        }),
        prop::collection::vec(any::<u8>(), 64).prop_map(|mut k| {
            k.insert(0, 0x04);
            k
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Any byte string classifies without panicking and yields an address.
    #[test]
    fn classify_is_total(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let st = classify(&data);
        if let ScriptType::Unknown(raw) = &st {
            prop_assert_eq!(raw, &data);
        }
        let btc = NetworkRegistry::builtin();
        let addr = address_for_script(&data, btc.get("BTC").unwrap());
        prop_assert!(!addr.is_empty());
    }

    /// Hash templates classify back to the hash they were built from.
    #[test]
    fn hash_templates_classify_back(hash in any::<[u8; 20]>()) {
        prop_assert_eq!(classify(script_for_p2pkh(&hash).to_bytes()), ScriptType::PayToPublicKeyHash(hash));
        prop_assert_eq!(classify(script_for_p2sh(&hash).to_bytes()), ScriptType::PayToScriptHash(hash));
    }

    /// Multisig scripts keep their threshold and key order.
    #[test]
    fn multisig_classifies_back(
        keys in prop::collection::vec(sec_key(), 1..=16),
        m_seed in any::<u8>(),
    ) {
        let m = m_seed % keys.len() as u8 + 1;
        let script = script_for_multisig(m, &keys).unwrap();
        match classify(script.to_bytes()) {
            ScriptType::Multisig { threshold, public_keys } => {
                prop_assert_eq!(threshold, m);
                prop_assert_eq!(public_keys, keys);
            }
            other => prop_assert!(false, "classified as {}", other.name()),
        }
    }

    /// Hex form round-trips.
    #[test]
    fn script_hex_roundtrip(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let script = Script::from_bytes(&data);
        let script2 = Script::from_hex(&script.to_hex()).unwrap();
        prop_assert_eq!(script, script2);
    }
}
