use proptest::prelude::*;

use coinsolve_primitives::ec::{Generator, PrivateKey, Signature};
use coinsolve_script::chunk::decode_pushes;
use coinsolve_script::{script_for_p2pk, script_for_p2pkh, Script};
use coinsolve_transaction::sighash::{SIGHASH_ALL, SIGHASH_ALL_FORKID};
use coinsolve_transaction::{
    build_hash160_lookup, compute_sighash, sign_transaction, Transaction, TransactionInput,
    TransactionOutput,
};

/// Strategy to generate a random transaction.
fn arb_transaction() -> impl Strategy<Value = Transaction> {
    let arb_input = (
        prop::array::uniform32(any::<u8>()),
        any::<u32>(),
        prop::collection::vec(any::<u8>(), 1..64),
        any::<u32>(),
    )
        .prop_map(|(txid, vout, script_bytes, seq)| {
            let mut input = TransactionInput::new(txid, vout);
            input.unlocking_script = Some(Script::from_bytes(&script_bytes));
            input.sequence_number = seq;
            input
        });

    let arb_output = (any::<u64>(), prop::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(value, script_bytes)| {
            TransactionOutput::new(value, Script::from_bytes(&script_bytes))
        });

    (
        any::<u32>(),
        prop::collection::vec(arb_input, 0..4),
        prop::collection::vec(arb_output, 0..4),
        any::<u32>(),
    )
        .prop_map(|(version, inputs, outputs, lock_time)| Transaction {
            version,
            inputs,
            outputs,
            lock_time,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Wire bytes parse back to the same transaction.
    #[test]
    fn transaction_bytes_roundtrip(tx in arb_transaction()) {
        let parsed = Transaction::from_bytes(&tx.to_bytes()).unwrap();
        prop_assert_eq!(parsed, tx);
    }

    /// Every signed input carries a signature that verifies against its
    /// sighash, and the spent locking scripts are unchanged.
    #[test]
    fn signed_inputs_verify(
        exponents in prop::collection::vec(1u64..=u64::MAX, 1..4),
        compressed in any::<bool>(),
        forkid in any::<bool>(),
    ) {
        let sighash_type = if forkid { SIGHASH_ALL_FORKID } else { SIGHASH_ALL };
        let keys: Vec<PrivateKey> = exponents
            .iter()
            .map(|se| PrivateKey::from_secret_exponent(*se).unwrap())
            .collect();

        let mut tx = Transaction::new();
        let mut locking_scripts = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            let pk = key.pub_key();
            let locking = if i % 2 == 0 {
                script_for_p2pkh(&pk.hash160(compressed))
            } else {
                script_for_p2pk(&pk.to_sec(compressed)).unwrap()
            };
            let mut input = TransactionInput::new([i as u8; 32], i as u32);
            input.set_source_output(Some(TransactionOutput::new(1_000 + i as u64, locking.clone())));
            tx.add_input(input);
            locking_scripts.push(locking);
        }
        tx.add_output(TransactionOutput::new(500, script_for_p2pkh(&[7; 20])));

        let lookup = build_hash160_lookup(keys.clone(), &[Generator::Secp256k1]).unwrap();
        let report = sign_transaction(&mut tx, &lookup, sighash_type);
        prop_assert!(report.is_complete());

        for (i, key) in keys.iter().enumerate() {
            let unlocking = tx.inputs[i].unlocking_script.clone().unwrap();
            let pushes = decode_pushes(unlocking.to_bytes()).unwrap().unwrap();
            let sig_push = &pushes[0];
            let (der, type_byte) = sig_push.split_at(sig_push.len() - 1);
            prop_assert_eq!(type_byte[0], sighash_type as u8);

            let digest = compute_sighash(&tx, i, locking_scripts[i].to_bytes(), sighash_type).unwrap();
            let sig = Signature::from_der(der).unwrap();
            prop_assert!(key.pub_key().verify(&digest, &sig));
            prop_assert_eq!(tx.inputs[i].source_tx_script(), Some(&locking_scripts[i]));
        }
    }
}
