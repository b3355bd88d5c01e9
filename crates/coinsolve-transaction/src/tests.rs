//! Transaction wire-format and end-to-end signing tests.

use crate::input::{TransactionInput, DEFAULT_SEQUENCE_NUMBER};
use crate::lookup::build_hash160_lookup;
use crate::output::TransactionOutput;
use crate::sighash::SIGHASH_ALL_FORKID;
use crate::solver::sign_transaction;
use crate::transaction::Transaction;
use crate::TransactionError;
use coinsolve_primitives::ec::{Generator, PrivateKey};
use coinsolve_script::{Script, ScriptType};

/// One input, two outputs (P2PKH with an OP_RETURN tail, and plain P2PKH).
const SOURCE_RAW_TX: &str = "010000000138c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2030000006a47304402203e9ab8e4c14addf3b4741540b556cfb0e0efb67dc1a7b5ce84c3ac56b3fd447802203c9f49f7bd893ebd7060176dfc36bcaff9d2c443d9a0dd6cd2d59b372c024d20412102798913bc057b344de675dac34faafe3dc2f312c758cd9068209f810877306d66ffffffff02dc050000000000002076a914eb0bd5edba389198e73f8efabddfc61666969ff788ac6a0568656c6c6faa0d0000000000001976a914eb0bd5edba389198e73f8efabddfc61666969ff788ac00000000";

/// Three inputs, two outputs, lock time 103.
const MULTI_INPUT_TX_HEX: &str = "0200000003a9bc457fdc6a54d99300fb137b23714d860c350a9d19ff0f571e694a419ff3a0010000006b48304502210086c83beb2b2663e4709a583d261d75be538aedcafa7766bd983e5c8db2f8b2fc02201a88b178624ab0ad1748b37c875f885930166237c88f5af78ee4e61d337f935f412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff0092bb9a47e27bf64fc98f557c530c04d9ac25e2f2a8b600e92a0b1ae7c89c20010000006b483045022100f06b3db1c0a11af348401f9cebe10ae2659d6e766a9dcd9e3a04690ba10a160f02203f7fbd7dfcfc70863aface1a306fcc91bbadf6bc884c21a55ef0d32bd6b088c8412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff9d0d4554fa692420a0830ca614b6c60f1bf8eaaa21afca4aa8c99fb052d9f398000000006b483045022100d920f2290548e92a6235f8b2513b7f693a64a0d3fa699f81a034f4b4608ff82f0220767d7d98025aff3c7bd5f2a66aab6a824f5990392e6489aae1e1ae3472d8dffb412103e8be830d98bb3b007a0343ee5c36daa48796ae8bb57946b1e87378ad6e8a090dfeffffff02807c814a000000001976a9143a6bf34ebfcf30e8541bbb33a7882845e5a29cb488ac76b0e60e000000001976a914bd492b67f90cb85918494767ebb23102c4f06b7088ac67000000";

// -----------------------------------------------------------------------
// Parsing and serialization
// -----------------------------------------------------------------------

/// A one-input transaction parses and re-serializes identically.
#[test]
fn test_from_hex_roundtrip() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).expect("should parse source tx hex");
    assert_eq!(tx.version, 1);
    assert_eq!(tx.input_count(), 1);
    assert_eq!(tx.output_count(), 2);
    assert_eq!(tx.lock_time, 0);
    assert_eq!(tx.to_hex(), SOURCE_RAW_TX);
    assert_eq!(tx.to_string(), SOURCE_RAW_TX);
}

/// A three-input transaction parses and re-serializes identically.
#[test]
fn test_multi_input_roundtrip() {
    let tx = Transaction::from_hex(MULTI_INPUT_TX_HEX).expect("should parse multi-input tx");
    assert_eq!(tx.version, 2);
    assert_eq!(tx.input_count(), 3);
    assert_eq!(tx.lock_time, 103);
    assert_eq!(tx.inputs[0].sequence_number, 0xffff_fffe);
    assert_eq!(tx.to_hex(), MULTI_INPUT_TX_HEX);
}

/// Parsed inputs keep raw txid bytes and their sequence number.
#[test]
fn test_parsed_input_fields() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let input = &tx.inputs[0];
    assert_eq!(
        hex::encode(input.source_txid),
        "38c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2"
    );
    assert_eq!(input.source_tx_out_index, 3);
    assert_eq!(input.sequence_number, DEFAULT_SEQUENCE_NUMBER);
    assert!(input.unlocking_script.is_some());
    assert!(input.source_tx_output().is_none());
    assert_eq!(tx.outputs[0].value, 1500);
    assert_eq!(tx.outputs[1].locking_script.classify().name(), "p2pkh");
}

/// Trailing bytes, bad hex and truncated data are rejected.
#[test]
fn test_parse_errors() {
    let extended = format!("{}deadbeef", SOURCE_RAW_TX);
    assert!(matches!(
        Transaction::from_hex(&extended),
        Err(TransactionError::SerializationError(_))
    ));
    assert!(Transaction::from_hex("not_valid_hex").is_err());
    assert!(Transaction::from_bytes(&[]).is_err());
    assert!(Transaction::from_hex(&SOURCE_RAW_TX[..SOURCE_RAW_TX.len() - 10]).is_err());
}

/// An empty transaction is version, two zero counts and lock time.
#[test]
fn test_empty_transaction_serialization() {
    let tx = Transaction::default();
    assert_eq!(tx.to_hex(), "01000000000000000000");
    assert_eq!(Transaction::from_hex("01000000000000000000").unwrap(), tx);
}

// -----------------------------------------------------------------------
// Transaction ID
// -----------------------------------------------------------------------

/// The display txid is the byte-reversed hash.
#[test]
fn test_tx_id() {
    let tx = Transaction::from_hex(SOURCE_RAW_TX).unwrap();
    let mut reversed = tx.tx_id();
    reversed.reverse();
    assert_eq!(hex::encode(reversed), tx.tx_id_hex());
    assert_ne!(
        tx.tx_id(),
        Transaction::from_hex(MULTI_INPUT_TX_HEX).unwrap().tx_id()
    );
}

/// add_input_from reverses the display txid and attaches the source.
#[test]
fn test_add_input_from() {
    let mut tx = Transaction::new();
    let display = "e2fa2ae1e9a45b72ff180c2a41a06eea293e1a046426bbc363b0ff141cc6c738";
    let script = Script::from_hex("76a914eb0bd5edba389198e73f8efabddfc61666969ff788ac").unwrap();
    tx.add_input_from(display, 3, script.clone(), 1500).unwrap();
    let input = &tx.inputs[0];
    assert_eq!(
        hex::encode(input.source_txid),
        "38c7c61c14ffb063c3bb2664041a3e29ea6ea0412a0c18ff725ba4e9e12afae2"
    );
    assert_eq!(input.source_tx_value(), Some(1500));
    assert_eq!(input.source_tx_script(), Some(&script));
    assert!(tx.add_input_from("abcd", 0, Script::new(), 0).is_err());
}

// -----------------------------------------------------------------------
// End-to-end signing
// -----------------------------------------------------------------------

/// Signing a P2PKH input with SIGHASH_ALL|FORKID and an RFC6979 nonce
/// reproduces a known signed transaction byte for byte.
#[test]
fn test_p2pkh_sign_exact_match() {
    let unsigned_hex = "010000000193a35408b6068499e0d5abd799d3e827d9bfe70c9b75ebe209c91d25072326510000000000ffffffff02404b4c00000000001976a91404ff367be719efa79d76e4416ffb072cd53b208888acde94a905000000001976a91404d03f746652cfcb6cb55119ab473a045137d26588ac00000000";
    let mut tx = Transaction::from_hex(unsigned_hex).expect("should parse unsigned tx");
    let locking = Script::from_hex("76a914c0a3c167a28cabb9fbb495affa0761e6e74ac60d88ac").unwrap();
    tx.inputs[0].set_source_output(Some(TransactionOutput::new(100_000_000, locking.clone())));

    let key = PrivateKey::from_wif("cNGwGSc7KRrTmdLUZ54fiSXWbhLNDc2Eg5zNucgQxyQCzuQ5YRDq")
        .expect("should parse WIF");
    let lookup = build_hash160_lookup([key], &[Generator::Secp256k1]).unwrap();

    let report = sign_transaction(&mut tx, &lookup, SIGHASH_ALL_FORKID);
    assert!(report.is_complete());

    let expected_signed_tx = "010000000193a35408b6068499e0d5abd799d3e827d9bfe70c9b75ebe209c91d2507232651000000006b483045022100c1d77036dc6cd1f3fa1214b0688391ab7f7a16cd31ea4e5a1f7a415ef167df820220751aced6d24649fa235132f1e6969e163b9400f80043a72879237dab4a1190ad412103b8b40a84123121d260f5c109bc5a46ec819c2e4002e5ba08638783bfb4e01435ffffffff02404b4c00000000001976a91404ff367be719efa79d76e4416ffb072cd53b208888acde94a905000000001976a91404d03f746652cfcb6cb55119ab473a045137d26588ac00000000";
    assert_eq!(tx.to_hex(), expected_signed_tx);

    // The spent locking script is untouched by signing.
    assert_eq!(tx.inputs[0].source_tx_script(), Some(&locking));
    assert!(matches!(locking.classify(), ScriptType::PayToPublicKeyHash(_)));
}

/// Inputs built by hand serialize without an unlocking script until signed.
#[test]
fn test_unsigned_input_serialization() {
    let mut tx = Transaction::new();
    tx.add_input(TransactionInput::new([0xab; 32], 1));
    tx.add_output(TransactionOutput::new(42, Script::from_hex("51").unwrap()));
    let hex = tx.to_hex();
    // version, 1 input: txid, vout, empty script, sequence
    assert!(hex.starts_with(&format!("0100000001{}0100000000ffffffff", "ab".repeat(32))));
    assert_eq!(Transaction::from_hex(&hex).unwrap().inputs[0].unlocking_script, None);
}
