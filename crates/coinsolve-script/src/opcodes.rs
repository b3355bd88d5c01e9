//! Script opcode values and their ASM names.
//!
//! Only the constants the template matchers and builders use are given
//! names of their own; every other defined opcode is still rendered by
//! name in ASM through `opcode_to_string`.

/// Push an empty byte vector.
pub const OP_0: u8 = 0x00;
/// Alias of `OP_0`.
pub const OP_FALSE: u8 = 0x00;
/// Smallest direct push: the next byte.
pub const OP_DATA_1: u8 = 0x01;
/// Direct push of a 20-byte hash.
pub const OP_DATA_20: u8 = 0x14;
/// Direct push of a compressed SEC key.
pub const OP_DATA_33: u8 = 0x21;
/// Direct push of an uncompressed SEC key.
pub const OP_DATA_65: u8 = 0x41;
/// Largest direct push.
pub const OP_DATA_75: u8 = 0x4b;
/// Push with a 1-byte length.
pub const OP_PUSHDATA1: u8 = 0x4c;
/// Push with a 2-byte length.
pub const OP_PUSHDATA2: u8 = 0x4d;
/// Push with a 4-byte length.
pub const OP_PUSHDATA4: u8 = 0x4e;
/// Push the number -1.
pub const OP_1NEGATE: u8 = 0x4f;
/// Push the number 1.
pub const OP_1: u8 = 0x51;
/// Alias of `OP_1`.
pub const OP_TRUE: u8 = 0x51;
/// Push the number 16.
pub const OP_16: u8 = 0x60;
/// Conditional branch.
pub const OP_IF: u8 = 0x63;
/// Inverted conditional branch.
pub const OP_NOTIF: u8 = 0x64;
/// Reserved; invalid even unexecuted.
pub const OP_VERIF: u8 = 0x65;
/// Reserved; invalid even unexecuted.
pub const OP_VERNOTIF: u8 = 0x66;
/// End of a conditional branch.
pub const OP_ENDIF: u8 = 0x68;
/// Marks an output unspendable.
pub const OP_RETURN: u8 = 0x6a;
/// Duplicate the top stack item.
pub const OP_DUP: u8 = 0x76;
/// Push whether the top two items are equal.
pub const OP_EQUAL: u8 = 0x87;
/// `OP_EQUAL` then fail unless true.
pub const OP_EQUALVERIFY: u8 = 0x88;
/// Replace the top item with its hash160.
pub const OP_HASH160: u8 = 0xa9;
/// Start of the signed script code.
pub const OP_CODESEPARATOR: u8 = 0xab;
/// Check one signature against one key.
pub const OP_CHECKSIG: u8 = 0xac;
/// Check m signatures against n keys.
pub const OP_CHECKMULTISIG: u8 = 0xae;

/// Named opcodes outside the push and small-integer ranges.
const NAMED_OPCODES: &[(u8, &str)] = &[
    (0x4f, "OP_1NEGATE"),
    (0x50, "OP_RESERVED"),
    (0x61, "OP_NOP"),
    (0x62, "OP_VER"),
    (0x63, "OP_IF"),
    (0x64, "OP_NOTIF"),
    (0x65, "OP_VERIF"),
    (0x66, "OP_VERNOTIF"),
    (0x67, "OP_ELSE"),
    (0x68, "OP_ENDIF"),
    (0x69, "OP_VERIFY"),
    (0x6a, "OP_RETURN"),
    (0x6b, "OP_TOALTSTACK"),
    (0x6c, "OP_FROMALTSTACK"),
    (0x6d, "OP_2DROP"),
    (0x6e, "OP_2DUP"),
    (0x6f, "OP_3DUP"),
    (0x70, "OP_2OVER"),
    (0x71, "OP_2ROT"),
    (0x72, "OP_2SWAP"),
    (0x73, "OP_IFDUP"),
    (0x74, "OP_DEPTH"),
    (0x75, "OP_DROP"),
    (0x76, "OP_DUP"),
    (0x77, "OP_NIP"),
    (0x78, "OP_OVER"),
    (0x79, "OP_PICK"),
    (0x7a, "OP_ROLL"),
    (0x7b, "OP_ROT"),
    (0x7c, "OP_SWAP"),
    (0x7d, "OP_TUCK"),
    (0x7e, "OP_CAT"),
    (0x7f, "OP_SUBSTR"),
    (0x80, "OP_LEFT"),
    (0x81, "OP_RIGHT"),
    (0x82, "OP_SIZE"),
    (0x83, "OP_INVERT"),
    (0x84, "OP_AND"),
    (0x85, "OP_OR"),
    (0x86, "OP_XOR"),
    (0x87, "OP_EQUAL"),
    (0x88, "OP_EQUALVERIFY"),
    (0x89, "OP_RESERVED1"),
    (0x8a, "OP_RESERVED2"),
    (0x8b, "OP_1ADD"),
    (0x8c, "OP_1SUB"),
    (0x8d, "OP_2MUL"),
    (0x8e, "OP_2DIV"),
    (0x8f, "OP_NEGATE"),
    (0x90, "OP_ABS"),
    (0x91, "OP_NOT"),
    (0x92, "OP_0NOTEQUAL"),
    (0x93, "OP_ADD"),
    (0x94, "OP_SUB"),
    (0x95, "OP_MUL"),
    (0x96, "OP_DIV"),
    (0x97, "OP_MOD"),
    (0x98, "OP_LSHIFT"),
    (0x99, "OP_RSHIFT"),
    (0x9a, "OP_BOOLAND"),
    (0x9b, "OP_BOOLOR"),
    (0x9c, "OP_NUMEQUAL"),
    (0x9d, "OP_NUMEQUALVERIFY"),
    (0x9e, "OP_NUMNOTEQUAL"),
    (0x9f, "OP_LESSTHAN"),
    (0xa0, "OP_GREATERTHAN"),
    (0xa1, "OP_LESSTHANOREQUAL"),
    (0xa2, "OP_GREATERTHANOREQUAL"),
    (0xa3, "OP_MIN"),
    (0xa4, "OP_MAX"),
    (0xa5, "OP_WITHIN"),
    (0xa6, "OP_RIPEMD160"),
    (0xa7, "OP_SHA1"),
    (0xa8, "OP_SHA256"),
    (0xa9, "OP_HASH160"),
    (0xaa, "OP_HASH256"),
    (0xab, "OP_CODESEPARATOR"),
    (0xac, "OP_CHECKSIG"),
    (0xad, "OP_CHECKSIGVERIFY"),
    (0xae, "OP_CHECKMULTISIG"),
    (0xaf, "OP_CHECKMULTISIGVERIFY"),
    (0xb0, "OP_NOP1"),
    (0xb1, "OP_CHECKLOCKTIMEVERIFY"),
    (0xb2, "OP_CHECKSEQUENCEVERIFY"),
    (0xb3, "OP_NOP4"),
    (0xb4, "OP_NOP5"),
    (0xb5, "OP_NOP6"),
    (0xb6, "OP_NOP7"),
    (0xb7, "OP_NOP8"),
    (0xb8, "OP_NOP9"),
    (0xb9, "OP_NOP10"),
];

/// True for `OP_0` and `OP_1` through `OP_16`.
pub fn is_small_int_op(op: u8) -> bool {
    op == OP_0 || (OP_1..=OP_16).contains(&op)
}

/// The integer an `OP_0`/`OP_1..OP_16` opcode pushes.
pub fn small_int_value(op: u8) -> Option<u8> {
    match op {
        OP_0 => Some(0),
        OP_1..=OP_16 => Some(op - OP_1 + 1),
        _ => None,
    }
}

/// The opcode that pushes `n` for `0 <= n <= 16`.
pub fn small_int_op(n: u8) -> Option<u8> {
    match n {
        0 => Some(OP_0),
        1..=16 => Some(OP_1 + n - 1),
        _ => None,
    }
}

/// ASM name of an opcode. Push opcodes render as `OP_DATA_n` and
/// unassigned values as `OP_UNKNOWNn`.
pub fn opcode_to_string(op: u8) -> String {
    match op {
        OP_0 => "OP_0".to_string(),
        OP_DATA_1..=OP_DATA_75 => format!("OP_DATA_{}", op),
        OP_PUSHDATA1 => "OP_PUSHDATA1".to_string(),
        OP_PUSHDATA2 => "OP_PUSHDATA2".to_string(),
        OP_PUSHDATA4 => "OP_PUSHDATA4".to_string(),
        OP_1..=OP_16 => format!("OP_{}", op - OP_1 + 1),
        _ => NAMED_OPCODES
            .iter()
            .find(|(code, _)| *code == op)
            .map(|(_, name)| name.to_string())
            .unwrap_or_else(|| format!("OP_UNKNOWN{}", op)),
    }
}

/// Parse an ASM opcode name. Accepts `OP_FALSE`/`OP_TRUE` aliases.
pub fn string_to_opcode(name: &str) -> Option<u8> {
    match name {
        "OP_0" | "OP_FALSE" => return Some(OP_0),
        "OP_TRUE" => return Some(OP_TRUE),
        "OP_PUSHDATA1" => return Some(OP_PUSHDATA1),
        "OP_PUSHDATA2" => return Some(OP_PUSHDATA2),
        "OP_PUSHDATA4" => return Some(OP_PUSHDATA4),
        _ => {}
    }
    if let Some(n) = name.strip_prefix("OP_").and_then(|n| n.parse::<u8>().ok()) {
        if (1..=16).contains(&n) {
            return small_int_op(n);
        }
    }
    NAMED_OPCODES
        .iter()
        .find(|(_, n)| *n == name)
        .map(|(code, _)| *code)
}
