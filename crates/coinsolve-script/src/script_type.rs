//! Standard locking-script templates.
//!
//! `classify` maps any byte string onto exactly one `ScriptType`. The
//! templates are tried in a fixed order (P2PKH, P2PK, P2SH, multisig,
//! null data) and whatever matches none of them is `Unknown`. Builders for
//! each template produce scripts that classify back to the same variant.

use crate::chunk::{decode_pushes, decode_script, ScriptChunk};
use crate::opcodes::*;
use crate::script::Script;
use crate::ScriptError;

/// Byte length of a P2PKH locking script.
const P2PKH_LEN: usize = 25;

/// Byte length of a P2SH locking script.
const P2SH_LEN: usize = 23;

/// Compressed and uncompressed SEC lengths.
const SEC_COMPRESSED_LEN: usize = 33;
const SEC_UNCOMPRESSED_LEN: usize = 65;

/// Largest key count `OP_CHECKMULTISIG` templates use.
const MAX_MULTISIG_KEYS: usize = 16;

/// The template a locking script matches, with the data it commits to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScriptType {
    /// `OP_DUP OP_HASH160 <hash160> OP_EQUALVERIFY OP_CHECKSIG`
    PayToPublicKeyHash([u8; 20]),
    /// `<sec> OP_CHECKSIG` with a 33- or 65-byte SEC key.
    PayToPublicKey(Vec<u8>),
    /// `OP_HASH160 <hash160> OP_EQUAL`
    PayToScriptHash([u8; 20]),
    /// `OP_m <sec>... OP_n OP_CHECKMULTISIG`
    Multisig { threshold: u8, public_keys: Vec<Vec<u8>> },
    /// `OP_RETURN` followed by the payload.
    NullData(Vec<u8>),
    /// Anything else, kept verbatim.
    Unknown(Vec<u8>),
}

impl ScriptType {
    /// Short template name, as used in log lines and errors.
    pub fn name(&self) -> &'static str {
        match self {
            ScriptType::PayToPublicKeyHash(_) => "p2pkh",
            ScriptType::PayToPublicKey(_) => "p2pk",
            ScriptType::PayToScriptHash(_) => "p2sh",
            ScriptType::Multisig { .. } => "multisig",
            ScriptType::NullData(_) => "nulldata",
            ScriptType::Unknown(_) => "unknown",
        }
    }

    /// The public-key hash of a P2PKH script.
    pub fn hash160(&self) -> Option<&[u8; 20]> {
        match self {
            ScriptType::PayToPublicKeyHash(h) => Some(h),
            _ => None,
        }
    }

    /// The SEC key of a P2PK script.
    pub fn public_key(&self) -> Option<&[u8]> {
        match self {
            ScriptType::PayToPublicKey(sec) => Some(sec.as_slice()),
            _ => None,
        }
    }

    /// The redeem-script hash of a P2SH script.
    pub fn script_hash(&self) -> Option<&[u8; 20]> {
        match self {
            ScriptType::PayToScriptHash(h) => Some(h),
            _ => None,
        }
    }

    /// Threshold and keys of a multisig script.
    pub fn multisig(&self) -> Option<(u8, &[Vec<u8>])> {
        match self {
            ScriptType::Multisig { threshold, public_keys } => Some((*threshold, public_keys.as_slice())),
            _ => None,
        }
    }

    /// Payload of a null-data script.
    pub fn null_data(&self) -> Option<&[u8]> {
        match self {
            ScriptType::NullData(payload) => Some(payload.as_slice()),
            _ => None,
        }
    }

    /// Rebuild the locking script for this template.
    ///
    /// `Unknown` returns its bytes unchanged. A `NullData` payload is
    /// re-encoded as a single push, so payloads that arrived as several
    /// pushes come back as one.
    pub fn to_script(&self) -> Result<Script, ScriptError> {
        match self {
            ScriptType::PayToPublicKeyHash(h) => Ok(script_for_p2pkh(h)),
            ScriptType::PayToPublicKey(sec) => script_for_p2pk(sec),
            ScriptType::PayToScriptHash(h) => Ok(script_for_p2sh(h)),
            ScriptType::Multisig { threshold, public_keys } => {
                script_for_multisig(*threshold, public_keys.as_slice())
            }
            ScriptType::NullData(payload) => script_for_nulldata(payload),
            ScriptType::Unknown(raw) => Ok(Script::from_bytes(raw)),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a locking script.
///
/// Total: every input maps to some variant and nothing panics. Scripts
/// whose pushes run past the end are `Unknown`.
///
/// # Arguments
/// * `script` - Raw locking-script bytes.
///
/// # Returns
/// The first template that matches, or `ScriptType::Unknown`.
pub fn classify(script: &[u8]) -> ScriptType {
    if let Some(h) = match_p2pkh(script) {
        return ScriptType::PayToPublicKeyHash(h);
    }
    if let Some(sec) = match_p2pk(script) {
        return ScriptType::PayToPublicKey(sec.to_vec());
    }
    if let Some(h) = match_p2sh(script) {
        return ScriptType::PayToScriptHash(h);
    }
    match match_multisig(script) {
        Ok(Some((threshold, public_keys))) => {
            return ScriptType::Multisig { threshold, public_keys }
        }
        Ok(None) => {}
        Err(e) => log::debug!("{} byte script does not decode: {}", script.len(), e),
    }
    if script.first() == Some(&OP_RETURN) {
        return ScriptType::NullData(null_data_payload(&script[1..]));
    }
    ScriptType::Unknown(script.to_vec())
}

fn match_p2pkh(b: &[u8]) -> Option<[u8; 20]> {
    match b {
        [OP_DUP, OP_HASH160, OP_DATA_20, hash @ .., OP_EQUALVERIFY, OP_CHECKSIG]
            if b.len() == P2PKH_LEN =>
        {
            hash.try_into().ok()
        }
        _ => None,
    }
}

fn match_p2pk(b: &[u8]) -> Option<&[u8]> {
    match b {
        [len @ (OP_DATA_33 | OP_DATA_65), sec @ .., OP_CHECKSIG] if sec.len() == *len as usize => {
            Some(sec)
        }
        _ => None,
    }
}

fn match_p2sh(b: &[u8]) -> Option<[u8; 20]> {
    match b {
        [OP_HASH160, OP_DATA_20, hash @ .., OP_EQUAL] if b.len() == P2SH_LEN => hash.try_into().ok(),
        _ => None,
    }
}

/// `OP_m <key>{n} OP_n OP_CHECKMULTISIG` with `1 <= m <= n <= 16`.
fn match_multisig(b: &[u8]) -> Result<Option<(u8, Vec<Vec<u8>>)>, ScriptError> {
    if b.last() != Some(&OP_CHECKMULTISIG) {
        return Ok(None);
    }
    let chunks = decode_script(b)?;
    let (m_op, keys, n_op) = match chunks.as_slice() {
        [first, keys @ .., n_chunk, _checkmultisig] => (first.op, keys, n_chunk.op),
        _ => return Ok(None),
    };
    let (Some(m), Some(n)) = (small_int_value(m_op), small_int_value(n_op)) else {
        return Ok(None);
    };
    if m == 0 || m > n || keys.len() != n as usize || keys.len() > MAX_MULTISIG_KEYS {
        return Ok(None);
    }
    let public_keys: Option<Vec<Vec<u8>>> = keys.iter().map(sec_push).collect();
    Ok(public_keys.map(|keys| (m, keys)))
}

/// The payload of a push chunk if it has a SEC key length.
fn sec_push(chunk: &ScriptChunk) -> Option<Vec<u8>> {
    chunk
        .push_data()
        .filter(|d| d.len() == SEC_COMPRESSED_LEN || d.len() == SEC_UNCOMPRESSED_LEN)
        .map(<[u8]>::to_vec)
}

/// Everything after `OP_RETURN`: concatenated push payloads when the tail
/// is push-only, otherwise the raw bytes.
fn null_data_payload(tail: &[u8]) -> Vec<u8> {
    match decode_pushes(tail) {
        Ok(Some(pushes)) => pushes.concat(),
        Ok(None) => tail.to_vec(),
        Err(e) => {
            log::debug!("null data tail is not well-formed pushes: {}", e);
            tail.to_vec()
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// `OP_DUP OP_HASH160 <hash160> OP_EQUALVERIFY OP_CHECKSIG`
pub fn script_for_p2pkh(hash160: &[u8; 20]) -> Script {
    let mut b = Vec::with_capacity(P2PKH_LEN);
    b.extend_from_slice(&[OP_DUP, OP_HASH160, OP_DATA_20]);
    b.extend_from_slice(hash160);
    b.extend_from_slice(&[OP_EQUALVERIFY, OP_CHECKSIG]);
    Script::from(b)
}

/// `<sec> OP_CHECKSIG`
///
/// # Arguments
/// * `sec` - A 33- or 65-byte SEC public key.
///
/// # Returns
/// The script, or `InvalidTemplate` for any other key length.
pub fn script_for_p2pk(sec: &[u8]) -> Result<Script, ScriptError> {
    check_sec_len(sec)?;
    let mut b = Vec::with_capacity(sec.len() + 2);
    b.push(sec.len() as u8);
    b.extend_from_slice(sec);
    b.push(OP_CHECKSIG);
    Ok(Script::from(b))
}

/// `OP_HASH160 <hash160> OP_EQUAL`
pub fn script_for_p2sh(hash160: &[u8; 20]) -> Script {
    let mut b = Vec::with_capacity(P2SH_LEN);
    b.extend_from_slice(&[OP_HASH160, OP_DATA_20]);
    b.extend_from_slice(hash160);
    b.push(OP_EQUAL);
    Script::from(b)
}

/// `OP_m <sec>... OP_n OP_CHECKMULTISIG`
///
/// # Arguments
/// * `threshold` - Signatures required, `1 <= m <= n`.
/// * `public_keys` - Between 1 and 16 SEC keys, in signing order.
///
/// # Returns
/// The script, or `InvalidTemplate` when the counts or key lengths are out
/// of range.
pub fn script_for_multisig<K: AsRef<[u8]>>(
    threshold: u8,
    public_keys: &[K],
) -> Result<Script, ScriptError> {
    let n = public_keys.len();
    if n == 0 || n > MAX_MULTISIG_KEYS {
        return Err(ScriptError::InvalidTemplate(format!(
            "multisig needs 1 to {} keys, got {}",
            MAX_MULTISIG_KEYS, n
        )));
    }
    if threshold == 0 || threshold as usize > n {
        return Err(ScriptError::InvalidTemplate(format!(
            "threshold {} out of range for {} keys",
            threshold, n
        )));
    }
    let m_op = small_int_op(threshold).ok_or_else(|| {
        ScriptError::InvalidTemplate(format!("threshold {} has no small-int opcode", threshold))
    })?;
    let n_op = small_int_op(n as u8).ok_or_else(|| {
        ScriptError::InvalidTemplate(format!("key count {} has no small-int opcode", n))
    })?;

    let mut script = Script::from(vec![m_op]);
    for key in public_keys {
        check_sec_len(key.as_ref())?;
        script.append_push_data(key.as_ref())?;
    }
    script.append_opcodes(&[n_op, OP_CHECKMULTISIG])?;
    Ok(script)
}

/// `OP_RETURN <payload>`, or a bare `OP_RETURN` for an empty payload.
pub fn script_for_nulldata(payload: &[u8]) -> Result<Script, ScriptError> {
    let mut script = Script::from(vec![OP_RETURN]);
    if !payload.is_empty() {
        script.append_push_data(payload)?;
    }
    Ok(script)
}

fn check_sec_len(sec: &[u8]) -> Result<(), ScriptError> {
    if sec.len() == SEC_COMPRESSED_LEN || sec.len() == SEC_UNCOMPRESSED_LEN {
        Ok(())
    } else {
        Err(ScriptError::InvalidTemplate(format!(
            "SEC public key must be {} or {} bytes, got {}",
            SEC_COMPRESSED_LEN,
            SEC_UNCOMPRESSED_LEN,
            sec.len()
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(tag: u8, len: usize) -> Vec<u8> {
        let mut k = vec![tag; len];
        k[0] = if len == 33 { 0x02 } else { 0x04 };
        k
    }

    // -----------------------------------------------------------------------
    // Individual templates
    // -----------------------------------------------------------------------

    /// A mainnet P2PKH output yields its hash.
    #[test]
    fn test_classify_p2pkh() {
        let script = Script::from_hex("76a91403ececf2d12a7f614aef4c82ecf13c303bd9975d88ac").unwrap();
        let st = classify(script.to_bytes());
        assert_eq!(st.name(), "p2pkh");
        assert_eq!(
            hex::encode(st.hash160().unwrap()),
            "03ececf2d12a7f614aef4c82ecf13c303bd9975d"
        );
    }

    /// P2PK matches on length only: both key sizes, no point validation.
    #[test]
    fn test_classify_p2pk() {
        for len in [33, 65] {
            let sec = key(0x11, len);
            let st = classify(script_for_p2pk(&sec).unwrap().to_bytes());
            assert_eq!(st, ScriptType::PayToPublicKey(sec));
        }
        // 34-byte push is not a key.
        let mut odd = vec![0x22];
        odd.extend_from_slice(&[0x02; 34]);
        odd.push(OP_CHECKSIG);
        assert_eq!(classify(&odd).name(), "unknown");
    }

    /// P2SH yields the script hash.
    #[test]
    fn test_classify_p2sh() {
        let st = classify(script_for_p2sh(&[0x42; 20]).to_bytes());
        assert_eq!(st.script_hash(), Some(&[0x42; 20]));
        assert_eq!(st.hash160(), None);
    }

    /// m-of-n multisig with mixed key sizes.
    #[test]
    fn test_classify_multisig() {
        let keys = vec![key(1, 33), key(2, 65), key(3, 33)];
        let script = script_for_multisig(2, &keys).unwrap();
        assert_eq!(script.to_bytes()[0], 0x52);
        let st = classify(script.to_bytes());
        let (m, parsed) = st.multisig().unwrap();
        assert_eq!(m, 2);
        assert_eq!(parsed, &keys[..]);
    }

    /// Multisig shapes that break the m/n/key rules are unknown.
    #[test]
    fn test_classify_multisig_rejects() {
        let k = key(1, 33);
        let k = k.as_slice();
        let short = [0u8; 20];
        let build = |m: u8, keys: &[&[u8]], n: u8| {
            let mut s = Script::from(vec![m]);
            for key in keys {
                s.append_push_data(key).unwrap();
            }
            s.append_opcodes(&[n, OP_CHECKMULTISIG]).unwrap();
            s
        };
        // n disagrees with the key count
        assert_eq!(build(0x51, &[k, k], 0x53).classify().name(), "unknown");
        // m > n
        assert_eq!(build(0x53, &[k, k], 0x52).classify().name(), "unknown");
        // m = 0
        assert_eq!(build(OP_0, &[k], 0x51).classify().name(), "unknown");
        // 20-byte "key"
        assert_eq!(build(0x51, &[&short[..]], 0x51).classify().name(), "unknown");
        // well formed control
        assert_eq!(build(0x51, &[k], 0x51).classify().name(), "multisig");
    }

    // -----------------------------------------------------------------------
    // Null data
    // -----------------------------------------------------------------------

    /// A single push after OP_RETURN is the payload.
    #[test]
    fn test_classify_nulldata_single_push() {
        let script = script_for_nulldata(b"foobar").unwrap();
        assert_eq!(script.to_hex(), "6a06666f6f626172");
        assert_eq!(classify(script.to_bytes()), ScriptType::NullData(b"foobar".to_vec()));
    }

    /// Multiple pushes concatenate; OP_0 contributes nothing.
    #[test]
    fn test_classify_nulldata_multi_push() {
        let bytes = [OP_RETURN, 0x02, b'a', b'b', OP_0, OP_PUSHDATA1, 0x01, b'c'];
        assert_eq!(classify(&bytes).null_data(), Some(&b"abc"[..]));
    }

    /// A tail with opcodes or a truncated push is kept raw.
    #[test]
    fn test_classify_nulldata_raw_tail() {
        assert_eq!(classify(&[OP_RETURN, OP_DUP, 0x01]).null_data(), Some(&[OP_DUP, 0x01][..]));
        assert_eq!(classify(&[OP_RETURN, 0x05, 0x01]).null_data(), Some(&[0x05, 0x01][..]));
        assert_eq!(classify(&[OP_RETURN]).null_data(), Some(&[][..]));
    }

    // -----------------------------------------------------------------------
    // Unknown
    // -----------------------------------------------------------------------

    /// Non-standard and empty scripts are unknown and keep their bytes.
    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify(b"Q"), ScriptType::Unknown(b"Q".to_vec()));
        assert_eq!(classify(&[]), ScriptType::Unknown(vec![]));
        // truncated push ending in OP_CHECKMULTISIG
        assert_eq!(classify(&[0x51, 0x21, 0x02, OP_CHECKMULTISIG]).name(), "unknown");
        // P2PKH with a wrong trailing opcode
        let mut almost = script_for_p2pkh(&[0u8; 20]).into_bytes();
        almost[24] = OP_CHECKMULTISIG;
        assert_eq!(classify(&almost).name(), "unknown");
    }

    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Builders reject out-of-range arguments.
    #[test]
    fn test_builder_validation() {
        assert!(script_for_p2pk(&[0x02; 20]).is_err());
        assert!(script_for_multisig::<Vec<u8>>(1, &[]).is_err());
        assert!(script_for_multisig(3, &[key(1, 33), key(2, 33)]).is_err());
        assert!(script_for_multisig(0, &[key(1, 33)]).is_err());
        assert!(script_for_multisig(1, vec![key(1, 33); 17].as_slice()).is_err());
        assert!(script_for_multisig(1, &[vec![0u8; 32]]).is_err());
        assert_eq!(script_for_nulldata(b"").unwrap().to_bytes(), &[OP_RETURN]);
    }

    /// to_script rebuilds the bytes of every standard template.
    #[test]
    fn test_to_script_rebuilds() {
        let scripts = vec![
            script_for_p2pkh(&[7; 20]),
            script_for_p2pk(&key(9, 65)).unwrap(),
            script_for_p2sh(&[8; 20]),
            script_for_multisig(1, &[key(1, 33), key(2, 33)]).unwrap(),
            script_for_nulldata(b"hello").unwrap(),
            Script::from_bytes(b"Q"),
        ];
        for script in scripts {
            assert_eq!(classify(script.to_bytes()).to_script().unwrap(), script);
        }
    }
}
