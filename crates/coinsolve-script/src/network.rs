//! Per-network constants: Base58Check version bytes, WIF prefix, curve
//! generator and default sighash type.
//!
//! There is no process-wide network. Callers build a `NetworkRegistry`,
//! look up the `NetworkParams` they need and pass them by reference.

use std::collections::BTreeMap;

use coinsolve_primitives::ec::Generator;
use serde::{Deserialize, Serialize};

use crate::ScriptError;

/// Sighash type signing everything; used by networks without replay
/// protection.
const SIGHASH_ALL: u32 = 0x01;

/// `SIGHASH_ALL | SIGHASH_FORKID`, the default on forks that commit to the
/// spent amount.
const SIGHASH_ALL_FORKID: u32 = 0x41;

/// Constants that make addresses and keys specific to one network.
///
/// Constructed through `NetworkParams::new` or deserialization, both of
/// which reject `address_version == p2sh_version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawNetworkParams")]
pub struct NetworkParams {
    code: String,
    name: String,
    address_version: u8,
    p2sh_version: u8,
    wif_prefix: u8,
    #[serde(default)]
    generator: Generator,
    sighash_type: u32,
}

/// Unchecked serde mirror of `NetworkParams`.
#[derive(Deserialize)]
struct RawNetworkParams {
    code: String,
    name: String,
    address_version: u8,
    p2sh_version: u8,
    wif_prefix: u8,
    #[serde(default)]
    generator: Generator,
    #[serde(default = "default_sighash_type")]
    sighash_type: u32,
}

fn default_sighash_type() -> u32 {
    SIGHASH_ALL
}

impl TryFrom<RawNetworkParams> for NetworkParams {
    type Error = ScriptError;

    fn try_from(raw: RawNetworkParams) -> Result<Self, Self::Error> {
        NetworkParams::new(
            &raw.code,
            &raw.name,
            raw.address_version,
            raw.p2sh_version,
            raw.wif_prefix,
            raw.generator,
            raw.sighash_type,
        )
    }
}

impl NetworkParams {
    /// Build and validate a parameter set.
    ///
    /// # Arguments
    /// * `code` - Short ticker-style code, stored uppercase ("BTC").
    /// * `name` - Display name.
    /// * `address_version` - Base58Check version of P2PKH addresses.
    /// * `p2sh_version` - Base58Check version of P2SH addresses.
    /// * `wif_prefix` - Version byte of WIF private keys.
    /// * `generator` - Curve the network signs on.
    /// * `sighash_type` - Default sighash type for signing.
    ///
    /// # Returns
    /// The parameters, or `InvalidNetwork` for an empty code or identical
    /// P2PKH and P2SH versions.
    pub fn new(
        code: &str,
        name: &str,
        address_version: u8,
        p2sh_version: u8,
        wif_prefix: u8,
        generator: Generator,
        sighash_type: u32,
    ) -> Result<Self, ScriptError> {
        let code = code.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ScriptError::InvalidNetwork {
                code,
                reason: "empty network code".to_string(),
            });
        }
        if address_version == p2sh_version {
            return Err(ScriptError::InvalidNetwork {
                code,
                reason: format!(
                    "address and p2sh versions are both {:#04x}",
                    address_version
                ),
            });
        }
        Ok(NetworkParams {
            code,
            name: name.to_string(),
            address_version,
            p2sh_version,
            wif_prefix,
            generator,
            sighash_type,
        })
    }

    /// Uppercase network code, e.g. "BTC".
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version byte of pay-to-public-key-hash addresses.
    pub fn address_version(&self) -> u8 {
        self.address_version
    }

    /// Version byte of pay-to-script-hash addresses.
    pub fn p2sh_version(&self) -> u8 {
        self.p2sh_version
    }

    /// Version byte of WIF private keys.
    pub fn wif_prefix(&self) -> u8 {
        self.wif_prefix
    }

    /// Curve generator keys are derived under.
    pub fn generator(&self) -> Generator {
        self.generator
    }

    /// Sighash type used when the caller does not pick one.
    pub fn sighash_type(&self) -> u32 {
        self.sighash_type
    }
}

/// A set of networks keyed by code.
#[derive(Debug, Clone, Default)]
pub struct NetworkRegistry {
    networks: BTreeMap<String, NetworkParams>,
}

impl NetworkRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with BTC, XTN, LTC, XLT, BCH, BSV and DOGE.
    pub fn builtin() -> Self {
        let table: [(&str, &str, u8, u8, u8, u32); 7] = [
            ("BTC", "Bitcoin", 0x00, 0x05, 0x80, SIGHASH_ALL),
            ("XTN", "Bitcoin Testnet", 0x6f, 0xc4, 0xef, SIGHASH_ALL),
            ("LTC", "Litecoin", 0x30, 0x32, 0xb0, SIGHASH_ALL),
            ("XLT", "Litecoin Testnet", 0x6f, 0x3a, 0xef, SIGHASH_ALL),
            ("BCH", "Bitcoin Cash", 0x00, 0x05, 0x80, SIGHASH_ALL_FORKID),
            ("BSV", "Bitcoin SV", 0x00, 0x05, 0x80, SIGHASH_ALL_FORKID),
            ("DOGE", "Dogecoin", 0x1e, 0x16, 0x9e, SIGHASH_ALL),
        ];
        let networks = table
            .into_iter()
            .map(|(code, name, addr, p2sh, wif, sighash)| {
                let params = NetworkParams {
                    code: code.to_string(),
                    name: name.to_string(),
                    address_version: addr,
                    p2sh_version: p2sh,
                    wif_prefix: wif,
                    generator: Generator::Secp256k1,
                    sighash_type: sighash,
                };
                (code.to_string(), params)
            })
            .collect();
        NetworkRegistry { networks }
    }

    /// Registry containing only the networks in a JSON array.
    ///
    /// # Arguments
    /// * `json` - `[{"code": ..., "name": ..., "address_version": ..., ...}]`.
    ///
    /// # Returns
    /// The registry, or `Json` / `InvalidNetwork` for bad entries.
    pub fn from_json(json: &str) -> Result<Self, ScriptError> {
        let mut registry = Self::new();
        registry.extend_from_json(json)?;
        Ok(registry)
    }

    /// Add or replace networks from a JSON array.
    pub fn extend_from_json(&mut self, json: &str) -> Result<(), ScriptError> {
        let entries: Vec<NetworkParams> = serde_json::from_str(json)?;
        for params in entries {
            self.register(params);
        }
        Ok(())
    }

    /// Add a network, returning the one it replaced.
    pub fn register(&mut self, params: NetworkParams) -> Option<NetworkParams> {
        log::debug!("registering network {}", params.code);
        self.networks.insert(params.code.clone(), params)
    }

    /// Look up a network by code, case-insensitively.
    pub fn get(&self, code: &str) -> Option<&NetworkParams> {
        self.networks.get(&code.trim().to_ascii_uppercase())
    }

    /// Like `get`, but a miss is an `UnknownNetwork` error.
    pub fn require(&self, code: &str) -> Result<&NetworkParams, ScriptError> {
        self.get(code)
            .ok_or_else(|| ScriptError::UnknownNetwork(code.to_string()))
    }

    /// Registered codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.networks.keys().map(String::as_str)
    }

    /// Number of registered networks.
    pub fn len(&self) -> usize {
        self.networks.len()
    }

    /// Whether no network is registered.
    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}
