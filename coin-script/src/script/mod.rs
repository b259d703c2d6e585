pub mod asm;
pub mod num;
pub mod opcodes;
pub mod pattern;
pub mod reader;
pub mod sigops;
pub mod solver;

use std::fmt;

use bytes::Bytes;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::{
    config::Policy,
    quicksend::{self, Flag},
};
use pattern::ScriptPattern;
use reader::ScriptReader;
use solver::Solution;

/// The error type associated with parsing a `Script` from hex.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("invalid script hex; {0}")]
pub struct ScriptHexError(#[from] hex::FromHexError);

/// Represents a script.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Script(Bytes);

impl Into<Bytes> for Script {
    fn into(self) -> Bytes {
        self.0
    }
}

impl From<Bytes> for Script {
    fn from(raw: Bytes) -> Self {
        Script(raw)
    }
}

impl From<Vec<u8>> for Script {
    fn from(raw: Vec<u8>) -> Self {
        Script(raw.into())
    }
}

impl From<&[u8]> for Script {
    fn from(raw: &[u8]) -> Self {
        Script(Bytes::copy_from_slice(raw))
    }
}

impl AsRef<[u8]> for Script {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Script {
    pub fn from_hex(hex_str: &str) -> Result<Self, ScriptHexError> {
        Ok(hex::decode(hex_str)?.into())
    }

    pub fn into_bytes(self) -> Bytes {
        self.into()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_op_return(&self) -> bool {
        !self.0.is_empty() && self.0[0] == opcodes::OP_RETURN.to_u8()
    }

    /// Iterate over the tokens of the script.
    pub fn instructions(&self) -> ScriptReader<'_> {
        ScriptReader::new(&self.0)
    }

    pub fn is_pay_to_script_hash(&self) -> bool {
        pattern::is_pay_to_script_hash(&self.0)
    }

    pub fn is_normal_payment(&self) -> bool {
        pattern::is_normal_payment(&self.0)
    }

    pub fn is_zerocoin_mint(&self) -> bool {
        pattern::is_zerocoin_mint(&self.0)
    }

    pub fn is_zerocoin_spend(&self) -> bool {
        pattern::is_zerocoin_spend(&self.0)
    }

    pub fn is_push_only(&self) -> bool {
        pattern::is_push_only(&self.0)
    }

    pub fn is_push_only_from(&self, offset: usize) -> bool {
        pattern::is_push_only_from(&self.0, offset)
    }

    pub fn classify(&self) -> ScriptPattern {
        pattern::classify(&self.0)
    }

    pub fn classify_with(&self, policy: &Policy) -> ScriptPattern {
        pattern::classify_with(&self.0, policy)
    }

    pub fn solve(&self) -> Solution {
        solver::solve(&self.0)
    }

    pub fn sig_op_count(&self, accurate: bool) -> u32 {
        sigops::count(&self.0, accurate)
    }

    /// Sig-op count of this output when spent by `script_sig`.
    pub fn sig_op_count_with_script_sig(&self, script_sig: &Script) -> u32 {
        sigops::count_with_script_sig(&self.0, &script_sig.0)
    }

    pub fn to_asm(&self) -> String {
        asm::disassemble(&self.0)
    }

    pub fn flagged(&self) -> Option<Flag> {
        quicksend::detect(&self.0)
    }

    pub fn flagged_with(&self, policy: &Policy) -> Option<Flag> {
        quicksend::detect_with(&self.0, quicksend::table(), policy)
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_asm())
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({})", self.to_hex())
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex_str = String::deserialize(deserializer)?;
        Script::from_hex(&hex_str).map_err(de::Error::custom)
    }
}
