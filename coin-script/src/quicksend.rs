//! Detection of outputs paying to watched public key hash prefixes.
//!
//! The watchlist is a table of inclusive big-endian `u32` ranges over the first four bytes
//! of the pushed hash. Lookups return the first entry that contains the prefix, so table
//! order decides which label is reported for overlapping ranges.

use std::{fmt, fs, path::Path};

use log::debug;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    config::{self, Policy},
    script::{
        opcodes,
        solver::{self, OutputKind},
    },
};

const LOG_TARGET: &str = "coin_script::quicksend";

const EMBEDDED_TABLE: &str = include_str!("../data/quicksend.json");

/// Label reported for bare multisig outputs.
pub const BARE_MULTISIG_LABEL: &str = "bare multisig";

/// Offset of the hash prefix within a pay-to-pubkey-hash script.
const PREFIX_OFFSET: usize = 3;

/// The error type associated with loading a prefix table.
#[derive(Debug, Error)]
pub enum TableError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("entry {index}; {field} is not hex; {source}")]
    Hex {
        index: usize,
        field: &'static str,
        source: hex::FromHexError,
    },
    #[error("entry {index}; {field} must be 4 bytes, found {len}")]
    Width {
        index: usize,
        field: &'static str,
        len: usize,
    },
    #[error("entry {index}; start {start:08x} is after end {end:08x}")]
    Inverted { index: usize, start: u32, end: u32 },
    #[error("prefix table already installed")]
    AlreadyInstalled,
}

#[derive(Deserialize)]
struct RawEntry {
    start: String,
    end: String,
    label: String,
}

/// An inclusive range of watched prefixes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixEntry {
    pub start: u32,
    pub end: u32,
    pub label: String,
}

impl PrefixEntry {
    pub fn contains(&self, prefix: u32) -> bool {
        self.start <= prefix && prefix <= self.end
    }
}

/// An ordered watchlist of prefix ranges.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixTable {
    entries: Vec<PrefixEntry>,
}

fn parse_prefix(index: usize, field: &'static str, value: &str) -> Result<u32, TableError> {
    let raw = hex::decode(value).map_err(|source| TableError::Hex {
        index,
        field,
        source,
    })?;
    match raw.as_slice() {
        [a, b, c, d] => Ok(u32::from_be_bytes([*a, *b, *c, *d])),
        _ => Err(TableError::Width {
            index,
            field,
            len: raw.len(),
        }),
    }
}

impl PrefixTable {
    /// Construct a table, rejecting entries whose start is after their end.
    pub fn new(entries: Vec<PrefixEntry>) -> Result<Self, TableError> {
        for (index, entry) in entries.iter().enumerate() {
            if entry.start > entry.end {
                return Err(TableError::Inverted {
                    index,
                    start: entry.start,
                    end: entry.end,
                });
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of `{ "start", "end", "label" }` objects with hex bounds.
    pub fn from_json(json: &str) -> Result<Self, TableError> {
        let raw: Vec<RawEntry> = serde_json::from_str(json)?;
        let entries = raw
            .into_iter()
            .enumerate()
            .map(|(index, raw)| {
                Ok(PrefixEntry {
                    start: parse_prefix(index, "start", &raw.start)?,
                    end: parse_prefix(index, "end", &raw.end)?,
                    label: raw.label,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;
        Self::new(entries)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TableError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The table shipped with the crate.
    pub fn embedded() -> Self {
        // This is safe
        Self::from_json(EMBEDDED_TABLE).expect("embedded prefix table is well formed")
    }

    pub fn entries(&self) -> &[PrefixEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry containing `prefix`, in table order.
    pub fn lookup(&self, prefix: u32) -> Option<&PrefixEntry> {
        self.entries.iter().find(|entry| entry.contains(prefix))
    }
}

static TABLE: OnceCell<PrefixTable> = OnceCell::new();

/// The process-wide table, the embedded one unless another was installed first.
pub fn table() -> &'static PrefixTable {
    TABLE.get_or_init(|| {
        let table = PrefixTable::embedded();
        debug!(target: LOG_TARGET, "loaded {} embedded prefix entries", table.len());
        table
    })
}

/// Whether the process-wide table has been used or installed.
pub fn is_installed() -> bool {
    TABLE.get().is_some()
}

/// Replace the process-wide table. Fails once the table has been used or installed.
pub fn install(table: PrefixTable) -> Result<(), TableError> {
    let len = table.len();
    TABLE.set(table).map_err(|_| TableError::AlreadyInstalled)?;
    debug!(target: LOG_TARGET, "installed {} prefix entries", len);
    Ok(())
}

/// Why a script was flagged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flag<'a> {
    /// The pushed hash starts with a watched prefix.
    Quicksend(&'a str),
    /// A bare multisig output while bare multisig is not standard.
    BareMultisig,
}

impl<'a> Flag<'a> {
    pub fn label(&self) -> &'a str {
        match *self {
            Flag::Quicksend(label) => label,
            Flag::BareMultisig => BARE_MULTISIG_LABEL,
        }
    }
}

impl<'a> fmt::Display for Flag<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The big-endian prefix read at the hash position of an `OP_DUP` script.
///
/// Only the length and the first byte are checked; the rest of the pay-to-pubkey-hash
/// structure is not.
pub fn hash_prefix(script: &[u8]) -> Option<u32> {
    if script.len() < PREFIX_OFFSET + 4 || script[0] != opcodes::OP_DUP.to_u8() {
        return None;
    }
    let b = &script[PREFIX_OFFSET..PREFIX_OFFSET + 4];
    Some(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
}

/// Check `script` against `table`.
///
/// `OP_DUP` scripts are looked up by hash prefix only. Any other script is flagged as bare
/// multisig when `policy` does not treat bare multisig as standard.
pub fn detect_with<'a>(script: &[u8], table: &'a PrefixTable, policy: &Policy) -> Option<Flag<'a>> {
    let flag = if let Some(prefix) = hash_prefix(script) {
        Flag::Quicksend(&table.lookup(prefix)?.label)
    } else if !policy.bare_multisig_is_standard
        && solver::solve(script).kind == OutputKind::Multisig
    {
        Flag::BareMultisig
    } else {
        return None;
    };
    debug!(target: LOG_TARGET, "flagged script; {}", flag);
    Some(flag)
}

/// [`detect_with`] against the process-wide table and policy.
pub fn detect(script: &[u8]) -> Option<Flag<'static>> {
    detect_with(script, table(), &config::policy())
}
