//! Process-wide relay policy and its configuration.
//!
//! The policy is fixed the first time it is read or initialized. Callers that need a
//! different policy per call use the `*_with` variants of the classifiers.

use std::{fs, path::Path, path::PathBuf};

use log::{debug, warn};
use once_cell::sync::OnceCell;
use serde::Deserialize;
use thiserror::Error;

use crate::quicksend::{self, PrefixTable, TableError};

const LOG_TARGET: &str = "coin_script::config";

/// The error type associated with loading or installing a `Config`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("prefix table; {0}")]
    Table(#[from] TableError),
    #[error("configuration already initialized")]
    AlreadyInitialized,
}

/// Relay policy consulted by the classifiers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Policy {
    /// Treat bare multisig outputs as standard, in which case they are not flagged.
    pub bare_multisig_is_standard: bool,
}

/// Deserializable configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bare_multisig_is_standard: bool,
    /// Replace the embedded prefix table with the one in this file.
    pub quicksend_table: Option<PathBuf>,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn policy(&self) -> Policy {
        Policy {
            bare_multisig_is_standard: self.bare_multisig_is_standard,
        }
    }
}

static POLICY: OnceCell<Policy> = OnceCell::new();

/// Install `config` for the whole process.
///
/// Must happen before the first classification. The prefix table file, if any, is loaded
/// before anything is installed, and nothing is installed if the process-wide table is
/// already in use.
pub fn init(config: &Config) -> Result<(), ConfigError> {
    let table = match &config.quicksend_table {
        Some(path) => Some(PrefixTable::from_file(path)?),
        None => None,
    };
    if table.is_some() && quicksend::is_installed() {
        warn!(target: LOG_TARGET, "prefix table already in use, ignoring {:?}", config);
        return Err(ConfigError::AlreadyInitialized);
    }
    if POLICY.set(config.policy()).is_err() {
        warn!(target: LOG_TARGET, "policy already in use, ignoring {:?}", config);
        return Err(ConfigError::AlreadyInitialized);
    }
    if let Some(table) = table {
        quicksend::install(table)?;
    }
    debug!(target: LOG_TARGET, "initialized {:?}", config);
    Ok(())
}

/// The process-wide policy. Reading it before [`init`] fixes the default.
pub fn policy() -> Policy {
    *POLICY.get_or_init(Policy::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.policy().bare_multisig_is_standard);
    }

    #[test]
    fn parses_fields() {
        let config = Config::from_json(
            r#"{ "bare_multisig_is_standard": true, "quicksend_table": "/etc/quicksend.json" }"#,
        )
        .unwrap();
        assert!(config.policy().bare_multisig_is_standard);
        assert_eq!(config.quicksend_table, Some(PathBuf::from("/etc/quicksend.json")));
    }

    #[test]
    fn rejects_unknown_fields() {
        assert!(matches!(
            Config::from_json(r#"{ "bare_multisig": true }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn missing_table_file() {
        let config = Config {
            bare_multisig_is_standard: false,
            quicksend_table: Some(PathBuf::from("/nonexistent/quicksend.json")),
        };
        assert!(matches!(
            init(&config),
            Err(ConfigError::Table(TableError::Io(_)))
        ));
    }
}
