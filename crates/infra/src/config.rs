//! Ledger configuration: table layout, entry model, and engine behaviour.
//!
//! Configuration is an explicit value handed to constructors; nothing reads
//! process-global state after wiring.

use serde::Deserialize;
use thiserror::Error;

use stockledger_core::LedgerError;
use stockledger_inventory::{LEDGER_ENTRY_MODEL, ensure_entry_model};

const ENV_PREFIX: &str = "STOCKLEDGER_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },

    #[error("{key} must be a plain SQL identifier, got `{value}`")]
    InvalidIdentifier { key: &'static str, value: String },

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LedgerConfig {
    /// Table holding ledger entries.
    pub table_name: String,
    /// Column holding the owner type tag.
    pub owner_type_column: String,
    /// Column joining entries to their owner's key.
    pub owner_key_column: String,
    /// Entry model the ledger is wired with; must conform to the entry shape.
    pub entry_model: String,
    /// Serialize read/compute/write per owner inside this process.
    ///
    /// Off by default: without it concurrent writers on one owner can lose
    /// updates, exactly like a bare read-modify-write.
    pub serialize_per_owner: bool,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            table_name: "inventories".to_string(),
            owner_type_column: "inventoriable_type".to_string(),
            owner_key_column: "inventoriable_id".to_string(),
            entry_model: LEDGER_ENTRY_MODEL.to_string(),
            serialize_per_owner: false,
            database_url: None,
            max_connections: 5,
        }
    }
}

impl LedgerConfig {
    /// Load from `STOCKLEDGER_*` environment variables over the defaults.
    ///
    /// `DATABASE_URL` is honoured when `STOCKLEDGER_DATABASE_URL` is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup (testable `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let mut config = Self::default();

        if let Some(v) = var("TABLE") {
            config.table_name = v;
        }
        if let Some(v) = var("OWNER_TYPE_COLUMN") {
            config.owner_type_column = v;
        }
        if let Some(v) = var("OWNER_KEY_COLUMN") {
            config.owner_key_column = v;
        }
        if let Some(v) = var("ENTRY_MODEL") {
            config.entry_model = v;
        }
        if let Some(v) = var("SERIALIZE_PER_OWNER") {
            config.serialize_per_owner = parse_bool("STOCKLEDGER_SERIALIZE_PER_OWNER", &v)?;
        }
        if let Some(v) = var("MAX_CONNECTIONS") {
            config.max_connections = v.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "STOCKLEDGER_MAX_CONNECTIONS",
                value: v.clone(),
            })?;
        }
        config.database_url = var("DATABASE_URL").or_else(|| lookup("DATABASE_URL"));

        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document (missing keys take defaults) and validate it.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Wiring-time checks.
    ///
    /// Fails with [`LedgerError::InvalidLedgerModel`] when the entry model does not
    /// conform, and rejects table/column names that are not plain identifiers
    /// (they are interpolated into SQL).
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_entry_model(&self.entry_model)?;
        ensure_identifier("table_name", &self.table_name)?;
        ensure_identifier("owner_type_column", &self.owner_type_column)?;
        ensure_identifier("owner_key_column", &self.owner_key_column)?;

        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_connections",
                value: "0".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_bool(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: raw.to_string(),
        }),
    }
}

fn ensure_identifier(key: &'static str, value: &str) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid_start && valid_rest && value.len() <= 63 {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            key,
            value: value.to_string(),
        })
    }
}
