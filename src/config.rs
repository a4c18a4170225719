//! Runtime configuration.
//!
//! `ExtractorConfig` is filled from command-line arguments by the
//! `extract_arcana` binary. `ServerConfig` comes from environment variables
//! (set via systemd or the shell) for the `api_server` binary.

use std::path::PathBuf;

#[cfg(feature = "api")]
use crate::error::ConfigError;

pub const DEFAULT_INPUT: &str = "arakan.txt";
pub const DEFAULT_OUTPUT: &str = "src/arcana_data.js";
pub const DEFAULT_VARIABLE_NAME: &str = "arcanaDescriptionsData";

/// Paths and naming for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Name of the JS variable the mapping is assigned to
    pub variable_name: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            variable_name: DEFAULT_VARIABLE_NAME.to_string(),
        }
    }
}

#[cfg(feature = "api")]
pub const DEFAULT_PORT: u16 = 5000;
#[cfg(feature = "api")]
pub const DEFAULT_GATEWAY_URL: &str = "https://api.yookassa.ru/v3/payments";
#[cfg(feature = "api")]
pub const DEFAULT_LEDGER_PATH: &str = "payments.jsonl";

/// Payment relay settings.
#[cfg(feature = "api")]
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub shop_id: String,
    pub secret_key: String,
    pub gateway_url: String,
    pub ledger_path: PathBuf,
}

#[cfg(feature = "api")]
impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("port", &self.port)
            .field("shop_id", &self.shop_id)
            .field("secret_key", &"<redacted>")
            .field("gateway_url", &self.gateway_url)
            .field("ledger_path", &self.ledger_path)
            .finish()
    }
}

#[cfg(feature = "api")]
impl ServerConfig {
    /// Read configuration from the process environment.
    ///
    /// - `PORT` (default 5000)
    /// - `YOOKASSA_SHOP_ID`, `YOOKASSA_SECRET_KEY` (required)
    /// - `YOOKASSA_API_URL` (default: production payments endpoint)
    /// - `PAYMENT_LEDGER_PATH` (default `payments.jsonl`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match non_empty("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidVar { name: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let shop_id = non_empty("YOOKASSA_SHOP_ID").ok_or(ConfigError::MissingVar("YOOKASSA_SHOP_ID"))?;
        let secret_key =
            non_empty("YOOKASSA_SECRET_KEY").ok_or(ConfigError::MissingVar("YOOKASSA_SECRET_KEY"))?;

        let gateway_url = non_empty("YOOKASSA_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());

        let ledger_path = non_empty("PAYMENT_LEDGER_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER_PATH));

        Ok(Self { port, shop_id, secret_key, gateway_url, ledger_path })
    }
}
