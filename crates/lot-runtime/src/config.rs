//! # Runtime Configuration
//!
//! Layered configuration: built-in defaults, then an optional TOML file, then
//! `LOT_*` environment variables.
//!
//! # Config File Format
//!
//! ```toml
//! network = "testnet"
//! rpc_url = "https://rpc.testnet.near.org"
//! contract_id = "linkoftrust.testnet"
//! preferences_path = "lot-preferences.json"
//!
//! [graph]
//! depth = 2
//! cache_capacity = 1024
//!
//! [decoder]
//! reject_trailing_bytes = false
//! ```

use lot_01_contract_state::{ContractStateConfig, TrailingBytesPolicy};
use lot_02_trust_graph::TrustGraphConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

/// Default contract account.
pub const DEFAULT_CONTRACT_ID: &str = "linkoftrust.testnet";

/// Default preference file.
pub const DEFAULT_PREFERENCES_PATH: &str = "lot-preferences.json";

/// NEAR network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Test network.
    #[default]
    Testnet,
    /// Main network.
    Mainnet,
}

impl Network {
    /// Public RPC endpoint of this network.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Testnet => "https://rpc.testnet.near.org",
            Self::Mainnet => "https://rpc.mainnet.near.org",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Testnet => write!(f, "testnet"),
            Self::Mainnet => write!(f, "mainnet"),
        }
    }
}

impl FromStr for Network {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "testnet" => Ok(Self::Testnet),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(ConfigError::Invalid {
                key: "network".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },

    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A value is out of range or unrecognized.
    #[error("Invalid value for {key}: {value:?}")]
    Invalid {
        /// Setting name.
        key: String,
        /// Rejected value.
        value: String,
    },
}

/// Configuration file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    network: Option<Network>,
    rpc_url: Option<String>,
    contract_id: Option<String>,
    preferences_path: Option<PathBuf>,
    #[serde(default)]
    graph: GraphSection,
    #[serde(default)]
    decoder: DecoderSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphSection {
    depth: Option<i32>,
    cache_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DecoderSection {
    reject_trailing_bytes: Option<bool>,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    /// NEAR network.
    pub network: Network,
    /// RPC endpoint override. `None` uses the network's public endpoint.
    pub rpc_url: Option<String>,
    /// Contract account id.
    pub contract_id: String,
    /// File holding aliases and layout positions.
    pub preferences_path: PathBuf,
    /// Trust graph settings.
    pub graph: TrustGraphConfig,
    /// Storage decoder settings.
    pub decoder: ContractStateConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            network: Network::default(),
            rpc_url: None,
            contract_id: DEFAULT_CONTRACT_ID.to_string(),
            preferences_path: PathBuf::from(DEFAULT_PREFERENCES_PATH),
            graph: TrustGraphConfig::default(),
            decoder: ContractStateConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string. Missing keys take defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = Self::default();
        let mut config = Self {
            network: file.network.unwrap_or(defaults.network),
            rpc_url: file.rpc_url,
            contract_id: file.contract_id.unwrap_or(defaults.contract_id),
            preferences_path: file.preferences_path.unwrap_or(defaults.preferences_path),
            graph: TrustGraphConfig {
                default_depth: file.graph.depth.unwrap_or(defaults.graph.default_depth),
                repository_capacity: file
                    .graph
                    .cache_capacity
                    .unwrap_or(defaults.graph.repository_capacity),
            },
            decoder: defaults.decoder,
        };

        if file.decoder.reject_trailing_bytes == Some(true) {
            config.decoder.trailing_bytes = TrailingBytesPolicy::Reject;
        }

        Ok(config)
    }

    /// Apply `LOT_NETWORK`, `LOT_RPC_URL`, `LOT_CONTRACT_ID`, `LOT_DEPTH`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("LOT_NETWORK") {
            match value.parse() {
                Ok(network) => self.network = network,
                Err(e) => warn!("[lot-rt] Ignoring LOT_NETWORK: {}", e),
            }
        }
        if let Some(url) = lookup("LOT_RPC_URL") {
            self.rpc_url = Some(url);
        }
        if let Some(contract_id) = lookup("LOT_CONTRACT_ID") {
            self.contract_id = contract_id;
        }
        if let Some(value) = lookup("LOT_DEPTH") {
            match value.parse() {
                Ok(depth) => self.graph.default_depth = depth,
                Err(_) => warn!("[lot-rt] Ignoring LOT_DEPTH: {:?} is not an integer", value),
            }
        }
    }

    /// Effective RPC endpoint.
    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.network.default_rpc_url())
    }
}

/// Load configuration from an optional file and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<RuntimeConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let config = RuntimeConfig::from_file(path)?;
            info!("[lot-rt] Loaded configuration from {}", path.display());
            config
        }
        None => RuntimeConfig::default(),
    };

    config.apply_env_overrides(|key| std::env::var(key).ok());
    Ok(config)
}
