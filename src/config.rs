//! Configuration types for nft-art-dl
//!
//! A [`Config`] can come from a JSON file, and provider secrets are read from
//! the process environment (a `.env` file is honoured by the binary). Every
//! field has a default, so an empty `{}` file is a valid configuration.

use crate::error::{Error, Result};
use crate::types::ProviderKind;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable holding the Alchemy API key
pub const ALCHEMY_KEY_ENV: &str = "ALCHEMY_KEY";
/// Environment variable holding the OpenSea API key
pub const OPENSEA_API_KEY_ENV: &str = "OPENSEA_API_KEY";
/// Environment variable holding the deepnftvalue API token
pub const DEEPNFTVALUE_TOKEN_ENV: &str = "DEEPNFTVALUE_TOKEN";

/// Main configuration for a download run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Directory artifacts are written to (default: "./output")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Pause after every persisted image, in milliseconds (default: 500)
    #[serde(default = "default_request_delay", with = "duration_millis_serde")]
    pub request_delay: Duration,

    /// Per-request HTTP timeout, in seconds (default: 60)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Provider endpoints and credentials
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            request_delay: default_request_delay(),
            request_timeout: default_request_timeout(),
            providers: ProvidersConfig::default(),
        }
    }
}

/// Endpoints and static credentials for every supported provider
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// IPFS gateway settings
    #[serde(default)]
    pub ipfs: IpfsConfig,

    /// Alchemy NFT API settings
    #[serde(default)]
    pub alchemy: AlchemyConfig,

    /// OpenSea API settings
    #[serde(default)]
    pub opensea: OpenSeaConfig,

    /// deepnftvalue API settings
    #[serde(default)]
    pub deepnftvalue: DeepNftValueConfig,
}

/// IPFS gateway configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IpfsConfig {
    /// Gateway base URL, `ipfs://` references are rewritten onto it
    /// (default: "https://ipfs.io/ipfs")
    #[serde(default = "default_ipfs_gateway")]
    pub gateway: String,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            gateway: default_ipfs_gateway(),
        }
    }
}

/// Alchemy NFT API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlchemyConfig {
    /// API base URL without the key segment
    #[serde(default = "default_alchemy_base_url")]
    pub base_url: String,

    /// API key, also read from `ALCHEMY_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for AlchemyConfig {
    fn default() -> Self {
        Self {
            base_url: default_alchemy_base_url(),
            api_key: None,
        }
    }
}

/// OpenSea API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OpenSeaConfig {
    /// Contract endpoint base URL
    #[serde(default = "default_opensea_base_url")]
    pub base_url: String,

    /// Value of the `x-api-key` header, also read from `OPENSEA_API_KEY`
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for OpenSeaConfig {
    fn default() -> Self {
        Self {
            base_url: default_opensea_base_url(),
            api_key: None,
        }
    }
}

/// deepnftvalue API configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeepNftValueConfig {
    /// Token endpoint base URL
    #[serde(default = "default_deepnftvalue_base_url")]
    pub base_url: String,

    /// API token sent as `Authorization: Token <token>`, also read from
    /// `DEEPNFTVALUE_TOKEN`
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl Default for DeepNftValueConfig {
    fn default() -> Self {
        Self {
            base_url: default_deepnftvalue_base_url(),
            token: None,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("failed to read {}: {}", path.display(), e),
            key: None,
        })?;
        serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })
    }

    /// Fill provider secrets from the process environment
    ///
    /// Variables that are set override values from the config file.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Fill provider secrets using `lookup` instead of the process environment
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ALCHEMY_KEY_ENV) {
            self.providers.alchemy.api_key = Some(key);
        }
        if let Some(key) = lookup(OPENSEA_API_KEY_ENV) {
            self.providers.opensea.api_key = Some(key);
        }
        if let Some(token) = lookup(DEEPNFTVALUE_TOKEN_ENV) {
            self.providers.deepnftvalue.token = Some(token);
        }
    }

    /// Check that everything `provider` needs is present and well formed
    ///
    /// Runs before the first request so a missing secret fails the whole run
    /// instead of every token.
    pub fn validate_for(&self, provider: ProviderKind) -> Result<()> {
        match provider {
            ProviderKind::Ipfs => {
                check_base_url(&self.providers.ipfs.gateway, "providers.ipfs.gateway")?;
            }
            ProviderKind::Alchemy => {
                check_base_url(&self.providers.alchemy.base_url, "providers.alchemy.base_url")?;
                require_secret(&self.providers.alchemy.api_key, ALCHEMY_KEY_ENV)?;
            }
            ProviderKind::Opensea => {
                check_base_url(&self.providers.opensea.base_url, "providers.opensea.base_url")?;
                require_secret(&self.providers.opensea.api_key, OPENSEA_API_KEY_ENV)?;
            }
            ProviderKind::Deepnftvalue => {
                check_base_url(
                    &self.providers.deepnftvalue.base_url,
                    "providers.deepnftvalue.base_url",
                )?;
                require_secret(&self.providers.deepnftvalue.token, DEEPNFTVALUE_TOKEN_ENV)?;
            }
        }
        Ok(())
    }
}

fn check_base_url(value: &str, key: &str) -> Result<()> {
    let url = url::Url::parse(value)
        .map_err(|e| Error::config(format!("{key} is not a valid URL: {e}"), key))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::config(
            format!("{key} must be an http(s) URL, got {}", url.scheme()),
            key,
        ));
    }
    Ok(())
}

fn require_secret(value: &Option<String>, env_key: &str) -> Result<()> {
    match value.as_deref().map(str::trim) {
        Some(secret) if !secret.is_empty() => Ok(()),
        _ => Err(Error::config(format!("{env_key} must be set"), env_key)),
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./output")
}

fn default_request_delay() -> Duration {
    Duration::from_millis(500)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_ipfs_gateway() -> String {
    "https://ipfs.io/ipfs".into()
}

fn default_alchemy_base_url() -> String {
    "https://eth-mainnet.g.alchemy.com/nft/v3".into()
}

fn default_opensea_base_url() -> String {
    "https://api.opensea.io/api/v2/chain/ethereum/contract".into()
}

fn default_deepnftvalue_base_url() -> String {
    "https://api.deepnftvalue.com/v1/tokens".into()
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Duration serialization helper (milliseconds)
mod duration_millis_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config: Config = serde_json::from_str("{}").expect("deserialize failed");

        assert_eq!(config.output_dir, PathBuf::from("./output"));
        assert_eq!(config.request_delay, Duration::from_millis(500));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.providers.ipfs.gateway, "https://ipfs.io/ipfs");
        assert!(config.providers.alchemy.api_key.is_none());
    }

    #[test]
    fn partial_json_overrides_selected_fields() {
        let json = r#"{
            "output_dir": "/tmp/art",
            "request_delay": 0,
            "providers": { "ipfs": { "gateway": "https://w3s.link/ipfs" } }
        }"#;
        let config: Config = serde_json::from_str(json).expect("deserialize failed");

        assert_eq!(config.output_dir, PathBuf::from("/tmp/art"));
        assert_eq!(config.request_delay, Duration::ZERO);
        assert_eq!(config.providers.ipfs.gateway, "https://w3s.link/ipfs");
        assert_eq!(
            config.providers.opensea.base_url,
            "https://api.opensea.io/api/v2/chain/ethereum/contract"
        );
    }

    #[test]
    fn secrets_are_not_serialized() {
        let mut config = Config::default();
        config.providers.alchemy.api_key = Some("secret-key".into());

        let json = serde_json::to_string(&config).expect("serialize failed");
        assert!(!json.contains("secret-key"));
    }

    #[test]
    fn load_reads_json_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, r#"{ "request_delay": 250 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.request_delay, Duration::from_millis(250));
    }

    #[test]
    fn load_reports_invalid_json_as_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config { .. })));
    }

    #[test]
    fn env_overrides_secrets() {
        let vars = env(&[
            (ALCHEMY_KEY_ENV, "alchemy-key"),
            (OPENSEA_API_KEY_ENV, "opensea-key"),
            (DEEPNFTVALUE_TOKEN_ENV, "dnv-token"),
        ]);
        let mut config = Config::default();
        config.apply_env_with(|key| vars.get(key).cloned());

        assert_eq!(config.providers.alchemy.api_key.as_deref(), Some("alchemy-key"));
        assert_eq!(config.providers.opensea.api_key.as_deref(), Some("opensea-key"));
        assert_eq!(config.providers.deepnftvalue.token.as_deref(), Some("dnv-token"));
    }

    #[test]
    fn ipfs_needs_no_secret() {
        assert!(Config::default().validate_for(ProviderKind::Ipfs).is_ok());
    }

    #[test]
    fn missing_secrets_fail_validation_with_env_key() {
        let config = Config::default();
        let cases = [
            (ProviderKind::Alchemy, ALCHEMY_KEY_ENV),
            (ProviderKind::Opensea, OPENSEA_API_KEY_ENV),
            (ProviderKind::Deepnftvalue, DEEPNFTVALUE_TOKEN_ENV),
        ];

        for (provider, expected_key) in cases {
            match config.validate_for(provider) {
                Err(Error::Config { key, .. }) => {
                    assert_eq!(key.as_deref(), Some(expected_key), "{provider}")
                }
                other => panic!("expected config error for {provider}, got {other:?}"),
            }
        }
    }

    #[test]
    fn blank_secret_is_treated_as_missing() {
        let mut config = Config::default();
        config.providers.alchemy.api_key = Some("   ".into());
        assert!(config.validate_for(ProviderKind::Alchemy).is_err());
    }

    #[test]
    fn invalid_gateway_url_fails_validation() {
        let mut config = Config::default();
        config.providers.ipfs.gateway = "not a url".into();
        assert!(config.validate_for(ProviderKind::Ipfs).is_err());

        config.providers.ipfs.gateway = "ftp://ipfs.example".into();
        assert!(config.validate_for(ProviderKind::Ipfs).is_err());
    }
}
