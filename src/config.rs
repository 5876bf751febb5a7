//! Server configuration.
//!
//! Loaded from a YAML file with `serde_yaml` (the same pattern
//! `entity-gateway`'s `GatewayConfig::from_file` uses), with a small set of
//! environment variable overrides for deployment knobs, matching the way
//! `sem_os_server::main` reads `SEM_OS_BIND_ADDR` straight from the
//! environment. Unknown YAML keys are ignored.

use std::path::Path;

use serde::Deserialize;

use crate::error::ServerError;

fn default_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8001
}

fn default_prefix() -> String {
    String::new()
}

/// Process-wide configuration, built once at startup and handed out as an
/// immutable `Arc<Config>` — never a hidden global.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Public hostname used in templates, NodeInfo, and the 401 auth hint.
    pub host: String,

    /// Base URL used for links that must be fully qualified (NodeInfo).
    pub base_url: String,

    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// 0 means "use CPU count", clamped to `[4, MAX_THREADS]` at startup.
    #[serde(default)]
    pub num_threads: usize,

    #[serde(default)]
    pub show_instance_timeline: bool,

    #[serde(default)]
    pub admin_email: Option<String>,

    #[serde(default)]
    pub mastodon_api: bool,

    #[serde(default)]
    pub oauth: bool,
}

impl Config {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ServerError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ServerError> {
        let mut cfg: Config =
            serde_yaml::from_str(raw).map_err(|e| ServerError::Config(e.to_string()))?;

        if let Ok(addr) = std::env::var("SNAC_ADDRESS") {
            cfg.address = addr;
        }
        if let Ok(port) = std::env::var("SNAC_PORT") {
            cfg.port = port
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid SNAC_PORT: {port}")))?;
        }

        Ok(cfg)
    }

    /// `%admin_email%` with the source's human-readable fallback.
    pub fn admin_email_or_default(&self) -> &str {
        self.admin_email
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or("the administrator of this instance")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_yaml_with_defaults() {
        let cfg = Config::from_yaml_str("host: example.test\nbase_url: https://example.test\n")
            .unwrap();
        assert_eq!(cfg.port, 8001);
        assert_eq!(cfg.prefix, "");
        assert_eq!(cfg.admin_email_or_default(), "the administrator of this instance");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = Config::from_yaml_str(
            "host: example.test\nbase_url: https://example.test\nsome_future_key: true\n",
        )
        .unwrap();
        assert_eq!(cfg.host, "example.test");
    }
}
