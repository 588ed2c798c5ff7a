use serde::{Deserialize, Serialize};

/// Top-level configuration (loaded from wcn.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WcnConfig {
    pub notary: NotaryDefaults,
    pub anchor: AnchorConfig,
    pub crypto: CryptoConfig,
    pub daemon: DaemonConfig,
}

/// Defaults applied to every notarization request unless overridden
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotaryDefaults {
    /// Protocol tag written into attestations as `p` (default: wcn-ins)
    pub namespace: String,
    /// Author handle (default: WIRED CHAOS; AUTHOR_HANDLE env overrides)
    pub author: String,
    /// Largest working buffer inscribed as a single file, in KiB
    pub max_inline_kb: u32,
    /// Chunk size for chunked mode, in KiB
    pub chunk_kb: u32,
}

/// Anchor provider endpoints. Wallet secrets are read from the
/// environment only and never from this file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// JSON-RPC endpoint (DOGE_RPC_URL overrides)
    pub rpc_url: Option<String>,
    /// REST inscription service endpoint (INSCRIBE_SERVICE_URL overrides)
    pub service_url: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries for requests that never reached the provider (connect errors)
    pub connect_retries: u32,
    pub user_agent: String,
}

/// Argon2id parameters for the passphrase KDF
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoConfig {
    /// Argon2id memory cost in KiB (default: 65536 = 64 MiB)
    pub argon2_mem_cost_kib: u32,
    /// Argon2id time cost (iterations, default: 3)
    pub argon2_time_cost: u32,
    /// Argon2id parallelism (default: 4)
    pub argon2_parallelism: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// HTTP listen address for the notary API
    pub listen: String,
    /// Log level (default: info)
    pub log_level: String,
    /// Log format: "json" or "text"
    pub log_format: String,
    /// Largest accepted request body; base64 inline content inflates by 4/3
    pub max_body_bytes: usize,
}

impl NotaryDefaults {
    /// Author handle, preferring the AUTHOR_HANDLE environment variable.
    pub fn resolved_author(&self) -> String {
        std::env::var("AUTHOR_HANDLE")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.author.clone())
    }
}

impl Default for NotaryDefaults {
    fn default() -> Self {
        Self {
            namespace: "wcn-ins".into(),
            author: "WIRED CHAOS".into(),
            max_inline_kb: 256,
            chunk_kb: 512,
        }
    }
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            service_url: None,
            timeout_secs: 60,
            connect_retries: 2,
            user_agent: format!("wcn-notary/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            argon2_mem_cost_kib: 65536,
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:8787".into(),
            log_level: "info".into(),
            log_format: "text".into(),
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}
