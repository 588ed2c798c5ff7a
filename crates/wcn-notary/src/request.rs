//! Per-request notarization settings

use chrono::{SecondsFormat, Utc};
use secrecy::SecretString;
use wcn_core::config::{CryptoConfig, NotaryDefaults};
use wcn_core::PrivacyMode;
use wcn_crypto::KdfParams;

/// Everything the planner and orchestrator need for one document.
#[derive(Debug, Clone)]
pub struct NotaryConfig {
    pub title: String,
    pub privacy_mode: PrivacyMode,
    /// Passphrase for encrypted mode
    pub recipient_key: Option<SecretString>,
    /// Largest working buffer inscribed inline, in KiB
    pub max_inline_kb: u32,
    /// Chunk size for chunked mode, in KiB
    pub chunk_kb: u32,
    pub namespace: String,
    pub author: String,
    /// RFC 3339 timestamp written as `ts` / `created_at`
    pub timestamp: String,
    /// MIME type of the source document
    pub mime_type: Option<String>,
    /// Replace anchor calls with the deterministic simulator
    pub dry_run: bool,
    pub kdf: KdfParams,
}

impl NotaryConfig {
    /// Start from the configured defaults with a fresh timestamp.
    pub fn from_defaults(
        title: impl Into<String>,
        defaults: &NotaryDefaults,
        crypto: &CryptoConfig,
    ) -> Self {
        Self {
            title: title.into(),
            privacy_mode: PrivacyMode::Public,
            recipient_key: None,
            max_inline_kb: defaults.max_inline_kb,
            chunk_kb: defaults.chunk_kb,
            namespace: defaults.namespace.clone(),
            author: defaults.resolved_author(),
            timestamp: now_timestamp(),
            mime_type: None,
            dry_run: false,
            kdf: KdfParams::from(crypto),
        }
    }

    pub fn mime_type(&self) -> &str {
        self.mime_type
            .as_deref()
            .unwrap_or("application/octet-stream")
    }

    pub fn max_inline_bytes(&self) -> usize {
        self.max_inline_kb as usize * 1024
    }
}

impl Default for NotaryConfig {
    fn default() -> Self {
        Self::from_defaults(
            String::new(),
            &NotaryDefaults::default(),
            &CryptoConfig::default(),
        )
    }
}

/// Current UTC time as `2024-05-01T12:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_flow_into_request() {
        let defaults = NotaryDefaults {
            namespace: "wcn-test".into(),
            max_inline_kb: 8,
            ..Default::default()
        };
        let cfg = NotaryConfig::from_defaults("Doc", &defaults, &CryptoConfig::default());

        assert_eq!(cfg.title, "Doc");
        assert_eq!(cfg.namespace, "wcn-test");
        assert_eq!(cfg.max_inline_bytes(), 8 * 1024);
        assert_eq!(cfg.chunk_kb, 512);
        assert_eq!(cfg.mime_type(), "application/octet-stream");
        assert!(!cfg.dry_run);
    }

    #[test]
    fn timestamp_is_rfc3339_utc_millis() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
        assert_eq!(ts.len(), "2024-05-01T12:00:00.000Z".len());
    }
}
