//! Anchor credentials: wallet secret + inscription endpoint
//!
//! Wallet secrets come from the environment only. Endpoints come from the
//! environment first, then from the `[anchor]` config section.

use secrecy::SecretString;
use wcn_core::config::AnchorConfig;
use wcn_core::{NotaryError, NotaryResult};

#[derive(Debug, Clone, Default)]
pub struct AnchorCredentials {
    pub wallet_mnemonic: Option<SecretString>,
    pub wallet_wif: Option<SecretString>,
    pub rpc_url: Option<String>,
    pub service_url: Option<String>,
}

impl AnchorCredentials {
    /// Resolve credentials from `DOGE_WALLET_MNEMONIC`, `DOGE_WALLET_WIF`,
    /// `DOGE_RPC_URL` and `INSCRIBE_SERVICE_URL`, falling back to `cfg` for
    /// the endpoints.
    pub fn resolve(cfg: &AnchorConfig) -> Self {
        Self {
            wallet_mnemonic: env_var("DOGE_WALLET_MNEMONIC").map(SecretString::from),
            wallet_wif: env_var("DOGE_WALLET_WIF").map(SecretString::from),
            rpc_url: env_var("DOGE_RPC_URL").or_else(|| cfg.rpc_url.clone()),
            service_url: env_var("INSCRIBE_SERVICE_URL").or_else(|| cfg.service_url.clone()),
        }
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet_mnemonic.is_some() || self.wallet_wif.is_some()
    }

    pub fn has_endpoint(&self) -> bool {
        self.rpc_url.is_some() || self.service_url.is_some()
    }

    /// Outside a dry run both a wallet secret and an endpoint are required.
    pub fn validate(&self, dry_run: bool) -> NotaryResult<()> {
        if dry_run {
            return Ok(());
        }
        if !self.has_wallet() || !self.has_endpoint() {
            return Err(NotaryError::Credentials(
                "inscription credentials missing. Provide DOGE_WALLET_MNEMONIC or DOGE_WALLET_WIF \
                 and DOGE_RPC_URL or INSCRIBE_SERVICE_URL, or run with --dry-run"
                    .into(),
            ));
        }
        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_skips_validation() {
        assert!(AnchorCredentials::default().validate(true).is_ok());
    }

    #[test]
    fn wallet_without_endpoint_is_rejected() {
        let creds = AnchorCredentials {
            wallet_mnemonic: Some(SecretString::from("abandon abandon")),
            ..Default::default()
        };
        assert!(matches!(
            creds.validate(false),
            Err(NotaryError::Credentials(_))
        ));
    }

    #[test]
    fn endpoint_without_wallet_is_rejected() {
        let creds = AnchorCredentials {
            rpc_url: Some("http://127.0.0.1:22555".into()),
            ..Default::default()
        };
        assert!(creds.validate(false).unwrap_err().is_configuration());
    }

    #[test]
    fn complete_credentials_validate() {
        let creds = AnchorCredentials {
            wallet_wif: Some(SecretString::from("QWif")),
            service_url: Some("https://inscribe.example.com".into()),
            ..Default::default()
        };
        assert!(creds.validate(false).is_ok());
    }
}
