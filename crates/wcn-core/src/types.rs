use serde::{Deserialize, Serialize};

/// Branding line carried in manifests and sent as inscription metadata
pub const BRAND_NOTES: &str = "GROK: Artist @neurometax \u{2022} \u{a9} WIRED CHAOS / 33.3FM DOGECHAIN \u{2022} Palette #000000 #00FFFF #FF3131 #39FF14 #FF00FF";

/// Whether the anchored bytes are the plaintext or an encrypted payload
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyMode {
    #[default]
    Public,
    Encrypted,
}

impl PrivacyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrivacyMode::Public => "public",
            PrivacyMode::Encrypted => "encrypted",
        }
    }
}

impl std::str::FromStr for PrivacyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(PrivacyMode::Public),
            "encrypted" => Ok(PrivacyMode::Encrypted),
            other => Err(format!("unknown privacy mode '{other}' (expected public|encrypted)")),
        }
    }
}

/// How the working buffer is laid out on the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InscriptionMode {
    /// The whole working buffer fits in a single inscription
    Full,
    /// The working buffer is split into chunks plus a manifest
    Chunked,
}

impl std::fmt::Display for InscriptionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InscriptionMode::Full => f.write_str("full"),
            InscriptionMode::Chunked => f.write_str("chunked"),
        }
    }
}

/// Receipt returned by an anchor provider for one inscription
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inscription {
    pub inscription_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_estimate: Option<f64>,
}

impl Inscription {
    pub fn new(inscription_id: impl Into<String>) -> Self {
        Self {
            inscription_id: inscription_id.into(),
            txid: None,
            cost_estimate: None,
        }
    }
}

/// Bytes loaded from a local path or URL
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub bytes: Vec<u8>,
    pub size_bytes: u64,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privacy_mode_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PrivacyMode::Encrypted).unwrap(),
            "\"encrypted\""
        );
        assert_eq!("public".parse::<PrivacyMode>().unwrap(), PrivacyMode::Public);
        assert!("secret".parse::<PrivacyMode>().is_err());
    }

    #[test]
    fn inscription_omits_empty_fields() {
        let json = serde_json::to_string(&Inscription::new("abc")).unwrap();
        assert_eq!(json, r#"{"inscription_id":"abc"}"#);
    }
}
