//! wcn: WIRED CHAOS notary CLI
//!
//! Commands:
//!   notarize --file <path|url> --title <t>   - hash, (encrypt,) anchor, attest
//!   verify --file <path|url> --attestation   - check a document against its proof
//!   info --insc <id>                         - local inscription info
//!   decrypt --file <payload> --out <path>    - open an encrypted working buffer
//!   config show                              - display current configuration
//!
//! JSON results go to stdout; logs and progress go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use secrecy::SecretString;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};

use wcn_core::config::WcnConfig;
use wcn_core::PrivacyMode;
use wcn_crypto::KdfParams;
use wcn_notary::{Attestation, Manifest, NotarizeResult, NotaryConfig};

// ── CLI structure ──────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "wcn",
    version,
    about = "WIRED CHAOS document notary",
    long_about = "wcn: notarize documents with tamper-evident, independently verifiable proofs"
)]
struct Cli {
    /// Path to the wcn configuration file
    #[arg(long, short = 'c', env = "WCN_CONFIG", default_value = "/etc/wcn/config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "WCN_LOG", default_value = "warn", global = true)]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "WCN_LOG_FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Notarize a document and print the result summary
    Notarize {
        /// Local path or http(s) URL
        #[arg(long)]
        file: String,

        #[arg(long)]
        title: String,

        /// public | encrypted
        #[arg(long, default_value = "public")]
        privacy: PrivacyMode,

        /// Passphrase for encrypted mode (prompted when omitted on a terminal)
        #[arg(long, env = "WCN_RECIPIENT_KEY", hide_env_values = true)]
        recipient: Option<String>,

        #[arg(long)]
        max_inline_kb: Option<u32>,

        #[arg(long)]
        chunk_kb: Option<u32>,

        #[arg(long)]
        namespace: Option<String>,

        #[arg(long)]
        author: Option<String>,

        /// RFC 3339 timestamp (default: now)
        #[arg(long)]
        timestamp: Option<String>,

        /// Override the detected MIME type
        #[arg(long)]
        mime_type: Option<String>,

        /// Simulate inscriptions; no credentials or network needed
        #[arg(long)]
        dry_run: bool,

        /// Write attestation.json (and manifest.json) here
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Verify a document against an attestation (and manifest)
    Verify {
        /// Local path or http(s) URL
        #[arg(long)]
        file: String,

        /// Attestation JSON file
        #[arg(long)]
        attestation: PathBuf,

        /// Manifest JSON file (chunked documents)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Show what is known locally about an inscription id
    Info {
        #[arg(long)]
        insc: String,
    },

    /// Decrypt an encrypted working buffer (nonce || ciphertext || tag)
    Decrypt {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long, env = "WCN_RECIPIENT_KEY", hide_env_values = true)]
        recipient: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(&cli.log, &cli.log_format);
    let config = load_config(&cli.config).await?;

    match cli.command {
        Commands::Notarize {
            file,
            title,
            privacy,
            recipient,
            max_inline_kb,
            chunk_kb,
            namespace,
            author,
            timestamp,
            mime_type,
            dry_run,
            out_dir,
        } => {
            let mut request = NotaryConfig::from_defaults(title, &config.notary, &config.crypto);
            request.privacy_mode = privacy;
            request.recipient_key = resolve_recipient(privacy, recipient)?;
            request.max_inline_kb = max_inline_kb.unwrap_or(request.max_inline_kb);
            request.chunk_kb = chunk_kb.unwrap_or(request.chunk_kb);
            if let Some(ns) = namespace {
                request.namespace = ns;
            }
            if let Some(author) = author {
                request.author = author;
            }
            if let Some(ts) = timestamp {
                request.timestamp = ts;
            }
            request.mime_type = mime_type;
            request.dry_run = dry_run;

            cmd_notarize(&config, request, &file, out_dir.as_deref()).await
        }
        Commands::Verify {
            file,
            attestation,
            manifest,
        } => cmd_verify(&file, &attestation, manifest.as_deref()).await,
        Commands::Info { insc } => cmd_info(&insc),
        Commands::Decrypt {
            file,
            out,
            recipient,
        } => cmd_decrypt(&config, &file, &out, recipient).await,
        Commands::Config {
            action: ConfigAction::Show,
        } => cmd_config_show(&config, &cli.config),
    }
}

// ── Config and logging ────────────────────────────────────────────────────────

async fn load_config(path: &Path) -> Result<WcnConfig> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config: {}", path.display()))
    } else {
        debug!(path = %path.display(), "no config file, using defaults");
        Ok(WcnConfig::default())
    }
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}

/// Recipient key from the flag or env, else an interactive prompt for
/// encrypted mode on a terminal.
fn resolve_recipient(privacy: PrivacyMode, given: Option<String>) -> Result<Option<SecretString>> {
    if let Some(key) = given.filter(|k| !k.is_empty()) {
        return Ok(Some(SecretString::from(key)));
    }
    if privacy == PrivacyMode::Encrypted && std::io::stdin().is_terminal() {
        let key = rpassword::prompt_password("Recipient key: ").context("reading recipient key")?;
        return Ok(Some(SecretString::from(key)));
    }
    Ok(None)
}

// ── Progress bar helpers ──────────────────────────────────────────────────────

fn make_progress_bar(total: u64, prefix: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::with_template("{prefix:.bold} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-");
    pb.set_style(style);
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ── `wcn notarize` ────────────────────────────────────────────────────────────

async fn cmd_notarize(
    config: &WcnConfig,
    mut request: NotaryConfig,
    file: &str,
    out_dir: Option<&Path>,
) -> Result<ExitCode> {
    let fetch_timeout = Duration::from_secs(config.anchor.timeout_secs);
    let loaded = wcn_notary::load_with_timeout(file, fetch_timeout)
        .await
        .with_context(|| format!("loading {file}"))?;
    debug!(source = file, bytes = loaded.size_bytes, mime = %loaded.mime_type, "document loaded");
    if request.mime_type.is_none() {
        request.mime_type = Some(loaded.mime_type.clone());
    }

    let pb = make_progress_bar(0, "notarize");
    pb.set_message(file.to_string());
    let pb_clone = pb.clone();
    let progress: wcn_notary::ProgressFn = Box::new(move |done, total, msg| {
        pb_clone.set_length(total);
        pb_clone.set_position(done);
        pb_clone.set_message(msg.to_string());
    });

    let outcome = wcn_notary::notarize(&request, &loaded.bytes, &config.anchor, Some(&progress)).await;
    let result = match outcome {
        Ok(result) => {
            pb.finish_with_message("done".to_string());
            result
        }
        Err(e) => {
            pb.abandon_with_message("failed".to_string());
            return Err(e).with_context(|| format!("notarizing {file}"));
        }
    };

    info!(
        mode = %result.mode,
        provider = %result.provider,
        inscriptions = result.inscription_count(),
        "notarized {file}"
    );
    println!("{}", serde_json::to_string_pretty(&result.summary())?);

    if let Some(dir) = out_dir {
        for path in write_artifacts(dir, &result)? {
            eprintln!("  wrote {}", path.display());
        }
    }
    if let Some(cost) = result.total_cost() {
        eprintln!("  estimated cost: {cost}");
    }

    Ok(ExitCode::SUCCESS)
}

/// Write `attestation.json` and, in chunked mode, `manifest.json` into `dir`.
fn write_artifacts(dir: &Path, result: &NotarizeResult) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let mut written = Vec::new();
    let attestation_path = dir.join("attestation.json");
    std::fs::write(&attestation_path, serde_json::to_vec_pretty(&result.attestation)?)
        .with_context(|| format!("writing {}", attestation_path.display()))?;
    written.push(attestation_path);

    if let Some(manifest) = &result.manifest {
        let manifest_path = dir.join("manifest.json");
        std::fs::write(&manifest_path, manifest.to_bytes()?)
            .with_context(|| format!("writing {}", manifest_path.display()))?;
        written.push(manifest_path);
    }
    Ok(written)
}

// ── `wcn verify` ──────────────────────────────────────────────────────────────

async fn cmd_verify(file: &str, attestation: &Path, manifest: Option<&Path>) -> Result<ExitCode> {
    let attestation: Attestation = read_json(attestation)?;
    let manifest: Option<Manifest> = manifest.map(read_json).transpose()?;

    let result = wcn_notary::verify_document(file, &attestation, manifest.as_ref())
        .await
        .with_context(|| format!("verifying {file}"))?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(if result.verified {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing {}", path.display()))
}

// ── `wcn info` ────────────────────────────────────────────────────────────────

fn cmd_info(insc: &str) -> Result<ExitCode> {
    let info = wcn_anchor::inscription_info(insc);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(ExitCode::SUCCESS)
}

// ── `wcn decrypt` ─────────────────────────────────────────────────────────────

async fn cmd_decrypt(
    config: &WcnConfig,
    file: &Path,
    out: &Path,
    recipient: Option<String>,
) -> Result<ExitCode> {
    let passphrase = resolve_recipient(PrivacyMode::Encrypted, recipient)?
        .context("a recipient key is required: pass --recipient or set WCN_RECIPIENT_KEY")?;
    let payload = tokio::fs::read(file)
        .await
        .with_context(|| format!("reading {}", file.display()))?;

    let params = KdfParams::from(&config.crypto);
    debug!(
        mem_cost_kib = params.mem_cost_kib,
        time_cost = params.time_cost,
        "deriving document key"
    );
    let plaintext = wcn_crypto::open_payload(&payload, &passphrase, &params)
        .with_context(|| format!("decrypting {}", file.display()))?;

    tokio::fs::write(out, &plaintext)
        .await
        .with_context(|| format!("writing {}", out.display()))?;
    eprintln!(
        "decrypted {} bytes -> {} ({} bytes)",
        payload.len(),
        out.display(),
        plaintext.len()
    );
    Ok(ExitCode::SUCCESS)
}

// ── `wcn config show` ─────────────────────────────────────────────────────────

fn cmd_config_show(config: &WcnConfig, path: &Path) -> Result<ExitCode> {
    eprintln!("# config: {}", path.display());
    println!(
        "{}",
        toml::to_string_pretty(config).context("serializing config")?
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use wcn_anchor::MemoryProvider;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_notarize_flags() {
        let cli = Cli::try_parse_from([
            "wcn",
            "notarize",
            "--file",
            "deed.pdf",
            "--title",
            "Deed",
            "--privacy",
            "encrypted",
            "--recipient",
            "s3cret",
            "--chunk-kb",
            "64",
            "--dry-run",
        ])
        .unwrap();

        match cli.command {
            Commands::Notarize {
                privacy,
                recipient,
                chunk_kb,
                dry_run,
                max_inline_kb,
                ..
            } => {
                assert_eq!(privacy, PrivacyMode::Encrypted);
                assert_eq!(recipient.as_deref(), Some("s3cret"));
                assert_eq!(chunk_kb, Some(64));
                assert_eq!(max_inline_kb, None);
                assert!(dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_privacy_mode() {
        let parsed = Cli::try_parse_from([
            "wcn", "notarize", "--file", "a", "--title", "t", "--privacy", "secret",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn explicit_recipient_wins() {
        let key = resolve_recipient(PrivacyMode::Encrypted, Some("k".into())).unwrap();
        assert!(key.is_some());
        assert!(resolve_recipient(PrivacyMode::Public, None).unwrap().is_none());
    }

    #[tokio::test]
    async fn artifacts_written_for_chunked_result() {
        let request = NotaryConfig {
            title: "Chunky".into(),
            max_inline_kb: 1,
            chunk_kb: 1,
            ..Default::default()
        };
        let provider = MemoryProvider::new();
        let result = wcn_notary::notarize_with(&provider, &request, &[4u8; 3000], None)
            .await
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("proof");
        let written = write_artifacts(&out, &result).unwrap();
        assert_eq!(written.len(), 2);

        let attestation: Attestation = read_json(&out.join("attestation.json")).unwrap();
        assert_eq!(attestation, result.attestation);
        let manifest: Manifest = read_json(&out.join("manifest.json")).unwrap();
        assert_eq!(Some(manifest), result.manifest);
    }

    #[tokio::test]
    async fn config_file_is_parsed_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[notary]\nnamespace = \"wcn-cli\"\n").unwrap();

        let cfg = load_config(&path).await.unwrap();
        assert_eq!(cfg.notary.namespace, "wcn-cli");
        assert_eq!(cfg.notary.chunk_kb, 512);

        let missing = load_config(&dir.path().join("absent.toml")).await.unwrap();
        assert_eq!(missing.notary.namespace, "wcn-ins");
    }
}
