//! wcnd: WIRED CHAOS notary daemon
//!
//! Usage:
//!   wcnd [--config /etc/wcn/config.toml] [--listen 127.0.0.1:8787]
//!
//! Serves the notarization engine over HTTP:
//!   GET  /health, POST /notarize, POST /verify,
//!   GET  /inscription/{id}, GET /metrics

mod api;
mod metrics;
mod routes;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use wcn_core::config::WcnConfig;

#[derive(Parser, Debug)]
#[command(name = "wcnd", version, about = "WIRED CHAOS notary daemon")]
struct Cli {
    /// Path to the wcn configuration file
    #[arg(
        long,
        short = 'c',
        env = "WCN_CONFIG",
        default_value = "/etc/wcn/config.toml"
    )]
    config: PathBuf,

    /// Listen address (overrides [daemon].listen)
    #[arg(long, env = "WCN_LISTEN")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides [daemon].log_level
    #[arg(long, env = "WCN_LOG")]
    log: Option<String>,

    /// Log format; overrides [daemon].log_format
    #[arg(long, env = "WCN_LOG_FORMAT")]
    log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config first: it carries the default log settings
    let (config, config_found) = load_config(&cli.config).await?;

    let level = cli.log.as_deref().unwrap_or(&config.daemon.log_level);
    let format = cli.log_format.clone().unwrap_or_else(|| {
        if config.daemon.log_format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    });
    init_logging(level, &format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "wcnd starting"
    );
    if !config_found {
        tracing::warn!(
            "config file not found: {}  (using defaults)",
            cli.config.display()
        );
    }

    let listen = cli.listen.unwrap_or_else(|| config.daemon.listen.clone());
    serve(listen, Arc::new(config)).await
}

async fn serve(addr: String, config: Arc<WcnConfig>) -> Result<()> {
    let state = routes::AppState::new(config);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "listening on /health, /notarize, /verify, /inscription, /metrics");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server")?;

    info!("wcnd stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("installing ctrl-c handler: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

async fn load_config(path: &Path) -> Result<(WcnConfig, bool)> {
    if path.exists() {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        let config = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", path.display()))?;
        Ok((config, true))
    } else {
        Ok((WcnConfig::default(), false))
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
