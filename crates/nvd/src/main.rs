//! nvd: notevault encryption daemon
//!
//! Usage:
//!   nvd [--config /etc/notevault/config.toml] [--listen 127.0.0.1:8920]
//!
//! Serves the server-held-key deployment variant: clients POST field
//! values to /api/encrypt and /api/decrypt instead of deriving a key
//! locally. The master key secret comes from the environment and is
//! required at startup.

mod metrics;
mod server;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use nv_core::config::NvConfig;
use nv_session::MasterKeyProvider;

#[derive(Parser, Debug)]
#[command(name = "nvd", version, about = "notevault encryption daemon")]
struct Cli {
    /// Path to notevault.toml configuration file
    #[arg(
        long,
        short = 'c',
        env = "NOTEVAULT_CONFIG",
        default_value = "/etc/notevault/config.toml"
    )]
    config: PathBuf,

    /// Listen address override (defaults to the config value)
    #[arg(long, env = "NOTEVAULT_LISTEN")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "NOTEVAULT_LOG", default_value = "info")]
    log: String,

    /// Log format (json, text)
    #[arg(long, env = "NOTEVAULT_LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,
}

#[derive(Clone, Debug, ValueEnum)]
enum LogFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log, &cli.log_format);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %cli.config.display(),
        "nvd starting"
    );

    let mut config = NvConfig::load(&cli.config)?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }

    // The master key is required up front: failing here beats minting
    // undecryptable data later. The error names the variable in the log
    // only — it never reaches a client response.
    let provider = MasterKeyProvider::from_env_var(&config.crypto.key_env).map_err(|e| {
        tracing::error!(error = %e, "master key unavailable");
        anyhow::anyhow!("master key setup failed; see server log")
    })?;

    server::run(config, provider).await
}

fn init_logging(level: &str, format: &LogFormat) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer())
                .init();
        }
    }
}
