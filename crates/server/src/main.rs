//! Mothr gateway binary.

use anyhow::{Context, Result};
use clap::Parser;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use mothr_core::config::AppConfig;
use mothr_server::{AppState, create_router};
use mothr_signer::SuiKeypair;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Mothr - storage cost estimates and blob gateway for Walrus
#[derive(Parser, Debug)]
#[command(name = "mothr-gateway")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "MOTHR_CONFIG",
        default_value = "config/gateway.toml"
    )]
    config: String,
}

/// Budget for the startup reachability probe.
const STARTUP_HEALTH_TIMEOUT: Duration = Duration::from_secs(10);

/// Unprefixed variables kept for deployments that predate `MOTHR_`.
fn legacy_env() -> Env {
    Env::raw()
        .only(&["SUI_SECRET_KEY", "SUI_NETWORK", "PORT"])
        .map(|key| match key.as_str().to_ascii_lowercase().as_str() {
            "sui_secret_key" => "signing.secret_key".into(),
            "sui_network" => "network.name".into(),
            "port" => "server.port".into(),
            _ => key.as_str().to_string().into(),
        })
}

fn load_config(path: &str) -> Result<AppConfig> {
    let mut figment = Figment::new();
    if std::path::Path::new(path).exists() {
        tracing::info!(config_path = %path, "Loading configuration from file");
        figment = figment.merge(Toml::file(path));
    } else {
        tracing::debug!("No config file found at {}", path);
    }

    let config: AppConfig = figment
        .merge(Env::prefixed("MOTHR_").split("__"))
        .merge(legacy_env())
        .extract()
        .context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Mothr gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args.config)?;

    let secret_key = config.signing.require_secret_key()?;
    let signer = SuiKeypair::from_base64(secret_key).context("failed to parse SUI_SECRET_KEY")?;
    tracing::info!(address = %signer.address(), "Loaded signing key");

    mothr_server::metrics::register_metrics();
    tracing::info!("Prometheus metrics registered");

    let network = mothr_network::from_config(&config.network, &config.timeouts)
        .context("failed to initialize storage network")?;
    tracing::info!(
        backend = ?config.network.backend,
        network = %network.name(),
        "Storage network initialized"
    );

    // Unreachable upstreams are reported but do not block startup; each
    // request surfaces its own upstream failure.
    match mothr_network::with_timeout(STARTUP_HEALTH_TIMEOUT, network.health_check()).await {
        Ok(()) => tracing::info!("Storage network connectivity verified"),
        Err(e) => tracing::warn!(error = %e, "Storage network health check failed"),
    }

    let rates = mothr_network::rate_source_from_config(&config.pricing, &config.timeouts)
        .context("failed to initialize exchange rate source")?;
    match &rates {
        Some(source) => tracing::info!(source = %source.describe(), "Fiat pricing enabled"),
        None => tracing::info!("No exchange rate configured, fiat amounts will be omitted"),
    }

    let addr = config.server.bind_addr()?;
    let state = AppState::new(config, network, rates, Arc::new(signer))
        .context("failed to build application state")?;
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app).await?;

    Ok(())
}
