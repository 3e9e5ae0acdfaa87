//! Command-line entry point.
//!
//! `dropmirror tick [config]` runs one reconciliation pass and exits,
//! which is what a cron or systemd timer invokes. `dropmirror run
//! [config]` keeps a tick loop on the configured interval for
//! deployments without an external timer. `dropmirror authorize
//! [config]` walks the one-time OAuth exchange and persists the refresh
//! token into the config file.

use anyhow::{bail, Context, Result};
use dropmirror_api::DropboxClient;
use dropmirror_sync::store::{FileTokenStore, MemoryTokenStore, TokenStore};
use dropmirror_sync::{Reconciler, SyncConfig};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_PATH: &str = "dropmirror.toml";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_else(|| "tick".to_string());
    let config_path = args.next().unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    match command.as_str() {
        "tick" => tick(&config_path).await,
        "run" => run(&config_path).await,
        "authorize" => authorize(&config_path).await,
        other => bail!("unknown command {other:?}; expected tick, run, or authorize"),
    }
}

fn load_config(config_path: &str) -> Result<SyncConfig> {
    SyncConfig::from_file(config_path).with_context(|| format!("loading {config_path}"))
}

fn token_store(config: &SyncConfig) -> Arc<dyn TokenStore> {
    match &config.token_cache_path {
        Some(path) => Arc::new(FileTokenStore::new(path)),
        None => Arc::new(MemoryTokenStore::new()),
    }
}

/// One reconciliation pass; the exit code tells the scheduler how it went.
async fn tick(config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let store = token_store(&config);
    let reconciler = Reconciler::new(config, store);

    let report = reconciler.run_tick().await?;
    info!("tick complete: {report:?}");
    Ok(())
}

/// Tick loop for deployments without an external timer. A failed tick is
/// logged and retried on the next interval, matching what an external
/// scheduler would do.
async fn run(config_path: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let interval = Duration::from_secs(config.interval_secs);
    let store = token_store(&config);
    let reconciler = Reconciler::new(config, store);

    info!("mirroring every {}s", interval.as_secs());
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        match reconciler.run_tick().await {
            Ok(report) => info!("tick complete: {report:?}"),
            Err(e) => error!("tick failed: {e}"),
        }
    }
}

/// Interactive OAuth bootstrap: exchanges a pasted authorization code for
/// a refresh token and writes it back into the config file.
async fn authorize(config_path: &str) -> Result<()> {
    let mut config = load_config(config_path)?;
    if config.api.client_id.is_empty() || config.api.client_secret.is_empty() {
        bail!("set api.client_id and api.client_secret in {config_path} first");
    }

    println!("Open this URL in a browser and approve access:");
    println!(
        "https://www.dropbox.com/oauth2/authorize?client_id={}&response_type=code&token_access_type=offline",
        config.api.client_id
    );
    print!("Paste the authorization code: ");
    io::stdout().flush()?;

    let mut code = String::new();
    io::stdin().lock().read_line(&mut code)?;
    let code = code.trim();
    if code.is_empty() {
        bail!("no authorization code provided");
    }

    let client = DropboxClient::new(config.api.clone());
    let grant = client
        .exchange_authorization_code(code)
        .await
        .context("authorization code exchange failed")?;

    config.api.refresh_token = grant.refresh_token;
    config.to_file(config_path)?;
    println!("Refresh token saved to {config_path}");
    Ok(())
}
