use anyhow::Context;
use clap::{Arg, Command};
use pc28_chain::TronClient;
use pc28_engine::Engine;
use pc28_node::{poller::Poller, Config};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse arguments
    let matches = Command::new("pc28-node")
        .about("Block-hash lottery service following a Tron chain.")
        .arg(Arg::new("config").long("config").required(true))
        .get_matches();

    // Load config
    let config_path = matches
        .get_one::<String>("config")
        .expect("--config is required");
    let config_file = std::fs::read_to_string(config_path)
        .with_context(|| format!("could not read config file {config_path}"))?;
    let config: Config =
        serde_yaml::from_str(&config_file).context("could not parse config file")?;
    let config = config.validate().context("invalid config")?;

    // Configure telemetry
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string())),
        )
        .init();
    info!(
        node_url = %config.node_url,
        blocks_per_issue = config.blocks_per_issue,
        lock_margin = config.lock_margin,
        games = config.games.len(),
        "starting pc28 node"
    );

    // Wire the chain client, engine and poller together.
    let chain = TronClient::new(&config.node_url, config.fetch_timeout)?;
    let engine = Arc::new(Engine::new(
        config.games.clone(),
        config.player_balance,
        config.house_balance,
    )?);
    let (poller, mailbox, mut events) = Poller::new(chain, engine, &config);

    // The mailbox is the command surface for UI/admin layers; it must stay
    // alive or the poller shuts down.
    let _mailbox = mailbox;

    // Until a display layer subscribes, surface engine events in the log.
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => info!(?event, "event"),
                Err(RecvError::Lagged(skipped)) => {
                    info!(skipped, "event subscriber lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    poller.run().await;
    Ok(())
}
