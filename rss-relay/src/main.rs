use anyhow::Context;
use clap::Parser;
use rss_relay::relay::DEFAULT_POLL_INTERVAL;
use rss_relay::state::DEFAULT_STATE_FILE;
use rss_relay::{DiscordClient, FetchConfig, HttpFeedSource, RelayConfig, RssRelay, StateStore};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "rss-relay", about = "Relay the newest RSS entries into Discord channels")]
struct Args {
    /// File holding the links already posted per channel
    #[arg(long, env = "SENT_ARTICLES_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// Seconds to wait after a finished pass before the next one
    #[arg(long, env = "POLL_INTERVAL_SECS", default_value_t = DEFAULT_POLL_INTERVAL.as_secs())]
    interval_secs: u64,

    #[arg(long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables take precedence.
    dotenv::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    info!("Starting bot...");

    let config = RelayConfig::from_env().context("invalid configuration")?;
    info!(
        "Relaying {} feeds into {} channels",
        config.feed_urls.len(),
        config.channel_ids.len()
    );

    let discord = DiscordClient::new(config.bot_token.clone())?;
    let me = discord
        .current_user()
        .await
        .context("failed to log in to Discord")?;
    info!("Logged in as {} ({})", me.username, me.id);

    let feeds = HttpFeedSource::new(FetchConfig::default())?;
    let store = StateStore::new(args.state_file.clone());
    let relay = RssRelay::new(discord, feeds, store, config.feed_urls.clone());

    if args.once {
        relay.run_pass(&config.channel_ids).await?;
        return Ok(());
    }

    let interval = Duration::from_secs(args.interval_secs);
    tokio::select! {
        result = relay.run(&config.channel_ids, interval) => {
            if let Err(e) = &result {
                error!("Relay stopped: {}", e);
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
        }
    }

    Ok(())
}
