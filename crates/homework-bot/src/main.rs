//! Homework notifier bot binary.
//!
//! Start the bot with:
//! ```bash
//! PRACTICUM_TOKEN=xxx TELEGRAM_TOKEN=yyy TELEGRAM_CHAT_ID=123 cargo run -p homework-bot
//! ```

use std::time::Duration;

use clap::Parser;
use homework_api::{ReviewClient, DEFAULT_ENDPOINT};
use homework_bot::config::{self, BotConfig, Credentials};
use homework_bot::{logging, Notifier, StatusPoller, TelegramMessenger};
use tokio::sync::watch;

/// Homework Bot - get Telegram messages when a homework review status changes
#[derive(Parser, Debug)]
#[command(name = "homework-bot")]
#[command(about = "Polls the homework review API and reports status changes to Telegram")]
struct Args {
    /// Seconds to wait after every polling cycle
    #[arg(long, env = "HOMEWORK_BOT_RETRY_PERIOD", default_value = "600")]
    retry_period: u64,

    /// Status endpoint to poll
    #[arg(long, env = "HOMEWORK_BOT_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Timeout for one API request, in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    config::load_env_files();

    logging::init(args.verbose, &config::log_file());

    if let Err(e) = config::ensure_all_dirs() {
        tracing::warn!(error = %e, "Failed to create all directories");
    }

    let credentials = Credentials::from_env();
    if !credentials.check_tokens() {
        tracing::error!(
            missing = ?credentials.missing(),
            "CRITICAL: required environment variables are missing"
        );
    }
    let config = BotConfig::from_credentials(credentials)?
        .with_endpoint(args.endpoint)
        .with_retry_period(Duration::from_secs(args.retry_period))
        .with_request_timeout(Duration::from_secs(args.timeout));

    let client = ReviewClient::new(&config.endpoint, &config.practicum_token, config.request_timeout)?;
    let notifier = Notifier::new(TelegramMessenger::new(&config.telegram_token), &config.chat_id);

    let cursor = chrono::Utc::now().timestamp();
    let mut poller = StatusPoller::new(client, notifier, config.retry_period, cursor);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("received Ctrl+C, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    poller.run(shutdown_rx).await;

    Ok(())
}
