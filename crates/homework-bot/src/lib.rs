//! Telegram notifier for homework review status changes.
//!
//! The bot polls the review API on a fixed interval and tells one chat when
//! the status of the most recent homework changes. Failures of any kind are
//! reported to the same chat, once per distinct error text.
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: OAuth token for the review API
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives notifications
//!
//! # Example
//!
//! ```no_run
//! use homework_api::ReviewClient;
//! use homework_bot::{BotConfig, Credentials, Notifier, StatusPoller, TelegramMessenger};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = BotConfig::from_credentials(Credentials::from_env())?;
//!     let client = ReviewClient::new(&config.endpoint, &config.practicum_token, config.request_timeout)?;
//!     let notifier = Notifier::new(TelegramMessenger::new(&config.telegram_token), &config.chat_id);
//!
//!     let now = chrono::Utc::now().timestamp();
//!     let mut poller = StatusPoller::new(client, notifier, config.retry_period, now);
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     poller.run(shutdown_rx).await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod notifier;
pub mod poller;

pub use config::{BotConfig, Credentials};
pub use error::{BotError, Result};
pub use notifier::{Messenger, Notifier, TelegramMessenger};
pub use poller::{failure_message, CycleOutcome, StatusPoller, FAILURE_PREFIX};
