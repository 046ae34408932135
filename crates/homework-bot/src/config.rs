//! Configuration for the notifier bot.
//!
//! Holds the credential gate that runs once at startup, the validated
//! [`BotConfig`] passed into the poller, and the on-disk locations used for
//! secrets and logs.
//!
//! # Storage Structure
//!
//! ```text
//! ~/.homework-bot/
//! ├── config/       # .env.local with secrets
//! └── logs/         # homework-bot.log and its rotated backups
//! ```
//!
//! # Environment Variables
//!
//! Required:
//! - `PRACTICUM_TOKEN`: OAuth token for the review API
//! - `TELEGRAM_TOKEN`: Bot token from @BotFather
//! - `TELEGRAM_CHAT_ID`: Chat that receives notifications
//!
//! Optional:
//! - `HOMEWORK_BOT_STATE_DIR`: Override the base state directory
//! - `HOMEWORK_BOT_LOG_DIR`: Override the log directory
//! - `HOMEWORK_BOT_CONFIG_DIR`: Override the config directory

use std::path::PathBuf;
use std::time::Duration;

use homework_api::DEFAULT_ENDPOINT;
use tracing::debug;

use crate::error::{BotError, Result};

/// Environment variable holding the review API token.
pub const PRACTICUM_TOKEN_ENV: &str = "PRACTICUM_TOKEN";

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Environment variable holding the target chat id.
pub const TELEGRAM_CHAT_ID_ENV: &str = "TELEGRAM_CHAT_ID";

/// Environment variable for custom state directory.
pub const STATE_DIR_ENV: &str = "HOMEWORK_BOT_STATE_DIR";

/// Environment variable for custom log directory.
pub const LOG_DIR_ENV: &str = "HOMEWORK_BOT_LOG_DIR";

/// Environment variable for custom config directory.
pub const CONFIG_DIR_ENV: &str = "HOMEWORK_BOT_CONFIG_DIR";

/// Default pause between polling cycles.
pub const DEFAULT_RETRY_PERIOD: Duration = Duration::from_secs(600);

/// Default timeout for one API request.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const DEFAULT_STATE_DIR: &str = ".homework-bot";
const LOGS_SUBDIR: &str = "logs";
const CONFIG_SUBDIR: &str = "config";
const LOG_FILE_NAME: &str = "homework-bot.log";

/// Get the bot state directory.
///
/// `HOMEWORK_BOT_STATE_DIR` if set, otherwise `~/.homework-bot`, falling back
/// to `.homework-bot` in the current directory when there is no home.
pub fn state_dir() -> PathBuf {
    std::env::var(STATE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(DEFAULT_STATE_DIR))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
        })
}

/// Get the logs directory.
pub fn logs_dir() -> PathBuf {
    std::env::var(LOG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(LOGS_SUBDIR))
}

/// Get the config directory.
pub fn config_dir() -> PathBuf {
    std::env::var(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| state_dir().join(CONFIG_SUBDIR))
}

/// Environment file for secrets.
pub fn env_file() -> PathBuf {
    config_dir().join(".env.local")
}

/// Path of the active log file.
pub fn log_file() -> PathBuf {
    logs_dir().join(LOG_FILE_NAME)
}

/// Ensure the config and log directories exist.
///
/// # Errors
/// Returns an error if any directory cannot be created.
pub fn ensure_all_dirs() -> std::io::Result<()> {
    std::fs::create_dir_all(logs_dir())?;
    std::fs::create_dir_all(config_dir())?;
    Ok(())
}

/// Load secrets from env files into the process environment.
///
/// The config directory file is read first, then `.env.local` or `.env` in
/// the working directory. Variables that are already set are not overridden.
pub fn load_env_files() {
    let env_path = env_file();
    if env_path.exists() {
        if let Err(e) = dotenvy::from_path(&env_path) {
            debug!(path = %env_path.display(), error = %e, "failed to load env file");
        }
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());
}

/// Raw secrets as found in the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub practicum_token: Option<String>,
    pub telegram_token: Option<String>,
    pub chat_id: Option<String>,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup.
    ///
    /// Values are trimmed; empty or whitespace-only values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            practicum_token: get(PRACTICUM_TOKEN_ENV),
            telegram_token: get(TELEGRAM_TOKEN_ENV),
            chat_id: get(TELEGRAM_CHAT_ID_ENV),
        }
    }

    /// True iff all three secrets are present and non-empty.
    pub fn check_tokens(&self) -> bool {
        self.missing().is_empty()
    }

    /// Names of the variables that are absent or empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            (PRACTICUM_TOKEN_ENV, &self.practicum_token),
            (TELEGRAM_TOKEN_ENV, &self.telegram_token),
            (TELEGRAM_CHAT_ID_ENV, &self.chat_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| name)
        .collect()
    }
}

/// Validated configuration for the poller.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// OAuth token for the review API.
    pub practicum_token: String,
    /// Telegram bot token.
    pub telegram_token: String,
    /// Chat that receives notifications.
    pub chat_id: String,
    /// Status endpoint.
    pub endpoint: String,
    /// Pause after every cycle, successful or not.
    pub retry_period: Duration,
    /// Upper bound for one API request.
    pub request_timeout: Duration,
}

impl BotConfig {
    /// Validate credentials into a config with default tunables.
    ///
    /// # Errors
    /// Returns [`BotError::MissingCredentials`] naming every absent variable.
    pub fn from_credentials(credentials: Credentials) -> Result<Self> {
        let missing = credentials.missing();
        match credentials {
            Credentials {
                practicum_token: Some(practicum_token),
                telegram_token: Some(telegram_token),
                chat_id: Some(chat_id),
            } if missing.is_empty() => Ok(Self {
                practicum_token,
                telegram_token,
                chat_id,
                endpoint: DEFAULT_ENDPOINT.to_string(),
                retry_period: DEFAULT_RETRY_PERIOD,
                request_timeout: DEFAULT_REQUEST_TIMEOUT,
            }),
            _ => Err(BotError::MissingCredentials(missing)),
        }
    }

    /// Sets the status endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the pause between cycles.
    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    /// Sets the API request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    fn full() -> Credentials {
        Credentials::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]))
    }

    #[test]
    fn test_all_tokens_present() {
        let creds = full();
        assert!(creds.check_tokens());
        assert!(creds.missing().is_empty());
    }

    #[test]
    fn test_missing_token_fails_gate() {
        let creds = Credentials::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_CHAT_ID", "42"),
        ]));
        assert!(!creds.check_tokens());
        assert_eq!(creds.missing(), vec!["TELEGRAM_TOKEN"]);
    }

    #[test]
    fn test_empty_value_counts_as_missing() {
        let creds = Credentials::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", ""),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", ""),
        ]));
        assert_eq!(creds.missing(), vec!["PRACTICUM_TOKEN", "TELEGRAM_CHAT_ID"]);
    }

    #[test]
    fn test_values_are_trimmed() {
        let creds = Credentials::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", " p\n"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "  @homework_updates "),
        ]));
        assert_eq!(creds.practicum_token.as_deref(), Some("p"));
        assert_eq!(creds.chat_id.as_deref(), Some("@homework_updates"));
    }

    #[test]
    fn test_whitespace_only_counts_as_missing() {
        let creds = Credentials::from_lookup(lookup(&[
            ("PRACTICUM_TOKEN", "p"),
            ("TELEGRAM_TOKEN", "t"),
            ("TELEGRAM_CHAT_ID", "   "),
        ]));
        assert!(!creds.check_tokens());
        assert_eq!(creds.missing(), vec!["TELEGRAM_CHAT_ID"]);
    }

    #[test]
    fn test_default_credentials_miss_everything() {
        assert_eq!(Credentials::default().missing().len(), 3);
    }

    #[test]
    fn test_config_from_credentials() {
        let config = BotConfig::from_credentials(full()).unwrap();
        assert_eq!(config.practicum_token, "p");
        assert_eq!(config.chat_id, "42");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.retry_period, Duration::from_secs(600));
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_config_rejects_missing_credentials() {
        match BotConfig::from_credentials(Credentials::default()) {
            Err(BotError::MissingCredentials(names)) => assert_eq!(names.len(), 3),
            other => panic!("expected MissingCredentials, got {:?}", other),
        }
    }

    #[test]
    fn test_config_builder() {
        let config = BotConfig::from_credentials(full())
            .unwrap()
            .with_endpoint("http://localhost:8080/")
            .with_retry_period(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(1));

        assert_eq!(config.endpoint, "http://localhost:8080/");
        assert_eq!(config.retry_period, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
    }

    // Environment variables are process-global, so path tests only check
    // the file and directory names.
    #[test]
    fn test_log_file_name() {
        let file = log_file();
        assert_eq!(file.file_name().unwrap(), "homework-bot.log");
    }

    #[test]
    fn test_env_file_name() {
        let file = env_file();
        assert_eq!(file.file_name().unwrap(), ".env.local");
    }
}
