//! Status poller: the fetch, check, format, notify loop.

use std::time::Duration;

use homework_api::{check_response, current_date, parse_status, ApiError, HomeworkSource};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::notifier::{Messenger, Notifier};

/// Prefix of the message sent when a cycle fails.
pub const FAILURE_PREFIX: &str = "Сбой в работе программы: ";

/// Result of one polling cycle.
#[derive(Debug)]
pub enum CycleOutcome {
    /// A status message was produced and the cursor advanced.
    Success {
        /// The formatted status message.
        message: String,
        /// Whether the message was delivered in this cycle.
        delivered: bool,
    },
    /// Some step of the cycle failed; the cursor was left untouched.
    Failure {
        /// What went wrong.
        error: ApiError,
        /// Whether the failure notice was delivered in this cycle.
        delivered: bool,
    },
}

impl CycleOutcome {
    /// Whether the cycle completed without error.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Whether a message went out during the cycle.
    pub fn delivered(&self) -> bool {
        match self {
            Self::Success { delivered, .. } | Self::Failure { delivered, .. } => *delivered,
        }
    }
}

/// Text of the notification sent for a failed cycle.
pub fn failure_message(error: &ApiError) -> String {
    format!("{}{}", FAILURE_PREFIX, error)
}

/// Polls the review API and forwards status changes to the chat.
///
/// The poller owns the cursor; the notifier owns the last delivered text.
/// Cycles run strictly one after another with a fixed pause in between.
pub struct StatusPoller<S, M> {
    source: S,
    notifier: Notifier<M>,
    retry_period: Duration,
    /// Unix timestamp sent as `since` on the next fetch.
    cursor: i64,
}

impl<S: HomeworkSource, M: Messenger> StatusPoller<S, M> {
    /// Creates a poller starting at `cursor`.
    pub fn new(source: S, notifier: Notifier<M>, retry_period: Duration, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            retry_period,
            cursor,
        }
    }

    /// Current cursor.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// The notifier used for delivery.
    pub fn notifier(&self) -> &Notifier<M> {
        &self.notifier
    }

    /// Fetch, check and format the most recent homework status.
    ///
    /// Returns the message along with the server cursor, if any.
    async fn poll(&self) -> Result<(String, Option<i64>), ApiError> {
        let response = self.source.fetch(self.cursor).await?;
        let homeworks = check_response(&response)?;
        // Server order is trusted: the first record is taken as the latest.
        let message = parse_status(&homeworks[0])?;
        Ok((message, current_date(&response)))
    }

    /// Run a single cycle without sleeping.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        debug!(since = self.cursor, "polling cycle started");

        match self.poll().await {
            Ok((message, next_cursor)) => {
                let delivered = self.notifier.notify_if_changed(&message).await;
                match next_cursor {
                    Some(next) => {
                        debug!(from = self.cursor, to = next, "advancing cursor");
                        self.cursor = next;
                    }
                    None => warn!(cursor = self.cursor, "response has no current_date, cursor kept"),
                }
                CycleOutcome::Success { message, delivered }
            }
            Err(e) => {
                let message = failure_message(&e);
                error!(kind = e.kind(), error = %e, "polling cycle failed");
                let delivered = self.notifier.notify_if_changed(&message).await;
                CycleOutcome::Failure {
                    error: e,
                    delivered,
                }
            }
        }
    }

    /// Run cycles until `shutdown` flips to true.
    ///
    /// Every cycle, successful or not, is followed by the same fixed pause.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        info!(
            retry_period_secs = self.retry_period.as_secs(),
            cursor = self.cursor,
            "starting status poller"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_cycle().await;

            if wait_or_shutdown(self.retry_period, &mut shutdown).await {
                debug!("poller received shutdown signal");
                break;
            }
        }

        info!(cursor = self.cursor, "status poller stopped");
    }
}

/// Sleep for `period`; returns true if shutdown was requested meanwhile.
async fn wait_or_shutdown(period: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = tokio::time::sleep(period);
    tokio::pin!(sleep);

    loop {
        tokio::select! {
            _ = &mut sleep => return *shutdown.borrow(),
            changed = shutdown.changed() => {
                if changed.is_err() {
                    // Sender gone: nobody can ask for shutdown anymore.
                    (&mut sleep).await;
                    return false;
                }
                if *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}
