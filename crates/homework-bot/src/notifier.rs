//! Delivery of notifications to the chat.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use tracing::{debug, error, info};

use crate::error::Result;

/// Outbound channel that can put a plain-text message into a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send `text` to `chat_id`. Fails on transport errors.
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// [`Messenger`] backed by the Telegram bot API.
#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    /// Creates a messenger for the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

/// Numeric ids address chats directly; anything else is a channel username.
///
/// The id is expected to be trimmed already, see [`Credentials`](crate::Credentials).
pub fn recipient(chat_id: &str) -> Recipient {
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(chat_id.to_string()),
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        self.bot.send_message(recipient(chat_id), text).await?;
        Ok(())
    }
}

/// Sends messages to one chat, suppressing repeats of the last delivered text.
pub struct Notifier<M> {
    messenger: M,
    chat_id: String,
    /// Most recently delivered text, status or failure.
    last_message: String,
}

impl<M: Messenger> Notifier<M> {
    /// Creates a notifier for `chat_id`.
    pub fn new(messenger: M, chat_id: impl Into<String>) -> Self {
        Self {
            messenger,
            chat_id: chat_id.into(),
            last_message: String::new(),
        }
    }

    /// The last text that was actually delivered.
    pub fn last_message(&self) -> &str {
        &self.last_message
    }

    /// Send `message` once, best effort.
    ///
    /// Delivery errors are logged and swallowed. Returns whether the message
    /// went out.
    pub async fn deliver(&self, message: &str) -> bool {
        info!(chat_id = %self.chat_id, "sending message to telegram");
        match self.messenger.send_message(&self.chat_id, message).await {
            Ok(()) => {
                debug!(chat_id = %self.chat_id, "message sent");
                true
            }
            Err(e) => {
                error!(chat_id = %self.chat_id, error = %e, "message not sent");
                false
            }
        }
    }

    /// Deliver `message` unless it equals the last delivered text.
    ///
    /// The last message only changes on a successful delivery, so a failed
    /// send is attempted again on the next cycle.
    pub async fn notify_if_changed(&mut self, message: &str) -> bool {
        if message == self.last_message {
            debug!("message unchanged, skipping delivery");
            return false;
        }

        let delivered = self.deliver(message).await;
        if delivered {
            self.last_message = message.to_string();
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BotError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingMessenger {
        sent: Arc<Mutex<Vec<(String, String)>>>,
        failing: Arc<AtomicBool>,
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BotError::Delivery("network down".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    #[test]
    fn test_recipient_numeric_chat() {
        assert_eq!(recipient("-100123"), Recipient::Id(ChatId(-100123)));
    }

    #[test]
    fn test_recipient_channel_username() {
        assert_eq!(
            recipient("@homework_updates"),
            Recipient::ChannelUsername("@homework_updates".to_string())
        );
    }

    #[tokio::test]
    async fn test_deliver_sends_to_chat() {
        let messenger = RecordingMessenger::default();
        let notifier = Notifier::new(messenger.clone(), "42");

        assert!(notifier.deliver("hello").await);
        assert_eq!(
            messenger.sent.lock().unwrap().as_slice(),
            &[("42".to_string(), "hello".to_string())]
        );
    }

    #[tokio::test]
    async fn test_deliver_swallows_errors() {
        let messenger = RecordingMessenger::default();
        messenger.failing.store(true, Ordering::SeqCst);
        let notifier = Notifier::new(messenger.clone(), "42");

        assert!(!notifier.deliver("hello").await);
        assert!(messenger.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_message_sent_once() {
        let messenger = RecordingMessenger::default();
        let mut notifier = Notifier::new(messenger.clone(), "42");

        assert!(notifier.notify_if_changed("status").await);
        assert!(!notifier.notify_if_changed("status").await);
        assert!(notifier.notify_if_changed("other").await);
        assert!(notifier.notify_if_changed("status").await);

        assert_eq!(messenger.sent.lock().unwrap().len(), 3);
        assert_eq!(notifier.last_message(), "status");
    }

    #[tokio::test]
    async fn test_failed_delivery_does_not_update_last_message() {
        let messenger = RecordingMessenger::default();
        let mut notifier = Notifier::new(messenger.clone(), "42");

        messenger.failing.store(true, Ordering::SeqCst);
        assert!(!notifier.notify_if_changed("status").await);
        assert_eq!(notifier.last_message(), "");

        messenger.failing.store(false, Ordering::SeqCst);
        assert!(notifier.notify_if_changed("status").await);
        assert_eq!(notifier.last_message(), "status");
    }
}
