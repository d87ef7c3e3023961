pub mod captions;

use async_trait::async_trait;
use mockall::automock;
use teloxide::{
    prelude::*,
    types::{ChatId, InputFile, InputPollOption, ParseMode},
};
use thiserror::Error;
use url::Url;

/// Errors raised by the chat transport.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// The Telegram API rejected a request.
    #[error("Telegram API request failed: {0}")]
    TeloxideRequest(#[from] teloxide::RequestError),
    /// A photo URL from a webhook or provider was not a valid URL.
    #[error("invalid photo URL: {0}")]
    InvalidPhotoUrl(#[from] url::ParseError),
}

type Result<T> = std::result::Result<T, MessagingError>;

/// Trait for sending notifications to the chat.
///
/// Handlers receive this as a dependency; nothing in the crate holds a
/// process-wide chat client.
#[automock]
#[async_trait]
pub trait MessagingService: Send + Sync {
    /// Sends a photo with an HTML caption.
    async fn send_photo_message(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<()>;

    /// Sends a plain HTML text message.
    async fn send_text_message(&self, chat_id: ChatId, text: &str) -> Result<()>;

    /// Sends a poll.
    async fn send_poll(&self, chat_id: ChatId, question: &str, options: Vec<String>)
    -> Result<()>;
}

/// Telegram messaging service.
pub struct TelegramMessagingService {
    bot: Bot,
}

impl TelegramMessagingService {
    /// Wraps a teloxide bot.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessagingService for TelegramMessagingService {
    async fn send_photo_message(
        &self,
        chat_id: ChatId,
        photo_url: &str,
        caption: &str,
    ) -> Result<()> {
        let photo = InputFile::url(Url::parse(photo_url)?);

        self.bot
            .send_photo(chat_id, photo)
            .caption(caption.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }

    async fn send_text_message(&self, chat_id: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(chat_id, text.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }

    async fn send_poll(
        &self,
        chat_id: ChatId,
        question: &str,
        options: Vec<String>,
    ) -> Result<()> {
        let options = options.into_iter().map(InputPollOption::new);

        self.bot
            .send_poll(chat_id, question.to_string(), options)
            .await
            .map(|_| ())
            .map_err(MessagingError::TeloxideRequest)
    }
}
