#![warn(missing_docs)]
//! A notification relay between a media-request manager (Overseerr), a media
//! server activity monitor (Tautulli) and a Telegram chat.
//!
//! Incoming webhook payloads are enriched with TMDB metadata; for titles that
//! are not available yet the relay resolves the next release window (or the
//! next unaired episode) and reports it, suppressing the notification when
//! there is nothing upcoming.

/// Release-availability resolution for movies.
pub mod availability;
/// The application configuration.
pub mod config;
/// Season/episode lookahead for series.
pub mod lookahead;
/// The service for sending messages to the chat.
pub mod messaging;
/// Webhook payload shapes.
pub mod payloads;
/// The orchestration between webhooks, metadata and messaging.
pub mod relay;
/// The client for the TMDB metadata API.
pub mod tmdb;
/// The HTTP ingress for webhooks.
pub mod webhook;

use std::{net::SocketAddr, sync::Arc};

use teloxide::{Bot, types::ChatId};

use crate::{
    config::Config, messaging::TelegramMessagingService, relay::RelayService, tmdb::TmdbClient,
};

/// Runs the relay.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let bot = Bot::new(config.telegram_bot_token.clone());
    let messaging = Arc::new(TelegramMessagingService::new(bot));
    let provider = Arc::new(TmdbClient::new(&config.tmdb_api_key, &config.tmdb_base_url)?);

    let relay = Arc::new(RelayService::new(
        provider,
        messaging,
        ChatId(config.telegram_chat_id),
    ));
    let app = webhook::router(relay);

    let addr: SocketAddr = format!("{}:{}", config.server_host, config.server_port).parse()?;
    tracing::info!("Starting webhook server on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
