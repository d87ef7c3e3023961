#[cfg(test)]
mod tests;

use std::sync::Arc;

use chrono::Utc;
use teloxide::types::ChatId;
use thiserror::Error;

use crate::{
    availability,
    lookahead,
    messaging::{MessagingError, MessagingService, captions},
    payloads::{MediaInfo, NotificationType, OverseerrPayload, TautulliLastEpisodePayload,
        TautulliTranscodePayload},
    tmdb::{MetadataProvider, TmdbClient, TmdbError},
};

/// Errors surfaced to the webhook layer.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The metadata provider lookup failed.
    #[error("metadata provider lookup failed")]
    Provider(#[from] TmdbError),
    /// Sending the notification failed.
    #[error("failed to send notification")]
    Messaging(#[from] MessagingError),
}

type Result<T> = std::result::Result<T, RelayError>;

/// Turns webhook payloads into chat notifications.
///
/// Holds its collaborators as injected dependencies; every call captures
/// `now` once and runs the pure resolvers over already-fetched data.
pub struct RelayService {
    provider: Arc<dyn MetadataProvider>,
    messaging: Arc<dyn MessagingService>,
    chat_id: ChatId,
}

impl RelayService {
    /// Creates a new `RelayService`.
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        messaging: Arc<dyn MessagingService>,
        chat_id: ChatId,
    ) -> Self {
        Self { provider, messaging, chat_id }
    }

    /// Handles one Overseerr notification.
    ///
    /// Pending requests for unreleased media produce an upcoming-release
    /// message (or nothing, when there is no upcoming date to report);
    /// available media produce the announcement message.
    pub async fn process_overseerr(&self, payload: OverseerrPayload) -> Result<()> {
        let Some(media) = payload.media.clone() else {
            tracing::warn!("Overseerr payload without media record: {}", payload.subject);
            return Ok(());
        };

        if payload.notification_type != NotificationType::MediaAvailable {
            if media.is_movie() {
                return self.notify_upcoming_movie(&payload, media.tmdb_id()).await;
            }
            if let Some(season) = payload.requested_season() {
                return self.notify_upcoming_season(&payload, media.tmdb_id(), season).await;
            }
            tracing::debug!("Nothing to report for pending request: {}", payload.subject);
            return Ok(());
        }

        self.notify_available(&payload, &media).await
    }

    /// Reports the upcoming release window of a not-yet-available movie.
    async fn notify_upcoming_movie(
        &self,
        payload: &OverseerrPayload,
        tmdb_id: Option<u64>,
    ) -> Result<()> {
        let Some(tmdb_id) = tmdb_id else {
            tracing::debug!("No TMDB id for pending movie: {}", payload.subject);
            return Ok(());
        };

        let releases = self.provider.movie_release_dates(tmdb_id).await?;
        // One snapshot of "now" for the whole resolution.
        let decision = availability::resolve(&releases, Utc::now());
        tracing::debug!("Availability decision for {}: {decision:?}", payload.subject);

        match captions::upcoming_movie_caption(
            &payload.subject,
            payload.request.as_ref(),
            &decision,
        ) {
            Some(caption) => {
                self.messaging
                    .send_photo_message(self.chat_id, &payload.image, &caption)
                    .await?;
            }
            None => {
                tracing::debug!("No upcoming release for {}; suppressing", payload.subject);
            }
        }

        Ok(())
    }

    /// Reports the next unaired episode of a requested season.
    async fn notify_upcoming_season(
        &self,
        payload: &OverseerrPayload,
        tmdb_id: Option<u64>,
        season_number: u32,
    ) -> Result<()> {
        let Some(tmdb_id) = tmdb_id else {
            tracing::debug!("No TMDB id for pending season: {}", payload.subject);
            return Ok(());
        };

        let episodes = self.provider.season_episodes(tmdb_id, season_number).await?;

        match lookahead::next_unaired(&episodes, Utc::now()) {
            Some(next) => {
                let caption = captions::upcoming_episode_caption(
                    &payload.subject,
                    season_number,
                    payload.request.as_ref(),
                    &next,
                );
                self.messaging
                    .send_photo_message(self.chat_id, &payload.image, &caption)
                    .await?;
            }
            None => {
                tracing::debug!("Season {season_number} of {} fully aired; suppressing", payload.subject);
            }
        }

        Ok(())
    }

    /// Announces media that just became available.
    async fn notify_available(
        &self,
        payload: &OverseerrPayload,
        media: &MediaInfo,
    ) -> Result<()> {
        let Some(tmdb_id) = media.tmdb_id() else {
            // No provider record to enrich with; relay the payload as-is.
            let caption = captions::available_fallback_caption(
                &payload.event,
                &payload.subject,
                &payload.message,
                payload.request.as_ref(),
            );
            return Ok(self
                .messaging
                .send_photo_message(self.chat_id, &payload.image, &caption)
                .await?);
        };

        if media.is_movie() {
            let details = self.provider.movie_details(tmdb_id).await?;
            let caption = captions::available_movie_caption(&details, payload.request.as_ref());
            let photo = poster_or(&details.poster_path, &payload.image);
            self.messaging.send_photo_message(self.chat_id, &photo, &caption).await?;
        } else {
            let details = self.provider.tv_details(tmdb_id).await?;
            let caption = captions::available_tv_caption(
                &details,
                payload.requested_season(),
                payload.request.as_ref(),
            );
            let photo = poster_or(&details.poster_path, &payload.image);
            self.messaging.send_photo_message(self.chat_id, &photo, &caption).await?;
        }

        Ok(())
    }

    /// Handles one Tautulli transcoding notification.
    pub async fn process_transcode(&self, payload: TautulliTranscodePayload) -> Result<()> {
        if payload.transcode_info.transcode_decision == "Direct Play" {
            tracing::debug!("Direct Play for {}; nothing to report", payload.title);
            return Ok(());
        }

        let caption = captions::transcode_caption(&payload);

        // The poster is decoration; fall back to plain text when the title
        // cannot be resolved.
        let poster = match payload.themoviedb_id.parse::<u64>() {
            Ok(id) if id > 0 => match self.fetch_poster(id, &payload.media_type).await {
                Ok(poster) => poster,
                Err(e) => {
                    tracing::warn!("Could not fetch poster for {}: {e}", payload.title);
                    None
                }
            },
            _ => None,
        };

        match poster {
            Some(url) => self.messaging.send_photo_message(self.chat_id, &url, &caption).await?,
            None => self.messaging.send_text_message(self.chat_id, &caption).await?,
        }

        Ok(())
    }

    /// Handles one Tautulli playback notification, announcing it (plus a
    /// poll) only when the watched episode closes out its season.
    pub async fn process_last_episode(&self, payload: TautulliLastEpisodePayload) -> Result<()> {
        if payload.media_type == "movie" {
            tracing::debug!("{} is a movie; no season to close out", payload.title);
            return Ok(());
        }

        let Ok(tmdb_id) = payload.themoviedb_id.parse::<u64>() else {
            tracing::warn!("No TMDB id for series {}; skipping", payload.title);
            return Ok(());
        };

        let (Ok(season_number), Ok(episode_number)) = (
            payload.serie_info.season_num.parse::<u32>(),
            payload.serie_info.episode_num.parse::<u32>(),
        ) else {
            tracing::warn!("Unparseable season/episode numbers for {}", payload.title);
            return Ok(());
        };

        let details = self.provider.tv_details(tmdb_id).await?;
        let is_last_episode = details
            .seasons
            .iter()
            .any(|s| s.season_number == season_number && s.episode_count == episode_number);

        if !is_last_episode {
            tracing::debug!(
                "{} S{season_number}E{episode_number} is not a season finale; suppressing",
                payload.title
            );
            return Ok(());
        }

        let caption = captions::last_episode_caption(
            &payload.user,
            &payload.title,
            &payload.serie_info.season_num,
            &payload.serie_info.episode_num,
        );

        match details.poster_path.as_deref() {
            Some(path) => {
                self.messaging
                    .send_photo_message(self.chat_id, &TmdbClient::poster_url(path), &caption)
                    .await?;
            }
            None => self.messaging.send_text_message(self.chat_id, &caption).await?,
        }

        let question = captions::season_poll_question(
            &payload.user,
            &payload.title,
            &payload.serie_info.season_num,
        );
        self.messaging.send_poll(self.chat_id, &question, captions::season_poll_options()).await?;

        Ok(())
    }

    /// Poster URL for a title, when the provider has one.
    async fn fetch_poster(
        &self,
        tmdb_id: u64,
        media_type: &str,
    ) -> std::result::Result<Option<String>, TmdbError> {
        let poster_path = if media_type == "movie" {
            self.provider.movie_details(tmdb_id).await?.poster_path
        } else {
            self.provider.tv_details(tmdb_id).await?.poster_path
        };

        Ok(poster_path.as_deref().map(TmdbClient::poster_url))
    }
}

fn poster_or(poster_path: &Option<String>, fallback: &str) -> String {
    poster_path.as_deref().map(TmdbClient::poster_url).unwrap_or_else(|| fallback.to_string())
}
