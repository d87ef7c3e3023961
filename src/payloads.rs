//! Webhook payload shapes for the request manager (Overseerr) and the media
//! server activity monitor (Tautulli). Field names mirror the wire format.

use serde::{Deserialize, Serialize};

/// Overseerr notification categories the relay distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    /// A request was filed and is pending.
    #[serde(rename = "MEDIA_PENDING")]
    MediaPending,
    /// A request was auto-approved.
    #[serde(rename = "MEDIA_AUTO_APPROVED")]
    MediaAutoApproved,
    /// The requested media is now available on the server.
    #[serde(rename = "MEDIA_AVAILABLE")]
    MediaAvailable,
    /// Anything else; treated like a pending request.
    #[serde(other)]
    Other,
}

/// The media record attached to an Overseerr notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaInfo {
    /// `"movie"` or `"tv"`.
    pub media_type: String,
    /// TMDB id as a string, `"0"` or empty when unknown.
    #[serde(rename = "tmdbId", default)]
    pub tmdb_id: String,
}

impl MediaInfo {
    /// True for movie payloads.
    pub fn is_movie(&self) -> bool {
        self.media_type == "movie"
    }

    /// The TMDB id, if the payload carried a usable one.
    pub fn tmdb_id(&self) -> Option<u64> {
        match self.tmdb_id.parse::<u64>() {
            Ok(0) | Err(_) => None,
            Ok(id) => Some(id),
        }
    }
}

/// Who requested the media.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Overseerr request id.
    #[serde(default)]
    pub request_id: String,
    /// Username of the requester.
    #[serde(rename = "requestedBy_username")]
    pub requested_by_username: String,
    /// Avatar URL of the requester.
    #[serde(rename = "requestedBy_avatar", default)]
    pub requested_by_avatar: String,
}

/// Free-form name/value extras; Overseerr uses these for requested seasons.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extra {
    /// Extra name, e.g. `"Requested Seasons"`.
    pub name: Option<String>,
    /// Extra value.
    pub value: Option<String>,
}

/// The Overseerr webhook payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverseerrPayload {
    /// Notification category.
    pub notification_type: NotificationType,
    /// Event headline, e.g. "Movie Request Approved".
    #[serde(default)]
    pub event: String,
    /// Title with year, e.g. "Dune: Part Two (2024)".
    pub subject: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
    /// Cover image URL supplied by Overseerr.
    #[serde(default)]
    pub image: String,
    /// The media record, absent for non-media events.
    pub media: Option<MediaInfo>,
    /// The request record, absent for system events.
    pub request: Option<RequestInfo>,
    /// Extras such as the requested seasons.
    #[serde(default)]
    pub extra: Vec<Extra>,
}

impl OverseerrPayload {
    /// First requested season number, when present in the extras.
    ///
    /// Overseerr sends the seasons as a comma separated list; the relay
    /// reports the lookahead for the first one.
    pub fn requested_season(&self) -> Option<u32> {
        self.extra
            .iter()
            .find(|e| e.name.as_deref() == Some("Requested Seasons"))
            .and_then(|e| e.value.as_deref())
            .and_then(|v| v.split(',').next())
            .and_then(|v| v.trim().parse().ok())
    }
}

/// Stream details of a Tautulli transcode notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscodeInfo {
    /// `"transcode"`, `"copy"` or `"Direct Play"`.
    pub transcode_decision: String,
    /// Video transcode decision.
    #[serde(default)]
    pub video_decision: String,
    /// Audio transcode decision.
    #[serde(default)]
    pub audio_decision: String,
    /// Source container.
    #[serde(default)]
    pub container: String,
    /// Target container.
    #[serde(default)]
    pub transcode_container: String,
    /// Source video codec.
    #[serde(default)]
    pub video_codec: String,
    /// Target video codec.
    #[serde(default)]
    pub transcode_video_codec: String,
    /// Source audio codec.
    #[serde(default)]
    pub audio_codec: String,
    /// Target audio codec.
    #[serde(default)]
    pub transcode_audio_codec: String,
}

/// Tautulli payload for a transcoding alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TautulliTranscodePayload {
    /// Media title.
    pub title: String,
    /// Plex user watching the stream.
    pub user: String,
    /// Player device name.
    #[serde(default)]
    pub player: String,
    /// Playback action, e.g. "play".
    #[serde(default)]
    pub action: String,
    /// `"movie"` or `"episode"`.
    pub media_type: String,
    /// TMDB id as a string, when Tautulli could map it.
    #[serde(default)]
    pub themoviedb_id: String,
    /// Stream details.
    pub transcode_info: TranscodeInfo,
}

/// Season/episode position of a Tautulli episode notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerieInfo {
    /// Episode number being watched.
    pub episode_num: String,
    /// Season number being watched.
    pub season_num: String,
}

/// Tautulli payload for the "watching the last episode" alert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TautulliLastEpisodePayload {
    /// Series title.
    pub title: String,
    /// Plex user watching the stream.
    pub user: String,
    /// `"movie"` or `"episode"`.
    pub media_type: String,
    /// TMDB id as a string, when Tautulli could map it.
    #[serde(default)]
    pub themoviedb_id: String,
    /// Season/episode position.
    pub serie_info: SerieInfo,
}
