//! Message text construction. All functions here are pure; the relay decides
//! what to send and the transport decides how.

use chrono::{DateTime, Utc};
use teloxide::utils::html;

use crate::{
    availability::AvailabilityDecision,
    lookahead::EpisodeLookahead,
    payloads::{RequestInfo, TautulliTranscodePayload},
    tmdb::{MovieDetails, TvDetails},
};

const MAX_PLOT_LEN: usize = 600;

fn format_date(date: DateTime<Utc>) -> String {
    date.format("%d/%m/%Y").to_string()
}

fn format_optional_date(date: Option<DateTime<Utc>>) -> String {
    date.map(format_date).unwrap_or_else(|| "Not available".to_string())
}

fn requester_link(request: Option<&RequestInfo>) -> String {
    match request {
        Some(r) => format!(
            "<a href=\"{}\">{}</a>",
            r.requested_by_avatar,
            html::escape(&r.requested_by_username)
        ),
        None => "someone".to_string(),
    }
}

fn truncated_plot(overview: &str) -> String {
    if overview.chars().count() > MAX_PLOT_LEN {
        let cut: String = overview.chars().take(MAX_PLOT_LEN).collect();
        format!("{}...", html::escape(&cut))
    } else {
        html::escape(overview)
    }
}

/// Caption for a movie that was requested before its release.
///
/// Returns `None` for [`AvailabilityDecision::NoUpcomingRelease`]; the caller
/// suppresses the notification entirely.
pub fn upcoming_movie_caption(
    subject: &str,
    request: Option<&RequestInfo>,
    decision: &AvailabilityDecision,
) -> Option<String> {
    let mut caption = format!(
        "🎬 <strong>Time travel alert!</strong> 🕒\n\n\
         Looks like {} tried to jump ahead in time requesting <strong>{}</strong>, \
         but it has not been released yet.\n\
         The server will grab it automatically once it is out on digital! 🚀\n\n",
        requester_link(request),
        html::escape(subject),
    );

    match decision {
        AvailabilityDecision::PrimaryRegion(primary) => {
            caption.push_str(&format!(
                "🇪🇸 <strong>Release dates (ES)</strong>\n\
                 \u{a0}\u{a0}\u{a0}Cinema: {}\n\
                 \u{a0}\u{a0}\u{a0}Digital: {}\n\
                 🇺🇸 <strong>Release dates (US)</strong>\n\
                 \u{a0}\u{a0}\u{a0}Cinema: {}\n\
                 \u{a0}\u{a0}\u{a0}Digital: {}\n",
                format_optional_date(primary.cinema_es),
                format_optional_date(primary.digital_es),
                format_optional_date(primary.cinema_us),
                format_optional_date(primary.digital_us),
            ));
            Some(caption)
        }
        AvailabilityDecision::FallbackRegion { country, cinema, digital } => {
            caption.push_str(&format!(
                "<strong>Release dates ({})</strong>\n\
                 \u{a0}\u{a0}\u{a0}Cinema: {}\n\
                 \u{a0}\u{a0}\u{a0}Digital: {}\n",
                html::escape(country),
                format_date(*cinema),
                format_optional_date(*digital),
            ));
            Some(caption)
        }
        AvailabilityDecision::NoUpcomingRelease => None,
    }
}

/// Caption for a TV season that was requested before it finished airing.
pub fn upcoming_episode_caption(
    subject: &str,
    season_number: u32,
    request: Option<&RequestInfo>,
    next: &EpisodeLookahead,
) -> String {
    format!(
        "🎬 <strong>Time travel alert!</strong> 🕒\n\n\
         Looks like {} tried to jump ahead in time requesting <strong>season {}</strong> \
         of <strong>{}</strong>; it is not fully out yet.\n\n\
         The server will grab the season once it has aired completely! 🚀\n\n\
         <strong>📅 Air date</strong> of the next episode:\n\
         <strong>{} - {}</strong>\n",
        requester_link(request),
        season_number,
        html::escape(subject),
        html::escape(&next.episode_name),
        format_date(next.air_date),
    )
}

/// Caption for a movie that just became available.
pub fn available_movie_caption(details: &MovieDetails, request: Option<&RequestInfo>) -> String {
    let mut caption = format!(
        "<strong>New movie - {} </strong>\n\
         <strong>({})</strong>\n\
         <strong>Genres:</strong> {}\n\n",
        html::escape(&details.title),
        html::escape(&details.original_title),
        genres_line(details.genres.iter().map(|g| g.name.as_str())),
    );

    if !details.tagline.is_empty() {
        caption.push_str(&format!("<strong>{}</strong>\n", html::escape(&details.tagline)));
    }
    caption.push_str(&format!("{}\n\n", truncated_plot(&details.overview)));

    if let Some(request) = request {
        caption.push_str(&format!("<strong>Requested by:</strong> {}\n", requester_link(Some(request))));
    }
    caption.push_str("<strong>Status:</strong> Available\n\n");

    caption.push_str(&format!(
        "<a href=\"https://www.themoviedb.org/movie/{}\">View on TMDB</a>\n",
        details.id
    ));
    if let Some(imdb_id) = &details.imdb_id {
        caption.push_str(&format!(
            "<a href=\"https://www.imdb.com/title/{}\">View on IMDB</a>\n",
            html::escape(imdb_id)
        ));
    }

    caption
}

/// Caption for a series (or season) that just became available.
pub fn available_tv_caption(
    details: &TvDetails,
    requested_season: Option<u32>,
    request: Option<&RequestInfo>,
) -> String {
    let mut caption = format!(
        "<strong>New series - {} </strong>\n\
         <strong>({})</strong>\n\
         <strong>Genres:</strong> {}\n\n",
        html::escape(&details.name),
        html::escape(&details.original_name),
        genres_line(details.genres.iter().map(|g| g.name.as_str())),
    );

    caption.push_str(&format!("{}\n\n", truncated_plot(&details.overview)));

    if let Some(request) = request {
        caption.push_str(&format!("<strong>Requested by:</strong> {}\n", requester_link(Some(request))));
    }
    caption.push_str("<strong>Status:</strong> Available\n");
    if let Some(season) = requested_season {
        caption.push_str(&format!("<strong>Downloaded season:</strong> {season}\n"));
    }
    caption.push_str(&format!(
        "<strong>Episodes:</strong> {}\n<strong>Seasons:</strong> {}\n\n",
        details.number_of_episodes, details.number_of_seasons,
    ));

    caption.push_str(&format!(
        "<a href=\"https://www.themoviedb.org/tv/{}\">View on TMDB</a>\n",
        details.id
    ));

    caption
}

/// Plain caption for media the provider knows nothing about.
pub fn available_fallback_caption(
    event: &str,
    subject: &str,
    message: &str,
    request: Option<&RequestInfo>,
) -> String {
    let mut caption = format!(
        "<strong>{} {}</strong>\n{}\n\n",
        html::escape(event),
        html::escape(subject),
        html::escape(message),
    );

    if let Some(request) = request {
        caption.push_str(&format!("<strong>Requested by:</strong> {}\n", requester_link(Some(request))));
    }

    caption
}

/// Caption for a transcoding alert.
pub fn transcode_caption(payload: &TautulliTranscodePayload) -> String {
    let info = &payload.transcode_info;
    let or_na = |s: &str| if s.is_empty() { "N/A".to_string() } else { html::escape(s) };

    format!(
        "🚨 <strong>{} - Transcoding alert</strong> 🚨\n\n\
         👤 <strong>User:</strong> {}\n\
         🔄 <strong>Action:</strong> {}\n\
         ▶️ <strong>Player:</strong> {}\n\
         📦 <strong>Container:</strong> {} -> {}\n\n\
         🎬 <strong>Video:</strong> {} ({} -> {})\n\
         🔊 <strong>Audio:</strong> {} ({} -> {})\n\n\
         🔥 The NAS is on fire! 🔥",
        html::escape(&payload.title),
        html::escape(&payload.user),
        or_na(&payload.action),
        or_na(&payload.player),
        or_na(&info.container),
        or_na(&info.transcode_container),
        or_na(&info.video_decision),
        or_na(&info.video_codec),
        or_na(&info.transcode_video_codec),
        or_na(&info.audio_decision),
        or_na(&info.audio_codec),
        or_na(&info.transcode_audio_codec),
    )
}

/// Caption announcing someone is watching the last episode of a season.
pub fn last_episode_caption(
    user: &str,
    title: &str,
    season_number: &str,
    episode_number: &str,
) -> String {
    format!(
        "🎬 <strong>Heads up!</strong> 🎬\n\n\
         <strong>{}</strong> is watching the last episode ({}) of season {} of \
         <strong>'{}'</strong>\n\n\
         Get ready to say goodbye! 🥺",
        html::escape(user),
        html::escape(episode_number),
        html::escape(season_number),
        html::escape(title),
    )
}

/// Poll question asked once a season has been binged to the end.
pub fn season_poll_question(user: &str, title: &str, season_number: &str) -> String {
    format!(
        "What do we do with season {} of {} now that {} has devoured all of it?",
        season_number, title, user
    )
}

/// Fixed answers for the end-of-season poll.
pub fn season_poll_options() -> Vec<String> {
    vec![
        "Delete it and make room for more shows 🚀".to_string(),
        "Keep it for a nostalgic rewatch 🍿".to_string(),
        "Let fate decide 🌌".to_string(),
    ]
}

fn genres_line<'a>(genres: impl Iterator<Item = &'a str>) -> String {
    let joined = genres.map(html::escape).collect::<Vec<_>>().join(", ");
    if joined.is_empty() { "Unknown".to_string() } else { joined }
}
