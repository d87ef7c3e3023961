//! Wire models for the TMDB REST endpoints this relay consumes, plus the
//! lenient conversions into the core types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use crate::{
    availability::{CountryReleases, RegionalReleaseSet, ReleaseDateEntry, ReleaseKind},
    lookahead::EpisodeRecord,
};

/// A genre as returned by the detail endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    /// TMDB genre id.
    pub id: u64,
    /// Human readable name.
    pub name: String,
}

/// Response of `GET /movie/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDetails {
    /// TMDB movie id.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Original language title.
    pub original_title: String,
    /// Marketing tagline, often empty.
    #[serde(default)]
    pub tagline: String,
    /// Plot summary.
    #[serde(default)]
    pub overview: String,
    /// Poster path fragment, joined with the image base URL.
    pub poster_path: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Average vote, 0-10.
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes.
    #[serde(default)]
    pub vote_count: u64,
    /// IMDB cross-reference id, when known.
    pub imdb_id: Option<String>,
}

/// One season line of a series detail response.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSummary {
    /// Season number, 0 for specials.
    pub season_number: u32,
    /// Number of episodes in the season.
    pub episode_count: u32,
}

/// Response of `GET /tv/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct TvDetails {
    /// TMDB series id.
    pub id: u64,
    /// Localized name.
    pub name: String,
    /// Original language name.
    pub original_name: String,
    /// Marketing tagline, often empty.
    #[serde(default)]
    pub tagline: String,
    /// Plot summary.
    #[serde(default)]
    pub overview: String,
    /// Poster path fragment, joined with the image base URL.
    pub poster_path: Option<String>,
    /// Genres.
    #[serde(default)]
    pub genres: Vec<Genre>,
    /// Average vote, 0-10.
    #[serde(default)]
    pub vote_average: f64,
    /// Number of votes.
    #[serde(default)]
    pub vote_count: u64,
    /// Total episode count across seasons.
    #[serde(default)]
    pub number_of_episodes: u32,
    /// Total season count.
    #[serde(default)]
    pub number_of_seasons: u32,
    /// Per-season summaries.
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
}

/// Response of `GET /movie/{id}/release_dates`.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDatesResponse {
    /// TMDB movie id.
    pub id: u64,
    /// Per-country release groups, in provider order.
    pub results: Vec<CountryReleaseDates>,
}

/// Release dates for one country.
#[derive(Debug, Clone, Deserialize)]
pub struct CountryReleaseDates {
    /// ISO 3166-1 alpha-2 country code.
    pub iso_3166_1: String,
    /// Dated releases, in provider order.
    pub release_dates: Vec<ReleaseDateItem>,
}

/// One dated release.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDateItem {
    /// RFC 3339 timestamp of the release.
    pub release_date: String,
    /// Numeric release type code, 1-6.
    #[serde(rename = "type")]
    pub release_type: u8,
}

impl From<ReleaseDatesResponse> for RegionalReleaseSet {
    /// Converts the wire shape into the core release set.
    ///
    /// Entries with an unparseable date or an unknown type code are dropped
    /// individually; a bad entry never aborts the whole conversion.
    fn from(response: ReleaseDatesResponse) -> Self {
        let countries = response
            .results
            .into_iter()
            .map(|group| CountryReleases {
                country: group.iso_3166_1,
                entries: group
                    .release_dates
                    .into_iter()
                    .filter_map(|item| {
                        let kind = ReleaseKind::from_code(item.release_type)?;
                        let date = parse_release_timestamp(&item.release_date)?;
                        Some(ReleaseDateEntry { kind, date })
                    })
                    .collect(),
            })
            .collect();

        RegionalReleaseSet { countries }
    }
}

/// Response of `GET /tv/{id}/season/{n}`.
#[derive(Debug, Clone, Deserialize)]
pub struct SeasonResponse {
    /// Season number.
    pub season_number: u32,
    /// Episodes in broadcast order.
    pub episodes: Vec<EpisodeItem>,
}

/// One episode of a season response.
#[derive(Debug, Clone, Deserialize)]
pub struct EpisodeItem {
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode title.
    pub name: String,
    /// Air date as `YYYY-MM-DD`, missing for unscheduled episodes.
    pub air_date: Option<String>,
}

impl From<EpisodeItem> for EpisodeRecord {
    fn from(item: EpisodeItem) -> Self {
        EpisodeRecord {
            episode_number: item.episode_number,
            name: item.name,
            air_date: item.air_date.as_deref().and_then(parse_air_date),
        }
    }
}

/// Parses the RFC 3339 timestamps of the release-dates endpoint. Bad input
/// means the entry is treated as absent.
fn parse_release_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.with_timezone(&Utc))
}

/// Parses the plain `YYYY-MM-DD` air dates of the season endpoint.
fn parse_air_date(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
