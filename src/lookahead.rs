use chrono::{DateTime, Utc};

/// One episode of a season, in broadcast order.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRecord {
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode title.
    pub name: String,
    /// When the episode airs. Absent when the provider did not give a usable
    /// date.
    pub air_date: Option<DateTime<Utc>>,
}

/// The next episode of a season that has not aired yet.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeLookahead {
    /// Episode number within the season.
    pub episode_number: u32,
    /// Episode title.
    pub episode_name: String,
    /// The upcoming air date.
    pub air_date: DateTime<Utc>,
}

/// Finds the first episode whose air date is strictly after `now`.
///
/// Episodes without a usable air date are skipped. Returns `None` when the
/// season is exhausted or empty.
pub fn next_unaired(episodes: &[EpisodeRecord], now: DateTime<Utc>) -> Option<EpisodeLookahead> {
    episodes.iter().find_map(|episode| {
        episode.air_date.filter(|date| *date > now).map(|air_date| EpisodeLookahead {
            episode_number: episode.episode_number,
            episode_name: episode.name.clone(),
            air_date,
        })
    })
}
