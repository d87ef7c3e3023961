pub mod models;

use std::time::Duration;

use async_trait::async_trait;
use backoff::{Error as BackoffError, ExponentialBackoff, future::retry};
use mockall::automock;
use reqwest::{
    Client, StatusCode,
    header::{HeaderMap, HeaderValue, USER_AGENT},
};
use thiserror::Error;
use tracing::{debug, warn};

pub use crate::tmdb::models::{MovieDetails, TvDetails};
use crate::{availability::RegionalReleaseSet, lookahead::EpisodeRecord};

/// Base URL for poster images.
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// Errors raised by the TMDB client.
#[derive(Debug, Error)]
pub enum TmdbError {
    /// Building the HTTP client failed.
    #[error("failed to build TMDB HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// Sending the request or decoding the body failed.
    #[error("TMDB request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// TMDB does not know the requested title.
    #[error("title not found on TMDB")]
    NotFound,
    /// TMDB answered with a non-success status.
    #[error("TMDB returned HTTP {status}: {body}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Response body, for diagnostics.
        body: String,
    },
}

type Result<T> = std::result::Result<T, TmdbError>;

/// Read-only lookups against the movie/TV metadata provider.
///
/// The relay only depends on this trait; the concrete REST client below is
/// one implementation, mocks are another.
#[automock]
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Detail record for a movie.
    async fn movie_details(&self, tmdb_id: u64) -> Result<MovieDetails>;

    /// Detail record for a series.
    async fn tv_details(&self, tmdb_id: u64) -> Result<TvDetails>;

    /// All regional release dates for a movie.
    async fn movie_release_dates(&self, tmdb_id: u64) -> Result<RegionalReleaseSet>;

    /// Episodes of one season, in broadcast order.
    async fn season_episodes(&self, tmdb_id: u64, season_number: u32)
    -> Result<Vec<EpisodeRecord>>;
}

/// REST client for the TMDB v3 API.
#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Creates a new client. `base_url` is configurable so tests can point it
    /// at a local server.
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("seerr-relay"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(TmdbError::ClientBuild)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Full URL for a poster path fragment.
    pub fn poster_url(path: &str) -> String {
        format!("{IMAGE_BASE_URL}{path}")
    }

    /// Re-usable configuration for exponential backoff.
    fn backoff_config() -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(30),
            max_elapsed_time: Some(Duration::from_secs(60)),
            multiplier: 2.0,
            ..Default::default()
        }
    }

    /// Whether a response status is worth retrying.
    fn is_transient_status(status: StatusCode) -> bool {
        status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
    }

    /// Send, check, parse and retry a GET against one API path.
    async fn get_json<T>(&self, path: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);

        let operation = || async {
            let resp = self
                .client
                .get(&url)
                .query(&[("api_key", self.api_key.as_str())])
                .send()
                .await
                .map_err(|e| {
                    warn!("Network error sending TMDB request: {e}. Retrying...");
                    BackoffError::transient(TmdbError::Request(e))
                })?;

            let status = resp.status();
            if status == StatusCode::NOT_FOUND {
                return Err(BackoffError::permanent(TmdbError::NotFound));
            }
            if !status.is_success() {
                let body = match resp.text().await {
                    Ok(body) => body,
                    Err(e) => {
                        warn!("Failed to read TMDB response text: {e}. Using empty fallback.");
                        String::new()
                    }
                };
                let err = TmdbError::Api { status, body };
                return Err(if Self::is_transient_status(status) {
                    warn!("Transient TMDB error ({status}). Retrying...");
                    BackoffError::transient(err)
                } else {
                    BackoffError::permanent(err)
                });
            }

            resp.json::<T>().await.map_err(|e| {
                warn!("Failed to parse TMDB JSON: {e}");
                BackoffError::permanent(TmdbError::Request(e))
            })
        };

        retry(Self::backoff_config(), operation).await
    }
}

#[async_trait]
impl MetadataProvider for TmdbClient {
    async fn movie_details(&self, tmdb_id: u64) -> Result<MovieDetails> {
        debug!("Fetching TMDB movie details for id {tmdb_id}");
        self.get_json(&format!("/movie/{tmdb_id}")).await
    }

    async fn tv_details(&self, tmdb_id: u64) -> Result<TvDetails> {
        debug!("Fetching TMDB series details for id {tmdb_id}");
        self.get_json(&format!("/tv/{tmdb_id}")).await
    }

    async fn movie_release_dates(&self, tmdb_id: u64) -> Result<RegionalReleaseSet> {
        debug!("Fetching TMDB release dates for movie id {tmdb_id}");
        let response: models::ReleaseDatesResponse =
            self.get_json(&format!("/movie/{tmdb_id}/release_dates")).await?;

        Ok(response.into())
    }

    async fn season_episodes(
        &self,
        tmdb_id: u64,
        season_number: u32,
    ) -> Result<Vec<EpisodeRecord>> {
        debug!("Fetching TMDB season {season_number} for series id {tmdb_id}");
        let response: models::SeasonResponse =
            self.get_json(&format!("/tv/{tmdb_id}/season/{season_number}")).await?;

        Ok(response.episodes.into_iter().map(EpisodeRecord::from).collect())
    }
}
