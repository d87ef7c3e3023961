use chrono::{Duration, Utc};
use mockall::predicate::*;

use super::*;
use crate::{
    availability::{CountryReleases, RegionalReleaseSet, ReleaseDateEntry, ReleaseKind},
    lookahead::EpisodeRecord,
    messaging::MockMessagingService,
    payloads::{Extra, MediaInfo, RequestInfo, SerieInfo, TranscodeInfo},
    tmdb::{MockMetadataProvider, models::{Genre, MovieDetails, SeasonSummary, TvDetails}},
};

const CHAT_ID: ChatId = ChatId(-1001);
const TMDB_ID: u64 = 693134;

fn relay(
    provider: MockMetadataProvider,
    messaging: MockMessagingService,
) -> RelayService {
    RelayService::new(Arc::new(provider), Arc::new(messaging), CHAT_ID)
}

fn overseerr_payload(
    notification_type: NotificationType,
    media_type: &str,
    tmdb_id: &str,
) -> OverseerrPayload {
    OverseerrPayload {
        notification_type,
        event: "Movie Request Pending".to_string(),
        subject: "Dune: Part Two (2024)".to_string(),
        message: "Requested".to_string(),
        image: "https://image.tmdb.org/t/p/w600/dune2.jpg".to_string(),
        media: Some(MediaInfo { media_type: media_type.to_string(), tmdb_id: tmdb_id.to_string() }),
        request: Some(RequestInfo {
            request_id: "42".to_string(),
            requested_by_username: "paul".to_string(),
            requested_by_avatar: "https://example.org/paul.png".to_string(),
        }),
        extra: vec![],
    }
}

fn movie_details() -> MovieDetails {
    MovieDetails {
        id: TMDB_ID,
        title: "Dune: Part Two".to_string(),
        original_title: "Dune: Part Two".to_string(),
        tagline: "Long live the fighters.".to_string(),
        overview: "Paul Atreides unites with the Fremen.".to_string(),
        poster_path: Some("/dune2.jpg".to_string()),
        genres: vec![Genre { id: 878, name: "Science Fiction".to_string() }],
        vote_average: 8.2,
        vote_count: 5000,
        imdb_id: Some("tt15239678".to_string()),
    }
}

fn tv_details(seasons: Vec<SeasonSummary>) -> TvDetails {
    TvDetails {
        id: TMDB_ID,
        name: "Severance".to_string(),
        original_name: "Severance".to_string(),
        tagline: String::new(),
        overview: "Mark leads a team at Lumon Industries.".to_string(),
        poster_path: Some("/severance.jpg".to_string()),
        genres: vec![Genre { id: 18, name: "Drama".to_string() }],
        vote_average: 8.4,
        vote_count: 3000,
        number_of_episodes: 19,
        number_of_seasons: 2,
        seasons,
    }
}

#[tokio::test]
async fn pending_movie_with_future_release_sends_photo_message() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    let future = Utc::now() + Duration::days(30);
    provider.expect_movie_release_dates().with(eq(TMDB_ID)).times(1).returning(move |_| {
        Ok(RegionalReleaseSet {
            countries: vec![CountryReleases {
                country: "US".to_string(),
                entries: vec![ReleaseDateEntry { kind: ReleaseKind::Theatrical, date: future }],
            }],
        })
    });

    messaging
        .expect_send_photo_message()
        .withf(|chat_id, photo, caption| {
            *chat_id == CHAT_ID
                && photo.contains("dune2")
                && caption.contains("Time travel alert")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let relay = relay(provider, messaging);
    let payload = overseerr_payload(NotificationType::MediaPending, "movie", "693134");

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn pending_movie_with_only_stale_dates_is_suppressed() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    let past = Utc::now() - Duration::days(90);
    provider.expect_movie_release_dates().with(eq(TMDB_ID)).times(1).returning(move |_| {
        Ok(RegionalReleaseSet {
            countries: vec![CountryReleases {
                country: "US".to_string(),
                entries: vec![ReleaseDateEntry { kind: ReleaseKind::Theatrical, date: past }],
            }],
        })
    });

    // No upcoming release means no message at all.
    messaging.expect_send_photo_message().times(0);
    messaging.expect_send_text_message().times(0);

    let relay = relay(provider, messaging);
    let payload = overseerr_payload(NotificationType::MediaPending, "movie", "693134");

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn pending_movie_without_tmdb_id_is_skipped() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider.expect_movie_release_dates().times(0);
    messaging.expect_send_photo_message().times(0);

    let relay = relay(provider, messaging);
    let payload = overseerr_payload(NotificationType::MediaPending, "movie", "0");

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn pending_movie_provider_error_propagates() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider
        .expect_movie_release_dates()
        .with(eq(TMDB_ID))
        .times(1)
        .returning(|_| Err(TmdbError::NotFound));

    // The resolver is never invoked on provider failure and nothing is sent.
    messaging.expect_send_photo_message().times(0);
    messaging.expect_send_text_message().times(0);

    let relay = relay(provider, messaging);
    let payload = overseerr_payload(NotificationType::MediaPending, "movie", "693134");

    let result = relay.process_overseerr(payload).await;

    assert!(matches!(result.unwrap_err(), RelayError::Provider(TmdbError::NotFound)));
}

#[tokio::test]
async fn pending_season_with_unaired_episode_sends_lookahead() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    let tomorrow = Utc::now() + Duration::days(1);
    provider.expect_season_episodes().with(eq(TMDB_ID), eq(2u32)).times(1).returning(move |_, _| {
        Ok(vec![
            EpisodeRecord {
                episode_number: 1,
                name: "Hello, Ms. Cobel".to_string(),
                air_date: Some(Utc::now() - Duration::days(7)),
            },
            EpisodeRecord {
                episode_number: 2,
                name: "Goodbye, Mrs. Selvig".to_string(),
                air_date: Some(tomorrow),
            },
        ])
    });

    messaging
        .expect_send_photo_message()
        .withf(|chat_id, _, caption| {
            *chat_id == CHAT_ID && caption.contains("Goodbye, Mrs. Selvig")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let relay = relay(provider, messaging);
    let mut payload = overseerr_payload(NotificationType::MediaAutoApproved, "tv", "693134");
    payload.extra =
        vec![Extra { name: Some("Requested Seasons".to_string()), value: Some("2".to_string()) }];

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn pending_season_fully_aired_is_suppressed() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider.expect_season_episodes().with(eq(TMDB_ID), eq(1u32)).times(1).returning(|_, _| {
        Ok(vec![EpisodeRecord {
            episode_number: 1,
            name: "Pilot".to_string(),
            air_date: Some(Utc::now() - Duration::days(365)),
        }])
    });

    messaging.expect_send_photo_message().times(0);

    let relay = relay(provider, messaging);
    let mut payload = overseerr_payload(NotificationType::MediaPending, "tv", "693134");
    payload.extra =
        vec![Extra { name: Some("Requested Seasons".to_string()), value: Some("1".to_string()) }];

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn available_movie_sends_enriched_announcement() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider
        .expect_movie_details()
        .with(eq(TMDB_ID))
        .times(1)
        .returning(|_| Ok(movie_details()));

    messaging
        .expect_send_photo_message()
        .withf(|chat_id, photo, caption| {
            *chat_id == CHAT_ID
                && photo.ends_with("/dune2.jpg")
                && caption.contains("Dune: Part Two")
                && caption.contains("Available")
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let relay = relay(provider, messaging);
    let payload = overseerr_payload(NotificationType::MediaAvailable, "movie", "693134");

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn available_media_without_tmdb_id_relays_payload_text() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider.expect_movie_details().times(0);

    messaging
        .expect_send_photo_message()
        .withf(|_, _, caption| caption.contains("Dune: Part Two (2024)"))
        .times(1)
        .returning(|_, _, _| Ok(()));

    let relay = relay(provider, messaging);
    let payload = overseerr_payload(NotificationType::MediaAvailable, "movie", "");

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn payload_without_media_record_is_skipped() {
    let provider = MockMetadataProvider::new();
    let messaging = MockMessagingService::new();

    let relay = relay(provider, messaging);
    let mut payload = overseerr_payload(NotificationType::MediaPending, "movie", "693134");
    payload.media = None;

    assert!(relay.process_overseerr(payload).await.is_ok());
}

#[tokio::test]
async fn direct_play_transcode_is_skipped() {
    let provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    messaging.expect_send_photo_message().times(0);
    messaging.expect_send_text_message().times(0);

    let relay = relay(provider, messaging);
    let payload = TautulliTranscodePayload {
        title: "Dune: Part Two".to_string(),
        user: "paul".to_string(),
        player: "Living room TV".to_string(),
        action: "play".to_string(),
        media_type: "movie".to_string(),
        themoviedb_id: "693134".to_string(),
        transcode_info: TranscodeInfo {
            transcode_decision: "Direct Play".to_string(),
            video_decision: String::new(),
            audio_decision: String::new(),
            container: String::new(),
            transcode_container: String::new(),
            video_codec: String::new(),
            transcode_video_codec: String::new(),
            audio_codec: String::new(),
            transcode_audio_codec: String::new(),
        },
    };

    assert!(relay.process_transcode(payload).await.is_ok());
}

#[tokio::test]
async fn transcode_without_tmdb_id_falls_back_to_text() {
    let provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    messaging
        .expect_send_text_message()
        .withf(|chat_id, text| *chat_id == CHAT_ID && text.contains("Transcoding alert"))
        .times(1)
        .returning(|_, _| Ok(()));

    let relay = relay(provider, messaging);
    let payload = TautulliTranscodePayload {
        title: "Dune: Part Two".to_string(),
        user: "paul".to_string(),
        player: "Phone".to_string(),
        action: "play".to_string(),
        media_type: "movie".to_string(),
        themoviedb_id: String::new(),
        transcode_info: TranscodeInfo {
            transcode_decision: "transcode".to_string(),
            video_decision: "transcode".to_string(),
            audio_decision: "copy".to_string(),
            container: "mkv".to_string(),
            transcode_container: "mp4".to_string(),
            video_codec: "hevc".to_string(),
            transcode_video_codec: "h264".to_string(),
            audio_codec: "truehd".to_string(),
            transcode_audio_codec: "aac".to_string(),
        },
    };

    assert!(relay.process_transcode(payload).await.is_ok());
}

#[tokio::test]
async fn last_episode_of_season_sends_message_and_poll() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider.expect_tv_details().with(eq(TMDB_ID)).times(1).returning(|_| {
        Ok(tv_details(vec![
            SeasonSummary { season_number: 1, episode_count: 9 },
            SeasonSummary { season_number: 2, episode_count: 10 },
        ]))
    });

    messaging
        .expect_send_photo_message()
        .withf(|_, _, caption| caption.contains("last episode"))
        .times(1)
        .returning(|_, _, _| Ok(()));
    messaging
        .expect_send_poll()
        .withf(|chat_id, question, options| {
            *chat_id == CHAT_ID && question.contains("season 2") && options.len() == 3
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let relay = relay(provider, messaging);
    let payload = TautulliLastEpisodePayload {
        title: "Severance".to_string(),
        user: "paul".to_string(),
        media_type: "episode".to_string(),
        themoviedb_id: "693134".to_string(),
        serie_info: SerieInfo { episode_num: "10".to_string(), season_num: "2".to_string() },
    };

    assert!(relay.process_last_episode(payload).await.is_ok());
}

#[tokio::test]
async fn mid_season_episode_sends_nothing() {
    let mut provider = MockMetadataProvider::new();
    let mut messaging = MockMessagingService::new();

    provider.expect_tv_details().with(eq(TMDB_ID)).times(1).returning(|_| {
        Ok(tv_details(vec![SeasonSummary { season_number: 2, episode_count: 10 }]))
    });

    messaging.expect_send_photo_message().times(0);
    messaging.expect_send_text_message().times(0);
    messaging.expect_send_poll().times(0);

    let relay = relay(provider, messaging);
    let payload = TautulliLastEpisodePayload {
        title: "Severance".to_string(),
        user: "paul".to_string(),
        media_type: "episode".to_string(),
        themoviedb_id: "693134".to_string(),
        serie_info: SerieInfo { episode_num: "4".to_string(), season_num: "2".to_string() },
    };

    assert!(relay.process_last_episode(payload).await.is_ok());
}

#[tokio::test]
async fn last_episode_for_movie_is_skipped() {
    let mut provider = MockMetadataProvider::new();
    let messaging = MockMessagingService::new();

    provider.expect_tv_details().times(0);

    let relay = relay(provider, messaging);
    let payload = TautulliLastEpisodePayload {
        title: "Dune: Part Two".to_string(),
        user: "paul".to_string(),
        media_type: "movie".to_string(),
        themoviedb_id: "693134".to_string(),
        serie_info: SerieInfo { episode_num: "1".to_string(), season_num: "1".to_string() },
    };

    assert!(relay.process_last_episode(payload).await.is_ok());
}
