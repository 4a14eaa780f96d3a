//! Integration tests for RlsClient
//!
//! These tests drive the public client surface against a mock API server
//! and verify request shapes, caching, pagination, and throttle handling.

#![allow(clippy::unwrap_used)]

use rls_client::{BatchEntry, Error, MAX_BATCH_SIZE, Platform, RlsClient};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A complete player payload as the service returns it
fn player_json(id: &str, name: &str, platform_id: i64) -> serde_json::Value {
    json!({
        "uniqueId": id,
        "displayName": name,
        "platform": {"id": platform_id, "name": "Steam"},
        "avatar": "https://example.com/avatar.jpg",
        "profileUrl": format!("https://rocketleaguestats.com/profile/{id}"),
        "signatureUrl": format!("https://signature.rocketleaguestats.com/{id}.png"),
        "stats": {
            "wins": 10,
            "goals": 20,
            "mvps": 3,
            "saves": 5,
            "shots": 40,
            "assists": 7
        },
        "rankedSeasons": {
            "5": {
                "10": {"rankPoints": 1043, "matchesPlayed": 156, "tier": 9, "division": 2}
            }
        },
        "lastRequested": 1_498_498_402,
        "createdAt": 1_453_253_975,
        "updatedAt": 1_498_498_269,
        "nextUpdateAt": 1_498_498_962
    })
}

/// One page of search results with a page-size limit of 2
fn search_page_json(page: u32, players: &[serde_json::Value]) -> serde_json::Value {
    json!({
        "page": page,
        "results": players.len(),
        "totalResults": 6,
        "maxResultsPerPage": 2,
        "data": players
    })
}

fn client(mock_server: &MockServer) -> RlsClient {
    RlsClient::new("test-key")
        .unwrap()
        .with_base_url(mock_server.uri())
}

#[tokio::test]
async fn test_player_issues_one_request_with_identity_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/player"))
        .and(query_param("unique_id", "76561198033338223"))
        .and(query_param("platform_id", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(player_json("76561198033338223", "Remkoe", 1)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let player = client
        .player(76_561_198_033_338_223_u64, Platform::steam())
        .await
        .unwrap();

    assert_eq!(player.id, "76561198033338223");
    assert_eq!(player.display_name, "Remkoe");
    assert_eq!(player.stats.goals, 20);
    assert_eq!(player.ranked_seasons[&5][0].playlist_id, 10);
}

#[tokio::test]
async fn test_missing_api_key_fails_without_touching_the_network() {
    let mock_server = MockServer::start().await;
    let client = RlsClient::new("")
        .unwrap()
        .with_base_url(mock_server.uri());

    let result = client.player("any", 1).await;
    assert!(matches!(result, Err(Error::MissingCredential)));

    let result = client.platforms(false).await;
    assert!(matches!(result, Err(Error::MissingCredential)));

    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_api_key_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/player"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let result = client.player("any", 1).await;

    assert!(matches!(result, Err(Error::InvalidCredential)));
}

#[tokio::test]
async fn test_batch_lookup_posts_entries_and_preserves_order() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/player/batch"))
        .and(body_json(json!([
            {"uniqueId": "76561198033338223", "platformId": 1},
            {"uniqueId": "GamerTag", "platformId": 3}
        ])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            player_json("76561198033338223", "Remkoe", 1),
            player_json("GamerTag", "GamerTag", 3)
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let entries = [
        BatchEntry::new(76_561_198_033_338_223_u64, Platform::steam()),
        BatchEntry::new("GamerTag", Platform::xbox_one()),
    ];
    let players = client.players(&entries).await.unwrap();

    assert_eq!(players.len(), 2);
    assert_eq!(players[0].id, "76561198033338223");
    assert_eq!(players[1].id, "GamerTag");
}

#[tokio::test]
async fn test_oversized_batch_never_reaches_the_network() {
    let mock_server = MockServer::start().await;
    let client = client(&mock_server);

    let entries: Vec<BatchEntry> = (0..=MAX_BATCH_SIZE)
        .map(|n| BatchEntry::new(n, 1))
        .collect();
    let result = client.players(&entries).await;

    assert!(matches!(result, Err(Error::BatchTooLarge { count: 11, .. })));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reference_data_cached_until_renewed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/platforms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Steam"},
            {"id": 2, "name": "Ps4"},
            {"id": 3, "name": "XboxOne"}
        ])))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    // Second lookup is served from the cache, renewal fetches again.
    let first = client.platforms(false).await.unwrap();
    let cached = client.platforms(false).await.unwrap();
    let renewed = client.platforms(true).await.unwrap();

    assert_eq!(first, cached);
    assert_eq!(first, renewed);
    assert_eq!(first.len(), 3);
}

#[tokio::test]
async fn test_current_season_is_the_unended_one() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/seasons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"seasonId": 1, "startedOn": 1_436_140_800, "endedOn": 1_487_721_599},
            {"seasonId": 2, "startedOn": 1_487_721_600, "endedOn": 1_498_003_199},
            {"seasonId": 3, "startedOn": 1_498_003_200, "endedOn": null}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let current = client.current_season().await.unwrap();

    assert_eq!(current.unwrap().id, 3);

    // By-ID lookups come from the same cached collection.
    assert_eq!(client.season(2).await.unwrap().unwrap().id, 2);
    assert!(client.season(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_current_season_is_none_when_every_season_ended() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/seasons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"seasonId": 1, "startedOn": 1_436_140_800, "endedOn": 1_487_721_599}
        ])))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    assert!(client.current_season().await.unwrap().is_none());
}

#[tokio::test]
async fn test_platform_lookup_by_id_and_case_insensitive_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/platforms"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Steam"},
            {"id": 2, "name": "Ps4"},
            {"id": 3, "name": "XboxOne"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);

    assert_eq!(client.platform(2).await.unwrap().unwrap().name, "Ps4");
    assert_eq!(client.platform("XBOXONE").await.unwrap().unwrap().id, 3);
    assert!(client.platform("dreamcast").await.unwrap().is_none());
}

#[tokio::test]
async fn test_search_all_walks_every_page_once() {
    let mock_server = MockServer::start().await;

    let pages: Vec<Vec<serde_json::Value>> = vec![
        vec![player_json("a", "Squishy", 1), player_json("b", "Squishy2", 1)],
        vec![player_json("c", "Squishy3", 1), player_json("d", "Squishy4", 1)],
        vec![player_json("e", "Squishy5", 1), player_json("f", "Squishy6", 1)],
        vec![],
    ];

    for (page, players) in pages.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path("/search/players"))
            .and(query_param("display_name", "Squishy"))
            .and(query_param("page", page.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_page_json(page as u32, players)),
            )
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let client = client(&mock_server);
    let mut search = client.search("Squishy", 0).await.unwrap();

    assert_eq!(search.total_results(), 6);
    assert_eq!(search.max_results_per_page(), 2);

    let everyone = search.all().await.unwrap().to_vec();
    assert_eq!(everyone.len(), 6);
    assert_eq!(everyone[0].id, "a");
    assert_eq!(everyone[5].id, "f");

    // The cursor is terminal: no further request is made.
    assert!(search.next_page().await.unwrap().is_empty());
    assert_eq!(search.page(), 3);
}

#[tokio::test]
async fn test_short_page_ends_pagination_without_a_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search/players"))
        .respond_with(ResponseTemplate::new(200).set_body_json(search_page_json(
            0,
            &[player_json("a", "Unique", 1)],
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut search = client.search("Unique", 0).await.unwrap();

    assert!(search.next_page().await.unwrap().is_empty());
    assert_eq!(search.players().len(), 1);
}

#[tokio::test]
async fn test_throttled_call_is_retried_transparently() {
    let mock_server = MockServer::start().await;
    let reset_at = (chrono::Utc::now() + chrono::Duration::seconds(10)).to_rfc2822();

    Mock::given(method("GET"))
        .and(path("/player"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("x-rate-limit-remaining", "0")
                .insert_header("x-rate-limit-reset-remaining", "50")
                .insert_header("x-rate-limit-reset", reset_at.as_str()),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/player"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(player_json("a", "Squishy", 1)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let player = client.player("a", 1).await.unwrap();

    assert_eq!(player.display_name, "Squishy");
}
