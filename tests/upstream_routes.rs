mod common;

use std::fs;
use std::num::NonZeroU32;

use axum::http::StatusCode;
use mockito::{Matcher, Server};
use serde_json::json;
use statpad::config::SearchIndexConfig;

const SEASON_PATH: &str = "/nba/2024-2025-regular";

fn team_stats_body() -> String {
    json!({
        "teamStatsTotals": [
            {
                "team": {"id": 1, "city": "Washington", "name": "Wizards", "abbreviation": "WAS"},
                "stats": {
                    "gamesPlayed": 70,
                    "standings": {"wins": 15, "losses": 55, "winPct": 0.214},
                    "offense": {"ptsPerGame": 105.0},
                    "defense": {"ptsAgainstPerGame": 118.0}
                }
            },
            {
                "team": {"id": 2, "city": "Boston", "name": "Celtics", "abbreviation": "BOS"},
                "stats": {
                    "gamesPlayed": 70,
                    "standings": {"wins": 50, "losses": 20, "winPct": 0.714},
                    "offense": {"ptsPerGame": 120.0},
                    "defense": {"ptsAgainstPerGame": 108.0}
                }
            }
        ]
    })
    .to_string()
}

fn games_body() -> String {
    json!({
        "games": [
            {"schedule": {"id": 10, "homeTeam": {"id": 1, "abbreviation": "WAS"},
                          "awayTeam": {"id": 2, "abbreviation": "BOS"}, "playedStatus": "UNPLAYED"}},
            {"schedule": {"id": 11, "homeTeam": {"id": 3, "abbreviation": "NYK"},
                          "awayTeam": {"id": 4, "abbreviation": "MIA"}, "playedStatus": "COMPLETED"}}
        ]
    })
    .to_string()
}

fn app(upstream: &str) -> axum::Router {
    common::app(common::config(&std::env::temp_dir(), upstream))
}

#[tokio::test]
async fn missing_odds_key_is_a_server_error() {
    let mut config = common::config(&std::env::temp_dir(), "http://127.0.0.1:9");
    config.odds_api_key = None;

    let (status, body) = common::get_json(common::app(config), "/nhl-events").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "ODDS_API_KEY is not set in the environment");
}

#[tokio::test]
async fn nba_odds_keep_only_preferred_books() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/sports/basketball_nba/odds")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("apiKey".into(), "odds-key".into()),
            Matcher::UrlEncoded("markets".into(), "h2h,spreads".into()),
        ]))
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "a", "sport_key": "basketball_nba", "sport_title": "NBA",
                 "commence_time": "2025-03-01T00:00:00Z",
                 "bookmakers": [
                     {"key": "fanduel", "title": "FanDuel", "markets": []},
                     {"key": "pinnacle", "title": "Pinnacle", "markets": []}
                 ]},
                {"id": "b", "sport_key": "basketball_nba", "sport_title": "NBA",
                 "commence_time": "2025-03-01T00:00:00Z",
                 "bookmakers": [{"key": "pinnacle", "title": "Pinnacle", "markets": []}]}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/nba/games-today").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    let events = body.as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["id"], "a");
    assert_eq!(events[0]["bookmakers"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn upcoming_events_group_by_sport() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sports/upcoming/odds")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "a", "sport_key": "icehockey_nhl", "sport_title": "NHL", "commence_time": "t"},
                {"id": "b", "sport_key": "basketball_nba", "sport_title": "NBA", "commence_time": "t"},
                {"id": "c", "sport_key": "icehockey_nhl", "sport_title": "NHL", "commence_time": "t"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let (status, body) =
        common::get_json(app(&server.url()), "/upcoming-events?groupBy=sport").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["NHL"].as_array().unwrap().len(), 2);
    assert_eq!(body["NBA"][0]["id"], "b");
}

#[tokio::test]
async fn pythagorean_uses_basic_auth_and_wraps_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{SEASON_PATH}/team_stats_totals.json").as_str())
        .match_query(Matcher::Any)
        .match_header("authorization", common::FEED_AUTH)
        .with_header("content-type", "application/json")
        .with_body(team_stats_body())
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/nba/pythagorean").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"]["teams"][0]["team"], "Boston Celtics");
    assert_eq!(body["data"]["teams"][1]["actualWins"], 15.0);
    assert_eq!(body["data"]["metadata"]["pythagoreanExponent"], 13.91);
}

#[tokio::test]
async fn games_on_date_returns_unplayed_only() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{SEASON_PATH}/date/20250301/games.json").as_str())
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(games_body())
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/nba/games/20250301").await;

    assert_eq!(status, StatusCode::OK);
    let games = body.as_array().unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0]["schedule"]["homeTeam"]["abbreviation"], "WAS");
}

#[tokio::test]
async fn malformed_date_is_rejected() {
    let (status, _) = common::get_json(app("http://127.0.0.1:9"), "/nba/games/2025-03-01").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn no_content_means_no_games() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{SEASON_PATH}/date/20250302/games.json").as_str())
        .match_query(Matcher::Any)
        .with_status(204)
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/nba/games/20250302").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn repeated_429_exhausts_retries() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", format!("{SEASON_PATH}/team_stats_totals.json").as_str())
        .match_query(Matcher::Any)
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/nba/fourfactor").await;

    mock.assert_async().await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("after 3 attempts"), "{message}");
}

#[tokio::test]
async fn blowout_predictions_for_the_slate() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{SEASON_PATH}/date/20250301/games.json").as_str())
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(games_body())
        .create_async()
        .await;
    server
        .mock("GET", format!("{SEASON_PATH}/team_stats_totals.json").as_str())
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(team_stats_body())
        .create_async()
        .await;

    let (status, body) =
        common::get_json(app(&server.url()), "/nba/blowout?date=20250301").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2025-03-01");
    // NYK vs MIA has no team stats and is skipped
    let predictions = body["predictions"].as_array().unwrap();
    assert_eq!(predictions.len(), 1);
    assert_eq!(predictions[0]["favoredTeam"], "Boston Celtics");
    assert_eq!(predictions[0]["factors"]["homeAdvantage"], 3.0);
}

#[tokio::test]
async fn mismatch_for_unknown_player_is_not_found() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{SEASON_PATH}/player_stats_totals.json").as_str())
        .match_query(Matcher::UrlEncoded("player".into(), "nobody".into()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"playerStatsTotals": []}"#)
        .create_async()
        .await;

    let (status, body) =
        common::get_json(app(&server.url()), "/nba/mismatch?player=nobody").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Player not found");
}

#[tokio::test]
async fn daily_matchups_skip_failed_lookups() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/live/games/nba")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"game_data": [
                {"home": "Boston Celtics", "away": "New York Knicks"},
                {"home": "Miami Heat", "away": "Orlando Magic"}
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    for team in ["Bos", "New"] {
        server
            .mock("GET", "/get-relative-off-def-efficiency/nba")
            .match_query(Matcher::UrlEncoded("team".into(), team.into()))
            .with_header("content-type", "application/json")
            .with_body(
                json!({"team": team, "season": "2024-25",
                       "relative_off_efficiency": 2.5, "relative_def_efficiency": -1.0})
                .to_string(),
            )
            .create_async()
            .await;
        server
            .mock("GET", "/get-shot-query-data/nba")
            .match_query(Matcher::UrlEncoded("team".into(), team.into()))
            .with_header("content-type", "application/json")
            .with_body(json!({"team": team, "shot_quality": 0.55, "conversion_rate": 0.4}).to_string())
            .create_async()
            .await;
    }

    let (status, body) = common::get_json(app(&server.url()), "/nba/daily-matchups").await;

    assert_eq!(status, StatusCode::OK);
    let insights = body.as_array().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["home_team"], "Bos");
    assert_eq!(insights[0]["away_team"], "New");
    assert_eq!(insights[0]["home_shot_quality"], 0.55);
}

#[tokio::test]
async fn daily_matchups_without_any_data_fail() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/live/games/nba")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(json!({"game_data": [{"home": "Miami Heat", "away": "Orlando Magic"}]}).to_string())
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/nba/daily-matchups").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "No data available for today's matchups");
}

#[tokio::test]
async fn relative_efficiency_filters_by_season() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/get-relative-off-def-efficiency/nba")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"team": "x", "season": "2024-25",
                   "relative_off_efficiency": 1.0, "relative_def_efficiency": 1.0})
            .to_string(),
        )
        .expect(28)
        .create_async()
        .await;

    let (status, body) =
        common::get_json(app(&server.url()), "/nba/relative-efficiency").await;
    mock.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_object().unwrap().len(), 28);
    assert_eq!(body["Celtics"]["season"], "2024-25");

    let (_, older) =
        common::get_json(app(&server.url()), "/nba/relative-efficiency?season=2022-23").await;
    assert_eq!(older, json!({}));
}

#[tokio::test]
async fn mlb_pythagorean_uses_runs() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/mlb/current/team_stats_totals.json")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"teamStatsTotals": [
                {"team": {"name": "Dodgers"}, "stats": {"runsScored": 300, "runsAllowed": 400}},
                {"team": {"name": "Empty"}, "stats": {"runsScored": 0, "runsAllowed": 0}}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let (status, body) = common::get_json(app(&server.url()), "/mlb/pythagorean").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["team"], "Dodgers");
    assert_eq!(body[0]["expectedWinPct"], 0.36);
    assert_eq!(body[1]["expectedWinPct"], 0.0);
}

#[tokio::test]
async fn nba_trendlens_pushes_player_documents() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", format!("{SEASON_PATH}/date/20250301/games.json").as_str())
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(games_body())
        .create_async()
        .await;

    let player = |id: i64, games: u32, points: u32| {
        json!({
            "player": {"id": id, "firstName": "P", "lastName": id.to_string(),
                       "primaryPosition": "PG",
                       "currentTeam": {"id": 2, "abbreviation": "BOS"}},
            "stats": {"gamesPlayed": games, "offense": {"pts": points}}
        })
    };
    server
        .mock("GET", format!("{SEASON_PATH}/player_stats_totals.json").as_str())
        .match_query(Matcher::Regex("date=20250130-20250301".into()))
        .with_header("content-type", "application/json")
        .with_body(json!({"playerStatsTotals": [player(7, 10, 300)]}).to_string())
        .create_async()
        .await;
    server
        .mock("GET", format!("{SEASON_PATH}/player_stats_totals.json").as_str())
        .match_query(Matcher::Regex("^team=[^&]*$".into()))
        .with_header("content-type", "application/json")
        .with_body(
            json!({"playerStatsTotals": [player(7, 50, 1300), player(8, 40, 400)]}).to_string(),
        )
        .create_async()
        .await;
    let batch = server
        .mock("POST", "/1/indexes/nba_players/batch")
        .match_header("x-algolia-api-key", "search-key")
        .match_header("x-algolia-application-id", "APPID")
        .match_body(Matcher::Regex(r#""objectID":"player_7""#.into()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"taskID": 99, "objectIDs": ["player_7", "player_8"]}"#)
        .create_async()
        .await;

    let (status, body) =
        common::get_json(app(&server.url()), "/nba/trendlens?date=20250301").await;

    batch.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["recordsSaved"], 2);
    assert_eq!(body["taskID"], 99);
}

#[tokio::test]
async fn trendlens_without_search_credentials_fails_fast() {
    let mut config = common::config(&std::env::temp_dir(), "http://127.0.0.1:9");
    config.search = SearchIndexConfig::default();

    let (status, body) = common::get_json(common::app(config), "/nba/trendlens").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "ALGOLIA_APP_ID is not set in the environment");
}

#[tokio::test]
async fn nhl_trendlens_indexes_shooters_with_enough_attempts() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = String::from(
        "game_id,shooterPlayerId,shooterName,playerPositionThatDidEvent,teamCode,homeTeamCode,awayTeamCode,shotDistance,shotAngle,shotType,goal,xGoal,event\n",
    );
    for i in 0..6 {
        let game = if i < 3 { 1 } else { 2 };
        let goal = if i == 0 { 1 } else { 0 };
        csv.push_str(&format!(
            "{game},8478402,Connor McDavid,C,EDM,EDM,CGY,20,10,WRIST,{goal},0.1,SHOT\n"
        ));
    }
    csv.push_str("1,8474141,Jonathan Huberdeau,L,CGY,EDM,CGY,40,30,SLAP,0,0.02,MISS\n");
    fs::write(dir.path().join("march3.csv"), csv).unwrap();

    let mut server = Server::new_async().await;
    let batch = server
        .mock("POST", "/1/indexes/nhl_players/batch")
        .match_body(Matcher::Regex("nhl_player_8478402".into()))
        .with_header("content-type", "application/json")
        .with_body(r#"{"taskID": 5}"#)
        .create_async()
        .await;

    let app = common::app(common::config(dir.path(), &server.url()));
    let (status, body) = common::get_json(app, "/nhl/trendlens").await;

    batch.assert_async().await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["playerCount"], 2);
    assert_eq!(body["gameCount"], 2);
    assert_eq!(body["recordsSaved"], 1);
    assert_eq!(body["taskID"], 5);
    let stamp = body["date"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok(), "{stamp}");
}

#[tokio::test]
async fn feed_budget_exhaustion_is_unavailable() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/mlb/current/team_stats_totals.json")
        .match_query(Matcher::Any)
        .with_header("content-type", "application/json")
        .with_body(r#"{"teamStatsTotals": []}"#)
        .expect(1)
        .create_async()
        .await;

    let mut config = common::config(&std::env::temp_dir(), &server.url());
    config.feed_requests_per_minute = NonZeroU32::new(1).unwrap();
    let app = common::app(config);

    let (first, _) = common::get_json(app.clone(), "/mlb/pythagorean").await;
    let (second, body) = common::get_json(app, "/mlb/pythagorean").await;

    mock.assert_async().await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::SERVICE_UNAVAILABLE);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("budget exhausted"), "{message}");
}

#[tokio::test]
async fn nhl_trendlens_rejects_exports_without_shooter_columns() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("march3.csv"), "foo,bar\n1,2\n3,4\n").unwrap();

    let mut server = Server::new_async().await;
    let batch = server
        .mock("POST", "/1/indexes/nhl_players/batch")
        .expect(0)
        .create_async()
        .await;

    let app = common::app(common::config(dir.path(), &server.url()));
    let (status, body) = common::get_json(app, "/nhl/trendlens").await;

    batch.assert_async().await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("shooterPlayerId"), "{message}");
}
