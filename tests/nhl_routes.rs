mod common;

use std::fs;

use axum::http::StatusCode;
use tempfile::TempDir;

const GOALS_CSV: &str = "playerPositionThatDidEvent,teamCode,event,game_id\n\
                         C,TOR,GOAL,1\n\
                         D,TOR,SHOT,1\n\
                         C,TOR,GOAL,2\n\
                         L,MTL,GOAL,1\n";

const SHOTS_CSV: &str = "event,teamCode\nSHOT,TOR\nGOAL,TOR\nMISS,TOR\nMISS,BOS\n";

fn data_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("feb21shots.csv"), GOALS_CSV).unwrap();
    fs::write(dir.path().join("shotsfeb1.csv"), SHOTS_CSV).unwrap();
    fs::write(dir.path().join("bad.csv"), "event,teamCode\nGOAL,TOR\n").unwrap();
    dir
}

fn app(dir: &TempDir) -> axum::Router {
    common::app(common::config(dir.path(), "http://127.0.0.1:9"))
}

#[tokio::test]
async fn health_reports_ok() {
    let dir = data_dir();
    let (status, body) = common::get_json(app(&dir), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn goals_by_position_from_default_file() {
    let dir = data_dir();
    let (status, body) = common::get_json(app(&dir), "/process-goals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["TOR"]["total_games"], 2);
    assert_eq!(body["TOR"]["total_goals"]["C"], 2);
    assert_eq!(body["TOR"]["goals_per_game"]["C"], 1.0);
    assert_eq!(body["MTL"]["total_goals"]["L"], 1);
}

#[tokio::test]
async fn conversion_rate_is_zero_without_shots() {
    let dir = data_dir();
    let (status, body) = common::get_json(app(&dir), "/process-shotstogoals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["TOR"]["shots"], 2);
    assert_eq!(body["TOR"]["conversion_rate"], 0.5);
    assert_eq!(body["BOS"]["shots"], 0);
    assert_eq!(body["BOS"]["conversion_rate"], 0.0);
}

#[tokio::test]
async fn rows_with_bad_encoding_are_skipped() {
    let dir = data_dir();
    let mut bytes = b"event,teamCode\nGOAL,TOR\nSHOT,TOR\nSHOT,M".to_vec();
    bytes.extend_from_slice(&[0xd6, b'N', b'\n']);
    fs::write(dir.path().join("latin1.csv"), bytes).unwrap();

    let (status, body) =
        common::get_json(app(&dir), "/process-shotstogoals?filePath=latin1.csv").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["TOR"]["shots"], 2);
    assert_eq!(body["TOR"]["conversion_rate"], 0.5);
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_columns_are_a_bad_request() {
    let dir = data_dir();
    let (status, body) = common::get_json(app(&dir), "/process-goals?filePath=bad.csv").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("required columns"), "{message}");
    assert!(message.contains("playerPositionThatDidEvent"), "{message}");
}

#[tokio::test]
async fn missing_file_is_a_server_error() {
    let dir = data_dir();
    let (status, body) =
        common::get_json(app(&dir), "/process-dangerzone?filePath=nope.csv").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to open CSV file");
}

#[tokio::test]
async fn paths_outside_the_data_dir_are_rejected() {
    let dir = data_dir();
    let (status, _) =
        common::get_json(app(&dir), "/process-goals?filePath=../etc/passwd").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn goal_differential_filters_by_season() {
    let dir = data_dir();
    fs::write(
        dir.path().join("diff.csv"),
        "season,game_id,homeTeamCode,awayTeamCode,homeTeamGoals,awayTeamGoals,homeTeamWon,period\n\
         2023,1,BOS,TOR,2,0,1,2\n\
         2024,2,BOS,TOR,0,1,0,2\n",
    )
    .unwrap();

    let (status, body) =
        common::get_json(app(&dir), "/process-goal-diff?filePath=diff.csv&season=2023").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["BOS"]["total_games"], 1);
    assert_eq!(body["BOS"]["win_probability_by_differential"]["2"], 100.0);
    assert_eq!(body["BOS"]["win_probability_by_differential"]["-2"], "N/A");
    assert!(body.get("NYR").is_none());
}

#[tokio::test]
async fn power_metric_ranks_sheet_rows() {
    let dir = data_dir();
    fs::write(
        dir.path().join("powermetric.csv"),
        "team,conference,a4f,oeff,deff,ediff,pdiff,rsos,cons\n\
         Lakers,West,5,115,112,3,1,0,1\n\
         Celtics,East,10,120,110,10,8,1,2\n",
    )
    .unwrap();

    let (status, body) = common::get_json(app(&dir), "/nba/powermetric").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Celtics");
    assert_eq!(body[1]["conference"], "West");
}
