//! statpad: a JSON API of sports statistics over NHL shot exports and
//! third-party NBA, MLB and odds feeds.

pub mod config;
pub mod csv_data;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod stats;
pub mod upstream;

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            tracing::warn!("CORS_ORIGIN '{}' is not a valid header value, cross-origin requests are disabled", origin);
            layer
        }
    }
}

/// Builds the full router. `main` serves it; tests drive it directly.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        // Root and health
        .route("/", get(routes::health::root))
        .route("/health", get(routes::health::health_check))

        // NHL shot exports
        .route("/process-goals", get(routes::nhl::process_goals))
        .route("/process-assists", get(routes::nhl::process_assists))
        .route("/process-goals-against", get(routes::nhl::process_goals_against))
        .route("/process-goal-diff", get(routes::nhl::process_goal_diff))
        .route("/process-avgscoretime", get(routes::nhl::process_avg_score_time))
        .route("/process-shotstogoals", get(routes::nhl::process_shots_to_goals))
        .route("/process-dangerzone", get(routes::nhl::process_danger_zone))
        .route("/nhl/trendlens", get(routes::nhl_trendlens::nhl_trendlens))

        // Odds
        .route("/nhl-events", get(routes::odds::nhl_events))
        .route("/upcoming-events", get(routes::odds::upcoming_events))
        .route("/nba/games-today", get(routes::odds::nba_games_today))

        // NBA
        .route("/nba/games/{date}", get(routes::nba::games_on_date))
        .route("/nba/pythagorean", get(routes::nba::pythagorean))
        .route("/nba/fourfactor", get(routes::nba::four_factors))
        .route("/nba/trueshooting", get(routes::nba::true_shooting))
        .route("/nba/epm", get(routes::nba::epm))
        .route("/nba/blowout", get(routes::nba::blowout))
        .route("/nba/bayes-matchup", get(routes::nba::bayes_matchup))
        .route("/nba/positional-defense", get(routes::nba::positional_defense))
        .route("/nba/mismatch", get(routes::nba::mismatch))
        .route("/nba/powermetric", get(routes::nba::power_metric))
        .route("/nba/trendlens", get(routes::nba_trendlens::nba_trendlens))

        // pbpstats
        .route("/nba/teamscatterplot", get(routes::pbp::team_scatter_plot))
        .route("/nba/relative-efficiency", get(routes::pbp::relative_efficiency))
        .route("/nba/subunit", get(routes::pbp::subunit))
        .route("/nba/daily-matchups", get(routes::pbp::daily_matchups))

        // MLB
        .route("/mlb/pythagorean", get(routes::mlb::pythagorean))

        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
