use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// Goals scored per skater position for one team
#[derive(Debug, Serialize, Default)]
pub struct GoalsStats {
    pub team: String,
    pub goals_per_game: BTreeMap<String, f64>,
    pub total_games: u32,
    pub total_goals: BTreeMap<String, u32>,
}

/// Passing assists per position and per passer for one team
#[derive(Debug, Serialize, Default)]
pub struct AssistsStats {
    pub team: String,
    pub assists_per_game: BTreeMap<String, f64>,
    pub total_games: u32,
    pub total_assists: BTreeMap<String, u32>,
    pub player_assists: BTreeMap<String, u32>,
}

#[derive(Debug, Serialize)]
pub struct GoalsAgainstRanking {
    pub team: String,
    pub rank: usize,
    pub goals_against_per_game: f64,
    pub total_goals_against: u32,
    pub total_games: u32,
}

#[derive(Debug, Serialize, Default)]
pub struct ShotsToGoalStats {
    pub team: String,
    pub shots: u32,
    pub goals: u32,
    pub conversion_rate: f64,
}

#[derive(Debug, Serialize, Default)]
pub struct TimeToScoreStats {
    pub team: String,
    pub total_goal_time: u32,
    pub goals: u32,
    pub average_time_to_score: f64,
    pub total_first_goal_time: u32,
    pub first_goals: u32,
    pub average_time_to_first_goal: f64,
}

#[derive(Debug, Serialize, Default)]
pub struct DangerZoneStats {
    pub team: String,
    pub total_shots_allowed: u32,
    pub danger_zone_shots_allowed: u32,
    pub danger_zone_blocked: u32,
    pub danger_zone_percentage: f64,
    pub adjusted_danger_percentage: f64,
    pub rank: usize,
}

/// Win rate for one differential bucket, or "N/A" when the bucket is empty
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WinProbability {
    Percent(f64),
    NotAvailable,
}

impl Serialize for WinProbability {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            WinProbability::Percent(pct) => serializer.serialize_f64(*pct),
            WinProbability::NotAvailable => serializer.serialize_str("N/A"),
        }
    }
}

/// Second-period goal differential outcomes for one team
#[derive(Debug, Serialize, Default)]
pub struct GoalDifferentialStats {
    pub team: String,
    pub goal_differential_per_game: f64,
    pub win_probability_by_differential: BTreeMap<i32, WinProbability>,
    pub total_games: u32,
    pub goal_differential_counts: BTreeMap<i32, u32>,
    pub total_wins: u32,
    pub wins_by_differential: BTreeMap<i32, u32>,
}

/// Per-game shot summary derived from the play-by-play shot file
#[derive(Debug, Serialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameShotStats {
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    pub total_shots: u32,
    pub total_goals: u32,
    pub total_x_goals: f64,
    pub home_shots: u32,
    pub home_goals: u32,
    pub home_x_goals: f64,
    pub away_shots: u32,
    pub away_goals: u32,
    pub away_x_goals: f64,
    pub game_pace: f64,
    #[serde(rename = "homeXGShare", skip_serializing_if = "Option::is_none")]
    pub home_xg_share: Option<f64>,
}

/// Search index record for one NHL shooter
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NhlPlayerDocument {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(rename = "playerID")]
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub team_code: String,
    pub games_played: u32,
    pub shots_attempted: u32,
    pub shots_on_goal: u32,
    pub goals: u32,
    pub empty_net_goals: u32,
    pub shots_per_game: f64,
    pub shots_on_goal_per_game: f64,
    pub goals_per_game: f64,
    pub average_distance: f64,
    pub average_angle: f64,
    pub total_x_goals: f64,
    pub x_goals_per_game: f64,
    pub shooting_pct: f64,
    pub shot_on_goal_pct: f64,
    pub x_goals_per_shot: f64,
    pub rush_shots: u32,
    pub rush_shot_pct: f64,
    pub high_danger_shots: u32,
    pub high_danger_goals: u32,
    pub high_danger_shot_pct: f64,
    pub high_danger_goal_pct: f64,
    pub power_play_shots: u32,
    pub power_play_goals: u32,
    pub power_play_shot_pct: f64,
    pub goals_above_expected: f64,
    pub hockey_card_rating: f64,
    pub hockey_card_rating_per_game: f64,
    pub last_updated: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub recent: Option<NhlRecentFields>,
}

#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NhlRecentFields {
    pub recent_games_played: u32,
    pub recent_shots_attempted: u32,
    pub recent_shots_on_goal: u32,
    pub recent_goals: u32,
    pub recent_shots_per_game: f64,
    pub recent_shots_on_goal_per_game: f64,
    pub recent_goals_per_game: f64,
    pub recent_shooting_pct: f64,
    pub recent_x_goals: f64,
    pub recent_x_goals_per_game: f64,
    pub recent_goals_above_expected: f64,
    pub recent_high_danger_goals: u32,
    pub recent_high_danger_shots: u32,
    pub recent_power_play_goals: u32,
    pub recent_hockey_card_rating: f64,
    pub recent_high_danger_shot_pct: f64,
    pub recent_high_danger_goal_pct: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub trends: Option<NhlTrends>,
}

/// Recent window minus the rest of the season, per game or per shot
#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NhlTrends {
    pub goals_scoring_trend: f64,
    pub shooting_pct_trend: f64,
    pub x_goals_trend: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_high_danger_scoring_trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rush_shot_pct_trend: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_play_scoring_trend: Option<f64>,
    pub hockey_card_trend: f64,
}
