use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// --- MySportsFeeds payloads -------------------------------------------------

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamStatsTotalsResponse {
    pub last_updated_on: Option<String>,
    pub team_stats_totals: Vec<TeamStatsEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TeamStatsEntry {
    pub team: FeedTeam,
    pub stats: TeamStats,
}

impl TeamStatsEntry {
    /// "City Name", e.g. "Boston Celtics"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.team.city, self.team.name)
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedTeam {
    pub id: i64,
    pub city: String,
    pub name: String,
    pub abbreviation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub official_logo_image_src: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamStats {
    pub games_played: f64,
    pub standings: Standings,
    pub field_goals: FieldGoals,
    pub free_throws: FreeThrows,
    pub rebounds: Rebounds,
    pub offense: Offense,
    pub defense: Defense,
    pub miscellaneous: Miscellaneous,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Standings {
    pub wins: f64,
    pub losses: f64,
    pub win_pct: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldGoals {
    pub fg_made: f64,
    pub fg_att: f64,
    pub fg_pct: f64,
    pub fg2_pt_made: f64,
    pub fg2_pt_att: f64,
    pub fg2_pt_pct: f64,
    pub fg3_pt_made: f64,
    pub fg3_pt_att: f64,
    pub fg3_pt_pct: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct FreeThrows {
    pub ft_made: f64,
    pub ft_att: f64,
    pub ft_pct: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Rebounds {
    pub off_reb: f64,
    pub def_reb: f64,
    pub reb: f64,
    pub reb_per_game: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Offense {
    pub pts: f64,
    pub pts_per_game: f64,
    pub ast: f64,
    pub ast_per_game: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Defense {
    pub tov: f64,
    pub tov_per_game: f64,
    pub stl: f64,
    pub stl_per_game: f64,
    pub blk: f64,
    pub blk_per_game: f64,
    pub pts_against: f64,
    pub pts_against_per_game: f64,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct Miscellaneous {
    pub plus_minus: f64,
    pub plus_minus_per_game: f64,
    pub min_seconds: f64,
    pub min_seconds_per_game: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStatsTotalsResponse {
    pub last_updated_on: Option<String>,
    pub player_stats_totals: Vec<PlayerStatsEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlayerStatsEntry {
    pub player: FeedPlayer,
    pub team: Option<FeedTeamRef>,
    pub stats: PlayerStats,
}

impl PlayerStatsEntry {
    /// The team the stats were accumulated for, falling back to the
    /// player's current team.
    pub fn team_abbreviation(&self) -> Option<&str> {
        self.team
            .as_ref()
            .or(self.player.current_team.as_ref())
            .map(|t| t.abbreviation.as_str())
    }

    pub fn position(&self) -> &str {
        self.player.primary_position.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedPlayer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub primary_position: Option<String>,
    pub official_image_src: Option<String>,
    pub current_team: Option<FeedTeamRef>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedTeamRef {
    pub id: i64,
    pub abbreviation: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerStats {
    pub games_played: f64,
    pub offense: Offense,
    pub rebounds: Rebounds,
    pub free_throws: FreeThrows,
    pub field_goals: FieldGoals,
    pub defense: Defense,
    pub miscellaneous: Miscellaneous,
    pub usg_pct: f64,
    pub ts_pct: f64,
    pub efg_pct: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct GamesResponse {
    pub last_updated_on: Option<String>,
    pub games: Vec<FeedGame>,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(default)]
pub struct FeedGame {
    pub schedule: GameSchedule,
}

#[derive(Debug, Serialize, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct GameSchedule {
    pub id: i64,
    pub start_time: Option<String>,
    pub away_team: FeedTeamRef,
    pub home_team: FeedTeamRef,
    pub venue: Option<serde_json::Value>,
    pub played_status: Option<String>,
}

/// One game on a slate, by team abbreviation
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    pub away_team: String,
    pub home_team: String,
}

impl From<&FeedGame> for Matchup {
    fn from(game: &FeedGame) -> Self {
        Matchup {
            away_team: game.schedule.away_team.abbreviation.clone(),
            home_team: game.schedule.home_team.abbreviation.clone(),
        }
    }
}

// --- Route responses ---------------------------------------------------------

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PythagoreanTeam {
    pub team: String,
    pub expected_win_pct: f64,
    pub actual_win_pct: f64,
    pub win_pct_differential: f64,
    pub points_scored_per_game: f64,
    pub points_allowed_per_game: f64,
    pub actual_wins: f64,
    pub expected_wins: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PythagoreanMetadata {
    pub pythagorean_exponent: f64,
    pub formula: String,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct PythagoreanData {
    pub teams: Vec<PythagoreanTeam>,
    pub metadata: PythagoreanMetadata,
}

/// `{"status": "success", "data": ...}` envelope used by a few NBA routes
#[derive(Debug, Serialize)]
pub struct StatusEnvelope<T: Serialize> {
    pub status: &'static str,
    pub data: T,
}

impl<T: Serialize> StatusEnvelope<T> {
    pub fn success(data: T) -> Self {
        StatusEnvelope { status: "success", data }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct FourFactorsTeam {
    pub team: String,
    #[serde(rename = "eFGPercentage")]
    pub efg_percentage: f64,
    #[serde(rename = "turnoverRate")]
    pub turnover_rate: f64,
    #[serde(rename = "offensiveReboundRate")]
    pub offensive_rebound_rate: f64,
    #[serde(rename = "freeThrowRate")]
    pub free_throw_rate: f64,
    #[serde(rename = "overallRate")]
    pub overall_rate: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShootingSplits {
    pub ft_pct: f64,
    pub fg2_pt_pct: f64,
    pub fg3_pt_pct: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueShootingTeam {
    pub team: FeedTeam,
    pub stats: ShootingSplits,
    pub ts_percentage: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrueShootingResponse {
    pub team_stats_totals: Vec<TrueShootingTeam>,
}

/// Minutes-weighted plus-minus for a team's backcourt and frontcourt
#[derive(Debug, Serialize, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TeamEpm {
    pub backcourt: f64,
    pub frontcourt: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpmSide {
    pub team: String,
    pub backcourt: f64,
    pub backcourt_rating: &'static str,
    pub backcourt_rank: usize,
    pub frontcourt: f64,
    pub frontcourt_rating: &'static str,
    pub frontcourt_rank: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpmMatchup {
    pub matchup: String,
    pub home: EpmSide,
    pub away: EpmSide,
}

#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct BlowoutFactors {
    pub net_rating: f64,
    pub pyth_win_pct: f64,
    pub home_advantage: f64,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BlowoutPrediction {
    pub home_team: String,
    pub away_team: String,
    pub favored_team: String,
    pub predicted_margin: f64,
    pub blowout_probability: f64,
    pub factors: BlowoutFactors,
}

#[derive(Debug, Serialize)]
pub struct BlowoutResponse {
    pub date: String,
    pub predictions: Vec<BlowoutPrediction>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamWinProbability {
    pub team: String,
    pub abbreviation: String,
    pub win_probability: f64,
}

#[derive(Debug, Serialize)]
pub struct BayesMatchupResponse {
    pub date: String,
    pub matchups: Vec<[TeamWinProbability; 2]>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PositionDefenseStats {
    pub team: String,
    pub player: String,
    pub position: String,
    pub steals_per_game: f64,
    pub blocks_per_game: f64,
    #[serde(rename = "tovPerGame")]
    pub turnovers_per_game: f64,
    pub defensive_rating: f64,
    pub defensive_rank: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PositionalDefenseData {
    Positions(BTreeMap<String, Vec<PositionDefenseStats>>),
    Message { message: String },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MismatchMetric {
    pub offensive_rating: f64,
    pub defensive_rating: f64,
    pub mismatch_score: f64,
}

#[derive(Debug, Serialize, Clone)]
pub struct PowerMetricTeam {
    pub name: String,
    pub conference: String,
    pub power_metric: f64,
}

// --- pbpstats payloads -------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TeamScatterEfficiency {
    pub team: String,
    pub metric: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RelativeEfficiency {
    pub team: String,
    pub season: String,
    pub relative_off_efficiency: f64,
    pub relative_def_efficiency: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SubunitStats {
    pub players: Vec<String>,
    pub off_efficiency: f64,
    pub def_efficiency: f64,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LiveGamesResponse {
    pub game_data: Vec<LiveGame>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct LiveGame {
    pub home: String,
    pub away: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct ShotQuery {
    pub team: String,
    pub shot_quality: f64,
    #[serde(rename = "conversion_rate")]
    pub conversion: f64,
}

#[derive(Debug, Serialize)]
pub struct MatchupInsight {
    pub home_team: String,
    pub away_team: String,
    pub home_off_eff: f64,
    pub home_def_eff: f64,
    pub away_off_eff: f64,
    pub away_def_eff: f64,
    pub home_shot_quality: f64,
    pub away_shot_quality: f64,
}

// --- Search index documents --------------------------------------------------

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct NbaPlayerDocument {
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(rename = "playerID")]
    pub player_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub position: String,
    #[serde(rename = "teamID")]
    pub team_id: i64,
    pub team_abbrev: String,
    pub official_image_src: String,
    pub games_played: f64,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub points_per_game: f64,
    pub reb_per_game: f64,
    pub ast_per_game: f64,
    pub blk_per_game: f64,
    pub stl_per_game: f64,
    pub tov_per_game: f64,
    #[serde(rename = "fg3ptPct")]
    pub fg3_pt_pct: f64,
    pub plus_minus: f64,
    pub plus_minus_per_game: f64,
    pub last_updated: String,
    #[serde(rename = "simplifiedPER")]
    pub simplified_per: f64,
    pub ts_pct: f64,
    #[serde(rename = "eFGPct")]
    pub efg_pct: f64,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub recent: Option<NbaRecentFields>,
}

#[derive(Debug, Serialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct NbaRecentFields {
    pub recent_games_played: f64,
    pub recent_points: f64,
    pub recent_points_per_game: f64,
    pub recent_assists: f64,
    pub recent_ast_per_game: f64,
    pub recent_rebounds: f64,
    pub recent_reb_per_game: f64,
    pub recent_blk_per_game: f64,
    pub recent_stl_per_game: f64,
    pub recent_tov_per_game: f64,
    #[serde(rename = "recentFg3ptPct")]
    pub recent_fg3_pt_pct: f64,
    pub recent_plus_minus: f64,
    pub recent_plus_minus_per_game: f64,
    #[serde(rename = "recentSimplifiedPER")]
    pub recent_simplified_per: f64,
    pub recent_ts_pct: f64,
    #[serde(rename = "recentEFGPct")]
    pub recent_efg_pct: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points_trend: Option<f64>,
    #[serde(rename = "simplifiedPERTrend", skip_serializing_if = "Option::is_none")]
    pub simplified_per_trend: Option<f64>,
}
