use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct MlbTeamStatsResponse {
    pub team_stats_totals: Vec<MlbTeamStatsEntry>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MlbTeamStatsEntry {
    pub team: MlbTeam,
    pub stats: MlbTeamStats,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MlbTeam {
    pub name: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase", default)]
pub struct MlbTeamStats {
    pub runs_scored: f64,
    pub runs_allowed: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MlbPythagoreanTeam {
    pub team: String,
    pub expected_win_pct: f64,
}
