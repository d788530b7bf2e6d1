use crate::models::mlb::{MlbPythagoreanTeam, MlbTeamStatsEntry};
use crate::stats::ratio;

/// Classic Bill James expectation, `RS² / (RS² + RA²)`, as a fraction.
pub fn pythagorean_expectation(runs_scored: f64, runs_allowed: f64) -> f64 {
    let scored = runs_scored.powi(2);
    ratio(scored, scored + runs_allowed.powi(2))
}

pub fn pythagorean_team(entry: &MlbTeamStatsEntry) -> MlbPythagoreanTeam {
    MlbPythagoreanTeam {
        team: entry.team.name.clone(),
        expected_win_pct: pythagorean_expectation(
            entry.stats.runs_scored,
            entry.stats.runs_allowed,
        ),
    }
}
