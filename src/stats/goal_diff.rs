use std::collections::{BTreeMap, HashMap};

use crate::csv_data::CsvTable;
use crate::error::ApiError;
use crate::models::nhl::{GoalDifferentialStats, WinProbability};
use crate::stats::hockey::{clamp_differential, parse_flag, MAX_DIFFERENTIAL};
use crate::stats::ratio;

/// Score of a game as of its first second-period event.
struct Snapshot<'a> {
    home_team: &'a str,
    away_team: &'a str,
    home_goals: i32,
    away_goals: i32,
    home_won: bool,
}

fn buckets() -> BTreeMap<i32, u32> {
    (-MAX_DIFFERENTIAL..=MAX_DIFFERENTIAL).map(|d| (d, 0)).collect()
}

fn empty_stats(team: &str) -> GoalDifferentialStats {
    GoalDifferentialStats {
        team: team.to_string(),
        goal_differential_counts: buckets(),
        wins_by_differential: buckets(),
        ..Default::default()
    }
}

/// How often each team wins given its goal differential after two periods.
pub fn goal_differential(
    table: &CsvTable,
    season: &str,
) -> Result<BTreeMap<String, GoalDifferentialStats>, ApiError> {
    let [season_col, game, home_team, away_team, home_goals, away_goals, home_won, period_col] =
        table.columns([
            "season",
            "game_id",
            "homeTeamCode",
            "awayTeamCode",
            "homeTeamGoals",
            "awayTeamGoals",
            "homeTeamWon",
            "period",
        ])?;

    let mut stats: BTreeMap<String, GoalDifferentialStats> = BTreeMap::new();
    let mut snapshots: HashMap<&str, Snapshot> = HashMap::new();

    for row in table.rows() {
        if &row[season_col] != season {
            continue;
        }
        let (Ok(home), Ok(away), Some(won), Ok(period)) = (
            row[home_goals].trim().parse::<i32>(),
            row[away_goals].trim().parse::<i32>(),
            parse_flag(&row[home_won]),
            row[period_col].trim().parse::<u32>(),
        ) else {
            continue;
        };

        let (home_code, away_code) = (&row[home_team], &row[away_team]);
        for code in [home_code, away_code] {
            if !stats.contains_key(code) {
                stats.insert(code.to_string(), empty_stats(code));
            }
        }

        if period == 2 {
            snapshots.entry(&row[game]).or_insert(Snapshot {
                home_team: home_code,
                away_team: away_code,
                home_goals: home,
                away_goals: away,
                home_won: won,
            });
        }
    }

    for snapshot in snapshots.values() {
        let home_diff = clamp_differential(snapshot.home_goals - snapshot.away_goals);
        let away_diff = clamp_differential(snapshot.away_goals - snapshot.home_goals);

        if let Some(home) = stats.get_mut(snapshot.home_team) {
            *home.goal_differential_counts.entry(home_diff).or_default() += 1;
            if snapshot.home_won {
                *home.wins_by_differential.entry(home_diff).or_default() += 1;
            }
        }
        if let Some(away) = stats.get_mut(snapshot.away_team) {
            *away.goal_differential_counts.entry(away_diff).or_default() += 1;
            if !snapshot.home_won {
                *away.wins_by_differential.entry(away_diff).or_default() += 1;
            }
        }
    }

    for entry in stats.values_mut() {
        entry.total_games = entry.goal_differential_counts.values().sum();
        entry.total_wins = entry.wins_by_differential.values().sum();

        let net: i64 = entry
            .goal_differential_counts
            .iter()
            .map(|(&diff, &count)| diff as i64 * count as i64)
            .sum();
        entry.goal_differential_per_game = ratio(net as f64, entry.total_games as f64);

        entry.win_probability_by_differential = entry
            .goal_differential_counts
            .iter()
            .map(|(&diff, &count)| {
                let wins = entry.wins_by_differential.get(&diff).copied().unwrap_or(0);
                let probability = if count > 0 {
                    WinProbability::Percent(wins as f64 / count as f64 * 100.0)
                } else {
                    WinProbability::NotAvailable
                };
                (diff, probability)
            })
            .collect();
    }

    Ok(stats)
}
