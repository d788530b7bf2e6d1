//! Team-level aggregations over the NHL shot-by-shot CSV exports.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::csv_data::CsvTable;
use crate::error::ApiError;
use crate::models::nhl::{
    AssistsStats, DangerZoneStats, GoalsAgainstRanking, GoalsStats, ShotsToGoalStats,
    TimeToScoreStats,
};
use crate::stats::hockey::{is_danger_zone, parse_flag};
use crate::stats::{percentage, ratio};

const DANGER_ZONE_SHOT_TYPES: [&str; 9] = [
    "shot",
    "deflection",
    "tip",
    "rebound",
    "wrist",
    "snap",
    "slap",
    "back",
    "blocked",
];

fn is_goal(event: &str) -> bool {
    event.eq_ignore_ascii_case("goal")
}

/// Distinct game ids seen per team.
#[derive(Default)]
struct GameTracker<'a> {
    seen: HashMap<&'a str, HashSet<&'a str>>,
}

impl<'a> GameTracker<'a> {
    fn record(&mut self, team: &'a str, game_id: &'a str) {
        self.seen.entry(team).or_default().insert(game_id);
    }

    fn games(&self, team: &str) -> u32 {
        self.seen.get(team).map_or(0, |games| games.len() as u32)
    }
}

fn per_game(totals: &BTreeMap<String, u32>, games: u32) -> BTreeMap<String, f64> {
    totals
        .iter()
        .map(|(key, &count)| (key.clone(), ratio(count as f64, games as f64)))
        .collect()
}

pub fn goals_by_position(table: &CsvTable) -> Result<BTreeMap<String, GoalsStats>, ApiError> {
    let [position, team, event, game] =
        table.columns(["playerPositionThatDidEvent", "teamCode", "event", "game_id"])?;

    let mut stats: BTreeMap<String, GoalsStats> = BTreeMap::new();
    let mut games = GameTracker::default();

    for row in table.rows() {
        let team_code = &row[team];
        let entry = stats.entry(team_code.to_string()).or_insert_with(|| GoalsStats {
            team: team_code.to_string(),
            ..Default::default()
        });
        games.record(team_code, &row[game]);

        if is_goal(&row[event]) {
            *entry.total_goals.entry(row[position].to_string()).or_default() += 1;
        }
    }

    for (team_code, entry) in stats.iter_mut() {
        entry.total_games = games.games(team_code);
        entry.goals_per_game = per_game(&entry.total_goals, entry.total_games);
    }

    Ok(stats)
}

/// An assist is a goal whose preceding event was a pass; it is credited to
/// the shooter's position and to the passer's number.
pub fn assists_by_position(table: &CsvTable) -> Result<BTreeMap<String, AssistsStats>, ApiError> {
    let [position, team, game, goal, last_category, last_player] = table.columns([
        "playerPositionThatDidEvent",
        "team",
        "game_id",
        "goal",
        "lastEventCategory",
        "playerNumThatDidLastEvent",
    ])?;

    let mut stats: BTreeMap<String, AssistsStats> = BTreeMap::new();
    let mut games = GameTracker::default();

    for row in table.rows() {
        let team_code = &row[team];
        let entry = stats.entry(team_code.to_string()).or_insert_with(|| AssistsStats {
            team: team_code.to_string(),
            ..Default::default()
        });
        games.record(team_code, &row[game]);

        if &row[goal] == "1" && row[last_category].eq_ignore_ascii_case("pass") {
            *entry.total_assists.entry(row[position].to_string()).or_default() += 1;
            *entry.player_assists.entry(row[last_player].to_string()).or_default() += 1;
        }
    }

    for (team_code, entry) in stats.iter_mut() {
        entry.total_games = games.games(team_code);
        entry.assists_per_game = per_game(&entry.total_assists, entry.total_games);
    }

    Ok(stats)
}

/// Goals conceded per game for every team in `season`, worst defence first.
pub fn goals_against_rankings(
    table: &CsvTable,
    season: &str,
) -> Result<Vec<GoalsAgainstRanking>, ApiError> {
    let [event, game, is_home, home_team, away_team, season_col] = table.columns([
        "event",
        "game_id",
        "isHomeTeam",
        "homeTeamCode",
        "awayTeamCode",
        "season",
    ])?;

    let mut conceded: HashMap<&str, u32> = HashMap::new();
    let mut games = GameTracker::default();

    for row in table.rows() {
        if &row[season_col] != season {
            continue;
        }
        let (home, away) = (&row[home_team], &row[away_team]);
        games.record(home, &row[game]);
        games.record(away, &row[game]);
        conceded.entry(home).or_default();
        conceded.entry(away).or_default();

        if is_goal(&row[event]) {
            let shooter_is_home = parse_flag(&row[is_home]).unwrap_or(false);
            let defending = if shooter_is_home { away } else { home };
            *conceded.entry(defending).or_default() += 1;
        }
    }

    let mut rankings: Vec<GoalsAgainstRanking> = conceded
        .into_iter()
        .map(|(team, total)| {
            let total_games = games.games(team);
            GoalsAgainstRanking {
                team: team.to_string(),
                rank: 0,
                goals_against_per_game: ratio(total as f64, total_games as f64),
                total_goals_against: total,
                total_games,
            }
        })
        .collect();

    rankings.sort_by(|a, b| {
        b.goals_against_per_game
            .total_cmp(&a.goals_against_per_game)
            .then_with(|| a.team.cmp(&b.team))
    });
    for (idx, ranking) in rankings.iter_mut().enumerate() {
        ranking.rank = idx + 1;
    }

    Ok(rankings)
}

pub fn shots_to_goals(table: &CsvTable) -> Result<BTreeMap<String, ShotsToGoalStats>, ApiError> {
    let [event, team] = table.columns(["event", "teamCode"])?;

    let mut stats: BTreeMap<String, ShotsToGoalStats> = BTreeMap::new();
    for row in table.rows() {
        let entry = stats.entry(row[team].to_string()).or_insert_with(|| ShotsToGoalStats {
            team: row[team].to_string(),
            ..Default::default()
        });

        let event = &row[event];
        if is_goal(event) {
            entry.goals += 1;
            entry.shots += 1;
        } else if event.eq_ignore_ascii_case("shot") {
            entry.shots += 1;
        }
    }

    for entry in stats.values_mut() {
        entry.conversion_rate = ratio(entry.goals as f64, entry.shots as f64);
    }

    Ok(stats)
}

/// Average game minute of a team's goals, and of the opening goal of each
/// game it scored first in.
pub fn time_to_score(
    table: &CsvTable,
    season: &str,
) -> Result<BTreeMap<String, TimeToScoreStats>, ApiError> {
    let [event, time, team, season_col, game] =
        table.columns(["event", "time", "teamCode", "season", "game_id"])?;

    let mut stats: BTreeMap<String, TimeToScoreStats> = BTreeMap::new();
    let mut opened: HashSet<&str> = HashSet::new();

    for row in table.rows() {
        let Ok(seconds) = row[time].trim().parse::<u32>() else {
            continue;
        };
        if !row[season_col].eq_ignore_ascii_case(season) || !is_goal(&row[event]) {
            continue;
        }

        let minute = seconds / 60;
        let entry = stats.entry(row[team].to_string()).or_insert_with(|| TimeToScoreStats {
            team: row[team].to_string(),
            ..Default::default()
        });
        entry.total_goal_time += minute;
        entry.goals += 1;

        if opened.insert(&row[game]) {
            entry.total_first_goal_time += minute;
            entry.first_goals += 1;
        }
    }

    for entry in stats.values_mut() {
        entry.average_time_to_score = ratio(entry.total_goal_time as f64, entry.goals as f64);
        entry.average_time_to_first_goal =
            ratio(entry.total_first_goal_time as f64, entry.first_goals as f64);
    }

    Ok(stats)
}

/// Share of shots each team allows from the slot, discounted for the ones
/// it blocks. Highest share first.
pub fn danger_zone(table: &CsvTable) -> Result<Vec<DangerZoneStats>, ApiError> {
    let [team_col, distance_col, angle_col, type_col] = table.columns([
        "teamCode",
        "arenaAdjustedShotDistance",
        "shotAngleAdjusted",
        "shotType",
    ])?;

    let mut stats: HashMap<&str, DangerZoneStats> = HashMap::new();

    for row in table.rows() {
        let team_code = &row[team_col];
        if team_code.is_empty() {
            continue;
        }
        let (Ok(distance), Ok(angle)) = (
            row[distance_col].trim().parse::<f64>(),
            row[angle_col].trim().parse::<f64>(),
        ) else {
            continue;
        };

        let shot_type = row[type_col].to_ascii_lowercase();
        if !DANGER_ZONE_SHOT_TYPES.contains(&shot_type.as_str()) {
            continue;
        }

        let entry = stats.entry(team_code).or_insert_with(|| DangerZoneStats {
            team: team_code.to_string(),
            ..Default::default()
        });
        entry.total_shots_allowed += 1;

        if is_danger_zone(distance, angle, &shot_type) {
            if shot_type == "blocked" {
                entry.danger_zone_blocked += 1;
            } else {
                entry.danger_zone_shots_allowed += 1;
            }
        }
    }

    let mut ranked: Vec<DangerZoneStats> = stats
        .into_values()
        .map(|mut entry| {
            entry.danger_zone_percentage = percentage(
                entry.danger_zone_shots_allowed as f64,
                entry.total_shots_allowed as f64,
            );
            let attempts = entry.danger_zone_shots_allowed + entry.danger_zone_blocked;
            let blocked_share = ratio(entry.danger_zone_blocked as f64, attempts as f64);
            entry.adjusted_danger_percentage =
                entry.danger_zone_percentage * (1.0 - 0.5 * blocked_share);
            entry
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.danger_zone_percentage
            .total_cmp(&a.danger_zone_percentage)
            .then_with(|| a.team.cmp(&b.team))
    });
    for (idx, entry) in ranked.iter_mut().enumerate() {
        entry.rank = idx + 1;
    }

    Ok(ranked)
}
