//! Per-shooter season and recent-form aggregation for the NHL search index.

use std::collections::{BTreeMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::csv_data::CsvTable;
use crate::models::nhl::{GameShotStats, NhlPlayerDocument, NhlRecentFields, NhlTrends};
use crate::stats::hockey::{is_danger_zone, is_power_play, parse_flag};
use crate::stats::{percentage, ratio, round_to};

pub const RECENT_WINDOW_DAYS: i64 = 30;
/// Undated files use roughly the last sixth of the shots as "recent".
const UNDATED_RECENT_DIVISOR: f64 = 6.2;
pub const MIN_INDEXED_ATTEMPTS: u32 = 5;
/// Columns a shot export must carry before anything is aggregated or indexed.
pub const REQUIRED_COLUMNS: [&str; 5] =
    ["game_id", "shooterPlayerId", "shooterName", "teamCode", "event"];

const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

#[derive(Debug, Clone, Default)]
pub struct ShotRecord {
    pub game_id: String,
    pub shooter_id: String,
    pub shooter_name: String,
    pub position: String,
    pub team_code: String,
    pub home_team_code: String,
    pub away_team_code: String,
    pub distance: f64,
    pub angle: f64,
    pub shot_type: String,
    pub goal: bool,
    pub x_goal: f64,
    pub rush: bool,
    pub on_goal: bool,
    pub empty_net: bool,
    pub home_skaters: u32,
    pub away_skaters: u32,
    pub shooter_time_on_ice: f64,
    pub date: Option<NaiveDateTime>,
}

impl ShotRecord {
    fn shooter_is_home(&self) -> bool {
        self.team_code == self.home_team_code
    }
}

fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

/// Builds shot records from a shot export. Columns are optional here;
/// absent or unparsable values take their defaults.
pub fn parse_shots(table: &CsvTable) -> Vec<ShotRecord> {
    let col = |name: &str| table.position(name);
    let (game, shooter_id, shooter_name, position, team, home, away) = (
        col("game_id"),
        col("shooterPlayerId"),
        col("shooterName"),
        col("playerPositionThatDidEvent"),
        col("teamCode"),
        col("homeTeamCode"),
        col("awayTeamCode"),
    );
    let (distance, angle, shot_type, goal, x_goal, rush, event, empty_net) = (
        col("shotDistance"),
        col("shotAngle"),
        col("shotType"),
        col("goal"),
        col("xGoal"),
        col("shotRush"),
        col("event"),
        col("shotOnEmptyNet"),
    );
    let (home_skaters, away_skaters, toi, time) = (
        col("homeSkatersOnIce"),
        col("awaySkatersOnIce"),
        col("shooterTimeOnIce"),
        col("time"),
    );

    table
        .rows()
        .filter_map(|row| {
            let text = |idx: Option<usize>| idx.and_then(|i| row.get(i)).unwrap_or("");
            let float = |idx: Option<usize>| text(idx).trim().parse::<f64>().unwrap_or(0.0);
            let flag = |idx: Option<usize>| parse_flag(text(idx)).unwrap_or(false);
            let skaters = |idx: Option<usize>| text(idx).trim().parse::<u32>().unwrap_or(5);

            let shooter_id = text(shooter_id);
            let shooter_name = text(shooter_name);
            if shooter_id.is_empty() || shooter_name.is_empty() {
                return None;
            }

            Some(ShotRecord {
                game_id: text(game).to_string(),
                shooter_id: shooter_id.to_string(),
                shooter_name: shooter_name.to_string(),
                position: text(position).to_string(),
                team_code: text(team).to_string(),
                home_team_code: text(home).to_string(),
                away_team_code: text(away).to_string(),
                distance: float(distance),
                angle: float(angle),
                shot_type: text(shot_type).to_string(),
                goal: flag(goal),
                x_goal: float(x_goal),
                rush: flag(rush),
                on_goal: text(event) == "SHOT",
                empty_net: flag(empty_net),
                home_skaters: skaters(home_skaters),
                away_skaters: skaters(away_skaters),
                shooter_time_on_ice: float(toi),
                date: parse_date(text(time)),
            })
        })
        .collect()
}

/// Shots from the last thirty days, or the tail of an undated file.
pub fn recent_window(shots: &[ShotRecord], now: NaiveDateTime) -> Vec<&ShotRecord> {
    if shots.iter().any(|s| s.date.is_some()) {
        let cutoff = now - Duration::days(RECENT_WINDOW_DAYS);
        return shots
            .iter()
            .filter(|s| s.date.is_some_and(|d| d > cutoff))
            .collect();
    }

    let recent = (shots.len() as f64 / UNDATED_RECENT_DIVISOR) as usize;
    if recent == 0 {
        return shots.iter().collect();
    }
    shots[shots.len() - recent..].iter().collect()
}

/// Running totals for one shooter.
#[derive(Debug, Clone, Default)]
pub struct ShooterTotals {
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub team_code: String,
    pub games_played: u32,
    pub shots_attempted: u32,
    pub shots_on_goal: u32,
    pub goals: u32,
    pub empty_net_goals: u32,
    pub rush_shots: u32,
    pub average_distance: f64,
    pub average_angle: f64,
    pub total_x_goals: f64,
    pub time_on_ice: f64,
    pub power_play_shots: u32,
    pub power_play_goals: u32,
    pub high_danger_shots: u32,
    pub high_danger_goals: u32,
}

impl ShooterTotals {
    fn add(&mut self, shot: &ShotRecord) {
        self.shots_attempted += 1;
        if shot.on_goal {
            self.shots_on_goal += 1;
        }

        if shot.empty_net && shot.on_goal {
            self.goals += 1;
            self.empty_net_goals += 1;
        } else if shot.goal {
            self.goals += 1;
            if !shot.on_goal {
                self.shots_on_goal += 1;
            }
            if shot.empty_net {
                self.empty_net_goals += 1;
            }
        }

        if shot.rush {
            self.rush_shots += 1;
        }
        if is_danger_zone(shot.distance, shot.angle, &shot.shot_type) {
            self.high_danger_shots += 1;
            if shot.goal {
                self.high_danger_goals += 1;
            }
        }
        if is_power_play(shot.home_skaters, shot.away_skaters, shot.shooter_is_home()) {
            self.power_play_shots += 1;
            if shot.goal {
                self.power_play_goals += 1;
            }
        }

        let n = self.shots_attempted as f64;
        self.average_distance += (shot.distance - self.average_distance) / n;
        self.average_angle += (shot.angle.abs() - self.average_angle) / n;
        self.total_x_goals += shot.x_goal;
        self.time_on_ice += shot.shooter_time_on_ice;
    }
}

pub fn aggregate_players<'a>(
    shots: impl IntoIterator<Item = &'a ShotRecord>,
) -> BTreeMap<String, ShooterTotals> {
    let mut players: BTreeMap<String, ShooterTotals> = BTreeMap::new();
    let mut games: BTreeMap<&str, HashSet<&str>> = BTreeMap::new();

    for shot in shots {
        let totals = players
            .entry(shot.shooter_id.clone())
            .or_insert_with(|| ShooterTotals {
                player_id: shot.shooter_id.clone(),
                player_name: shot.shooter_name.clone(),
                position: shot.position.clone(),
                team_code: shot.team_code.clone(),
                ..Default::default()
            });
        totals.add(shot);
        games
            .entry(shot.shooter_id.as_str())
            .or_default()
            .insert(shot.game_id.as_str());
    }

    for (id, played) in games {
        if let Some(totals) = players.get_mut(id) {
            totals.games_played = played.len() as u32;
        }
    }

    players
}

pub fn aggregate_games(shots: &[ShotRecord]) -> BTreeMap<String, GameShotStats> {
    let mut games: BTreeMap<String, GameShotStats> = BTreeMap::new();

    for shot in shots {
        let game = games.entry(shot.game_id.clone()).or_insert_with(|| GameShotStats {
            game_id: shot.game_id.clone(),
            home_team: shot.home_team_code.clone(),
            away_team: shot.away_team_code.clone(),
            ..Default::default()
        });

        let goal = u32::from(shot.goal);
        game.total_shots += 1;
        game.total_goals += goal;
        game.total_x_goals += shot.x_goal;
        if shot.shooter_is_home() {
            game.home_shots += 1;
            game.home_goals += goal;
            game.home_x_goals += shot.x_goal;
        } else {
            game.away_shots += 1;
            game.away_goals += goal;
            game.away_x_goals += shot.x_goal;
        }
    }

    for game in games.values_mut() {
        let xg = game.home_x_goals + game.away_x_goals;
        if xg > 0.0 {
            game.home_xg_share = Some(round_to(game.home_x_goals / xg, 3));
        }
        game.game_pace = round_to(game.total_shots as f64 / 60.0, 1);
        game.total_x_goals = round_to(game.total_x_goals, 2);
        game.home_x_goals = round_to(game.home_x_goals, 2);
        game.away_x_goals = round_to(game.away_x_goals, 2);
    }

    games
}

/// Derived rates for one shooter, each rounded to one decimal.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvancedMetrics {
    pub shooting_pct: f64,
    pub shot_on_goal_pct: f64,
    pub shots_per_game: f64,
    pub shots_on_goal_per_game: f64,
    pub x_goals_per_shot: f64,
    pub goals_per_game: f64,
    pub x_goals_per_game: f64,
    pub rush_shooting_pct: f64,
    pub goals_above_expected: f64,
    pub high_danger_shot_pct: f64,
    pub high_danger_goal_pct: f64,
    pub power_play_shooting_pct: f64,
    pub hockey_card_rating: f64,
    pub hockey_card_rating_per_game: f64,
}

fn card_rating(p: &ShooterTotals) -> f64 {
    if p.shots_attempted == 0 {
        return 0.0;
    }
    let goals = p.goals as f64;
    goals + 0.5 * p.high_danger_goals as f64 + 2.0 * (goals - p.total_x_goals)
}

pub fn advanced_metrics(p: &ShooterTotals) -> AdvancedMetrics {
    let r1 = |v: f64| round_to(v, 1);
    let games = p.games_played as f64;
    let attempts = p.shots_attempted as f64;
    let rating = card_rating(p);

    AdvancedMetrics {
        shooting_pct: r1(percentage(p.goals as f64, p.shots_on_goal as f64)),
        shot_on_goal_pct: r1(percentage(p.shots_on_goal as f64, attempts)),
        shots_per_game: r1(ratio(attempts, games)),
        shots_on_goal_per_game: r1(ratio(p.shots_on_goal as f64, games)),
        x_goals_per_shot: r1(ratio(p.total_x_goals, attempts)),
        goals_per_game: r1(ratio(p.goals as f64, games)),
        x_goals_per_game: r1(ratio(p.total_x_goals, games)),
        rush_shooting_pct: r1(percentage(p.goals as f64, p.rush_shots as f64)),
        goals_above_expected: r1(p.goals as f64 - p.total_x_goals),
        high_danger_shot_pct: r1(percentage(p.high_danger_shots as f64, attempts)),
        high_danger_goal_pct: r1(percentage(
            p.high_danger_goals as f64,
            p.high_danger_shots as f64,
        )),
        power_play_shooting_pct: r1(percentage(
            p.power_play_goals as f64,
            p.power_play_shots as f64,
        )),
        hockey_card_rating: r1(rating),
        hockey_card_rating_per_game: r1(ratio(rating, games)),
    }
}

/// Recent rate minus the rate over the rest of the season. `None` when
/// either side has no denominator.
fn rate_trend(recent: (u32, u32), season: (u32, u32)) -> Option<f64> {
    let (recent_num, recent_den) = recent;
    let prior_num = season.0.saturating_sub(recent_num);
    let prior_den = season.1.saturating_sub(recent_den);
    if recent_den == 0 || prior_den == 0 {
        return None;
    }
    Some(recent_num as f64 / recent_den as f64 - prior_num as f64 / prior_den as f64)
}

fn trends(season: &ShooterTotals, recent: &ShooterTotals) -> NhlTrends {
    let r1 = |v: f64| round_to(v, 1);
    let prior_games = (season.games_played - recent.games_played) as f64;
    let recent_games = recent.games_played as f64;
    let season_metrics = advanced_metrics(season);
    let recent_metrics = advanced_metrics(recent);

    let goals_trend = recent.goals as f64 / recent_games
        - season.goals.saturating_sub(recent.goals) as f64 / prior_games;
    let x_goals_trend = recent.total_x_goals / recent_games
        - (season.total_x_goals - recent.total_x_goals) / prior_games;
    let shooting_pct_trend = rate_trend(
        (recent.goals, recent.shots_on_goal),
        (season.goals, season.shots_on_goal),
    )
    .map(|_| {
        let prior_sog = (season.shots_on_goal - recent.shots_on_goal) as f64;
        let prior_goals = season.goals.saturating_sub(recent.goals) as f64;
        recent_metrics.shooting_pct - prior_goals / prior_sog * 100.0
    })
    .unwrap_or(0.0);
    let card_trend = recent_metrics.hockey_card_rating_per_game
        - (season_metrics.hockey_card_rating - recent_metrics.hockey_card_rating) / prior_games;

    let rush_trend = if recent.rush_shots > 0 && season.rush_shots > recent.rush_shots {
        rate_trend(
            (recent.rush_shots, recent.shots_attempted),
            (season.rush_shots, season.shots_attempted),
        )
    } else {
        None
    };
    let power_play_trend = if season.power_play_shots > recent.power_play_shots {
        rate_trend(
            (recent.power_play_goals, recent.power_play_shots),
            (season.power_play_goals, season.power_play_shots),
        )
    } else {
        None
    };

    NhlTrends {
        goals_scoring_trend: r1(goals_trend),
        shooting_pct_trend: r1(shooting_pct_trend),
        x_goals_trend: r1(x_goals_trend),
        recent_high_danger_scoring_trend: rate_trend(
            (recent.high_danger_goals, recent.high_danger_shots),
            (season.high_danger_goals, season.high_danger_shots),
        )
        .map(|t| r1(t * 100.0)),
        rush_shot_pct_trend: rush_trend.map(|t| r1(t * 100.0)),
        power_play_scoring_trend: power_play_trend.map(|t| r1(t * 100.0)),
        hockey_card_trend: r1(card_trend),
    }
}

fn recent_fields(season: &ShooterTotals, recent: &ShooterTotals) -> NhlRecentFields {
    let r1 = |v: f64| round_to(v, 1);
    let metrics = advanced_metrics(recent);
    let games = recent.games_played as f64;

    NhlRecentFields {
        recent_games_played: recent.games_played,
        recent_shots_attempted: recent.shots_attempted,
        recent_shots_on_goal: recent.shots_on_goal,
        recent_goals: recent.goals,
        recent_shots_per_game: r1(ratio(recent.shots_attempted as f64, games)),
        recent_shots_on_goal_per_game: r1(ratio(recent.shots_on_goal as f64, games)),
        recent_goals_per_game: r1(ratio(recent.goals as f64, games)),
        recent_shooting_pct: metrics.shooting_pct,
        recent_x_goals: r1(recent.total_x_goals),
        recent_x_goals_per_game: r1(ratio(recent.total_x_goals, games)),
        recent_goals_above_expected: metrics.goals_above_expected,
        recent_high_danger_goals: recent.high_danger_goals,
        recent_high_danger_shots: recent.high_danger_shots,
        recent_power_play_goals: recent.power_play_goals,
        recent_hockey_card_rating: metrics.hockey_card_rating,
        recent_high_danger_shot_pct: metrics.high_danger_shot_pct,
        recent_high_danger_goal_pct: metrics.high_danger_goal_pct,
        trends: (season.games_played > recent.games_played).then(|| trends(season, recent)),
    }
}

/// Search document for a shooter, or `None` below the attempt threshold.
pub fn player_document(
    season: &ShooterTotals,
    recent: Option<&ShooterTotals>,
    last_updated: &str,
) -> Option<NhlPlayerDocument> {
    if season.shots_attempted < MIN_INDEXED_ATTEMPTS {
        return None;
    }

    let r1 = |v: f64| round_to(v, 1);
    let metrics = advanced_metrics(season);

    Some(NhlPlayerDocument {
        object_id: format!("nhl_player_{}", season.player_id),
        player_id: season.player_id.clone(),
        player_name: season.player_name.clone(),
        position: season.position.clone(),
        team_code: season.team_code.clone(),
        games_played: season.games_played,
        shots_attempted: season.shots_attempted,
        shots_on_goal: season.shots_on_goal,
        goals: season.goals,
        empty_net_goals: season.empty_net_goals,
        shots_per_game: metrics.shots_per_game,
        shots_on_goal_per_game: metrics.shots_on_goal_per_game,
        goals_per_game: metrics.goals_per_game,
        average_distance: r1(season.average_distance),
        average_angle: r1(season.average_angle),
        total_x_goals: r1(season.total_x_goals),
        x_goals_per_game: metrics.x_goals_per_game,
        shooting_pct: metrics.shooting_pct,
        shot_on_goal_pct: metrics.shot_on_goal_pct,
        x_goals_per_shot: metrics.x_goals_per_shot,
        rush_shots: season.rush_shots,
        rush_shot_pct: r1(percentage(
            season.rush_shots as f64,
            season.shots_attempted as f64,
        )),
        high_danger_shots: season.high_danger_shots,
        high_danger_goals: season.high_danger_goals,
        high_danger_shot_pct: metrics.high_danger_shot_pct,
        high_danger_goal_pct: metrics.high_danger_goal_pct,
        power_play_shots: season.power_play_shots,
        power_play_goals: season.power_play_goals,
        power_play_shot_pct: metrics.power_play_shooting_pct,
        goals_above_expected: metrics.goals_above_expected,
        hockey_card_rating: metrics.hockey_card_rating,
        hockey_card_rating_per_game: metrics.hockey_card_rating_per_game,
        last_updated: last_updated.to_string(),
        recent: recent
            .filter(|r| r.games_played > 0)
            .map(|r| recent_fields(season, r)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shot(player: &str, game: &str) -> ShotRecord {
        ShotRecord {
            game_id: game.to_string(),
            shooter_id: player.to_string(),
            shooter_name: format!("Player {player}"),
            position: "C".to_string(),
            team_code: "TOR".to_string(),
            home_team_code: "TOR".to_string(),
            away_team_code: "MTL".to_string(),
            distance: 40.0,
            angle: 50.0,
            shot_type: "WRIST".to_string(),
            home_skaters: 5,
            away_skaters: 5,
            ..Default::default()
        }
    }

    fn at(date: &str) -> NaiveDateTime {
        parse_date(date).unwrap()
    }

    #[test]
    fn parses_rows_and_skips_anonymous_shooters() {
        let csv = "shooterPlayerId,shooterName,game_id,event,goal,shotRush,homeSkatersOnIce,time\n\
                   8478402,Connor McDavid,1,SHOT,0,1,,2025-02-20\n\
                   ,Nobody,1,SHOT,0,0,5,\n\
                   8478402,Connor McDavid,2,GOAL,true,0,4,02/21/2025 19:30:00\n";
        let table = CsvTable::from_reader(csv.as_bytes()).unwrap();
        let shots = parse_shots(&table);

        assert_eq!(shots.len(), 2);
        assert!(shots[0].on_goal);
        assert!(shots[0].rush);
        assert_eq!(shots[0].home_skaters, 5);
        assert_eq!(shots[0].date, Some(at("2025-02-20")));
        assert!(shots[1].goal && !shots[1].on_goal);
        assert_eq!(shots[1].home_skaters, 4);
        assert_eq!(shots[1].date, Some(at("2025-02-21 19:30:00")));
    }

    #[test]
    fn recent_window_prefers_dates() {
        let mut old = shot("1", "1");
        old.date = Some(at("2025-01-01"));
        let mut fresh = shot("1", "2");
        fresh.date = Some(at("2025-03-01"));
        let undated = shot("1", "3");
        let shots = vec![old, fresh, undated];

        let recent = recent_window(&shots, at("2025-03-05"));
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].game_id, "2");
    }

    #[test]
    fn recent_window_falls_back_to_the_tail() {
        let shots: Vec<ShotRecord> = (0..13).map(|i| shot("1", &i.to_string())).collect();
        let recent = recent_window(&shots, at("2025-03-05"));
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].game_id, "11");

        let few: Vec<ShotRecord> = (0..3).map(|i| shot("1", &i.to_string())).collect();
        assert_eq!(recent_window(&few, at("2025-03-05")).len(), 3);
    }

    #[test]
    fn goals_off_target_still_count_as_on_goal() {
        let mut on_target = shot("9", "1");
        on_target.on_goal = true;
        let mut goal = shot("9", "1");
        goal.goal = true;
        goal.x_goal = 0.25;
        let mut empty_net = shot("9", "2");
        empty_net.on_goal = true;
        empty_net.empty_net = true;

        let players = aggregate_players(&[on_target, goal, empty_net]);
        let totals = &players["9"];
        assert_eq!(totals.games_played, 2);
        assert_eq!(totals.shots_attempted, 3);
        assert_eq!(totals.shots_on_goal, 3);
        assert_eq!(totals.goals, 2);
        assert_eq!(totals.empty_net_goals, 1);
        assert_eq!(totals.average_distance, 40.0);
    }

    #[test]
    fn card_rating_rewards_finishing_above_expected() {
        let totals = ShooterTotals {
            games_played: 4,
            shots_attempted: 20,
            shots_on_goal: 10,
            goals: 3,
            high_danger_shots: 4,
            high_danger_goals: 2,
            total_x_goals: 2.0,
            ..Default::default()
        };
        let metrics = advanced_metrics(&totals);

        assert_eq!(metrics.shooting_pct, 30.0);
        assert_eq!(metrics.high_danger_goal_pct, 50.0);
        assert_eq!(metrics.hockey_card_rating, 6.0);
        assert_eq!(metrics.hockey_card_rating_per_game, 1.5);
        assert_eq!(metrics.rush_shooting_pct, 0.0);
        assert_eq!(advanced_metrics(&ShooterTotals::default()), AdvancedMetrics::default());
    }

    #[test]
    fn documents_need_five_attempts_and_carry_trends() {
        let season = ShooterTotals {
            player_id: "77".to_string(),
            games_played: 10,
            shots_attempted: 30,
            shots_on_goal: 20,
            goals: 4,
            ..Default::default()
        };
        let recent = ShooterTotals {
            games_played: 2,
            shots_attempted: 8,
            shots_on_goal: 4,
            goals: 2,
            ..Default::default()
        };

        let doc = player_document(&season, Some(&recent), "2025-03-03T00:00:00Z").unwrap();
        assert_eq!(doc.object_id, "nhl_player_77");
        let fields = doc.recent.unwrap();
        let trends = fields.trends.unwrap();
        assert_eq!(trends.goals_scoring_trend, 0.8);
        assert_eq!(trends.shooting_pct_trend, 37.5);
        assert!(trends.power_play_scoring_trend.is_none());

        let thin = ShooterTotals { shots_attempted: 4, ..season };
        assert!(player_document(&thin, None, "").is_none());
    }

    #[test]
    fn game_summary_splits_home_and_away() {
        let mut away = shot("2", "5");
        away.team_code = "MTL".to_string();
        away.x_goal = 0.3;
        let mut home = shot("1", "5");
        home.goal = true;
        home.x_goal = 0.1;

        let games = aggregate_games(&[home, away]);
        let game = &games["5"];
        assert_eq!((game.home_shots, game.away_shots), (1, 1));
        assert_eq!(game.home_goals, 1);
        assert_eq!(game.home_xg_share, Some(0.25));
        assert_eq!(game.game_pace, 0.0);
    }
}
