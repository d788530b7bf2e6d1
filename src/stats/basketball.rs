use std::collections::{BTreeMap, HashMap, HashSet};

use crate::csv_data::CsvTable;
use crate::error::ApiError;
use crate::models::nba::{
    BlowoutFactors, BlowoutPrediction, EpmSide, FieldGoals, FourFactorsTeam, FreeThrows,
    MismatchMetric, PlayerStats, PlayerStatsEntry, PositionDefenseStats, PowerMetricTeam,
    PythagoreanMetadata, PythagoreanTeam, ShootingSplits, TeamEpm, TeamStatsEntry,
    TrueShootingTeam,
};
use crate::stats::{percentage, ratio, round_to};

pub const PYTHAGOREAN_EXPONENT: f64 = 13.91;
pub const HOME_ADVANTAGE: f64 = 3.0;
pub const BLOWOUT_THRESHOLD: f64 = 14.0;

/// Every NBA franchise, used when ranking a value against the league.
pub const LEAGUE_TEAMS: [&str; 30] = [
    "ATL", "BOS", "BKN", "CHA", "CHI", "CLE", "DAL", "DEN", "DET", "GSW", "HOU", "IND", "LAC",
    "LAL", "MEM", "MIA", "MIL", "MIN", "NOP", "NYK", "OKC", "ORL", "PHI", "PHX", "POR", "SAC",
    "SAS", "TOR", "UTA", "WAS",
];

// --- Pythagorean -------------------------------------------------------------

fn pythagorean_fraction(scored: f64, allowed: f64) -> f64 {
    if scored <= 0.0 || allowed <= 0.0 {
        return 0.0;
    }
    let s = scored.powf(PYTHAGOREAN_EXPONENT);
    s / (s + allowed.powf(PYTHAGOREAN_EXPONENT))
}

/// Expected win percentage (0-100) from points scored and allowed per game.
pub fn pythagorean_win_pct(scored: f64, allowed: f64) -> f64 {
    pythagorean_fraction(scored, allowed) * 100.0
}

pub fn pythagorean_team(entry: &TeamStatsEntry) -> PythagoreanTeam {
    let stats = &entry.stats;
    let scored = stats.offense.pts_per_game;
    let allowed = stats.defense.pts_against_per_game;
    let expected = pythagorean_win_pct(scored, allowed);
    let actual = stats.standings.win_pct * 100.0;
    let games = stats.standings.wins + stats.standings.losses;

    PythagoreanTeam {
        team: entry.display_name(),
        expected_win_pct: round_to(expected, 2),
        actual_win_pct: round_to(actual, 2),
        win_pct_differential: round_to(actual - expected, 2),
        points_scored_per_game: round_to(scored, 2),
        points_allowed_per_game: round_to(allowed, 2),
        actual_wins: stats.standings.wins,
        expected_wins: round_to(expected / 100.0 * games, 2),
    }
}

/// All teams, best expected record first.
pub fn pythagorean_table(entries: &[TeamStatsEntry]) -> Vec<PythagoreanTeam> {
    let mut teams: Vec<PythagoreanTeam> = entries.iter().map(pythagorean_team).collect();
    teams.sort_by(|a, b| b.expected_wins.total_cmp(&a.expected_wins));
    teams
}

pub fn pythagorean_metadata() -> PythagoreanMetadata {
    PythagoreanMetadata {
        pythagorean_exponent: PYTHAGOREAN_EXPONENT,
        formula: "Win% = (Points Per Game^13.91) / (Points Per Game^13.91 + Points Allowed Per Game^13.91)".to_string(),
        note: "Uses points per game to calculate expected winning percentage".to_string(),
    }
}

// --- Shooting ----------------------------------------------------------------

pub fn four_factors(entry: &TeamStatsEntry) -> FourFactorsTeam {
    let stats = &entry.stats;
    let fg = &stats.field_goals;
    let fta = stats.free_throws.ft_att;
    let tov = stats.defense.tov;
    let (orb, drb) = (stats.rebounds.off_reb, stats.rebounds.def_reb);

    let efg = percentage(fg.fg_made + 0.5 * fg.fg3_pt_made, fg.fg_att);
    let tov_rate = percentage(tov, fg.fg_att + 0.44 * fta + tov);
    let orb_rate = percentage(orb, orb + drb);
    let ft_rate = percentage(fta, fg.fg_att);
    let overall = (efg + (100.0 - tov_rate) + orb_rate + ft_rate) / 4.0;

    FourFactorsTeam {
        team: entry.display_name(),
        efg_percentage: round_to(efg, 2),
        turnover_rate: round_to(tov_rate, 2),
        offensive_rebound_rate: round_to(orb_rate, 2),
        free_throw_rate: round_to(ft_rate, 2),
        overall_rate: round_to(overall, 2),
    }
}

/// Four factors for every team, sorted by eFG% descending.
pub fn four_factors_table(entries: &[TeamStatsEntry]) -> Vec<FourFactorsTeam> {
    let mut teams: Vec<FourFactorsTeam> = entries.iter().map(four_factors).collect();
    teams.sort_by(|a, b| b.efg_percentage.total_cmp(&a.efg_percentage));
    teams
}

/// Team true shooting from made/attempted splits.
pub fn true_shooting(fg: &FieldGoals, ft: &FreeThrows) -> f64 {
    let points = 2.0 * fg.fg2_pt_made + 3.0 * fg.fg3_pt_made + ft.ft_made;
    let attempts = fg.fg2_pt_att + fg.fg3_pt_att + 0.44 * ft.ft_att;
    percentage(points, 2.0 * attempts)
}

pub fn true_shooting_team(entry: &TeamStatsEntry) -> TrueShootingTeam {
    let stats = &entry.stats;
    TrueShootingTeam {
        team: entry.team.clone(),
        stats: ShootingSplits {
            ft_pct: stats.free_throws.ft_pct,
            fg2_pt_pct: stats.field_goals.fg2_pt_pct,
            fg3_pt_pct: stats.field_goals.fg3_pt_pct,
        },
        ts_percentage: round_to(true_shooting(&stats.field_goals, &stats.free_throws), 2),
    }
}

// --- EPM ---------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionGroup {
    Backcourt,
    Frontcourt,
}

impl PositionGroup {
    pub fn of(position: &str) -> Option<Self> {
        match position {
            "PG" | "SG" | "SF" => Some(PositionGroup::Backcourt),
            "PF" | "C" => Some(PositionGroup::Frontcourt),
            _ => None,
        }
    }
}

#[derive(Default)]
struct WeightedSum {
    weighted: f64,
    minutes: f64,
}

impl WeightedSum {
    fn mean(&self) -> f64 {
        ratio(self.weighted, self.minutes)
    }
}

/// Minutes-weighted plus-minus per game for each team's two position
/// groups, keyed by team abbreviation.
pub fn team_epm(players: &[PlayerStatsEntry]) -> HashMap<String, TeamEpm> {
    let mut sums: HashMap<&str, (WeightedSum, WeightedSum)> = HashMap::new();

    for entry in players {
        let (Some(team), Some(group)) = (entry.team_abbreviation(), PositionGroup::of(entry.position()))
        else {
            continue;
        };
        let misc = &entry.stats.miscellaneous;
        let minutes = misc.min_seconds_per_game / 60.0;
        let (backcourt, frontcourt) = sums.entry(team).or_default();
        let sum = match group {
            PositionGroup::Backcourt => backcourt,
            PositionGroup::Frontcourt => frontcourt,
        };
        sum.weighted += misc.plus_minus_per_game * minutes;
        sum.minutes += minutes;
    }

    sums.into_iter()
        .map(|(team, (backcourt, frontcourt))| {
            (
                team.to_string(),
                TeamEpm {
                    backcourt: backcourt.mean(),
                    frontcourt: frontcourt.mean(),
                },
            )
        })
        .collect()
}

pub fn epm_rating(value: f64) -> &'static str {
    if value > 5.0 {
        "High"
    } else if value > -5.0 {
        "Average"
    } else {
        "Low"
    }
}

/// 1 + the number of league values strictly greater than `value`.
pub fn league_rank(value: f64, league: impl IntoIterator<Item = f64>) -> usize {
    1 + league.into_iter().filter(|&other| other > value).count()
}

/// One side of an EPM matchup, ranked against every team in `league`.
pub fn epm_side(team: &str, league: &HashMap<String, TeamEpm>) -> EpmSide {
    let epm = league.get(team).copied().unwrap_or_default();
    EpmSide {
        team: team.to_string(),
        backcourt: round_to(epm.backcourt, 2),
        backcourt_rating: epm_rating(epm.backcourt),
        backcourt_rank: league_rank(epm.backcourt, league.values().map(|t| t.backcourt)),
        frontcourt: round_to(epm.frontcourt, 2),
        frontcourt_rating: epm_rating(epm.frontcourt),
        frontcourt_rank: league_rank(epm.frontcourt, league.values().map(|t| t.frontcourt)),
    }
}

// --- Game predictions --------------------------------------------------------

fn net_rating(entry: &TeamStatsEntry) -> f64 {
    entry.stats.offense.pts_per_game - entry.stats.defense.pts_against_per_game
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

pub fn blowout_prediction(home: &TeamStatsEntry, away: &TeamStatsEntry) -> BlowoutPrediction {
    let net_diff = net_rating(home) - net_rating(away);
    let pyth = |e: &TeamStatsEntry| {
        pythagorean_fraction(e.stats.offense.pts_per_game, e.stats.defense.pts_against_per_game)
    };
    let pyth_diff = pyth(home) - pyth(away);

    let margin = 0.4 * net_diff + 15.0 * pyth_diff + HOME_ADVANTAGE;
    let home_name = home.display_name();
    let away_name = away.display_name();
    let favored_team = if margin >= 0.0 {
        home_name.clone()
    } else {
        away_name.clone()
    };
    let predicted_margin = margin.abs();

    BlowoutPrediction {
        home_team: home_name,
        away_team: away_name,
        favored_team,
        predicted_margin,
        blowout_probability: logistic(0.2 * (predicted_margin - BLOWOUT_THRESHOLD)),
        factors: BlowoutFactors {
            net_rating: net_diff,
            pyth_win_pct: pyth_diff,
            home_advantage: HOME_ADVANTAGE,
        },
    }
}

/// Scoring-based win probability for one side of a matchup, in `[0, 1]`.
pub fn matchup_win_probability(points_per_game: f64, opponent_allowed_per_game: f64) -> f64 {
    (0.5 * ratio(points_per_game, points_per_game + opponent_allowed_per_game)).clamp(0.0, 1.0)
}

// --- Player metrics ----------------------------------------------------------

pub fn positional_defensive_rating(steals: f64, blocks: f64, turnovers: f64) -> f64 {
    0.3 * steals + 0.3 * blocks + 0.2 / (turnovers + 0.1)
}

/// The `limit` lowest-rated defenders per primary position among players
/// on `teams`, weakest first.
pub fn weakest_defenders(
    players: &[PlayerStatsEntry],
    teams: &HashSet<String>,
    limit: usize,
) -> BTreeMap<String, Vec<PositionDefenseStats>> {
    let mut by_position: BTreeMap<String, Vec<PositionDefenseStats>> = BTreeMap::new();

    for entry in players {
        let Some(team) = entry.team_abbreviation() else {
            continue;
        };
        let position = entry.position();
        if position.is_empty() || !teams.contains(&team.to_uppercase()) {
            continue;
        }
        let defense = &entry.stats.defense;
        by_position
            .entry(position.to_string())
            .or_default()
            .push(PositionDefenseStats {
                team: team.to_string(),
                player: format!("{} {}", entry.player.first_name, entry.player.last_name),
                position: position.to_string(),
                steals_per_game: defense.stl_per_game,
                blocks_per_game: defense.blk_per_game,
                turnovers_per_game: defense.tov_per_game,
                defensive_rating: positional_defensive_rating(
                    defense.stl_per_game,
                    defense.blk_per_game,
                    defense.tov_per_game,
                ),
                defensive_rank: 0,
            });
    }

    for list in by_position.values_mut() {
        list.sort_by(|a, b| a.defensive_rating.total_cmp(&b.defensive_rating));
        list.truncate(limit);
        for (i, stats) in list.iter_mut().enumerate() {
            stats.defensive_rank = i + 1;
        }
    }
    by_position
}

pub fn mismatch_metric(stats: &PlayerStats) -> MismatchMetric {
    let offensive_rating = (stats.usg_pct + stats.ts_pct + stats.efg_pct) / 3.0;
    let defensive_rating = stats.defense.stl;
    MismatchMetric {
        offensive_rating,
        defensive_rating,
        mismatch_score: offensive_rating - defensive_rating,
    }
}

pub fn simplified_per(stats: &PlayerStats) -> f64 {
    let total = stats.offense.pts + stats.rebounds.reb + stats.offense.ast + stats.defense.stl
        + stats.defense.blk
        - stats.defense.tov;
    ratio(total, stats.games_played)
}

pub fn player_ts_pct(stats: &PlayerStats) -> f64 {
    percentage(
        stats.offense.pts,
        2.0 * stats.field_goals.fg_att + 0.95 * stats.free_throws.ft_att,
    )
}

pub fn player_efg_pct(stats: &PlayerStats) -> f64 {
    let fg = &stats.field_goals;
    percentage(fg.fg_made + 0.5 * fg.fg3_pt_made, fg.fg_att)
}

// --- Power metric ------------------------------------------------------------

/// Inputs of one `powermetric.csv` row.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerInputs {
    pub adjusted_four_factors: f64,
    pub offensive_efficiency: f64,
    pub defensive_efficiency: f64,
    pub efficiency_differential: f64,
    pub point_differential: f64,
    pub remaining_schedule: f64,
    pub consistency: f64,
}

pub fn power_metric(inputs: &PowerInputs) -> f64 {
    0.3 * inputs.adjusted_four_factors + 0.2 * inputs.offensive_efficiency
        - 0.2 * inputs.defensive_efficiency
        + 0.2 * inputs.efficiency_differential
        + 0.1 * inputs.point_differential
        - 0.1 * inputs.remaining_schedule
        - 0.1 * inputs.consistency
}

/// Ranks every row of the power metric sheet, strongest first.
pub fn power_rankings(table: &CsvTable) -> Result<Vec<PowerMetricTeam>, ApiError> {
    let [team, conference, a4f, oeff, deff, ediff, pdiff, rsos, cons] = table.columns([
        "team", "conference", "a4f", "oeff", "deff", "ediff", "pdiff", "rsos", "cons",
    ])?;

    let mut teams = Vec::new();
    for row in table.rows() {
        let parsed: Result<Vec<f64>, _> = [a4f, oeff, deff, ediff, pdiff, rsos, cons]
            .iter()
            .map(|&col| row[col].trim().parse::<f64>())
            .collect();
        let Ok(values) = parsed else {
            continue;
        };
        let inputs = PowerInputs {
            adjusted_four_factors: values[0],
            offensive_efficiency: values[1],
            defensive_efficiency: values[2],
            efficiency_differential: values[3],
            point_differential: values[4],
            remaining_schedule: values[5],
            consistency: values[6],
        };
        teams.push(PowerMetricTeam {
            name: row[team].to_string(),
            conference: row[conference].to_string(),
            power_metric: power_metric(&inputs),
        });
    }

    teams.sort_by(|a, b| b.power_metric.total_cmp(&a.power_metric));
    Ok(teams)
}
