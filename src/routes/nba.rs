use std::collections::{HashMap, HashSet};

use axum::{
    extract::{Path, Query, State},
    response::Json,
};
use serde::Deserialize;

use super::{load_csv, parse_slate_date, CsvQuery, DateQuery};
use crate::error::ApiError;
use crate::models::nba::{
    BayesMatchupResponse, BlowoutResponse, EpmMatchup, FeedGame, FourFactorsTeam, Matchup,
    MismatchMetric, PositionalDefenseData, PowerMetricTeam, PythagoreanData, StatusEnvelope,
    TeamStatsEntry, TeamWinProbability, TrueShootingResponse,
};
use crate::state::AppState;
use crate::stats::basketball;
use crate::upstream::sportsfeeds::PlayerStatsQuery;

const WEAKEST_PER_POSITION: usize = 10;

/// Fetches the slate for `date` as home/away abbreviation pairs.
async fn slate(state: &AppState, date: chrono::NaiveDate) -> Result<Vec<Matchup>, ApiError> {
    let games = state
        .sportsfeeds()?
        .games_on(&state.config.nba_season, date)
        .await
        .map_err(ApiError::upstream("Failed to fetch today's schedule"))?;

    tracing::debug!("{} NBA games on {}", games.len(), date);
    Ok(games.iter().map(Matchup::from).collect())
}

async fn league_team_stats(state: &AppState) -> Result<Vec<TeamStatsEntry>, ApiError> {
    let response = state
        .sportsfeeds()?
        .team_stats_totals(&state.config.nba_season, None)
        .await
        .map_err(ApiError::upstream("Failed to fetch team stats"))?;

    Ok(response.team_stats_totals)
}

fn by_abbreviation(entries: Vec<TeamStatsEntry>) -> HashMap<String, TeamStatsEntry> {
    entries
        .into_iter()
        .map(|entry| (entry.team.abbreviation.to_uppercase(), entry))
        .collect()
}

// GET /nba/games/{date} - Unplayed games on a YYYYMMDD date
pub async fn games_on_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<Vec<FeedGame>>, ApiError> {
    let date = parse_slate_date(&date)?;
    let games = state
        .sportsfeeds()?
        .games_on(&state.config.nba_season, date)
        .await
        .map_err(ApiError::upstream("Failed to fetch games"))?;

    let unplayed = games
        .into_iter()
        .filter(|game| game.schedule.played_status.as_deref() == Some("UNPLAYED"))
        .collect();

    Ok(Json(unplayed))
}

// GET /nba/pythagorean - Expected vs actual wins for every team
pub async fn pythagorean(
    State(state): State<AppState>,
) -> Result<Json<StatusEnvelope<PythagoreanData>>, ApiError> {
    let teams = league_team_stats(&state).await?;

    Ok(Json(StatusEnvelope::success(PythagoreanData {
        teams: basketball::pythagorean_table(&teams),
        metadata: basketball::pythagorean_metadata(),
    })))
}

// GET /nba/fourfactor - Dean Oliver's four factors per team
pub async fn four_factors(
    State(state): State<AppState>,
) -> Result<Json<Vec<FourFactorsTeam>>, ApiError> {
    let teams = league_team_stats(&state).await?;
    Ok(Json(basketball::four_factors_table(&teams)))
}

// GET /nba/trueshooting - Team true shooting percentage
pub async fn true_shooting(
    State(state): State<AppState>,
) -> Result<Json<TrueShootingResponse>, ApiError> {
    let teams = league_team_stats(&state).await?;

    Ok(Json(TrueShootingResponse {
        team_stats_totals: teams.iter().map(basketball::true_shooting_team).collect(),
    }))
}

// GET /nba/epm?date=YYYYMMDD - Backcourt/frontcourt EPM for the day's matchups
pub async fn epm(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<EpmMatchup>>, ApiError> {
    let games = slate(&state, query.slate(0)?).await?;
    if games.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let players = state
        .sportsfeeds()?
        .player_stats_totals(&state.config.nba_season, &PlayerStatsQuery::default())
        .await
        .map_err(ApiError::upstream("Failed to fetch player stats"))?;

    let mut league = basketball::team_epm(&players.player_stats_totals);
    league.retain(|team, _| basketball::LEAGUE_TEAMS.contains(&team.as_str()));

    let matchups = games
        .iter()
        .map(|game| EpmMatchup {
            matchup: format!("{} vs {}", game.home_team, game.away_team),
            home: basketball::epm_side(&game.home_team, &league),
            away: basketball::epm_side(&game.away_team, &league),
        })
        .collect();

    Ok(Json(matchups))
}

// GET /nba/blowout?date=YYYYMMDD - Blowout likelihood for each game on the slate
pub async fn blowout(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<BlowoutResponse>, ApiError> {
    let date = query.slate(0)?;
    let games = slate(&state, date).await?;
    let teams = by_abbreviation(league_team_stats(&state).await?);

    let mut predictions = Vec::new();
    for game in &games {
        let (Some(home), Some(away)) = (teams.get(&game.home_team), teams.get(&game.away_team))
        else {
            tracing::warn!(
                "Missing team stats for {} vs {}, skipping",
                game.home_team,
                game.away_team
            );
            continue;
        };
        predictions.push(basketball::blowout_prediction(home, away));
    }
    predictions.sort_by(|a, b| b.blowout_probability.total_cmp(&a.blowout_probability));

    Ok(Json(BlowoutResponse {
        date: date.format("%Y-%m-%d").to_string(),
        predictions,
    }))
}

// GET /nba/bayes-matchup?date=YYYYMMDD - Scoring-based win probability per matchup
pub async fn bayes_matchup(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<BayesMatchupResponse>, ApiError> {
    let date = query.slate(0)?;
    let games = slate(&state, date).await?;
    let teams = by_abbreviation(league_team_stats(&state).await?);

    let lookup = |abbr: &str| {
        teams
            .get(abbr)
            .ok_or_else(|| ApiError::NotFound(format!("No stats found for team {}", abbr)))
    };

    let mut matchups = Vec::with_capacity(games.len());
    for game in &games {
        let home = lookup(&game.home_team)?;
        let away = lookup(&game.away_team)?;
        let side = |team: &TeamStatsEntry, opponent: &TeamStatsEntry| TeamWinProbability {
            team: team.team.name.clone(),
            abbreviation: team.team.abbreviation.clone(),
            win_probability: basketball::matchup_win_probability(
                team.stats.offense.pts_per_game,
                opponent.stats.defense.pts_against_per_game,
            ),
        };
        matchups.push([side(home, away), side(away, home)]);
    }

    Ok(Json(BayesMatchupResponse {
        date: date.format("%Y-%m-%d").to_string(),
        matchups,
    }))
}

// GET /nba/positional-defense?date=YYYYMMDD - Weakest defenders by position among the day's teams
pub async fn positional_defense(
    State(state): State<AppState>,
    Query(query): Query<DateQuery>,
) -> Result<Json<StatusEnvelope<PositionalDefenseData>>, ApiError> {
    let games = slate(&state, query.slate(0)?).await?;
    if games.is_empty() {
        return Ok(Json(StatusEnvelope::success(PositionalDefenseData::Message {
            message: "No NBA games scheduled for today".to_string(),
        })));
    }

    let teams: HashSet<String> = games
        .iter()
        .flat_map(|g| [g.home_team.to_uppercase(), g.away_team.to_uppercase()])
        .collect();
    let mut team_filter: Vec<String> = teams.iter().map(|t| t.to_lowercase()).collect();
    team_filter.sort();

    let players = state
        .sportsfeeds()?
        .player_stats_totals(
            &state.config.nba_season,
            &PlayerStatsQuery {
                teams: &team_filter,
                ..Default::default()
            },
        )
        .await
        .map_err(ApiError::upstream("Failed to fetch player stats"))?;

    let positions = basketball::weakest_defenders(
        &players.player_stats_totals,
        &teams,
        WEAKEST_PER_POSITION,
    );

    Ok(Json(StatusEnvelope::success(PositionalDefenseData::Positions(positions))))
}

#[derive(Debug, Deserialize)]
pub struct MismatchQuery {
    pub player: Option<String>,
    pub team: Option<String>,
}

// GET /nba/mismatch?player=...&team=... - Offensive vs defensive mismatch for one player
pub async fn mismatch(
    State(state): State<AppState>,
    Query(query): Query<MismatchQuery>,
) -> Result<Json<MismatchMetric>, ApiError> {
    let player = query
        .player
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("player query parameter is required"))?;
    let teams: Vec<String> = query
        .team
        .iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect();

    let response = state
        .sportsfeeds()?
        .player_stats_totals(
            &state.config.nba_season,
            &PlayerStatsQuery {
                teams: &teams,
                player: Some(player),
                ..Default::default()
            },
        )
        .await
        .map_err(ApiError::upstream("Failed to fetch player stats"))?;

    let entry = response
        .player_stats_totals
        .first()
        .ok_or_else(|| ApiError::NotFound("Player not found".to_string()))?;

    Ok(Json(basketball::mismatch_metric(&entry.stats)))
}

// GET /nba/powermetric - Composite power ranking from the power metric sheet
pub async fn power_metric(
    State(state): State<AppState>,
    Query(query): Query<CsvQuery>,
) -> Result<Json<Vec<PowerMetricTeam>>, ApiError> {
    let table = load_csv(&state, &query, "powermetric.csv").await?;
    Ok(Json(basketball::power_rankings(&table)?))
}
