use crate::models::nba::{NbaPlayerDocument, NbaRecentFields, PlayerStats, PlayerStatsEntry};
use crate::stats::basketball::{player_efg_pct, player_ts_pct, simplified_per};
use crate::stats::{percentage, ratio};

/// Recomputes the per-game fields of a totals-only stat line.
fn with_per_game(mut stats: PlayerStats) -> PlayerStats {
    let games = stats.games_played;
    stats.offense.pts_per_game = ratio(stats.offense.pts, games);
    stats.offense.ast_per_game = ratio(stats.offense.ast, games);
    stats.rebounds.reb_per_game = ratio(stats.rebounds.reb, games);
    stats.defense.blk_per_game = ratio(stats.defense.blk, games);
    stats.defense.stl_per_game = ratio(stats.defense.stl, games);
    stats.defense.tov_per_game = ratio(stats.defense.tov, games);
    stats.miscellaneous.plus_minus_per_game = ratio(stats.miscellaneous.plus_minus, games);
    stats.field_goals.fg3_pt_pct =
        percentage(stats.field_goals.fg3_pt_made, stats.field_goals.fg3_pt_att);
    stats
}

/// Season totals minus the recent window, or `None` when the window
/// already covers every game the player has played.
pub fn prior_period(season: &PlayerStats, window: &PlayerStats) -> Option<PlayerStats> {
    let games = season.games_played - window.games_played;
    if games <= 0.0 {
        return None;
    }

    let mut prior = PlayerStats {
        games_played: games,
        ..Default::default()
    };
    prior.offense.pts = season.offense.pts - window.offense.pts;
    prior.offense.ast = season.offense.ast - window.offense.ast;
    prior.rebounds.reb = season.rebounds.reb - window.rebounds.reb;
    prior.defense.blk = season.defense.blk - window.defense.blk;
    prior.defense.stl = season.defense.stl - window.defense.stl;
    prior.defense.tov = season.defense.tov - window.defense.tov;

    let (sf, wf) = (&season.field_goals, &window.field_goals);
    prior.field_goals.fg_made = sf.fg_made - wf.fg_made;
    prior.field_goals.fg_att = sf.fg_att - wf.fg_att;
    prior.field_goals.fg2_pt_made = sf.fg2_pt_made - wf.fg2_pt_made;
    prior.field_goals.fg2_pt_att = sf.fg2_pt_att - wf.fg2_pt_att;
    prior.field_goals.fg3_pt_made = sf.fg3_pt_made - wf.fg3_pt_made;
    prior.field_goals.fg3_pt_att = sf.fg3_pt_att - wf.fg3_pt_att;

    prior.free_throws.ft_made = season.free_throws.ft_made - window.free_throws.ft_made;
    prior.free_throws.ft_att = season.free_throws.ft_att - window.free_throws.ft_att;
    prior.miscellaneous.plus_minus =
        season.miscellaneous.plus_minus - window.miscellaneous.plus_minus;

    Some(with_per_game(prior))
}

fn recent_fields(window: &PlayerStats, prior: Option<&PlayerStats>) -> NbaRecentFields {
    let window = with_per_game(window.clone());
    let recent_per = simplified_per(&window);

    NbaRecentFields {
        recent_games_played: window.games_played,
        recent_points: window.offense.pts,
        recent_points_per_game: window.offense.pts_per_game,
        recent_assists: window.offense.ast,
        recent_ast_per_game: window.offense.ast_per_game,
        recent_rebounds: window.rebounds.reb,
        recent_reb_per_game: window.rebounds.reb_per_game,
        recent_blk_per_game: window.defense.blk_per_game,
        recent_stl_per_game: window.defense.stl_per_game,
        recent_tov_per_game: window.defense.tov_per_game,
        recent_fg3_pt_pct: window.field_goals.fg3_pt_pct,
        recent_plus_minus: window.miscellaneous.plus_minus,
        recent_plus_minus_per_game: window.miscellaneous.plus_minus_per_game,
        recent_simplified_per: recent_per,
        recent_ts_pct: player_ts_pct(&window),
        recent_efg_pct: player_efg_pct(&window),
        points_trend: prior.map(|p| window.offense.pts_per_game - p.offense.pts_per_game),
        simplified_per_trend: prior.map(|p| recent_per - simplified_per(p)),
    }
}

/// Search document for one player. `window` holds the player's totals over
/// the recent date range, when they played in it.
pub fn player_document(
    season: &PlayerStatsEntry,
    window: Option<&PlayerStatsEntry>,
    last_updated: &str,
) -> NbaPlayerDocument {
    let player = &season.player;
    let stats = &season.stats;
    let team = season.team.as_ref().or(player.current_team.as_ref());

    let recent = window
        .map(|w| &w.stats)
        .filter(|w| w.games_played > 0.0)
        .map(|w| recent_fields(w, prior_period(stats, w).as_ref()));

    NbaPlayerDocument {
        object_id: format!("player_{}", player.id),
        player_id: player.id,
        first_name: player.first_name.clone(),
        last_name: player.last_name.clone(),
        full_name: format!("{} {}", player.first_name, player.last_name),
        position: season.position().to_string(),
        team_id: team.map(|t| t.id).unwrap_or_default(),
        team_abbrev: team.map(|t| t.abbreviation.clone()).unwrap_or_default(),
        official_image_src: player.official_image_src.clone().unwrap_or_default(),
        games_played: stats.games_played,
        points: stats.offense.pts,
        rebounds: stats.rebounds.reb,
        assists: stats.offense.ast,
        points_per_game: stats.offense.pts_per_game,
        reb_per_game: stats.rebounds.reb_per_game,
        ast_per_game: stats.offense.ast_per_game,
        blk_per_game: stats.defense.blk_per_game,
        stl_per_game: stats.defense.stl_per_game,
        tov_per_game: stats.defense.tov_per_game,
        fg3_pt_pct: stats.field_goals.fg3_pt_pct,
        plus_minus: stats.miscellaneous.plus_minus,
        plus_minus_per_game: stats.miscellaneous.plus_minus_per_game,
        last_updated: last_updated.to_string(),
        simplified_per: simplified_per(stats),
        ts_pct: player_ts_pct(stats),
        efg_pct: player_efg_pct(stats),
        recent,
    }
}
