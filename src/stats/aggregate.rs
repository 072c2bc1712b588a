//! Season-average aggregation.
//!
//! Means are plain sum-and-divide over the fetched game lines. Empty input
//! never divides by zero: callers get `None` or zeroed records and render a
//! placeholder.

use std::collections::HashMap;

use serde::Serialize;

use crate::stats::model::{DashboardRow, GameStat, Player, SeasonAverage};

/// Mean of every numeric box-score column over a game log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAverages {
    pub games: usize,
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub fg_pct: f64,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub min: f64,
    pub turnover: f64,
    pub pf: f64,
}

/// Average every column of `games`; `None` when there are no games.
pub fn season_average_from_games(games: &[GameStat]) -> Option<GameAverages> {
    if games.is_empty() {
        return None;
    }
    let n = games.len() as f64;
    let mean = |f: fn(&GameStat) -> f64| games.iter().map(f).sum::<f64>() / n;

    Some(GameAverages {
        games: games.len(),
        pts: mean(|g| g.pts),
        reb: mean(|g| g.reb),
        ast: mean(|g| g.ast),
        stl: mean(|g| g.stl),
        blk: mean(|g| g.blk),
        fg_pct: mean(|g| g.fg_pct),
        fg3_pct: mean(|g| g.fg3_pct),
        ft_pct: mean(|g| g.ft_pct),
        min: mean(|g| g.min),
        turnover: mean(|g| g.turnover),
        pf: mean(|g| g.pf),
    })
}

/// Per-game means used by the comparison view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedStats {
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub field_goal_pct: f64,
    pub three_point_pct: f64,
    pub free_throw_pct: f64,
    pub minutes: f64,
    pub games_played: f64,
}

impl AggregatedStats {
    /// Zero games yield all zeros.
    pub fn from_games(games: &[GameStat]) -> Self {
        match season_average_from_games(games) {
            Some(avg) => Self {
                points: avg.pts,
                rebounds: avg.reb,
                assists: avg.ast,
                steals: avg.stl,
                blocks: avg.blk,
                field_goal_pct: avg.fg_pct,
                three_point_pct: avg.fg3_pct,
                free_throw_pct: avg.ft_pct,
                minutes: avg.min,
                games_played: avg.games as f64,
            },
            None => Self::default(),
        }
    }
}

/// Derived efficiency numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdvancedStats {
    pub per: f64,
    pub true_shooting: f64,
    pub usage_rate: f64,
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

impl From<&AggregatedStats> for AdvancedStats {
    fn from(s: &AggregatedStats) -> Self {
        let production = s.points + s.rebounds + s.assists + s.steals + s.blocks;
        Self {
            per: ratio(production, s.games_played),
            true_shooting: ratio(s.points, 2.0 * (s.field_goal_pct + 0.44 * s.free_throw_pct)),
            usage_rate: ratio(s.points + s.assists, s.minutes * s.games_played),
        }
    }
}

/// Join season averages with the roster, one row per average.
pub fn dashboard_rows(players: &[Player], averages: &[SeasonAverage]) -> Vec<DashboardRow> {
    let by_id: HashMap<u64, &Player> = players.iter().map(|p| (p.id, p)).collect();

    averages
        .iter()
        .map(|avg| {
            let player = by_id.get(&avg.player_id);
            DashboardRow {
                id: avg.player_id,
                first_name: player.map(|p| p.first_name.clone()).unwrap_or_default(),
                last_name: player.map(|p| p.last_name.clone()).unwrap_or_default(),
                points_per_game: avg.pts,
                rebounds_per_game: avg.reb,
                assists_per_game: avg.ast,
                field_goal_percentage: avg.fg_pct,
                minutes_per_game: avg.min,
            }
        })
        .collect()
}
