//! Rankings and percentiles for the player comparison view.
//!
//! For each requested metric the players are sorted by value, highest first.
//! The sort is stable so tied players keep their request order. Rank is the
//! 1-based position; percentile is `(n - index) / n * 100`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::stats::aggregate::{AdvancedStats, AggregatedStats};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("No players to rank")]
    NoPlayers,
}

/// A rankable statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    FieldGoalPct,
    ThreePointPct,
    FreeThrowPct,
    Minutes,
    GamesPlayed,
    Per,
    TrueShooting,
    UsageRate,
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::Points,
        Metric::Rebounds,
        Metric::Assists,
        Metric::Steals,
        Metric::Blocks,
        Metric::FieldGoalPct,
        Metric::ThreePointPct,
        Metric::FreeThrowPct,
        Metric::Minutes,
        Metric::GamesPlayed,
        Metric::Per,
        Metric::TrueShooting,
        Metric::UsageRate,
    ];

    /// Metrics ranked when the caller does not choose.
    pub const DEFAULTS: [Metric; 9] = [
        Metric::Points,
        Metric::Rebounds,
        Metric::Assists,
        Metric::Steals,
        Metric::Blocks,
        Metric::FieldGoalPct,
        Metric::ThreePointPct,
        Metric::FreeThrowPct,
        Metric::Minutes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Points => "points",
            Metric::Rebounds => "rebounds",
            Metric::Assists => "assists",
            Metric::Steals => "steals",
            Metric::Blocks => "blocks",
            Metric::FieldGoalPct => "field_goal_pct",
            Metric::ThreePointPct => "three_point_pct",
            Metric::FreeThrowPct => "free_throw_pct",
            Metric::Minutes => "minutes",
            Metric::GamesPlayed => "games_played",
            Metric::Per => "per",
            Metric::TrueShooting => "true_shooting",
            Metric::UsageRate => "usage_rate",
        }
    }

    /// Parse a comma-separated metric list, skipping blank entries.
    pub fn parse_list(list: &str) -> Result<Vec<Metric>, RankingError> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = RankingError;

    /// Accepts the snake_case names, plus the camelCase spellings
    /// `trueShooting` and `usageRate` used by earlier API clients.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trueShooting" => return Ok(Metric::TrueShooting),
            "usageRate" => return Ok(Metric::UsageRate),
            _ => {}
        }
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| RankingError::UnknownMetric(s.to_string()))
    }
}

/// One player's aggregated numbers, ready to rank.
#[derive(Debug, Clone)]
pub struct PlayerProfile {
    pub id: u64,
    pub name: String,
    pub position: String,
    pub values: BTreeMap<Metric, f64>,
}

impl PlayerProfile {
    pub fn new(
        id: u64,
        name: String,
        position: String,
        stats: &AggregatedStats,
        advanced: &AdvancedStats,
    ) -> Self {
        let values = BTreeMap::from([
            (Metric::Points, stats.points),
            (Metric::Rebounds, stats.rebounds),
            (Metric::Assists, stats.assists),
            (Metric::Steals, stats.steals),
            (Metric::Blocks, stats.blocks),
            (Metric::FieldGoalPct, stats.field_goal_pct),
            (Metric::ThreePointPct, stats.three_point_pct),
            (Metric::FreeThrowPct, stats.free_throw_pct),
            (Metric::Minutes, stats.minutes),
            (Metric::GamesPlayed, stats.games_played),
            (Metric::Per, advanced.per),
            (Metric::TrueShooting, advanced.true_shooting),
            (Metric::UsageRate, advanced.usage_rate),
        ]);
        Self { id, name, position, values }
    }

    fn value(&self, metric: Metric) -> f64 {
        self.values.get(&metric).copied().unwrap_or(0.0)
    }
}

/// Value of one metric with its standing among the compared players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standing {
    pub value: f64,
    pub rank: usize,
    pub percentile: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RankedPlayer {
    pub id: u64,
    pub name: String,
    pub position: String,
    pub stats: BTreeMap<Metric, Standing>,
}

/// Leader of a metric and the spread between best and worst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricComparison {
    pub leader: u64,
    pub difference: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub players: Vec<RankedPlayer>,
    pub comparisons: BTreeMap<Metric, MetricComparison>,
}

/// Rank `profiles` under each metric. Unrequested metrics keep rank 0.
pub fn rank_players(profiles: Vec<PlayerProfile>, metrics: &[Metric]) -> Result<Comparison, RankingError> {
    if profiles.is_empty() {
        return Err(RankingError::NoPlayers);
    }
    let n = profiles.len();

    let mut players: Vec<RankedPlayer> = profiles
        .iter()
        .map(|p| RankedPlayer {
            id: p.id,
            name: p.name.clone(),
            position: p.position.clone(),
            stats: p
                .values
                .iter()
                .map(|(m, v)| (*m, Standing { value: *v, rank: 0, percentile: 0.0 }))
                .collect(),
        })
        .collect();

    let mut comparisons = BTreeMap::new();
    for &metric in metrics {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| profiles[b].value(metric).total_cmp(&profiles[a].value(metric)));

        for (index, &player_idx) in order.iter().enumerate() {
            let standing = players[player_idx]
                .stats
                .entry(metric)
                .or_insert(Standing { value: 0.0, rank: 0, percentile: 0.0 });
            standing.rank = index + 1;
            standing.percentile = (n - index) as f64 / n as f64 * 100.0;
        }

        let best = &profiles[order[0]];
        let worst = &profiles[order[n - 1]];
        comparisons.insert(
            metric,
            MetricComparison {
                leader: best.id,
                difference: best.value(metric) - worst.value(metric),
            },
        );
    }

    Ok(Comparison { players, comparisons })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(id: u64, points: f64, rebounds: f64) -> PlayerProfile {
        let stats = AggregatedStats {
            points,
            rebounds,
            games_played: 10.0,
            ..AggregatedStats::default()
        };
        let advanced = AdvancedStats::from(&stats);
        PlayerProfile::new(id, format!("Player {id}"), "G".into(), &stats, &advanced)
    }

    #[test]
    fn test_highest_value_ranks_first() {
        let players = vec![profile(1, 18.0, 4.0), profile(2, 27.5, 3.0), profile(3, 9.0, 11.0)];
        let result = rank_players(players, &[Metric::Points]).unwrap();

        let by_id = |id: u64| result.players.iter().find(|p| p.id == id).unwrap();
        let points = |id: u64| by_id(id).stats[&Metric::Points];

        assert_eq!(points(2).rank, 1);
        assert_eq!(points(1).rank, 2);
        assert_eq!(points(3).rank, 3);
        assert_eq!(points(2).percentile, 100.0);
        assert!((points(1).percentile - 66.666).abs() < 0.01);
        assert!((points(3).percentile - 33.333).abs() < 0.01);

        let cmp = result.comparisons[&Metric::Points];
        assert_eq!(cmp.leader, 2);
        assert_eq!(cmp.difference, 18.5);

        // Not requested: value kept, no standing.
        let rebounds = by_id(3).stats[&Metric::Rebounds];
        assert_eq!(rebounds.value, 11.0);
        assert_eq!(rebounds.rank, 0);
        assert!(!result.comparisons.contains_key(&Metric::Rebounds));
    }

    #[test]
    fn test_ties_keep_request_order() {
        let players = vec![profile(5, 10.0, 0.0), profile(6, 10.0, 0.0)];
        let result = rank_players(players, &[Metric::Points]).unwrap();
        assert_eq!(result.players[0].stats[&Metric::Points].rank, 1);
        assert_eq!(result.players[1].stats[&Metric::Points].rank, 2);
        assert_eq!(result.comparisons[&Metric::Points].leader, 5);
    }

    #[test]
    fn test_parse_metric_list() {
        assert_eq!(
            Metric::parse_list("points, true_shooting,").unwrap(),
            vec![Metric::Points, Metric::TrueShooting]
        );
        assert_eq!(
            Metric::parse_list("points,dunks").unwrap_err(),
            RankingError::UnknownMetric("dunks".into())
        );
    }

    #[test]
    fn test_camel_case_metric_aliases() {
        assert_eq!(
            Metric::parse_list("trueShooting,usageRate,per").unwrap(),
            vec![Metric::TrueShooting, Metric::UsageRate, Metric::Per]
        );
        // Output names stay snake_case.
        assert_eq!("trueShooting".parse::<Metric>().unwrap().to_string(), "true_shooting");
        assert!("TrueShooting".parse::<Metric>().is_err());
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(rank_players(Vec::new(), &Metric::DEFAULTS).unwrap_err(), RankingError::NoPlayers);
    }

    #[test]
    fn test_serializes_metric_keys() {
        let result = rank_players(vec![profile(1, 1.0, 1.0)], &[Metric::Points]).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["players"][0]["stats"]["points"]["rank"], 1);
        assert_eq!(json["comparisons"]["points"]["leader"], 1);
    }
}
