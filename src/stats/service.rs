//! Fetch-then-aggregate operations shared by pages, API routes and the CLI.

use futures_util::future::try_join_all;
use thiserror::Error;

use crate::stats::aggregate::{dashboard_rows, AdvancedStats, AggregatedStats};
use crate::stats::client::{StatsClient, StatsError};
use crate::stats::model::DashboardRow;
use crate::stats::ranking::{rank_players, Comparison, Metric, PlayerProfile, RankingError};

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("No players found with the provided IDs")]
    NoPlayers,

    #[error(transparent)]
    Stats(#[from] StatsError),

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// Season averages of a team's roster.
pub async fn team_dashboard(
    client: &StatsClient,
    team_id: u64,
    season: u32,
) -> Result<Vec<DashboardRow>, StatsError> {
    let players = client.team_players(team_id).await?;
    let ids: Vec<u64> = players.iter().map(|p| p.id).collect();
    let averages = client.season_averages(season, &ids).await?;

    tracing::debug!(team_id, season, players = players.len(), averages = averages.len(), "Team dashboard loaded");
    Ok(dashboard_rows(&players, &averages))
}

/// Compare players over one season's game logs.
///
/// Game logs are fetched concurrently; the first failure aborts the comparison.
/// Requested ids the stats API does not know are left out.
pub async fn compare_players(
    client: &StatsClient,
    player_ids: &[u64],
    metrics: &[Metric],
    season: u32,
) -> Result<Comparison, CompareError> {
    if player_ids.is_empty() {
        return Err(CompareError::NoPlayers);
    }
    let mut players = client.players_by_ids(player_ids).await?;
    if players.is_empty() {
        return Err(CompareError::NoPlayers);
    }
    // Rank ties follow the caller's order, not the upstream's.
    players.sort_by_key(|p| player_ids.iter().position(|id| *id == p.id).unwrap_or(usize::MAX));

    let logs = try_join_all(
        players
            .iter()
            .map(|p| client.player_game_stats(p.id, season)),
    )
    .await?;

    let profiles = players
        .into_iter()
        .zip(logs)
        .map(|(player, games)| {
            let stats = AggregatedStats::from_games(&games);
            let advanced = AdvancedStats::from(&stats);
            PlayerProfile::new(player.id, player.full_name(), player.position, &stats, &advanced)
        })
        .collect();

    Ok(rank_players(profiles, metrics)?)
}
