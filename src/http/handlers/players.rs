//! Player statistics API.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tracing::error;

use crate::http::handlers::parse_season;
use crate::http::response::ApiError;
use crate::http::server::AppState;
use crate::stats::model::DashboardRow;
use crate::stats::ranking::RankingError;
use crate::stats::service::{compare_players, team_dashboard, CompareError};
use crate::stats::{Comparison, Metric};

#[derive(Debug, Default, Deserialize)]
pub struct CompareParams {
    #[serde(rename = "playerIds")]
    pub player_ids: Option<String>,
    pub metrics: Option<String>,
    pub season: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SeasonParams {
    pub season: Option<String>,
}

fn parse_player_ids(raw: Option<&str>) -> Result<Vec<u64>, ApiError> {
    let ids = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u64>()
                .map_err(|_| ApiError::BadRequest(format!("Invalid player ID: {s}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if ids.is_empty() {
        return Err(ApiError::BadRequest("No player IDs provided".into()));
    }
    Ok(ids)
}

fn parse_metrics(raw: Option<&str>) -> Result<Vec<Metric>, ApiError> {
    let metrics = match raw {
        Some(list) => Metric::parse_list(list).map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None => Vec::new(),
    };
    if metrics.is_empty() {
        return Ok(Metric::DEFAULTS.to_vec());
    }
    Ok(metrics)
}

/// `GET /api/players/compare?playerIds=1,2&metrics=points,per&season=2024`
pub async fn compare(
    State(state): State<AppState>,
    Query(params): Query<CompareParams>,
) -> Result<Json<Comparison>, ApiError> {
    let ids = parse_player_ids(params.player_ids.as_deref())?;
    let metrics = parse_metrics(params.metrics.as_deref())?;
    let season = parse_season(params.season.as_deref(), state.config.stats_api.comparison_season)?;

    match compare_players(&state.stats, &ids, &metrics, season).await {
        Ok(comparison) => Ok(Json(comparison)),
        Err(e @ CompareError::NoPlayers) => Err(ApiError::NotFound(e.to_string())),
        Err(CompareError::Ranking(e @ RankingError::UnknownMetric(_))) => {
            Err(ApiError::BadRequest(e.to_string()))
        }
        Err(e) => {
            error!(players = ?ids, season, error = %e, "Player comparison failed");
            Err(ApiError::Internal("Failed to fetch player comparison data".into()))
        }
    }
}

/// `GET /api/players/season-averages?season=2023`
pub async fn season_averages(
    State(state): State<AppState>,
    Query(params): Query<SeasonParams>,
) -> Result<Json<Vec<DashboardRow>>, ApiError> {
    let config = &state.config.stats_api;
    let season = parse_season(params.season.as_deref(), config.dashboard_season)?;

    team_dashboard(&state.stats, config.team_id, season)
        .await
        .map(Json)
        .map_err(|e| {
            error!(team_id = config.team_id, season, error = %e, "Season averages failed");
            ApiError::Internal("Failed to fetch season averages".into())
        })
}
