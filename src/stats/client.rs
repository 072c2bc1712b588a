//! Stats API client.
//!
//! # Responsibilities
//! - Authenticate every request with the configured API key
//! - Encode list parameters the way the upstream expects (`key[]=v`)
//! - Follow cursor pagination for game logs
//! - Map transport, status and decode failures to `StatsError`
//!
//! # Design Decisions
//! - No retries; one failed call fails the page or API response
//! - Every call is timed and counted under the `stats` service label

use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::StatsApiConfig;
use crate::observability::metrics;
use crate::stats::model::{GameStat, Page, Player, SeasonAverage, Team};

const SERVICE: &str = "stats";

/// Errors from the stats API.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("stats API key is not configured")]
    MissingApiKey,

    #[error("stats API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("stats request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("stats API returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("could not decode stats response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type StatsResult<T> = Result<T, StatsError>;

/// Client for the stats REST API.
#[derive(Clone, Debug)]
pub struct StatsClient {
    http: reqwest::Client,
    base_url: String,
    per_page: u32,
    max_pages: u32,
}

impl StatsClient {
    /// Create a new client from configuration.
    pub fn new(config: &StatsApiConfig) -> StatsResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(StatsError::MissingApiKey);
        }

        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(config.api_key.trim())
            .map_err(|_| StatsError::InvalidApiKey)?;
        key.set_sensitive(true);
        headers.insert(AUTHORIZATION, key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
            max_pages: config.max_pages,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> StatsResult<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        let start = Instant::now();
        tracing::debug!(endpoint, params = query.len(), "Stats API request");

        let response = match self.http.get(&url).query(query).send().await {
            Ok(r) => r,
            Err(e) => {
                metrics::record_upstream(SERVICE, "error", start);
                return Err(e.into());
            }
        };

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            metrics::record_upstream(SERVICE, "status", start);
            return Err(StatsError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: excerpt(&body),
            });
        }

        metrics::record_upstream(SERVICE, "ok", start);
        serde_json::from_str(&body).map_err(|source| StatsError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }

    /// All teams.
    pub async fn list_teams(&self) -> StatsResult<Vec<Team>> {
        let page: Page<Team> = self.get("/teams", &[]).await?;
        Ok(page.data)
    }

    /// Find a team by full name or nickname, ignoring case.
    pub async fn find_team(&self, name: &str) -> StatsResult<Option<Team>> {
        let teams = self.list_teams().await?;
        Ok(teams.into_iter().find(|t| {
            t.full_name.eq_ignore_ascii_case(name) || t.name.eq_ignore_ascii_case(name)
        }))
    }

    /// Current roster of a team.
    pub async fn team_players(&self, team_id: u64) -> StatsResult<Vec<Player>> {
        let query = vec![
            ("team_ids[]", team_id.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        let page: Page<Player> = self.get("/players", &query).await?;
        Ok(page.data)
    }

    /// Players by id. Unknown ids are simply absent from the result.
    ///
    /// An empty id list returns nothing without a request; the upstream would
    /// otherwise answer with an unfiltered page.
    pub async fn players_by_ids(&self, ids: &[u64]) -> StatsResult<Vec<Player>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = repeated("ids[]", ids);
        query.push(("per_page", self.per_page.to_string()));
        let page: Page<Player> = self.get("/players", &query).await?;
        Ok(page.data)
    }

    /// Season averages for a set of players.
    pub async fn season_averages(
        &self,
        season: u32,
        player_ids: &[u64],
    ) -> StatsResult<Vec<SeasonAverage>> {
        if player_ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = vec![("season", season.to_string())];
        query.extend(repeated("player_ids[]", player_ids));
        let page: Page<SeasonAverage> = self.get("/season_averages", &query).await?;
        Ok(page.data)
    }

    /// Every game line of one player in one season, following cursors.
    pub async fn player_game_stats(&self, player_id: u64, season: u32) -> StatsResult<Vec<GameStat>> {
        let mut games = Vec::new();
        let mut cursor: Option<u64> = None;

        for _ in 0..self.max_pages {
            let mut query = vec![
                ("seasons[]", season.to_string()),
                ("player_ids[]", player_id.to_string()),
                ("per_page", self.per_page.to_string()),
            ];
            if let Some(c) = cursor {
                query.push(("cursor", c.to_string()));
            }

            let page: Page<GameStat> = self.get("/stats", &query).await?;
            games.extend(page.data);

            cursor = page.meta.and_then(|m| m.next_cursor);
            if cursor.is_none() {
                return Ok(games);
            }
        }

        tracing::warn!(player_id, season, pages = self.max_pages, "Game log truncated at page limit");
        Ok(games)
    }
}

fn repeated(key: &'static str, ids: &[u64]) -> Vec<(&'static str, String)> {
    ids.iter().map(|id| (key, id.to_string())).collect()
}

fn excerpt(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
