//! Records mirroring the stats API response shapes.

use serde::{Deserialize, Deserializer, Serialize};

/// List envelope returned by every collection endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Cursor pagination metadata.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PageMeta {
    #[serde(default)]
    pub next_cursor: Option<u64>,
    #[serde(default)]
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Team {
    pub id: u64,
    #[serde(default)]
    pub abbreviation: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub conference: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Player {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub position: String,
    #[serde(default)]
    pub team: Option<Team>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Upstream season average for one player.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeasonAverage {
    pub player_id: u64,
    #[serde(default)]
    pub season: u32,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub games_played: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub pts: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub reb: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub ast: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub stl: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub blk: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fg_pct: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fg3_pct: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub ft_pct: f64,
    #[serde(default, deserialize_with = "minutes")]
    pub min: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameRef {
    pub id: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub season: u32,
    pub home_team_id: u64,
    pub visitor_team_id: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TeamRef {
    pub id: u64,
    #[serde(default)]
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlayerRef {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
}

/// One player's box score line for one game.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameStat {
    pub id: u64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub pts: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub reb: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub ast: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub stl: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub blk: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fg_pct: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub fg3_pct: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub ft_pct: f64,
    #[serde(default, deserialize_with = "minutes")]
    pub min: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub turnover: f64,
    #[serde(default, deserialize_with = "flexible_f64")]
    pub pf: f64,
    pub game: GameRef,
    pub team: TeamRef,
    pub player: PlayerRef,
}

/// A roster player joined with their season average, as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRow {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub points_per_game: f64,
    pub rebounds_per_game: f64,
    pub assists_per_game: f64,
    pub field_goal_percentage: f64,
    pub minutes_per_game: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn finite(value: f64) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("non-finite number '{value}'"))
    }
}

/// Accepts a number, a numeric string or null (as 0). NaN and infinities are rejected.
fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<NumberOrString>::deserialize(deserializer)? {
        None => 0.0,
        Some(NumberOrString::Number(n)) => n,
        Some(NumberOrString::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(0.0);
            }
            s.parse().map_err(serde::de::Error::custom)?
        }
    };
    finite(value).map_err(serde::de::Error::custom)
}

/// Accepts `"34"`, `"34:30"`, a number or null, yielding decimal minutes.
fn minutes<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(0.0),
        Some(NumberOrString::Number(n)) => finite(n).map_err(serde::de::Error::custom),
        Some(NumberOrString::Text(s)) => parse_minutes(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a minutes value as played-time text.
pub fn parse_minutes(text: &str) -> Result<f64, String> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    let bad = || format!("invalid minutes value '{text}'");
    let value = match text.split_once(':') {
        Some((m, s)) => {
            let m: f64 = m.parse().map_err(|_| bad())?;
            let s: f64 = s.parse().map_err(|_| bad())?;
            m + s / 60.0
        }
        None => text.parse().map_err(|_| bad())?,
    };
    finite(value).map_err(|_| bad())
}
