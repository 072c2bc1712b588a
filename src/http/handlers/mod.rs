//! Route handlers.

pub mod auth;
pub mod pages;
pub mod players;
pub mod status;

use crate::http::response::ApiError;

/// Parse an optional `season` query value.
pub(crate) fn parse_season(raw: Option<&str>, default: u32) -> Result<u32, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(default),
        Some(s) => s
            .parse::<u32>()
            .ok()
            .filter(|season| (1946..=2100).contains(season))
            .ok_or_else(|| ApiError::BadRequest(format!("Invalid season: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_season() {
        assert_eq!(parse_season(None, 2024), Ok(2024));
        assert_eq!(parse_season(Some(" "), 2024), Ok(2024));
        assert_eq!(parse_season(Some("2022"), 2024), Ok(2022));
        assert!(parse_season(Some("twenty"), 2024).is_err());
        assert!(parse_season(Some("12"), 2024).is_err());
    }
}
