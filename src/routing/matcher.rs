//! Route matching for the access-control allowlist.
//!
//! # Responsibilities
//! - Match literal paths exactly (`/dashboard`)
//! - Match named segments (`/players/:id`)
//! - Match trailing catch-alls (`/api/players/:path*`), including the bare prefix
//! - Combine patterns with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A trailing slash on the request path is ignored
//! - No regex to guarantee O(n) matching

use thiserror::Error;

/// Error returned for malformed route patterns.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    NotAbsolute(String),

    #[error("pattern '{0}' has a catch-all segment that is not last")]
    CatchAllNotLast(String),

    #[error("pattern '{0}' has an unnamed parameter")]
    UnnamedParam(String),
}

/// Trait for matching request paths against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

fn normalize(path: &str) -> &str {
    if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    }
}

/// Matches one literal path.
#[derive(Debug, Clone)]
pub struct ExactMatcher {
    path: String,
}

impl ExactMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: normalize(&path).to_string(),
        }
    }
}

impl Matcher for ExactMatcher {
    fn matches(&self, path: &str) -> bool {
        normalize(path) == self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param,
    CatchAll,
}

/// Matches paths segment by segment with `:name` and `:name*` parameters.
#[derive(Debug, Clone)]
pub struct SegmentMatcher {
    segments: Vec<Segment>,
}

impl SegmentMatcher {
    /// Parse a pattern such as `/api/players/:path*`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute(pattern.to_string()));
        }

        let raw: Vec<&str> = normalize(pattern)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let mut segments = Vec::with_capacity(raw.len());
        for (i, part) in raw.iter().enumerate() {
            let segment = match part.strip_prefix(':') {
                Some(name) => {
                    let (name, catch_all) = match name.strip_suffix('*') {
                        Some(n) => (n, true),
                        None => (name, false),
                    };
                    if name.is_empty() {
                        return Err(PatternError::UnnamedParam(pattern.to_string()));
                    }
                    if catch_all {
                        if i + 1 != raw.len() {
                            return Err(PatternError::CatchAllNotLast(pattern.to_string()));
                        }
                        Segment::CatchAll
                    } else {
                        Segment::Param
                    }
                }
                None => Segment::Literal(part.to_string()),
            };
            segments.push(segment);
        }

        Ok(Self { segments })
    }
}

impl Matcher for SegmentMatcher {
    fn matches(&self, path: &str) -> bool {
        let mut parts = normalize(path).split('/').filter(|s| !s.is_empty());

        for segment in &self.segments {
            match segment {
                Segment::CatchAll => return true,
                Segment::Param => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                Segment::Literal(expected) => match parts.next() {
                    Some(part) if part == expected => {}
                    _ => return false,
                },
            }
        }

        parts.next().is_none()
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug, Default)]
pub struct RouteMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl RouteMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Build a matcher from configured patterns.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            if !pattern.starts_with('/') {
                return Err(PatternError::NotAbsolute(pattern.to_string()));
            }
            if pattern.contains(':') {
                matchers.push(Box::new(SegmentMatcher::parse(pattern)?));
            } else {
                matchers.push(Box::new(ExactMatcher::new(pattern)));
            }
        }
        Ok(Self::new(matchers))
    }

    /// True when any pattern matches.
    pub fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    /// API routes answer with JSON status codes instead of redirects.
    pub fn is_api(path: &str) -> bool {
        path == "/api" || path.starts_with("/api/")
    }
}
