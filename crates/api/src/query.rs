//! Shared query parameter types for API handlers.

use serde::Deserialize;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Limit clamped to `1..=200`, default 50.
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// `GET /events` filters.
#[derive(Debug, Default, Deserialize)]
pub struct EventListParams {
    /// List the caller's own events (every status) instead of published ones.
    #[serde(default)]
    pub mine: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl EventListParams {
    pub fn page(&self) -> PaginationParams {
        PaginationParams {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(PaginationParams::default().limit(), DEFAULT_LIMIT);
        let huge = PaginationParams {
            limit: Some(10_000),
            offset: Some(-5),
        };
        assert_eq!(huge.limit(), MAX_LIMIT);
        assert_eq!(huge.offset(), 0);
        let zero = PaginationParams {
            limit: Some(0),
            offset: None,
        };
        assert_eq!(zero.limit(), 1);
    }
}
