use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_LIMIT: i64 = 10;
pub const DEFAULT_OFFSET: i64 = 0;

/// Offset/limit window applied to list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Pagination {
    /// Parses raw query values. Missing values fall back to the defaults;
    /// present values must be non-negative integers.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, String> {
        let limit = match limit {
            Some(raw) => parse_non_negative(raw).ok_or("Invalid limit parameter")?,
            None => DEFAULT_LIMIT,
        };
        let offset = match offset {
            Some(raw) => parse_non_negative(raw).ok_or("Invalid offset parameter")?,
            None => DEFAULT_OFFSET,
        };

        Ok(Self { limit, offset })
    }
}

fn parse_non_negative(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|value| *value >= 0)
}

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}
