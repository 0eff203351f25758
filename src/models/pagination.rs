use serde::Deserialize;
use validator::Validate;

pub const DEFAULT_LIMIT: i64 = 10;

/// Offset/limit query parameters shared by every listing endpoint.
#[derive(Debug, Default, Clone, Copy, Deserialize, Validate)]
pub struct Pagination {
    #[validate(range(min = 0))]
    pub skip: Option<i64>,
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl Pagination {
    #[cfg(test)]
    pub fn new(skip: i64, limit: i64) -> Self {
        Self {
            skip: Some(skip),
            limit: Some(limit),
        }
    }

    pub fn skip(&self) -> i64 {
        self.skip.unwrap_or(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}
