//! Offset pagination parameters.

use crate::error::{DomainError, DomainResult};

pub const DEFAULT_LIMIT: i64 = 50;
pub const MAX_LIMIT: i64 = 200;

/// A validated `limit`/`offset` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl Page {
    pub fn new(limit: i64, offset: i64) -> DomainResult<Self> {
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(DomainError::invalid_limit(format!("limit debe ser 1..{MAX_LIMIT}")));
        }
        if offset < 0 {
            return Err(DomainError::invalid_offset("offset debe ser >= 0"));
        }
        Ok(Self { limit, offset })
    }

    /// Parse raw query values. Absent or empty values fall back to the defaults.
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> DomainResult<Self> {
        let defaults = Self::default();

        let limit = match limit.filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse::<i64>().map_err(|_| {
                DomainError::invalid_limit(format!("limit debe ser 1..{MAX_LIMIT}"))
            })?,
            None => defaults.limit,
        };
        let offset = match offset.filter(|s| !s.is_empty()) {
            Some(raw) => raw
                .parse::<i64>()
                .map_err(|_| DomainError::invalid_offset("offset debe ser >= 0"))?,
            None => defaults.offset,
        };

        Self::new(limit, offset)
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}
