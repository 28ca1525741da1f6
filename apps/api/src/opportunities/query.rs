//! Query engine: filter and truncate the aggregated, deduplicated set.
//!
//! Pure and synchronous. Records come back in aggregation order; nothing is ranked.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::opportunities::models::{Category, CategoryCount, Compensation, Opportunity};

pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_MAX_LIMIT: usize = 200;

/// Validated search filter. Every field left as `None` imposes no constraint;
/// the ones that are set combine with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityFilter {
    /// Case-insensitive substring on title, description or organization.
    pub query: Option<String>,
    pub category: Option<Category>,
    /// Case-insensitive substring on location. Remote records always pass.
    pub location: Option<String>,
    pub compensation: Option<Compensation>,
    pub is_remote: Option<bool>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for OpportunityFilter {
    fn default() -> Self {
        Self {
            query: None,
            category: None,
            location: None,
            compensation: None,
            is_remote: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl OpportunityFilter {
    pub fn matches(&self, o: &Opportunity) -> bool {
        if let Some(q) = non_blank(&self.query) {
            let q = q.to_lowercase();
            let hit = o.title.to_lowercase().contains(&q)
                || o.description.to_lowercase().contains(&q)
                || o.organization.to_lowercase().contains(&q);
            if !hit {
                return false;
            }
        }

        if self.category.is_some_and(|c| c != o.category) {
            return false;
        }

        if let Some(loc) = non_blank(&self.location) {
            let loc = loc.to_lowercase();
            let hit = o.is_remote
                || o
                    .location
                    .as_deref()
                    .is_some_and(|l| l.to_lowercase().contains(&loc));
            if !hit {
                return false;
            }
        }

        if self.compensation.is_some_and(|c| c != o.compensation) {
            return false;
        }

        if self.is_remote.is_some_and(|r| r != o.is_remote) {
            return false;
        }

        true
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub opportunities: Vec<Opportunity>,
    /// Matches before offset/limit were applied.
    pub total_count: usize,
}

pub fn search(all: &[Opportunity], filter: &OpportunityFilter) -> SearchResult {
    let matching: Vec<&Opportunity> = all.iter().filter(|o| filter.matches(o)).collect();
    let total_count = matching.len();
    let opportunities = matching
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit)
        .cloned()
        .collect();

    SearchResult {
        opportunities,
        total_count,
    }
}

/// Counts per category, in `Category::ALL` order, zero counts included.
pub fn category_summary(all: &[Opportunity]) -> Vec<CategoryCount> {
    Category::ALL
        .into_iter()
        .map(|c| CategoryCount {
            name: c,
            label: c.label().to_string(),
            count: all.iter().filter(|o| o.category == c).count(),
        })
        .collect()
}

/// Search request as it arrives over HTTP, from a query string or a JSON body.
/// Enumerations are closed: unknown values fail deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub query: Option<String>,
    pub category: Option<Category>,
    pub location: Option<String>,
    pub compensation: Option<Compensation>,
    pub is_remote: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl SearchRequest {
    /// Validates paging against `max_limit` and produces a filter.
    /// `limit = 0` is legal and yields an empty page.
    pub fn into_filter(self, max_limit: usize) -> Result<OpportunityFilter, AppError> {
        let limit = match self.limit {
            None => DEFAULT_LIMIT.min(max_limit),
            Some(n) if n < 0 => {
                return Err(AppError::Validation(format!(
                    "limit must not be negative, got {n}"
                )))
            }
            Some(n) => {
                let n = usize::try_from(n).unwrap_or(usize::MAX);
                if n > max_limit {
                    return Err(AppError::Validation(format!(
                        "limit must be at most {max_limit}, got {n}"
                    )));
                }
                n
            }
        };

        let offset = match self.offset {
            None => 0,
            Some(n) if n < 0 => {
                return Err(AppError::Validation(format!(
                    "offset must not be negative, got {n}"
                )))
            }
            Some(n) => usize::try_from(n).unwrap_or(usize::MAX),
        };

        Ok(OpportunityFilter {
            query: self.query,
            category: self.category,
            location: self.location,
            compensation: self.compensation,
            is_remote: self.is_remote,
            limit,
            offset,
        })
    }
}
