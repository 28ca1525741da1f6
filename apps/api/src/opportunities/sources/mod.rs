//! Opportunity sources: the pluggable retrieval units the aggregator fans out to.
//!
//! Every source is carried as `Arc<dyn OpportunitySource>` so the aggregator can
//! move it into its own task. The four built-in sources serve static catalogues;
//! a network-backed source only has to implement the same trait.

pub mod nonprofit;
pub mod research;
pub mod startup;
pub mod student_org;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::opportunities::models::{Category, Opportunity};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("fetch task panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A provider of opportunity records.
///
/// `fetch` may fail; the aggregator absorbs the failure and logs it under `name()`.
#[async_trait]
pub trait OpportunitySource: Send + Sync {
    fn name(&self) -> &str;

    /// The category this source naturally serves.
    fn category(&self) -> Category;

    /// Upper bound on a single fetch. `None` defers to the aggregator default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError>;
}

type CatalogFn = fn(&str) -> Vec<Opportunity>;

/// Source backed by a fixed in-process catalogue.
pub struct StaticSource {
    name: &'static str,
    category: Category,
    catalog: CatalogFn,
}

impl StaticSource {
    pub const fn new(name: &'static str, category: Category, catalog: CatalogFn) -> Self {
        Self {
            name,
            category,
            catalog,
        }
    }
}

#[async_trait]
impl OpportunitySource for StaticSource {
    fn name(&self) -> &str {
        self.name
    }

    fn category(&self) -> Category {
        self.category
    }

    async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError> {
        Ok((self.catalog)(self.name))
    }
}

/// The built-in sources in registration order. Order matters: when two sources
/// emit the same posting, the earlier one wins deduplication.
pub fn default_sources() -> Vec<Arc<dyn OpportunitySource>> {
    vec![
        Arc::new(StaticSource::new(
            "research-network",
            Category::Research,
            research::catalog,
        )),
        Arc::new(StaticSource::new(
            "startup-board",
            Category::Startup,
            startup::catalog,
        )),
        Arc::new(StaticSource::new(
            "nonprofit-volunteer",
            Category::Nonprofit,
            nonprofit::catalog,
        )),
        Arc::new(StaticSource::new(
            "campus-organizations",
            Category::StudentOrg,
            student_org::catalog,
        )),
    ]
}
