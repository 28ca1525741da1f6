//! Read path over a cached aggregation snapshot.
//!
//! The aggregator itself stays stateless; this service keeps the last
//! deduplicated result and hands it to the query engine. A snapshot older than
//! the TTL is rebuilt on the next read, and the scheduler can rebuild it in the
//! background. A TTL of zero re-aggregates on every read.
//!
//! Rebuilds are single-flight: concurrent readers that find the snapshot stale
//! queue on one gate, and only the first of them runs the aggregator. The rest
//! pick up the snapshot it installed.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::info;

use crate::opportunities::aggregator::{AggregationError, Aggregator, SourceFailure};
use crate::opportunities::models::{CategoryCount, Opportunity};
use crate::opportunities::query::{self, OpportunityFilter, SearchResult};

#[derive(Debug)]
pub struct Snapshot {
    pub opportunities: Vec<Opportunity>,
    pub failed_sources: Vec<SourceFailure>,
    pub refreshed_at: DateTime<Utc>,
    built: Instant,
}

impl Snapshot {
    fn is_fresh(&self, ttl: Duration) -> bool {
        !ttl.is_zero() && self.built.elapsed() < ttl
    }
}

pub struct OpportunityService {
    aggregator: Aggregator,
    ttl: Duration,
    current: RwLock<Option<Arc<Snapshot>>>,
    refresh_gate: Mutex<()>,
}

impl OpportunityService {
    pub fn new(aggregator: Aggregator, ttl: Duration) -> Self {
        Self {
            aggregator,
            ttl,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Runs the aggregator and replaces the cached snapshot.
    /// On failure the previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, AggregationError> {
        let _gate = self.refresh_gate.lock().await;
        self.rebuild().await
    }

    /// The cached snapshot if it is still fresh, otherwise a new one.
    pub async fn snapshot(&self) -> Result<Arc<Snapshot>, AggregationError> {
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }

        let _gate = self.refresh_gate.lock().await;
        // Another reader may have rebuilt while this one waited.
        if let Some(snapshot) = self.fresh_snapshot().await {
            return Ok(snapshot);
        }
        self.rebuild().await
    }

    async fn fresh_snapshot(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .await
            .as_ref()
            .filter(|s| s.is_fresh(self.ttl))
            .map(Arc::clone)
    }

    /// Callers hold `refresh_gate`.
    async fn rebuild(&self) -> Result<Arc<Snapshot>, AggregationError> {
        let report = self.aggregator.aggregate().await?;
        let (duplicates, invalid) = (report.duplicates_dropped, report.invalid_dropped);
        let snapshot = Arc::new(Snapshot {
            opportunities: report.opportunities,
            failed_sources: report.failed_sources,
            refreshed_at: Utc::now(),
            built: Instant::now(),
        });

        let mut current = self.current.write().await;
        match current.as_ref() {
            // Never replace a snapshot with an older one.
            Some(installed) if installed.built > snapshot.built => {
                return Ok(Arc::clone(installed));
            }
            _ => *current = Some(Arc::clone(&snapshot)),
        }
        drop(current);

        info!(
            count = snapshot.opportunities.len(),
            failed = snapshot.failed_sources.len(),
            duplicates,
            invalid,
            "opportunity snapshot refreshed"
        );
        Ok(snapshot)
    }

    pub async fn search(&self, filter: &OpportunityFilter) -> Result<SearchResult, AggregationError> {
        let snapshot = self.snapshot().await?;
        Ok(query::search(&snapshot.opportunities, filter))
    }

    pub async fn category_summary(&self) -> Result<Vec<CategoryCount>, AggregationError> {
        let snapshot = self.snapshot().await?;
        Ok(query::category_summary(&snapshot.opportunities))
    }
}
