//! Aggregator: fans out to every registered source, absorbs per-source failure,
//! merges in registration order and deduplicates.
//!
//! Algorithm:
//! 1. Spawn one task per source, each bounded by the source's timeout (or the default).
//! 2. Join all handles in registration order; a failed, timed-out or panicked
//!    source contributes nothing and is logged.
//! 3. Concatenate: source A's records precede source B's when A registered first.
//! 4. Drop records that fail `Opportunity::validate`.
//! 5. Deduplicate on `dedup_key`, first occurrence wins.

use std::any::Any;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use crate::opportunities::models::Opportunity;
use crate::opportunities::sources::{OpportunitySource, SourceError};

pub const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures of the join itself. Individual sources never produce one of these.
#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("fetch task for source '{source_name}' was cancelled")]
    Cancelled { source_name: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    pub source: String,
    pub reason: String,
}

/// Outcome of one aggregation pass.
#[derive(Debug, Clone, Default)]
pub struct AggregationReport {
    pub opportunities: Vec<Opportunity>,
    pub failed_sources: Vec<SourceFailure>,
    pub duplicates_dropped: usize,
    pub invalid_dropped: usize,
}

pub struct Aggregator {
    sources: Vec<Arc<dyn OpportunitySource>>,
    default_timeout: Duration,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn OpportunitySource>>) -> Self {
        Self {
            sources,
            default_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    pub fn source_names(&self) -> Vec<String> {
        self.sources.iter().map(|s| s.name().to_string()).collect()
    }

    /// Merged, deduplicated records from every source that succeeded, in
    /// `report.opportunities`, alongside what was dropped and why.
    ///
    /// Dropping the returned future aborts any fetch still in flight.
    pub async fn aggregate(&self) -> Result<AggregationReport, AggregationError> {
        let started = Instant::now();

        let handles: Vec<JoinHandle<Result<Vec<Opportunity>, SourceError>>> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let limit = source.timeout().unwrap_or(self.default_timeout);
                tokio::spawn(async move {
                    match tokio::time::timeout(limit, source.fetch()).await {
                        Ok(result) => result,
                        Err(_) => Err(SourceError::TimedOut(limit)),
                    }
                })
            })
            .collect();
        let _in_flight = AbortOnDrop(handles.iter().map(JoinHandle::abort_handle).collect());
        let outcomes = join_all(handles).await;

        let mut merged = Vec::new();
        let mut failed_sources = Vec::new();

        for (source, outcome) in self.sources.iter().zip(outcomes) {
            let result = match outcome {
                Ok(result) => result,
                Err(join_err) if join_err.is_panic() => Err(SourceError::Panicked(
                    panic_message(join_err.into_panic().as_ref()),
                )),
                Err(_) => {
                    return Err(AggregationError::Cancelled {
                        source_name: source.name().to_string(),
                    })
                }
            };

            match result {
                Ok(records) => {
                    debug!(source = source.name(), count = records.len(), "source fetched");
                    merged.extend(records);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "opportunity source failed");
                    failed_sources.push(SourceFailure {
                        source: source.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let before_validation = merged.len();
        merged.retain(|o| match o.validate() {
            Ok(()) => true,
            Err(reason) => {
                warn!(source = %o.source, %reason, "dropping invalid opportunity");
                false
            }
        });
        let invalid_dropped = before_validation - merged.len();

        let (opportunities, duplicates_dropped) = dedup(merged);

        info!(
            sources = self.sources.len(),
            failed = failed_sources.len(),
            kept = opportunities.len(),
            duplicates = duplicates_dropped,
            invalid = invalid_dropped,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "aggregation finished"
        );

        Ok(AggregationReport {
            opportunities,
            failed_sources,
            duplicates_dropped,
            invalid_dropped,
        })
    }
}

/// Aborts the fetch tasks when the aggregation future is dropped.
/// Aborting a task that already finished is a no-op.
struct AbortOnDrop(Vec<AbortHandle>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        for handle in &self.0 {
            handle.abort();
        }
    }
}

/// Keeps the first record for every dedup key, preserving input order.
/// Returns the survivors and how many were dropped.
pub fn dedup(records: Vec<Opportunity>) -> (Vec<Opportunity>, usize) {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut keep = Vec::with_capacity(records.len());
    let mut dropped = 0usize;

    for record in records {
        if !seen.insert(record.dedup_key()) {
            dropped += 1;
            continue;
        }
        keep.push(record);
    }

    (keep, dropped)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use crate::opportunities::models::Category;
    use crate::opportunities::sources::default_sources;

    pub(crate) fn record(title: &str, org: &str, source: &str) -> Opportunity {
        Opportunity::new(title, format!("{title} at {org}"), org, Category::Research, source)
    }

    pub(crate) struct FixedSource {
        pub name: &'static str,
        pub records: Vec<Opportunity>,
    }

    #[async_trait]
    impl OpportunitySource for FixedSource {
        fn name(&self) -> &str {
            self.name
        }
        fn category(&self) -> Category {
            Category::Research
        }
        async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError> {
            Ok(self.records.clone())
        }
    }

    pub(crate) struct FailingSource(pub &'static str);

    #[async_trait]
    impl OpportunitySource for FailingSource {
        fn name(&self) -> &str {
            self.0
        }
        fn category(&self) -> Category {
            Category::Startup
        }
        async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError> {
            Err(SourceError::Unavailable("upstream returned 503".to_string()))
        }
    }

    struct PanickingSource;

    #[async_trait]
    impl OpportunitySource for PanickingSource {
        fn name(&self) -> &str {
            "panicking"
        }
        fn category(&self) -> Category {
            Category::Nonprofit
        }
        async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError> {
            panic!("catalogue index out of range");
        }
    }

    struct SlowSource {
        name: &'static str,
        delay: Duration,
        own_timeout: Option<Duration>,
    }

    #[async_trait]
    impl OpportunitySource for SlowSource {
        fn name(&self) -> &str {
            self.name
        }
        fn category(&self) -> Category {
            Category::StudentOrg
        }
        fn timeout(&self) -> Option<Duration> {
            self.own_timeout
        }
        async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![record(self.name, "Slow Org", self.name)])
        }
    }

    fn fixed(name: &'static str, records: Vec<Opportunity>) -> Arc<dyn OpportunitySource> {
        Arc::new(FixedSource { name, records })
    }

    fn titles(records: &[Opportunity]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let (kept, dropped) = dedup(vec![
            record("A", "X", "one"),
            record("B", "X", "one"),
            record("a", "x", "two"),
        ]);
        assert_eq!(titles(&kept), vec!["A", "B"]);
        assert_eq!(kept[0].source, "one");
        assert_eq!(dropped, 1);
    }

    #[tokio::test]
    async fn test_merge_preserves_registration_then_emission_order() {
        let agg = Aggregator::new(vec![
            fixed("first", vec![record("A1", "Org", "first"), record("A2", "Org", "first")]),
            fixed("second", vec![record("B1", "Org", "second")]),
            fixed("third", vec![record("C1", "Org", "third"), record("C2", "Org", "third")]),
        ]);
        let out = agg.aggregate().await.unwrap().opportunities;
        assert_eq!(titles(&out), vec!["A1", "A2", "B1", "C1", "C2"]);
    }

    /// Two sources post "Research Assistant" at "Bio Lab" with different
    /// descriptions; the first registered source's copy survives.
    #[tokio::test]
    async fn test_duplicate_across_sources_first_registered_wins() {
        let mut from_a = record("Research Assistant", "Bio Lab", "lab-feed");
        from_a.description = "Run PCR assays".to_string();
        let mut from_b = record("Research Assistant", "Bio Lab", "campus-board");
        from_b.description = "Campus cross-post".to_string();

        let agg = Aggregator::new(vec![
            fixed("lab-feed", vec![from_a]),
            fixed("campus-board", vec![from_b]),
        ]);
        let report = agg.aggregate().await.unwrap();

        let matches: Vec<_> = report
            .opportunities
            .iter()
            .filter(|o| o.title == "Research Assistant" && o.organization == "Bio Lab")
            .collect();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].source, "lab-feed");
        assert_eq!(matches[0].description, "Run PCR assays");
        assert_eq!(report.duplicates_dropped, 1);
    }

    #[tokio::test]
    async fn test_one_of_four_sources_failing_is_absorbed() {
        let agg = Aggregator::new(vec![
            fixed("a", vec![record("A", "Org", "a")]),
            Arc::new(FailingSource("broken")),
            fixed("c", vec![record("C", "Org", "c")]),
            fixed("d", vec![record("D", "Org", "d"), record("A", "org", "d")]),
        ]);
        let report = agg.aggregate().await.unwrap();
        assert_eq!(titles(&report.opportunities), vec!["A", "C", "D"]);
        assert_eq!(
            report.failed_sources,
            vec![SourceFailure {
                source: "broken".to_string(),
                reason: "source unavailable: upstream returned 503".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_any_subset_of_failures_yields_union_of_successes() {
        let names = ["s0", "s1", "s2", "s3"];
        for mask in 0u8..16 {
            let sources: Vec<Arc<dyn OpportunitySource>> = names
                .iter()
                .enumerate()
                .map(|(i, &name)| {
                    if mask & (1 << i) != 0 {
                        Arc::new(FailingSource(name)) as Arc<dyn OpportunitySource>
                    } else {
                        fixed(name, vec![record(name, "Org", name), record("Shared", "Org", name)])
                    }
                })
                .collect();

            let out = Aggregator::new(sources).aggregate().await.unwrap().opportunities;

            let healthy: Vec<&str> = names
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) == 0)
                .map(|(_, &n)| n)
                .collect();
            let expected_len = healthy.len() + usize::from(!healthy.is_empty());
            assert_eq!(out.len(), expected_len, "mask {mask:04b}");
            for name in &healthy {
                assert!(out.iter().any(|o| o.title == *name), "mask {mask:04b}");
            }
            if let Some(shared) = out.iter().find(|o| o.title == "Shared") {
                assert_eq!(shared.source, healthy[0], "mask {mask:04b}");
            }
        }
    }

    #[tokio::test]
    async fn test_no_sources_yields_empty_result() {
        let out = Aggregator::new(vec![]).aggregate().await.unwrap().opportunities;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_all_sources_failing_yields_empty_result() {
        let agg = Aggregator::new(vec![
            Arc::new(FailingSource("x")),
            Arc::new(FailingSource("y")),
        ]);
        let report = agg.aggregate().await.unwrap();
        assert!(report.opportunities.is_empty());
        assert_eq!(report.failed_sources.len(), 2);
    }

    #[tokio::test]
    async fn test_panicking_source_is_treated_as_failure() {
        let agg = Aggregator::new(vec![
            fixed("ok", vec![record("Kept", "Org", "ok")]),
            Arc::new(PanickingSource),
        ]);
        let report = agg.aggregate().await.unwrap();
        assert_eq!(titles(&report.opportunities), vec!["Kept"]);
        assert_eq!(report.failed_sources[0].source, "panicking");
        assert!(report.failed_sources[0]
            .reason
            .contains("catalogue index out of range"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out_without_blocking_others() {
        let agg = Aggregator::new(vec![
            Arc::new(SlowSource {
                name: "stuck",
                delay: Duration::from_secs(600),
                own_timeout: Some(Duration::from_secs(2)),
            }),
            fixed("fast", vec![record("Fast", "Org", "fast")]),
        ]);
        let report = agg.aggregate().await.unwrap();
        assert_eq!(titles(&report.opportunities), vec!["Fast"]);
        assert_eq!(report.failed_sources[0].source, "stuck");
        assert!(report.failed_sources[0].reason.starts_with("timed out"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_default_timeout_applies_when_source_has_none() {
        let agg = Aggregator::new(vec![Arc::new(SlowSource {
            name: "stuck",
            delay: Duration::from_secs(60),
            own_timeout: None,
        })])
        .with_default_timeout(Duration::from_millis(500));
        let report = agg.aggregate().await.unwrap();
        assert!(report.opportunities.is_empty());
        assert_eq!(report.failed_sources.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sources_run_concurrently() {
        let slow = |name| {
            Arc::new(SlowSource {
                name,
                delay: Duration::from_secs(3),
                own_timeout: None,
            }) as Arc<dyn OpportunitySource>
        };
        let agg = Aggregator::new(vec![slow("one"), slow("two"), slow("three")])
            .with_default_timeout(Duration::from_secs(10));

        let started = tokio::time::Instant::now();
        let out = agg.aggregate().await.unwrap().opportunities;
        let elapsed = started.elapsed();

        assert_eq!(titles(&out), vec!["one", "two", "three"]);
        assert!(elapsed < Duration::from_secs(6), "took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_invalid_records_are_dropped() {
        let agg = Aggregator::new(vec![fixed(
            "mixed",
            vec![record("Good", "Org", "mixed"), record("", "Org", "mixed")],
        )]);
        let report = agg.aggregate().await.unwrap();
        assert_eq!(titles(&report.opportunities), vec!["Good"]);
        assert_eq!(report.invalid_dropped, 1);
    }

    #[tokio::test]
    async fn test_default_sources_merge_and_collapse_cross_post() {
        let report = Aggregator::new(default_sources())
            .aggregate()
            .await
            .unwrap();
        assert!(report.failed_sources.is_empty());
        assert_eq!(report.duplicates_dropped, 1);
        let assistant = report
            .opportunities
            .iter()
            .find(|o| o.title == "Undergraduate Research Assistant")
            .unwrap();
        assert_eq!(assistant.source, "research-network");
    }

    /// Sets its flag when dropped, so a test can see a fetch was torn down.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    struct HangingSource {
        dropped: Arc<AtomicBool>,
    }

    #[async_trait]
    impl OpportunitySource for HangingSource {
        fn name(&self) -> &str {
            "hanging"
        }
        fn category(&self) -> Category {
            Category::Startup
        }
        fn timeout(&self) -> Option<Duration> {
            Some(Duration::from_secs(600))
        }
        async fn fetch(&self) -> Result<Vec<Opportunity>, SourceError> {
            let _flag = DropFlag(Arc::clone(&self.dropped));
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(vec![])
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_abandoned_aggregation_aborts_in_flight_fetches() {
        let dropped = Arc::new(AtomicBool::new(false));
        let agg = Aggregator::new(vec![Arc::new(HangingSource {
            dropped: Arc::clone(&dropped),
        })]);

        let outcome = tokio::time::timeout(Duration::from_secs(1), agg.aggregate()).await;
        assert!(outcome.is_err());

        // Give the runtime a turn to tear the aborted task down.
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(dropped.load(Ordering::SeqCst));
    }
}
