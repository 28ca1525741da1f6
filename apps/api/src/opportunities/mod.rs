// Opportunity aggregation: concurrent sources, first-wins deduplication,
// filtered and truncated views over the merged set.

pub mod aggregator;
pub mod handlers;
pub mod models;
pub mod query;
pub mod scheduler;
pub mod service;
pub mod sources;
