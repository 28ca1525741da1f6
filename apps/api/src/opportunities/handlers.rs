use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::AppError;
use crate::opportunities::aggregator::SourceFailure;
use crate::opportunities::models::CategoryCount;
use crate::opportunities::query::{SearchRequest, SearchResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<CategoryCount>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub refreshed_at: DateTime<Utc>,
    pub count: usize,
    pub failed_sources: Vec<SourceFailure>,
}

/// GET /api/v1/opportunities
pub async fn handle_list_opportunities(
    State(state): State<AppState>,
    req: Result<Query<SearchRequest>, QueryRejection>,
) -> Result<Json<SearchResult>, AppError> {
    let Query(req) = req?;
    run_search(&state, req).await
}

/// POST /api/v1/opportunities/search
pub async fn handle_search_opportunities(
    State(state): State<AppState>,
    req: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResult>, AppError> {
    let Json(req) = req?;
    run_search(&state, req).await
}

async fn run_search(state: &AppState, req: SearchRequest) -> Result<Json<SearchResult>, AppError> {
    let filter = req.into_filter(state.config.max_search_limit)?;
    let result = state.opportunities.search(&filter).await?;
    Ok(Json(result))
}

/// GET /api/v1/opportunities/categories
pub async fn handle_category_summary(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = state.opportunities.category_summary().await?;
    Ok(Json(CategoriesResponse { categories }))
}

/// POST /api/v1/opportunities/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
) -> Result<Json<RefreshResponse>, AppError> {
    let snapshot = state.opportunities.refresh().await?;
    Ok(Json(RefreshResponse {
        refreshed_at: snapshot.refreshed_at,
        count: snapshot.opportunities.len(),
        failed_sources: snapshot.failed_sources.clone(),
    }))
}
