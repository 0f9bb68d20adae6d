//! Search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::search::{SearchHit, SearchQuery},
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct SearchResponse {
    /// Matching records tagged with `kind` (book or patron), books first
    #[schema(value_type = Vec<Object>)]
    pub results: Vec<SearchHit>,
    pub total: usize,
}

/// Search books and patrons by keyword
#[utoipa::path(
    get,
    path = "/search",
    tag = "search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Search results", body = SearchResponse),
        (status = 400, description = "Invalid type or year bound", body = crate::error::ErrorResponse)
    )
)]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<SearchResponse>> {
    let results = state.services.search.search(query).await?;

    Ok(Json(SearchResponse {
        total: results.len(),
        results,
    }))
}
