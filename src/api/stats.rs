//! Statistics endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::report::{MonthlyVolume, PopularBook, Report, Summary},
    AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopBooksQuery {
    /// Maximum number of books (default: 10)
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthlyVolumeQuery {
    /// How many days back to look (default: 180)
    pub window_days: Option<i64>,
}

/// Library-wide counters
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    responses(
        (status = 200, description = "Current counters", body = Summary)
    )
)]
pub async fn get_summary(State(state): State<AppState>) -> AppResult<Json<Summary>> {
    let summary = state.services.stats.get_summary().await?;
    Ok(Json(summary))
}

/// Most borrowed books
#[utoipa::path(
    get,
    path = "/stats/top-books",
    tag = "stats",
    params(TopBooksQuery),
    responses(
        (status = 200, description = "Books ranked by loan count", body = Vec<PopularBook>),
        (status = 400, description = "Invalid limit", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_top_books(
    State(state): State<AppState>,
    Query(query): Query<TopBooksQuery>,
) -> AppResult<Json<Vec<PopularBook>>> {
    let books = state.services.stats.get_top_borrowed(query.limit).await?;
    Ok(Json(books))
}

/// Loans started per month
#[utoipa::path(
    get,
    path = "/stats/monthly",
    tag = "stats",
    params(MonthlyVolumeQuery),
    responses(
        (status = 200, description = "Monthly loan counts, oldest month first", body = Vec<MonthlyVolume>),
        (status = 400, description = "Invalid window", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_monthly_volume(
    State(state): State<AppState>,
    Query(query): Query<MonthlyVolumeQuery>,
) -> AppResult<Json<Vec<MonthlyVolume>>> {
    let volume = state.services.stats.get_monthly_volume(query.window_days).await?;
    Ok(Json(volume))
}

/// Full report: counters, ranking and monthly volume
#[utoipa::path(
    get,
    path = "/stats/report",
    tag = "stats",
    responses(
        (status = 200, description = "Report", body = Report)
    )
)]
pub async fn get_report(State(state): State<AppState>) -> AppResult<Json<Report>> {
    let report = state.services.stats.get_report().await?;
    Ok(Json(report))
}
