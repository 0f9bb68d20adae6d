//! Patron endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::patron::{CreatePatron, Patron},
    AppState,
};

/// List registered patrons
#[utoipa::path(
    get,
    path = "/patrons",
    tag = "patrons",
    responses(
        (status = 200, description = "All patrons in registration order", body = Vec<Patron>)
    )
)]
pub async fn list_patrons(State(state): State<AppState>) -> AppResult<Json<Vec<Patron>>> {
    let patrons = state.services.catalog.list_patrons().await?;
    Ok(Json(patrons))
}

/// Get patron by ID
#[utoipa::path(
    get,
    path = "/patrons/{id}",
    tag = "patrons",
    params(
        ("id" = i64, Path, description = "Patron ID")
    ),
    responses(
        (status = 200, description = "Patron details", body = Patron),
        (status = 404, description = "Patron not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_patron(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Patron>> {
    let patron = state.services.catalog.get_patron(id).await?;
    Ok(Json(patron))
}

/// Register a patron
#[utoipa::path(
    post,
    path = "/patrons",
    tag = "patrons",
    request_body = CreatePatron,
    responses(
        (status = 201, description = "Patron created", body = Patron),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 409, description = "Email already registered", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_patron(
    State(state): State<AppState>,
    Json(patron): Json<CreatePatron>,
) -> AppResult<(StatusCode, Json<Patron>)> {
    let created = state.services.catalog.create_patron(patron).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
