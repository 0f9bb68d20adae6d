//! API handlers for Libris REST endpoints

pub mod books;
pub mod health;
pub mod loans;
pub mod openapi;
pub mod patrons;
pub mod search;
pub mod stats;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::AppState;

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Books (catalog)
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/categories", get(books::list_categories))
        .route("/books/:id", get(books::get_book))
        // Patrons
        .route("/patrons", get(patrons::list_patrons).post(patrons::create_patron))
        .route("/patrons/:id", get(patrons::get_patron))
        .route("/patrons/:id/loans", get(loans::get_patron_loans))
        // Loans
        .route("/loans", get(loans::list_loans).post(loans::checkout))
        .route("/loans/:id", get(loans::get_loan))
        .route("/loans/:id/return", post(loans::return_loan))
        // Statistics
        .route("/stats", get(stats::get_summary))
        .route("/stats/top-books", get(stats::get_top_books))
        .route("/stats/monthly", get(stats::get_monthly_volume))
        .route("/stats/report", get(stats::get_report))
        // Search
        .route("/search", get(search::search))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
}
