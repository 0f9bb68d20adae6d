//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{books, health, loans, patrons, search, stats};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.3.0",
        description = "Library catalog, loan ledger and reporting REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::list_categories,
        // Patrons
        patrons::list_patrons,
        patrons::get_patron,
        patrons::create_patron,
        // Loans
        loans::checkout,
        loans::return_loan,
        loans::get_loan,
        loans::list_loans,
        loans::get_patron_loans,
        // Stats
        stats::get_summary,
        stats::get_top_books,
        stats::get_monthly_volume,
        stats::get_report,
        // Search
        search::search,
    ),
    components(
        schemas(
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            // Patrons
            crate::models::patron::Patron,
            crate::models::patron::CreatePatron,
            // Loans
            crate::models::loan::Loan,
            crate::models::loan::LoanStatus,
            crate::models::loan::LoanDetails,
            crate::models::loan::CreateLoan,
            loans::LoanFilter,
            loans::ReturnResponse,
            // Stats
            crate::models::report::Summary,
            crate::models::report::PopularBook,
            crate::models::report::MonthlyVolume,
            crate::models::report::Report,
            // Search
            search::SearchResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "books", description = "Book catalog"),
        (name = "patrons", description = "Patron registry"),
        (name = "loans", description = "Checkout and return"),
        (name = "stats", description = "Statistics and reports"),
        (name = "search", description = "Keyword search")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
