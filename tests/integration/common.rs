//! Shared fixtures

use chrono::{DateTime, Utc};
use libris_server::{
    config::{AppConfig, DatabaseConfig},
    db,
    models::{Book, CreateBook, CreateLoan, CreatePatron, Loan, Patron},
    AppState,
};
use tempfile::TempDir;

pub async fn setup() -> AppState {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    AppState::new(AppConfig::default(), pool)
}

/// File database behind the production pool: WAL and several connections,
/// so transactions really run side by side. Keep the directory alive for
/// the duration of the test.
pub async fn setup_on_disk() -> (TempDir, AppState) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = AppConfig {
        database: DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("libris.db").display()),
            max_connections: 10,
            min_connections: 1,
        },
        ..Default::default()
    };

    let pool = db::connect(&config.database)
        .await
        .expect("Failed to open file database");
    (dir, AppState::new(config, pool))
}

pub fn book_request(title: &str, author: &str, isbn: &str, copies: i64) -> CreateBook {
    CreateBook {
        title: title.to_string(),
        author: author.to_string(),
        isbn: isbn.to_string(),
        publication_year: None,
        category: None,
        total_copies: copies,
    }
}

pub async fn add_book(state: &AppState, isbn: &str, copies: i64) -> Book {
    state
        .services
        .catalog
        .create_book(book_request(&format!("Book {}", isbn), "Some Author", isbn, copies))
        .await
        .expect("Failed to create book")
}

pub async fn add_patron(state: &AppState, name: &str) -> Patron {
    state
        .services
        .catalog
        .create_patron(CreatePatron {
            name: name.to_string(),
            email: format!("{}@example.org", name.to_lowercase().replace(' ', ".")),
            phone: None,
        })
        .await
        .expect("Failed to create patron")
}

pub async fn checkout(state: &AppState, patron: &Patron, book: &Book) -> Loan {
    state
        .services
        .loans
        .checkout(CreateLoan {
            patron_id: patron.id,
            book_id: book.id,
            duration_days: None,
        })
        .await
        .expect("Checkout failed")
}

pub async fn available_copies(state: &AppState, book_id: i64) -> i64 {
    state
        .services
        .catalog
        .get_book(book_id)
        .await
        .expect("Book vanished")
        .available_copies
}

pub async fn loan_count(state: &AppState) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM loans")
        .fetch_one(&state.pool)
        .await
        .expect("Failed to count loans")
}

/// Rewrite the dates of a loan, to place it in the past
pub async fn set_loan_dates(state: &AppState, loan_id: i64, loaned_at: DateTime<Utc>, due_at: DateTime<Utc>) {
    sqlx::query("UPDATE loans SET loaned_at = ?, due_at = ? WHERE id = ?")
        .bind(loaned_at)
        .bind(due_at)
        .bind(loan_id)
        .execute(&state.pool)
        .await
        .expect("Failed to move loan dates");
}
