//! Aggregate statistics derived from the loan ledger

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::book::Book;

/// Library-wide counters, computed at call time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Summary {
    pub total_books: i64,
    pub total_patrons: i64,
    pub active_loans: i64,
    /// Active loans whose due date has passed
    pub overdue_loans: i64,
    pub total_copies: i64,
    pub available_copies: i64,
}

/// A book together with how many times it has been lent
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PopularBook {
    pub book: Book,
    pub loan_count: i64,
    pub is_available: bool,
}

/// Loans started in one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MonthlyVolume {
    /// `YYYY-MM`
    pub month: String,
    pub loans: i64,
}

/// Everything the reports page shows, in one response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub summary: Summary,
    pub top_books: Vec<PopularBook>,
    pub monthly_volume: Vec<MonthlyVolume>,
}
