//! Loan (checkout) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Loan lifecycle status. Overdue is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum LoanStatus {
    Active,
    Returned,
}

impl LoanStatus {
    /// A loan is overdue while it is active and its due date has passed
    pub fn is_overdue(self, due_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self == LoanStatus::Active && due_at < now
    }
}

/// Loan model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Loan {
    pub id: i64,
    pub patron_id: i64,
    pub book_id: i64,
    pub loaned_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
}

/// Loan joined with the titles and names needed for display
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LoanDetails {
    pub id: i64,
    pub patron_id: i64,
    pub patron_name: String,
    pub book_id: i64,
    pub book_title: String,
    pub book_author: String,
    pub loaned_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub status: LoanStatus,
    #[sqlx(skip)]
    #[serde(default)]
    pub is_overdue: bool,
}

/// Checkout request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateLoan {
    pub patron_id: i64,
    pub book_id: i64,
    /// Loan length in days; the configured default applies when absent
    pub duration_days: Option<i64>,
}
