//! Book (catalog entry) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub publication_year: Option<i32>,
    pub category: Option<String>,
    pub total_copies: i64,
    /// Copies currently on the shelf. Only the loan ledger writes this.
    pub available_copies: i64,
    pub created_at: DateTime<Utc>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_copies > 0
    }
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 512, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, max = 256, message = "Author is required"))]
    pub author: String,
    /// ISBN, unique across the catalog
    #[validate(length(min = 1, max = 32, message = "ISBN must be 1-32 characters"))]
    pub isbn: String,
    #[validate(range(min = 0, max = 9999, message = "Publication year out of range"))]
    pub publication_year: Option<i32>,
    #[validate(length(max = 128))]
    pub category: Option<String>,
    #[validate(range(min = 1, message = "A book needs at least one copy"))]
    pub total_copies: i64,
}
