//! Patron (registered borrower) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Patron model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Patron {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Create patron request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreatePatron {
    #[validate(length(min = 1, max = 256, message = "Name is required"))]
    pub name: String,
    /// Email address, unique across patrons
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(max = 32, message = "Phone must be at most 32 characters"))]
    pub phone: Option<String>,
}
