//! Patrons repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        patron::{CreatePatron, Patron},
        search::{like_pattern, SearchFilter},
    },
};

#[derive(Clone)]
pub struct PatronsRepository {
    pool: Pool<Sqlite>,
}

impl PatronsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get patron by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>("SELECT * FROM patrons WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Patron with id {} not found", id)))
    }

    pub async fn list(&self) -> AppResult<Vec<Patron>> {
        let patrons = sqlx::query_as::<_, Patron>("SELECT * FROM patrons ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(patrons)
    }

    /// Register a new patron
    pub async fn create(&self, patron: &CreatePatron) -> AppResult<Patron> {
        sqlx::query_as::<_, Patron>(
            r#"
            INSERT INTO patrons (name, email, phone, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&patron.name)
        .bind(&patron.email)
        .bind(&patron.phone)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from(e)
                .on_unique_violation(format!("A patron with email {} already exists", patron.email))
        })
    }

    pub async fn count(conn: &mut SqliteConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM patrons")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Patrons whose name or email contains the term
    pub async fn search(&self, filter: &SearchFilter) -> AppResult<Vec<Patron>> {
        let patrons = sqlx::query_as::<_, Patron>(
            r#"
            SELECT * FROM patrons
            WHERE name LIKE ?1 ESCAPE '\' OR email LIKE ?1 ESCAPE '\'
            ORDER BY id
            "#,
        )
        .bind(like_pattern(&filter.term))
        .fetch_all(&self.pool)
        .await?;
        Ok(patrons)
    }

    /// Existence check inside a running transaction
    pub async fn exists(conn: &mut SqliteConnection, id: i64) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM patrons WHERE id = ?)")
            .bind(id)
            .fetch_one(&mut *conn)
            .await?;
        Ok(exists)
    }
}
