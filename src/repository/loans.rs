//! Loans repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::Book,
        loan::{Loan, LoanDetails},
        report::MonthlyVolume,
    },
};

const DETAILS_SELECT: &str = r#"
    SELECT l.id, l.patron_id, p.name AS patron_name,
           l.book_id, b.title AS book_title, b.author AS book_author,
           l.loaned_at, l.due_at, l.returned_at, l.status
    FROM loans l
    JOIN patrons p ON l.patron_id = p.id
    JOIN books b ON l.book_id = b.id
"#;

/// A book row with its number of loans attached
#[derive(FromRow)]
pub struct BookLoanCount {
    #[sqlx(flatten)]
    pub book: Book,
    pub loan_count: i64,
}

#[derive(Clone)]
pub struct LoansRepository {
    pool: Pool<Sqlite>,
}

impl LoansRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get loan with book and patron display fields
    pub async fn get_details(&self, id: i64) -> AppResult<LoanDetails> {
        let query = format!("{} WHERE l.id = ?", DETAILS_SELECT);
        let loan = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Loan with id {} not found", id)))?;
        Ok(with_overdue_flag(loan, Utc::now()))
    }

    /// Loans of one patron, most recent first
    pub async fn get_patron_loans(&self, patron_id: i64, active_only: bool) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.patron_id = ? AND (? = 0 OR l.status = 'active') ORDER BY l.loaned_at DESC, l.id DESC",
            DETAILS_SELECT
        );
        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(patron_id)
            .bind(active_only)
            .fetch_all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(loans.into_iter().map(|l| with_overdue_flag(l, now)).collect())
    }

    /// Active loans ordered by due date. With `due_before`, only loans due
    /// strictly before that instant are kept.
    pub async fn get_active_loans(&self, due_before: Option<DateTime<Utc>>) -> AppResult<Vec<LoanDetails>> {
        let query = format!(
            "{} WHERE l.status = 'active' AND (?1 IS NULL OR l.due_at < ?1) ORDER BY l.due_at, l.id",
            DETAILS_SELECT
        );
        let loans = sqlx::query_as::<_, LoanDetails>(&query)
            .bind(due_before)
            .fetch_all(&self.pool)
            .await?;

        let now = Utc::now();
        Ok(loans.into_iter().map(|l| with_overdue_flag(l, now)).collect())
    }

    /// Most borrowed books. Books never lent are left out; ties keep
    /// catalog order.
    pub async fn get_top_borrowed(&self, limit: i64) -> AppResult<Vec<BookLoanCount>> {
        let rows = sqlx::query_as::<_, BookLoanCount>(
            r#"
            SELECT b.*, COUNT(l.id) AS loan_count
            FROM books b
            JOIN loans l ON l.book_id = b.id
            GROUP BY b.id
            ORDER BY loan_count DESC, b.id ASC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Loans started per calendar month within `[since, until]`
    pub async fn get_monthly_volume(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<MonthlyVolume>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT strftime('%Y-%m', loaned_at) AS month, COUNT(*) AS loans
            FROM loans
            WHERE loaned_at >= ? AND loaned_at <= ?
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(month, loans)| MonthlyVolume { month, loans })
            .collect())
    }

    // Summary counters. They run on the caller's connection so that every
    // counter of one summary is read from the same snapshot.

    pub async fn count_active(conn: &mut SqliteConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE status = 'active'")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Count active loans whose due date is before `now`
    pub async fn count_overdue(conn: &mut SqliteConnection, now: DateTime<Utc>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM loans WHERE status = 'active' AND due_at < ?",
        )
        .bind(now)
        .fetch_one(&mut *conn)
        .await?;
        Ok(count)
    }

    // Ledger writes. Callers own the transaction.

    /// Insert a new active loan
    pub async fn insert(
        conn: &mut SqliteConnection,
        patron_id: i64,
        book_id: i64,
        loaned_at: DateTime<Utc>,
        due_at: DateTime<Utc>,
    ) -> AppResult<Loan> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            INSERT INTO loans (patron_id, book_id, loaned_at, due_at, status)
            VALUES (?, ?, ?, ?, 'active')
            RETURNING *
            "#,
        )
        .bind(patron_id)
        .bind(book_id)
        .bind(loaned_at)
        .bind(due_at)
        .fetch_one(&mut *conn)
        .await?;
        Ok(loan)
    }

    /// Read a loan inside the caller's transaction
    pub async fn find(conn: &mut SqliteConnection, id: i64) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(loan)
    }

    /// Close an active loan. Returns the updated row, or `None` if the loan
    /// was not active anymore.
    pub async fn mark_returned(
        conn: &mut SqliteConnection,
        id: i64,
        returned_at: DateTime<Utc>,
    ) -> AppResult<Option<Loan>> {
        let loan = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans SET status = 'returned', returned_at = ?
            WHERE id = ? AND status = 'active'
            RETURNING *
            "#,
        )
        .bind(returned_at)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
        Ok(loan)
    }
}

fn with_overdue_flag(mut loan: LoanDetails, now: DateTime<Utc>) -> LoanDetails {
    loan.is_overdue = loan.status.is_overdue(loan.due_at, now);
    loan
}
