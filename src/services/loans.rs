//! Loan ledger: checkout, return and loan listings.
//!
//! The ledger is the only writer of `books.available_copies`. Checkout and
//! return each run as a single transaction: the availability change and the
//! loan row commit together or not at all. Dropping the transaction on any
//! early return rolls it back.

use std::future::Future;

use chrono::{Duration, Utc};

use crate::{
    config::LoansConfig,
    error::{AppError, AppResult},
    models::loan::{CreateLoan, Loan, LoanDetails},
    repository::{books::BooksRepository, loans::LoansRepository, patrons::PatronsRepository, Repository},
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
    config: LoansConfig,
}

impl LoansService {
    pub fn new(repository: Repository, config: LoansConfig) -> Self {
        Self { repository, config }
    }

    /// Lend one copy of a book to a patron
    pub async fn checkout(&self, request: CreateLoan) -> AppResult<Loan> {
        let duration_days = request
            .duration_days
            .unwrap_or(self.config.default_duration_days);
        self.validate_duration(duration_days)?;

        let loan = with_conflict_retry("checkout", move || {
            self.try_checkout(request.patron_id, request.book_id, duration_days)
        })
        .await?;

        tracing::info!(
            loan_id = loan.id,
            patron_id = loan.patron_id,
            book_id = loan.book_id,
            due_at = %loan.due_at,
            "Book checked out"
        );
        Ok(loan)
    }

    /// Close an active loan and put the copy back on the shelf
    pub async fn return_loan(&self, loan_id: i64) -> AppResult<Loan> {
        let loan = with_conflict_retry("return", move || self.try_return(loan_id)).await?;

        tracing::info!(loan_id = loan.id, book_id = loan.book_id, "Book returned");
        Ok(loan)
    }

    /// Get one loan with display fields
    pub async fn get_loan(&self, loan_id: i64) -> AppResult<LoanDetails> {
        self.repository.loans.get_details(loan_id).await
    }

    /// Loans of a patron, optionally only the open ones
    pub async fn get_patron_loans(&self, patron_id: i64, active_only: bool) -> AppResult<Vec<LoanDetails>> {
        // Verify patron exists
        self.repository.patrons.get_by_id(patron_id).await?;
        self.repository.loans.get_patron_loans(patron_id, active_only).await
    }

    /// All open loans, earliest due first
    pub async fn get_active_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.get_active_loans(None).await
    }

    /// Open loans past their due date
    pub async fn get_overdue_loans(&self) -> AppResult<Vec<LoanDetails>> {
        self.repository.loans.get_active_loans(Some(Utc::now())).await
    }

    fn validate_duration(&self, days: i64) -> AppResult<()> {
        if days < 1 {
            return Err(AppError::Validation(format!(
                "Loan duration must be a positive number of days, got {}",
                days
            )));
        }
        if days > self.config.max_duration_days {
            return Err(AppError::Validation(format!(
                "Loan duration cannot exceed {} days, got {}",
                self.config.max_duration_days, days
            )));
        }
        Ok(())
    }

    async fn try_checkout(&self, patron_id: i64, book_id: i64, duration_days: i64) -> AppResult<Loan> {
        let mut tx = self.repository.pool.begin().await?;

        // Guarded decrement first: check and take happen in one statement,
        // under the write lock, so the last copy cannot be lent twice.
        if !BooksRepository::take_copy(&mut *tx, book_id).await? {
            return Err(AppError::Unavailable(format!(
                "Book {} has no copy available",
                book_id
            )));
        }

        if !PatronsRepository::exists(&mut *tx, patron_id).await? {
            return Err(AppError::NotFound(format!("Patron with id {} not found", patron_id)));
        }

        let now = Utc::now();
        let due_at = now + Duration::days(duration_days);
        let loan = LoansRepository::insert(&mut *tx, patron_id, book_id, now, due_at).await?;

        tx.commit().await?;
        Ok(loan)
    }

    async fn try_return(&self, loan_id: i64) -> AppResult<Loan> {
        let mut tx = self.repository.pool.begin().await?;

        let Some(loan) = LoansRepository::mark_returned(&mut *tx, loan_id, Utc::now()).await? else {
            return match LoansRepository::find(&mut *tx, loan_id).await? {
                Some(_) => Err(AppError::AlreadyReturned(format!(
                    "Loan {} has already been returned",
                    loan_id
                ))),
                None => Err(AppError::NotFound(format!("Loan with id {} not found", loan_id))),
            };
        };

        if !BooksRepository::put_back_copy(&mut *tx, loan.book_id).await? {
            return Err(AppError::DataIntegrity(format!(
                "Loan {} points at book {}, which is missing or already has every copy on the shelf",
                loan.id, loan.book_id
            )));
        }

        tx.commit().await?;
        Ok(loan)
    }
}

/// Run a ledger transaction, retrying once if the store reports a write
/// conflict. A second conflict surfaces as `AppError::Conflict`.
async fn with_conflict_retry<T, F, Fut>(operation: &str, mut attempt: F) -> AppResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    match attempt().await {
        Err(e) if e.is_write_conflict() => {
            tracing::warn!(operation, error = %e, "Write conflict, retrying once");
        }
        result => return result,
    }

    match attempt().await {
        Err(e) if e.is_write_conflict() => {
            tracing::error!(operation, error = %e, "Write conflict persisted after retry");
            Err(AppError::Conflict(format!(
                "Concurrent update prevented {}, please try again",
                operation
            )))
        }
        result => result,
    }
}
