//! Statistics service

use chrono::{Duration, Utc};

use crate::{
    config::ReportsConfig,
    error::{AppError, AppResult},
    models::report::{MonthlyVolume, PopularBook, Report, Summary},
    repository::{books::BooksRepository, loans::LoansRepository, patrons::PatronsRepository, Repository},
};

#[derive(Clone)]
pub struct StatsService {
    repository: Repository,
    config: ReportsConfig,
}

impl StatsService {
    pub fn new(repository: Repository, config: ReportsConfig) -> Self {
        Self { repository, config }
    }

    /// Library-wide counters, all read in one transaction so that
    /// `available_copies + active_loans == total_copies` holds in the result.
    /// Overdue is evaluated against the current time.
    pub async fn get_summary(&self) -> AppResult<Summary> {
        let now = Utc::now();
        let mut tx = self.repository.pool.begin().await?;

        let total_books = BooksRepository::count(&mut *tx).await?;
        let total_patrons = PatronsRepository::count(&mut *tx).await?;
        let active_loans = LoansRepository::count_active(&mut *tx).await?;
        let overdue_loans = LoansRepository::count_overdue(&mut *tx, now).await?;
        let (total_copies, available_copies) = BooksRepository::copy_totals(&mut *tx).await?;

        tx.commit().await?;

        Ok(Summary {
            total_books,
            total_patrons,
            active_loans,
            overdue_loans,
            total_copies,
            available_copies,
        })
    }

    /// Books ranked by number of loans, most borrowed first
    pub async fn get_top_borrowed(&self, limit: Option<i64>) -> AppResult<Vec<PopularBook>> {
        let limit = limit.unwrap_or(self.config.top_books_limit);
        if limit < 1 {
            return Err(AppError::Validation(format!(
                "limit must be at least 1, got {}",
                limit
            )));
        }

        let rows = self.repository.loans.get_top_borrowed(limit).await?;
        Ok(rows
            .into_iter()
            .map(|row| PopularBook {
                is_available: row.book.is_available(),
                book: row.book,
                loan_count: row.loan_count,
            })
            .collect())
    }

    /// Loans started per month over the last `window_days` days.
    /// Months without loans are not listed.
    pub async fn get_monthly_volume(&self, window_days: Option<i64>) -> AppResult<Vec<MonthlyVolume>> {
        let window_days = window_days.unwrap_or(self.config.monthly_window_days);
        if !(1..=36_500).contains(&window_days) {
            return Err(AppError::Validation(format!(
                "window_days must be between 1 and 36500, got {}",
                window_days
            )));
        }

        let now = Utc::now();
        self.repository
            .loans
            .get_monthly_volume(now - Duration::days(window_days), now)
            .await
    }

    /// Summary, ranking and monthly volume with their configured defaults
    pub async fn get_report(&self) -> AppResult<Report> {
        Ok(Report {
            summary: self.get_summary().await?,
            top_books: self.get_top_borrowed(None).await?,
            monthly_volume: self.get_monthly_volume(None).await?,
        })
    }
}
