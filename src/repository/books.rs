//! Books repository for database operations

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, CreateBook},
        search::{like_pattern, SearchFilter},
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Sqlite>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List the whole catalog in registration order
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Register a new book; every copy starts on the shelf
    pub async fn create(&self, book: &CreateBook) -> AppResult<Book> {
        let now = Utc::now();

        sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (title, author, isbn, publication_year, category,
                               total_copies, available_copies, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(book.publication_year)
        .bind(&book.category)
        .bind(book.total_copies)
        .bind(book.total_copies)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::from(e)
                .on_unique_violation(format!("A book with ISBN {} already exists", book.isbn))
        })
    }

    /// Distinct categories present in the catalog
    pub async fn categories(&self) -> AppResult<Vec<String>> {
        let categories = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT category FROM books WHERE category IS NOT NULL AND category != '' ORDER BY category",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    pub async fn count(conn: &mut SqliteConnection) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&mut *conn)
            .await?;
        Ok(count)
    }

    /// Total and shelved copies across the catalog
    pub async fn copy_totals(conn: &mut SqliteConnection) -> AppResult<(i64, i64)> {
        let totals: (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_copies), 0), COALESCE(SUM(available_copies), 0) FROM books",
        )
        .fetch_one(&mut *conn)
        .await?;
        Ok(totals)
    }

    /// Books whose title, author or ISBN contains the term, narrowed by
    /// category and publication year bounds when present.
    pub async fn search(&self, filter: &SearchFilter) -> AppResult<Vec<Book>> {
        let pattern = like_pattern(&filter.term);

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT * FROM books
            WHERE (title LIKE ?1 ESCAPE '\' OR author LIKE ?1 ESCAPE '\' OR isbn LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR category = ?2)
              AND (?3 IS NULL OR publication_year >= ?3)
              AND (?4 IS NULL OR publication_year <= ?4)
            ORDER BY id
            "#,
        )
        .bind(pattern)
        .bind(&filter.category)
        .bind(filter.year_min)
        .bind(filter.year_max)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    // Availability transitions. These run inside the caller's transaction
    // and are the only statements that write `available_copies`.

    /// Take one copy off the shelf if any is left. Returns false when the
    /// book is missing or has no copy available.
    pub async fn take_copy(conn: &mut SqliteConnection, book_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies - 1 WHERE id = ? AND available_copies > 0",
        )
        .bind(book_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    /// Put one copy back. Returns false when the book is missing or every
    /// copy is already on the shelf.
    pub async fn put_back_copy(conn: &mut SqliteConnection, book_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE books SET available_copies = available_copies + 1 WHERE id = ? AND available_copies < total_copies",
        )
        .bind(book_id)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
