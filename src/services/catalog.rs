//! Catalog management service: books and patrons

use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        book::{Book, CreateBook},
        patron::{CreatePatron, Patron},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a book. Duplicate ISBNs are refused.
    pub async fn create_book(&self, book: CreateBook) -> AppResult<Book> {
        book.validate()?;
        let created = self.repository.books.create(&book).await?;
        tracing::info!(book_id = created.id, isbn = %created.isbn, copies = created.total_copies, "Book registered");
        Ok(created)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i64) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }

    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Register a patron. Duplicate emails are refused.
    pub async fn create_patron(&self, patron: CreatePatron) -> AppResult<Patron> {
        patron.validate()?;
        let created = self.repository.patrons.create(&patron).await?;
        tracing::info!(patron_id = created.id, "Patron registered");
        Ok(created)
    }

    /// Get patron by ID
    pub async fn get_patron(&self, id: i64) -> AppResult<Patron> {
        self.repository.patrons.get_by_id(id).await
    }

    pub async fn list_patrons(&self) -> AppResult<Vec<Patron>> {
        self.repository.patrons.list().await
    }
}
