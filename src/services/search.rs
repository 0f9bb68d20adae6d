//! Keyword search across the catalog and the patron registry

use crate::{
    error::AppResult,
    models::search::{SearchHit, SearchQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct SearchService {
    repository: Repository,
}

impl SearchService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books first, then patrons, each in catalog order.
    /// A blank term returns nothing.
    pub async fn search(&self, query: SearchQuery) -> AppResult<Vec<SearchHit>> {
        let Some(filter) = query.into_filter()? else {
            return Ok(Vec::new());
        };

        let mut hits = Vec::new();

        if filter.scope.includes_books() {
            let books = self.repository.books.search(&filter).await?;
            hits.extend(books.into_iter().map(SearchHit::Book));
        }

        if filter.scope.includes_patrons() {
            let patrons = self.repository.patrons.search(&filter).await?;
            hits.extend(patrons.into_iter().map(SearchHit::Patron));
        }

        tracing::debug!(term = %filter.term, scope = ?filter.scope, hits = hits.len(), "Search completed");
        Ok(hits)
    }

    /// Book categories in use, offered as the category filter
    pub async fn list_categories(&self) -> AppResult<Vec<String>> {
        self.repository.books.categories().await
    }
}
