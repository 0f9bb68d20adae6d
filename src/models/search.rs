//! Keyword search over books and patrons

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

use super::{book::Book, patron::Patron};

/// Which entity kinds a search covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    Books,
    Patrons,
    All,
}

impl SearchScope {
    pub fn includes_books(self) -> bool {
        matches!(self, SearchScope::Books | SearchScope::All)
    }

    pub fn includes_patrons(self) -> bool {
        matches!(self, SearchScope::Patrons | SearchScope::All)
    }
}

impl std::str::FromStr for SearchScope {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(SearchScope::All),
            "books" => Ok(SearchScope::Books),
            "patrons" => Ok(SearchScope::Patrons),
            other => Err(AppError::Validation(format!(
                "Invalid search type '{}': expected books, patrons or all",
                other
            ))),
        }
    }
}

/// Raw search parameters, as they arrive from the query string.
///
/// Everything is kept as text so that a malformed year can be reported
/// instead of silently dropped.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Search term, matched as a substring
    pub q: Option<String>,
    /// books, patrons or all (default)
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Exact book category
    pub category: Option<String>,
    /// Lowest publication year, inclusive
    pub year_min: Option<String>,
    /// Highest publication year, inclusive
    pub year_max: Option<String>,
}

/// Validated search criteria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    pub term: String,
    pub scope: SearchScope,
    pub category: Option<String>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

impl SearchQuery {
    /// Validate the raw parameters. A blank term yields `None`: there is
    /// nothing to search, whatever the other filters say.
    pub fn into_filter(self) -> AppResult<Option<SearchFilter>> {
        let term = self.q.as_deref().map(str::trim).unwrap_or_default();
        if term.is_empty() {
            return Ok(None);
        }

        let scope = self.kind.as_deref().unwrap_or("all").parse()?;

        Ok(Some(SearchFilter {
            term: term.to_string(),
            scope,
            category: non_blank(self.category),
            year_min: parse_year("year_min", self.year_min)?,
            year_max: parse_year("year_max", self.year_max)?,
        }))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_year(field: &str, value: Option<String>) -> AppResult<Option<i32>> {
    match non_blank(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be a whole number, got '{}'", field, raw))),
    }
}

/// One search result, tagged with its kind
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "record", rename_all = "lowercase")]
pub enum SearchHit {
    Book(Book),
    Patron(Patron),
}

/// Escape `LIKE` wildcards so the term matches literally (escape char `\`).
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
