//! Data models for Libris

pub mod book;
pub mod loan;
pub mod patron;
pub mod report;
pub mod search;

// Re-export commonly used types
pub use book::{Book, CreateBook};
pub use loan::{CreateLoan, Loan, LoanDetails, LoanStatus};
pub use patron::{CreatePatron, Patron};
pub use report::{MonthlyVolume, PopularBook, Report, Summary};
pub use search::{SearchFilter, SearchHit, SearchQuery, SearchScope};
