//! Persistence seams. Services receive one of these traits at construction; the
//! PostgreSQL backend serves production and the in-memory backend serves tests
//! and database-less runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::error::AppError;
use crate::model::*;
use crate::pagination::PageRequest;
use async_trait::async_trait;

/// One page of rows plus the number of live rows matching the filter.
#[derive(Debug, Clone)]
pub struct Slice<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[async_trait]
pub trait AuthorStore: Send + Sync {
    async fn insert_author(&self, fields: &AuthorFields) -> Result<Author, AppError>;
    async fn find_author(&self, id: i64) -> Result<Option<Author>, AppError>;
    /// Returns None when no live author has this id.
    async fn update_author(&self, id: i64, fields: &AuthorFields) -> Result<Option<Author>, AppError>;
    async fn list_authors(&self, page: &PageRequest) -> Result<Slice<Author>, AppError>;
}

#[async_trait]
pub trait PublisherStore: Send + Sync {
    async fn insert_publisher(&self, fields: &PublisherFields) -> Result<Publisher, AppError>;
    async fn find_publisher(&self, id: i64) -> Result<Option<Publisher>, AppError>;
    async fn update_publisher(&self, id: i64, fields: &PublisherFields) -> Result<Option<Publisher>, AppError>;
    async fn list_publishers(&self, page: &PageRequest) -> Result<Slice<Publisher>, AppError>;
    /// Returns false when no live publisher has this id.
    async fn soft_delete_publisher(&self, id: i64) -> Result<bool, AppError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn insert_category(&self, fields: &CategoryFields) -> Result<Category, AppError>;
    async fn find_category(&self, id: i64) -> Result<Option<Category>, AppError>;
    async fn find_category_by_code(&self, code: &str) -> Result<Option<Category>, AppError>;
    async fn update_category(&self, id: i64, fields: &CategoryFields) -> Result<Option<Category>, AppError>;
    async fn list_categories(&self, page: &PageRequest) -> Result<Slice<Category>, AppError>;
    async fn soft_delete_category(&self, id: i64) -> Result<bool, AppError>;
}

/// Book persistence. Author id lists are resolved against live authors inside
/// the same transaction as the write; any unresolved id fails the whole call.
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert_book(&self, fields: &BookFields, author_ids: &[i64]) -> Result<i64, AppError>;
    async fn find_book(&self, id: i64) -> Result<Option<BookRecord>, AppError>;
    /// True when a live book has this id. Loads no relations.
    async fn book_exists(&self, id: i64) -> Result<bool, AppError>;
    /// Updates fields and replaces the author set. Returns false when the book is not live.
    async fn update_book(&self, id: i64, fields: &BookFields, author_ids: &[i64]) -> Result<bool, AppError>;
    async fn list_books(&self, page: &PageRequest) -> Result<Slice<BookRecord>, AppError>;
    async fn soft_delete_book(&self, id: i64) -> Result<bool, AppError>;
    async fn add_book_authors(&self, id: i64, author_ids: &[i64]) -> Result<bool, AppError>;
    async fn remove_book_authors(&self, id: i64, author_ids: &[i64]) -> Result<bool, AppError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}

/// Everything the application needs from a backend.
pub trait CatalogStore: AuthorStore + PublisherStore + CategoryStore + BookStore + StoreHealth {}

impl<T> CatalogStore for T where T: AuthorStore + PublisherStore + CategoryStore + BookStore + StoreHealth {}

pub(crate) fn missing_authors(ids: &[i64]) -> AppError {
    let list = ids.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    AppError::Validation(format!("authors not found: {}", list))
}
