use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Reference;
use crate::pagination::ListSpec;

pub const BOOK_TITLE_MAX: usize = 200;
pub const BOOK_DESCRIPTION_MAX: usize = 1000;

pub const BOOK_LIST: ListSpec = ListSpec {
    filter_param: "title",
    sortable: &["id", "title", "pages", "year", "created_at", "updated_at"],
};

/// Row of the `books` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub pages: i32,
    pub year: i32,
    pub publisher_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub description: String,
    pub pages: i32,
    pub year: i32,
    pub publisher_id: i64,
}

/// A live book with its publisher (None once the publisher is soft-deleted)
/// and its live authors ordered by id.
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub book: Book,
    pub publisher: Option<Reference>,
    pub authors: Vec<Reference>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookRequest {
    pub title: String,
    pub description: String,
    pub pages: i32,
    pub year: i32,
    pub publisher_id: i64,
    /// Replaces the full author set on update.
    pub author_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct BookAuthorsRequest {
    pub author_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetail {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub pages: i32,
    pub year: i32,
    pub publisher: Option<Reference>,
    pub authors: Vec<Reference>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BookRecord> for BookDetail {
    fn from(r: BookRecord) -> Self {
        BookDetail {
            id: r.book.id,
            title: r.book.title,
            description: r.book.description,
            pages: r.book.pages,
            year: r.book.year,
            publisher: r.publisher,
            authors: r.authors,
            created_at: r.book.created_at,
            updated_at: r.book.updated_at,
        }
    }
}
