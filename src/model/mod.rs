//! Stored records, write inputs and request/response DTOs per entity.

pub mod author;
pub mod book;
pub mod category;
pub mod publisher;

pub use author::*;
pub use book::*;
pub use category::*;
pub use publisher::*;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Id of a freshly created row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CreatedId {
    pub id: i64,
}

/// Id and display name of a related row (list items, book publisher/authors).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Reference {
    pub id: i64,
    pub name: String,
}
