use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Reference;
use crate::pagination::ListSpec;

pub const AUTHOR_NAME_MAX: usize = 100;

pub const AUTHOR_LIST: ListSpec = ListSpec {
    filter_param: "authorName",
    sortable: &["id", "name", "created_at", "updated_at"],
};

/// Row of the `authors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Mutable author columns, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorFields {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct AuthorRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDetail {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Author> for AuthorDetail {
    fn from(a: Author) -> Self {
        AuthorDetail {
            id: a.id,
            name: a.name,
            description: a.description,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

impl From<Author> for Reference {
    fn from(a: Author) -> Self {
        Reference { id: a.id, name: a.name }
    }
}
