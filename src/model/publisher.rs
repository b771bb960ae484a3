use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Reference;
use crate::pagination::ListSpec;

pub const PUBLISHER_NAME_MAX: usize = 100;

pub const PUBLISHER_LIST: ListSpec = ListSpec {
    filter_param: "publisherName",
    sortable: &["id", "name", "created_at", "updated_at"],
};

/// Row of the `publishers` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Publisher {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherFields {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PublisherRequest {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublisherDetail {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Publisher> for PublisherDetail {
    fn from(p: Publisher) -> Self {
        PublisherDetail {
            id: p.id,
            name: p.name,
            description: p.description,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<Publisher> for Reference {
    fn from(p: Publisher) -> Self {
        Reference { id: p.id, name: p.name }
    }
}
