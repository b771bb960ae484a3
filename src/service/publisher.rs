use std::sync::Arc;

use super::{into_page, require_text};
use crate::error::AppError;
use crate::model::*;
use crate::pagination::PageRequest;
use crate::response::Page;
use crate::store::PublisherStore;

#[derive(Clone)]
pub struct PublisherService {
    store: Arc<dyn PublisherStore>,
}

impl PublisherService {
    pub fn new(store: Arc<dyn PublisherStore>) -> Self {
        PublisherService { store }
    }

    fn fields(req: &PublisherRequest) -> Result<PublisherFields, AppError> {
        Ok(PublisherFields {
            name: require_text("name", &req.name, PUBLISHER_NAME_MAX)?,
            description: req.description.trim().to_string(),
        })
    }

    pub async fn create(&self, req: &PublisherRequest) -> Result<CreatedId, AppError> {
        let fields = Self::fields(req)?;
        let publisher = self.store.insert_publisher(&fields).await?;
        tracing::info!(id = publisher.id, "publisher created");
        Ok(CreatedId { id: publisher.id })
    }

    pub async fn get(&self, id: i64) -> Result<PublisherDetail, AppError> {
        self.store
            .find_publisher(id)
            .await?
            .map(PublisherDetail::from)
            .ok_or_else(|| AppError::not_found("publisher", id))
    }

    pub async fn update(&self, id: i64, req: &PublisherRequest) -> Result<PublisherDetail, AppError> {
        let fields = Self::fields(req)?;
        let publisher = self
            .store
            .update_publisher(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found("publisher", id))?;
        tracing::info!(id, "publisher updated");
        Ok(publisher.into())
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<Reference>, AppError> {
        let slice = self.store.list_publishers(page).await?;
        Ok(into_page(slice, page))
    }

    /// Soft delete. Books keep their publisher_id but report no publisher.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.soft_delete_publisher(id).await? {
            return Err(AppError::not_found("publisher", id));
        }
        tracing::info!(id, "publisher deleted");
        Ok(())
    }
}
