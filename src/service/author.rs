use std::sync::Arc;

use super::{into_page, require_text};
use crate::error::AppError;
use crate::model::*;
use crate::pagination::PageRequest;
use crate::response::Page;
use crate::store::AuthorStore;

#[derive(Clone)]
pub struct AuthorService {
    store: Arc<dyn AuthorStore>,
}

impl AuthorService {
    pub fn new(store: Arc<dyn AuthorStore>) -> Self {
        AuthorService { store }
    }

    fn fields(req: &AuthorRequest) -> Result<AuthorFields, AppError> {
        Ok(AuthorFields {
            name: require_text("name", &req.name, AUTHOR_NAME_MAX)?,
            description: req.description.trim().to_string(),
        })
    }

    pub async fn create(&self, req: &AuthorRequest) -> Result<CreatedId, AppError> {
        let fields = Self::fields(req)?;
        let author = self.store.insert_author(&fields).await?;
        tracing::info!(id = author.id, "author created");
        Ok(CreatedId { id: author.id })
    }

    pub async fn get(&self, id: i64) -> Result<AuthorDetail, AppError> {
        self.store
            .find_author(id)
            .await?
            .map(AuthorDetail::from)
            .ok_or_else(|| AppError::not_found("author", id))
    }

    pub async fn update(&self, id: i64, req: &AuthorRequest) -> Result<AuthorDetail, AppError> {
        let fields = Self::fields(req)?;
        let author = self
            .store
            .update_author(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found("author", id))?;
        tracing::info!(id, "author updated");
        Ok(author.into())
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<Reference>, AppError> {
        let slice = self.store.list_authors(page).await?;
        Ok(into_page(slice, page))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AuthorService {
        AuthorService::new(Arc::new(MemoryStore::new()))
    }

    fn request(name: &str) -> AuthorRequest {
        AuthorRequest {
            name: name.into(),
            description: "  wrote things ".into(),
        }
    }

    #[tokio::test]
    async fn create_trims_and_reads_back() {
        let svc = service();
        let created = svc.create(&request(" Ursula ")).await.unwrap();
        let detail = svc.get(created.id).await.unwrap();
        assert_eq!(detail.name, "Ursula");
        assert_eq!(detail.description, "wrote things");
    }

    #[tokio::test]
    async fn empty_name_persists_nothing() {
        let svc = service();
        assert!(matches!(svc.create(&request("")).await, Err(AppError::Validation(_))));
        let page = svc.list(&PageRequest::default()).await.unwrap();
        assert_eq!(page.meta.total, 0);
    }

    #[tokio::test]
    async fn update_missing_is_not_found() {
        let err = service().update(9, &request("x")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "author", id: 9 }));
    }
}
