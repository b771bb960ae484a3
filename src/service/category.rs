use std::sync::Arc;

use super::{into_page, optional_text, require_text};
use crate::error::AppError;
use crate::model::*;
use crate::pagination::PageRequest;
use crate::response::Page;
use crate::store::CategoryStore;

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        CategoryService { store }
    }

    fn fields(req: &CategoryRequest) -> Result<CategoryFields, AppError> {
        Ok(CategoryFields {
            code: require_text("code", &req.code, CATEGORY_CODE_MAX)?,
            name: require_text("name", &req.name, CATEGORY_NAME_MAX)?,
            description: optional_text("description", &req.description, CATEGORY_DESCRIPTION_MAX)?,
        })
    }

    /// Conflict when another live category already uses `code`.
    async fn ensure_code_free(&self, code: &str, own_id: Option<i64>) -> Result<(), AppError> {
        match self.store.find_category_by_code(code).await? {
            Some(existing) if Some(existing.id) != own_id => Err(AppError::Conflict(format!(
                "category code {} already exists",
                code
            ))),
            _ => Ok(()),
        }
    }

    pub async fn create(&self, req: &CategoryRequest) -> Result<CategoryDetail, AppError> {
        let fields = Self::fields(req)?;
        self.ensure_code_free(&fields.code, None).await?;
        let category = self.store.insert_category(&fields).await?;
        tracing::info!(id = category.id, code = %category.code, "category created");
        Ok(category.into())
    }

    pub async fn get(&self, id: i64) -> Result<CategoryDetail, AppError> {
        self.store
            .find_category(id)
            .await?
            .map(CategoryDetail::from)
            .ok_or_else(|| AppError::not_found("category", id))
    }

    pub async fn update(&self, id: i64, req: &CategoryRequest) -> Result<CategoryDetail, AppError> {
        let fields = Self::fields(req)?;
        if self.store.find_category(id).await?.is_none() {
            return Err(AppError::not_found("category", id));
        }
        self.ensure_code_free(&fields.code, Some(id)).await?;
        let category = self
            .store
            .update_category(id, &fields)
            .await?
            .ok_or_else(|| AppError::not_found("category", id))?;
        tracing::info!(id, "category updated");
        Ok(category.into())
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<CategoryDetail>, AppError> {
        let slice = self.store.list_categories(page).await?;
        Ok(into_page(slice, page))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.store.soft_delete_category(id).await? {
            return Err(AppError::not_found("category", id));
        }
        tracing::info!(id, "category deleted");
        Ok(())
    }
}
