use std::sync::Arc;

use super::{into_page, normalize_ids, optional_text, require_positive, require_text};
use crate::error::AppError;
use crate::model::*;
use crate::pagination::PageRequest;
use crate::response::Page;
use crate::store::{BookStore, PublisherStore};

/// Books plus their author associations. Holds the publisher store to check
/// that a referenced publisher is live before writing.
#[derive(Clone)]
pub struct BookService {
    books: Arc<dyn BookStore>,
    publishers: Arc<dyn PublisherStore>,
}

impl BookService {
    pub fn new(books: Arc<dyn BookStore>, publishers: Arc<dyn PublisherStore>) -> Self {
        BookService { books, publishers }
    }

    fn fields(req: &BookRequest) -> Result<(BookFields, Vec<i64>), AppError> {
        let fields = BookFields {
            title: require_text("title", &req.title, BOOK_TITLE_MAX)?,
            description: optional_text("description", &req.description, BOOK_DESCRIPTION_MAX)?,
            pages: require_positive("pages", req.pages)?,
            year: require_positive("year", req.year)?,
            publisher_id: require_positive("publisher_id", req.publisher_id)?,
        };
        let author_ids = normalize_ids("author_ids", &req.author_ids)?;
        Ok((fields, author_ids))
    }

    async fn ensure_publisher(&self, id: i64) -> Result<(), AppError> {
        if self.publishers.find_publisher(id).await?.is_none() {
            return Err(AppError::Validation(format!("publisher {} does not exist", id)));
        }
        Ok(())
    }

    pub async fn create(&self, req: &BookRequest) -> Result<CreatedId, AppError> {
        let (fields, author_ids) = Self::fields(req)?;
        self.ensure_publisher(fields.publisher_id).await?;
        let id = self.books.insert_book(&fields, &author_ids).await?;
        tracing::info!(id, authors = author_ids.len(), "book created");
        Ok(CreatedId { id })
    }

    pub async fn get(&self, id: i64) -> Result<BookDetail, AppError> {
        self.books
            .find_book(id)
            .await?
            .map(BookDetail::from)
            .ok_or_else(|| AppError::not_found("book", id))
    }

    /// Replace the book's fields and its whole author set.
    pub async fn update(&self, id: i64, req: &BookRequest) -> Result<BookDetail, AppError> {
        let (fields, author_ids) = Self::fields(req)?;
        if !self.books.book_exists(id).await? {
            return Err(AppError::not_found("book", id));
        }
        self.ensure_publisher(fields.publisher_id).await?;
        if !self.books.update_book(id, &fields, &author_ids).await? {
            return Err(AppError::not_found("book", id));
        }
        tracing::info!(id, authors = author_ids.len(), "book updated");
        self.get(id).await
    }

    pub async fn list(&self, page: &PageRequest) -> Result<Page<BookDetail>, AppError> {
        let slice = self.books.list_books(page).await?;
        Ok(into_page(slice, page))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if !self.books.soft_delete_book(id).await? {
            return Err(AppError::not_found("book", id));
        }
        tracing::info!(id, "book deleted");
        Ok(())
    }

    pub async fn add_authors(&self, id: i64, req: &BookAuthorsRequest) -> Result<BookDetail, AppError> {
        let author_ids = normalize_ids("author_ids", &req.author_ids)?;
        if !self.books.add_book_authors(id, &author_ids).await? {
            return Err(AppError::not_found("book", id));
        }
        tracing::info!(id, added = author_ids.len(), "book authors added");
        self.get(id).await
    }

    pub async fn remove_authors(&self, id: i64, req: &BookAuthorsRequest) -> Result<BookDetail, AppError> {
        let author_ids = normalize_ids("author_ids", &req.author_ids)?;
        if !self.books.remove_book_authors(id, &author_ids).await? {
            return Err(AppError::not_found("book", id));
        }
        tracing::info!(id, removed = author_ids.len(), "book authors removed");
        self.get(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AuthorStore, MemoryStore};

    async fn setup() -> (BookService, Arc<MemoryStore>, i64) {
        let store = Arc::new(MemoryStore::new());
        let publisher = store
            .insert_publisher(&PublisherFields {
                name: "Chilton".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        (BookService::new(store.clone(), store.clone()), store, publisher.id)
    }

    fn request(publisher_id: i64, author_ids: Vec<i64>) -> BookRequest {
        BookRequest {
            title: "Dune".into(),
            description: String::new(),
            pages: 412,
            year: 1965,
            publisher_id,
            author_ids,
        }
    }

    #[tokio::test]
    async fn unknown_publisher_is_rejected() {
        let (svc, _, _) = setup().await;
        let err = svc.create(&request(99, vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_author_ids_collapse() {
        let (svc, store, publisher) = setup().await;
        let author = store
            .insert_author(&AuthorFields {
                name: "Herbert".into(),
                description: String::new(),
            })
            .await
            .unwrap();
        let id = svc
            .create(&request(publisher, vec![author.id, author.id]))
            .await
            .unwrap()
            .id;
        let detail = svc.get(id).await.unwrap();
        assert_eq!(detail.authors.len(), 1);
        assert_eq!(detail.publisher.map(|p| p.name), Some("Chilton".to_string()));
    }

    #[tokio::test]
    async fn non_positive_numbers_fail_validation() {
        let (svc, _, publisher) = setup().await;
        let mut req = request(publisher, vec![]);
        req.pages = 0;
        assert!(matches!(svc.create(&req).await, Err(AppError::Validation(_))));
        let mut req = request(publisher, vec![]);
        req.year = -1;
        assert!(matches!(svc.create(&req).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn update_missing_book_is_not_found() {
        let (svc, _, publisher) = setup().await;
        let err = svc.update(5, &request(publisher, vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "book", .. }));

        // Missing book wins over a dead publisher.
        let err = svc.update(5, &request(404, vec![])).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: "book", .. }));
    }

    #[tokio::test]
    async fn deleted_book_no_longer_exists() {
        let (svc, store, publisher) = setup().await;
        let id = svc.create(&request(publisher, vec![])).await.unwrap().id;
        assert!(store.book_exists(id).await.unwrap());
        svc.delete(id).await.unwrap();
        assert!(!store.book_exists(id).await.unwrap());
        assert!(matches!(
            svc.update(id, &request(publisher, vec![])).await,
            Err(AppError::NotFound { .. })
        ));
    }
}
