//! Shared application state for all routes: one service per entity, each
//! holding its store handle.

use crate::service::{AuthorService, BookService, CategoryService, PublisherService};
use crate::store::{CatalogStore, StoreHealth};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub authors: AuthorService,
    pub publishers: PublisherService,
    pub categories: CategoryService,
    pub books: BookService,
    /// Pinged by `/ready`.
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wire every service to the same backend.
    pub fn new<S: CatalogStore + 'static>(store: Arc<S>) -> Self {
        AppState {
            authors: AuthorService::new(store.clone()),
            publishers: PublisherService::new(store.clone()),
            categories: CategoryService::new(store.clone()),
            books: BookService::new(store.clone(), store.clone()),
            health: store,
        }
    }
}
