//! Book catalog: REST backend for authors, publishers, categories and books
//! on PostgreSQL, with an in-memory store for tests.

pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod openapi;
pub mod pagination;
pub mod response;
pub mod routes;
pub mod service;
pub mod settings;
pub mod sql;
pub mod state;
pub mod store;

pub use error::{AppError, ConfigError};
pub use migration::{apply_migrations, ensure_database_exists};
pub use routes::build_router;
pub use settings::{Settings, StoreKind};
pub use state::AppState;
pub use store::{CatalogStore, MemoryStore, PgStore};
