//! Entity services: validate requests, enforce catalog rules, call the store.

mod author;
mod book;
mod category;
mod publisher;
mod validation;

pub use author::AuthorService;
pub use book::BookService;
pub use category::CategoryService;
pub use publisher::PublisherService;
pub use validation::{normalize_ids, optional_text, require_positive, require_text};

use crate::pagination::PageRequest;
use crate::response::{Page, PageMeta};
use crate::store::Slice;

/// Convert a store slice into a response page of `U`.
fn into_page<T, U: From<T>>(slice: Slice<T>, request: &PageRequest) -> Page<U> {
    Page {
        meta: PageMeta::new(request, slice.total),
        items: slice.items.into_iter().map(U::from).collect(),
    }
}
