//! In-memory backend. Every operation takes the table lock once and validates
//! before mutating, so a failed call leaves no partial writes.

use super::*;
use crate::pagination::{simple_upper, SortDirection};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    authors: BTreeMap<i64, Author>,
    publishers: BTreeMap<i64, Publisher>,
    categories: BTreeMap<i64, Category>,
    books: BTreeMap<i64, Book>,
    /// (book_id, author_id)
    book_authors: BTreeSet<(i64, i64)>,
    last_author_id: i64,
    last_publisher_id: i64,
    last_category_id: i64,
    last_book_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn next_id(last: &mut i64) -> i64 {
    *last += 1;
    *last
}

/// Row behaviour shared by the list queries.
trait Row: Clone {
    fn id(&self) -> i64;
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn filter_text(&self) -> &str;
    /// Compare on an allow-listed column; unknown columns compare equal.
    fn compare(&self, other: &Self, column: &str) -> Ordering;

    fn is_live(&self) -> bool {
        self.deleted_at().is_none()
    }
}

macro_rules! named_row {
    ($ty:ty, $filter:ident, { $($col:literal => $field:ident),* $(,)? }) => {
        impl Row for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn deleted_at(&self) -> Option<DateTime<Utc>> {
                self.deleted_at
            }

            fn filter_text(&self) -> &str {
                &self.$filter
            }

            fn compare(&self, other: &Self, column: &str) -> Ordering {
                match column {
                    "id" => self.id.cmp(&other.id),
                    "created_at" => self.created_at.cmp(&other.created_at),
                    "updated_at" => self.updated_at.cmp(&other.updated_at),
                    $($col => self.$field.cmp(&other.$field),)*
                    _ => Ordering::Equal,
                }
            }
        }
    };
}

named_row!(Author, name, { "name" => name });
named_row!(Publisher, name, { "name" => name });
named_row!(Category, name, { "code" => code, "name" => name });
named_row!(Book, title, { "title" => title, "pages" => pages, "year" => year });

/// Filter, sort and page live rows the same way the SQL backend does.
fn page_of<'a, T: Row + 'a>(rows: impl Iterator<Item = &'a T>, page: &PageRequest) -> Slice<T> {
    let needle = page.filter.as_deref().map(simple_upper);
    let mut matched: Vec<&T> = rows
        .filter(|r| r.is_live())
        .filter(|r| match &needle {
            Some(n) => simple_upper(r.filter_text()).contains(n.as_str()),
            None => true,
        })
        .collect();
    matched.sort_by(|a, b| {
        let ord = a.compare(b, page.sort_by);
        let ord = match page.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then(a.id().cmp(&b.id()))
    });
    let total = matched.len() as u64;
    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let items = matched
        .into_iter()
        .skip(offset)
        .take(page.limit as usize)
        .cloned()
        .collect();
    Slice { items, total }
}

fn live<T: Row>(rows: &BTreeMap<i64, T>, id: i64) -> Option<&T> {
    rows.get(&id).filter(|r| r.is_live())
}

fn live_mut<T: Row>(rows: &mut BTreeMap<i64, T>, id: i64) -> Option<&mut T> {
    rows.get_mut(&id).filter(|r| r.is_live())
}

impl Tables {
    fn check_authors(&self, ids: &[i64]) -> Result<(), AppError> {
        let missing: Vec<i64> = ids
            .iter()
            .copied()
            .filter(|id| live(&self.authors, *id).is_none())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(missing_authors(&missing))
        }
    }

    /// Mirrors the books.publisher_id foreign key.
    fn check_publisher_row(&self, id: i64) -> Result<(), AppError> {
        if self.publishers.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::Validation(format!("publisher {} does not exist", id)))
        }
    }

    fn record(&self, book: &Book) -> BookRecord {
        let publisher = live(&self.publishers, book.publisher_id).map(|p| Reference {
            id: p.id,
            name: p.name.clone(),
        });
        let authors = self
            .book_authors
            .range((book.id, i64::MIN)..=(book.id, i64::MAX))
            .filter_map(|(_, author_id)| live(&self.authors, *author_id))
            .map(|a| Reference {
                id: a.id,
                name: a.name.clone(),
            })
            .collect();
        BookRecord {
            book: book.clone(),
            publisher,
            authors,
        }
    }

    fn clear_book_authors(&mut self, book_id: i64) {
        self.book_authors.retain(|(b, _)| *b != book_id);
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|_| AppError::Internal("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl AuthorStore for MemoryStore {
    async fn insert_author(&self, fields: &AuthorFields) -> Result<Author, AppError> {
        let mut t = self.write()?;
        let now = Utc::now();
        let author = Author {
            id: next_id(&mut t.last_author_id),
            name: fields.name.clone(),
            description: fields.description.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.authors.insert(author.id, author.clone());
        Ok(author)
    }

    async fn find_author(&self, id: i64) -> Result<Option<Author>, AppError> {
        Ok(live(&self.read()?.authors, id).cloned())
    }

    async fn update_author(&self, id: i64, fields: &AuthorFields) -> Result<Option<Author>, AppError> {
        let mut t = self.write()?;
        Ok(live_mut(&mut t.authors, id).map(|a| {
            a.name = fields.name.clone();
            a.description = fields.description.clone();
            a.updated_at = Utc::now();
            a.clone()
        }))
    }

    async fn list_authors(&self, page: &PageRequest) -> Result<Slice<Author>, AppError> {
        Ok(page_of(self.read()?.authors.values(), page))
    }
}

#[async_trait]
impl PublisherStore for MemoryStore {
    async fn insert_publisher(&self, fields: &PublisherFields) -> Result<Publisher, AppError> {
        let mut t = self.write()?;
        let now = Utc::now();
        let publisher = Publisher {
            id: next_id(&mut t.last_publisher_id),
            name: fields.name.clone(),
            description: fields.description.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.publishers.insert(publisher.id, publisher.clone());
        Ok(publisher)
    }

    async fn find_publisher(&self, id: i64) -> Result<Option<Publisher>, AppError> {
        Ok(live(&self.read()?.publishers, id).cloned())
    }

    async fn update_publisher(&self, id: i64, fields: &PublisherFields) -> Result<Option<Publisher>, AppError> {
        let mut t = self.write()?;
        Ok(live_mut(&mut t.publishers, id).map(|p| {
            p.name = fields.name.clone();
            p.description = fields.description.clone();
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn list_publishers(&self, page: &PageRequest) -> Result<Slice<Publisher>, AppError> {
        Ok(page_of(self.read()?.publishers.values(), page))
    }

    async fn soft_delete_publisher(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        Ok(live_mut(&mut t.publishers, id)
            .map(|p| {
                let now = Utc::now();
                p.deleted_at = Some(now);
                p.updated_at = now;
            })
            .is_some())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn insert_category(&self, fields: &CategoryFields) -> Result<Category, AppError> {
        let mut t = self.write()?;
        if t.categories.values().any(|c| c.is_live() && c.code == fields.code) {
            return Err(AppError::Conflict(format!("category code {} already exists", fields.code)));
        }
        let now = Utc::now();
        let category = Category {
            id: next_id(&mut t.last_category_id),
            code: fields.code.clone(),
            name: fields.name.clone(),
            description: fields.description.clone(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        t.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        Ok(live(&self.read()?.categories, id).cloned())
    }

    async fn find_category_by_code(&self, code: &str) -> Result<Option<Category>, AppError> {
        let t = self.read()?;
        Ok(t.categories
            .values()
            .find(|c| c.is_live() && c.code == code)
            .cloned())
    }

    async fn update_category(&self, id: i64, fields: &CategoryFields) -> Result<Option<Category>, AppError> {
        let mut t = self.write()?;
        if t
            .categories
            .values()
            .any(|c| c.is_live() && c.id != id && c.code == fields.code)
        {
            return Err(AppError::Conflict(format!("category code {} already exists", fields.code)));
        }
        Ok(live_mut(&mut t.categories, id).map(|c| {
            c.code = fields.code.clone();
            c.name = fields.name.clone();
            c.description = fields.description.clone();
            c.updated_at = Utc::now();
            c.clone()
        }))
    }

    async fn list_categories(&self, page: &PageRequest) -> Result<Slice<Category>, AppError> {
        Ok(page_of(self.read()?.categories.values(), page))
    }

    async fn soft_delete_category(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        Ok(live_mut(&mut t.categories, id)
            .map(|c| {
                let now = Utc::now();
                c.deleted_at = Some(now);
                c.updated_at = now;
            })
            .is_some())
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn insert_book(&self, fields: &BookFields, author_ids: &[i64]) -> Result<i64, AppError> {
        let mut t = self.write()?;
        t.check_authors(author_ids)?;
        t.check_publisher_row(fields.publisher_id)?;
        let now = Utc::now();
        let id = next_id(&mut t.last_book_id);
        t.books.insert(
            id,
            Book {
                id,
                title: fields.title.clone(),
                description: fields.description.clone(),
                pages: fields.pages,
                year: fields.year,
                publisher_id: fields.publisher_id,
                created_at: now,
                updated_at: now,
                deleted_at: None,
            },
        );
        t.book_authors.extend(author_ids.iter().map(|a| (id, *a)));
        Ok(id)
    }

    async fn find_book(&self, id: i64) -> Result<Option<BookRecord>, AppError> {
        let t = self.read()?;
        Ok(live(&t.books, id).map(|b| t.record(b)))
    }

    async fn book_exists(&self, id: i64) -> Result<bool, AppError> {
        Ok(live(&self.read()?.books, id).is_some())
    }

    async fn update_book(&self, id: i64, fields: &BookFields, author_ids: &[i64]) -> Result<bool, AppError> {
        let mut t = self.write()?;
        if live(&t.books, id).is_none() {
            return Ok(false);
        }
        t.check_authors(author_ids)?;
        t.check_publisher_row(fields.publisher_id)?;
        if let Some(book) = live_mut(&mut t.books, id) {
            book.title = fields.title.clone();
            book.description = fields.description.clone();
            book.pages = fields.pages;
            book.year = fields.year;
            book.publisher_id = fields.publisher_id;
            book.updated_at = Utc::now();
        }
        t.clear_book_authors(id);
        t.book_authors.extend(author_ids.iter().map(|a| (id, *a)));
        Ok(true)
    }

    async fn list_books(&self, page: &PageRequest) -> Result<Slice<BookRecord>, AppError> {
        let t = self.read()?;
        let slice = page_of(t.books.values(), page);
        Ok(Slice {
            items: slice.items.iter().map(|b| t.record(b)).collect(),
            total: slice.total,
        })
    }

    async fn soft_delete_book(&self, id: i64) -> Result<bool, AppError> {
        let mut t = self.write()?;
        Ok(live_mut(&mut t.books, id)
            .map(|b| {
                let now = Utc::now();
                b.deleted_at = Some(now);
                b.updated_at = now;
            })
            .is_some())
    }

    async fn add_book_authors(&self, id: i64, author_ids: &[i64]) -> Result<bool, AppError> {
        let mut t = self.write()?;
        if live(&t.books, id).is_none() {
            return Ok(false);
        }
        t.check_authors(author_ids)?;
        if let Some(book) = live_mut(&mut t.books, id) {
            book.updated_at = Utc::now();
        }
        t.book_authors.extend(author_ids.iter().map(|a| (id, *a)));
        Ok(true)
    }

    async fn remove_book_authors(&self, id: i64, author_ids: &[i64]) -> Result<bool, AppError> {
        let mut t = self.write()?;
        let Some(book) = live_mut(&mut t.books, id) else {
            return Ok(false);
        };
        book.updated_at = Utc::now();
        t.book_authors
            .retain(|(b, a)| *b != id || !author_ids.contains(a));
        Ok(true)
    }
}

#[async_trait]
impl StoreHealth for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }
}
