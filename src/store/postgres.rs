//! PostgreSQL backend built on the SQL builder.

use super::*;
use crate::sql::{
    bind_query_as, bind_query_scalar, count_live, insert, select_live_by_id, select_page, soft_delete,
    update_live, BindValue, TableSpec,
};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool};
use std::collections::HashMap;

const AUTHORS: TableSpec = TableSpec {
    name: "authors",
    columns: &["id", "name", "description", "created_at", "updated_at", "deleted_at"],
    filter_column: "name",
};

const PUBLISHERS: TableSpec = TableSpec {
    name: "publishers",
    columns: &["id", "name", "description", "created_at", "updated_at", "deleted_at"],
    filter_column: "name",
};

const CATEGORIES: TableSpec = TableSpec {
    name: "categories",
    columns: &["id", "code", "name", "description", "created_at", "updated_at", "deleted_at"],
    filter_column: "name",
};

const BOOKS: TableSpec = TableSpec {
    name: "books",
    columns: &[
        "id",
        "title",
        "description",
        "pages",
        "year",
        "publisher_id",
        "created_at",
        "updated_at",
        "deleted_at",
    ],
    filter_column: "title",
};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_live<T>(&self, table: &TableSpec, id: i64) -> Result<Option<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = select_live_by_id(table);
        tracing::debug!(sql = %sql, id, "query");
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn fetch_page<T>(&self, table: &TableSpec, page: &PageRequest) -> Result<Slice<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let q = select_page(table, page);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let items = bind_query_as(sqlx::query_as::<_, T>(&q.sql), &q.params)
            .fetch_all(&self.pool)
            .await?;

        let c = count_live(table, page);
        tracing::debug!(sql = %c.sql, params = ?c.params, "query");
        let total: i64 = bind_query_scalar(sqlx::query_scalar::<_, i64>(&c.sql), &c.params)
            .fetch_one(&self.pool)
            .await?;
        Ok(Slice {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn insert_row<T>(&self, table: &TableSpec, values: Vec<(&'static str, BindValue)>) -> Result<T, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let q = insert(table, values);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_query_as(sqlx::query_as::<_, T>(&q.sql), &q.params)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_row<T>(
        &self,
        table: &TableSpec,
        id: i64,
        values: Vec<(&'static str, BindValue)>,
    ) -> Result<Option<T>, AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let q = update_live(table, id, values);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let row = bind_query_as(sqlx::query_as::<_, T>(&q.sql), &q.params)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn soft_delete_row(&self, table: &TableSpec, id: i64) -> Result<bool, AppError> {
        let sql = soft_delete(table);
        tracing::debug!(sql = %sql, id, "query");
        let done = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(done.rows_affected() > 0)
    }

    /// Attach publisher and live authors to each book, two queries for the whole batch.
    async fn load_relations(&self, books: Vec<Book>) -> Result<Vec<BookRecord>, AppError> {
        if books.is_empty() {
            return Ok(Vec::new());
        }
        let book_ids: Vec<i64> = books.iter().map(|b| b.id).collect();
        let mut publisher_ids: Vec<i64> = books.iter().map(|b| b.publisher_id).collect();
        publisher_ids.sort_unstable();
        publisher_ids.dedup();

        let publishers: HashMap<i64, Reference> = sqlx::query_as::<_, Reference>(
            "SELECT id, name FROM publishers WHERE id = ANY($1) AND deleted_at IS NULL",
        )
        .bind(&publisher_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

        let links: Vec<(i64, i64, String)> = sqlx::query_as(
            "SELECT ba.book_id, a.id, a.name FROM book_authors ba \
             JOIN authors a ON a.id = ba.author_id \
             WHERE ba.book_id = ANY($1) AND a.deleted_at IS NULL \
             ORDER BY a.id",
        )
        .bind(&book_ids)
        .fetch_all(&self.pool)
        .await?;
        let mut authors: HashMap<i64, Vec<Reference>> = HashMap::new();
        for (book_id, id, name) in links {
            authors.entry(book_id).or_default().push(Reference { id, name });
        }

        Ok(books
            .into_iter()
            .map(|book| BookRecord {
                publisher: publishers.get(&book.publisher_id).cloned(),
                authors: authors.remove(&book.id).unwrap_or_default(),
                book,
            })
            .collect())
    }
}

fn author_values(f: &AuthorFields) -> Vec<(&'static str, BindValue)> {
    vec![
        ("name", f.name.clone().into()),
        ("description", f.description.clone().into()),
    ]
}

fn publisher_values(f: &PublisherFields) -> Vec<(&'static str, BindValue)> {
    vec![
        ("name", f.name.clone().into()),
        ("description", f.description.clone().into()),
    ]
}

fn category_values(f: &CategoryFields) -> Vec<(&'static str, BindValue)> {
    vec![
        ("code", f.code.clone().into()),
        ("name", f.name.clone().into()),
        ("description", f.description.clone().into()),
    ]
}

fn book_values(f: &BookFields) -> Vec<(&'static str, BindValue)> {
    vec![
        ("title", f.title.clone().into()),
        ("description", f.description.clone().into()),
        ("pages", f.pages.into()),
        ("year", f.year.into()),
        ("publisher_id", f.publisher_id.into()),
    ]
}

/// Fail unless every id names a live author.
async fn resolve_authors(conn: &mut PgConnection, ids: &[i64]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<i64> = sqlx::query_scalar("SELECT id FROM authors WHERE id = ANY($1) AND deleted_at IS NULL")
        .bind(ids)
        .fetch_all(&mut *conn)
        .await?;
    let missing: Vec<i64> = ids.iter().copied().filter(|id| !found.contains(id)).collect();
    if !missing.is_empty() {
        return Err(missing_authors(&missing));
    }
    Ok(())
}

async fn attach_authors(conn: &mut PgConnection, book_id: i64, ids: &[i64]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    sqlx::query(
        "INSERT INTO book_authors (book_id, author_id) SELECT $1, UNNEST($2::bigint[]) ON CONFLICT DO NOTHING",
    )
    .bind(book_id)
    .bind(ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Bump `updated_at` on a live book, locking its row. False when the book is not live.
async fn touch_book(conn: &mut PgConnection, id: i64) -> Result<bool, AppError> {
    let row: Option<i64> = sqlx::query_scalar(
        "UPDATE books SET updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL RETURNING id",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row.is_some())
}

#[async_trait]
impl AuthorStore for PgStore {
    async fn insert_author(&self, fields: &AuthorFields) -> Result<Author, AppError> {
        self.insert_row(&AUTHORS, author_values(fields)).await
    }

    async fn find_author(&self, id: i64) -> Result<Option<Author>, AppError> {
        self.fetch_live(&AUTHORS, id).await
    }

    async fn update_author(&self, id: i64, fields: &AuthorFields) -> Result<Option<Author>, AppError> {
        self.update_row(&AUTHORS, id, author_values(fields)).await
    }

    async fn list_authors(&self, page: &PageRequest) -> Result<Slice<Author>, AppError> {
        self.fetch_page(&AUTHORS, page).await
    }
}

#[async_trait]
impl PublisherStore for PgStore {
    async fn insert_publisher(&self, fields: &PublisherFields) -> Result<Publisher, AppError> {
        self.insert_row(&PUBLISHERS, publisher_values(fields)).await
    }

    async fn find_publisher(&self, id: i64) -> Result<Option<Publisher>, AppError> {
        self.fetch_live(&PUBLISHERS, id).await
    }

    async fn update_publisher(&self, id: i64, fields: &PublisherFields) -> Result<Option<Publisher>, AppError> {
        self.update_row(&PUBLISHERS, id, publisher_values(fields)).await
    }

    async fn list_publishers(&self, page: &PageRequest) -> Result<Slice<Publisher>, AppError> {
        self.fetch_page(&PUBLISHERS, page).await
    }

    async fn soft_delete_publisher(&self, id: i64) -> Result<bool, AppError> {
        self.soft_delete_row(&PUBLISHERS, id).await
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn insert_category(&self, fields: &CategoryFields) -> Result<Category, AppError> {
        self.insert_row(&CATEGORIES, category_values(fields)).await
    }

    async fn find_category(&self, id: i64) -> Result<Option<Category>, AppError> {
        self.fetch_live(&CATEGORIES, id).await
    }

    async fn find_category_by_code(&self, code: &str) -> Result<Option<Category>, AppError> {
        let row = sqlx::query_as::<_, Category>(
            "SELECT id, code, name, description, created_at, updated_at, deleted_at \
             FROM categories WHERE code = $1 AND deleted_at IS NULL",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_category(&self, id: i64, fields: &CategoryFields) -> Result<Option<Category>, AppError> {
        self.update_row(&CATEGORIES, id, category_values(fields)).await
    }

    async fn list_categories(&self, page: &PageRequest) -> Result<Slice<Category>, AppError> {
        self.fetch_page(&CATEGORIES, page).await
    }

    async fn soft_delete_category(&self, id: i64) -> Result<bool, AppError> {
        self.soft_delete_row(&CATEGORIES, id).await
    }
}

#[async_trait]
impl BookStore for PgStore {
    async fn insert_book(&self, fields: &BookFields, author_ids: &[i64]) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;
        resolve_authors(&mut tx, author_ids).await?;
        let q = insert(&BOOKS, book_values(fields));
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let book = bind_query_as(sqlx::query_as::<_, Book>(&q.sql), &q.params)
            .fetch_one(&mut *tx)
            .await?;
        attach_authors(&mut tx, book.id, author_ids).await?;
        tx.commit().await?;
        Ok(book.id)
    }

    async fn find_book(&self, id: i64) -> Result<Option<BookRecord>, AppError> {
        let Some(book) = self.fetch_live::<Book>(&BOOKS, id).await? else {
            return Ok(None);
        };
        Ok(self.load_relations(vec![book]).await?.pop())
    }

    async fn book_exists(&self, id: i64) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE id = $1 AND deleted_at IS NULL)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn update_book(&self, id: i64, fields: &BookFields, author_ids: &[i64]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let q = update_live(&BOOKS, id, book_values(fields));
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let updated = bind_query_as(sqlx::query_as::<_, Book>(&q.sql), &q.params)
            .fetch_optional(&mut *tx)
            .await?;
        if updated.is_none() {
            return Ok(false);
        }
        resolve_authors(&mut tx, author_ids).await?;
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        attach_authors(&mut tx, id, author_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn list_books(&self, page: &PageRequest) -> Result<Slice<BookRecord>, AppError> {
        let slice = self.fetch_page::<Book>(&BOOKS, page).await?;
        Ok(Slice {
            items: self.load_relations(slice.items).await?,
            total: slice.total,
        })
    }

    async fn soft_delete_book(&self, id: i64) -> Result<bool, AppError> {
        self.soft_delete_row(&BOOKS, id).await
    }

    async fn add_book_authors(&self, id: i64, author_ids: &[i64]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        if !touch_book(&mut tx, id).await? {
            return Ok(false);
        }
        resolve_authors(&mut tx, author_ids).await?;
        attach_authors(&mut tx, id, author_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn remove_book_authors(&self, id: i64, author_ids: &[i64]) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        if !touch_book(&mut tx, id).await? {
            return Ok(false);
        }
        sqlx::query("DELETE FROM book_authors WHERE book_id = $1 AND author_id = ANY($2)")
            .bind(id)
            .bind(author_ids)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(true)
    }
}

#[async_trait]
impl StoreHealth for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
