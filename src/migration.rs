//! Catalog DDL. Every statement is idempotent, so startup can run it against an
//! existing database.

use crate::error::AppError;
use sqlx::postgres::PgConnectOptions;
use sqlx::{ConnectOptions, PgPool};

/// Tables, then the join table, then indexes. Order follows foreign keys.
const DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS authors (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS publishers (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id BIGSERIAL PRIMARY KEY,
        code TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS books (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        pages INTEGER NOT NULL,
        year INTEGER NOT NULL,
        publisher_id BIGINT NOT NULL REFERENCES publishers (id),
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        deleted_at TIMESTAMPTZ
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS book_authors (
        book_id BIGINT NOT NULL REFERENCES books (id),
        author_id BIGINT NOT NULL REFERENCES authors (id),
        PRIMARY KEY (book_id, author_id)
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS categories_code_live_key ON categories (code) WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS authors_live_idx ON authors (id) WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS publishers_live_idx ON publishers (id) WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS books_live_idx ON books (id) WHERE deleted_at IS NULL",
    "CREATE INDEX IF NOT EXISTS books_publisher_idx ON books (publisher_id)",
    "CREATE INDEX IF NOT EXISTS book_authors_author_idx ON book_authors (author_id)",
];

/// Create the catalog tables and indexes if missing.
pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    for statement in DDL {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    tx.commit().await?;
    tracing::info!(statements = DDL.len(), "catalog schema ready");
    Ok(())
}

/// Create the target database when it does not exist yet. Connects to the
/// `postgres` maintenance database with the same credentials.
pub async fn ensure_database_exists(options: &PgConnectOptions) -> Result<(), AppError> {
    let Some(db_name) = options.get_database().map(str::to_string) else {
        return Ok(());
    };
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let mut conn = options.clone().database("postgres").connect().await?;
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
        tracing::info!(database = %db_name, "created database");
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_identifiers() {
        assert_eq!(quote_ident("book_catalog"), "\"book_catalog\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn ddl_is_idempotent() {
        for statement in DDL {
            assert!(statement.contains("IF NOT EXISTS"), "{}", statement);
        }
    }

    #[test]
    fn category_code_unique_only_among_live_rows() {
        let index = DDL
            .iter()
            .find(|s| s.contains("categories_code_live_key"))
            .unwrap();
        assert!(index.contains("UNIQUE") && index.ends_with("WHERE deleted_at IS NULL"));
    }
}
