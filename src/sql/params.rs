//! Typed bind values carried by [`QueryBuf`](super::QueryBuf) and helpers to bind them to sqlx queries.

use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::{QueryAs, QueryScalar};

/// A value that can be bound to a PostgreSQL query in placeholder order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BindValue {
    I32(i32),
    I64(i64),
    String(String),
}

impl From<i32> for BindValue {
    fn from(n: i32) -> Self {
        BindValue::I32(n)
    }
}

impl From<i64> for BindValue {
    fn from(n: i64) -> Self {
        BindValue::I64(n)
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::String(s)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::String(s.to_string())
    }
}

macro_rules! bind_all {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for p in $params {
            query = match p {
                BindValue::I32(n) => query.bind(*n),
                BindValue::I64(n) => query.bind(*n),
                BindValue::String(s) => query.bind(s.as_str()),
            };
        }
        query
    }};
}

pub fn bind_query_as<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    bind_all!(query, params)
}

pub fn bind_query_scalar<'q, O>(
    query: QueryScalar<'q, Postgres, O, PgArguments>,
    params: &'q [BindValue],
) -> QueryScalar<'q, Postgres, O, PgArguments> {
    bind_all!(query, params)
}
