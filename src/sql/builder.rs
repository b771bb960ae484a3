//! Builds parameterized INSERT, SELECT, UPDATE and soft-delete statements from a static table spec.
//!
//! Every read only sees live rows (`deleted_at IS NULL`).

use super::BindValue;
use crate::pagination::{like_pattern, PageRequest};

/// Static description of a catalog table.
#[derive(Debug)]
pub struct TableSpec {
    pub name: &'static str,
    /// Columns returned by SELECT / RETURNING, in struct field order.
    pub columns: &'static [&'static str],
    /// Name-like column the list filter applies to.
    pub filter_column: &'static str,
}

/// Quote identifier for PostgreSQL (safe: only from static specs).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }

    fn push_param(&mut self, v: BindValue) -> usize {
        self.params.push(v);
        self.params.len()
    }
}

fn column_list(table: &TableSpec) -> String {
    table
        .columns
        .iter()
        .map(|c| quoted(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// WHERE clause shared by the page and count queries.
fn live_where(table: &TableSpec, page: &PageRequest, q: &mut QueryBuf) -> String {
    let mut clause = String::from(" WHERE \"deleted_at\" IS NULL");
    if let Some(term) = &page.filter {
        let n = q.push_param(BindValue::String(like_pattern(term)));
        clause.push_str(&format!(" AND UPPER({}) LIKE UPPER(${})", quoted(table.filter_column), n));
    }
    clause
}

/// SELECT one page of live rows: optional filter, ORDER BY sort column then id, LIMIT/OFFSET as params.
pub fn select_page(table: &TableSpec, page: &PageRequest) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = live_where(table, page, &mut q);
    let order_clause = if page.sort_by == "id" {
        format!(" ORDER BY \"id\" {}", page.direction.as_sql())
    } else {
        format!(
            " ORDER BY {} {}, \"id\" ASC",
            quoted(page.sort_by),
            page.direction.as_sql()
        )
    };
    let limit = q.push_param(BindValue::I64(i64::from(page.limit)));
    let offset = q.push_param(BindValue::I64(i64::try_from(page.offset()).unwrap_or(i64::MAX)));
    q.sql = format!(
        "SELECT {} FROM {}{}{} LIMIT ${} OFFSET ${}",
        column_list(table),
        quoted(table.name),
        where_clause,
        order_clause,
        limit,
        offset
    );
    q
}

/// COUNT(*) of live rows matching the same filter as [`select_page`].
pub fn count_live(table: &TableSpec, page: &PageRequest) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_clause = live_where(table, page, &mut q);
    q.sql = format!("SELECT COUNT(*) FROM {}{}", quoted(table.name), where_clause);
    q
}

/// SELECT a live row by id. Caller binds id as $1.
pub fn select_live_by_id(table: &TableSpec) -> String {
    format!(
        "SELECT {} FROM {} WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
        column_list(table),
        quoted(table.name)
    )
}

/// INSERT the given column values; timestamps come from column defaults.
pub fn insert(table: &TableSpec, values: Vec<(&'static str, BindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::with_capacity(values.len());
    let mut placeholders = Vec::with_capacity(values.len());
    for (col, v) in values {
        let n = q.push_param(v);
        cols.push(quoted(col));
        placeholders.push(format!("${}", n));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table.name),
        cols.join(", "),
        placeholders.join(", "),
        column_list(table)
    );
    q
}

/// UPDATE a live row by id, setting the given columns and `updated_at`. Returns the row or nothing.
pub fn update_live(table: &TableSpec, id: i64, values: Vec<(&'static str, BindValue)>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::with_capacity(values.len() + 1);
    for (col, v) in values {
        let n = q.push_param(v);
        sets.push(format!("{} = ${}", quoted(col), n));
    }
    sets.push("\"updated_at\" = NOW()".to_string());
    let id_param = q.push_param(BindValue::I64(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE \"id\" = ${} AND \"deleted_at\" IS NULL RETURNING {}",
        quoted(table.name),
        sets.join(", "),
        id_param,
        column_list(table)
    );
    q
}

/// Mark a live row deleted. Caller binds id as $1; zero rows affected means not found.
pub fn soft_delete(table: &TableSpec) -> String {
    format!(
        "UPDATE {} SET \"deleted_at\" = NOW(), \"updated_at\" = NOW() WHERE \"id\" = $1 AND \"deleted_at\" IS NULL",
        quoted(table.name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::SortDirection;

    const AUTHORS: TableSpec = TableSpec {
        name: "authors",
        columns: &["id", "name"],
        filter_column: "name",
    };

    #[test]
    fn page_without_filter() {
        let page = PageRequest {
            page: 2,
            limit: 10,
            ..PageRequest::default()
        };
        let q = select_page(&AUTHORS, &page);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\" FROM \"authors\" WHERE \"deleted_at\" IS NULL ORDER BY \"id\" ASC LIMIT $1 OFFSET $2"
        );
        assert_eq!(q.params, vec![BindValue::I64(10), BindValue::I64(10)]);
    }

    #[test]
    fn page_with_filter_and_sort() {
        let page = PageRequest {
            page: 1,
            limit: 2,
            sort_by: "name",
            direction: SortDirection::Desc,
            filter: Some("ro".into()),
        };
        let q = select_page(&AUTHORS, &page);
        assert_eq!(
            q.sql,
            "SELECT \"id\", \"name\" FROM \"authors\" WHERE \"deleted_at\" IS NULL AND UPPER(\"name\") LIKE UPPER($1) ORDER BY \"name\" DESC, \"id\" ASC LIMIT $2 OFFSET $3"
        );
        assert_eq!(
            q.params,
            vec![BindValue::String("%ro%".into()), BindValue::I64(2), BindValue::I64(0)]
        );

        let count = count_live(&AUTHORS, &page);
        assert_eq!(
            count.sql,
            "SELECT COUNT(*) FROM \"authors\" WHERE \"deleted_at\" IS NULL AND UPPER(\"name\") LIKE UPPER($1)"
        );
        assert_eq!(count.params.len(), 1);
    }

    #[test]
    fn update_sets_timestamp_and_binds_id_last() {
        let q = update_live(&AUTHORS, 5, vec![("name", "Le Guin".into())]);
        assert_eq!(
            q.sql,
            "UPDATE \"authors\" SET \"name\" = $1, \"updated_at\" = NOW() WHERE \"id\" = $2 AND \"deleted_at\" IS NULL RETURNING \"id\", \"name\""
        );
        assert_eq!(q.params, vec![BindValue::String("Le Guin".into()), BindValue::I64(5)]);
    }

    #[test]
    fn insert_returns_all_columns() {
        let q = insert(&AUTHORS, vec![("name", "Herbert".into())]);
        assert_eq!(
            q.sql,
            "INSERT INTO \"authors\" (\"name\") VALUES ($1) RETURNING \"id\", \"name\""
        );
    }

    #[test]
    fn soft_delete_only_touches_live_rows() {
        assert!(soft_delete(&AUTHORS).contains("\"deleted_at\" IS NULL"));
        assert!(select_live_by_id(&AUTHORS).ends_with("WHERE \"id\" = $1 AND \"deleted_at\" IS NULL"));
    }
}
