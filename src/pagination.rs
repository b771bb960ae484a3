//! Page, sort and filter parameters for list endpoints.
//!
//! Sort columns are only ever taken from a per-entity allow-list, so the
//! `&'static str` held by [`PageRequest::sort_by`] is safe to interpolate
//! into SQL.

use crate::error::AppError;
use std::collections::HashMap;
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_SORT: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(AppError::Validation(format!(
                "invalid direction: {} (expected asc or desc)",
                s
            ))),
        }
    }
}

/// Per-entity list options: the query parameter carrying the name filter and
/// the columns a client may sort by.
#[derive(Debug)]
pub struct ListSpec {
    pub filter_param: &'static str,
    pub sortable: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
    pub sort_by: &'static str,
    pub direction: SortDirection,
    /// Case-insensitive substring filter on the entity's name-like column.
    pub filter: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: DEFAULT_SORT,
            direction: SortDirection::Asc,
            filter: None,
        }
    }
}

impl PageRequest {
    /// Parse raw query parameters. `p` and `pages` both name the page number.
    pub fn from_params(params: &HashMap<String, String>, list: &ListSpec) -> Result<Self, AppError> {
        let mut req = PageRequest::default();

        if let Some(raw) = params.get("p").or_else(|| params.get("pages")) {
            req.page = parse_positive("p", raw)?;
        }
        if let Some(raw) = params.get("limit") {
            req.limit = parse_positive("limit", raw)?.min(MAX_LIMIT);
        }
        if let Some(raw) = params.get("sortBy") {
            req.sort_by = list
                .sortable
                .iter()
                .copied()
                .find(|col| *col == raw.as_str())
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "cannot sort by {} (allowed: {})",
                        raw,
                        list.sortable.join(", ")
                    ))
                })?;
        }
        if let Some(raw) = params.get("direction") {
            req.direction = raw.parse()?;
        }
        req.filter = params
            .get(list.filter_param)
            .filter(|s| !s.trim().is_empty())
            .cloned();
        Ok(req)
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u32, AppError> {
    let n: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be an integer", key)))?;
    if n <= 0 {
        return Err(AppError::Validation(format!("{} must be greater than 0", key)));
    }
    Ok(u32::try_from(n).unwrap_or(u32::MAX))
}

/// ceil(total / limit); zero when there is nothing to page through.
pub fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}

/// Escape LIKE wildcards and wrap the term for a substring match. Case is
/// left alone; the query upper-cases both sides.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Upper-case one char at a time, keeping chars whose upper case is longer
/// than one char (`ß` stays `ß`). Matches PostgreSQL `UPPER`.
pub fn simple_upper(s: &str) -> String {
    s.chars()
        .map(|c| {
            let mut upper = c.to_uppercase();
            match (upper.next(), upper.next()) {
                (Some(u), None) => u,
                _ => c,
            }
        })
        .collect()
}
