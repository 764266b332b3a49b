//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for the properties table.
//! Identifiers are fixed or quoted; every value goes through a `$n` parameter.

use super::params::SqlParam;
use crate::model::{NewProperty, PropertyId, PropertyPatch};
use crate::service::query::{PropertyFilter, Sort, SortField};
use chrono::{DateTime, Utc};

pub const COLUMNS: &str =
    "id, title, description, price, location, features, images, status, created_at, updated_at";

/// Quote identifier for PostgreSQL.
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: SqlParam) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// `%term%` with LIKE metacharacters escaped (backslash is the default escape).
fn contains_pattern(term: &str) -> String {
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

fn sort_expr(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::Price => "price",
        SortField::Title => "title",
        SortField::Status => "status",
        SortField::City => "location->>'city'",
    }
}

/// Appends ` WHERE ...` (or nothing) for the filter, binding its values into `q`.
fn push_where(q: &mut QueryBuf, filter: &PropertyFilter) {
    let mut parts = Vec::new();
    if let Some(search) = &filter.search {
        let n = q.push_param(SqlParam::Text(contains_pattern(search.term())));
        parts.push(format!("(title ILIKE ${n} OR description ILIKE ${n})"));
    }
    if let Some(status) = filter.status {
        let n = q.push_param(SqlParam::Text(status.as_str().to_string()));
        parts.push(format!("status = ${n}"));
    }
    if let Some(city) = &filter.city {
        let n = q.push_param(SqlParam::Text(contains_pattern(city.term())));
        parts.push(format!("location->>'city' ILIKE ${n}"));
    }
    if let Some(min) = filter.min_price {
        let n = q.push_param(SqlParam::Float(min));
        parts.push(format!("price >= ${n}"));
    }
    if let Some(max) = filter.max_price {
        let n = q.push_param(SqlParam::Float(max));
        parts.push(format!("price <= ${n}"));
    }
    if !parts.is_empty() {
        q.sql.push_str(" WHERE ");
        q.sql.push_str(&parts.join(" AND "));
    }
}

/// One page of matching rows.
pub fn select_page(table: &str, filter: &PropertyFilter, sort: &Sort, skip: u64, limit: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT {} FROM {}", COLUMNS, quoted(table));
    push_where(&mut q, filter);
    let order = sort
        .keys()
        .iter()
        .map(|k| format!("{} {}", sort_expr(k.field), if k.descending { "DESC" } else { "ASC" }))
        .collect::<Vec<_>>()
        .join(", ");
    q.sql.push_str(" ORDER BY ");
    if !order.is_empty() {
        q.sql.push_str(&order);
        q.sql.push_str(", ");
    }
    // id breaks ties so OFFSET paging is stable
    q.sql.push_str("id ASC");
    let limit_n = q.push_param(SqlParam::BigInt(i64::from(limit)));
    let offset_n = q.push_param(SqlParam::BigInt(i64::try_from(skip).unwrap_or(i64::MAX)));
    q.sql.push_str(&format!(" LIMIT ${limit_n} OFFSET ${offset_n}"));
    q
}

/// Total rows matching the filter. Independent of `select_page`.
pub fn count(table: &str, filter: &PropertyFilter) -> QueryBuf {
    let mut q = QueryBuf::new();
    q.sql = format!("SELECT COUNT(*) FROM {}", quoted(table));
    push_where(&mut q, filter);
    q
}

pub fn select_by_id(table: &str, id: &PropertyId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Uuid(*id.as_uuid()));
    q.sql = format!("SELECT {} FROM {} WHERE id = ${}", COLUMNS, quoted(table), n);
    q
}

pub fn insert(table: &str, id: &PropertyId, new: &NewProperty, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let values = [
        SqlParam::Uuid(*id.as_uuid()),
        SqlParam::Text(new.title.clone()),
        SqlParam::Text(new.description.clone()),
        SqlParam::Float(new.price),
        SqlParam::Json(serde_json::to_value(&new.location).unwrap_or_default()),
        SqlParam::TextArray(new.features.clone()),
        SqlParam::TextArray(new.images.clone()),
        SqlParam::Text(new.status.as_str().to_string()),
        SqlParam::Timestamp(now),
        SqlParam::Timestamp(now),
    ];
    let placeholders = values
        .into_iter()
        .map(|v| format!("${}", q.push_param(v)))
        .collect::<Vec<_>>()
        .join(", ");
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(table),
        COLUMNS,
        placeholders,
        COLUMNS
    );
    q
}

/// SET only the supplied fields; location merges key-by-key. `updated_at` always moves forward.
pub fn update(table: &str, id: &PropertyId, patch: &PropertyPatch, now: DateTime<Utc>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    if let Some(title) = &patch.title {
        let n = q.push_param(SqlParam::Text(title.clone()));
        sets.push(format!("title = ${n}"));
    }
    if let Some(description) = &patch.description {
        let n = q.push_param(SqlParam::Text(description.clone()));
        sets.push(format!("description = ${n}"));
    }
    if let Some(price) = patch.price {
        let n = q.push_param(SqlParam::Float(price));
        sets.push(format!("price = ${n}"));
    }
    if let Some(location) = patch.location.as_ref().filter(|l| !l.is_empty()) {
        let n = q.push_param(SqlParam::Json(serde_json::to_value(location).unwrap_or_default()));
        sets.push(format!("location = location || ${n}"));
    }
    if let Some(features) = &patch.features {
        let n = q.push_param(SqlParam::TextArray(features.clone()));
        sets.push(format!("features = ${n}"));
    }
    if let Some(images) = &patch.images {
        let n = q.push_param(SqlParam::TextArray(images.clone()));
        sets.push(format!("images = ${n}"));
    }
    if let Some(status) = patch.status {
        let n = q.push_param(SqlParam::Text(status.as_str().to_string()));
        sets.push(format!("status = ${n}"));
    }
    let n = q.push_param(SqlParam::Timestamp(now));
    sets.push(format!(
        "updated_at = GREATEST(${n}, updated_at + INTERVAL '1 microsecond')"
    ));
    let id_n = q.push_param(SqlParam::Uuid(*id.as_uuid()));
    q.sql = format!(
        "UPDATE {} SET {} WHERE id = ${} RETURNING {}",
        quoted(table),
        sets.join(", "),
        id_n,
        COLUMNS
    );
    q
}

pub fn delete(table: &str, id: &PropertyId) -> QueryBuf {
    let mut q = QueryBuf::new();
    let n = q.push_param(SqlParam::Uuid(*id.as_uuid()));
    q.sql = format!("DELETE FROM {} WHERE id = ${} RETURNING id", quoted(table), n);
    q
}

/// Idempotent DDL for the properties table. CHECK constraints re-validate every write.
pub fn create_table(table: &str) -> Vec<String> {
    let t = quoted(table);
    let index = quoted(&format!("{}_created_at_idx", table));
    vec![
        format!(
            r#"CREATE TABLE IF NOT EXISTS {t} (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL CHECK (char_length(title) > 0),
    description TEXT NOT NULL CHECK (char_length(description) >= 10),
    price DOUBLE PRECISION NOT NULL CHECK (price >= 0),
    location JSONB NOT NULL,
    features TEXT[] NOT NULL DEFAULT '{{}}',
    images TEXT[] NOT NULL DEFAULT '{{}}',
    status TEXT NOT NULL DEFAULT 'available' CHECK (status IN ('available', 'rented', 'maintenance')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)"#
        ),
        format!("CREATE INDEX IF NOT EXISTS {index} ON {t} (created_at DESC)"),
    ]
}
