//! PostgreSQL-backed store. Statements come from `crate::sql`.

use super::PropertyStore;
use crate::error::{AppError, FieldError};
use crate::model::{Location, NewProperty, Property, PropertyId, PropertyPatch};
use crate::service::query::{PropertyFilter, Sort};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{ConnectOptions, PgPool};
use std::str::FromStr;

pub const DEFAULT_TABLE: &str = "properties";

#[derive(sqlx::FromRow)]
struct PropertyRow {
    id: uuid::Uuid,
    title: String,
    description: String,
    price: f64,
    location: Json<Location>,
    features: Vec<String>,
    images: Vec<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PropertyRow> for Property {
    type Error = AppError;

    fn try_from(row: PropertyRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| AppError::Internal(format!("stored record {}: {}", row.id, e)))?;
        Ok(Property {
            id: PropertyId::from(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            location: row.location.0,
            features: row.features,
            images: row.images,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    table: String,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_table(pool, DEFAULT_TABLE)
    }

    pub fn with_table(pool: PgPool, table: &str) -> Self {
        PgStore {
            pool,
            table: table.to_string(),
        }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, AppError> {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the table and index if missing.
    pub async fn ensure_schema(&self) -> Result<(), AppError> {
        for ddl in sql::create_table(&self.table) {
            tracing::debug!(sql = %ddl, "ddl");
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch_one_row(&self, q: QueryBuf) -> Result<Option<Property>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, PropertyRow>(&sql);
        for p in params {
            query = query.bind(p);
        }
        let row = query.fetch_optional(&self.pool).await.map_err(constraint_to_validation)?;
        row.map(Property::try_from).transpose()
    }
}

/// CHECK violations surface as validation failures rather than 500s.
fn constraint_to_validation(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &err {
        if db.code().as_deref() == Some("23514") {
            let field = db.constraint().unwrap_or("record").to_string();
            return AppError::Validation(vec![FieldError::new(field, db.message().to_string())]);
        }
    }
    AppError::Db(err)
}

#[async_trait]
impl PropertyStore for PgStore {
    async fn create(&self, new: NewProperty) -> Result<Property, AppError> {
        let id = PropertyId::new();
        let q = sql::insert(&self.table, &id, &new, Utc::now());
        self.fetch_one_row(q)
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))
    }

    async fn find(
        &self,
        filter: &PropertyFilter,
        sort: &Sort,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Property>, AppError> {
        let q = sql::select_page(&self.table, filter, sort, skip, limit);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_as::<_, PropertyRow>(&sql);
        for p in params {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Property::try_from).collect()
    }

    async fn count(&self, filter: &PropertyFilter) -> Result<u64, AppError> {
        let q = sql::count(&self.table, filter);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_scalar::<_, i64>(&sql);
        for p in params {
            query = query.bind(p);
        }
        let n = query.fetch_one(&self.pool).await?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    async fn get(&self, id: &PropertyId) -> Result<Property, AppError> {
        self.fetch_one_row(sql::select_by_id(&self.table, id))
            .await?
            .ok_or_else(AppError::property_not_found)
    }

    async fn update(&self, id: &PropertyId, patch: PropertyPatch) -> Result<Property, AppError> {
        self.fetch_one_row(sql::update(&self.table, id, &patch, Utc::now()))
            .await?
            .ok_or_else(AppError::property_not_found)
    }

    async fn delete(&self, id: &PropertyId) -> Result<(), AppError> {
        let q = sql::delete(&self.table, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let QueryBuf { sql, params } = q;
        let mut query = sqlx::query_scalar::<_, uuid::Uuid>(&sql);
        for p in params {
            query = query.bind(p);
        }
        query
            .fetch_optional(&self.pool)
            .await?
            .map(|_| ())
            .ok_or_else(AppError::property_not_found)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

/// Connect to the server's `postgres` database and create the target database if it does not exist.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::BadRequest(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", sql::quoted(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::BadRequest("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}
