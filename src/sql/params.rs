//! Typed bind values for dynamically assembled PostgreSQL statements.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::{Database, Type};

/// One positional parameter. Carries its own PostgreSQL type so a single
/// `Vec<SqlParam>` can hold mixed columns.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlParam {
    Uuid(uuid::Uuid),
    Text(String),
    Float(f64),
    BigInt(i64),
    TextArray(Vec<String>),
    Json(Value),
    Timestamp(DateTime<Utc>),
}

impl<'q> Encode<'q, Postgres> for SqlParam {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        match self {
            SqlParam::Uuid(u) => <uuid::Uuid as Encode<Postgres>>::encode_by_ref(u, buf),
            SqlParam::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)
            }
            SqlParam::Float(n) => <f64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlParam::BigInt(n) => <i64 as Encode<Postgres>>::encode_by_ref(n, buf),
            SqlParam::TextArray(v) => <Vec<String> as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlParam::Json(v) => <Value as Encode<Postgres>>::encode_by_ref(v, buf),
            SqlParam::Timestamp(t) => <DateTime<Utc> as Encode<Postgres>>::encode_by_ref(t, buf),
        }
    }

    fn produces(&self) -> Option<PgTypeInfo> {
        Some(match self {
            SqlParam::Uuid(_) => <uuid::Uuid as Type<Postgres>>::type_info(),
            SqlParam::Text(_) => <String as Type<Postgres>>::type_info(),
            SqlParam::Float(_) => <f64 as Type<Postgres>>::type_info(),
            SqlParam::BigInt(_) => <i64 as Type<Postgres>>::type_info(),
            SqlParam::TextArray(_) => <Vec<String> as Type<Postgres>>::type_info(),
            SqlParam::Json(_) => <Value as Type<Postgres>>::type_info(),
            SqlParam::Timestamp(_) => <DateTime<Utc> as Type<Postgres>>::type_info(),
        })
    }
}

impl Type<Postgres> for SqlParam {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}
