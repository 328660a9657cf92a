use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored weight measurement.
///
/// `id`, `submitted_at` and `updated_at` are assigned by the store on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct WeightRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub weight: Decimal,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Client-supplied part of a record, already validated and rounded.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWeightRecord {
    pub date: NaiveDate,
    pub weight: Decimal,
}
