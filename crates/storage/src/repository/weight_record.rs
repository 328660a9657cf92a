use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::WeightRecordStore;
use crate::error::{Result, StorageError};
use crate::models::{NewWeightRecord, WeightRecord};

const RECORD_COLUMNS: &str = "id, date, weight, submitted_at, updated_at";

#[derive(Clone)]
pub struct WeightRecordRepository {
    pool: PgPool,
}

impl WeightRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WeightRecordStore for WeightRecordRepository {
    async fn insert(&self, record: NewWeightRecord) -> Result<WeightRecord> {
        let query = format!(
            r#"
            INSERT INTO weight_records (date, weight, submitted_at, updated_at)
            VALUES ($1, $2, now(), now())
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, WeightRecord>(&query)
            .bind(record.date)
            .bind(record.weight)
            .fetch_one(&self.pool)
            .await?;

        Ok(record)
    }

    async fn find(&self, id: i64) -> Result<WeightRecord> {
        let query = format!("SELECT {RECORD_COLUMNS} FROM weight_records WHERE id = $1");

        let record = sqlx::query_as::<_, WeightRecord>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    async fn update_weight(&self, id: i64, weight: Decimal) -> Result<WeightRecord> {
        let query = format!(
            r#"
            UPDATE weight_records
            SET weight = $2,
                updated_at = GREATEST(now(), updated_at)
            WHERE id = $1
            RETURNING {RECORD_COLUMNS}
            "#
        );

        let record = sqlx::query_as::<_, WeightRecord>(&query)
            .bind(id)
            .bind(weight)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM weight_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<WeightRecord>> {
        let query = format!(
            r#"
            SELECT {RECORD_COLUMNS}
            FROM weight_records
            ORDER BY date DESC, id DESC
            LIMIT $1 OFFSET $2
            "#
        );

        let records = sqlx::query_as::<_, WeightRecord>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn count(&self) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM weight_records")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
