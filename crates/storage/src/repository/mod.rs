//! Record persistence
//!
//! Handlers only see [`WeightRecordStore`]; the PostgreSQL repository backs the
//! running service and the in-memory one backs tests.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::{NewWeightRecord, WeightRecord};

mod memory;
mod weight_record;

pub use memory::InMemoryWeightRecordRepository;
pub use weight_record::WeightRecordRepository;

/// Storage for weight records.
///
/// Implementations own `id`, `submitted_at` and `updated_at`: callers never
/// supply them. Scans are ordered by `date` descending, then `id` descending.
#[async_trait]
pub trait WeightRecordStore: Send + Sync {
    /// Insert a record, assigning its id and both timestamps
    async fn insert(&self, record: NewWeightRecord) -> Result<WeightRecord>;

    /// Point lookup, `StorageError::NotFound` if absent
    async fn find(&self, id: i64) -> Result<WeightRecord>;

    /// Replace the weight and refresh `updated_at`
    async fn update_weight(&self, id: i64, weight: Decimal) -> Result<WeightRecord>;

    /// Hard delete
    async fn delete(&self, id: i64) -> Result<()>;

    /// One window of the ordered scan
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<WeightRecord>>;

    /// Number of stored records
    async fn count(&self) -> Result<i64>;
}
