use std::cmp::Reverse;
use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::WeightRecordStore;
use crate::error::{Result, StorageError};
use crate::models::{NewWeightRecord, WeightRecord};

#[derive(Default)]
struct Inner {
    last_id: i64,
    records: BTreeMap<i64, WeightRecord>,
}

/// Process-local store with the same semantics as the PostgreSQL repository
#[derive(Default)]
pub struct InMemoryWeightRecordRepository {
    inner: RwLock<Inner>,
}

impl InMemoryWeightRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl WeightRecordStore for InMemoryWeightRecordRepository {
    async fn insert(&self, record: NewWeightRecord) -> Result<WeightRecord> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let now = Utc::now();
        let stored = WeightRecord {
            id: inner.last_id,
            date: record.date,
            weight: record.weight,
            submitted_at: now,
            updated_at: now,
        };
        inner.records.insert(stored.id, stored.clone());

        Ok(stored)
    }

    async fn find(&self, id: i64) -> Result<WeightRecord> {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn update_weight(&self, id: i64, weight: Decimal) -> Result<WeightRecord> {
        let mut inner = self.inner.write().await;
        let record = inner.records.get_mut(&id).ok_or(StorageError::NotFound)?;

        record.weight = weight;
        record.updated_at = Utc::now().max(record.updated_at);

        Ok(record.clone())
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.inner
            .write()
            .await
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<WeightRecord>> {
        let inner = self.inner.read().await;

        let mut records: Vec<&WeightRecord> = inner.records.values().collect();
        records.sort_by_key(|r| Reverse((r.date, r.id)));

        let offset = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);

        Ok(records
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.inner.read().await.records.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::dec;

    fn new_record(y: i32, m: u32, d: u32, weight: Decimal) -> NewWeightRecord {
        NewWeightRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            weight,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_id_and_timestamps() {
        let repo = InMemoryWeightRecordRepository::new();

        let first = repo.insert(new_record(2024, 1, 1, dec!(70.1))).await.unwrap();
        let second = repo.insert(new_record(2024, 1, 2, dec!(69.8))).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.submitted_at, first.updated_at);
        assert_eq!(repo.find(1).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_update_keeps_submitted_at() {
        let repo = InMemoryWeightRecordRepository::new();
        let created = repo.insert(new_record(2024, 1, 1, dec!(70.1))).await.unwrap();

        let first = repo.update_weight(created.id, dec!(69.5)).await.unwrap();
        let second = repo.update_weight(created.id, dec!(69.0)).await.unwrap();

        assert_eq!(second.weight, dec!(69.0));
        assert_eq!(second.submitted_at, created.submitted_at);
        assert!(first.updated_at >= created.updated_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_missing_ids_are_not_found() {
        let repo = InMemoryWeightRecordRepository::new();

        assert!(repo.find(999).await.unwrap_err().is_not_found());
        assert!(repo.update_weight(999, dec!(65.0)).await.unwrap_err().is_not_found());
        assert!(repo.delete(999).await.unwrap_err().is_not_found());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_is_permanent() {
        let repo = InMemoryWeightRecordRepository::new();
        let created = repo.insert(new_record(2024, 1, 1, dec!(70.1))).await.unwrap();

        repo.delete(created.id).await.unwrap();

        assert!(repo.find(created.id).await.is_err());
        assert!(repo.delete(created.id).await.is_err());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_descending() {
        let repo = InMemoryWeightRecordRepository::new();
        repo.insert(new_record(2024, 3, 1, dec!(65.0))).await.unwrap();
        repo.insert(new_record(2024, 3, 5, dec!(64.0))).await.unwrap();
        repo.insert(new_record(2024, 3, 2, dec!(70.0))).await.unwrap();
        repo.insert(new_record(2024, 3, 5, dec!(63.5))).await.unwrap();

        let all = repo.list(0, 10).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);

        let page = repo.list(1, 2).await.unwrap();
        let ids: Vec<i64> = page.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 3]);

        assert!(repo.list(10, 10).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 4);
    }
}
