use rust_decimal::Decimal;
use weightlog_storage::{
    WeightRecordStore,
    dto::{
        common::{PaginationParams, RecordPage},
        weight_record::WeightRecordResponse,
    },
    error::Result,
    models::{NewWeightRecord, WeightRecord},
};

/// One page of records, most recent date first, with the full record count
pub async fn list_records(
    store: &dyn WeightRecordStore,
    params: &PaginationParams,
) -> Result<RecordPage<WeightRecordResponse>> {
    let total = store.count().await?;
    let records = store.list(params.offset(), params.limit()).await?;

    tracing::debug!(
        page = params.page(),
        size = params.limit(),
        returned = records.len(),
        total,
        "Listed weight records"
    );

    Ok(RecordPage::new(
        records.into_iter().map(WeightRecordResponse::from).collect(),
        total,
    ))
}

/// Persist a validated record
pub async fn create_record(
    store: &dyn WeightRecordStore,
    record: NewWeightRecord,
) -> Result<WeightRecord> {
    let created = store.insert(record).await?;
    tracing::info!(id = created.id, date = %created.date, weight = %created.weight, "Weight record created");
    Ok(created)
}

/// Replace the weight of an existing record
pub async fn update_weight(
    store: &dyn WeightRecordStore,
    id: i64,
    weight: Decimal,
) -> Result<WeightRecord> {
    let updated = store.update_weight(id, weight).await?;
    tracing::info!(id, weight = %updated.weight, "Weight record updated");
    Ok(updated)
}

/// Remove a record
pub async fn delete_record(store: &dyn WeightRecordStore, id: i64) -> Result<()> {
    store.delete(id).await?;
    tracing::info!(id, "Weight record deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::dec;
    use weightlog_storage::InMemoryWeightRecordRepository;

    #[tokio::test]
    async fn test_update_weight_writes_existing_record() {
        let store = InMemoryWeightRecordRepository::new();
        let created = create_record(
            &store,
            NewWeightRecord {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                weight: dec!(70.0),
            },
        )
        .await
        .unwrap();

        let updated = update_weight(&store, created.id, dec!(68.3)).await.unwrap();

        assert_eq!(updated.weight, dec!(68.3));
        assert_eq!(updated.submitted_at, created.submitted_at);
        assert_eq!(store.find(created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_weight_missing_record_is_not_found() {
        let store = InMemoryWeightRecordRepository::new();

        let err = update_weight(&store, 999, dec!(65.0)).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
