use std::sync::Arc;

use weightlog_storage::WeightRecordStore;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn WeightRecordStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn WeightRecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn WeightRecordStore {
        self.store.as_ref()
    }
}
