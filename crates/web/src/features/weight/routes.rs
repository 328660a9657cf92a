use axum::{
    Router,
    routing::{get, post},
};

use super::handlers::{create_record, delete_record, list_records, update_record};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/records", get(list_records))
        .route("/create", post(create_record))
        .route("/update", post(update_record))
        .route("/delete", post(delete_record))
}
