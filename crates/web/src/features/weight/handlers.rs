use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    response::{IntoResponse, Response},
};
use weightlog_storage::{
    dto::{
        common::{PaginationParams, RecordPage},
        weight_record::{
            CreateWeightRecordRequest, DeleteWeightRecordRequest, UpdateWeightRecordRequest,
            WeightRecordResponse,
        },
    },
    error::StorageError,
};

use crate::envelope::Envelope;
use crate::error::{WebError, WebResult};
use crate::state::AppState;

use super::{MSG_RECORD_NOT_FOUND, MSG_UPDATE_FAILED, services};

#[utoipa::path(
    get,
    path = "/weight/records",
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of records, newest date first, as {code: 0, data: {list, total}}", body = RecordPage<WeightRecordResponse>),
        (status = 400, description = "page or size is not an integer")
    ),
    tag = "weight"
)]
pub async fn list_records(
    State(state): State<AppState>,
    query: Result<Query<PaginationParams>, QueryRejection>,
) -> WebResult<Response> {
    let Query(params) = query?;

    let page = services::list_records(state.store(), &params).await?;

    Ok(Envelope::data(page).into_response())
}

#[utoipa::path(
    post,
    path = "/weight/create",
    request_body = CreateWeightRecordRequest,
    responses(
        (status = 200, description = "Record created, as {code: 0, data: record}", body = WeightRecordResponse),
        (status = 400, description = "Field errors, as {code: 1, msg: {field: [message]}}")
    ),
    tag = "weight"
)]
pub async fn create_record(
    State(state): State<AppState>,
    payload: Result<Json<CreateWeightRecordRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Json(req) = payload?;

    let new_record = req.into_new_record()?;
    let created = services::create_record(state.store(), new_record).await?;

    Ok(Envelope::data(WeightRecordResponse::from(created)).into_response())
}

#[utoipa::path(
    post,
    path = "/weight/update",
    request_body = UpdateWeightRecordRequest,
    responses(
        (status = 200, description = "Weight updated, as {code: 0}"),
        (status = 400, description = "Record not found or invalid parameter")
    ),
    tag = "weight"
)]
pub async fn update_record(
    State(state): State<AppState>,
    payload: Result<Json<UpdateWeightRecordRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Json(req) = payload?;

    let (Some(id), Some(weight)) = (req.record_id(), req.weight()) else {
        tracing::warn!(update_id = ?req.update_id, new_weight = ?req.new_weight, "Rejected weight update");
        return Err(WebError::InvalidParameter(MSG_UPDATE_FAILED.to_string()));
    };

    services::update_weight(state.store(), id, weight)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                tracing::warn!(id, "Weight update for missing record");
                WebError::InvalidParameter(MSG_UPDATE_FAILED.to_string())
            }
            other => WebError::Storage(other),
        })?;

    Ok(Envelope::<()>::empty().into_response())
}

#[utoipa::path(
    post,
    path = "/weight/delete",
    request_body = DeleteWeightRecordRequest,
    responses(
        (status = 200, description = "Record deleted, as {code: 0}"),
        (status = 404, description = "Record not found")
    ),
    tag = "weight"
)]
pub async fn delete_record(
    State(state): State<AppState>,
    payload: Result<Json<DeleteWeightRecordRequest>, JsonRejection>,
) -> WebResult<Response> {
    let Json(req) = payload?;

    let Some(id) = req.record_id() else {
        tracing::warn!(del_id = ?req.del_id, "Rejected delete with unusable id");
        return Err(WebError::NotFound(MSG_RECORD_NOT_FOUND.to_string()));
    };

    services::delete_record(state.store(), id)
        .await
        .map_err(|e| match e {
            StorageError::NotFound => {
                tracing::warn!(id, "Delete for missing record");
                WebError::NotFound(MSG_RECORD_NOT_FOUND.to_string())
            }
            other => WebError::Storage(other),
        })?;

    Ok(Envelope::<()>::empty().into_response())
}
