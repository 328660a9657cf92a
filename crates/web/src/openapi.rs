use utoipa::OpenApi;

use crate::envelope::ErrorMessage;
use crate::features::weight::handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_records,
        handlers::create_record,
        handlers::update_record,
        handlers::delete_record,
    ),
    components(
        schemas(
            weightlog_storage::dto::common::PaginationParams,
            weightlog_storage::dto::common::RecordPage<weightlog_storage::dto::weight_record::WeightRecordResponse>,
            weightlog_storage::dto::weight_record::WeightRecordResponse,
            weightlog_storage::dto::weight_record::CreateWeightRecordRequest,
            weightlog_storage::dto::weight_record::UpdateWeightRecordRequest,
            weightlog_storage::dto::weight_record::DeleteWeightRecordRequest,
            ErrorMessage,
        )
    ),
    tags(
        (name = "weight", description = "Weight record endpoints"),
    )
)]
pub struct ApiDoc;
