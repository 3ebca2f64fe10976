use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use placefinder_search::{run_search, SearchError, SearchRequest, SearchResponse};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<SearchResponse>>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let response = run_search(&state.search, state.rewriter.as_deref(), &request)
        .await
        .map_err(|e| map_search_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: response,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) fn map_search_error(request_id: String, error: &SearchError) -> ApiError {
    match error {
        SearchError::Validation(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        SearchError::PageOutOfRange { page, total_pages } => {
            ApiError::new(request_id, "page_out_of_range", error.to_string()).with_details(
                serde_json::json!({ "page": page, "total_pages": total_pages }),
            )
        }
        SearchError::Timeout { .. } => {
            tracing::warn!(error = %error, "search timed out");
            ApiError::new(request_id, "upstream_timeout", "search timed out")
        }
        _ => {
            tracing::error!(error = %error, "search failed");
            ApiError::new(request_id, "internal_error", "search failed")
        }
    }
}
