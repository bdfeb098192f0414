use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use creatorflow_review::QuickReview;
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{json_body, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct QuickReviewRequest {
    pub content: String,
}

/// POST /api/v1/review: one-off AI review of arbitrary text.
pub(super) async fn quick_review(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<QuickReviewRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<QuickReview>>, ApiError> {
    let body = json_body(&req_id.0, body)?;

    let review = state
        .reviewer
        .quick_review(&body.content)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "quick review failed");
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "Error processing content review",
            )
        })?;

    Ok(Json(ApiResponse {
        data: review,
        meta: ResponseMeta::new(req_id.0),
    }))
}
