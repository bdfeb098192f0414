//! Content review API.
//!
//! - `GET   /api/v1/content`              filtered, paginated list
//! - `POST  /api/v1/content`              create (AI pre-review for concepts/scripts)
//! - `GET   /api/v1/content/{id}`         single record
//! - `PATCH /api/v1/content/{id}/review`  record a review decision
//! - `POST  /api/v1/content/{id}/submit`  submit material for a stage
//! - `POST  /api/v1/content/{id}/publish` publish approved content

use std::collections::{HashMap, HashSet};

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use chrono::Utc;
use creatorflow_core::{
    workflow, AdCode, Content, ContentMetrics, ContentStatus, ContentType, Influencer,
    NewContent, ReviewDecision, Stage, SYSTEM_REVIEWER,
};
use creatorflow_db::{ContentFilter, DbError, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    json_body, map_db_error, map_workflow_error, normalize_limit, normalize_page, parse_id,
    query_params, total_pages, ApiError, ApiResponse, AppState, PaginatedResponse, ResponseMeta,
};

const CONTENT_NOT_FOUND: &str = "Content not found";
const REVIEWER_HEADER: &str = "x-reviewer";

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ContentQuery {
    pub status: Option<String>,
    pub influencer_id: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CreateContentRequest {
    pub influencer_id: Uuid,
    pub title: String,
    /// Either a publication format (`video`/`post`/`story`) or a submission
    /// stage (`concept`/`script`). A stage triggers the AI pre-review and the
    /// stored format then comes from `format`.
    #[serde(rename = "type")]
    pub kind: String,
    pub content: Option<String>,
    pub format: Option<ContentType>,
    pub metrics: Option<ContentMetrics>,
    #[serde(default)]
    pub ad_codes: Vec<AdCode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ReviewRequest {
    pub stage: Stage,
    pub approved: bool,
    #[serde(default)]
    pub feedback: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SubmitRequest {
    pub stage: Stage,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InfluencerSummary {
    id: Uuid,
    name: String,
    channel_name: String,
}

impl From<&Influencer> for InfluencerSummary {
    fn from(influencer: &Influencer) -> Self {
        Self {
            id: influencer.id,
            name: influencer.name.clone(),
            channel_name: influencer.channel_name.clone(),
        }
    }
}

/// A content record as served: the stored document plus its influencer.
#[derive(Debug, Serialize)]
pub(super) struct ContentView {
    #[serde(flatten)]
    content: Content,
    influencer: Option<InfluencerSummary>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn content_error(request_id: &str, error: &DbError) -> ApiError {
    match error {
        DbError::NotFound => ApiError::new(request_id, "not_found", CONTENT_NOT_FOUND),
        other => map_db_error(request_id.to_owned(), other),
    }
}

fn parse_status(request_id: &str, raw: Option<&str>) -> Result<Option<ContentStatus>, ApiError> {
    raw.map(str::parse::<ContentStatus>)
        .transpose()
        .map_err(|e| ApiError::new(request_id, "validation_error", e.to_string()))
}

/// Resolve the creation `type` into the stored format plus the stage to
/// pre-review, if any.
fn resolve_kind(
    request_id: &str,
    kind: &str,
    format: Option<ContentType>,
) -> Result<(ContentType, Option<Stage>), ApiError> {
    if let Ok(stage) = kind.parse::<Stage>() {
        if stage.is_ai_reviewed() {
            return Ok((format.unwrap_or(ContentType::Video), Some(stage)));
        }
    }
    kind.parse::<ContentType>()
        .map(|content_type| (content_type, None))
        .map_err(|_| {
            ApiError::new(
                request_id,
                "validation_error",
                format!(
                    "type must be one of: concept, script, video, post, story; got '{kind}'"
                ),
            )
        })
}

fn reviewer_from(headers: &HeaderMap) -> String {
    headers
        .get(REVIEWER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(SYSTEM_REVIEWER)
        .to_owned()
}

async fn load_content(state: &AppState, request_id: &str, id: Uuid) -> Result<Content, ApiError> {
    state
        .content
        .get_content(id)
        .await
        .map_err(|e| content_error(request_id, &e))?
        .ok_or_else(|| ApiError::new(request_id, "not_found", CONTENT_NOT_FOUND))
}

async fn with_influencers(
    state: &AppState,
    request_id: &str,
    records: Vec<Content>,
) -> Result<Vec<ContentView>, ApiError> {
    let ids: Vec<Uuid> = records
        .iter()
        .map(|c| c.influencer_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let influencers: HashMap<Uuid, Influencer> = state
        .influencers
        .get_influencers(&ids)
        .await
        .map_err(|e| map_db_error(request_id.to_owned(), &e))?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    Ok(records
        .into_iter()
        .map(|content| ContentView {
            influencer: influencers
                .get(&content.influencer_id)
                .map(InfluencerSummary::from),
            content,
        })
        .collect())
}

async fn view_one(
    state: &AppState,
    request_id: &str,
    content: Content,
) -> Result<ContentView, ApiError> {
    let mut views = with_influencers(state, request_id, vec![content]).await?;
    views
        .pop()
        .ok_or_else(|| ApiError::new(request_id, "internal_error", "content view missing"))
}

async fn save(state: &AppState, request_id: &str, content: &Content) -> Result<Content, ApiError> {
    state
        .content
        .update_content(content)
        .await
        .map_err(|e| content_error(request_id, &e))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub(super) async fn list_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<ContentView>>, ApiError> {
    let rid = &req_id.0;
    let query = query_params(rid, query)?;

    let filter = ContentFilter {
        status: parse_status(rid, query.status.as_deref())?,
        influencer_id: query
            .influencer_id
            .as_deref()
            .map(|raw| parse_id(rid, raw, "influencer"))
            .transpose()?,
    };
    let page = normalize_page(query.page);
    let limit = normalize_limit(query.limit);

    let total = state
        .content
        .count_content(&filter)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let records = state
        .content
        .list_content(&filter, Some(PageRequest::from_page(page, limit)))
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let data = with_influencers(&state, rid, records).await?;

    Ok(Json(PaginatedResponse {
        data,
        page,
        total_pages: total_pages(total, limit),
        total,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CreateContentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<ContentView>>), ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, body)?;

    let title = body.title.trim().to_owned();
    if title.is_empty() {
        return Err(ApiError::new(rid, "validation_error", "title is required"));
    }
    let (content_type, ai_stage) = resolve_kind(rid, &body.kind, body.format)?;

    let mut content = workflow::start(
        NewContent {
            id: Uuid::new_v4(),
            influencer_id: body.influencer_id,
            title,
            content_type,
            content: body.content,
            metrics: body.metrics,
            ad_codes: body.ad_codes,
        },
        Utc::now(),
    );

    if let Some(stage) = ai_stage {
        let text = content.content.clone().unwrap_or_default();
        let review = state.reviewer.review_submission(&text, stage).await;
        content = workflow::attach_ai_review(
            content,
            stage,
            review.feedback.clone(),
            review.analysis(),
            Utc::now(),
        );
    }

    state
        .content
        .insert_content(&content)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    tracing::info!(
        content_id = %content.id,
        influencer_id = %content.influencer_id,
        ai_reviewed = ai_stage.is_some(),
        "content created"
    );

    let view = view_one(&state, rid, content).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: view,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn get_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ContentView>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id, "content")?;
    let content = load_content(&state, rid, id).await?;
    let view = view_one(&state, rid, content).await?;

    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn review_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ContentView>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id, "content")?;
    let body = json_body(rid, body)?;
    let content = load_content(&state, rid, id).await?;

    let decision = ReviewDecision {
        stage: body.stage,
        approved: body.approved,
        feedback: body.feedback,
        reviewer: reviewer_from(&headers),
    };
    let reviewed = workflow::apply_review(content, decision, state.policy, Utc::now())
        .map_err(|e| map_workflow_error(rid.clone(), &e))?;
    let saved = save(&state, rid, &reviewed).await?;

    tracing::info!(
        content_id = %saved.id,
        stage = %body.stage,
        approved = body.approved,
        status = %saved.status,
        "content reviewed"
    );

    let view = view_one(&state, rid, saved).await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn submit_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<SubmitRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ContentView>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id, "content")?;
    let body = json_body(rid, body)?;
    let mut content = load_content(&state, rid, id).await?;

    let text = body.content.filter(|t| !t.trim().is_empty());
    if let Some(ref text) = text {
        content.content = Some(text.clone());
    }

    let now = Utc::now();
    let mut submitted = workflow::apply_submission(content, body.stage, state.policy, now)
        .map_err(|e| map_workflow_error(rid.clone(), &e))?;

    if let Some(text) = text.as_deref().filter(|_| body.stage.is_ai_reviewed()) {
        let review = state.reviewer.review_submission(text, body.stage).await;
        submitted = workflow::attach_ai_review(
            submitted,
            body.stage,
            review.feedback.clone(),
            review.analysis(),
            Utc::now(),
        );
    }

    let saved = save(&state, rid, &submitted).await?;
    tracing::info!(
        content_id = %saved.id,
        stage = %body.stage,
        status = %saved.status,
        "content submitted"
    );

    let view = view_one(&state, rid, saved).await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn publish_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ContentView>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id, "content")?;
    let content = load_content(&state, rid, id).await?;

    let published = workflow::apply_publish(content, Utc::now())
        .map_err(|e| map_workflow_error(rid.clone(), &e))?;
    let saved = save(&state, rid, &published).await?;
    tracing::info!(content_id = %saved.id, "content published");

    let view = view_one(&state, rid, saved).await?;
    Ok(Json(ApiResponse {
        data: view,
        meta: ResponseMeta::new(req_id.0),
    }))
}
