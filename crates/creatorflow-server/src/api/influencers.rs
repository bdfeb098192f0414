//! Influencer roster handlers: CRUD, status changes, and per-influencer
//! content analytics.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use creatorflow_core::{
    content_stats, ContentStats, ContractDetails, Influencer, InfluencerMetrics,
    InfluencerStatus, Payment,
};
use creatorflow_db::{ContentFilter, DbError, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{
    json_body, map_db_error, normalize_limit, normalize_page, parse_id, query_params,
    total_pages, ApiError, ApiResponse, AppState, PaginatedResponse, ResponseMeta,
};

const INFLUENCER_NOT_FOUND: &str = "Influencer not found";

#[derive(Debug, Deserialize)]
pub(super) struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InfluencerRequest {
    pub name: String,
    pub email: String,
    pub channel_name: String,
    pub youtube_link: Option<String>,
    #[serde(default)]
    pub status: InfluencerStatus,
    #[serde(default)]
    pub metrics: InfluencerMetrics,
    #[serde(default)]
    pub contract: ContractDetails,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

/// PUT body: only the fields present are changed.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InfluencerUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub channel_name: Option<String>,
    pub youtube_link: Option<String>,
    pub status: Option<InfluencerStatus>,
    pub metrics: Option<InfluencerMetrics>,
    pub contract: Option<ContractDetails>,
    pub payments: Option<Vec<Payment>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusRequest {
    pub status: InfluencerStatus,
}

/// List rows leave out payment history.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InfluencerListItem {
    id: Uuid,
    name: String,
    email: String,
    channel_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    youtube_link: Option<String>,
    status: InfluencerStatus,
    metrics: InfluencerMetrics,
    contract: ContractDetails,
    created_at: DateTime<Utc>,
}

impl From<Influencer> for InfluencerListItem {
    fn from(i: Influencer) -> Self {
        Self {
            id: i.id,
            name: i.name,
            email: i.email,
            channel_name: i.channel_name,
            youtube_link: i.youtube_link,
            status: i.status,
            metrics: i.metrics,
            contract: i.contract,
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct InfluencerAnalytics {
    metrics: InfluencerMetrics,
    content_stats: ContentStats,
}

/// A validated request, ready to become a record.
struct ValidInfluencer {
    name: String,
    email: String,
    channel_name: String,
    youtube_link: Option<String>,
}

fn required(request_id: &str, field: &str, value: &str) -> Result<String, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            format!("{field} is required"),
        ));
    }
    Ok(trimmed.to_owned())
}

fn email_field(request_id: &str, raw: &str) -> Result<String, ApiError> {
    let email = required(request_id, "email", raw)?.to_lowercase();
    if !email.contains('@') {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            format!("email must be a valid address, got '{email}'"),
        ));
    }
    Ok(email)
}

/// Blank links clear the field.
fn link_field(request_id: &str, raw: &str) -> Result<Option<String>, ApiError> {
    let link = raw.trim();
    if link.is_empty() {
        return Ok(None);
    }
    reqwest::Url::parse(link).map_err(|_| {
        ApiError::new(
            request_id,
            "validation_error",
            format!("'youtubeLink' must be a valid URL, got '{link}'"),
        )
    })?;
    Ok(Some(link.to_owned()))
}

fn validate(request_id: &str, body: &InfluencerRequest) -> Result<ValidInfluencer, ApiError> {
    Ok(ValidInfluencer {
        name: required(request_id, "name", &body.name)?,
        email: email_field(request_id, &body.email)?,
        channel_name: required(request_id, "channelName", &body.channel_name)?,
        youtube_link: match body.youtube_link.as_deref() {
            Some(raw) => link_field(request_id, raw)?,
            None => None,
        },
    })
}

/// Overlay the supplied fields on `existing`, validating each one given.
fn merge_update(
    request_id: &str,
    mut existing: Influencer,
    update: InfluencerUpdate,
) -> Result<Influencer, ApiError> {
    if let Some(name) = update.name {
        existing.name = required(request_id, "name", &name)?;
    }
    if let Some(email) = update.email {
        existing.email = email_field(request_id, &email)?;
    }
    if let Some(channel_name) = update.channel_name {
        existing.channel_name = required(request_id, "channelName", &channel_name)?;
    }
    if let Some(link) = update.youtube_link {
        existing.youtube_link = link_field(request_id, &link)?;
    }
    if let Some(status) = update.status {
        existing.status = status;
    }
    if let Some(metrics) = update.metrics {
        existing.metrics = metrics;
    }
    if let Some(contract) = update.contract {
        existing.contract = contract;
    }
    if let Some(payments) = update.payments {
        existing.payments = payments;
    }
    Ok(existing)
}

fn into_record(
    id: Uuid,
    created_at: DateTime<Utc>,
    valid: ValidInfluencer,
    body: InfluencerRequest,
) -> Influencer {
    Influencer {
        id,
        name: valid.name,
        email: valid.email,
        channel_name: valid.channel_name,
        youtube_link: valid.youtube_link,
        status: body.status,
        metrics: body.metrics,
        contract: body.contract,
        payments: body.payments,
        created_at,
    }
}

fn influencer_error(request_id: &str, error: &DbError) -> ApiError {
    match error {
        DbError::NotFound => ApiError::new(request_id, "not_found", INFLUENCER_NOT_FOUND),
        other => map_db_error(request_id.to_owned(), other),
    }
}

async fn load_influencer(
    state: &AppState,
    request_id: &str,
    raw_id: &str,
) -> Result<Influencer, ApiError> {
    let id = parse_id(request_id, raw_id, "influencer")?;
    state
        .influencers
        .get_influencer(id)
        .await
        .map_err(|e| influencer_error(request_id, &e))?
        .ok_or_else(|| ApiError::new(request_id, "not_found", INFLUENCER_NOT_FOUND))
}

pub(super) async fn list_influencers(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<PaginatedResponse<InfluencerListItem>>, ApiError> {
    let rid = &req_id.0;
    let query = query_params(rid, query)?;
    let page = normalize_page(query.page);
    let limit = normalize_limit(query.limit);

    let total = state
        .influencers
        .count_influencers()
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    let rows = state
        .influencers
        .list_influencers(PageRequest::from_page(page, limit))
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(PaginatedResponse {
        data: rows.into_iter().map(InfluencerListItem::from).collect(),
        page,
        total_pages: total_pages(total, limit),
        total,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn create_influencer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<InfluencerRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Influencer>>), ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, body)?;
    let valid = validate(rid, &body)?;
    let influencer = into_record(Uuid::new_v4(), Utc::now(), valid, body);

    state
        .influencers
        .insert_influencer(&influencer)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    tracing::info!(influencer_id = %influencer.id, "influencer created");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: influencer,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn get_influencer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Influencer>>, ApiError> {
    let influencer = load_influencer(&state, &req_id.0, &id).await?;
    Ok(Json(ApiResponse {
        data: influencer,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn update_influencer(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<InfluencerUpdate>, JsonRejection>,
) -> Result<Json<ApiResponse<Influencer>>, ApiError> {
    let rid = &req_id.0;
    let body = json_body(rid, body)?;
    let existing = load_influencer(&state, rid, &id).await?;
    let merged = merge_update(rid, existing, body)?;

    let saved = state
        .influencers
        .replace_influencer(&merged)
        .await
        .map_err(|e| influencer_error(rid, &e))?;
    tracing::info!(influencer_id = %saved.id, "influencer updated");

    Ok(Json(ApiResponse {
        data: saved,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn update_influencer_status(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
    body: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Influencer>>, ApiError> {
    let rid = &req_id.0;
    let id = parse_id(rid, &id, "influencer")?;
    let body = json_body(rid, body)?;

    let saved = state
        .influencers
        .set_influencer_status(id, body.status)
        .await
        .map_err(|e| influencer_error(rid, &e))?;
    tracing::info!(influencer_id = %saved.id, status = %saved.status, "influencer status changed");

    Ok(Json(ApiResponse {
        data: saved,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn influencer_analytics(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<InfluencerAnalytics>>, ApiError> {
    let rid = &req_id.0;
    let influencer = load_influencer(&state, rid, &id).await?;

    let content = state
        .content
        .list_content(&ContentFilter::for_influencer(influencer.id), None)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: InfluencerAnalytics {
            metrics: influencer.metrics,
            content_stats: content_stats(&content),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
