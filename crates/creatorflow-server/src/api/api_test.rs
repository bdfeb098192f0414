use super::*;
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use creatorflow_core::{workflow, ContentType, NewContent};
use creatorflow_db::MemoryStore;
use creatorflow_review::{CompletionModel, ReviewError};
use serde_json::{json, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Answer(&'static str);

#[async_trait]
impl CompletionModel for Answer {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ReviewError> {
        Ok(self.0.to_owned())
    }
}

struct Down;

#[async_trait]
impl CompletionModel for Down {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String, ReviewError> {
        Err(ReviewError::Api {
            status: 502,
            body: "upstream unavailable".to_owned(),
        })
    }
}

fn app_with(model: Arc<dyn CompletionModel>, policy: TransitionPolicy) -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState {
        content: store.clone(),
        influencers: store.clone(),
        reviewer: AiReviewAdapter::new(model),
        policy,
    };
    let app = build_app(state, AuthState::disabled(), default_rate_limit_state());
    (app, store)
}

fn app() -> (Router, Arc<MemoryStore>) {
    app_with(
        Arc::new(Answer("On brand and well structured.")),
        TransitionPolicy::Permissive,
    )
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: &[(&str, &str)],
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json parse")
    };
    (status, json)
}

async fn create(app: &Router, body: Value) -> Value {
    let (status, json) = send(app, "POST", "/api/v1/content", Some(body), &[]).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["data"].clone()
}

async fn decide(app: &Router, id: &str, stage: &str, approved: bool) -> (StatusCode, Value) {
    send(
        app,
        "PATCH",
        &format!("/api/v1/content/{id}/review"),
        Some(json!({ "stage": stage, "approved": approved, "feedback": "noted" })),
        &[],
    )
    .await
}

fn video_body() -> Value {
    json!({
        "influencerId": Uuid::new_v4(),
        "title": "Spring haul",
        "type": "video",
    })
}

// ---------------------------------------------------------------------------
// Envelope helpers
// ---------------------------------------------------------------------------

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some(0)), 1);
    assert_eq!(normalize_limit(Some(1_000)), 200);
    assert_eq!(normalize_limit(Some(25)), 25);
}

#[test]
fn normalize_page_floors_at_one() {
    assert_eq!(normalize_page(None), 1);
    assert_eq!(normalize_page(Some(-4)), 1);
    assert_eq!(normalize_page(Some(3)), 3);
}

#[test]
fn total_pages_rounds_up() {
    assert_eq!(total_pages(25, 10), 3);
    assert_eq!(total_pages(20, 10), 2);
    assert_eq!(total_pages(0, 50), 0);
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("validation_error", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("conflict", StatusCode::CONFLICT),
        ("invalid_transition", StatusCode::CONFLICT),
        ("rate_limited", StatusCode::TOO_MANY_REQUESTS),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, expected) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), expected, "code {code}");
    }
}

#[tokio::test]
async fn health_reports_ok_for_reachable_store() {
    let (app, _) = app();
    let (status, json) = send(&app, "GET", "/api/v1/health", None, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "ok");
    assert!(json["meta"]["request_id"].is_string());
}

// ---------------------------------------------------------------------------
// Content creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn concept_creation_attaches_one_safe_ai_review() {
    let (app, _) = app();
    let data = create(
        &app,
        json!({
            "influencerId": Uuid::new_v4(),
            "title": "Kitchen makeover",
            "type": "concept",
            "content": "A week of weeknight dinners using the new cookware line.",
        }),
    )
    .await;

    assert_eq!(data["status"], "draft");
    assert_eq!(data["type"], "video");
    assert!(data["timeline"]["conceptSubmitted"].is_string());
    assert!(data["timeline"]["conceptReviewed"].is_null());

    let reviews = data["reviews"].as_array().expect("reviews");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["reviewer"], "AI");
    assert_eq!(reviews[0]["stage"], "concept");
    assert_eq!(reviews[0]["aiAnalysis"]["brandSafetyCheck"], true);
    assert_eq!(reviews[0]["aiAnalysis"]["score"], 0.8);
}

#[tokio::test]
async fn script_creation_keeps_requested_format() {
    let (app, _) = app();
    let data = create(
        &app,
        json!({
            "influencerId": Uuid::new_v4(),
            "title": "Story teaser",
            "type": "script",
            "format": "story",
            "content": "Open on the product, cut to the reveal.",
        }),
    )
    .await;

    assert_eq!(data["type"], "story");
    assert_eq!(data["reviews"][0]["stage"], "script");
}

#[tokio::test]
async fn ai_failure_still_creates_content() {
    let (app, _) = app_with(Arc::new(Down), TransitionPolicy::Permissive);
    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/content",
        Some(json!({
            "influencerId": Uuid::new_v4(),
            "title": "Unboxing",
            "type": "concept",
            "content": "Unboxing the spring collection",
        })),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let review = &json["data"]["reviews"][0];
    assert_eq!(review["feedback"], "AI review failed");
    assert_eq!(review["aiAnalysis"]["brandSafetyCheck"], false);
    assert_eq!(review["aiAnalysis"]["score"], 0.0);
    assert!(review["aiAnalysis"]["feedback"]
        .as_str()
        .expect("detail")
        .contains("upstream unavailable"));
}

#[tokio::test]
async fn format_types_skip_ai_review() {
    let (app, _) = app();
    let data = create(
        &app,
        json!({
            "influencerId": Uuid::new_v4(),
            "title": "Launch post",
            "type": "post",
            "metrics": { "views": 10 },
            "adCodes": [{ "code": "SPRING10" }],
        }),
    )
    .await;

    assert_eq!(data["type"], "post");
    assert!(data["reviews"].as_array().expect("reviews").is_empty());
    assert_eq!(data["metrics"]["views"], 10);
    assert_eq!(data["adCodes"][0]["code"], "SPRING10");
    assert_eq!(data["version"], 0);
}

#[tokio::test]
async fn invalid_create_bodies_are_validation_errors() {
    let (app, _) = app();

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/content",
        Some(json!({ "influencerId": Uuid::new_v4(), "title": "x", "type": "podcast" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/content",
        Some(json!({ "influencerId": Uuid::new_v4(), "title": "   ", "type": "video" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/content",
        Some(json!({ "title": "missing influencer", "type": "video" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_content_is_not_found() {
    let (app, _) = app();
    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/v1/content/{}", Uuid::new_v4()),
        None,
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());
    assert_eq!(json["error"]["message"], "Content not found");
}

#[tokio::test]
async fn malformed_content_id_is_rejected() {
    let (app, _) = app();
    let (status, json) = send(&app, "GET", "/api/v1/content/not-a-uuid", None, &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn refetch_returns_identical_data() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let uri = format!("/api/v1/content/{id}");
    let (_, first) = send(&app, "GET", &uri, None, &[]).await;
    let (_, second) = send(&app, "GET", &uri, None, &[]).await;
    assert_eq!(first["data"], second["data"]);
}

#[tokio::test]
async fn list_paginates_and_reports_totals() {
    let (app, store) = app();
    let influencer_id = Uuid::new_v4();
    for n in 0..25 {
        let content = workflow::start(
            NewContent {
                id: Uuid::new_v4(),
                influencer_id,
                title: format!("clip {n}"),
                content_type: ContentType::Video,
                content: None,
                metrics: None,
                ad_codes: Vec::new(),
            },
            Utc::now(),
        );
        store.insert_content(&content).await.expect("seed");
    }

    let (status, json) = send(&app, "GET", "/api/v1/content?page=2&limit=10", None, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().expect("data").len(), 10);
    assert_eq!(json["page"], 2);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["total"], 25);

    let (_, last) = send(&app, "GET", "/api/v1/content?page=3&limit=10", None, &[]).await;
    assert_eq!(last["data"].as_array().expect("data").len(), 5);

    let (_, filtered) = send(
        &app,
        "GET",
        &format!("/api/v1/content?influencerId={influencer_id}&status=approved"),
        None,
        &[],
    )
    .await;
    assert_eq!(filtered["total"], 0);
}

#[tokio::test]
async fn list_rejects_unknown_status() {
    let (app, _) = app();
    let (status, json) = send(&app, "GET", "/api/v1/content?status=archived", None, &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

// ---------------------------------------------------------------------------
// Review workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn approvals_walk_the_pipeline() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let expected = [
        ("concept", "script_review"),
        ("script", "video_review"),
        ("video", "approved"),
    ];
    for (stage, status) in expected {
        let (code, json) = decide(&app, &id, stage, true).await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(json["data"]["status"], status, "after approving {stage}");
        assert!(json["data"]["timeline"][format!("{stage}Reviewed")].is_string());
        assert!(json["data"]["timeline"][format!("{stage}Submitted")].is_string());
    }

    let (_, json) = send(&app, "GET", &format!("/api/v1/content/{id}"), None, &[]).await;
    assert_eq!(json["data"]["reviews"].as_array().expect("reviews").len(), 3);
}

#[tokio::test]
async fn rejection_at_any_stage_rejects() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let (_, json) = decide(&app, &id, "script", false).await;
    assert_eq!(json["data"]["status"], "rejected");
}

#[tokio::test]
async fn reviews_are_append_only() {
    let (app, _) = app();
    let id = create(
        &app,
        json!({
            "influencerId": Uuid::new_v4(),
            "title": "Concept with AI",
            "type": "concept",
            "content": "Pitch",
        }),
    )
    .await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    decide(&app, &id, "concept", true).await;
    let (_, json) = decide(&app, &id, "script", false).await;

    let reviews = json["data"]["reviews"].as_array().expect("reviews");
    assert_eq!(reviews.len(), 3);
    assert_eq!(reviews[0]["reviewer"], "AI");
    assert_eq!(reviews[1]["stage"], "concept");
    assert_eq!(reviews[2]["stage"], "script");
}

#[tokio::test]
async fn reviewer_comes_from_header_or_defaults_to_system() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let (_, first) = decide(&app, &id, "concept", true).await;
    assert_eq!(first["data"]["reviews"][0]["reviewer"], "System");

    let (_, second) = send(
        &app,
        "PATCH",
        &format!("/api/v1/content/{id}/review"),
        Some(json!({ "stage": "script", "approved": true })),
        &[("x-reviewer", "jamie")],
    )
    .await;
    assert_eq!(second["data"]["reviews"][1]["reviewer"], "jamie");
    assert_eq!(second["data"]["reviews"][1]["feedback"], "");
}

#[tokio::test]
async fn review_of_unknown_content_is_not_found() {
    let (app, _) = app();
    let (status, json) = decide(&app, &Uuid::new_v4().to_string(), "concept", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["message"], "Content not found");
}

#[tokio::test]
async fn review_with_bad_stage_is_validation_error() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();
    let (status, _) = decide(&app, &id, "teaser", true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn review_without_decision_is_validation_error() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let (status, json) = send(
        &app,
        "PATCH",
        &format!("/api/v1/content/{id}/review"),
        Some(json!({ "stage": "concept", "feedback": "no verdict" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");

    let (_, unchanged) = send(&app, "GET", &format!("/api/v1/content/{id}"), None, &[]).await;
    assert_eq!(unchanged["data"]["status"], "draft");
    assert!(unchanged["data"]["reviews"].as_array().expect("reviews").is_empty());
}

#[tokio::test]
async fn strict_policy_rejects_out_of_order_review() {
    let (app, _) = app_with(
        Arc::new(Answer("fine")),
        TransitionPolicy::Strict,
    );
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let (status, json) = decide(&app, &id, "video", true).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "invalid_transition");

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/content/{id}/submit"),
        Some(json!({ "stage": "concept" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "concept_review");

    let (status, json) = decide(&app, &id, "concept", true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "script_review");
}

#[tokio::test]
async fn script_submission_records_timeline_and_ai_review() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/content/{id}/submit"),
        Some(json!({ "stage": "script", "content": "Scene 1: the reveal." })),
        &[],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["status"], "script_review");
    assert_eq!(data["content"], "Scene 1: the reveal.");
    assert!(data["timeline"]["scriptSubmitted"].is_string());
    assert_eq!(data["reviews"][0]["reviewer"], "AI");
    assert_eq!(data["reviews"][0]["stage"], "script");
}

#[tokio::test]
async fn publish_requires_approval() {
    let (app, _) = app();
    let id = create(&app, video_body()).await["id"]
        .as_str()
        .expect("id")
        .to_owned();
    let publish_uri = format!("/api/v1/content/{id}/publish");

    let (status, json) = send(&app, "POST", &publish_uri, None, &[]).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"]["code"], "invalid_transition");

    for stage in ["concept", "script", "video"] {
        decide(&app, &id, stage, true).await;
    }
    let (status, json) = send(&app, "POST", &publish_uri, None, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "published");
    assert!(json["data"]["timeline"]["published"].is_string());
}

// ---------------------------------------------------------------------------
// Influencers
// ---------------------------------------------------------------------------

fn influencer_body(email: &str) -> Value {
    json!({
        "name": "Avery Lin",
        "email": email,
        "channelName": "AveryEats",
        "youtubeLink": "https://youtube.com/@averyeats",
        "metrics": { "subscribers": 120000, "averageViews": 40000, "engagementRate": 4.2 },
        "payments": [{ "amount": "250.00", "date": "2025-03-01T00:00:00Z", "status": "paid" }],
    })
}

#[tokio::test]
async fn influencer_crud_round_trip() {
    let (app, _) = app();
    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/influencers",
        Some(influencer_body("avery@example.com")),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["contract"]["status"], "pending");
    let id = created["data"]["id"].as_str().expect("id").to_owned();

    let (status, dup) = send(
        &app,
        "POST",
        "/api/v1/influencers",
        Some(influencer_body("avery@example.com")),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["error"]["code"], "conflict");

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/api/v1/influencers/{id}/status"),
        Some(json!({ "status": "active" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["status"], "active");

    let mut replacement = influencer_body("avery.lin@example.com");
    replacement["channelName"] = json!("AveryCooks");
    let (status, replaced) = send(
        &app,
        "PUT",
        &format!("/api/v1/influencers/{id}"),
        Some(replacement),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["data"]["channelName"], "AveryCooks");
    assert_eq!(replaced["data"]["createdAt"], created["data"]["createdAt"]);

    let (status, list) = send(&app, "GET", "/api/v1/influencers", None, &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 1);
    assert!(list["data"][0].get("payments").is_none());
}

#[tokio::test]
async fn influencer_put_changes_only_supplied_fields() {
    let (app, _) = app();
    let mut body = influencer_body("rio@example.com");
    body["status"] = json!("active");
    let (status, created) = send(&app, "POST", "/api/v1/influencers", Some(body), &[]).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["id"].as_str().expect("id").to_owned();
    let uri = format!("/api/v1/influencers/{id}");

    let (status, updated) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({
            "name": "Rio Park",
            "email": "rio@example.com",
            "channelName": "RioEats",
        })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["name"], "Rio Park");
    assert_eq!(updated["data"]["status"], "active");
    assert_eq!(updated["data"]["payments"], created["data"]["payments"]);
    assert_eq!(updated["data"]["payments"].as_array().expect("payments").len(), 1);
    assert_eq!(updated["data"]["metrics"], created["data"]["metrics"]);

    let (status, linked) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "youtubeLink": "https://youtube.com/@rioeats" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(linked["data"]["youtubeLink"], "https://youtube.com/@rioeats");
    assert_eq!(linked["data"]["channelName"], "RioEats");

    let (status, json) = send(&app, "PUT", &uri, Some(json!({ "name": "  " })), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "validation_error");
}

#[tokio::test]
async fn influencer_validation_and_not_found() {
    let (app, _) = app();
    let mut body = influencer_body("no-at-sign");
    let (status, _) = send(&app, "POST", "/api/v1/influencers", Some(body.clone()), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    body["email"] = json!("ok@example.com");
    body["youtubeLink"] = json!("not a link");
    let (status, _) = send(&app, "POST", "/api/v1/influencers", Some(body), &[]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/v1/influencers/{}", Uuid::new_v4()),
        None,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["message"], "Influencer not found");
}

#[tokio::test]
async fn content_reads_include_influencer_summary_and_analytics() {
    let (app, _) = app();
    let (_, created) = send(
        &app,
        "POST",
        "/api/v1/influencers",
        Some(influencer_body("sky@example.com")),
        &[],
    )
    .await;
    let influencer_id = created["data"]["id"].as_str().expect("id").to_owned();

    let content = create(
        &app,
        json!({ "influencerId": influencer_id, "title": "Pantry tour", "type": "video" }),
    )
    .await;
    assert_eq!(content["influencer"]["name"], "Avery Lin");
    assert_eq!(content["influencer"]["channelName"], "AveryEats");

    let orphan = create(&app, video_body()).await;
    assert!(orphan["influencer"].is_null());

    let content_id = content["id"].as_str().expect("id");
    for stage in ["concept", "script", "video"] {
        decide(&app, content_id, stage, true).await;
    }

    let (status, json) = send(
        &app,
        "GET",
        &format!("/api/v1/influencers/{influencer_id}/analytics"),
        None,
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["contentStats"]["total"], 1);
    assert_eq!(json["data"]["contentStats"]["approved"], 1);
    assert!(json["data"]["contentStats"]["averageReviewTimeMs"].as_f64().expect("avg") >= 0.0);
    assert_eq!(json["data"]["metrics"]["subscribers"], 120_000);
}

// ---------------------------------------------------------------------------
// Quick review
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quick_review_applies_rejected_token() {
    let (app, _) = app_with(
        Arc::new(Answer("REJECTED: off-brand language")),
        TransitionPolicy::Permissive,
    );
    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/review",
        Some(json!({ "content": "Caption draft" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["approved"], false);
    assert_eq!(json["data"]["review"], "REJECTED: off-brand language");
}

#[tokio::test]
async fn quick_review_failure_is_server_error() {
    let (app, _) = app_with(Arc::new(Down), TransitionPolicy::Permissive);
    let (status, json) = send(
        &app,
        "POST",
        "/api/v1/review",
        Some(json!({ "content": "Caption draft" })),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["message"], "Error processing content review");
}
