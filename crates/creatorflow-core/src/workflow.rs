//! Review workflow engine.
//!
//! Every function here is a pure step `(record, input, now) -> record`. The
//! engine is the only place a content status changes; callers load a record,
//! run one step, and persist the result. Review history is append-only.

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::content::{
    AdCode, AiAnalysis, Content, ContentMetrics, ContentStatus, ContentType, Review, Stage,
    Timeline,
};

/// Reviewer recorded when the caller does not identify itself.
pub const SYSTEM_REVIEWER: &str = "System";
/// Reviewer recorded for automated pre-review entries.
pub const AI_REVIEWER: &str = "AI";

/// How much the engine checks a step against the record's current status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPolicy {
    /// Apply the transition map blindly, whatever the current status.
    #[default]
    Permissive,
    /// Reject reviews and submissions that do not match the current status.
    Strict,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("cannot {action} stage '{stage}' while content is '{status}'")]
    InvalidTransition {
        action: &'static str,
        stage: Stage,
        status: ContentStatus,
    },

    #[error("only approved content can be published; content is '{status}'")]
    NotPublishable { status: ContentStatus },
}

/// A human (or system) approve/reject judgment for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewDecision {
    pub stage: Stage,
    pub approved: bool,
    pub feedback: String,
    pub reviewer: String,
}

/// Fields supplied by the submitter of a new record.
#[derive(Debug, Clone)]
pub struct NewContent {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub title: String,
    pub content_type: ContentType,
    pub content: Option<String>,
    pub metrics: Option<ContentMetrics>,
    pub ad_codes: Vec<AdCode>,
}

/// Status reached after a decision on `stage`.
#[must_use]
pub fn next_status(stage: Stage, approved: bool) -> ContentStatus {
    if !approved {
        return ContentStatus::Rejected;
    }
    match stage {
        Stage::Concept => ContentStatus::ScriptReview,
        Stage::Script => ContentStatus::VideoReview,
        Stage::Video => ContentStatus::Approved,
    }
}

/// Build the initial record for a submission.
///
/// New records start in `draft` with the concept marked as submitted.
#[must_use]
pub fn start(new: NewContent, now: DateTime<Utc>) -> Content {
    Content {
        id: new.id,
        influencer_id: new.influencer_id,
        title: new.title,
        content_type: new.content_type,
        content: new.content,
        status: ContentStatus::Draft,
        timeline: Timeline {
            concept_submitted: Some(now),
            ..Timeline::default()
        },
        reviews: Vec::new(),
        metrics: new.metrics,
        ad_codes: new.ad_codes,
        created_at: now,
        version: 0,
    }
}

/// Append an automated pre-review. Status and timeline are left untouched.
#[must_use]
pub fn attach_ai_review(
    mut content: Content,
    stage: Stage,
    feedback: String,
    analysis: AiAnalysis,
    now: DateTime<Utc>,
) -> Content {
    content.reviews.push(Review {
        stage,
        reviewer: AI_REVIEWER.to_string(),
        feedback,
        ai_analysis: Some(analysis),
        date: now,
    });
    content
}

/// Record a review decision: append it, stamp `{stage}Reviewed`, and move
/// the status through the transition map.
///
/// # Errors
///
/// Under [`TransitionPolicy::Strict`], returns
/// [`WorkflowError::InvalidTransition`] unless the record is awaiting a
/// decision on `decision.stage`. The permissive policy never fails.
pub fn apply_review(
    mut content: Content,
    decision: ReviewDecision,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<Content, WorkflowError> {
    if policy == TransitionPolicy::Strict && content.status != decision.stage.review_status() {
        return Err(WorkflowError::InvalidTransition {
            action: "review",
            stage: decision.stage,
            status: content.status,
        });
    }

    content.reviews.push(Review {
        stage: decision.stage,
        reviewer: decision.reviewer,
        feedback: decision.feedback,
        ai_analysis: None,
        date: now,
    });
    content.timeline.set_reviewed(decision.stage, now);
    content.status = next_status(decision.stage, decision.approved);
    Ok(content)
}

/// Record that material for `stage` was submitted and put the record in
/// that stage's review queue.
///
/// # Errors
///
/// Under [`TransitionPolicy::Strict`], returns
/// [`WorkflowError::InvalidTransition`] unless the record is a draft (concept
/// only), already awaiting this stage, or was rejected.
pub fn apply_submission(
    mut content: Content,
    stage: Stage,
    policy: TransitionPolicy,
    now: DateTime<Utc>,
) -> Result<Content, WorkflowError> {
    if policy == TransitionPolicy::Strict && !accepts_submission(content.status, stage) {
        return Err(WorkflowError::InvalidTransition {
            action: "submit",
            stage,
            status: content.status,
        });
    }

    content.timeline.set_submitted(stage, now);
    content.status = stage.review_status();
    Ok(content)
}

/// Mark approved content as published.
///
/// # Errors
///
/// Returns [`WorkflowError::NotPublishable`] unless the record is `approved`.
pub fn apply_publish(mut content: Content, now: DateTime<Utc>) -> Result<Content, WorkflowError> {
    if content.status != ContentStatus::Approved {
        return Err(WorkflowError::NotPublishable {
            status: content.status,
        });
    }
    content.status = ContentStatus::Published;
    content.timeline.published = Some(now);
    Ok(content)
}

fn accepts_submission(status: ContentStatus, stage: Stage) -> bool {
    status == stage.review_status()
        || status == ContentStatus::Rejected
        || (status == ContentStatus::Draft && stage == Stage::Concept)
}

#[cfg(test)]
#[path = "workflow_test.rs"]
mod tests;
