//! Review judgments derived from model output.
//!
//! The model's answer is treated as opaque text. Two heuristics read it, and
//! they deliberately disagree:
//!
//! - [`AiReviewAdapter::review_submission`] flags content as unsafe when the
//!   answer mentions "unsafe" (any case) and never fails.
//! - [`AiReviewAdapter::quick_review`] approves unless the answer contains the
//!   exact token `REJECTED`, and surfaces model errors to the caller.

use std::sync::Arc;

use creatorflow_core::{AiAnalysis, AppConfig, Stage};
use serde::Serialize;

use crate::client::{CompletionModel, OpenAiClient, UnconfiguredModel};
use crate::error::ReviewError;

/// Score attached to every successful submission review. The model's answer
/// is not parsed for a score.
pub const PLACEHOLDER_SCORE: f64 = 0.8;

const FAILED_FEEDBACK: &str = "AI review failed";

const QUICK_REVIEW_PROMPT: &str = "You are a content reviewer for influencer marketing campaigns. \
     Review the content for brand safety, quality, and alignment with guidelines.";

/// Result of a submission pre-review.
#[derive(Debug, Clone, PartialEq)]
pub struct AiReview {
    pub score: f64,
    pub feedback: String,
    pub detailed_feedback: String,
    pub is_safe: bool,
}

impl AiReview {
    fn failed(error: &ReviewError) -> Self {
        Self {
            score: 0.0,
            feedback: FAILED_FEEDBACK.to_owned(),
            detailed_feedback: error.to_string(),
            is_safe: false,
        }
    }

    /// The analysis block stored on the review entry.
    #[must_use]
    pub fn analysis(&self) -> AiAnalysis {
        AiAnalysis {
            score: self.score,
            feedback: self.detailed_feedback.clone(),
            brand_safety_check: self.is_safe,
        }
    }
}

/// Result of the standalone quick review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuickReview {
    pub review: String,
    pub approved: bool,
}

#[derive(Clone)]
pub struct AiReviewAdapter {
    model: Arc<dyn CompletionModel>,
}

impl std::fmt::Debug for AiReviewAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiReviewAdapter").finish_non_exhaustive()
    }
}

impl AiReviewAdapter {
    #[must_use]
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Build the adapter from application config. Without an API key every
    /// review degrades to the failed result.
    ///
    /// # Errors
    ///
    /// Returns [`ReviewError`] if the HTTP client cannot be built or the
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, ReviewError> {
        let model: Arc<dyn CompletionModel> = match config.openai_api_key.as_deref() {
            Some(key) => Arc::new(OpenAiClient::with_base_url(
                key,
                &config.ai_model,
                config.ai_timeout_secs,
                &config.ai_base_url,
            )?),
            None => {
                tracing::warn!("OPENAI_API_KEY not set; AI reviews will be recorded as failed");
                Arc::new(UnconfiguredModel)
            }
        };
        Ok(Self::new(model))
    }

    /// Pre-review submitted concept or script text.
    ///
    /// Model failures are folded into a result with score 0, feedback
    /// `"AI review failed"`, the error message as detail, and the safety
    /// check failed.
    pub async fn review_submission(&self, text: &str, stage: Stage) -> AiReview {
        let system = format!(
            "You are a content reviewer for {stage}s. \
             Review for brand safety, quality, and guidelines alignment."
        );

        match self.model.complete(&system, text).await {
            Ok(answer) => AiReview {
                score: PLACEHOLDER_SCORE,
                is_safe: !answer.to_lowercase().contains("unsafe"),
                feedback: answer.clone(),
                detailed_feedback: answer,
            },
            Err(error) => {
                tracing::warn!(stage = %stage, error = %error, "AI review failed");
                AiReview::failed(&error)
            }
        }
    }

    /// Free-standing review of arbitrary content.
    ///
    /// # Errors
    ///
    /// Returns the model's [`ReviewError`] unchanged.
    pub async fn quick_review(&self, text: &str) -> Result<QuickReview, ReviewError> {
        let review = self.model.complete(QUICK_REVIEW_PROMPT, text).await?;
        let approved = !review.contains("REJECTED");
        Ok(QuickReview { review, approved })
    }
}
