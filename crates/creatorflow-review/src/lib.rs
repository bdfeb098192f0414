//! AI-assisted content review.
//!
//! [`OpenAiClient`] talks to an OpenAI-compatible chat-completions endpoint
//! behind the [`CompletionModel`] trait. [`AiReviewAdapter`] turns model
//! output into the two review judgments the platform uses: the submission
//! pre-review attached to new concepts and scripts, and the standalone quick
//! review.

pub mod adapter;
pub mod client;
pub mod error;

pub use adapter::{AiReview, AiReviewAdapter, QuickReview, PLACEHOLDER_SCORE};
pub use client::{CompletionModel, OpenAiClient, UnconfiguredModel};
pub use error::ReviewError;
