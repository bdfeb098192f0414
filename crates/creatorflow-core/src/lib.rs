//! Domain model and review workflow for the creatorflow platform.
//!
//! Holds the content and influencer record types, the review workflow
//! engine that drives content status, and application configuration.

pub mod app_config;
pub mod config;
pub mod content;
pub mod influencers;
pub mod workflow;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use content::{
    AdCode, AiAnalysis, Content, ContentMetrics, ContentStatus, ContentType, ParseEnumError,
    Review, Stage, Timeline,
};
pub use influencers::{
    content_stats, ContentStats, ContractDetails, ContractStatus, Influencer, InfluencerMetrics,
    InfluencerStatus, Payment, PaymentStatus,
};
pub use workflow::{
    NewContent, ReviewDecision, TransitionPolicy, WorkflowError, AI_REVIEWER, SYSTEM_REVIEWER,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
