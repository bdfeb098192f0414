//! Influencer records and per-influencer content analytics.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{wire_enum, Content, ContentStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfluencerStatus {
    #[default]
    Pending,
    Active,
    Paused,
    Terminated,
}

wire_enum!(InfluencerStatus, "influencer status", {
    Pending => "pending",
    Active => "active",
    Paused => "paused",
    Terminated => "terminated",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    #[default]
    Pending,
    Sent,
    Signed,
    Expired,
}

wire_enum!(ContractStatus, "contract status", {
    Pending => "pending",
    Sent => "sent",
    Signed => "signed",
    Expired => "expired",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Failed,
}

wire_enum!(PaymentStatus, "payment status", {
    Pending => "pending",
    Paid => "paid",
    Failed => "failed",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfluencerMetrics {
    #[serde(default)]
    pub subscribers: Option<i64>,
    #[serde(default)]
    pub average_views: Option<i64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetails {
    #[serde(default)]
    pub status: ContractStatus,
    #[serde(default)]
    pub signed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub expiry_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: Decimal,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Influencer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub channel_name: String,
    #[serde(default)]
    pub youtube_link: Option<String>,
    #[serde(default)]
    pub status: InfluencerStatus,
    #[serde(default)]
    pub metrics: InfluencerMetrics,
    #[serde(default)]
    pub contract: ContractDetails,
    #[serde(default)]
    pub payments: Vec<Payment>,
    pub created_at: DateTime<Utc>,
}

/// Review throughput for one influencer's content.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentStats {
    pub total: u64,
    pub approved: u64,
    /// Mean time from concept submission to the latest review, in milliseconds.
    pub average_review_time_ms: f64,
}

/// Summarise review progress across `content`.
///
/// Records lacking either a concept submission or any review decision do not
/// contribute to the average; with no such records the average is `0`.
#[must_use]
pub fn content_stats(content: &[Content]) -> ContentStats {
    let approved = content
        .iter()
        .filter(|c| c.status == ContentStatus::Approved)
        .count();

    let review_times: Vec<i64> = content
        .iter()
        .filter_map(|c| {
            let submitted = c.timeline.concept_submitted?;
            let reviewed = c.timeline.last_reviewed()?;
            Some((reviewed - submitted).num_milliseconds())
        })
        .collect();

    #[allow(clippy::cast_precision_loss)]
    let average_review_time_ms = if review_times.is_empty() {
        0.0
    } else {
        review_times.iter().sum::<i64>() as f64 / review_times.len() as f64
    };

    ContentStats {
        total: content.len() as u64,
        approved: approved as u64,
        average_review_time_ms,
    }
}
