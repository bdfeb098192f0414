//! Content records: the unit moving through the review pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Returned when a wire string does not name a variant of one of the
/// closed vocabularies below.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind} '{value}'; expected one of: {expected}")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
    pub expected: String,
}

/// Implements `as_str`, `ALL`, `Display` and `FromStr` for a fieldless enum
/// whose serde names are given explicitly.
macro_rules! wire_enum {
    ($ty:ident, $kind:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = $crate::content::ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err($crate::content::ParseEnumError {
                        kind: $kind,
                        value: other.to_string(),
                        expected: [$($name),+].join(", "),
                    }),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

/// A phase of the content review pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Concept,
    Script,
    Video,
}

wire_enum!(Stage, "stage", {
    Concept => "concept",
    Script => "script",
    Video => "video",
});

impl Stage {
    /// The status a record sits in while this stage awaits a decision.
    #[must_use]
    pub fn review_status(self) -> ContentStatus {
        match self {
            Stage::Concept => ContentStatus::ConceptReview,
            Stage::Script => ContentStatus::ScriptReview,
            Stage::Video => ContentStatus::VideoReview,
        }
    }

    /// Stages the AI adapter pre-reviews. Video review is always human.
    #[must_use]
    pub fn is_ai_reviewed(self) -> bool {
        matches!(self, Stage::Concept | Stage::Script)
    }
}

/// Publication format of a piece of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Video,
    Post,
    Story,
}

wire_enum!(ContentType, "content type", {
    Video => "video",
    Post => "post",
    Story => "story",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    ConceptReview,
    ScriptReview,
    VideoReview,
    Approved,
    Rejected,
    Published,
}

wire_enum!(ContentStatus, "content status", {
    Draft => "draft",
    ConceptReview => "concept_review",
    ScriptReview => "script_review",
    VideoReview => "video_review",
    Approved => "approved",
    Rejected => "rejected",
    Published => "published",
});

/// Milestone timestamps. A `*_reviewed` slot is only ever filled once the
/// matching `*_submitted` slot is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_submitted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_submitted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_submitted: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_reviewed: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<DateTime<Utc>>,
}

impl Timeline {
    #[must_use]
    pub fn submitted(&self, stage: Stage) -> Option<DateTime<Utc>> {
        match stage {
            Stage::Concept => self.concept_submitted,
            Stage::Script => self.script_submitted,
            Stage::Video => self.video_submitted,
        }
    }

    #[must_use]
    pub fn reviewed(&self, stage: Stage) -> Option<DateTime<Utc>> {
        match stage {
            Stage::Concept => self.concept_reviewed,
            Stage::Script => self.script_reviewed,
            Stage::Video => self.video_reviewed,
        }
    }

    pub(crate) fn set_submitted(&mut self, stage: Stage, at: DateTime<Utc>) {
        let slot = match stage {
            Stage::Concept => &mut self.concept_submitted,
            Stage::Script => &mut self.script_submitted,
            Stage::Video => &mut self.video_submitted,
        };
        *slot = Some(at);
    }

    pub(crate) fn set_reviewed(&mut self, stage: Stage, at: DateTime<Utc>) {
        if self.submitted(stage).is_none() {
            self.set_submitted(stage, at);
        }
        let slot = match stage {
            Stage::Concept => &mut self.concept_reviewed,
            Stage::Script => &mut self.script_reviewed,
            Stage::Video => &mut self.video_reviewed,
        };
        *slot = Some(at);
    }

    /// Most recent review timestamp across all stages.
    #[must_use]
    pub fn last_reviewed(&self) -> Option<DateTime<Utc>> {
        Stage::ALL.iter().filter_map(|s| self.reviewed(*s)).max()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysis {
    pub score: f64,
    pub feedback: String,
    pub brand_safety_check: bool,
}

/// One entry of a record's append-only review history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub stage: Stage,
    pub reviewer: String,
    pub feedback: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetrics {
    #[serde(default)]
    pub views: Option<i64>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub comments: Option<i64>,
    #[serde(default)]
    pub engagement: Option<f64>,
    #[serde(default)]
    pub update_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdCode {
    pub code: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub clicks: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: Uuid,
    pub influencer_id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub content: Option<String>,
    pub status: ContentStatus,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub metrics: Option<ContentMetrics>,
    #[serde(default)]
    pub ad_codes: Vec<AdCode>,
    pub created_at: DateTime<Utc>,
    /// Optimistic-concurrency counter, bumped by every stored update.
    #[serde(default)]
    pub version: i64,
}
