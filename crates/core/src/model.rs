//! Wire types for the NeuroVisa interview API.
//!
//! Field names follow the server's JSON exactly. Everything the server may
//! omit is `Option` or defaulted so a partial payload decodes into safe
//! values instead of failing the whole session.

use chrono::{DateTime, Utc};

/// Lifecycle status of an interview session, owned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Completed,
    EndedByUser,
    /// Written server-side when a new session preempts an active one.
    Interrupted,
}

/// One complete mock-interview attempt.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    pub id: i64,
    pub status: SessionStatus,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Total duration in seconds, set on completion.
    #[serde(default)]
    pub total_duration: Option<i64>,
    /// Overall score (average of per-answer scores), set on completion.
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub questions: Vec<Question>,
    /// Free-form plan generated for completed sessions; shape is owned by
    /// the server and rendered verbatim.
    #[serde(default)]
    pub improvement_plan: Option<serde_json::Value>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Question {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub order: u32,
    /// Present only after submission in some server responses.
    #[serde(default)]
    pub answer: Option<Answer>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Answer {
    pub user_audio_text: String,
    #[serde(default)]
    pub response_time_ms: Option<u64>,
    #[serde(default)]
    pub edit_count: u32,
    #[serde(default)]
    pub feedback: Option<Feedback>,
}

/// Server evaluation of one answer.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub score: u32,
    #[serde(default = "Feedback::default_text")]
    pub feedback: String,
    /// Supplementary question injected when the answer was ambiguous.
    #[serde(default)]
    pub follow_up: Option<String>,
    #[serde(default)]
    pub metrics: Option<FeedbackMetrics>,
}

impl Feedback {
    fn default_text() -> String {
        "No response recorded.".to_string()
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            score: 0,
            feedback: Self::default_text(),
            follow_up: None,
            metrics: None,
        }
    }
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct FeedbackMetrics {
    #[serde(default)]
    pub clarity: QualLevel,
    #[serde(default)]
    pub confidence: QualLevel,
    #[serde(default)]
    pub risk_level: QualLevel,
    #[serde(default)]
    pub word_count: u32,
    #[serde(default)]
    pub red_flags: Vec<String>,
    #[serde(default)]
    pub risky_sentences: Vec<String>,
}

/// Qualitative level used for clarity, confidence and risk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum QualLevel {
    High,
    #[default]
    Medium,
    Low,
}

/// Score tier shared by the interview feedback panel and the report view so
/// the two screens never disagree on the classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn classify(score: u32) -> Self {
        if score > 70 {
            ScoreTier::High
        } else if score < 60 {
            ScoreTier::Low
        } else {
            ScoreTier::Medium
        }
    }
}
