use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Deserialize)]
pub struct SummarizeRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct SummarizeResponse {
    pub url: String,
    pub summary: String,
    /// Resolved video title; only present for the video path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
    /// Non-fatal title-lookup failure, passed through as a warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub summarized_at: DateTime<Utc>,
    pub word_count: usize,
    pub status: String,
}
