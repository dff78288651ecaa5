use url::Url;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm;
use crate::loader::{Document, UnstructuredUrlLoader};
use crate::youtube::{self, YoutubeLoader};

pub const UNKNOWN_TITLE: &str = "Unknown Title";

const VIDEO_PLATFORM_MARKER: &str = "youtube.com";

/// Outcome of one summarize request.
#[derive(Debug, Clone)]
pub struct Summarized {
    /// The model's output text, untouched.
    pub summary: String,
    /// Display title resolved through the Data API; only set on the video
    /// path, and `"Unknown Title"` when the lookup failed.
    pub video_title: Option<String>,
    /// Message of an absorbed title-lookup failure.
    pub warning: Option<String>,
    /// Word count of the loaded content that was summarized.
    pub word_count: usize,
}

/// Raw substring test on the URL. Deliberately case-sensitive and without
/// domain normalization, so `youtu.be` short links and differently-cased
/// hosts take the generic path.
pub fn is_video_url(url: &str) -> bool {
    url.contains(VIDEO_PLATFORM_MARKER)
}

/// Syntactic validity only: parseable, http(s) scheme, non-empty host.
pub fn is_valid_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https")
                && parsed.host_str().is_some_and(|host| !host.is_empty())
        }
        Err(_) => false,
    }
}

fn validate(url: &str, config: &Config) -> Result<()> {
    if config.groq_api_key.trim().is_empty() || url.trim().is_empty() {
        return Err(AppError::Validation(
            "Please provide the required information.".to_string(),
        ));
    }
    if !is_valid_url(url) {
        return Err(AppError::Validation("Please enter a valid URL.".to_string()));
    }
    Ok(())
}

/// Run the whole workflow for one URL: validate, pick a content loader by URL
/// shape, load, and summarize in a single inference call. Validation failures
/// return before anything leaves the process.
pub async fn summarize_url(url: &str, config: &Config) -> Result<Summarized> {
    validate(url, config)?;

    let mut video_title = None;
    let mut warning = None;

    let documents: Vec<Document> = if is_video_url(url) {
        let video_id = youtube::extract_video_id(url);

        // Title lookup failures are absorbed; the content is still loaded
        // and summarized.
        let title = match youtube::fetch_video_title(video_id, &config.youtube_api_key).await {
            Ok(title) => title,
            Err(err) => {
                tracing::warn!("{}", err);
                warning = Some(err.to_string());
                UNKNOWN_TITLE.to_string()
            }
        };

        let documents = YoutubeLoader::from_url(url).load().await?;
        video_title = Some(title);
        documents
    } else {
        UnstructuredUrlLoader::new(vec![url.to_string()]).load().await?
    };

    let word_count = llm::stuff_documents(&documents).split_whitespace().count();
    let summary = llm::summarize_documents(&config.groq_api_key, &documents).await?;

    Ok(Summarized {
        summary,
        video_title,
        warning,
        word_count,
    })
}
