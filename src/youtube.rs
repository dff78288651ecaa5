use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use crate::error::{AppError, Result};
use crate::loader::{Document, DocumentMetadata, DEFAULT_USER_AGENT};

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(Client::new);

// Create static regexes to avoid recompiling them each time
static PLAYER_RESPONSE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)ytInitialPlayerResponse\s*=\s*(\{.*?\});")
        .expect("Failed to parse player response regex")
});

static CAPTION_CUE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<text[^>]*>([^<]*)</text>").expect("Failed to parse caption cue regex")
});

const VIDEOS_ENDPOINT: &str = "https://www.googleapis.com/youtube/v3/videos";

/// The substring after the last `v=` marker. When the marker is absent the
/// whole input is returned unchanged; callers treat that as an id that will
/// simply not resolve.
pub fn extract_video_id(url: &str) -> &str {
    url.rsplit("v=").next().unwrap_or(url)
}

/// Resolve a video's display title through the Data API v3 `videos.list`
/// endpoint.
pub async fn fetch_video_title(video_id: &str, api_key: &str) -> Result<String> {
    let response = CLIENT
        .get(VIDEOS_ENDPOINT)
        .query(&[("part", "snippet"), ("id", video_id), ("key", api_key)])
        .send()
        .await
        .map_err(|e| AppError::MetadataLookup(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(AppError::MetadataLookup(format!(
            "YouTube Data API returned {}: {}",
            status, body
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| AppError::MetadataLookup(e.to_string()))?;

    parse_video_title(&body)
}

#[derive(Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Deserialize)]
struct VideoItem {
    snippet: VideoSnippet,
}

#[derive(Deserialize)]
struct VideoSnippet {
    title: String,
}

pub(crate) fn parse_video_title(body: &str) -> Result<String> {
    let parsed: VideoListResponse = serde_json::from_str(body)
        .map_err(|e| AppError::MetadataLookup(format!("Invalid metadata response: {}", e)))?;

    parsed
        .items
        .into_iter()
        .next()
        .map(|item| item.snippet.title)
        .ok_or_else(|| AppError::MetadataLookup("No video found for the given id".to_string()))
}

/// Loader for YouTube watch pages. Reads the embedded player data, follows
/// the first caption track, and returns the transcript as a single document.
pub struct YoutubeLoader {
    url: String,
}

impl YoutubeLoader {
    pub fn from_url(url: &str) -> Self {
        YoutubeLoader {
            url: url.to_string(),
        }
    }

    pub async fn load(&self) -> Result<Vec<Document>> {
        tracing::info!("Fetching transcript for {}", self.url);
        let page = CLIENT
            .get(&self.url)
            .header("User-Agent", DEFAULT_USER_AGENT)
            .send()
            .await?
            .text()
            .await?;

        let player_response = extract_player_response(&page)?;
        let title = player_response
            .pointer("/videoDetails/title")
            .and_then(Value::as_str)
            .map(str::to_string);

        let track_url = first_caption_track(&player_response)?;
        let cues = CLIENT.get(&track_url).send().await?.text().await?;

        let transcript = caption_text(&cues);
        if transcript.is_empty() {
            return Err(AppError::ContentLoad(format!(
                "Caption track for {} contained no text",
                self.url
            )));
        }

        Ok(vec![Document {
            page_content: transcript,
            metadata: DocumentMetadata {
                source: self.url.clone(),
                title,
            },
        }])
    }
}

fn extract_player_response(page: &str) -> Result<Value> {
    let captured = PLAYER_RESPONSE_RE
        .captures(page)
        .ok_or_else(|| AppError::ContentLoad("No player data found in the watch page".to_string()))?;

    serde_json::from_str(&captured[1])
        .map_err(|e| AppError::ContentLoad(format!("Failed to parse player data: {}", e)))
}

fn first_caption_track(player_response: &Value) -> Result<String> {
    player_response
        .pointer("/captions/playerCaptionsTracklistRenderer/captionTracks/0/baseUrl")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| AppError::ContentLoad("No captions found for this video".to_string()))
}

/// Flatten timed-text XML cues into one plain-text transcript.
pub(crate) fn caption_text(xml: &str) -> String {
    let mut transcript = String::new();

    for cue in CAPTION_CUE_RE.captures_iter(xml) {
        let text = decode_entities(&cue[1]);
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if !transcript.is_empty() {
            transcript.push(' ');
        }
        transcript.push_str(text);
    }

    transcript
}

fn decode_entities(text: &str) -> String {
    text.replace("&#39;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_follows_the_last_marker() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123"),
            "abc123"
        );
    }

    #[test]
    fn id_keeps_trailing_query_parameters() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=abc123&t=42"),
            "abc123&t=42"
        );
    }

    #[test]
    fn missing_marker_degenerates_to_whole_input() {
        let url = "https://www.youtube.com/shorts/abc123";
        assert_eq!(extract_video_id(url), url);
    }

    #[test]
    fn parses_title_from_metadata_response() {
        let body = r#"{"items":[{"snippet":{"title":"A Video"}}]}"#;
        assert_eq!(parse_video_title(body).unwrap(), "A Video");
    }

    #[test]
    fn empty_items_is_a_lookup_error() {
        let body = r#"{"items":[]}"#;
        assert!(matches!(
            parse_video_title(body),
            Err(AppError::MetadataLookup(_))
        ));
    }

    #[test]
    fn malformed_metadata_is_a_lookup_error() {
        assert!(matches!(
            parse_video_title("not json"),
            Err(AppError::MetadataLookup(_))
        ));
    }

    #[test]
    fn caption_cues_become_plain_text() {
        let xml = r#"<?xml version="1.0"?><transcript>
            <text start="0" dur="1.5">Hello &amp; welcome</text>
            <text start="1.5" dur="2">to the show</text>
            <text start="3.5" dur="1"></text>
        </transcript>"#;
        assert_eq!(caption_text(xml), "Hello & welcome to the show");
    }

    #[test]
    fn player_response_is_extracted_from_page() {
        let page = r#"<script>var ytInitialPlayerResponse = {"videoDetails":{"title":"T"}};</script>"#;
        let value = extract_player_response(page).unwrap();
        assert_eq!(value.pointer("/videoDetails/title").unwrap(), "T");
    }

    #[test]
    fn first_caption_track_url_is_selected() {
        let value: Value = serde_json::from_str(
            r#"{"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[
                {"baseUrl":"https://example.com/first"},
                {"baseUrl":"https://example.com/second"}
            ]}}}"#,
        )
        .unwrap();
        assert_eq!(
            first_caption_track(&value).unwrap(),
            "https://example.com/first"
        );
    }

    #[test]
    fn page_without_captions_is_a_load_error() {
        let value: Value = serde_json::from_str(r#"{"videoDetails":{"title":"T"}}"#).unwrap();
        assert!(matches!(
            first_caption_track(&value),
            Err(AppError::ContentLoad(_))
        ));
    }
}
