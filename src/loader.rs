use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use scraper::{Html, Selector};
use std::collections::HashMap;
use once_cell::sync::Lazy;
use crate::error::{AppError, Result};

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("title").expect("Failed to parse title selector")
});

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";

/// One unit of loaded content plus where it came from.
#[derive(Debug, Clone)]
pub struct Document {
    pub page_content: String,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentMetadata {
    pub source: String,
    pub title: Option<String>,
}

/// Loader for arbitrary web pages. Certificate verification is off and the
/// browser-style user agent is fixed; both are held as data so callers and
/// tests can observe what the loader will do.
pub struct UnstructuredUrlLoader {
    urls: Vec<String>,
    verify_tls: bool,
    headers: HashMap<String, String>,
}

impl UnstructuredUrlLoader {
    pub fn new(urls: Vec<String>) -> Self {
        let mut headers = HashMap::new();
        headers.insert("User-Agent".to_string(), DEFAULT_USER_AGENT.to_string());

        UnstructuredUrlLoader {
            urls,
            verify_tls: false,
            headers,
        }
    }

    pub fn verify_tls(&self) -> bool {
        self.verify_tls
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    fn build_client(&self) -> Result<Client> {
        let mut header_map = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| AppError::ContentLoad(format!("Invalid header name: {}", e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| AppError::ContentLoad(format!("Invalid header value: {}", e)))?;
            header_map.insert(name, value);
        }

        Client::builder()
            .danger_accept_invalid_certs(!self.verify_tls)
            .default_headers(header_map)
            .build()
            .map_err(|e| AppError::ContentLoad(format!("Failed to build HTTP client: {}", e)))
    }

    /// Fetch every URL and extract its body text. One document per URL; the
    /// first failure aborts the load.
    pub async fn load(&self) -> Result<Vec<Document>> {
        let client = self.build_client()?;
        let mut documents = Vec::with_capacity(self.urls.len());

        for url in &self.urls {
            tracing::info!("Fetching page content from {}", url);
            let response = client.get(url).send().await?;
            let html = response.text().await?;

            let page_content = extract_page_text(&html).ok_or_else(|| {
                AppError::ContentLoad(format!("No <body> tag found in the HTML from {}", url))
            })?;

            documents.push(Document {
                page_content,
                metadata: DocumentMetadata {
                    source: url.clone(),
                    title: extract_title(&html),
                },
            });
        }

        Ok(documents)
    }
}

pub fn extract_page_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document.select(&BODY_SELECTOR)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<Vec<_>>().join("\n")))
}

pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    document.select(&TITLE_SELECTOR)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Collapse runs of blank lines and strip per-line indentation.
pub fn collapse_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for line in text.lines() {
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            if !result.is_empty() {
                result.push('\n');
            }
            result.push_str(trimmed);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_disables_tls_verification() {
        let loader = UnstructuredUrlLoader::new(vec!["https://example.com".to_string()]);
        assert!(!loader.verify_tls());
    }

    #[test]
    fn loader_carries_browser_user_agent() {
        let loader = UnstructuredUrlLoader::new(vec!["https://example.com".to_string()]);
        assert_eq!(
            loader.headers().get("User-Agent").map(String::as_str),
            Some("Mozilla/5.0")
        );
    }

    #[test]
    fn extracts_body_text_without_markup() {
        let html = "<html><head><title>T</title></head>\
                    <body><div><p>Hello <b>World</b></p></div></body></html>";
        let text = extract_page_text(html).unwrap();
        assert!(text.contains("Hello"));
        assert!(text.contains("World"));
        assert!(!text.contains("<p>"));
    }

    #[test]
    fn extracts_page_title() {
        let html = "<html><head><title> An Article </title></head><body>x</body></html>";
        assert_eq!(extract_title(html), Some("An Article".to_string()));
    }

    #[test]
    fn empty_title_is_none() {
        let html = "<html><head><title></title></head><body>x</body></html>";
        assert_eq!(extract_title(html), None);
    }

    #[test]
    fn collapses_blank_lines_and_indentation() {
        let text = "  first line  \n\n\n   second line\n";
        assert_eq!(collapse_whitespace(text), "first line\nsecond line");
    }
}
