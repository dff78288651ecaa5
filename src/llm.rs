use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use crate::error::{AppError, Result};
use crate::loader::Document;

const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const MODEL: &str = "gemma2-9b-it";

/// Fixed summarization prompt; `{text}` is the only placeholder. The word
/// target is an instruction to the model, nothing enforces it.
pub const SUMMARY_PROMPT_TEMPLATE: &str =
    "Provide a summary of the following content in 300 words:\nContent: {text}";

// Create a static client to reuse connections
static CLIENT: Lazy<Client> = Lazy::new(Client::new);

#[derive(Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<Message>,
}

/// Concatenate every document into one context window ("stuff" mode); the
/// whole input goes out in a single inference call.
pub fn stuff_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(text: &str) -> String {
    SUMMARY_PROMPT_TEMPLATE.replace("{text}", text)
}

/// Summarize all loaded documents with one chat-completions call and return
/// the model's output text verbatim.
pub async fn summarize_documents(api_key: &str, documents: &[Document]) -> Result<String> {
    let prompt = build_prompt(&stuff_documents(documents));
    tracing::info!("Calling model {} with a {} char prompt", MODEL, prompt.len());

    let body = ChatRequest {
        model: MODEL.into(),
        messages: vec![Message {
            role: "user".into(),
            content: prompt,
        }],
    };

    let response = CLIENT
        .post(GROQ_ENDPOINT)
        .bearer_auth(api_key)
        .json(&body)
        .send()
        .await
        .map_err(|e| AppError::Summarization(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::Summarization(format!(
            "Groq API returned {}: {}",
            status, text
        )));
    }

    let json: Value = response
        .json()
        .await
        .map_err(|e| AppError::Summarization(e.to_string()))?;

    parse_output_text(&json)
}

pub(crate) fn parse_output_text(json: &Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Summarization("Invalid response format from model".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DocumentMetadata;

    fn doc(content: &str) -> Document {
        Document {
            page_content: content.to_string(),
            metadata: DocumentMetadata::default(),
        }
    }

    #[test]
    fn prompt_keeps_the_fixed_template_around_the_text() {
        let prompt = build_prompt("the page body");
        assert_eq!(
            prompt,
            "Provide a summary of the following content in 300 words:\nContent: the page body"
        );
    }

    #[test]
    fn template_has_exactly_one_placeholder() {
        assert_eq!(SUMMARY_PROMPT_TEMPLATE.matches("{text}").count(), 1);
    }

    #[test]
    fn stuffing_joins_documents_in_order() {
        let docs = vec![doc("first"), doc("second"), doc("third")];
        assert_eq!(stuff_documents(&docs), "first\n\nsecond\n\nthird");
    }

    #[test]
    fn stuffing_a_single_document_is_identity() {
        let docs = vec![doc("only")];
        assert_eq!(stuff_documents(&docs), "only");
    }

    #[test]
    fn output_text_is_extracted_verbatim() {
        let json: Value = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"A summary."}}]}"#,
        )
        .unwrap();
        assert_eq!(parse_output_text(&json).unwrap(), "A summary.");
    }

    #[test]
    fn unexpected_response_shape_is_a_summarization_error() {
        let json: Value = serde_json::from_str(r#"{"error":{"message":"bad key"}}"#).unwrap();
        assert!(matches!(
            parse_output_text(&json),
            Err(AppError::Summarization(_))
        ));
    }
}
