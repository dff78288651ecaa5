use axum::http::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Rejected before any external call; the message is shown verbatim.
    #[error("{0}")]
    Validation(String),

    #[error("Error fetching video title: {0}")]
    MetadataLookup(String),

    #[error("Failed to load content: {0}")]
    ContentLoad(String),

    #[error("Summarization error: {0}")]
    Summarization(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// HTTP status the API layer renders this error with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::MetadataLookup(_) => StatusCode::BAD_GATEWAY,
            AppError::ContentLoad(_) => StatusCode::BAD_GATEWAY,
            AppError::Summarization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Loader fetches use `?` on reqwest calls; the LLM and metadata clients map
// their transport errors explicitly.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ContentLoad(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_is_shown_verbatim() {
        let err = AppError::Validation("Please enter a valid URL.".to_string());
        assert_eq!(err.to_string(), "Please enter a valid URL.");
    }

    #[test]
    fn status_codes_per_variant() {
        assert_eq!(
            AppError::Validation(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ContentLoad(String::new()).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Summarization(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
