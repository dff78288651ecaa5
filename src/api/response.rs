use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;
use crate::error::AppError;

/// Envelope shared by every endpoint: a payload on success, a message on
/// error, and meta either way.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(status: &str, code: StatusCode, message: Option<String>) -> Self {
        ResponseMeta {
            status: status.to_string(),
            status_code: code.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta::new("success", StatusCode::OK, None),
        }),
    )
}

/// Render any escaped orchestrator error; the message is the error's display
/// text, untouched.
pub fn error<T>(err: &AppError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = err.status_code();
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: ResponseMeta::new("error", status, Some(err.to_string())),
        }),
    )
}
