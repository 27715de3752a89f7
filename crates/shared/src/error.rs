use serde::{Deserialize, Serialize};

/// `status` as sent by the store server: a numeric code on success,
/// the literal `"error"` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseStatus {
    Code(u16),
    Label(String),
}

impl ResponseStatus {
    pub fn is_error(&self) -> bool {
        match self {
            ResponseStatus::Code(code) => *code >= 400,
            ResponseStatus::Label(label) => label.eq_ignore_ascii_case("error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    InvalidRequest,
    Unknown,
}

impl ErrorCode {
    pub fn from_http_status(status: u16) -> Self {
        match status {
            400 => ErrorCode::InvalidRequest,
            404 => ErrorCode::NotFound,
            _ => ErrorCode::Unknown,
        }
    }
}

/// Error envelope returned by the cart endpoint, e.g.
/// `{"status": "error", "message": "Product not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub status: ResponseStatus,
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Label("error".to_string()),
            message: message.into(),
        }
    }

    /// Best-effort read of an error envelope from a raw response body.
    pub fn from_body(body: &str) -> Option<Self> {
        let parsed: Self = serde_json::from_str(body).ok()?;
        parsed.status.is_error().then_some(parsed)
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
