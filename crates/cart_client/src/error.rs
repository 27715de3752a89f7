use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid cart endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("cart request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("cart response (HTTP {status}) is not a cart update: {source}")]
    Decode {
        status: u16,
        api_error: Option<ApiError>,
        #[source]
        source: serde_json::Error,
    },
}

impl TransportError {
    /// Server-provided error message, when the body carried one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TransportError::Decode {
                api_error: Some(api_error),
                ..
            } => Some(api_error.message.as_str()),
            _ => None,
        }
    }
}
