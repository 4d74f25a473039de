use thiserror::Error;

/// Errors raised while talking to the REANA server
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(
        "'{server_url}' not found, please verify the provided server URL or check your internet connection"
    )]
    Unreachable {
        server_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode server response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid REANA server URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
