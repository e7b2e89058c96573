#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API key is not configured (set GOOGLE_API_KEY)")]
    MissingApiKey,

    #[error("rate limited")]
    RateLimited,

    #[error("{provider} API request failed (status {status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("empty response from {provider}")]
    EmptyResponse { provider: &'static str },

    #[error("response blocked by provider: {0}")]
    Blocked(String),

    #[error("file {name} failed processing")]
    FileProcessing { name: String },

    #[error("file {name} still processing after {waited_secs}s")]
    ProcessingTimeout { name: String, waited_secs: u64 },

    #[error("operation cancelled")]
    Cancelled,

    #[error("speech synthesis failed: {0}")]
    Speech(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, LlmError>;

/// Truncate an error body so logs and user messages stay bounded.
pub(crate) fn truncate_body(mut body: String, max: usize) -> String {
    if body.len() > max {
        let mut cut = max;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
    }
    body
}
