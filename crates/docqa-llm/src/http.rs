//! Shared HTTP client construction for consistent timeout and TLS configuration.

use std::time::Duration;

use crate::error::LlmError;

/// Build the HTTP client shared by the model, file, and speech backends.
///
/// Config: `connect` timeout, `request` timeout, rustls TLS,
/// `docqa/{version}` user-agent, redirect limit 10.
///
/// # Errors
///
/// Returns `LlmError::Http` if the TLS backend cannot be initialised.
pub fn build_client(connect: Duration, request: Duration) -> Result<reqwest::Client, LlmError> {
    Ok(reqwest::Client::builder()
        .connect_timeout(connect)
        .timeout(request)
        .user_agent(concat!("docqa/", env!("CARGO_PKG_VERSION")))
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_client_accepts_short_timeouts() {
        assert!(build_client(Duration::from_millis(100), Duration::from_secs(1)).is_ok());
    }
}
