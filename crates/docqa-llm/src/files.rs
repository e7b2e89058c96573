//! Provider-side media files and the bounded wait for their processing.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use crate::error::LlmError;
use crate::provider::MediaRef;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileState {
    #[default]
    StateUnspecified,
    Processing,
    Active,
    Failed,
    #[serde(other)]
    Unknown,
}

/// File metadata as reported by the provider.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFile {
    pub name: String,
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub state: FileState,
}

impl RemoteFile {
    #[must_use]
    pub fn media_ref(&self) -> MediaRef {
        MediaRef {
            uri: self.uri.clone(),
            mime_type: self.mime_type.clone(),
        }
    }
}

/// Upload and inspect media files stored by the provider.
pub trait MediaStore: Send + Sync {
    /// Upload a local file and return its initial metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload is rejected.
    fn upload<'a>(
        &'a self,
        path: &'a Path,
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, LlmError>> + Send + 'a>>;

    /// Fetch the current metadata of a previously uploaded file.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider request fails.
    fn get_file<'a>(
        &'a self,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, LlmError>> + Send + 'a>>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Poll `file` until it leaves the `PROCESSING` state.
///
/// Any state other than `PROCESSING` or `FAILED` is treated as ready.
///
/// # Errors
///
/// Returns `LlmError::FileProcessing` if the provider marks the file as failed,
/// `LlmError::ProcessingTimeout` once `poll.timeout` has elapsed, and
/// `LlmError::Cancelled` as soon as `cancel` fires.
pub async fn wait_until_active(
    store: &dyn MediaStore,
    mut file: RemoteFile,
    poll: &PollConfig,
    cancel: &CancellationToken,
) -> Result<RemoteFile, LlmError> {
    let started = tokio::time::Instant::now();

    loop {
        match file.state {
            FileState::Processing => {}
            FileState::Failed => return Err(LlmError::FileProcessing { name: file.name }),
            _ => return Ok(file),
        }

        let elapsed = started.elapsed();
        if elapsed >= poll.timeout {
            return Err(LlmError::ProcessingTimeout {
                name: file.name,
                waited_secs: elapsed.as_secs(),
            });
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(LlmError::Cancelled),
            () = tokio::time::sleep(poll.interval) => {}
        }

        file = store.get_file(&file.name).await?;
        tracing::debug!(name = %file.name, state = ?file.state, "polled file state");
    }
}
