//! Test-only mock backends.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use crate::error::LlmError;
use crate::files::{FileState, MediaStore, RemoteFile};
use crate::provider::{LlmProvider, Message};
use crate::tts::{Speech, TextToSpeech};

#[derive(Debug, Clone)]
pub struct MockProvider {
    responses: Arc<Mutex<Vec<String>>>,
    requests: Arc<Mutex<Vec<Vec<Message>>>>,
    pub default_response: String,
    pub fail_chat: bool,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            default_response: "mock response".into(),
            fail_chat: false,
        }
    }
}

impl MockProvider {
    #[must_use]
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failing() -> Self {
        Self {
            fail_chat: true,
            ..Self::default()
        }
    }

    /// Every message batch passed to `chat`, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the request log mutex is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

impl LlmProvider for MockProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        if self.fail_chat {
            return Err(LlmError::Other("mock LLM error".into()));
        }
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(self.default_response.clone())
        } else {
            Ok(responses.remove(0))
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Media store whose uploaded files report `states` on successive polls.
#[derive(Debug, Clone, Default)]
pub struct MockMediaStore {
    states: Arc<Mutex<Vec<FileState>>>,
    uploads: Arc<Mutex<Vec<String>>>,
    pub fail_upload: bool,
}

impl MockMediaStore {
    #[must_use]
    pub fn with_states(states: Vec<FileState>) -> Self {
        Self {
            states: Arc::new(Mutex::new(states)),
            ..Self::default()
        }
    }

    /// # Panics
    ///
    /// Panics if the upload log mutex is poisoned.
    #[must_use]
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.lock().unwrap().clone()
    }
}

impl MediaStore for MockMediaStore {
    fn upload<'a>(
        &'a self,
        path: &'a Path,
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail_upload {
                return Err(LlmError::Other("mock upload error".into()));
            }
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push(path.display().to_string());
            let name = format!("files/mock-{}", uploads.len());
            Ok(RemoteFile {
                uri: format!("https://mock.files/{name}"),
                name,
                mime_type: mime_type.to_owned(),
                state: FileState::Processing,
            })
        })
    }

    fn get_file<'a>(
        &'a self,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let mut states = self.states.lock().unwrap();
            let state = if states.is_empty() {
                FileState::Active
            } else {
                states.remove(0)
            };
            Ok(RemoteFile {
                name: name.to_owned(),
                uri: format!("https://mock.files/{name}"),
                mime_type: "video/mp4".into(),
                state,
            })
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockSpeech {
    pub fail: bool,
}

impl TextToSpeech for MockSpeech {
    fn synthesize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Speech, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            if self.fail {
                return Err(LlmError::Speech("mock speech error".into()));
            }
            Ok(Speech {
                audio: text.as_bytes().to_vec(),
                extension: "mp3",
            })
        })
    }
}
