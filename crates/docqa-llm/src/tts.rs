use std::future::Future;
use std::pin::Pin;

use crate::error::LlmError;

/// Synthesised audio ready to be written to disk.
#[derive(Debug, Clone)]
pub struct Speech {
    pub audio: Vec<u8>,
    /// File extension matching the audio encoding, without the dot.
    pub extension: &'static str,
}

/// Async trait for text-to-speech backends.
pub trait TextToSpeech: Send + Sync {
    /// Convert text into spoken audio.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Speech` if the backend rejects the request.
    fn synthesize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Speech, LlmError>> + Send + 'a>>;
}
