use std::io::Write;
use std::path::PathBuf;

use docqa_llm::TextToSpeech;

use crate::error::AgentError;

/// Turns answer text into an audio file on disk.
pub struct VoiceRenderer {
    tts: Box<dyn TextToSpeech>,
}

impl VoiceRenderer {
    #[must_use]
    pub fn new(tts: Box<dyn TextToSpeech>) -> Self {
        Self { tts }
    }

    /// Synthesise `text` and persist it to a new temp file.
    ///
    /// The caller owns the returned path and must remove it.
    ///
    /// # Errors
    ///
    /// Returns an error if synthesis fails or the file cannot be written.
    pub async fn render(&self, text: &str) -> Result<PathBuf, AgentError> {
        let speech = self.tts.synthesize(text).await?;
        let bytes = speech.audio.len();
        let path = tokio::task::spawn_blocking(move || {
            write_audio(&speech.audio, speech.extension)
        })
        .await
        .map_err(|e| AgentError::Other(format!("audio writer task failed: {e}")))??;
        tracing::debug!(path = %path.display(), bytes, "speech written");
        Ok(path)
    }
}

fn write_audio(audio: &[u8], extension: &str) -> std::io::Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix("docqa-voice-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(audio)?;
    file.flush()?;
    Ok(file.into_temp_path().keep()?)
}

#[cfg(test)]
mod tests {
    use docqa_llm::mock::MockSpeech;

    use super::*;

    #[tokio::test]
    async fn render_writes_mp3_file() {
        let renderer = VoiceRenderer::new(Box::new(MockSpeech::default()));
        let path = renderer.render("hello there").await.unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("mp3"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello there");
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn render_surfaces_speech_error() {
        let renderer = VoiceRenderer::new(Box::new(MockSpeech { fail: true }));
        let err = renderer.render("hello").await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }
}
