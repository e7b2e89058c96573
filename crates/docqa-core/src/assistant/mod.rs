//! The exchange loop: uploads fill the session, questions produce answers.

mod commands;
mod messages;


use std::path::{Path, PathBuf};

use docqa_ingest::{DocumentKind, Ingestor, Upload};
use docqa_llm::{LlmProvider, MediaRef, MediaStore, PollConfig, wait_until_active};
use tokio_util::sync::CancellationToken;

use crate::answer::AnsweringAgent;
use crate::channel::Channel;
use crate::config::Mode;
use crate::error::AgentError;
use crate::prompt;
use crate::session::{Exchange, Session};
use crate::voice::VoiceRenderer;

/// Result of an upload that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    Added(DocumentKind),
    /// A document with the same name is already stored; the upload was ignored.
    Skipped,
}

pub struct Assistant<P: LlmProvider, C: Channel> {
    mode: Mode,
    session: Session,
    agent: AnsweringAgent<P>,
    channel: C,
    ingestor: Ingestor,
    voice: Option<VoiceRenderer>,
    media: Option<Box<dyn MediaStore>>,
    poll: PollConfig,
    shutdown: CancellationToken,
    voice_failure: Option<String>,
}

impl<P: LlmProvider, C: Channel> Assistant<P, C> {
    #[must_use]
    pub fn new(mode: Mode, agent: AnsweringAgent<P>, channel: C) -> Self {
        Self {
            mode,
            session: Session::new(),
            agent,
            channel,
            ingestor: Ingestor::default(),
            voice: None,
            media: None,
            poll: PollConfig::default(),
            shutdown: CancellationToken::new(),
            voice_failure: None,
        }
    }

    #[must_use]
    pub fn with_ingestor(mut self, ingestor: Ingestor) -> Self {
        self.ingestor = ingestor;
        self
    }

    /// Speak every answer through `voice`.
    #[must_use]
    pub fn with_voice(mut self, voice: VoiceRenderer) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Remote file store used to hand videos to the model.
    #[must_use]
    pub fn with_media_store(mut self, store: Box<dyn MediaStore>, poll: PollConfig) -> Self {
        self.media = Some(store);
        self.poll = poll;
        self
    }

    /// Token that ends the loop and aborts pending video processing waits.
    #[must_use]
    pub fn with_shutdown(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// Speech error from the last answered question, if the answer could not be voiced.
    pub fn take_voice_failure(&mut self) -> Option<String> {
        self.voice_failure.take()
    }

    /// Store an upload in the session.
    ///
    /// Uploads whose name is already stored are skipped without being parsed.
    ///
    /// # Errors
    ///
    /// Returns `AgentError::WrongKind` when the file type does not belong to
    /// the current mode, or the ingestion error.
    pub async fn ingest(&mut self, upload: Upload) -> Result<IngestOutcome, AgentError> {
        if self.session.has(&upload.name) {
            tracing::info!(name = %upload.name, "skipping duplicate upload");
            return Ok(IngestOutcome::Skipped);
        }
        if let Some(kind) = upload.kind()
            && !self.mode.accepts(kind)
        {
            return Err(AgentError::WrongKind {
                kind,
                mode: self.mode,
            });
        }

        let name = upload.name.clone();
        let document = self.ingestor.ingest(upload).await?;
        let kind = document.kind();
        self.session.put(name, document);
        Ok(IngestOutcome::Added(kind))
    }

    /// Read `path` from disk and ingest it under its file name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or ingested.
    pub async fn upload_path(&mut self, path: &Path) -> Result<IngestOutcome, AgentError> {
        if let Some(name) = path.file_name().and_then(|n| n.to_str())
            && self.session.has(name)
        {
            tracing::info!(%name, "skipping duplicate upload");
            return Ok(IngestOutcome::Skipped);
        }
        let upload = Upload::read(path, self.ingestor.max_file_size).await?;
        self.ingest(upload).await
    }

    /// Answer `question` against the session and record the exchange.
    ///
    /// On error the history is left unchanged. A speech failure does not fail
    /// the question: the exchange is kept without audio and the error is
    /// available from [`Self::take_voice_failure`].
    ///
    /// # Errors
    ///
    /// Returns `EmptyQuestion` for blank input, `NoDocuments` when the mode
    /// needs an upload first, or the model error.
    pub async fn ask(&mut self, question: &str) -> Result<&Exchange, AgentError> {
        self.voice_failure = None;
        if question.trim().is_empty() {
            return Err(AgentError::EmptyQuestion);
        }
        self.ensure_documents()?;

        let prompt = prompt::compose(self.mode, &self.session, question);
        let media = if self.mode == Mode::Video {
            self.prepare_videos().await?
        } else {
            Vec::new()
        };

        let answer = self.agent.answer(&prompt, media).await?;
        let audio = self.speak(&answer).await;
        Ok(self
            .session
            .append_exchange(Exchange::new(question, answer).with_audio(audio)))
    }

    /// Clear the history. Video mode also drops its stored videos.
    pub fn clear(&mut self) -> usize {
        let cleared = self.session.clear_exchanges();
        if self.mode == Mode::Video {
            self.session.clear_documents();
        }
        tracing::info!(cleared, "history cleared");
        cleared
    }

    /// Run the chat loop, receiving messages via the channel until EOF or shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error only if channel I/O fails.
    pub async fn run(&mut self) -> Result<(), AgentError> {
        self.channel.send(messages::greeting(self.mode)).await?;

        loop {
            let incoming = tokio::select! {
                biased;
                () = self.shutdown.cancelled() => {
                    tracing::info!("shutting down");
                    break;
                }
                result = self.channel.recv() => result?,
            };
            let Some(msg) = incoming else { break };
            self.process_message(&msg.text).await?;
        }

        Ok(())
    }

    async fn process_message(&mut self, text: &str) -> Result<(), AgentError> {
        let trimmed = text.trim();
        if trimmed.starts_with('/') {
            return self.handle_command(trimmed).await;
        }
        if trimmed.is_empty() && self.mode != Mode::Video {
            return Ok(());
        }
        self.handle_question(text).await
    }

    async fn handle_question(&mut self, text: &str) -> Result<(), AgentError> {
        self.channel
            .send_status(messages::thinking(self.mode))
            .await?;

        match self.ask(text).await {
            Ok(exchange) => {
                let answer = exchange.answer.clone();
                let audio = exchange.audio.clone();
                self.channel.send(&answer).await?;
                if let Some(path) = audio {
                    self.channel.send_audio(&path).await?;
                }
                if let Some(err) = self.voice_failure.take() {
                    self.channel.send(&messages::voice_failed(&err)).await?;
                }
            }
            Err(AgentError::Channel(e)) => return Err(e.into()),
            Err(e) => {
                tracing::warn!(mode = %self.mode, "question failed: {e}");
                self.channel
                    .send(&messages::question_failed(self.mode, &e))
                    .await?;
            }
        }
        Ok(())
    }

    fn ensure_documents(&self) -> Result<(), AgentError> {
        let required = match self.mode {
            Mode::Research => DocumentKind::Pdf,
            Mode::Video => DocumentKind::Video,
            Mode::Voice => return Ok(()),
        };
        if self.session.documents().any(|(_, doc)| doc.kind() == required) {
            Ok(())
        } else {
            Err(AgentError::NoDocuments)
        }
    }

    /// Upload every stored video and wait for the provider to finish processing.
    async fn prepare_videos(&mut self) -> Result<Vec<MediaRef>, AgentError> {
        let Some(store) = self.media.as_deref() else {
            return Err(AgentError::NoMediaStore);
        };
        let cancel = self.shutdown.child_token();

        let mut refs = Vec::new();
        for (name, doc) in self.session.documents() {
            let Some(video) = doc.video() else { continue };
            self.channel
                .send_status(&messages::processing_video(name))
                .await?;
            let file = store.upload(video.path(), video.mime_type()).await?;
            let file = wait_until_active(store, file, &self.poll, &cancel).await?;
            tracing::info!(%name, remote = %file.name, "video ready");
            refs.push(file.media_ref());
        }
        Ok(refs)
    }

    async fn speak(&mut self, answer: &str) -> Option<PathBuf> {
        let voice = self.voice.as_ref()?;
        match voice.render(answer).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("voice generation failed: {e}");
                self.voice_failure = Some(e.to_string());
                None
            }
        }
    }
}
