use docqa_ingest::DocumentKind;

use crate::config::Mode;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] docqa_llm::LlmError),

    #[error(transparent)]
    Ingest(#[from] docqa_ingest::IngestError),

    #[error(transparent)]
    Channel(#[from] crate::channel::ChannelError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no documents uploaded")]
    NoDocuments,

    #[error("empty question")]
    EmptyQuestion,

    #[error("{kind} files are not accepted in {mode} mode")]
    WrongKind { kind: DocumentKind, mode: Mode },

    #[error("video analysis requires a media store")]
    NoMediaStore,

    #[error("{0}")]
    Other(String),
}
