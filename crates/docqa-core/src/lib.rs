//! Session state, prompt composition, and the question/answer loop.

pub mod answer;
pub mod assistant;
pub mod channel;
pub mod config;
pub mod error;
pub mod prompt;
pub mod secret;
pub mod session;
pub mod voice;

pub use answer::{AgentIdentity, AnsweringAgent};
pub use assistant::{Assistant, IngestOutcome};
pub use config::{Config, Mode};
pub use error::AgentError;
pub use session::{Exchange, Session};
pub use voice::VoiceRenderer;
