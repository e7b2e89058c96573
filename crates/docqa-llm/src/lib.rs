//! Hosted model access: Gemini generation, the Gemini File API, and text-to-speech.

pub mod error;
pub mod files;
pub mod gemini;
pub mod gtts;
pub mod http;
#[cfg(feature = "mock")]
pub mod mock;
pub mod provider;
pub mod tts;

pub use error::LlmError;
pub use files::{FileState, MediaStore, PollConfig, RemoteFile, wait_until_active};
pub use gemini::GeminiProvider;
pub use gtts::GoogleTranslateTts;
pub use provider::{LlmProvider, MediaRef, Message, Role};
pub use tts::{Speech, TextToSpeech};
