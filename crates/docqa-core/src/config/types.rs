use std::str::FromStr;
use std::time::Duration;

use docqa_ingest::DocumentKind;
use docqa_llm::PollConfig;
use serde::{Deserialize, Serialize};

use crate::answer::AgentIdentity;
use crate::secret::Secret;

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub video: VideoConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
    #[serde(skip)]
    pub secrets: ResolvedSecrets,
}

/// Interaction flavour of the assistant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// PDF question answering with written answers.
    #[default]
    Research,
    /// PDF-optional conversation with spoken answers.
    Voice,
    /// Video analysis through the remote file API.
    Video,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Voice => "voice",
            Self::Video => "video",
        }
    }

    /// Whether uploads of `kind` belong in this mode.
    #[must_use]
    pub fn accepts(self, kind: DocumentKind) -> bool {
        match self {
            Self::Research | Self::Voice => kind == DocumentKind::Pdf,
            Self::Video => kind == DocumentKind::Video,
        }
    }

    #[must_use]
    pub fn default_agent_name(self) -> &'static str {
        match self {
            Self::Research => "PDF Research Assistant",
            Self::Voice => "Voice PDF Assistant",
            Self::Video => "Video AI Summarizer Agent",
        }
    }

    #[must_use]
    pub fn default_agent_description(self) -> &'static str {
        match self {
            Self::Research => {
                "You answer questions using uploaded PDF documents and web search when needed."
            }
            Self::Voice => "You are a friendly voice assistant that answers questions about PDFs.",
            Self::Video => "You analyze video content and answer questions about it.",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "research" => Ok(Self::Research),
            "voice" => Ok(Self::Voice),
            "video" => Ok(Self::Video),
            other => Err(format!(
                "unknown mode `{other}` (expected research, voice or video)"
            )),
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AgentConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AgentConfig {
    /// Identity presented to the model, falling back to per-mode defaults.
    #[must_use]
    pub fn identity(&self) -> AgentIdentity {
        AgentIdentity {
            name: self
                .name
                .clone()
                .unwrap_or_else(|| self.mode.default_agent_name().to_owned()),
            description: Some(
                self.description
                    .clone()
                    .unwrap_or_else(|| self.mode.default_agent_description().to_owned()),
            ),
        }
    }
}

fn default_base_url() -> String {
    docqa_llm::gemini::DEFAULT_BASE_URL.to_owned()
}

fn default_model() -> String {
    docqa_llm::gemini::DEFAULT_MODEL.to_owned()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LlmConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_true")]
    pub web_search: bool,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            web_search: true,
        }
    }
}

fn default_poll_interval_secs() -> u64 {
    1
}

fn default_processing_timeout_secs() -> u64 {
    600
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_processing_timeout_secs")]
    pub processing_timeout_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            processing_timeout_secs: default_processing_timeout_secs(),
        }
    }
}

impl VideoConfig {
    #[must_use]
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.processing_timeout_secs),
        }
    }
}

fn default_voice_base_url() -> String {
    docqa_llm::gtts::DEFAULT_BASE_URL.to_owned()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VoiceConfig {
    #[serde(default = "default_voice_base_url")]
    pub base_url: String,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_voice_base_url(),
        }
    }
}

fn default_max_file_size() -> u64 {
    docqa_ingest::DEFAULT_MAX_FILE_SIZE
}

#[derive(Debug, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_connect_timeout() -> u64 {
    30
}

fn default_llm_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_connect_timeout")]
    pub connect_secs: u64,
    #[serde(default = "default_llm_timeout")]
    pub llm_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: default_connect_timeout(),
            llm_secs: default_llm_timeout(),
        }
    }
}

#[derive(Debug, Default)]
pub struct ResolvedSecrets {
    pub gemini_api_key: Option<Secret>,
}
