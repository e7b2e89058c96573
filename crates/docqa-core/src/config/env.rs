use super::{Config, Mode};

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("DOCQA_MODE") {
            match v.parse::<Mode>() {
                Ok(mode) => self.agent.mode = mode,
                Err(e) => tracing::warn!("ignoring invalid DOCQA_MODE value: {e}"),
            }
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_WEB_SEARCH")
            && let Ok(enabled) = v.parse::<bool>()
        {
            self.llm.web_search = enabled;
        }
        if let Ok(v) = std::env::var("DOCQA_VIDEO_POLL_INTERVAL")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.video.poll_interval_secs = secs;
        }
        if let Ok(v) = std::env::var("DOCQA_VIDEO_TIMEOUT")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.video.processing_timeout_secs = secs;
        }
        if let Ok(v) = std::env::var("DOCQA_VOICE_BASE_URL") {
            self.voice.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCQA_INGEST_MAX_FILE_SIZE")
            && let Ok(size) = v.parse::<u64>()
        {
            self.ingest.max_file_size = size;
        }
        if let Ok(v) = std::env::var("DOCQA_TIMEOUT_LLM")
            && let Ok(secs) = v.parse::<u64>()
        {
            self.timeouts.llm_secs = secs;
        }
    }
}
