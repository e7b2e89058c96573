//! Text-to-speech through the Google Translate speech endpoint.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

use crate::error::{LlmError, truncate_body};
use crate::tts::{Speech, TextToSpeech};

pub const DEFAULT_BASE_URL: &str = "https://translate.google.com";

const LANGUAGE: &str = "en";
const NORMAL_SPEED: &str = "1";
/// The endpoint rejects requests longer than this many characters.
const MAX_CHUNK_CHARS: usize = 100;

#[derive(Clone)]
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    base_url: String,
}

impl fmt::Debug for GoogleTranslateTts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleTranslateTts")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GoogleTranslateTts {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { client, base_url }
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, LlmError> {
        let params = [
            ("ie", "UTF-8".to_owned()),
            ("q", chunk.to_owned()),
            ("tl", LANGUAGE.to_owned()),
            ("client", "tw-ob".to_owned()),
            ("ttsspeed", NORMAL_SPEED.to_owned()),
            ("total", total.to_string()),
            ("idx", idx.to_string()),
            ("textlen", chunk.chars().count().to_string()),
        ];
        let url = url::Url::parse_with_params(&format!("{}/translate_tts", self.base_url), &params)?;

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Speech(format!(
                "{status}: {}",
                truncate_body(body, 500)
            )));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

impl TextToSpeech for GoogleTranslateTts {
    fn synthesize<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Speech, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let chunks = split_chunks(&clean_text(text), MAX_CHUNK_CHARS);
            if chunks.is_empty() {
                return Err(LlmError::Speech("no speakable text".into()));
            }

            tracing::debug!(chunks = chunks.len(), "synthesizing speech");
            let mut audio = Vec::new();
            for (idx, chunk) in chunks.iter().enumerate() {
                audio.extend(self.fetch_chunk(chunk, idx, chunks.len()).await?);
            }

            Ok(Speech {
                audio,
                extension: "mp3",
            })
        })
    }
}

/// Drop Markdown emphasis and heading markers that would otherwise be read aloud.
fn clean_text(text: &str) -> String {
    text.chars()
        .map(|c| if matches!(c, '*' | '#' | '`' | '>') { ' ' } else { c })
        .collect()
}

/// Split on whitespace into chunks of at most `max` characters.
/// Words longer than `max` are cut mid-word.
fn split_chunks(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            chunks.extend(chars.chunks(max).map(|c| c.iter().collect::<String>()));
            continue;
        }

        if !current.is_empty() && current_len + 1 + word_len > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn clean_text_strips_markdown() {
        let cleaned = clean_text("**Bold** `code`");
        assert_eq!(cleaned.split_whitespace().collect::<Vec<_>>(), ["Bold", "code"]);
    }

    #[test]
    fn split_short_text_is_one_chunk() {
        assert_eq!(split_chunks("hello  there\nfriend", 100), ["hello there friend"]);
    }

    #[test]
    fn split_breaks_on_word_boundaries() {
        let chunks = split_chunks("aaa bbb ccc", 7);
        assert_eq!(chunks, ["aaa bbb", "ccc"]);
    }

    #[test]
    fn split_cuts_overlong_words() {
        let chunks = split_chunks("xx abcdefghij yy", 4);
        assert_eq!(chunks, ["xx", "abcd", "efgh", "ij", "yy"]);
    }

    #[test]
    fn split_empty_text_has_no_chunks() {
        assert!(split_chunks("   ", 100).is_empty());
    }

    proptest! {
        #[test]
        fn chunks_never_exceed_limit(text in "[a-z ]{0,400}", max in 5usize..120) {
            for chunk in split_chunks(&text, max) {
                prop_assert!(chunk.chars().count() <= max);
                prop_assert!(!chunk.is_empty());
            }
        }

        #[test]
        fn chunks_preserve_words(words in proptest::collection::vec("[a-z]{1,10}", 0..50)) {
            let text = words.join(" ");
            let rejoined = split_chunks(&text, 30).join(" ");
            prop_assert_eq!(rejoined, text);
        }
    }

    #[tokio::test]
    async fn synthesize_concatenates_chunks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("tl", "en"))
            .and(query_param("ttsspeed", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MP3".to_vec()))
            .expect(2)
            .mount(&server)
            .await;

        let tts = GoogleTranslateTts::new(reqwest::Client::new(), server.uri());
        let text = format!("{} {}", "a".repeat(60), "b".repeat(60));
        let speech = tts.synthesize(&text).await.unwrap();
        assert_eq!(speech.audio, b"MP3MP3");
        assert_eq!(speech.extension, "mp3");
    }

    #[tokio::test]
    async fn synthesize_reports_http_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let tts = GoogleTranslateTts::new(reqwest::Client::new(), server.uri());
        let err = tts.synthesize("hello").await.unwrap_err();
        assert!(matches!(err, LlmError::Speech(ref msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn synthesize_rejects_empty_text() {
        let tts = GoogleTranslateTts::new(reqwest::Client::new(), DEFAULT_BASE_URL);
        let err = tts.synthesize("**").await.unwrap_err();
        assert!(matches!(err, LlmError::Speech(_)));
    }
}
