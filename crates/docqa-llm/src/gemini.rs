use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, truncate_body};
use crate::files::{MediaStore, RemoteFile};
use crate::provider::{LlmProvider, Message, Role};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const PROVIDER: &str = "gemini";
const MAX_ERROR_BODY: usize = 500;

#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    web_search: bool,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("web_search", &self.web_search)
            .finish()
    }
}

impl GeminiProvider {
    /// A missing `api_key` is accepted here; every request then fails with
    /// `LlmError::MissingApiKey`.
    #[must_use]
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        mut base_url: String,
        model: String,
    ) -> Self {
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client,
            api_key: api_key.filter(|k| !k.is_empty()),
            base_url,
            model,
            web_search: false,
        }
    }

    /// Attach the provider-hosted Google Search tool to every request.
    #[must_use]
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub fn web_search(&self) -> bool {
        self.web_search
    }

    fn api_key(&self) -> Result<&str, LlmError> {
        self.api_key.as_deref().ok_or(LlmError::MissingApiKey)
    }

    fn build_request<'a>(&self, messages: &'a [Message]) -> GenerateContentRequest<'a> {
        let system_text: Vec<&str> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
            .collect();
        let system_instruction = (!system_text.is_empty()).then(|| Content {
            role: None,
            parts: vec![Part::text(system_text.join("\n\n"))],
        });

        let contents = messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|m| {
                let mut parts: Vec<Part<'a>> = m
                    .media
                    .iter()
                    .map(|media| Part::file(&media.mime_type, &media.uri))
                    .collect();
                parts.push(Part::text(m.content.clone()));
                Content {
                    role: Some(if m.role == Role::Assistant {
                        "model"
                    } else {
                        "user"
                    }),
                    parts,
                }
            })
            .collect();

        let tools = if self.web_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        GenerateContentRequest {
            system_instruction,
            contents,
            tools,
        }
    }

    async fn send_request(&self, messages: &[Message]) -> Result<String, LlmError> {
        let api_key = self.api_key()?;
        let body = self.build_request(messages);
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            web_search = self.web_search,
            "sending Gemini generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let response = check_status(response).await?;
        let text = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&text)?;
        parsed.into_text()
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, LlmError> {
    let status = response.status();

    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return Err(LlmError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Gemini API error {status}: {body}");
        return Err(LlmError::Api {
            provider: PROVIDER,
            status: status.as_u16(),
            body: truncate_body(body, MAX_ERROR_BODY),
        });
    }

    Ok(response)
}

impl LlmProvider for GeminiProvider {
    async fn chat(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.send_request(messages).await
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }
}

impl MediaStore for GeminiProvider {
    fn upload<'a>(
        &'a self,
        path: &'a Path,
        mime_type: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = self.api_key()?;
            let bytes = tokio::fs::read(path).await?;
            tracing::info!(
                path = %path.display(),
                size = bytes.len(),
                mime_type,
                "uploading file to Gemini"
            );

            let response = self
                .client
                .post(format!("{}/upload/v1beta/files", self.base_url))
                .header("x-goog-api-key", api_key)
                .header("X-Goog-Upload-Protocol", "raw")
                .header("Content-Type", mime_type)
                .body(bytes)
                .send()
                .await?;

            let response = check_status(response).await?;
            let parsed: UploadResponse = response.json().await?;
            Ok(parsed.file)
        })
    }

    fn get_file<'a>(
        &'a self,
        name: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<RemoteFile, LlmError>> + Send + 'a>> {
        Box::pin(async move {
            let api_key = self.api_key()?;
            let response = self
                .client
                .get(format!("{}/v1beta/{name}", self.base_url))
                .header("x-goog-api-key", api_key)
                .send()
                .await?;
            let response = check_status(response).await?;
            Ok(response.json().await?)
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Part<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData<'a>>,
}

impl<'a> Part<'a> {
    fn text(text: String) -> Self {
        Self {
            text: Some(text),
            file_data: None,
        }
    }

    fn file(mime_type: &'a str, file_uri: &'a str) -> Self {
        Self {
            text: None,
            file_data: Some(FileData {
                mime_type,
                file_uri,
            }),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData<'a> {
    mime_type: &'a str,
    file_uri: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

impl GenerateContentResponse {
    fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(reason));
        }

        let Some(candidate) = self.candidates.into_iter().next() else {
            return Err(LlmError::EmptyResponse { provider: PROVIDER });
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate.finish_reason.filter(|r| r == "SAFETY") {
                return Err(LlmError::Blocked(reason));
            }
            return Err(LlmError::EmptyResponse { provider: PROVIDER });
        }

        Ok(text)
    }
}
