//! Gemini `generateContent` client with optional Google Search grounding.
//!
//! Uses reqwest, which runs on `fetch` under wasm32 and on hyper natively, so
//! the same client serves the browser build and native tests.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::citations::Citation;
use crate::config::AssistantConfig;
use crate::remote::{GenerateRequest, GenerateResponse, GenerativeClient, RemoteError};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// `None` when the config carries no credential.
    pub fn from_config(config: &AssistantConfig) -> Option<Self> {
        let api_key = config.api_key()?;
        Some(Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }

    /// The key travels in a header so it never shows up in the URL, which
    /// reqwest echoes into its error messages.
    fn request(&self, request: &GenerateRequest) -> reqwest::RequestBuilder {
        self.client
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&GenerateContentRequest::from(request))
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

fn transport_error(err: reqwest::Error) -> RemoteError {
    RemoteError::Transport(err.without_url().to_string())
}

#[async_trait(?Send)]
impl GenerativeClient for GeminiClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, RemoteError> {
        tracing::debug!(
            model = %self.model,
            retrieval = request.enable_retrieval,
            "sending generateContent"
        );

        let response = self
            .request(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_http_error(status.as_u16(), &body));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| RemoteError::Malformed(err.without_url().to_string()))?;

        Ok(GenerateResponse {
            text: extract_answer(&payload).unwrap_or_default(),
            citations: extract_citations(&payload),
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize, Default)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Serialize, Default)]
struct GoogleSearch {}

impl From<&GenerateRequest> for GenerateContentRequest {
    fn from(request: &GenerateRequest) -> Self {
        let text = |s: &str| vec![Part { text: s.to_string() }];
        Self {
            system_instruction: Content {
                role: None,
                parts: text(&request.system_instruction),
            },
            contents: vec![Content {
                role: Some("user"),
                parts: text(&request.prompt),
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
            tools: if request.enable_retrieval {
                vec![Tool::default()]
            } else {
                Vec::new()
            },
        }
    }
}

/// Non-empty part texts across all candidates, joined by blank lines.
fn extract_answer(root: &Value) -> Option<String> {
    let collected: Vec<&str> = root
        .get("candidates")?
        .as_array()?
        .iter()
        .filter_map(|c| c.get("content")?.get("parts")?.as_array())
        .flatten()
        .filter_map(|part| part.get("text")?.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    (!collected.is_empty()).then(|| collected.join("\n\n"))
}

/// Grounding chunks in response order. Deduplication is left to the session.
fn extract_citations(root: &Value) -> Vec<Citation> {
    let Some(candidates) = root.get("candidates").and_then(Value::as_array) else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter_map(|c| c.get("groundingMetadata")?.get("groundingChunks")?.as_array())
        .flatten()
        .filter_map(|chunk| {
            let web = chunk.get("web")?;
            let uri = web.get("uri")?.as_str()?;
            let title = web.get("title").and_then(Value::as_str).unwrap_or_default();
            Some(Citation::new(uri, title))
        })
        .collect()
}

fn map_http_error(code: u16, body: &str) -> RemoteError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string());
    RemoteError::Status { code, message }
}
