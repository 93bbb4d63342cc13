//! Assistant configuration: credential, model parameters and user-facing copy.
//!
//! Built once when the session is created. The credential is injected here
//! and reduced to a single "augmentation available" flag on the session.

use std::fmt;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Environment variables consulted by [`AssistantConfig::from_env`], in order.
pub const API_KEY_VARS: [&str; 2] = ["FOLIO_API_KEY", "API_KEY"];

/// Fixed strings shown in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Phrasebook {
    pub greeting: String,
    pub offline: String,
    pub failure: String,
    pub no_answer: String,
    pub untitled_source: String,
    pub thinking: String,
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self {
            greeting: "你好！我是牛渝文的 AI 助手。想了解关于他的 AI 创业经历或是对国学的见解吗？"
                .to_string(),
            offline: "AI 助手目前处于离线演示模式（未检测到 API Key）。".to_string(),
            failure: "连接 AI 服务时出现了一点小问题，请稍后再试。".to_string(),
            no_answer: "抱歉，我暂时无法回应。".to_string(),
            untitled_source: "网页来源".to_string(),
            thinking: "正在思考中...".to_string(),
        }
    }
}

#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AssistantConfig {
    /// Never serialized; inject with [`AssistantConfig::with_api_key`].
    #[cfg_attr(feature = "serde", serde(skip))]
    api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
    pub temperature: f32,
    /// Ask the model to ground answers with web search.
    pub enable_retrieval: bool,
    pub phrases: Phrasebook,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            temperature: 0.7,
            enable_retrieval: true,
            phrases: Phrasebook::default(),
        }
    }
}

impl fmt::Debug for AssistantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssistantConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .field("enable_retrieval", &self.enable_retrieval)
            .finish_non_exhaustive()
    }
}

impl AssistantConfig {
    /// Install a credential. Missing or blank values leave the assistant offline.
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        self.api_key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature.clamp(0.0, 2.0);
        self
    }

    pub fn with_retrieval(mut self, enabled: bool) -> Self {
        self.enable_retrieval = enabled;
        self
    }

    pub fn with_phrases(mut self, phrases: Phrasebook) -> Self {
        self.phrases = phrases;
        self
    }

    /// Read the credential from the process environment (native hosts).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let key = API_KEY_VARS
            .iter()
            .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()));
        Self::default().with_api_key(key.as_deref())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
