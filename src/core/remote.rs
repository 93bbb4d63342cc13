//! The remote generative-language call, as seen by the assistant session.
//!
//! The session only knows this trait. The Gemini REST implementation lives in
//! [`crate::gemini`]; tests substitute scripted clients.

use async_trait::async_trait;
use thiserror::Error;

use crate::citations::Citation;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerateRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub enable_retrieval: bool,
    pub temperature: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerateResponse {
    pub text: String,
    /// Raw grounding sources, in the order the model returned them.
    pub citations: Vec<Citation>,
}

/// Any failure of the remote call.
///
/// Callers are expected to treat every variant the same way; the variants
/// exist for logs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RemoteError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote returned HTTP {code}: {message}")]
    Status { code: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// One-shot, stateless generation call.
///
/// Futures are not required to be `Send`: on the web host they wrap browser
/// promises.
#[async_trait(?Send)]
pub trait GenerativeClient {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, RemoteError>;
}

#[async_trait(?Send)]
impl<T: GenerativeClient + ?Sized> GenerativeClient for std::rc::Rc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, RemoteError> {
        (**self).generate(request).await
    }
}

/// An absent client fails every call. Lets hosts hold `Option<C>` when the
/// credential may be missing.
#[async_trait(?Send)]
impl<T: GenerativeClient> GenerativeClient for Option<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, RemoteError> {
        match self {
            Some(client) => client.generate(request).await,
            None => Err(RemoteError::Transport("no client configured".to_string())),
        }
    }
}
