//! Generative-language backends for tool classification
//!
//! The resolver's primary tier is an injectable [`FunctionClassifier`]: given
//! a free-text instruction and the declared functions, the backend must
//! select exactly one of them. Any backend failure degrades to the
//! resolver's deterministic fallback, so the core works fully offline.

pub mod gemini;

pub use gemini::{GeminiClassifier, GeminiConfig};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// A function a classifier may select
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    /// Function name
    pub name: String,

    /// What the function does, shown to the backend
    pub description: String,
}

/// Backend that maps one instruction to one declared function
#[async_trait]
pub trait FunctionClassifier: Send + Sync {
    /// Backend name, for logs
    fn name(&self) -> &str;

    /// Select one of `functions` for `instruction`
    ///
    /// Returns `Ok(None)` when the backend produced no usable selection.
    async fn select_function(
        &self,
        instruction: &str,
        functions: &[FunctionDeclaration],
        system_instruction: &str,
    ) -> Result<Option<String>, LlmError>;
}

/// Classification backend errors
#[derive(Debug, Clone, Error)]
pub enum LlmError {
    #[error("Backend not configured: {0}")]
    NotConfigured(String),
    #[error("Request failed: {0}")]
    RequestFailed(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Network error: {0}")]
    NetworkError(String),
    #[error("API error: {0}")]
    ApiError(String),
}
