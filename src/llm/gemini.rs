//! Gemini function-calling backend
//!
//! Talks to the generative-language REST API with the declared tool
//! functions and a tool config that mandates selecting one of them.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{FunctionClassifier, FunctionDeclaration, LlmError};

/// Environment variable carrying the API key
pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";

/// Gemini backend configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// Gemini-backed function classifier
pub struct GeminiClassifier {
    config: GeminiConfig,
    client: Client,
}

impl GeminiClassifier {
    /// Create a new Gemini classifier
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "Gemini API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Build a classifier from the `GOOGLE_API_KEY` environment variable
    ///
    /// Returns `None` (with a warning) when the key is unset, leaving
    /// LLM-based tool routing disabled.
    pub fn from_env() -> Option<Self> {
        match std::env::var(API_KEY_ENV) {
            Ok(api_key) if !api_key.is_empty() => {
                let config = GeminiConfig {
                    api_key,
                    ..GeminiConfig::default()
                };
                Self::new(config).ok()
            }
            _ => {
                tracing::warn!("{} not set, LLM-based tool routing disabled", API_KEY_ENV);
                None
            }
        }
    }

    fn build_request(
        &self,
        instruction: &str,
        functions: &[FunctionDeclaration],
        system_instruction: &str,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            system_instruction: SystemInstruction {
                parts: vec![TextPart {
                    text: system_instruction.to_string(),
                }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![TextPart {
                    text: instruction.to_string(),
                }],
            }],
            tools: vec![ToolDeclarations {
                function_declarations: functions.to_vec(),
            }],
            tool_config: ToolConfig {
                function_calling_config: FunctionCallingConfig {
                    // ANY forces the model to select one declared function
                    mode: "ANY".to_string(),
                },
            },
        }
    }
}

#[async_trait]
impl FunctionClassifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn select_function(
        &self,
        instruction: &str,
        functions: &[FunctionDeclaration],
        system_instruction: &str,
    ) -> Result<Option<String>, LlmError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url, self.config.model
        );

        let request = self.build_request(instruction, functions, system_instruction);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError(format!("HTTP {}: {}", status, body)));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        // First function call in any candidate wins
        let selection = body
            .candidates
            .iter()
            .flat_map(|candidate| candidate.content.parts.iter())
            .find_map(|part| part.function_call.as_ref())
            .map(|call| call.name.clone());

        Ok(selection)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: SystemInstruction,
    contents: Vec<Content>,
    tools: Vec<ToolDeclarations>,
    #[serde(rename = "toolConfig")]
    tool_config: ToolConfig,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct ToolDeclarations {
    #[serde(rename = "functionDeclarations")]
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct ToolConfig {
    #[serde(rename = "functionCallingConfig")]
    function_calling_config: FunctionCallingConfig,
}

#[derive(Debug, Serialize)]
struct FunctionCallingConfig {
    mode: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(rename = "functionCall")]
    function_call: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = GeminiClassifier::new(GeminiConfig::default());
        assert!(matches!(result, Err(LlmError::NotConfigured(_))));
    }

    #[test]
    fn test_request_shape() {
        let classifier = GeminiClassifier::new(GeminiConfig {
            api_key: "test-key".to_string(),
            ..GeminiConfig::default()
        })
        .unwrap();

        let functions = vec![FunctionDeclaration {
            name: "update_cart".to_string(),
            description: "Updates a cart".to_string(),
        }];

        let request = classifier.build_request("please update my cart", &functions, "You route.");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "please update my cart");
        assert_eq!(
            json["tools"][0]["functionDeclarations"][0]["name"],
            "update_cart"
        );
        assert_eq!(json["toolConfig"]["functionCallingConfig"]["mode"], "ANY");
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "You route.");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "choosing"},
                        {"functionCall": {"name": "update_cart", "args": {}}}
                    ]
                }
            }]
        }"#;

        let parsed: GenerateContentResponse = serde_json::from_str(body).unwrap();
        let selection = parsed
            .candidates
            .iter()
            .flat_map(|c| c.content.parts.iter())
            .find_map(|p| p.function_call.as_ref())
            .map(|c| c.name.clone());

        assert_eq!(selection.as_deref(), Some("update_cart"));
    }

    #[test]
    fn test_empty_response_yields_no_selection() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.candidates.is_empty());
    }
}
