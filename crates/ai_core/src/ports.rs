//! Port definitions for the retrieval engine

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// A single-turn generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Instruction framing the model's role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
    /// The user prompt
    pub prompt: String,
    /// Let the model ground its answer on a web search
    #[serde(default)]
    pub search_grounding: bool,
    /// Require the output to be JSON
    #[serde(default)]
    pub json_output: bool,
    /// Schema the JSON output must follow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    /// Model to use (overrides config default)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Temperature for sampling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl InferenceRequest {
    /// Create a plain request
    pub fn simple(prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            prompt: prompt.into(),
            search_grounding: false,
            json_output: false,
            response_schema: None,
            model: None,
            temperature: None,
        }
    }

    /// Create a request with a system instruction
    pub fn with_system(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system_instruction: Some(system.into()),
            ..Self::simple(prompt)
        }
    }

    /// Enable the web-search grounding tool
    #[must_use]
    pub const fn grounded(mut self) -> Self {
        self.search_grounding = true;
        self
    }

    /// Require a JSON answer
    #[must_use]
    pub const fn json(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Require a JSON answer following `schema`
    #[must_use]
    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.json_output = true;
        self.response_schema = Some(schema);
        self
    }

    /// Set the model for this request
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set temperature
    #[must_use]
    pub const fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// A web page the model grounded its answer on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub uri: String,
}

/// Response from inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Generated content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Grounding citations in the order returned
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Port for inference engine implementations
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    /// Generate a complete response
    async fn generate(&self, request: InferenceRequest) -> Result<InferenceResponse, InferenceError>;

    /// Get the current default model
    fn default_model(&self) -> &str;
}
